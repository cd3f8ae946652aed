//! Validation errors
//!
//! Raised for local precondition failures, before any state-changing
//! request is sent.

use thiserror::Error;

use crate::domain::action::ActionKind;

/// A local precondition failed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A mandatory attribute was not supplied
    #[error("'{0}' attribute must be set")]
    MissingField(&'static str),

    /// The action name is not one of the recognized kinds
    #[error("Action '{action}' is not valid. Valid actions: {}", .valid.join(", "))]
    UnknownAction {
        action: String,
        /// Valid action names, sorted ascending
        valid: Vec<String>,
    },

    /// Both raw task JSON and a parsed task object were supplied
    #[error("task_json and task_input cannot be both set")]
    ConflictingTaskInput,

    /// The task status is not in the server's enumeration
    #[error("Task status '{status}' is not valid. Valid statuses: {}", .valid.join(", "))]
    InvalidStatus {
        status: String,
        /// Valid statuses, sorted ascending
        valid: Vec<String>,
    },

    /// The action needs a value the caller did not provide
    #[error("{field} required for action '{action}'")]
    RequiredForAction {
        field: &'static str,
        action: ActionKind,
    },

    /// One of the pipeline identity fields is empty
    #[error("Pipeline name, uri and version should be defined")]
    IncompletePipeline,
}

impl ValidationError {
    /// Build an invalid-status error, sorting the valid values
    pub fn invalid_status(status: impl Into<String>, valid: &[String]) -> Self {
        let mut valid = valid.to_vec();
        valid.sort();
        Self::InvalidStatus {
            status: status.into(),
            valid,
        }
    }
}
