//! Client action kinds

use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

/// An operation the client can perform against the server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    ListTasks,
    ListPipelines,
    AddPipeline,
    AddTask,
    ClaimTask,
    UpdateTask,
}

impl ActionKind {
    /// Every recognized action
    pub const ALL: [ActionKind; 6] = [
        ActionKind::ListTasks,
        ActionKind::ListPipelines,
        ActionKind::AddPipeline,
        ActionKind::AddTask,
        ActionKind::ClaimTask,
        ActionKind::UpdateTask,
    ];

    /// Wire name of the action
    pub fn as_str(self) -> &'static str {
        match self {
            ActionKind::ListTasks => "list_tasks",
            ActionKind::ListPipelines => "list_pipelines",
            ActionKind::AddPipeline => "add_pipeline",
            ActionKind::AddTask => "add_task",
            ActionKind::ClaimTask => "claim_task",
            ActionKind::UpdateTask => "update_task",
        }
    }

    /// Names of all recognized actions, sorted ascending
    pub fn valid_names() -> Vec<String> {
        let mut names: Vec<String> = Self::ALL.iter().map(|k| k.as_str().to_string()).collect();
        names.sort();
        names
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActionKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| ValidationError::UnknownAction {
                action: s.to_string(),
                valid: Self::valid_names(),
            })
    }
}
