//! Validated action descriptors
//!
//! An [`ActionDescriptor`] is the immutable description of one request:
//! which server, which action, and the optional task input and status. It
//! is only obtainable through [`ActionDescriptorBuilder::build`], which
//! checks every local precondition first and then, if a status was given,
//! validates it against the server's schema document.

use porch_core::ValidationError;
use porch_core::domain::action::ActionKind;
use serde_json::Value;
use tracing::debug;

use crate::error::Result;
use crate::status::StatusValidator;

/// A validated request specification
#[derive(Debug, Clone, PartialEq)]
pub struct ActionDescriptor {
    base_url: String,
    action: ActionKind,
    verify_tls: bool,
    task_input: Option<Value>,
    task_status: Option<String>,
}

impl ActionDescriptor {
    /// Start building a descriptor
    ///
    /// # Example
    /// ```no_run
    /// # use porch_client::ActionDescriptor;
    /// # async fn example() -> porch_client::Result<()> {
    /// let descriptor = ActionDescriptor::builder()
    ///     .base_url("https://porch.example.com")
    ///     .action("update_task")
    ///     .task_json(r#"{"id_run": 5}"#)
    ///     .task_status("done")
    ///     .build()
    ///     .await?;
    /// assert_eq!(descriptor.task_status(), Some("DONE"));
    /// # Ok(())
    /// # }
    /// ```
    pub fn builder() -> ActionDescriptorBuilder {
        ActionDescriptorBuilder::default()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn action(&self) -> ActionKind {
        self.action
    }

    pub fn verify_tls(&self) -> bool {
        self.verify_tls
    }

    pub fn task_input(&self) -> Option<&Value> {
        self.task_input.as_ref()
    }

    /// The task status, in the server's casing
    pub fn task_status(&self) -> Option<&str> {
        self.task_status.as_deref()
    }
}

/// Builder for [`ActionDescriptor`]
#[derive(Debug, Clone)]
pub struct ActionDescriptorBuilder {
    base_url: Option<String>,
    action: Option<String>,
    verify_tls: bool,
    task_json: Option<String>,
    task_input: Option<Value>,
    task_status: Option<String>,
}

impl Default for ActionDescriptorBuilder {
    fn default() -> Self {
        Self {
            base_url: None,
            action: None,
            verify_tls: true,
            task_json: None,
            task_input: None,
            task_status: None,
        }
    }
}

impl ActionDescriptorBuilder {
    /// Base URL of the server
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Action name, e.g. "list_tasks"
    pub fn action(mut self, action: impl Into<String>) -> Self {
        self.action = Some(action.into());
        self
    }

    /// Whether to verify the server's certificate (default: true)
    pub fn verify_tls(mut self, verify_tls: bool) -> Self {
        self.verify_tls = verify_tls;
        self
    }

    /// Task input as raw JSON text
    pub fn task_json(mut self, task_json: impl Into<String>) -> Self {
        self.task_json = Some(task_json.into());
        self
    }

    /// Task input as a parsed JSON value
    pub fn task_input(mut self, task_input: Value) -> Self {
        self.task_input = Some(task_input);
        self
    }

    /// Task status, validated case-insensitively against the server
    pub fn task_status(mut self, task_status: impl Into<String>) -> Self {
        self.task_status = Some(task_status.into());
        self
    }

    /// Validate the inputs and build the descriptor
    ///
    /// Local checks run in a fixed order and stop at the first failure.
    /// Only when they all pass and a status was supplied is the server's
    /// schema document fetched.
    pub async fn build(self) -> Result<ActionDescriptor> {
        let (mut descriptor, pending_status) = self.validate_local()?;

        if let Some(status) = pending_status {
            let validator = StatusValidator::new(descriptor.verify_tls)?;
            let status = validator.validate(&status, &descriptor.base_url).await?;
            descriptor.task_status = Some(status);
        }

        debug!(action = %descriptor.action, "Action descriptor validated");
        Ok(descriptor)
    }

    /// Like [`build`](Self::build), using an existing validator
    pub async fn build_with(self, validator: &StatusValidator) -> Result<ActionDescriptor> {
        let (mut descriptor, pending_status) = self.validate_local()?;

        if let Some(status) = pending_status {
            let status = validator.validate(&status, &descriptor.base_url).await?;
            descriptor.task_status = Some(status);
        }

        Ok(descriptor)
    }

    /// Checks that need no network, returning the status still to validate
    fn validate_local(self) -> Result<(ActionDescriptor, Option<String>)> {
        let base_url = self
            .base_url
            .filter(|url| !url.is_empty())
            .ok_or(ValidationError::MissingField("porch_url"))?;
        let action = self
            .action
            .filter(|action| !action.is_empty())
            .ok_or(ValidationError::MissingField("action"))?;

        let action: ActionKind = action.parse()?;

        let task_input = match (self.task_json, self.task_input) {
            (Some(_), Some(_)) => return Err(ValidationError::ConflictingTaskInput.into()),
            (Some(json), None) => Some(serde_json::from_str(&json)?),
            (None, input) => input,
        };

        let descriptor = ActionDescriptor {
            base_url,
            action,
            verify_tls: self.verify_tls,
            task_input,
            task_status: None,
        };

        Ok((descriptor, self.task_status))
    }
}
