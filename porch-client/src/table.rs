//! Action table
//!
//! Maps every [`ActionKind`] to the HTTP verb, path, required inputs,
//! body shape and response post-processing it needs. The table is static;
//! [`lookup`] is an exhaustive match, so adding a kind without an entry
//! does not compile.

use porch_core::ValidationError;
use porch_core::domain::action::ActionKind;
use porch_core::domain::pipeline::Pipeline;
use porch_core::dto::task::{NewTask, TaskUpdate};
use serde_json::Value;

use crate::error::{ClientError, Result};
use crate::transport::HttpVerb;

const PIPELINES_PATH: &str = "pipelines";
const TASKS_PATH: &str = "tasks";
const CLAIM_PATH: &str = "tasks/claim";

/// How the request body is assembled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyRule {
    /// No body
    Empty,
    /// The pipeline identity object
    Pipeline,
    /// `{pipeline, task_input}`
    PipelineAndTask,
    /// `{pipeline, task_input, status}`
    PipelineTaskAndStatus,
}

/// Post-processing applied to the decoded response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseFilter {
    /// Return the body as received
    None,
    /// Keep array elements whose `pipeline` equals the given pipeline
    ByPipeline,
}

/// Static description of one action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionSpec {
    pub kind: ActionKind,
    pub verb: HttpVerb,
    /// Path relative to the server base URL
    pub path: &'static str,
    pub requires_pipeline: bool,
    pub requires_task_input: bool,
    pub requires_task_status: bool,
    pub body: BodyRule,
    pub filter: ResponseFilter,
}

static LIST_TASKS: ActionSpec = ActionSpec {
    kind: ActionKind::ListTasks,
    verb: HttpVerb::Get,
    path: TASKS_PATH,
    requires_pipeline: false,
    requires_task_input: false,
    requires_task_status: false,
    body: BodyRule::Empty,
    filter: ResponseFilter::ByPipeline,
};

static LIST_PIPELINES: ActionSpec = ActionSpec {
    kind: ActionKind::ListPipelines,
    verb: HttpVerb::Get,
    path: PIPELINES_PATH,
    requires_pipeline: false,
    requires_task_input: false,
    requires_task_status: false,
    body: BodyRule::Empty,
    filter: ResponseFilter::None,
};

static ADD_PIPELINE: ActionSpec = ActionSpec {
    kind: ActionKind::AddPipeline,
    verb: HttpVerb::Post,
    path: PIPELINES_PATH,
    requires_pipeline: true,
    requires_task_input: false,
    requires_task_status: false,
    body: BodyRule::Pipeline,
    filter: ResponseFilter::None,
};

static ADD_TASK: ActionSpec = ActionSpec {
    kind: ActionKind::AddTask,
    verb: HttpVerb::Post,
    path: TASKS_PATH,
    requires_pipeline: true,
    requires_task_input: true,
    requires_task_status: false,
    body: BodyRule::PipelineAndTask,
    filter: ResponseFilter::None,
};

static CLAIM_TASK: ActionSpec = ActionSpec {
    kind: ActionKind::ClaimTask,
    verb: HttpVerb::Post,
    path: CLAIM_PATH,
    requires_pipeline: true,
    requires_task_input: false,
    requires_task_status: false,
    body: BodyRule::Pipeline,
    filter: ResponseFilter::None,
};

static UPDATE_TASK: ActionSpec = ActionSpec {
    kind: ActionKind::UpdateTask,
    verb: HttpVerb::Put,
    path: TASKS_PATH,
    requires_pipeline: true,
    requires_task_input: true,
    requires_task_status: true,
    body: BodyRule::PipelineTaskAndStatus,
    filter: ResponseFilter::None,
};

/// Table entry for an action
pub fn lookup(kind: ActionKind) -> &'static ActionSpec {
    match kind {
        ActionKind::ListTasks => &LIST_TASKS,
        ActionKind::ListPipelines => &LIST_PIPELINES,
        ActionKind::AddPipeline => &ADD_PIPELINE,
        ActionKind::AddTask => &ADD_TASK,
        ActionKind::ClaimTask => &CLAIM_TASK,
        ActionKind::UpdateTask => &UPDATE_TASK,
    }
}

impl ActionSpec {
    /// Check that every input this action requires is present
    ///
    /// Pipeline first, then task input, then status.
    pub fn check(
        &self,
        pipeline: Option<&Pipeline>,
        task_input: Option<&Value>,
        task_status: Option<&str>,
    ) -> std::result::Result<(), ValidationError> {
        if self.requires_pipeline && pipeline.is_none() {
            return Err(self.missing("pipeline"));
        }
        if self.requires_task_input && task_input.is_none() {
            return Err(self.missing("task_input"));
        }
        if self.requires_task_status && task_status.is_none() {
            return Err(self.missing("task_status"));
        }
        Ok(())
    }

    /// Assemble the request body
    ///
    /// Usable without a prior [`check`](Self::check): any input the body
    /// needs but did not get is reported as the same validation error.
    pub fn body(
        &self,
        pipeline: Option<&Pipeline>,
        task_input: Option<&Value>,
        task_status: Option<&str>,
    ) -> Result<Option<Value>> {
        let body = match self.body {
            BodyRule::Empty => return Ok(None),
            BodyRule::Pipeline => self.require_pipeline(pipeline)?.to_value(),
            BodyRule::PipelineAndTask => serde_json::to_value(NewTask {
                pipeline: self.require_pipeline(pipeline)?.clone(),
                task_input: self.require_task_input(task_input)?.clone(),
            })?,
            BodyRule::PipelineTaskAndStatus => serde_json::to_value(TaskUpdate {
                pipeline: self.require_pipeline(pipeline)?.clone(),
                task_input: self.require_task_input(task_input)?.clone(),
                status: task_status
                    .ok_or_else(|| self.missing("task_status"))?
                    .to_string(),
            })?,
        };
        Ok(Some(body))
    }

    fn missing(&self, field: &'static str) -> ValidationError {
        ValidationError::RequiredForAction {
            field,
            action: self.kind,
        }
    }

    fn require_pipeline<'a>(&self, pipeline: Option<&'a Pipeline>) -> Result<&'a Pipeline> {
        pipeline.ok_or_else(|| self.missing("pipeline").into())
    }

    fn require_task_input<'a>(&self, task_input: Option<&'a Value>) -> Result<&'a Value> {
        task_input.ok_or_else(|| self.missing("task_input").into())
    }
}

impl ResponseFilter {
    /// Apply the filter to a decoded response body
    pub fn apply(self, body: Value, pipeline: Option<&Pipeline>) -> Result<Value> {
        let pipeline = match (self, pipeline) {
            (ResponseFilter::ByPipeline, Some(pipeline)) => pipeline,
            _ => return Ok(body),
        };

        let Value::Array(items) = body else {
            return Err(ClientError::UnexpectedResponse(
                "expected a JSON array of tasks".to_string(),
            ));
        };

        let wanted = pipeline.to_value();
        let kept = items
            .into_iter()
            .filter(|item| item.get("pipeline") == Some(&wanted))
            .collect();
        Ok(Value::Array(kept))
    }
}
