//! Task DTOs

use serde::Serialize;
use serde_json::Value;

use crate::domain::pipeline::Pipeline;

/// Request body registering a new task
#[derive(Debug, Clone, Serialize)]
pub struct NewTask {
    pub pipeline: Pipeline,
    pub task_input: Value,
}

/// Request body changing the status of an existing task
#[derive(Debug, Clone, Serialize)]
pub struct TaskUpdate {
    pub pipeline: Pipeline,
    pub task_input: Value,
    pub status: String,
}
