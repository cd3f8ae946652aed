//! Data Transfer Objects for client/server communication
//!
//! Request bodies sent to the orchestration server. Response bodies are kept
//! as raw JSON because the client hands them to the caller untouched.

pub mod task;
