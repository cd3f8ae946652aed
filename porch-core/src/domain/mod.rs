//! Core domain types
//!
//! These types describe what the client talks about: the pipeline a request
//! is scoped to and the action being requested. They are built fresh for
//! every invocation and never mutated afterwards.

pub mod action;
pub mod pipeline;
