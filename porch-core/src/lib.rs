//! Porch Core
//!
//! Core types shared by the porch client and command-line tool.
//!
//! This crate contains:
//! - Domain types: pipeline identity and the closed set of client actions
//! - DTOs: request bodies sent to the pipeline orchestration server
//! - Validation errors raised before any request leaves the process

pub mod domain;
pub mod dto;
pub mod error;

pub use error::ValidationError;
