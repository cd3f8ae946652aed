//! Porch HTTP Client
//!
//! Builds, validates and sends requests to a pipeline orchestration server.
//!
//! A request goes through three stages:
//! - [`ActionDescriptor`]: local validation of the action and its inputs,
//!   plus a check of the task status against the server's schema document
//! - [`table`]: the verb, path, body and response filter for the action
//! - [`Dispatcher`]: the authenticated call and response post-processing
//!
//! # Example
//!
//! ```no_run
//! use porch_client::{ActionDescriptor, Dispatcher};
//! use porch_core::domain::pipeline::Pipeline;
//!
//! # async fn example() -> porch_client::Result<()> {
//! let pipeline = Pipeline::new("ncov", "https://github.com/org/ncov.git", "1.2.0")?;
//! let descriptor = ActionDescriptor::builder()
//!     .base_url("https://porch.example.com")
//!     .action("claim_task")
//!     .build()
//!     .await?;
//!
//! let claimed = Dispatcher::from_env().dispatch(&descriptor, Some(&pipeline)).await?;
//! println!("{}", claimed);
//! # Ok(())
//! # }
//! ```

pub mod action;
pub mod credentials;
pub mod dispatch;
pub mod error;
pub mod status;
pub mod table;
pub mod transport;

// Re-export commonly used types
pub use action::{ActionDescriptor, ActionDescriptorBuilder};
pub use credentials::{CredentialProvider, EnvToken, StaticToken, TOKEN_ENV_VAR};
pub use dispatch::{Dispatcher, send};
pub use error::{ClientError, Result};
pub use status::{StatusValidator, validate_status};
