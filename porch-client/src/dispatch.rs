//! Action dispatch

use porch_core::domain::pipeline::Pipeline;
use serde_json::Value;
use std::sync::Arc;
use tracing::info;

use crate::action::ActionDescriptor;
use crate::credentials::{CredentialProvider, EnvToken};
use crate::error::Result;
use crate::table;
use crate::transport::{Transport, join_url};

/// Sends validated actions to the server
///
/// Holds only the credential provider; the server, TLS policy and action
/// come from each [`ActionDescriptor`].
#[derive(Clone)]
pub struct Dispatcher {
    credentials: Arc<dyn CredentialProvider>,
}

impl Dispatcher {
    /// Create a dispatcher with an explicit token source
    pub fn new(credentials: Arc<dyn CredentialProvider>) -> Self {
        Self { credentials }
    }

    /// Create a dispatcher reading the token from `NPG_PORCH_TOKEN`
    pub fn from_env() -> Self {
        Self::new(Arc::new(EnvToken::new()))
    }

    /// Perform the described action
    ///
    /// Required inputs are checked before the token is looked up or any
    /// request is made. For `list_tasks` with a pipeline, only that
    /// pipeline's tasks are returned.
    ///
    /// # Arguments
    /// * `descriptor` - The validated action
    /// * `pipeline` - Pipeline the action applies to, if any
    ///
    /// # Returns
    /// The decoded JSON reply (an object or an array)
    pub async fn dispatch(
        &self,
        descriptor: &ActionDescriptor,
        pipeline: Option<&Pipeline>,
    ) -> Result<Value> {
        let spec = table::lookup(descriptor.action());
        let task_input = descriptor.task_input();
        let task_status = descriptor.task_status();

        spec.check(pipeline, task_input, task_status)?;
        let body = spec.body(pipeline, task_input, task_status)?;

        let transport = Transport::new(descriptor.verify_tls(), Arc::clone(&self.credentials))?;
        let url = join_url(descriptor.base_url(), spec.path);
        let response = transport
            .call(spec.kind, spec.verb, &url, body.as_ref())
            .await?;

        let result = spec.filter.apply(response, pipeline)?;
        info!(action = %spec.kind, %url, "Action completed");
        Ok(result)
    }
}

/// Perform an action using the token from the environment
pub async fn send(descriptor: &ActionDescriptor, pipeline: Option<&Pipeline>) -> Result<Value> {
    Dispatcher::from_env().dispatch(descriptor, pipeline).await
}
