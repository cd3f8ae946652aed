//! Authenticated HTTP transport
//!
//! Every call is a single blocking-style exchange: resolve the token, send
//! one request with fixed timeouts, and turn a non-success status into a
//! [`ClientError::Server`]. Nothing is retried.

use porch_core::domain::action::ActionKind;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Client, Method, Response};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use crate::credentials::CredentialProvider;
use crate::error::{ClientError, Result};

/// Time allowed to establish a connection
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Time allowed between reads of the response
pub const READ_TIMEOUT: Duration = Duration::from_secs(60);

const JSON_MIME: &str = "application/json";

/// HTTP verbs used by the client
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpVerb {
    Get,
    Post,
    Put,
}

impl HttpVerb {
    fn method(self) -> Method {
        match self {
            HttpVerb::Get => Method::GET,
            HttpVerb::Post => Method::POST,
            HttpVerb::Put => Method::PUT,
        }
    }
}

impl fmt::Display for HttpVerb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.method().as_str())
    }
}

/// Join a server base URL and a path relative to it
///
/// A trailing slash on the base and a leading slash on the path are ignored.
pub fn join_url(base_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Build an HTTP client with the fixed timeouts and the requested TLS policy
pub(crate) fn http_client(verify_tls: bool) -> Result<Client> {
    let client = Client::builder()
        .connect_timeout(CONNECT_TIMEOUT)
        .read_timeout(READ_TIMEOUT)
        .danger_accept_invalid_certs(!verify_tls)
        .build()?;
    Ok(client)
}

/// Pass a successful response through, or describe the failure
///
/// `context` names what the client was doing, e.g. "Action add_task failed".
pub(crate) async fn ensure_success(response: Response, context: String) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let url = response.url().to_string();
    let detail = response
        .json::<Value>()
        .await
        .ok()
        .and_then(|body| body.get("detail").and_then(Value::as_str).map(str::to_string));

    warn!(status = status.as_u16(), %url, "{}", context);

    Err(ClientError::Server {
        context,
        status: status.as_u16(),
        // reqwest does not expose the reason line the server sent
        reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
        url,
        detail,
    })
}

/// Authenticated JSON transport
#[derive(Clone)]
pub struct Transport {
    client: Client,
    credentials: Arc<dyn CredentialProvider>,
}

impl Transport {
    /// Create a transport
    ///
    /// # Arguments
    /// * `verify_tls` - Whether to verify the server's certificate
    /// * `credentials` - Source of the bearer token
    pub fn new(verify_tls: bool, credentials: Arc<dyn CredentialProvider>) -> Result<Self> {
        Ok(Self {
            client: http_client(verify_tls)?,
            credentials,
        })
    }

    /// Send one authenticated request and decode the JSON reply
    ///
    /// The token is resolved first; without one no request is sent.
    pub async fn call(
        &self,
        action: ActionKind,
        verb: HttpVerb,
        url: &str,
        body: Option<&Value>,
    ) -> Result<Value> {
        let token = self.credentials.token()?;

        debug!(%action, %verb, url, "Sending request");
        let mut request = self
            .client
            .request(verb.method(), url)
            .bearer_auth(token)
            .header(CONTENT_TYPE, JSON_MIME)
            .header(ACCEPT, JSON_MIME);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let response = ensure_success(response, format!("Action {action} failed")).await?;

        response.json().await.map_err(|e| {
            ClientError::UnexpectedResponse(format!("Failed to parse JSON response: {}", e))
        })
    }
}
