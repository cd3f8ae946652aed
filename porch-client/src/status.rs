//! Task status validation against the server's schema document
//!
//! The set of valid statuses belongs to the server. It is read from the
//! OpenAPI document on every validation and never cached.

use porch_core::ValidationError;
use reqwest::Client;
use reqwest::header::ACCEPT;
use serde_json::Value;
use tracing::debug;

use crate::error::{ClientError, Result};
use crate::transport::{ensure_success, http_client, join_url};

/// Location of the OpenAPI document, relative to the server base URL
pub const OPENAPI_SCHEMA_PATH: &str = "api/v1/openapi.json";

/// Schema component holding the task status enumeration
pub const TASK_STATUS_ENUM_NAME: &str = "TaskStateEnum";

/// Validates task statuses against a live schema document
#[derive(Debug, Clone)]
pub struct StatusValidator {
    client: Client,
}

impl StatusValidator {
    /// Create a validator
    ///
    /// # Arguments
    /// * `verify_tls` - Whether to verify the server's certificate
    pub fn new(verify_tls: bool) -> Result<Self> {
        Ok(Self {
            client: http_client(verify_tls)?,
        })
    }

    /// Fetch the valid statuses from the server
    ///
    /// The schema document is fetched without authentication.
    pub async fn valid_statuses(&self, base_url: &str) -> Result<Vec<String>> {
        let url = join_url(base_url, OPENAPI_SCHEMA_PATH);
        debug!(%url, "Fetching schema document");

        let response = self
            .client
            .get(&url)
            .header(ACCEPT, "application/json")
            .send()
            .await?;
        let response =
            ensure_success(response, "Failed to get OpenAPI Schema".to_string()).await?;

        let text = response.text().await?;
        let document: Value = serde_json::from_str(&text)
            .map_err(|e| ClientError::schema(&url, Some(e.to_string())))?;

        let statuses = extract_statuses(&document)
            .map_err(|cause| ClientError::schema(&url, Some(cause)))?;
        if statuses.is_empty() {
            return Err(ClientError::schema(&url, None));
        }

        Ok(statuses)
    }

    /// Validate a candidate status
    ///
    /// Returns the status as spelled in the server's enumeration.
    pub async fn validate(&self, candidate: &str, base_url: &str) -> Result<String> {
        let valid = self.valid_statuses(base_url).await?;
        canonicalize(candidate, &valid)
    }
}

/// Validate `candidate` against the statuses published by the server at `base_url`
pub async fn validate_status(candidate: &str, base_url: &str, verify_tls: bool) -> Result<String> {
    StatusValidator::new(verify_tls)?
        .validate(candidate, base_url)
        .await
}

/// Read `components.schemas.TaskStateEnum.enum` from an OpenAPI document
fn extract_statuses(document: &Value) -> std::result::Result<Vec<String>, String> {
    let pointer = format!("/components/schemas/{TASK_STATUS_ENUM_NAME}/enum");
    let values = document
        .pointer(&pointer)
        .ok_or_else(|| format!("no value at '{pointer}'"))?
        .as_array()
        .ok_or_else(|| format!("value at '{pointer}' is not an array"))?;

    values
        .iter()
        .map(|v| {
            v.as_str()
                .map(str::to_string)
                .ok_or_else(|| format!("non-string status {v} at '{pointer}'"))
        })
        .collect()
}

/// Match a candidate against the valid statuses, ignoring its case
///
/// The candidate is uppercased and compared exactly; the enumeration is
/// expected to be uppercase.
fn canonicalize(candidate: &str, valid: &[String]) -> Result<String> {
    let status = candidate.to_uppercase();
    if valid.contains(&status) {
        Ok(status)
    } else {
        Err(ValidationError::invalid_status(candidate, valid).into())
    }
}
