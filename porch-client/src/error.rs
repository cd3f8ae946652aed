//! Error types for the porch client

use porch_core::ValidationError;
use thiserror::Error;

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur when using the porch client
#[derive(Debug, Error)]
pub enum ClientError {
    /// No usable authentication token
    #[error("{0}")]
    Auth(String),

    /// A local precondition failed
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The schema document has no usable task status enumeration
    #[error("Failed to get enumeration of valid statuses from {url}{}", suffix(": ", .cause))]
    Schema {
        /// URL of the schema document
        url: String,
        /// Underlying parse failure, if any
        cause: Option<String>,
    },

    /// The server answered with a non-success status
    #[error(
        "{context}. Status code {status} \"{reason}\" received from {url}{}",
        suffix(".\nDetail: ", .detail)
    )]
    Server {
        /// What the client was doing when the call failed
        context: String,
        /// HTTP status code
        status: u16,
        /// HTTP reason phrase
        reason: String,
        /// Effective URL of the request
        url: String,
        /// `detail` field of the error body, when the server sent one
        detail: Option<String>,
    },

    /// HTTP request failed before a response was received
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// Raw task JSON could not be parsed
    #[error("Failed to parse task JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// The response body does not have the shape the action expects
    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),
}

fn suffix(prefix: &str, value: &Option<String>) -> String {
    value
        .as_ref()
        .map(|v| format!("{prefix}{v}"))
        .unwrap_or_default()
}

impl ClientError {
    /// Create a schema error for the given schema URL
    pub fn schema(url: impl Into<String>, cause: Option<String>) -> Self {
        Self::Schema {
            url: url.into(),
            cause,
        }
    }

    /// Check if this error is an authentication error
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::Auth(_))
    }

    /// Check if this error is a local validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Check if this error is a schema contract error
    pub fn is_schema(&self) -> bool {
        matches!(self, Self::Schema { .. })
    }

    /// HTTP status code of a server error
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Server { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn server_error(detail: Option<&str>) -> ClientError {
        ClientError::Server {
            context: "Action claim_task failed".to_string(),
            status: 404,
            reason: "Not Found".to_string(),
            url: "http://some.com/tasks/claim".to_string(),
            detail: detail.map(str::to_string),
        }
    }

    #[test]
    fn test_server_error_message() {
        assert_eq!(
            server_error(None).to_string(),
            "Action claim_task failed. Status code 404 \"Not Found\" received from \
             http://some.com/tasks/claim"
        );
    }

    #[test]
    fn test_server_error_message_with_detail() {
        assert_eq!(
            server_error(Some("Not found in our data")).to_string(),
            "Action claim_task failed. Status code 404 \"Not Found\" received from \
             http://some.com/tasks/claim.\nDetail: Not found in our data"
        );
    }

    #[test]
    fn test_schema_error_message() {
        let url = "http://some.com/api/v1/openapi.json";
        assert_eq!(
            ClientError::schema(url, None).to_string(),
            format!("Failed to get enumeration of valid statuses from {url}")
        );
        assert_eq!(
            ClientError::schema(url, Some("missing 'enum'".to_string())).to_string(),
            format!("Failed to get enumeration of valid statuses from {url}: missing 'enum'")
        );
    }

    #[test]
    fn test_predicates() {
        assert!(ClientError::Auth("Authorization token is needed".into()).is_auth());
        assert!(ClientError::from(ValidationError::ConflictingTaskInput).is_validation());
        assert!(ClientError::schema("http://x", None).is_schema());
        assert_eq!(server_error(None).status(), Some(404));
        assert_eq!(ClientError::Auth(String::new()).status(), None);
    }
}
