//! Pipeline identity

use serde::Serialize;
use serde_json::Value;

use crate::error::ValidationError;

/// Identity of a pipeline registered with the server
///
/// The server represents a pipeline as exactly this triple, so equality
/// and the wire shape both cover all three fields.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Pipeline {
    name: String,
    uri: String,
    version: String,
}

impl Pipeline {
    /// Create a pipeline identity
    ///
    /// Fails unless name, uri and version are all non-empty.
    pub fn new(
        name: impl Into<String>,
        uri: impl Into<String>,
        version: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let pipeline = Self {
            name: name.into(),
            uri: uri.into(),
            version: version.into(),
        };

        if pipeline.name.is_empty() || pipeline.uri.is_empty() || pipeline.version.is_empty() {
            return Err(ValidationError::IncompletePipeline);
        }

        Ok(pipeline)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// The JSON object the server uses for this pipeline
    pub fn to_value(&self) -> Value {
        serde_json::json!({
            "name": self.name,
            "uri": self.uri,
            "version": self.version,
        })
    }
}
