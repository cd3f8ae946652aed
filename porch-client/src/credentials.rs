//! Bearer token providers

use crate::error::{ClientError, Result};

/// Environment variable holding the server token
pub const TOKEN_ENV_VAR: &str = "NPG_PORCH_TOKEN";

const TOKEN_MISSING: &str = "Authorization token is needed";

/// Source of the bearer token attached to authenticated calls
///
/// The token is resolved at call time, so a missing token surfaces as an
/// [`ClientError::Auth`] before any request is sent.
pub trait CredentialProvider: Send + Sync {
    fn token(&self) -> Result<String>;
}

/// Reads the token from an environment variable
#[derive(Debug, Clone)]
pub struct EnvToken {
    var: String,
}

impl EnvToken {
    /// Read from [`TOKEN_ENV_VAR`]
    pub fn new() -> Self {
        Self::with_var(TOKEN_ENV_VAR)
    }

    /// Read from a custom variable
    pub fn with_var(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }
}

impl Default for EnvToken {
    fn default() -> Self {
        Self::new()
    }
}

impl CredentialProvider for EnvToken {
    fn token(&self) -> Result<String> {
        non_empty(std::env::var(&self.var).ok())
    }
}

/// An unset or empty token is treated as missing
fn non_empty(token: Option<String>) -> Result<String> {
    match token {
        Some(token) if !token.is_empty() => Ok(token),
        _ => Err(ClientError::Auth(TOKEN_MISSING.to_string())),
    }
}

/// A token supplied up front, e.g. from a config file
#[derive(Clone)]
pub struct StaticToken(String);

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }
}

impl std::fmt::Debug for StaticToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("StaticToken(***)")
    }
}

impl CredentialProvider for StaticToken {
    fn token(&self) -> Result<String> {
        non_empty(Some(self.0.clone()))
    }
}
