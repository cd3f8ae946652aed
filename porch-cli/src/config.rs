//! Configuration module
//!
//! Handles the optional config file (INI or JSON) and merges it under the
//! command-line flags.

use ini::Ini;
use porch_client::{CredentialProvider, EnvToken, StaticToken};
use porch_core::ValidationError;
use porch_core::domain::pipeline::Pipeline;
use serde_json::Value;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// Section read when none is given
pub const DEFAULT_SECTION: &str = "PORCH";

const KEYS: [&str; 5] = [
    "api_url",
    "pipeline_name",
    "pipeline_uri",
    "pipeline_version",
    "npg_porch_token",
];

/// Configuration file errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File missing or unreadable
    #[error("{0} is not present or cannot be read")]
    NotFound(String),

    /// Malformed INI file
    #[error("Failed to parse INI config file: {0}")]
    Ini(#[from] ini::Error),

    /// Malformed JSON file
    #[error("Failed to parse JSON config file: {0}")]
    Json(#[from] serde_json::Error),

    /// Requested section absent
    #[error("Section '{0}' not found in config file")]
    MissingSection(String),

    /// Section lacks some of the required keys
    #[error("Config file is missing required keys: {}", .0.join(", "))]
    MissingKeys(Vec<String>),
}

/// Contents of a porch client config file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PorchClientConfig {
    pub api_url: String,
    pub pipeline_name: String,
    pub pipeline_uri: String,
    pub pipeline_version: String,
    pub npg_porch_token: String,
}

impl PorchClientConfig {
    /// Build from a key lookup, reporting every missing key at once
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let missing: Vec<String> = KEYS
            .iter()
            .filter(|key| lookup(key).is_none())
            .map(|key| key.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(ConfigError::MissingKeys(missing));
        }

        let get = |key: &str| lookup(key).unwrap_or_default();
        Ok(Self {
            api_url: get("api_url"),
            pipeline_name: get("pipeline_name"),
            pipeline_uri: get("pipeline_uri"),
            pipeline_version: get("pipeline_version"),
            npg_porch_token: get("npg_porch_token"),
        })
    }
}

/// Load a config file
///
/// Files ending in `.json` are read as JSON: the `section` key is used when
/// present, otherwise the top-level object. Anything else is read as INI
/// and `section` must exist.
pub fn load(path: &Path, section: &str) -> Result<PorchClientConfig, ConfigError> {
    if !path.is_file() || std::fs::File::open(path).is_err() {
        return Err(ConfigError::NotFound(path.display().to_string()));
    }

    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    if is_json {
        load_json(path, section)
    } else {
        load_ini(path, section)
    }
}

fn load_ini(path: &Path, section: &str) -> Result<PorchClientConfig, ConfigError> {
    let ini = Ini::load_from_file(path)?;
    let properties = ini
        .section(Some(section))
        .ok_or_else(|| ConfigError::MissingSection(section.to_string()))?;

    PorchClientConfig::from_lookup(|key| properties.get(key).map(str::to_string))
}

fn load_json(path: &Path, section: &str) -> Result<PorchClientConfig, ConfigError> {
    let text = std::fs::read_to_string(path)
        .map_err(|_| ConfigError::NotFound(path.display().to_string()))?;
    let document: Value = serde_json::from_str(&text)?;
    let object = document.get(section).unwrap_or(&document);

    PorchClientConfig::from_lookup(|key| {
        object
            .get(key)
            .and_then(Value::as_str)
            .map(str::to_string)
    })
}

/// CLI configuration after merging flags over the config file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    /// URL of the porch server
    pub base_url: Option<String>,
    pub pipeline_name: Option<String>,
    pub pipeline_uri: Option<String>,
    pub pipeline_version: Option<String>,
    /// Token from the config file; the environment is used otherwise
    pub token: Option<String>,
}

impl Config {
    /// Fill every unset value from the config file
    pub fn with_file(self, file: Option<PorchClientConfig>) -> Self {
        let Some(file) = file else {
            return self;
        };

        Self {
            base_url: self.base_url.or(Some(file.api_url)),
            pipeline_name: self.pipeline_name.or(Some(file.pipeline_name)),
            pipeline_uri: self.pipeline_uri.or(Some(file.pipeline_uri)),
            pipeline_version: self.pipeline_version.or(Some(file.pipeline_version)),
            token: self.token.or(Some(file.npg_porch_token)),
        }
    }

    /// The pipeline the request is scoped to
    ///
    /// Absent when no name is configured; an error when the name is given
    /// without uri or version.
    pub fn pipeline(&self) -> Result<Option<Pipeline>, ValidationError> {
        let Some(name) = &self.pipeline_name else {
            return Ok(None);
        };

        Pipeline::new(
            name.as_str(),
            self.pipeline_uri.clone().unwrap_or_default(),
            self.pipeline_version.clone().unwrap_or_default(),
        )
        .map(Some)
    }

    /// Token source for authenticated calls
    pub fn credentials(&self) -> Arc<dyn CredentialProvider> {
        match &self.token {
            Some(token) => Arc::new(StaticToken::new(token.as_str())),
            None => Arc::new(EnvToken::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const INI: &str = "\
[PORCH]
api_url = https://porch.example.com
pipeline_name = test_pipeline
pipeline_uri = https://github.com/org/test_pipeline.git
pipeline_version = 9.9.9
npg_porch_token = secret

[PARTIALPORCH]
api_url = https://porch.example.com
pipeline_name = test_pipeline
pipeline_uri = https://github.com/org/test_pipeline.git
";

    fn write(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    fn file_config() -> PorchClientConfig {
        PorchClientConfig {
            api_url: "https://porch.example.com".to_string(),
            pipeline_name: "test_pipeline".to_string(),
            pipeline_uri: "https://github.com/org/test_pipeline.git".to_string(),
            pipeline_version: "9.9.9".to_string(),
            npg_porch_token: "secret".to_string(),
        }
    }

    #[test]
    fn test_load_ini() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "conf.ini", INI);

        let config = load(&path, DEFAULT_SECTION).unwrap();
        assert_eq!(config, file_config());
    }

    #[test]
    fn test_load_ini_partial_section() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "conf.ini", INI);

        match load(&path, "PARTIALPORCH") {
            Err(ConfigError::MissingKeys(keys)) => {
                assert_eq!(keys, vec!["pipeline_version", "npg_porch_token"]);
            }
            other => panic!("Expected missing keys, got {:?}", other),
        }
    }

    #[test]
    fn test_load_ini_absent_section() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "conf.ini", INI);

        assert!(matches!(
            load(&path, "ABSENT"),
            Err(ConfigError::MissingSection(_))
        ));
    }

    #[test]
    fn test_load_missing_file() {
        let err = load(Path::new("notafile"), "ABSENT").unwrap_err();
        assert_eq!(err.to_string(), "notafile is not present or cannot be read");
    }

    #[test]
    fn test_load_json_with_section() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "conf.json",
            r#"{"PORCH": {
                "api_url": "https://porch.example.com",
                "pipeline_name": "test_pipeline",
                "pipeline_uri": "https://github.com/org/test_pipeline.git",
                "pipeline_version": "9.9.9",
                "npg_porch_token": "secret"
            }}"#,
        );

        assert_eq!(load(&path, DEFAULT_SECTION).unwrap(), file_config());
    }

    #[test]
    fn test_load_json_top_level() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "conf.json",
            r#"{
                "api_url": "https://porch.example.com",
                "pipeline_name": "test_pipeline",
                "pipeline_uri": "https://github.com/org/test_pipeline.git",
                "pipeline_version": "9.9.9",
                "npg_porch_token": "secret"
            }"#,
        );

        assert_eq!(load(&path, DEFAULT_SECTION).unwrap(), file_config());
    }

    #[test]
    fn test_load_malformed_json() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "conf.json", "{not json");

        assert!(matches!(
            load(&path, DEFAULT_SECTION),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn test_flags_take_precedence() {
        let config = Config {
            base_url: Some("http://override".to_string()),
            pipeline_version: Some("1.0".to_string()),
            ..Default::default()
        }
        .with_file(Some(file_config()));

        assert_eq!(config.base_url.as_deref(), Some("http://override"));
        assert_eq!(config.pipeline_version.as_deref(), Some("1.0"));
        assert_eq!(config.pipeline_name.as_deref(), Some("test_pipeline"));
        assert_eq!(config.token.as_deref(), Some("secret"));
    }

    #[test]
    fn test_without_file() {
        let config = Config::default().with_file(None);
        assert_eq!(config, Config::default());
        assert_eq!(config.pipeline().unwrap(), None);
    }

    #[test]
    fn test_pipeline_needs_uri_and_version() {
        let config = Config {
            pipeline_name: Some("p1".to_string()),
            ..Default::default()
        };
        assert_eq!(
            config.pipeline().unwrap_err(),
            ValidationError::IncompletePipeline
        );

        let config = Config {
            pipeline_uri: Some("http://some.com".to_string()),
            pipeline_version: Some("1.0".to_string()),
            ..config
        };
        let pipeline = config.pipeline().unwrap().unwrap();
        assert_eq!(pipeline.name(), "p1");
    }

    #[test]
    fn test_config_token_is_used() {
        let config = Config {
            token: Some("from_file".to_string()),
            ..Default::default()
        };
        assert_eq!(config.credentials().token().unwrap(), "from_file");
    }
}
