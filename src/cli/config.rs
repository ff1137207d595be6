//! Configuration Management
//!
//! Settings read once at startup from a JSON file and passed by reference to
//! the orchestrator and the UI. Only the provider credential is required.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::llm::cohere::{DEFAULT_BASE_URL, DEFAULT_MODEL};
use crate::orchestrator::OrchestratorSettings;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("no provider credential: set \"key\" in {0}")]
    MissingCredential(String),

    #[error("could not read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Rendering options for the content pane
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyntaxOptions {
    pub line_numbers: bool,
    pub word_wrap: bool,
    pub indent_guides: bool,
    pub theme: String,
}

impl Default for SyntaxOptions {
    fn default() -> Self {
        Self {
            line_numbers: true,
            word_wrap: false,
            indent_guides: true,
            theme: "github-dark".to_string(),
        }
    }
}

/// Application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub syntax: SyntaxOptions,
    #[serde(default)]
    pub preamble: String,
    #[serde(default)]
    pub prompt: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub plan_temperature: Option<f32>,
    #[serde(default = "default_answer_temperature")]
    pub answer_temperature: Option<f32>,
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_answer_temperature() -> Option<f32> {
    Some(0.3)
}

impl Config {
    /// Load and validate the configuration file at `path`
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let display = path.display().to_string();
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: display.clone(),
            source,
        })?;
        Self::from_json(&raw, &display)
    }

    /// Parse configuration text; `origin` names the source in error messages
    pub fn from_json(raw: &str, origin: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_json::from_str(raw).map_err(|source| ConfigError::Parse {
            path: origin.to_string(),
            source,
        })?;

        if config.key.trim().is_empty() {
            return Err(ConfigError::MissingCredential(origin.to_string()));
        }

        Ok(config)
    }

    pub fn orchestrator_settings(&self) -> OrchestratorSettings {
        OrchestratorSettings {
            model: self.model.clone(),
            plan_temperature: self.plan_temperature,
            answer_temperature: self.answer_temperature,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_with_only_key() {
        let config = Config::from_json(r#"{ "key": "abc123" }"#, "config.json").unwrap();
        assert_eq!(config.key, "abc123");
        assert_eq!(config.syntax, SyntaxOptions::default());
        assert!(config.syntax.line_numbers);
        assert!(!config.syntax.word_wrap);
        assert!(config.syntax.indent_guides);
        assert_eq!(config.syntax.theme, "github-dark");
        assert_eq!(config.preamble, "");
        assert_eq!(config.prompt, "");
        assert_eq!(config.model, "command-r");
        assert_eq!(config.plan_temperature, None);
        assert_eq!(config.answer_temperature, Some(0.3));
    }

    #[test]
    fn test_missing_key_is_rejected() {
        let err = Config::from_json(r#"{ "prompt": "Summarize" }"#, "config.json").unwrap_err();
        assert!(matches!(err, ConfigError::MissingCredential(_)));

        let err = Config::from_json(r#"{ "key": "  " }"#, "config.json").unwrap_err();
        assert!(matches!(err, ConfigError::MissingCredential(_)));
    }

    #[test]
    fn test_partial_syntax_options() {
        let config = Config::from_json(
            r#"{ "key": "k", "syntax": { "word_wrap": true, "theme": "InspiredGitHub" } }"#,
            "config.json",
        )
        .unwrap();
        assert!(config.syntax.word_wrap);
        assert!(config.syntax.line_numbers);
        assert_eq!(config.syntax.theme, "InspiredGitHub");
    }

    #[test]
    fn test_orchestrator_settings() {
        let config = Config::from_json(
            r#"{ "key": "k", "model": "command-r-plus", "plan_temperature": 0.7, "answer_temperature": null }"#,
            "config.json",
        )
        .unwrap();
        let settings = config.orchestrator_settings();
        assert_eq!(settings.model, "command-r-plus");
        assert_eq!(settings.plan_temperature, Some(0.7));
        assert_eq!(settings.answer_temperature, None);
    }

    #[test]
    fn test_load_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");
        fs::write(&path, r#"{ "key": "k", "preamble": "You are terse." }"#).unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.preamble, "You are terse.");

        let missing = Config::load(temp_dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(missing, ConfigError::Io { .. }));

        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(Config::load(&path).unwrap_err(), ConfigError::Parse { .. }));
    }
}
