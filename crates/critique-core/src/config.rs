//! Configuration management for Critique.
//!
//! Configuration is loaded from (in priority order):
//! 1. Environment variables (`CRITIQUE__` prefix, `__` separator)
//! 2. Config file (`critique.toml`, flat keys)
//! 3. Defaults
//!
//! The API key is never stored in the file. It is read from the environment
//! variable named by `api_key_env`.

use serde::Deserialize;

use crate::error::Result;
use crate::types::{CritiqueFormat, GenerationOptions};

/// Top-level Critique configuration.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct CritiqueConfig {
    /// Path to the identity document.
    #[serde(default = "default_identity_path")]
    pub identity_path: String,

    /// Model identifier sent to the generation endpoint.
    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,

    /// Base URL of the generation API (without the `/models/...` suffix).
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// HTTP request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub request_timeout_secs: u64,

    /// Output structure demanded from structured critiques.
    #[serde(default)]
    pub schema: CritiqueFormat,

    /// Default file name for exported session notes.
    #[serde(default = "default_notes_file")]
    pub notes_file: String,

    /// Name of the environment variable holding the API key.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
}

fn default_identity_path() -> String {
    "identity.txt".to_string()
}

fn default_model() -> String {
    "gemma-3-27b-it".to_string()
}

fn default_temperature() -> f32 {
    0.7
}

fn default_max_output_tokens() -> u32 {
    2000
}

fn default_api_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_timeout() -> u64 {
    120
}

fn default_notes_file() -> String {
    "critique_session_notes.md".to_string()
}

fn default_api_key_env() -> String {
    "GEMINI_API_KEY".to_string()
}

impl Default for CritiqueConfig {
    fn default() -> Self {
        Self {
            identity_path: default_identity_path(),
            model: default_model(),
            temperature: default_temperature(),
            max_output_tokens: default_max_output_tokens(),
            api_base_url: default_api_base_url(),
            request_timeout_secs: default_timeout(),
            schema: CritiqueFormat::default(),
            notes_file: default_notes_file(),
            api_key_env: default_api_key_env(),
        }
    }
}

impl CritiqueConfig {
    /// Load configuration from `{file_prefix}.toml` (optional) and the environment.
    pub fn load(file_prefix: &str) -> Result<Self> {
        let cfg = config::Config::builder()
            .add_source(config::File::with_name(file_prefix).required(false))
            .add_source(
                config::Environment::with_prefix("CRITIQUE")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let loaded: Self = cfg.try_deserialize()?;
        tracing::debug!(
            model = %loaded.model,
            identity_path = %loaded.identity_path,
            schema = ?loaded.schema,
            "Configuration loaded"
        );
        Ok(loaded)
    }

    pub fn generation_options(&self) -> GenerationOptions {
        GenerationOptions {
            temperature: self.temperature,
            max_output_tokens: self.max_output_tokens,
        }
    }

    /// The API key from the configured environment variable, if set and non-empty.
    pub fn api_key(&self) -> Option<String> {
        std::env::var(&self.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = CritiqueConfig::default();
        assert_eq!(config.identity_path, "identity.txt");
        assert_eq!(config.model, "gemma-3-27b-it");
        assert_eq!(config.schema, CritiqueFormat::Reflective);
        assert_eq!(config.generation_options(), GenerationOptions::default());
        assert_eq!(config.api_key_env, "GEMINI_API_KEY");
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let prefix = dir.path().join("absent");
        let config = CritiqueConfig::load(prefix.to_str().unwrap()).unwrap();
        assert_eq!(config.max_output_tokens, 2000);
        assert_eq!(config.notes_file, "critique_session_notes.md");
    }

    #[test]
    fn test_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("custom.toml"),
            "model = \"gemini-2.0-flash\"\ntemperature = 0.2\nschema = \"observational\"\n",
        )
        .unwrap();

        let prefix = dir.path().join("custom");
        let config = CritiqueConfig::load(prefix.to_str().unwrap()).unwrap();
        assert_eq!(config.model, "gemini-2.0-flash");
        assert_eq!(config.temperature, 0.2);
        assert_eq!(config.schema, CritiqueFormat::Observational);
        assert_eq!(config.identity_path, "identity.txt");
    }

    #[test]
    fn test_api_key_reads_named_variable() {
        let config = CritiqueConfig {
            api_key_env: "CRITIQUE_TEST_KEY_THAT_IS_NEVER_SET".to_string(),
            ..Default::default()
        };
        assert_eq!(config.api_key(), None);
    }
}
