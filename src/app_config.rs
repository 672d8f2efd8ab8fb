use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Transcription config
    pub transcription: TranscriptionConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Transcription endpoint and retry configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranscriptionConfig {
    // @field: Model name
    #[serde(default = "default_model")]
    pub model: String,

    // @field: API key
    #[serde(default = "String::new")]
    pub api_key: String,

    // @field: Service URL
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Bound on total request attempts per transcription
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Base backoff time in milliseconds, doubled on each retry
    #[serde(default = "default_backoff_base_ms")]
    pub backoff_base_ms: u64,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Maximum tokens the model may generate
    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,

    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

impl Default for TranscriptionConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            api_key: String::new(),
            endpoint: default_endpoint(),
            max_attempts: default_max_attempts(),
            backoff_base_ms: default_backoff_base_ms(),
            timeout_secs: default_timeout_secs(),
            max_output_tokens: default_max_output_tokens(),
            temperature: default_temperature(),
        }
    }
}

/// Log level for application logging
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Error level
    Error,
    /// Warning level
    Warn,
    /// Info level (default)
    #[default]
    Info,
    /// Debug level
    Debug,
    /// Trace level
    Trace,
}

fn default_model() -> String {
    "gemini-2.0-flash".to_string()
}

fn default_endpoint() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_max_attempts() -> u32 {
    5
}

fn default_backoff_base_ms() -> u64 {
    1000 // 1 second base backoff time, doubled on each retry
}

fn default_timeout_secs() -> u64 {
    120
}

fn default_max_output_tokens() -> u32 {
    8192
}

fn default_temperature() -> f32 {
    0.3
}

impl Default for Config {
    fn default() -> Self {
        Self {
            transcription: TranscriptionConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}

impl Config {
    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.transcription.model.trim().is_empty() {
            return Err(anyhow!("Model name cannot be empty"));
        }

        if self.transcription.api_key.trim().is_empty() {
            return Err(anyhow!(
                "API key is required. Set it in the config file, with --api-key, or via GEMINI_API_KEY"
            ));
        }

        if self.transcription.max_attempts == 0 {
            return Err(anyhow!("max_attempts must be at least 1"));
        }

        if !self.transcription.endpoint.is_empty() {
            url::Url::parse(&self.transcription.endpoint)
                .map_err(|e| anyhow!("Invalid endpoint URL '{}': {}", self.transcription.endpoint, e))?;
        }

        if !(0.0..=2.0).contains(&self.transcription.temperature) {
            return Err(anyhow!(
                "Temperature must be between 0.0 and 2.0, got {}",
                self.transcription.temperature
            ));
        }

        Ok(())
    }
}
