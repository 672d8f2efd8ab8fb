/*!
 * Tests for app configuration functionality
 */

use anyhow::Result;
use yaltwai::app_config::{Config, LogLevel, TranscriptionConfig};

#[test]
fn test_defaultConfig_shouldHaveExpectedValues() {
    let config = Config::default();

    assert_eq!(config.transcription.model, "gemini-2.0-flash");
    assert!(config.transcription.api_key.is_empty());
    assert_eq!(config.transcription.endpoint, "https://generativelanguage.googleapis.com");
    assert_eq!(config.transcription.max_attempts, 5);
    assert_eq!(config.transcription.backoff_base_ms, 1000);
    assert_eq!(config.transcription.timeout_secs, 120);
    assert_eq!(config.log_level, LogLevel::Info);
}

/// Omitted fields are filled from the serde defaults
#[test]
fn test_deserialize_withMinimalJson_shouldFillDefaults() -> Result<()> {
    let json = r#"{ "transcription": { "api_key": "test-key" } }"#;
    let config: Config = serde_json::from_str(json)?;

    assert_eq!(config.transcription.api_key, "test-key");
    assert_eq!(config.transcription.model, "gemini-2.0-flash");
    assert_eq!(config.transcription.max_attempts, 5);
    assert_eq!(config.log_level, LogLevel::Info);

    Ok(())
}

#[test]
fn test_deserialize_withLogLevel_shouldParseLowercase() -> Result<()> {
    let json = r#"{ "transcription": { "api_key": "k" }, "log_level": "debug" }"#;
    let config: Config = serde_json::from_str(json)?;

    assert_eq!(config.log_level, LogLevel::Debug);

    Ok(())
}

#[test]
fn test_serializeRoundTrip_shouldPreserveConfig() -> Result<()> {
    let mut config = Config::default();
    config.transcription.api_key = "abc".to_string();
    config.transcription.max_attempts = 7;
    config.log_level = LogLevel::Trace;

    let json = serde_json::to_string_pretty(&config)?;
    let restored: Config = serde_json::from_str(&json)?;

    assert_eq!(restored.transcription.api_key, "abc");
    assert_eq!(restored.transcription.max_attempts, 7);
    assert_eq!(restored.log_level, LogLevel::Trace);

    Ok(())
}

#[test]
fn test_validate_withApiKey_shouldPass() {
    let config = Config {
        transcription: TranscriptionConfig {
            api_key: "key".to_string(),
            ..TranscriptionConfig::default()
        },
        ..Config::default()
    };

    assert!(config.validate().is_ok());
}

#[test]
fn test_validate_withoutApiKey_shouldFail() {
    let config = Config::default();

    let error = config.validate().unwrap_err();
    assert!(error.to_string().contains("API key"));
}

#[test]
fn test_validate_withEmptyModel_shouldFail() {
    let config = Config {
        transcription: TranscriptionConfig {
            api_key: "key".to_string(),
            model: "  ".to_string(),
            ..TranscriptionConfig::default()
        },
        ..Config::default()
    };

    assert!(config.validate().is_err());
}

#[test]
fn test_validate_withZeroAttempts_shouldFail() {
    let config = Config {
        transcription: TranscriptionConfig {
            api_key: "key".to_string(),
            max_attempts: 0,
            ..TranscriptionConfig::default()
        },
        ..Config::default()
    };

    let error = config.validate().unwrap_err();
    assert!(error.to_string().contains("max_attempts"));
}

#[test]
fn test_validate_withMalformedEndpoint_shouldFail() {
    let config = Config {
        transcription: TranscriptionConfig {
            api_key: "key".to_string(),
            endpoint: "not a url".to_string(),
            ..TranscriptionConfig::default()
        },
        ..Config::default()
    };

    assert!(config.validate().is_err());
}

#[test]
fn test_validate_withOutOfRangeTemperature_shouldFail() {
    let config = Config {
        transcription: TranscriptionConfig {
            api_key: "key".to_string(),
            temperature: 3.5,
            ..TranscriptionConfig::default()
        },
        ..Config::default()
    };

    let error = config.validate().unwrap_err();
    assert!(error.to_string().contains("Temperature"));
}
