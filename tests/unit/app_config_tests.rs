/*!
 * Tests for application configuration functionality
 */

use std::path::PathBuf;
use traduire::app_config::{Config, LogLevel, ModelBackend, ModelConfig};
use crate::common;

/// Test default configuration values
#[test]
fn test_default_config_withNoParameters_shouldHaveCorrectDefaults() {
    let config = Config::default();

    assert_eq!(config.source_language, "fr");
    assert_eq!(config.target_language, "en");
    assert_eq!(config.max_input_chars, 10_000);
    assert_eq!(config.beam_width, 3);
    assert_eq!(config.concurrent_requests, 1);
    assert_eq!(config.log_level, LogLevel::Info);

    assert_eq!(config.model.backend, ModelBackend::Phrasebook);
    assert_eq!(config.model.path, PathBuf::from("models/fr-en.phrasebook.json"));
    assert_eq!(config.model.url, None);
    assert_eq!(config.model.sha256, None);
    assert_eq!(config.model.endpoint, "http://localhost:11434");
    assert_eq!(config.model.timeout_secs, 60);

    assert!(config.validate().is_ok());
}

/// Test configuration validation
#[test]
fn test_config_validation_withVariousConfigs_shouldValidateCorrectly() {
    let mut config = Config::default();

    // Invalid source language
    config.source_language = "xyz".to_string();
    assert!(config.validate().is_err());
    config.source_language = "fra".to_string();
    assert!(config.validate().is_ok());

    // Invalid target language
    config.target_language = "".to_string();
    assert!(config.validate().is_err());
    config.target_language = "en".to_string();

    // Zero bounds
    config.beam_width = 0;
    assert!(config.validate().is_err());
    config.beam_width = 3;

    config.max_input_chars = 0;
    assert!(config.validate().is_err());
    config.max_input_chars = 10_000;

    config.concurrent_requests = 0;
    assert!(config.validate().is_err());
    config.concurrent_requests = 4;
    assert!(config.validate().is_ok());
}

/// Test backend-specific validation rules
#[test]
fn test_config_validation_withBackendSettings_shouldCheckRequirements() {
    let mut config = Config::default();

    config.model.path = PathBuf::new();
    assert!(config.validate().is_err());

    config.model.url = Some("not a url".to_string());
    assert!(config.validate().is_err());

    config.model.url = Some("https://example.org/models/fr-en.json".to_string());
    assert!(config.validate().is_ok());

    config.model.sha256 = Some("abc".to_string());
    assert!(config.validate().is_err());

    config.model.sha256 = Some("a".repeat(64));
    assert!(config.validate().is_ok());

    config.model.backend = ModelBackend::Ollama;
    config.model.endpoint = "localhost without scheme".to_string();
    assert!(config.validate().is_err());

    config.model.endpoint = "http://127.0.0.1:11434".to_string();
    config.model.model_name = String::new();
    assert!(config.validate().is_err());

    config.model.backend = ModelBackend::Mock;
    assert!(config.validate().is_ok());
}

/// Test load_or_create writes a default file on first use
#[test]
fn test_load_or_create_withMissingFile_shouldWriteDefaults() -> anyhow::Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("conf.json");

    let config = Config::load_or_create(&path)?;
    assert!(path.exists());
    assert_eq!(config.source_language, "fr");

    let content = std::fs::read_to_string(&path)?;
    assert!(content.contains("\"backend\": \"phrasebook\""));
    assert!(content.contains("\"log_level\": \"info\""));

    Ok(())
}

/// Test saved configuration is read back unchanged
#[test]
fn test_save_and_load_withCustomValues_shouldPreserveThem() -> anyhow::Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("custom.json");

    let mut config = Config::default();
    config.beam_width = 5;
    config.concurrent_requests = 2;
    config.log_level = LogLevel::Debug;
    config.model.backend = ModelBackend::Ollama;
    config.model.model_name = "mistral".to_string();
    config.save(&path)?;

    let loaded = Config::load_or_create(&path)?;
    assert_eq!(loaded.beam_width, 5);
    assert_eq!(loaded.concurrent_requests, 2);
    assert_eq!(loaded.log_level, LogLevel::Debug);
    assert_eq!(loaded.model.backend, ModelBackend::Ollama);
    assert_eq!(loaded.model.model_name, "mistral");

    Ok(())
}

/// Test loading a malformed file reports an error
#[test]
fn test_load_withInvalidJson_shouldFail() -> anyhow::Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "broken.json", "{ not json")?;

    assert!(Config::load(&path).is_err());
    Ok(())
}

/// Test partial model sections fall back to defaults
#[test]
fn test_deserialize_withPartialModelSection_shouldFillDefaults() {
    let config: Config = serde_json::from_str(
        r#"{"target_language": "en", "model": {"backend": "mock"}, "log_level": "warn"}"#,
    )
    .unwrap();

    assert_eq!(config.model.backend, ModelBackend::Mock);
    assert_eq!(config.model.timeout_secs, 60);
    assert_eq!(config.log_level, LogLevel::Warn);
    assert_eq!(config.source_language, "fr");
}

/// Test backend names
#[test]
fn test_modelBackend_displayAndParse_shouldBeConsistent() {
    for backend in [ModelBackend::Phrasebook, ModelBackend::Ollama, ModelBackend::Mock] {
        let parsed: ModelBackend = backend.to_string().parse().unwrap();
        assert_eq!(parsed, backend);
    }
    assert_eq!(ModelBackend::Ollama.display_name(), "Ollama");
    assert_eq!(ModelBackend::Mock.to_lowercase_string(), "mock");
}

/// Test log level conversion to the log crate filter
#[test]
fn test_logLevel_intoLevelFilter_shouldMapEachLevel() {
    assert_eq!(log::LevelFilter::from(LogLevel::Error), log::LevelFilter::Error);
    assert_eq!(log::LevelFilter::from(LogLevel::Warn), log::LevelFilter::Warn);
    assert_eq!(log::LevelFilter::from(LogLevel::Info), log::LevelFilter::Info);
    assert_eq!(log::LevelFilter::from(LogLevel::Debug), log::LevelFilter::Debug);
    assert_eq!(log::LevelFilter::from(LogLevel::Trace), log::LevelFilter::Trace);
}

/// Test system prompt placeholders
#[test]
fn test_renderSystemPrompt_withCustomTemplate_shouldReplaceAllPlaceholders() {
    let model = ModelConfig {
        system_prompt: "{source_language}>{target_language}>{source_language}".to_string(),
        ..ModelConfig::default()
    };
    assert_eq!(model.render_system_prompt("French", "English"), "French>English>French");
}
