use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::path::{Path, PathBuf};
use url::Url;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Source language code (ISO)
    #[serde(default = "default_source_language")]
    pub source_language: String,

    /// Target language code (ISO)
    #[serde(default = "default_target_language")]
    pub target_language: String,

    /// Maximum number of characters accepted in one request
    #[serde(default = "default_max_input_chars")]
    pub max_input_chars: usize,

    /// Beam width passed to the translator
    #[serde(default = "default_beam_width")]
    pub beam_width: usize,

    /// Number of sentences translated concurrently (1 = sequential)
    #[serde(default = "default_concurrent_requests")]
    pub concurrent_requests: usize,

    /// Model config
    #[serde(default)]
    pub model: ModelConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Translator backend type
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ModelBackend {
    // @backend: Serialized phrasebook model loaded from disk
    #[default]
    Phrasebook,
    // @backend: Ollama (local LLM server)
    Ollama,
    // @backend: Deterministic mock, for demos and tests
    Mock,
}

impl ModelBackend {
    // @returns: Capitalized backend name
    pub fn display_name(&self) -> &str {
        match self {
            Self::Phrasebook => "Phrasebook",
            Self::Ollama => "Ollama",
            Self::Mock => "Mock",
        }
    }

    // @returns: Lowercase backend identifier
    pub fn to_lowercase_string(&self) -> String {
        match self {
            Self::Phrasebook => "phrasebook".to_string(),
            Self::Ollama => "ollama".to_string(),
            Self::Mock => "mock".to_string(),
        }
    }
}

// Implement Display trait for ModelBackend
impl std::fmt::Display for ModelBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_lowercase_string())
    }
}

// Implement FromStr trait for ModelBackend
impl std::str::FromStr for ModelBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "phrasebook" => Ok(Self::Phrasebook),
            "ollama" => Ok(Self::Ollama),
            "mock" => Ok(Self::Mock),
            _ => Err(anyhow!("Invalid model backend: {}", s)),
        }
    }
}

/// Model acquisition and backend settings
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ModelConfig {
    /// Backend used to build the translator
    #[serde(default)]
    pub backend: ModelBackend,

    /// Local model file (phrasebook backend)
    #[serde(default = "default_model_path")]
    pub path: PathBuf,

    /// Where to download the model file from when `path` does not exist
    #[serde(default)]
    pub url: Option<String>,

    /// Expected SHA-256 of the downloaded file, hex encoded
    #[serde(default)]
    pub sha256: Option<String>,

    /// Model name served by the backend (ollama backend)
    #[serde(default = "default_ollama_model")]
    pub model_name: String,

    /// Service URL (ollama backend)
    #[serde(default = "default_ollama_endpoint")]
    pub endpoint: String,

    /// Request and download timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// System prompt template for LLM backends
    /// Placeholders: {source_language}, {target_language}
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,

    /// Temperature parameter for LLM backends (0.0 to 1.0)
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            backend: ModelBackend::default(),
            path: default_model_path(),
            url: None,
            sha256: None,
            model_name: default_ollama_model(),
            endpoint: default_ollama_endpoint(),
            timeout_secs: default_timeout_secs(),
            system_prompt: default_system_prompt(),
            temperature: default_temperature(),
        }
    }
}

impl ModelConfig {
    /// Build the system prompt for a language pair
    pub fn render_system_prompt(&self, source_language: &str, target_language: &str) -> String {
        self.system_prompt
            .replace("{source_language}", source_language)
            .replace("{target_language}", target_language)
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_source_language() -> String {
    "fr".to_string()
}

fn default_target_language() -> String {
    "en".to_string()
}

fn default_max_input_chars() -> usize {
    10_000
}

fn default_beam_width() -> usize {
    3
}

fn default_concurrent_requests() -> usize {
    1
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_temperature() -> f32 {
    0.2
}

fn default_model_path() -> PathBuf {
    PathBuf::from("models/fr-en.phrasebook.json")
}

fn default_ollama_endpoint() -> String {
    "http://localhost:11434".to_string()
}

fn default_ollama_model() -> String {
    "llama3.2:3b".to_string()
}

fn default_system_prompt() -> String {
    "You are a professional translator. Translate the sentence you are given from {source_language} to {target_language}. Answer with the translation only.".to_string()
}

impl Config {
    /// Load a configuration file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to open config file: {}", path.display()))?;

        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Load a configuration file, writing the default one first if it is missing
    pub fn load_or_create(path: &Path) -> Result<Self> {
        if path.exists() {
            return Self::load(path);
        }

        log::warn!("Config file not found at '{}', creating default config.", path.display());
        let config = Self::default();
        config.save(path)?;
        Ok(config)
    }

    /// Save the configuration as pretty JSON
    pub fn save(&self, path: &Path) -> Result<()> {
        let config_json = serde_json::to_string_pretty(self)
            .context("Failed to serialize config to JSON")?;

        std::fs::write(path, config_json)
            .with_context(|| format!("Failed to write config to file: {}", path.display()))
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        // Validate languages
        let _source_name = crate::language_utils::get_language_name(&self.source_language)?;
        let _target_name = crate::language_utils::get_language_name(&self.target_language)?;

        if self.beam_width == 0 {
            return Err(anyhow!("Beam width must be at least 1"));
        }

        if self.max_input_chars == 0 {
            return Err(anyhow!("Maximum input length must be at least 1 character"));
        }

        if self.concurrent_requests == 0 {
            return Err(anyhow!("Concurrent requests must be at least 1"));
        }

        match self.model.backend {
            ModelBackend::Phrasebook => {
                if self.model.path.as_os_str().is_empty() && self.model.url.is_none() {
                    return Err(anyhow!("Phrasebook backend requires a model path or URL"));
                }
                if let Some(url) = &self.model.url {
                    Url::parse(url).with_context(|| format!("Invalid model URL: {}", url))?;
                }
                if let Some(digest) = &self.model.sha256 {
                    if digest.len() != 64 || !digest.chars().all(|c| c.is_ascii_hexdigit()) {
                        return Err(anyhow!("Model checksum must be a 64-character hex SHA-256 digest"));
                    }
                }
            }
            ModelBackend::Ollama => {
                Url::parse(&self.model.endpoint)
                    .with_context(|| format!("Invalid Ollama endpoint: {}", self.model.endpoint))?;
                if self.model.model_name.is_empty() {
                    return Err(anyhow!("Model name is required for Ollama backend"));
                }
            }
            ModelBackend::Mock => {}
        }

        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            source_language: default_source_language(),
            target_language: default_target_language(),
            max_input_chars: default_max_input_chars(),
            beam_width: default_beam_width(),
            concurrent_requests: default_concurrent_requests(),
            model: ModelConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}
