use async_trait::async_trait;
use log::{debug, error};
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

use crate::app_config::ModelConfig;
use crate::errors::TranslatorError;
use crate::providers::Translator;

/// Label some models put in front of their answer ("Translation: ...")
static ANSWER_LABEL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\s*(translation|english|traduction)\s*:\s*").unwrap()
});

/// Ollama client translating one sentence per generate call
#[derive(Debug)]
pub struct Ollama {
    /// Base URL of the Ollama API
    base_url: String,
    /// HTTP client for making requests
    client: Client,
    /// Model name to use for generation
    model: String,
    /// System prompt naming the language pair
    system_prompt: String,
    /// Sampling temperature
    temperature: f32,
}

/// Generate request for the Ollama API
#[derive(Debug, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// Model name to use for generation
    model: String,
    /// Prompt to generate from
    prompt: String,
    /// System message to guide the model
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    /// Additional model parameters
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<GenerationOptions>,
    /// Whether to stream the response
    #[serde(skip_serializing_if = "Option::is_none")]
    stream: Option<bool>,
}

/// Generation options for the Ollama API
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct GenerationOptions {
    /// Temperature for generation (default: 0.8)
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    /// Maximum number of tokens to generate
    #[serde(skip_serializing_if = "Option::is_none")]
    num_predict: Option<u32>,
}

/// Generation response from the Ollama API
#[derive(Debug, Serialize, Deserialize)]
pub struct GenerationResponse {
    /// Model name
    #[serde(default)]
    pub model: String,
    /// Generated text
    pub response: String,
    /// Whether the generation is complete
    #[serde(default)]
    pub done: bool,
    /// Number of prompt tokens
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt_eval_count: Option<u64>,
    /// Number of generated tokens
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eval_count: Option<u64>,
}

impl GenerationRequest {
    /// Create a new non-streaming generation request
    pub fn new(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
            system: None,
            options: None,
            stream: Some(false),
        }
    }

    /// Set the system prompt
    pub fn system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    /// Set the temperature
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.options.get_or_insert_with(GenerationOptions::default).temperature = Some(temperature);
        self
    }

    /// Cap the number of generated tokens
    pub fn max_tokens(mut self, num_predict: u32) -> Self {
        self.options.get_or_insert_with(GenerationOptions::default).num_predict = Some(num_predict);
        self
    }

    /// Prompt text
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    /// System prompt, if any
    pub fn system_prompt(&self) -> Option<&str> {
        self.system.as_deref()
    }
}

impl Ollama {
    /// Create a client for the configured endpoint and language pair
    ///
    /// `source_language` and `target_language` are language names
    /// substituted into the configured system prompt.
    pub fn from_config(
        config: &ModelConfig,
        source_language: &str,
        target_language: &str,
    ) -> Result<Self, TranslatorError> {
        let endpoint = Url::parse(&config.endpoint)
            .map_err(|e| TranslatorError::ConnectionError(format!("Invalid endpoint '{}': {}", config.endpoint, e)))?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            // Ollama uses HTTP/1.1
            .http1_only()
            .pool_idle_timeout(Duration::from_secs(90))
            .build()
            .map_err(|e| TranslatorError::ConnectionError(e.to_string()))?;

        Ok(Self {
            base_url: endpoint.as_str().trim_end_matches('/').to_string(),
            client,
            model: config.model_name.clone(),
            system_prompt: config.render_system_prompt(source_language, target_language),
            temperature: config.temperature,
        })
    }

    /// Base URL requests are sent to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build the request translating one sentence
    pub fn build_request(&self, sentence: &str) -> GenerationRequest {
        // Leave room for the translation to be somewhat longer than the source
        let budget = (sentence.chars().count() as u32).saturating_mul(2).max(64);

        GenerationRequest::new(&self.model, sentence)
            .system(&self.system_prompt)
            .temperature(self.temperature)
            .max_tokens(budget)
    }

    /// Generate text from the Ollama API
    pub async fn generate(&self, request: GenerationRequest) -> Result<GenerationResponse, TranslatorError> {
        let url = format!("{}/api/generate", self.base_url);

        let response = self.client.post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() || e.is_timeout() {
                    TranslatorError::ConnectionError(e.to_string())
                } else {
                    TranslatorError::RequestFailed(e.to_string())
                }
            })?;

        let status = response.status();
        let response_text = response.text().await
            .map_err(|e| TranslatorError::RequestFailed(format!("Failed to read Ollama response: {}", e)))?;

        if !status.is_success() {
            return Err(TranslatorError::ApiError {
                status_code: status.as_u16(),
                message: response_text,
            });
        }

        parse_generation_response(&response_text)
    }

    /// Get the Ollama API version
    pub async fn version(&self) -> Result<String, TranslatorError> {
        let url = format!("{}/api/version", self.base_url);
        let response: serde_json::Value = self.client.get(&url)
            .send()
            .await
            .map_err(|e| TranslatorError::ConnectionError(format!("Failed to connect to Ollama: {}", e)))?
            .json()
            .await
            .map_err(|e| TranslatorError::ParseError(format!("Failed to parse Ollama version response: {}", e)))?;

        response["version"].as_str()
            .map(str::to_string)
            .ok_or_else(|| TranslatorError::ParseError("Invalid version format in response".to_string()))
    }
}

/// Parse a generate response, accepting both a single JSON object and a
/// JSONL stream of partial responses
pub fn parse_generation_response(response_text: &str) -> Result<GenerationResponse, TranslatorError> {
    if let Ok(response) = serde_json::from_str::<GenerationResponse>(response_text) {
        return Ok(response);
    }

    let parts: Vec<GenerationResponse> = response_text
        .lines()
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| serde_json::from_str::<GenerationResponse>(line).ok())
        .collect();

    if parts.is_empty() {
        error!(
            "Failed to parse Ollama API response. Raw response (first 500 chars): {}",
            response_text.chars().take(500).collect::<String>()
        );
        return Err(TranslatorError::ParseError("Unrecognized Ollama response".to_string()));
    }

    let response = parts.iter().map(|part| part.response.as_str()).collect::<String>();
    let last = &parts[parts.len() - 1];

    Ok(GenerationResponse {
        model: last.model.clone(),
        response,
        done: last.done,
        prompt_eval_count: last.prompt_eval_count,
        eval_count: last.eval_count,
    })
}

/// Strip labels and wrapping quotes LLMs tend to add around a translation
pub fn clean_completion(text: &str) -> String {
    let unlabeled = ANSWER_LABEL_REGEX.replace(text.trim(), "");
    let trimmed = unlabeled.trim();

    let unquoted = trimmed
        .strip_prefix('"')
        .and_then(|t| t.strip_suffix('"'))
        .unwrap_or(trimmed);

    unquoted.trim().to_string()
}

#[async_trait]
impl Translator for Ollama {
    async fn predict(&self, sentence: &str, beam_width: usize) -> Result<Vec<String>, TranslatorError> {
        if beam_width > 1 {
            debug!("Ollama backend returns a single candidate, ignoring beam width {}", beam_width);
        }

        let response = self.generate(self.build_request(sentence)).await?;
        Ok(vec![clean_completion(&response.response)])
    }

    fn name(&self) -> String {
        format!("ollama:{}", self.model)
    }
}
