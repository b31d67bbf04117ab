/*!
 * Translator implementations backing the translation service.
 *
 * This module contains the translator backends:
 * - Phrasebook: serialized model file loaded from disk
 * - Ollama: local LLM server
 * - Mock: deterministic test double
 */

use async_trait::async_trait;
use std::fmt::Debug;
use std::sync::Arc;

use crate::errors::TranslatorError;

/// Common trait for all translation models
///
/// This trait defines the interface that all translator implementations must follow,
/// allowing them to be used interchangeably in the translation service.
#[async_trait]
pub trait Translator: Send + Sync + Debug {
    /// Translate one sentence
    ///
    /// # Arguments
    /// * `sentence` - The sentence to translate
    /// * `beam_width` - Number of hypotheses the model may keep while decoding
    ///
    /// # Returns
    /// * `Result<Vec<String>, TranslatorError>` - Candidate translations, best first
    async fn predict(&self, sentence: &str, beam_width: usize) -> Result<Vec<String>, TranslatorError>;

    /// Human readable name for logs and progress messages
    fn name(&self) -> String;
}

/// Translator handle shared across requests
pub type SharedTranslator = Arc<dyn Translator>;

pub mod mock;
pub mod ollama;
pub mod phrasebook;
