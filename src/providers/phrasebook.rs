/*!
 * Phrasebook translator backed by a serialized model file.
 *
 * The model file is JSON with ranked sentence-level candidates and a word
 * lexicon. Known sentences return their stored candidates; anything else is
 * translated word by word, passing unknown words through unchanged.
 */

use async_trait::async_trait;
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use crate::errors::{ModelError, TranslatorError};
use crate::providers::Translator;
use crate::translation::segmenter::capitalize_first;

/// Words (with a trailing elision apostrophe when present) or single punctuation marks
static TOKEN_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\w+['’]|\w+|[^\w\s]").unwrap()
});

/// Punctuation that attaches to the preceding word
const CLOSING_PUNCTUATION: &[&str] = &[".", ",", ";", ":", "!", "?", ")", "»", "…"];

/// On-disk model format
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PhrasebookModel {
    /// Display name of the model
    #[serde(default)]
    pub name: String,

    /// Language the model translates from (ISO code)
    pub source_language: String,

    /// Language the model translates into (ISO code)
    pub target_language: String,

    /// Whole-sentence translations, best candidate first
    #[serde(default)]
    pub sentences: HashMap<String, Vec<String>>,

    /// Word-level lexicon used when no sentence matches
    #[serde(default)]
    pub lexicon: HashMap<String, String>,
}

/// Translator serving a loaded phrasebook model
#[derive(Debug, Clone)]
pub struct Phrasebook {
    name: String,
    source_language: String,
    target_language: String,
    sentences: HashMap<String, Vec<String>>,
    lexicon: HashMap<String, String>,
}

impl Phrasebook {
    /// Load a phrasebook from a model file
    pub fn from_file(path: &Path) -> Result<Self, ModelError> {
        if !path.exists() {
            return Err(ModelError::NotFound(path.display().to_string()));
        }

        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Load a phrasebook from JSON text
    pub fn from_json(json: &str) -> Result<Self, ModelError> {
        let model: PhrasebookModel = serde_json::from_str(json)
            .map_err(|e| ModelError::Parse(e.to_string()))?;
        Self::from_model(model)
    }

    /// Build a phrasebook from a deserialized model, normalizing its keys
    pub fn from_model(model: PhrasebookModel) -> Result<Self, ModelError> {
        if model.sentences.is_empty() && model.lexicon.is_empty() {
            return Err(ModelError::Parse("model contains no sentences and no lexicon entries".to_string()));
        }

        let sentences = model
            .sentences
            .into_iter()
            .filter(|(_, candidates)| !candidates.is_empty())
            .map(|(source, candidates)| (normalize_key(&source), candidates))
            .collect();

        let lexicon = model
            .lexicon
            .into_iter()
            .map(|(word, translation)| (normalize_key(&word), translation))
            .collect();

        Ok(Self {
            name: if model.name.is_empty() { "phrasebook".to_string() } else { model.name },
            source_language: model.source_language,
            target_language: model.target_language,
            sentences,
            lexicon,
        })
    }

    /// Language the model translates from
    pub fn source_language(&self) -> &str {
        &self.source_language
    }

    /// Language the model translates into
    pub fn target_language(&self) -> &str {
        &self.target_language
    }

    /// Number of stored sentences
    pub fn sentence_count(&self) -> usize {
        self.sentences.len()
    }

    /// Number of lexicon entries
    pub fn lexicon_size(&self) -> usize {
        self.lexicon.len()
    }

    /// Word-by-word translation of a sentence
    fn translate_words(&self, sentence: &str) -> String {
        let mut output = String::with_capacity(sentence.len());

        for token in TOKEN_REGEX.find_iter(sentence).map(|m| m.as_str()) {
            let translated = self
                .lexicon
                .get(&normalize_key(token))
                .map(String::as_str)
                .unwrap_or(token);

            if translated.is_empty() {
                continue;
            }

            let attaches = CLOSING_PUNCTUATION.contains(&translated)
                || output.ends_with(['(', '«', '\'', '’']);
            if !output.is_empty() && !attaches {
                output.push(' ');
            }
            output.push_str(translated);
        }

        capitalize_first(&output)
    }
}

#[async_trait]
impl Translator for Phrasebook {
    async fn predict(&self, sentence: &str, beam_width: usize) -> Result<Vec<String>, TranslatorError> {
        if let Some(candidates) = self.sentences.get(&normalize_key(sentence)) {
            debug!("Phrasebook hit for '{}'", sentence);
            return Ok(candidates.iter().take(beam_width.max(1)).cloned().collect());
        }

        if self.lexicon.is_empty() {
            return Err(TranslatorError::InvalidModel(format!(
                "'{}' has no entry for this sentence and no lexicon",
                self.name
            )));
        }

        Ok(vec![self.translate_words(sentence)])
    }

    fn name(&self) -> String {
        format!("{} ({} → {})", self.name, self.source_language, self.target_language)
    }
}

fn normalize_key(text: &str) -> String {
    text.trim().to_lowercase().replace('’', "'")
}
