/*!
 * Core translation service implementation.
 *
 * This module contains the TranslationService struct, which runs one
 * request through the pipeline: segment the input, ask the translator for
 * each sentence, then sanitize and reassemble the results.
 */

use futures::stream::{self, StreamExt, TryStreamExt};
use log::{debug, error, warn};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use crate::app_config::Config;
use crate::errors::TranslationError;
use crate::providers::SharedTranslator;
use super::reassembler::reassemble;
use super::segmenter::{Segmentation, Segmenter};

/// Per-request settings for the translation service
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TranslationOptions {
    /// Beam width passed to the translator
    pub beam_width: usize,

    /// Maximum number of characters accepted in one request
    pub max_input_chars: usize,

    /// Number of sentences translated concurrently (1 = sequential)
    pub concurrent_requests: usize,
}

impl Default for TranslationOptions {
    fn default() -> Self {
        Self {
            beam_width: 3,
            max_input_chars: 10_000,
            concurrent_requests: 1,
        }
    }
}

impl From<&Config> for TranslationOptions {
    fn from(config: &Config) -> Self {
        Self {
            beam_width: config.beam_width,
            max_input_chars: config.max_input_chars,
            concurrent_requests: config.concurrent_requests,
        }
    }
}

/// Flag a host can raise to stop a request between two sentences
#[derive(Debug, Clone, Default)]
pub struct CancellationFlag(Arc<AtomicBool>);

impl CancellationFlag {
    /// Create a flag that is not raised
    pub fn new() -> Self {
        Self::default()
    }

    /// Raise the flag
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Whether the flag has been raised
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Result of one translation request
#[derive(Debug, Clone, Default)]
pub struct TranslationOutput {
    /// Reassembled output text
    pub text: String,

    /// Sentence units sent to the translator
    pub sentences: Vec<String>,

    /// Raw top candidate for each sentence unit, before sanitizing
    pub translations: Vec<String>,

    /// Separators captured during segmentation
    pub separators: Vec<String>,

    /// Wall time spent on the request
    pub duration: Duration,
}

/// Translation service turning free-form text into translated text
#[derive(Debug, Clone)]
pub struct TranslationService {
    /// Model answering per-sentence predictions
    translator: SharedTranslator,

    /// Sentence splitter
    segmenter: Segmenter,

    /// Request settings
    pub options: TranslationOptions,
}

impl TranslationService {
    /// Create a new translation service
    pub fn new(translator: SharedTranslator, options: TranslationOptions) -> Self {
        Self {
            translator,
            segmenter: Segmenter::new(),
            options,
        }
    }

    /// Create a translation service using the request settings of `config`
    pub fn from_config(translator: SharedTranslator, config: &Config) -> Self {
        Self::new(translator, TranslationOptions::from(config))
    }

    /// Replace the segmenter
    pub fn with_segmenter(mut self, segmenter: Segmenter) -> Self {
        self.segmenter = segmenter;
        self
    }

    /// Name of the translator in use
    pub fn translator_name(&self) -> String {
        self.translator.name()
    }

    /// Segment text without translating it
    pub fn segment(&self, text: &str) -> Segmentation {
        self.segmenter.segment(text)
    }

    /// Translate a block of text
    pub async fn translate(&self, text: &str) -> Result<String, TranslationError> {
        let output = self.translate_with_progress(text, |_, _| {}, None).await?;
        Ok(output.text)
    }

    /// Translate a block of text, reporting progress after each sentence.
    ///
    /// `progress` receives `(completed, total)`. When `cancel` is raised no
    /// further sentence is sent to the translator and the request fails with
    /// `TranslationError::Cancelled`.
    pub async fn translate_with_progress<F>(
        &self,
        text: &str,
        progress: F,
        cancel: Option<&CancellationFlag>,
    ) -> Result<TranslationOutput, TranslationError>
    where
        F: Fn(usize, usize) + Sync,
    {
        let start_time = Instant::now();

        let length = text.chars().count();
        if length > self.options.max_input_chars {
            return Err(TranslationError::InputTooLong {
                length,
                max: self.options.max_input_chars,
            });
        }

        let Segmentation { sentences, separators } = self.segmenter.segment(text);
        let total = sentences.len();
        debug!("Translating {} sentence(s) with {}", total, self.translator.name());

        let translations = if self.options.concurrent_requests <= 1 {
            self.translate_sequential(&sentences, &progress, cancel).await?
        } else {
            self.translate_concurrent(&sentences, &progress, cancel).await?
        };

        let output = reassemble(&translations, &separators);

        Ok(TranslationOutput {
            text: output,
            sentences,
            translations,
            separators,
            duration: start_time.elapsed(),
        })
    }

    async fn translate_sequential<F>(
        &self,
        sentences: &[String],
        progress: &F,
        cancel: Option<&CancellationFlag>,
    ) -> Result<Vec<String>, TranslationError>
    where
        F: Fn(usize, usize) + Sync,
    {
        let total = sentences.len();
        let mut translations = Vec::with_capacity(total);

        for (index, sentence) in sentences.iter().enumerate() {
            if cancel.is_some_and(CancellationFlag::is_cancelled) {
                return Err(TranslationError::Cancelled { completed: index, total });
            }

            translations.push(self.translate_sentence(sentence).await?);
            progress(index + 1, total);
        }

        Ok(translations)
    }

    async fn translate_concurrent<F>(
        &self,
        sentences: &[String],
        progress: &F,
        cancel: Option<&CancellationFlag>,
    ) -> Result<Vec<String>, TranslationError>
    where
        F: Fn(usize, usize) + Sync,
    {
        let total = sentences.len();
        let completed = AtomicUsize::new(0);
        let completed = &completed;

        let mut results: Vec<(usize, String)> = stream::iter(sentences.iter().enumerate())
            .map(|(index, sentence)| async move {
                if cancel.is_some_and(CancellationFlag::is_cancelled) {
                    return Err(TranslationError::Cancelled {
                        completed: completed.load(Ordering::SeqCst),
                        total,
                    });
                }

                let translation = self.translate_sentence(sentence).await?;
                let current = completed.fetch_add(1, Ordering::SeqCst) + 1;
                progress(current, total);

                Ok((index, translation))
            })
            .buffer_unordered(self.options.concurrent_requests)
            .try_collect()
            .await?;

        // Completion order is arbitrary, reassembly needs input order
        results.sort_by_key(|(index, _)| *index);
        Ok(results.into_iter().map(|(_, translation)| translation).collect())
    }

    /// Translate a single sentence unit, keeping the top candidate.
    ///
    /// Empty units are not sent to the translator and translate to an empty
    /// string.
    pub async fn translate_sentence(&self, sentence: &str) -> Result<String, TranslationError> {
        if sentence.trim().is_empty() {
            return Ok(String::new());
        }

        let candidates = self
            .translator
            .predict(sentence, self.options.beam_width)
            .await
            .map_err(|e| {
                error!("Translator failed on '{}': {}", sentence, e);
                e
            })?;

        match candidates.into_iter().next() {
            Some(best) => {
                debug!("'{}' -> '{}'", sentence, best);
                Ok(best)
            }
            None => {
                warn!("Translator returned no candidate for '{}'", sentence);
                Ok(String::new())
            }
        }
    }
}
