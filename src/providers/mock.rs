/*!
 * Mock translator for tests and offline demos.
 *
 * This module provides a translator that simulates different behaviors:
 * - `MockTranslator::working()` - Always succeeds, tagging the sentence
 * - `MockTranslator::intermittent(n)` - Fails every nth call
 * - `MockTranslator::failing()` - Always fails with an error
 */

use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::errors::TranslatorError;
use crate::providers::Translator;

/// Behavior mode for the mock translator
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MockBehavior {
    /// Always succeeds with `beam_width` tagged candidates
    Working,
    /// Succeeds but sprinkles control characters into the output
    Noisy,
    /// Fails intermittently (every Nth request)
    Intermittent { fail_every: usize },
    /// Always fails with an error
    Failing,
    /// Returns an empty candidate list
    Empty,
    /// Simulates slow inference (for progress and cancellation testing)
    Slow { delay_ms: u64 },
}

/// Mock translator recording every sentence it receives
#[derive(Debug)]
pub struct MockTranslator {
    /// Behavior mode
    behavior: MockBehavior,
    /// Tag prepended to every translation
    tag: String,
    /// Request counter for intermittent failures
    request_count: Arc<AtomicUsize>,
    /// Sentences received, in call order
    calls: Arc<Mutex<Vec<String>>>,
    /// Custom response generator (optional)
    custom_response: Option<fn(&str) -> String>,
}

impl MockTranslator {
    /// Create a new mock translator with the specified behavior
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            tag: "EN".to_string(),
            request_count: Arc::new(AtomicUsize::new(0)),
            calls: Arc::new(Mutex::new(Vec::new())),
            custom_response: None,
        }
    }

    /// Create a working mock translator that always succeeds
    pub fn working() -> Self {
        Self::new(MockBehavior::Working)
    }

    /// Create a mock that returns control characters in its output
    pub fn noisy() -> Self {
        Self::new(MockBehavior::Noisy)
    }

    /// Create an intermittently failing mock translator
    pub fn intermittent(fail_every: usize) -> Self {
        Self::new(MockBehavior::Intermittent { fail_every })
    }

    /// Create a failing mock translator that always errors
    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    /// Create a mock that returns no candidates
    pub fn empty() -> Self {
        Self::new(MockBehavior::Empty)
    }

    /// Create a mock that waits before answering
    pub fn slow(delay_ms: u64) -> Self {
        Self::new(MockBehavior::Slow { delay_ms })
    }

    /// Set the tag used in generated translations
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    /// Set a custom response generator
    pub fn with_custom_response(mut self, generator: fn(&str) -> String) -> Self {
        self.custom_response = Some(generator);
        self
    }

    /// Sentences received so far, in call order
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    /// Number of predictions requested so far
    pub fn call_count(&self) -> usize {
        self.request_count.load(Ordering::SeqCst)
    }

    fn translate(&self, sentence: &str) -> String {
        match self.custom_response {
            Some(generator) => generator(sentence),
            None => format!("[{}] {}", self.tag, sentence),
        }
    }

    fn candidates(&self, sentence: &str, beam_width: usize) -> Vec<String> {
        let best = self.translate(sentence);
        let mut candidates = Vec::with_capacity(beam_width.max(1));
        candidates.push(best.clone());
        for rank in 2..=beam_width {
            candidates.push(format!("{} (#{})", best, rank));
        }
        candidates
    }
}

impl Clone for MockTranslator {
    fn clone(&self) -> Self {
        Self {
            behavior: self.behavior,
            tag: self.tag.clone(),
            request_count: Arc::clone(&self.request_count),
            calls: Arc::clone(&self.calls),
            custom_response: self.custom_response,
        }
    }
}

#[async_trait]
impl Translator for MockTranslator {
    async fn predict(&self, sentence: &str, beam_width: usize) -> Result<Vec<String>, TranslatorError> {
        let count = self.request_count.fetch_add(1, Ordering::SeqCst);
        self.calls.lock().push(sentence.to_string());

        match self.behavior {
            MockBehavior::Working => Ok(self.candidates(sentence, beam_width)),

            MockBehavior::Noisy => {
                let noisy = format!("\x02{}\x00\u{200B}", self.translate(sentence));
                Ok(vec![noisy])
            }

            MockBehavior::Intermittent { fail_every } => {
                // Zero behaves like one: every request fails
                let fail_every = fail_every.max(1);
                if count % fail_every == fail_every - 1 {
                    Err(TranslatorError::ApiError {
                        message: format!("Simulated intermittent failure (request #{})", count + 1),
                        status_code: 503,
                    })
                } else {
                    Ok(self.candidates(sentence, beam_width))
                }
            }

            MockBehavior::Failing => Err(TranslatorError::ApiError {
                message: "Simulated translator failure".to_string(),
                status_code: 500,
            }),

            MockBehavior::Empty => Ok(Vec::new()),

            MockBehavior::Slow { delay_ms } => {
                tokio::time::sleep(tokio::time::Duration::from_millis(delay_ms)).await;
                Ok(self.candidates(sentence, beam_width))
            }
        }
    }

    fn name(&self) -> String {
        format!("mock ({:?})", self.behavior)
    }
}
