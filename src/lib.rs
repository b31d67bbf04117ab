/*!
 * # traduire - sentence-by-sentence neural machine translation front-end
 *
 * Loads a French → English translation model once per process, splits
 * free-form text into sentences, translates each sentence and stitches the
 * results back together with the original spacing.
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `translation`: The segmentation / translation / reassembly pipeline:
 *   - `translation::segmenter`: Sentence boundary detection and normalization
 *   - `translation::reassembler`: Output sanitizing and reassembly
 *   - `translation::core`: Translation service
 * - `providers`: Translator backends (phrasebook model, Ollama, mock)
 * - `model_provider`: One-time model loading and caching
 * - `app_controller`: Glue between the command line host and the service
 * - `language_utils`: ISO language code utilities
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod errors;
pub mod language_utils;
pub mod model_provider;
pub mod providers;
pub mod translation;

// Re-export main types for easier usage
pub use app_config::Config;
pub use errors::{ModelError, TranslationError, TranslatorError};
pub use model_provider::{ModelProvider, shared_translator};
pub use providers::{SharedTranslator, Translator};
pub use translation::{reassemble, sanitize, segment, Segmentation, TranslationService};
