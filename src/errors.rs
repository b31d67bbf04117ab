/*!
 * Error types for the traduire application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

use thiserror::Error;

/// Errors that can occur when asking a translator for predictions
#[derive(Error, Debug)]
pub enum TranslatorError {
    /// Error when making a request to a model server fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing a model server response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Error returned by the model server itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String,
    },

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// The loaded model cannot serve the request
    #[error("Invalid model: {0}")]
    InvalidModel(String),
}

/// Errors that can occur while acquiring or loading a model
#[derive(Error, Debug)]
pub enum ModelError {
    /// No model file at the configured location and nowhere to fetch one from
    #[error("Model file not found: {0}")]
    NotFound(String),

    /// Downloading the model file failed
    #[error("Model download failed: {0}")]
    Download(String),

    /// The downloaded file does not match the configured checksum
    #[error("Model checksum mismatch: expected {expected}, got {actual}")]
    ChecksumMismatch {
        /// Configured SHA-256 digest
        expected: String,
        /// Digest of the downloaded bytes
        actual: String,
    },

    /// File system error while reading or caching the model
    #[error("Model I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The model file could not be deserialized
    #[error("Failed to parse model file: {0}")]
    Parse(String),

    /// The model translates a different language pair than configured
    #[error("Model translates {model_pair}, but {configured_pair} is configured")]
    LanguageMismatch {
        /// Pair declared by the model file, e.g. `fr → en`
        model_pair: String,
        /// Pair from the configuration
        configured_pair: String,
    },

    /// The backend was built but failed its readiness check
    #[error("Translator unavailable: {0}")]
    Unavailable(#[from] TranslatorError),
}

/// Errors that can occur during a translation request
#[derive(Error, Debug)]
pub enum TranslationError {
    /// Error from the translator
    #[error("Translator error: {0}")]
    Translator(#[from] TranslatorError),

    /// Input exceeds the configured character limit
    #[error("Input too long: {length} characters (maximum {max})")]
    InputTooLong {
        /// Character count of the input
        length: usize,
        /// Configured maximum
        max: usize,
    },

    /// The request was cancelled between two sentences
    #[error("Translation cancelled after {completed} of {total} sentences")]
    Cancelled {
        /// Sentences translated before cancellation
        completed: usize,
        /// Sentences in the request
        total: usize,
    },
}
