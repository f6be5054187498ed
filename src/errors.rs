/*!
 * Error types for the phrasereel application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

use thiserror::Error;

/// Errors that can occur while reading caption cues
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CueError {
    /// A timecode did not match `H:MM:SS,mmm`
    #[error("Invalid timecode: {0}")]
    InvalidTimecode(String),

    /// A caption block lacked the index, timecode or text lines
    #[error("Malformed caption block: {0}")]
    MalformedBlock(String),

    /// The end of a cue comes before its start
    #[error("Invalid time range: end {end} < start {start}")]
    InvertedRange {
        /// Start in seconds
        start: f64,
        /// End in seconds
        end: f64,
    },
}

/// Errors reported by a text measurement backend
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MeasureError {
    /// The requested font is not known to the backend
    #[error("Font not available: {0}")]
    FontUnavailable(String),

    /// Any other measurement failure
    #[error("Measurement failed: {0}")]
    Failed(String),
}

/// Errors that can occur during translation lookups
#[derive(Error, Debug)]
pub enum TranslationError {
    /// The translation source could not be loaded
    #[error("Failed to load translations: {0}")]
    LoadFailed(String),

    /// The translation source could not be parsed
    #[error("Failed to parse translations: {0}")]
    ParseError(String),

    /// The requested target language is not a valid code
    #[error("Unsupported target language: {0}")]
    UnsupportedLanguage(String),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from caption parsing
    #[error("Cue error: {0}")]
    Cue(#[from] CueError),

    /// Error from translation
    #[error("Translation error: {0}")]
    Translation(#[from] TranslationError),

    /// Error from configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
