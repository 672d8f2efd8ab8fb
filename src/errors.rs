/*!
 * Error types for the yaltwai application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

// Allow dead code - error types are for library consumers
#![allow(dead_code)]

use thiserror::Error;

/// Errors that can occur when talking to the transcription provider API
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Error when making an API request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an API response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Error returned by the API itself
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

    /// Error related to rate limiting
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// Error with authentication
    #[error("Authentication error: {0}")]
    AuthenticationError(String),

    /// The response was well-formed but carried no usable text
    #[error("Model returned an empty response")]
    EmptyResponse,

    /// Rate limiting persisted through every allowed attempt
    #[error("Rate limited on all {attempts} attempts, giving up")]
    RetryExhausted {
        /// Number of attempts that were made
        attempts: u32,
    },
}

impl ProviderError {
    /// Whether another attempt may succeed where this one failed
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::RateLimitExceeded(_))
    }
}

/// Errors that can occur during lyric processing
///
/// Intentionally empty: unparseable LRC lines are dropped, not errored.
#[derive(Error, Debug)]
pub enum LyricError {}

/// Errors that can occur during transcription
#[derive(Error, Debug)]
pub enum TranscriptionError {
    /// Error from the provider API
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Error with lyric processing
    #[error("Lyric error: {0}")]
    Lyric(#[from] LyricError),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from a provider
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Error from lyric processing
    #[error("Lyric error: {0}")]
    Lyric(#[from] LyricError),

    /// Error from transcription
    #[error("Transcription error: {0}")]
    Transcription(#[from] TranscriptionError),

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
