/*!
 * # yaltwai - Yet Another Lyrics Transcriber with AI
 *
 * A Rust library for transcribing audio files to synchronized LRC lyrics
 * using a hosted generative AI model.
 *
 * ## Features
 *
 * - Transcribe audio files (mp3, wav, flac, ...) to timestamped LRC text
 * - Permissive LRC parsing with lossless re-serialization
 * - Bounded exponential-backoff retry on provider rate limits
 * - Batch processing of whole directories
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `lyric_processor`: LRC parsing and serialization
 * - `transcription`: AI-powered transcription service:
 *   - `transcription::core`: Request model, retry loop, service
 *   - `transcription::formatting`: Model output cleanup
 * - `file_utils`: File system operations and audio detection
 * - `app_controller`: Main application controller
 * - `providers`: Client implementations for model endpoints:
 *   - `providers::gemini`: Gemini generateContent client
 *   - `providers::mock`: Scripted mock for tests
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
pub mod file_utils;
pub mod lyric_processor;
pub mod transcription;
pub mod app_controller;
pub mod providers;
pub mod errors;

// Re-export main types for easier usage
pub use app_config::Config;
pub use lyric_processor::{LyricDocument, LyricLine};
pub use transcription::{TranscriptionRequest, TranscriptionService};
pub use errors::{AppError, ProviderError, LyricError, TranscriptionError};
