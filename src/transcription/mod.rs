/*!
 * AI-powered lyric transcription.
 *
 * The service in `core` owns the request prompt and the bounded retry loop;
 * `formatting` normalizes raw model output before it reaches the codec.
 */

pub mod core;
pub mod formatting;

pub use self::core::{TranscriptionRequest, TranscriptionService, DEFAULT_MAX_ATTEMPTS, DEFAULT_BACKOFF_BASE_MS};
pub use self::formatting::ResponseCleaner;
