/*!
 * Core transcription service implementation.
 *
 * This module contains the TranscriptionService struct, which turns one
 * audio payload into raw LRC text through a provider, retrying on rate
 * limits with bounded exponential backoff.
 */

use std::time::Duration;
use log::{debug, warn};
use rand::Rng;

use crate::errors::{ProviderError, TranscriptionError};
use crate::providers::Provider;
use super::formatting::ResponseCleaner;

/// Default bound on total attempts per transcription call
pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;

/// Default base for the exponential backoff, in milliseconds
pub const DEFAULT_BACKOFF_BASE_MS: u64 = 1000;

/// Fixed instruction constraining the model to bare LRC output
const LRC_SYSTEM_INSTRUCTION: &str = "You are a lyric transcription engine. \
Listen to the provided audio and transcribe the sung lyrics in LRC format. \
Every line must begin with a timestamp tag of the form [mm:ss.xx] marking \
when that line starts, and lines must appear in chronological order. Emit a \
tag with no text after it to mark an instrumental pause. Output only the raw \
LRC text: no markdown fences, no commentary, no conversational wrapper.";

/// Short user-turn prompt accompanying the audio part
const TRANSCRIBE_PROMPT: &str = "Transcribe this audio to LRC.";

/// One transcription request: the audio payload and its encoding
#[derive(Debug, Clone)]
pub struct TranscriptionRequest {
    /// Base64-encoded audio bytes
    pub audio_base64: String,

    /// MIME type of the audio, e.g. "audio/mpeg"
    pub mime_type: String,

    /// System instruction; filled with the fixed LRC instruction by the service
    pub system_instruction: Option<String>,

    /// User-turn prompt sent alongside the audio
    pub prompt: Option<String>,
}

impl TranscriptionRequest {
    /// Create a new request for a base64 audio payload
    pub fn new(audio_base64: impl Into<String>, mime_type: impl Into<String>) -> Self {
        Self {
            audio_base64: audio_base64.into(),
            mime_type: mime_type.into(),
            system_instruction: None,
            prompt: None,
        }
    }

    /// Set the system instruction
    pub fn system(mut self, system: impl Into<String>) -> Self {
        self.system_instruction = Some(system.into());
        self
    }

    /// Set the user-turn prompt
    pub fn prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = Some(prompt.into());
        self
    }
}

/// Transcription service over a provider.
///
/// Stateless across calls: each `transcribe` invocation is an independent
/// sequential attempt loop with no shared mutable state, so a service can be
/// shared freely between independent requests.
#[derive(Debug)]
pub struct TranscriptionService<P> {
    /// Provider used to reach the model endpoint
    provider: P,

    /// Bound on total attempts, counting the first one
    max_attempts: u32,

    /// Base delay for the exponential backoff in milliseconds
    backoff_base_ms: u64,
}

impl<P> TranscriptionService<P>
where
    P: Provider<Request = TranscriptionRequest>,
{
    /// Create a service with the default retry policy
    pub fn new(provider: P) -> Self {
        Self::with_retry_policy(provider, DEFAULT_MAX_ATTEMPTS, DEFAULT_BACKOFF_BASE_MS)
    }

    /// Create a service with an explicit retry policy
    pub fn with_retry_policy(provider: P, max_attempts: u32, backoff_base_ms: u64) -> Self {
        Self {
            provider,
            max_attempts: max_attempts.max(1),
            backoff_base_ms,
        }
    }

    /// Transcribe one audio payload to raw LRC text.
    ///
    /// Rate-limit responses are retried up to the attempt bound, sleeping
    /// `backoff_base_ms * 2^attempt` plus jitter between attempts. Any other
    /// provider failure propagates immediately. A response with no usable
    /// text after cleanup fails with `ProviderError::EmptyResponse` so
    /// callers can tell "no content" apart from a transient outage.
    pub async fn transcribe(&self, request: &TranscriptionRequest) -> Result<String, TranscriptionError> {
        let mut request = request.clone();
        if request.system_instruction.is_none() {
            request.system_instruction = Some(LRC_SYSTEM_INSTRUCTION.to_string());
        }
        if request.prompt.is_none() {
            request.prompt = Some(TRANSCRIBE_PROMPT.to_string());
        }

        let mut attempt: u32 = 0;
        loop {
            match self.provider.complete(request.clone()).await {
                Ok(response) => {
                    let text = P::extract_text(&response);
                    let cleaned = ResponseCleaner::clean(&text);
                    if cleaned.is_empty() {
                        return Err(ProviderError::EmptyResponse.into());
                    }
                    debug!("Transcription succeeded on attempt {}/{}", attempt + 1, self.max_attempts);
                    return Ok(cleaned);
                }
                Err(e) if e.is_retryable() => {
                    attempt += 1;
                    if attempt >= self.max_attempts {
                        warn!("Rate limited on all {} attempts, giving up", self.max_attempts);
                        return Err(ProviderError::RetryExhausted { attempts: self.max_attempts }.into());
                    }

                    let delay = self.backoff_delay(attempt - 1);
                    warn!(
                        "Rate limited by provider, waiting {:?} before attempt {}/{}",
                        delay,
                        attempt + 1,
                        self.max_attempts
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// Delay before the retry following the given 0-indexed failed attempt
    fn backoff_delay(&self, attempt: u32) -> Duration {
        let exponential = self.backoff_base_ms.saturating_mul(1u64 << attempt.min(16));
        let jitter = rand::rng().random_range(0..=self.backoff_base_ms.max(1));
        Duration::from_millis(exponential.saturating_add(jitter))
    }

    /// Check that the provider endpoint is reachable
    pub async fn test_connection(&self) -> Result<(), TranscriptionError> {
        self.provider.test_connection().await?;
        Ok(())
    }
}
