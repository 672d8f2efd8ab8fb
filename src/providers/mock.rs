/*!
 * Mock provider implementations for testing.
 *
 * This module provides mock providers that simulate endpoint behaviors:
 * - `MockProvider::working()` - Always succeeds with LRC text
 * - `MockProvider::rate_limited_then_success(n)` - Rate-limits the first n requests
 * - `MockProvider::always_rate_limited()` - Rate-limits every request
 * - `MockProvider::failing()` - Always fails with a server error
 * - `MockProvider::fenced()` - Succeeds but wraps the text in a markdown fence
 * - `MockProvider::empty()` - Succeeds with no text
 */

use async_trait::async_trait;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::errors::ProviderError;
use crate::providers::Provider;
use crate::transcription::TranscriptionRequest;

/// Default LRC payload returned by the working behaviors
pub const SAMPLE_LRC: &str = "[00:01.00]First line\n[00:04.50]Second line\n[00:08.00]";

/// Mock response for testing
#[derive(Debug, Clone)]
pub struct MockResponse {
    /// The generated text
    pub text: String,
}

/// Behavior mode for the mock provider
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MockBehavior {
    /// Always succeeds with LRC text
    Working,
    /// Rate-limits the first n requests, then succeeds
    RateLimitedThenSuccess { failures: usize },
    /// Rate-limits every request
    AlwaysRateLimited,
    /// Always fails with a server error
    Failing,
    /// Succeeds but wraps the payload in a ```lrc fence
    Fenced,
    /// Succeeds with an empty body
    Empty,
}

/// Mock provider for testing transcription behavior
#[derive(Debug)]
pub struct MockProvider {
    /// Behavior mode
    behavior: MockBehavior,
    /// Request counter shared across clones
    request_count: Arc<AtomicUsize>,
    /// Custom response generator (optional)
    custom_response: Option<fn(&TranscriptionRequest) -> String>,
}

impl MockProvider {
    /// Create a new mock provider with the specified behavior
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            request_count: Arc::new(AtomicUsize::new(0)),
            custom_response: None,
        }
    }

    /// Create a working mock provider that always succeeds
    pub fn working() -> Self {
        Self::new(MockBehavior::Working)
    }

    /// Create a mock that rate-limits the first `failures` requests
    pub fn rate_limited_then_success(failures: usize) -> Self {
        Self::new(MockBehavior::RateLimitedThenSuccess { failures })
    }

    /// Create a mock that rate-limits every request
    pub fn always_rate_limited() -> Self {
        Self::new(MockBehavior::AlwaysRateLimited)
    }

    /// Create a failing mock provider that always errors
    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    /// Create a mock whose responses arrive fenced in markdown
    pub fn fenced() -> Self {
        Self::new(MockBehavior::Fenced)
    }

    /// Create a mock that returns empty responses
    pub fn empty() -> Self {
        Self::new(MockBehavior::Empty)
    }

    /// Set a custom response generator
    pub fn with_custom_response(mut self, generator: fn(&TranscriptionRequest) -> String) -> Self {
        self.custom_response = Some(generator);
        self
    }

    /// Number of requests this provider (and its clones) has received
    pub fn request_count(&self) -> usize {
        self.request_count.load(Ordering::SeqCst)
    }

    /// Handle for asserting request counts after the provider is moved
    pub fn counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.request_count)
    }

    fn success_text(&self, request: &TranscriptionRequest) -> String {
        match self.custom_response {
            Some(generator) => generator(request),
            None => SAMPLE_LRC.to_string(),
        }
    }
}

impl Clone for MockProvider {
    fn clone(&self) -> Self {
        Self {
            behavior: self.behavior,
            request_count: Arc::clone(&self.request_count),
            custom_response: self.custom_response,
        }
    }
}

#[async_trait]
impl Provider for MockProvider {
    type Request = TranscriptionRequest;
    type Response = MockResponse;

    async fn complete(&self, request: Self::Request) -> Result<Self::Response, ProviderError> {
        let count = self.request_count.fetch_add(1, Ordering::SeqCst);

        match self.behavior {
            MockBehavior::Working => Ok(MockResponse {
                text: self.success_text(&request),
            }),

            MockBehavior::RateLimitedThenSuccess { failures } => {
                if count < failures {
                    Err(ProviderError::RateLimitExceeded(format!(
                        "Simulated rate limit (request #{})",
                        count + 1
                    )))
                } else {
                    Ok(MockResponse {
                        text: self.success_text(&request),
                    })
                }
            }

            MockBehavior::AlwaysRateLimited => Err(ProviderError::RateLimitExceeded(format!(
                "Simulated rate limit (request #{})",
                count + 1
            ))),

            MockBehavior::Failing => Err(ProviderError::ApiError {
                status_code: 500,
                message: "Simulated provider failure".to_string(),
            }),

            MockBehavior::Fenced => Ok(MockResponse {
                text: format!("```lrc\n{}\n```", self.success_text(&request)),
            }),

            MockBehavior::Empty => Ok(MockResponse {
                text: String::new(),
            }),
        }
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        Ok(())
    }

    fn extract_text(response: &Self::Response) -> String {
        response.text.clone()
    }
}
