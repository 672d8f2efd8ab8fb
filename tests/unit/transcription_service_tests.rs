/*!
 * Tests for the transcription service retry loop and response cleanup
 */

use yaltwai::errors::{ProviderError, TranscriptionError};
use yaltwai::providers::mock::{MockProvider, SAMPLE_LRC};
use yaltwai::transcription::{ResponseCleaner, TranscriptionRequest, TranscriptionService};

/// A retry policy with a tiny backoff base so tests stay fast
fn fast_service(provider: MockProvider, max_attempts: u32) -> TranscriptionService<MockProvider> {
    TranscriptionService::with_retry_policy(provider, max_attempts, 1)
}

fn request() -> TranscriptionRequest {
    TranscriptionRequest::new("QUJDREVG", "audio/mpeg")
}

#[tokio::test]
async fn test_transcribe_withWorkingProvider_shouldReturnLrcText() {
    let provider = MockProvider::working();
    let counter = provider.counter();
    let service = fast_service(provider, 5);

    let text = service.transcribe(&request()).await.unwrap();

    assert_eq!(text, SAMPLE_LRC);
    assert_eq!(counter.load(std::sync::atomic::Ordering::SeqCst), 1);
}

/// Rate-limited twice then served: success on the third attempt
#[tokio::test]
async fn test_transcribe_withRateLimitTwiceThenSuccess_shouldSucceedOnThirdAttempt() {
    let provider = MockProvider::rate_limited_then_success(2);
    let counter = provider.counter();
    let service = fast_service(provider, 5);

    let text = service.transcribe(&request()).await.unwrap();

    assert_eq!(text, SAMPLE_LRC);
    assert_eq!(counter.load(std::sync::atomic::Ordering::SeqCst), 3);
}

/// Persistent rate limiting exhausts the bound after exactly max_attempts requests
#[tokio::test]
async fn test_transcribe_withPersistentRateLimit_shouldFailWithRetryExhausted() {
    let provider = MockProvider::always_rate_limited();
    let counter = provider.counter();
    let service = fast_service(provider, 3);

    let error = service.transcribe(&request()).await.unwrap_err();

    assert!(matches!(
        error,
        TranscriptionError::Provider(ProviderError::RetryExhausted { attempts: 3 })
    ));
    assert_eq!(counter.load(std::sync::atomic::Ordering::SeqCst), 3);
}

/// Non-rate-limit failures are terminal: no second request is made
#[tokio::test]
async fn test_transcribe_withServerError_shouldFailImmediately() {
    let provider = MockProvider::failing();
    let counter = provider.counter();
    let service = fast_service(provider, 5);

    let error = service.transcribe(&request()).await.unwrap_err();

    assert!(matches!(
        error,
        TranscriptionError::Provider(ProviderError::ApiError { status_code: 500, .. })
    ));
    assert_eq!(counter.load(std::sync::atomic::Ordering::SeqCst), 1);
}

/// A fence around the payload is stripped before the text is returned
#[tokio::test]
async fn test_transcribe_withFencedResponse_shouldStripFence() {
    let provider = MockProvider::fenced();
    let service = fast_service(provider, 5);

    let text = service.transcribe(&request()).await.unwrap();

    assert_eq!(text, SAMPLE_LRC);
    assert!(!text.contains("```"));
}

/// An empty body is its own failure, distinct from a remote error
#[tokio::test]
async fn test_transcribe_withEmptyResponse_shouldFailWithEmptyResponse() {
    let provider = MockProvider::empty();
    let counter = provider.counter();
    let service = fast_service(provider, 5);

    let error = service.transcribe(&request()).await.unwrap_err();

    assert!(matches!(
        error,
        TranscriptionError::Provider(ProviderError::EmptyResponse)
    ));
    assert_eq!(counter.load(std::sync::atomic::Ordering::SeqCst), 1);
}

/// A whitespace-only body counts as empty too
#[tokio::test]
async fn test_transcribe_withWhitespaceResponse_shouldFailWithEmptyResponse() {
    let provider = MockProvider::working().with_custom_response(|_| "  \n\n  ".to_string());
    let service = fast_service(provider, 5);

    let error = service.transcribe(&request()).await.unwrap_err();

    assert!(matches!(
        error,
        TranscriptionError::Provider(ProviderError::EmptyResponse)
    ));
}

/// The service fills in its fixed LRC system instruction when none is given
#[tokio::test]
async fn test_transcribe_withDefaultRequest_shouldCarrySystemInstruction() {
    let provider = MockProvider::working()
        .with_custom_response(|req| req.system_instruction.clone().unwrap_or_default());
    let service = fast_service(provider, 5);

    let text = service.transcribe(&request()).await.unwrap();

    assert!(text.contains("LRC"));
    assert!(text.contains("[mm:ss.xx]"));
}

/// A caller-supplied system instruction is not overridden
#[tokio::test]
async fn test_transcribe_withCustomSystemInstruction_shouldKeepIt() {
    let provider = MockProvider::working()
        .with_custom_response(|req| req.system_instruction.clone().unwrap_or_default());
    let service = fast_service(provider, 5);

    let custom = request().system("custom instruction");
    let text = service.transcribe(&custom).await.unwrap();

    assert_eq!(text, "custom instruction");
}

#[test]
fn test_clean_withLrcFence_shouldReturnInnerText() {
    let fenced = "```lrc\n[00:01.00]line one\n[00:02.00]line two\n```";

    assert_eq!(
        ResponseCleaner::clean(fenced),
        "[00:01.00]line one\n[00:02.00]line two"
    );
}

#[test]
fn test_clean_withBareFence_shouldReturnInnerText() {
    let fenced = "```\n[00:01.00]line\n```";

    assert_eq!(ResponseCleaner::clean(fenced), "[00:01.00]line");
}

#[test]
fn test_clean_withoutFence_shouldOnlyTrim() {
    let plain = "  [00:01.00]line one\n[00:02.00]line two\n";

    assert_eq!(
        ResponseCleaner::clean(plain),
        "[00:01.00]line one\n[00:02.00]line two"
    );
}

/// Backticks inside the lyric text are not a wrapper and stay untouched
#[test]
fn test_clean_withInnerBackticks_shouldLeaveThem() {
    let text = "[00:01.00]she said ```hello``` to me";

    assert_eq!(ResponseCleaner::clean(text), text);
}

#[test]
fn test_clean_withCrlfFence_shouldReturnInnerText() {
    let fenced = "```lrc\r\n[00:01.00]line\r\n```";

    assert_eq!(ResponseCleaner::clean(fenced), "[00:01.00]line");
}

/// An unterminated fence is left alone rather than guessed at
#[test]
fn test_clean_withUnclosedFence_shouldLeaveText() {
    let text = "```lrc\n[00:01.00]line";

    assert_eq!(ResponseCleaner::clean(text), text);
}
