/*!
 * Tests for provider implementations
 */

use anyhow::Result;
use yaltwai::providers::Provider;
use yaltwai::providers::gemini::{Gemini, GeminiPart, GeminiResponse};
use yaltwai::providers::mock::{MockProvider, SAMPLE_LRC};
use yaltwai::transcription::TranscriptionRequest;

/// Inline audio parts serialize with the camelCase wire names
#[test]
fn test_geminiPart_withInlineData_shouldSerializeCamelCase() -> Result<()> {
    let part = GeminiPart::inline_data("audio/mpeg", "QUJD");
    let value = serde_json::to_value(&part)?;

    assert_eq!(value["inlineData"]["mimeType"], "audio/mpeg");
    assert_eq!(value["inlineData"]["data"], "QUJD");
    assert!(value.get("text").is_none());

    Ok(())
}

#[test]
fn test_geminiPart_withText_shouldOmitInlineData() -> Result<()> {
    let part = GeminiPart::text("Transcribe this audio to LRC.");
    let value = serde_json::to_value(&part)?;

    assert_eq!(value["text"], "Transcribe this audio to LRC.");
    assert!(value.get("inlineData").is_none());

    Ok(())
}

/// Text extraction joins the parts of every candidate
#[test]
fn test_extractText_withGenerateContentResponse_shouldJoinTextParts() -> Result<()> {
    let json = r#"{
        "candidates": [
            {
                "content": {
                    "role": "model",
                    "parts": [
                        { "text": "[00:01.00]first " },
                        { "text": "half" }
                    ]
                },
                "finishReason": "STOP"
            }
        ]
    }"#;

    let response: GeminiResponse = serde_json::from_str(json)?;
    assert_eq!(<Gemini as Provider>::extract_text(&response), "[00:01.00]first half");

    Ok(())
}

/// A blocked prompt comes back without candidates; extraction yields nothing
#[test]
fn test_extractText_withNoCandidates_shouldReturnEmpty() -> Result<()> {
    let response: GeminiResponse = serde_json::from_str("{}")?;

    assert_eq!(<Gemini as Provider>::extract_text(&response), "");

    Ok(())
}

#[test]
fn test_extractText_withPartsMissingText_shouldSkipThem() -> Result<()> {
    let json = r#"{
        "candidates": [
            { "content": { "parts": [ {}, { "text": "kept" } ] } }
        ]
    }"#;

    let response: GeminiResponse = serde_json::from_str(json)?;
    assert_eq!(<Gemini as Provider>::extract_text(&response), "kept");

    Ok(())
}

#[tokio::test]
async fn test_mockProvider_underProviderTrait_shouldRoundTripText() {
    let provider = MockProvider::working();
    let request = TranscriptionRequest::new("QUJD", "audio/wav");

    let response = provider.complete(request).await.unwrap();
    assert_eq!(MockProvider::extract_text(&response), SAMPLE_LRC);
}

#[tokio::test]
async fn test_mockProvider_testConnection_shouldSucceed() {
    let provider = MockProvider::working();

    assert!(provider.test_connection().await.is_ok());
}
