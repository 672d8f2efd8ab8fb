use std::time::Duration;
use async_trait::async_trait;
use serde::{Serialize, Deserialize};
use reqwest::Client;
use log::error;

use crate::errors::ProviderError;
use crate::providers::Provider;
use crate::transcription::TranscriptionRequest;

/// Default public endpoint for the Gemini API
const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com";

/// Gemini client for the generateContent API
pub struct Gemini {
    /// HTTP client for API requests
    client: Client,
    /// API key for authentication
    api_key: String,
    /// API endpoint URL (optional, defaults to public API)
    endpoint: String,
    /// Model identifier, e.g. "gemini-2.0-flash"
    model: String,
    /// Maximum number of tokens to generate
    max_output_tokens: u32,
    /// Temperature for generation
    temperature: f32,
}

/// Gemini generateContent request
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiRequest {
    /// System instruction constraining the model output
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<GeminiContent>,

    /// The conversation contents
    contents: Vec<GeminiContent>,

    /// Generation parameters
    generation_config: GenerationConfig,
}

/// One content block: a role plus its parts
#[derive(Debug, Serialize, Deserialize)]
pub struct GeminiContent {
    /// Role of the content ("user", "model"); absent for system instructions
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,

    /// The parts making up the content
    pub parts: Vec<GeminiPart>,
}

/// One part of a content block: either text or inlined binary data
#[derive(Debug, Serialize, Deserialize)]
pub struct GeminiPart {
    /// Text content
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    /// Inlined base64 payload with its MIME type
    #[serde(rename = "inlineData", skip_serializing_if = "Option::is_none")]
    pub inline_data: Option<InlineData>,
}

impl GeminiPart {
    /// A plain text part
    pub fn text(text: impl Into<String>) -> Self {
        GeminiPart { text: Some(text.into()), inline_data: None }
    }

    /// An inlined binary part carrying base64 data
    pub fn inline_data(mime_type: impl Into<String>, data: impl Into<String>) -> Self {
        GeminiPart {
            text: None,
            inline_data: Some(InlineData {
                mime_type: mime_type.into(),
                data: data.into(),
            }),
        }
    }
}

/// Base64 payload for a media part
#[derive(Debug, Serialize, Deserialize)]
pub struct InlineData {
    /// MIME type of the payload, e.g. "audio/mpeg"
    #[serde(rename = "mimeType")]
    pub mime_type: String,

    /// Base64-encoded bytes
    pub data: String,
}

/// Generation parameters
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    /// Maximum number of tokens to generate
    max_output_tokens: u32,

    /// Temperature for generation
    temperature: f32,
}

/// Gemini generateContent response
#[derive(Debug, Deserialize)]
pub struct GeminiResponse {
    /// Generated candidates; may be absent when the prompt was blocked
    #[serde(default)]
    pub candidates: Vec<GeminiCandidate>,
}

/// One generated candidate
#[derive(Debug, Deserialize)]
pub struct GeminiCandidate {
    /// The generated content
    pub content: Option<GeminiContent>,

    /// Why generation stopped
    #[serde(rename = "finishReason")]
    pub finish_reason: Option<String>,
}

/// Error body shape returned by the API on failure
#[derive(Debug, Deserialize)]
struct GeminiErrorBody {
    error: Option<GeminiErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorDetail {
    message: Option<String>,
}

// Keeps the API key out of debug output
impl std::fmt::Debug for Gemini {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Gemini")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

impl Gemini {
    /// Create a new Gemini client
    pub fn new(api_key: impl Into<String>, model: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self::new_with_config(api_key, model, endpoint, 120, 8192, 0.3)
    }

    /// Create a new Gemini client with explicit generation and timeout settings
    pub fn new_with_config(
        api_key: impl Into<String>,
        model: impl Into<String>,
        endpoint: impl Into<String>,
        timeout_secs: u64,
        max_output_tokens: u32,
        temperature: f32,
    ) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(timeout_secs))
                .build()
                .unwrap_or_default(),
            api_key: api_key.into(),
            endpoint: endpoint.into(),
            model: model.into(),
            max_output_tokens,
            temperature,
        }
    }

    /// URL for a generateContent call against the configured model
    fn api_url(&self) -> String {
        let base = if self.endpoint.is_empty() {
            DEFAULT_ENDPOINT
        } else {
            self.endpoint.trim_end_matches('/')
        };

        format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            base, self.model, self.api_key
        )
    }

    /// Send a prepared request to the API and decode the response
    async fn send(&self, request: &GeminiRequest) -> Result<GeminiResponse, ProviderError> {
        let response = self.client.post(self.api_url())
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await
            .map_err(|e| ProviderError::ConnectionError(
                format!("Failed to send request to Gemini API: {}", e)
            ))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await
                .unwrap_or_else(|_| "Failed to get error response text".to_string());
            let message = Self::extract_error_message(&error_text);
            error!("Gemini API error ({}): {}", status, message);

            return Err(match status.as_u16() {
                429 => ProviderError::RateLimitExceeded(message),
                401 | 403 => ProviderError::AuthenticationError(message),
                code => ProviderError::ApiError { status_code: code, message },
            });
        }

        response.json::<GeminiResponse>().await
            .map_err(|e| ProviderError::ParseError(
                format!("Failed to parse Gemini API response: {}", e)
            ))
    }

    /// Pull the human-readable message out of an API error body when present
    fn extract_error_message(body: &str) -> String {
        serde_json::from_str::<GeminiErrorBody>(body)
            .ok()
            .and_then(|b| b.error)
            .and_then(|e| e.message)
            .unwrap_or_else(|| body.to_string())
    }
}

#[async_trait]
impl Provider for Gemini {
    type Request = TranscriptionRequest;
    type Response = GeminiResponse;

    async fn complete(&self, request: Self::Request) -> Result<Self::Response, ProviderError> {
        let mut parts = vec![GeminiPart::inline_data(&request.mime_type, &request.audio_base64)];
        if let Some(prompt) = &request.prompt {
            parts.push(GeminiPart::text(prompt));
        }

        let wire_request = GeminiRequest {
            system_instruction: request.system_instruction.as_ref().map(|text| GeminiContent {
                role: None,
                parts: vec![GeminiPart::text(text)],
            }),
            contents: vec![GeminiContent {
                role: Some("user".to_string()),
                parts,
            }],
            generation_config: GenerationConfig {
                max_output_tokens: self.max_output_tokens,
                temperature: self.temperature,
            },
        };

        self.send(&wire_request).await
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        let request = GeminiRequest {
            system_instruction: None,
            contents: vec![GeminiContent {
                role: Some("user".to_string()),
                parts: vec![GeminiPart::text("Hello")],
            }],
            generation_config: GenerationConfig {
                max_output_tokens: 10,
                temperature: 0.0,
            },
        };

        self.send(&request).await?;
        Ok(())
    }

    fn extract_text(response: &Self::Response) -> String {
        response.candidates.iter()
            .filter_map(|candidate| candidate.content.as_ref())
            .flat_map(|content| content.parts.iter())
            .filter_map(|part| part.text.as_deref())
            .collect()
    }
}
