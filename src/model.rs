//! The external multimodal model and its Google Gemini REST client.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::SiteConfig;
use crate::error::ModelError;
use crate::image_payload::EncodedImagePayload;

/// Header carrying the API key. The key is kept out of request URLs.
pub const API_KEY_HEADER: &str = "x-goog-api-key";

/// One element of a model request, in the order it is sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Part {
    Text(String),
    InlineData(EncodedImagePayload),
}

impl Part {
    pub fn text(text: impl Into<String>) -> Self {
        Part::Text(text.into())
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Part::Text(text) => Some(text),
            Part::InlineData(_) => None,
        }
    }
}

/// A model that takes ordered text and image parts and returns free text.
///
/// Implementors report a failure that has a message but fits no other
/// variant as [`ModelError::Other`], and one with no message at all as
/// [`ModelError::Unknown`].
#[async_trait]
pub trait GenerativeModel: Send + Sync {
    async fn generate_content(&self, parts: Vec<Part>) -> Result<String, ModelError>;

    /// Model identifier for display.
    fn name(&self) -> &str;
}

#[derive(Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<WirePart<'a>>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum WirePart<'a> {
    Text { text: &'a str },
    InlineData { inline_data: InlineData<'a> },
}

#[derive(Serialize)]
struct InlineData<'a> {
    mime_type: &'a str,
    data: &'a str,
}

impl<'a> From<&'a Part> for WirePart<'a> {
    fn from(part: &'a Part) -> Self {
        match part {
            Part::Text(text) => WirePart::Text { text },
            Part::InlineData(payload) => WirePart::InlineData {
                inline_data: InlineData {
                    mime_type: &payload.mime_type,
                    data: &payload.data,
                },
            },
        }
    }
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// Client for `models/{model}:generateContent`.
#[derive(Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
}

impl GeminiClient {
    pub fn new(base_url: impl Into<String>, model: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            model: model.into(),
            api_key,
        }
    }

    pub fn from_config(config: &SiteConfig) -> Self {
        Self::new(&config.base_url, &config.model, config.api_key.clone())
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }
}

#[async_trait]
impl GenerativeModel for GeminiClient {
    async fn generate_content(&self, parts: Vec<Part>) -> Result<String, ModelError> {
        let api_key = self.api_key.as_deref().ok_or(ModelError::MissingApiKey)?;

        let payload = GenerateContentRequest {
            contents: vec![Content {
                parts: parts.iter().map(WirePart::from).collect(),
            }],
        };

        info!(model = %self.model, parts = parts.len(), "Sending request to Google Gemini");

        let response = self
            .http
            .post(self.endpoint())
            .header(API_KEY_HEADER, api_key)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        let response_text = response.text().await?;

        debug!(
            status = status.as_u16(),
            body = %truncate(&response_text, 500),
            "Gemini response"
        );

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorEnvelope>(&response_text)
                .map(|envelope| envelope.error.message)
                .unwrap_or(response_text);
            warn!(status = status.as_u16(), %message, "Gemini returned an error");
            return Err(ModelError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let result: GenerateContentResponse = serde_json::from_str(&response_text)
            .map_err(|e| ModelError::MalformedResponse(e.to_string()))?;

        let text = completion_text(result)?;
        info!(chars = text.len(), "Gemini completion received");
        Ok(text)
    }

    fn name(&self) -> &str {
        &self.model
    }
}

/// Concatenate every text part of the first candidate.
fn completion_text(response: GenerateContentResponse) -> Result<String, ModelError> {
    let candidate = response
        .candidates
        .into_iter()
        .next()
        .ok_or_else(|| ModelError::MalformedResponse("no candidates in response".to_string()))?;

    let texts: Vec<String> = candidate
        .content
        .map(|content| content.parts)
        .unwrap_or_default()
        .into_iter()
        .filter_map(|part| part.text)
        .collect();

    if texts.is_empty() {
        return Err(ModelError::MalformedResponse(
            "no text in response".to_string(),
        ));
    }

    Ok(texts.concat())
}

fn truncate(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_parts_in_order() {
        let parts = vec![
            Part::text("persona"),
            Part::text("extra"),
            Part::InlineData(EncodedImagePayload {
                data: "aGVsbG8=".to_string(),
                mime_type: "image/png".to_string(),
            }),
        ];
        let payload = GenerateContentRequest {
            contents: vec![Content {
                parts: parts.iter().map(WirePart::from).collect(),
            }],
        };

        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "contents": [{
                    "parts": [
                        { "text": "persona" },
                        { "text": "extra" },
                        { "inline_data": { "mime_type": "image/png", "data": "aGVsbG8=" } }
                    ]
                }]
            })
        );
    }

    #[test]
    fn joins_text_parts_of_first_candidate() {
        let response: GenerateContentResponse = serde_json::from_value(serde_json::json!({
            "candidates": [
                { "content": { "parts": [ { "text": "Early " }, { "text": "blight" } ] } },
                { "content": { "parts": [ { "text": "ignored" } ] } }
            ]
        }))
        .unwrap();

        assert_eq!(completion_text(response).unwrap(), "Early blight");
    }

    #[test]
    fn empty_response_is_malformed() {
        let response: GenerateContentResponse =
            serde_json::from_value(serde_json::json!({ "candidates": [] })).unwrap();
        assert!(matches!(
            completion_text(response),
            Err(ModelError::MalformedResponse(_))
        ));
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate("पत्ती", 2), "पत");
        assert_eq!(truncate("leaf", 10), "leaf");
    }

    #[tokio::test]
    async fn missing_key_fails_without_network() {
        let client = GeminiClient::new("http://127.0.0.1:9", "gemini-1.5-flash", None);
        let err = client
            .generate_content(vec![Part::text("hi")])
            .await
            .unwrap_err();
        assert!(matches!(err, ModelError::MissingApiKey));
    }
}
