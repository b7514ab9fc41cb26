use std::time::Duration;

use anyhow::{Error, Result, anyhow, bail};
use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// Image bytes inlined into a request, base64 encoded.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InlineImage {
    pub mime_type: String,
    pub data: String,
}

impl InlineImage {
    pub fn from_bytes(mime_type: &str, bytes: &[u8]) -> Self {
        Self {
            mime_type: mime_type.to_string(),
            data: STANDARD.encode(bytes),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum ResponseFormat {
    #[default]
    Text,
    Json,
}

/// One multi-part prompt: optional text, optional image, and the
/// shape of the completion that's expected back.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AssistantRequest {
    pub text: Option<String>,
    pub image: Option<InlineImage>,
    pub system_instruction: Option<String>,
    pub response_format: ResponseFormat,
}

impl AssistantRequest {
    pub fn text(text: &str) -> Self {
        Self {
            text: Some(text.to_string()),
            ..Default::default()
        }
    }

    pub fn json(text: &str) -> Self {
        Self {
            text: Some(text.to_string()),
            response_format: ResponseFormat::Json,
            ..Default::default()
        }
    }

    pub fn with_system_instruction(mut self, instruction: &str) -> Self {
        self.system_instruction = Some(instruction.to_string());
        self
    }
}

// Wire format for `generateContent`. Each part holds exactly one of
// `text` or `inlineData`.
#[derive(Serialize, Debug)]
#[serde(untagged)]
enum Part<'a> {
    Text {
        text: &'a str,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: &'a InlineImage,
    },
}

#[derive(Deserialize, Debug)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Deserialize, Debug)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<ResponseContent>,
    finish_reason: Option<String>,
}

#[derive(Deserialize, Debug)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

/// Anything that can turn a prompt into a text completion. The session
/// and discovery only see this trait so tests can substitute their own.
#[async_trait]
pub trait Assistant: Send + Sync {
    async fn generate(&self, request: &AssistantRequest) -> Result<String, Error>;
}

pub fn request_body(request: &AssistantRequest) -> Result<Value, Error> {
    let mut parts = Vec::new();
    if let Some(text) = request.text.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
        parts.push(Part::Text { text });
    }
    if let Some(image) = &request.image {
        parts.push(Part::InlineData { inline_data: image });
    }
    if parts.is_empty() {
        bail!("Refusing to send a request with no text or image");
    }

    let mut payload = json!({
        "contents": [{"role": "user", "parts": parts}],
    });
    if let Some(instruction) = &request.system_instruction {
        payload["systemInstruction"] = json!({"parts": [{"text": instruction}]});
    }
    if request.response_format == ResponseFormat::Json {
        payload["generationConfig"] = json!({"responseMimeType": "application/json"});
    }
    Ok(payload)
}

/// Pull the completion text out of a `generateContent` response body.
pub fn response_text(body: &str) -> Result<String, Error> {
    let resp: GenerateContentResponse = serde_json::from_str(body)
        .inspect_err(|e| tracing::error!("Parsing completion failed for {}\nError: {}", body, e))?;
    let candidate = resp
        .candidates
        .first()
        .ok_or(anyhow!("No candidates in response: {}", body))?;
    let text = candidate
        .content
        .as_ref()
        .map(|c| {
            c.parts
                .iter()
                .filter_map(|p| p.text.as_deref())
                .collect::<String>()
        })
        .unwrap_or_default();

    if text.is_empty() {
        bail!(
            "No text received (finish reason: {}). Resp:\n\n {}",
            candidate.finish_reason.as_deref().unwrap_or("unknown"),
            body
        );
    }
    Ok(text)
}

pub async fn generate_content(
    request: &AssistantRequest,
    api_hostname: &str,
    api_key: &str,
    model: &str,
) -> Result<String, Error> {
    let payload = request_body(request)?;
    let url = format!(
        "{}/v1beta/models/{}:generateContent",
        api_hostname.trim_end_matches("/"),
        model
    );
    let response = reqwest::Client::new()
        .post(url)
        .header("x-goog-api-key", api_key)
        .header("Content-Type", "application/json")
        .timeout(Duration::from_secs(60))
        .json(&payload)
        .send()
        .await?;

    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() {
        bail!("Generative API error {}: {}", status, body);
    }

    response_text(&body)
}

/// `Assistant` backed by the Gemini `generateContent` endpoint.
#[derive(Clone, Debug)]
pub struct GeminiClient {
    api_hostname: String,
    api_key: String,
    model: String,
}

impl GeminiClient {
    pub fn new(api_hostname: &str, api_key: &str, model: &str) -> Self {
        Self {
            api_hostname: api_hostname.to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
        }
    }
}

#[async_trait]
impl Assistant for GeminiClient {
    async fn generate(&self, request: &AssistantRequest) -> Result<String, Error> {
        tracing::debug!(
            "Sending request to {} (text: {}, image: {})",
            self.model,
            request.text.is_some(),
            request.image.is_some()
        );
        generate_content(request, &self.api_hostname, &self.api_key, &self.model).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inline_image_encodes_base64() {
        let image = InlineImage::from_bytes("image/png", b"hello");
        assert_eq!(image.data, "aGVsbG8=");
        assert_eq!(
            serde_json::to_string(&image).unwrap(),
            r#"{"mimeType":"image/png","data":"aGVsbG8="}"#
        );
    }

    #[test]
    fn test_request_body_text_only() {
        let body = request_body(&AssistantRequest::text("  Tell me about Luxor ")).unwrap();
        assert_eq!(
            body,
            json!({"contents": [{"role": "user", "parts": [{"text": "Tell me about Luxor"}]}]})
        );
    }

    #[test]
    fn test_request_body_text_and_image() {
        let request = AssistantRequest {
            text: Some(String::from("What is this?")),
            image: Some(InlineImage::from_bytes("image/jpeg", b"\x01\x02")),
            ..Default::default()
        };
        let body = request_body(&request).unwrap();
        let parts = body["contents"][0]["parts"].as_array().unwrap();
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0]["text"], "What is this?");
        assert_eq!(parts[1]["inlineData"]["mimeType"], "image/jpeg");
        assert_eq!(parts[1]["inlineData"]["data"], "AQI=");
    }

    #[test]
    fn test_request_body_json_mode_and_system_instruction() {
        let request = AssistantRequest::json("List places").with_system_instruction("Be brief");
        let body = request_body(&request).unwrap();
        assert_eq!(body["generationConfig"]["responseMimeType"], "application/json");
        assert_eq!(body["systemInstruction"]["parts"][0]["text"], "Be brief");
    }

    #[test]
    fn test_request_body_rejects_empty() {
        assert!(request_body(&AssistantRequest::text("   ")).is_err());
        assert!(request_body(&AssistantRequest::default()).is_err());
    }

    #[test]
    fn test_response_text_joins_parts() {
        let body = r#"{"candidates": [{"content": {"parts": [{"text": "Luxor "}, {"text": "is..."}], "role": "model"}, "finishReason": "STOP"}]}"#;
        assert_eq!(response_text(body).unwrap(), "Luxor is...");
    }

    #[test]
    fn test_response_text_errors() {
        assert!(response_text("not json").is_err());
        assert!(response_text(r#"{"candidates": []}"#).is_err());
        assert!(response_text(r#"{"candidates": [{"finishReason": "SAFETY"}]}"#).is_err());
    }

    #[tokio::test]
    async fn test_generate_content_success() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1beta/models/gemini-test:generateContent")
            .match_header("x-goog-api-key", "test-key")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"candidates": [{"content": {"parts": [{"text": "Luxor is..."}]}}]}"#)
            .create_async()
            .await;

        let client = GeminiClient::new(&server.url(), "test-key", "gemini-test");
        let result = client
            .generate(&AssistantRequest::text("Tell me about Luxor"))
            .await;

        mock.assert_async().await;
        assert_eq!(result.unwrap(), "Luxor is...");
    }

    #[tokio::test]
    async fn test_generate_content_non_2xx_is_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/v1beta/models/gemini-test:generateContent")
            .with_status(429)
            .with_body(r#"{"error": {"message": "quota exceeded"}}"#)
            .create_async()
            .await;

        let client = GeminiClient::new(&server.url(), "test-key", "gemini-test");
        let err = client
            .generate(&AssistantRequest::text("Hi"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("429"));
    }
}
