//! Google Gemini client for prompt + image requests

use log::{error, info};
use serde::Deserialize;
use serde_json::json;

use crate::config::AppConfig;
use crate::image_adapter::EncodedImage;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<Content>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiError,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
}

/// One configured connection to a Gemini model
#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    model: String,
    api_base: String,
}

impl GeminiClient {
    pub fn new(api_key: &str, model: &str, api_base: &str) -> Result<Self, String> {
        let api_key = api_key.trim();
        if api_key.is_empty() {
            return Err("Gemini API key not configured".to_string());
        }
        Ok(Self {
            http: reqwest::Client::new(),
            api_key: api_key.to_string(),
            model: model.to_string(),
            api_base: api_base.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, String> {
        Self::new(&config.api_key, &config.model, &config.api_base)
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.api_base, self.model
        )
    }

    /// Sends the prompt and image in a single request and returns the text
    /// of the first candidate. No retries.
    pub async fn generate_content(&self, prompt: &str, image: &EncodedImage) -> Result<String, String> {
        let body = json!({
            "contents": [{
                "parts": [
                    { "text": prompt },
                    {
                        "inline_data": {
                            "mime_type": image.mime_type,
                            "data": image.data
                        }
                    }
                ]
            }]
        });

        info!(
            "[gemini] Sending {}x{} image to {}",
            image.width, image.height, self.model
        );

        let response = self
            .http
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| format!("API request failed: {}", e))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| format!("Failed to read response: {}", e))?;

        if !status.is_success() {
            error!("[gemini] API error: {} - {}", status, text);
            let detail = serde_json::from_str::<ApiErrorBody>(&text)
                .map(|b| b.error.message)
                .unwrap_or(text);
            return Err(format!("API error ({}): {}", status.as_u16(), detail));
        }

        let parsed: GenerateContentResponse = serde_json::from_str(&text)
            .map_err(|e| format!("Failed to parse response: {}", e))?;
        extract_text(parsed)
    }
}

fn extract_text(response: GenerateContentResponse) -> Result<String, String> {
    if let Some(reason) = response.prompt_feedback.and_then(|f| f.block_reason) {
        return Err(format!("Request was blocked by the model: {}", reason));
    }

    let candidate = response
        .candidates
        .into_iter()
        .next()
        .ok_or_else(|| "Model returned no candidates".to_string())?;

    let text: String = candidate
        .content
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    if text.trim().is_empty() {
        let reason = candidate.finish_reason.unwrap_or_else(|| "UNKNOWN".to_string());
        return Err(format!("Model returned no text (finish reason: {})", reason));
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn sample_image() -> EncodedImage {
        EncodedImage {
            mime_type: "image/png",
            data: "aW1hZ2U=".to_string(),
            width: 700,
            height: 450,
        }
    }

    fn candidate_body(parts: &[&str]) -> serde_json::Value {
        let parts: Vec<_> = parts.iter().map(|t| json!({ "text": t })).collect();
        json!({
            "candidates": [{
                "content": { "role": "model", "parts": parts },
                "finishReason": "STOP"
            }]
        })
    }

    #[test]
    fn empty_key_fails_at_construction() {
        assert!(GeminiClient::new("", "gemini-1.5-flash", "http://x").is_err());
        assert!(GeminiClient::new("  ", "gemini-1.5-flash", "http://x").is_err());
    }

    #[test]
    fn endpoint_includes_model_and_strips_trailing_slash() {
        let client = GeminiClient::new("k", "gemini-1.5-flash", "https://example.test/").unwrap();
        assert_eq!(
            client.endpoint(),
            "https://example.test/v1beta/models/gemini-1.5-flash:generateContent"
        );
    }

    #[tokio::test]
    async fn sends_prompt_and_image_and_joins_text_parts() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1beta/models/gemini-1.5-flash:generateContent"))
            .and(header("x-goog-api-key", "test-key"))
            .and(body_partial_json(json!({
                "contents": [{
                    "parts": [
                        { "text": "solve it" },
                        { "inline_data": { "mime_type": "image/png", "data": "aW1hZ2U=" } }
                    ]
                }]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(candidate_body(&["x = ", "4"])))
            .expect(1)
            .mount(&server)
            .await;

        let client = GeminiClient::new("test-key", "gemini-1.5-flash", &server.uri()).unwrap();
        let text = client.generate_content("solve it", &sample_image()).await.unwrap();
        assert_eq!(text, "x = 4");
    }

    #[tokio::test]
    async fn surfaces_api_error_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "error": { "code": 400, "message": "API key not valid.", "status": "INVALID_ARGUMENT" }
            })))
            .mount(&server)
            .await;

        let client = GeminiClient::new("bad", "gemini-1.5-flash", &server.uri()).unwrap();
        let err = client.generate_content("p", &sample_image()).await.unwrap_err();
        assert_eq!(err, "API error (400): API key not valid.");
    }

    #[tokio::test]
    async fn non_json_error_body_is_passed_through() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503).set_body_string("upstream unavailable"))
            .mount(&server)
            .await;

        let client = GeminiClient::new("k", "gemini-1.5-flash", &server.uri()).unwrap();
        let err = client.generate_content("p", &sample_image()).await.unwrap_err();
        assert_eq!(err, "API error (503): upstream unavailable");
    }

    #[tokio::test]
    async fn blocked_prompt_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "promptFeedback": { "blockReason": "SAFETY" }
            })))
            .mount(&server)
            .await;

        let client = GeminiClient::new("k", "gemini-1.5-flash", &server.uri()).unwrap();
        let err = client.generate_content("p", &sample_image()).await.unwrap_err();
        assert!(err.contains("SAFETY"), "{err}");
    }

    #[test]
    fn candidate_without_text_is_an_error() {
        let response: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{ "finishReason": "RECITATION" }]
        }))
        .unwrap();
        let err = extract_text(response).unwrap_err();
        assert!(err.contains("RECITATION"));

        let empty: GenerateContentResponse = serde_json::from_value(json!({})).unwrap();
        assert_eq!(extract_text(empty).unwrap_err(), "Model returned no candidates");
    }

    #[tokio::test]
    async fn unreachable_endpoint_reports_request_failure() {
        let client = GeminiClient::new("k", "gemini-1.5-flash", "http://127.0.0.1:1").unwrap();
        let err = client.generate_content("p", &sample_image()).await.unwrap_err();
        assert!(err.starts_with("API request failed"), "{err}");
    }
}
