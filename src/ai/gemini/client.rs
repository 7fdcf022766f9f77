use super::types::{ErrorResponse, GenerateContentRequest, GenerateContentResponse};
use crate::models::DEFAULT_GEMINI_BASE_URL;
use crate::{Error, Result};
use reqwest::Client;
use std::time::Duration;

/// Lightweight Gemini REST client shared by the text/image/vision/audio modes.
///
/// Holds no credential: every call carries the key supplied with its request.
#[derive(Debug, Clone)]
pub struct GeminiHttpClient {
    client: Client,
    model: String,
    base_url: String,
    timeout: Option<Duration>,
}

impl GeminiHttpClient {
    /// Construct a Gemini client.
    ///
    /// `model` should be the bare model ID (for example `gemini-1.5-flash-latest`),
    /// not a `models/...`-prefixed path segment.
    pub fn new(model: String) -> Self {
        Self::new_with_client(model, Client::new())
    }

    pub fn new_with_client(model: String, client: Client) -> Self {
        let model = model.strip_prefix("models/").unwrap_or(&model).to_string();

        Self {
            client,
            model,
            base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
            timeout: None,
        }
    }

    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns the configured model ID without the `models/` prefix.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Calls Gemini's `generateContent` endpoint.
    ///
    /// Non-2xx responses become [`Error::Provider`] carrying the body's
    /// `error.message`, or `fallback_message` when the body has none.
    pub async fn generate_content(
        &self,
        request: &GenerateContentRequest,
        credential: &str,
        fallback_message: &str,
    ) -> Result<GenerateContentResponse> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );

        tracing::debug!("Sending generateContent request to Gemini ({})", self.model);

        let mut builder = self
            .client
            .post(&url)
            .query(&[("key", credential)])
            .header("Content-Type", "application/json")
            .json(request);
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }

        let response = builder.send().await.map_err(|e| {
            tracing::error!("Failed to send request to Gemini: {}", e);
            e
        })?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            tracing::error!("Gemini API error (status {}): {}", status, body);
            return Err(Error::Provider {
                status: status.as_u16(),
                message: provider_error_message(&body)
                    .unwrap_or_else(|| fallback_message.to_string()),
            });
        }

        serde_json::from_str(&body).map_err(|e| {
            tracing::error!("Failed to parse Gemini response: {}\nBody: {}", e, body);
            Error::Serialization(e)
        })
    }
}

/// Extracts `error.message` from a provider error body, if any.
fn provider_error_message(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorResponse>(body)
        .ok()?
        .error?
        .message
        .filter(|m| !m.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_error_message_extracts_nested_message() {
        assert_eq!(
            provider_error_message(r#"{"error":{"code":403,"message":"invalid key"}}"#),
            Some("invalid key".to_string())
        );
    }

    #[test]
    fn test_provider_error_message_ignores_unstructured_bodies() {
        assert_eq!(provider_error_message("forbidden"), None);
        assert_eq!(provider_error_message(r#"{"error":{}}"#), None);
        assert_eq!(provider_error_message(r#"{"error":{"message":""}}"#), None);
        assert_eq!(provider_error_message(""), None);
    }

    #[test]
    fn test_models_prefix_is_stripped() {
        let client = GeminiHttpClient::new("models/gemini-1.5-flash-latest".to_string());
        assert_eq!(client.model(), "gemini-1.5-flash-latest");
    }

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let client = GeminiHttpClient::new("m".to_string())
            .with_base_url("http://localhost:1234/".to_string());
        assert_eq!(client.base_url, "http://localhost:1234");
    }
}
