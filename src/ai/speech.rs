//! Standalone text-to-speech provider reached through RapidAPI.
//!
//! Unlike Gemini, the response body is the raw audio itself.

use super::SpeechSynthesisService;
use crate::models::SpeechRequest;
use crate::{Error, Result};
use async_trait::async_trait;
use reqwest::Client;

const DEFAULT_BASE_URL: &str = "https://text-to-speach-api.p.rapidapi.com";
const RAPIDAPI_HOST: &str = "text-to-speach-api.p.rapidapi.com";
const SPEECH_FAILURE_MESSAGE: &str = "Failed to generate speech";

pub struct RapidApiSpeechClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl RapidApiSpeechClient {
    pub fn new(api_key: String) -> Self {
        Self::new_with_client(api_key, Client::new())
    }

    pub fn new_with_client(api_key: String, client: Client) -> Self {
        Self {
            client,
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }
}

#[async_trait]
impl SpeechSynthesisService for RapidApiSpeechClient {
    async fn try_synthesize(&self, request: &SpeechRequest) -> Result<Vec<u8>> {
        tracing::debug!(
            "Sending text-to-speech request ({} chars, lang {})",
            request.text.len(),
            request.lang
        );

        let response = self
            .client
            .post(format!("{}/text-to-speech", self.base_url))
            .header("x-rapidapi-key", &self.api_key)
            .header("x-rapidapi-host", RAPIDAPI_HOST)
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to send text-to-speech request: {}", e);
                e
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!("Text-to-speech error (status {}): {}", status, error_text);
            return Err(Error::Provider {
                status: status.as_u16(),
                message: SPEECH_FAILURE_MESSAGE.to_string(),
            });
        }

        Ok(response.bytes().await?.to_vec())
    }
}
