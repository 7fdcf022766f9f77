use super::client::GeminiHttpClient;
use super::decode::{self, ContentKind};
use super::types::{Content, GenerateContentRequest, GenerationConfig};
use crate::ai::TextGenerationService;
use crate::models::GenerationRequest;
use crate::Result;
use async_trait::async_trait;

pub struct GeminiTextClient {
    http: GeminiHttpClient,
}

impl GeminiTextClient {
    pub fn new(model: String) -> Self {
        Self::new_with_client(model, reqwest::Client::new())
    }

    pub fn new_with_client(model: String, client: reqwest::Client) -> Self {
        Self {
            http: GeminiHttpClient::new_with_client(model, client),
        }
    }

    pub(crate) fn build_request(request: &GenerationRequest) -> GenerateContentRequest {
        GenerateContentRequest {
            contents: vec![Content::text(request.prompt_text.clone())],
            generation_config: Some(GenerationConfig::from(request.sampling_or_default())),
            system_instruction: request.system_instruction.clone().map(Content::text),
        }
    }
}

super::impl_gemini_client_builders!(GeminiTextClient);

#[async_trait]
impl TextGenerationService for GeminiTextClient {
    async fn try_generate_text(&self, request: &GenerationRequest) -> Result<String> {
        let body = Self::build_request(request);

        let response = self
            .http
            .generate_content(
                &body,
                &request.credential,
                ContentKind::Text.http_failure_message(),
            )
            .await?;

        decode::decode_text(&response, ContentKind::Text)
    }
}
