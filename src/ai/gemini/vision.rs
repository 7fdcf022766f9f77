use super::client::GeminiHttpClient;
use super::decode::{self, ContentKind};
use super::types::{Content, GenerateContentRequest, GenerationConfig, Part};
use crate::ai::{encoding, VisionService};
use crate::models::VisionRequest;
use crate::Result;
use async_trait::async_trait;

pub struct GeminiVisionClient {
    http: GeminiHttpClient,
}

impl GeminiVisionClient {
    pub fn new(model: String) -> Self {
        Self::new_with_client(model, reqwest::Client::new())
    }

    pub fn new_with_client(model: String, client: reqwest::Client) -> Self {
        Self {
            http: GeminiHttpClient::new_with_client(model, client),
        }
    }

    /// Prompt first, image second; the image travels as raw base64.
    pub(crate) fn build_request(request: &VisionRequest) -> GenerateContentRequest {
        let generation = &request.generation;
        GenerateContentRequest {
            contents: vec![Content::from_parts(vec![
                Part::text(generation.prompt_text.clone()),
                Part::inline_data(
                    request.image_mime_type.clone(),
                    encoding::encode_base64(&request.image_bytes),
                ),
            ])],
            generation_config: Some(GenerationConfig::from(generation.sampling_or_default())),
            system_instruction: generation.system_instruction.clone().map(Content::text),
        }
    }
}

super::impl_gemini_client_builders!(GeminiVisionClient);

#[async_trait]
impl VisionService for GeminiVisionClient {
    async fn try_analyze_image(&self, request: &VisionRequest) -> Result<String> {
        tracing::debug!(
            "Analyzing image ({} bytes, {}) via Gemini",
            request.image_bytes.len(),
            request.image_mime_type
        );

        let body = Self::build_request(request);

        let response = self
            .http
            .generate_content(
                &body,
                &request.generation.credential,
                ContentKind::Vision.http_failure_message(),
            )
            .await?;

        decode::decode_text(&response, ContentKind::Vision)
    }
}
