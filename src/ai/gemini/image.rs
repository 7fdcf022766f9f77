use super::client::GeminiHttpClient;
use super::decode::{self, ContentKind};
use super::types::{Content, GenerateContentRequest, GenerationConfig, Modality};
use crate::ai::{encoding, ImageGenerationService};
use crate::models::ImageGenerationRequest;
use crate::Result;
use async_trait::async_trait;

/// MIME type advertised in the returned data URI.
const IMAGE_DATA_URI_MIME: &str = "image/png";

pub struct GeminiImageClient {
    http: GeminiHttpClient,
}

impl GeminiImageClient {
    pub fn new(model: String) -> Self {
        Self::new_with_client(model, reqwest::Client::new())
    }

    pub fn new_with_client(model: String, client: reqwest::Client) -> Self {
        Self {
            http: GeminiHttpClient::new_with_client(model, client),
        }
    }

    /// The provider rejects image requests that do not list both modalities.
    pub(crate) fn build_request(request: &ImageGenerationRequest) -> GenerateContentRequest {
        GenerateContentRequest {
            contents: vec![Content::text(request.generation.prompt_text.clone())],
            generation_config: Some(GenerationConfig {
                response_modalities: Some(vec![Modality::Text, Modality::Image]),
                ..Default::default()
            }),
            system_instruction: None,
        }
    }
}

super::impl_gemini_client_builders!(GeminiImageClient);

#[async_trait]
impl ImageGenerationService for GeminiImageClient {
    async fn try_generate_image(&self, request: &ImageGenerationRequest) -> Result<String> {
        let body = Self::build_request(request);

        let response = self
            .http
            .generate_content(
                &body,
                &request.generation.credential,
                ContentKind::Image.http_failure_message(),
            )
            .await?;

        let image_data = decode::decode_inline_data(&response, ContentKind::Image)?;

        tracing::debug!(
            "Gemini returned image with mime_type: {}",
            image_data.mime_type
        );

        Ok(encoding::to_data_uri(IMAGE_DATA_URI_MIME, &image_data.data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::gemini::test_support;
    use crate::models::GenerationResult;
    use serde_json::json;
    use wiremock::matchers::body_partial_json;
    use wiremock::{MockServer, ResponseTemplate};

    const DEFAULT_MODEL: &str = "gemini-2.0-flash-preview-image-generation";

    fn make_client(server: &MockServer) -> GeminiImageClient {
        GeminiImageClient::new(DEFAULT_MODEL.to_string()).with_base_url(server.uri())
    }

    fn request() -> ImageGenerationRequest {
        ImageGenerationRequest::new("a lighthouse at dusk", "key")
    }

    #[tokio::test]
    async fn test_selects_inline_part_after_text_part() {
        let server = MockServer::start().await;

        let fake_image = vec![0x89, 0x50, 0x4E, 0x47];
        let b64 = encoding::encode_base64(&fake_image);

        test_support::post_path_regex(test_support::GENERATE_CONTENT_PATH_REGEX)
            .respond_with(ResponseTemplate::new(200).set_body_json(
                test_support::single_candidate(json!([
                    { "text": "Here is a lighthouse." },
                    { "inlineData": { "mimeType": "image/png", "data": b64 } }
                ])),
            ))
            .mount(&server)
            .await;

        let data_uri = make_client(&server)
            .generate_image(&request())
            .await
            .success()
            .unwrap();
        assert!(data_uri.starts_with("data:image/png;base64,"));
        assert_eq!(encoding::decode_data_uri(&data_uri).unwrap(), fake_image);
    }

    #[tokio::test]
    async fn test_selects_inline_part_before_text_part() {
        let server = MockServer::start().await;

        test_support::post_path_regex(test_support::GENERATE_CONTENT_PATH_REGEX)
            .respond_with(ResponseTemplate::new(200).set_body_json(
                test_support::single_candidate(json!([
                    { "inlineData": { "mimeType": "image/jpeg", "data": "AQID" } },
                    { "text": "caption" }
                ])),
            ))
            .mount(&server)
            .await;

        let result = make_client(&server).generate_image(&request()).await;
        assert_eq!(
            result,
            GenerationResult::Success("data:image/png;base64,AQID".to_string())
        );
    }

    #[tokio::test]
    async fn test_request_lists_text_and_image_modalities() {
        let server = MockServer::start().await;

        test_support::post_path_regex(test_support::GENERATE_CONTENT_PATH_REGEX)
            .and(body_partial_json(json!({
                "generationConfig": { "responseModalities": ["TEXT", "IMAGE"] }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(
                test_support::single_candidate(json!([
                    { "inlineData": { "mimeType": "image/png", "data": "AA==" } }
                ])),
            ))
            .expect(1)
            .mount(&server)
            .await;

        assert!(make_client(&server)
            .generate_image(&request())
            .await
            .is_success());
    }

    #[tokio::test]
    async fn test_missing_inline_data_is_failure() {
        let server = MockServer::start().await;

        test_support::post_path_regex(test_support::GENERATE_CONTENT_PATH_REGEX)
            .respond_with(ResponseTemplate::new(200).set_body_json(
                test_support::single_candidate(json!([{ "text": "no image here" }])),
            ))
            .mount(&server)
            .await;

        let result = make_client(&server).generate_image(&request()).await;
        assert_eq!(
            result,
            GenerationResult::failure("No image data found in response")
        );
    }

    #[tokio::test]
    async fn test_empty_candidates_is_no_image_failure() {
        let server = MockServer::start().await;

        test_support::post_path_regex(test_support::GENERATE_CONTENT_PATH_REGEX)
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "candidates": [] })))
            .mount(&server)
            .await;

        let result = make_client(&server).generate_image(&request()).await;
        assert_eq!(result, GenerationResult::failure("No image generated"));
    }

    #[tokio::test]
    async fn test_api_error_without_body_uses_generic_message() {
        let server = MockServer::start().await;

        test_support::post_path_regex(test_support::GENERATE_CONTENT_PATH_REGEX)
            .respond_with(ResponseTemplate::new(429).set_body_string("quota exceeded"))
            .mount(&server)
            .await;

        let result = make_client(&server).generate_image(&request()).await;
        assert_eq!(result, GenerationResult::failure("Failed to generate image"));
    }
}
