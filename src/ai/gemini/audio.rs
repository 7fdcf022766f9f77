use super::client::GeminiHttpClient;
use super::decode::{self, ContentKind};
use super::types::{Content, GenerateContentRequest, GenerationConfig, Modality, SpeechConfig};
use crate::ai::{encoding, AudioGenerationService};
use crate::models::{AudioGenerationRequest, DEFAULT_VOICE_NAME};
use crate::Result;
use async_trait::async_trait;

pub struct GeminiAudioClient {
    http: GeminiHttpClient,
}

impl GeminiAudioClient {
    pub fn new(model: String) -> Self {
        Self::new_with_client(model, reqwest::Client::new())
    }

    pub fn new_with_client(model: String, client: reqwest::Client) -> Self {
        Self {
            http: GeminiHttpClient::new_with_client(model, client),
        }
    }

    pub(crate) fn build_request(request: &AudioGenerationRequest) -> GenerateContentRequest {
        let voice_name = if request.voice_name.trim().is_empty() {
            DEFAULT_VOICE_NAME
        } else {
            request.voice_name.as_str()
        };

        GenerateContentRequest {
            contents: vec![Content::text(request.text.clone())],
            generation_config: Some(GenerationConfig {
                response_modalities: Some(vec![Modality::Audio]),
                speech_config: Some(SpeechConfig::prebuilt(voice_name)),
                ..Default::default()
            }),
            system_instruction: None,
        }
    }
}

super::impl_gemini_client_builders!(GeminiAudioClient);

#[async_trait]
impl AudioGenerationService for GeminiAudioClient {
    async fn try_generate_audio(&self, request: &AudioGenerationRequest) -> Result<Vec<u8>> {
        let body = Self::build_request(request);

        let response = self
            .http
            .generate_content(
                &body,
                &request.credential,
                ContentKind::Audio.http_failure_message(),
            )
            .await?;

        let audio = decode::decode_inline_data(&response, ContentKind::Audio)?;
        let bytes = encoding::decode_base64(&audio.data)?;

        tracing::debug!(
            "Gemini returned {} bytes of audio ({})",
            bytes.len(),
            audio.mime_type
        );

        Ok(bytes)
    }
}
