//! In-memory stand-ins for the generation services.
//!
//! Replies are consumed in order and cycle once exhausted. With no replies
//! configured each mock returns a canned success.

use super::{
    encoding, AudioGenerationService, ImageGenerationService, SpeechSynthesisService,
    TextGenerationService, VisionService,
};
use crate::models::{
    AudioGenerationRequest, GenerationRequest, ImageGenerationRequest, SpeechRequest,
    VisionRequest,
};
use crate::{Error, Result};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

/// Smallest valid PNG: a 1x1 pixel.
const TINY_PNG: &[u8] = &[
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, // PNG signature
    0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44, 0x52, // IHDR chunk
    0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, // 1x1 pixel
    0x08, 0x02, 0x00, 0x00, 0x00, 0x90, 0x77, 0x53, 0xDE, 0x00, 0x00, 0x00, 0x0C, 0x49, 0x44,
    0x41, // IDAT chunk
    0x54, 0x08, 0x99, 0x63, 0xF8, 0xCF, 0xC0, 0x00, 0x00, 0x00, 0x01, 0x00, 0x01, 0xE2, 0x25,
    0x00, 0xBC, 0x00, 0x00, 0x00, 0x00, 0x49, 0x45, 0x4E, // IEND chunk
    0x44, 0xAE, 0x42, 0x60, 0x82,
];

/// RIFF/WAVE header with an empty data chunk.
const SILENT_WAV: &[u8] = &[
    0x52, 0x49, 0x46, 0x46, 0x24, 0x00, 0x00, 0x00, 0x57, 0x41, 0x56, 0x45, 0x66, 0x6D, 0x74,
    0x20, 0x10, 0x00, 0x00, 0x00, 0x01, 0x00, 0x01, 0x00, 0xC0, 0x5D, 0x00, 0x00, 0x80, 0xBB,
    0x00, 0x00, 0x02, 0x00, 0x10, 0x00, 0x64, 0x61, 0x74, 0x61, 0x00, 0x00, 0x00, 0x00,
];

/// A scripted outcome for one mock call.
#[derive(Debug, Clone)]
pub enum MockReply<T> {
    Success(T),
    Failure { status: u16, message: String },
}

impl<T: Clone> MockReply<T> {
    fn to_result(&self) -> Result<T> {
        match self {
            MockReply::Success(value) => Ok(value.clone()),
            MockReply::Failure { status, message } => Err(Error::Provider {
                status: *status,
                message: message.clone(),
            }),
        }
    }
}

/// Clones share the same replies, inputs and counter.
#[derive(Clone)]
struct Script<T> {
    replies: Arc<Mutex<Vec<MockReply<T>>>>,
    received: Arc<Mutex<Vec<String>>>,
    call_count: Arc<Mutex<usize>>,
}

impl<T: Clone> Script<T> {
    fn new() -> Self {
        Self {
            replies: Arc::new(Mutex::new(Vec::new())),
            received: Arc::new(Mutex::new(Vec::new())),
            call_count: Arc::new(Mutex::new(0)),
        }
    }

    fn push(&self, reply: MockReply<T>) {
        self.replies.lock().unwrap().push(reply);
    }

    fn next(&self, input: &str, default: impl FnOnce() -> T) -> Result<T> {
        let mut count = self.call_count.lock().unwrap();
        *count += 1;
        self.received.lock().unwrap().push(input.to_string());

        let replies = self.replies.lock().unwrap();
        if replies.is_empty() {
            Ok(default())
        } else {
            let index = (*count - 1) % replies.len();
            replies[index].to_result()
        }
    }
}

macro_rules! impl_mock_builders {
    ($mock:ident, $output:ty) => {
        impl $mock {
            pub fn new() -> Self {
                Self {
                    script: Script::new(),
                }
            }

            pub fn with_response(self, response: impl Into<$output>) -> Self {
                self.script.push(MockReply::Success(response.into()));
                self
            }

            pub fn with_failure(self, status: u16, message: impl Into<String>) -> Self {
                self.script.push(MockReply::Failure {
                    status,
                    message: message.into(),
                });
                self
            }

            pub fn get_call_count(&self) -> usize {
                *self.script.call_count.lock().unwrap()
            }

            /// Prompt (or spoken text) of every call, oldest first.
            pub fn received_inputs(&self) -> Vec<String> {
                self.script.received.lock().unwrap().clone()
            }
        }

        impl Default for $mock {
            fn default() -> Self {
                Self::new()
            }
        }
    };
}

#[derive(Clone)]
pub struct MockTextClient {
    script: Script<String>,
}
impl_mock_builders!(MockTextClient, String);

#[async_trait]
impl TextGenerationService for MockTextClient {
    async fn try_generate_text(&self, request: &GenerationRequest) -> Result<String> {
        self.script.next(&request.prompt_text, || {
            format!("Mock response to: {}", request.prompt_text)
        })
    }
}

#[derive(Clone)]
pub struct MockImageGenerationClient {
    script: Script<String>,
}
impl_mock_builders!(MockImageGenerationClient, String);

#[async_trait]
impl ImageGenerationService for MockImageGenerationClient {
    async fn try_generate_image(&self, request: &ImageGenerationRequest) -> Result<String> {
        self.script.next(&request.generation.prompt_text, || {
            encoding::to_data_uri("image/png", &encoding::encode_base64(TINY_PNG))
        })
    }
}

#[derive(Clone)]
pub struct MockVisionClient {
    script: Script<String>,
}
impl_mock_builders!(MockVisionClient, String);

#[async_trait]
impl VisionService for MockVisionClient {
    async fn try_analyze_image(&self, request: &VisionRequest) -> Result<String> {
        self.script.next(&request.generation.prompt_text, || {
            format!(
                "Mock analysis of a {} byte {} image",
                request.image_bytes.len(),
                request.image_mime_type
            )
        })
    }
}

#[derive(Clone)]
pub struct MockAudioClient {
    script: Script<Vec<u8>>,
}
impl_mock_builders!(MockAudioClient, Vec<u8>);

#[async_trait]
impl AudioGenerationService for MockAudioClient {
    async fn try_generate_audio(&self, request: &AudioGenerationRequest) -> Result<Vec<u8>> {
        self.script.next(&request.text, || SILENT_WAV.to_vec())
    }
}

#[derive(Clone)]
pub struct MockSpeechClient {
    script: Script<Vec<u8>>,
}
impl_mock_builders!(MockSpeechClient, Vec<u8>);

#[async_trait]
impl SpeechSynthesisService for MockSpeechClient {
    async fn try_synthesize(&self, request: &SpeechRequest) -> Result<Vec<u8>> {
        self.script.next(&request.text, || SILENT_WAV.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::GenerationResult;

    #[tokio::test]
    async fn test_mock_text_client_default_echoes_prompt() {
        let client = MockTextClient::new();
        let result = client
            .generate_text(&GenerationRequest::new("write a haiku", "k"))
            .await;
        assert_eq!(
            result,
            GenerationResult::Success("Mock response to: write a haiku".to_string())
        );
    }

    #[tokio::test]
    async fn test_mock_text_client_custom_responses_cycle() {
        let client = MockTextClient::new()
            .with_response("first")
            .with_response("second");
        let request = GenerationRequest::new("p", "k");

        assert_eq!(client.try_generate_text(&request).await.unwrap(), "first");
        assert_eq!(client.try_generate_text(&request).await.unwrap(), "second");
        // Should cycle back
        assert_eq!(client.try_generate_text(&request).await.unwrap(), "first");
        assert_eq!(client.get_call_count(), 3);
    }

    #[tokio::test]
    async fn test_mock_failure_surfaces_message() {
        let client = MockAudioClient::new().with_failure(500, "speaker unavailable");
        let result = client
            .generate_audio(&AudioGenerationRequest::new("hello", "k"))
            .await;
        assert_eq!(result, GenerationResult::failure("speaker unavailable"));
        assert_eq!(client.received_inputs(), vec!["hello".to_string()]);
    }

    #[tokio::test]
    async fn test_mock_image_default_is_png_data_uri() {
        let client = MockImageGenerationClient::new();
        let data_uri = client
            .try_generate_image(&ImageGenerationRequest::new("cat", "k"))
            .await
            .unwrap();
        assert_eq!(
            encoding::decode_data_uri(&data_uri).unwrap(),
            TINY_PNG.to_vec()
        );
    }
}
