//! Generation adapters for the external AI providers
//!
//! One trait per modality. Implementors provide the single-attempt `try_*`
//! call; the provided `generate_*` method collapses its error into a
//! [`GenerationResult`] so call sites only branch on success or failure.

pub mod encoding;
pub mod gemini;
pub mod mime;
pub mod mock;
pub mod retry;
pub mod speech;

pub use gemini::{GeminiAudioClient, GeminiImageClient, GeminiTextClient, GeminiVisionClient};
pub use mock::{
    MockAudioClient, MockImageGenerationClient, MockReply, MockSpeechClient, MockTextClient,
    MockVisionClient,
};
pub use retry::{RetryPolicy, RetryingService};
pub use speech::RapidApiSpeechClient;

use crate::models::{
    AudioGenerationRequest, GenerationRequest, GenerationResult, ImageGenerationRequest,
    SpeechRequest, VisionRequest,
};
use crate::Result;
use async_trait::async_trait;

#[async_trait]
pub trait TextGenerationService: Send + Sync {
    async fn try_generate_text(&self, request: &GenerationRequest) -> Result<String>;

    async fn generate_text(&self, request: &GenerationRequest) -> GenerationResult<String> {
        self.try_generate_text(request).await.into()
    }
}

/// Produces an image and returns it as a `data:image/png;base64,...` URI.
#[async_trait]
pub trait ImageGenerationService: Send + Sync {
    async fn try_generate_image(&self, request: &ImageGenerationRequest) -> Result<String>;

    async fn generate_image(&self, request: &ImageGenerationRequest) -> GenerationResult<String> {
        self.try_generate_image(request).await.into()
    }
}

#[async_trait]
pub trait VisionService: Send + Sync {
    async fn try_analyze_image(&self, request: &VisionRequest) -> Result<String>;

    async fn analyze_image(&self, request: &VisionRequest) -> GenerationResult<String> {
        self.try_analyze_image(request).await.into()
    }
}

/// Produces raw audio bytes; wrapping them for playback is the caller's job.
#[async_trait]
pub trait AudioGenerationService: Send + Sync {
    async fn try_generate_audio(&self, request: &AudioGenerationRequest) -> Result<Vec<u8>>;

    async fn generate_audio(&self, request: &AudioGenerationRequest) -> GenerationResult<Vec<u8>> {
        self.try_generate_audio(request).await.into()
    }
}

#[async_trait]
pub trait SpeechSynthesisService: Send + Sync {
    async fn try_synthesize(&self, request: &SpeechRequest) -> Result<Vec<u8>>;

    async fn synthesize(&self, request: &SpeechRequest) -> GenerationResult<Vec<u8>> {
        self.try_synthesize(request).await.into()
    }
}
