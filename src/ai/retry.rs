//! Bounded retry with exponential backoff, applied as a decorator.
//!
//! The wrapped service still performs one logical call and yields one
//! result; only transport failures, 429 and 5xx responses are re-attempted.

use super::{
    AudioGenerationService, ImageGenerationService, SpeechSynthesisService,
    TextGenerationService, VisionService,
};
use crate::models::{
    AudioGenerationRequest, GenerationRequest, ImageGenerationRequest, SpeechRequest,
    VisionRequest,
};
use crate::{Error, Result};
use async_trait::async_trait;
use std::future::Future;
use std::time::Duration;
use tokio_retry::strategy::{jitter, ExponentialBackoff};
use tokio_retry::RetryIf;

#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts including the first one.
    pub max_attempts: usize,
    pub initial_delay: Duration,
    pub max_delay: Duration,
    pub jitter: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(10),
            jitter: true,
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: usize) -> Self {
        Self {
            max_attempts,
            ..Default::default()
        }
    }

    pub fn with_initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    pub fn with_max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    pub fn with_jitter(mut self, jitter: bool) -> Self {
        self.jitter = jitter;
        self
    }

    /// Delays slept between attempts: `initial_delay * 2^n`, capped.
    pub fn delays(&self) -> impl Iterator<Item = Duration> + Send {
        // ExponentialBackoff yields base^n * factor, starting at n = 1.
        let factor = (self.initial_delay.as_millis() as u64 / 2).max(1);
        let use_jitter = self.jitter;

        ExponentialBackoff::from_millis(2)
            .factor(factor)
            .max_delay(self.max_delay)
            .map(move |delay| if use_jitter { jitter(delay) } else { delay })
            .take(self.max_attempts.saturating_sub(1))
    }

    pub async fn run<T, F, Fut>(&self, operation_name: &str, operation: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        RetryIf::start(self.delays(), operation, |error: &Error| {
            let retry = error.is_retryable();
            if retry {
                tracing::warn!(
                    "{} attempt failed with retryable error: {}. Retrying...",
                    operation_name,
                    error
                );
            }
            retry
        })
        .await
    }
}

/// Wraps any generation service with a [`RetryPolicy`].
pub struct RetryingService<S> {
    inner: S,
    policy: RetryPolicy,
}

impl<S> RetryingService<S> {
    pub fn new(inner: S, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }
}

#[async_trait]
impl<S: TextGenerationService> TextGenerationService for RetryingService<S> {
    async fn try_generate_text(&self, request: &GenerationRequest) -> Result<String> {
        self.policy
            .run("Text generation", || self.inner.try_generate_text(request))
            .await
    }
}

#[async_trait]
impl<S: ImageGenerationService> ImageGenerationService for RetryingService<S> {
    async fn try_generate_image(&self, request: &ImageGenerationRequest) -> Result<String> {
        self.policy
            .run("Image generation", || self.inner.try_generate_image(request))
            .await
    }
}

#[async_trait]
impl<S: VisionService> VisionService for RetryingService<S> {
    async fn try_analyze_image(&self, request: &VisionRequest) -> Result<String> {
        self.policy
            .run("Image analysis", || self.inner.try_analyze_image(request))
            .await
    }
}

#[async_trait]
impl<S: AudioGenerationService> AudioGenerationService for RetryingService<S> {
    async fn try_generate_audio(&self, request: &AudioGenerationRequest) -> Result<Vec<u8>> {
        self.policy
            .run("Audio generation", || self.inner.try_generate_audio(request))
            .await
    }
}

#[async_trait]
impl<S: SpeechSynthesisService> SpeechSynthesisService for RetryingService<S> {
    async fn try_synthesize(&self, request: &SpeechRequest) -> Result<Vec<u8>> {
        self.policy
            .run("Speech synthesis", || self.inner.try_synthesize(request))
            .await
    }
}
