//! Data models and structures
//!
//! Request-scoped value objects passed to the generation adapters, the
//! normalized [`GenerationResult`] they return, and environment configuration.

use crate::ai::encoding;
use crate::error::Error;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_TEMPERATURE: f64 = 0.7;
pub const DEFAULT_TOP_K: u32 = 40;
pub const DEFAULT_TOP_P: f64 = 0.95;
pub const DEFAULT_MAX_OUTPUT_TOKENS: u32 = 8192;
pub const DEFAULT_VOICE_NAME: &str = "Aoede";

/// Sampling parameters forwarded in `generationConfig`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplingConfig {
    pub temperature: f64,
    pub top_p: f64,
    pub top_k: u32,
    pub max_output_tokens: u32,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            temperature: DEFAULT_TEMPERATURE,
            top_p: DEFAULT_TOP_P,
            top_k: DEFAULT_TOP_K,
            max_output_tokens: DEFAULT_MAX_OUTPUT_TOKENS,
        }
    }
}

/// A single text generation call.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub prompt_text: String,
    pub system_instruction: Option<String>,
    pub sampling: Option<SamplingConfig>,
    pub credential: String,
}

impl GenerationRequest {
    pub fn new(prompt_text: impl Into<String>, credential: impl Into<String>) -> Self {
        Self {
            prompt_text: prompt_text.into(),
            system_instruction: None,
            sampling: None,
            credential: credential.into(),
        }
    }

    pub fn with_system_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.system_instruction = Some(instruction.into());
        self
    }

    pub fn with_sampling(mut self, sampling: SamplingConfig) -> Self {
        self.sampling = Some(sampling);
        self
    }

    /// Sampling parameters with documented defaults applied.
    pub fn sampling_or_default(&self) -> SamplingConfig {
        self.sampling.unwrap_or_default()
    }

    /// Checks the caller-side invariants: non-empty prompt and credential.
    pub fn validate(&self) -> crate::Result<()> {
        if self.prompt_text.trim().is_empty() {
            return Err(Error::InvalidInput("prompt text is empty".to_string()));
        }
        if self.credential.trim().is_empty() {
            return Err(Error::InvalidInput("API key is missing".to_string()));
        }
        Ok(())
    }
}

/// Text prompt plus an image to analyze.
#[derive(Debug, Clone)]
pub struct VisionRequest {
    pub generation: GenerationRequest,
    pub image_bytes: Vec<u8>,
    pub image_mime_type: String,
}

impl VisionRequest {
    /// Build a request from raw image bytes, rejecting unsupported formats.
    pub fn new(
        generation: GenerationRequest,
        image_bytes: Vec<u8>,
        image_mime_type: impl Into<String>,
    ) -> crate::Result<Self> {
        let image_mime_type = image_mime_type.into();
        if !crate::ai::mime::is_accepted_image_mime(&image_mime_type) {
            return Err(Error::InvalidInput(format!(
                "unsupported image type: {}",
                image_mime_type
            )));
        }
        Ok(Self {
            generation,
            image_bytes,
            image_mime_type,
        })
    }

    /// Build a request from a `data:<mime>;base64,<payload>` string.
    pub fn from_data_uri(generation: GenerationRequest, data_uri: &str) -> crate::Result<Self> {
        let mime_type = encoding::data_uri_mime_type(data_uri)
            .ok_or_else(|| Error::InvalidInput("image is not a base64 data URI".to_string()))?;
        let bytes = encoding::decode_base64(encoding::strip_data_uri_prefix(data_uri))?;
        Self::new(generation, bytes, mime_type)
    }

    /// Read an image from disk, sniffing its MIME type from the content.
    pub async fn from_file(
        generation: GenerationRequest,
        path: impl AsRef<std::path::Path>,
    ) -> crate::Result<Self> {
        let data_uri = encoding::read_file_as_data_uri(path).await?;
        Self::from_data_uri(generation, &data_uri)
    }
}

/// Text prompt requesting mixed TEXT+IMAGE output.
#[derive(Debug, Clone)]
pub struct ImageGenerationRequest {
    pub generation: GenerationRequest,
}

impl ImageGenerationRequest {
    pub fn new(prompt_text: impl Into<String>, credential: impl Into<String>) -> Self {
        Self {
            generation: GenerationRequest::new(prompt_text, credential),
        }
    }
}

/// Text to be spoken by one of the provider's prebuilt voices.
#[derive(Debug, Clone)]
pub struct AudioGenerationRequest {
    pub text: String,
    pub voice_name: String,
    pub credential: String,
}

impl AudioGenerationRequest {
    pub fn new(text: impl Into<String>, credential: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            voice_name: DEFAULT_VOICE_NAME.to_string(),
            credential: credential.into(),
        }
    }

    pub fn with_voice(mut self, voice_name: impl Into<String>) -> Self {
        let voice_name = voice_name.into();
        if !voice_name.trim().is_empty() {
            self.voice_name = voice_name;
        }
        self
    }
}

/// Request for the standalone text-to-speech provider.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct SpeechRequest {
    pub text: String,
    pub lang: String,
    pub speed: String,
}

impl SpeechRequest {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            lang: "en".to_string(),
            speed: "normal".to_string(),
        }
    }

    pub fn with_lang(mut self, lang: impl Into<String>) -> Self {
        self.lang = lang.into();
        self
    }

    pub fn with_speed(mut self, speed: impl Into<String>) -> Self {
        self.speed = speed.into();
        self
    }
}

/// Normalized outcome of a single adapter call.
///
/// Callers branch only on success versus failure; the failure class is
/// already folded into `message`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationResult<T> {
    Success(T),
    Failure { message: String },
}

impl<T> GenerationResult<T> {
    pub fn failure(message: impl Into<String>) -> Self {
        GenerationResult::Failure {
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, GenerationResult::Success(_))
    }

    pub fn success(self) -> Option<T> {
        match self {
            GenerationResult::Success(value) => Some(value),
            GenerationResult::Failure { .. } => None,
        }
    }

    pub fn failure_message(&self) -> Option<&str> {
        match self {
            GenerationResult::Success(_) => None,
            GenerationResult::Failure { message } => Some(message),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> GenerationResult<U> {
        match self {
            GenerationResult::Success(value) => GenerationResult::Success(f(value)),
            GenerationResult::Failure { message } => GenerationResult::Failure { message },
        }
    }

    pub fn into_result(self) -> std::result::Result<T, String> {
        match self {
            GenerationResult::Success(value) => Ok(value),
            GenerationResult::Failure { message } => Err(message),
        }
    }
}

impl<T> From<crate::Result<T>> for GenerationResult<T> {
    fn from(result: crate::Result<T>) -> Self {
        match result {
            Ok(value) => GenerationResult::Success(value),
            Err(e) => GenerationResult::Failure {
                message: e.failure_message(),
            },
        }
    }
}

// Configuration
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_TEXT_MODEL: &str = "gemini-1.5-flash-latest";
pub const DEFAULT_IMAGE_MODEL: &str = "gemini-2.0-flash-preview-image-generation";
pub const DEFAULT_VISION_MODEL: &str = "gemini-1.5-flash-latest";
pub const DEFAULT_AUDIO_MODEL: &str = "gemini-2.5-flash-preview-tts";
pub const DEFAULT_MAX_ATTEMPTS: usize = 1;

#[derive(Debug, Clone)]
pub struct Config {
    pub gemini_api_key: Option<String>,
    pub gemini_base_url: String,
    pub text_model: String,
    pub image_model: String,
    pub vision_model: String,
    pub audio_model: String,
    pub rapidapi_key: Option<String>,
    pub data_dir: PathBuf,
    /// Total attempts per call; `1` disables the retry decorator.
    pub max_attempts: usize,
    pub request_timeout: Option<Duration>,
}

impl Config {
    pub fn from_env() -> crate::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> crate::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let max_attempts = match non_empty("AIWORX_MAX_ATTEMPTS") {
            Some(raw) => raw.trim().parse::<usize>().map_err(|_| {
                Error::Config(format!("AIWORX_MAX_ATTEMPTS must be a number, got '{}'", raw))
            })?,
            None => DEFAULT_MAX_ATTEMPTS,
        }
        .max(1);

        let request_timeout = match non_empty("AIWORX_TIMEOUT_SECS") {
            Some(raw) => Some(Duration::from_secs(raw.trim().parse::<u64>().map_err(
                |_| Error::Config(format!("AIWORX_TIMEOUT_SECS must be a number, got '{}'", raw)),
            )?)),
            None => None,
        };

        let data_dir = non_empty("AIWORX_DATA_DIR")
            .map(PathBuf::from)
            .or_else(|| dirs::data_local_dir().map(|dir| dir.join("aiworx")))
            .unwrap_or_else(|| PathBuf::from(".aiworx"));

        Ok(Self {
            gemini_api_key: non_empty("GEMINI_API_KEY"),
            gemini_base_url: non_empty("GEMINI_BASE_URL")
                .unwrap_or_else(|| DEFAULT_GEMINI_BASE_URL.to_string()),
            text_model: non_empty("AIWORX_TEXT_MODEL")
                .unwrap_or_else(|| DEFAULT_TEXT_MODEL.to_string()),
            image_model: non_empty("AIWORX_IMAGE_MODEL")
                .unwrap_or_else(|| DEFAULT_IMAGE_MODEL.to_string()),
            vision_model: non_empty("AIWORX_VISION_MODEL")
                .unwrap_or_else(|| DEFAULT_VISION_MODEL.to_string()),
            audio_model: non_empty("AIWORX_AUDIO_MODEL")
                .unwrap_or_else(|| DEFAULT_AUDIO_MODEL.to_string()),
            rapidapi_key: non_empty("RAPIDAPI_KEY"),
            data_dir,
            max_attempts,
            request_timeout,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_sampling_defaults() {
        let request = GenerationRequest::new("hello", "key");
        let sampling = request.sampling_or_default();
        assert_eq!(sampling.temperature, 0.7);
        assert_eq!(sampling.top_k, 40);
        assert_eq!(sampling.top_p, 0.95);
        assert_eq!(sampling.max_output_tokens, 8192);
    }

    #[test]
    fn test_validate_rejects_empty_prompt_and_key() {
        assert!(GenerationRequest::new("  ", "key").validate().is_err());
        assert!(GenerationRequest::new("hello", "").validate().is_err());
        assert!(GenerationRequest::new("hello", "key").validate().is_ok());
    }

    #[test]
    fn test_audio_request_keeps_default_voice_for_blank_name() {
        let request = AudioGenerationRequest::new("hi", "k").with_voice("");
        assert_eq!(request.voice_name, DEFAULT_VOICE_NAME);

        let request = AudioGenerationRequest::new("hi", "k").with_voice("Kore");
        assert_eq!(request.voice_name, "Kore");
    }

    #[test]
    fn test_vision_request_rejects_unsupported_mime() {
        let err = VisionRequest::new(GenerationRequest::new("p", "k"), vec![1, 2], "image/bmp")
            .unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn test_vision_request_from_data_uri_decodes_payload() {
        let request = VisionRequest::from_data_uri(
            GenerationRequest::new("p", "k"),
            "data:image/png;base64,iVBORw==",
        )
        .unwrap();
        assert_eq!(request.image_mime_type, "image/png");
        assert_eq!(request.image_bytes, vec![0x89, 0x50, 0x4E, 0x47]);
    }

    #[test]
    fn test_generation_result_from_error_uses_failure_message() {
        let result: GenerationResult<String> = Err(Error::Provider {
            status: 403,
            message: "invalid key".to_string(),
        })
        .into();
        assert_eq!(
            result,
            GenerationResult::Failure {
                message: "invalid key".to_string()
            }
        );
    }

    #[test]
    fn test_generation_result_map_preserves_failure() {
        let result: GenerationResult<u32> = GenerationResult::failure("boom");
        let mapped = result.map(|n| n + 1);
        assert_eq!(mapped.failure_message(), Some("boom"));
    }

    #[test]
    fn test_config_defaults() {
        let config = Config::from_lookup(lookup_from(&[("AIWORX_DATA_DIR", "/tmp/aiworx")]))
            .unwrap();
        assert!(config.gemini_api_key.is_none());
        assert_eq!(config.gemini_base_url, DEFAULT_GEMINI_BASE_URL);
        assert_eq!(config.text_model, DEFAULT_TEXT_MODEL);
        assert_eq!(config.audio_model, DEFAULT_AUDIO_MODEL);
        assert_eq!(config.max_attempts, 1);
        assert_eq!(config.data_dir, PathBuf::from("/tmp/aiworx"));
        assert!(config.request_timeout.is_none());
    }

    #[test]
    fn test_config_reads_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            ("GEMINI_API_KEY", "secret"),
            ("AIWORX_MAX_ATTEMPTS", "4"),
            ("AIWORX_TIMEOUT_SECS", "15"),
            ("AIWORX_IMAGE_MODEL", "custom-image"),
        ]))
        .unwrap();
        assert_eq!(config.gemini_api_key.as_deref(), Some("secret"));
        assert_eq!(config.max_attempts, 4);
        assert_eq!(config.request_timeout, Some(Duration::from_secs(15)));
        assert_eq!(config.image_model, "custom-image");
    }

    #[test]
    fn test_config_rejects_bad_attempt_count() {
        let err = Config::from_lookup(lookup_from(&[("AIWORX_MAX_ATTEMPTS", "lots")])).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
