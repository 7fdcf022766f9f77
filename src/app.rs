//! Tool orchestration: builds prompts, calls the adapters, and post-processes results.

use crate::ai::{
    AudioGenerationService, GeminiAudioClient, GeminiImageClient, GeminiTextClient,
    GeminiVisionClient, ImageGenerationService, RapidApiSpeechClient, RetryPolicy,
    RetryingService, SpeechSynthesisService, TextGenerationService, VisionService,
};
use crate::credentials::CredentialStore;
use crate::models::{
    AudioGenerationRequest, Config, GenerationRequest, GenerationResult, ImageGenerationRequest,
    SpeechRequest, VisionRequest,
};
use crate::prompts::{
    self, AsteriskMode, ImageStyle, InvoiceItem, NarrativeStyle, SocialPlatform,
};
use crate::workspace::{WorkspaceItem, WorkspaceItemKind, WorkspaceStore};
use crate::{Error, Result};
use std::path::Path;
use tracing::{info, warn};

/// Box a service, wrapping it in the retry decorator when a policy is set.
macro_rules! maybe_retrying {
    ($service:expr, $policy:expr, $service_trait:ident) => {
        match $policy {
            Some(policy) => Box::new(RetryingService::new($service, policy.clone()))
                as Box<dyn $service_trait>,
            None => Box::new($service) as Box<dyn $service_trait>,
        }
    };
}

/// Inputs for the blog writer.
#[derive(Debug, Clone)]
pub struct BlogOptions {
    pub topic: String,
    pub word_count: u32,
    pub tone: String,
    pub audience: Option<String>,
    pub keywords: Option<String>,
}

impl BlogOptions {
    pub fn new(topic: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            word_count: 800,
            tone: "informative".to_string(),
            audience: None,
            keywords: None,
        }
    }
}

/// Inputs for the invoice creator.
#[derive(Debug, Clone)]
pub struct InvoiceOptions {
    pub business: String,
    pub client: String,
    pub number: String,
    pub date: String,
    pub items: Vec<InvoiceItem>,
}

impl InvoiceOptions {
    /// Numbered `INV-001` and dated today.
    pub fn new(business: impl Into<String>, client: impl Into<String>) -> Self {
        Self {
            business: business.into(),
            client: client.into(),
            number: "INV-001".to_string(),
            date: chrono::Utc::now().format("%Y-%m-%d").to_string(),
            items: Vec::new(),
        }
    }

    pub fn with_item(mut self, item: InvoiceItem) -> Self {
        self.items.push(item);
        self
    }
}

/// Regex generator output: the full answer plus the pattern line picked out of it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegexSuggestion {
    pub pattern: Option<String>,
    pub explanation: String,
}

/// Rewritten story text and the audio rendered from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Narration {
    pub script: String,
    pub audio: Vec<u8>,
}

pub struct App {
    text: Box<dyn TextGenerationService>,
    image_gen: Box<dyn ImageGenerationService>,
    vision: Box<dyn VisionService>,
    audio: Box<dyn AudioGenerationService>,
    speech: Option<Box<dyn SpeechSynthesisService>>,
    workspace: WorkspaceStore,
    credential: String,
}

/// Injectable service bundle used to construct [`App`] in tests/harnesses.
pub struct AppServices {
    pub text: Box<dyn TextGenerationService>,
    pub image_gen: Box<dyn ImageGenerationService>,
    pub vision: Box<dyn VisionService>,
    pub audio: Box<dyn AudioGenerationService>,
    pub speech: Option<Box<dyn SpeechSynthesisService>>,
}

fn rejected<T>(error: Error) -> GenerationResult<T> {
    GenerationResult::failure(error.failure_message())
}

fn require(value: &str, what: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::InvalidInput(format!("please enter {}", what)));
    }
    Ok(())
}

impl App {
    pub fn with_services(
        services: AppServices,
        workspace: WorkspaceStore,
        credential: impl Into<String>,
    ) -> Self {
        Self {
            text: services.text,
            image_gen: services.image_gen,
            vision: services.vision,
            audio: services.audio,
            speech: services.speech,
            workspace,
            credential: credential.into(),
        }
    }

    /// Construct an app from configuration, resolving the API key from the
    /// environment or the local credential store.
    pub fn new(config: &Config) -> Result<Self> {
        let credentials = CredentialStore::open(&config.data_dir)?;
        let (credential, source) = credentials.resolve(config)?;
        info!("Using Gemini API key from {:?}", source);

        // Reuse one HTTP connection pool across provider clients.
        let http_client = reqwest::Client::new();
        let base_url = config.gemini_base_url.clone();
        let timeout = config.request_timeout;

        let policy = (config.max_attempts > 1).then(|| RetryPolicy::new(config.max_attempts));
        if let Some(policy) = &policy {
            info!("Retrying failed calls up to {} attempts", policy.max_attempts);
        }

        info!("Text model: {}", config.text_model);
        let text = maybe_retrying!(
            GeminiTextClient::new_with_client(config.text_model.clone(), http_client.clone())
                .with_base_url(base_url.clone())
                .with_timeout(timeout),
            &policy,
            TextGenerationService
        );

        info!("Image model: {}", config.image_model);
        let image_gen = maybe_retrying!(
            GeminiImageClient::new_with_client(config.image_model.clone(), http_client.clone())
                .with_base_url(base_url.clone())
                .with_timeout(timeout),
            &policy,
            ImageGenerationService
        );

        info!("Vision model: {}", config.vision_model);
        let vision = maybe_retrying!(
            GeminiVisionClient::new_with_client(config.vision_model.clone(), http_client.clone())
                .with_base_url(base_url.clone())
                .with_timeout(timeout),
            &policy,
            VisionService
        );

        info!("Audio model: {}", config.audio_model);
        let audio = maybe_retrying!(
            GeminiAudioClient::new_with_client(config.audio_model.clone(), http_client.clone())
                .with_base_url(base_url)
                .with_timeout(timeout),
            &policy,
            AudioGenerationService
        );

        let speech = match &config.rapidapi_key {
            Some(key) => Some(maybe_retrying!(
                RapidApiSpeechClient::new_with_client(key.clone(), http_client),
                &policy,
                SpeechSynthesisService
            )),
            None => {
                info!("RAPIDAPI_KEY not set; text-to-speech falls back to Gemini audio");
                None
            }
        };

        Ok(Self::with_services(
            AppServices {
                text,
                image_gen,
                vision,
                audio,
                speech,
            },
            WorkspaceStore::open(&config.data_dir)?,
            credential,
        ))
    }

    pub fn workspace(&self) -> &WorkspaceStore {
        &self.workspace
    }

    /// Store a successful result; failures to save are logged, not fatal.
    pub fn save_to_workspace(
        &self,
        title: &str,
        kind: WorkspaceItemKind,
        content: &str,
        tool: &str,
    ) -> Option<WorkspaceItem> {
        match self.workspace.add(title, kind, content, tool) {
            Ok(item) => Some(item),
            Err(e) => {
                warn!("Could not save '{}' to workspace: {}", title, e);
                None
            }
        }
    }

    fn request(&self, prompt: String) -> GenerationRequest {
        GenerationRequest::new(prompt, self.credential.clone())
    }

    pub async fn write_blog(&self, options: &BlogOptions) -> GenerationResult<String> {
        if let Err(e) = require(&options.topic, "a blog topic") {
            return rejected(e);
        }

        info!(
            "Writing {}-word blog post about '{}'",
            options.word_count, options.topic
        );
        let prompt = prompts::blog_post(
            options.topic.trim(),
            options.word_count,
            &options.tone,
            options.audience.as_deref(),
            options.keywords.as_deref(),
        );
        self.text.generate_text(&self.request(prompt)).await
    }

    pub async fn explain_code(
        &self,
        code: &str,
        language: &str,
        level: &str,
    ) -> GenerationResult<String> {
        if let Err(e) = require(code, "some code to explain") {
            return rejected(e);
        }

        info!("Explaining {} code at {} level", language, level);
        let prompt = prompts::code_explanation(language, level, code);
        self.text.generate_text(&self.request(prompt)).await
    }

    pub async fn solve_math(
        &self,
        problem: &str,
        math_type: &str,
        steps: &str,
    ) -> GenerationResult<String> {
        if let Err(e) = require(problem, "a math problem") {
            return rejected(e);
        }

        info!("Solving {} problem", math_type);
        let request = self
            .request(prompts::math_solution(problem.trim(), math_type, steps))
            .with_system_instruction(prompts::math_system_instruction());

        self.text
            .generate_text(&request)
            .await
            .map(|solution| prompts::clean_markdown(&solution, AsteriskMode::Remove))
    }

    pub async fn fix_grammar(&self, text: &str) -> GenerationResult<String> {
        if let Err(e) = require(text, "some text to correct") {
            return rejected(e);
        }

        info!("Fixing grammar ({} chars)", text.len());
        self.text
            .generate_text(&self.request(prompts::grammar_fix(text)))
            .await
    }

    pub async fn summarize_video(
        &self,
        url: &str,
        length: &str,
        format: &str,
    ) -> GenerationResult<String> {
        if let Err(e) = require(url, "a YouTube video URL") {
            return rejected(e);
        }
        if !prompts::is_youtube_url(url) {
            return rejected(Error::InvalidInput(format!(
                "'{}' is not a YouTube URL",
                url
            )));
        }

        info!("Summarizing video {}", url);
        self.text
            .generate_text(&self.request(prompts::video_summary(url.trim(), length, format)))
            .await
            .map(|summary| prompts::clean_markdown(&summary, AsteriskMode::Dash))
    }

    async fn generate_cleaned(
        &self,
        prompt: String,
        mode: Option<AsteriskMode>,
    ) -> GenerationResult<String> {
        let result = self.text.generate_text(&self.request(prompt)).await;
        match mode {
            Some(mode) => result.map(|text| prompts::clean_markdown(&text, mode)),
            None => result,
        }
    }

    pub async fn validate_idea(
        &self,
        title: &str,
        description: &str,
        industry: Option<&str>,
        target_market: Option<&str>,
    ) -> GenerationResult<String> {
        if let Err(e) = require(title, "an idea title")
            .and_then(|_| require(description, "an idea description"))
        {
            return rejected(e);
        }

        info!("Validating business idea '{}'", title.trim());
        let prompt =
            prompts::idea_validation(title.trim(), description.trim(), industry, target_market);
        self.generate_cleaned(prompt, Some(AsteriskMode::Dash)).await
    }

    pub async fn create_invoice(&self, options: &InvoiceOptions) -> GenerationResult<String> {
        if let Err(e) = require(&options.business, "a business name")
            .and_then(|_| require(&options.client, "a client name"))
        {
            return rejected(e);
        }
        if options.items.is_empty() {
            return rejected(Error::InvalidInput("please add at least one item".to_string()));
        }
        if options
            .items
            .iter()
            .any(|item| item.description.trim().is_empty())
        {
            return rejected(Error::InvalidInput(
                "please fill in all item descriptions".to_string(),
            ));
        }

        info!(
            "Creating invoice {} for {} ({} items)",
            options.number,
            options.client,
            options.items.len()
        );
        let prompt = prompts::invoice(
            options.business.trim(),
            options.client.trim(),
            &options.number,
            &options.date,
            &options.items,
        );
        self.generate_cleaned(prompt, Some(AsteriskMode::Remove)).await
    }

    pub async fn write_social_post(
        &self,
        topic: &str,
        platform: SocialPlatform,
        tone: &str,
        audience: Option<&str>,
    ) -> GenerationResult<String> {
        if let Err(e) = require(topic, "a topic for the post") {
            return rejected(e);
        }

        info!("Writing {} post about '{}'", platform, topic.trim());
        let prompt = prompts::social_post(topic.trim(), platform, tone, audience);
        self.generate_cleaned(prompt, Some(AsteriskMode::Remove)).await
    }

    /// Diagnose an error from its message, the offending code, or both.
    pub async fn fix_error(
        &self,
        language: &str,
        error_message: Option<&str>,
        code: Option<&str>,
    ) -> GenerationResult<String> {
        let blank = |value: Option<&str>| value.map_or(true, |v| v.trim().is_empty());
        if blank(error_message) && blank(code) {
            return rejected(Error::InvalidInput(
                "please provide an error message or a code snippet".to_string(),
            ));
        }

        info!("Diagnosing {} error", language);
        let prompt = prompts::error_fix(language, error_message, code);
        self.generate_cleaned(prompt, Some(AsteriskMode::Remove)).await
    }

    pub async fn generate_regex(&self, description: &str) -> GenerationResult<RegexSuggestion> {
        if let Err(e) = require(description, "what the regex should match") {
            return rejected(e);
        }

        info!("Generating regex for '{}'", description.trim());
        self.generate_cleaned(
            prompts::regex_request(description.trim()),
            Some(AsteriskMode::Remove),
        )
        .await
        .map(|explanation| RegexSuggestion {
            pattern: prompts::find_regex_line(&explanation),
            explanation,
        })
    }

    pub async fn help_with_homework(
        &self,
        question: &str,
        subject: Option<&str>,
        grade: Option<&str>,
    ) -> GenerationResult<String> {
        if let Err(e) = require(question, "a homework question") {
            return rejected(e);
        }

        info!("Helping with {} homework", subject.unwrap_or("academic"));
        let prompt = prompts::homework_help(question.trim(), subject, grade);
        self.generate_cleaned(prompt, Some(AsteriskMode::Dash)).await
    }

    pub async fn notes_to_mind_map(&self, notes: &str) -> GenerationResult<String> {
        if let Err(e) = require(notes, "some notes") {
            return rejected(e);
        }

        info!("Building mind map ({} chars of notes)", notes.len());
        self.generate_cleaned(prompts::mind_map(notes.trim()), None)
            .await
    }

    /// Answer a question using only the given document text as context.
    pub async fn ask_document(&self, document: &str, question: &str) -> GenerationResult<String> {
        if let Err(e) = require(document, "a document")
            .and_then(|_| require(question, "a question"))
        {
            return rejected(e);
        }

        info!(
            "Answering question about document ({} chars)",
            document.len()
        );
        self.generate_cleaned(prompts::document_answer(document, question.trim()), None)
            .await
    }

    pub async fn write_resume(
        &self,
        job_title: &str,
        experience: &str,
        skills: &str,
        style: &str,
    ) -> GenerationResult<String> {
        if let Err(e) = require(job_title, "a job title")
            .and_then(|_| require(experience, "your experience"))
        {
            return rejected(e);
        }

        info!("Writing {} resume for '{}'", style, job_title.trim());
        let prompt = prompts::resume(job_title.trim(), experience.trim(), skills.trim(), style);
        self.generate_cleaned(prompt, None).await
    }

    async fn analyze_file(&self, prompt: String, image_path: &Path) -> GenerationResult<String> {
        let request = match VisionRequest::from_file(self.request(prompt), image_path).await {
            Ok(request) => request,
            Err(e) => return rejected(e),
        };

        info!(
            "Analyzing {} ({} bytes)",
            image_path.display(),
            request.image_bytes.len()
        );
        self.vision.analyze_image(&request).await
    }

    pub async fn extract_text(&self, image_path: &Path) -> GenerationResult<String> {
        self.analyze_file(prompts::ocr(), image_path).await
    }

    pub async fn describe_image(&self, image_path: &Path) -> GenerationResult<String> {
        self.analyze_file(prompts::object_description(), image_path)
            .await
    }

    /// Returns a `data:image/png;base64,...` URI.
    pub async fn generate_image(&self, prompt: &str, style: ImageStyle) -> GenerationResult<String> {
        if let Err(e) = require(prompt, "an image description") {
            return rejected(e);
        }

        let prompt = prompts::styled_image_prompt(prompt, style);
        info!("Generating image: {}", prompt);
        self.image_gen
            .generate_image(&ImageGenerationRequest::new(prompt, self.credential.clone()))
            .await
    }

    /// Gemini speech with a prebuilt voice.
    pub async fn speak(&self, text: &str, voice: Option<&str>) -> GenerationResult<Vec<u8>> {
        if let Err(e) = require(text, "some text to speak") {
            return rejected(e);
        }

        let mut request = AudioGenerationRequest::new(text.trim(), self.credential.clone());
        if let Some(voice) = voice {
            request = request.with_voice(voice);
        }

        info!("Generating audio with voice {}", request.voice_name);
        self.audio.generate_audio(&request).await
    }

    /// Standalone text-to-speech; uses Gemini audio when no speech provider is configured.
    pub async fn text_to_speech(
        &self,
        text: &str,
        lang: &str,
        speed: &str,
    ) -> GenerationResult<Vec<u8>> {
        if let Err(e) = require(text, "some text to convert") {
            return rejected(e);
        }

        match &self.speech {
            Some(speech) => {
                info!("Synthesizing speech ({} chars, {})", text.len(), lang);
                speech
                    .synthesize(
                        &SpeechRequest::new(text.trim())
                            .with_lang(lang)
                            .with_speed(speed),
                    )
                    .await
            }
            None => self.speak(text, None).await,
        }
    }

    /// Rewrite a story for narration, then voice it.
    pub async fn narrate(
        &self,
        story: &str,
        style: NarrativeStyle,
        lang: &str,
    ) -> GenerationResult<Narration> {
        if let Err(e) = require(story, "a story") {
            return rejected(e);
        }

        info!("Preparing {} narration", style);
        let script = match self
            .text
            .generate_text(&self.request(prompts::narration(story.trim(), style)))
            .await
        {
            GenerationResult::Success(text) => prompts::clean_markdown(&text, AsteriskMode::Remove),
            GenerationResult::Failure { message } => {
                return GenerationResult::Failure { message };
            }
        };

        self.text_to_speech(&script, lang, "normal")
            .await
            .map(|audio| Narration { script, audio })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::{
        MockAudioClient, MockImageGenerationClient, MockSpeechClient, MockTextClient,
        MockVisionClient,
    };
    use tempfile::TempDir;

    fn app_with_text(text: MockTextClient, dir: &TempDir) -> App {
        App::with_services(
            AppServices {
                text: Box::new(text),
                image_gen: Box::new(MockImageGenerationClient::new()),
                vision: Box::new(MockVisionClient::new()),
                audio: Box::new(MockAudioClient::new()),
                speech: None,
            },
            WorkspaceStore::open(dir.path()).unwrap(),
            "test-key",
        )
    }

    #[test]
    fn test_blog_options_defaults() {
        let options = BlogOptions::new("Rust");
        assert_eq!(options.word_count, 800);
        assert_eq!(options.tone, "informative");
    }

    #[tokio::test]
    async fn test_empty_input_fails_without_calling_service() {
        let dir = TempDir::new().unwrap();
        let app = app_with_text(MockTextClient::new(), &dir);

        let result = app.fix_grammar("   ").await;
        assert_eq!(
            result.failure_message(),
            Some("Invalid input: please enter some text to correct")
        );
    }

    #[tokio::test]
    async fn test_summarize_video_rejects_non_youtube_url() {
        let dir = TempDir::new().unwrap();
        let app = app_with_text(MockTextClient::new(), &dir);

        let result = app
            .summarize_video("https://vimeo.com/1", "short", "bullet")
            .await;
        assert!(!result.is_success());
    }

    #[tokio::test]
    async fn test_summary_asterisks_become_dashes() {
        let dir = TempDir::new().unwrap();
        let app = app_with_text(
            MockTextClient::new().with_response("**Key points**\n* one\n* two"),
            &dir,
        );

        let result = app
            .summarize_video("https://youtu.be/abc", "short", "bullet")
            .await;
        assert_eq!(
            result,
            GenerationResult::Success("Key points\n- one\n- two".to_string())
        );
    }

    #[tokio::test]
    async fn test_invoice_requires_described_items() {
        let dir = TempDir::new().unwrap();
        let text = MockTextClient::new();
        let app = app_with_text(text, &dir);

        let empty = app.create_invoice(&InvoiceOptions::new("Acme", "Globex")).await;
        assert_eq!(
            empty.failure_message(),
            Some("Invalid input: please add at least one item")
        );

        let blank_item = InvoiceOptions::new("Acme", "Globex").with_item(InvoiceItem::new(" ", 1, 5.0));
        assert!(!app.create_invoice(&blank_item).await.is_success());

        let no_client = InvoiceOptions::new("Acme", "").with_item(InvoiceItem::new("Design", 1, 5.0));
        assert_eq!(
            app.create_invoice(&no_client).await.failure_message(),
            Some("Invalid input: please enter a client name")
        );
    }

    #[tokio::test]
    async fn test_invoice_prompt_and_cleanup() {
        let dir = TempDir::new().unwrap();
        let text = MockTextClient::new().with_response("**INVOICE**\n* Design: $300.00");
        let app = app_with_text(text.clone(), &dir);

        let mut options =
            InvoiceOptions::new("Acme", "Globex").with_item(InvoiceItem::new("Design", 2, 150.0));
        options.date = "2026-01-31".to_string();

        let invoice = app.create_invoice(&options).await;
        assert_eq!(
            invoice,
            GenerationResult::Success("INVOICE\n Design: $300.00".to_string())
        );
        let sent = text.received_inputs();
        assert!(sent[0].contains("Date: 2026-01-31"));
        assert!(sent[0].contains("Total Amount: $300.00"));
    }

    #[tokio::test]
    async fn test_fix_error_needs_message_or_code() {
        let dir = TempDir::new().unwrap();
        let text = MockTextClient::new().with_response("Use *as_str()*");
        let app = app_with_text(text.clone(), &dir);

        let nothing = app.fix_error("rust", Some("  "), None).await;
        assert!(!nothing.is_success());
        assert_eq!(text.get_call_count(), 0);

        let fixed = app.fix_error("rust", None, Some("let s: &str = String::new();")).await;
        assert_eq!(fixed, GenerationResult::Success("Use as_str()".to_string()));
    }

    #[tokio::test]
    async fn test_regex_pattern_is_picked_from_answer() {
        let dir = TempDir::new().unwrap();
        let app = app_with_text(
            MockTextClient::new().with_response("**Pattern**\n^\\d{5}$\nMatches five digits."),
            &dir,
        );

        let suggestion = app.generate_regex("US zip codes").await.success().unwrap();
        assert_eq!(suggestion.pattern.as_deref(), Some("^\\d{5}$"));
        assert!(suggestion.explanation.starts_with("Pattern\n"));
    }

    #[tokio::test]
    async fn test_homework_dashes_and_mind_map_left_as_is() {
        let dir = TempDir::new().unwrap();
        let app = app_with_text(
            MockTextClient::new()
                .with_response("* Step one")
                .with_response("* Cells\n  * Nucleus"),
            &dir,
        );

        let help = app
            .help_with_homework("why is the sky blue?", Some("physics"), None)
            .await;
        assert_eq!(help, GenerationResult::Success("- Step one".to_string()));

        let map = app.notes_to_mind_map("cells have a nucleus").await;
        assert_eq!(
            map,
            GenerationResult::Success("* Cells\n  * Nucleus".to_string())
        );
    }

    #[tokio::test]
    async fn test_document_question_and_resume_validation() {
        let dir = TempDir::new().unwrap();
        let app = app_with_text(MockTextClient::new(), &dir);

        assert!(!app.ask_document("", "what is this?").await.is_success());
        assert!(!app.ask_document("Some text", " ").await.is_success());
        assert_eq!(
            app.write_resume("Engineer", "", "Rust", "modern")
                .await
                .failure_message(),
            Some("Invalid input: please enter your experience")
        );
        assert!(app
            .validate_idea("", "a description", None, None)
            .await
            .failure_message()
            .is_some());
        assert!(!app
            .write_social_post(" ", SocialPlatform::Twitter, "casual", None)
            .await
            .is_success());
    }

    #[tokio::test]
    async fn test_narration_without_speech_provider_uses_gemini_audio() {
        let dir = TempDir::new().unwrap();
        let app = App::with_services(
            AppServices {
                text: Box::new(MockTextClient::new().with_response("*Once* upon a time.")),
                image_gen: Box::new(MockImageGenerationClient::new()),
                vision: Box::new(MockVisionClient::new()),
                audio: Box::new(MockAudioClient::new().with_response(vec![1u8, 2, 3])),
                speech: None,
            },
            WorkspaceStore::open(dir.path()).unwrap(),
            "test-key",
        );

        let narration = app
            .narrate("once upon a time", NarrativeStyle::Calm, "en")
            .await
            .success()
            .unwrap();
        assert_eq!(narration.script, "Once upon a time.");
        assert_eq!(narration.audio, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_text_to_speech_prefers_speech_provider() {
        let dir = TempDir::new().unwrap();
        let app = App::with_services(
            AppServices {
                text: Box::new(MockTextClient::new()),
                image_gen: Box::new(MockImageGenerationClient::new()),
                vision: Box::new(MockVisionClient::new()),
                audio: Box::new(MockAudioClient::new().with_failure(500, "should not be used")),
                speech: Some(Box::new(MockSpeechClient::new().with_response(vec![9u8]))),
            },
            WorkspaceStore::open(dir.path()).unwrap(),
            "test-key",
        );

        let result = app.text_to_speech("hello", "en", "normal").await;
        assert_eq!(result, GenerationResult::Success(vec![9]));
    }

    #[tokio::test]
    async fn test_narration_stops_on_text_failure() {
        let dir = TempDir::new().unwrap();
        let app = app_with_text(MockTextClient::new().with_failure(403, "invalid key"), &dir);

        let result = app.narrate("a story", NarrativeStyle::Dramatic, "en").await;
        assert_eq!(result.failure_message(), Some("invalid key"));
    }
}
