//! Prompt templates for each tool, plus the clean-up applied to returned text.

use crate::Error;
use clap::ValueEnum;
use std::fmt;
use std::str::FromStr;

pub const BLOG_WRITER: &str = include_str!("../data/prompts/blog_writer.txt");
pub const CODE_EXPLAINER: &str = include_str!("../data/prompts/code_explainer.txt");
pub const MATH_SOLVER_SYSTEM: &str = include_str!("../data/prompts/math_solver_system.txt");
pub const MATH_SOLVER: &str = include_str!("../data/prompts/math_solver.txt");
pub const GRAMMAR_FIXER: &str = include_str!("../data/prompts/grammar_fixer.txt");
pub const YOUTUBE_SUMMARIZER: &str = include_str!("../data/prompts/youtube_summarizer.txt");
pub const OCR: &str = include_str!("../data/prompts/ocr.txt");
pub const OBJECT_DESCRIBER: &str = include_str!("../data/prompts/object_describer.txt");
pub const STORY_NARRATOR: &str = include_str!("../data/prompts/story_narrator.txt");
pub const IDEA_VALIDATOR: &str = include_str!("../data/prompts/idea_validator.txt");
pub const INVOICE_CREATOR: &str = include_str!("../data/prompts/invoice_creator.txt");
pub const SOCIAL_POST: &str = include_str!("../data/prompts/social_post.txt");
pub const ERROR_FIXER: &str = include_str!("../data/prompts/error_fixer.txt");
pub const REGEX_GENERATOR: &str = include_str!("../data/prompts/regex_generator.txt");
pub const HOMEWORK_ASSISTANT: &str = include_str!("../data/prompts/homework_assistant.txt");
pub const MIND_MAP: &str = include_str!("../data/prompts/mind_map.txt");
pub const DOCUMENT_CHAT: &str = include_str!("../data/prompts/document_chat.txt");
pub const RESUME_WRITER: &str = include_str!("../data/prompts/resume_writer.txt");

/// Replace `{{key}}` placeholders in a template string.
pub fn render(template: &str, vars: &[(&str, &str)]) -> String {
    let mut result = template.to_string();
    for (key, value) in vars {
        result = result.replace(&format!("{{{{{}}}}}", key), value);
    }
    result
}

fn render_trimmed(template: &str, vars: &[(&str, &str)]) -> String {
    render(template, vars).trim().to_string()
}

pub fn blog_post(
    topic: &str,
    word_count: u32,
    tone: &str,
    audience: Option<&str>,
    keywords: Option<&str>,
) -> String {
    let audience = audience
        .filter(|a| !a.trim().is_empty())
        .map(|a| format!(" Target audience: {}.", a.trim()))
        .unwrap_or_default();
    let keywords = keywords
        .filter(|k| !k.trim().is_empty())
        .map(|k| format!(" Include these keywords naturally: {}.", k.trim()))
        .unwrap_or_default();

    render_trimmed(
        BLOG_WRITER,
        &[
            ("word_count", &word_count.to_string()),
            ("tone", tone),
            ("audience", &audience),
            ("keywords", &keywords),
            ("topic", topic),
        ],
    )
}

pub fn code_explanation(language: &str, level: &str, code: &str) -> String {
    render_trimmed(
        CODE_EXPLAINER,
        &[("language", language), ("level", level), ("code", code)],
    )
}

pub fn math_solution(problem: &str, math_type: &str, steps: &str) -> String {
    render_trimmed(
        MATH_SOLVER,
        &[
            ("math_type", math_type),
            ("steps", steps),
            ("problem", problem),
        ],
    )
}

pub fn math_system_instruction() -> String {
    MATH_SOLVER_SYSTEM.trim().to_string()
}

pub fn grammar_fix(text: &str) -> String {
    render_trimmed(GRAMMAR_FIXER, &[("text", text)])
}

pub fn video_summary(url: &str, length: &str, format: &str) -> String {
    render_trimmed(
        YOUTUBE_SUMMARIZER,
        &[("length", length), ("format", format), ("url", url)],
    )
}

/// Loose check matching what the summarizer accepts: any youtube.com or youtu.be link.
pub fn is_youtube_url(url: &str) -> bool {
    url.contains("youtube.com") || url.contains("youtu.be")
}

pub fn ocr() -> String {
    OCR.trim().to_string()
}

pub fn object_description() -> String {
    OBJECT_DESCRIBER.trim().to_string()
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

pub fn idea_validation(
    title: &str,
    description: &str,
    industry: Option<&str>,
    target_market: Option<&str>,
) -> String {
    let mut details = String::new();
    if let Some(industry) = non_blank(industry) {
        details.push_str(&format!("Industry: {}\n", industry));
    }
    if let Some(market) = non_blank(target_market) {
        details.push_str(&format!("Target Market: {}\n", market));
    }

    render_trimmed(
        IDEA_VALIDATOR,
        &[
            ("title", title),
            ("description", description),
            ("details", &details),
        ],
    )
}

/// One billed line: `description`, `quantity` units at `rate` each.
#[derive(Debug, Clone, PartialEq)]
pub struct InvoiceItem {
    pub description: String,
    pub quantity: u32,
    pub rate: f64,
}

impl InvoiceItem {
    pub fn new(description: impl Into<String>, quantity: u32, rate: f64) -> Self {
        Self {
            description: description.into(),
            quantity,
            rate,
        }
    }

    pub fn amount(&self) -> f64 {
        f64::from(self.quantity) * self.rate
    }
}

impl fmt::Display for InvoiceItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - Qty: {} x ${:.2} = ${:.2}",
            self.description,
            self.quantity,
            self.rate,
            self.amount()
        )
    }
}

/// Parses `description:quantity:rate`, e.g. `Logo design:2:150`.
impl FromStr for InvoiceItem {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || {
            Error::InvalidInput(format!(
                "invoice item '{}' must look like description:quantity:rate",
                s
            ))
        };

        let mut fields = s.rsplitn(3, ':');
        let rate = fields.next().ok_or_else(invalid)?;
        let quantity = fields.next().ok_or_else(invalid)?;
        let description = fields.next().ok_or_else(invalid)?;

        let quantity: u32 = quantity.trim().parse().map_err(|_| invalid())?;
        let rate: f64 = rate.trim().parse().map_err(|_| invalid())?;
        if !rate.is_finite() || rate < 0.0 {
            return Err(invalid());
        }

        Ok(Self::new(description.trim(), quantity, rate))
    }
}

pub fn invoice_total(items: &[InvoiceItem]) -> f64 {
    items.iter().map(InvoiceItem::amount).sum()
}

pub fn invoice(
    business: &str,
    client: &str,
    number: &str,
    date: &str,
    items: &[InvoiceItem],
) -> String {
    let lines = items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n");

    render_trimmed(
        INVOICE_CREATOR,
        &[
            ("business", business),
            ("client", client),
            ("number", number),
            ("date", date),
            ("items", &lines),
            ("total", &format!("{:.2}", invoice_total(items))),
        ],
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum SocialPlatform {
    #[default]
    Instagram,
    Twitter,
    Facebook,
    Linkedin,
    Tiktok,
}

impl SocialPlatform {
    pub fn as_str(self) -> &'static str {
        match self {
            SocialPlatform::Instagram => "instagram",
            SocialPlatform::Twitter => "twitter",
            SocialPlatform::Facebook => "facebook",
            SocialPlatform::Linkedin => "linkedin",
            SocialPlatform::Tiktok => "tiktok",
        }
    }

    /// Post length limit, phrased for the prompt.
    pub fn limit(self) -> &'static str {
        match self {
            SocialPlatform::Instagram | SocialPlatform::Tiktok => "2,200 characters",
            SocialPlatform::Twitter => "280 characters",
            SocialPlatform::Facebook => "63,206 characters",
            SocialPlatform::Linkedin => "3,000 characters",
        }
    }
}

impl fmt::Display for SocialPlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

pub fn social_post(
    topic: &str,
    platform: SocialPlatform,
    tone: &str,
    audience: Option<&str>,
) -> String {
    let audience = non_blank(audience);
    let suffix = audience.map(|a| format!(" for {}", a)).unwrap_or_default();
    let line = audience
        .map(|a| format!("- Target audience: {}\n", a))
        .unwrap_or_default();

    render_trimmed(
        SOCIAL_POST,
        &[
            ("tone", tone),
            ("platform", platform.as_str()),
            ("audience_suffix", &suffix),
            ("topic", topic),
            ("limit", platform.limit()),
            ("audience_line", &line),
        ],
    )
}

pub fn error_fix(language: &str, error_message: Option<&str>, code: Option<&str>) -> String {
    let mut parts = Vec::new();
    if let Some(message) = non_blank(error_message) {
        parts.push(format!("Error Message: {}\n", message));
    }
    if let Some(code) = code.filter(|c| !c.trim().is_empty()) {
        parts.push(format!("Code Snippet:\n{}\n", code.trim_end()));
    }

    render_trimmed(
        ERROR_FIXER,
        &[("language", language), ("details", &parts.join("\n"))],
    )
}

pub fn regex_request(description: &str) -> String {
    render_trimmed(REGEX_GENERATOR, &[("description", description)])
}

/// First line that looks like a pattern (contains `/`, `^` or `\`).
pub fn find_regex_line(text: &str) -> Option<String> {
    text.lines()
        .find(|line| line.contains(['/', '^', '\\']))
        .map(|line| line.trim().to_string())
}

pub fn homework_help(question: &str, subject: Option<&str>, grade: Option<&str>) -> String {
    render_trimmed(
        HOMEWORK_ASSISTANT,
        &[
            ("subject", non_blank(subject).unwrap_or("academic")),
            ("grade", non_blank(grade).unwrap_or("student")),
            ("question", question),
        ],
    )
}

pub fn mind_map(notes: &str) -> String {
    render_trimmed(MIND_MAP, &[("notes", notes)])
}

pub fn document_answer(document: &str, question: &str) -> String {
    render_trimmed(
        DOCUMENT_CHAT,
        &[("question", question), ("document", document)],
    )
}

pub fn resume(job_title: &str, experience: &str, skills: &str, style: &str) -> String {
    render_trimmed(
        RESUME_WRITER,
        &[
            ("style", style),
            ("job_title", job_title),
            ("experience", experience),
            ("skills", skills),
        ],
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ImageStyle {
    #[default]
    Realistic,
    Artistic,
    Cartoon,
    DigitalArt,
    Vintage,
    Minimalist,
}

impl ImageStyle {
    pub fn modifier(self) -> &'static str {
        match self {
            ImageStyle::Realistic => ", photorealistic, high quality, detailed",
            ImageStyle::Artistic => ", artistic style, creative, expressive",
            ImageStyle::Cartoon => ", cartoon style, animated, colorful",
            ImageStyle::DigitalArt => ", digital art, concept art, futuristic",
            ImageStyle::Vintage => ", vintage style, retro, classic",
            ImageStyle::Minimalist => ", minimalist, clean, simple, modern",
        }
    }
}

pub fn styled_image_prompt(prompt: &str, style: ImageStyle) -> String {
    format!("{}{}", prompt.trim(), style.modifier())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum NarrativeStyle {
    #[default]
    Dramatic,
    Calm,
    Exciting,
    Mysterious,
    Cheerful,
}

impl NarrativeStyle {
    pub fn as_str(self) -> &'static str {
        match self {
            NarrativeStyle::Dramatic => "dramatic",
            NarrativeStyle::Calm => "calm",
            NarrativeStyle::Exciting => "exciting",
            NarrativeStyle::Mysterious => "mysterious",
            NarrativeStyle::Cheerful => "cheerful",
        }
    }

    pub fn guidelines(self) -> &'static str {
        match self {
            NarrativeStyle::Dramatic => {
                "- Add tension and emotional depth\n- Use varied pacing\n- Include dramatic pauses and emphasis"
            }
            NarrativeStyle::Calm => {
                "- Use soothing, gentle language\n- Create a peaceful, relaxing tone\n- Include meditative pacing"
            }
            NarrativeStyle::Exciting => {
                "- Build energy and enthusiasm\n- Use dynamic language\n- Create momentum and adventure"
            }
            NarrativeStyle::Mysterious => {
                "- Add intrigue and suspense\n- Use atmospheric descriptions\n- Build curiosity and wonder"
            }
            NarrativeStyle::Cheerful => {
                "- Use upbeat, positive language\n- Include joyful expressions\n- Create a happy, uplifting mood"
            }
        }
    }
}

impl fmt::Display for NarrativeStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

pub fn narration(story: &str, style: NarrativeStyle) -> String {
    render_trimmed(
        STORY_NARRATOR,
        &[
            ("style", style.as_str()),
            ("guidelines", style.guidelines()),
            ("story", story),
        ],
    )
}

/// What to do with single asterisks left over after bold markers are stripped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AsteriskMode {
    Remove,
    /// Turn `*` bullets into `-` bullets.
    Dash,
}

pub fn clean_markdown(text: &str, mode: AsteriskMode) -> String {
    let without_bold = text.replace("**", "");
    let cleaned = match mode {
        AsteriskMode::Remove => without_bold.replace('*', ""),
        AsteriskMode::Dash => without_bold.replace('*', "-"),
    };
    cleaned.trim().to_string()
}
