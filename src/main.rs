use aiworx::ai::encoding;
use aiworx::app::{App, BlogOptions, InvoiceOptions};
use aiworx::credentials::{self, CredentialStore};
use aiworx::models::{Config, GenerationResult};
use aiworx::prompts::{ImageStyle, InvoiceItem, NarrativeStyle, SocialPlatform};
use aiworx::workspace::{WorkspaceItemKind, WorkspaceStore};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

#[derive(Debug, Parser)]
#[command(name = "aiworx")]
#[command(about = "Writing, coding, vision and voice tools backed by Gemini")]
struct CliArgs {
    /// Save successful results to the workspace.
    #[arg(long, global = true)]
    save: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(flatten)]
    Tool(Tool),
    /// Manage the stored Gemini API key.
    Key {
        #[command(subcommand)]
        action: KeyAction,
    },
    /// Browse saved results.
    Workspace {
        #[command(subcommand)]
        action: WorkspaceAction,
    },
}

#[derive(Debug, Subcommand)]
enum Tool {
    /// Write an SEO-friendly blog post.
    Blog {
        topic: String,
        #[arg(long, default_value_t = 800)]
        words: u32,
        #[arg(long, default_value = "informative")]
        tone: String,
        #[arg(long)]
        audience: Option<String>,
        #[arg(long)]
        keywords: Option<String>,
    },
    /// Explain a snippet of code.
    ExplainCode {
        /// Code to explain; use --file to read it from disk instead.
        code: Option<String>,
        #[arg(long, conflicts_with = "code")]
        file: Option<PathBuf>,
        #[arg(long, default_value = "javascript")]
        language: String,
        #[arg(long, default_value = "beginner")]
        level: String,
    },
    /// Solve a math problem step by step.
    Math {
        problem: String,
        #[arg(long = "type", default_value = "algebra")]
        math_type: String,
        #[arg(long, default_value = "detailed")]
        steps: String,
    },
    /// Fix grammar, spelling and punctuation.
    Grammar { text: String },
    /// Summarize a YouTube video.
    Youtube {
        url: String,
        #[arg(long, default_value = "medium")]
        length: String,
        #[arg(long, default_value = "bullet")]
        format: String,
    },
    /// Extract text from an image.
    Ocr { image: PathBuf },
    /// Describe everything visible in an image.
    Describe { image: PathBuf },
    /// Generate an image from a description.
    Image {
        prompt: String,
        #[arg(long, value_enum, default_value_t = ImageStyle::Realistic)]
        style: ImageStyle,
        #[arg(long, default_value = "generated-image.png")]
        output: PathBuf,
    },
    /// Speak text with a Gemini prebuilt voice.
    Speak {
        text: String,
        #[arg(long)]
        voice: Option<String>,
        #[arg(long, default_value = "generated-audio.wav")]
        output: PathBuf,
    },
    /// Convert text to speech.
    Tts {
        text: String,
        #[arg(long, default_value = "en")]
        lang: String,
        #[arg(long, default_value = "normal")]
        speed: String,
        #[arg(long, default_value = "generated-speech.wav")]
        output: PathBuf,
    },
    /// Rewrite a story for narration and voice it.
    Narrate {
        story: String,
        #[arg(long, value_enum, default_value_t = NarrativeStyle::Dramatic)]
        style: NarrativeStyle,
        #[arg(long, default_value = "en")]
        lang: String,
        #[arg(long, default_value = "story-narration.wav")]
        output: PathBuf,
    },
    /// Analyze a business idea's market, risks and feasibility.
    Idea {
        title: String,
        description: String,
        #[arg(long)]
        industry: Option<String>,
        #[arg(long)]
        market: Option<String>,
    },
    /// Draft a professional invoice.
    Invoice {
        #[arg(long)]
        business: String,
        #[arg(long)]
        client: String,
        #[arg(long, default_value = "INV-001")]
        number: String,
        /// Line item as description:quantity:rate; repeat for more items.
        #[arg(long = "item", required = true)]
        items: Vec<InvoiceItem>,
    },
    /// Write a social media post.
    Social {
        topic: String,
        #[arg(long, value_enum, default_value_t = SocialPlatform::Instagram)]
        platform: SocialPlatform,
        #[arg(long, default_value = "professional")]
        tone: String,
        #[arg(long)]
        audience: Option<String>,
    },
    /// Explain and fix a programming error.
    FixError {
        #[arg(long)]
        error: Option<String>,
        #[arg(long)]
        code: Option<String>,
        #[arg(long, conflicts_with = "code")]
        file: Option<PathBuf>,
        #[arg(long, default_value = "javascript")]
        language: String,
    },
    /// Generate a regular expression from a description.
    Regex { description: String },
    /// Get guided help with a homework question.
    Homework {
        question: String,
        #[arg(long)]
        subject: Option<String>,
        #[arg(long)]
        grade: Option<String>,
    },
    /// Turn notes into a hierarchical mind map.
    MindMap { notes: String },
    /// Ask a question about a text document.
    Ask { document: PathBuf, question: String },
    /// Write a resume for a position.
    Resume {
        job_title: String,
        #[arg(long)]
        experience: String,
        #[arg(long, default_value = "")]
        skills: String,
        #[arg(long, default_value = "professional")]
        style: String,
    },
}

#[derive(Debug, Subcommand)]
enum KeyAction {
    Set { key: String },
    Show,
    Clear,
}

#[derive(Debug, Subcommand)]
enum WorkspaceAction {
    List {
        #[arg(long, value_enum)]
        kind: Option<WorkspaceItemKind>,
    },
    Search {
        query: String,
        #[arg(long, value_enum)]
        kind: Option<WorkspaceItemKind>,
    },
    Remove {
        id: Uuid,
    },
    Export {
        id: Uuid,
        #[arg(long, default_value = ".")]
        dir: PathBuf,
    },
    Stats,
}

/// Unwrap a success, or report the failure and exit non-zero.
fn expect_success<T>(result: GenerationResult<T>) -> T {
    match result {
        GenerationResult::Success(value) => value,
        GenerationResult::Failure { message } => {
            error!("Generation failed: {}", message);
            std::process::exit(1);
        }
    }
}

fn write_output(path: &Path, bytes: &[u8]) -> Result<()> {
    std::fs::write(path, bytes)
        .with_context(|| format!("failed to write {}", path.display()))?;
    info!("Saved {} bytes to {}", bytes.len(), path.display());
    Ok(())
}

fn run_key(config: &Config, action: KeyAction) -> Result<()> {
    let store = CredentialStore::open(&config.data_dir)?;
    match action {
        KeyAction::Set { key } => {
            store.set(&key)?;
            println!("API key saved");
        }
        KeyAction::Show => match store.resolve(config) {
            Ok((key, source)) => println!("{} (from {:?})", credentials::mask(&key), source),
            Err(_) => println!("No API key configured"),
        },
        KeyAction::Clear => {
            if store.clear()? {
                println!("API key removed");
            } else {
                println!("No stored API key");
            }
        }
    }
    Ok(())
}

fn run_workspace(config: &Config, action: WorkspaceAction) -> Result<()> {
    let store = WorkspaceStore::open(&config.data_dir)?;
    let print_items = |items: Vec<aiworx::workspace::WorkspaceItem>| {
        if items.is_empty() {
            println!("No results found");
        }
        for item in items {
            println!(
                "{}  {:<8}  {}  {}  ({})",
                item.id,
                item.kind,
                item.created_at.format("%Y-%m-%d %H:%M"),
                item.title,
                item.tool
            );
        }
    };

    match action {
        WorkspaceAction::List { kind } => print_items(store.search("", kind)?),
        WorkspaceAction::Search { query, kind } => print_items(store.search(&query, kind)?),
        WorkspaceAction::Remove { id } => {
            if store.remove(id)? {
                println!("Removed {}", id);
            } else {
                println!("No item with id {}", id);
            }
        }
        WorkspaceAction::Export { id, dir } => {
            let path = store.export(id, &dir)?;
            println!("{}", path.display());
        }
        WorkspaceAction::Stats => {
            for kind in WorkspaceItemKind::ALL {
                println!("{:<8} {}", kind, store.count_by_kind(kind)?);
            }
        }
    }
    Ok(())
}

async fn read_text(path: &Path) -> Result<String> {
    tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))
}

fn title_from(text: &str) -> String {
    let title: String = text.chars().take(50).collect();
    title.trim().to_string()
}

async fn run_tool(app: &App, tool: Tool, save: bool) -> Result<()> {
    let save_text = |title: &str, kind: WorkspaceItemKind, content: &str, tool: &str| {
        if save {
            app.save_to_workspace(title, kind, content, tool);
        }
    };

    match tool {
        Tool::Blog {
            topic,
            words,
            tone,
            audience,
            keywords,
        } => {
            let options = BlogOptions {
                topic: topic.clone(),
                word_count: words,
                tone,
                audience,
                keywords,
            };
            let post = expect_success(app.write_blog(&options).await);
            println!("{}", post);
            save_text(&topic, WorkspaceItemKind::Blog, &post, "blog-writer");
        }
        Tool::ExplainCode {
            code,
            file,
            language,
            level,
        } => {
            let code = match (code, file) {
                (Some(code), _) => code,
                (None, Some(path)) => read_text(&path).await?,
                (None, None) => anyhow::bail!("provide code or --file"),
            };
            let explanation = expect_success(app.explain_code(&code, &language, &level).await);
            println!("{}", explanation);
            save_text(
                &format!("{} explanation", language),
                WorkspaceItemKind::Code,
                &explanation,
                "code-explainer",
            );
        }
        Tool::Math {
            problem,
            math_type,
            steps,
        } => {
            let solution = expect_success(app.solve_math(&problem, &math_type, &steps).await);
            println!("{}", solution);
            save_text(
                &title_from(&problem),
                WorkspaceItemKind::Analysis,
                &solution,
                "math-solver",
            );
        }
        Tool::Grammar { text } => {
            let corrected = expect_success(app.fix_grammar(&text).await);
            println!("{}", corrected);
            save_text(
                &title_from(&text),
                WorkspaceItemKind::Blog,
                &corrected,
                "grammar-fixer",
            );
        }
        Tool::Youtube {
            url,
            length,
            format,
        } => {
            let summary = expect_success(app.summarize_video(&url, &length, &format).await);
            println!("{}", summary);
            save_text(&url, WorkspaceItemKind::Analysis, &summary, "youtube-summarizer");
        }
        Tool::Ocr { image } => {
            let text = expect_success(app.extract_text(&image).await);
            println!("{}", text);
            save_text(
                &format!("Text from {}", image.display()),
                WorkspaceItemKind::Analysis,
                &text,
                "ocr-reader",
            );
        }
        Tool::Describe { image } => {
            let description = expect_success(app.describe_image(&image).await);
            println!("{}", description);
            save_text(
                &format!("Description of {}", image.display()),
                WorkspaceItemKind::Analysis,
                &description,
                "object-describer",
            );
        }
        Tool::Image {
            prompt,
            style,
            output,
        } => {
            let data_uri = expect_success(app.generate_image(&prompt, style).await);
            write_output(&output, &encoding::decode_data_uri(&data_uri)?)?;
            save_text(
                &title_from(&prompt),
                WorkspaceItemKind::Image,
                &data_uri,
                "image-generator",
            );
        }
        Tool::Speak {
            text,
            voice,
            output,
        } => {
            let audio = expect_success(app.speak(&text, voice.as_deref()).await);
            write_output(&output, &audio)?;
            save_text(
                &title_from(&text),
                WorkspaceItemKind::Audio,
                &output.display().to_string(),
                "voice-generator",
            );
        }
        Tool::Tts {
            text,
            lang,
            speed,
            output,
        } => {
            let audio = expect_success(app.text_to_speech(&text, &lang, &speed).await);
            write_output(&output, &audio)?;
            save_text(
                &title_from(&text),
                WorkspaceItemKind::Audio,
                &output.display().to_string(),
                "text-to-speech",
            );
        }
        Tool::Narrate {
            story,
            style,
            lang,
            output,
        } => {
            let narration = expect_success(app.narrate(&story, style, &lang).await);
            println!("{}", narration.script);
            write_output(&output, &narration.audio)?;
            save_text(
                &title_from(&story),
                WorkspaceItemKind::Audio,
                &narration.script,
                "story-narrator",
            );
        }
        Tool::Idea {
            title,
            description,
            industry,
            market,
        } => {
            let validation = expect_success(
                app.validate_idea(&title, &description, industry.as_deref(), market.as_deref())
                    .await,
            );
            println!("{}", validation);
            save_text(&title, WorkspaceItemKind::Analysis, &validation, "idea-validator");
        }
        Tool::Invoice {
            business,
            client,
            number,
            items,
        } => {
            let mut options = InvoiceOptions::new(business, client);
            options.number = number;
            options.items = items;
            let invoice = expect_success(app.create_invoice(&options).await);
            println!("{}", invoice);
            save_text(
                &format!("Invoice {} for {}", options.number, options.client),
                WorkspaceItemKind::Blog,
                &invoice,
                "invoice-creator",
            );
        }
        Tool::Social {
            topic,
            platform,
            tone,
            audience,
        } => {
            let post = expect_success(
                app.write_social_post(&topic, platform, &tone, audience.as_deref())
                    .await,
            );
            println!("{}", post);
            save_text(
                &format!("{} post: {}", platform, title_from(&topic)),
                WorkspaceItemKind::Blog,
                &post,
                "social-post-generator",
            );
        }
        Tool::FixError {
            error,
            code,
            file,
            language,
        } => {
            let code = match (code, file) {
                (Some(code), _) => Some(code),
                (None, Some(path)) => Some(read_text(&path).await?),
                (None, None) => None,
            };
            let solution = expect_success(
                app.fix_error(&language, error.as_deref(), code.as_deref())
                    .await,
            );
            println!("{}", solution);
            save_text(
                &format!("{} error fix", language),
                WorkspaceItemKind::Code,
                &solution,
                "error-fixer",
            );
        }
        Tool::Regex { description } => {
            let suggestion = expect_success(app.generate_regex(&description).await);
            if let Some(pattern) = &suggestion.pattern {
                println!("Pattern: {}\n", pattern);
            }
            println!("{}", suggestion.explanation);
            save_text(
                &title_from(&description),
                WorkspaceItemKind::Code,
                &suggestion.explanation,
                "regex-generator",
            );
        }
        Tool::Homework {
            question,
            subject,
            grade,
        } => {
            let help = expect_success(
                app.help_with_homework(&question, subject.as_deref(), grade.as_deref())
                    .await,
            );
            println!("{}", help);
            save_text(
                &title_from(&question),
                WorkspaceItemKind::Analysis,
                &help,
                "homework-assistant",
            );
        }
        Tool::MindMap { notes } => {
            let map = expect_success(app.notes_to_mind_map(&notes).await);
            println!("{}", map);
            save_text(&title_from(&notes), WorkspaceItemKind::Analysis, &map, "notes-to-mindmap");
        }
        Tool::Ask { document, question } => {
            let text = read_text(&document).await?;
            let answer = expect_success(app.ask_document(&text, &question).await);
            println!("{}", answer);
            save_text(
                &title_from(&question),
                WorkspaceItemKind::Analysis,
                &answer,
                "document-chat",
            );
        }
        Tool::Resume {
            job_title,
            experience,
            skills,
            style,
        } => {
            let resume =
                expect_success(app.write_resume(&job_title, &experience, &skills, &style).await);
            println!("{}", resume);
            save_text(
                &format!("{} resume", job_title),
                WorkspaceItemKind::Blog,
                &resume,
                "resume-generator",
            );
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "aiworx=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = CliArgs::parse();
    let config = Config::from_env()?;

    match args.command {
        Command::Key { action } => run_key(&config, action),
        Command::Workspace { action } => run_workspace(&config, action),
        Command::Tool(tool) => match App::new(&config) {
            Ok(app) => run_tool(&app, tool, args.save).await,
            Err(e) => {
                error!("Failed to initialize application: {}", e);
                std::process::exit(1);
            }
        },
    }
}
