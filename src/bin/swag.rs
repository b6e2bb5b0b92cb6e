//! CLI binary for swag-ai.
//!
//! A terminal presentation surface over the library crate: a sidebar-style
//! menu of the four screens, a read-eval loop that turns typed lines into
//! screen events, and a printer for the render ops that come back.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, BufRead, Write};
use std::path::Path;
use std::time::Duration;
use swag_ai::screens::ask::AskEvent;
use swag_ai::screens::caption::{CaptionEvent, UploadedImage};
use swag_ai::screens::chat::ChatEvent;
use swag_ai::screens::doc_qa::DocQaEvent;
use swag_ai::{
    dispatch, GatewayConfig, HttpGateway, PdfiumExtractor, RenderOp, Screen, ScreenEvent,
    SessionContext,
};
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

const AFTER_HELP: &str = r#"SCREENS & COMMANDS:
  /chat      ChatBot — type a line to send a message
  /caption   Image Captioning — type a jpg/jpeg/png path to caption it
  /pdf       Embed Text from PDF — `load <path>` to extract, then type questions
  /ask       Ask Me Anything — type a one-shot prompt
  /menu      Show the screen menu again
  /quit      Exit

ENVIRONMENT VARIABLES:
  SWAG_AI_API_KEY    API key for the model gateway (preferred)
  OPENAI_API_KEY     Fallback API key
  SWAG_AI_BASE_URL   Override the OpenAI-compatible endpoint

SETUP:
  1. Set API key:    export SWAG_AI_API_KEY=sk-...
  2. Run:            swag
"#;

/// Four-screen generative-AI assistant in the terminal.
#[derive(Parser, Debug)]
#[command(
    name = "swag",
    version,
    about = "Chat, caption images, and ask questions about PDFs from the terminal",
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Base URL of the OpenAI-compatible API.
    #[arg(long, env = "SWAG_AI_BASE_URL", default_value = "https://api.openai.com/v1")]
    base_url: String,

    /// API key (falls back to SWAG_AI_API_KEY / OPENAI_API_KEY).
    #[arg(long, env = "SWAG_AI_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Model for chat, document Q&A, and one-shot prompts.
    #[arg(long, env = "SWAG_AI_MODEL", default_value = "gpt-4o-mini")]
    model: String,

    /// Vision model for image captioning (defaults to --model).
    #[arg(long, env = "SWAG_AI_VISION_MODEL")]
    vision_model: Option<String>,

    /// Sampling temperature (0.0–2.0).
    #[arg(long, env = "SWAG_AI_TEMPERATURE", default_value_t = 0.7)]
    temperature: f32,

    /// Maximum tokens per model reply.
    #[arg(long, env = "SWAG_AI_MAX_TOKENS", default_value_t = 1024)]
    max_tokens: usize,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "SWAG_AI_VERBOSE")]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Collaborators ────────────────────────────────────────────────────
    let mut builder = GatewayConfig::builder()
        .base_url(cli.base_url)
        .model(cli.model)
        .temperature(cli.temperature)
        .max_tokens(cli.max_tokens);
    if let Some(vision_model) = cli.vision_model {
        builder = builder.vision_model(vision_model);
    }
    if let Some(api_key) = cli.api_key {
        builder = builder.api_key(api_key);
    }
    let config = builder.build().context("invalid gateway configuration")?;

    let gateway = HttpGateway::new(config).context("failed to construct model gateway")?;
    let extractor = PdfiumExtractor::new();
    let mut ctx = SessionContext::new();
    let mut screen = Screen::default();

    println!("{}", bold("Swag AI"));
    print_menu(screen);

    // ── Read-eval loop ───────────────────────────────────────────────────
    let stdin = io::stdin();
    loop {
        print!("{} ", cyan(&format!("[{}]>", screen.menu_label())));
        io::stdout().flush().ok();

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break; // EOF
        }
        let line = line.trim_end_matches(['\n', '\r']).to_string();

        let event = match line.as_str() {
            "/quit" | "/exit" => break,
            "/menu" => {
                print_menu(screen);
                continue;
            }
            "/chat" => switch(&mut screen, Screen::Chat),
            "/caption" => switch(&mut screen, Screen::ImageCaptioning),
            "/pdf" => switch(&mut screen, Screen::DocumentQa),
            "/ask" => switch(&mut screen, Screen::AskAnything),
            _ => match build_event(screen, &line) {
                Ok(event) => event,
                Err(e) => {
                    eprintln!("{}", red(&format!("✗ {e:#}")));
                    continue;
                }
            },
        };

        let spinner = make_spinner();
        let ops = dispatch(&mut ctx, event, &gateway, &extractor).await;
        spinner.finish_and_clear();

        print_ops(&ops);
    }

    Ok(())
}

/// Change the active screen and produce its activation event.
fn switch(screen: &mut Screen, next: Screen) -> ScreenEvent {
    *screen = next;
    match next {
        Screen::Chat => ScreenEvent::Chat(ChatEvent::Activated),
        Screen::ImageCaptioning => ScreenEvent::Caption(CaptionEvent::Activated),
        Screen::DocumentQa => ScreenEvent::DocQa(DocQaEvent::Activated),
        Screen::AskAnything => ScreenEvent::Ask(AskEvent::Activated),
    }
}

/// Turn a typed line into the active screen's event.
fn build_event(screen: Screen, line: &str) -> Result<ScreenEvent> {
    Ok(match screen {
        Screen::Chat => ScreenEvent::Chat(ChatEvent::Submitted(line.to_string())),
        Screen::AskAnything => ScreenEvent::Ask(AskEvent::Submitted(line.to_string())),
        Screen::ImageCaptioning => {
            let path = Path::new(line);
            let bytes =
                std::fs::read(path).with_context(|| format!("cannot read image '{line}'"))?;
            let extension = path
                .extension()
                .and_then(|e| e.to_str())
                .unwrap_or_default()
                .to_string();
            ScreenEvent::Caption(CaptionEvent::GenerateCaption(UploadedImage {
                bytes,
                extension,
            }))
        }
        Screen::DocumentQa => {
            if let Some(path) = line.strip_prefix("load ") {
                let bytes = std::fs::read(path.trim())
                    .with_context(|| format!("cannot read PDF '{}'", path.trim()))?;
                ScreenEvent::DocQa(DocQaEvent::Uploaded(bytes))
            } else {
                ScreenEvent::DocQa(DocQaEvent::Asked(line.to_string()))
            }
        }
    })
}

fn print_menu(active: Screen) {
    println!();
    for (i, screen) in Screen::ALL.iter().enumerate() {
        let marker = if *screen == active { "▸" } else { " " };
        println!("  {marker} {}. {}", i + 1, screen.menu_label());
    }
    println!("{}", dim("  /chat /caption /pdf /ask to switch, /quit to exit"));
    println!();
}

fn make_spinner() -> ProgressBar {
    let bar = ProgressBar::new_spinner();
    bar.set_style(
        ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]),
    );
    bar.set_message("Waiting for the model…");
    bar.enable_steady_tick(Duration::from_millis(80));
    bar
}

fn print_ops(ops: &[RenderOp]) {
    for op in ops {
        match op {
            RenderOp::Title(title) => println!("\n{}", bold(title)),
            RenderOp::Subheading(text) => println!("{}", bold(text)),
            RenderOp::ChatMessage { role, text } => {
                println!("{} {}", cyan(&format!("{role}:")), text)
            }
            RenderOp::Markdown(text) => println!("{text}"),
            RenderOp::Info(text) => println!("{}", cyan(text)),
            RenderOp::Error(text) => println!("{}", red(&format!("✗ {text}"))),
            RenderOp::TextArea { label, content } => {
                println!("{}", bold(&format!("{label}:")));
                println!("{content}");
            }
            RenderOp::Image { image, caption } => {
                let dims = dim(&format!("[image {}×{}]", image.width(), image.height()));
                match caption {
                    Some(caption) => println!("{dims} {caption}"),
                    None => println!("{dims}"),
                }
            }
        }
    }
}
