//! # swag-ai
//!
//! The engine behind a four-screen generative-AI assistant: conversational
//! chat, image captioning, PDF extraction with question answering, and a
//! one-shot prompt tool. All intelligence is delegated to a hosted model
//! behind the [`gateway::ModelGateway`] trait — this crate does input
//! marshaling, session-state bookkeeping, and display formatting, nothing
//! more.
//!
//! ## Event Flow
//!
//! ```text
//! UI event
//!  │
//!  ├─ 1. Dispatch   screens::dispatch picks the handler for the screen
//!  ├─ 2. Marshal    validate/decode the input (image bytes, PDF bytes, text)
//!  ├─ 3. Delegate   ModelGateway / DocumentExtractor does the real work
//!  └─ 4. Render     handler returns Vec<RenderOp> describing the full page
//! ```
//!
//! Handlers are plain async functions over `(state, event, collaborators)`,
//! so every screen can be driven deterministically in tests with scripted
//! gateway and extractor implementations — no UI harness required.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use swag_ai::{dispatch, GatewayConfig, HttpGateway, PdfiumExtractor, SessionContext};
//! use swag_ai::screens::{chat::ChatEvent, ScreenEvent};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // API key auto-resolved from SWAG_AI_API_KEY / OPENAI_API_KEY
//!     let gateway = HttpGateway::new(GatewayConfig::default())?;
//!     let extractor = PdfiumExtractor::new();
//!     let mut ctx = SessionContext::new();
//!
//!     let event = ScreenEvent::Chat(ChatEvent::Submitted("Hello!".into()));
//!     for op in dispatch(&mut ctx, event, &gateway, &extractor).await {
//!         println!("{op:?}");
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `swag` binary (clap + anyhow + tracing-subscriber + indicatif) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod extract;
pub mod gateway;
pub mod prompts;
pub mod render;
pub mod screens;
pub mod session;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{GatewayConfig, GatewayConfigBuilder};
pub use error::SwagAiError;
pub use extract::{DocumentExtractor, ExtractedPage, PdfiumExtractor};
pub use gateway::{HttpGateway, ModelGateway, SessionId};
pub use render::RenderOp;
pub use screens::{dispatch, Phase, Screen, ScreenEvent};
pub use session::{ConversationSession, Role, SessionContext, Turn};
