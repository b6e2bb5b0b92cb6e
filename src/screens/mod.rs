//! The page controller: one handler per screen, plus event dispatch.
//!
//! Each handler is a linear pipeline from one incoming event to a full-page
//! render: `(state, event, collaborators) → Vec<RenderOp>`. There is no
//! shared state machine across screens — selecting a screen only decides
//! which handler runs for the current pass.
//!
//! Every handler follows the same two-state rhythm: `Idle` →
//! `AwaitingResponse` around the gateway/extractor call → `Idle` once the
//! response (or its inline error) has been rendered. Failures never
//! propagate out of a handler; they become [`RenderOp::Error`] so the
//! screen stays usable.

pub mod ask;
pub mod caption;
pub mod chat;
pub mod doc_qa;

use crate::extract::DocumentExtractor;
use crate::gateway::ModelGateway;
use crate::render::RenderOp;
use crate::session::SessionContext;

/// Where a screen is in its request cycle. Observable only between events:
/// a handler always leaves its state back at `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    AwaitingResponse,
}

/// The four screens, in sidebar order. Chat is the default selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Screen {
    #[default]
    Chat,
    ImageCaptioning,
    DocumentQa,
    AskAnything,
}

impl Screen {
    pub const ALL: [Screen; 4] = [
        Screen::Chat,
        Screen::ImageCaptioning,
        Screen::DocumentQa,
        Screen::AskAnything,
    ];

    /// Label shown in the sidebar menu.
    pub fn menu_label(self) -> &'static str {
        match self {
            Screen::Chat => "ChatBot",
            Screen::ImageCaptioning => "Image Captioning",
            Screen::DocumentQa => "Embed Text",
            Screen::AskAnything => "Ask Me Anything",
        }
    }

    /// Title rendered at the top of the page.
    pub fn title(self) -> &'static str {
        match self {
            Screen::Chat => "🤖 ChatBot",
            Screen::ImageCaptioning => "📷 Snap Narrate",
            Screen::DocumentQa => "🔡 Embed Text from PDF",
            Screen::AskAnything => "❓ Ask Me a Question",
        }
    }
}

/// One user interaction, addressed to the screen that owns it.
#[derive(Debug)]
pub enum ScreenEvent {
    Chat(chat::ChatEvent),
    Caption(caption::CaptionEvent),
    DocQa(doc_qa::DocQaEvent),
    Ask(ask::AskEvent),
}

impl ScreenEvent {
    /// The screen this event belongs to.
    pub fn screen(&self) -> Screen {
        match self {
            ScreenEvent::Chat(_) => Screen::Chat,
            ScreenEvent::Caption(_) => Screen::ImageCaptioning,
            ScreenEvent::DocQa(_) => Screen::DocumentQa,
            ScreenEvent::Ask(_) => Screen::AskAnything,
        }
    }
}

/// Route one event to its screen's handler.
pub async fn dispatch(
    ctx: &mut SessionContext,
    event: ScreenEvent,
    gateway: &dyn ModelGateway,
    extractor: &dyn DocumentExtractor,
) -> Vec<RenderOp> {
    match event {
        ScreenEvent::Chat(e) => chat::handle(&mut ctx.chat, e, gateway).await,
        ScreenEvent::Caption(e) => caption::handle(&mut ctx.caption, e, gateway).await,
        ScreenEvent::DocQa(e) => doc_qa::handle(&mut ctx.doc_qa, e, gateway, extractor).await,
        ScreenEvent::Ask(e) => ask::handle(&mut ctx.ask, e, gateway).await,
    }
}
