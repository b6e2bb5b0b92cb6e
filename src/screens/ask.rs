//! Ask-anything screen: stateless one-shot prompt/response.

use crate::gateway::ModelGateway;
use crate::render::RenderOp;
use crate::screens::{Phase, Screen};
use tracing::warn;

/// Events the ask-anything screen reacts to.
#[derive(Debug)]
pub enum AskEvent {
    /// The screen was selected.
    Activated,
    /// The user pressed the response button with the current prompt text.
    Submitted(String),
}

/// Ask-anything screen state — phase only; no history is kept.
#[derive(Debug, Default)]
pub struct AskState {
    pub phase: Phase,
}

/// Handle one ask-anything event.
///
/// The prompt is forwarded verbatim — no trimming, no emptiness check, no
/// transformation of the response.
pub async fn handle(
    state: &mut AskState,
    event: AskEvent,
    gateway: &dyn ModelGateway,
) -> Vec<RenderOp> {
    let mut ops = vec![RenderOp::Title(Screen::AskAnything.title().to_string())];

    let prompt = match event {
        AskEvent::Activated => return ops,
        AskEvent::Submitted(prompt) => prompt,
    };

    state.phase = Phase::AwaitingResponse;
    match gateway.generate(&prompt).await {
        Ok(response) => ops.push(RenderOp::Markdown(response)),
        Err(e) => {
            warn!("generate failed: {e}");
            ops.push(RenderOp::Error(e.to_string()));
        }
    }
    state.phase = Phase::Idle;

    ops
}
