//! Chat screen: multi-turn conversation against a gateway-tracked session.

use crate::gateway::ModelGateway;
use crate::render::RenderOp;
use crate::screens::{Phase, Screen};
use crate::session::{ConversationSession, Role};
use tracing::{debug, warn};

/// Events the chat screen reacts to.
#[derive(Debug)]
pub enum ChatEvent {
    /// The screen was selected; render existing history.
    Activated,
    /// The user submitted a message from the chat input.
    Submitted(String),
}

/// Chat screen state. The conversation outlives individual events; it is
/// created lazily on the first event that reaches this screen.
#[derive(Debug, Default)]
pub struct ChatState {
    pub session: ConversationSession,
    pub phase: Phase,
}

/// Handle one chat event and render the whole page.
///
/// On the first activation the conversation is opened with empty history.
/// A submission appends the user turn, forwards it (the gateway supplies
/// all prior context against the handle), and appends the reply. When the
/// gateway fails, the just-appended user turn is rolled back so the
/// strict-alternation invariant still holds, and the failure renders as an
/// inline error.
pub async fn handle(
    state: &mut ChatState,
    event: ChatEvent,
    gateway: &dyn ModelGateway,
) -> Vec<RenderOp> {
    let mut ops = vec![RenderOp::Title(Screen::Chat.title().to_string())];

    // First visit: acquire a conversation with empty history.
    let handle = match state.session.handle() {
        Some(handle) => handle,
        None => match gateway.start_conversation().await {
            Ok(handle) => {
                debug!("Chat session bound to {handle}");
                state.session.bind(handle);
                handle
            }
            Err(e) => {
                warn!("Failed to start conversation: {e}");
                ops.push(RenderOp::Error(e.to_string()));
                return ops;
            }
        },
    };

    render_history(&state.session, &mut ops);

    let text = match event {
        ChatEvent::Activated => return ops,
        ChatEvent::Submitted(text) => text,
    };
    // A chat input never emits an empty submission; treat one as a no-op.
    if text.is_empty() {
        return ops;
    }

    state.session.push_user(text.clone());
    ops.push(RenderOp::ChatMessage {
        role: Role::User.display_name(),
        text: text.clone(),
    });

    state.phase = Phase::AwaitingResponse;
    match gateway.send_turn(handle, &text).await {
        Ok(reply) => {
            state.session.push_assistant(reply.clone());
            ops.push(RenderOp::ChatMessage {
                role: Role::Assistant.display_name(),
                text: reply,
            });
        }
        Err(e) => {
            warn!("send_turn failed: {e}");
            state.session.rollback_user();
            ops.push(RenderOp::Error(e.to_string()));
        }
    }
    state.phase = Phase::Idle;

    ops
}

/// Emit every stored turn, oldest first, with its display role.
fn render_history(session: &ConversationSession, ops: &mut Vec<RenderOp>) {
    for turn in session.turns() {
        ops.push(RenderOp::ChatMessage {
            role: turn.role.display_name(),
            text: turn.text.clone(),
        });
    }
}
