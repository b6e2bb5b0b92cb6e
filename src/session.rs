//! Per-user-session state: the conversation history and one state struct
//! per screen, bundled into an explicit [`SessionContext`].
//!
//! Nothing here is process-global. A `SessionContext` is created when a
//! user session begins and dropped when it ends; every handler receives a
//! mutable borrow of the slice of it that it owns. No entity in this module
//! outlives the context and nothing is written to durable storage.

use crate::gateway::SessionId;
use crate::screens::ask::AskState;
use crate::screens::caption::CaptionState;
use crate::screens::chat::ChatState;
use crate::screens::doc_qa::DocQaState;

/// Who produced a conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    /// The role name shown next to a rendered chat message. Providers may
    /// use other wire names ("model", "system") — display is always one of
    /// these two.
    pub fn display_name(self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// One message in a conversation, oldest-first within
/// [`ConversationSession::turns`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    pub role: Role,
    pub text: String,
}

/// The ordered, role-tagged history of one chat interaction plus the
/// gateway handle it is bound to.
///
/// Invariant: turns alternate strictly between user and assistant, oldest
/// first, starting with a user turn. `push_user` / `push_assistant` uphold
/// it; `rollback_user` restores it after a failed gateway call.
#[derive(Debug, Default)]
pub struct ConversationSession {
    handle: Option<SessionId>,
    turns: Vec<Turn>,
}

impl ConversationSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// The gateway handle, if the conversation has been started.
    pub fn handle(&self) -> Option<SessionId> {
        self.handle
    }

    /// Bind the conversation to a freshly issued gateway handle.
    pub fn bind(&mut self, handle: SessionId) {
        self.handle = Some(handle);
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    /// Append a user turn. Caller must only do this when it is the user's
    /// move (history empty or last turn from the assistant).
    pub fn push_user(&mut self, text: impl Into<String>) {
        debug_assert!(
            self.turns.last().map_or(true, |t| t.role == Role::Assistant),
            "user turn pushed out of order"
        );
        self.turns.push(Turn {
            role: Role::User,
            text: text.into(),
        });
    }

    /// Append an assistant turn answering the most recent user turn.
    pub fn push_assistant(&mut self, text: impl Into<String>) {
        debug_assert!(
            self.turns.last().map_or(false, |t| t.role == Role::User),
            "assistant turn pushed out of order"
        );
        self.turns.push(Turn {
            role: Role::Assistant,
            text: text.into(),
        });
    }

    /// Remove a trailing user turn that never received an answer. No-op
    /// when the last turn is not a user turn.
    pub fn rollback_user(&mut self) {
        if self.turns.last().map_or(false, |t| t.role == Role::User) {
            self.turns.pop();
        }
    }

    /// True when the alternation invariant holds over the whole history.
    pub fn is_strictly_alternating(&self) -> bool {
        self.turns.iter().enumerate().all(|(i, t)| {
            let expected = if i % 2 == 0 { Role::User } else { Role::Assistant };
            t.role == expected
        })
    }
}

/// All state one user session owns, one field per screen.
///
/// Created on first access (session start), dropped at session end. The
/// chat screen is the only one whose state survives meaningfully across
/// events; the others carry little more than their idle/awaiting phase.
#[derive(Debug, Default)]
pub struct SessionContext {
    pub chat: ChatState,
    pub caption: CaptionState,
    pub doc_qa: DocQaState,
    pub ask: AskState,
}

impl SessionContext {
    pub fn new() -> Self {
        Self::default()
    }
}
