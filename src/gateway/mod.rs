//! The model-gateway boundary: every call out to the hosted generative
//! model goes through the [`ModelGateway`] trait.
//!
//! The trait exists so the screen handlers can be driven deterministically
//! in tests with a scripted implementation, while production code uses
//! [`HttpGateway`] against any OpenAI-compatible chat-completions endpoint.

mod encode;
mod http;
mod wire;

pub use encode::encode_image_data_uri;
pub use http::HttpGateway;

use crate::error::SwagAiError;
use async_trait::async_trait;
use image::DynamicImage;
use std::fmt;
use uuid::Uuid;

/// Opaque handle for one server-side conversation. The gateway tracks the
/// wire history against this handle; callers never see the raw messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// The external generative-AI service boundary.
///
/// Prompts and responses are opaque strings; no internal structure is
/// inspected on either side of this trait.
#[async_trait]
pub trait ModelGateway: Send + Sync {
    /// Open a conversation with empty history and return its handle.
    async fn start_conversation(&self) -> Result<SessionId, SwagAiError>;

    /// Send one user turn into an open conversation and return the
    /// assistant's reply. The gateway supplies all prior context itself.
    async fn send_turn(&self, session: SessionId, text: &str) -> Result<String, SwagAiError>;

    /// Caption an image: fixed prompt plus the decoded image, one reply.
    async fn caption_image(
        &self,
        prompt: &str,
        image: &DynamicImage,
    ) -> Result<String, SwagAiError>;

    /// Answer a question over caller-assembled context. The prompt already
    /// contains the document text and the question.
    async fn answer_over_context(&self, prompt: &str) -> Result<String, SwagAiError>;

    /// One-shot prompt/response with no history.
    async fn generate(&self, prompt: &str) -> Result<String, SwagAiError>;
}
