//! Production [`ModelGateway`]: a reqwest JSON client for any
//! OpenAI-compatible chat-completions endpoint.
//!
//! Conversation history lives on this side of the trait, keyed by
//! [`SessionId`], so callers only ever hand over the newest user turn.
//! A gateway failure surfaces immediately as an error — no retries, no
//! backoff, no timeout beyond what the transport imposes; the handlers
//! decide how to present it.

use crate::config::GatewayConfig;
use crate::error::SwagAiError;
use crate::gateway::wire::{ChatRequest, ChatResponse, WireMessage};
use crate::gateway::{encode_image_data_uri, ModelGateway, SessionId};
use async_trait::async_trait;
use image::DynamicImage;
use std::collections::HashMap;
use std::sync::Mutex;
use tracing::{debug, info, warn};

/// HTTP model gateway.
pub struct HttpGateway {
    client: reqwest::Client,
    config: GatewayConfig,
    api_key: String,
    /// Wire history per open conversation, oldest first. User sessions are
    /// single-threaded by construction, so this lock is never contended; it
    /// exists to keep the type `Sync` behind `&dyn ModelGateway`.
    conversations: Mutex<HashMap<SessionId, Vec<WireMessage>>>,
}

impl HttpGateway {
    /// Build a gateway from config, resolving the API key eagerly so a
    /// missing key fails at construction rather than mid-conversation.
    pub fn new(config: GatewayConfig) -> Result<Self, SwagAiError> {
        let api_key = config.resolve_api_key()?;
        Ok(Self {
            client: reqwest::Client::new(),
            config,
            api_key,
            conversations: Mutex::new(HashMap::new()),
        })
    }

    /// POST one chat-completions request and pull the reply text out.
    async fn complete(
        &self,
        model: &str,
        messages: Vec<WireMessage>,
    ) -> Result<String, SwagAiError> {
        let request = ChatRequest {
            model: model.to_string(),
            messages,
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        };

        let url = format!("{}/chat/completions", self.config.base_url);
        debug!("POST {} model={}", url, model);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| SwagAiError::GatewayRequest {
                detail: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            warn!("Gateway returned HTTP {}: {}", status, detail);
            return Err(SwagAiError::GatewayStatus {
                status: status.as_u16(),
                detail,
            });
        }

        let body: ChatResponse =
            response
                .json()
                .await
                .map_err(|e| SwagAiError::GatewayRequest {
                    detail: format!("malformed response body: {e}"),
                })?;

        if let Some(usage) = &body.usage {
            debug!(
                "Gateway reply: {} input tokens, {} output tokens",
                usage.prompt_tokens, usage.completion_tokens
            );
        }

        body.choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|text| !text.is_empty())
            .ok_or_else(|| SwagAiError::EmptyResponse {
                detail: "no choices with content".to_string(),
            })
    }
}

#[async_trait]
impl ModelGateway for HttpGateway {
    async fn start_conversation(&self) -> Result<SessionId, SwagAiError> {
        let id = SessionId::new();
        self.conversations
            .lock()
            .expect("conversation map poisoned")
            .insert(id, Vec::new());
        info!("Started conversation {id}");
        Ok(id)
    }

    async fn send_turn(&self, session: SessionId, text: &str) -> Result<String, SwagAiError> {
        // Snapshot history plus the new turn; the map is updated only once
        // the model has answered, so a failed call leaves history untouched.
        let messages = {
            let conversations = self.conversations.lock().expect("conversation map poisoned");
            let history =
                conversations
                    .get(&session)
                    .ok_or_else(|| SwagAiError::UnknownConversation {
                        handle: session.to_string(),
                    })?;
            let mut messages = history.clone();
            messages.push(WireMessage::user(text));
            messages
        };

        let reply = self.complete(&self.config.model, messages).await?;

        let mut conversations = self.conversations.lock().expect("conversation map poisoned");
        if let Some(history) = conversations.get_mut(&session) {
            history.push(WireMessage::user(text));
            history.push(WireMessage::assistant(reply.clone()));
        }
        Ok(reply)
    }

    async fn caption_image(
        &self,
        prompt: &str,
        image: &DynamicImage,
    ) -> Result<String, SwagAiError> {
        let data_uri = encode_image_data_uri(image)?;
        let messages = vec![WireMessage::user_with_image(prompt, data_uri)];
        self.complete(&self.config.vision_model, messages).await
    }

    async fn answer_over_context(&self, prompt: &str) -> Result<String, SwagAiError> {
        self.complete(&self.config.model, vec![WireMessage::user(prompt)])
            .await
    }

    async fn generate(&self, prompt: &str) -> Result<String, SwagAiError> {
        self.complete(&self.config.model, vec![WireMessage::user(prompt)])
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gateway() -> HttpGateway {
        let config = GatewayConfig::builder()
            .api_key("sk-test")
            .base_url("http://localhost:1")
            .build()
            .unwrap();
        HttpGateway::new(config).unwrap()
    }

    #[tokio::test]
    async fn start_conversation_issues_distinct_handles() {
        let gw = gateway();
        let a = gw.start_conversation().await.unwrap();
        let b = gw.start_conversation().await.unwrap();
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn send_turn_rejects_unknown_handle() {
        let gw = gateway();
        let err = gw.send_turn(SessionId::new(), "hi").await.unwrap_err();
        assert!(matches!(err, SwagAiError::UnknownConversation { .. }));
    }

    #[test]
    fn missing_api_key_fails_at_construction() {
        // Explicit empty key and no env fallback for these names.
        std::env::remove_var("SWAG_AI_API_KEY");
        if std::env::var("OPENAI_API_KEY").is_ok() {
            return; // environment already configured; skip
        }
        let config = GatewayConfig::builder().api_key("").build().unwrap();
        assert!(matches!(
            HttpGateway::new(config),
            Err(SwagAiError::ProviderNotConfigured { .. })
        ));
    }
}
