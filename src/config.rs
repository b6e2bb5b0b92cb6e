//! Configuration for the model gateway.
//!
//! Everything the HTTP gateway needs lives in [`GatewayConfig`], built via
//! its builder. Keeping every knob in one struct makes it trivial to share
//! a config across screens and to diff two runs when their answers differ.

use crate::error::SwagAiError;
use std::fmt;

/// Environment variables consulted, in order, when no API key is set
/// explicitly.
const API_KEY_ENV_VARS: [&str; 2] = ["SWAG_AI_API_KEY", "OPENAI_API_KEY"];

/// Configuration for [`crate::gateway::HttpGateway`].
///
/// Built via [`GatewayConfig::builder()`] or [`GatewayConfig::default()`].
///
/// # Example
/// ```rust
/// use swag_ai::GatewayConfig;
///
/// let config = GatewayConfig::builder()
///     .api_key("sk-test")
///     .model("gpt-4o-mini")
///     .temperature(0.3)
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct GatewayConfig {
    /// Base URL of the OpenAI-compatible API. Default: `https://api.openai.com/v1`.
    pub base_url: String,

    /// API key. When `None`, [`GatewayConfig::resolve_api_key`] falls back
    /// to `SWAG_AI_API_KEY` then `OPENAI_API_KEY`.
    pub api_key: Option<String>,

    /// Model for chat, context answering, and one-shot prompts. Default: `gpt-4o-mini`.
    pub model: String,

    /// Model for image captioning. Default: same as `model`.
    ///
    /// Split out because text-only deployments often pair a cheap chat model
    /// with a separate vision-capable one.
    pub vision_model: String,

    /// Sampling temperature (0.0–2.0). Default: 0.7.
    pub temperature: f32,

    /// Maximum tokens the model may generate per reply. Default: 1024.
    pub max_tokens: usize,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            api_key: None,
            model: "gpt-4o-mini".to_string(),
            vision_model: "gpt-4o-mini".to_string(),
            temperature: 0.7,
            max_tokens: 1024,
        }
    }
}

impl fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("vision_model", &self.vision_model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .finish()
    }
}

impl GatewayConfig {
    /// Create a new builder for `GatewayConfig`.
    pub fn builder() -> GatewayConfigBuilder {
        GatewayConfigBuilder {
            config: Self::default(),
        }
    }

    /// Resolve the API key: explicit value first, then the environment.
    pub fn resolve_api_key(&self) -> Result<String, SwagAiError> {
        if let Some(ref key) = self.api_key {
            if !key.is_empty() {
                return Ok(key.clone());
            }
        }
        for var in API_KEY_ENV_VARS {
            if let Ok(key) = std::env::var(var) {
                if !key.is_empty() {
                    return Ok(key);
                }
            }
        }
        Err(SwagAiError::ProviderNotConfigured {
            hint: format!(
                "Set {} or {} in the environment, or pass an explicit key.",
                API_KEY_ENV_VARS[0], API_KEY_ENV_VARS[1]
            ),
        })
    }
}

/// Builder for [`GatewayConfig`].
#[derive(Debug)]
pub struct GatewayConfigBuilder {
    config: GatewayConfig,
}

impl GatewayConfigBuilder {
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into();
        self
    }

    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.config.api_key = Some(key.into());
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        let model = model.into();
        // A vision model set explicitly wins; otherwise follow the chat model.
        if self.config.vision_model == self.config.model {
            self.config.vision_model = model.clone();
        }
        self.config.model = model;
        self
    }

    pub fn vision_model(mut self, model: impl Into<String>) -> Self {
        self.config.vision_model = model.into();
        self
    }

    pub fn temperature(mut self, t: f32) -> Self {
        self.config.temperature = t.clamp(0.0, 2.0);
        self
    }

    pub fn max_tokens(mut self, n: usize) -> Self {
        self.config.max_tokens = n;
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<GatewayConfig, SwagAiError> {
        let c = &self.config;
        if !c.base_url.starts_with("http://") && !c.base_url.starts_with("https://") {
            return Err(SwagAiError::InvalidConfig(format!(
                "base_url must be an HTTP(S) URL, got '{}'",
                c.base_url
            )));
        }
        if c.model.is_empty() {
            return Err(SwagAiError::InvalidConfig("model must not be empty".into()));
        }
        if c.max_tokens == 0 {
            return Err(SwagAiError::InvalidConfig("max_tokens must be ≥ 1".into()));
        }
        Ok(self.config)
    }
}
