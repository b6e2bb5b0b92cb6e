//! Wire types for the OpenAI-compatible chat-completions endpoint.
//!
//! Only the fields this crate reads or writes are modelled; everything
//! else in the provider's JSON is ignored on the way in and omitted on the
//! way out.

use serde::{Deserialize, Serialize};

/// Chat API request body.
#[derive(Debug, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<WireMessage>,
    pub temperature: f32,
    pub max_tokens: usize,
}

/// One message in a request. `content` is plain text for chat turns and a
/// part list when an image rides along.
#[derive(Debug, Clone, Serialize)]
pub struct WireMessage {
    pub role: String,
    pub content: WireContent,
}

impl WireMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: WireContent::Text(text.into()),
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: "assistant".to_string(),
            content: WireContent::Text(text.into()),
        }
    }

    /// A user message carrying a text part and one image part.
    pub fn user_with_image(text: impl Into<String>, image_data_uri: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: WireContent::Parts(vec![
                ContentPart {
                    kind: "text".to_string(),
                    text: Some(text.into()),
                    image_url: None,
                },
                ContentPart {
                    kind: "image_url".to_string(),
                    text: None,
                    image_url: Some(ImageUrl {
                        url: image_data_uri.into(),
                    }),
                },
            ]),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum WireContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

#[derive(Debug, Clone, Serialize)]
pub struct ContentPart {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<ImageUrl>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ImageUrl {
    pub url: String,
}

/// Chat API response body.
#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    pub choices: Vec<Choice>,
    #[serde(default)]
    pub usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    pub message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
pub struct ResponseMessage {
    #[serde(default)]
    pub content: Option<String>,
}

/// Token usage information from the API response.
#[derive(Debug, Deserialize)]
pub struct Usage {
    #[serde(default)]
    pub prompt_tokens: usize,
    #[serde(default)]
    pub completion_tokens: usize,
}
