//! Batch request envelope in the chat-completions batch input format.

use serde::{Deserialize, Serialize};

/// HTTP method of every batch request.
pub const BATCH_METHOD: &str = "POST";

/// Endpoint path every batch request targets.
pub const CHAT_COMPLETIONS_URL: &str = "/v1/chat/completions";

/// A chat message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Role of the message sender ("system" or "user").
    pub role: String,
    /// Content of the message.
    pub content: String,
}

impl Message {
    /// Create a new system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    /// Create a new user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Completion request body carried by an envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestBody {
    pub model: String,
    pub messages: Vec<Message>,
    pub max_tokens: u32,
    pub temperature: f64,
}

/// One line of the batch file.
///
/// Field order is the serialized key order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchEnvelope {
    pub custom_id: String,
    pub method: String,
    pub url: String,
    pub body: RequestBody,
}

impl BatchEnvelope {
    /// Create a chat-completions envelope.
    pub fn chat_completion(custom_id: impl Into<String>, body: RequestBody) -> Self {
        Self {
            custom_id: custom_id.into(),
            method: BATCH_METHOD.to_string(),
            url: CHAT_COMPLETIONS_URL.to_string(),
            body,
        }
    }

    /// The user prompt, if the body carries one.
    pub fn user_prompt(&self) -> Option<&str> {
        self.body
            .messages
            .iter()
            .find(|m| m.role == "user")
            .map(|m| m.content.as_str())
    }
}
