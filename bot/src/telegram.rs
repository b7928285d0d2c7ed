//! Telegram Bot API client and webhook wire types.

use std::time::Duration;

use serde::Deserialize;
use tracing::debug;

use crate::error::{BotError, Result};

/// Default deadline for a single Telegram request.
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// An inbound webhook update.
#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    /// Monotonic update identifier.
    pub update_id: i64,

    /// The message, when the update carries one.
    #[serde(default)]
    pub message: Option<Message>,
}

/// A chat message.
#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    /// Message identifier within the chat.
    pub message_id: i64,

    /// The chat the message belongs to.
    pub chat: Chat,

    /// Text content; absent for stickers, photos and the like.
    #[serde(default)]
    pub text: Option<String>,
}

/// The chat a message belongs to.
#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    /// Chat identifier, used to address replies.
    pub id: i64,
}

/// Outbound Telegram Bot API client.
pub struct TelegramClient {
    /// Bot token.
    token: String,

    /// API base URL.
    base_url: String,

    /// Per-request deadline.
    request_timeout: Duration,

    /// HTTP client.
    client: reqwest::Client,
}

impl TelegramClient {
    /// Create a new client.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            base_url: "https://api.telegram.org".to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            client: reqwest::Client::new(),
        }
    }

    /// Set the base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Send a text message to a chat.
    pub async fn send_message(&self, chat_id: i64, text: &str) -> Result<()> {
        let body = serde_json::json!({
            "chat_id": chat_id,
            "text": text,
        });

        let response = self
            .client
            .post(format!("{}/bot{}/sendMessage", self.base_url, self.token))
            .timeout(self.request_timeout)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(BotError::TelegramApi(message));
        }

        let reply: ApiReply = response.json().await?;
        if !reply.ok {
            return Err(BotError::TelegramApi(
                reply.description.unwrap_or_else(|| "not ok".to_string()),
            ));
        }

        debug!("delivered message to chat {chat_id}");
        Ok(())
    }
}

/// Bot API envelope.
#[derive(Debug, Deserialize)]
struct ApiReply {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}
