//! Error types for the bot shell.

use thiserror::Error;

/// Result type alias for bot operations.
pub type Result<T> = std::result::Result<T, BotError>;

/// Errors that can occur while serving a chat message.
#[derive(Error, Debug)]
pub enum BotError {
    /// Retrieval error.
    #[error("retrieval error: {0}")]
    Retrieval(#[from] ragbot_retrieval::RetrievalError),

    /// The answer service rejected the request.
    #[error("answer API error: {0}")]
    AnswerApi(String),

    /// The chat transport rejected the request.
    #[error("Telegram API error: {0}")]
    TelegramApi(String),

    /// HTTP error.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
}
