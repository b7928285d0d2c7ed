//! # Bot
//!
//! The thin I/O shell around the retrieval engine: environment
//! configuration, the Telegram webhook server, and answer generation.
//! A question arrives as a webhook update, the engine selects the
//! relevant knowledge-base files, and the answer service is asked to
//! reply using their content as context.

pub mod answer;
pub mod config;
pub mod error;
pub mod server;
pub mod telegram;

pub use answer::AnswerClient;
pub use config::{BotConfig, ConfigError};
pub use error::{BotError, Result};
pub use server::AppState;
pub use telegram::TelegramClient;
