use std::sync::Arc;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

use ragbot_bot::config::BotConfig;
use ragbot_bot::server::{self, AppState};
use ragbot_bot::{AnswerClient, TelegramClient};
use ragbot_drive::{DriveClient, FileStore};
use ragbot_embeddings::{EmbeddingProvider, OpenAiProvider};
use ragbot_retrieval::RetrievalEngine;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Seed the environment from a .env file when present.
    dotenvy::dotenv().ok();

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into());
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let config = BotConfig::from_env().context("configuration")?;
    info!(
        "configuration loaded (folder {}, top-{} retrieval)",
        config.drive_folder_id, config.retrieval.top_k
    );

    let store: Arc<dyn FileStore> = Arc::new(DriveClient::new(
        config.drive_access_token.clone(),
        config.drive_folder_id.clone(),
    ));
    let provider: Arc<dyn EmbeddingProvider> =
        Arc::new(OpenAiProvider::new(config.openai_api_key.clone()));

    let engine = Arc::new(RetrievalEngine::new(
        store,
        provider,
        config.retrieval.clone(),
    ));

    let state = Arc::new(AppState {
        engine,
        telegram: TelegramClient::new(config.telegram_token.clone()),
        answers: AnswerClient::new(config.openai_api_key.clone()),
    });

    let bind_addr = format!("0.0.0.0:{}", config.port);
    server::run(state, &bind_addr).await
}
