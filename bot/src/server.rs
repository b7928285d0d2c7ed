//! Webhook server and message handling.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use tracing::{error, info, warn};

use ragbot_retrieval::RetrievalEngine;

use crate::answer::AnswerClient;
use crate::error::Result;
use crate::telegram::{TelegramClient, Update};

/// Progress notice sent while retrieval runs.
const SEARCHING_NOTICE: &str = "🔎 Searching the knowledge base...";

/// Sent when handling a message fails entirely.
const APOLOGY_NOTICE: &str = "❌ Something went wrong on our side. Please try again.";

/// Shared state for the webhook handlers.
pub struct AppState {
    /// Retrieval engine over the knowledge folder.
    pub engine: Arc<RetrievalEngine>,

    /// Outbound chat transport.
    pub telegram: TelegramClient,

    /// Answer generation client.
    pub answers: AnswerClient,
}

/// Run the webhook server.
pub async fn run(state: Arc<AppState>, bind_addr: &str) -> anyhow::Result<()> {
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    info!("webhook server listening on {bind_addr}");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Create the router with all routes.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/webhook", post(webhook_handler))
        .with_state(state)
}

/// Health check response.
#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

/// Health check handler.
async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Webhook handler - POST /webhook.
///
/// Always acknowledges with 200: Telegram redelivers anything else, and
/// a malformed or unhandled update is not going to parse better the
/// second time.
async fn webhook_handler(State(state): State<Arc<AppState>>, body: String) -> StatusCode {
    let update: Update = match serde_json::from_str(&body) {
        Ok(update) => update,
        Err(err) => {
            warn!("ignoring undecodable update: {err}");
            return StatusCode::OK;
        }
    };

    let chat_id = update.message.as_ref().map(|message| message.chat.id);

    if let Err(err) = handle_update(&state, update).await {
        error!("failed to handle update: {err}");
        if let Some(chat_id) = chat_id {
            if let Err(err) = state.telegram.send_message(chat_id, APOLOGY_NOTICE).await {
                error!("failed to deliver error notice: {err}");
            }
        }
    }

    StatusCode::OK
}

/// Answer one inbound message.
async fn handle_update(state: &AppState, update: Update) -> Result<()> {
    let Some(message) = update.message else {
        return Ok(());
    };
    let Some(text) = message.text else {
        return Ok(());
    };
    let question = text.trim();
    if question.is_empty() {
        return Ok(());
    }

    let chat_id = message.chat.id;
    info!("question from chat {chat_id}");

    state.telegram.send_message(chat_id, SEARCHING_NOTICE).await?;

    let files = match state.engine.search_files(question).await {
        Ok(files) => files,
        Err(err) => {
            // Degrade to "no relevant documents": the model still
            // answers, just without knowledge-base context.
            warn!("retrieval failed, answering without documents: {err}");
            Vec::new()
        }
    };

    if !files.is_empty() {
        let names: Vec<&str> = files.iter().map(|file| file.name.as_str()).collect();
        state
            .telegram
            .send_message(chat_id, &format!("📄 Files used: {}", names.join(", ")))
            .await?;
    }

    let answer = state.answers.generate(question, &files).await?;
    state.telegram.send_message(chat_id, &answer).await?;

    Ok(())
}
