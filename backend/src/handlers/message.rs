//! Message ingestion and search HTTP handlers

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use crate::error::AppResult;
use crate::external::EmbeddingClient;
use crate::services::message::{IngestMessageInput, MessageMatch, MessageService};
use crate::AppState;
use shared::models::InboundMessage;

const DEFAULT_SEARCH_LIMIT: usize = 10;

/// Ingest a message from any channel
pub async fn ingest_message(
    State(state): State<AppState>,
    Json(input): Json<IngestMessageInput>,
) -> AppResult<(StatusCode, Json<InboundMessage>)> {
    let service = message_service(&state);
    let message = service.ingest(input).await?;
    Ok((StatusCode::CREATED, Json(message)))
}

/// Query parameters for semantic search
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: String,
    pub limit: Option<usize>,
}

/// Search stored messages by meaning
pub async fn search_messages(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> AppResult<Json<Vec<MessageMatch>>> {
    let service = message_service(&state);
    let matches = service
        .search(&query.q, query.limit.unwrap_or(DEFAULT_SEARCH_LIMIT))
        .await?;
    Ok(Json(matches))
}

fn message_service(state: &AppState) -> MessageService {
    let embedding_client = EmbeddingClient::new(&state.config.embedding);
    MessageService::new(state.db.clone(), embedding_client)
}
