//! Message ingestion and semantic search service
//!
//! Every inbound message is stored; embedding is best-effort. A failed
//! embedding call downgrades to a warning and the message lands with a null
//! vector, which search silently skips.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::external::EmbeddingClient;
use shared::chatbot::is_bot_message;
use shared::models::InboundMessage;

/// Message service for the ingestion pipeline and semantic search
#[derive(Clone)]
pub struct MessageService {
    db: PgPool,
    embedding_client: EmbeddingClient,
}

/// Database row for a stored message
#[derive(Debug, sqlx::FromRow)]
struct MessageRow {
    id: Uuid,
    channel: String,
    sender: String,
    profile_name: Option<String>,
    body: String,
    external_id: Option<String>,
    is_bot_command: bool,
    embedding: Option<serde_json::Value>,
    created_at: DateTime<Utc>,
}

impl From<MessageRow> for InboundMessage {
    fn from(row: MessageRow) -> Self {
        InboundMessage {
            id: row.id,
            channel: row.channel,
            sender: row.sender,
            profile_name: row.profile_name,
            body: row.body,
            external_id: row.external_id,
            is_bot_command: row.is_bot_command,
            created_at: row.created_at,
        }
    }
}

/// Input for ingesting a message
#[derive(Debug, Deserialize)]
pub struct IngestMessageInput {
    pub channel: String,
    pub sender: String,
    pub profile_name: Option<String>,
    pub text: String,
    pub external_id: Option<String>,
}

/// A search hit with its similarity score
#[derive(Debug, Serialize)]
pub struct MessageMatch {
    #[serde(flatten)]
    pub message: InboundMessage,
    pub score: f32,
}

impl MessageService {
    /// Create a new MessageService instance
    pub fn new(db: PgPool, embedding_client: EmbeddingClient) -> Self {
        Self {
            db,
            embedding_client,
        }
    }

    /// Store a message, embedding it when the embedding service cooperates
    pub async fn ingest(&self, input: IngestMessageInput) -> AppResult<InboundMessage> {
        if input.text.trim().is_empty() {
            return Err(AppError::Validation {
                field: "text".to_string(),
                message: "Message text cannot be empty".to_string(),
            });
        }

        let embedding = match self.embedding_client.embed(&input.text).await {
            Ok(vector) => Some(vector),
            Err(e) => {
                tracing::warn!("Embedding failed, storing message without vector: {}", e);
                None
            }
        };

        let embedding_json = embedding
            .map(|v| serde_json::to_value(v))
            .transpose()
            .map_err(|e| AppError::Internal(e.to_string()))?;

        let is_bot_command = is_bot_message(&input.text);

        let row = sqlx::query_as::<_, MessageRow>(
            r#"
            INSERT INTO messages (channel, sender, profile_name, body, external_id,
                                  is_bot_command, embedding)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, channel, sender, profile_name, body, external_id,
                      is_bot_command, embedding, created_at
            "#,
        )
        .bind(&input.channel)
        .bind(&input.sender)
        .bind(&input.profile_name)
        .bind(&input.text)
        .bind(&input.external_id)
        .bind(is_bot_command)
        .bind(&embedding_json)
        .fetch_one(&self.db)
        .await?;

        Ok(row.into())
    }

    /// Rank stored messages against a query by cosine similarity
    pub async fn search(&self, query: &str, limit: usize) -> AppResult<Vec<MessageMatch>> {
        if query.trim().is_empty() {
            return Err(AppError::Validation {
                field: "q".to_string(),
                message: "Search query cannot be empty".to_string(),
            });
        }

        // Search cannot degrade: without a query vector there is nothing to rank
        let query_vector = self.embedding_client.embed(query).await?;

        let rows = sqlx::query_as::<_, MessageRow>(
            r#"
            SELECT id, channel, sender, profile_name, body, external_id,
                   is_bot_command, embedding, created_at
            FROM messages
            WHERE embedding IS NOT NULL
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        let mut matches: Vec<MessageMatch> = Vec::new();
        for mut row in rows {
            let Some(value) = row.embedding.take() else {
                continue;
            };
            let Ok(vector) = serde_json::from_value::<Vec<f32>>(value) else {
                continue;
            };

            let score = cosine_similarity(&query_vector, &vector);
            matches.push(MessageMatch {
                message: row.into(),
                score,
            });
        }

        matches.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
        matches.truncate(limit);

        Ok(matches)
    }
}

/// Cosine similarity between two vectors; 0.0 for mismatched or zero-magnitude input
fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let magnitude_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let magnitude_b: f32 = b.iter().map(|y| y * y).sum::<f32>().sqrt();

    if magnitude_a == 0.0 || magnitude_b == 0.0 {
        return 0.0;
    }

    dot_product / (magnitude_a * magnitude_b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cosine_similarity_identical_vectors() {
        let v = vec![1.0, 2.0, 3.0];
        let score = cosine_similarity(&v, &v);
        assert!((score - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_similarity_orthogonal_vectors() {
        let a = vec![1.0, 0.0];
        let b = vec![0.0, 1.0];
        assert_eq!(cosine_similarity(&a, &b), 0.0);
    }

    #[test]
    fn test_cosine_similarity_opposite_vectors() {
        let a = vec![1.0, 0.0];
        let b = vec![-1.0, 0.0];
        assert!((cosine_similarity(&a, &b) + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_similarity_mismatched_lengths() {
        let a = vec![1.0, 2.0];
        let b = vec![1.0, 2.0, 3.0];
        assert_eq!(cosine_similarity(&a, &b), 0.0);
    }

    #[test]
    fn test_cosine_similarity_zero_magnitude() {
        let a = vec![0.0, 0.0];
        let b = vec![1.0, 2.0];
        assert_eq!(cosine_similarity(&a, &b), 0.0);
    }
}
