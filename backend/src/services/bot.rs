//! WhatsApp bot service for quick task capture
//!
//! Inbound gateway messages are stored through the message pipeline, then
//! anything addressed to the bot is classified and answered. Replies are
//! best-effort: a gateway send failure is logged and the webhook still acks,
//! so the gateway does not retry a message we already stored.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::external::WhatsAppClient;
use crate::services::message::{IngestMessageInput, MessageService};
use shared::chatbot::{
    format_help_response, format_task_created, format_task_list, format_unknown_response,
    parse_message, BotCommand,
};
use shared::models::{BotTask, BotTaskStatus, InboundMessage};

/// WhatsApp bot service
#[derive(Clone)]
pub struct BotService {
    db: PgPool,
    whatsapp_client: WhatsAppClient,
    messages: MessageService,
}

/// Form fields posted by the WhatsApp gateway for an inbound message
#[derive(Debug, Deserialize)]
pub struct WhatsAppWebhookPayload {
    /// Sender address, e.g. "whatsapp:+31612345678"
    #[serde(rename = "From")]
    pub from: String,
    /// Message text; absent for media-only messages
    #[serde(rename = "Body", default)]
    pub body: String,
    /// Gateway message id, used for traceability
    #[serde(rename = "MessageSid")]
    pub message_sid: Option<String>,
    /// Display name of the sender as set in their WhatsApp profile
    #[serde(rename = "ProfileName")]
    pub profile_name: Option<String>,
}

/// Database row for a bot task
#[derive(Debug, sqlx::FromRow)]
struct TaskRow {
    id: Uuid,
    title: String,
    assignee_name: String,
    status: String,
    source_message_id: Option<Uuid>,
    created_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
}

impl From<TaskRow> for BotTask {
    fn from(row: TaskRow) -> Self {
        BotTask {
            id: row.id,
            title: row.title,
            assignee_name: row.assignee_name,
            status: BotTaskStatus::from_str(&row.status).unwrap_or(BotTaskStatus::Pending),
            source_message_id: row.source_message_id,
            created_at: row.created_at,
            completed_at: row.completed_at,
        }
    }
}

impl BotService {
    /// Create a new BotService instance
    pub fn new(db: PgPool, whatsapp_client: WhatsAppClient, messages: MessageService) -> Self {
        Self {
            db,
            whatsapp_client,
            messages,
        }
    }

    /// Process one inbound gateway message
    pub async fn process_webhook(&self, payload: WhatsAppWebhookPayload) -> AppResult<()> {
        tracing::debug!("Processing webhook message from: {}", payload.from);

        if payload.body.trim().is_empty() {
            tracing::debug!("Skipping message without text body");
            return Ok(());
        }

        let stored = self
            .messages
            .ingest(IngestMessageInput {
                channel: "whatsapp".to_string(),
                sender: payload.from.clone(),
                profile_name: payload.profile_name.clone(),
                text: payload.body.clone(),
                external_id: payload.message_sid.clone(),
            })
            .await?;

        if !stored.is_bot_command {
            return Ok(());
        }

        let reply = match self
            .build_reply(&stored, payload.profile_name.as_deref())
            .await
        {
            Ok(text) => text,
            Err(e) => format!("Error: {}", e),
        };

        if let Err(e) = self.whatsapp_client.send_message(&payload.from, &reply).await {
            tracing::warn!("Failed to send bot reply to {}: {}", payload.from, e);
        }

        Ok(())
    }

    /// Render the reply for a stored bot message
    async fn build_reply(
        &self,
        message: &InboundMessage,
        profile_name: Option<&str>,
    ) -> AppResult<String> {
        let parsed = parse_message(&message.body);

        match parsed.command {
            BotCommand::Help => Ok(format_help_response()),
            BotCommand::ListTasks => {
                // Without a profile name there is nobody to look up tasks for
                let tasks = match profile_name {
                    Some(name) => self.tasks_for_assignee(name).await?,
                    None => Vec::new(),
                };
                Ok(format_task_list(&tasks))
            }
            BotCommand::CreateTask {
                assignee,
                task_text,
            } => {
                let task = self
                    .create_task(&assignee, &task_text, Some(message.id))
                    .await?;
                Ok(format_task_created(&task.assignee_name, &task.title))
            }
            BotCommand::Unknown => Ok(format_unknown_response()),
        }
    }

    /// Tasks shown in a chat reply: pending first, oldest first within each group
    async fn tasks_for_assignee(&self, assignee: &str) -> AppResult<Vec<BotTask>> {
        let rows = sqlx::query_as::<_, TaskRow>(
            r#"
            SELECT id, title, assignee_name, status, source_message_id, created_at, completed_at
            FROM bot_tasks
            WHERE LOWER(assignee_name) = LOWER($1)
              AND status != 'cancelled'
            ORDER BY CASE status WHEN 'pending' THEN 0 ELSE 1 END, created_at ASC
            "#,
        )
        .bind(assignee)
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(BotTask::from).collect())
    }

    /// Create a task
    pub async fn create_task(
        &self,
        assignee: &str,
        title: &str,
        source_message_id: Option<Uuid>,
    ) -> AppResult<BotTask> {
        if title.trim().is_empty() {
            return Err(AppError::Validation {
                field: "title".to_string(),
                message: "Task title cannot be empty".to_string(),
            });
        }

        let row = sqlx::query_as::<_, TaskRow>(
            r#"
            INSERT INTO bot_tasks (title, assignee_name, status, source_message_id)
            VALUES ($1, $2, 'pending', $3)
            RETURNING id, title, assignee_name, status, source_message_id, created_at, completed_at
            "#,
        )
        .bind(title.trim())
        .bind(assignee)
        .bind(source_message_id)
        .fetch_one(&self.db)
        .await?;

        Ok(row.into())
    }

    /// List tasks, optionally filtered by assignee and status
    pub async fn get_tasks(
        &self,
        assignee: Option<String>,
        status: Option<BotTaskStatus>,
    ) -> AppResult<Vec<BotTask>> {
        let rows = sqlx::query_as::<_, TaskRow>(
            r#"
            SELECT id, title, assignee_name, status, source_message_id, created_at, completed_at
            FROM bot_tasks
            WHERE ($1::text IS NULL OR LOWER(assignee_name) = LOWER($1))
              AND ($2::text IS NULL OR status = $2)
            ORDER BY created_at DESC
            "#,
        )
        .bind(&assignee)
        .bind(status.map(|s| s.as_str().to_string()))
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(BotTask::from).collect())
    }

    /// Mark a pending task as completed
    pub async fn complete_task(&self, task_id: Uuid) -> AppResult<BotTask> {
        let existing = self.get_task(task_id).await?;

        if existing.status != BotTaskStatus::Pending {
            return Err(AppError::InvalidStateTransition(format!(
                "Task is already {}",
                existing.status
            )));
        }

        let row = sqlx::query_as::<_, TaskRow>(
            r#"
            UPDATE bot_tasks
            SET status = 'completed', completed_at = NOW()
            WHERE id = $1
            RETURNING id, title, assignee_name, status, source_message_id, created_at, completed_at
            "#,
        )
        .bind(task_id)
        .fetch_one(&self.db)
        .await?;

        Ok(row.into())
    }

    /// Cancel a pending task
    pub async fn cancel_task(&self, task_id: Uuid) -> AppResult<BotTask> {
        let existing = self.get_task(task_id).await?;

        if existing.status != BotTaskStatus::Pending {
            return Err(AppError::InvalidStateTransition(format!(
                "Task is already {}",
                existing.status
            )));
        }

        let row = sqlx::query_as::<_, TaskRow>(
            r#"
            UPDATE bot_tasks
            SET status = 'cancelled'
            WHERE id = $1
            RETURNING id, title, assignee_name, status, source_message_id, created_at, completed_at
            "#,
        )
        .bind(task_id)
        .fetch_one(&self.db)
        .await?;

        Ok(row.into())
    }

    async fn get_task(&self, task_id: Uuid) -> AppResult<BotTask> {
        let row = sqlx::query_as::<_, TaskRow>(
            r#"
            SELECT id, title, assignee_name, status, source_message_id, created_at, completed_at
            FROM bot_tasks
            WHERE id = $1
            "#,
        )
        .bind(task_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Task {} not found", task_id)))?;

        Ok(row.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_webhook_payload_deserialization() {
        let body = "From=whatsapp%3A%2B31612345678&Body=%40bot+help&MessageSid=SM123&ProfileName=Jan";
        let payload: WhatsAppWebhookPayload = serde_urlencoded::from_str(body).unwrap();

        assert_eq!(payload.from, "whatsapp:+31612345678");
        assert_eq!(payload.body, "@bot help");
        assert_eq!(payload.message_sid.as_deref(), Some("SM123"));
        assert_eq!(payload.profile_name.as_deref(), Some("Jan"));
    }

    #[test]
    fn test_webhook_payload_minimal_fields() {
        let body = "From=whatsapp%3A%2B31612345678";
        let payload: WhatsAppWebhookPayload = serde_urlencoded::from_str(body).unwrap();

        assert_eq!(payload.from, "whatsapp:+31612345678");
        assert_eq!(payload.body, "");
        assert!(payload.message_sid.is_none());
        assert!(payload.profile_name.is_none());
    }
}
