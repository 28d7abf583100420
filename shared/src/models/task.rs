//! Bot task and inbound message models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A task created through the WhatsApp bot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotTask {
    pub id: Uuid,
    pub title: String,
    pub assignee_name: String,
    pub status: BotTaskStatus,
    pub source_message_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

/// Lifecycle status of a bot task
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BotTaskStatus {
    Pending,
    Completed,
    Cancelled,
}

impl BotTaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BotTaskStatus::Pending => "pending",
            BotTaskStatus::Completed => "completed",
            BotTaskStatus::Cancelled => "cancelled",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(BotTaskStatus::Pending),
            "completed" => Some(BotTaskStatus::Completed),
            "cancelled" => Some(BotTaskStatus::Cancelled),
            _ => None,
        }
    }
}

impl std::fmt::Display for BotTaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An inbound chat message stored by the ingestion pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InboundMessage {
    pub id: Uuid,
    /// Source channel, e.g. "whatsapp" or "web"
    pub channel: String,
    pub sender: String,
    pub profile_name: Option<String>,
    pub body: String,
    /// Gateway message id, when the channel supplies one
    pub external_id: Option<String>,
    pub is_bot_command: bool,
    pub created_at: DateTime<Utc>,
}
