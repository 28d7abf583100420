//! Commercial opportunity models

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::Currency;

/// A commercial offer in progress for a need/supplier match
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Opportunity {
    pub id: Uuid,
    pub need_id: Uuid,
    pub supplier_id: Uuid,
    pub supplier_price_id: Option<Uuid>,
    pub offer_price: Decimal,
    pub currency: Currency,
    pub status: OpportunityStatus,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Opportunity {
    /// Active means in play and not yet converted to an order
    pub fn is_active(&self) -> bool {
        self.status == OpportunityStatus::Active
    }
}

/// Lifecycle status of an opportunity
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OpportunityStatus {
    Active,
    Converted,
    Cancelled,
}

impl OpportunityStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OpportunityStatus::Active => "active",
            OpportunityStatus::Converted => "converted",
            OpportunityStatus::Cancelled => "cancelled",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "active" => Some(OpportunityStatus::Active),
            "converted" => Some(OpportunityStatus::Converted),
            "cancelled" => Some(OpportunityStatus::Cancelled),
            _ => None,
        }
    }
}

impl std::fmt::Display for OpportunityStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
