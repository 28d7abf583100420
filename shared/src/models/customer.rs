//! Customer and customer need models

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::ProductUnit;
use crate::types::Currency;

/// A buyer the brokerage sells to
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    pub id: Uuid,
    pub name: String,
    pub country: String,
    pub contact_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    /// Hub the customer usually receives at
    pub destination_hub_id: Option<Uuid>,
    pub is_active: bool,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A recurring demand a customer has registered
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerNeed {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub product_id: Uuid,
    pub packaging_spec_id: Option<Uuid>,
    pub quantity_per_week: Decimal,
    pub unit: ProductUnit,
    pub target_price: Option<Decimal>,
    pub currency: Currency,
    pub needed_from: Option<NaiveDate>,
    pub needed_until: Option<NaiveDate>,
    pub status: NeedStatus,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Lifecycle status of a customer need
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NeedStatus {
    Open,
    Fulfilled,
    Cancelled,
}

impl NeedStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            NeedStatus::Open => "open",
            NeedStatus::Fulfilled => "fulfilled",
            NeedStatus::Cancelled => "cancelled",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "open" => Some(NeedStatus::Open),
            "fulfilled" => Some(NeedStatus::Fulfilled),
            "cancelled" => Some(NeedStatus::Cancelled),
            _ => None,
        }
    }
}

impl std::fmt::Display for NeedStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
