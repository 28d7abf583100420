//! Hub and transport route models

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::Currency;

/// A logistics waypoint produce moves through
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hub {
    pub id: Uuid,
    pub name: String,
    /// Uppercase short code, unique across hubs
    pub code: String,
    pub country: String,
    pub city: Option<String>,
    pub kind: HubKind,
    pub created_at: DateTime<Utc>,
}

/// Which end of a route a hub can serve
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum HubKind {
    Origin,
    Destination,
    Both,
}

impl HubKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            HubKind::Origin => "origin",
            HubKind::Destination => "destination",
            HubKind::Both => "both",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "origin" => Some(HubKind::Origin),
            "destination" => Some(HubKind::Destination),
            "both" => Some(HubKind::Both),
            _ => None,
        }
    }

    /// Whether the hub can ship as an origin
    pub fn serves_origin(&self) -> bool {
        matches!(self, HubKind::Origin | HubKind::Both)
    }

    /// Whether the hub can receive as a destination
    pub fn serves_destination(&self) -> bool {
        matches!(self, HubKind::Destination | HubKind::Both)
    }
}

impl std::fmt::Display for HubKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A direct lane between two hubs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransportRoute {
    pub id: Uuid,
    pub origin_hub_id: Uuid,
    pub destination_hub_id: Uuid,
    pub carrier: Option<String>,
    pub transit_days: i32,
    pub cost_per_pallet: Option<Decimal>,
    pub currency: Currency,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
