//! Hub and transport route management service

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use shared::models::{Hub, HubKind, TransportRoute};
use shared::types::Currency;
use shared::validation::{validate_hub_code, validate_transit_days};

/// Logistics service for the hub network and its lanes
#[derive(Clone)]
pub struct LogisticsService {
    db: PgPool,
}

/// Database row for a hub
#[derive(Debug, sqlx::FromRow)]
struct HubRow {
    id: Uuid,
    name: String,
    code: String,
    country: String,
    city: Option<String>,
    kind: String,
    created_at: DateTime<Utc>,
}

impl From<HubRow> for Hub {
    fn from(row: HubRow) -> Self {
        Hub {
            id: row.id,
            name: row.name,
            code: row.code,
            country: row.country,
            city: row.city,
            kind: HubKind::from_str(&row.kind).unwrap_or(HubKind::Both),
            created_at: row.created_at,
        }
    }
}

/// Database row for a transport route
#[derive(Debug, sqlx::FromRow)]
struct RouteRow {
    id: Uuid,
    origin_hub_id: Uuid,
    destination_hub_id: Uuid,
    carrier: Option<String>,
    transit_days: i32,
    cost_per_pallet: Option<Decimal>,
    currency: String,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<RouteRow> for TransportRoute {
    fn from(row: RouteRow) -> Self {
        TransportRoute {
            id: row.id,
            origin_hub_id: row.origin_hub_id,
            destination_hub_id: row.destination_hub_id,
            carrier: row.carrier,
            transit_days: row.transit_days,
            cost_per_pallet: row.cost_per_pallet,
            currency: Currency::from_code(&row.currency).unwrap_or_default(),
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Input for creating a hub
#[derive(Debug, Deserialize)]
pub struct CreateHubInput {
    pub name: String,
    pub code: String,
    pub country: String,
    pub city: Option<String>,
    pub kind: HubKind,
}

/// Input for creating a transport route
#[derive(Debug, Deserialize)]
pub struct CreateRouteInput {
    pub origin_hub_id: Uuid,
    pub destination_hub_id: Uuid,
    pub carrier: Option<String>,
    pub transit_days: i32,
    pub cost_per_pallet: Option<Decimal>,
    pub currency: Option<Currency>,
}

/// Input for updating a transport route
#[derive(Debug, Deserialize)]
pub struct UpdateRouteInput {
    pub carrier: Option<String>,
    pub transit_days: Option<i32>,
    pub cost_per_pallet: Option<Decimal>,
    pub currency: Option<Currency>,
    pub is_active: Option<bool>,
}

impl LogisticsService {
    /// Create a new LogisticsService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Get all hubs for a business
    pub async fn get_hubs(&self, business_id: Uuid) -> AppResult<Vec<Hub>> {
        let rows = sqlx::query_as::<_, HubRow>(
            r#"
            SELECT id, name, code, country, city, kind, created_at
            FROM hubs
            WHERE business_id = $1
            ORDER BY code ASC
            "#,
        )
        .bind(business_id)
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(|r| r.into()).collect())
    }

    /// Get a hub by ID
    pub async fn get_hub(&self, business_id: Uuid, hub_id: Uuid) -> AppResult<Hub> {
        let row = sqlx::query_as::<_, HubRow>(
            r#"
            SELECT id, name, code, country, city, kind, created_at
            FROM hubs
            WHERE id = $1 AND business_id = $2
            "#,
        )
        .bind(hub_id)
        .bind(business_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Hub".to_string()))?;

        Ok(row.into())
    }

    /// Create a new hub
    pub async fn create_hub(&self, business_id: Uuid, input: CreateHubInput) -> AppResult<Hub> {
        if input.name.trim().is_empty() {
            return Err(AppError::Validation {
                field: "name".to_string(),
                message: "Hub name cannot be empty".to_string(),
            });
        }

        if let Err(msg) = validate_hub_code(&input.code) {
            return Err(AppError::Validation {
                field: "code".to_string(),
                message: msg.to_string(),
            });
        }

        // Hub codes are unique per business
        let existing = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM hubs WHERE business_id = $1 AND code = $2",
        )
        .bind(business_id)
        .bind(&input.code)
        .fetch_one(&self.db)
        .await?;

        if existing > 0 {
            return Err(AppError::Conflict {
                resource: "hub".to_string(),
                message: "A hub with this code already exists".to_string(),
            });
        }

        let row = sqlx::query_as::<_, HubRow>(
            r#"
            INSERT INTO hubs (business_id, name, code, country, city, kind)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, name, code, country, city, kind, created_at
            "#,
        )
        .bind(business_id)
        .bind(&input.name)
        .bind(&input.code)
        .bind(&input.country)
        .bind(&input.city)
        .bind(input.kind.as_str())
        .fetch_one(&self.db)
        .await?;

        Ok(row.into())
    }

    /// Delete a hub
    pub async fn delete_hub(&self, business_id: Uuid, hub_id: Uuid) -> AppResult<()> {
        let exists = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM hubs WHERE id = $1 AND business_id = $2",
        )
        .bind(hub_id)
        .bind(business_id)
        .fetch_one(&self.db)
        .await?;

        if exists == 0 {
            return Err(AppError::NotFound("Hub".to_string()));
        }

        // Routes and party defaults reference hubs
        let route_count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM transport_routes WHERE origin_hub_id = $1 OR destination_hub_id = $1",
        )
        .bind(hub_id)
        .fetch_one(&self.db)
        .await?;

        if route_count > 0 {
            return Err(AppError::Validation {
                field: "hub_id".to_string(),
                message: format!(
                    "Cannot delete hub: {} routes are linked to it",
                    route_count
                ),
            });
        }

        let party_count = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT (SELECT COUNT(*) FROM suppliers WHERE origin_hub_id = $1)
                 + (SELECT COUNT(*) FROM customers WHERE destination_hub_id = $1)
            "#,
        )
        .bind(hub_id)
        .fetch_one(&self.db)
        .await?;

        if party_count > 0 {
            return Err(AppError::Validation {
                field: "hub_id".to_string(),
                message: format!(
                    "Cannot delete hub: {} suppliers or customers use it",
                    party_count
                ),
            });
        }

        sqlx::query("DELETE FROM hubs WHERE id = $1")
            .bind(hub_id)
            .execute(&self.db)
            .await?;

        Ok(())
    }

    /// Get all transport routes for a business
    pub async fn get_routes(
        &self,
        business_id: Uuid,
        include_inactive: bool,
    ) -> AppResult<Vec<TransportRoute>> {
        let rows = sqlx::query_as::<_, RouteRow>(
            r#"
            SELECT r.id, r.origin_hub_id, r.destination_hub_id, r.carrier,
                   r.transit_days, r.cost_per_pallet, r.currency, r.is_active,
                   r.created_at, r.updated_at
            FROM transport_routes r
            JOIN hubs o ON o.id = r.origin_hub_id
            WHERE o.business_id = $1 AND ($2 OR r.is_active = true)
            ORDER BY r.transit_days ASC, r.created_at ASC
            "#,
        )
        .bind(business_id)
        .bind(include_inactive)
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(|r| r.into()).collect())
    }

    /// Get a transport route by ID
    pub async fn get_route(&self, business_id: Uuid, route_id: Uuid) -> AppResult<TransportRoute> {
        let row = sqlx::query_as::<_, RouteRow>(
            r#"
            SELECT r.id, r.origin_hub_id, r.destination_hub_id, r.carrier,
                   r.transit_days, r.cost_per_pallet, r.currency, r.is_active,
                   r.created_at, r.updated_at
            FROM transport_routes r
            JOIN hubs o ON o.id = r.origin_hub_id
            WHERE r.id = $1 AND o.business_id = $2
            "#,
        )
        .bind(route_id)
        .bind(business_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Transport route".to_string()))?;

        Ok(row.into())
    }

    /// Create a new transport route
    pub async fn create_route(
        &self,
        business_id: Uuid,
        input: CreateRouteInput,
    ) -> AppResult<TransportRoute> {
        if input.origin_hub_id == input.destination_hub_id {
            return Err(AppError::Validation {
                field: "destination_hub_id".to_string(),
                message: "Route endpoints must differ".to_string(),
            });
        }

        if let Err(msg) = validate_transit_days(input.transit_days) {
            return Err(AppError::Validation {
                field: "transit_days".to_string(),
                message: msg.to_string(),
            });
        }

        // Both endpoints must exist and serve their end of the lane
        let origin = self.get_hub(business_id, input.origin_hub_id).await?;
        if !origin.kind.serves_origin() {
            return Err(AppError::Validation {
                field: "origin_hub_id".to_string(),
                message: "Hub cannot serve as an origin".to_string(),
            });
        }

        let destination = self.get_hub(business_id, input.destination_hub_id).await?;
        if !destination.kind.serves_destination() {
            return Err(AppError::Validation {
                field: "destination_hub_id".to_string(),
                message: "Hub cannot serve as a destination".to_string(),
            });
        }

        let currency = input.currency.unwrap_or_default();

        let row = sqlx::query_as::<_, RouteRow>(
            r#"
            INSERT INTO transport_routes (origin_hub_id, destination_hub_id, carrier,
                                          transit_days, cost_per_pallet, currency)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, origin_hub_id, destination_hub_id, carrier, transit_days,
                      cost_per_pallet, currency, is_active, created_at, updated_at
            "#,
        )
        .bind(input.origin_hub_id)
        .bind(input.destination_hub_id)
        .bind(&input.carrier)
        .bind(input.transit_days)
        .bind(&input.cost_per_pallet)
        .bind(currency.code())
        .fetch_one(&self.db)
        .await?;

        Ok(row.into())
    }

    /// Update a transport route
    pub async fn update_route(
        &self,
        business_id: Uuid,
        route_id: Uuid,
        input: UpdateRouteInput,
    ) -> AppResult<TransportRoute> {
        let existing = self.get_route(business_id, route_id).await?;

        if let Some(days) = input.transit_days {
            if let Err(msg) = validate_transit_days(days) {
                return Err(AppError::Validation {
                    field: "transit_days".to_string(),
                    message: msg.to_string(),
                });
            }
        }

        let carrier = input.carrier.or(existing.carrier);
        let transit_days = input.transit_days.unwrap_or(existing.transit_days);
        let cost_per_pallet = input.cost_per_pallet.or(existing.cost_per_pallet);
        let currency = input.currency.unwrap_or(existing.currency);
        let is_active = input.is_active.unwrap_or(existing.is_active);

        let row = sqlx::query_as::<_, RouteRow>(
            r#"
            UPDATE transport_routes
            SET carrier = $1, transit_days = $2, cost_per_pallet = $3,
                currency = $4, is_active = $5, updated_at = NOW()
            WHERE id = $6
            RETURNING id, origin_hub_id, destination_hub_id, carrier, transit_days,
                      cost_per_pallet, currency, is_active, created_at, updated_at
            "#,
        )
        .bind(&carrier)
        .bind(transit_days)
        .bind(&cost_per_pallet)
        .bind(currency.code())
        .bind(is_active)
        .bind(route_id)
        .fetch_one(&self.db)
        .await?;

        Ok(row.into())
    }

    /// Delete a transport route
    pub async fn delete_route(&self, business_id: Uuid, route_id: Uuid) -> AppResult<()> {
        // Verify ownership through the origin hub
        self.get_route(business_id, route_id).await?;

        sqlx::query("DELETE FROM transport_routes WHERE id = $1")
            .bind(route_id)
            .execute(&self.db)
            .await?;

        Ok(())
    }
}
