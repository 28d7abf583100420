//! Opportunity management service
//!
//! An opportunity pins a concrete offer price onto a need/supplier match.
//! Transitions are one-way: active records can convert or cancel, and both
//! end states are terminal.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use shared::models::{Opportunity, OpportunityStatus};
use shared::types::Currency;
use shared::validation::validate_positive_price;

/// Opportunity service for commercial offers in progress
#[derive(Clone)]
pub struct OpportunityService {
    db: PgPool,
}

/// Database row for an opportunity
#[derive(Debug, sqlx::FromRow)]
struct OpportunityRow {
    id: Uuid,
    need_id: Uuid,
    supplier_id: Uuid,
    supplier_price_id: Option<Uuid>,
    offer_price: Decimal,
    currency: String,
    status: String,
    notes: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<OpportunityRow> for Opportunity {
    fn from(row: OpportunityRow) -> Self {
        Opportunity {
            id: row.id,
            need_id: row.need_id,
            supplier_id: row.supplier_id,
            supplier_price_id: row.supplier_price_id,
            offer_price: row.offer_price,
            currency: Currency::from_code(&row.currency).unwrap_or_default(),
            status: OpportunityStatus::from_str(&row.status).unwrap_or(OpportunityStatus::Active),
            notes: row.notes,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Input for opening an opportunity
#[derive(Debug, Deserialize)]
pub struct CreateOpportunityInput {
    pub need_id: Uuid,
    pub supplier_id: Uuid,
    pub supplier_price_id: Option<Uuid>,
    pub offer_price: Decimal,
    pub currency: Option<Currency>,
    pub notes: Option<String>,
}

/// Input for updating an opportunity
#[derive(Debug, Deserialize)]
pub struct UpdateOpportunityInput {
    pub offer_price: Option<Decimal>,
    pub supplier_price_id: Option<Uuid>,
    pub notes: Option<String>,
}

impl OpportunityService {
    /// Create a new OpportunityService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// List opportunities for a business, optionally by status
    pub async fn get_opportunities(
        &self,
        business_id: Uuid,
        status: Option<OpportunityStatus>,
    ) -> AppResult<Vec<Opportunity>> {
        let status_str = status.map(|s| s.as_str().to_string());

        let rows = sqlx::query_as::<_, OpportunityRow>(
            r#"
            SELECT o.id, o.need_id, o.supplier_id, o.supplier_price_id, o.offer_price,
                   o.currency, o.status, o.notes, o.created_at, o.updated_at
            FROM opportunities o
            JOIN customer_needs n ON n.id = o.need_id
            JOIN customers c ON c.id = n.customer_id
            WHERE c.business_id = $1
              AND ($2::text IS NULL OR o.status = $2)
            ORDER BY o.created_at DESC
            "#,
        )
        .bind(business_id)
        .bind(status_str)
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(|r| r.into()).collect())
    }

    /// Get an opportunity by ID
    pub async fn get_opportunity(
        &self,
        business_id: Uuid,
        opportunity_id: Uuid,
    ) -> AppResult<Opportunity> {
        let row = sqlx::query_as::<_, OpportunityRow>(
            r#"
            SELECT o.id, o.need_id, o.supplier_id, o.supplier_price_id, o.offer_price,
                   o.currency, o.status, o.notes, o.created_at, o.updated_at
            FROM opportunities o
            JOIN customer_needs n ON n.id = o.need_id
            JOIN customers c ON c.id = n.customer_id
            WHERE o.id = $1 AND c.business_id = $2
            "#,
        )
        .bind(opportunity_id)
        .bind(business_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Opportunity".to_string()))?;

        Ok(row.into())
    }

    /// Open a new opportunity on a need/supplier match
    pub async fn create_opportunity(
        &self,
        business_id: Uuid,
        input: CreateOpportunityInput,
    ) -> AppResult<Opportunity> {
        if let Err(msg) = validate_positive_price(input.offer_price) {
            return Err(AppError::Validation {
                field: "offer_price".to_string(),
                message: msg.to_string(),
            });
        }

        // Need must exist, belong to the business, and still be open
        let need_status = sqlx::query_scalar::<_, String>(
            r#"
            SELECT n.status
            FROM customer_needs n
            JOIN customers c ON c.id = n.customer_id
            WHERE n.id = $1 AND c.business_id = $2
            "#,
        )
        .bind(input.need_id)
        .bind(business_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Customer need".to_string()))?;

        if need_status != "open" {
            return Err(AppError::Validation {
                field: "need_id".to_string(),
                message: format!("Need is {}, not open", need_status),
            });
        }

        // Supplier must exist and belong to the business
        let supplier_exists = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM suppliers WHERE id = $1 AND business_id = $2",
        )
        .bind(input.supplier_id)
        .bind(business_id)
        .fetch_one(&self.db)
        .await?;

        if supplier_exists == 0 {
            return Err(AppError::NotFound("Supplier".to_string()));
        }

        if let Some(price_id) = input.supplier_price_id {
            let price_matches = sqlx::query_scalar::<_, i64>(
                "SELECT COUNT(*) FROM supplier_prices WHERE id = $1 AND supplier_id = $2",
            )
            .bind(price_id)
            .bind(input.supplier_id)
            .fetch_one(&self.db)
            .await?;

            if price_matches == 0 {
                return Err(AppError::Validation {
                    field: "supplier_price_id".to_string(),
                    message: "Price does not belong to this supplier".to_string(),
                });
            }
        }

        // One active opportunity per need/supplier pair
        let active_exists = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM opportunities WHERE need_id = $1 AND supplier_id = $2 AND status = 'active'",
        )
        .bind(input.need_id)
        .bind(input.supplier_id)
        .fetch_one(&self.db)
        .await?;

        if active_exists > 0 {
            return Err(AppError::Conflict {
                resource: "opportunity".to_string(),
                message: "An active opportunity already exists for this need and supplier"
                    .to_string(),
            });
        }

        let currency = input.currency.unwrap_or_default();

        let row = sqlx::query_as::<_, OpportunityRow>(
            r#"
            INSERT INTO opportunities (need_id, supplier_id, supplier_price_id,
                                       offer_price, currency, status, notes)
            VALUES ($1, $2, $3, $4, $5, 'active', $6)
            RETURNING id, need_id, supplier_id, supplier_price_id, offer_price,
                      currency, status, notes, created_at, updated_at
            "#,
        )
        .bind(input.need_id)
        .bind(input.supplier_id)
        .bind(&input.supplier_price_id)
        .bind(input.offer_price)
        .bind(currency.code())
        .bind(&input.notes)
        .fetch_one(&self.db)
        .await?;

        Ok(row.into())
    }

    /// Update an opportunity's offer terms
    pub async fn update_opportunity(
        &self,
        business_id: Uuid,
        opportunity_id: Uuid,
        input: UpdateOpportunityInput,
    ) -> AppResult<Opportunity> {
        let existing = self.get_opportunity(business_id, opportunity_id).await?;

        // Terms only change while the offer is in play
        if existing.status != OpportunityStatus::Active {
            return Err(AppError::InvalidStateTransition(format!(
                "Cannot update a {} opportunity",
                existing.status
            )));
        }

        if let Some(price) = input.offer_price {
            if let Err(msg) = validate_positive_price(price) {
                return Err(AppError::Validation {
                    field: "offer_price".to_string(),
                    message: msg.to_string(),
                });
            }
        }

        let offer_price = input.offer_price.unwrap_or(existing.offer_price);
        let supplier_price_id = input.supplier_price_id.or(existing.supplier_price_id);
        let notes = input.notes.or(existing.notes);

        let row = sqlx::query_as::<_, OpportunityRow>(
            r#"
            UPDATE opportunities
            SET offer_price = $1, supplier_price_id = $2, notes = $3, updated_at = NOW()
            WHERE id = $4
            RETURNING id, need_id, supplier_id, supplier_price_id, offer_price,
                      currency, status, notes, created_at, updated_at
            "#,
        )
        .bind(offer_price)
        .bind(&supplier_price_id)
        .bind(&notes)
        .bind(opportunity_id)
        .fetch_one(&self.db)
        .await?;

        Ok(row.into())
    }

    /// Convert an active opportunity into a closed deal
    pub async fn convert_opportunity(
        &self,
        business_id: Uuid,
        opportunity_id: Uuid,
    ) -> AppResult<Opportunity> {
        self.transition(business_id, opportunity_id, OpportunityStatus::Converted)
            .await
    }

    /// Cancel an active opportunity
    pub async fn cancel_opportunity(
        &self,
        business_id: Uuid,
        opportunity_id: Uuid,
    ) -> AppResult<Opportunity> {
        self.transition(business_id, opportunity_id, OpportunityStatus::Cancelled)
            .await
    }

    /// Move an opportunity out of the active state
    async fn transition(
        &self,
        business_id: Uuid,
        opportunity_id: Uuid,
        target: OpportunityStatus,
    ) -> AppResult<Opportunity> {
        let existing = self.get_opportunity(business_id, opportunity_id).await?;

        if existing.status != OpportunityStatus::Active {
            return Err(AppError::InvalidStateTransition(format!(
                "Opportunity is already {}",
                existing.status
            )));
        }

        let mut tx = self.db.begin().await?;

        let row = sqlx::query_as::<_, OpportunityRow>(
            r#"
            UPDATE opportunities
            SET status = $1, updated_at = NOW()
            WHERE id = $2
            RETURNING id, need_id, supplier_id, supplier_price_id, offer_price,
                      currency, status, notes, created_at, updated_at
            "#,
        )
        .bind(target.as_str())
        .bind(opportunity_id)
        .fetch_one(&mut *tx)
        .await?;

        // Converting an opportunity fulfills the need behind it
        if target == OpportunityStatus::Converted {
            sqlx::query("UPDATE customer_needs SET status = 'fulfilled', updated_at = NOW() WHERE id = $1")
                .bind(existing.need_id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        Ok(row.into())
    }
}
