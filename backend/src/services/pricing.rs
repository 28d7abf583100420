//! Supplier price management service

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use shared::models::{ProductUnit, SupplierPrice};
use shared::types::Currency;
use shared::validation::{validate_positive_price, validate_validity_window};

/// Pricing service for supplier quote windows
#[derive(Clone)]
pub struct PricingService {
    db: PgPool,
}

/// Database row for a supplier price
#[derive(Debug, sqlx::FromRow)]
struct PriceRow {
    id: Uuid,
    supplier_id: Uuid,
    product_id: Uuid,
    packaging_spec_id: Option<Uuid>,
    price_per_unit: Decimal,
    currency: String,
    unit: String,
    valid_from: NaiveDate,
    valid_until: Option<NaiveDate>,
    incoterm: Option<String>,
    notes: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<PriceRow> for SupplierPrice {
    fn from(row: PriceRow) -> Self {
        SupplierPrice {
            id: row.id,
            supplier_id: row.supplier_id,
            product_id: row.product_id,
            packaging_spec_id: row.packaging_spec_id,
            price_per_unit: row.price_per_unit,
            currency: Currency::from_code(&row.currency).unwrap_or_default(),
            unit: ProductUnit::from_str(&row.unit).unwrap_or_default(),
            valid_from: row.valid_from,
            valid_until: row.valid_until,
            incoterm: row.incoterm,
            notes: row.notes,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Filters for the price list
#[derive(Debug, Default, Deserialize)]
pub struct PriceListFilter {
    pub supplier_id: Option<Uuid>,
    pub product_id: Option<Uuid>,
    pub currency: Option<Currency>,
    /// Only prices whose validity window covers today
    #[serde(default)]
    pub only_current: bool,
}

/// Input for quoting a supplier price
#[derive(Debug, Deserialize)]
pub struct CreatePriceInput {
    pub supplier_id: Uuid,
    pub product_id: Uuid,
    pub packaging_spec_id: Option<Uuid>,
    pub price_per_unit: Decimal,
    pub currency: Option<Currency>,
    pub unit: Option<ProductUnit>,
    pub valid_from: NaiveDate,
    pub valid_until: Option<NaiveDate>,
    pub incoterm: Option<String>,
    pub notes: Option<String>,
}

/// Input for updating a supplier price
#[derive(Debug, Deserialize)]
pub struct UpdatePriceInput {
    pub price_per_unit: Option<Decimal>,
    pub valid_from: Option<NaiveDate>,
    pub valid_until: Option<NaiveDate>,
    pub incoterm: Option<String>,
    pub notes: Option<String>,
}

impl PricingService {
    /// Create a new PricingService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// List supplier prices, optionally filtered
    pub async fn get_prices(
        &self,
        business_id: Uuid,
        filter: PriceListFilter,
    ) -> AppResult<Vec<SupplierPrice>> {
        let currency = filter.currency.map(|c| c.code().to_string());

        let rows = sqlx::query_as::<_, PriceRow>(
            r#"
            SELECT p.id, p.supplier_id, p.product_id, p.packaging_spec_id,
                   p.price_per_unit, p.currency, p.unit, p.valid_from, p.valid_until,
                   p.incoterm, p.notes, p.created_at, p.updated_at
            FROM supplier_prices p
            JOIN suppliers s ON s.id = p.supplier_id
            WHERE s.business_id = $1
              AND ($2::uuid IS NULL OR p.supplier_id = $2)
              AND ($3::uuid IS NULL OR p.product_id = $3)
              AND ($4::text IS NULL OR p.currency = $4)
              AND (NOT $5 OR (p.valid_from <= CURRENT_DATE
                              AND (p.valid_until IS NULL OR p.valid_until >= CURRENT_DATE)))
            ORDER BY p.valid_from DESC, p.created_at DESC
            "#,
        )
        .bind(business_id)
        .bind(filter.supplier_id)
        .bind(filter.product_id)
        .bind(currency)
        .bind(filter.only_current)
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(|r| r.into()).collect())
    }

    /// Get a supplier price by ID
    pub async fn get_price(&self, business_id: Uuid, price_id: Uuid) -> AppResult<SupplierPrice> {
        let row = sqlx::query_as::<_, PriceRow>(
            r#"
            SELECT p.id, p.supplier_id, p.product_id, p.packaging_spec_id,
                   p.price_per_unit, p.currency, p.unit, p.valid_from, p.valid_until,
                   p.incoterm, p.notes, p.created_at, p.updated_at
            FROM supplier_prices p
            JOIN suppliers s ON s.id = p.supplier_id
            WHERE p.id = $1 AND s.business_id = $2
            "#,
        )
        .bind(price_id)
        .bind(business_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Supplier price".to_string()))?;

        Ok(row.into())
    }

    /// Record a new supplier price
    pub async fn create_price(
        &self,
        business_id: Uuid,
        input: CreatePriceInput,
    ) -> AppResult<SupplierPrice> {
        if let Err(msg) = validate_positive_price(input.price_per_unit) {
            return Err(AppError::Validation {
                field: "price_per_unit".to_string(),
                message: msg.to_string(),
            });
        }

        if let Err(msg) = validate_validity_window(input.valid_from, input.valid_until) {
            return Err(AppError::Validation {
                field: "valid_until".to_string(),
                message: msg.to_string(),
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

        // Product must exist; grab its default unit for the fallback
        let product_unit = sqlx::query_scalar::<_, String>(
            "SELECT default_unit FROM products WHERE id = $1 AND business_id = $2",
        )
        .bind(input.product_id)
        .bind(business_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Product".to_string()))?;

        if let Some(spec_id) = input.packaging_spec_id {
            let spec_exists = sqlx::query_scalar::<_, i64>(
                "SELECT COUNT(*) FROM packaging_specs WHERE id = $1 AND product_id = $2",
            )
            .bind(spec_id)
            .bind(input.product_id)
            .fetch_one(&self.db)
            .await?;

            if spec_exists == 0 {
                return Err(AppError::NotFound("Packaging spec".to_string()));
            }
        }

        let currency = input.currency.unwrap_or_default();
        let unit = input
            .unit
            .or_else(|| ProductUnit::from_str(&product_unit))
            .unwrap_or_default();

        let row = sqlx::query_as::<_, PriceRow>(
            r#"
            INSERT INTO supplier_prices (supplier_id, product_id, packaging_spec_id,
                                         price_per_unit, currency, unit, valid_from,
                                         valid_until, incoterm, notes)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING id, supplier_id, product_id, packaging_spec_id, price_per_unit,
                      currency, unit, valid_from, valid_until, incoterm, notes,
                      created_at, updated_at
            "#,
        )
        .bind(input.supplier_id)
        .bind(input.product_id)
        .bind(&input.packaging_spec_id)
        .bind(input.price_per_unit)
        .bind(currency.code())
        .bind(unit.as_str())
        .bind(input.valid_from)
        .bind(&input.valid_until)
        .bind(&input.incoterm)
        .bind(&input.notes)
        .fetch_one(&self.db)
        .await?;

        Ok(row.into())
    }

    /// Update a supplier price
    pub async fn update_price(
        &self,
        business_id: Uuid,
        price_id: Uuid,
        input: UpdatePriceInput,
    ) -> AppResult<SupplierPrice> {
        let existing = self.get_price(business_id, price_id).await?;

        let price_per_unit = input.price_per_unit.unwrap_or(existing.price_per_unit);
        let valid_from = input.valid_from.unwrap_or(existing.valid_from);
        let valid_until = input.valid_until.or(existing.valid_until);
        let incoterm = input.incoterm.or(existing.incoterm);
        let notes = input.notes.or(existing.notes);

        if let Err(msg) = validate_positive_price(price_per_unit) {
            return Err(AppError::Validation {
                field: "price_per_unit".to_string(),
                message: msg.to_string(),
            });
        }

        if let Err(msg) = validate_validity_window(valid_from, valid_until) {
            return Err(AppError::Validation {
                field: "valid_until".to_string(),
                message: msg.to_string(),
            });
        }

        let row = sqlx::query_as::<_, PriceRow>(
            r#"
            UPDATE supplier_prices
            SET price_per_unit = $1, valid_from = $2, valid_until = $3,
                incoterm = $4, notes = $5, updated_at = NOW()
            WHERE id = $6
            RETURNING id, supplier_id, product_id, packaging_spec_id, price_per_unit,
                      currency, unit, valid_from, valid_until, incoterm, notes,
                      created_at, updated_at
            "#,
        )
        .bind(price_per_unit)
        .bind(valid_from)
        .bind(&valid_until)
        .bind(&incoterm)
        .bind(&notes)
        .bind(price_id)
        .fetch_one(&self.db)
        .await?;

        Ok(row.into())
    }

    /// Delete a supplier price
    pub async fn delete_price(&self, business_id: Uuid, price_id: Uuid) -> AppResult<()> {
        // Verify ownership through the supplier
        self.get_price(business_id, price_id).await?;

        // Opportunities keep their offer price; the link is severed by the
        // ON DELETE SET NULL constraint
        sqlx::query("DELETE FROM supplier_prices WHERE id = $1")
            .bind(price_id)
            .execute(&self.db)
            .await?;

        Ok(())
    }
}
