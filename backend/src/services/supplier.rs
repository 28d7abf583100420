//! Supplier management service

use chrono::{DateTime, Utc};
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use shared::models::{HubKind, Supplier};
use shared::validation::{validate_email, validate_phone};

/// Supplier service for managing the supply side of the book
#[derive(Clone)]
pub struct SupplierService {
    db: PgPool,
}

/// Database row for a supplier
#[derive(Debug, sqlx::FromRow)]
struct SupplierRow {
    id: Uuid,
    name: String,
    country: String,
    region: Option<String>,
    contact_name: Option<String>,
    email: Option<String>,
    phone: Option<String>,
    origin_hub_id: Option<Uuid>,
    is_active: bool,
    notes: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<SupplierRow> for Supplier {
    fn from(row: SupplierRow) -> Self {
        Supplier {
            id: row.id,
            name: row.name,
            country: row.country,
            region: row.region,
            contact_name: row.contact_name,
            email: row.email,
            phone: row.phone,
            origin_hub_id: row.origin_hub_id,
            is_active: row.is_active,
            notes: row.notes,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Input for creating a supplier
#[derive(Debug, Deserialize)]
pub struct CreateSupplierInput {
    pub name: String,
    pub country: String,
    pub region: Option<String>,
    pub contact_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub origin_hub_id: Option<Uuid>,
    pub notes: Option<String>,
}

/// Input for updating a supplier
#[derive(Debug, Deserialize)]
pub struct UpdateSupplierInput {
    pub name: Option<String>,
    pub country: Option<String>,
    pub region: Option<String>,
    pub contact_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub origin_hub_id: Option<Uuid>,
    pub is_active: Option<bool>,
    pub notes: Option<String>,
}

impl SupplierService {
    /// Create a new SupplierService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Get all suppliers for a business
    pub async fn get_suppliers(
        &self,
        business_id: Uuid,
        include_inactive: bool,
    ) -> AppResult<Vec<Supplier>> {
        let rows = sqlx::query_as::<_, SupplierRow>(
            r#"
            SELECT id, name, country, region, contact_name, email, phone,
                   origin_hub_id, is_active, notes, created_at, updated_at
            FROM suppliers
            WHERE business_id = $1 AND ($2 OR is_active = true)
            ORDER BY name ASC
            "#,
        )
        .bind(business_id)
        .bind(include_inactive)
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(|r| r.into()).collect())
    }

    /// Get a supplier by ID
    pub async fn get_supplier(&self, business_id: Uuid, supplier_id: Uuid) -> AppResult<Supplier> {
        let row = sqlx::query_as::<_, SupplierRow>(
            r#"
            SELECT id, name, country, region, contact_name, email, phone,
                   origin_hub_id, is_active, notes, created_at, updated_at
            FROM suppliers
            WHERE id = $1 AND business_id = $2
            "#,
        )
        .bind(supplier_id)
        .bind(business_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Supplier".to_string()))?;

        Ok(row.into())
    }

    /// Create a new supplier
    pub async fn create_supplier(
        &self,
        business_id: Uuid,
        input: CreateSupplierInput,
    ) -> AppResult<Supplier> {
        self.validate_contact(&input.name, input.email.as_deref(), input.phone.as_deref())?;

        if let Some(hub_id) = input.origin_hub_id {
            self.validate_origin_hub(business_id, hub_id).await?;
        }

        // Check for duplicate name
        let existing = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM suppliers WHERE business_id = $1 AND LOWER(name) = LOWER($2)",
        )
        .bind(business_id)
        .bind(&input.name)
        .fetch_one(&self.db)
        .await?;

        if existing > 0 {
            return Err(AppError::Conflict {
                resource: "supplier".to_string(),
                message: "A supplier with this name already exists".to_string(),
            });
        }

        let row = sqlx::query_as::<_, SupplierRow>(
            r#"
            INSERT INTO suppliers (business_id, name, country, region, contact_name,
                                   email, phone, origin_hub_id, notes)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id, name, country, region, contact_name, email, phone,
                      origin_hub_id, is_active, notes, created_at, updated_at
            "#,
        )
        .bind(business_id)
        .bind(&input.name)
        .bind(&input.country)
        .bind(&input.region)
        .bind(&input.contact_name)
        .bind(&input.email)
        .bind(&input.phone)
        .bind(&input.origin_hub_id)
        .bind(&input.notes)
        .fetch_one(&self.db)
        .await?;

        Ok(row.into())
    }

    /// Update a supplier
    pub async fn update_supplier(
        &self,
        business_id: Uuid,
        supplier_id: Uuid,
        input: UpdateSupplierInput,
    ) -> AppResult<Supplier> {
        let existing = self.get_supplier(business_id, supplier_id).await?;

        // Validate new name if provided
        if let Some(ref name) = input.name {
            if name.trim().is_empty() {
                return Err(AppError::Validation {
                    field: "name".to_string(),
                    message: "Supplier name cannot be empty".to_string(),
                });
            }

            let duplicate = sqlx::query_scalar::<_, i64>(
                "SELECT COUNT(*) FROM suppliers WHERE business_id = $1 AND LOWER(name) = LOWER($2) AND id != $3",
            )
            .bind(business_id)
            .bind(name)
            .bind(supplier_id)
            .fetch_one(&self.db)
            .await?;

            if duplicate > 0 {
                return Err(AppError::Conflict {
                    resource: "supplier".to_string(),
                    message: "A supplier with this name already exists".to_string(),
                });
            }
        }

        if let Some(ref email) = input.email {
            if let Err(msg) = validate_email(email) {
                return Err(AppError::Validation {
                    field: "email".to_string(),
                    message: msg.to_string(),
                });
            }
        }

        if let Some(ref phone) = input.phone {
            if let Err(msg) = validate_phone(phone) {
                return Err(AppError::Validation {
                    field: "phone".to_string(),
                    message: msg.to_string(),
                });
            }
        }

        if let Some(hub_id) = input.origin_hub_id {
            self.validate_origin_hub(business_id, hub_id).await?;
        }

        let name = input.name.unwrap_or(existing.name);
        let country = input.country.unwrap_or(existing.country);
        let region = input.region.or(existing.region);
        let contact_name = input.contact_name.or(existing.contact_name);
        let email = input.email.or(existing.email);
        let phone = input.phone.or(existing.phone);
        let origin_hub_id = input.origin_hub_id.or(existing.origin_hub_id);
        let is_active = input.is_active.unwrap_or(existing.is_active);
        let notes = input.notes.or(existing.notes);

        let row = sqlx::query_as::<_, SupplierRow>(
            r#"
            UPDATE suppliers
            SET name = $1, country = $2, region = $3, contact_name = $4, email = $5,
                phone = $6, origin_hub_id = $7, is_active = $8, notes = $9, updated_at = NOW()
            WHERE id = $10 AND business_id = $11
            RETURNING id, name, country, region, contact_name, email, phone,
                      origin_hub_id, is_active, notes, created_at, updated_at
            "#,
        )
        .bind(&name)
        .bind(&country)
        .bind(&region)
        .bind(&contact_name)
        .bind(&email)
        .bind(&phone)
        .bind(&origin_hub_id)
        .bind(is_active)
        .bind(&notes)
        .bind(supplier_id)
        .bind(business_id)
        .fetch_one(&self.db)
        .await?;

        Ok(row.into())
    }

    /// Delete a supplier
    pub async fn delete_supplier(&self, business_id: Uuid, supplier_id: Uuid) -> AppResult<()> {
        // Check if supplier exists
        let exists = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM suppliers WHERE id = $1 AND business_id = $2",
        )
        .bind(supplier_id)
        .bind(business_id)
        .fetch_one(&self.db)
        .await?;

        if exists == 0 {
            return Err(AppError::NotFound("Supplier".to_string()));
        }

        // Check if supplier has price records
        let price_count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM supplier_prices WHERE supplier_id = $1",
        )
        .bind(supplier_id)
        .fetch_one(&self.db)
        .await?;

        if price_count > 0 {
            return Err(AppError::Validation {
                field: "supplier_id".to_string(),
                message: format!(
                    "Cannot delete supplier: {} price records are linked to it",
                    price_count
                ),
            });
        }

        let opportunity_count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM opportunities WHERE supplier_id = $1",
        )
        .bind(supplier_id)
        .fetch_one(&self.db)
        .await?;

        if opportunity_count > 0 {
            return Err(AppError::Validation {
                field: "supplier_id".to_string(),
                message: format!(
                    "Cannot delete supplier: {} opportunities are linked to it",
                    opportunity_count
                ),
            });
        }

        sqlx::query("DELETE FROM suppliers WHERE id = $1")
            .bind(supplier_id)
            .execute(&self.db)
            .await?;

        Ok(())
    }

    /// Validate name and contact fields
    fn validate_contact(
        &self,
        name: &str,
        email: Option<&str>,
        phone: Option<&str>,
    ) -> AppResult<()> {
        if name.trim().is_empty() {
            return Err(AppError::Validation {
                field: "name".to_string(),
                message: "Supplier name cannot be empty".to_string(),
            });
        }

        if let Some(email) = email {
            if let Err(msg) = validate_email(email) {
                return Err(AppError::Validation {
                    field: "email".to_string(),
                    message: msg.to_string(),
                });
            }
        }

        if let Some(phone) = phone {
            if let Err(msg) = validate_phone(phone) {
                return Err(AppError::Validation {
                    field: "phone".to_string(),
                    message: msg.to_string(),
                });
            }
        }

        Ok(())
    }

    /// Validate that a hub exists, belongs to the business, and can ship as origin
    async fn validate_origin_hub(&self, business_id: Uuid, hub_id: Uuid) -> AppResult<()> {
        let kind = sqlx::query_scalar::<_, String>(
            "SELECT kind FROM hubs WHERE id = $1 AND business_id = $2",
        )
        .bind(hub_id)
        .bind(business_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Hub".to_string()))?;

        let serves_origin = HubKind::from_str(&kind)
            .map(|k| k.serves_origin())
            .unwrap_or(false);

        if !serves_origin {
            return Err(AppError::Validation {
                field: "origin_hub_id".to_string(),
                message: "Hub cannot serve as an origin".to_string(),
            });
        }

        Ok(())
    }
}
