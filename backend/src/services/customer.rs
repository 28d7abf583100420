//! Customer and customer need management service

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use shared::models::{Customer, CustomerNeed, HubKind, NeedStatus, ProductUnit};
use shared::types::Currency;
use shared::validation::{validate_email, validate_phone, validate_weekly_quantity};

/// Customer service for managing buyers and their registered demand
#[derive(Clone)]
pub struct CustomerService {
    db: PgPool,
}

/// Database row for a customer
#[derive(Debug, sqlx::FromRow)]
struct CustomerRow {
    id: Uuid,
    name: String,
    country: String,
    contact_name: Option<String>,
    email: Option<String>,
    phone: Option<String>,
    destination_hub_id: Option<Uuid>,
    is_active: bool,
    notes: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<CustomerRow> for Customer {
    fn from(row: CustomerRow) -> Self {
        Customer {
            id: row.id,
            name: row.name,
            country: row.country,
            contact_name: row.contact_name,
            email: row.email,
            phone: row.phone,
            destination_hub_id: row.destination_hub_id,
            is_active: row.is_active,
            notes: row.notes,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Database row for a customer need
#[derive(Debug, sqlx::FromRow)]
struct NeedRow {
    id: Uuid,
    customer_id: Uuid,
    product_id: Uuid,
    packaging_spec_id: Option<Uuid>,
    quantity_per_week: Decimal,
    unit: String,
    target_price: Option<Decimal>,
    currency: String,
    needed_from: Option<NaiveDate>,
    needed_until: Option<NaiveDate>,
    status: String,
    notes: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<NeedRow> for CustomerNeed {
    fn from(row: NeedRow) -> Self {
        CustomerNeed {
            id: row.id,
            customer_id: row.customer_id,
            product_id: row.product_id,
            packaging_spec_id: row.packaging_spec_id,
            quantity_per_week: row.quantity_per_week,
            unit: ProductUnit::from_str(&row.unit).unwrap_or_default(),
            target_price: row.target_price,
            currency: Currency::from_code(&row.currency).unwrap_or_default(),
            needed_from: row.needed_from,
            needed_until: row.needed_until,
            status: NeedStatus::from_str(&row.status).unwrap_or(NeedStatus::Open),
            notes: row.notes,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Input for creating a customer
#[derive(Debug, Deserialize)]
pub struct CreateCustomerInput {
    pub name: String,
    pub country: String,
    pub contact_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub destination_hub_id: Option<Uuid>,
    pub notes: Option<String>,
}

/// Input for updating a customer
#[derive(Debug, Deserialize)]
pub struct UpdateCustomerInput {
    pub name: Option<String>,
    pub country: Option<String>,
    pub contact_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub destination_hub_id: Option<Uuid>,
    pub is_active: Option<bool>,
    pub notes: Option<String>,
}

/// Input for registering a customer need
#[derive(Debug, Deserialize)]
pub struct CreateNeedInput {
    pub product_id: Uuid,
    pub packaging_spec_id: Option<Uuid>,
    pub quantity_per_week: Decimal,
    pub unit: Option<ProductUnit>,
    pub target_price: Option<Decimal>,
    pub currency: Option<Currency>,
    pub needed_from: Option<NaiveDate>,
    pub needed_until: Option<NaiveDate>,
    pub notes: Option<String>,
}

/// Input for updating a customer need
#[derive(Debug, Deserialize)]
pub struct UpdateNeedInput {
    pub quantity_per_week: Option<Decimal>,
    pub target_price: Option<Decimal>,
    pub needed_from: Option<NaiveDate>,
    pub needed_until: Option<NaiveDate>,
    pub status: Option<NeedStatus>,
    pub notes: Option<String>,
}

impl CustomerService {
    /// Create a new CustomerService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Get all customers for a business
    pub async fn get_customers(
        &self,
        business_id: Uuid,
        include_inactive: bool,
    ) -> AppResult<Vec<Customer>> {
        let rows = sqlx::query_as::<_, CustomerRow>(
            r#"
            SELECT id, name, country, contact_name, email, phone,
                   destination_hub_id, is_active, notes, created_at, updated_at
            FROM customers
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

    /// Get a customer by ID
    pub async fn get_customer(&self, business_id: Uuid, customer_id: Uuid) -> AppResult<Customer> {
        let row = sqlx::query_as::<_, CustomerRow>(
            r#"
            SELECT id, name, country, contact_name, email, phone,
                   destination_hub_id, is_active, notes, created_at, updated_at
            FROM customers
            WHERE id = $1 AND business_id = $2
            "#,
        )
        .bind(customer_id)
        .bind(business_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Customer".to_string()))?;

        Ok(row.into())
    }

    /// Create a new customer
    pub async fn create_customer(
        &self,
        business_id: Uuid,
        input: CreateCustomerInput,
    ) -> AppResult<Customer> {
        if input.name.trim().is_empty() {
            return Err(AppError::Validation {
                field: "name".to_string(),
                message: "Customer name cannot be empty".to_string(),
            });
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

        if let Some(hub_id) = input.destination_hub_id {
            self.validate_destination_hub(business_id, hub_id).await?;
        }

        // Check for duplicate name
        let existing = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM customers WHERE business_id = $1 AND LOWER(name) = LOWER($2)",
        )
        .bind(business_id)
        .bind(&input.name)
        .fetch_one(&self.db)
        .await?;

        if existing > 0 {
            return Err(AppError::Conflict {
                resource: "customer".to_string(),
                message: "A customer with this name already exists".to_string(),
            });
        }

        let row = sqlx::query_as::<_, CustomerRow>(
            r#"
            INSERT INTO customers (business_id, name, country, contact_name,
                                   email, phone, destination_hub_id, notes)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, name, country, contact_name, email, phone,
                      destination_hub_id, is_active, notes, created_at, updated_at
            "#,
        )
        .bind(business_id)
        .bind(&input.name)
        .bind(&input.country)
        .bind(&input.contact_name)
        .bind(&input.email)
        .bind(&input.phone)
        .bind(&input.destination_hub_id)
        .bind(&input.notes)
        .fetch_one(&self.db)
        .await?;

        Ok(row.into())
    }

    /// Update a customer
    pub async fn update_customer(
        &self,
        business_id: Uuid,
        customer_id: Uuid,
        input: UpdateCustomerInput,
    ) -> AppResult<Customer> {
        let existing = self.get_customer(business_id, customer_id).await?;

        if let Some(ref name) = input.name {
            if name.trim().is_empty() {
                return Err(AppError::Validation {
                    field: "name".to_string(),
                    message: "Customer name cannot be empty".to_string(),
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

        if let Some(hub_id) = input.destination_hub_id {
            self.validate_destination_hub(business_id, hub_id).await?;
        }

        let name = input.name.unwrap_or(existing.name);
        let country = input.country.unwrap_or(existing.country);
        let contact_name = input.contact_name.or(existing.contact_name);
        let email = input.email.or(existing.email);
        let phone = input.phone.or(existing.phone);
        let destination_hub_id = input.destination_hub_id.or(existing.destination_hub_id);
        let is_active = input.is_active.unwrap_or(existing.is_active);
        let notes = input.notes.or(existing.notes);

        let row = sqlx::query_as::<_, CustomerRow>(
            r#"
            UPDATE customers
            SET name = $1, country = $2, contact_name = $3, email = $4, phone = $5,
                destination_hub_id = $6, is_active = $7, notes = $8, updated_at = NOW()
            WHERE id = $9 AND business_id = $10
            RETURNING id, name, country, contact_name, email, phone,
                      destination_hub_id, is_active, notes, created_at, updated_at
            "#,
        )
        .bind(&name)
        .bind(&country)
        .bind(&contact_name)
        .bind(&email)
        .bind(&phone)
        .bind(&destination_hub_id)
        .bind(is_active)
        .bind(&notes)
        .bind(customer_id)
        .bind(business_id)
        .fetch_one(&self.db)
        .await?;

        Ok(row.into())
    }

    /// Delete a customer
    pub async fn delete_customer(&self, business_id: Uuid, customer_id: Uuid) -> AppResult<()> {
        let exists = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM customers WHERE id = $1 AND business_id = $2",
        )
        .bind(customer_id)
        .bind(business_id)
        .fetch_one(&self.db)
        .await?;

        if exists == 0 {
            return Err(AppError::NotFound("Customer".to_string()));
        }

        // Check for registered needs
        let need_count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM customer_needs WHERE customer_id = $1",
        )
        .bind(customer_id)
        .fetch_one(&self.db)
        .await?;

        if need_count > 0 {
            return Err(AppError::Validation {
                field: "customer_id".to_string(),
                message: format!(
                    "Cannot delete customer: {} needs are linked to it",
                    need_count
                ),
            });
        }

        sqlx::query("DELETE FROM customers WHERE id = $1")
            .bind(customer_id)
            .execute(&self.db)
            .await?;

        Ok(())
    }

    /// Get all needs for a customer
    pub async fn get_needs(
        &self,
        business_id: Uuid,
        customer_id: Uuid,
    ) -> AppResult<Vec<CustomerNeed>> {
        // Verify ownership
        self.get_customer(business_id, customer_id).await?;

        let rows = sqlx::query_as::<_, NeedRow>(
            r#"
            SELECT id, customer_id, product_id, packaging_spec_id, quantity_per_week,
                   unit, target_price, currency, needed_from, needed_until, status,
                   notes, created_at, updated_at
            FROM customer_needs
            WHERE customer_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(customer_id)
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(|r| r.into()).collect())
    }

    /// Register a need for a customer
    pub async fn create_need(
        &self,
        business_id: Uuid,
        customer_id: Uuid,
        input: CreateNeedInput,
    ) -> AppResult<CustomerNeed> {
        // Verify ownership
        self.get_customer(business_id, customer_id).await?;

        if let Err(msg) = validate_weekly_quantity(input.quantity_per_week) {
            return Err(AppError::Validation {
                field: "quantity_per_week".to_string(),
                message: msg.to_string(),
            });
        }

        // Need must reference an existing product
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

        // Fall back to the product's default unit when not given
        let unit = input
            .unit
            .or_else(|| ProductUnit::from_str(&product_unit))
            .unwrap_or_default();
        let currency = input.currency.unwrap_or_default();

        let row = sqlx::query_as::<_, NeedRow>(
            r#"
            INSERT INTO customer_needs (customer_id, product_id, packaging_spec_id,
                                        quantity_per_week, unit, target_price, currency,
                                        needed_from, needed_until, status, notes)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, 'open', $10)
            RETURNING id, customer_id, product_id, packaging_spec_id, quantity_per_week,
                      unit, target_price, currency, needed_from, needed_until, status,
                      notes, created_at, updated_at
            "#,
        )
        .bind(customer_id)
        .bind(input.product_id)
        .bind(&input.packaging_spec_id)
        .bind(input.quantity_per_week)
        .bind(unit.as_str())
        .bind(&input.target_price)
        .bind(currency.code())
        .bind(&input.needed_from)
        .bind(&input.needed_until)
        .bind(&input.notes)
        .fetch_one(&self.db)
        .await?;

        Ok(row.into())
    }

    /// Update a customer need
    pub async fn update_need(
        &self,
        business_id: Uuid,
        customer_id: Uuid,
        need_id: Uuid,
        input: UpdateNeedInput,
    ) -> AppResult<CustomerNeed> {
        // Verify ownership chain
        self.get_customer(business_id, customer_id).await?;

        let existing = sqlx::query_as::<_, NeedRow>(
            r#"
            SELECT id, customer_id, product_id, packaging_spec_id, quantity_per_week,
                   unit, target_price, currency, needed_from, needed_until, status,
                   notes, created_at, updated_at
            FROM customer_needs
            WHERE id = $1 AND customer_id = $2
            "#,
        )
        .bind(need_id)
        .bind(customer_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Customer need".to_string()))?;

        if let Some(quantity) = input.quantity_per_week {
            if let Err(msg) = validate_weekly_quantity(quantity) {
                return Err(AppError::Validation {
                    field: "quantity_per_week".to_string(),
                    message: msg.to_string(),
                });
            }
        }

        let quantity_per_week = input.quantity_per_week.unwrap_or(existing.quantity_per_week);
        let target_price = input.target_price.or(existing.target_price);
        let needed_from = input.needed_from.or(existing.needed_from);
        let needed_until = input.needed_until.or(existing.needed_until);
        let status = input
            .status
            .map(|s| s.as_str().to_string())
            .unwrap_or(existing.status);
        let notes = input.notes.or(existing.notes);

        let row = sqlx::query_as::<_, NeedRow>(
            r#"
            UPDATE customer_needs
            SET quantity_per_week = $1, target_price = $2, needed_from = $3,
                needed_until = $4, status = $5, notes = $6, updated_at = NOW()
            WHERE id = $7
            RETURNING id, customer_id, product_id, packaging_spec_id, quantity_per_week,
                      unit, target_price, currency, needed_from, needed_until, status,
                      notes, created_at, updated_at
            "#,
        )
        .bind(quantity_per_week)
        .bind(&target_price)
        .bind(&needed_from)
        .bind(&needed_until)
        .bind(&status)
        .bind(&notes)
        .bind(need_id)
        .fetch_one(&self.db)
        .await?;

        Ok(row.into())
    }

    /// Delete a customer need
    pub async fn delete_need(
        &self,
        business_id: Uuid,
        customer_id: Uuid,
        need_id: Uuid,
    ) -> AppResult<()> {
        self.get_customer(business_id, customer_id).await?;

        // Opportunities reference needs; block deletion while they exist
        let opportunity_count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM opportunities WHERE need_id = $1",
        )
        .bind(need_id)
        .fetch_one(&self.db)
        .await?;

        if opportunity_count > 0 {
            return Err(AppError::Validation {
                field: "need_id".to_string(),
                message: format!(
                    "Cannot delete need: {} opportunities are linked to it",
                    opportunity_count
                ),
            });
        }

        let result = sqlx::query("DELETE FROM customer_needs WHERE id = $1 AND customer_id = $2")
            .bind(need_id)
            .bind(customer_id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Customer need".to_string()));
        }

        Ok(())
    }

    /// Validate that a hub exists, belongs to the business, and can receive as destination
    async fn validate_destination_hub(&self, business_id: Uuid, hub_id: Uuid) -> AppResult<()> {
        let kind = sqlx::query_scalar::<_, String>(
            "SELECT kind FROM hubs WHERE id = $1 AND business_id = $2",
        )
        .bind(hub_id)
        .bind(business_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Hub".to_string()))?;

        let serves_destination = HubKind::from_str(&kind)
            .map(|k| k.serves_destination())
            .unwrap_or(false);

        if !serves_destination {
            return Err(AppError::Validation {
                field: "destination_hub_id".to_string(),
                message: "Hub cannot serve as a destination".to_string(),
            });
        }

        Ok(())
    }
}
