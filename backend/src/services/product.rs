//! Product catalog and packaging spec service

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use shared::models::{PackagingSpec, Product, ProductCategory, ProductUnit};

/// Product service for the traded commodity catalog
#[derive(Clone)]
pub struct ProductService {
    db: PgPool,
}

/// Database row for a product
#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: Uuid,
    name: String,
    variety: Option<String>,
    category: String,
    default_unit: String,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Product {
            id: row.id,
            name: row.name,
            variety: row.variety,
            category: ProductCategory::from_str(&row.category).unwrap_or(ProductCategory::Fruit),
            default_unit: ProductUnit::from_str(&row.default_unit).unwrap_or_default(),
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Database row for a packaging spec
#[derive(Debug, sqlx::FromRow)]
struct PackagingSpecRow {
    id: Uuid,
    product_id: Uuid,
    label: String,
    units_per_package: Option<i32>,
    unit_weight_kg: Option<Decimal>,
    tare_weight_kg: Option<Decimal>,
    notes: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<PackagingSpecRow> for PackagingSpec {
    fn from(row: PackagingSpecRow) -> Self {
        PackagingSpec {
            id: row.id,
            product_id: row.product_id,
            label: row.label,
            units_per_package: row.units_per_package,
            unit_weight_kg: row.unit_weight_kg,
            tare_weight_kg: row.tare_weight_kg,
            notes: row.notes,
            created_at: row.created_at,
        }
    }
}

/// Input for creating a product
#[derive(Debug, Deserialize)]
pub struct CreateProductInput {
    pub name: String,
    pub variety: Option<String>,
    pub category: ProductCategory,
    pub default_unit: Option<ProductUnit>,
}

/// Input for updating a product
#[derive(Debug, Deserialize)]
pub struct UpdateProductInput {
    pub name: Option<String>,
    pub variety: Option<String>,
    pub category: Option<ProductCategory>,
    pub default_unit: Option<ProductUnit>,
    pub is_active: Option<bool>,
}

/// Input for adding a packaging spec
#[derive(Debug, Deserialize)]
pub struct CreatePackagingSpecInput {
    pub label: String,
    pub units_per_package: Option<i32>,
    pub unit_weight_kg: Option<Decimal>,
    pub tare_weight_kg: Option<Decimal>,
    pub notes: Option<String>,
}

impl ProductService {
    /// Create a new ProductService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Get all products for a business
    pub async fn get_products(
        &self,
        business_id: Uuid,
        include_inactive: bool,
    ) -> AppResult<Vec<Product>> {
        let rows = sqlx::query_as::<_, ProductRow>(
            r#"
            SELECT id, name, variety, category, default_unit, is_active,
                   created_at, updated_at
            FROM products
            WHERE business_id = $1 AND ($2 OR is_active = true)
            ORDER BY name ASC, variety ASC NULLS FIRST
            "#,
        )
        .bind(business_id)
        .bind(include_inactive)
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(|r| r.into()).collect())
    }

    /// Get a product by ID
    pub async fn get_product(&self, business_id: Uuid, product_id: Uuid) -> AppResult<Product> {
        let row = sqlx::query_as::<_, ProductRow>(
            r#"
            SELECT id, name, variety, category, default_unit, is_active,
                   created_at, updated_at
            FROM products
            WHERE id = $1 AND business_id = $2
            "#,
        )
        .bind(product_id)
        .bind(business_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Product".to_string()))?;

        Ok(row.into())
    }

    /// Create a new product
    pub async fn create_product(
        &self,
        business_id: Uuid,
        input: CreateProductInput,
    ) -> AppResult<Product> {
        if input.name.trim().is_empty() {
            return Err(AppError::Validation {
                field: "name".to_string(),
                message: "Product name cannot be empty".to_string(),
            });
        }

        // Duplicate check on name + variety together, since one commodity
        // can legitimately appear under several varieties
        let existing = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM products
            WHERE business_id = $1
              AND LOWER(name) = LOWER($2)
              AND COALESCE(LOWER(variety), '') = COALESCE(LOWER($3), '')
            "#,
        )
        .bind(business_id)
        .bind(&input.name)
        .bind(&input.variety)
        .fetch_one(&self.db)
        .await?;

        if existing > 0 {
            return Err(AppError::Conflict {
                resource: "product".to_string(),
                message: "This product and variety combination already exists".to_string(),
            });
        }

        let default_unit = input.default_unit.unwrap_or_default();

        let row = sqlx::query_as::<_, ProductRow>(
            r#"
            INSERT INTO products (business_id, name, variety, category, default_unit)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, variety, category, default_unit, is_active,
                      created_at, updated_at
            "#,
        )
        .bind(business_id)
        .bind(&input.name)
        .bind(&input.variety)
        .bind(input.category.as_str())
        .bind(default_unit.as_str())
        .fetch_one(&self.db)
        .await?;

        Ok(row.into())
    }

    /// Update a product
    pub async fn update_product(
        &self,
        business_id: Uuid,
        product_id: Uuid,
        input: UpdateProductInput,
    ) -> AppResult<Product> {
        let existing = self.get_product(business_id, product_id).await?;

        if let Some(ref name) = input.name {
            if name.trim().is_empty() {
                return Err(AppError::Validation {
                    field: "name".to_string(),
                    message: "Product name cannot be empty".to_string(),
                });
            }
        }

        let name = input.name.unwrap_or(existing.name);
        let variety = input.variety.or(existing.variety);
        let category = input.category.unwrap_or(existing.category);
        let default_unit = input.default_unit.unwrap_or(existing.default_unit);
        let is_active = input.is_active.unwrap_or(existing.is_active);

        // Re-check uniqueness under the new name/variety pair
        let duplicate = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM products
            WHERE business_id = $1
              AND LOWER(name) = LOWER($2)
              AND COALESCE(LOWER(variety), '') = COALESCE(LOWER($3), '')
              AND id != $4
            "#,
        )
        .bind(business_id)
        .bind(&name)
        .bind(&variety)
        .bind(product_id)
        .fetch_one(&self.db)
        .await?;

        if duplicate > 0 {
            return Err(AppError::Conflict {
                resource: "product".to_string(),
                message: "This product and variety combination already exists".to_string(),
            });
        }

        let row = sqlx::query_as::<_, ProductRow>(
            r#"
            UPDATE products
            SET name = $1, variety = $2, category = $3, default_unit = $4,
                is_active = $5, updated_at = NOW()
            WHERE id = $6 AND business_id = $7
            RETURNING id, name, variety, category, default_unit, is_active,
                      created_at, updated_at
            "#,
        )
        .bind(&name)
        .bind(&variety)
        .bind(category.as_str())
        .bind(default_unit.as_str())
        .bind(is_active)
        .bind(product_id)
        .bind(business_id)
        .fetch_one(&self.db)
        .await?;

        Ok(row.into())
    }

    /// Delete a product
    pub async fn delete_product(&self, business_id: Uuid, product_id: Uuid) -> AppResult<()> {
        let exists = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM products WHERE id = $1 AND business_id = $2",
        )
        .bind(product_id)
        .bind(business_id)
        .fetch_one(&self.db)
        .await?;

        if exists == 0 {
            return Err(AppError::NotFound("Product".to_string()));
        }

        // Needs and prices reference products; block deletion while they exist
        let reference_count = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT (SELECT COUNT(*) FROM customer_needs WHERE product_id = $1)
                 + (SELECT COUNT(*) FROM supplier_prices WHERE product_id = $1)
            "#,
        )
        .bind(product_id)
        .fetch_one(&self.db)
        .await?;

        if reference_count > 0 {
            return Err(AppError::Validation {
                field: "product_id".to_string(),
                message: format!(
                    "Cannot delete product: {} needs or prices are linked to it",
                    reference_count
                ),
            });
        }

        // Cascade removes packaging specs
        sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(product_id)
            .execute(&self.db)
            .await?;

        Ok(())
    }

    /// Get packaging specs for a product
    pub async fn get_packaging_specs(
        &self,
        business_id: Uuid,
        product_id: Uuid,
    ) -> AppResult<Vec<PackagingSpec>> {
        // Verify ownership
        self.get_product(business_id, product_id).await?;

        let rows = sqlx::query_as::<_, PackagingSpecRow>(
            r#"
            SELECT id, product_id, label, units_per_package, unit_weight_kg,
                   tare_weight_kg, notes, created_at
            FROM packaging_specs
            WHERE product_id = $1
            ORDER BY label ASC
            "#,
        )
        .bind(product_id)
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(|r| r.into()).collect())
    }

    /// Add a packaging spec to a product
    pub async fn add_packaging_spec(
        &self,
        business_id: Uuid,
        product_id: Uuid,
        input: CreatePackagingSpecInput,
    ) -> AppResult<PackagingSpec> {
        self.get_product(business_id, product_id).await?;

        if input.label.trim().is_empty() {
            return Err(AppError::Validation {
                field: "label".to_string(),
                message: "Packaging label cannot be empty".to_string(),
            });
        }

        // Check for duplicate label
        let duplicate = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM packaging_specs WHERE product_id = $1 AND LOWER(label) = LOWER($2)",
        )
        .bind(product_id)
        .bind(&input.label)
        .fetch_one(&self.db)
        .await?;

        if duplicate > 0 {
            return Err(AppError::Conflict {
                resource: "packaging_spec".to_string(),
                message: "This packaging label already exists for this product".to_string(),
            });
        }

        let row = sqlx::query_as::<_, PackagingSpecRow>(
            r#"
            INSERT INTO packaging_specs (product_id, label, units_per_package,
                                         unit_weight_kg, tare_weight_kg, notes)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, product_id, label, units_per_package, unit_weight_kg,
                      tare_weight_kg, notes, created_at
            "#,
        )
        .bind(product_id)
        .bind(&input.label)
        .bind(&input.units_per_package)
        .bind(&input.unit_weight_kg)
        .bind(&input.tare_weight_kg)
        .bind(&input.notes)
        .fetch_one(&self.db)
        .await?;

        Ok(row.into())
    }

    /// Remove a packaging spec from a product
    pub async fn remove_packaging_spec(
        &self,
        business_id: Uuid,
        product_id: Uuid,
        spec_id: Uuid,
    ) -> AppResult<()> {
        self.get_product(business_id, product_id).await?;

        let result = sqlx::query("DELETE FROM packaging_specs WHERE id = $1 AND product_id = $2")
            .bind(spec_id)
            .bind(product_id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Packaging spec".to_string()));
        }

        Ok(())
    }
}
