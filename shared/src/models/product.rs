//! Product and packaging spec models

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A traded commodity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub variety: Option<String>,
    pub category: ProductCategory,
    pub default_unit: ProductUnit,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Produce category
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ProductCategory {
    Fruit,
    Vegetable,
    Herb,
}

impl ProductCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductCategory::Fruit => "fruit",
            ProductCategory::Vegetable => "vegetable",
            ProductCategory::Herb => "herb",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "fruit" => Some(ProductCategory::Fruit),
            "vegetable" => Some(ProductCategory::Vegetable),
            "herb" => Some(ProductCategory::Herb),
            _ => None,
        }
    }
}

impl std::fmt::Display for ProductCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Unit a product is quoted and traded in
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ProductUnit {
    #[default]
    Kg,
    Box,
    Pallet,
    Piece,
}

impl ProductUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductUnit::Kg => "kg",
            ProductUnit::Box => "box",
            ProductUnit::Pallet => "pallet",
            ProductUnit::Piece => "piece",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "kg" => Some(ProductUnit::Kg),
            "box" => Some(ProductUnit::Box),
            "pallet" => Some(ProductUnit::Pallet),
            "piece" => Some(ProductUnit::Piece),
            _ => None,
        }
    }
}

impl std::fmt::Display for ProductUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How a product is packed for a given trade lane
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackagingSpec {
    pub id: Uuid,
    pub product_id: Uuid,
    /// Short display label, e.g. "10x1kg flowpack"
    pub label: String,
    pub units_per_package: Option<i32>,
    pub unit_weight_kg: Option<Decimal>,
    pub tare_weight_kg: Option<Decimal>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}
