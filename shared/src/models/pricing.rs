//! Supplier price models

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::ProductUnit;
use crate::types::Currency;

/// A supplier's quoted price for a product
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupplierPrice {
    pub id: Uuid,
    pub supplier_id: Uuid,
    pub product_id: Uuid,
    pub packaging_spec_id: Option<Uuid>,
    pub price_per_unit: Decimal,
    pub currency: Currency,
    pub unit: ProductUnit,
    pub valid_from: NaiveDate,
    /// Open-ended when absent
    pub valid_until: Option<NaiveDate>,
    pub incoterm: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SupplierPrice {
    /// A price is current when its validity window covers the given date.
    pub fn is_current_on(&self, date: NaiveDate) -> bool {
        validity_covers(self.valid_from, self.valid_until, date)
    }
}

/// Whether a validity window covers a date. An absent end keeps the window open.
pub fn validity_covers(
    valid_from: NaiveDate,
    valid_until: Option<NaiveDate>,
    date: NaiveDate,
) -> bool {
    if valid_from > date {
        return false;
    }
    match valid_until {
        Some(until) => until >= date,
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn price(valid_from: NaiveDate, valid_until: Option<NaiveDate>) -> SupplierPrice {
        SupplierPrice {
            id: Uuid::new_v4(),
            supplier_id: Uuid::new_v4(),
            product_id: Uuid::new_v4(),
            packaging_spec_id: None,
            price_per_unit: Decimal::from(10),
            currency: Currency::Eur,
            unit: ProductUnit::Kg,
            valid_from,
            valid_until,
            incoterm: None,
            notes: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_current_within_window() {
        let p = price(date(2025, 3, 1), Some(date(2025, 3, 31)));
        assert!(p.is_current_on(date(2025, 3, 1)));
        assert!(p.is_current_on(date(2025, 3, 15)));
        assert!(p.is_current_on(date(2025, 3, 31)));
    }

    #[test]
    fn test_not_current_outside_window() {
        let p = price(date(2025, 3, 1), Some(date(2025, 3, 31)));
        assert!(!p.is_current_on(date(2025, 2, 28)));
        assert!(!p.is_current_on(date(2025, 4, 1)));
    }

    #[test]
    fn test_open_ended_price_stays_current() {
        let p = price(date(2025, 3, 1), None);
        assert!(p.is_current_on(date(2030, 1, 1)));
        assert!(!p.is_current_on(date(2025, 2, 28)));
    }
}
