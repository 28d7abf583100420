//! Reporting service for dashboard metrics and data export

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::AppResult;
use crate::services::trade_potential::{PotentialSummary, TradePotentialService};

/// Reporting service
#[derive(Clone)]
pub struct ReportingService {
    db: PgPool,
}

/// Dashboard metrics
#[derive(Debug, Serialize)]
pub struct DashboardMetrics {
    pub active_suppliers: i64,
    pub active_customers: i64,
    pub active_products: i64,
    pub open_needs: i64,
    pub current_prices: i64,
    pub active_opportunities: i64,
    pub potentials: PotentialSummary,
}

/// One line of the current price list export
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct PriceExportRow {
    pub supplier: String,
    pub product: String,
    pub variety: Option<String>,
    pub packaging: Option<String>,
    pub price_per_unit: Decimal,
    pub currency: String,
    pub unit: String,
    pub valid_from: NaiveDate,
    pub valid_until: Option<NaiveDate>,
    pub incoterm: Option<String>,
}

impl ReportingService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Get dashboard metrics
    pub async fn get_dashboard_metrics(&self, business_id: Uuid) -> AppResult<DashboardMetrics> {
        let active_suppliers: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM suppliers
            WHERE business_id = $1 AND is_active = true
            "#,
        )
        .bind(business_id)
        .fetch_one(&self.db)
        .await?;

        let active_customers: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM customers
            WHERE business_id = $1 AND is_active = true
            "#,
        )
        .bind(business_id)
        .fetch_one(&self.db)
        .await?;

        let active_products: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM products
            WHERE business_id = $1 AND is_active = true
            "#,
        )
        .bind(business_id)
        .fetch_one(&self.db)
        .await?;

        let open_needs: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM customer_needs cn
            JOIN customers c ON c.id = cn.customer_id
            WHERE c.business_id = $1 AND cn.status = 'open'
            "#,
        )
        .bind(business_id)
        .fetch_one(&self.db)
        .await?;

        let current_prices: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM supplier_prices p
            JOIN suppliers s ON s.id = p.supplier_id
            WHERE s.business_id = $1
              AND p.valid_from <= CURRENT_DATE
              AND (p.valid_until IS NULL OR p.valid_until >= CURRENT_DATE)
            "#,
        )
        .bind(business_id)
        .fetch_one(&self.db)
        .await?;

        let active_opportunities: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM opportunities o
            JOIN customer_needs cn ON cn.id = o.need_id
            JOIN customers c ON c.id = cn.customer_id
            WHERE c.business_id = $1 AND o.status = 'active'
            "#,
        )
        .bind(business_id)
        .fetch_one(&self.db)
        .await?;

        let potentials = TradePotentialService::new(self.db.clone())
            .get_summary(business_id)
            .await?;

        Ok(DashboardMetrics {
            active_suppliers,
            active_customers,
            active_products,
            open_needs,
            current_prices,
            active_opportunities,
            potentials,
        })
    }

    /// Current price list, one row per price, ordered for export
    pub async fn get_price_export(&self, business_id: Uuid) -> AppResult<Vec<PriceExportRow>> {
        let rows = sqlx::query_as::<_, PriceExportRow>(
            r#"
            SELECT s.name AS supplier,
                   pr.name AS product,
                   pr.variety,
                   ps.label AS packaging,
                   p.price_per_unit,
                   p.currency,
                   p.unit,
                   p.valid_from,
                   p.valid_until,
                   p.incoterm
            FROM supplier_prices p
            JOIN suppliers s ON s.id = p.supplier_id
            JOIN products pr ON pr.id = p.product_id
            LEFT JOIN packaging_specs ps ON ps.id = p.packaging_spec_id
            WHERE s.business_id = $1
              AND p.valid_from <= CURRENT_DATE
              AND (p.valid_until IS NULL OR p.valid_until >= CURRENT_DATE)
            ORDER BY s.name ASC, pr.name ASC, p.valid_from DESC
            "#,
        )
        .bind(business_id)
        .fetch_all(&self.db)
        .await?;

        Ok(rows)
    }

    /// Export report data as CSV
    pub fn export_to_csv<T: Serialize>(data: &[T]) -> AppResult<String> {
        let mut wtr = csv::Writer::from_writer(vec![]);
        for record in data {
            wtr.serialize(record).map_err(|e| {
                crate::error::AppError::Internal(format!("CSV serialization error: {}", e))
            })?;
        }
        let csv_data = String::from_utf8(wtr.into_inner().map_err(|e| {
            crate::error::AppError::Internal(format!("CSV writer error: {}", e))
        })?)
        .map_err(|e| crate::error::AppError::Internal(format!("UTF-8 conversion error: {}", e)))?;
        Ok(csv_data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_export_to_csv_headers_and_rows() {
        let rows = vec![PriceExportRow {
            supplier: "Huerta del Sol".to_string(),
            product: "Galia Melon".to_string(),
            variety: Some("Galia".to_string()),
            packaging: Some("5kg box".to_string()),
            price_per_unit: dec("8.50"),
            currency: "EUR".to_string(),
            unit: "box".to_string(),
            valid_from: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            valid_until: None,
            incoterm: Some("FCA".to_string()),
        }];

        let csv = ReportingService::export_to_csv(&rows).unwrap();
        let mut lines = csv.lines();

        assert_eq!(
            lines.next().unwrap(),
            "supplier,product,variety,packaging,price_per_unit,currency,unit,valid_from,valid_until,incoterm"
        );
        let row = lines.next().unwrap();
        assert!(row.contains("Huerta del Sol"));
        assert!(row.contains("8.50"));
        assert!(row.contains("FCA"));
    }

    #[test]
    fn test_export_to_csv_empty() {
        let rows: Vec<PriceExportRow> = vec![];
        let csv = ReportingService::export_to_csv(&rows).unwrap();
        assert!(csv.is_empty());
    }
}
