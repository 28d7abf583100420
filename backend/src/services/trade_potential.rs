//! Trade potential derivation service
//!
//! Potentials are derived fresh on every request and never persisted. A
//! candidate is any open need paired with an active supplier that has ever
//! quoted the need's product; whether a current price and a direct active
//! route exist decides the completion status the scorer sees.

use std::collections::HashMap;

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::AppResult;
use shared::models::{
    readiness_label, readiness_score_on, validity_covers, OpportunityRef, PotentialStatus,
    PriceQuote, ReadinessLabel, TradePotential,
};

/// Trade potential service driving the terminal board
#[derive(Clone)]
pub struct TradePotentialService {
    db: PgPool,
}

/// A derived potential with its score, as served to the board
#[derive(Debug, Clone, Serialize)]
pub struct ScoredPotential {
    #[serde(flatten)]
    pub potential: TradePotential,
    pub need_id: Uuid,
    pub customer_id: Uuid,
    pub customer_name: String,
    pub supplier_id: Uuid,
    pub supplier_name: String,
    pub product_id: Uuid,
    pub product_name: String,
    pub product_variety: Option<String>,
    pub route_id: Option<Uuid>,
    pub readiness_score: i32,
    pub readiness_label: ReadinessLabel,
    pub label_color: String,
}

/// Counts per completion status
#[derive(Debug, Default, Serialize)]
pub struct StatusBreakdown {
    pub complete: usize,
    pub missing_price: usize,
    pub missing_transport: usize,
    pub missing_both: usize,
}

/// Counts per readiness label bucket
#[derive(Debug, Default, Serialize)]
pub struct LabelBreakdown {
    pub hot_lead: usize,
    pub high_priority: usize,
    pub ready: usize,
    pub needs_work: usize,
    pub low_priority: usize,
}

/// Board summary for the terminal header
#[derive(Debug, Serialize)]
pub struct PotentialSummary {
    pub total: usize,
    pub by_status: StatusBreakdown,
    pub by_label: LabelBreakdown,
}

/// Open need with the customer context needed for matching
#[derive(Debug, sqlx::FromRow)]
struct OpenNeedRow {
    need_id: Uuid,
    customer_id: Uuid,
    customer_name: String,
    destination_hub_id: Option<Uuid>,
    product_id: Uuid,
    product_name: String,
    product_variety: Option<String>,
}

/// Price record with the supplier context needed for matching
#[derive(Debug, sqlx::FromRow)]
struct PriceCandidateRow {
    supplier_id: Uuid,
    supplier_name: String,
    origin_hub_id: Option<Uuid>,
    product_id: Uuid,
    price_per_unit: Decimal,
    valid_from: NaiveDate,
    valid_until: Option<NaiveDate>,
}

/// Active lane endpoints
#[derive(Debug, sqlx::FromRow)]
struct ActiveRouteRow {
    id: Uuid,
    origin_hub_id: Uuid,
    destination_hub_id: Uuid,
}

/// Opportunity state for a need/supplier pair
#[derive(Debug, sqlx::FromRow)]
struct OpportunityStateRow {
    need_id: Uuid,
    supplier_id: Uuid,
    offer_price: Decimal,
    status: String,
}

/// A supplier's standing for one product: identity plus the current quote
struct SupplierCandidate {
    supplier_id: Uuid,
    supplier_name: String,
    origin_hub_id: Option<Uuid>,
    current_price: Option<PriceQuote>,
}

impl TradePotentialService {
    /// Create a new TradePotentialService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Derive, score, and sort the trade potential board
    pub async fn get_trade_potentials(&self, business_id: Uuid) -> AppResult<Vec<ScoredPotential>> {
        self.derive_on(business_id, Utc::now().date_naive()).await
    }

    /// Board summary: counts per status and per label bucket
    pub async fn get_summary(&self, business_id: Uuid) -> AppResult<PotentialSummary> {
        let potentials = self.get_trade_potentials(business_id).await?;

        let mut by_status = StatusBreakdown::default();
        let mut by_label = LabelBreakdown::default();

        for p in &potentials {
            match p.potential.status {
                PotentialStatus::Complete => by_status.complete += 1,
                PotentialStatus::MissingPrice => by_status.missing_price += 1,
                PotentialStatus::MissingTransport => by_status.missing_transport += 1,
                PotentialStatus::MissingBoth => by_status.missing_both += 1,
            }
            match p.readiness_label {
                ReadinessLabel::HotLead => by_label.hot_lead += 1,
                ReadinessLabel::HighPriority => by_label.high_priority += 1,
                ReadinessLabel::Ready => by_label.ready += 1,
                ReadinessLabel::NeedsWork => by_label.needs_work += 1,
                ReadinessLabel::LowPriority => by_label.low_priority += 1,
            }
        }

        Ok(PotentialSummary {
            total: potentials.len(),
            by_status,
            by_label,
        })
    }

    /// Derive the board against an explicit reference date
    async fn derive_on(
        &self,
        business_id: Uuid,
        today: NaiveDate,
    ) -> AppResult<Vec<ScoredPotential>> {
        // Open needs of active customers, oldest first for deterministic ties
        let needs = sqlx::query_as::<_, OpenNeedRow>(
            r#"
            SELECT n.id AS need_id, c.id AS customer_id, c.name AS customer_name,
                   c.destination_hub_id, n.product_id,
                   p.name AS product_name, p.variety AS product_variety
            FROM customer_needs n
            JOIN customers c ON c.id = n.customer_id
            JOIN products p ON p.id = n.product_id
            WHERE c.business_id = $1 AND n.status = 'open' AND c.is_active = true
            ORDER BY n.created_at ASC
            "#,
        )
        .bind(business_id)
        .fetch_all(&self.db)
        .await?;

        // Every price ever quoted by an active supplier; the current one per
        // supplier/product pair is picked in-process
        let prices = sqlx::query_as::<_, PriceCandidateRow>(
            r#"
            SELECT s.id AS supplier_id, s.name AS supplier_name, s.origin_hub_id,
                   sp.product_id, sp.price_per_unit, sp.valid_from, sp.valid_until
            FROM supplier_prices sp
            JOIN suppliers s ON s.id = sp.supplier_id
            WHERE s.business_id = $1 AND s.is_active = true
            ORDER BY s.name ASC, sp.valid_from DESC, sp.created_at DESC
            "#,
        )
        .bind(business_id)
        .fetch_all(&self.db)
        .await?;

        let routes = sqlx::query_as::<_, ActiveRouteRow>(
            r#"
            SELECT r.id, r.origin_hub_id, r.destination_hub_id
            FROM transport_routes r
            JOIN hubs o ON o.id = r.origin_hub_id
            WHERE o.business_id = $1 AND r.is_active = true
            "#,
        )
        .bind(business_id)
        .fetch_all(&self.db)
        .await?;

        let opportunities = sqlx::query_as::<_, OpportunityStateRow>(
            r#"
            SELECT o.need_id, o.supplier_id, o.offer_price, o.status
            FROM opportunities o
            JOIN customer_needs n ON n.id = o.need_id
            JOIN customers c ON c.id = n.customer_id
            WHERE c.business_id = $1
            ORDER BY o.created_at ASC
            "#,
        )
        .bind(business_id)
        .fetch_all(&self.db)
        .await?;

        // Suppliers that have ever quoted each product, with their current
        // quote when one is in window. The price list arrives newest window
        // first, so the first current row per pair wins.
        let mut candidates_by_product: HashMap<Uuid, Vec<SupplierCandidate>> = HashMap::new();
        for price in prices {
            let entry = candidates_by_product.entry(price.product_id).or_default();
            let idx = match entry.iter().position(|c| c.supplier_id == price.supplier_id) {
                Some(idx) => idx,
                None => {
                    entry.push(SupplierCandidate {
                        supplier_id: price.supplier_id,
                        supplier_name: price.supplier_name.clone(),
                        origin_hub_id: price.origin_hub_id,
                        current_price: None,
                    });
                    entry.len() - 1
                }
            };
            let candidate = &mut entry[idx];
            if candidate.current_price.is_none()
                && validity_covers(price.valid_from, price.valid_until, today)
            {
                candidate.current_price = Some(PriceQuote {
                    price_per_unit: price.price_per_unit,
                    valid_until: price.valid_until,
                });
            }
        }

        let route_by_lane: HashMap<(Uuid, Uuid), Uuid> = routes
            .into_iter()
            .map(|r| ((r.origin_hub_id, r.destination_hub_id), r.id))
            .collect();

        // Opportunity state per need/supplier pair: the offer the board shows
        // and whether any linked record is still active. Records arrive oldest
        // first; an active one pins the offer price.
        let mut opportunity_state: HashMap<(Uuid, Uuid), (Decimal, bool)> = HashMap::new();
        for opp in opportunities {
            let key = (opp.need_id, opp.supplier_id);
            let is_active = opp.status == "active";
            opportunity_state
                .entry(key)
                .and_modify(|(offer, active)| {
                    if is_active || !*active {
                        *offer = opp.offer_price;
                    }
                    *active = *active || is_active;
                })
                .or_insert((opp.offer_price, is_active));
        }

        let mut scored: Vec<ScoredPotential> = Vec::new();

        for need in &needs {
            let Some(candidates) = candidates_by_product.get(&need.product_id) else {
                continue;
            };

            for candidate in candidates {
                let route_id = match (candidate.origin_hub_id, need.destination_hub_id) {
                    (Some(origin), Some(destination)) => {
                        route_by_lane.get(&(origin, destination)).copied()
                    }
                    _ => None,
                };

                let status = match (candidate.current_price.is_some(), route_id.is_some()) {
                    (true, true) => PotentialStatus::Complete,
                    (false, true) => PotentialStatus::MissingPrice,
                    (true, false) => PotentialStatus::MissingTransport,
                    (false, false) => PotentialStatus::MissingBoth,
                };

                let opp_state = opportunity_state.get(&(need.need_id, candidate.supplier_id));

                let potential = TradePotential {
                    id: Uuid::new_v4(),
                    status,
                    supplier_price: candidate.current_price.clone(),
                    opportunity: opp_state.map(|(offer, _)| OpportunityRef {
                        offer_price: *offer,
                    }),
                    has_opportunity: opp_state.is_some(),
                    is_active_opportunity: opp_state.map(|(_, active)| *active).unwrap_or(false),
                };

                let score = readiness_score_on(&potential, today);
                let label = readiness_label(score);

                scored.push(ScoredPotential {
                    potential,
                    need_id: need.need_id,
                    customer_id: need.customer_id,
                    customer_name: need.customer_name.clone(),
                    supplier_id: candidate.supplier_id,
                    supplier_name: candidate.supplier_name.clone(),
                    product_id: need.product_id,
                    product_name: need.product_name.clone(),
                    product_variety: need.product_variety.clone(),
                    route_id,
                    readiness_score: score,
                    readiness_label: label,
                    label_color: label.color().to_string(),
                });
            }
        }

        // Stable sort keeps the deterministic need/supplier order among ties
        scored.sort_by(|a, b| b.readiness_score.cmp(&a.readiness_score));

        Ok(scored)
    }
}
