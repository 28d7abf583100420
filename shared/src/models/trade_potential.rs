//! Trade potential records and readiness scoring
//!
//! A trade potential is a candidate match between a customer need, a supplier
//! price, and a transport route. The readiness score ranks potentials by how
//! close they are to a closable deal; the trading terminal sorts its board by
//! it. Scoring is a pure function of the record, derived fresh per query and
//! never persisted.

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Which pieces of a potential match are in place
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PotentialStatus {
    /// Price and transport route both found
    Complete,
    /// Transport route found, no current supplier price
    MissingPrice,
    /// Current supplier price found, no transport route
    MissingTransport,
    /// Neither price nor route found
    MissingBoth,
}

impl PotentialStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PotentialStatus::Complete => "complete",
            PotentialStatus::MissingPrice => "missing_price",
            PotentialStatus::MissingTransport => "missing_transport",
            PotentialStatus::MissingBoth => "missing_both",
        }
    }
}

impl std::fmt::Display for PotentialStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The current supplier price attached to a potential
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceQuote {
    pub price_per_unit: Decimal,
    pub valid_until: Option<NaiveDate>,
}

/// The existing commercial offer attached to a potential, if any
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpportunityRef {
    pub offer_price: Decimal,
}

/// A candidate match between a customer need, a supplier price, and a route
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradePotential {
    pub id: Uuid,
    pub status: PotentialStatus,
    pub supplier_price: Option<PriceQuote>,
    pub opportunity: Option<OpportunityRef>,
    /// A commercial opportunity already exists for this match
    pub has_opportunity: bool,
    /// That opportunity is active and not yet converted
    pub is_active_opportunity: bool,
}

/// Qualitative priority bucket for a readiness score
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ReadinessLabel {
    HotLead,
    HighPriority,
    Ready,
    NeedsWork,
    LowPriority,
}

impl ReadinessLabel {
    /// Display color tag for the terminal UI
    pub fn color(&self) -> &'static str {
        match self {
            ReadinessLabel::HotLead => "red",
            ReadinessLabel::HighPriority => "orange",
            ReadinessLabel::Ready => "green",
            ReadinessLabel::NeedsWork => "yellow",
            ReadinessLabel::LowPriority => "gray",
        }
    }
}

impl std::fmt::Display for ReadinessLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReadinessLabel::HotLead => write!(f, "Hot Lead"),
            ReadinessLabel::HighPriority => write!(f, "High Priority"),
            ReadinessLabel::Ready => write!(f, "Ready"),
            ReadinessLabel::NeedsWork => write!(f, "Needs Work"),
            ReadinessLabel::LowPriority => write!(f, "Low Priority"),
        }
    }
}

/// Score a potential against today's date.
pub fn readiness_score(potential: &TradePotential) -> i32 {
    readiness_score_on(potential, Utc::now().date_naive())
}

/// Score a potential against an explicit reference date.
///
/// Additive point system: completion status, expected margin, and price
/// urgency each contribute independently; an existing opportunity
/// deprioritizes new-lead attention unless it is still active. The sum is
/// clamped at zero with no upper clamp (the point budget tops out at 100 by
/// construction).
pub fn readiness_score_on(potential: &TradePotential, today: NaiveDate) -> i32 {
    let mut score = match potential.status {
        PotentialStatus::Complete => 40,
        PotentialStatus::MissingPrice => 20,
        PotentialStatus::MissingTransport => 20,
        PotentialStatus::MissingBoth => 0,
    };

    if let Some(price) = &potential.supplier_price {
        score += margin_bonus(price.price_per_unit, potential.opportunity.as_ref());
        score += urgency_bonus(price.valid_until, today);
    }

    if potential.has_opportunity {
        score -= 10;
    }
    if potential.is_active_opportunity {
        score += 5;
    }

    score.max(0)
}

/// Points for the expected margin over the supplier price.
///
/// Without an explicit offer the ladder assumes a 15% markup over the buy
/// price. A zero or negative offer yields no bonus rather than a division
/// blowup.
fn margin_bonus(price_per_unit: Decimal, opportunity: Option<&OpportunityRef>) -> i32 {
    let offer_price = match opportunity {
        Some(opp) => opp.offer_price,
        None => price_per_unit * Decimal::new(115, 2),
    };

    let margin_percent = match (offer_price - price_per_unit).checked_div(offer_price) {
        Some(fraction) => fraction * Decimal::from(100),
        None => return 0,
    };

    if margin_percent >= Decimal::from(20) {
        30
    } else if margin_percent >= Decimal::from(15) {
        25
    } else if margin_percent >= Decimal::from(10) {
        20
    } else if margin_percent >= Decimal::from(5) {
        10
    } else {
        0
    }
}

/// Points for how soon the supplier price expires.
///
/// Days may be negative for an already-expired price; that still lands in the
/// tightest bucket, since stale prices need attention first.
fn urgency_bonus(valid_until: Option<NaiveDate>, today: NaiveDate) -> i32 {
    let Some(until) = valid_until else {
        return 0;
    };
    let days_until_expiry = (until - today).num_days();

    if days_until_expiry <= 3 {
        20
    } else if days_until_expiry <= 7 {
        15
    } else if days_until_expiry <= 14 {
        10
    } else {
        0
    }
}

/// Map a score to its priority bucket.
pub fn readiness_label(score: i32) -> ReadinessLabel {
    if score >= 70 {
        ReadinessLabel::HotLead
    } else if score >= 50 {
        ReadinessLabel::HighPriority
    } else if score >= 30 {
        ReadinessLabel::Ready
    } else if score >= 10 {
        ReadinessLabel::NeedsWork
    } else {
        ReadinessLabel::LowPriority
    }
}

/// Return a new vector sorted by descending readiness score.
///
/// Today is captured once for the whole pass so a midnight rollover cannot
/// score two halves of one board against different dates.
pub fn sort_by_readiness_score(potentials: &[TradePotential]) -> Vec<TradePotential> {
    sort_by_readiness_score_on(potentials, Utc::now().date_naive())
}

/// Sort against an explicit reference date.
///
/// Decorate-sort on the cached score only; the sort is stable, so equal
/// scores keep their input order. The input slice is left untouched.
pub fn sort_by_readiness_score_on(
    potentials: &[TradePotential],
    today: NaiveDate,
) -> Vec<TradePotential> {
    let mut decorated: Vec<(i32, TradePotential)> = potentials
        .iter()
        .map(|p| (readiness_score_on(p, today), p.clone()))
        .collect();
    decorated.sort_by(|a, b| b.0.cmp(&a.0));
    decorated.into_iter().map(|(_, p)| p).collect()
}
