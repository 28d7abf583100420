//! Readiness scoring tests for trade potentials
//!
//! Covers the additive point system end to end:
//! - completion status, margin ladder, and price urgency sub-scores
//! - opportunity penalty and active-opportunity bonus
//! - non-negativity clamp, label thresholds, and stable descending sort

use chrono::{Duration, NaiveDate};
use proptest::prelude::*;
use rust_decimal::Decimal;
use std::str::FromStr;
use uuid::Uuid;

use shared::{
    readiness_label, readiness_score_on, sort_by_readiness_score_on, OpportunityRef,
    PotentialStatus, PriceQuote, ReadinessLabel, TradePotential,
};

/// Helper to create Decimal from string
fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

/// Fixed reference date so urgency buckets are deterministic
fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 16).unwrap()
}

fn potential(status: PotentialStatus) -> TradePotential {
    TradePotential {
        id: Uuid::new_v4(),
        status,
        supplier_price: None,
        opportunity: None,
        has_opportunity: false,
        is_active_opportunity: false,
    }
}

fn with_price(status: PotentialStatus, price: &str, days_until_expiry: i64) -> TradePotential {
    let mut p = potential(status);
    p.supplier_price = Some(PriceQuote {
        price_per_unit: dec(price),
        valid_until: Some(today() + Duration::days(days_until_expiry)),
    });
    p
}

// =============================================================================
// Completion Status Sub-Score
// =============================================================================

mod completion_status {
    use super::*;

    #[test]
    fn empty_match_scores_zero() {
        // Nothing in place, no price, no opportunity
        let p = potential(PotentialStatus::MissingBoth);
        assert_eq!(readiness_score_on(&p, today()), 0);
        assert_eq!(readiness_label(0), ReadinessLabel::LowPriority);
    }

    #[test]
    fn complete_match_scores_forty() {
        let p = potential(PotentialStatus::Complete);
        assert_eq!(readiness_score_on(&p, today()), 40);
    }

    #[test]
    fn partial_matches_score_twenty() {
        let missing_price = potential(PotentialStatus::MissingPrice);
        assert_eq!(readiness_score_on(&missing_price, today()), 20);

        let missing_transport = potential(PotentialStatus::MissingTransport);
        assert_eq!(readiness_score_on(&missing_transport, today()), 20);
    }
}

// =============================================================================
// Margin Ladder Sub-Score
// =============================================================================

mod margin_ladder {
    use super::*;

    fn scored_margin(price: &str, offer: &str) -> i32 {
        let mut p = potential(PotentialStatus::MissingBoth);
        p.supplier_price = Some(PriceQuote {
            price_per_unit: dec(price),
            valid_until: None,
        });
        p.opportunity = Some(OpportunityRef {
            offer_price: dec(offer),
        });
        // Status and urgency contribute nothing, so the score IS the margin bonus
        readiness_score_on(&p, today())
    }

    #[test]
    fn margin_at_least_twenty_percent_scores_thirty() {
        // (125 - 100) / 125 = 20%
        assert_eq!(scored_margin("100", "125"), 30);
        // (130 - 100) / 130 = 23.1%
        assert_eq!(scored_margin("100", "130"), 30);
    }

    #[test]
    fn margin_at_least_fifteen_percent_scores_twenty_five() {
        // (120 - 100) / 120 = 16.7%
        assert_eq!(scored_margin("100", "120"), 25);
    }

    #[test]
    fn margin_at_least_ten_percent_scores_twenty() {
        // (112 - 100) / 112 = 10.7%
        assert_eq!(scored_margin("100", "112"), 20);
    }

    #[test]
    fn margin_at_least_five_percent_scores_ten() {
        // (106 - 100) / 106 = 5.7%
        assert_eq!(scored_margin("100", "106"), 10);
    }

    #[test]
    fn margin_below_five_percent_scores_nothing() {
        // (104 - 100) / 104 = 3.8%
        assert_eq!(scored_margin("100", "104"), 0);
        // Selling at cost
        assert_eq!(scored_margin("100", "100"), 0);
        // Selling below cost
        assert_eq!(scored_margin("100", "90"), 0);
    }

    #[test]
    fn default_markup_assumed_without_offer() {
        // No opportunity: offer defaults to price * 1.15, margin 15/115 = 13.0%
        let mut p = potential(PotentialStatus::MissingBoth);
        p.supplier_price = Some(PriceQuote {
            price_per_unit: dec("100"),
            valid_until: None,
        });
        assert_eq!(readiness_score_on(&p, today()), 20);
    }

    #[test]
    fn zero_offer_price_scores_nothing() {
        // Division guard: a zero offer cannot produce a margin
        assert_eq!(scored_margin("100", "0"), 0);
    }
}

// =============================================================================
// Price Urgency Sub-Score
// =============================================================================

mod price_urgency {
    use super::*;

    fn scored_urgency(days_until_expiry: i64) -> i32 {
        let mut p = with_price(PotentialStatus::MissingBoth, "100", days_until_expiry);
        // Pin the offer at cost so the margin ladder contributes nothing
        p.opportunity = Some(OpportunityRef {
            offer_price: dec("100"),
        });
        readiness_score_on(&p, today())
    }

    #[test]
    fn expiring_within_three_days_scores_twenty() {
        assert_eq!(scored_urgency(0), 20);
        assert_eq!(scored_urgency(2), 20);
        assert_eq!(scored_urgency(3), 20);
    }

    #[test]
    fn expiring_within_seven_days_scores_fifteen() {
        assert_eq!(scored_urgency(4), 15);
        assert_eq!(scored_urgency(7), 15);
    }

    #[test]
    fn expiring_within_fourteen_days_scores_ten() {
        assert_eq!(scored_urgency(8), 10);
        assert_eq!(scored_urgency(14), 10);
    }

    #[test]
    fn expiring_later_scores_nothing() {
        assert_eq!(scored_urgency(15), 0);
        assert_eq!(scored_urgency(90), 0);
    }

    #[test]
    fn already_expired_price_lands_in_tightest_bucket() {
        // Stale prices need attention first
        assert_eq!(scored_urgency(-1), 20);
        assert_eq!(scored_urgency(-30), 20);
    }

    #[test]
    fn open_ended_price_has_no_urgency() {
        let mut p = potential(PotentialStatus::MissingBoth);
        p.supplier_price = Some(PriceQuote {
            price_per_unit: dec("100"),
            valid_until: None,
        });
        p.opportunity = Some(OpportunityRef {
            offer_price: dec("100"),
        });
        assert_eq!(readiness_score_on(&p, today()), 0);
    }
}

// =============================================================================
// Opportunity Adjustments
// =============================================================================

mod opportunity_adjustments {
    use super::*;

    #[test]
    fn existing_opportunity_deducts_ten() {
        let base = potential(PotentialStatus::Complete);
        let mut flagged = base.clone();
        flagged.has_opportunity = true;

        assert_eq!(readiness_score_on(&base, today()), 40);
        assert_eq!(readiness_score_on(&flagged, today()), 30);
    }

    #[test]
    fn active_opportunity_adds_five_back() {
        let mut p = potential(PotentialStatus::Complete);
        p.has_opportunity = true;
        p.is_active_opportunity = true;
        // 40 - 10 + 5
        assert_eq!(readiness_score_on(&p, today()), 35);
    }

    #[test]
    fn deduction_cannot_push_score_negative() {
        let mut p = potential(PotentialStatus::MissingBoth);
        p.has_opportunity = true;
        // 0 - 10 clamps to 0
        assert_eq!(readiness_score_on(&p, today()), 0);
    }
}

// =============================================================================
// Worked Example: Hot Lead
// =============================================================================

mod worked_examples {
    use super::*;

    #[test]
    fn complete_match_with_strong_margin_and_expiring_price_is_hot_lead() {
        // Complete (40) + 23.1% margin (30) + expires in 2 days (20) = 90
        let mut p = with_price(PotentialStatus::Complete, "100", 2);
        p.opportunity = Some(OpportunityRef {
            offer_price: dec("130"),
        });

        let score = readiness_score_on(&p, today());
        assert_eq!(score, 90);
        assert_eq!(readiness_label(score), ReadinessLabel::HotLead);
    }
}

// =============================================================================
// Label Thresholds
// =============================================================================

mod label_thresholds {
    use super::*;

    #[test]
    fn label_boundaries() {
        assert_eq!(readiness_label(100), ReadinessLabel::HotLead);
        assert_eq!(readiness_label(70), ReadinessLabel::HotLead);
        assert_eq!(readiness_label(69), ReadinessLabel::HighPriority);
        assert_eq!(readiness_label(50), ReadinessLabel::HighPriority);
        assert_eq!(readiness_label(49), ReadinessLabel::Ready);
        assert_eq!(readiness_label(30), ReadinessLabel::Ready);
        assert_eq!(readiness_label(29), ReadinessLabel::NeedsWork);
        assert_eq!(readiness_label(10), ReadinessLabel::NeedsWork);
        assert_eq!(readiness_label(9), ReadinessLabel::LowPriority);
        assert_eq!(readiness_label(0), ReadinessLabel::LowPriority);
    }

    #[test]
    fn label_display_strings() {
        assert_eq!(format!("{}", ReadinessLabel::HotLead), "Hot Lead");
        assert_eq!(format!("{}", ReadinessLabel::HighPriority), "High Priority");
        assert_eq!(format!("{}", ReadinessLabel::Ready), "Ready");
        assert_eq!(format!("{}", ReadinessLabel::NeedsWork), "Needs Work");
        assert_eq!(format!("{}", ReadinessLabel::LowPriority), "Low Priority");
    }

    #[test]
    fn label_colors_for_terminal_board() {
        assert_eq!(ReadinessLabel::HotLead.color(), "red");
        assert_eq!(ReadinessLabel::HighPriority.color(), "orange");
        assert_eq!(ReadinessLabel::Ready.color(), "green");
        assert_eq!(ReadinessLabel::NeedsWork.color(), "yellow");
        assert_eq!(ReadinessLabel::LowPriority.color(), "gray");
    }
}

// =============================================================================
// Sorting
// =============================================================================

mod sorting {
    use super::*;

    #[test]
    fn sorts_descending_by_score() {
        let low = potential(PotentialStatus::MissingBoth);
        let mid = potential(PotentialStatus::MissingPrice);
        let high = potential(PotentialStatus::Complete);

        let sorted = sort_by_readiness_score_on(&[low.clone(), high.clone(), mid.clone()], today());

        assert_eq!(sorted[0].id, high.id);
        assert_eq!(sorted[1].id, mid.id);
        assert_eq!(sorted[2].id, low.id);
    }

    #[test]
    fn equal_scores_keep_input_order() {
        // MissingPrice and MissingTransport both score 20
        let first = potential(PotentialStatus::MissingPrice);
        let second = potential(PotentialStatus::MissingTransport);
        let third = potential(PotentialStatus::MissingPrice);

        let sorted =
            sort_by_readiness_score_on(&[first.clone(), second.clone(), third.clone()], today());

        assert_eq!(sorted[0].id, first.id);
        assert_eq!(sorted[1].id, second.id);
        assert_eq!(sorted[2].id, third.id);
    }

    #[test]
    fn input_slice_is_left_untouched() {
        let input = vec![
            potential(PotentialStatus::MissingBoth),
            potential(PotentialStatus::Complete),
        ];
        let ids: Vec<Uuid> = input.iter().map(|p| p.id).collect();

        let _ = sort_by_readiness_score_on(&input, today());

        assert_eq!(input.iter().map(|p| p.id).collect::<Vec<_>>(), ids);
    }
}

// =============================================================================
// Property-Based Tests
// =============================================================================

mod property_tests {
    use super::*;

    fn status_strategy() -> impl Strategy<Value = PotentialStatus> {
        prop_oneof![
            Just(PotentialStatus::Complete),
            Just(PotentialStatus::MissingPrice),
            Just(PotentialStatus::MissingTransport),
            Just(PotentialStatus::MissingBoth),
        ]
    }

    /// Prices from 0.01 to 1000.00 with two decimal places
    fn price_strategy() -> impl Strategy<Value = Decimal> {
        (1i64..=100_000i64).prop_map(|cents| Decimal::new(cents, 2))
    }

    fn potential_strategy() -> impl Strategy<Value = TradePotential> {
        (
            status_strategy(),
            proptest::option::of((price_strategy(), proptest::option::of(-30i64..=60i64))),
            proptest::option::of(price_strategy()),
            any::<bool>(),
            any::<bool>(),
        )
            .prop_map(|(status, price, offer, has_opportunity, is_active)| {
                TradePotential {
                    id: Uuid::new_v4(),
                    status,
                    supplier_price: price.map(|(price_per_unit, days)| PriceQuote {
                        price_per_unit,
                        valid_until: days.map(|d| today() + Duration::days(d)),
                    }),
                    opportunity: offer.map(|offer_price| OpportunityRef { offer_price }),
                    has_opportunity,
                    is_active_opportunity: is_active,
                }
            })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Score is never negative for any input combination
        #[test]
        fn prop_score_never_negative(p in potential_strategy()) {
            prop_assert!(readiness_score_on(&p, today()) >= 0);
        }

        /// Score never exceeds the total point budget
        #[test]
        fn prop_score_never_exceeds_budget(p in potential_strategy()) {
            // 40 + 30 + 20 + 5 caps the sum at 95 with the penalty off,
            // 100 is a safe ceiling either way
            prop_assert!(readiness_score_on(&p, today()) <= 100);
        }

        /// Flagging an existing opportunity reduces the score by exactly 10,
        /// unless the clamp already holds the base at zero
        #[test]
        fn prop_opportunity_penalty_is_ten(p in potential_strategy()) {
            let mut without = p.clone();
            without.has_opportunity = false;
            let mut with = p.clone();
            with.has_opportunity = true;

            let base = readiness_score_on(&without, today());
            let penalized = readiness_score_on(&with, today());

            prop_assert_eq!(penalized, (base - 10).max(0));
        }

        /// Marking the opportunity active adds exactly 5 on top
        #[test]
        fn prop_active_bonus_is_five(p in potential_strategy()) {
            let mut inactive = p.clone();
            inactive.has_opportunity = true;
            inactive.is_active_opportunity = false;
            let mut active = p.clone();
            active.has_opportunity = true;
            active.is_active_opportunity = true;

            let base = readiness_score_on(&inactive, today());
            let boosted = readiness_score_on(&active, today());

            // Both adjustments land before the final clamp, so a
            // zero-clamped score can absorb part of the bonus
            prop_assert!(boosted >= base);
            prop_assert!(boosted <= base + 5);
        }

        /// A sooner expiry never scores lower urgency than a later one
        #[test]
        fn prop_urgency_monotone_in_expiry(
            sooner in -30i64..=60i64,
            later in -30i64..=60i64,
        ) {
            prop_assume!(sooner <= later);

            let mut a = with_price(PotentialStatus::MissingBoth, "100", sooner);
            a.opportunity = Some(OpportunityRef { offer_price: dec("100") });
            let mut b = with_price(PotentialStatus::MissingBoth, "100", later);
            b.opportunity = Some(OpportunityRef { offer_price: dec("100") });

            prop_assert!(
                readiness_score_on(&a, today()) >= readiness_score_on(&b, today())
            );
        }

        /// A wider margin never scores lower than a narrower one
        #[test]
        fn prop_margin_monotone_in_offer(
            offer_low in 1i64..=50_000i64,
            offer_high in 1i64..=50_000i64,
        ) {
            prop_assume!(offer_low <= offer_high);

            let mut a = potential(PotentialStatus::MissingBoth);
            a.supplier_price = Some(PriceQuote {
                price_per_unit: dec("100"),
                valid_until: None,
            });
            let mut b = a.clone();
            a.opportunity = Some(OpportunityRef {
                offer_price: Decimal::new(offer_high, 2),
            });
            b.opportunity = Some(OpportunityRef {
                offer_price: Decimal::new(offer_low, 2),
            });

            prop_assert!(
                readiness_score_on(&a, today()) >= readiness_score_on(&b, today())
            );
        }

        /// Sorted output is a permutation in descending score order
        #[test]
        fn prop_sort_is_descending_permutation(
            potentials in proptest::collection::vec(potential_strategy(), 0..20)
        ) {
            let sorted = sort_by_readiness_score_on(&potentials, today());

            prop_assert_eq!(sorted.len(), potentials.len());

            let scores: Vec<i32> = sorted
                .iter()
                .map(|p| readiness_score_on(p, today()))
                .collect();
            prop_assert!(scores.windows(2).all(|w| w[0] >= w[1]));

            let mut input_ids: Vec<Uuid> = potentials.iter().map(|p| p.id).collect();
            let mut output_ids: Vec<Uuid> = sorted.iter().map(|p| p.id).collect();
            input_ids.sort();
            output_ids.sort();
            prop_assert_eq!(input_ids, output_ids);
        }

        /// Every score lands in exactly one label bucket
        #[test]
        fn prop_label_matches_threshold(score in 0i32..=100i32) {
            let label = readiness_label(score);
            let expected = if score >= 70 {
                ReadinessLabel::HotLead
            } else if score >= 50 {
                ReadinessLabel::HighPriority
            } else if score >= 30 {
                ReadinessLabel::Ready
            } else if score >= 10 {
                ReadinessLabel::NeedsWork
            } else {
                ReadinessLabel::LowPriority
            };
            prop_assert_eq!(label, expected);
        }
    }
}
