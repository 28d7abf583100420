//! Price validity window tests
//!
//! A supplier price is current on a date when its validity window covers it.
//! Both endpoints are inclusive and an absent end keeps the window open.

use chrono::{Duration, NaiveDate};
use proptest::prelude::*;

use shared::validity_covers;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

// =============================================================================
// Window Boundaries
// =============================================================================

mod window_boundaries {
    use super::*;

    #[test]
    fn both_endpoints_are_inclusive() {
        let from = date(2025, 3, 1);
        let until = Some(date(2025, 3, 31));

        assert!(validity_covers(from, until, date(2025, 3, 1)));
        assert!(validity_covers(from, until, date(2025, 3, 31)));
    }

    #[test]
    fn outside_the_window_is_not_covered() {
        let from = date(2025, 3, 1);
        let until = Some(date(2025, 3, 31));

        assert!(!validity_covers(from, until, date(2025, 2, 28)));
        assert!(!validity_covers(from, until, date(2025, 4, 1)));
    }

    #[test]
    fn single_day_window_covers_exactly_that_day() {
        let day = date(2025, 3, 15);
        assert!(validity_covers(day, Some(day), day));
        assert!(!validity_covers(day, Some(day), date(2025, 3, 14)));
        assert!(!validity_covers(day, Some(day), date(2025, 3, 16)));
    }

    #[test]
    fn open_ended_window_never_expires() {
        let from = date(2025, 3, 1);
        assert!(validity_covers(from, None, date(2025, 3, 1)));
        assert!(validity_covers(from, None, date(2030, 12, 31)));
        assert!(!validity_covers(from, None, date(2025, 2, 28)));
    }

    #[test]
    fn inverted_window_covers_nothing() {
        // until before from leaves no coverable date
        let from = date(2025, 3, 31);
        let until = Some(date(2025, 3, 1));
        assert!(!validity_covers(from, until, date(2025, 2, 15)));
        assert!(!validity_covers(from, until, date(2025, 3, 15)));
        assert!(!validity_covers(from, until, date(2025, 4, 15)));
    }
}

// =============================================================================
// Property-Based Tests
// =============================================================================

mod property_tests {
    use super::*;

    fn date_strategy() -> impl Strategy<Value = NaiveDate> {
        // A few years around the epoch date, day granularity
        (-1500i64..=1500i64).prop_map(|offset| date(2025, 1, 1) + Duration::days(offset))
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Coverage agrees with plain date comparison
        #[test]
        fn prop_covered_iff_within_bounds(
            from in date_strategy(),
            until in proptest::option::of(date_strategy()),
            probe in date_strategy(),
        ) {
            let covered = validity_covers(from, until, probe);
            let expected = from <= probe && until.map_or(true, |u| probe <= u);
            prop_assert_eq!(covered, expected);
        }

        /// Closing an open window never adds coverage
        #[test]
        fn prop_closing_the_window_only_shrinks_coverage(
            from in date_strategy(),
            until in date_strategy(),
            probe in date_strategy(),
        ) {
            if validity_covers(from, Some(until), probe) {
                prop_assert!(validity_covers(from, None, probe));
            }
        }

        /// Extending the end date keeps every covered date covered
        #[test]
        fn prop_extending_the_end_keeps_coverage(
            from in date_strategy(),
            until in date_strategy(),
            extension in 0i64..=365i64,
            probe in date_strategy(),
        ) {
            if validity_covers(from, Some(until), probe) {
                let extended = until + Duration::days(extension);
                prop_assert!(validity_covers(from, Some(extended), probe));
            }
        }
    }
}
