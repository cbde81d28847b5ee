//! Property tests for step policies.

use super::*;
use crate::error::StepError;
use proptest::prelude::*;
use std::time::Duration;

fn any_unit() -> impl Strategy<Value = TimeUnit> {
    prop_oneof![
        Just(TimeUnit::Hours),
        Just(TimeUnit::Minutes),
        Just(TimeUnit::Seconds),
        Just(TimeUnit::Milliseconds),
    ]
}

proptest! {
    #[test]
    fn logarithmic_matches_formula(unit in any_unit(), attempt in 1u32..10_000) {
        let policy = StepPolicy::logarithmic(unit);
        prop_assert_eq!(
            policy.delay(attempt),
            Ok(unit.to_duration(f64::from(attempt).ln()))
        );
    }

    #[test]
    fn parabolic_matches_formula(unit in any_unit(), attempt in 1u32..64) {
        let policy = StepPolicy::parabolic(unit);
        prop_assert_eq!(
            policy.delay(attempt),
            Ok(unit.to_duration(2f64.powf(f64::from(attempt))))
        );
    }

    #[test]
    fn growing_policies_reject_zero(unit in any_unit(), start in -5i32..5) {
        prop_assert_eq!(
            StepPolicy::logarithmic_from(unit, start).delay(0),
            Err(StepError::NonPositiveAttempt)
        );
        prop_assert_eq!(
            StepPolicy::parabolic(unit).delay(0),
            Err(StepError::NonPositiveAttempt)
        );
    }

    #[test]
    fn logarithmic_is_monotonic(attempt in 1u32..100_000) {
        let policy = StepPolicy::logarithmic(TimeUnit::Milliseconds);
        let here = policy.delay(attempt).unwrap();
        let next = policy.delay(attempt + 1).unwrap();
        prop_assert!(next >= here);
    }

    #[test]
    fn tiered_never_exceeds_budget_share(secs in 0u64..100_000) {
        let budget = Duration::from_secs(secs);
        let delay = tiered_delay(budget);
        prop_assert!(delay <= Duration::from_secs(10).max(budget / 40));
        prop_assert_eq!(StepPolicy::tiered(budget).delay(1), Ok(delay));
    }
}
