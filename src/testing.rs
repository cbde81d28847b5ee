//! Testing utilities for code that waits.
//!
//! Assertion macros unwrap an [`Outcome`](crate::Outcome) into the part the
//! test expects, panicking with the rendered failure otherwise:
//!
//! ```rust
//! use waitfor::{assert_not_expected_value, assert_waited, wait_for_value, Condition};
//! use std::time::Duration;
//!
//! let value = assert_waited!(wait_for_value(|| 4)
//!     .until(Condition::new("x > 3", |x: &i32| *x > 3))
//!     .unwrap());
//! assert_eq!(value, 4);
//!
//! let failure = assert_not_expected_value!(wait_for_value(|| 3)
//!     .configure(|b| b.max_wait(Duration::ZERO))
//!     .unwrap()
//!     .until(Condition::new("x == 4", |x: &i32| *x == 4))
//!     .unwrap());
//! assert_eq!(*failure.actual(), 3);
//! ```
//!
//! With the `proptest` feature, [`TimeUnit`](crate::TimeUnit) and
//! [`StepPolicy`](crate::StepPolicy) implement `Arbitrary`.

/// Assert that a wait succeeded and return the value.
///
/// # Example
///
/// ```rust
/// use waitfor::{assert_waited, Outcome};
///
/// let outcome: Outcome<i32> = Outcome::Success(42);
/// assert_eq!(assert_waited!(outcome), 42);
/// ```
#[macro_export]
macro_rules! assert_waited {
    ($outcome:expr) => {
        match $outcome {
            $crate::Outcome::Success(value) => value,
            $crate::Outcome::Failure(failure) => {
                panic!("Expected Success, got Failure: {}", failure);
            }
        }
    };
}

/// Assert that a wait timed out because the value never matched, and
/// return the [`NotExpectedValue`](crate::NotExpectedValue).
#[macro_export]
macro_rules! assert_not_expected_value {
    ($outcome:expr) => {
        match $outcome {
            $crate::Outcome::Failure($crate::Failure::NotExpectedValue(failure)) => failure,
            $crate::Outcome::Failure(failure) => {
                panic!("Expected NotExpectedValue, got: {}", failure);
            }
            $crate::Outcome::Success(value) => {
                panic!("Expected NotExpectedValue, got Success: {:?}", value);
            }
        }
    };
}

/// Assert that a wait timed out with errors raised, and return the
/// [`ExceptionsHappened`](crate::ExceptionsHappened).
#[macro_export]
macro_rules! assert_exceptions_happened {
    ($outcome:expr) => {
        match $outcome {
            $crate::Outcome::Failure($crate::Failure::ExceptionsHappened(failure)) => failure,
            $crate::Outcome::Failure(failure) => {
                panic!("Expected ExceptionsHappened, got: {}", failure);
            }
            $crate::Outcome::Success(value) => {
                panic!("Expected ExceptionsHappened, got Success: {:?}", value);
            }
        }
    };
}

#[cfg(feature = "proptest")]
use crate::step::{StepPolicy, TimeUnit};
#[cfg(feature = "proptest")]
use proptest::prelude::*;

#[cfg(feature = "proptest")]
impl Arbitrary for TimeUnit {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        prop_oneof![
            Just(TimeUnit::Hours),
            Just(TimeUnit::Minutes),
            Just(TimeUnit::Seconds),
            Just(TimeUnit::Milliseconds),
        ]
        .boxed()
    }
}

#[cfg(feature = "proptest")]
impl Arbitrary for StepPolicy {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        use std::time::Duration;

        prop_oneof![
            (0u64..60_000).prop_map(|ms| StepPolicy::constant(Duration::from_millis(ms))),
            (any::<TimeUnit>(), -10i32..10)
                .prop_map(|(unit, start)| StepPolicy::logarithmic_from(unit, start)),
            any::<TimeUnit>().prop_map(StepPolicy::parabolic),
            (0u64..3_600).prop_map(|secs| StepPolicy::tiered(Duration::from_secs(secs))),
        ]
        .boxed()
    }
}

#[cfg(test)]
mod tests {
    use crate::condition::Condition;
    use crate::error::StepError;
    use crate::exception::CollectedError;
    use crate::failure::{Failure, TimeoutHeader};
    use crate::Outcome;
    use std::time::Duration;

    fn header() -> TimeoutHeader {
        TimeoutHeader::new(Duration::from_secs(1), 1, Duration::from_secs(1), "")
    }

    fn not_expected() -> Outcome<i32> {
        let cond = Condition::new("x == 4", |x: &i32| *x == 4);
        Outcome::Failure(Failure::from_run(header(), Vec::new(), Some(3), &cond))
    }

    fn exceptions() -> Outcome<i32> {
        let cond = Condition::from_fn(|_: &i32| true);
        let errors = vec![CollectedError::new(
            "StepError",
            Box::new(StepError::NonPositiveAttempt),
        )];
        Outcome::Failure(Failure::from_run(header(), errors, None, &cond))
    }

    #[test]
    fn assert_waited_returns_value() {
        assert_eq!(assert_waited!(Outcome::Success(7)), 7);
    }

    #[test]
    fn assert_not_expected_value_returns_failure() {
        let failure = assert_not_expected_value!(not_expected());
        assert_eq!(*failure.actual(), 3);
    }

    #[test]
    fn assert_exceptions_happened_returns_failure() {
        let failure = assert_exceptions_happened!(exceptions());
        assert_eq!(failure.groups().len(), 1);
    }

    #[test]
    #[should_panic(expected = "Expected Success, got Failure")]
    fn assert_waited_panics_on_failure() {
        let _ = assert_waited!(not_expected());
    }

    #[test]
    #[should_panic(expected = "Expected NotExpectedValue, got Success")]
    fn assert_not_expected_value_panics_on_success() {
        let _ = assert_not_expected_value!(Outcome::Success(4));
    }

    #[test]
    #[should_panic(expected = "Expected ExceptionsHappened, got: Timeout after")]
    fn assert_exceptions_happened_panics_on_other_failure() {
        let _ = assert_exceptions_happened!(not_expected());
    }

    #[cfg(feature = "proptest")]
    mod proptest_tests {
        use crate::step::{StepPolicy, TimeUnit};
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn arbitrary_policies_accept_positive_attempts(
                policy in any::<StepPolicy>(),
                attempt in 1u32..1_000,
            ) {
                prop_assert!(policy.delay(attempt).is_ok());
            }

            #[test]
            fn arbitrary_units_parse_back(unit in any::<TimeUnit>()) {
                prop_assert_eq!(unit.to_string().parse::<TimeUnit>(), Ok(unit));
            }
        }
    }
}
