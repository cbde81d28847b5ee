//! Step policy types.

use std::time::Duration;

use super::unit::TimeUnit;
use crate::error::StepError;

/// Computes the delay before the next attempt.
///
/// `attempt` counts failed attempts so far and starts at 1; the wait loop
/// never asks for attempt 0.
///
/// Any `Fn(u32) -> Duration` closure is a step:
///
/// ```rust
/// use waitfor::Step;
/// use std::time::Duration;
///
/// let linear = |attempt: u32| Duration::from_millis(10) * attempt;
/// assert_eq!(linear.delay(3), Ok(Duration::from_millis(30)));
/// ```
pub trait Step: Send + Sync {
    /// The delay to sleep after the given failed attempt.
    fn delay(&self, attempt: u32) -> Result<Duration, StepError>;
}

impl<F> Step for F
where
    F: Fn(u32) -> Duration + Send + Sync,
{
    fn delay(&self, attempt: u32) -> Result<Duration, StepError> {
        Ok(self(attempt))
    }
}

/// The built-in step strategies.
///
/// Policies are pure data: they describe the delay curve but don't sleep.
///
/// # Examples
///
/// ```rust
/// use waitfor::{StepPolicy, TimeUnit};
/// use std::time::Duration;
///
/// let policy = StepPolicy::parabolic(TimeUnit::Milliseconds);
/// assert_eq!(policy.delay(1), Ok(Duration::from_millis(2)));
/// assert_eq!(policy.delay(3), Ok(Duration::from_millis(8)));
///
/// let policy = StepPolicy::constant(Duration::from_millis(500));
/// assert_eq!(policy.delay(7), Ok(Duration::from_millis(500)));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum StepPolicy {
    /// Fixed delay between attempts.
    Constant(Duration),
    /// Delay grows with the natural logarithm: unit(ln(attempt) + start).
    Logarithmic {
        /// Unit of the computed value.
        unit: TimeUnit,
        /// Offset added to the logarithm.
        start: i32,
    },
    /// Delay doubles: unit(2^attempt).
    Parabolic {
        /// Unit of the computed value.
        unit: TimeUnit,
    },
    /// A single delay chosen from the total budget.
    Tiered {
        /// The max wait time the delay is derived from.
        budget: Duration,
    },
}

impl StepPolicy {
    /// Create a policy with a fixed delay.
    pub fn constant(delay: Duration) -> Self {
        StepPolicy::Constant(delay)
    }

    /// Create a logarithmic policy with no start offset.
    ///
    /// This is the default policy, in seconds.
    ///
    /// ```rust
    /// use waitfor::{StepPolicy, TimeUnit};
    /// use std::time::Duration;
    ///
    /// let policy = StepPolicy::logarithmic(TimeUnit::Seconds);
    /// assert_eq!(policy.delay(1), Ok(Duration::ZERO)); // ln(1) == 0
    /// ```
    pub fn logarithmic(unit: TimeUnit) -> Self {
        StepPolicy::Logarithmic { unit, start: 0 }
    }

    /// Create a logarithmic policy shifted by `start` units.
    pub fn logarithmic_from(unit: TimeUnit, start: i32) -> Self {
        StepPolicy::Logarithmic { unit, start }
    }

    /// Create a parabolic (exponential) policy.
    pub fn parabolic(unit: TimeUnit) -> Self {
        StepPolicy::Parabolic { unit }
    }

    /// Create a size-tiered policy for the given budget.
    ///
    /// ```rust
    /// use waitfor::StepPolicy;
    /// use std::time::Duration;
    ///
    /// let policy = StepPolicy::tiered(Duration::from_secs(30));
    /// assert_eq!(policy.delay(1), Ok(Duration::from_millis(500)));
    /// ```
    pub fn tiered(budget: Duration) -> Self {
        StepPolicy::Tiered { budget }
    }

    /// Calculate the delay after the given failed attempt (1-indexed).
    ///
    /// Logarithmic and parabolic policies reject attempt 0.
    pub fn delay(&self, attempt: u32) -> Result<Duration, StepError> {
        match self {
            StepPolicy::Constant(d) => Ok(*d),
            StepPolicy::Logarithmic { unit, start } => {
                check_attempt(attempt)?;
                Ok(unit.to_duration(f64::from(attempt).ln() + f64::from(*start)))
            }
            StepPolicy::Parabolic { unit } => {
                check_attempt(attempt)?;
                Ok(unit.to_duration(2f64.powf(f64::from(attempt))))
            }
            StepPolicy::Tiered { budget } => Ok(tiered_delay(*budget)),
        }
    }
}

impl Default for StepPolicy {
    fn default() -> Self {
        StepPolicy::logarithmic(TimeUnit::Seconds)
    }
}

impl Step for StepPolicy {
    fn delay(&self, attempt: u32) -> Result<Duration, StepError> {
        StepPolicy::delay(self, attempt)
    }
}

fn check_attempt(attempt: u32) -> Result<(), StepError> {
    if attempt == 0 {
        Err(StepError::NonPositiveAttempt)
    } else {
        Ok(())
    }
}

const ONE_MINUTE: Duration = Duration::from_secs(60);
const FIVE_MINUTES: Duration = Duration::from_secs(5 * 60);

/// A budget band: when it applies and which delay it picks.
struct Band {
    applies: fn(Duration) -> bool,
    delay: fn(Duration) -> Duration,
}

// Checked in order, first match wins.
const BANDS: [Band; 3] = [
    Band {
        applies: |budget| ONE_MINUTE < budget && budget < FIVE_MINUTES,
        delay: |budget| budget / 40,
    },
    Band {
        applies: |budget| budget >= FIVE_MINUTES,
        delay: |_| Duration::from_secs(10),
    },
    Band {
        applies: |budget| budget <= ONE_MINUTE,
        delay: |budget| budget / 60,
    },
];

/// Pick the inter-attempt delay for a total budget.
///
/// | budget            | delay         |
/// |-------------------|---------------|
/// | over 1m, under 5m | budget / 40   |
/// | 5m or more        | 10s           |
/// | 1m or less        | budget / 60   |
pub fn tiered_delay(budget: Duration) -> Duration {
    BANDS
        .iter()
        .find(|band| (band.applies)(budget))
        .map_or(budget / 60, |band| (band.delay)(budget))
}
