//! Delays between polling attempts.
//!
//! A step decides how long the wait loop sleeps after a failed attempt. It is
//! a pure function of the attempt number, which starts at 1:
//!
//! - **Constant**: the same delay every time
//! - **Logarithmic**: `unit(ln(attempt) + start)`, slow growth (the default)
//! - **Parabolic**: `unit(2^attempt)`, fast growth
//! - **Tiered**: one delay derived from the total budget
//!
//! ```rust
//! use waitfor::{StepPolicy, TimeUnit};
//! use std::time::Duration;
//!
//! let policy = StepPolicy::logarithmic(TimeUnit::Seconds);
//! assert!(policy.delay(0).is_err());
//! assert_eq!(policy.delay(1), Ok(Duration::ZERO));
//! ```

mod policy;
mod unit;

pub use policy::{tiered_delay, Step, StepPolicy};
pub use unit::TimeUnit;

#[cfg(test)]
mod tests;
