//! Terminal states of a wait that ran out of time.
//!
//! A timed-out wait produces one of two failures:
//!
//! - [`NotExpectedValue`]: every attempt produced a value, none satisfied the
//!   condition. Carries the last value.
//! - [`ExceptionsHappened`]: at least one attempt raised an ignorable error.
//!   Carries the errors, grouped by signature.
//!
//! Both share a [`TimeoutHeader`] with the elapsed time, the attempt count
//! and the configured timeout message.

mod exceptions;
mod not_expected;

pub use exceptions::{ErrorGroup, ExceptionsHappened};
pub use not_expected::NotExpectedValue;

use std::fmt;
use std::time::Duration;

use crate::condition::Condition;
use crate::exception::CollectedError;

/// Diagnostic context shared by every failure.
///
/// ```rust
/// use waitfor::TimeoutHeader;
/// use std::time::Duration;
///
/// let header = TimeoutHeader::new(Duration::from_millis(1500), 3, Duration::from_secs(1), "Fail");
/// assert_eq!(header.to_string(), "Timeout after 1.500 second(s) and 3 attempt(s): Fail");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeoutHeader {
    elapsed: Duration,
    attempts: u32,
    max_wait: Duration,
    message: String,
}

impl TimeoutHeader {
    /// Create a header.
    pub fn new(elapsed: Duration, attempts: u32, max_wait: Duration, message: impl Into<String>) -> Self {
        Self {
            elapsed,
            attempts,
            max_wait,
            message: message.into(),
        }
    }

    /// Time spent waiting.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Number of failed attempts.
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// The configured budget.
    pub fn max_wait(&self) -> Duration {
        self.max_wait
    }

    /// The configured timeout message, possibly empty.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for TimeoutHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Timeout after {:.3} second(s) and {} attempt(s)",
            self.elapsed.as_secs_f64(),
            self.attempts
        )?;
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        Ok(())
    }
}

/// Why a wait timed out.
#[derive(Debug)]
pub enum Failure<T> {
    /// The last value never satisfied the condition.
    NotExpectedValue(NotExpectedValue<T>),
    /// Ignorable errors were raised during the wait.
    ExceptionsHappened(ExceptionsHappened),
}

impl<T> Failure<T> {
    /// Build the failure for a finished run.
    ///
    /// Collected errors take priority: any error recorded during the run
    /// yields [`ExceptionsHappened`], even if later attempts produced values.
    pub(crate) fn from_run(
        header: TimeoutHeader,
        errors: Vec<CollectedError>,
        last: Option<T>,
        condition: &Condition<T>,
    ) -> Self {
        match last {
            Some(actual) if errors.is_empty() => {
                let observed = condition.observed(&actual);
                Failure::NotExpectedValue(NotExpectedValue::new(
                    header,
                    actual,
                    condition.description(),
                    observed,
                ))
            }
            _ => Failure::ExceptionsHappened(ExceptionsHappened::new(header, errors)),
        }
    }

    /// The shared diagnostic context.
    pub fn header(&self) -> &TimeoutHeader {
        match self {
            Failure::NotExpectedValue(f) => f.header(),
            Failure::ExceptionsHappened(f) => f.header(),
        }
    }

    /// Returns true if the condition was never met by a produced value.
    pub fn is_not_expected_value(&self) -> bool {
        matches!(self, Failure::NotExpectedValue(_))
    }

    /// Returns true if errors were raised during the wait.
    pub fn is_exceptions_happened(&self) -> bool {
        matches!(self, Failure::ExceptionsHappened(_))
    }

    /// Borrow the not-expected-value failure, if that's what this is.
    pub fn as_not_expected_value(&self) -> Option<&NotExpectedValue<T>> {
        match self {
            Failure::NotExpectedValue(f) => Some(f),
            Failure::ExceptionsHappened(_) => None,
        }
    }

    /// Borrow the exceptions failure, if that's what this is.
    pub fn as_exceptions_happened(&self) -> Option<&ExceptionsHappened> {
        match self {
            Failure::ExceptionsHappened(f) => Some(f),
            Failure::NotExpectedValue(_) => None,
        }
    }

    /// Transform the last observed value, if any.
    pub fn map_actual<U, F>(self, f: F) -> Failure<U>
    where
        F: FnOnce(T) -> U,
    {
        match self {
            Failure::NotExpectedValue(nev) => Failure::NotExpectedValue(nev.map(f)),
            Failure::ExceptionsHappened(eh) => Failure::ExceptionsHappened(eh),
        }
    }
}

impl<T: fmt::Debug> fmt::Display for Failure<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Failure::NotExpectedValue(nev) => fmt::Display::fmt(nev, f),
            Failure::ExceptionsHappened(eh) => fmt::Display::fmt(eh, f),
        }
    }
}

impl<T: fmt::Debug> std::error::Error for Failure<T> {}
