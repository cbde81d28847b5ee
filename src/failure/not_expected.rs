//! The "value never matched" failure.

use std::fmt;

use super::TimeoutHeader;
use crate::condition::{substitute, ObservedField};

/// The condition was never met; carries the last produced value.
///
/// Renders as the timeout header followed by what was expected:
///
/// ```text
/// Timeout after 1.003 second(s) and 3 attempt(s): Fail
/// Expected: x == 4, but was 3
/// ```
///
/// The value is rendered with `Debug`, the one bound every `T` can offer,
/// so strings appear quoted (`but was "queued"`).
///
/// When the condition observed fields that occur in its text, their values
/// are written into the text instead of dumping the whole value:
///
/// ```text
/// Expected: a.child.number(5) == 1 && a.number(3) == 3
/// ```
#[derive(Debug, Clone)]
pub struct NotExpectedValue<T> {
    header: TimeoutHeader,
    actual: T,
    condition: String,
    observed: Vec<ObservedField>,
}

impl<T> NotExpectedValue<T> {
    /// Create a failure for `actual`.
    pub fn new(
        header: TimeoutHeader,
        actual: T,
        condition: impl Into<String>,
        observed: Vec<ObservedField>,
    ) -> Self {
        Self {
            header,
            actual,
            condition: condition.into(),
            observed,
        }
    }

    /// The timeout context.
    pub fn header(&self) -> &TimeoutHeader {
        &self.header
    }

    /// The last value produced.
    pub fn actual(&self) -> &T {
        &self.actual
    }

    /// Take the last value produced.
    pub fn into_actual(self) -> T {
        self.actual
    }

    /// The condition text.
    pub fn condition(&self) -> &str {
        &self.condition
    }

    /// Field values read from the last value.
    pub fn observed(&self) -> &[ObservedField] {
        &self.observed
    }

    /// Transform the carried value.
    pub fn map<U, F>(self, f: F) -> NotExpectedValue<U>
    where
        F: FnOnce(T) -> U,
    {
        NotExpectedValue {
            header: self.header,
            actual: f(self.actual),
            condition: self.condition,
            observed: self.observed,
        }
    }
}

impl<T: fmt::Debug> fmt::Display for NotExpectedValue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.header)?;
        match substitute(&self.condition, &self.observed) {
            Some(inline) => write!(f, "Expected: {}", inline),
            None => write!(f, "Expected: {}, but was {:?}", self.condition, self.actual),
        }
    }
}
