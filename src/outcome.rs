//! The result of a wait that did not abort.
//!
//! [`Outcome`] is either the value that satisfied the condition or the
//! [`Failure`] describing why the time budget ran out. Adapters turn it into
//! whatever the call site needs:
//!
//! ```rust
//! use waitfor::{wait_for_value, Condition};
//! use std::time::Duration;
//!
//! let outcome = wait_for_value(|| 3)
//!     .configure(|b| b.max_wait(Duration::ZERO))
//!     .unwrap()
//!     .until(Condition::new("x == 4", |x: &i32| *x == 4))
//!     .unwrap();
//!
//! // Fall back to a default on timeout
//! let value = outcome.on_failure(|_| -1);
//! assert_eq!(value, -1);
//! ```

use std::fmt;

use crate::error::WaitConditionFailed;
use crate::failure::{ExceptionsHappened, Failure, NotExpectedValue};

/// A finished wait: success or timeout.
#[must_use = "a wait outcome may be a timeout that should be handled"]
#[derive(Debug)]
pub enum Outcome<T> {
    /// The condition was met by this value.
    Success(T),
    /// The time budget ran out.
    Failure(Failure<T>),
}

impl<T> Outcome<T> {
    /// Returns true if the condition was met.
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }

    /// Returns true if the wait timed out.
    pub fn is_failure(&self) -> bool {
        matches!(self, Outcome::Failure(_))
    }

    /// The value that satisfied the condition, if any.
    pub fn success(self) -> Option<T> {
        match self {
            Outcome::Success(value) => Some(value),
            Outcome::Failure(_) => None,
        }
    }

    /// The timeout failure, if any.
    pub fn failure(self) -> Option<Failure<T>> {
        match self {
            Outcome::Success(_) => None,
            Outcome::Failure(failure) => Some(failure),
        }
    }

    /// Borrow the success value.
    pub fn as_success(&self) -> Option<&T> {
        match self {
            Outcome::Success(value) => Some(value),
            Outcome::Failure(_) => None,
        }
    }

    /// Borrow the failure.
    pub fn as_failure(&self) -> Option<&Failure<T>> {
        match self {
            Outcome::Success(_) => None,
            Outcome::Failure(failure) => Some(failure),
        }
    }

    /// Transform the value.
    ///
    /// The last value carried by a [`NotExpectedValue`] failure is
    /// transformed too.
    ///
    /// ```rust
    /// use waitfor::Outcome;
    ///
    /// let outcome: Outcome<i32> = Outcome::Success(21);
    /// assert_eq!(outcome.map(|x| x * 2).success(), Some(42));
    /// ```
    pub fn map<U, F>(self, f: F) -> Outcome<U>
    where
        F: FnOnce(T) -> U,
    {
        match self {
            Outcome::Success(value) => Outcome::Success(f(value)),
            Outcome::Failure(failure) => Outcome::Failure(failure.map_actual(f)),
        }
    }

    /// Run `f` on the success value and pass the outcome through.
    pub fn inspect<F>(self, f: F) -> Self
    where
        F: FnOnce(&T),
    {
        if let Outcome::Success(value) = &self {
            f(value);
        }
        self
    }

    /// Run `f` on the failure and pass the outcome through.
    pub fn inspect_failure<F>(self, f: F) -> Self
    where
        F: FnOnce(&Failure<T>),
    {
        if let Outcome::Failure(failure) = &self {
            f(failure);
        }
        self
    }

    /// The success value, or the value `f` makes from the failure.
    pub fn on_failure<F>(self, f: F) -> T
    where
        F: FnOnce(Failure<T>) -> T,
    {
        match self {
            Outcome::Success(value) => value,
            Outcome::Failure(failure) => f(failure),
        }
    }

    /// Recover from failures matching `when`; other outcomes pass through.
    ///
    /// ```rust
    /// use waitfor::{Failure, Outcome};
    ///
    /// let outcome: Outcome<i32> = Outcome::Success(1);
    /// let outcome = outcome.on_failure_when(Failure::is_exceptions_happened, |_| 0);
    /// assert_eq!(outcome.success(), Some(1));
    /// ```
    pub fn on_failure_when<P, F>(self, when: P, f: F) -> Self
    where
        P: FnOnce(&Failure<T>) -> bool,
        F: FnOnce(Failure<T>) -> T,
    {
        match self {
            Outcome::Failure(failure) if when(&failure) => Outcome::Success(f(failure)),
            other => other,
        }
    }

    /// Recover from an [`ExceptionsHappened`] failure.
    pub fn when_exceptions<F>(self, f: F) -> Self
    where
        F: FnOnce(ExceptionsHappened) -> T,
    {
        match self {
            Outcome::Failure(Failure::ExceptionsHappened(eh)) => Outcome::Success(f(eh)),
            other => other,
        }
    }

    /// Recover from a [`NotExpectedValue`] failure.
    pub fn when_not_expected_value<F>(self, f: F) -> Self
    where
        F: FnOnce(NotExpectedValue<T>) -> T,
    {
        match self {
            Outcome::Failure(Failure::NotExpectedValue(nev)) => Outcome::Success(f(nev)),
            other => other,
        }
    }

    /// Run `f` on an [`ExceptionsHappened`] failure and pass the outcome
    /// through.
    pub fn do_when_exceptions<F>(self, f: F) -> Self
    where
        F: FnOnce(&ExceptionsHappened),
    {
        if let Outcome::Failure(Failure::ExceptionsHappened(eh)) = &self {
            f(eh);
        }
        self
    }

    /// Run `f` on a [`NotExpectedValue`] failure and pass the outcome
    /// through.
    pub fn do_when_not_expected_value<F>(self, f: F) -> Self
    where
        F: FnOnce(&NotExpectedValue<T>),
    {
        if let Outcome::Failure(Failure::NotExpectedValue(nev)) = &self {
            f(nev);
        }
        self
    }

    /// Convert into a `Result`, keeping the structured failure.
    pub fn into_result(self) -> Result<T, Failure<T>> {
        match self {
            Outcome::Success(value) => Ok(value),
            Outcome::Failure(failure) => Err(failure),
        }
    }
}

impl<T: fmt::Debug> Outcome<T> {
    /// Convert a timeout into a [`WaitConditionFailed`] error carrying the
    /// rendered failure.
    ///
    /// ```rust
    /// use waitfor::{wait_for_value, Condition};
    /// use std::time::Duration;
    ///
    /// let err = wait_for_value(|| 3)
    ///     .configure(|b| b.max_wait(Duration::ZERO)?.timeout_message("Fail"))
    ///     .unwrap()
    ///     .until(Condition::new("x == 4", |x: &i32| *x == 4))
    ///     .unwrap()
    ///     .or_fail()
    ///     .unwrap_err();
    ///
    /// assert!(err.message().ends_with("Expected: x == 4, but was 3"));
    /// ```
    pub fn or_fail(self) -> Result<T, WaitConditionFailed> {
        match self {
            Outcome::Success(value) => Ok(value),
            Outcome::Failure(failure) => Err(WaitConditionFailed::new(failure.to_string())),
        }
    }
}

impl<T> From<Failure<T>> for Outcome<T> {
    fn from(failure: Failure<T>) -> Self {
        Outcome::Failure(failure)
    }
}
