//! Error types for wait configuration and wait failures.
//!
//! Errors fall into three groups:
//!
//! - [`ConfigError`] and [`StepError`]: invalid usage, reported immediately
//!   when the builder or a step policy is called.
//! - [`BoxError`]: a non-ignorable error raised by the producer, handed back
//!   to the caller unchanged.
//! - [`WaitConditionFailed`]: a timed-out wait turned into an error by
//!   [`Outcome::or_fail`](crate::Outcome::or_fail).
//!
//! [`WaitError`] joins all three for the convenience entry points.

use std::error::Error as StdError;
use std::fmt;

/// A boxed error raised by a producer.
///
/// Every error a producer returns is boxed at the producer boundary, so the
/// original value can be recovered with [`downcast`](Box::downcast) or
/// `downcast_ref`.
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Options of a [`WaitBuilder`](crate::WaitBuilder), each settable once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum OptionKey {
    /// The time budget.
    MaxWaitTime,
    /// The delay between attempts.
    Step,
    /// The message reported on timeout.
    TimeoutMessage,
    /// Error kinds that abort the wait.
    NonIgnorable,
    /// The callback invoked on success.
    OnSuccess,
}

impl fmt::Display for OptionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OptionKey::MaxWaitTime => "MaxWaitTime",
            OptionKey::Step => "Step",
            OptionKey::TimeoutMessage => "TimeoutMessage",
            OptionKey::NonIgnorable => "NonIgnorable",
            OptionKey::OnSuccess => "OnSuccess",
        };
        f.write_str(name)
    }
}

/// Error returned by a step policy for an invalid attempt number.
///
/// # Examples
///
/// ```rust
/// use waitfor::{StepError, StepPolicy, TimeUnit};
///
/// let err = StepPolicy::logarithmic(TimeUnit::Seconds).delay(0).unwrap_err();
/// assert_eq!(err, StepError::NonPositiveAttempt);
/// assert!(err.to_string().contains("Should be higher than 0"));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepError {
    /// Attempt numbers start at 1.
    NonPositiveAttempt,
}

impl fmt::Display for StepError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepError::NonPositiveAttempt => {
                write!(f, "Should be higher than 0 (parameter 'attempt')")
            }
        }
    }
}

impl StdError for StepError {}

/// Error returned for invalid wait configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The same builder option was set twice.
    DuplicateOption(OptionKey),
    /// A time unit name could not be parsed.
    UnknownTimeUnit(String),
    /// A settings document was malformed or incomplete.
    InvalidSetting(String),
}

impl ConfigError {
    /// Returns the duplicated option, if this is a duplicate-option error.
    pub fn duplicate_option(&self) -> Option<OptionKey> {
        match self {
            ConfigError::DuplicateOption(key) => Some(*key),
            _ => None,
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::DuplicateOption(key) => {
                write!(f, "This step has already added (option '{}')", key)
            }
            ConfigError::UnknownTimeUnit(name) => write!(f, "unknown time unit '{}'", name),
            ConfigError::InvalidSetting(reason) => write!(f, "invalid wait settings: {}", reason),
        }
    }
}

impl StdError for ConfigError {}

/// A wait that ran out of time, as an error.
///
/// The message is the rendered [`Failure`](crate::Failure).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WaitConditionFailed {
    message: String,
}

impl WaitConditionFailed {
    /// Create a new error from a rendered failure message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The rendered failure message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for WaitConditionFailed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl StdError for WaitConditionFailed {}

/// Error returned by the convenience entry points.
#[derive(Debug)]
pub enum WaitError {
    /// The wait was configured incorrectly.
    Config(ConfigError),
    /// The producer raised a non-ignorable error.
    Aborted(BoxError),
    /// The condition was not met within the time budget.
    Failed(WaitConditionFailed),
}

impl WaitError {
    /// Returns true if the producer raised a non-ignorable error.
    pub fn is_aborted(&self) -> bool {
        matches!(self, WaitError::Aborted(_))
    }

    /// Returns true if the wait timed out.
    pub fn is_failed(&self) -> bool {
        matches!(self, WaitError::Failed(_))
    }

    /// Downcast an aborting error to its original type.
    pub fn aborted_with<E: StdError + 'static>(&self) -> Option<&E> {
        match self {
            WaitError::Aborted(error) => error.downcast_ref::<E>(),
            _ => None,
        }
    }
}

impl fmt::Display for WaitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WaitError::Config(e) => write!(f, "{}", e),
            WaitError::Aborted(e) => write!(f, "wait aborted: {}", e),
            WaitError::Failed(e) => write!(f, "{}", e),
        }
    }
}

impl StdError for WaitError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            WaitError::Config(e) => Some(e),
            WaitError::Aborted(e) => Some(e.as_ref()),
            WaitError::Failed(e) => Some(e),
        }
    }
}

impl From<ConfigError> for WaitError {
    fn from(error: ConfigError) -> Self {
        WaitError::Config(error)
    }
}

impl From<WaitConditionFailed> for WaitError {
    fn from(error: WaitConditionFailed) -> Self {
        WaitError::Failed(error)
    }
}

impl From<BoxError> for WaitError {
    fn from(error: BoxError) -> Self {
        WaitError::Aborted(error)
    }
}
