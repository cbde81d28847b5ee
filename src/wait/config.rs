//! Resolved wait configuration.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use super::builder::WaitBuilder;
use crate::exception::ExceptionPolicy;
use crate::step::{Step, StepPolicy};

/// The time budget used when none is configured.
pub const DEFAULT_MAX_WAIT: Duration = Duration::from_secs(30);

/// Callback invoked once when the condition is met, with the number of
/// failed attempts before success and the elapsed time.
pub type SuccessCallback = Arc<dyn Fn(u32, Duration) + Send + Sync>;

/// Immutable options for a wait.
///
/// Built once with [`WaitConfig::builder`] and then shared read-only; clones
/// share the step policy and the success callback.
///
/// # Examples
///
/// ```rust
/// use waitfor::{WaitConfig, DEFAULT_MAX_WAIT};
/// use std::time::Duration;
///
/// let config = WaitConfig::default();
/// assert_eq!(config.max_wait(), DEFAULT_MAX_WAIT);
/// assert_eq!(config.timeout_message(), "");
///
/// let config = WaitConfig::builder()
///     .max_wait(Duration::from_secs(5))?
///     .constant_step(Duration::from_millis(100))?
///     .build();
/// assert_eq!(config.step().delay(3), Ok(Duration::from_millis(100)));
/// # Ok::<(), waitfor::ConfigError>(())
/// ```
#[derive(Clone)]
pub struct WaitConfig {
    pub(super) max_wait: Duration,
    pub(super) step: Arc<dyn Step>,
    pub(super) timeout_message: String,
    pub(super) exceptions: ExceptionPolicy,
    pub(super) on_success: Option<SuccessCallback>,
}

impl WaitConfig {
    /// Start building a configuration.
    pub fn builder() -> WaitBuilder {
        WaitBuilder::new()
    }

    /// The time budget.
    pub fn max_wait(&self) -> Duration {
        self.max_wait
    }

    /// The delay policy between attempts.
    pub fn step(&self) -> &dyn Step {
        self.step.as_ref()
    }

    /// The message included in timeout diagnostics.
    pub fn timeout_message(&self) -> &str {
        &self.timeout_message
    }

    /// Which errors abort the wait.
    pub fn exception_policy(&self) -> &ExceptionPolicy {
        &self.exceptions
    }

    /// Returns true if a success callback is configured.
    pub fn has_success_callback(&self) -> bool {
        self.on_success.is_some()
    }

    pub(crate) fn notify_success(&self, attempt: u32, elapsed: Duration) {
        if let Some(callback) = &self.on_success {
            callback(attempt, elapsed);
        }
    }
}

impl Default for WaitConfig {
    fn default() -> Self {
        Self {
            max_wait: DEFAULT_MAX_WAIT,
            step: Arc::new(StepPolicy::default()),
            timeout_message: String::new(),
            exceptions: ExceptionPolicy::default(),
            on_success: None,
        }
    }
}

impl fmt::Debug for WaitConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WaitConfig")
            .field("max_wait", &self.max_wait)
            .field("timeout_message", &self.timeout_message)
            .field("exceptions", &self.exceptions)
            .field("on_success", &self.on_success.is_some())
            .finish_non_exhaustive()
    }
}
