//! Builder for [`WaitConfig`].

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use super::config::{SuccessCallback, WaitConfig, DEFAULT_MAX_WAIT};
use crate::error::{ConfigError, OptionKey};
use crate::exception::{ErrorKind, ExceptionPolicy};
use crate::step::{Step, StepPolicy, TimeUnit};

enum StepChoice {
    Fixed(Arc<dyn Step>),
    // Needs the final budget, so it's resolved in `build`.
    Tiered,
}

/// Assembles a [`WaitConfig`], accepting each option at most once.
///
/// Every setter consumes the builder and returns it back, or
/// [`ConfigError::DuplicateOption`] if that option was already set. All the
/// step setters share the [`OptionKey::Step`] slot.
///
/// # Examples
///
/// ```rust
/// use waitfor::{ConfigError, OptionKey, TimeUnit, WaitConfig};
/// use std::time::Duration;
///
/// let config = WaitConfig::builder()
///     .max_wait(Duration::from_secs(2))?
///     .parabolic_step(TimeUnit::Milliseconds)?
///     .timeout_message("service did not come up")?
///     .build();
/// assert_eq!(config.max_wait(), Duration::from_secs(2));
///
/// let err = WaitConfig::builder()
///     .constant_step(Duration::from_millis(10))?
///     .logarithmic_step(TimeUnit::Seconds)
///     .unwrap_err();
/// assert_eq!(err, ConfigError::DuplicateOption(OptionKey::Step));
/// # Ok::<(), ConfigError>(())
/// ```
#[must_use = "builders do nothing unless built"]
pub struct WaitBuilder {
    set: BTreeSet<OptionKey>,
    max_wait: Duration,
    step: Option<StepChoice>,
    timeout_message: String,
    non_ignorable: Vec<ErrorKind>,
    on_success: Option<SuccessCallback>,
}

impl WaitBuilder {
    pub(super) fn new() -> Self {
        Self {
            set: BTreeSet::new(),
            max_wait: DEFAULT_MAX_WAIT,
            step: None,
            timeout_message: String::new(),
            non_ignorable: Vec::new(),
            on_success: None,
        }
    }

    fn claim(&mut self, key: OptionKey) -> Result<(), ConfigError> {
        if self.set.insert(key) {
            Ok(())
        } else {
            Err(ConfigError::DuplicateOption(key))
        }
    }

    /// Returns true if `key` has already been set.
    pub fn is_set(&self, key: OptionKey) -> bool {
        self.set.contains(&key)
    }

    /// Set the time budget. Defaults to 30 seconds.
    pub fn max_wait(mut self, max_wait: Duration) -> Result<Self, ConfigError> {
        self.claim(OptionKey::MaxWaitTime)?;
        self.max_wait = max_wait;
        Ok(self)
    }

    /// Use a custom step, such as a closure `Fn(u32) -> Duration`.
    ///
    /// ```rust
    /// use waitfor::WaitConfig;
    /// use std::time::Duration;
    ///
    /// let config = WaitConfig::builder()
    ///     .step(|attempt: u32| Duration::from_millis(5) * attempt)?
    ///     .build();
    /// assert_eq!(config.step().delay(4), Ok(Duration::from_millis(20)));
    /// # Ok::<(), waitfor::ConfigError>(())
    /// ```
    pub fn step<S>(mut self, step: S) -> Result<Self, ConfigError>
    where
        S: Step + 'static,
    {
        self.claim(OptionKey::Step)?;
        self.step = Some(StepChoice::Fixed(Arc::new(step)));
        Ok(self)
    }

    /// Sleep the same amount after every failed attempt.
    pub fn constant_step(self, delay: Duration) -> Result<Self, ConfigError> {
        self.step(StepPolicy::constant(delay))
    }

    /// Grow the delay logarithmically. This is the default, in seconds.
    pub fn logarithmic_step(self, unit: TimeUnit) -> Result<Self, ConfigError> {
        self.step(StepPolicy::logarithmic(unit))
    }

    /// Double the delay after every failed attempt.
    pub fn parabolic_step(self, unit: TimeUnit) -> Result<Self, ConfigError> {
        self.step(StepPolicy::parabolic(unit))
    }

    /// Pick one delay from the configured budget.
    ///
    /// The budget is read at [`build`](Self::build) time, so this can be
    /// called before or after [`max_wait`](Self::max_wait).
    pub fn tiered_step(mut self) -> Result<Self, ConfigError> {
        self.claim(OptionKey::Step)?;
        self.step = Some(StepChoice::Tiered);
        Ok(self)
    }

    /// Set the message included in timeout diagnostics.
    pub fn timeout_message(mut self, message: impl Into<String>) -> Result<Self, ConfigError> {
        self.claim(OptionKey::TimeoutMessage)?;
        self.timeout_message = message.into();
        Ok(self)
    }

    /// Abort the wait when the producer raises one of these error kinds.
    ///
    /// ```rust
    /// use waitfor::{ErrorKind, WaitConfig};
    ///
    /// let config = WaitConfig::builder()
    ///     .non_ignorable([ErrorKind::of::<std::fmt::Error>()])?
    ///     .build();
    /// assert!(!config.exception_policy().is_ignorable(&std::fmt::Error));
    /// # Ok::<(), waitfor::ConfigError>(())
    /// ```
    pub fn non_ignorable(
        mut self,
        kinds: impl IntoIterator<Item = ErrorKind>,
    ) -> Result<Self, ConfigError> {
        self.claim(OptionKey::NonIgnorable)?;
        self.non_ignorable = kinds.into_iter().collect();
        Ok(self)
    }

    /// Call `callback` once when the condition is met.
    ///
    /// It receives the number of failed attempts before success and the
    /// elapsed time.
    pub fn on_success<F>(mut self, callback: F) -> Result<Self, ConfigError>
    where
        F: Fn(u32, Duration) + Send + Sync + 'static,
    {
        self.claim(OptionKey::OnSuccess)?;
        self.on_success = Some(Arc::new(callback));
        Ok(self)
    }

    /// Resolve the configuration, filling unset options with defaults.
    pub fn build(self) -> WaitConfig {
        let step: Arc<dyn Step> = match self.step {
            Some(StepChoice::Fixed(step)) => step,
            Some(StepChoice::Tiered) => Arc::new(StepPolicy::tiered(self.max_wait)),
            None => Arc::new(StepPolicy::default()),
        };

        WaitConfig {
            max_wait: self.max_wait,
            step,
            timeout_message: self.timeout_message,
            exceptions: ExceptionPolicy::new(self.non_ignorable),
            on_success: self.on_success,
        }
    }
}

impl Default for WaitBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for WaitBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WaitBuilder")
            .field("set", &self.set)
            .field("max_wait", &self.max_wait)
            .field("timeout_message", &self.timeout_message)
            .field("non_ignorable", &self.non_ignorable)
            .finish_non_exhaustive()
    }
}
