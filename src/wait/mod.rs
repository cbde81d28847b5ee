//! The polling loop and its entry points.
//!
//! A wait repeatedly calls a producer until its value satisfies a
//! [`Condition`] or the time budget runs out, sleeping between attempts as
//! the configured step dictates:
//!
//! 1. Call the producer.
//! 2. A non-ignorable error stops the wait and is returned as `Err`.
//! 3. Any other error is recorded; the attempt failed.
//! 4. A value meeting the condition ends the wait with
//!    [`Outcome::Success`]. Otherwise it's kept as the last value.
//! 5. After a failed attempt, if the budget is spent the wait ends with
//!    [`Outcome::Failure`]; otherwise it sleeps and goes back to 1.
//!
//! Time is only checked after an attempt, so even a zero budget calls the
//! producer once.
//!
//! # Quick Start
//!
//! ```rust
//! use waitfor::{wait_for, condition, Outcome};
//! use std::cell::Cell;
//! use std::time::Duration;
//!
//! let calls = Cell::new(0);
//! let outcome = wait_for(|| {
//!     calls.set(calls.get() + 1);
//!     Ok::<_, std::io::Error>(calls.get())
//! })
//! .configure(|b| b.constant_step(Duration::from_millis(1)))?
//! .until(condition!(|n: &u32| *n >= 3))
//! .unwrap();
//!
//! assert!(matches!(outcome, Outcome::Success(3)));
//! # Ok::<(), waitfor::ConfigError>(())
//! ```

mod builder;
mod config;
mod engine;
mod state;

pub use builder::WaitBuilder;
pub use config::{SuccessCallback, WaitConfig, DEFAULT_MAX_WAIT};
#[cfg(feature = "async")]
pub use engine::execute_async;
pub use engine::execute;

use std::convert::Infallible;
use std::time::Duration;

use crate::condition::Condition;
use crate::error::{BoxError, ConfigError, WaitError};
use crate::outcome::Outcome;

const CHECK_PASSES: &str = "check passes";

/// A producer waiting for a condition, with its configuration.
///
/// Created by [`wait_for`], [`wait_for_value`] or [`wait_for_async`].
#[must_use = "a wait does nothing until `until` is called"]
pub struct WaitFor<F> {
    producer: F,
    config: WaitConfig,
}

/// Wait on a producer that may fail.
///
/// Errors it returns are retried unless configured as
/// [non-ignorable](WaitBuilder::non_ignorable).
pub fn wait_for<F, T, E>(producer: F) -> WaitFor<F>
where
    F: FnMut() -> Result<T, E>,
    E: Into<BoxError>,
{
    WaitFor::new(producer)
}

/// Wait on a producer that can't fail.
///
/// ```rust
/// use waitfor::{wait_for_value, Condition};
///
/// let outcome = wait_for_value(|| 4)
///     .until(Condition::new("x > 3", |x: &i32| *x > 3))
///     .unwrap();
/// assert_eq!(outcome.success(), Some(4));
/// ```
pub fn wait_for_value<F, T>(mut producer: F) -> WaitFor<impl FnMut() -> Result<T, Infallible>>
where
    F: FnMut() -> T,
{
    WaitFor::new(move || Ok(producer()))
}

/// Wait on an async producer.
///
/// ```rust
/// use waitfor::{wait_for_async, Condition};
///
/// # tokio_test::block_on(async {
/// let outcome = wait_for_async(|| async { Ok::<_, std::io::Error>("ready") })
///     .until_async(Condition::new("s == ready", |s: &&str| *s == "ready"))
///     .await
///     .unwrap();
/// assert_eq!(outcome.success(), Some("ready"));
/// # });
/// ```
#[cfg(feature = "async")]
pub fn wait_for_async<F, Fut, T, E>(producer: F) -> WaitFor<F>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<T, E>>,
    E: Into<BoxError>,
{
    WaitFor::new(producer)
}

impl<F> WaitFor<F> {
    fn new(producer: F) -> Self {
        Self {
            producer,
            config: WaitConfig::default(),
        }
    }

    /// Configure the wait through a fresh [`WaitBuilder`].
    ///
    /// Replaces any configuration set before.
    pub fn configure<C>(mut self, configure: C) -> Result<Self, ConfigError>
    where
        C: FnOnce(WaitBuilder) -> Result<WaitBuilder, ConfigError>,
    {
        self.config = configure(WaitConfig::builder())?.build();
        Ok(self)
    }

    /// Use an existing configuration.
    pub fn with_config(mut self, config: WaitConfig) -> Self {
        self.config = config;
        self
    }

    /// The configuration this wait will run with.
    pub fn config(&self) -> &WaitConfig {
        &self.config
    }

    /// Poll until `condition` holds or the budget runs out.
    ///
    /// See [`execute`] for the meaning of `Err`.
    pub fn until<T, E>(self, condition: Condition<T>) -> Result<Outcome<T>, BoxError>
    where
        F: FnMut() -> Result<T, E>,
        E: Into<BoxError>,
    {
        execute(self.producer, &condition, &self.config)
    }

    /// Async version of [`until`](Self::until).
    #[cfg(feature = "async")]
    pub async fn until_async<T, E, Fut>(
        self,
        condition: Condition<T>,
    ) -> Result<Outcome<T>, BoxError>
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = Result<T, E>>,
        E: Into<BoxError>,
    {
        execute_async(self.producer, &condition, &self.config).await
    }
}

impl WaitFor<()> {
    /// Poll `check` until it returns true, for up to [`DEFAULT_MAX_WAIT`].
    ///
    /// A timeout becomes [`WaitError::Failed`] whose message includes
    /// `timeout_message`.
    ///
    /// ```rust
    /// use waitfor::WaitFor;
    /// use std::time::Duration;
    ///
    /// let mut polls = 0;
    /// WaitFor::condition_within(
    ///     || { polls += 1; polls == 2 },
    ///     Duration::from_secs(5),
    ///     "second poll",
    /// )?;
    /// assert_eq!(polls, 2);
    /// # Ok::<(), waitfor::WaitError>(())
    /// ```
    pub fn condition<C>(check: C, timeout_message: impl Into<String>) -> Result<(), WaitError>
    where
        C: FnMut() -> bool,
    {
        Self::condition_within(check, DEFAULT_MAX_WAIT, timeout_message)
    }

    /// Poll `check` until it returns true, for up to `max_wait`.
    pub fn condition_within<C>(
        mut check: C,
        max_wait: Duration,
        timeout_message: impl Into<String>,
    ) -> Result<(), WaitError>
    where
        C: FnMut() -> bool,
    {
        let config = condition_config(max_wait, timeout_message)?;
        let passes = Condition::new(CHECK_PASSES, |met: &bool| *met);
        execute(|| Ok::<_, Infallible>(check()), &passes, &config)?.or_fail()?;
        Ok(())
    }

    /// Async version of [`condition`](Self::condition).
    #[cfg(feature = "async")]
    pub async fn condition_async<C, Fut>(
        check: C,
        timeout_message: impl Into<String>,
    ) -> Result<(), WaitError>
    where
        C: FnMut() -> Fut,
        Fut: std::future::Future<Output = bool>,
    {
        Self::condition_within_async(check, DEFAULT_MAX_WAIT, timeout_message).await
    }

    /// Async version of [`condition_within`](Self::condition_within).
    #[cfg(feature = "async")]
    pub async fn condition_within_async<C, Fut>(
        mut check: C,
        max_wait: Duration,
        timeout_message: impl Into<String>,
    ) -> Result<(), WaitError>
    where
        C: FnMut() -> Fut,
        Fut: std::future::Future<Output = bool>,
    {
        let config = condition_config(max_wait, timeout_message)?;
        let passes = Condition::new(CHECK_PASSES, |met: &bool| *met);
        let producer = || {
            let pending = check();
            async move { Ok::<_, Infallible>(pending.await) }
        };
        execute_async(producer, &passes, &config)
            .await?
            .or_fail()?;
        Ok(())
    }
}

fn condition_config(
    max_wait: Duration,
    timeout_message: impl Into<String>,
) -> Result<WaitConfig, ConfigError> {
    Ok(WaitConfig::builder()
        .max_wait(max_wait)?
        .timeout_message(timeout_message)?
        .build())
}

impl<F> std::fmt::Debug for WaitFor<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WaitFor")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
