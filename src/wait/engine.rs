//! Blocking and async drivers for [`WaitState`].

use std::time::Instant;

use super::config::WaitConfig;
use super::state::{Next, WaitState};
use crate::condition::Condition;
use crate::error::BoxError;
use crate::outcome::Outcome;

/// Poll `producer` on the current thread until `condition` holds or the
/// budget runs out.
///
/// Returns `Err` only when the producer raises a non-ignorable error (or the
/// step policy rejects an attempt); the error is handed back as it was
/// raised. A timeout is an `Ok(Outcome::Failure(..))`.
///
/// # Examples
///
/// ```rust
/// use waitfor::{execute, Condition, Outcome, WaitConfig};
/// use std::time::Duration;
///
/// let config = WaitConfig::builder().max_wait(Duration::from_secs(3))?.build();
/// let cond = Condition::new("x > 3", |x: &i32| *x > 3);
///
/// let outcome = execute(|| Ok::<_, std::io::Error>(4), &cond, &config).unwrap();
/// assert!(matches!(outcome, Outcome::Success(4)));
/// # Ok::<(), waitfor::ConfigError>(())
/// ```
pub fn execute<T, E, F>(
    mut producer: F,
    condition: &Condition<T>,
    config: &WaitConfig,
) -> Result<Outcome<T>, BoxError>
where
    F: FnMut() -> Result<T, E>,
    E: Into<BoxError>,
{
    let start = Instant::now();
    let mut state = WaitState::new(config, condition);

    loop {
        let result = producer();
        match state.observe(result, start.elapsed()) {
            Next::Done(outcome) => return Ok(outcome),
            Next::Abort(error) => return Err(error),
            Next::Sleep(delay) => std::thread::sleep(delay),
        }
    }
}

/// Async version of [`execute`]: awaits the producer and sleeps with
/// `tokio::time::sleep`. Attempts never overlap.
///
/// # Examples
///
/// ```rust
/// use waitfor::{execute_async, Condition, Outcome, WaitConfig};
///
/// # tokio_test::block_on(async {
/// let config = WaitConfig::default();
/// let cond = Condition::new("x > 3", |x: &i32| *x > 3);
///
/// let outcome = execute_async(|| async { Ok::<_, std::io::Error>(4) }, &cond, &config)
///     .await
///     .unwrap();
/// assert!(matches!(outcome, Outcome::Success(4)));
/// # });
/// ```
#[cfg(feature = "async")]
pub async fn execute_async<T, E, F, Fut>(
    mut producer: F,
    condition: &Condition<T>,
    config: &WaitConfig,
) -> Result<Outcome<T>, BoxError>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<T, E>>,
    E: Into<BoxError>,
{
    let start = tokio::time::Instant::now();
    let mut state = WaitState::new(config, condition);

    loop {
        let result = producer().await;
        match state.observe(result, start.elapsed()) {
            Next::Done(outcome) => return Ok(outcome),
            Next::Abort(error) => return Err(error),
            Next::Sleep(delay) => tokio::time::sleep(delay).await,
        }
    }
}
