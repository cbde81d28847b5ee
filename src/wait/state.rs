//! The wait loop as a state machine.
//!
//! [`WaitState`] holds everything one wait call accumulates: the attempt
//! counter, the collected errors and the last produced value. It never
//! sleeps or reads the clock; the blocking and async loops feed it each
//! attempt's result with the elapsed time and act on the returned [`Next`].

use std::time::Duration;

use super::config::WaitConfig;
use crate::condition::Condition;
use crate::error::BoxError;
use crate::exception::CollectedError;
use crate::failure::{Failure, TimeoutHeader};
use crate::outcome::Outcome;

/// What the loop should do after an attempt.
#[derive(Debug)]
pub(crate) enum Next<T> {
    /// Stop with this outcome.
    Done(Outcome<T>),
    /// Sleep, then attempt again.
    Sleep(Duration),
    /// Stop and hand this error back to the caller.
    Abort(BoxError),
}

pub(crate) struct WaitState<'a, T> {
    config: &'a WaitConfig,
    condition: &'a Condition<T>,
    attempt: u32,
    errors: Vec<CollectedError>,
    last: Option<T>,
}

impl<'a, T> WaitState<'a, T> {
    pub(crate) fn new(config: &'a WaitConfig, condition: &'a Condition<T>) -> Self {
        Self {
            config,
            condition,
            attempt: 0,
            errors: Vec::new(),
            last: None,
        }
    }

    /// Failed attempts so far.
    #[cfg(test)]
    pub(crate) fn attempt(&self) -> u32 {
        self.attempt
    }

    /// Record the result of one attempt, finished `elapsed` after the wait
    /// started.
    pub(crate) fn observe<E>(&mut self, result: Result<T, E>, elapsed: Duration) -> Next<T>
    where
        E: Into<BoxError>,
    {
        match result {
            Ok(value) if self.condition.is_met(&value) => {
                #[cfg(feature = "tracing")]
                tracing::debug!(
                    attempt = self.attempt,
                    elapsed = ?elapsed,
                    "wait condition met"
                );
                self.config.notify_success(self.attempt, elapsed);
                return Next::Done(Outcome::Success(value));
            }
            Ok(value) => self.last = Some(value),
            Err(error) => {
                let error: BoxError = error.into();
                if !self.config.exception_policy().is_ignorable(error.as_ref()) {
                    #[cfg(feature = "tracing")]
                    tracing::warn!(
                        attempt = self.attempt,
                        error = %error,
                        "wait aborted by non-ignorable error"
                    );
                    return Next::Abort(error);
                }
                self.errors
                    .push(CollectedError::new(std::any::type_name::<E>(), error));
            }
        }

        self.attempt = self.attempt.saturating_add(1);

        if elapsed >= self.config.max_wait() {
            #[cfg(feature = "tracing")]
            tracing::warn!(
                attempts = self.attempt,
                elapsed = ?elapsed,
                errors = self.errors.len(),
                "wait timed out"
            );
            return Next::Done(Outcome::Failure(self.finish(elapsed)));
        }

        match self.config.step().delay(self.attempt) {
            Ok(delay) => {
                #[cfg(feature = "tracing")]
                tracing::debug!(
                    attempt = self.attempt,
                    elapsed = ?elapsed,
                    delay = ?delay,
                    "wait condition not met, retrying"
                );
                Next::Sleep(delay)
            }
            Err(error) => Next::Abort(Box::new(error)),
        }
    }

    fn finish(&mut self, elapsed: Duration) -> Failure<T> {
        let header = TimeoutHeader::new(
            elapsed,
            self.attempt,
            self.config.max_wait(),
            self.config.timeout_message(),
        );
        Failure::from_run(
            header,
            std::mem::take(&mut self.errors),
            self.last.take(),
            self.condition,
        )
    }
}

#[cfg(test)]
mod state_tests {
    use super::*;
    use crate::error::StepError;
    use crate::exception::ErrorKind;
    use std::fmt;
    use std::io;

    #[derive(Debug)]
    struct Fatal;

    impl fmt::Display for Fatal {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("fatal")
        }
    }

    impl std::error::Error for Fatal {}

    fn equals_four() -> Condition<i32> {
        Condition::new("x == 4", |x: &i32| *x == 4)
    }

    fn config(max_wait: Duration) -> WaitConfig {
        WaitConfig::builder()
            .max_wait(max_wait)
            .unwrap()
            .constant_step(Duration::from_millis(10))
            .unwrap()
            .build()
    }

    #[test]
    fn test_success_on_first_attempt() {
        let config = config(Duration::from_secs(1));
        let cond = equals_four();
        let mut state = WaitState::new(&config, &cond);

        match state.observe(Ok::<_, io::Error>(4), Duration::ZERO) {
            Next::Done(Outcome::Success(4)) => {}
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(state.attempt(), 0);
    }

    #[test]
    fn test_unmet_condition_sleeps_per_step() {
        let config = config(Duration::from_secs(1));
        let cond = equals_four();
        let mut state = WaitState::new(&config, &cond);

        match state.observe(Ok::<_, io::Error>(3), Duration::from_millis(5)) {
            Next::Sleep(delay) => assert_eq!(delay, Duration::from_millis(10)),
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(state.attempt(), 1);
    }

    #[test]
    fn test_timeout_carries_last_value() {
        let config = config(Duration::from_millis(50));
        let cond = equals_four();
        let mut state = WaitState::new(&config, &cond);

        assert!(matches!(
            state.observe(Ok::<_, io::Error>(1), Duration::from_millis(10)),
            Next::Sleep(_)
        ));
        match state.observe(Ok::<_, io::Error>(3), Duration::from_millis(50)) {
            Next::Done(Outcome::Failure(Failure::NotExpectedValue(nev))) => {
                assert_eq!(*nev.actual(), 3);
                assert_eq!(nev.header().attempts(), 2);
                assert_eq!(nev.header().elapsed(), Duration::from_millis(50));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_collected_errors_take_priority() {
        let config = config(Duration::from_millis(50));
        let cond = equals_four();
        let mut state = WaitState::new(&config, &cond);

        let _ = state.observe(Err(io::Error::other("flaky")), Duration::ZERO);
        match state.observe(Ok::<_, io::Error>(3), Duration::from_millis(60)) {
            Next::Done(Outcome::Failure(Failure::ExceptionsHappened(eh))) => {
                assert_eq!(eh.groups().len(), 1);
                assert_eq!(eh.groups()[0].kind(), std::any::type_name::<io::Error>());
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_non_ignorable_error_aborts() {
        let config = WaitConfig::builder()
            .non_ignorable([ErrorKind::of::<Fatal>()])
            .unwrap()
            .build();
        let cond = equals_four();
        let mut state = WaitState::new(&config, &cond);

        match state.observe(Err::<i32, _>(Fatal), Duration::ZERO) {
            Next::Abort(error) => assert!(error.is::<Fatal>()),
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(state.attempt(), 0);
    }

    #[test]
    fn test_zero_budget_allows_one_attempt() {
        let config = config(Duration::ZERO);
        let cond = equals_four();
        let mut state = WaitState::new(&config, &cond);

        match state.observe(Ok::<_, io::Error>(3), Duration::ZERO) {
            Next::Done(Outcome::Failure(failure)) => {
                assert_eq!(failure.header().attempts(), 1);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_step_error_aborts() {
        let config = WaitConfig::builder()
            .step(|_: u32| Duration::ZERO)
            .unwrap()
            .build();
        let failing_step = WaitConfig {
            step: std::sync::Arc::new(FailingStep),
            ..config
        };
        let cond = equals_four();
        let mut state = WaitState::new(&failing_step, &cond);

        match state.observe(Ok::<_, io::Error>(3), Duration::ZERO) {
            Next::Abort(error) => assert!(error.is::<StepError>()),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_attempt_counter_saturates() {
        let config = config(Duration::from_secs(1));
        let cond = equals_four();
        let mut state = WaitState::new(&config, &cond);
        state.attempt = u32::MAX;

        assert!(matches!(
            state.observe(Ok::<_, io::Error>(3), Duration::from_millis(5)),
            Next::Sleep(_)
        ));
        assert_eq!(state.attempt(), u32::MAX);
    }

    struct FailingStep;

    impl crate::step::Step for FailingStep {
        fn delay(&self, _attempt: u32) -> Result<Duration, StepError> {
            Err(StepError::NonPositiveAttempt)
        }
    }

    #[test]
    fn test_success_callback_gets_retry_count() {
        let seen = std::sync::Arc::new(std::sync::Mutex::new(None));
        let sink = std::sync::Arc::clone(&seen);
        let config = WaitConfig::builder()
            .constant_step(Duration::ZERO)
            .unwrap()
            .on_success(move |attempt, elapsed| {
                *sink.lock().unwrap() = Some((attempt, elapsed));
            })
            .unwrap()
            .build();
        let cond = equals_four();
        let mut state = WaitState::new(&config, &cond);

        let _ = state.observe(Ok::<_, io::Error>(1), Duration::from_millis(1));
        let _ = state.observe(Ok::<_, io::Error>(2), Duration::from_millis(2));
        let _ = state.observe(Ok::<_, io::Error>(4), Duration::from_millis(3));

        assert_eq!(
            *seen.lock().unwrap(),
            Some((2, Duration::from_millis(3)))
        );
    }
}
