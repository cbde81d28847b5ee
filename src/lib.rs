//! # waitfor
//!
//! Poll a producer until its value satisfies a condition or a time budget
//! runs out.
//!
//! Every attempt calls the producer and checks the condition. Between
//! failed attempts the wait sleeps for a delay chosen by a [`Step`] policy.
//! Errors raised by the producer are either recorded and retried, or abort
//! the wait immediately when their type is listed as non-ignorable.
//!
//! A finished wait is an [`Outcome`]: the matching value, or a [`Failure`]
//! explaining the timeout with the last value seen or the errors raised.
//!
//! ## Quick Example
//!
//! ```rust
//! use waitfor::{condition, wait_for, Failure, Outcome};
//! use std::time::Duration;
//!
//! #[derive(Debug)]
//! struct Job {
//!     state: &'static str,
//! }
//!
//! fn fetch_job() -> Result<Job, std::io::Error> {
//!     Ok(Job { state: "running" })
//! }
//!
//! let outcome = wait_for(fetch_job)
//!     .configure(|b| {
//!         b.max_wait(Duration::from_millis(50))?
//!             .constant_step(Duration::from_millis(10))?
//!             .timeout_message("job never finished")
//!     })?
//!     .until(condition!(|job: &Job| job.state == "done"))
//!     .expect("no non-ignorable errors configured");
//!
//! match outcome {
//!     Outcome::Success(job) => println!("done: {:?}", job),
//!     Outcome::Failure(Failure::NotExpectedValue(failure)) => {
//!         assert_eq!(failure.actual().state, "running");
//!     }
//!     Outcome::Failure(failure) => println!("errors: {}", failure),
//! }
//! # Ok::<(), waitfor::ConfigError>(())
//! ```
//!
//! ## Features
//!
//! - `async`: [`wait_for_async`] and [`execute_async`], sleeping with tokio
//! - `tracing`: `tracing` events for retries, success, timeout and aborts
//! - `proptest`: `Arbitrary` for step policies

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

pub mod condition;
pub mod error;
pub mod exception;
pub mod failure;
pub mod outcome;
pub mod settings;
pub mod step;
pub mod testing;
pub mod wait;

// Re-exports
pub use condition::{Condition, ObservedField};
pub use error::{BoxError, ConfigError, OptionKey, StepError, WaitConditionFailed, WaitError};
pub use exception::{CollectedError, ErrorKind, ExceptionPolicy};
pub use failure::{ErrorGroup, ExceptionsHappened, Failure, NotExpectedValue, TimeoutHeader};
pub use outcome::Outcome;
pub use settings::{StepSettings, WaitSettings};
pub use step::{tiered_delay, Step, StepPolicy, TimeUnit};
#[cfg(feature = "async")]
pub use wait::{execute_async, wait_for_async};
pub use wait::{
    execute, wait_for, wait_for_value, SuccessCallback, WaitBuilder, WaitConfig, WaitFor,
    DEFAULT_MAX_WAIT,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::condition::Condition;
    pub use crate::error::{ConfigError, WaitError};
    pub use crate::exception::ErrorKind;
    pub use crate::failure::Failure;
    pub use crate::outcome::Outcome;
    pub use crate::step::{StepPolicy, TimeUnit};
    pub use crate::wait::{wait_for, wait_for_value, WaitConfig, WaitFor};
}
