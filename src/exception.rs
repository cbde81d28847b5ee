//! Which producer errors abort a wait and which are retried.
//!
//! Every error a producer raises is either *non-ignorable* or *ignorable*.
//! A non-ignorable error's runtime type is on the configured list, so the
//! wait stops and the error goes back to the caller. An ignorable error is
//! recorded and the wait carries on. Recorded errors only surface if the
//! wait times out, inside
//! [`ExceptionsHappened`](crate::ExceptionsHappened).
//!
//! ```rust
//! use waitfor::{ErrorKind, ExceptionPolicy};
//! use std::fmt;
//!
//! #[derive(Debug)]
//! struct Fatal;
//!
//! impl fmt::Display for Fatal {
//!     fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
//!         f.write_str("fatal")
//!     }
//! }
//!
//! impl std::error::Error for Fatal {}
//!
//! let policy = ExceptionPolicy::new([ErrorKind::of::<Fatal>()]);
//! assert!(!policy.is_ignorable(&Fatal));
//! assert!(policy.is_ignorable(&std::io::Error::other("flaky")));
//! ```

use std::any::TypeId;
use std::error::Error as StdError;
use std::fmt;

use crate::error::BoxError;

/// A concrete error type, matched by type identity.
///
/// Built with [`ErrorKind::of`], which only accepts types implementing
/// [`std::error::Error`].
#[derive(Clone, Copy)]
pub struct ErrorKind {
    name: &'static str,
    type_id: TypeId,
    matches: fn(&(dyn StdError + 'static)) -> bool,
}

impl ErrorKind {
    /// The kind for error type `E`.
    pub fn of<E: StdError + 'static>() -> Self {
        Self {
            name: std::any::type_name::<E>(),
            type_id: TypeId::of::<E>(),
            matches: |error| error.is::<E>(),
        }
    }

    /// The type name of this kind.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns true if `error` is exactly of this kind.
    ///
    /// Wrapping types and error sources are not inspected.
    pub fn matches(&self, error: &(dyn StdError + 'static)) -> bool {
        (self.matches)(error)
    }
}

impl PartialEq for ErrorKind {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for ErrorKind {}

impl fmt::Debug for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ErrorKind").field(&self.name).finish()
    }
}

/// The set of error kinds that abort a wait.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExceptionPolicy {
    non_ignorable: Vec<ErrorKind>,
}

impl ExceptionPolicy {
    /// Create a policy aborting on the given kinds. Duplicates are dropped.
    pub fn new(kinds: impl IntoIterator<Item = ErrorKind>) -> Self {
        let mut non_ignorable: Vec<ErrorKind> = Vec::new();
        for kind in kinds {
            if !non_ignorable.contains(&kind) {
                non_ignorable.push(kind);
            }
        }
        Self { non_ignorable }
    }

    /// The non-ignorable kinds, in configuration order.
    pub fn kinds(&self) -> &[ErrorKind] {
        &self.non_ignorable
    }

    /// Returns true if `error` should be recorded and retried.
    pub fn is_ignorable(&self, error: &(dyn StdError + 'static)) -> bool {
        !self.non_ignorable.iter().any(|kind| kind.matches(error))
    }
}

/// An ignorable error recorded during a wait.
#[derive(Debug)]
pub struct CollectedError {
    kind: &'static str,
    details: String,
    error: BoxError,
}

impl CollectedError {
    /// Record `error`, raised by a producer whose error type is named `kind`.
    pub fn new(kind: &'static str, error: BoxError) -> Self {
        let details = render_chain(error.as_ref());
        Self {
            kind,
            details,
            error,
        }
    }

    /// The producer's error type name.
    pub fn kind(&self) -> &'static str {
        self.kind
    }

    /// The rendered error and its source chain.
    pub fn details(&self) -> &str {
        &self.details
    }

    /// The recorded error.
    pub fn error(&self) -> &(dyn StdError + Send + Sync + 'static) {
        self.error.as_ref()
    }

    pub(crate) fn into_parts(self) -> (&'static str, String, BoxError) {
        (self.kind, self.details, self.error)
    }
}

/// Render an error with its chain of sources, one per line.
///
/// ```rust
/// use waitfor::exception::render_chain;
///
/// let err = std::io::Error::other("disk unplugged");
/// assert_eq!(render_chain(&err), "disk unplugged");
/// ```
pub fn render_chain(error: &(dyn StdError + 'static)) -> String {
    let mut rendered = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        rendered.push_str("\nCaused by: ");
        rendered.push_str(&cause.to_string());
        source = cause.source();
    }
    rendered
}
