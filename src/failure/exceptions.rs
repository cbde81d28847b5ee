//! The "errors were raised" failure and its JSON rendering.

use std::collections::HashMap;
use std::error::Error as StdError;
use std::fmt;

use serde::Serialize;

use super::TimeoutHeader;
use crate::error::BoxError;
use crate::exception::CollectedError;

/// Errors sharing a signature, with the first one kept for inspection.
///
/// The signature is the producer's error type name plus the rendered error
/// and its source chain.
#[derive(Debug)]
pub struct ErrorGroup {
    kind: &'static str,
    details: String,
    first: BoxError,
    count: u32,
}

impl ErrorGroup {
    /// The producer's error type name.
    ///
    /// This is the producer's declared error type, as given by
    /// [`std::any::type_name`]. A producer returning [`BoxError`] gets the box
    /// type's name here; use [`ErrorGroup::downcast_ref`] to reach the
    /// concrete error.
    pub fn kind(&self) -> &'static str {
        self.kind
    }

    /// The rendered error and its source chain.
    pub fn details(&self) -> &str {
        &self.details
    }

    /// How many times this error was raised.
    pub fn count(&self) -> u32 {
        self.count
    }

    /// The first error raised with this signature.
    pub fn error(&self) -> &(dyn StdError + Send + Sync + 'static) {
        self.first.as_ref()
    }

    /// Downcast the first error to its original type.
    pub fn downcast_ref<E: StdError + 'static>(&self) -> Option<&E> {
        self.first.downcast_ref::<E>()
    }
}

/// Ignorable errors were raised while waiting.
///
/// Renders as pretty-printed JSON:
///
/// ```text
/// {
///   "timeout": "Timeout after 1.002 second(s) and 6 attempt(s): Fail",
///   "elapsed_secs": 1.002,
///   "attempts": 6,
///   "message": "Fail",
///   "exceptions": [
///     { "kind": "...", "message": "...", "details": "...", "count": 5 }
///   ]
/// }
/// ```
#[derive(Debug)]
pub struct ExceptionsHappened {
    header: TimeoutHeader,
    groups: Vec<ErrorGroup>,
}

impl ExceptionsHappened {
    /// Group `errors` by signature, preserving first-seen order.
    pub fn new(header: TimeoutHeader, errors: Vec<CollectedError>) -> Self {
        let mut groups: Vec<ErrorGroup> = Vec::new();
        let mut index: HashMap<(&'static str, String), usize> = HashMap::new();

        for collected in errors {
            let (kind, details, error) = collected.into_parts();
            match index.get(&(kind, details.clone())) {
                Some(&i) => groups[i].count = groups[i].count.saturating_add(1),
                None => {
                    index.insert((kind, details.clone()), groups.len());
                    groups.push(ErrorGroup {
                        kind,
                        details,
                        first: error,
                        count: 1,
                    });
                }
            }
        }

        Self { header, groups }
    }

    /// The timeout context.
    pub fn header(&self) -> &TimeoutHeader {
        &self.header
    }

    /// Error groups in first-seen order.
    pub fn groups(&self) -> &[ErrorGroup] {
        &self.groups
    }

    /// Total number of errors raised.
    pub fn total(&self) -> u64 {
        self.groups.iter().map(|g| u64::from(g.count)).sum()
    }

    /// The structured report as a JSON value.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self.report()).unwrap_or(serde_json::Value::Null)
    }

    fn report(&self) -> Report<'_> {
        Report {
            timeout: self.header.to_string(),
            elapsed_secs: self.header.elapsed().as_secs_f64(),
            attempts: self.header.attempts(),
            message: self.header.message(),
            exceptions: self
                .groups
                .iter()
                .map(|g| GroupReport {
                    kind: g.kind,
                    message: g.first.to_string(),
                    details: &g.details,
                    count: g.count,
                })
                .collect(),
        }
    }
}

impl fmt::Display for ExceptionsHappened {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let json = serde_json::to_string_pretty(&self.report()).map_err(|_| fmt::Error)?;
        f.write_str(&json)
    }
}

#[derive(Serialize)]
struct Report<'a> {
    timeout: String,
    elapsed_secs: f64,
    attempts: u32,
    message: &'a str,
    exceptions: Vec<GroupReport<'a>>,
}

#[derive(Serialize)]
struct GroupReport<'a> {
    kind: &'a str,
    message: String,
    details: &'a str,
    count: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ConfigError, StepError};
    use std::time::Duration;

    fn header() -> TimeoutHeader {
        TimeoutHeader::new(Duration::from_millis(1250), 7, Duration::from_secs(1), "Fail")
    }

    fn step_error() -> CollectedError {
        CollectedError::new("StepError", Box::new(StepError::NonPositiveAttempt))
    }

    fn config_error(name: &str) -> CollectedError {
        CollectedError::new(
            "ConfigError",
            Box::new(ConfigError::UnknownTimeUnit(name.to_string())),
        )
    }

    #[test]
    fn test_groups_identical_errors() {
        let errors = vec![step_error(), step_error(), config_error("x"), step_error()];
        let failure = ExceptionsHappened::new(header(), errors);

        let groups = failure.groups();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].kind(), "StepError");
        assert_eq!(groups[0].count(), 3);
        assert_eq!(groups[1].kind(), "ConfigError");
        assert_eq!(groups[1].count(), 1);
        assert_eq!(failure.total(), 4);
    }

    #[test]
    fn test_distinct_messages_are_separate_groups() {
        let errors = vec![config_error("a"), config_error("b"), config_error("a")];
        let failure = ExceptionsHappened::new(header(), errors);

        assert_eq!(failure.groups().len(), 2);
        assert_eq!(failure.groups()[0].count(), 2);
    }

    #[test]
    fn test_keeps_first_error_for_downcast() {
        let failure = ExceptionsHappened::new(header(), vec![step_error()]);
        assert_eq!(
            failure.groups()[0].downcast_ref::<StepError>(),
            Some(&StepError::NonPositiveAttempt)
        );
        assert!(failure.groups()[0].error().is::<StepError>());
    }

    #[test]
    fn test_renders_valid_json() {
        let failure = ExceptionsHappened::new(header(), vec![step_error(), step_error()]);
        let rendered = failure.to_string();

        let parsed: serde_json::Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(parsed["attempts"], 7);
        assert_eq!(parsed["message"], "Fail");
        assert_eq!(
            parsed["timeout"],
            "Timeout after 1.250 second(s) and 7 attempt(s): Fail"
        );
        assert_eq!(parsed["exceptions"][0]["count"], 2);
        assert_eq!(parsed["exceptions"][0]["kind"], "StepError");
        assert_eq!(parsed, failure.to_json());
    }

    #[test]
    fn test_rendering_is_stable() {
        let failure = ExceptionsHappened::new(header(), vec![step_error(), config_error("y")]);
        assert_eq!(failure.to_string(), failure.to_string());
    }

    #[test]
    fn test_empty_error_list() {
        let failure = ExceptionsHappened::new(header(), Vec::new());
        assert!(failure.groups().is_empty());
        assert_eq!(failure.to_json()["exceptions"], serde_json::json!([]));
    }
}
