//! Success predicates with human-readable descriptions.
//!
//! A [`Condition`] pairs a predicate with the text shown when a wait times
//! out. The [`condition!`](crate::condition!) macro captures the closure's
//! own source text:
//!
//! ```rust
//! use waitfor::{condition, Condition};
//!
//! let cond: Condition<i32> = condition!(|x: &i32| *x == 4);
//! assert!(cond.is_met(&4));
//! assert!(cond.description().contains("*x == 4"));
//! ```
//!
//! For structured values, [`Condition::observe`] registers field paths whose
//! observed values are written into the description on failure.

use std::fmt;

const UNDESCRIBED: &str = "<condition>";

type Check<T> = Box<dyn Fn(&T) -> bool + Send + Sync>;
type Read<T> = Box<dyn Fn(&T) -> String + Send + Sync>;

/// A predicate the produced value must satisfy.
pub struct Condition<T> {
    check: Check<T>,
    description: String,
    probes: Vec<Probe<T>>,
}

struct Probe<T> {
    path: String,
    read: Read<T>,
}

/// A field value read from the last produced value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObservedField {
    /// The path as written in the condition text.
    pub path: String,
    /// The `Debug` rendering of the field's value.
    pub value: String,
}

impl<T> Condition<T> {
    /// Create a condition with a description.
    pub fn new<F>(description: impl Into<String>, check: F) -> Self
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        Self {
            check: Box::new(check),
            description: description.into(),
            probes: Vec::new(),
        }
    }

    /// Create a condition without a description.
    pub fn from_fn<F>(check: F) -> Self
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        Self::new(UNDESCRIBED, check)
    }

    /// Report the value at `path` when the wait times out.
    ///
    /// Every occurrence of `path` in the description is rendered as
    /// `path(<value>)`.
    ///
    /// ```rust
    /// use waitfor::Condition;
    ///
    /// struct Job { state: &'static str, retries: u32 }
    ///
    /// let cond = Condition::new("job.state == \"done\"", |job: &Job| job.state == "done")
    ///     .observe("job.state", |job: &Job| job.state);
    ///
    /// let observed = cond.observed(&Job { state: "queued", retries: 0 });
    /// assert_eq!(observed[0].value, "\"queued\"");
    /// ```
    pub fn observe<V, R>(mut self, path: impl Into<String>, read: R) -> Self
    where
        V: fmt::Debug,
        R: Fn(&T) -> V + Send + Sync + 'static,
    {
        self.probes.push(Probe {
            path: path.into(),
            read: Box::new(move |value| format!("{:?}", read(value))),
        });
        self
    }

    /// Returns true if `value` satisfies the condition.
    pub fn is_met(&self, value: &T) -> bool {
        (self.check)(value)
    }

    /// The condition text.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Read every observed field from `value`.
    pub fn observed(&self, value: &T) -> Vec<ObservedField> {
        self.probes
            .iter()
            .map(|probe| ObservedField {
                path: probe.path.clone(),
                value: (probe.read)(value),
            })
            .collect()
    }
}

impl<T> fmt::Debug for Condition<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Condition")
            .field("description", &self.description)
            .field(
                "observed",
                &self.probes.iter().map(|p| &p.path).collect::<Vec<_>>(),
            )
            .finish()
    }
}

/// Build a [`Condition`] whose description is the closure's source text.
///
/// ```rust
/// use waitfor::{condition, Condition};
///
/// let limit = 3;
/// let cond: Condition<u32> = condition!(move |n: &u32| *n > limit);
/// assert!(cond.description().ends_with("*n > limit"));
/// assert!(!cond.is_met(&3));
/// ```
#[macro_export]
macro_rules! condition {
    ($check:expr $(,)?) => {
        $crate::Condition::new(stringify!($check), $check)
    };
}

/// Write observed field values into a condition's text.
///
/// Only whole paths are replaced: `a.b` does not match inside `xa.b` or
/// `a.bc`, and longer paths win over their prefixes. Returns `None` when no
/// path occurs in `text`.
pub(crate) fn substitute(text: &str, observed: &[ObservedField]) -> Option<String> {
    let mut fields: Vec<&ObservedField> = observed.iter().filter(|f| !f.path.is_empty()).collect();
    fields.sort_by(|a, b| b.path.len().cmp(&a.path.len()));

    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    let mut prev: Option<char> = None;
    let mut replaced = false;

    while let Some(c) = rest.chars().next() {
        let at_boundary = !prev.is_some_and(is_path_char);
        let hit = fields.iter().find_map(|field| {
            let after = rest.strip_prefix(field.path.as_str())?;
            let ends_cleanly = !after.chars().next().is_some_and(is_path_char);
            (at_boundary && ends_cleanly).then_some((field, after))
        });

        match hit {
            Some((field, after)) => {
                out.push_str(&field.path);
                out.push('(');
                out.push_str(&field.value);
                out.push(')');
                rest = after;
                prev = Some(')');
                replaced = true;
            }
            None => {
                out.push(c);
                rest = &rest[c.len_utf8()..];
                prev = Some(c);
            }
        }
    }

    replaced.then_some(out)
}

fn is_path_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '.'
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(path: &str, value: &str) -> ObservedField {
        ObservedField {
            path: path.to_string(),
            value: value.to_string(),
        }
    }

    #[test]
    fn test_condition_checks_value() {
        let cond = Condition::new("x > 3", |x: &i32| *x > 3);
        assert!(cond.is_met(&4));
        assert!(!cond.is_met(&3));
    }

    #[test]
    fn test_from_fn_has_placeholder_description() {
        let cond = Condition::from_fn(|x: &bool| *x);
        assert_eq!(cond.description(), "<condition>");
    }

    #[test]
    fn test_macro_captures_source() {
        let cond: Condition<i32> = crate::condition!(|x: &i32| *x != 0);
        let compact: String = cond.description().split_whitespace().collect();
        assert_eq!(compact, "|x:&i32|*x!=0");
        assert!(cond.is_met(&1));
    }

    #[test]
    fn test_observed_reads_fields_in_order() {
        let cond = Condition::new("p.0 == 1 && p.1 == 2", |p: &(i32, i32)| *p == (1, 2))
            .observe("p.0", |p: &(i32, i32)| p.0)
            .observe("p.1", |p: &(i32, i32)| p.1);

        assert_eq!(
            cond.observed(&(5, 6)),
            vec![field("p.0", "5"), field("p.1", "6")]
        );
    }

    #[test]
    fn test_substitute_replaces_whole_paths() {
        let text = "a.child.some_number == 1 && a.some_number == 3";
        let observed = [field("a.child.some_number", "5"), field("a.some_number", "3")];
        assert_eq!(
            substitute(text, &observed).as_deref(),
            Some("a.child.some_number(5) == 1 && a.some_number(3) == 3")
        );
    }

    #[test]
    fn test_substitute_skips_partial_matches() {
        let observed = [field("a.b", "1")];
        assert_eq!(substitute("xa.b + a.bc + a.b.c", &observed), None);
        assert_eq!(substitute("(a.b)", &observed).as_deref(), Some("(a.b(1))"));
    }

    #[test]
    fn test_substitute_prefers_longest_path() {
        let observed = [field("a", "A"), field("a.len", "2")];
        assert_eq!(substitute("a.len > 0", &observed).as_deref(), Some("a.len(2) > 0"));
    }

    #[test]
    fn test_substitute_without_fields() {
        assert_eq!(substitute("x == 4", &[]), None);
    }

    #[test]
    fn test_debug_lists_paths() {
        let cond = Condition::new("v.len() > 0", |v: &Vec<u8>| !v.is_empty())
            .observe("v.len()", |v: &Vec<u8>| v.len());
        let debug = format!("{:?}", cond);
        assert!(debug.contains("v.len() > 0"));
        assert!(debug.contains("v.len()"));
    }
}
