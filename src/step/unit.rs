//! Time units for numeric step values.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::error::ConfigError;

/// The unit a raw numeric step value is measured in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TimeUnit {
    /// Hours.
    Hours,
    /// Minutes.
    Minutes,
    /// Seconds.
    #[default]
    Seconds,
    /// Milliseconds.
    Milliseconds,
}

impl TimeUnit {
    /// Convert a raw value in this unit into a duration.
    ///
    /// Negative and NaN values become zero; values too large for a
    /// [`Duration`] saturate to [`Duration::MAX`].
    ///
    /// # Examples
    ///
    /// ```rust
    /// use waitfor::TimeUnit;
    /// use std::time::Duration;
    ///
    /// assert_eq!(TimeUnit::Seconds.to_duration(1.5), Duration::from_millis(1500));
    /// assert_eq!(TimeUnit::Minutes.to_duration(2.0), Duration::from_secs(120));
    /// assert_eq!(TimeUnit::Milliseconds.to_duration(-3.0), Duration::ZERO);
    /// ```
    pub fn to_duration(self, value: f64) -> Duration {
        let secs = match self {
            TimeUnit::Hours => value * 3600.0,
            TimeUnit::Minutes => value * 60.0,
            TimeUnit::Seconds => value,
            TimeUnit::Milliseconds => value / 1000.0,
        };
        if secs.is_nan() || secs <= 0.0 {
            return Duration::ZERO;
        }
        Duration::try_from_secs_f64(secs).unwrap_or(Duration::MAX)
    }
}

impl fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TimeUnit::Hours => "hours",
            TimeUnit::Minutes => "minutes",
            TimeUnit::Seconds => "seconds",
            TimeUnit::Milliseconds => "milliseconds",
        };
        f.write_str(name)
    }
}

impl FromStr for TimeUnit {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "h" | "hour" | "hours" => Ok(TimeUnit::Hours),
            "m" | "min" | "minute" | "minutes" => Ok(TimeUnit::Minutes),
            "s" | "sec" | "second" | "seconds" => Ok(TimeUnit::Seconds),
            "ms" | "millis" | "millisecond" | "milliseconds" => Ok(TimeUnit::Milliseconds),
            _ => Err(ConfigError::UnknownTimeUnit(s.to_string())),
        }
    }
}
