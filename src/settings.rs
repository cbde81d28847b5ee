//! Wait configuration as plain data.
//!
//! [`WaitSettings`] deserializes from any serde format and resolves into a
//! [`WaitBuilder`], so waits can be tuned from configuration files without
//! touching code. Options left out fall back to the builder's defaults.
//!
//! ```rust
//! use waitfor::WaitSettings;
//! use std::time::Duration;
//!
//! let settings = WaitSettings::from_json(r#"{
//!     "max_wait_ms": 2000,
//!     "timeout_message": "cache never warmed",
//!     "step": { "kind": "parabolic", "unit": "ms" }
//! }"#)?;
//!
//! let config = settings.into_builder()?.build();
//! assert_eq!(config.max_wait(), Duration::from_secs(2));
//! assert_eq!(config.step().delay(3), Ok(Duration::from_millis(8)));
//! # Ok::<(), waitfor::ConfigError>(())
//! ```
//!
//! Error kinds are Rust types, so non-ignorable errors and success
//! callbacks can only be added on the returned builder.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::step::{StepPolicy, TimeUnit};
use crate::wait::{WaitBuilder, WaitConfig};

/// Serializable wait options.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WaitSettings {
    /// Time budget in milliseconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_wait_ms: Option<u64>,
    /// Message included in timeout diagnostics.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_message: Option<String>,
    /// Delay policy between attempts.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step: Option<StepSettings>,
}

/// Serializable step policy.
///
/// Units are names accepted by [`TimeUnit`]'s `FromStr`, such as `"ms"` or
/// `"seconds"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StepSettings {
    /// Fixed delay.
    Constant {
        /// Delay in milliseconds.
        delay_ms: u64,
    },
    /// `unit(ln(attempt) + start)`.
    Logarithmic {
        /// Unit name, seconds if omitted.
        #[serde(default = "default_unit")]
        unit: String,
        /// Offset added to the logarithm.
        #[serde(default)]
        start: i32,
    },
    /// `unit(2^attempt)`.
    Parabolic {
        /// Unit name, seconds if omitted.
        #[serde(default = "default_unit")]
        unit: String,
    },
    /// One delay derived from the budget.
    Tiered,
}

fn default_unit() -> String {
    TimeUnit::Seconds.to_string()
}

impl WaitSettings {
    /// Parse settings from JSON.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|e| ConfigError::InvalidSetting(e.to_string()))
    }

    /// Resolve into a builder with every configured option set.
    ///
    /// Fails with [`ConfigError::UnknownTimeUnit`] for an unknown unit name.
    pub fn into_builder(self) -> Result<WaitBuilder, ConfigError> {
        let mut builder = WaitConfig::builder();

        if let Some(ms) = self.max_wait_ms {
            builder = builder.max_wait(Duration::from_millis(ms))?;
        }
        if let Some(message) = self.timeout_message {
            builder = builder.timeout_message(message)?;
        }
        if let Some(step) = self.step {
            builder = match step {
                StepSettings::Constant { delay_ms } => {
                    builder.constant_step(Duration::from_millis(delay_ms))?
                }
                StepSettings::Logarithmic { unit, start } => {
                    builder.step(StepPolicy::logarithmic_from(unit.parse()?, start))?
                }
                StepSettings::Parabolic { unit } => builder.parabolic_step(unit.parse()?)?,
                StepSettings::Tiered => builder.tiered_step()?,
            };
        }

        Ok(builder)
    }
}
