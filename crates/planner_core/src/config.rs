//! Planner configuration.
//!
//! Every field has a default so partial JSON overrides are accepted.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Key holding the serialized task collection.
pub const DEFAULT_STORAGE_KEY: &str = "planner-tasks";

#[derive(Debug)]
pub enum ConfigError {
    Parse(serde_json::Error),
    EmptyStorageKey,
    InvalidBarMetrics(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(err) => write!(f, "invalid planner config: {err}"),
            Self::EmptyStorageKey => write!(f, "storage_key cannot be empty"),
            Self::InvalidBarMetrics(message) => write!(f, "invalid week bar metrics: {message}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Parse(err) => Some(err),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    pub storage_key: String,
    pub week_bars: BarMetrics,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            week_bars: BarMetrics::default(),
        }
    }
}

impl PlannerConfig {
    /// Parses and validates a JSON override document.
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.storage_key.trim().is_empty() {
            return Err(ConfigError::EmptyStorageKey);
        }
        self.week_bars.validate()
    }
}

/// Fixed vertical metrics for stacked week bars, in layout units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BarMetrics {
    pub bar_height: f32,
    pub gap: f32,
    /// Space kept for the day number at the top of each cell. Negative values
    /// pull the stack upward into the label area.
    pub label_reserve: f32,
}

impl Default for BarMetrics {
    fn default() -> Self {
        Self {
            bar_height: 14.0,
            gap: 4.0,
            label_reserve: -40.0,
        }
    }
}

impl BarMetrics {
    fn validate(&self) -> Result<(), ConfigError> {
        if !(self.bar_height.is_finite() && self.bar_height > 0.0) {
            return Err(ConfigError::InvalidBarMetrics(format!(
                "bar_height must be positive, got {}",
                self.bar_height
            )));
        }
        if !(self.gap.is_finite() && self.gap >= 0.0) {
            return Err(ConfigError::InvalidBarMetrics(format!(
                "gap must be non-negative, got {}",
                self.gap
            )));
        }
        if !self.label_reserve.is_finite() {
            return Err(ConfigError::InvalidBarMetrics(
                "label_reserve must be finite".to_string(),
            ));
        }
        Ok(())
    }
}
