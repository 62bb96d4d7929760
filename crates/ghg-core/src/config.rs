//! Validator configuration.
//!
//! The defaults match the bounds extraction prompts ask for. A YAML or JSON
//! file may override any subset of them.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::GhgError;

/// Numeric bounds used by the field-level and derived-rate checks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ValidatorConfig {
    /// Minimum evidence quote length, in characters
    pub quote_min_chars: usize,

    /// Maximum evidence quote length, in characters
    pub quote_max_chars: usize,

    /// Earliest plausible calendar year
    pub year_min: i64,

    /// Latest plausible calendar year
    pub year_max: i64,

    /// Allowed gap between a derived reduction rate and the rate implied
    /// by its endpoint values
    pub derived_rate_tolerance: f64,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            quote_min_chars: 5,
            quote_max_chars: 180,
            year_min: 1900,
            year_max: 2200,
            derived_rate_tolerance: 0.001,
        }
    }
}

impl ValidatorConfig {
    /// Parse a config from YAML.
    pub fn from_yaml(yaml: &str) -> Result<Self, GhgError> {
        let config: ValidatorConfig = serde_yaml::from_str(yaml)?;
        config.check()?;
        Ok(config)
    }

    /// Parse a config from JSON.
    pub fn from_json(json: &str) -> Result<Self, GhgError> {
        let config: ValidatorConfig = serde_json::from_str(json)?;
        config.check()?;
        Ok(config)
    }

    /// Load a config file, choosing the format by extension (`.json` is
    /// JSON, anything else is YAML).
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, GhgError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json(&contents),
            _ => Self::from_yaml(&contents),
        }
    }

    fn check(&self) -> Result<(), GhgError> {
        if self.quote_min_chars > self.quote_max_chars {
            return Err(GhgError::InvalidConfig(format!(
                "quote_min_chars ({}) exceeds quote_max_chars ({})",
                self.quote_min_chars, self.quote_max_chars
            )));
        }

        if self.year_min > self.year_max {
            return Err(GhgError::InvalidConfig(format!(
                "year_min ({}) exceeds year_max ({})",
                self.year_min, self.year_max
            )));
        }

        if !self.derived_rate_tolerance.is_finite() || self.derived_rate_tolerance < 0.0 {
            return Err(GhgError::InvalidConfig(format!(
                "derived_rate_tolerance must be a non-negative number, got {}",
                self.derived_rate_tolerance
            )));
        }

        Ok(())
    }

    pub(crate) fn year_in_range(&self, year: i64) -> bool {
        (self.year_min..=self.year_max).contains(&year)
    }
}
