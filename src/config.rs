//! Grading configuration.
//!
//! The configuration is an explicit value handed to [`Grader`](crate::Grader);
//! nothing in the crate reads global state. It can be loaded from a TOML file:
//!
//! ```toml
//! default_points = 50.0
//! name_case = "lowercase"
//! collection_norm = "solution"
//! case_sensitive = false
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{GradingError, Result};
use crate::score_norm::ScoreNorm;

/// Points awarded for an exercise whose reference does not state its own total.
pub const DEFAULT_POINTS: f64 = 100.0;

/// How node names extracted from edge ids are normalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NameCase {
    /// Keep names exactly as exported.
    #[default]
    Preserve,
    /// Lowercase every name. Distinct names differing only in case collide.
    Lowercase,
}

impl NameCase {
    pub fn apply(self, name: &str) -> String {
        match self {
            NameCase::Preserve => name.to_string(),
            NameCase::Lowercase => name.to_lowercase(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GradingConfig {
    /// Total points used when the reference has no `points`/`punkte` field
    pub default_points: f64,

    /// Normalization of node names in the graph builder
    pub name_case: NameCase,

    /// Denominator used for collection scores
    pub collection_norm: ScoreNorm,

    /// Compare strings case-sensitively in the fuzzy ratio
    pub case_sensitive: bool,
}

impl Default for GradingConfig {
    fn default() -> Self {
        GradingConfig {
            default_points: DEFAULT_POINTS,
            name_case: NameCase::default(),
            collection_norm: ScoreNorm::default(),
            case_sensitive: false,
        }
    }
}

impl GradingConfig {
    /// Load a configuration from a TOML file. Missing keys take their defaults.
    pub fn load(path: &Path) -> Result<GradingConfig> {
        let content = fs::read_to_string(path).map_err(|source| GradingError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: GradingConfig =
            toml::from_str(&content).map_err(|e| GradingError::Config {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;
        config.validate().map_err(|e| GradingError::Config {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        tracing::debug!(?path, ?config, "loaded grading config");
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        check_points(self.default_points).map(|_| ())
    }
}

/// Point totals must be finite and non-negative so that achieved points stay
/// within `[0, max]`.
pub(crate) fn check_points(points: f64) -> Result<f64> {
    if points.is_finite() && points >= 0.0 {
        Ok(points)
    } else {
        Err(GradingError::InvalidPoints { points })
    }
}
