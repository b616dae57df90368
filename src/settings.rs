//! Reduction settings.
//!
//! Settings can be stored as JSON:
//!
//! ```json
//! { "threshold": 0.1, "metric": { "kind": "gaussian_density", "stddev": 1.0 } }
//! ```
//!
//! Missing fields fall back to [`ReduceSettings::default`].

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::capture::Metric;
use crate::util::{Error, Result};

/// Threshold used when none is configured.
pub const DEFAULT_THRESHOLD: f64 = 0.1;

/// How a capture is reduced.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReduceSettings {
    /// Cutoff handed to the metric.
    pub threshold: f64,
    /// Similarity metric.
    pub metric: Metric,
}

impl Default for ReduceSettings {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            metric: Metric::default(),
        }
    }
}

impl ReduceSettings {
    /// Settings with an explicit threshold and metric.
    pub fn new(threshold: f64, metric: Metric) -> Self {
        Self { threshold, metric }
    }

    /// Parse settings from JSON text.
    pub fn from_json_str(text: &str) -> Result<Self> {
        let settings: Self =
            serde_json::from_str(text).map_err(|e| Error::InvalidSettings(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        tracing::debug!(path = %path.display(), "loading reduction settings");
        Self::from_json_str(&text)
    }

    /// Pretty JSON form of these settings.
    pub fn to_json_pretty(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    /// Reject values the sweep cannot use.
    pub fn validate(&self) -> Result<()> {
        if self.threshold.is_nan() {
            return Err(Error::InvalidSettings("threshold is NaN".into()));
        }
        if let Metric::GaussianDensity { stddev } = self.metric {
            if !(stddev.is_finite() && stddev > 0.0) {
                return Err(Error::InvalidSettings(format!(
                    "stddev must be positive and finite, got {}",
                    stddev
                )));
            }
        }
        Ok(())
    }
}
