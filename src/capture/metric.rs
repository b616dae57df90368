//! Similarity metrics deciding whether a keyframe is redundant.
//!
//! The sweep reconstructs each candidate frame from its neighbours and asks
//! a metric whether the reconstruction is close enough to drop the
//! original. Two metrics exist and they read the threshold in opposite
//! directions:
//!
//! | Metric | Score | Removed when | Larger threshold |
//! |--------|-------|--------------|------------------|
//! | [`Metric::GaussianDensity`] | 12-D density, peak `1/sqrt(2π·σ²)` | `score > threshold` | keeps more |
//! | [`Metric::PercentDifference`] | max component % error | `score < threshold` | removes more |

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::KeyFrame;
use crate::util::{gaussian_density, gaussian_peak, max_percent_difference, Error};

/// Scores a reconstructed frame against the frame it would replace.
pub trait SimilarityMetric {
    /// Score `reconstructed` against the real `candidate` frame.
    fn score(&self, candidate: &KeyFrame, reconstructed: &KeyFrame) -> f64;

    /// Whether a score at this threshold lets the candidate be dropped.
    fn is_redundant(&self, score: f64, threshold: f64) -> bool;

    /// Short name for logs and reports.
    fn name(&self) -> &'static str;
}

fn default_stddev() -> f64 {
    1.0
}

/// Built-in metrics.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Metric {
    /// Isotropic normal density centred on the candidate.
    GaussianDensity {
        #[serde(default = "default_stddev")]
        stddev: f64,
    },
    /// Largest per-component percentage error, candidate as reference.
    PercentDifference,
}

impl Metric {
    /// Gaussian density metric with the given standard deviation.
    pub const fn gaussian(stddev: f64) -> Self {
        Self::GaussianDensity { stddev }
    }

    /// Largest score the metric can produce, if bounded.
    ///
    /// For the density metric any threshold at or above this keeps every
    /// frame.
    pub fn peak_score(&self) -> Option<f64> {
        match *self {
            Self::GaussianDensity { stddev } => Some(gaussian_peak(stddev)),
            Self::PercentDifference => None,
        }
    }
}

impl Default for Metric {
    fn default() -> Self {
        Self::gaussian(default_stddev())
    }
}

impl SimilarityMetric for Metric {
    fn score(&self, candidate: &KeyFrame, reconstructed: &KeyFrame) -> f64 {
        match *self {
            Self::GaussianDensity { stddev } => {
                gaussian_density(&reconstructed.to_array(), &candidate.to_array(), stddev)
            }
            Self::PercentDifference => [
                max_percent_difference(candidate.position, reconstructed.position),
                max_percent_difference(candidate.direction, reconstructed.direction),
                max_percent_difference(candidate.up, reconstructed.up),
                max_percent_difference(candidate.velocity, reconstructed.velocity),
            ]
            .into_iter()
            .fold(0.0, f64::max),
        }
    }

    fn is_redundant(&self, score: f64, threshold: f64) -> bool {
        match self {
            Self::GaussianDensity { .. } => score > threshold,
            Self::PercentDifference => score < threshold,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Self::GaussianDensity { .. } => "gaussian_density",
            Self::PercentDifference => "percent_difference",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GaussianDensity { stddev } => write!(f, "gaussian_density(stddev={})", stddev),
            Self::PercentDifference => f.write_str("percent_difference"),
        }
    }
}

impl FromStr for Metric {
    type Err = Error;

    /// Accepts `gaussian`/`gaussian_density`/`density` (stddev 1) and
    /// `percent`/`percent_difference`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gaussian" | "gaussian_density" | "density" => Ok(Self::default()),
            "percent" | "percent_difference" => Ok(Self::PercentDifference),
            other => Err(Error::InvalidSettings(format!("unknown metric '{}'", other))),
        }
    }
}
