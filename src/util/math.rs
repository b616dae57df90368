//! Vector math used by the reduction metrics.
//!
//! Vectors are `glam::DVec3`; captures store doubles and the metrics
//! compare values closely enough that single precision would shift
//! decisions.

pub use glam::DVec3;

use std::f64::consts::PI;

/// Linearly interpolate between two scalars.
///
/// `t` is not clamped, values outside `[0, 1]` extrapolate.
#[inline]
pub fn lerp_f64(v0: f64, v1: f64, t: f64) -> f64 {
    (1.0 - t) * v0 + t * v1
}

/// Element-wise linear interpolation between two vectors.
///
/// Written as `(1 - t) * v0 + t * v1` rather than `DVec3::lerp`, which
/// computes `v0 + (v1 - v0) * t` and rounds differently.
#[inline]
pub fn lerp(v0: DVec3, v1: DVec3, t: f64) -> DVec3 {
    DVec3::new(
        lerp_f64(v0.x, v1.x, t),
        lerp_f64(v0.y, v1.y, t),
        lerp_f64(v0.z, v1.z, t),
    )
}

/// Percentage difference of an experimental value against a theoretical one.
///
/// A zero theoretical value swaps the operands so the division is defined,
/// which makes the metric asymmetric.
pub fn percent_difference(theoretical: f64, experimental: f64) -> f64 {
    if theoretical == experimental {
        return 0.0;
    }

    let (theoretical, experimental) = if theoretical == 0.0 {
        (experimental, theoretical)
    } else {
        (theoretical, experimental)
    };

    (experimental - theoretical).abs() / theoretical.abs() * 100.0
}

/// Largest component-wise percentage difference, `v` being theoretical.
pub fn max_percent_difference(v: DVec3, other: DVec3) -> f64 {
    percent_difference(v.x, other.x)
        .max(percent_difference(v.y, other.y))
        .max(percent_difference(v.z, other.z))
}

/// Isotropic normal density of `sample` around `mean` with one shared stddev.
///
/// The normalization is the one-dimensional `(2π·σ²)^(-1/2)` regardless of
/// `N`, so for `N > 1` this is not a true probability density. Thresholds
/// tuned against existing captures depend on that constant.
pub fn gaussian_density<const N: usize>(sample: &[f64; N], mean: &[f64; N], stddev: f64) -> f64 {
    let variance = stddev * stddev;
    let dist_sq: f64 = sample
        .iter()
        .zip(mean.iter())
        .map(|(s, m)| (s - m) * (s - m))
        .sum();

    let norm = 1.0 / (2.0 * variance * PI).sqrt();
    norm * (-dist_sq / (2.0 * variance)).exp()
}

/// Peak value of [`gaussian_density`] for a given stddev (sample == mean).
#[inline]
pub fn gaussian_peak(stddev: f64) -> f64 {
    1.0 / (2.0 * stddev * stddev * PI).sqrt()
}
