//! Parse, reduce and serialize in one call.
//!
//! This is the whole contract a front end needs: raw capture text and a
//! threshold in, reduced text plus frame counts (or a typed error) out.
//! Every call owns its own sequence, so calls may run concurrently.

use super::{parse_capture, reduce, serialize, Metric, ReduceStats, MIN_FRAMES};
use crate::settings::ReduceSettings;
use crate::util::{Error, Result};

/// Outcome of reducing one capture.
#[derive(Clone, Debug, PartialEq)]
pub struct Reduction {
    /// Reduced capture text.
    pub output: String,
    /// Frames in the input.
    pub frames_before: usize,
    /// Frames in the output.
    pub frames_after: usize,
    /// Input size in bytes.
    pub bytes_before: usize,
    /// Output size in bytes.
    pub bytes_after: usize,
    /// Sweep counters.
    pub stats: ReduceStats,
}

impl Reduction {
    /// Number of frames dropped.
    #[inline]
    pub fn frames_removed(&self) -> usize {
        self.frames_before - self.frames_after
    }

    /// Input size in KiB.
    #[inline]
    pub fn kilobytes_before(&self) -> f64 {
        self.bytes_before as f64 / 1024.0
    }

    /// Output size in KiB.
    #[inline]
    pub fn kilobytes_after(&self) -> f64 {
        self.bytes_after as f64 / 1024.0
    }
}

/// Reduce raw capture text with the given settings.
///
/// Parse errors and [`Error::TooFewFrames`] are returned before anything
/// is reduced, so a failure never produces partial output.
#[tracing::instrument(skip_all, fields(bytes = raw.len(), metric = %settings.metric))]
pub fn reduce_capture(raw: &str, settings: &ReduceSettings) -> Result<Reduction> {
    settings.validate()?;
    reduce_capture_with(raw, settings.threshold, &settings.metric)
}

/// Reduce raw capture text with an explicit threshold and metric.
pub fn reduce_capture_with(raw: &str, threshold: f64, metric: &Metric) -> Result<Reduction> {
    let mut seq = parse_capture(raw)?;

    let frames_before = seq.len();
    if frames_before < MIN_FRAMES {
        return Err(Error::TooFewFrames { found: frames_before });
    }

    let stats = reduce(&mut seq, threshold, metric)?;
    let output = serialize(&seq);

    let reduction = Reduction {
        frames_before,
        frames_after: seq.len(),
        bytes_before: raw.len(),
        bytes_after: output.len(),
        output,
        stats,
    };

    tracing::debug!(
        frames_before = reduction.frames_before,
        frames_after = reduction.frames_after,
        "capture reduced"
    );

    Ok(reduction)
}

/// Parse a threshold typed by a user.
///
/// Surrounding whitespace is ignored. NaN is rejected since it would make
/// every comparison false; infinities are accepted.
pub fn parse_threshold(text: &str) -> Result<f64> {
    match text.trim().parse::<f64>() {
        Ok(v) if !v.is_nan() => Ok(v),
        _ => Err(Error::InvalidThreshold(text.to_string())),
    }
}
