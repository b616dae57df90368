//! Single-pass keyframe reduction.
//!
//! A three-frame window `start, consider, end` walks the sequence once.
//! `consider` is rebuilt by interpolating `start` to `end` at its own time;
//! if the metric calls the rebuild close enough, `consider` is unlinked.
//! The window then steps from `start`'s current successor, so a removed
//! frame is never revisited and the frame that closed the window is not
//! re-examined as a candidate after a removal.
//!
//! First and last frames can never be `consider`, so they always survive.

use super::{CaptureSequence, FrameId, KeyFrame, SimilarityMetric};
use crate::util::{Error, Result};

/// Minimum number of frames the sweep can work on.
pub const MIN_FRAMES: usize = 3;

/// Counters from one reduction sweep.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ReduceStats {
    /// Windows evaluated.
    pub iterations: usize,
    /// Frames removed.
    pub removed: usize,
}

/// Number of frames currently in the sequence.
#[inline]
pub fn frame_count(seq: &CaptureSequence) -> usize {
    seq.len()
}

/// Remove redundant interior frames from `seq` in place.
///
/// `threshold` is read by `metric` (see [`super::metric`] for which
/// direction is stricter). Sequences shorter than [`MIN_FRAMES`] are
/// rejected with [`Error::TooFewFrames`].
#[tracing::instrument(skip_all, fields(frames = seq.len(), threshold = threshold, metric = metric.name()))]
pub fn reduce<M>(seq: &mut CaptureSequence, threshold: f64, metric: &M) -> Result<ReduceStats>
where
    M: SimilarityMetric + ?Sized,
{
    if seq.len() < MIN_FRAMES {
        return Err(Error::TooFewFrames { found: seq.len() });
    }

    let mut stats = ReduceStats::default();

    let mut start = seq.first().ok_or_else(|| Error::internal("sequence has no first frame"))?;
    let mut consider = successor(seq, start)?;
    let mut end = successor(seq, consider)?;

    loop {
        let start_frame = frame(seq, start)?;
        let candidate = frame(seq, consider)?;
        let end_frame = frame(seq, end)?;

        // Every frame before `start` was either a previous window start or
        // a removed candidate.
        let expected = stats.iterations + stats.removed;
        if start_frame.original_index != expected {
            return Err(Error::internal(format!(
                "window start is frame {}, expected frame {}",
                start_frame.original_index, expected
            )));
        }

        let reconstructed = start_frame.lerp(&end_frame, candidate.time);
        let score = metric.score(&candidate, &reconstructed);
        let redundant = metric.is_redundant(score, threshold);

        tracing::trace!(
            frame = candidate.original_index,
            time = candidate.time,
            score,
            redundant,
            "window"
        );

        if redundant {
            seq.remove(consider).ok_or_else(|| {
                Error::internal(format!("frame {} could not be unlinked", candidate.original_index))
            })?;
            stats.removed += 1;
        }
        stats.iterations += 1;

        if seq.next(end).is_none() {
            break;
        }

        start = successor(seq, start)?;
        consider = successor(seq, start)?;
        end = match seq.next(consider) {
            Some(id) => id,
            None => break,
        };
    }

    tracing::debug!(
        iterations = stats.iterations,
        removed = stats.removed,
        remaining = seq.len(),
        "reduction finished"
    );

    Ok(stats)
}

fn frame(seq: &CaptureSequence, id: FrameId) -> Result<KeyFrame> {
    seq.get(id)
        .copied()
        .ok_or_else(|| Error::internal(format!("frame slot {} is no longer linked", id.index())))
}

fn successor(seq: &CaptureSequence, id: FrameId) -> Result<FrameId> {
    seq.next(id)
        .ok_or_else(|| Error::internal(format!("frame slot {} has no successor", id.index())))
}
