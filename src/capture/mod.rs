//! Unit capture data and its reduction.
//!
//! - [`KeyFrame`] / [`CaptureSequence`] - in-memory capture
//! - [`parse_capture`] / [`serialize`] - capture text in and out
//! - [`reduce`] with a [`SimilarityMetric`] - the reduction sweep
//! - [`reduce_capture`] - the full text-to-text pipeline

mod keyframe;
pub mod metric;
mod parse;
mod pipeline;
mod sequence;
mod sweep;
mod writer;

pub use keyframe::*;
pub use metric::{Metric, SimilarityMetric};
pub use parse::*;
pub use pipeline::*;
pub use sequence::*;
pub use sweep::*;
pub use writer::*;
