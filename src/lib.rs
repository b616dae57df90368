//! # UnitCapture
//!
//! Lossy reduction of recorded unit motion captures.
//!
//! A capture is the keyframe list written by Arma's `BIS_fnc_UnitCapture`:
//! time, position, direction, up and velocity per frame. Playback linearly
//! interpolates between keyframes, so a frame that its neighbours already
//! predict can be dropped without changing the path much. This crate finds
//! and drops those frames in one pass, keeping the first and last frame.
//!
//! ## Modules
//!
//! - [`util`] - Errors and vector math
//! - [`capture`] - Keyframes, parsing, the reduction sweep, serialization
//! - [`settings`] - Reduction settings (threshold and metric)
//!
//! ## Example
//!
//! ```
//! use unitcapture::prelude::*;
//!
//! let raw = "[[0,[0,0,0],[0,1,0],[0,0,1],[0,0,0]],\
//!             [1,[0,0,0],[0,1,0],[0,0,1],[0,0,0]],\
//!             [2,[0,0,0],[0,1,0],[0,0,1],[0,0,0]]]";
//!
//! let reduction = reduce_capture(raw, &ReduceSettings::default())?;
//! assert_eq!(reduction.frames_before, 3);
//! assert_eq!(reduction.frames_after, 2);
//! # Ok::<(), unitcapture::Error>(())
//! ```

pub mod util;
pub mod capture;
pub mod settings;

// Re-export commonly used types
pub use util::{Error, Result};
pub use capture::{reduce_capture, CaptureSequence, KeyFrame, Metric, Reduction};
pub use settings::ReduceSettings;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::util::{DVec3, Error, Result};
    pub use crate::capture::{
        parse_capture, parse_threshold, reduce, reduce_capture, reduce_capture_with, serialize,
        CaptureSequence, KeyFrame, Metric, Reduction, SimilarityMetric,
    };
    pub use crate::settings::ReduceSettings;
}
