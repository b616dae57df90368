//! Utility types and functions for capture reduction.
//!
//! - [`Error`] / [`Result`] - Error handling
//! - Vector math and similarity metrics built on glam's `DVec3`

mod error;
mod math;

pub use error::*;
pub use math::*;
