//! Scalar reference implementations of the layer primitives.
//!
//! These loop over output elements one at a time and read their inputs
//! through the bounds-checked accessors, so an out-of-range read is the zero
//! padding the convolutions need.

pub mod concat;
pub mod conv;
pub mod normalization;

pub use concat::concat;
pub use conv::{conv2d, deconv2d};
pub use normalization::batch_norm;
