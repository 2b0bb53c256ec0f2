//! # p2p_tensor - Tensor values and kernel contracts for pix2pix inference
//!
//! This crate holds everything the layer operations and the execution
//! backends agree on:
//!
//! - [`Shape`] and [`Strides`] - rank 1-4 row-major layout
//! - [`Tensor`] - dense `f32` storage whose out-of-range reads return zero
//! - [`KernelVariant`], [`KernelRequest`], [`Activation`] - what a backend is asked to run
//! - [`Backend`] - trait for the parallel execution capability
//! - [`validate`] - per-operation shape preconditions and output shapes
//!
//! ## Example
//!
//! ```
//! use p2p_tensor::prelude::*;
//!
//! let mut t = Tensor::zeros(Shape::new(vec![2, 2, 1])?);
//! t.set3(1, 1, 0, 4.0);
//! assert_eq!(t.get3(1, 1, 0), 4.0);
//! assert_eq!(t.get3(-1, 0, 0), 0.0); // implicit zero padding
//! # Ok::<(), p2p_tensor::TensorError>(())
//! ```

pub mod backend;
pub mod error;
pub mod kernel;
pub mod shape;
pub mod tensor;
pub mod validate;

pub use backend::Backend;
pub use error::{Result, TensorError};
pub use kernel::{Activation, KernelRequest, KernelVariant, OpKind, BATCH_NORM_EPSILON};
pub use shape::{Shape, Strides};
pub use tensor::Tensor;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::backend::Backend;
    pub use crate::error::{Result, TensorError};
    pub use crate::kernel::{Activation, KernelRequest, KernelVariant, OpKind};
    pub use crate::shape::{Shape, Strides};
    pub use crate::tensor::Tensor;
}
