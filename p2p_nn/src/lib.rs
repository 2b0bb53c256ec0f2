//! # p2p_nn - pix2pix generator layer operations
//!
//! This crate provides the forward-inference primitives of the pix2pix
//! generator on top of p2p_tensor:
//!
//! - **Activations**: ReLU, LeakyReLU, Tanh
//! - **Layers**: channel concatenation, instance-style batch normalisation,
//!   stride-2 convolution and stride-2 transposed convolution
//! - **Strategies**: [`Reference`] scalar loops and [`Accelerated`] backend dispatch,
//!   both behind the [`LayerOps`] trait
//! - **Kernel selection**: pure shape-to-[`KernelVariant`](p2p_tensor::KernelVariant) functions
//!
//! ## Example
//!
//! ```
//! use p2p_nn::{EngineConfig, Strategy};
//! use p2p_tensor::prelude::*;
//!
//! let ops = EngineConfig::new().with_strategy(Strategy::Reference).build()?;
//!
//! let x = Tensor::from_vec(&[2, 2, 1], vec![1.0, 1.0, 1.0, 1.0])?;
//! let filter = Tensor::from_vec(&[2, 2, 1, 1], vec![1.0; 4])?;
//! let bias = Tensor::from_vec(&[1], vec![0.0])?;
//!
//! let y = ops.conv2d(&x, &filter, &bias)?;
//! assert_eq!(y.dims(), &[1, 1, 1]);
//! assert_eq!(y.as_slice(), &[4.0]);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod accelerated;
pub mod activations;
pub mod config;
pub mod kernels;
pub mod layers;
pub mod ops;
pub mod reference;

// Re-exports for convenience
pub use accelerated::Accelerated;
pub use activations::{leaky_relu, relu, tanh};
pub use config::{ConfigError, EngineConfig, Strategy};
pub use layers::{batch_norm, concat, conv2d, deconv2d};
pub use ops::LayerOps;
pub use reference::Reference;
