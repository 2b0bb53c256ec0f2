//! Kernel descriptors: what a backend is asked to run.
//!
//! A [`KernelRequest`] names one [`KernelVariant`], the input tensors in the
//! order the operation defines them, and any scalar parameters. Variants of the
//! same [`OpKind`] are numerically interchangeable; they differ only in how
//! the work is split up.

use std::fmt;

use crate::error::{Result, TensorError};
use crate::tensor::Tensor;

/// Added to the per-channel variance before the square root in batch norm.
pub const BATCH_NORM_EPSILON: f32 = 1e-5;

/// Operation family a kernel variant belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpKind {
    Activation,
    Concat,
    BatchNorm,
    ConvolutionDown,
    ConvolutionUp,
}

impl OpKind {
    /// Number of input tensors a request of this kind carries.
    pub fn arity(self) -> usize {
        match self {
            OpKind::Activation => 1,
            OpKind::Concat => 2,
            OpKind::BatchNorm | OpKind::ConvolutionDown | OpKind::ConvolutionUp => 3,
        }
    }
}

/// Named execution path for one operation.
#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KernelVariant {
    Relu,
    LeakyRelu,
    Tanh,
    Concat4,
    Concat64,
    Concat512,
    BatchNorm64,
    BatchNorm512,
    Conv2D_64_8,
    Conv2D_512_1,
    TransConv2D_64_8,
    TransConv2D_512_1,
    TransConv2D_3_128,
}

impl KernelVariant {
    pub fn name(self) -> &'static str {
        match self {
            KernelVariant::Relu => "Relu",
            KernelVariant::LeakyRelu => "LeakyRelu",
            KernelVariant::Tanh => "Tanh",
            KernelVariant::Concat4 => "Concat4",
            KernelVariant::Concat64 => "Concat64",
            KernelVariant::Concat512 => "Concat512",
            KernelVariant::BatchNorm64 => "BatchNorm64",
            KernelVariant::BatchNorm512 => "BatchNorm512",
            KernelVariant::Conv2D_64_8 => "Conv2D_64_8",
            KernelVariant::Conv2D_512_1 => "Conv2D_512_1",
            KernelVariant::TransConv2D_64_8 => "TransConv2D_64_8",
            KernelVariant::TransConv2D_512_1 => "TransConv2D_512_1",
            KernelVariant::TransConv2D_3_128 => "TransConv2D_3_128",
        }
    }

    pub fn op(self) -> OpKind {
        match self {
            KernelVariant::Relu | KernelVariant::LeakyRelu | KernelVariant::Tanh => {
                OpKind::Activation
            }
            KernelVariant::Concat4 | KernelVariant::Concat64 | KernelVariant::Concat512 => {
                OpKind::Concat
            }
            KernelVariant::BatchNorm64 | KernelVariant::BatchNorm512 => OpKind::BatchNorm,
            KernelVariant::Conv2D_64_8 | KernelVariant::Conv2D_512_1 => OpKind::ConvolutionDown,
            KernelVariant::TransConv2D_64_8
            | KernelVariant::TransConv2D_512_1
            | KernelVariant::TransConv2D_3_128 => OpKind::ConvolutionUp,
        }
    }

    /// Work items handed to one parallel task.
    ///
    /// Activations count elements, concat and convolutions count output
    /// pixels, batch norm counts channels.
    pub fn grain(self) -> usize {
        match self {
            KernelVariant::Relu | KernelVariant::LeakyRelu | KernelVariant::Tanh => 4096,
            KernelVariant::Concat4 => 4,
            KernelVariant::Concat64 => 64,
            KernelVariant::Concat512 => 512,
            KernelVariant::BatchNorm64 => 8,
            KernelVariant::BatchNorm512 => 64,
            KernelVariant::Conv2D_64_8 | KernelVariant::TransConv2D_64_8 => 8,
            KernelVariant::Conv2D_512_1 | KernelVariant::TransConv2D_512_1 => 1,
            KernelVariant::TransConv2D_3_128 => 128,
        }
    }
}

impl fmt::Display for KernelVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Pointwise activation function.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Activation {
    Relu,
    LeakyRelu { alpha: f32 },
    Tanh,
}

impl Activation {
    #[inline]
    pub fn apply(self, x: f32) -> f32 {
        match self {
            Activation::Relu => {
                if x < 0.0 {
                    0.0
                } else {
                    x
                }
            }
            Activation::LeakyRelu { alpha } => {
                if x < 0.0 {
                    x * alpha
                } else {
                    x
                }
            }
            Activation::Tanh => x.tanh(),
        }
    }

    pub fn variant(self) -> KernelVariant {
        match self {
            Activation::Relu => KernelVariant::Relu,
            Activation::LeakyRelu { .. } => KernelVariant::LeakyRelu,
            Activation::Tanh => KernelVariant::Tanh,
        }
    }

    /// Scalar parameter sent alongside the request.
    pub fn alpha(self) -> Option<f32> {
        match self {
            Activation::LeakyRelu { alpha } => Some(alpha),
            _ => None,
        }
    }
}

/// One logical unit of work for a backend.
#[derive(Debug, Clone)]
pub struct KernelRequest<'a> {
    pub variant: KernelVariant,
    pub inputs: Vec<&'a Tensor>,
    pub alpha: Option<f32>,
}

impl<'a> KernelRequest<'a> {
    pub fn new(variant: KernelVariant, inputs: Vec<&'a Tensor>) -> Self {
        KernelRequest {
            variant,
            inputs,
            alpha: None,
        }
    }

    pub fn activation(activation: Activation, input: &'a Tensor) -> Self {
        KernelRequest {
            variant: activation.variant(),
            inputs: vec![input],
            alpha: activation.alpha(),
        }
    }

    pub fn op(&self) -> OpKind {
        self.variant.op()
    }

    /// Input tensor `idx`, or a backend error if the request is short.
    pub fn input(&self, idx: usize) -> Result<&'a Tensor> {
        self.inputs
            .get(idx)
            .copied()
            .ok_or_else(|| TensorError::Backend {
                kernel: self.variant.name(),
                reason: format!(
                    "expected {} inputs, got {}",
                    self.op().arity(),
                    self.inputs.len()
                ),
            })
    }

    /// Rebuild the activation function this request describes.
    pub fn activation_fn(&self) -> Result<Activation> {
        match self.variant {
            KernelVariant::Relu => Ok(Activation::Relu),
            KernelVariant::Tanh => Ok(Activation::Tanh),
            KernelVariant::LeakyRelu => {
                self.alpha
                    .map(|alpha| Activation::LeakyRelu { alpha })
                    .ok_or_else(|| TensorError::Backend {
                        kernel: self.variant.name(),
                        reason: "missing alpha parameter".to_string(),
                    })
            }
            other => Err(TensorError::Backend {
                kernel: other.name(),
                reason: "not an activation kernel".to_string(),
            }),
        }
    }
}
