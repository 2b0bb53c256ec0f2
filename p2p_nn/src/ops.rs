//! The layer-operation surface shared by both execution strategies.

use p2p_tensor::prelude::*;

use crate::config::Strategy;

/// Forward-pass primitives of the generator.
///
/// Every method is a pure function of its arguments: inputs are never
/// mutated and the returned tensor owns fresh storage. Implementations must
/// agree on output shapes exactly and on values up to floating-point
/// summation order.
pub trait LayerOps: Send + Sync {
    /// Which strategy this implementation realises.
    fn strategy(&self) -> Strategy;

    fn relu(&self, input: &Tensor) -> Result<Tensor>;

    fn leaky_relu(&self, input: &Tensor, alpha: f32) -> Result<Tensor>;

    fn tanh(&self, input: &Tensor) -> Result<Tensor>;

    /// `[h, w, c1]` ++ `[h, w, c2]` along the channel axis.
    fn concat(&self, input1: &Tensor, input2: &Tensor) -> Result<Tensor>;

    /// Per-channel normalisation of `[h, w, c]` with `scale`/`offset` of length `c`.
    fn batch_norm(&self, input: &Tensor, scale: &Tensor, offset: &Tensor) -> Result<Tensor>;

    /// Stride-2 convolution; `filter` is `[fh, fw, in, out]`.
    fn conv2d(&self, input: &Tensor, filter: &Tensor, bias: &Tensor) -> Result<Tensor>;

    /// Stride-2 transposed convolution; `filter` is `[fh, fw, out, in]`.
    fn deconv2d(&self, input: &Tensor, filter: &Tensor, bias: &Tensor) -> Result<Tensor>;
}
