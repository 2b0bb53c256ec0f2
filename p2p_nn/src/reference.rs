//! Scalar reference strategy.

use p2p_tensor::prelude::*;

use crate::config::Strategy;
use crate::ops::LayerOps;
use crate::{activations, layers};

/// Single-threaded implementation built on the bounds-checked accessors.
#[derive(Debug, Clone, Copy, Default)]
pub struct Reference;

impl LayerOps for Reference {
    fn strategy(&self) -> Strategy {
        Strategy::Reference
    }

    fn relu(&self, input: &Tensor) -> Result<Tensor> {
        Ok(activations::relu(input))
    }

    fn leaky_relu(&self, input: &Tensor, alpha: f32) -> Result<Tensor> {
        Ok(activations::leaky_relu(input, alpha))
    }

    fn tanh(&self, input: &Tensor) -> Result<Tensor> {
        Ok(activations::tanh(input))
    }

    fn concat(&self, input1: &Tensor, input2: &Tensor) -> Result<Tensor> {
        layers::concat(input1, input2)
    }

    fn batch_norm(&self, input: &Tensor, scale: &Tensor, offset: &Tensor) -> Result<Tensor> {
        layers::batch_norm(input, scale, offset)
    }

    fn conv2d(&self, input: &Tensor, filter: &Tensor, bias: &Tensor) -> Result<Tensor> {
        layers::conv2d(input, filter, bias)
    }

    fn deconv2d(&self, input: &Tensor, filter: &Tensor, bias: &Tensor) -> Result<Tensor> {
        layers::deconv2d(input, filter, bias)
    }
}
