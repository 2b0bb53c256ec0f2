//! Activation functions (scalar reference).

use p2p_tensor::prelude::*;

/// ReLU activation: max(0, x)
pub fn relu(x: &Tensor) -> Tensor {
    activate(x, Activation::Relu)
}

/// Leaky ReLU: x for x >= 0, x * alpha otherwise
pub fn leaky_relu(x: &Tensor, alpha: f32) -> Tensor {
    activate(x, Activation::LeakyRelu { alpha })
}

/// Tanh activation: tanh(x)
pub fn tanh(x: &Tensor) -> Tensor {
    activate(x, Activation::Tanh)
}

/// Apply `activation` to every element; the shape is unchanged.
pub fn activate(x: &Tensor, activation: Activation) -> Tensor {
    x.map(|v| activation.apply(v))
}
