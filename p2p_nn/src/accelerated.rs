//! Accelerated strategy: one backend request per operation.

use tracing::debug;

use p2p_backend_cpu::CpuBackend;
use p2p_tensor::prelude::*;
use p2p_tensor::validate;

use crate::config::Strategy;
use crate::kernels;
use crate::ops::LayerOps;

/// Validates inputs, picks a kernel variant and hands the work to `B`.
#[derive(Debug, Clone, Default)]
pub struct Accelerated<B: Backend = CpuBackend> {
    backend: B,
}

impl<B: Backend> Accelerated<B> {
    pub fn new(backend: B) -> Self {
        Accelerated { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Dispatch `request` and check the result has the `expected` shape.
    fn launch(&self, request: KernelRequest<'_>, expected: Shape) -> Result<Tensor> {
        debug!(
            backend = self.backend.name(),
            op = ?request.op(),
            kernel = %request.variant,
            inputs = ?request.inputs.iter().map(|t| t.dims()).collect::<Vec<_>>(),
            output = %expected,
            "dispatch"
        );
        let output = self.backend.dispatch(&request)?;
        if output.shape() != &expected {
            return Err(TensorError::BackendShape {
                kernel: request.variant.name(),
                expected,
                got: output.shape().clone(),
            });
        }
        Ok(output)
    }

    fn activate(&self, input: &Tensor, activation: Activation) -> Result<Tensor> {
        let mut request = KernelRequest::new(kernels::select_activation(activation), vec![input]);
        request.alpha = activation.alpha();
        self.launch(request, validate::activation(input))
    }
}

impl<B: Backend> LayerOps for Accelerated<B> {
    fn strategy(&self) -> Strategy {
        Strategy::Accelerated
    }

    fn relu(&self, input: &Tensor) -> Result<Tensor> {
        self.activate(input, Activation::Relu)
    }

    fn leaky_relu(&self, input: &Tensor, alpha: f32) -> Result<Tensor> {
        self.activate(input, Activation::LeakyRelu { alpha })
    }

    fn tanh(&self, input: &Tensor) -> Result<Tensor> {
        self.activate(input, Activation::Tanh)
    }

    fn concat(&self, input1: &Tensor, input2: &Tensor) -> Result<Tensor> {
        let shape = validate::concat(input1, input2)?;
        let variant = kernels::select_concat(shape.dim(0), shape.dim(1));
        self.launch(KernelRequest::new(variant, vec![input1, input2]), shape)
    }

    fn batch_norm(&self, input: &Tensor, scale: &Tensor, offset: &Tensor) -> Result<Tensor> {
        let shape = validate::batch_norm(input, scale, offset)?;
        let variant = kernels::select_batch_norm(shape.dim(2));
        self.launch(KernelRequest::new(variant, vec![input, scale, offset]), shape)
    }

    fn conv2d(&self, input: &Tensor, filter: &Tensor, bias: &Tensor) -> Result<Tensor> {
        let shape = validate::conv2d(input, filter, bias)?;
        let variant = kernels::select_conv_down(shape.dim(2));
        self.launch(KernelRequest::new(variant, vec![input, filter, bias]), shape)
    }

    fn deconv2d(&self, input: &Tensor, filter: &Tensor, bias: &Tensor) -> Result<Tensor> {
        let shape = validate::deconv2d(input, filter, bias)?;
        let variant = kernels::select_conv_up(shape.dim(2));
        self.launch(KernelRequest::new(variant, vec![input, filter, bias]), shape)
    }
}
