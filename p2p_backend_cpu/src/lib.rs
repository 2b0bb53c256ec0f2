//! Data-parallel CPU backend for p2p_tensor.
//!
//! [`CpuBackend`] runs every [`KernelVariant`] on a rayon pool. Each request is
//! executed as one blocking job; the variant only decides how finely the
//! output is split across tasks.

use std::sync::Arc;

use rayon::{ThreadPool, ThreadPoolBuildError, ThreadPoolBuilder};
use tracing::trace;

use p2p_tensor::prelude::*;

mod kernels;

/// CPU backend. Uses the global rayon pool unless built with [`CpuBackend::with_threads`].
#[derive(Clone, Debug, Default)]
pub struct CpuBackend {
    pool: Option<Arc<ThreadPool>>,
}

impl CpuBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Backend with a dedicated pool of `threads` workers.
    pub fn with_threads(threads: usize) -> std::result::Result<Self, ThreadPoolBuildError> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("p2p-cpu-{i}"))
            .build()?;
        Ok(CpuBackend {
            pool: Some(Arc::new(pool)),
        })
    }

    /// Worker count requests will be spread over.
    pub fn threads(&self) -> usize {
        self.pool
            .as_ref()
            .map_or_else(rayon::current_num_threads, |pool| pool.current_num_threads())
    }
}

impl Backend for CpuBackend {
    fn name(&self) -> &'static str {
        "cpu"
    }

    fn dispatch(&self, request: &KernelRequest<'_>) -> Result<Tensor> {
        trace!(
            kernel = %request.variant,
            grain = request.variant.grain(),
            inputs = request.inputs.len(),
            "cpu dispatch"
        );
        match &self.pool {
            Some(pool) => pool.install(|| execute(request)),
            None => execute(request),
        }
    }
}

fn execute(request: &KernelRequest<'_>) -> Result<Tensor> {
    let grain = request.variant.grain();
    match request.op() {
        OpKind::Activation => {
            kernels::activation(request.input(0)?, request.activation_fn()?, grain)
        }
        OpKind::Concat => kernels::concat(request.input(0)?, request.input(1)?, grain),
        OpKind::BatchNorm => kernels::batch_norm(
            request.input(0)?,
            request.input(1)?,
            request.input(2)?,
            grain,
        ),
        OpKind::ConvolutionDown => kernels::conv2d(
            request.input(0)?,
            request.input(1)?,
            request.input(2)?,
            grain,
        ),
        OpKind::ConvolutionUp => kernels::deconv2d(
            request.input(0)?,
            request.input(1)?,
            request.input(2)?,
            grain,
        ),
    }
}
