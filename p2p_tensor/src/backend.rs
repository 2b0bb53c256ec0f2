//! Backend trait - abstraction for the parallel execution capability.

use crate::error::Result;
use crate::kernel::KernelRequest;
use crate::tensor::Tensor;

/// Executes named kernel variants over host tensors.
///
/// `dispatch` blocks until the whole request has run and returns a freshly
/// allocated output. Implementations must not keep references to the inputs.
pub trait Backend: Clone + Send + Sync + 'static {
    /// Short identifier used in logs.
    fn name(&self) -> &'static str;

    /// Run `request.variant` over `request.inputs`.
    fn dispatch(&self, request: &KernelRequest<'_>) -> Result<Tensor>;
}
