//! Channel-wise concatenation.

use p2p_tensor::prelude::*;
use p2p_tensor::validate;

/// `[h, w, c1]` and `[h, w, c2]` into `[h, w, c1 + c2]`, `a`'s channels first.
pub fn concat(a: &Tensor, b: &Tensor) -> Result<Tensor> {
    let shape = validate::concat(a, b)?;
    let (height, width) = (shape.dim(0) as isize, shape.dim(1) as isize);
    let ch1 = a.dims()[2] as isize;
    let ch2 = b.dims()[2] as isize;

    let mut output = Tensor::zeros(shape);
    for i in 0..height {
        for j in 0..width {
            for k in 0..ch1 {
                output.set3(i, j, k, a.get3(i, j, k));
            }
            for k in 0..ch2 {
                output.set3(i, j, ch1 + k, b.get3(i, j, k));
            }
        }
    }
    Ok(output)
}
