//! Shape contracts for the layer primitives.
//!
//! Each function checks the preconditions of one operation and returns the
//! shape its output must have. Both execution strategies and every backend
//! go through these, so a given set of inputs is accepted or rejected the same
//! way everywhere.

use crate::error::{Result, TensorError};
use crate::shape::Shape;
use crate::tensor::Tensor;

fn feature_map(op: &'static str, what: &str, t: &Tensor) -> Result<(usize, usize, usize)> {
    t.shape().hwc().ok_or_else(|| {
        TensorError::mismatch(op, format!("{what} must be rank 3 [h, w, c], got {}", t.shape()))
    })
}

fn per_channel(op: &'static str, what: &str, t: &Tensor, channels: usize) -> Result<()> {
    if t.dims() != [channels] {
        return Err(TensorError::mismatch(
            op,
            format!("{what} must have shape {channels}, got {}", t.shape()),
        ));
    }
    Ok(())
}

fn filter_dims(op: &'static str, t: &Tensor) -> Result<[usize; 4]> {
    match *t.dims() {
        [fh, fw, a, b] => Ok([fh, fw, a, b]),
        _ => Err(TensorError::mismatch(
            op,
            format!("filter must be rank 4, got {}", t.shape()),
        )),
    }
}

/// Elementwise ops keep the input shape.
pub fn activation(input: &Tensor) -> Shape {
    input.shape().clone()
}

/// `[h, w, c1] ++ [h, w, c2] -> [h, w, c1 + c2]`.
pub fn concat(a: &Tensor, b: &Tensor) -> Result<Shape> {
    const OP: &str = "concat";
    let (h1, w1, c1) = feature_map(OP, "input1", a)?;
    let (h2, w2, c2) = feature_map(OP, "input2", b)?;
    if h1 != h2 || w1 != w2 {
        return Err(TensorError::mismatch(
            OP,
            format!("spatial size {h1}x{w1} != {h2}x{w2}"),
        ));
    }
    Shape::new(vec![h1, w1, c1 + c2])
}

/// Input `[h, w, c]` with scale and offset `[c]`; output keeps the input shape.
pub fn batch_norm(input: &Tensor, scale: &Tensor, offset: &Tensor) -> Result<Shape> {
    const OP: &str = "batch_norm";
    let (_, _, c) = feature_map(OP, "input", input)?;
    per_channel(OP, "scale", scale, c)?;
    per_channel(OP, "offset", offset, c)?;
    Ok(input.shape().clone())
}

/// Input `[h, w, ic]`, filter `[fh, fw, ic, oc]`, bias `[oc]` -> `[h/2, w/2, oc]`.
pub fn conv2d(input: &Tensor, filter: &Tensor, bias: &Tensor) -> Result<Shape> {
    const OP: &str = "conv2d";
    let (h, w, ic) = feature_map(OP, "input", input)?;
    let [_, _, fic, oc] = filter_dims(OP, filter)?;
    if fic != ic {
        return Err(TensorError::mismatch(
            OP,
            format!("filter expects {fic} input channels, input has {ic}"),
        ));
    }
    per_channel(OP, "bias", bias, oc)?;
    if h < 2 || w < 2 {
        return Err(TensorError::mismatch(
            OP,
            format!("input {h}x{w} is too small to downsample"),
        ));
    }
    Shape::new(vec![h / 2, w / 2, oc])
}

/// Input `[h, w, ic]`, filter `[fh, fw, oc, ic]`, bias `[oc]` -> `[2h, 2w, oc]`.
pub fn deconv2d(input: &Tensor, filter: &Tensor, bias: &Tensor) -> Result<Shape> {
    const OP: &str = "deconv2d";
    let (h, w, ic) = feature_map(OP, "input", input)?;
    let [_, _, oc, fic] = filter_dims(OP, filter)?;
    if fic != ic {
        return Err(TensorError::mismatch(
            OP,
            format!("filter expects {fic} input channels, input has {ic}"),
        ));
    }
    per_channel(OP, "bias", bias, oc)?;
    Shape::new(vec![h * 2, w * 2, oc])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zeros(dims: &[usize]) -> Tensor {
        Tensor::zeros(Shape::try_from(dims).unwrap())
    }

    #[test]
    fn test_concat_shapes() {
        let out = concat(&zeros(&[4, 4, 3]), &zeros(&[4, 4, 5])).unwrap();
        assert_eq!(out.dims(), &[4, 4, 8]);

        assert!(concat(&zeros(&[4, 4, 3]), &zeros(&[4, 2, 3])).is_err());
        assert!(concat(&zeros(&[4, 4]), &zeros(&[4, 4, 3])).is_err());
    }

    #[test]
    fn test_batch_norm_shapes() {
        let x = zeros(&[2, 2, 3]);
        assert_eq!(batch_norm(&x, &zeros(&[3]), &zeros(&[3])).unwrap().dims(), &[2, 2, 3]);
        assert!(batch_norm(&x, &zeros(&[4]), &zeros(&[3])).is_err());
        assert!(batch_norm(&x, &zeros(&[3]), &zeros(&[1, 3])).is_err());
        assert!(batch_norm(&zeros(&[6]), &zeros(&[6]), &zeros(&[6])).is_err());
    }

    #[test]
    fn test_conv2d_shapes() {
        let out = conv2d(&zeros(&[5, 7, 3]), &zeros(&[4, 4, 3, 8]), &zeros(&[8])).unwrap();
        assert_eq!(out.dims(), &[2, 3, 8]);

        // filter in-channels disagree with the input
        assert!(conv2d(&zeros(&[4, 4, 3]), &zeros(&[4, 4, 2, 8]), &zeros(&[8])).is_err());
        assert!(conv2d(&zeros(&[4, 4, 3]), &zeros(&[4, 4, 3, 8]), &zeros(&[7])).is_err());
        assert!(conv2d(&zeros(&[1, 4, 3]), &zeros(&[4, 4, 3, 8]), &zeros(&[8])).is_err());
    }

    #[test]
    fn test_deconv2d_shapes() {
        let out = deconv2d(&zeros(&[3, 2, 6]), &zeros(&[4, 4, 5, 6]), &zeros(&[5])).unwrap();
        assert_eq!(out.dims(), &[6, 4, 5]);

        // down-convolution filter layout is rejected
        assert!(deconv2d(&zeros(&[3, 2, 6]), &zeros(&[4, 4, 6, 5]), &zeros(&[5])).is_err());
    }

    #[test]
    fn test_error_names_operation() {
        let err = concat(&zeros(&[2, 2, 1]), &zeros(&[3, 2, 1])).unwrap_err();
        assert_eq!(err.to_string(), "concat: shape mismatch: spatial size 2x2 != 3x2");
    }
}
