//! Per-channel normalisation with statistics taken from the input itself.

use p2p_tensor::prelude::*;
use p2p_tensor::{validate, BATCH_NORM_EPSILON};

/// Normalise each channel of `[h, w, c]` to zero mean and unit (biased)
/// variance, then apply `scale` and `offset`.
///
/// Nothing is carried between calls: mean and variance always come from
/// `input`, which makes this instance normalisation in practice.
pub fn batch_norm(input: &Tensor, scale: &Tensor, offset: &Tensor) -> Result<Tensor> {
    let shape = validate::batch_norm(input, scale, offset)?;
    let (height, width, channels) = (
        shape.dim(0) as isize,
        shape.dim(1) as isize,
        shape.dim(2) as isize,
    );
    let pixels = (height * width) as f32;

    let mut output = Tensor::zeros(shape);
    for ch in 0..channels {
        let mut mean = 0.0f32;
        for y in 0..height {
            for x in 0..width {
                mean += input.get3(y, x, ch);
            }
        }
        mean /= pixels;

        let mut variance = 0.0f32;
        for y in 0..height {
            for x in 0..width {
                let d = input.get3(y, x, ch) - mean;
                variance += d * d;
            }
        }
        variance /= pixels;

        let offs = offset.get1(ch);
        let sc = scale.get1(ch) / (variance + BATCH_NORM_EPSILON).sqrt();

        for y in 0..height {
            for x in 0..width {
                output.set3(y, x, ch, offs + (input.get3(y, x, ch) - mean) * sc);
            }
        }
    }
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_channel_is_zero() {
        for k in [0.0f32, 1.0, -3.5, 1234.5] {
            let x = Tensor::full(Shape::new(vec![3, 3, 1]).unwrap(), k);
            let one = Tensor::from_vec(&[1], vec![1.0]).unwrap();
            let zero = Tensor::from_vec(&[1], vec![0.0]).unwrap();
            let y = batch_norm(&x, &one, &zero).unwrap();
            assert!(y.as_slice().iter().all(|&v| v == 0.0), "k = {k}");
        }
    }

    #[test]
    fn test_normalises_each_channel() {
        // channel 0: {1, 3}, channel 1: {10, 10}
        let x = Tensor::from_vec(&[1, 2, 2], vec![1.0, 10.0, 3.0, 10.0]).unwrap();
        let scale = Tensor::from_vec(&[2], vec![2.0, 1.0]).unwrap();
        let offset = Tensor::from_vec(&[2], vec![0.5, -1.0]).unwrap();
        let y = batch_norm(&x, &scale, &offset).unwrap();

        let adjusted = 2.0 / (1.0f32 + BATCH_NORM_EPSILON).sqrt();
        let out = y.as_slice();
        assert!((out[0] - (0.5 - adjusted)).abs() < 1e-6);
        assert!((out[2] - (0.5 + adjusted)).abs() < 1e-6);
        assert_eq!(out[1], -1.0);
        assert_eq!(out[3], -1.0);
    }

    #[test]
    fn test_scale_length_checked() {
        let x = Tensor::zeros(Shape::new(vec![2, 2, 3]).unwrap());
        let short = Tensor::zeros(Shape::new(vec![2]).unwrap());
        let ok = Tensor::zeros(Shape::new(vec![3]).unwrap());
        assert!(batch_norm(&x, &short, &ok).is_err());
        assert!(batch_norm(&x, &ok, &short).is_err());
    }
}
