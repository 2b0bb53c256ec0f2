//! Shape and stride utilities for tensors.

use std::fmt;

use crate::error::{Result, TensorError};

/// Highest rank a tensor may have.
pub const MAX_RANK: usize = 4;

/// A tensor shape: rank 1 to 4, every dimension positive.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Shape(Vec<usize>);

impl Shape {
    /// Create a new shape from dimensions.
    pub fn new(dims: Vec<usize>) -> Result<Self> {
        if dims.is_empty() || dims.len() > MAX_RANK || dims.contains(&0) {
            return Err(TensorError::InvalidShape { dims });
        }
        Ok(Shape(dims))
    }

    /// Number of dimensions.
    pub fn ndim(&self) -> usize {
        self.0.len()
    }

    /// Get dimension at index.
    pub fn dim(&self, idx: usize) -> usize {
        self.0[idx]
    }

    /// Get dimensions as slice.
    pub fn dims(&self) -> &[usize] {
        &self.0
    }

    /// Total number of elements.
    pub fn numel(&self) -> usize {
        self.0.iter().product()
    }

    /// Compute row-major (C-contiguous) strides for this shape.
    pub fn contiguous_strides(&self) -> Strides {
        let ndim = self.0.len();
        let mut strides = vec![1usize; ndim];
        for i in (0..ndim - 1).rev() {
            strides[i] = strides[i + 1] * self.0[i + 1];
        }
        Strides(strides)
    }

    /// `[height, width, channels]` of a rank-3 shape.
    pub fn hwc(&self) -> Option<(usize, usize, usize)> {
        match self.0.as_slice() {
            &[h, w, c] => Some((h, w, c)),
            _ => None,
        }
    }
}

impl fmt::Debug for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Shape({:?})", self.0)
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, d) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, "x")?;
            }
            write!(f, "{}", d)?;
        }
        Ok(())
    }
}

impl TryFrom<&[usize]> for Shape {
    type Error = TensorError;

    fn try_from(s: &[usize]) -> Result<Self> {
        Shape::new(s.to_vec())
    }
}

/// Tensor strides (step size in each dimension).
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct Strides(Vec<usize>);

impl Strides {
    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }

    /// Flat offset of `indices` within `shape`, or `None` when the arity is
    /// wrong or any index falls outside its axis.
    pub fn checked_offset(&self, shape: &Shape, indices: &[isize]) -> Option<usize> {
        if indices.len() != self.0.len() {
            return None;
        }
        let mut offset = 0;
        for ((&i, &dim), &stride) in indices.iter().zip(shape.dims()).zip(&self.0) {
            if i < 0 || i as usize >= dim {
                return None;
            }
            offset += i as usize * stride;
        }
        Some(offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_basics() {
        let s = Shape::new(vec![2, 3, 4]).unwrap();
        assert_eq!(s.ndim(), 3);
        assert_eq!(s.dim(0), 2);
        assert_eq!(s.dim(2), 4);
        assert_eq!(s.numel(), 24);
        assert_eq!(s.hwc(), Some((2, 3, 4)));
    }

    #[test]
    fn test_invalid_shapes() {
        assert!(Shape::new(vec![]).is_err());
        assert!(Shape::new(vec![1, 2, 3, 4, 5]).is_err());
        assert_eq!(
            Shape::new(vec![4, 0, 3]),
            Err(TensorError::InvalidShape { dims: vec![4, 0, 3] })
        );
    }

    #[test]
    fn test_contiguous_strides() {
        let s = Shape::new(vec![2, 3, 4]).unwrap();
        assert_eq!(s.contiguous_strides().as_slice(), &[12, 4, 1]);

        let s1 = Shape::new(vec![7]).unwrap();
        assert_eq!(s1.contiguous_strides().as_slice(), &[1]);
    }

    #[test]
    fn test_display() {
        let s = Shape::new(vec![256, 256, 3]).unwrap();
        assert_eq!(s.to_string(), "256x256x3");
        assert_eq!(format!("{:?}", s), "Shape([256, 256, 3])");
    }

    #[test]
    fn test_checked_offset() {
        let s = Shape::new(vec![2, 3, 4]).unwrap();
        let strides = s.contiguous_strides();
        assert_eq!(strides.checked_offset(&s, &[0, 0, 0]), Some(0));
        assert_eq!(strides.checked_offset(&s, &[1, 2, 3]), Some(12 + 8 + 3));
        assert_eq!(strides.checked_offset(&s, &[-1, 0, 0]), None);
        assert_eq!(strides.checked_offset(&s, &[0, 3, 0]), None);
        assert_eq!(strides.checked_offset(&s, &[0, 0]), None);
    }
}
