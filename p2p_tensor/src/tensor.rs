//! Dense row-major tensor with bounds-checked accessors.
//!
//! Reading outside the shape returns `0.0` and writing outside it is a no-op.
//! The convolution kernels rely on this for their zero padding, so it is part
//! of the contract rather than a convenience.

use std::fmt;

use crate::error::{Result, TensorError};
use crate::shape::{Shape, Strides};

/// Host tensor storage.
#[derive(Clone, PartialEq)]
pub struct Tensor {
    data: Vec<f32>,
    shape: Shape,
    strides: Strides,
}

impl Tensor {
    /// Wrap `data` under `shape`. The data length must equal `shape.numel()`.
    pub fn new(shape: Shape, data: Vec<f32>) -> Result<Self> {
        if data.len() != shape.numel() {
            return Err(TensorError::mismatch(
                "tensor",
                format!(
                    "data length {} doesn't match shape {} (numel={})",
                    data.len(),
                    shape,
                    shape.numel()
                ),
            ));
        }
        let strides = shape.contiguous_strides();
        Ok(Tensor {
            data,
            shape,
            strides,
        })
    }

    /// Build a tensor from raw dimensions and data.
    pub fn from_vec(dims: &[usize], data: Vec<f32>) -> Result<Self> {
        Tensor::new(Shape::try_from(dims)?, data)
    }

    /// Zero-filled tensor.
    pub fn zeros(shape: Shape) -> Self {
        Tensor::full(shape, 0.0)
    }

    /// Tensor filled with a constant value.
    pub fn full(shape: Shape, value: f32) -> Self {
        let strides = shape.contiguous_strides();
        Tensor {
            data: vec![value; shape.numel()],
            shape,
            strides,
        }
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn dims(&self) -> &[usize] {
        self.shape.dims()
    }

    pub fn rank(&self) -> usize {
        self.shape.ndim()
    }

    pub fn numel(&self) -> usize {
        self.data.len()
    }

    /// Get data as a contiguous f32 slice.
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    pub fn into_vec(self) -> Vec<f32> {
        self.data
    }

    /// Same shape, every element passed through `f`.
    pub fn map<F>(&self, f: F) -> Tensor
    where
        F: Fn(f32) -> f32,
    {
        Tensor {
            data: self.data.iter().map(|&v| f(v)).collect(),
            shape: self.shape.clone(),
            strides: self.strides.clone(),
        }
    }

    #[inline]
    fn offset(&self, indices: &[isize]) -> Option<usize> {
        self.strides.checked_offset(&self.shape, indices)
    }

    fn check_rank(&self, got: usize) -> Result<()> {
        if got != self.rank() {
            return Err(TensorError::RankMismatch {
                expected: self.rank(),
                got,
            });
        }
        Ok(())
    }

    /// Read an element; `0.0` when any index is out of range.
    pub fn get(&self, indices: &[isize]) -> Result<f32> {
        self.check_rank(indices.len())?;
        Ok(self.offset(indices).map_or(0.0, |o| self.data[o]))
    }

    /// Write an element; out-of-range writes are ignored.
    pub fn set(&mut self, indices: &[isize], value: f32) -> Result<()> {
        self.check_rank(indices.len())?;
        if let Some(o) = self.offset(indices) {
            self.data[o] = value;
        }
        Ok(())
    }

    #[inline]
    fn read(&self, indices: &[isize]) -> f32 {
        debug_assert_eq!(indices.len(), self.rank(), "accessor arity != rank");
        self.offset(indices).map_or(0.0, |o| self.data[o])
    }

    #[inline]
    fn write(&mut self, indices: &[isize], value: f32) {
        debug_assert_eq!(indices.len(), self.rank(), "accessor arity != rank");
        if let Some(o) = self.offset(indices) {
            self.data[o] = value;
        }
    }

    #[inline]
    pub fn get1(&self, i0: isize) -> f32 {
        self.read(&[i0])
    }

    #[inline]
    pub fn get2(&self, i0: isize, i1: isize) -> f32 {
        self.read(&[i0, i1])
    }

    #[inline]
    pub fn get3(&self, i0: isize, i1: isize, i2: isize) -> f32 {
        self.read(&[i0, i1, i2])
    }

    #[inline]
    pub fn get4(&self, i0: isize, i1: isize, i2: isize, i3: isize) -> f32 {
        self.read(&[i0, i1, i2, i3])
    }

    #[inline]
    pub fn set1(&mut self, i0: isize, value: f32) {
        self.write(&[i0], value);
    }

    #[inline]
    pub fn set2(&mut self, i0: isize, i1: isize, value: f32) {
        self.write(&[i0, i1], value);
    }

    #[inline]
    pub fn set3(&mut self, i0: isize, i1: isize, i2: isize, value: f32) {
        self.write(&[i0, i1, i2], value);
    }

    #[inline]
    pub fn set4(&mut self, i0: isize, i1: isize, i2: isize, i3: isize, value: f32) {
        self.write(&[i0, i1, i2, i3], value);
    }
}

impl fmt::Debug for Tensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tensor")
            .field("shape", &self.shape)
            .field("numel", &self.data.len())
            .finish()
    }
}

impl fmt::Display for Tensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tensor {}", self.shape)
    }
}
