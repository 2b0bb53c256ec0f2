//! Error type shared by the tensor, backend and layer crates.
//!
//! Out-of-range element access is not represented here: reads outside a
//! tensor return zero and writes are dropped.

use thiserror::Error;

use crate::shape::Shape;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum TensorError {
    /// Rank outside 1..=4 or a zero-length dimension.
    #[error("invalid shape {dims:?}: rank must be 1-4 and every dimension positive")]
    InvalidShape { dims: Vec<usize> },

    /// An operation (or constructor) received tensors whose shapes do not fit together.
    #[error("{op}: shape mismatch: {reason}")]
    ShapeMismatch { op: &'static str, reason: String },

    /// A dynamic accessor was called with the wrong number of indices.
    #[error("rank mismatch: tensor has rank {expected}, got {got} indices")]
    RankMismatch { expected: usize, got: usize },

    /// A backend rejected a request or failed while executing it.
    #[error("backend kernel {kernel} failed: {reason}")]
    Backend { kernel: &'static str, reason: String },

    /// A backend returned a tensor whose shape disagrees with the operation's formula.
    #[error("backend kernel {kernel} returned {got}, expected {expected}")]
    BackendShape {
        kernel: &'static str,
        expected: Shape,
        got: Shape,
    },
}

impl TensorError {
    pub fn mismatch(op: &'static str, reason: impl Into<String>) -> Self {
        TensorError::ShapeMismatch {
            op,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, TensorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let err = TensorError::mismatch("concat", "height 4 != 8");
        assert_eq!(err.to_string(), "concat: shape mismatch: height 4 != 8");

        let err = TensorError::RankMismatch {
            expected: 3,
            got: 2,
        };
        assert_eq!(err.to_string(), "rank mismatch: tensor has rank 3, got 2 indices");

        let err = TensorError::BackendShape {
            kernel: "Conv2D_64_8",
            expected: Shape::new(vec![2, 2, 8]).unwrap(),
            got: Shape::new(vec![2, 2, 4]).unwrap(),
        };
        assert_eq!(
            err.to_string(),
            "backend kernel Conv2D_64_8 returned 2x2x4, expected 2x2x8"
        );
    }
}
