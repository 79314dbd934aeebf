//! Arithmetic over interpolatable values.
//!
//! Interpolation only ever needs three operations: adding two masters,
//! subtracting one master from another, and scaling a master by a scalar
//! weight. Every value that takes part in interpolation implements [`Blend`],
//! and each implementation checks that its operands are compatible before
//! combining them.

use crate::error::BlendError;

/// A binary arithmetic operation applied to matching numbers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinaryOp {
    /// Add the right operand to the left.
    Add,
    /// Subtract the right operand from the left.
    Sub,
}

impl BinaryOp {
    /// Apply the operation to a pair of numbers.
    #[inline]
    pub fn apply(self, a: f64, b: f64) -> f64 {
        match self {
            Self::Add => a + b,
            Self::Sub => a - b,
        }
    }
}

/// A value that can be added, subtracted and scaled.
pub trait Blend: Sized {
    /// Combine two values number by number.
    ///
    /// Returns an error if the values do not have the same structure.
    fn combine(&self, other: &Self, op: BinaryOp) -> Result<Self, BlendError>;

    /// Multiply every number in this value by `scalar`.
    fn scale(&self, scalar: f64) -> Self;

    /// Add `other` to this value.
    ///
    /// Fails under the same conditions as [`Blend::combine`].
    fn add(&self, other: &Self) -> Result<Self, BlendError> {
        self.combine(other, BinaryOp::Add)
    }

    /// Subtract `other` from this value.
    ///
    /// Fails under the same conditions as [`Blend::combine`].
    fn sub(&self, other: &Self) -> Result<Self, BlendError> {
        self.combine(other, BinaryOp::Sub)
    }
}

impl Blend for f64 {
    fn combine(&self, other: &Self, op: BinaryOp) -> Result<Self, BlendError> {
        Ok(op.apply(*self, *other))
    }

    fn scale(&self, scalar: f64) -> Self {
        self * scalar
    }
}
