//! Element-wise binary algorithms over dense and sparse storage.
//!
//! Each algorithm covers one pairing of storage kinds:
//!
//! | left   | right  | algorithm | result |
//! |--------|--------|-----------|--------|
//! | sparse | sparse | 05        | sparse |
//! | dense  | sparse | 02        | sparse |
//! | dense  | sparse | 03        | dense  |
//! | dense  | dense  | 13        | dense  |
//! | sparse | scalar | 11        | sparse |
//! | sparse | scalar | 12        | dense  |
//! | dense  | scalar | 14        | dense  |
//!
//! 02 and 11 only visit stored entries and are valid when the operation maps
//! the sparse operand's implicit zeros to zero. Operands may be passed
//! swapped; `invert` then means the element function is called as `f(y, x)`.

pub mod algorithm02;
pub mod algorithm03;
pub mod algorithm05;
pub mod algorithm11;
pub mod algorithm12;
pub mod algorithm13;
pub mod algorithm14;

pub use algorithm02::algorithm02;
pub use algorithm03::algorithm03;
pub use algorithm05::algorithm05;
pub use algorithm11::algorithm11;
pub use algorithm12::algorithm12;
pub use algorithm13::algorithm13;
pub use algorithm14::algorithm14;

use bitflags::bitflags;

use crate::error::{MathError, Result};
use crate::matrix::SparseMatrix;
use crate::value::Value;

bitflags! {
    /// How an operation behaves on zero operands.
    #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
    pub struct ZeroFlags: u8 {
        /// `f(0, y) == 0` for every `y`.
        const LEFT_ZERO_PRESERVING  = 1 << 0;
        /// `f(x, 0) == 0` for every `x`.
        const RIGHT_ZERO_PRESERVING = 1 << 1;
        const ZERO_PRESERVING = Self::LEFT_ZERO_PRESERVING.bits() | Self::RIGHT_ZERO_PRESERVING.bits();
        /// `f(0, 0)` has no value.
        const UNDEFINED_AT_ZERO     = 1 << 2;
    }
}

/// Element operation seen by the algorithms.
pub trait ElementOps: Sync {
    /// Apply the operation to one element pair.
    fn apply(&self, x: &Value, y: &Value) -> Result<Value>;
    /// Zero test used to drop results from sparse output.
    fn is_zero(&self, v: &Value) -> Result<bool>;
    fn flags(&self) -> ZeroFlags;
    fn name(&self) -> &str;
    /// Element count from which dense walks go parallel.
    fn parallel_threshold(&self) -> usize {
        usize::MAX
    }
}

#[inline]
pub(crate) fn apply_ordered(
    ops: &dyn ElementOps,
    x: &Value,
    y: &Value,
    invert: bool,
) -> Result<Value> {
    if invert { ops.apply(y, x) } else { ops.apply(x, y) }
}

pub(crate) fn check_same_size(left: &[usize], right: &[usize]) -> Result<()> {
    if left != right {
        return Err(MathError::DimensionMismatch {
            left: left.to_vec(),
            right: right.to_vec(),
        });
    }
    Ok(())
}

/// Multi-index of flat row-major offset `k`.
pub(crate) fn unravel(mut k: usize, size: &[usize]) -> Vec<usize> {
    let mut index = vec![0; size.len()];
    for (slot, &n) in index.iter_mut().zip(size).rev() {
        if n > 0 {
            *slot = k % n;
            k /= n;
        }
    }
    index
}

/// Column-major position of the first implicit entry, if any.
pub(crate) fn first_gap(m: &SparseMatrix) -> Option<[usize; 2]> {
    let [rows, cols] = m.size();
    for c in 0..cols {
        let mut expected = 0;
        for (r, _) in m.column(c) {
            if r != expected {
                return Some([expected, c]);
            }
            expected = r + 1;
        }
        if expected < rows {
            return Some([expected, c]);
        }
    }
    None
}

/// Evaluate `f(0, b)` (or `f(b, 0)`) once and require a zero result.
pub(crate) fn probe_zero(
    ops: &dyn ElementOps,
    other: &Value,
    invert: bool,
    position: &[usize],
) -> Result<()> {
    let v = apply_ordered(ops, &Value::zero(), other, invert).map_err(|e| e.at(position))?;
    if !ops.is_zero(&v)? {
        return Err(MathError::NotZeroPreserving { op: ops.name().to_string() });
    }
    Ok(())
}
