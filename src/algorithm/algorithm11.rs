//! Sparse ⊙ scalar with sparse output.

use crate::algorithm::{ElementOps, apply_ordered, first_gap, probe_zero};
use crate::error::Result;
use crate::matrix::{SparseBuilder, SparseMatrix};
use crate::value::Value;

/// Apply `f(s, b)` (or `f(b, s)` with `invert`) to the stored entries only.
///
/// Gaps are assumed to map to zero. When the matrix has gaps the assumption
/// is checked once by evaluating the operation on a zero; errors from that
/// probe carry the position of the first gap.
pub fn algorithm11(
    sparse: &SparseMatrix,
    scalar: &Value,
    ops: &dyn ElementOps,
    invert: bool,
) -> Result<SparseMatrix> {
    let [rows, cols] = sparse.size();
    tracing::trace!(op = ops.name(), rows, cols, nnz = sparse.nnz(), "algorithm11");

    if let Some(gap) = first_gap(sparse) {
        probe_zero(ops, scalar, invert, &gap)?;
    }

    let mut out = SparseBuilder::with_capacity(rows, cols, sparse.nnz());
    for c in 0..cols {
        for (r, s) in sparse.column(c) {
            let v = apply_ordered(ops, s, scalar, invert).map_err(|e| e.at(&[r, c]))?;
            if !ops.is_zero(&v)? {
                out.push(r, v);
            }
        }
        out.finish_column();
    }
    Ok(out.freeze())
}
