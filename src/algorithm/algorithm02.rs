//! Dense ⊙ sparse with sparse output.

use crate::algorithm::{ElementOps, ZeroFlags, apply_ordered, check_same_size};
use crate::error::{MathError, Result};
use crate::matrix::{DenseMatrix, SparseBuilder, SparseMatrix};

/// Combine a dense and a sparse matrix visiting only the sparse nonzeros.
///
/// Computes `f(dense, sparse)`, or `f(sparse, dense)` when `invert` is set.
/// Valid for operations that map the sparse operand's implicit zeros to zero.
/// Zero results are not stored. When the operation is undefined at zero, a gap
/// facing a zero dense value fails with `UndefinedAtZero`.
pub fn algorithm02(
    dense: &DenseMatrix,
    sparse: &SparseMatrix,
    ops: &dyn ElementOps,
    invert: bool,
) -> Result<SparseMatrix> {
    let size = sparse.size();
    if invert {
        check_same_size(&size, dense.size())?;
    } else {
        check_same_size(dense.size(), &size)?;
    }
    let [rows, cols] = size;
    tracing::trace!(op = ops.name(), rows, cols, nnz = sparse.nnz(), "algorithm02");

    if ops.flags().contains(ZeroFlags::UNDEFINED_AT_ZERO) {
        check_gaps(dense, sparse, ops)?;
    }

    let mut out = SparseBuilder::with_capacity(rows, cols, sparse.nnz());
    for c in 0..cols {
        for (r, s) in sparse.column(c) {
            let v = apply_ordered(ops, dense.get2(r, c), s, invert).map_err(|e| e.at(&[r, c]))?;
            if !ops.is_zero(&v)? {
                out.push(r, v);
            }
        }
        out.finish_column();
    }
    Ok(out.freeze())
}

fn check_gaps(dense: &DenseMatrix, sparse: &SparseMatrix, ops: &dyn ElementOps) -> Result<()> {
    let [rows, cols] = sparse.size();
    for c in 0..cols {
        let mut stored = sparse.column(c).map(|(r, _)| r).peekable();
        for r in 0..rows {
            if stored.next_if_eq(&r).is_some() {
                continue;
            }
            if ops.is_zero(dense.get2(r, c))? {
                return Err(MathError::UndefinedAtZero {
                    op: ops.name().to_string(),
                    position: Some(vec![r, c]),
                });
            }
        }
    }
    Ok(())
}
