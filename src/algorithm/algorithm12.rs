//! Sparse ⊙ scalar with dense output.

use crate::algorithm::{ElementOps, apply_ordered};
use crate::error::Result;
use crate::matrix::{DenseMatrix, SparseMatrix};
use crate::parallel;
use crate::value::Value;

/// Apply `f(s, b)` (or `f(b, s)` with `invert`) at every position, reading
/// gaps as zero.
pub fn algorithm12(
    sparse: &SparseMatrix,
    scalar: &Value,
    ops: &dyn ElementOps,
    invert: bool,
) -> Result<DenseMatrix> {
    let [rows, cols] = sparse.size();
    tracing::trace!(op = ops.name(), rows, cols, nnz = sparse.nnz(), "algorithm12");

    let slots = sparse.scatter();
    let zero = Value::zero();
    let data = parallel::map_indexed(rows * cols, ops.parallel_threshold(), |k| {
        let s = slots[k].unwrap_or(&zero);
        apply_ordered(ops, s, scalar, invert).map_err(|e| e.at(&[k / cols, k % cols]))
    })?;
    Ok(DenseMatrix::from_parts(data, vec![rows, cols]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithm::testing::*;

    #[test]
    fn fills_every_position() {
        let s = sparse(&[&[2.0, 0.0], &[0.0, 3.0]]);
        let out = algorithm12(&s, &Value::Number(1.0), &add(), false).unwrap();
        assert_eq!(numbers(&out), vec![3.0, 1.0, 1.0, 4.0]);
        let out = algorithm12(&s, &Value::Number(1.0), &subtract(), true).unwrap();
        assert_eq!(numbers(&out), vec![-1.0, 1.0, 1.0, -2.0]);
    }

    #[test]
    fn empty_matrix() {
        let s = SparseMatrix::empty(0, 3);
        let out = algorithm12(&s, &Value::Number(1.0), &add(), false).unwrap();
        assert_eq!(out.size(), &[0, 3]);
    }
}
