//! Dense ⊙ sparse with dense output.

use crate::algorithm::{ElementOps, apply_ordered, check_same_size};
use crate::error::Result;
use crate::matrix::{DenseMatrix, SparseMatrix};
use crate::parallel;
use crate::value::Value;

/// Combine a dense and a sparse matrix at every position.
///
/// Computes `f(d, s)` with implicit sparse entries read as zero, or
/// `f(s, d)` when `invert` is set.
pub fn algorithm03(
    dense: &DenseMatrix,
    sparse: &SparseMatrix,
    ops: &dyn ElementOps,
    invert: bool,
) -> Result<DenseMatrix> {
    let size = sparse.size();
    if invert {
        check_same_size(&size, dense.size())?;
    } else {
        check_same_size(dense.size(), &size)?;
    }
    let [rows, cols] = size;
    tracing::trace!(op = ops.name(), rows, cols, nnz = sparse.nnz(), "algorithm03");

    let slots = sparse.scatter();
    let zero = Value::zero();
    let data = parallel::map_indexed(rows * cols, ops.parallel_threshold(), |k| {
        let s = slots[k].unwrap_or(&zero);
        apply_ordered(ops, &dense.data()[k], s, invert).map_err(|e| e.at(&[k / cols, k % cols]))
    })?;
    Ok(DenseMatrix::from_parts(data, vec![rows, cols]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithm::testing::*;
    use crate::error::MathError;

    #[test]
    fn gaps_read_as_zero() {
        let d = dense(&[&[1.0, 2.0], &[3.0, 4.0]]);
        let s = sparse(&[&[10.0, 0.0], &[0.0, 20.0]]);
        let out = algorithm03(&d, &s, &add(), false).unwrap();
        assert_eq!(numbers(&out), vec![11.0, 2.0, 3.0, 24.0]);
    }

    #[test]
    fn invert_order_matters() {
        let d = dense(&[&[1.0, 2.0]]);
        let s = sparse(&[&[10.0, 0.0]]);
        let out = algorithm03(&d, &s, &subtract(), true).unwrap();
        assert_eq!(numbers(&out), vec![9.0, -2.0]);
        let out = algorithm03(&d, &s, &subtract(), false).unwrap();
        assert_eq!(numbers(&out), vec![-9.0, 2.0]);
    }

    #[test]
    fn parallel_walk_matches_serial() {
        let d = dense(&[&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0]]);
        let s = sparse(&[&[0.0, 1.0, 0.0], &[2.0, 0.0, 0.0]]);
        let mut ops = add();
        let serial = algorithm03(&d, &s, &ops, false).unwrap();
        ops.threshold = 1;
        assert_eq!(algorithm03(&d, &s, &ops, false).unwrap(), serial);
    }

    #[test]
    fn mismatch_reported_in_call_order() {
        let d = dense(&[&[1.0, 2.0], &[3.0, 4.0], &[5.0, 6.0]]);
        let s = sparse(&[&[1.0, 0.0, 0.0], &[0.0, 2.0, 0.0]]);
        let err = algorithm03(&d, &s, &add(), true).unwrap_err();
        assert_eq!(err, MathError::DimensionMismatch { left: vec![2, 3], right: vec![3, 2] });
        let err = algorithm03(&d, &s, &add(), false).unwrap_err();
        assert_eq!(err, MathError::DimensionMismatch { left: vec![3, 2], right: vec![2, 3] });
    }

    #[test]
    fn element_error_carries_position() {
        let d = dense(&[&[1.0, 0.0]]);
        let s = sparse(&[&[1.0, 0.0]]);
        let err = algorithm03(&d, &s, &divide(), false).unwrap_err();
        assert_eq!(err, MathError::UndefinedAtZero { op: "divide".into(), position: Some(vec![0, 1]) });
    }
}
