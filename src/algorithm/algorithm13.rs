//! Dense ⊙ dense.

use crate::algorithm::{ElementOps, check_same_size, unravel};
use crate::error::Result;
use crate::matrix::DenseMatrix;
use crate::parallel;

/// Apply `f(a, b)` pointwise to two dense matrices of equal size.
pub fn algorithm13(a: &DenseMatrix, b: &DenseMatrix, ops: &dyn ElementOps) -> Result<DenseMatrix> {
    check_same_size(a.size(), b.size())?;
    tracing::trace!(op = ops.name(), size = ?a.size(), "algorithm13");
    let (xa, xb) = (a.data(), b.data());
    let data = parallel::map_indexed(a.len(), ops.parallel_threshold(), |k| {
        ops.apply(&xa[k], &xb[k]).map_err(|e| e.at(&unravel(k, a.size())))
    })?;
    Ok(DenseMatrix::from_parts(data, a.size().to_vec()))
}
