//! Dense ⊙ scalar.

use crate::algorithm::{ElementOps, apply_ordered, unravel};
use crate::error::Result;
use crate::matrix::DenseMatrix;
use crate::parallel;
use crate::value::Value;

/// Apply `f(d, b)` (or `f(b, d)` with `invert`) to every element.
pub fn algorithm14(
    dense: &DenseMatrix,
    scalar: &Value,
    ops: &dyn ElementOps,
    invert: bool,
) -> Result<DenseMatrix> {
    tracing::trace!(op = ops.name(), size = ?dense.size(), "algorithm14");
    let xs = dense.data();
    let data = parallel::map_indexed(dense.len(), ops.parallel_threshold(), |k| {
        apply_ordered(ops, &xs[k], scalar, invert).map_err(|e| e.at(&unravel(k, dense.size())))
    })?;
    Ok(DenseMatrix::from_parts(data, dense.size().to_vec()))
}
