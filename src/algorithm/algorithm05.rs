//! Sparse ⊙ sparse.

use std::cmp::Ordering;

use crate::algorithm::{ElementOps, ZeroFlags, check_same_size};
use crate::error::{MathError, Result};
use crate::matrix::{SparseBuilder, SparseMatrix};
use crate::value::Value;

/// Merge two sparse matrices over the union of their patterns.
///
/// Positions stored in only one operand see zero on the other side. Positions
/// stored in neither stay implicit, which requires `f(0, 0) == 0`: it is
/// probed once at the first such gap, and operations undefined at zero fail
/// there instead. Zero results are not stored.
pub fn algorithm05(a: &SparseMatrix, b: &SparseMatrix, ops: &dyn ElementOps) -> Result<SparseMatrix> {
    check_same_size(&a.size(), &b.size())?;
    let [rows, cols] = a.size();
    tracing::trace!(op = ops.name(), rows, cols, nnz_a = a.nnz(), nnz_b = b.nnz(), "algorithm05");

    let undefined = ops.flags().contains(ZeroFlags::UNDEFINED_AT_ZERO);
    let zero = Value::zero();
    let mut gap_checked = false;
    let mut on_gap = |r: usize, c: usize| -> Result<()> {
        if undefined {
            return Err(MathError::UndefinedAtZero {
                op: ops.name().to_string(),
                position: Some(vec![r, c]),
            });
        }
        if !gap_checked {
            let v = ops.apply(&zero, &zero).map_err(|e| e.at(&[r, c]))?;
            if !ops.is_zero(&v)? {
                return Err(MathError::NotZeroPreserving { op: ops.name().to_string() });
            }
            gap_checked = true;
        }
        Ok(())
    };

    let mut out = SparseBuilder::with_capacity(rows, cols, a.nnz().max(b.nnz()));
    for c in 0..cols {
        let mut xa = a.column(c).peekable();
        let mut xb = b.column(c).peekable();
        let mut expected = 0;
        loop {
            let (r, v) = match (xa.peek(), xb.peek()) {
                (None, None) => break,
                (Some(&(ra, va)), None) => {
                    xa.next();
                    (ra, ops.apply(va, &zero))
                }
                (None, Some(&(rb, vb))) => {
                    xb.next();
                    (rb, ops.apply(&zero, vb))
                }
                (Some(&(ra, va)), Some(&(rb, vb))) => match ra.cmp(&rb) {
                    Ordering::Less => {
                        xa.next();
                        (ra, ops.apply(va, &zero))
                    }
                    Ordering::Greater => {
                        xb.next();
                        (rb, ops.apply(&zero, vb))
                    }
                    Ordering::Equal => {
                        xa.next();
                        xb.next();
                        (ra, ops.apply(va, vb))
                    }
                },
            };
            if r > expected {
                on_gap(expected, c)?;
            }
            expected = r + 1;
            let v = v.map_err(|e| e.at(&[r, c]))?;
            if !ops.is_zero(&v)? {
                out.push(r, v);
            }
        }
        if expected < rows {
            on_gap(expected, c)?;
        }
        out.finish_column();
    }
    Ok(out.freeze())
}
