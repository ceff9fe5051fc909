// SparseMatrix storage (CSC) and its incremental builder

use faer::sparse::{
    SparseColMat,         // owning numeric CSC
    SymbolicSparseColMat, // owning symbolic CSC
};

use crate::core::traits::{MatShape, MatrixGet};
use crate::error::{MathError, Result};
use crate::matrix::DenseMatrix;
use crate::value::Value;

/// Compressed sparse column matrix.
///
/// `values[ptr[c]..ptr[c + 1]]` are the stored entries of column `c`, with
/// their row numbers in the matching range of `index`, strictly ascending.
#[derive(Debug, Clone, PartialEq)]
pub struct SparseMatrix {
    values: Vec<Value>,
    index: Vec<usize>,
    ptr: Vec<usize>,
    size: [usize; 2],
}

impl SparseMatrix {
    /// An all-zero matrix.
    pub fn empty(rows: usize, cols: usize) -> Self {
        Self {
            values: Vec::new(),
            index: Vec::new(),
            ptr: vec![0; cols + 1],
            size: [rows, cols],
        }
    }

    /// Build from raw CSC arrays, validating the structure.
    pub fn from_raw(
        rows: usize,
        cols: usize,
        ptr: Vec<usize>,
        index: Vec<usize>,
        values: Vec<Value>,
    ) -> Result<Self> {
        let bad = |msg: String| Err(MathError::InvalidSparseStructure(msg));
        if ptr.len() != cols + 1 {
            return bad(format!("column pointer length {} for {} columns", ptr.len(), cols));
        }
        if index.len() != values.len() {
            return bad(format!("{} row indices for {} values", index.len(), values.len()));
        }
        if ptr[0] != 0 || ptr[cols] != values.len() {
            return bad(format!("column pointers must span 0..{}", values.len()));
        }
        if let Some(c) = ptr.windows(2).position(|w| w[0] > w[1]) {
            return bad(format!("column pointers decrease at column {c}"));
        }
        for c in 0..cols {
            let column = &index[ptr[c]..ptr[c + 1]];
            if column.iter().any(|&r| r >= rows) {
                return bad(format!("row index out of range in column {c}"));
            }
            if column.windows(2).any(|w| w[0] >= w[1]) {
                return bad(format!("row indices of column {c} are not strictly increasing"));
            }
        }
        Ok(Self { values, index, ptr, size: [rows, cols] })
    }

    /// Build from a dense-like source, omitting cells for which `is_empty`
    /// holds.
    pub fn build(
        rows: usize,
        cols: usize,
        mut cell: impl FnMut(usize, usize) -> Result<Value>,
        mut is_empty: impl FnMut(&Value) -> Result<bool>,
    ) -> Result<Self> {
        let mut builder = SparseBuilder::new(rows, cols);
        for c in 0..cols {
            for r in 0..rows {
                let v = cell(r, c)?;
                if !is_empty(&v)? {
                    builder.push(r, v);
                }
            }
            builder.finish_column();
        }
        Ok(builder.freeze())
    }

    /// Convert a 2-D dense matrix, dropping empty cells.
    pub fn from_dense(
        dense: &DenseMatrix,
        is_empty: impl FnMut(&Value) -> Result<bool>,
    ) -> Result<Self> {
        if !dense.is_2d() {
            return Err(MathError::DimensionMismatch {
                left: dense.size().to_vec(),
                right: vec![dense.nrows(), dense.ncols()],
            });
        }
        let (rows, cols) = (dense.size()[0], dense.size()[1]);
        Self::build(rows, cols, |r, c| Ok(dense.get2(r, c).clone()), is_empty)
    }

    pub fn size(&self) -> [usize; 2] {
        self.size
    }

    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn index(&self) -> &[usize] {
        &self.index
    }

    pub fn ptr(&self) -> &[usize] {
        &self.ptr
    }

    /// Stored entries of column `col` as `(row, value)` pairs.
    pub fn column(&self, col: usize) -> impl Iterator<Item = (usize, &Value)> + '_ {
        let range = self.ptr[col]..self.ptr[col + 1];
        self.index[range.clone()].iter().copied().zip(&self.values[range])
    }

    /// The stored entry at `(row, col)`, if any.
    pub fn get_stored(&self, row: usize, col: usize) -> Option<&Value> {
        if row >= self.size[0] || col >= self.size[1] {
            return None;
        }
        let (start, end) = (self.ptr[col], self.ptr[col + 1]);
        self.index[start..end]
            .binary_search(&row)
            .ok()
            .map(|k| &self.values[start + k])
    }

    /// Value at `(row, col)`; implicit entries read as zero.
    pub fn get(&self, row: usize, col: usize) -> Result<Value> {
        if row >= self.size[0] || col >= self.size[1] {
            return Err(MathError::IndexOutOfBounds {
                index: vec![row, col],
                size: self.size.to_vec(),
            });
        }
        Ok(self.get_stored(row, col).cloned().unwrap_or_else(Value::zero))
    }

    pub fn to_dense(&self) -> DenseMatrix {
        let [rows, cols] = self.size;
        let mut data = vec![Value::zero(); rows * cols];
        for c in 0..cols {
            for (r, v) in self.column(c) {
                data[r * cols + c] = v.clone();
            }
        }
        DenseMatrix::from_parts(data, vec![rows, cols])
    }

    /// Scatter the stored entries into a row-major slot table.
    pub(crate) fn scatter(&self) -> Vec<Option<&Value>> {
        let [rows, cols] = self.size;
        let mut slots = vec![None; rows * cols];
        for c in 0..cols {
            for (r, v) in self.column(c) {
                slots[r * cols + c] = Some(v);
            }
        }
        slots
    }

    /// Copy into a `faer` CSC matrix. Only real scalars convert.
    pub fn to_faer(&self) -> Result<SparseColMat<usize, f64>> {
        let values = self
            .values
            .iter()
            .map(|v| {
                v.to_f64().ok_or_else(|| MathError::ConversionFailed {
                    from: v.type_tag().name(),
                    to: "f64",
                    reason: format!("{v} is not a real scalar"),
                })
            })
            .collect::<Result<Vec<f64>>>()?;
        // second argument `None` means no separate per-column counts
        let symbolic = SymbolicSparseColMat::new_checked(
            self.size[0],
            self.size[1],
            self.ptr.clone(),
            None,
            self.index.clone(),
        );
        Ok(SparseColMat::new(symbolic, values))
    }
}

impl MatShape for SparseMatrix {
    fn size(&self) -> Vec<usize> {
        self.size.to_vec()
    }
    fn nrows(&self) -> usize {
        self.size[0]
    }
    fn ncols(&self) -> usize {
        self.size[1]
    }
}

impl MatrixGet for SparseMatrix {
    fn get_value(&self, index: &[usize]) -> Result<Value> {
        match index {
            [r, c] => self.get(*r, *c),
            _ => Err(MathError::IndexOutOfBounds {
                index: index.to_vec(),
                size: self.size.to_vec(),
            }),
        }
    }
}

/// Column-by-column construction of a `SparseMatrix`.
///
/// Entries of the current column must be pushed in ascending row order;
/// `finish_column` closes the column, and `freeze` is valid once every column
/// has been closed.
#[derive(Debug)]
pub struct SparseBuilder {
    values: Vec<Value>,
    index: Vec<usize>,
    ptr: Vec<usize>,
    size: [usize; 2],
}

impl SparseBuilder {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self::with_capacity(rows, cols, 0)
    }

    pub fn with_capacity(rows: usize, cols: usize, nnz: usize) -> Self {
        let mut ptr = Vec::with_capacity(cols + 1);
        ptr.push(0);
        Self {
            values: Vec::with_capacity(nnz),
            index: Vec::with_capacity(nnz),
            ptr,
            size: [rows, cols],
        }
    }

    pub fn push(&mut self, row: usize, value: Value) {
        debug_assert!(row < self.size[0]);
        debug_assert!(
            self.index.len() == self.ptr[self.ptr.len() - 1] || self.index.last() < Some(&row),
            "rows must be pushed in ascending order"
        );
        self.index.push(row);
        self.values.push(value);
    }

    pub fn finish_column(&mut self) {
        self.ptr.push(self.values.len());
    }

    pub fn freeze(self) -> SparseMatrix {
        debug_assert_eq!(self.ptr.len(), self.size[1] + 1, "unfinished columns");
        SparseMatrix {
            values: self.values,
            index: self.index,
            ptr: self.ptr,
            size: self.size,
        }
    }
}
