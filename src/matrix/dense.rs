//! Dense matrix storage.
//!
//! `DenseMatrix` keeps its elements in one flat row-major buffer next to its
//! shape, so element-wise kernels can walk the buffer directly. It converts
//! from and to nested arrays and, for 2-D numeric content, to `faer::Mat<f64>`.

use faer::Mat;

use crate::core::traits::{MatShape, MatrixGet};
use crate::error::{MathError, Result};
use crate::value::Value;

#[derive(Debug, Clone, PartialEq)]
pub struct DenseMatrix {
    data: Vec<Value>,
    size: Vec<usize>,
}

impl DenseMatrix {
    /// Build from a row-major buffer. The buffer length must equal the
    /// product of `size`, and `size` needs at least one dimension.
    pub fn new(data: Vec<Value>, size: Vec<usize>) -> Result<Self> {
        if size.is_empty() || data.len() != size.iter().product::<usize>() {
            return Err(MathError::DimensionMismatch {
                left: vec![data.len()],
                right: size,
            });
        }
        Ok(Self { data, size })
    }

    /// Wrap a buffer already known to match `size`.
    pub(crate) fn from_parts(data: Vec<Value>, size: Vec<usize>) -> Self {
        debug_assert_eq!(data.len(), size.iter().product::<usize>());
        Self { data, size }
    }

    /// A 2-D matrix with every element produced by `f(row, col)`.
    pub fn from_fn(rows: usize, cols: usize, mut f: impl FnMut(usize, usize) -> Value) -> Self {
        let mut data = Vec::with_capacity(rows * cols);
        for i in 0..rows {
            for j in 0..cols {
                data.push(f(i, j));
            }
        }
        Self { data, size: vec![rows, cols] }
    }

    /// A matrix of the given size with every element set to `value`.
    pub fn filled(size: Vec<usize>, value: Value) -> Result<Self> {
        let len = size.iter().product();
        Self::new(vec![value; len], size)
    }

    /// Infer the shape from the nesting of `items` and flatten them.
    pub fn from_array(items: &[Value]) -> Result<Self> {
        let mut size = vec![items.len()];
        let mut probe = items.first();
        while let Some(Value::Array(inner)) = probe {
            size.push(inner.len());
            probe = inner.first();
        }
        let mut data = Vec::with_capacity(size.iter().product());
        flatten(items, &size, 0, &mut data)?;
        Ok(Self { data, size })
    }

    /// Nested array form, the inverse of `from_array`.
    pub fn to_array(&self) -> Value {
        nest(&self.data, &self.size)
    }

    pub fn size(&self) -> &[usize] {
        &self.size
    }

    pub fn data(&self) -> &[Value] {
        &self.data
    }

    pub fn into_data(self) -> Vec<Value> {
        self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn is_2d(&self) -> bool {
        self.size.len() == 2
    }

    pub fn get(&self, index: &[usize]) -> Result<&Value> {
        let offset = self.offset(index)?;
        Ok(&self.data[offset])
    }

    /// Overwrite one element; only used while constructing a matrix.
    pub fn set(&mut self, index: &[usize], value: Value) -> Result<()> {
        let offset = self.offset(index)?;
        self.data[offset] = value;
        Ok(())
    }

    /// Element of a 2-D matrix without bounds reporting.
    pub(crate) fn get2(&self, row: usize, col: usize) -> &Value {
        &self.data[row * self.size[1] + col]
    }

    /// Apply `f` to every element, keeping the shape.
    pub fn map(&self, mut f: impl FnMut(&Value) -> Result<Value>) -> Result<DenseMatrix> {
        let data = self.data.iter().map(&mut f).collect::<Result<Vec<_>>>()?;
        Ok(Self { data, size: self.size.clone() })
    }

    /// Copy into a `faer` matrix. Only 2-D matrices of real scalars convert.
    pub fn to_faer(&self) -> Result<Mat<f64>> {
        if !self.is_2d() {
            return Err(MathError::DimensionMismatch {
                left: self.size.clone(),
                right: vec![self.nrows(), self.ncols()],
            });
        }
        let values = self
            .data
            .iter()
            .map(|v| {
                v.to_f64().ok_or_else(|| MathError::ConversionFailed {
                    from: v.type_tag().name(),
                    to: "f64",
                    reason: format!("{v} is not a real scalar"),
                })
            })
            .collect::<Result<Vec<f64>>>()?;
        let cols = self.size[1];
        Ok(Mat::from_fn(self.size[0], cols, |i, j| values[i * cols + j]))
    }

    pub fn from_faer(mat: &Mat<f64>) -> Self {
        Self::from_fn(mat.nrows(), mat.ncols(), |i, j| Value::Number(mat[(i, j)]))
    }

    fn offset(&self, index: &[usize]) -> Result<usize> {
        let out_of_bounds = || MathError::IndexOutOfBounds {
            index: index.to_vec(),
            size: self.size.clone(),
        };
        if index.len() != self.size.len() {
            return Err(out_of_bounds());
        }
        let mut offset = 0;
        for (&i, &n) in index.iter().zip(&self.size) {
            if i >= n {
                return Err(out_of_bounds());
            }
            offset = offset * n + i;
        }
        Ok(offset)
    }
}

fn flatten(items: &[Value], size: &[usize], depth: usize, out: &mut Vec<Value>) -> Result<()> {
    if items.len() != size[depth] {
        return Err(MathError::RaggedArray {
            depth,
            expected: size[depth],
            got: items.len(),
        });
    }
    let leaf = depth + 1 == size.len();
    for item in items {
        match (item, leaf) {
            (Value::Array(inner), false) => flatten(inner, size, depth + 1, out)?,
            (Value::Array(inner), true) => {
                return Err(MathError::RaggedArray {
                    depth: depth + 1,
                    expected: 0,
                    got: inner.len(),
                });
            }
            (_, false) => {
                return Err(MathError::RaggedArray {
                    depth: depth + 1,
                    expected: size[depth + 1],
                    got: 0,
                });
            }
            (scalar, true) => out.push(scalar.clone()),
        }
    }
    Ok(())
}

fn nest(data: &[Value], size: &[usize]) -> Value {
    if size.len() == 1 {
        return Value::Array(data.to_vec());
    }
    let stride: usize = size[1..].iter().product();
    let rows = (0..size[0])
        .map(|i| nest(&data[i * stride..(i + 1) * stride], &size[1..]))
        .collect();
    Value::Array(rows)
}

impl MatShape for DenseMatrix {
    fn size(&self) -> Vec<usize> {
        self.size.clone()
    }
    fn nrows(&self) -> usize {
        self.size.first().copied().unwrap_or(0)
    }
    fn ncols(&self) -> usize {
        self.size.get(1).copied().unwrap_or(1)
    }
}

impl MatrixGet for DenseMatrix {
    fn get_value(&self, index: &[usize]) -> Result<Value> {
        self.get(index).cloned()
    }
}
