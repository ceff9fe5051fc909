//! Core matrix traits for polymat.

use crate::error::Result;
use crate::value::Value;

/// Shape queries shared by dense and sparse storage.
pub trait MatShape {
    /// Size per dimension.
    fn size(&self) -> Vec<usize>;
    /// Number of rows (first dimension).
    fn nrows(&self) -> usize;
    /// Number of columns (second dimension, 1 for vectors).
    fn ncols(&self) -> usize;
}

/// Uniform element access into dense or sparse storage.
pub trait MatrixGet {
    /// Value at `index`; implicit sparse entries read as zero.
    fn get_value(&self, index: &[usize]) -> Result<Value>;
}
