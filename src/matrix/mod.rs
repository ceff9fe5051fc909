//! Matrix module: dense and sparse storage types.

pub mod dense;
pub use dense::DenseMatrix;
pub mod sparse;
pub use sparse::{SparseBuilder, SparseMatrix};
