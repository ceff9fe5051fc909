//! Core traits shared by the storage types.

pub mod traits;
pub use traits::{MatShape, MatrixGet};
