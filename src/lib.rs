//! polymat: typed multiple dispatch over dense and sparse matrices
//!
//! Generic operations such as `mod` or `add` are called by name on
//! heterogeneous values (numbers, BigNumbers, fractions, complex numbers,
//! units, nested arrays, dense and sparse matrices). The typed-function
//! registry picks the implementation for the runtime argument types, and
//! matrix operands go through a family of sparsity-aware element-wise
//! algorithms.

pub mod parallel;

pub mod algorithm;
pub mod config;
pub mod context;
pub mod core;
pub mod dispatch;
pub mod error;
pub mod matrix;
pub mod operation;
pub mod utils;
pub mod value;

// Re-exports for convenience
pub use algorithm::{ElementOps, ZeroFlags};
pub use config::*;
pub use context::*;
pub use crate::core::*;
pub use dispatch::{Signature, TypedFunction, TypedFunctionBuilder};
pub use error::*;
pub use matrix::*;
pub use operation::{ElementwiseDef, MatrixPlan, Operation};
pub use utils::*;
pub use value::*;
