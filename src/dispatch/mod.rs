//! Typed multiple dispatch.
//!
//! - [`signature`]: parameter type sets and their text form.
//! - [`conversion`]: the ordered table of implicit conversions.
//! - [`typed`]: typed functions, signature resolution and its cache.

pub mod conversion;
pub mod signature;
pub mod typed;

pub use conversion::{CONVERSIONS, Conversion};
pub use signature::{Param, Signature, TypeSet};
pub use typed::{Implementation, Resolution, TypedFunction, TypedFunctionBuilder};
