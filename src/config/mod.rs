//! Configuration for math contexts.

pub mod options;
pub use options::MathOptions;
