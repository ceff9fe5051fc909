//! Small numeric helpers shared by scalar implementations.

pub mod numeric;
pub use numeric::nearly_equal;
