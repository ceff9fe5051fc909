//! Contexts for evaluating operations.
//!
//! - [`capabilities`]: collaborators injected into every operation.
//! - [`op_context`]: the per-invocation context handed to implementations.
//! - [`math_context`]: the builder and the frozen set of generic operations.
//!
//! # Example
//! ```rust,ignore
//! use polymat::{MathContextBuilder, MathOptions, Value};
//! let math = MathContextBuilder::new(MathOptions::default()).with_defaults().build()?;
//! let r = math.modulo(&Value::Number(8.0), &Value::Number(3.0))?;
//! ```

pub mod capabilities;
pub mod math_context;
pub mod op_context;

pub use capabilities::{Capabilities, Capability};
pub use math_context::{MathContext, MathContextBuilder};
pub use op_context::{ElementKernel, OperationContext};
