use thiserror::Error;

/// Result type alias using polymat's error.
pub type Result<T> = std::result::Result<T, MathError>;

// Unified error type for polymat

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    #[error("signature '{signature}' is already registered for '{name}'")]
    DuplicateSignature { name: String, signature: String },
    #[error("operation '{0}' is already defined")]
    DuplicateOperation(String),
    #[error("unknown type '{0}' in signature")]
    UnknownType(String),
    #[error("unknown function '{0}'")]
    UnknownFunction(String),
    #[error("no signature of '{name}' matches arguments ({types})")]
    NoMatchingSignature { name: String, types: String },
    #[error("operation '{op}' requires the {capability} capability")]
    MissingCapability { op: String, capability: &'static str },
    #[error("dimension mismatch: {left:?} vs {right:?}")]
    DimensionMismatch { left: Vec<usize>, right: Vec<usize> },
    #[error("ragged array at depth {depth}: expected length {expected}, got {got}")]
    RaggedArray { depth: usize, expected: usize, got: usize },
    #[error("index {index:?} out of bounds for size {size:?}")]
    IndexOutOfBounds { index: Vec<usize>, size: Vec<usize> },
    #[error("invalid sparse structure: {0}")]
    InvalidSparseStructure(String),
    #[error("'{op}' is undefined where both operands are zero{}", position_suffix(.position))]
    UndefinedAtZero { op: String, position: Option<Vec<usize>> },
    #[error("'{op}' is declared zero-preserving but f(0, b) is not zero")]
    NotZeroPreserving { op: String },
    #[error("cannot calculate {op} for a negative divisor")]
    InvalidDivisor { op: &'static str },
    #[error("division by zero in '{op}'")]
    DivisionByZero { op: &'static str },
    #[error("cannot convert {from} to {to}: {reason}")]
    ConversionFailed { from: &'static str, to: &'static str, reason: String },
    #[error("invalid unit: {0}")]
    InvalidUnit(String),
    #[error("units {left} and {right} do not share a base")]
    UnitMismatch { left: String, right: String },
    #[error("unsupported operation: {0}")]
    Unsupported(&'static str),
}

fn position_suffix(position: &Option<Vec<usize>>) -> String {
    match position {
        Some(p) => format!(" at {p:?}"),
        None => String::new(),
    }
}

impl MathError {
    /// Attach an element position to an `UndefinedAtZero` raised by a scalar
    /// callback. Other errors pass through untouched.
    pub fn at(self, position: &[usize]) -> Self {
        match self {
            MathError::UndefinedAtZero { op, position: None } => MathError::UndefinedAtZero {
                op,
                position: Some(position.to_vec()),
            },
            other => other,
        }
    }
}
