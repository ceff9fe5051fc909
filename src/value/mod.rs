//! Runtime values and their type tags.
//!
//! Every operand handed to a typed function is a `Value`. Dispatch only looks
//! at `Value::type_tag`, never at the payload.

pub mod bignumber;
pub mod unit;

pub use bignumber::BigNumber;
pub use unit::{BasicUnits, Dimension, Unit, UnitDef, UnitSystem};

use std::fmt;

use num_complex::Complex64;
use num_rational::BigRational;
use num_traits::{ToPrimitive, Zero};

use crate::matrix::{DenseMatrix, SparseMatrix};

/// Concrete runtime type of a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TypeTag {
    Boolean,
    Number,
    BigNumber,
    Fraction,
    Complex,
    String,
    Unit,
    Array,
    DenseMatrix,
    SparseMatrix,
}

impl TypeTag {
    pub const ALL: [TypeTag; 10] = [
        TypeTag::Boolean,
        TypeTag::Number,
        TypeTag::BigNumber,
        TypeTag::Fraction,
        TypeTag::Complex,
        TypeTag::String,
        TypeTag::Unit,
        TypeTag::Array,
        TypeTag::DenseMatrix,
        TypeTag::SparseMatrix,
    ];

    /// Name used in signature text.
    pub fn name(self) -> &'static str {
        match self {
            TypeTag::Boolean => "boolean",
            TypeTag::Number => "number",
            TypeTag::BigNumber => "BigNumber",
            TypeTag::Fraction => "Fraction",
            TypeTag::Complex => "Complex",
            TypeTag::String => "string",
            TypeTag::Unit => "Unit",
            TypeTag::Array => "Array",
            TypeTag::DenseMatrix => "DenseMatrix",
            TypeTag::SparseMatrix => "SparseMatrix",
        }
    }

    pub fn from_name(name: &str) -> Option<TypeTag> {
        TypeTag::ALL.into_iter().find(|t| t.name() == name)
    }

    pub fn is_matrix(self) -> bool {
        matches!(self, TypeTag::DenseMatrix | TypeTag::SparseMatrix)
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A dynamically typed operand or result.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Boolean(bool),
    Number(f64),
    BigNumber(BigNumber),
    Fraction(BigRational),
    Complex(Complex64),
    String(String),
    Unit(Unit),
    /// Nested array; rows are `Value::Array` themselves.
    Array(Vec<Value>),
    DenseMatrix(DenseMatrix),
    SparseMatrix(SparseMatrix),
}

impl Value {
    /// The implicit value of a sparse matrix gap.
    pub fn zero() -> Value {
        Value::Number(0.0)
    }

    pub fn type_tag(&self) -> TypeTag {
        match self {
            Value::Boolean(_) => TypeTag::Boolean,
            Value::Number(_) => TypeTag::Number,
            Value::BigNumber(_) => TypeTag::BigNumber,
            Value::Fraction(_) => TypeTag::Fraction,
            Value::Complex(_) => TypeTag::Complex,
            Value::String(_) => TypeTag::String,
            Value::Unit(_) => TypeTag::Unit,
            Value::Array(_) => TypeTag::Array,
            Value::DenseMatrix(_) => TypeTag::DenseMatrix,
            Value::SparseMatrix(_) => TypeTag::SparseMatrix,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_bignumber(&self) -> Option<&BigNumber> {
        match self {
            Value::BigNumber(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_fraction(&self) -> Option<&BigRational> {
        match self {
            Value::Fraction(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_complex(&self) -> Option<Complex64> {
        match self {
            Value::Complex(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_unit(&self) -> Option<&Unit> {
        match self {
            Value::Unit(u) => Some(u),
            _ => None,
        }
    }

    pub fn as_dense(&self) -> Option<&DenseMatrix> {
        match self {
            Value::DenseMatrix(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_sparse(&self) -> Option<&SparseMatrix> {
        match self {
            Value::SparseMatrix(m) => Some(m),
            _ => None,
        }
    }

    /// Lossy conversion of real scalars to `f64`.
    pub fn to_f64(&self) -> Option<f64> {
        match self {
            Value::Boolean(b) => Some(if *b { 1.0 } else { 0.0 }),
            Value::Number(v) => Some(*v),
            Value::BigNumber(v) => Some(v.to_f64()),
            Value::Fraction(v) => v.to_f64(),
            Value::Complex(c) if c.im.is_zero() => Some(c.re),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Boolean(b) => write!(f, "{b}"),
            Value::Number(v) => write!(f, "{v}"),
            Value::BigNumber(v) => write!(f, "{v}"),
            Value::Fraction(v) => write!(f, "{v}"),
            Value::Complex(c) => write!(f, "{c}"),
            Value::String(s) => write!(f, "{s:?}"),
            Value::Unit(u) => write!(f, "{u}"),
            Value::Array(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Value::DenseMatrix(m) => write!(f, "{}", m.to_array()),
            Value::SparseMatrix(m) => write!(f, "{}", m.to_dense().to_array()),
        }
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Number(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Boolean(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<BigNumber> for Value {
    fn from(v: BigNumber) -> Self {
        Value::BigNumber(v)
    }
}

impl From<BigRational> for Value {
    fn from(v: BigRational) -> Self {
        Value::Fraction(v)
    }
}

impl From<Complex64> for Value {
    fn from(v: Complex64) -> Self {
        Value::Complex(v)
    }
}

impl From<Unit> for Value {
    fn from(v: Unit) -> Self {
        Value::Unit(v)
    }
}

impl From<DenseMatrix> for Value {
    fn from(v: DenseMatrix) -> Self {
        Value::DenseMatrix(v)
    }
}

impl From<SparseMatrix> for Value {
    fn from(v: SparseMatrix) -> Self {
        Value::SparseMatrix(v)
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Value::Array(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_names_round_trip() {
        for tag in TypeTag::ALL {
            assert_eq!(TypeTag::from_name(tag.name()), Some(tag));
        }
        assert_eq!(TypeTag::from_name("Matrix"), None);
    }

    #[test]
    fn to_f64_covers_real_scalars() {
        assert_eq!(Value::Boolean(true).to_f64(), Some(1.0));
        assert_eq!(Value::BigNumber("2.5".parse().unwrap()).to_f64(), Some(2.5));
        let half = BigRational::new(1.into(), 2.into());
        assert_eq!(Value::Fraction(half).to_f64(), Some(0.5));
        assert_eq!(Value::Complex(Complex64::new(1.0, 2.0)).to_f64(), None);
        assert_eq!(Value::from("x").to_f64(), None);
    }

    #[test]
    fn display_nested_array() {
        let v = Value::Array(vec![
            Value::Array(vec![1.0.into(), 2.0.into()]),
            Value::Array(vec![3.0.into(), true.into()]),
        ]);
        assert_eq!(v.to_string(), "[[1, 2], [3, true]]");
    }
}
