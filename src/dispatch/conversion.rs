//! Implicit conversions applied when no signature matches directly.
//!
//! The table order is the preference order: for a given source type, the
//! first conversion whose target the parameter accepts is used.

use num_complex::Complex64;
use num_traits::ToPrimitive;

use crate::config::MathOptions;
use crate::error::{MathError, Result};
use crate::matrix::DenseMatrix;
use crate::value::{BigNumber, TypeTag, Value};

pub type ConvertFn = fn(&Value, &MathOptions) -> Result<Value>;

/// One implicit conversion between two types.
#[derive(Clone, Copy)]
pub struct Conversion {
    pub from: TypeTag,
    pub to: TypeTag,
    pub convert: ConvertFn,
}

impl std::fmt::Debug for Conversion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> {}", self.from, self.to)
    }
}

pub static CONVERSIONS: &[Conversion] = &[
    Conversion { from: TypeTag::Boolean, to: TypeTag::Number, convert: boolean_to_number },
    Conversion { from: TypeTag::Boolean, to: TypeTag::BigNumber, convert: boolean_to_bignumber },
    Conversion { from: TypeTag::Boolean, to: TypeTag::Fraction, convert: boolean_to_fraction },
    Conversion { from: TypeTag::Number, to: TypeTag::BigNumber, convert: number_to_bignumber },
    Conversion { from: TypeTag::Number, to: TypeTag::Fraction, convert: number_to_fraction },
    Conversion { from: TypeTag::Number, to: TypeTag::Complex, convert: number_to_complex },
    Conversion { from: TypeTag::BigNumber, to: TypeTag::Fraction, convert: bignumber_to_fraction },
    Conversion { from: TypeTag::BigNumber, to: TypeTag::Complex, convert: bignumber_to_complex },
    Conversion { from: TypeTag::Fraction, to: TypeTag::Complex, convert: fraction_to_complex },
    Conversion { from: TypeTag::String, to: TypeTag::Number, convert: string_to_number },
    Conversion { from: TypeTag::Array, to: TypeTag::DenseMatrix, convert: array_to_matrix },
    Conversion { from: TypeTag::DenseMatrix, to: TypeTag::Array, convert: matrix_to_array },
];

fn mismatch(v: &Value, to: &'static str) -> MathError {
    MathError::ConversionFailed {
        from: v.type_tag().name(),
        to,
        reason: "unexpected source value".to_string(),
    }
}

fn boolean_to_number(v: &Value, _: &MathOptions) -> Result<Value> {
    let b = v.as_bool().ok_or_else(|| mismatch(v, "number"))?;
    Ok(Value::Number(if b { 1.0 } else { 0.0 }))
}

fn boolean_to_bignumber(v: &Value, _: &MathOptions) -> Result<Value> {
    let b = v.as_bool().ok_or_else(|| mismatch(v, "BigNumber"))?;
    Ok(Value::BigNumber(BigNumber::from_i64(b as i64)))
}

fn boolean_to_fraction(v: &Value, _: &MathOptions) -> Result<Value> {
    let b = v.as_bool().ok_or_else(|| mismatch(v, "Fraction"))?;
    Ok(Value::Fraction(BigNumber::from_i64(b as i64).to_ratio()))
}

fn decimal_of(v: &Value, to: &'static str) -> Result<BigNumber> {
    let x = v.as_number().ok_or_else(|| mismatch(v, to))?;
    BigNumber::from_f64(x).ok_or_else(|| MathError::ConversionFailed {
        from: "number",
        to,
        reason: format!("{x} is not finite"),
    })
}

fn number_to_bignumber(v: &Value, _: &MathOptions) -> Result<Value> {
    decimal_of(v, "BigNumber").map(Value::BigNumber)
}

// 0.1 becomes 1/10 rather than the exact binary fraction
fn number_to_fraction(v: &Value, _: &MathOptions) -> Result<Value> {
    decimal_of(v, "Fraction").map(|d| Value::Fraction(d.to_ratio()))
}

fn number_to_complex(v: &Value, _: &MathOptions) -> Result<Value> {
    let x = v.as_number().ok_or_else(|| mismatch(v, "Complex"))?;
    Ok(Value::Complex(Complex64::new(x, 0.0)))
}

fn bignumber_to_fraction(v: &Value, _: &MathOptions) -> Result<Value> {
    let d = v.as_bignumber().ok_or_else(|| mismatch(v, "Fraction"))?;
    Ok(Value::Fraction(d.to_ratio()))
}

fn bignumber_to_complex(v: &Value, _: &MathOptions) -> Result<Value> {
    let d = v.as_bignumber().ok_or_else(|| mismatch(v, "Complex"))?;
    Ok(Value::Complex(Complex64::new(d.to_f64(), 0.0)))
}

fn fraction_to_complex(v: &Value, _: &MathOptions) -> Result<Value> {
    let q = v.as_fraction().ok_or_else(|| mismatch(v, "Complex"))?;
    let re = q.to_f64().ok_or_else(|| MathError::ConversionFailed {
        from: "Fraction",
        to: "Complex",
        reason: format!("{q} is out of range"),
    })?;
    Ok(Value::Complex(Complex64::new(re, 0.0)))
}

fn string_to_number(v: &Value, _: &MathOptions) -> Result<Value> {
    let s = v.as_str().ok_or_else(|| mismatch(v, "number"))?;
    s.trim()
        .parse::<f64>()
        .map(Value::Number)
        .map_err(|_| MathError::ConversionFailed {
            from: "string",
            to: "number",
            reason: format!("'{s}' is not a number"),
        })
}

fn array_to_matrix(v: &Value, _: &MathOptions) -> Result<Value> {
    match v {
        Value::Array(items) => DenseMatrix::from_array(items).map(Value::DenseMatrix),
        other => Err(mismatch(other, "DenseMatrix")),
    }
}

fn matrix_to_array(v: &Value, _: &MathOptions) -> Result<Value> {
    match v {
        Value::DenseMatrix(m) => Ok(m.to_array()),
        other => Err(mismatch(other, "Array")),
    }
}
