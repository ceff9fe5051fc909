//! `mod`: remainder of a floored division, `x - y * floor(x / y)`.
//!
//! The divisor must be non-negative; a zero divisor returns `x`. The
//! operation maps a zero left operand to zero, so sparse matrices on the
//! left keep their sparsity.

use num_rational::BigRational;
use num_traits::{Signed, Zero};

use crate::algorithm::ZeroFlags;
use crate::error::{MathError, Result};
use crate::operation::ElementwiseDef;
use crate::value::{BigNumber, Value};

const OP: &str = "mod";

pub fn definition() -> ElementwiseDef {
    ElementwiseDef::new(OP)
        .with_flags(ZeroFlags::LEFT_ZERO_PRESERVING)
        .scalar("number, number", |_, x, y| {
            match (x.as_number(), y.as_number()) {
                (Some(x), Some(y)) => mod_number(x, y).map(Value::Number),
                _ => Err(MathError::Unsupported("mod expects numbers")),
            }
        })
        .scalar("BigNumber, BigNumber", |_, x, y| {
            match (x.as_bignumber(), y.as_bignumber()) {
                (Some(x), Some(y)) => mod_bignumber(x, y).map(Value::BigNumber),
                _ => Err(MathError::Unsupported("mod expects BigNumbers")),
            }
        })
        .scalar("Fraction, Fraction", |_, x, y| {
            match (x.as_fraction(), y.as_fraction()) {
                (Some(x), Some(y)) => mod_fraction(x, y).map(Value::Fraction),
                _ => Err(MathError::Unsupported("mod expects Fractions")),
            }
        })
}

pub fn mod_number(x: f64, y: f64) -> Result<f64> {
    if y > 0.0 {
        Ok(x - y * (x / y).floor())
    } else if y == 0.0 {
        Ok(x)
    } else {
        Err(MathError::InvalidDivisor { op: OP })
    }
}

pub fn mod_bignumber(x: &BigNumber, y: &BigNumber) -> Result<BigNumber> {
    if y.is_negative() {
        return Err(MathError::InvalidDivisor { op: OP });
    }
    Ok(x.modulo(y).unwrap_or_else(|| x.clone()))
}

pub fn mod_fraction(x: &BigRational, y: &BigRational) -> Result<BigRational> {
    if y.is_negative() {
        return Err(MathError::InvalidDivisor { op: OP });
    }
    if y.is_zero() {
        return Ok(x.clone());
    }
    Ok(x - y * (x / y).floor())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn numbers() {
        assert_eq!(mod_number(8.0, 3.0).unwrap(), 2.0);
        assert_eq!(mod_number(-7.0, 3.0).unwrap(), 2.0);
        assert_eq!(mod_number(5.0, 0.0).unwrap(), 5.0);
        assert_relative_eq!(mod_number(5.5, 2.0).unwrap(), 1.5);
        assert_eq!(mod_number(5.0, -2.0), Err(MathError::InvalidDivisor { op: "mod" }));
        assert!(mod_number(5.0, f64::NAN).is_err());
    }

    #[test]
    fn bignumbers() {
        let b = |s: &str| s.parse::<BigNumber>().unwrap();
        assert_eq!(mod_bignumber(&b("8"), &b("3")).unwrap(), b("2"));
        assert_eq!(mod_bignumber(&b("-1.5"), &b("1")).unwrap(), b("0.5"));
        assert_eq!(mod_bignumber(&b("4.2"), &b("0")).unwrap(), b("4.2"));
        assert!(mod_bignumber(&b("4"), &b("-1")).is_err());
    }

    #[test]
    fn fractions() {
        let q = |n: i64, d: i64| BigRational::new(n.into(), d.into());
        assert_eq!(mod_fraction(&q(7, 2), &q(1, 1)).unwrap(), q(1, 2));
        assert_eq!(mod_fraction(&q(-1, 3), &q(1, 2)).unwrap(), q(1, 6));
        assert_eq!(mod_fraction(&q(3, 4), &q(0, 1)).unwrap(), q(3, 4));
        assert!(mod_fraction(&q(1, 1), &q(-1, 2)).is_err());
    }
}
