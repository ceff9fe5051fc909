//! Element-wise arithmetic: `add`, `subtract`, `dotMultiply`, `dotDivide`.

use num_complex::Complex64;
use num_rational::BigRational;
use num_traits::Zero;

use crate::algorithm::ZeroFlags;
use crate::context::OperationContext;
use crate::error::{MathError, Result};
use crate::operation::ElementwiseDef;
use crate::value::{BigNumber, Value};

fn numbers(x: &Value, y: &Value) -> Result<(f64, f64)> {
    x.as_number()
        .zip(y.as_number())
        .ok_or(MathError::Unsupported("expected numbers"))
}

fn bignumbers<'v>(x: &'v Value, y: &'v Value) -> Result<(&'v BigNumber, &'v BigNumber)> {
    x.as_bignumber()
        .zip(y.as_bignumber())
        .ok_or(MathError::Unsupported("expected BigNumbers"))
}

fn fractions<'v>(x: &'v Value, y: &'v Value) -> Result<(&'v BigRational, &'v BigRational)> {
    x.as_fraction()
        .zip(y.as_fraction())
        .ok_or(MathError::Unsupported("expected Fractions"))
}

fn complexes(x: &Value, y: &Value) -> Result<(Complex64, Complex64)> {
    x.as_complex()
        .zip(y.as_complex())
        .ok_or(MathError::Unsupported("expected Complex values"))
}

pub fn add() -> ElementwiseDef {
    ElementwiseDef::new("add")
        .scalar("number, number", |_, x, y| numbers(x, y).map(|(a, b)| Value::Number(a + b)))
        .scalar("BigNumber, BigNumber", |_, x, y| {
            bignumbers(x, y).map(|(a, b)| Value::BigNumber(a.add(b)))
        })
        .scalar("Fraction, Fraction", |_, x, y| fractions(x, y).map(|(a, b)| Value::Fraction(a + b)))
        .scalar("Complex, Complex", |_, x, y| complexes(x, y).map(|(a, b)| Value::Complex(a + b)))
        .scalar("Unit, Unit", |_, x, y| combine_units(x, y, 1.0))
}

pub fn subtract() -> ElementwiseDef {
    ElementwiseDef::new("subtract")
        .scalar("number, number", |_, x, y| numbers(x, y).map(|(a, b)| Value::Number(a - b)))
        .scalar("BigNumber, BigNumber", |_, x, y| {
            bignumbers(x, y).map(|(a, b)| Value::BigNumber(a.sub(b)))
        })
        .scalar("Fraction, Fraction", |_, x, y| fractions(x, y).map(|(a, b)| Value::Fraction(a - b)))
        .scalar("Complex, Complex", |_, x, y| complexes(x, y).map(|(a, b)| Value::Complex(a - b)))
        .scalar("Unit, Unit", |_, x, y| combine_units(x, y, -1.0))
}

fn combine_units(x: &Value, y: &Value, sign: f64) -> Result<Value> {
    match (x.as_unit(), y.as_unit()) {
        (Some(a), Some(b)) => a.combine(b, sign).map(Value::Unit),
        _ => Err(MathError::Unsupported("expected units")),
    }
}

pub fn dot_multiply() -> ElementwiseDef {
    ElementwiseDef::new("dotMultiply")
        .with_flags(ZeroFlags::ZERO_PRESERVING)
        .scalar("number, number", |_, x, y| numbers(x, y).map(|(a, b)| Value::Number(a * b)))
        .scalar("BigNumber, BigNumber", |_, x, y| {
            bignumbers(x, y).map(|(a, b)| Value::BigNumber(a.mul(b)))
        })
        .scalar("Fraction, Fraction", |_, x, y| fractions(x, y).map(|(a, b)| Value::Fraction(a * b)))
        .scalar("Complex, Complex", |_, x, y| complexes(x, y).map(|(a, b)| Value::Complex(a * b)))
}

const DIVIDE: &str = "dotDivide";

fn undefined() -> MathError {
    MathError::UndefinedAtZero { op: DIVIDE.to_string(), position: None }
}

/// `0 / 0` is undefined for every type. Any other division by zero yields
/// an infinity for plain numbers and fails for the exact types.
pub fn dot_divide() -> ElementwiseDef {
    ElementwiseDef::new(DIVIDE)
        .with_flags(ZeroFlags::LEFT_ZERO_PRESERVING | ZeroFlags::UNDEFINED_AT_ZERO)
        .scalar("number, number", |_, x, y| {
            let (a, b) = numbers(x, y)?;
            if a == 0.0 && b == 0.0 {
                return Err(undefined());
            }
            Ok(Value::Number(a / b))
        })
        .scalar("BigNumber, BigNumber", divide_bignumber)
        .scalar("Fraction, Fraction", |_, x, y| {
            let (a, b) = fractions(x, y)?;
            match (a.is_zero(), b.is_zero()) {
                (true, true) => Err(undefined()),
                (false, true) => Err(MathError::DivisionByZero { op: DIVIDE }),
                _ => Ok(Value::Fraction(a / b)),
            }
        })
        .scalar("Complex, Complex", |_, x, y| {
            let (a, b) = complexes(x, y)?;
            match (a.is_zero(), b.is_zero()) {
                (true, true) => Err(undefined()),
                (false, true) => Err(MathError::DivisionByZero { op: DIVIDE }),
                _ => Ok(Value::Complex(a / b)),
            }
        })
}

fn divide_bignumber(ctx: &OperationContext<'_>, x: &Value, y: &Value) -> Result<Value> {
    let (a, b) = bignumbers(x, y)?;
    match a.div(b, ctx.options().precision) {
        Some(q) => Ok(Value::BigNumber(q)),
        None if a.is_zero() => Err(undefined()),
        None => Err(MathError::DivisionByZero { op: DIVIDE }),
    }
}
