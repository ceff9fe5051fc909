//! `equalScalar`: scalar equality used for zero tests and comparisons.
//!
//! Plain numbers and the parts of complex numbers compare with the relative
//! tolerance from `MathOptions::epsilon`; BigNumbers and Fractions compare
//! exactly. Units must share a base dimension.

use crate::context::Capability;
use crate::dispatch::TypedFunctionBuilder;
use crate::error::{MathError, Result};
use crate::operation::Operation;
use crate::utils::nearly_equal;
use crate::value::Value;

#[derive(Debug, Clone, Copy, Default)]
pub struct EqualScalar;

fn mismatch() -> MathError {
    MathError::Unsupported("argument type does not match signature")
}

impl Operation for EqualScalar {
    fn name(&self) -> &str {
        "equalScalar"
    }

    fn requires(&self) -> Capability {
        Capability::empty()
    }

    fn register(&self, b: &mut TypedFunctionBuilder) -> Result<()> {
        b.register("boolean, boolean", |_, args| {
            let (x, y) = args[0].as_bool().zip(args[1].as_bool()).ok_or_else(mismatch)?;
            Ok(Value::Boolean(x == y))
        })?;
        b.register("number, number", |ctx, args| {
            let (x, y) = args[0].as_number().zip(args[1].as_number()).ok_or_else(mismatch)?;
            Ok(Value::Boolean(nearly_equal(x, y, ctx.options().epsilon)))
        })?;
        b.register("BigNumber, BigNumber", |_, args| {
            let (x, y) = args[0].as_bignumber().zip(args[1].as_bignumber()).ok_or_else(mismatch)?;
            Ok(Value::Boolean(x == y))
        })?;
        b.register("Fraction, Fraction", |_, args| {
            let (x, y) = args[0].as_fraction().zip(args[1].as_fraction()).ok_or_else(mismatch)?;
            Ok(Value::Boolean(x == y))
        })?;
        b.register("Complex, Complex", |ctx, args| {
            let (x, y) = args[0].as_complex().zip(args[1].as_complex()).ok_or_else(mismatch)?;
            let eps = ctx.options().epsilon;
            Ok(Value::Boolean(nearly_equal(x.re, y.re, eps) && nearly_equal(x.im, y.im, eps)))
        })?;
        b.register("Unit, Unit", |ctx, args| {
            let (x, y) = args[0].as_unit().zip(args[1].as_unit()).ok_or_else(mismatch)?;
            if !x.equal_base(y) {
                return Err(MathError::UnitMismatch { left: x.to_string(), right: y.to_string() });
            }
            let equal = match (x.value(), y.value()) {
                (None, None) => x.def().factor == y.def().factor,
                (Some(a), Some(b)) if x.def().factor == y.def().factor => {
                    matches!(ctx.call(&[a, b])?, Value::Boolean(true))
                }
                (Some(_), Some(_)) => match (x.base_value(), y.base_value()) {
                    (Some(a), Some(b)) => nearly_equal(a, b, ctx.options().epsilon),
                    _ => false,
                },
                _ => false,
            };
            Ok(Value::Boolean(equal))
        })?;
        Ok(())
    }
}
