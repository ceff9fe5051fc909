//! `unit`: construct units from text, from a value and a unit name, or
//! element-wise from arrays and matrices.

use crate::context::Capability;
use crate::dispatch::TypedFunctionBuilder;
use crate::error::{MathError, Result};
use crate::operation::Operation;
use crate::value::{Unit, Value};

#[derive(Debug, Clone, Copy, Default)]
pub struct UnitOp;

impl Operation for UnitOp {
    fn name(&self) -> &str {
        "unit"
    }

    fn requires(&self) -> Capability {
        Capability::UNITS | Capability::DENSE_MATRIX
    }

    fn register(&self, b: &mut TypedFunctionBuilder) -> Result<()> {
        b.register("Unit", |_, args| Ok(args[0].clone()))?;

        b.register("string", |ctx, args| {
            let text = args[0].as_str().ok_or(MathError::Unsupported("expected a string"))?;
            let units = ctx.units()?;
            if units.is_valueless(text) {
                if let Some(def) = units.lookup(text.trim()) {
                    return Ok(Value::Unit(Unit::valueless(def)));
                }
            }
            units.parse(text).map(Value::Unit)
        })?;

        b.register("number | BigNumber | Fraction | Complex, string", |ctx, args| {
            let name = args[1].as_str().ok_or(MathError::Unsupported("expected a unit name"))?;
            let def = ctx
                .units()?
                .lookup(name.trim())
                .ok_or_else(|| MathError::InvalidUnit(format!("unknown unit '{name}'")))?;
            Ok(Value::Unit(Unit::new(Some(args[0].clone()), def)))
        })?;

        // nested arrays recurse through dispatch
        b.register("Array", |ctx, args| match args[0] {
            Value::Array(items) => items
                .iter()
                .map(|item| ctx.call(&[item]))
                .collect::<Result<Vec<_>>>()
                .map(Value::Array),
            _ => Err(MathError::Unsupported("expected an array")),
        })?;

        b.register("Matrix", |ctx, args| {
            let dense = ctx.matrix(args[0])?;
            dense.map(|v| ctx.call(&[v])).map(Value::DenseMatrix)
        })?;
        Ok(())
    }
}
