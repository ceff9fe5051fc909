//! Context passed to every implementation of a typed function.
//!
//! It binds the frozen typed function being invoked (`this`) to the
//! capabilities of the math context, so implementations can recurse into the
//! same generic operation without holding a reference to themselves.

use std::sync::OnceLock;

use crate::algorithm::{ElementOps, ZeroFlags};
use crate::config::MathOptions;
use crate::context::Capabilities;
use crate::dispatch::{Resolution, TypedFunction};
use crate::error::{MathError, Result};
use crate::matrix::DenseMatrix;
use crate::value::{TypeTag, UnitSystem, Value};

#[derive(Debug, Clone, Copy)]
pub struct OperationContext<'a> {
    this: &'a TypedFunction,
    caps: &'a Capabilities,
}

impl<'a> OperationContext<'a> {
    pub fn new(this: &'a TypedFunction, caps: &'a Capabilities) -> Self {
        Self { this, caps }
    }

    /// The typed function currently being invoked.
    pub fn this(&self) -> &'a TypedFunction {
        self.this
    }

    pub fn name(&self) -> &'a str {
        self.this.name()
    }

    pub fn caps(&self) -> &'a Capabilities {
        self.caps
    }

    pub fn options(&self) -> &'a MathOptions {
        self.caps.options()
    }

    /// Re-dispatch the current operation on new arguments.
    pub fn call(&self, args: &[&Value]) -> Result<Value> {
        self.this.invoke(self.caps, args)
    }

    pub fn equal_scalar(&self, a: &Value, b: &Value) -> Result<bool> {
        let eq = self.caps.equal_scalar().ok_or_else(|| MathError::MissingCapability {
            op: self.name().to_string(),
            capability: "EQUAL_SCALAR",
        })?;
        match eq.invoke(self.caps, &[a, b])? {
            Value::Boolean(b) => Ok(b),
            _ => Err(MathError::Unsupported("equalScalar must return a boolean")),
        }
    }

    /// Zero test used when deciding what a sparse result stores.
    ///
    /// Scalars compare through `equalScalar` when available, so tolerance
    /// settings apply. A unit is zero when its value is.
    pub fn is_zero(&self, v: &Value) -> Result<bool> {
        match v {
            Value::Unit(u) => match u.value() {
                Some(inner) => self.is_zero(inner),
                None => Ok(false),
            },
            Value::String(_) | Value::Array(_) | Value::DenseMatrix(_) | Value::SparseMatrix(_) => {
                Ok(false)
            }
            _ if self.caps.equal_scalar().is_some() => self.equal_scalar(v, &Value::zero()),
            _ => Ok(exact_zero(v)),
        }
    }

    /// Element operations for one algorithm run over this operation.
    pub fn kernel(&self) -> ElementKernel<'a> {
        ElementKernel::new(*self)
    }

    /// Dense matrix view of a matrix-like value.
    pub fn matrix(&self, v: &Value) -> Result<DenseMatrix> {
        to_dense(v)
    }

    pub fn units(&self) -> Result<&'a dyn UnitSystem> {
        self.caps.units().ok_or_else(|| MathError::MissingCapability {
            op: self.name().to_string(),
            capability: "UNITS",
        })
    }
}

pub(crate) fn to_dense(v: &Value) -> Result<DenseMatrix> {
    match v {
        Value::Array(items) => DenseMatrix::from_array(items),
        Value::DenseMatrix(m) => Ok(m.clone()),
        Value::SparseMatrix(m) => Ok(m.to_dense()),
        other => Err(MathError::ConversionFailed {
            from: other.type_tag().name(),
            to: "DenseMatrix",
            reason: "not a matrix or array".to_string(),
        }),
    }
}

fn exact_zero(v: &Value) -> bool {
    match v {
        Value::Boolean(b) => !b,
        Value::Number(x) => *x == 0.0,
        Value::BigNumber(d) => d.is_zero(),
        Value::Fraction(q) => num_traits::Zero::is_zero(q),
        Value::Complex(c) => num_traits::Zero::is_zero(c),
        _ => false,
    }
}

/// Element operations for one kernel run.
///
/// The first element pair is resolved through the registry and its
/// resolution kept; later pairs with the same type tags skip dispatch.
/// Pairs of other types fall back to a full `call`.
#[derive(Debug)]
pub struct ElementKernel<'a> {
    ctx: OperationContext<'a>,
    memo: OnceLock<([TypeTag; 2], Resolution)>,
}

impl<'a> ElementKernel<'a> {
    pub fn new(ctx: OperationContext<'a>) -> Self {
        Self { ctx, memo: OnceLock::new() }
    }

    /// Type tags of the pair whose resolution is kept, if any.
    pub fn memoized_types(&self) -> Option<[TypeTag; 2]> {
        self.memo.get().map(|(tags, _)| *tags)
    }
}

impl ElementOps for ElementKernel<'_> {
    fn apply(&self, x: &Value, y: &Value) -> Result<Value> {
        let (this, caps) = (self.ctx.this(), self.ctx.caps());
        let tags = [x.type_tag(), y.type_tag()];
        if let Some((memo_tags, resolution)) = self.memo.get() {
            if *memo_tags == tags {
                return this.invoke_resolved(caps, resolution, &[x, y]);
            }
            return this.invoke(caps, &[x, y]);
        }
        let resolution = this.resolve_for(caps, &tags)?;
        let out = this.invoke_resolved(caps, &resolution, &[x, y]);
        let _ = self.memo.set((tags, resolution));
        out
    }

    fn is_zero(&self, v: &Value) -> Result<bool> {
        self.ctx.is_zero(v)
    }

    fn flags(&self) -> ZeroFlags {
        self.ctx.this().flags()
    }

    fn name(&self) -> &str {
        self.ctx.name()
    }

    fn parallel_threshold(&self) -> usize {
        self.ctx.options().parallel_threshold
    }
}
