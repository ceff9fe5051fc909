//! Factory and owner of the generic operations.
//!
//! `MathContextBuilder` collects options, an optional unit system and the
//! operation definitions. `build` runs two phases:
//!
//! 1. build `equalScalar` and assemble the `Capabilities` every operation
//!    receives;
//! 2. check each operation's declared requirements, register its signatures
//!    and freeze it into a `TypedFunction`.
//!
//! Nothing can be registered on a `MathContext` afterwards.

use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::context::{Capabilities, OperationContext};
use crate::context::op_context::to_dense;
use crate::config::MathOptions;
use crate::dispatch::{TypedFunction, TypedFunctionBuilder};
use crate::error::{MathError, Result};
use crate::matrix::{DenseMatrix, SparseMatrix};
use crate::operation::{self, EqualScalar, Operation};
use crate::parallel;
use crate::value::{BasicUnits, UnitSystem, Value};

/// Collects the configuration of a `MathContext`.
pub struct MathContextBuilder {
    options: MathOptions,
    units: Option<Arc<dyn UnitSystem>>,
    operations: Vec<Box<dyn Operation>>,
}

impl MathContextBuilder {
    pub fn new(options: MathOptions) -> Self {
        Self { options, units: None, operations: Vec::new() }
    }

    /// Install the built-in unit table (unless a unit system was set) and the
    /// built-in operations: `mod`, `add`, `subtract`, `dotMultiply`,
    /// `dotDivide` and `unit`.
    pub fn with_defaults(mut self) -> Self {
        if self.units.is_none() {
            self.units = Some(Arc::new(BasicUnits::new()));
        }
        self.operation(operation::modulo::definition())
            .operation(operation::arithmetic::add())
            .operation(operation::arithmetic::subtract())
            .operation(operation::arithmetic::dot_multiply())
            .operation(operation::arithmetic::dot_divide())
            .operation(operation::unit::UnitOp)
    }

    pub fn unit_system(mut self, units: impl UnitSystem + 'static) -> Self {
        self.units = Some(Arc::new(units));
        self
    }

    pub fn operation(mut self, op: impl Operation + 'static) -> Self {
        self.operations.push(Box::new(op));
        self
    }

    pub fn build(self) -> Result<MathContext> {
        parallel::init_thread_pool(self.options.num_threads);

        // Phase 1: capabilities
        let equal_scalar = Arc::new(freeze(&EqualScalar)?);
        let mut caps = Capabilities::new(self.options).with_equal_scalar(Arc::clone(&equal_scalar));
        if let Some(units) = self.units {
            caps = caps.with_units(units);
        }
        let provided = caps.provided();
        tracing::debug!(?provided, "capabilities ready");

        // Phase 2: operations
        let mut functions = FxHashMap::default();
        functions.insert(equal_scalar.name().to_string(), equal_scalar);
        for op in &self.operations {
            if functions.contains_key(op.name()) {
                return Err(MathError::DuplicateOperation(op.name().to_string()));
            }
            let missing = op.requires().difference(provided);
            if !missing.is_empty() {
                return Err(MathError::MissingCapability {
                    op: op.name().to_string(),
                    capability: missing.first_name(),
                });
            }
            let f = freeze(op.as_ref())?;
            functions.insert(f.name().to_string(), Arc::new(f));
        }
        tracing::info!(operations = functions.len(), "math context built");
        Ok(MathContext { caps, functions })
    }
}

fn freeze(op: &dyn Operation) -> Result<TypedFunction> {
    let mut builder = TypedFunctionBuilder::new(op.name());
    builder.flags(op.flags());
    op.register(&mut builder)?;
    Ok(builder.build())
}

/// A frozen set of generic operations sharing one set of capabilities.
#[derive(Debug)]
pub struct MathContext {
    caps: Capabilities,
    functions: FxHashMap<String, Arc<TypedFunction>>,
}

impl MathContext {
    /// A context with every built-in operation and default options.
    pub fn with_defaults() -> Result<Self> {
        MathContextBuilder::new(MathOptions::default()).with_defaults().build()
    }

    pub fn options(&self) -> &MathOptions {
        self.caps.options()
    }

    pub fn capabilities(&self) -> &Capabilities {
        &self.caps
    }

    pub fn function(&self, name: &str) -> Result<&TypedFunction> {
        self.functions
            .get(name)
            .map(Arc::as_ref)
            .ok_or_else(|| MathError::UnknownFunction(name.to_string()))
    }

    /// Names of every registered operation, sorted.
    pub fn function_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.functions.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn invoke(&self, name: &str, args: &[&Value]) -> Result<Value> {
        self.function(name)?.invoke(&self.caps, args)
    }

    pub fn call(&self, name: &str, args: &[Value]) -> Result<Value> {
        self.function(name)?.call(&self.caps, args)
    }

    pub fn modulo(&self, x: &Value, y: &Value) -> Result<Value> {
        self.invoke("mod", &[x, y])
    }

    pub fn add(&self, x: &Value, y: &Value) -> Result<Value> {
        self.invoke("add", &[x, y])
    }

    pub fn subtract(&self, x: &Value, y: &Value) -> Result<Value> {
        self.invoke("subtract", &[x, y])
    }

    pub fn dot_multiply(&self, x: &Value, y: &Value) -> Result<Value> {
        self.invoke("dotMultiply", &[x, y])
    }

    pub fn dot_divide(&self, x: &Value, y: &Value) -> Result<Value> {
        self.invoke("dotDivide", &[x, y])
    }

    /// `unit(text)`, `unit(value, name)`, `unit(unit)` or element-wise over
    /// arrays and matrices.
    pub fn unit(&self, args: &[Value]) -> Result<Value> {
        self.call("unit", args)
    }

    pub fn equal_scalar(&self, a: &Value, b: &Value) -> Result<bool> {
        let f = self.function("equalScalar")?;
        OperationContext::new(f, &self.caps).equal_scalar(a, b)
    }

    /// Dense matrix from an Array or matrix value.
    pub fn matrix(&self, v: &Value) -> Result<DenseMatrix> {
        to_dense(v)
    }

    /// Sparse matrix from an Array or matrix value, dropping zeros.
    pub fn sparse(&self, v: &Value) -> Result<SparseMatrix> {
        if let Value::SparseMatrix(m) = v {
            return Ok(m.clone());
        }
        let dense = to_dense(v)?;
        let f = self.function("equalScalar")?;
        let ctx = OperationContext::new(f, &self.caps);
        SparseMatrix::from_dense(&dense, |x| ctx.is_zero(x))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Capability;
    use crate::operation::ElementwiseDef;

    #[test]
    fn defaults_register_every_operation() {
        let math = MathContext::with_defaults().unwrap();
        assert_eq!(
            math.function_names(),
            vec!["add", "dotDivide", "dotMultiply", "equalScalar", "mod", "subtract", "unit"]
        );
        assert!(matches!(math.call("pow", &[]), Err(MathError::UnknownFunction(_))));
    }

    #[test]
    fn duplicate_operation_rejected() {
        let err = MathContextBuilder::new(MathOptions::default())
            .with_defaults()
            .operation(ElementwiseDef::new("add"))
            .build()
            .unwrap_err();
        assert_eq!(err, MathError::DuplicateOperation("add".into()));
    }

    #[test]
    fn missing_capability_rejected() {
        let err = MathContextBuilder::new(MathOptions::default())
            .operation(ElementwiseDef::new("scaled").with_requires(Capability::MATRIX | Capability::UNITS))
            .build()
            .unwrap_err();
        assert_eq!(err, MathError::MissingCapability { op: "scaled".into(), capability: "UNITS" });
    }

    #[test]
    fn sparse_drops_zeros() {
        let math = MathContext::with_defaults().unwrap();
        let arr = Value::Array(vec![
            Value::Array(vec![1.0.into(), 0.0.into()]),
            Value::Array(vec![1e-30.into(), 2.0.into()]),
        ]);
        let s = math.sparse(&arr).unwrap();
        assert_eq!(s.size(), [2, 2]);
        assert_eq!(s.nnz(), 2);
        assert_eq!(math.matrix(&Value::SparseMatrix(s)).unwrap().size(), &[2, 2]);
    }
}
