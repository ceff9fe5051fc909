//! Operation definitions.
//!
//! An `Operation` installs its signatures into a `TypedFunctionBuilder`.
//! Most operations are element-wise binary functions described by an
//! `ElementwiseDef`: scalar implementations plus zero-behaviour flags, from
//! which the matrix signatures and the algorithm used for each storage pair
//! are derived.

pub mod arithmetic;
pub mod equal_scalar;
pub mod modulo;
pub mod unit;

pub use equal_scalar::EqualScalar;
pub use unit::UnitOp;

use std::sync::Arc;

use crate::algorithm::{
    ZeroFlags, algorithm02, algorithm03, algorithm05, algorithm11, algorithm12, algorithm13,
    algorithm14,
};
use crate::context::{Capability, OperationContext};
use crate::dispatch::{Signature, TypedFunctionBuilder};
use crate::error::{MathError, Result};
use crate::matrix::{DenseMatrix, SparseMatrix};
use crate::value::Value;

/// A generic operation that can be installed into a math context.
pub trait Operation: Send + Sync {
    fn name(&self) -> &str;

    /// Collaborators the implementations rely on.
    fn requires(&self) -> Capability;

    fn flags(&self) -> ZeroFlags {
        ZeroFlags::empty()
    }

    /// Register every signature of the operation.
    fn register(&self, builder: &mut TypedFunctionBuilder) -> Result<()>;
}

/// Scalar implementation of a binary operation.
pub type ScalarFn =
    Arc<dyn Fn(&OperationContext<'_>, &Value, &Value) -> Result<Value> + Send + Sync>;

/// Algorithm for a sparse operand paired with a dense one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SparseDense {
    /// Sparse result, stored entries only.
    Algorithm02,
    /// Dense result, every position.
    Algorithm03,
}

/// Algorithm for a sparse operand paired with a scalar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SparseScalar {
    /// Sparse result, stored entries only.
    Algorithm11,
    /// Dense result, every position.
    Algorithm12,
}

/// Algorithm choice per orientation of a sparse operand.
///
/// Sparse-sparse pairs always use algorithm 05, dense-dense 13 and
/// dense-scalar 14.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatrixPlan {
    /// `f(sparse, dense)`
    pub sparse_dense: SparseDense,
    /// `f(dense, sparse)`
    pub dense_sparse: SparseDense,
    /// `f(sparse, scalar)`
    pub sparse_scalar: SparseScalar,
    /// `f(scalar, sparse)`
    pub scalar_sparse: SparseScalar,
}

impl MatrixPlan {
    /// Keep sparse output only where the sparse side's zeros map to zero.
    pub fn from_flags(flags: ZeroFlags) -> Self {
        let left = flags.contains(ZeroFlags::LEFT_ZERO_PRESERVING);
        let right = flags.contains(ZeroFlags::RIGHT_ZERO_PRESERVING);
        let pair = |keep| if keep { SparseDense::Algorithm02 } else { SparseDense::Algorithm03 };
        let scalar = |keep| if keep { SparseScalar::Algorithm11 } else { SparseScalar::Algorithm12 };
        Self {
            sparse_dense: pair(left),
            dense_sparse: pair(right),
            sparse_scalar: scalar(left),
            scalar_sparse: scalar(right),
        }
    }
}

/// Definition of an element-wise binary operation.
#[derive(Clone)]
pub struct ElementwiseDef {
    name: String,
    requires: Capability,
    flags: ZeroFlags,
    plan: Option<MatrixPlan>,
    scalars: Vec<(String, ScalarFn)>,
}

impl std::fmt::Debug for ElementwiseDef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ElementwiseDef")
            .field("name", &self.name)
            .field("requires", &self.requires)
            .field("flags", &self.flags)
            .field("plan", &self.plan())
            .field("scalars", &self.scalars.iter().map(|(s, _)| s.as_str()).collect::<Vec<_>>())
            .finish()
    }
}

impl ElementwiseDef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            requires: Capability::MATRIX | Capability::EQUAL_SCALAR | Capability::DENSE_MATRIX,
            flags: ZeroFlags::empty(),
            plan: None,
            scalars: Vec::new(),
        }
    }

    pub fn with_requires(mut self, requires: Capability) -> Self {
        self.requires = requires;
        self
    }

    pub fn with_flags(mut self, flags: ZeroFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Override the plan derived from the flags.
    pub fn with_plan(mut self, plan: MatrixPlan) -> Self {
        self.plan = Some(plan);
        self
    }

    pub fn scalar<F>(mut self, signature: &str, f: F) -> Self
    where
        F: Fn(&OperationContext<'_>, &Value, &Value) -> Result<Value> + Send + Sync + 'static,
    {
        self.scalars.push((signature.to_string(), Arc::new(f)));
        self
    }

    pub fn plan(&self) -> MatrixPlan {
        self.plan.unwrap_or_else(|| MatrixPlan::from_flags(self.flags))
    }
}

fn dense(v: &Value) -> Option<&DenseMatrix> {
    v.as_dense()
}

fn sparse(v: &Value) -> Option<&SparseMatrix> {
    v.as_sparse()
}

// Signatures guarantee the storage kind; this only fires on a registry bug.
fn kind_error() -> MathError {
    MathError::Unsupported("argument storage does not match signature")
}

fn into_array(v: Value) -> Value {
    match v {
        Value::DenseMatrix(m) => m.to_array(),
        Value::SparseMatrix(m) => m.to_dense().to_array(),
        other => other,
    }
}

impl Operation for ElementwiseDef {
    fn name(&self) -> &str {
        &self.name
    }

    fn requires(&self) -> Capability {
        self.requires
    }

    fn flags(&self) -> ZeroFlags {
        self.flags
    }

    fn register(&self, b: &mut TypedFunctionBuilder) -> Result<()> {
        for (signature, f) in &self.scalars {
            let signature: Signature = signature.parse()?;
            if signature.arity() != 2 {
                return Err(MathError::Unsupported("element-wise scalars take two parameters"));
            }
            let f = Arc::clone(f);
            b.register_signature(signature, move |ctx, args| f(ctx, args[0], args[1]))?;
        }

        let plan = self.plan();

        b.register("SparseMatrix, SparseMatrix", |ctx, args| {
            let (x, y) = (sparse(args[0]).ok_or_else(kind_error)?, sparse(args[1]).ok_or_else(kind_error)?);
            algorithm05(x, y, &ctx.kernel()).map(Value::SparseMatrix)
        })?;
        b.register("SparseMatrix, DenseMatrix", move |ctx, args| {
            let (s, d) = (sparse(args[0]).ok_or_else(kind_error)?, dense(args[1]).ok_or_else(kind_error)?);
            match plan.sparse_dense {
                SparseDense::Algorithm02 => algorithm02(d, s, &ctx.kernel(), true).map(Value::SparseMatrix),
                SparseDense::Algorithm03 => algorithm03(d, s, &ctx.kernel(), true).map(Value::DenseMatrix),
            }
        })?;
        b.register("DenseMatrix, SparseMatrix", move |ctx, args| {
            let (d, s) = (dense(args[0]).ok_or_else(kind_error)?, sparse(args[1]).ok_or_else(kind_error)?);
            match plan.dense_sparse {
                SparseDense::Algorithm02 => algorithm02(d, s, &ctx.kernel(), false).map(Value::SparseMatrix),
                SparseDense::Algorithm03 => algorithm03(d, s, &ctx.kernel(), false).map(Value::DenseMatrix),
            }
        })?;
        b.register("DenseMatrix, DenseMatrix", |ctx, args| {
            let (x, y) = (dense(args[0]).ok_or_else(kind_error)?, dense(args[1]).ok_or_else(kind_error)?);
            algorithm13(x, y, &ctx.kernel()).map(Value::DenseMatrix)
        })?;

        b.register("Array, Array", |ctx, args| {
            let (x, y) = (ctx.matrix(args[0])?, ctx.matrix(args[1])?);
            ctx.call(&[&Value::DenseMatrix(x), &Value::DenseMatrix(y)]).map(into_array)
        })?;
        b.register("Array, Matrix", |ctx, args| {
            let x = Value::DenseMatrix(ctx.matrix(args[0])?);
            ctx.call(&[&x, args[1]])
        })?;
        b.register("Matrix, Array", |ctx, args| {
            let y = Value::DenseMatrix(ctx.matrix(args[1])?);
            ctx.call(&[args[0], &y])
        })?;

        b.register("SparseMatrix, any", move |ctx, args| {
            let s = sparse(args[0]).ok_or_else(kind_error)?;
            match plan.sparse_scalar {
                SparseScalar::Algorithm11 => algorithm11(s, args[1], &ctx.kernel(), false).map(Value::SparseMatrix),
                SparseScalar::Algorithm12 => algorithm12(s, args[1], &ctx.kernel(), false).map(Value::DenseMatrix),
            }
        })?;
        b.register("DenseMatrix, any", |ctx, args| {
            let d = dense(args[0]).ok_or_else(kind_error)?;
            algorithm14(d, args[1], &ctx.kernel(), false).map(Value::DenseMatrix)
        })?;
        b.register("any, SparseMatrix", move |ctx, args| {
            let s = sparse(args[1]).ok_or_else(kind_error)?;
            match plan.scalar_sparse {
                SparseScalar::Algorithm11 => algorithm11(s, args[0], &ctx.kernel(), true).map(Value::SparseMatrix),
                SparseScalar::Algorithm12 => algorithm12(s, args[0], &ctx.kernel(), true).map(Value::DenseMatrix),
            }
        })?;
        b.register("any, DenseMatrix", |ctx, args| {
            let d = dense(args[1]).ok_or_else(kind_error)?;
            algorithm14(d, args[0], &ctx.kernel(), true).map(Value::DenseMatrix)
        })?;

        b.register("Array, any", |ctx, args| {
            let d = ctx.matrix(args[0])?;
            algorithm14(&d, args[1], &ctx.kernel(), false).map(|m| m.to_array())
        })?;
        b.register("any, Array", |ctx, args| {
            let d = ctx.matrix(args[1])?;
            algorithm14(&d, args[0], &ctx.kernel(), true).map(|m| m.to_array())
        })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plan_follows_flags() {
        let plan = MatrixPlan::from_flags(ZeroFlags::LEFT_ZERO_PRESERVING);
        assert_eq!(plan.sparse_dense, SparseDense::Algorithm02);
        assert_eq!(plan.dense_sparse, SparseDense::Algorithm03);
        assert_eq!(plan.sparse_scalar, SparseScalar::Algorithm11);
        assert_eq!(plan.scalar_sparse, SparseScalar::Algorithm12);

        let plan = MatrixPlan::from_flags(ZeroFlags::ZERO_PRESERVING);
        assert_eq!(plan.dense_sparse, SparseDense::Algorithm02);
        assert_eq!(plan.scalar_sparse, SparseScalar::Algorithm11);

        let plan = MatrixPlan::from_flags(ZeroFlags::empty());
        assert_eq!(plan.sparse_dense, SparseDense::Algorithm03);
        assert_eq!(plan.sparse_scalar, SparseScalar::Algorithm12);
    }

    #[test]
    fn explicit_plan_wins() {
        let forced = MatrixPlan::from_flags(ZeroFlags::empty());
        let def = ElementwiseDef::new("f").with_flags(ZeroFlags::ZERO_PRESERVING).with_plan(forced);
        assert_eq!(def.plan(), forced);
    }

    #[test]
    fn registers_matrix_signatures() {
        let def = ElementwiseDef::new("f").scalar("number, number", |_, x, y| {
            Ok(Value::Number(x.as_number().unwrap_or(0.0) + y.as_number().unwrap_or(0.0)))
        });
        let mut b = TypedFunctionBuilder::new("f");
        def.register(&mut b).unwrap();
        let f = b.build();
        let sigs: Vec<String> = f.signatures().map(|s| s.to_string()).collect();
        assert_eq!(sigs.len(), 14);
        assert_eq!(sigs[0], "number, number");
        assert!(sigs.iter().any(|s| s == "any, SparseMatrix"));
        assert!(sigs.iter().any(|s| s == "Matrix, Array"));
    }
}
