//! Tests for signature registration and resolution.
//!
//! These tests drive typed functions directly through the builder, and the
//! built-in operations through a math context, checking specificity
//! ordering, conversion fallback and the resolution cache.

mod common;

use std::sync::Arc;
use std::thread;

use common::*;
use polymat::dispatch::TypedFunctionBuilder;
use polymat::{Capabilities, MathError, MathOptions, TypeTag, Value};

fn label(name: &'static str) -> impl Fn(&polymat::OperationContext<'_>, &[&Value]) -> polymat::Result<Value> + Send + Sync {
    move |_, _| Ok(Value::from(name))
}

/// An exact `[SparseMatrix, SparseMatrix]` registration beats `[any, any]`,
/// whichever was registered first.
#[test]
fn exact_signature_beats_any() {
    for exact_first in [true, false] {
        let mut b = TypedFunctionBuilder::new("f");
        if exact_first {
            b.register("SparseMatrix, SparseMatrix", label("exact")).unwrap();
            b.register("any, any", label("any")).unwrap();
        } else {
            b.register("any, any", label("any")).unwrap();
            b.register("SparseMatrix, SparseMatrix", label("exact")).unwrap();
        }
        let f = b.build();
        let caps = Capabilities::new(MathOptions::default());
        let s = Value::SparseMatrix(sparse(&[&[1.0]]));
        assert_eq!(f.call(&caps, &[s.clone(), s.clone()]).unwrap(), Value::from("exact"));
        assert_eq!(f.call(&caps, &[s, n(1.0)]).unwrap(), Value::from("any"));
    }
}

/// Registering the same signature twice fails, even with different spacing.
#[test]
fn duplicate_signature() {
    let mut b = TypedFunctionBuilder::new("f");
    b.register("number | BigNumber, string", label("a")).unwrap();
    let err = b.register("number|BigNumber,string", label("b")).err().unwrap();
    assert!(matches!(err, MathError::DuplicateSignature { .. }));
    assert!(matches!(
        b.register("number, Matrix3", label("c")).err().unwrap(),
        MathError::UnknownType(name) if name == "Matrix3"
    ));
}

/// Arguments without a direct match are converted, preferring the
/// signature with fewer converted positions.
#[test]
fn conversion_fallback() {
    let math = math();
    let out = math.modulo(&Value::from("8"), &n(3.0)).unwrap();
    assert_eq!(out, n(2.0));

    let err = math.modulo(&n(1.0), &Value::Complex(num_complex::Complex64::new(1.0, 0.0))).unwrap_err();
    assert_eq!(
        err,
        MathError::NoMatchingSignature { name: "mod".into(), types: "number, Complex".into() }
    );
}

/// Resolutions are memoized per type tuple and can be turned off.
#[test]
fn resolution_cache() {
    let math = math();
    let f = math.function("add").unwrap();
    let before = f.cached_resolutions();
    math.add(&n(1.0), &n(2.0)).unwrap();
    math.add(&n(3.0), &n(4.0)).unwrap();
    assert_eq!(f.cached_resolutions(), before + 1);

    let options = MathOptions { cache_resolutions: false, ..MathOptions::default() };
    let uncached = polymat::MathContextBuilder::new(options).with_defaults().build().unwrap();
    uncached.add(&n(1.0), &n(2.0)).unwrap();
    assert_eq!(uncached.function("add").unwrap().cached_resolutions(), 0);
    let r = uncached.function("add").unwrap().resolve_uncached(&[TypeTag::Number, TypeTag::Number]).unwrap();
    assert!(r.is_direct());
}

/// A context is shared across threads; concurrent calls populate the cache
/// without changing results.
#[test]
fn concurrent_calls() {
    let math = Arc::new(math());
    let handles: Vec<_> = (0..4)
        .map(|t| {
            let math = Arc::clone(&math);
            thread::spawn(move || {
                for i in 0..50 {
                    let x = n((t * 50 + i) as f64);
                    let out = math.modulo(&x, &n(7.0)).unwrap();
                    assert_eq!(out, n(((t * 50 + i) % 7) as f64));
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }
    assert_eq!(math.function("mod").unwrap().cached_resolutions(), 1);
}
