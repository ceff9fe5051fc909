//! Property tests for the element-wise algorithm family, driven through the
//! built-in operations so every storage pairing is covered.
//!
//! Random matrices hold small non-negative integers, so every result is
//! exact and the dense-dense walk can serve as the reference.

mod common;

use common::*;
use polymat::{MathContext, MathError, Value};
use rand::SeedableRng;
use rand::rngs::StdRng;

const OPS: [&str; 4] = ["add", "subtract", "dotMultiply", "mod"];

fn storages(rows: &[&[f64]]) -> [Value; 3] {
    [
        array(rows),
        Value::DenseMatrix(dense(rows)),
        Value::SparseMatrix(sparse(rows)),
    ]
}

fn reference(math: &MathContext, op: &str, a: &[&[f64]], b: &[&[f64]]) -> Vec<f64> {
    let out = math
        .call(op, &[Value::DenseMatrix(dense(a)), Value::DenseMatrix(dense(b))])
        .unwrap();
    assert!(matches!(out, Value::DenseMatrix(_)));
    numbers(&out)
}

fn flat(v: &Value, math: &MathContext) -> Vec<f64> {
    match v {
        Value::Array(_) => numbers(&Value::DenseMatrix(math.matrix(v).unwrap())),
        other => numbers(other),
    }
}

/// Every storage pairing agrees with the dense-dense walk, and sparse
/// results never store zeros.
#[test]
fn all_storage_pairs_agree_with_dense() {
    let math = math();
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..10 {
        let a = random_rows(&mut rng, 4, 5, 0.4);
        let b = random_rows(&mut rng, 4, 5, 0.4);
        let (a, b) = (as_slices(&a), as_slices(&b));
        for op in OPS {
            let expected = reference(&math, op, &a, &b);
            for x in storages(&a) {
                for y in storages(&b) {
                    let out = math.call(op, &[x.clone(), y.clone()]).unwrap();
                    assert_eq!(flat(&out, &math), expected, "{op}({}, {})", x.type_tag(), y.type_tag());
                    assert!(no_stored_zeros(&out), "{op} stored a zero");
                }
            }
        }
    }
}

/// `mod` against a scalar agrees across storages in both operand orders.
#[test]
fn mod_scalar_pairs_agree_with_dense() {
    let math = math();
    let mut rng = StdRng::seed_from_u64(3);
    for _ in 0..20 {
        let a = random_rows(&mut rng, 4, 5, 0.5);
        let a = as_slices(&a);
        let d = Value::DenseMatrix(dense(&a));
        for k in [n(3.0), n(0.0)] {
            let expected = numbers(&math.modulo(&d, &k).unwrap());
            let flipped = numbers(&math.modulo(&k, &d).unwrap());
            for x in storages(&a) {
                let out = math.modulo(&x, &k).unwrap();
                assert_eq!(flat(&out, &math), expected, "mod({}, {k})", x.type_tag());
                assert!(no_stored_zeros(&out));
                let out = math.modulo(&k, &x).unwrap();
                assert_eq!(flat(&out, &math), flipped, "mod({k}, {})", x.type_tag());
            }
        }
    }
}

/// Matrices filled with a constant agree with the scalar result at every
/// position, for both operand orders against a scalar.
#[test]
fn constant_matrices_match_scalars() {
    let math = math();
    for op in ["add", "subtract", "dotMultiply", "mod", "dotDivide"] {
        for (c, k) in [(6.0, 4.0), (3.0, 5.0), (2.0, 2.0)] {
            let scalar = math.call(op, &[n(c), n(k)]).unwrap().as_number().unwrap();
            let rows: [&[f64]; 2] = [&[c, c, c], &[c, c, c]];
            let ks: [&[f64]; 2] = [&[k, k, k], &[k, k, k]];
            for x in storages(&rows) {
                let out = math.call(op, &[x.clone(), n(k)]).unwrap();
                assert_eq!(flat(&out, &math), vec![scalar; 6], "{op}({}, {k})", x.type_tag());
                for y in storages(&ks) {
                    let out = math.call(op, &[x.clone(), y]).unwrap();
                    assert_eq!(flat(&out, &math), vec![scalar; 6]);
                }
            }
            let flipped = math.call(op, &[n(k), n(c)]).unwrap().as_number().unwrap();
            for x in storages(&rows) {
                let out = math.call(op, &[n(k), x]).unwrap();
                assert_eq!(flat(&out, &math), vec![flipped; 6]);
            }
        }
    }
}

/// Result storage follows the zero behaviour of the operation.
#[test]
fn result_storage_kinds() {
    let math = math();
    let s = Value::SparseMatrix(sparse(&[&[2.0, 0.0], &[0.0, 4.0]]));
    let d = Value::DenseMatrix(dense(&[&[1.0, 2.0], &[3.0, 4.0]]));

    // dotMultiply preserves zeros on both sides
    assert!(matches!(math.dot_multiply(&s, &d).unwrap(), Value::SparseMatrix(_)));
    assert!(matches!(math.dot_multiply(&d, &s).unwrap(), Value::SparseMatrix(_)));
    assert!(matches!(math.dot_multiply(&n(3.0), &s).unwrap(), Value::SparseMatrix(_)));

    // add fills gaps
    assert!(matches!(math.add(&s, &d).unwrap(), Value::DenseMatrix(_)));
    assert!(matches!(math.add(&s, &n(1.0)).unwrap(), Value::DenseMatrix(_)));
    assert!(matches!(math.add(&s, &s).unwrap(), Value::SparseMatrix(_)));

    // only the left side of mod is zero preserving
    assert!(matches!(math.modulo(&s, &d).unwrap(), Value::SparseMatrix(_)));
    assert!(matches!(math.modulo(&d, &s).unwrap(), Value::DenseMatrix(_)));
    assert!(matches!(math.modulo(&s, &n(3.0)).unwrap(), Value::SparseMatrix(_)));
    assert!(matches!(math.modulo(&n(3.0), &s).unwrap(), Value::DenseMatrix(_)));

    // arrays in, arrays out
    let arr = array(&[&[1.0, 2.0]]);
    assert!(matches!(math.add(&arr, &arr).unwrap(), Value::Array(_)));
    assert!(matches!(math.add(&arr, &n(1.0)).unwrap(), Value::Array(_)));
    assert!(matches!(math.add(&n(1.0), &arr).unwrap(), Value::Array(_)));
}

/// A 2×3 operand against a 3×2 operand fails for every matrix pairing.
#[test]
fn dimension_mismatch() {
    let math = math();
    let a: [&[f64]; 2] = [&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0]];
    let b: [&[f64]; 3] = [&[1.0, 2.0], &[3.0, 4.0], &[5.0, 6.0]];
    for op in OPS {
        for x in storages(&a) {
            for y in storages(&b) {
                let err = math.call(op, &[x.clone(), y]).unwrap_err();
                assert_eq!(err, MathError::DimensionMismatch { left: vec![2, 3], right: vec![3, 2] });
            }
        }
    }
}

/// Division where both operands are implicit zeros is reported with the
/// position of the first such element.
#[test]
fn undefined_at_zero() {
    let math = math();
    let a = Value::SparseMatrix(sparse(&[&[1.0, 0.0], &[2.0, 3.0]]));
    let b = Value::SparseMatrix(sparse(&[&[1.0, 0.0], &[1.0, 1.0]]));
    let err = math.dot_divide(&a, &b).unwrap_err();
    assert_eq!(err, MathError::UndefinedAtZero { op: "dotDivide".into(), position: Some(vec![0, 1]) });

    let d = Value::DenseMatrix(dense(&[&[1.0, 0.0], &[2.0, 3.0]]));
    let err = math.dot_divide(&a, &d).unwrap_err();
    assert_eq!(err, MathError::UndefinedAtZero { op: "dotDivide".into(), position: Some(vec![0, 1]) });
    let err = math.dot_divide(&d, &d).unwrap_err();
    assert_eq!(err, MathError::UndefinedAtZero { op: "dotDivide".into(), position: Some(vec![0, 1]) });
    let err = math.dot_divide(&a, &n(0.0)).unwrap_err();
    assert_eq!(err, MathError::UndefinedAtZero { op: "dotDivide".into(), position: Some(vec![0, 1]) });

    let full = Value::SparseMatrix(sparse(&[&[1.0, 2.0], &[1.0, 1.0]]));
    let out = math.dot_divide(&a, &full).unwrap();
    assert_eq!(numbers(&out), vec![1.0, 0.0, 2.0, 3.0]);
    assert!(no_stored_zeros(&out));
}

/// Large dense walks run on the rayon pool and give the same result.
#[test]
fn parallel_threshold() {
    let options = polymat::MathOptions { parallel_threshold: 16, ..Default::default() };
    let par = polymat::MathContextBuilder::new(options).with_defaults().build().unwrap();
    let serial = math();
    let mut rng = StdRng::seed_from_u64(11);
    let a = random_rows(&mut rng, 12, 12, 0.5);
    let b = random_rows(&mut rng, 12, 12, 0.5);
    let (a, b) = (as_slices(&a), as_slices(&b));
    for (x, y) in [
        (Value::DenseMatrix(dense(&a)), Value::DenseMatrix(dense(&b))),
        (Value::SparseMatrix(sparse(&a)), Value::DenseMatrix(dense(&b))),
        (Value::SparseMatrix(sparse(&a)), n(2.0)),
    ] {
        assert_eq!(par.add(&x, &y).unwrap(), serial.add(&x, &y).unwrap());
    }
}
