//! Helpers shared by the integration tests.
#![allow(dead_code)]

use polymat::{DenseMatrix, MathContext, SparseMatrix, Value};
use rand::Rng;

pub fn math() -> MathContext {
    MathContext::with_defaults().expect("default context builds")
}

pub fn n(v: f64) -> Value {
    Value::Number(v)
}

pub fn array(rows: &[&[f64]]) -> Value {
    Value::Array(
        rows.iter()
            .map(|r| Value::Array(r.iter().map(|&v| n(v)).collect()))
            .collect(),
    )
}

pub fn dense(rows: &[&[f64]]) -> DenseMatrix {
    DenseMatrix::from_array(match &array(rows) {
        Value::Array(items) => items,
        _ => unreachable!(),
    })
    .expect("rectangular rows")
}

pub fn sparse(rows: &[&[f64]]) -> SparseMatrix {
    SparseMatrix::from_dense(&dense(rows), |v| Ok(v == &n(0.0))).expect("2-D rows")
}

/// Small non-negative integers with roughly `1 - density` zeros, so every
/// operation result is exact.
pub fn random_rows(rng: &mut impl Rng, rows: usize, cols: usize, density: f64) -> Vec<Vec<f64>> {
    (0..rows)
        .map(|_| {
            (0..cols)
                .map(|_| if rng.gen_bool(density) { rng.gen_range(1..6) as f64 } else { 0.0 })
                .collect()
        })
        .collect()
}

pub fn as_slices(rows: &[Vec<f64>]) -> Vec<&[f64]> {
    rows.iter().map(Vec::as_slice).collect()
}

/// Numbers of a dense or sparse result in row-major order.
pub fn numbers(v: &Value) -> Vec<f64> {
    let d = match v {
        Value::DenseMatrix(m) => m.clone(),
        Value::SparseMatrix(m) => m.to_dense(),
        other => panic!("expected a matrix, got {other}"),
    };
    d.data().iter().map(|x| x.as_number().expect("number element")).collect()
}

pub fn no_stored_zeros(v: &Value) -> bool {
    match v {
        Value::SparseMatrix(m) => m.values().iter().all(|x| x != &n(0.0)),
        _ => true,
    }
}
