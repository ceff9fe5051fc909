//! Shared-memory parallelism for dense element-wise walks.
//!
//! With the `rayon` feature (default) walks at or above the configured
//! threshold run on the global rayon pool; otherwise everything is serial.

use crate::error::Result;
use crate::value::Value;

/// Size the global rayon pool. `None` leaves the pool alone; `Some(0)` means
/// one thread per logical CPU. The pool can only be configured once per
/// process; later calls are ignored.
#[cfg(feature = "rayon")]
pub fn init_thread_pool(num_threads: Option<usize>) {
    let Some(requested) = num_threads else {
        return;
    };
    let threads = if requested == 0 { num_cpus::get() } else { requested };
    match rayon::ThreadPoolBuilder::new().num_threads(threads).build_global() {
        Ok(()) => tracing::debug!(threads, "initialised rayon pool"),
        Err(e) => tracing::trace!(error = %e, "rayon pool already initialised"),
    }
}

#[cfg(not(feature = "rayon"))]
pub fn init_thread_pool(_num_threads: Option<usize>) {}

/// Number of worker threads element-wise walks may use.
pub fn current_threads() -> usize {
    #[cfg(feature = "rayon")]
    {
        rayon::current_num_threads()
    }
    #[cfg(not(feature = "rayon"))]
    {
        1
    }
}

/// Evaluate `f(k)` for `k in 0..len`, in order.
///
/// Runs in parallel when `len >= threshold`. On failure one of the errors is
/// returned; in the serial path it is always the first.
pub fn map_indexed<F>(len: usize, threshold: usize, f: F) -> Result<Vec<Value>>
where
    F: Fn(usize) -> Result<Value> + Send + Sync,
{
    if len >= threshold {
        return par_map(len, f);
    }
    (0..len).map(f).collect()
}

#[cfg(feature = "rayon")]
fn par_map<F>(len: usize, f: F) -> Result<Vec<Value>>
where
    F: Fn(usize) -> Result<Value> + Send + Sync,
{
    use rayon::prelude::*;
    tracing::trace!(len, threads = rayon::current_num_threads(), "parallel walk");
    (0..len).into_par_iter().map(f).collect()
}

#[cfg(not(feature = "rayon"))]
fn par_map<F>(len: usize, f: F) -> Result<Vec<Value>>
where
    F: Fn(usize) -> Result<Value> + Send + Sync,
{
    (0..len).map(f).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MathError;

    #[test]
    fn serial_and_parallel_agree() {
        let f = |k: usize| Ok(Value::Number(k as f64 * 2.0));
        let serial = map_indexed(1000, usize::MAX, f).unwrap();
        let parallel = map_indexed(1000, 1, f).unwrap();
        assert_eq!(serial, parallel);
        assert_eq!(serial[999], Value::Number(1998.0));
        assert!(current_threads() >= 1);
    }

    #[test]
    fn serial_reports_first_error() {
        let err = map_indexed(10, usize::MAX, |k| {
            if k >= 3 {
                Err(MathError::IndexOutOfBounds { index: vec![k], size: vec![10] })
            } else {
                Ok(Value::Number(0.0))
            }
        })
        .unwrap_err();
        assert_eq!(err, MathError::IndexOutOfBounds { index: vec![3], size: vec![10] });
    }
}
