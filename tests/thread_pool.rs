//! Runs in its own binary: the global rayon pool is per process.

use polymat::{MathContext, Value};

#[test]
#[cfg(feature = "rayon")]
fn default_context_leaves_global_pool_to_the_application() {
    let math = MathContext::with_defaults().unwrap();
    let sum = math.add(&Value::Number(1.0), &Value::Number(2.0)).unwrap();
    assert_eq!(sum, Value::Number(3.0));

    rayon::ThreadPoolBuilder::new()
        .num_threads(2)
        .build_global()
        .expect("global pool still unconfigured");
    assert_eq!(rayon::current_num_threads(), 2);
}
