//! Runtime options for a math context.
//!
//! This module provides the `MathOptions` struct, which controls the tolerance
//! used by `equalScalar`, the number of fractional digits kept by BigNumber
//! division, when dense element-wise walks switch to the rayon pool, and
//! whether dispatch resolutions are memoized.

/// Math context options.
#[derive(Debug, Clone, PartialEq)]
pub struct MathOptions {
    /// Relative tolerance for comparing plain numbers
    pub epsilon: f64,

    /// Fractional digits kept when dividing BigNumbers
    pub precision: u32,

    /// Element count from which dense walks run in parallel
    pub parallel_threshold: usize,

    /// Size of the global rayon pool; `None` leaves the pool untouched,
    /// `Some(0)` uses one thread per logical CPU
    pub num_threads: Option<usize>,

    /// Memoize signature resolution per argument type tuple
    pub cache_resolutions: bool,
}

impl Default for MathOptions {
    fn default() -> Self {
        Self {
            epsilon: 1e-12,
            precision: 64,
            parallel_threshold: 1 << 14,
            num_threads: None,
            cache_resolutions: true,
        }
    }
}
