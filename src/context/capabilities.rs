//! Collaborators an operation may depend on.

use std::sync::Arc;

use bitflags::bitflags;

use crate::config::MathOptions;
use crate::dispatch::TypedFunction;
use crate::value::UnitSystem;

bitflags! {
    /// Collaborators an operation declares it needs.
    #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
    pub struct Capability: u8 {
        /// Matrix storage types and the element-wise algorithms.
        const MATRIX       = 1 << 0;
        /// The `equalScalar` typed function.
        const EQUAL_SCALAR = 1 << 1;
        /// Array to dense matrix conversion.
        const DENSE_MATRIX = 1 << 2;
        /// A unit system.
        const UNITS        = 1 << 3;
    }
}

impl Capability {
    /// Name of the first flag in the set, for error messages.
    pub fn first_name(self) -> &'static str {
        self.iter_names().next().map_or("unknown", |(name, _)| name)
    }
}

/// Injected collaborators, shared by every operation of a context.
#[derive(Debug, Clone)]
pub struct Capabilities {
    options: MathOptions,
    equal_scalar: Option<Arc<TypedFunction>>,
    units: Option<Arc<dyn UnitSystem>>,
}

impl Capabilities {
    pub fn new(options: MathOptions) -> Self {
        Self { options, equal_scalar: None, units: None }
    }

    pub fn with_equal_scalar(mut self, equal_scalar: Arc<TypedFunction>) -> Self {
        self.equal_scalar = Some(equal_scalar);
        self
    }

    pub fn with_units(mut self, units: Arc<dyn UnitSystem>) -> Self {
        self.units = Some(units);
        self
    }

    pub fn options(&self) -> &MathOptions {
        &self.options
    }

    pub fn equal_scalar(&self) -> Option<&TypedFunction> {
        self.equal_scalar.as_deref()
    }

    pub fn units(&self) -> Option<&dyn UnitSystem> {
        self.units.as_deref()
    }

    /// Capabilities available to operations.
    pub fn provided(&self) -> Capability {
        let mut caps = Capability::MATRIX | Capability::DENSE_MATRIX;
        if self.equal_scalar.is_some() {
            caps |= Capability::EQUAL_SCALAR;
        }
        if self.units.is_some() {
            caps |= Capability::UNITS;
        }
        caps
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::BasicUnits;

    #[test]
    fn provided_tracks_collaborators() {
        let caps = Capabilities::new(MathOptions::default());
        assert_eq!(caps.provided(), Capability::MATRIX | Capability::DENSE_MATRIX);
        let caps = caps.with_units(Arc::new(BasicUnits::new()));
        assert!(caps.provided().contains(Capability::UNITS));
        assert!(!caps.provided().contains(Capability::EQUAL_SCALAR));
    }

    #[test]
    fn first_name() {
        assert_eq!((Capability::UNITS | Capability::EQUAL_SCALAR).first_name(), "EQUAL_SCALAR");
        assert_eq!(Capability::empty().first_name(), "unknown");
    }
}
