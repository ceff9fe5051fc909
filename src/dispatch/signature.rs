//! Signatures: ordered parameter lists of type sets.
//!
//! Text form follows the registration tables of typed functions:
//! parameters are separated by commas, alternatives by `|`, and `any`
//! accepts every type. `Matrix` is shorthand for
//! `DenseMatrix | SparseMatrix`.

use std::fmt;
use std::str::FromStr;

use bitflags::bitflags;

use crate::error::MathError;
use crate::value::TypeTag;

bitflags! {
    #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
    pub struct TypeSet: u16 {
        const BOOLEAN       = 1 << 0;
        const NUMBER        = 1 << 1;
        const BIGNUMBER     = 1 << 2;
        const FRACTION      = 1 << 3;
        const COMPLEX       = 1 << 4;
        const STRING        = 1 << 5;
        const UNIT          = 1 << 6;
        const ARRAY         = 1 << 7;
        const DENSE_MATRIX  = 1 << 8;
        const SPARSE_MATRIX = 1 << 9;
        const MATRIX        = Self::DENSE_MATRIX.bits() | Self::SPARSE_MATRIX.bits();
    }
}

impl From<TypeTag> for TypeSet {
    fn from(tag: TypeTag) -> Self {
        match tag {
            TypeTag::Boolean => TypeSet::BOOLEAN,
            TypeTag::Number => TypeSet::NUMBER,
            TypeTag::BigNumber => TypeSet::BIGNUMBER,
            TypeTag::Fraction => TypeSet::FRACTION,
            TypeTag::Complex => TypeSet::COMPLEX,
            TypeTag::String => TypeSet::STRING,
            TypeTag::Unit => TypeSet::UNIT,
            TypeTag::Array => TypeSet::ARRAY,
            TypeTag::DenseMatrix => TypeSet::DENSE_MATRIX,
            TypeTag::SparseMatrix => TypeSet::SPARSE_MATRIX,
        }
    }
}

impl TypeSet {
    pub fn accepts(self, tag: TypeTag) -> bool {
        self.contains(TypeSet::from(tag))
    }

    fn parse_name(name: &str) -> Option<TypeSet> {
        match name {
            "Matrix" => Some(TypeSet::MATRIX),
            _ => TypeTag::from_name(name).map(TypeSet::from),
        }
    }
}

/// One parameter of a signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Param {
    Any,
    Types(TypeSet),
}

impl Param {
    pub fn accepts(self, tag: TypeTag) -> bool {
        match self {
            Param::Any => true,
            Param::Types(set) => set.accepts(tag),
        }
    }

    /// Lower is more specific: a single type, then a union, then `any`.
    pub fn specificity(self) -> u8 {
        match self {
            Param::Types(set) if set.bits().count_ones() == 1 => 0,
            Param::Types(_) => 1,
            Param::Any => 2,
        }
    }
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Param::Any => f.write_str("any"),
            Param::Types(set) if *set == TypeSet::MATRIX => f.write_str("Matrix"),
            Param::Types(set) => {
                let names: Vec<&str> = TypeTag::ALL
                    .into_iter()
                    .filter(|t| set.accepts(*t))
                    .map(TypeTag::name)
                    .collect();
                f.write_str(&names.join(" | "))
            }
        }
    }
}

/// Ordered parameter list of one registration.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Signature {
    params: Vec<Param>,
}

impl Signature {
    pub fn new(params: Vec<Param>) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &[Param] {
        &self.params
    }

    pub fn arity(&self) -> usize {
        self.params.len()
    }

    /// Per-position specificity when every position accepts its tag
    /// directly, `None` otherwise.
    pub fn direct_match(&self, tags: &[TypeTag]) -> Option<Vec<u8>> {
        if tags.len() != self.params.len() {
            return None;
        }
        self.params
            .iter()
            .zip(tags)
            .map(|(p, &t)| p.accepts(t).then(|| p.specificity()))
            .collect()
    }
}

impl FromStr for Signature {
    type Err = MathError;

    fn from_str(s: &str) -> Result<Self, MathError> {
        if s.trim().is_empty() {
            return Ok(Self { params: Vec::new() });
        }
        let params = s
            .split(',')
            .map(|param| {
                let mut set = TypeSet::empty();
                for name in param.split('|').map(str::trim) {
                    if name == "any" {
                        return Ok(Param::Any);
                    }
                    set |= TypeSet::parse_name(name)
                        .ok_or_else(|| MathError::UnknownType(name.to_string()))?;
                }
                Ok(Param::Types(set))
            })
            .collect::<Result<Vec<_>, MathError>>()?;
        Ok(Self { params })
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, p) in self.params.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{p}")?;
        }
        Ok(())
    }
}
