//! Physical units.
//!
//! Unit grammar and conversion tables live behind the `UnitSystem` trait so a
//! richer implementation can be injected into a math context. `BasicUnits` is
//! a small built-in table covering length, mass and time.

use std::fmt;

use crate::error::{MathError, Result};
use crate::value::Value;

/// Base dimension of a unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dimension {
    Dimensionless,
    Length,
    Mass,
    Time,
}

/// A named unit and its factor relative to the SI base of its dimension.
#[derive(Debug, Clone, PartialEq)]
pub struct UnitDef {
    pub name: String,
    pub dimension: Dimension,
    pub factor: f64,
}

impl UnitDef {
    pub fn new(name: &str, dimension: Dimension, factor: f64) -> Self {
        Self { name: name.to_string(), dimension, factor }
    }

    pub fn dimensionless() -> Self {
        Self::new("", Dimension::Dimensionless, 1.0)
    }
}

/// A unit, optionally carrying a value (`5 cm`) or pure (`cm`).
#[derive(Debug, Clone, PartialEq)]
pub struct Unit {
    value: Option<Box<Value>>,
    def: UnitDef,
}

impl Unit {
    pub fn new(value: Option<Value>, def: UnitDef) -> Self {
        Self { value: value.map(Box::new), def }
    }

    /// A unit without a value, such as `cm`.
    pub fn valueless(def: UnitDef) -> Self {
        Self { value: None, def }
    }

    pub fn value(&self) -> Option<&Value> {
        self.value.as_deref()
    }

    pub fn is_valueless(&self) -> bool {
        self.value.is_none()
    }

    pub fn def(&self) -> &UnitDef {
        &self.def
    }

    pub fn name(&self) -> &str {
        &self.def.name
    }

    pub fn equal_base(&self, other: &Unit) -> bool {
        self.def.dimension == other.def.dimension
    }

    /// The numeric value expressed in the SI base of the unit's dimension.
    pub fn base_value(&self) -> Option<f64> {
        self.value().and_then(Value::to_f64).map(|v| v * self.def.factor)
    }

    /// Add or subtract `other` after expressing it in `self`'s unit.
    pub(crate) fn combine(&self, other: &Unit, sign: f64) -> Result<Unit> {
        if !self.equal_base(other) {
            return Err(MathError::UnitMismatch {
                left: self.to_string(),
                right: other.to_string(),
            });
        }
        let (Some(a), Some(b)) = (self.value().and_then(Value::to_f64), other.base_value()) else {
            return Err(MathError::Unsupported("unit arithmetic needs numeric values on both sides"));
        };
        let v = a + sign * b / self.def.factor;
        Ok(Unit::new(Some(Value::Number(v)), self.def.clone()))
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.value, self.def.name.is_empty()) {
            (Some(v), true) => write!(f, "{v}"),
            (Some(v), false) => write!(f, "{v} {}", self.def.name),
            (None, _) => write!(f, "{}", self.def.name),
        }
    }
}

/// Unit name lookup and text parsing.
pub trait UnitSystem: Send + Sync + fmt::Debug {
    /// Find a unit by exact name.
    fn lookup(&self, name: &str) -> Option<UnitDef>;

    /// True if `text` names a unit without a value.
    fn is_valueless(&self, text: &str) -> bool {
        self.lookup(text.trim()).is_some()
    }

    /// Parse `"5 cm"`, `"23kg"` or a bare number such as `"5"`.
    fn parse(&self, text: &str) -> Result<Unit>;
}

/// Built-in table of common units.
#[derive(Debug, Clone)]
pub struct BasicUnits {
    table: Vec<UnitDef>,
}

impl Default for BasicUnits {
    fn default() -> Self {
        use Dimension::*;
        let table = vec![
            UnitDef::new("mm", Length, 1e-3),
            UnitDef::new("cm", Length, 1e-2),
            UnitDef::new("m", Length, 1.0),
            UnitDef::new("km", Length, 1e3),
            UnitDef::new("in", Length, 0.0254),
            UnitDef::new("ft", Length, 0.3048),
            UnitDef::new("mg", Mass, 1e-6),
            UnitDef::new("g", Mass, 1e-3),
            UnitDef::new("kg", Mass, 1.0),
            UnitDef::new("ms", Time, 1e-3),
            UnitDef::new("s", Time, 1.0),
            UnitDef::new("min", Time, 60.0),
            UnitDef::new("h", Time, 3600.0),
        ];
        Self { table }
    }
}

impl BasicUnits {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a unit to the table, replacing any unit of the same name.
    pub fn with_unit(mut self, def: UnitDef) -> Self {
        self.table.retain(|d| d.name != def.name);
        self.table.push(def);
        self
    }
}

/// Length of the leading numeric literal in `text`.
fn numeric_prefix_len(text: &str) -> usize {
    let bytes = text.as_bytes();
    let mut i = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        i += 1;
    }
    while i < bytes.len() && (bytes[i].is_ascii_digit() || bytes[i] == b'.') {
        i += 1;
    }
    // exponent only when followed by digits, so "5 e" or "3em" keep their letters
    if i < bytes.len() && matches!(bytes[i], b'e' | b'E') {
        let mut j = i + 1;
        if j < bytes.len() && matches!(bytes[j], b'+' | b'-') {
            j += 1;
        }
        if j < bytes.len() && bytes[j].is_ascii_digit() {
            while j < bytes.len() && bytes[j].is_ascii_digit() {
                j += 1;
            }
            i = j;
        }
    }
    i
}

impl UnitSystem for BasicUnits {
    fn lookup(&self, name: &str) -> Option<UnitDef> {
        self.table.iter().find(|d| d.name == name).cloned()
    }

    fn parse(&self, text: &str) -> Result<Unit> {
        let text = text.trim();
        let split = numeric_prefix_len(text);
        let (number, name) = (&text[..split], text[split..].trim());
        let value = if number.is_empty() {
            None
        } else {
            let v: f64 = number
                .parse()
                .map_err(|_| MathError::InvalidUnit(format!("bad value in '{text}'")))?;
            Some(Value::Number(v))
        };
        let def = if name.is_empty() {
            if value.is_none() {
                return Err(MathError::InvalidUnit("empty unit".to_string()));
            }
            UnitDef::dimensionless()
        } else {
            self.lookup(name)
                .ok_or_else(|| MathError::InvalidUnit(format!("unknown unit '{name}'")))?
        };
        Ok(Unit::new(value, def))
    }
}
