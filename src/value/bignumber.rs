//! Arbitrary-precision decimal numbers.
//!
//! A `BigNumber` is `mantissa * 10^-scale` with a `num_bigint::BigInt`
//! mantissa. Values are kept normalized (no trailing zero digits in the
//! mantissa, zero has scale 0), so derived equality is numeric equality.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use num_bigint::BigInt;
use num_integer::Integer;
use num_rational::BigRational;
use num_traits::{Signed, Zero};

use crate::error::{MathError, Result};

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct BigNumber {
    mantissa: BigInt,
    scale: u32,
}

fn pow10(n: u32) -> BigInt {
    BigInt::from(10u32).pow(n)
}

impl BigNumber {
    pub fn new(mantissa: BigInt, scale: u32) -> Self {
        let mut n = Self { mantissa, scale };
        n.normalize();
        n
    }

    pub fn zero() -> Self {
        Self { mantissa: BigInt::zero(), scale: 0 }
    }

    pub fn from_i64(v: i64) -> Self {
        Self::new(BigInt::from(v), 0)
    }

    /// Exact decimal of the shortest representation that round-trips `x`.
    /// Returns `None` for NaN and infinities.
    pub fn from_f64(x: f64) -> Option<Self> {
        if !x.is_finite() {
            return None;
        }
        // f64's Display never uses exponent notation
        format!("{x}").parse().ok()
    }

    pub fn mantissa(&self) -> &BigInt {
        &self.mantissa
    }

    pub fn scale(&self) -> u32 {
        self.scale
    }

    pub fn is_zero(&self) -> bool {
        self.mantissa.is_zero()
    }

    pub fn is_negative(&self) -> bool {
        self.mantissa.is_negative()
    }

    pub fn to_f64(&self) -> f64 {
        self.to_string().parse().unwrap_or(f64::NAN)
    }

    pub fn to_ratio(&self) -> BigRational {
        BigRational::new(self.mantissa.clone(), pow10(self.scale))
    }

    pub fn add(&self, other: &Self) -> Self {
        let (a, b, scale) = self.aligned(other);
        Self::new(a + b, scale)
    }

    pub fn sub(&self, other: &Self) -> Self {
        let (a, b, scale) = self.aligned(other);
        Self::new(a - b, scale)
    }

    pub fn mul(&self, other: &Self) -> Self {
        Self::new(&self.mantissa * &other.mantissa, self.scale + other.scale)
    }

    /// Euclidean remainder: the result has the sign of a positive divisor.
    /// Returns `None` when `divisor` is zero.
    pub fn modulo(&self, divisor: &Self) -> Option<Self> {
        if divisor.is_zero() {
            return None;
        }
        let (a, b, scale) = self.aligned(divisor);
        let r = a.mod_floor(&b.abs());
        Some(Self::new(r, scale))
    }

    /// Quotient truncated to `digits` fractional digits. Returns `None` when
    /// `divisor` is zero.
    pub fn div(&self, divisor: &Self, digits: u32) -> Option<Self> {
        if divisor.is_zero() {
            return None;
        }
        // (ma / 10^sa) / (mb / 10^sb) = ma * 10^sb / (mb * 10^sa)
        let num = &self.mantissa * pow10(divisor.scale + digits);
        let den = &divisor.mantissa * pow10(self.scale);
        Some(Self::new(num / den, digits))
    }

    fn aligned(&self, other: &Self) -> (BigInt, BigInt, u32) {
        let scale = self.scale.max(other.scale);
        let a = &self.mantissa * pow10(scale - self.scale);
        let b = &other.mantissa * pow10(scale - other.scale);
        (a, b, scale)
    }

    fn normalize(&mut self) {
        if self.mantissa.is_zero() {
            self.scale = 0;
            return;
        }
        let ten = BigInt::from(10u32);
        while self.scale > 0 {
            let (q, r) = self.mantissa.div_rem(&ten);
            if !r.is_zero() {
                break;
            }
            self.mantissa = q;
            self.scale -= 1;
        }
    }
}

impl PartialOrd for BigNumber {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for BigNumber {
    fn cmp(&self, other: &Self) -> Ordering {
        let (a, b, _) = self.aligned(other);
        a.cmp(&b)
    }
}

/// Largest decimal exponent accepted when parsing.
pub const MAX_DECIMAL_EXPONENT: u64 = 1_000_000;

impl FromStr for BigNumber {
    type Err = MathError;

    fn from_str(s: &str) -> Result<Self> {
        let fail = || MathError::ConversionFailed {
            from: "string",
            to: "BigNumber",
            reason: format!("'{s}' is not a decimal number"),
        };
        let text = s.trim();
        let (body, exp) = match text.find(['e', 'E']) {
            Some(i) => {
                let exp: i64 = text[i + 1..].parse().map_err(|_| fail())?;
                (&text[..i], exp)
            }
            None => (text, 0),
        };
        let (negative, body) = match body.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, body.strip_prefix('+').unwrap_or(body)),
        };
        let (int_part, frac_part) = body.split_once('.').unwrap_or((body, ""));
        let all_digits = |p: &str| p.bytes().all(|b| b.is_ascii_digit());
        if (int_part.is_empty() && frac_part.is_empty()) || !all_digits(int_part) || !all_digits(frac_part) {
            return Err(fail());
        }
        let digits = format!("{int_part}{frac_part}");
        let mut mantissa = BigInt::parse_bytes(digits.as_bytes(), 10).ok_or_else(fail)?;
        if negative {
            mantissa = -mantissa;
        }
        let scale = i64::try_from(frac_part.len())
            .ok()
            .and_then(|len| len.checked_sub(exp))
            .filter(|scale| scale.unsigned_abs() <= MAX_DECIMAL_EXPONENT)
            .ok_or_else(|| MathError::ConversionFailed {
                from: "string",
                to: "BigNumber",
                reason: format!("exponent of '{s}' is out of range"),
            })?;
        // |scale| is bounded above, so both casts are lossless
        if scale < 0 {
            Ok(Self::new(mantissa * pow10(scale.unsigned_abs() as u32), 0))
        } else {
            Ok(Self::new(mantissa, scale as u32))
        }
    }
}

impl fmt::Display for BigNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = self.mantissa.abs().to_string();
        let sign = if self.is_negative() { "-" } else { "" };
        let scale = self.scale as usize;
        if scale == 0 {
            write!(f, "{sign}{digits}")
        } else if digits.len() > scale {
            let (int, frac) = digits.split_at(digits.len() - scale);
            write!(f, "{sign}{int}.{frac}")
        } else {
            write!(f, "{sign}0.{}{digits}", "0".repeat(scale - digits.len()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn big(s: &str) -> BigNumber {
        s.parse().unwrap()
    }

    #[test]
    fn parse_and_display() {
        assert_eq!(big("12.500").to_string(), "12.5");
        assert_eq!(big("-0.0025").to_string(), "-0.0025");
        assert_eq!(big("1.5e3").to_string(), "1500");
        assert_eq!(big("25e-3").to_string(), "0.025");
        assert_eq!(big("-0").to_string(), "0");
        assert!("1.2.3".parse::<BigNumber>().is_err());
        assert!("abc".parse::<BigNumber>().is_err());
        assert!(".".parse::<BigNumber>().is_err());
    }

    #[test]
    fn extreme_exponents_are_rejected() {
        let too_small = "1e-9223372036854775808".parse::<BigNumber>();
        assert!(matches!(too_small, Err(MathError::ConversionFailed { .. })));
        let too_large = "1e4000000000".parse::<BigNumber>();
        assert!(matches!(too_large, Err(MathError::ConversionFailed { .. })));
        assert!("1.5e9223372036854775807".parse::<BigNumber>().is_err());
        assert_eq!(big("1e-1000").scale(), 1000);
        assert_eq!(big("2e1000"), BigNumber::new(BigInt::from(2) * pow10(1000), 0));
    }

    #[test]
    fn from_f64_is_shortest_decimal() {
        assert_eq!(BigNumber::from_f64(0.1).unwrap(), big("0.1"));
        assert_eq!(BigNumber::from_f64(-2.0).unwrap(), big("-2"));
        assert!(BigNumber::from_f64(f64::NAN).is_none());
    }

    #[test]
    fn arithmetic() {
        assert_eq!(big("0.1").add(&big("0.2")), big("0.3"));
        assert_eq!(big("1").sub(&big("0.25")), big("0.75"));
        assert_eq!(big("1.5").mul(&big("-2")), big("-3"));
        assert_eq!(big("1").div(&big("4"), 10).unwrap(), big("0.25"));
        assert_eq!(big("1").div(&big("3"), 3).unwrap(), big("0.333"));
        assert!(big("1").div(&BigNumber::zero(), 3).is_none());
    }

    #[test]
    fn euclidean_modulo() {
        assert_eq!(big("8").modulo(&big("3")).unwrap(), big("2"));
        assert_eq!(big("-7").modulo(&big("3")).unwrap(), big("2"));
        assert_eq!(big("5.5").modulo(&big("2")).unwrap(), big("1.5"));
        assert!(big("1").modulo(&BigNumber::zero()).is_none());
    }

    #[test]
    fn ordering_and_ratio() {
        assert!(big("0.5") < big("0.75"));
        assert!(big("-1") < BigNumber::zero());
        assert_eq!(big("0.25").to_ratio(), BigRational::new(1.into(), 4.into()));
    }
}
