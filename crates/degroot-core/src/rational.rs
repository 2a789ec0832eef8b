//! Rational Formatter
//!
//! Renders floating-point state as bounded-denominator fractions for display.
//!
//! Approximation works on the exact binary value of the float. The integer
//! part is split off first (best approximations are invariant under integer
//! translation), and the fractional part is walked through its continued
//! fraction convergents. The final candidate is chosen between the last
//! convergent and the largest admissible semiconvergent, with ties going to
//! the convergent.
//!
//! # Example
//!
//! ```
//! use degroot_core::rational::{format_scalar, Rational};
//!
//! assert_eq!(format_scalar(std::f64::consts::PI, 1000).unwrap(), "355/113");
//! assert_eq!(Rational::approximate(0.4, 10).unwrap().to_string(), "2/5");
//! ```

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Largest binary exponent whose integer part still fits the numerator.
const MAX_WHOLE_EXPONENT: i32 = 73;

/// Largest power of two used as an exact denominator.
const MAX_DENOMINATOR_SHIFT: u32 = 126;

/// Errors raised while approximating a value.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormatError {
    #[error("max_denominator must be at least 1, got {0}")]
    InvalidArgument(u64),
    #[error("cannot approximate non-finite value {0}")]
    NonFinite(f64),
    #[error("value {0} is too large to approximate")]
    OutOfRange(f64),
}

/// Errors raised while parsing `"p/q"` text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseRationalError {
    #[error("empty rational")]
    Empty,
    #[error("invalid integer '{0}'")]
    InvalidNumber(String),
    #[error("zero denominator")]
    ZeroDenominator,
}

/// A reduced fraction with a positive denominator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rational {
    numer: i128,
    denom: u64,
}

impl Rational {
    /// Builds a reduced fraction. The sign is carried by the numerator.
    pub fn new(numer: i128, denom: u64) -> Result<Self, ParseRationalError> {
        if denom == 0 {
            return Err(ParseRationalError::ZeroDenominator);
        }
        let divisor = gcd(numer.unsigned_abs(), u128::from(denom)).max(1);
        Ok(Self {
            numer: numer / divisor as i128,
            denom: (u128::from(denom) / divisor) as u64,
        })
    }

    /// Nearest fraction to `x` whose denominator does not exceed `max_denominator`.
    pub fn approximate(x: f64, max_denominator: u64) -> Result<Self, FormatError> {
        if max_denominator < 1 {
            return Err(FormatError::InvalidArgument(max_denominator));
        }
        if !x.is_finite() {
            return Err(FormatError::NonFinite(x));
        }

        let (whole, num, den) = split_exact(x.abs()).ok_or(FormatError::OutOfRange(x))?;
        let (p, q) = limit_fraction(num, den, u128::from(max_denominator));

        let magnitude = (whole as i128)
            .checked_mul(q as i128)
            .and_then(|w| w.checked_add(p as i128))
            .ok_or(FormatError::OutOfRange(x))?;

        Ok(Self {
            numer: if x < 0.0 { -magnitude } else { magnitude },
            denom: q as u64,
        })
    }

    pub fn numer(&self) -> i128 {
        self.numer
    }

    pub fn denom(&self) -> u64 {
        self.denom
    }

    pub fn is_integer(&self) -> bool {
        self.denom == 1
    }

    pub fn to_f64(&self) -> f64 {
        self.numer as f64 / self.denom as f64
    }
}

impl fmt::Display for Rational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_integer() {
            write!(f, "{}", self.numer)
        } else {
            write!(f, "{}/{}", self.numer, self.denom)
        }
    }
}

impl FromStr for Rational {
    type Err = ParseRationalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ParseRationalError::Empty);
        }

        let (numer, denom) = match s.split_once('/') {
            Some((n, d)) => (n.trim(), d.trim()),
            None => (s, "1"),
        };
        let numer: i128 = numer
            .parse()
            .map_err(|_| ParseRationalError::InvalidNumber(numer.to_string()))?;
        let denom: u64 = denom
            .parse()
            .map_err(|_| ParseRationalError::InvalidNumber(denom.to_string()))?;

        Rational::new(numer, denom)
    }
}

/// Formats one value as `"p/q"`, or a bare integer when `q == 1`.
pub fn format_scalar(x: f64, max_denominator: u64) -> Result<String, FormatError> {
    Rational::approximate(x, max_denominator).map(|r| r.to_string())
}

/// Formats every element of a scalar, vector or matrix, preserving its shape.
pub fn format_all<T>(values: &T, max_denominator: u64) -> Result<T::Output, FormatError>
where
    T: RationalFormat + ?Sized,
{
    values.format_rational(max_denominator)
}

/// Shape-preserving elementwise rational formatting.
pub trait RationalFormat {
    type Output;

    fn format_rational(&self, max_denominator: u64) -> Result<Self::Output, FormatError>;
}

impl RationalFormat for f64 {
    type Output = String;

    fn format_rational(&self, max_denominator: u64) -> Result<String, FormatError> {
        format_scalar(*self, max_denominator)
    }
}

impl<T: RationalFormat> RationalFormat for [T] {
    type Output = Vec<T::Output>;

    fn format_rational(&self, max_denominator: u64) -> Result<Self::Output, FormatError> {
        self.iter()
            .map(|v| v.format_rational(max_denominator))
            .collect()
    }
}

impl<T: RationalFormat> RationalFormat for Vec<T> {
    type Output = Vec<T::Output>;

    fn format_rational(&self, max_denominator: u64) -> Result<Self::Output, FormatError> {
        self.as_slice().format_rational(max_denominator)
    }
}

/// Splits a non-negative finite float into `whole + num / den` exactly.
///
/// `den` is a power of two. Below `2^-126` the fraction is truncated, which
/// only matters for denominators far beyond any display limit.
fn split_exact(x: f64) -> Option<(u128, u128, u128)> {
    let bits = x.to_bits();
    let exponent_bits = ((bits >> 52) & 0x7ff) as i32;
    let fraction = bits & ((1u64 << 52) - 1);

    let (mantissa, exponent) = if exponent_bits == 0 {
        (u128::from(fraction), -1074)
    } else {
        (u128::from(fraction | (1u64 << 52)), exponent_bits - 1075)
    };

    if exponent >= 0 {
        if exponent > MAX_WHOLE_EXPONENT {
            return None;
        }
        return Some((mantissa << exponent, 0, 1));
    }

    let shift = exponent.unsigned_abs();
    if shift <= MAX_DENOMINATOR_SHIFT {
        let den = 1u128 << shift;
        Some((mantissa >> shift, mantissa & (den - 1), den))
    } else {
        let num = mantissa
            .checked_shr(shift - MAX_DENOMINATOR_SHIFT)
            .unwrap_or(0);
        Some((0, num, 1u128 << MAX_DENOMINATOR_SHIFT))
    }
}

/// Best approximation of `num / den` (in `[0, 1)`) with denominator `<= max_den`.
fn limit_fraction(num: u128, den: u128, max_den: u128) -> (u128, u128) {
    let divisor = gcd(num, den).max(1);
    let (num, den) = (num / divisor, den / divisor);
    if den <= max_den {
        return (num, den);
    }

    let (mut p0, mut q0, mut p1, mut q1) = (0u128, 1u128, 1u128, 0u128);
    let (mut n, mut d) = (num, den);
    loop {
        let a = n / d;
        let q2 = match a.checked_mul(q1).and_then(|v| v.checked_add(q0)) {
            Some(q2) if q2 <= max_den => q2,
            _ => break,
        };
        (p0, q0, p1, q1) = (p1, q1, p0 + a * p1, q2);
        (n, d) = (d, n - a * d);
    }

    let k = (max_den - q0) / q1;
    let semi_q = q0 + k * q1;
    // The convergent p1/q1 wins unless 2*d*semi_q exceeds the denominator.
    let convergent_closer = d
        .checked_mul(semi_q)
        .and_then(|v| v.checked_mul(2))
        .is_some_and(|v| v <= den);

    if convergent_closer {
        (p1, q1)
    } else {
        (p0 + k * p1, semi_q)
    }
}

fn gcd(mut a: u128, mut b: u128) -> u128 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}
