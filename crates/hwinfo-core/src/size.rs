//! Exact byte quantities and their human-readable form.
//!
//! Units are binary: every step from `byte` to `TB` is exactly 1024x the
//! previous one. [`ByteSize`]'s `Display` picks the largest unit that divides
//! the count evenly, so the printed form always parses back to the same
//! integer.
//!
//! ```
//! use hwinfo_core::size::{ByteSize, Unit};
//!
//! let size: ByteSize = "4096 MB".parse().unwrap();
//! assert_eq!(size.to_string(), "4 GB");
//! assert_eq!(size.format_at(Unit::MB), "4096 MB");
//! ```

use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign};
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

/// `<number><optional whitespace><unit>`. The number needs at least one digit.
static SIZE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-9]+(?:\.[0-9]+)?|\.[0-9]+)\s*([A-Za-z()]+)$")
        .expect("size pattern is a valid regex")
});

/// A display unit. Each variant is 1024x the previous one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Unit {
    Byte,
    KB,
    MB,
    GB,
    TB,
}

impl Unit {
    /// All units from smallest to largest.
    pub const ALL: [Unit; 5] = [Unit::Byte, Unit::KB, Unit::MB, Unit::GB, Unit::TB];

    /// Number of bytes in one of this unit.
    pub const fn bytes(self) -> u64 {
        1u64 << (10 * self as u32)
    }

    /// Suffix used when printing.
    pub const fn name(self) -> &'static str {
        match self {
            Unit::Byte => "byte",
            Unit::KB => "kB",
            Unit::MB => "MB",
            Unit::GB => "GB",
            Unit::TB => "TB",
        }
    }

    /// Case-insensitive unit token lookup.
    fn from_token(token: &str) -> Option<Unit> {
        match token.to_ascii_lowercase().as_str() {
            "byte" | "bytes" | "byte(s)" => Some(Unit::Byte),
            "kb" => Some(Unit::KB),
            "mb" => Some(Unit::MB),
            "gb" => Some(Unit::GB),
            "tb" => Some(Unit::TB),
            _ => None,
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when a size string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("unable to parse size: {0:?}")]
    Malformed(String),
    #[error("invalid byte unit: {0:?}")]
    UnknownUnit(String),
    #[error("size does not fit in 64 bits: {0:?}")]
    TooLarge(String),
}

/// An exact, non-negative number of bytes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct ByteSize(u64);

impl ByteSize {
    pub const ZERO: ByteSize = ByteSize(0);

    pub const fn new(bytes: u64) -> Self {
        Self(bytes)
    }

    pub const fn bytes(self) -> u64 {
        self.0
    }

    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// `None` when the sum does not fit in 64 bits.
    pub const fn checked_add(self, rhs: ByteSize) -> Option<ByteSize> {
        match self.0.checked_add(rhs.0) {
            Some(bytes) => Some(ByteSize(bytes)),
            None => None,
        }
    }

    /// Formats the size in a fixed unit with up to 4 significant digits.
    ///
    /// Unlike `Display`, the result is not guaranteed to parse back exactly:
    /// `ByteSize::new(1536).format_at(Unit::KB)` is `"1.5 kB"`, while
    /// `ByteSize::new(1000).format_at(Unit::KB)` is `"0.9766 kB"`.
    pub fn format_at(self, unit: Unit) -> String {
        let value = self.0 as f64 / unit.bytes() as f64;
        format!("{} {}", format_significant(value, 4), unit)
    }
}

impl fmt::Display for ByteSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 == 0 {
            return f.write_str("0");
        }
        for unit in Unit::ALL[1..].iter().rev() {
            let q = unit.bytes();
            if self.0 % q == 0 {
                return write!(f, "{} {}", self.0 / q, unit);
            }
        }
        if self.0 == 1 {
            f.write_str("1 byte")
        } else {
            write!(f, "{} bytes", self.0)
        }
    }
}

impl FromStr for ByteSize {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s == "0" {
            return Ok(ByteSize::ZERO);
        }
        let caps = SIZE_RE
            .captures(s)
            .ok_or_else(|| ParseError::Malformed(s.to_string()))?;
        let unit = Unit::from_token(&caps[2]).ok_or_else(|| ParseError::UnknownUnit(s.to_string()))?;
        let number = &caps[1];

        // Whole numbers stay in integers so every u64 round-trips exactly.
        if !number.contains('.') {
            return number
                .parse::<u64>()
                .ok()
                .and_then(|n| n.checked_mul(unit.bytes()))
                .map(ByteSize)
                .ok_or_else(|| ParseError::TooLarge(s.to_string()));
        }

        let value: f64 = number
            .parse()
            .unwrap_or_else(|_| unreachable!("size pattern admitted {:?}", number));
        let bytes = value * unit.bytes() as f64;
        // u64::MAX is not representable as f64; 2^64 is the first value past it.
        if bytes >= 18_446_744_073_709_551_616.0 {
            return Err(ParseError::TooLarge(s.to_string()));
        }
        Ok(ByteSize(bytes as u64))
    }
}

impl From<u64> for ByteSize {
    fn from(bytes: u64) -> Self {
        Self(bytes)
    }
}

/// Saturates at `u64::MAX` bytes. Use [`ByteSize::checked_add`] to detect it.
impl Add for ByteSize {
    type Output = ByteSize;

    fn add(self, rhs: ByteSize) -> ByteSize {
        ByteSize(self.0.saturating_add(rhs.0))
    }
}

impl AddAssign for ByteSize {
    fn add_assign(&mut self, rhs: ByteSize) {
        *self = *self + rhs;
    }
}

impl Sum for ByteSize {
    fn sum<I: Iterator<Item = ByteSize>>(iter: I) -> ByteSize {
        iter.fold(ByteSize::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a ByteSize> for ByteSize {
    fn sum<I: Iterator<Item = &'a ByteSize>>(iter: I) -> ByteSize {
        iter.copied().sum()
    }
}

/// Renders `value` like C's `%.{digits}g`: fixed notation for moderate
/// exponents, scientific otherwise, trailing zeros removed.
fn format_significant(value: f64, digits: usize) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    // `{:e}` rounds to the requested precision first, which settles the exponent.
    let sci = format!("{:.*e}", digits - 1, value);
    let (mantissa, exp) = sci.split_once('e').unwrap_or((sci.as_str(), "0"));
    let exp: i32 = exp.parse().unwrap_or(0);

    if exp < -4 || exp >= digits as i32 {
        let mantissa = trim_fraction(mantissa);
        let sign = if exp < 0 { '-' } else { '+' };
        format!("{}e{}{:02}", mantissa, sign, exp.abs())
    } else {
        let precision = (digits as i32 - 1 - exp).max(0) as usize;
        trim_fraction(&format!("{:.*}", precision, value)).to_string()
    }
}

fn trim_fraction(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}
