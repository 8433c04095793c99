// Copyright (c) 2024 Botho Foundation

//! Fixed-point amounts with eight decimal places.
//!
//! An [`Integer`] counts units of 10^-8. On the wire it is the minimal
//! big-endian encoding of that count, behind a 2-byte length; in text and
//! JSON it is a decimal string such as `"100.00000000"`.

use displaydoc::Display;
use primitive_types::U256;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::{fmt, str::FromStr};

/// Number of decimal places.
pub const PRECISION: usize = 8;

/// Units in one whole token.
pub const UNITS_PER_WHOLE: u64 = 100_000_000;

/// An error which can occur when parsing or computing an amount.
#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq)]
pub enum AmountError {
    /// Invalid decimal string
    InvalidDecimal,

    /// More than 8 fractional digits
    TooPrecise,

    /// Amount must be strictly positive
    NonPositive,

    /// Amount overflow
    Overflow,

    /// Amount underflow
    Underflow,

    /// Division by zero
    DivideByZero,

    /// Encoded amount is {0} bytes, at most 32 are allowed
    TooLarge(usize),
}

impl std::error::Error for AmountError {}

/// A non-negative amount in units of 10^-8.
#[derive(Clone, Copy, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Integer(U256);

impl Integer {
    pub const ZERO: Integer = Integer(U256([0; 4]));

    pub fn from_units(units: u64) -> Self {
        Self(U256::from(units))
    }

    /// `whole` full tokens.
    pub fn from_whole(whole: u64) -> Self {
        Self(U256::from(whole) * U256::from(UNITS_PER_WHOLE))
    }

    /// The raw unit count.
    pub fn units(&self) -> U256 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// 0 for zero, 1 otherwise.
    pub fn sign(&self) -> i32 {
        if self.is_zero() {
            0
        } else {
            1
        }
    }

    pub fn checked_add(self, other: Integer) -> Result<Integer, AmountError> {
        self.0
            .checked_add(other.0)
            .map(Integer)
            .ok_or(AmountError::Overflow)
    }

    pub fn checked_sub(self, other: Integer) -> Result<Integer, AmountError> {
        self.0
            .checked_sub(other.0)
            .map(Integer)
            .ok_or(AmountError::Underflow)
    }

    pub fn checked_mul(self, factor: u64) -> Result<Integer, AmountError> {
        self.0
            .checked_mul(U256::from(factor))
            .map(Integer)
            .ok_or(AmountError::Overflow)
    }

    pub fn checked_div(self, divisor: u64) -> Result<Integer, AmountError> {
        if divisor == 0 {
            return Err(AmountError::DivideByZero);
        }
        Ok(Integer(self.0 / U256::from(divisor)))
    }

    /// How many whole `step`s fit in this amount, saturating at `u64::MAX`.
    pub fn count(&self, step: Integer) -> u64 {
        if step.is_zero() {
            return 0;
        }
        let n = self.0 / step.0;
        if n > U256::from(u64::MAX) {
            u64::MAX
        } else {
            n.low_u64()
        }
    }

    /// Minimal big-endian bytes; zero is empty.
    pub fn to_be_bytes(&self) -> Vec<u8> {
        let mut buf = [0u8; 32];
        self.0.to_big_endian(&mut buf);
        let start = buf.iter().position(|b| *b != 0).unwrap_or(buf.len());
        buf[start..].to_vec()
    }

    /// Inverse of [`Integer::to_be_bytes`]. Leading zeros are tolerated.
    pub fn from_be_bytes(bytes: &[u8]) -> Result<Integer, AmountError> {
        let start = bytes.iter().position(|b| *b != 0).unwrap_or(bytes.len());
        let significant = &bytes[start..];
        if significant.len() > 32 {
            return Err(AmountError::TooLarge(bytes.len()));
        }
        Ok(Integer(U256::from_big_endian(significant)))
    }

    /// Parse a decimal string, allowing zero.
    fn parse_decimal(s: &str) -> Result<Integer, AmountError> {
        let (whole, frac) = match s.split_once('.') {
            Some((w, f)) => (w, f),
            None => (s, ""),
        };
        if whole.is_empty() && frac.is_empty() {
            return Err(AmountError::InvalidDecimal);
        }
        if !whole.bytes().all(|b| b.is_ascii_digit()) || !frac.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(AmountError::InvalidDecimal);
        }
        if frac.len() > PRECISION {
            return Err(AmountError::TooPrecise);
        }

        let whole = if whole.is_empty() {
            U256::zero()
        } else {
            U256::from_dec_str(whole).map_err(|_| AmountError::Overflow)?
        };
        let mut frac_units = 0u64;
        for (i, b) in frac.bytes().enumerate() {
            frac_units += u64::from(b - b'0') * 10u64.pow((PRECISION - 1 - i) as u32);
        }

        whole
            .checked_mul(U256::from(UNITS_PER_WHOLE))
            .and_then(|w| w.checked_add(U256::from(frac_units)))
            .map(Integer)
            .ok_or(AmountError::Overflow)
    }
}

impl FromStr for Integer {
    type Err = AmountError;

    /// Parse a strictly positive decimal amount.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let amount = Self::parse_decimal(s)?;
        if amount.is_zero() {
            return Err(AmountError::NonPositive);
        }
        Ok(amount)
    }
}

impl fmt::Display for Integer {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let unit = U256::from(UNITS_PER_WHOLE);
        let whole = self.0 / unit;
        let frac = (self.0 % unit).low_u64();
        write!(f, "{}.{:08}", whole, frac)
    }
}

impl fmt::Debug for Integer {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Integer({self})")
    }
}

impl Serialize for Integer {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Integer {
    /// Amounts read back from JSON may be zero, e.g. an empty balance.
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse_decimal(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_decimal_parse_and_display() {
        let a: Integer = "100".parse().unwrap();
        assert_eq!(a, Integer::from_whole(100));
        assert_eq!(a.to_string(), "100.00000000");

        let b: Integer = "0.00000001".parse().unwrap();
        assert_eq!(b, Integer::from_units(1));
        assert_eq!(b.to_string(), "0.00000001");

        let c: Integer = "13439.5".parse().unwrap();
        assert_eq!(c.to_string(), "13439.50000000");

        let d: Integer = ".25".parse().unwrap();
        assert_eq!(d, Integer::from_units(25_000_000));
    }

    #[test]
    fn test_decimal_rejects() {
        assert_matches!("0".parse::<Integer>(), Err(AmountError::NonPositive));
        assert_matches!("0.000".parse::<Integer>(), Err(AmountError::NonPositive));
        assert_matches!("-1".parse::<Integer>(), Err(AmountError::InvalidDecimal));
        assert_matches!("1e5".parse::<Integer>(), Err(AmountError::InvalidDecimal));
        assert_matches!(".".parse::<Integer>(), Err(AmountError::InvalidDecimal));
        assert_matches!("".parse::<Integer>(), Err(AmountError::InvalidDecimal));
        assert_matches!(
            "1.000000001".parse::<Integer>(),
            Err(AmountError::TooPrecise)
        );
    }

    #[test]
    fn test_wire_bytes() {
        assert!(Integer::ZERO.to_be_bytes().is_empty());
        // 100 XIN = 10^10 units = 0x02540be400
        assert_eq!(
            Integer::from_whole(100).to_be_bytes(),
            vec![0x02, 0x54, 0x0b, 0xe4, 0x00]
        );
        assert_eq!(
            Integer::from_be_bytes(&[0x02, 0x54, 0x0b, 0xe4, 0x00]).unwrap(),
            Integer::from_whole(100)
        );
        assert_eq!(
            Integer::from_be_bytes(&[0, 0, 1]).unwrap(),
            Integer::from_units(1)
        );
        assert_eq!(Integer::from_be_bytes(&[]).unwrap(), Integer::ZERO);
        assert_matches!(
            Integer::from_be_bytes(&[1u8; 33]),
            Err(AmountError::TooLarge(33))
        );
    }

    #[test]
    fn test_arithmetic() {
        let a = Integer::from_whole(3);
        let b = Integer::from_whole(1);
        assert_eq!(a.checked_sub(b).unwrap(), Integer::from_whole(2));
        assert_matches!(b.checked_sub(a), Err(AmountError::Underflow));
        assert_eq!(a.checked_add(b).unwrap(), Integer::from_whole(4));
        assert_eq!(b.checked_mul(5).unwrap(), Integer::from_whole(5));
        assert_eq!(a.checked_div(3).unwrap(), b);
        assert_matches!(a.checked_div(0), Err(AmountError::DivideByZero));
        assert!(a > b);
        assert_eq!(Integer::ZERO.sign(), 0);
        assert_eq!(a.sign(), 1);
    }

    #[test]
    fn test_count_steps() {
        let step = Integer::from_units(100_000);
        assert_eq!("0.0029".parse::<Integer>().unwrap().count(step), 2);
        assert_eq!("1".parse::<Integer>().unwrap().count(step), 1000);
        assert_eq!(Integer::ZERO.count(step), 0);
        assert_eq!(Integer::from_whole(1).count(Integer::ZERO), 0);
    }

    #[test]
    fn test_json_as_decimal_string() {
        let a: Integer = "12.5".parse().unwrap();
        let json = serde_json::to_string(&a).unwrap();
        assert_eq!(json, "\"12.50000000\"");
        assert_eq!(serde_json::from_str::<Integer>(&json).unwrap(), a);
        assert_eq!(
            serde_json::from_str::<Integer>("\"0\"").unwrap(),
            Integer::ZERO
        );
    }
}
