//! Phone number type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`PhoneNumber`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PhoneError {
    /// The input is not exactly ten characters long.
    #[error("phone number must be exactly {expected} digits")]
    WrongLength {
        /// Required number of digits.
        expected: usize,
    },
    /// The input contains a non-digit character.
    #[error("phone number must contain only digits")]
    NonDigit,
    /// The leading digit is outside 6-9.
    #[error("phone number must start with 6, 7, 8 or 9")]
    InvalidPrefix,
}

/// A 10-digit Indian mobile number (no country code, no separators).
///
/// ```
/// use perfume_house_core::PhoneNumber;
///
/// assert!(PhoneNumber::parse("9876543210").is_ok());
/// assert!(PhoneNumber::parse("5876543210").is_err()); // bad prefix
/// assert!(PhoneNumber::parse("98765").is_err());      // too short
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Number of digits in a mobile number.
    pub const DIGITS: usize = 10;

    /// Parse a `PhoneNumber` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is not ten ASCII digits starting with 6-9.
    pub fn parse(s: &str) -> Result<Self, PhoneError> {
        if !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(PhoneError::NonDigit);
        }

        if s.len() != Self::DIGITS {
            return Err(PhoneError::WrongLength {
                expected: Self::DIGITS,
            });
        }

        match s.as_bytes().first() {
            Some(b'6'..=b'9') => Ok(Self(s.to_owned())),
            _ => Err(PhoneError::InvalidPrefix),
        }
    }

    /// Returns the number as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for PhoneNumber {
    type Err = PhoneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_numbers() {
        for number in ["6000000000", "7123456789", "8999999999", "9876543210"] {
            assert!(PhoneNumber::parse(number).is_ok(), "{number} should parse");
        }
    }

    #[test]
    fn test_parse_invalid_prefix() {
        assert_eq!(
            PhoneNumber::parse("1234567890"),
            Err(PhoneError::InvalidPrefix)
        );
    }

    #[test]
    fn test_parse_wrong_length() {
        assert_eq!(
            PhoneNumber::parse("98765432101"),
            Err(PhoneError::WrongLength { expected: 10 })
        );
        assert_eq!(
            PhoneNumber::parse(""),
            Err(PhoneError::WrongLength { expected: 10 })
        );
    }

    #[test]
    fn test_parse_non_digit() {
        assert_eq!(
            PhoneNumber::parse("98765-4321"),
            Err(PhoneError::NonDigit)
        );
        assert_eq!(
            PhoneNumber::parse("+919876543210"),
            Err(PhoneError::NonDigit)
        );
    }
}
