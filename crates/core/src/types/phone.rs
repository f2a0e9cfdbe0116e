//! Indian mobile number type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`PhoneNumber`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PhoneError {
    #[error("Phone number is required")]
    Empty,
    #[error("Phone number must be 10 digits")]
    NotTenDigits,
}

/// A ten-digit phone number without country code or separators.
///
/// ```
/// use bihar_bhojan_core::PhoneNumber;
///
/// assert!(PhoneNumber::parse("9876543210").is_ok());
/// assert!(PhoneNumber::parse("+919876543210").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PhoneNumber(String);

impl PhoneNumber {
    pub const DIGITS: usize = 10;

    /// Parse a phone number.
    ///
    /// # Errors
    ///
    /// Returns [`PhoneError::Empty`] for an empty string and
    /// [`PhoneError::NotTenDigits`] for anything other than exactly ten
    /// ASCII digits.
    pub fn parse(s: &str) -> Result<Self, PhoneError> {
        if s.is_empty() {
            return Err(PhoneError::Empty);
        }
        if s.len() != Self::DIGITS || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(PhoneError::NotTenDigits);
        }
        Ok(Self(s.to_owned()))
    }

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

impl TryFrom<String> for PhoneNumber {
    type Error = PhoneError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<PhoneNumber> for String {
    fn from(phone: PhoneNumber) -> Self {
        phone.0
    }
}

impl AsRef<str> for PhoneNumber {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ten_ascii_digits_only() {
        assert!(PhoneNumber::parse("9876543210").is_ok());
        assert_eq!(PhoneNumber::parse(""), Err(PhoneError::Empty));
        assert_eq!(PhoneNumber::parse("123"), Err(PhoneError::NotTenDigits));
        assert_eq!(PhoneNumber::parse("98765432100"), Err(PhoneError::NotTenDigits));
        assert_eq!(PhoneNumber::parse("98765-4321"), Err(PhoneError::NotTenDigits));
        // Devanagari digits are not ASCII
        assert_eq!(
            PhoneNumber::parse("९८७६५४३२१०"),
            Err(PhoneError::NotTenDigits)
        );
    }

    #[test]
    fn test_error_mentions_ten_digits() {
        assert!(PhoneError::NotTenDigits.to_string().contains("10 digits"));
    }
}
