//! Validated newtype wrappers for configuration values.
//!
//! These wrappers validate their contents on construction. Invalid values are
//! rejected with a [`ConfigError`].

use crate::error::ConfigError;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A validated ISO 3166-1 alpha-2 country code.
///
/// Codes are normalized to upper case, so `"us"` and `"US"` compare equal.
///
/// # Example
///
/// ```rust
/// use checkout_forms::CountryCode;
///
/// let code = CountryCode::new("ca").unwrap();
/// assert_eq!(code.as_ref(), "CA");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CountryCode(String);

impl CountryCode {
    /// Creates a new validated country code.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidCountryCode`] unless the input is exactly
    /// two ASCII letters after trimming.
    pub fn new(code: impl Into<String>) -> Result<Self, ConfigError> {
        let code = code.into();
        let trimmed = code.trim();

        if trimmed.len() != 2 || !trimmed.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(ConfigError::InvalidCountryCode { code });
        }

        Ok(Self(trimmed.to_ascii_uppercase()))
    }
}

impl AsRef<str> for CountryCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CountryCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for CountryCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for CountryCode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::new(s).map_err(de::Error::custom)
    }
}

/// A payment method identifier, such as `"amazonpay"`.
///
/// Identifiers are compared case-sensitively, as the checkout SDK reports them.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PaymentMethodId(String);

impl PaymentMethodId {
    /// Creates a new payment method identifier.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyPaymentMethodId`] if the id is empty or
    /// only whitespace.
    pub fn new(id: impl Into<String>) -> Result<Self, ConfigError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(ConfigError::EmptyPaymentMethodId);
        }
        Ok(Self(id))
    }
}

impl AsRef<str> for PaymentMethodId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PaymentMethodId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
