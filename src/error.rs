//! Error types for crate configuration.
//!
//! This module contains the error type returned when building a
//! [`CheckoutFormsConfig`](crate::CheckoutFormsConfig) or one of its validated
//! newtypes.
//!
//! # Example
//!
//! ```rust
//! use checkout_forms::{ConfigError, CountryCode};
//!
//! let result = CountryCode::new("USA");
//! assert!(matches!(result, Err(ConfigError::InvalidCountryCode { .. })));
//! ```

use thiserror::Error;

/// Errors that can occur while configuring the checkout forms.
///
/// Each variant provides a clear, actionable error message.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Country code is not a two-letter ISO 3166-1 alpha-2 code.
    #[error("Invalid country code '{code}'. Expected two ASCII letters (e.g., 'US').")]
    InvalidCountryCode {
        /// The invalid code that was provided.
        code: String,
    },

    /// Payment method identifier cannot be empty.
    #[error("Payment method id cannot be empty.")]
    EmptyPaymentMethodId,

    /// The address update delay must be greater than zero.
    #[error("Address update delay must be greater than zero.")]
    ZeroUpdateDelay,

    /// The shipping address field set cannot be empty.
    #[error("Shipping address field set cannot be empty. At least one field must trigger a shipping option refresh.")]
    EmptyShippingAddressFields,
}
