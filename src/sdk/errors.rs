//! Error type for checkout SDK operations.

use thiserror::Error;

/// Error reported by a [`CheckoutService`](crate::sdk::CheckoutService)
/// implementation.
///
/// # Example
///
/// ```rust
/// use checkout_forms::SdkError;
///
/// let error = SdkError::RequestFailed {
///     status: Some(409),
///     message: "Consignment conflict".to_string(),
/// };
/// assert!(error.to_string().contains("409"));
/// ```
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SdkError {
    /// A remote request failed.
    #[error("Checkout request failed{}: {message}", .status.map(|s| format!(" with status {s}")).unwrap_or_default())]
    RequestFailed {
        /// The HTTP status code, when the SDK exposes one.
        status: Option<u16>,
        message: String,
    },

    /// The SDK has not loaded the data an operation needs.
    #[error("Checkout data not loaded: {what}")]
    MissingData {
        /// The missing piece of state (e.g., "cart").
        what: &'static str,
    },

    /// The shipping strategy for a payment method could not be initialized.
    #[error("Shipping strategy for '{method_id}' failed to initialize: {message}")]
    StrategyFailed { method_id: String, message: String },
}

impl SdkError {
    /// Convenience constructor for a failed request without a status code.
    #[must_use]
    pub fn request(message: impl Into<String>) -> Self {
        Self::RequestFailed {
            status: None,
            message: message.into(),
        }
    }
}
