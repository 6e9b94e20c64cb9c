//! Error types for the shipping forms.
//!
//! - [`ShippingError::InvalidAddress`]: local validation failed; no request
//!   was sent
//! - [`ShippingError::AssignmentFailed`]: the SDK rejected an item assignment
//! - [`ShippingError::NoPendingItem`]: a new address was saved without an item
//!   waiting for it
//! - [`ShippingError::UnknownItem`]: an item key is not in the current list
//! - [`ShippingError::Sdk`]: any other SDK failure

use thiserror::Error;

use crate::address::ValidationErrors;
use crate::sdk::SdkError;

/// Error type for shipping form operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ShippingError {
    /// The address failed validation against the active field list.
    #[error("Invalid address: {}", .errors.field_names().join(", "))]
    InvalidAddress {
        /// The failing fields and their messages.
        errors: ValidationErrors,
    },

    /// Assigning an item to an address failed.
    #[error("Failed to assign item '{item_id}': {source}")]
    AssignmentFailed {
        item_id: String,
        #[source]
        source: SdkError,
    },

    /// No item is waiting for a new address.
    #[error("No shippable item is waiting for a new address")]
    NoPendingItem,

    /// The item key does not match any shippable item.
    #[error("Unknown shippable item '{key}'")]
    UnknownItem { key: String },

    /// An SDK failure outside item assignment.
    #[error(transparent)]
    Sdk(#[from] SdkError),
}
