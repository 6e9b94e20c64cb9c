//! Callbacks from the shipping forms to the host page.

use crate::address::{Address, AddressFormValues};

use super::{ShippableItem, ShippingError};

/// What a shipping form hands to the host on submit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShippingSubmission<'a> {
    /// The single shipping address.
    SingleAddress(&'a AddressFormValues),
    /// Every shippable unit with its assigned address.
    MultiAddress(&'a [ShippableItem]),
}

/// Receives notifications from a shipping form.
///
/// Every method has a no-op default, so hosts implement only what they need.
/// `()` is a valid implementation that ignores everything.
pub trait ShippingFormEvents {
    /// Called when the shopper submits an enabled form.
    fn on_submit(&self, _submission: ShippingSubmission<'_>) {}

    /// Called for every error the form cannot resolve itself.
    fn on_unhandled_error(&self, _error: &ShippingError) {}

    /// Called when the shopper asks to enter a new address for an item.
    fn on_use_new_address(&self, _address: Option<&Address>, _item_id: &str) {}
}

impl ShippingFormEvents for () {}
