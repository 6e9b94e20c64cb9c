//! Multi-address shipping form.
//!
//! Every shippable unit of the cart can ship to its own address. Units are
//! assigned one at a time through the SDK; after each assignment the whole
//! item list is rebuilt from the returned cart and consignments, because the
//! SDK may split or merge consignments in response.

use crate::address::{from_form_values, Address, AddressFormValues, AddressValidationSchema};
use crate::sdk::{
    has_selected_shipping_options, Cart, CheckoutService, CheckoutSnapshot, Consignment,
    ConsignmentAssignment, SdkError,
};

use super::items::{shippable_items, ShippableItem};
use super::{BusyFlag, ShippingError, ShippingFormEvents, ShippingSubmission};

/// Shipping form for checkouts that ship units to different addresses.
#[derive(Debug)]
pub struct MultiShippingForm<S, E = ()> {
    service: S,
    events: E,
    items: Vec<ShippableItem>,
    item_count: u32,
    pending_item_key: Option<String>,
    is_loading: bool,
    create_customer_address_error: Option<SdkError>,
}

impl<S: CheckoutService, E: ShippingFormEvents> MultiShippingForm<S, E> {
    /// Creates a form from the SDK's current cart and consignments.
    pub fn new(service: S, events: E) -> Self {
        let cart = service.cart();
        let consignments = service.consignments();
        let mut form = Self {
            service,
            events,
            items: Vec::new(),
            item_count: 0,
            pending_item_key: None,
            is_loading: false,
            create_customer_address_error: None,
        };
        form.rebuild(cart.as_ref(), &consignments);
        form
    }

    #[must_use]
    pub fn items(&self) -> &[ShippableItem] {
        &self.items
    }

    /// Returns the item with the given key.
    #[must_use]
    pub fn item(&self, key: &str) -> Option<&ShippableItem> {
        self.items.iter().find(|item| item.key == key)
    }

    #[must_use]
    pub const fn service(&self) -> &S {
        &self.service
    }

    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.is_loading
    }

    /// Returns the key of the item waiting for a new address.
    #[must_use]
    pub fn pending_item_key(&self) -> Option<&str> {
        self.pending_item_key.as_deref()
    }

    /// Returns the last failure to save a new address to the address book.
    #[must_use]
    pub const fn create_customer_address_error(&self) -> Option<&SdkError> {
        self.create_customer_address_error.as_ref()
    }

    pub fn clear_create_customer_address_error(&mut self) {
        self.create_customer_address_error = None;
    }

    /// Rebuilds the item list if the cart's shippable unit count changed.
    ///
    /// Call this whenever the host observes a cart change. Returns `true` if
    /// the list was rebuilt.
    pub fn sync(&mut self) -> bool {
        let cart = self.service.cart();
        let count = cart.as_ref().map_or(0, |c| c.shippable_item_count());
        if count == self.item_count {
            return false;
        }

        tracing::debug!(previous = self.item_count, count, "Shippable item count changed, rebuilding items");
        let consignments = self.service.consignments();
        self.rebuild(cart.as_ref(), &consignments);
        true
    }

    /// Assigns one unit of `item_id` to `address`.
    ///
    /// The address is validated against its country's fields first; an
    /// invalid address never reaches the SDK.
    ///
    /// # Errors
    ///
    /// - [`ShippingError::InvalidAddress`] if validation fails
    /// - [`ShippingError::AssignmentFailed`] if the SDK rejects the assignment
    ///
    /// The item list is unchanged on error.
    pub async fn select_address(
        &mut self,
        address: Address,
        item_id: &str,
        item_key: &str,
    ) -> Result<(), ShippingError> {
        let fields = self.service.fields_for(Some(&address));
        if let Err(errors) = AddressValidationSchema::full(&fields).validate_address(&address) {
            return Err(self.report(ShippingError::InvalidAddress { errors }));
        }

        let assigned_before: Vec<(String, u32)> = self
            .service
            .consignments()
            .iter()
            .map(|c| (c.id.clone(), c.quantity_of(item_id)))
            .collect();

        let assignment = ConsignmentAssignment::single_unit(address.clone(), item_id);
        let result = {
            let _busy = BusyFlag::raise(&mut self.is_loading);
            self.service.assign_item(&assignment).await
        };
        let snapshot = result.map_err(|source| {
            self.report(ShippingError::AssignmentFailed {
                item_id: item_id.to_string(),
                source,
            })
        })?;

        let target =
            receiving_address(&snapshot.consignments, &assigned_before, item_id, &address)
                .unwrap_or(address);
        let mut hint = self.items.clone();
        if let Some(item) = hint.iter_mut().find(|item| item.key == item_key) {
            item.address = Some(target);
        }
        self.reconcile(&snapshot, &hint)
    }

    /// Marks an item as waiting for a new address and notifies the host.
    ///
    /// # Errors
    ///
    /// Returns [`ShippingError::UnknownItem`] if no item has `item_key`.
    pub fn use_new_address(&mut self, item_key: &str) -> Result<(), ShippingError> {
        let Some(item) = self.item(item_key) else {
            return Err(self.report(ShippingError::UnknownItem {
                key: item_key.to_string(),
            }));
        };

        self.events
            .on_use_new_address(item.address.as_ref(), &item.item_id);
        self.pending_item_key = Some(item_key.to_string());
        Ok(())
    }

    /// Assigns a newly entered address to the pending item, then saves it to
    /// the customer's address book.
    ///
    /// Saving is best-effort: a failure is recorded in
    /// [`create_customer_address_error`](Self::create_customer_address_error)
    /// and reported to the host, but the assignment stands.
    ///
    /// # Errors
    ///
    /// - [`ShippingError::NoPendingItem`] if no item is waiting
    /// - any error of [`select_address`](Self::select_address)
    pub async fn save_new_address(
        &mut self,
        values: &AddressFormValues,
    ) -> Result<(), ShippingError> {
        let Some(item) = self
            .pending_item_key
            .as_deref()
            .and_then(|key| self.item(key))
        else {
            return Err(self.report(ShippingError::NoPendingItem));
        };
        let (item_id, item_key) = (item.item_id.clone(), item.key.clone());

        let address = from_form_values(values);
        self.select_address(address.clone(), &item_id, &item_key)
            .await?;
        self.pending_item_key = None;

        if address.should_save_address == Some(false) {
            return Ok(());
        }

        self.create_customer_address_error = None;
        if let Err(error) = self.service.create_customer_address(&address).await {
            tracing::warn!(error = %error, item_key = %item_key, "Failed to save new address to address book");
            self.report(ShippingError::Sdk(error.clone()));
            self.create_customer_address_error = Some(error);
        }
        Ok(())
    }

    /// Returns `true` while the form must not be submitted.
    #[must_use]
    pub fn is_submit_disabled(&self) -> bool {
        self.is_loading || !has_selected_shipping_options(&self.service.consignments())
    }

    /// Submits the assignments to the host.
    ///
    /// Returns `false` without notifying the host while submission is
    /// disabled.
    pub fn submit(&self) -> bool {
        if self.is_submit_disabled() {
            return false;
        }
        self.events
            .on_submit(ShippingSubmission::MultiAddress(&self.items));
        true
    }

    fn reconcile(
        &mut self,
        snapshot: &CheckoutSnapshot,
        hint: &[ShippableItem],
    ) -> Result<(), ShippingError> {
        let cart = match snapshot.cart.clone().or_else(|| self.service.cart()) {
            Some(cart) => cart,
            None => return Err(self.report(SdkError::MissingData { what: "cart" }.into())),
        };

        self.items = shippable_items(&cart, &snapshot.consignments, hint);
        self.item_count = cart.shippable_item_count();
        Ok(())
    }

    fn rebuild(&mut self, cart: Option<&Cart>, consignments: &[Consignment]) {
        let previous = std::mem::take(&mut self.items);
        self.items = cart.map_or_else(Vec::new, |cart| {
            shippable_items(cart, consignments, &previous)
        });
        self.item_count = cart.map_or(0, Cart::shippable_item_count);
    }

    fn report(&self, error: ShippingError) -> ShippingError {
        tracing::debug!(error = %error, "Shipping form error");
        self.events.on_unhandled_error(&error);
        error
    }
}

/// Returns the address of the consignment that received a unit of `item_id`.
///
/// The SDK may normalise the stored address, so the consignment whose
/// quantity grew is preferred over one matching the requested address.
fn receiving_address(
    consignments: &[Consignment],
    assigned_before: &[(String, u32)],
    item_id: &str,
    requested: &Address,
) -> Option<Address> {
    let before = |id: &str| {
        assigned_before
            .iter()
            .find(|(before_id, _)| before_id == id)
            .map_or(0, |(_, quantity)| *quantity)
    };

    consignments
        .iter()
        .find(|c| c.quantity_of(item_id) > before(&c.id))
        .or_else(|| {
            consignments
                .iter()
                .find(|c| c.ships_to(requested) && c.quantity_of(item_id) > 0)
        })
        .map(|c| c.address.clone())
}
