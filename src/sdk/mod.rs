//! The checkout SDK seam.
//!
//! The shipping forms never persist anything themselves. Every remote
//! operation, and the cart, consignment and field metadata they read, go
//! through a [`CheckoutService`] implementation supplied by the host.
//!
//! # Overview
//!
//! - [`CheckoutService`]: remote operations and state accessors
//! - [`CheckoutSnapshot`]: the checkout state returned by remote operations
//! - [`Cart`], [`LineItem`], [`Consignment`], [`ShippingOption`]: checkout data
//! - [`ConsignmentAssignment`]: the payload assigning line items to an address
//! - [`SdkError`]: failures reported by the SDK

mod errors;

pub use errors::SdkError;

use serde::{Deserialize, Serialize};

use crate::address::{is_equal_address, Address, FormField};
use crate::config::CountryCode;

/// A shopping cart.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    pub id: String,
    #[serde(default)]
    pub line_items: Vec<LineItem>,
}

impl Cart {
    /// Returns the line items that need shipping.
    pub fn shippable_line_items(&self) -> impl Iterator<Item = &LineItem> {
        self.line_items.iter().filter(|item| item.is_shippable())
    }

    /// Returns the number of units that can be assigned an address.
    #[must_use]
    pub fn shippable_item_count(&self) -> u32 {
        self.shippable_line_items()
            .fold(0, |count, item| count.saturating_add(item.quantity))
    }
}

/// One line of a cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub quantity: u32,
    #[serde(default = "default_true")]
    pub is_shipping_required: bool,
    /// Free items added by a promotion are shipped with the order, not assigned.
    #[serde(default)]
    pub added_by_promotion: bool,
}

impl LineItem {
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>, quantity: u32) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            quantity,
            is_shipping_required: true,
            added_by_promotion: false,
        }
    }

    #[must_use]
    pub const fn is_shippable(&self) -> bool {
        self.is_shipping_required && !self.added_by_promotion
    }
}

const fn default_true() -> bool {
    true
}

/// A shipping method offered for a consignment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingOption {
    pub id: String,
    pub description: String,
    #[serde(default)]
    pub cost: f64,
}

/// A quantity of one line item inside a consignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsignmentLineItem {
    pub item_id: String,
    pub quantity: u32,
}

/// A group of line items shipped to one address with one shipping method.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Consignment {
    pub id: String,
    pub address: Address,
    #[serde(default)]
    pub line_items: Vec<ConsignmentLineItem>,
    #[serde(default)]
    pub available_shipping_options: Vec<ShippingOption>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_shipping_option: Option<ShippingOption>,
}

impl Consignment {
    /// Returns how many units of `item_id` this consignment ships.
    #[must_use]
    pub fn quantity_of(&self, item_id: &str) -> u32 {
        self.line_items
            .iter()
            .filter(|line| line.item_id == item_id)
            .fold(0, |total, line| total.saturating_add(line.quantity))
    }

    /// Returns `true` if this consignment ships to `address`.
    #[must_use]
    pub fn ships_to(&self, address: &Address) -> bool {
        is_equal_address(&self.address, address)
    }
}

/// Returns `true` if there is at least one consignment and every consignment
/// has a selected shipping option.
#[must_use]
pub fn has_selected_shipping_options(consignments: &[Consignment]) -> bool {
    !consignments.is_empty()
        && consignments
            .iter()
            .all(|c| c.selected_shipping_option.is_some())
}

/// The checkout state after a remote operation.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CheckoutSnapshot {
    pub cart: Option<Cart>,
    pub consignments: Vec<Consignment>,
    /// The shipping address of the first consignment, if any.
    pub shipping_address: Option<Address>,
}

/// Options for [`CheckoutService::update_shipping_address`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UpdateAddressOptions {
    /// Ask the SDK to recompute the available shipping options.
    pub include_shipping_options: bool,
}

/// Assigns line item quantities to an address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsignmentAssignment {
    pub address: Address,
    pub line_items: Vec<ConsignmentLineItem>,
}

impl ConsignmentAssignment {
    /// A payload assigning a single unit of `item_id` to `address`.
    #[must_use]
    pub fn single_unit(address: Address, item_id: impl Into<String>) -> Self {
        Self {
            address,
            line_items: vec![ConsignmentLineItem {
                item_id: item_id.into(),
                quantity: 1,
            }],
        }
    }
}

/// Options for the SDK's shipping strategy lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ShippingInitializeOptions {
    /// Payment method whose shipping strategy should be initialized.
    pub method_id: Option<String>,
}

/// The operations the shipping forms need from the checkout SDK.
///
/// Remote operations are async; accessors return the SDK's current state
/// synchronously. Implementations are driven from a single task, so they do
/// not need to be `Sync`.
#[allow(async_fn_in_trait)]
pub trait CheckoutService {
    /// Updates the shipping address of the checkout.
    async fn update_shipping_address(
        &self,
        address: &Address,
        options: UpdateAddressOptions,
    ) -> Result<CheckoutSnapshot, SdkError>;

    /// Assigns line items to an address, creating or merging consignments.
    async fn assign_item(
        &self,
        assignment: &ConsignmentAssignment,
    ) -> Result<CheckoutSnapshot, SdkError>;

    /// Deletes every consignment and returns the address they shipped to.
    async fn delete_consignments(&self) -> Result<Option<Address>, SdkError>;

    /// Persists an address to the customer's address book.
    async fn create_customer_address(&self, address: &Address) -> Result<Address, SdkError>;

    async fn initialize_shipping(&self, options: &ShippingInitializeOptions)
        -> Result<(), SdkError>;

    async fn deinitialize_shipping(
        &self,
        options: &ShippingInitializeOptions,
    ) -> Result<(), SdkError>;

    fn cart(&self) -> Option<Cart>;

    fn consignments(&self) -> Vec<Consignment>;

    /// Returns the shipping address fields for a country.
    fn fields(&self, country: Option<&CountryCode>) -> Vec<FormField>;

    /// Returns the fields for the address's country, tolerating invalid codes.
    fn fields_for(&self, address: Option<&Address>) -> Vec<FormField> {
        let country = address
            .and_then(|a| a.country_code.as_deref())
            .and_then(|code| CountryCode::new(code).ok());
        self.fields(country.as_ref())
    }
}
