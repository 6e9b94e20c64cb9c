//! Configuration types for the checkout forms.
//!
//! # Overview
//!
//! - [`CheckoutFormsConfig`]: settings shared by the single and multi
//!   shipping forms
//! - [`CheckoutFormsConfigBuilder`]: a builder for [`CheckoutFormsConfig`]
//! - [`CountryCode`]: a validated country code newtype
//! - [`PaymentMethodId`]: a validated payment method identifier
//!
//! # Example
//!
//! ```rust
//! use std::time::Duration;
//! use checkout_forms::{CheckoutFormsConfig, PaymentMethodId};
//!
//! let config = CheckoutFormsConfig::builder()
//!     .update_address_delay(Duration::from_millis(800))
//!     .relaxed_validation_method(PaymentMethodId::new("applepay").unwrap())
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(config.update_address_delay(), Duration::from_millis(800));
//! ```

mod newtypes;

pub use newtypes::{CountryCode, PaymentMethodId};

use std::time::Duration;

use crate::error::ConfigError;
use crate::sdk::ShippingInitializeOptions;

/// Default quiet period before an edited address is pushed to the SDK.
pub const DEFAULT_UPDATE_ADDRESS_DELAY: Duration = Duration::from_millis(1700);

/// Payment methods that skip custom field validation by default.
pub const DEFAULT_RELAXED_VALIDATION_METHODS: &[&str] = &["amazon", "amazonpay"];

/// Address fields whose edits always refresh the available shipping options.
pub const DEFAULT_SHIPPING_ADDRESS_FIELDS: &[&str] = &[
    "address1",
    "address2",
    "city",
    "postalCode",
    "stateOrProvince",
    "stateOrProvinceCode",
    "countryCode",
];

/// Configuration shared by the shipping forms.
///
/// `CheckoutFormsConfig` is `Clone`, `Send`, and `Sync`.
#[derive(Clone, Debug)]
pub struct CheckoutFormsConfig {
    update_address_delay: Duration,
    relaxed_validation_methods: Vec<PaymentMethodId>,
    shipping_address_fields: Vec<String>,
    shipping_initialize_options: ShippingInitializeOptions,
}

impl CheckoutFormsConfig {
    /// Creates a new builder for constructing a `CheckoutFormsConfig`.
    #[must_use]
    pub fn builder() -> CheckoutFormsConfigBuilder {
        CheckoutFormsConfigBuilder::new()
    }

    /// Returns the debounce delay applied to remote address updates.
    #[must_use]
    pub const fn update_address_delay(&self) -> Duration {
        self.update_address_delay
    }

    /// Returns the payment methods that use relaxed custom field validation.
    #[must_use]
    pub fn relaxed_validation_methods(&self) -> &[PaymentMethodId] {
        &self.relaxed_validation_methods
    }

    /// Returns the field names that always trigger a shipping option refresh.
    #[must_use]
    pub fn shipping_address_fields(&self) -> &[String] {
        &self.shipping_address_fields
    }

    /// Returns `true` if the named field belongs to the shipping address set.
    #[must_use]
    pub fn is_shipping_address_field(&self, name: &str) -> bool {
        self.shipping_address_fields.iter().any(|f| f == name)
    }

    /// Returns the options forwarded to the SDK's shipping strategy lifecycle.
    #[must_use]
    pub const fn shipping_initialize_options(&self) -> &ShippingInitializeOptions {
        &self.shipping_initialize_options
    }
}

impl Default for CheckoutFormsConfig {
    fn default() -> Self {
        Self {
            update_address_delay: DEFAULT_UPDATE_ADDRESS_DELAY,
            relaxed_validation_methods: default_relaxed_methods(),
            shipping_address_fields: DEFAULT_SHIPPING_ADDRESS_FIELDS
                .iter()
                .map(ToString::to_string)
                .collect(),
            shipping_initialize_options: ShippingInitializeOptions::default(),
        }
    }
}

fn default_relaxed_methods() -> Vec<PaymentMethodId> {
    DEFAULT_RELAXED_VALIDATION_METHODS
        .iter()
        .filter_map(|id| PaymentMethodId::new(*id).ok())
        .collect()
}

// Verify CheckoutFormsConfig is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<CheckoutFormsConfig>();
};

/// Builder for constructing [`CheckoutFormsConfig`] instances.
///
/// # Defaults
///
/// - `update_address_delay`: 1700 ms
/// - `relaxed_validation_methods`: `amazon`, `amazonpay`
/// - `shipping_address_fields`: [`DEFAULT_SHIPPING_ADDRESS_FIELDS`]
/// - `shipping_initialize_options`: no method id
#[derive(Debug, Default)]
pub struct CheckoutFormsConfigBuilder {
    update_address_delay: Option<Duration>,
    relaxed_validation_methods: Option<Vec<PaymentMethodId>>,
    shipping_address_fields: Option<Vec<String>>,
    shipping_initialize_options: Option<ShippingInitializeOptions>,
}

impl CheckoutFormsConfigBuilder {
    /// Creates a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the debounce delay for remote address updates.
    #[must_use]
    pub const fn update_address_delay(mut self, delay: Duration) -> Self {
        self.update_address_delay = Some(delay);
        self
    }

    /// Adds a payment method that uses relaxed custom field validation.
    ///
    /// The first call replaces the default set.
    #[must_use]
    pub fn relaxed_validation_method(mut self, method: PaymentMethodId) -> Self {
        self.relaxed_validation_methods
            .get_or_insert_with(Vec::new)
            .push(method);
        self
    }

    /// Replaces the set of fields that always refresh shipping options.
    #[must_use]
    pub fn shipping_address_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.shipping_address_fields = Some(fields.into_iter().map(Into::into).collect());
        self
    }

    /// Sets the options passed to `initialize_shipping` / `deinitialize_shipping`.
    #[must_use]
    pub fn shipping_initialize_options(mut self, options: ShippingInitializeOptions) -> Self {
        self.shipping_initialize_options = Some(options);
        self
    }

    /// Builds the [`CheckoutFormsConfig`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ZeroUpdateDelay`] if the delay is zero, or
    /// [`ConfigError::EmptyShippingAddressFields`] if an empty field set was
    /// supplied.
    pub fn build(self) -> Result<CheckoutFormsConfig, ConfigError> {
        let defaults = CheckoutFormsConfig::default();

        let update_address_delay = self
            .update_address_delay
            .unwrap_or(defaults.update_address_delay);
        if update_address_delay.is_zero() {
            return Err(ConfigError::ZeroUpdateDelay);
        }

        let shipping_address_fields = self
            .shipping_address_fields
            .unwrap_or(defaults.shipping_address_fields);
        if shipping_address_fields.is_empty() {
            return Err(ConfigError::EmptyShippingAddressFields);
        }

        Ok(CheckoutFormsConfig {
            update_address_delay,
            relaxed_validation_methods: self
                .relaxed_validation_methods
                .unwrap_or(defaults.relaxed_validation_methods),
            shipping_address_fields,
            shipping_initialize_options: self
                .shipping_initialize_options
                .unwrap_or(defaults.shipping_initialize_options),
        })
    }
}
