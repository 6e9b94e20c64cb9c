//! # Checkout Forms
//!
//! Headless state for the shipping step of an e-commerce checkout, built on
//! top of a checkout SDK supplied by the host.
//!
//! ## Overview
//!
//! This crate provides:
//! - Address ↔ form value mapping with per-field-type defaults via [`address`]
//! - Custom field resetting on every address change
//! - Field validation with a payment-method dependent custom field schema
//! - A single-address form that debounces address updates to the SDK via
//!   [`SingleShippingForm`]
//! - A multi-address form that assigns cart units to addresses one at a time
//!   via [`MultiShippingForm`]
//! - Type-safe configuration via [`CheckoutFormsConfig`]
//!
//! ## Quick Start
//!
//! ```rust
//! use std::time::Duration;
//! use checkout_forms::CheckoutFormsConfig;
//!
//! let config = CheckoutFormsConfig::builder()
//!     .update_address_delay(Duration::from_millis(1700))
//!     .build()
//!     .unwrap();
//! ```
//!
//! ## Single-Address Shipping
//!
//! ```rust,ignore
//! use checkout_forms::{CheckoutFormsConfig, SingleShippingForm};
//!
//! // `sdk` implements `CheckoutService`; `host` implements `ShippingFormEvents`
//! let mut form = SingleShippingForm::new(sdk, host, CheckoutFormsConfig::default());
//! form.initialize().await?;
//!
//! form.change_field("countryCode", "CA").await; // clears state/province
//! form.change_field("postalCode", "M5V 2T6").await;
//! form.settle().await?; // one debounced update with shipping options
//!
//! if !form.is_submit_disabled() {
//!     form.submit()?;
//! }
//! ```
//!
//! ## Multi-Address Shipping
//!
//! ```rust,ignore
//! use checkout_forms::MultiShippingForm;
//!
//! let mut form = MultiShippingForm::new(sdk, host);
//! let item = form.items()[0].clone();
//! form.select_address(saved_address, &item.item_id, &item.key).await?;
//! assert!(form.item(&item.key).unwrap().is_assigned());
//! ```
//!
//! ## Design Principles
//!
//! - **No global state**: configuration is instance-based and passed explicitly
//! - **SDK behind a trait**: all remote calls go through [`CheckoutService`]
//! - **Single-task**: forms are driven through `&mut self`, so one remote call
//!   per form is in flight at a time
//! - **Flags always clear**: busy flags are lowered on every exit path

pub mod address;
pub mod config;
pub mod error;
pub mod sdk;
pub mod shipping;

// Re-export public types at crate root for convenience
pub use address::{Address, AddressFormValues, FieldType, FieldValue, FormField};
pub use config::{CheckoutFormsConfig, CheckoutFormsConfigBuilder, CountryCode, PaymentMethodId};
pub use error::ConfigError;

pub use sdk::{
    Cart, CheckoutService, CheckoutSnapshot, Consignment, ConsignmentAssignment,
    ConsignmentLineItem, LineItem, SdkError, ShippingInitializeOptions, ShippingOption,
    UpdateAddressOptions,
};

pub use shipping::{
    MultiShippingForm, ShippableItem, ShippingError, ShippingFormEvents, ShippingSubmission,
    SingleShippingForm,
};
