//! Single-address shipping form.
//!
//! [`SingleShippingForm`] keeps the shopper's edits in local form values and
//! reconciles them with the checkout SDK:
//!
//! - edits are validated, then pushed to the SDK after a quiet period
//!   (`update_address_delay`, 1.7 s by default); rapid edits coalesce into one
//!   request carrying the latest address
//! - a request is skipped when the address equals the last synced one
//! - selecting a saved address or switching to a new one replaces the form
//!   values and resets every custom field
//!
//! # Driving the form
//!
//! The host forwards edits with [`change_field`](SingleShippingForm::change_field)
//! and fires the debounced update either by awaiting
//! [`settle`](SingleShippingForm::settle), or by polling
//! [`fire_if_due`](SingleShippingForm::fire_if_due) at
//! [`next_update_at`](SingleShippingForm::next_update_at) from its event loop.
//!
//! ```rust,ignore
//! let mut form = SingleShippingForm::new(service, (), CheckoutFormsConfig::default());
//! form.change_field("city", "Toronto").await;
//! form.change_field("postalCode", "M5V 2T6").await;
//! form.settle().await?; // one update with both edits
//! ```

use tokio::time::Instant;

use crate::address::{
    from_form_values, has_custom_field_changes, is_equal_address, reset_custom_fields,
    to_form_values, Address, AddressFormValues, FieldValue, FormField, ValidationSchemaSelector,
    COUNTRY_CODE_FIELD, STATE_OR_PROVINCE_CODE_FIELD, STATE_OR_PROVINCE_FIELD,
};
use crate::config::{CheckoutFormsConfig, CountryCode};
use crate::sdk::{has_selected_shipping_options, CheckoutService, UpdateAddressOptions};

use super::{BusyFlag, Debouncer, ShippingError, ShippingFormEvents, ShippingSubmission};

/// A debounced address update waiting to be sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressUpdate {
    pub address: Address,
    pub include_shipping_options: bool,
}

/// Snapshot of the form's progress flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[allow(clippy::struct_excessive_bools)]
pub struct ShippingFormState {
    pub is_resetting_address: bool,
    pub is_updating_shipping_data: bool,
    pub has_requested_shipping_options: bool,
}

/// Shipping form for checkouts that ship everything to one address.
#[derive(Debug)]
#[allow(clippy::struct_excessive_bools)]
pub struct SingleShippingForm<S, E = ()> {
    service: S,
    events: E,
    config: CheckoutFormsConfig,
    fields: Vec<FormField>,
    values: AddressFormValues,
    schema: ValidationSchemaSelector,
    method_id: Option<String>,
    last_synced: Option<Address>,
    pending: Debouncer<AddressUpdate>,
    is_loading: bool,
    is_resetting_address: bool,
    is_updating_shipping_data: bool,
    has_requested_shipping_options: bool,
}

impl<S: CheckoutService, E: ShippingFormEvents> SingleShippingForm<S, E> {
    /// Creates a form seeded from the current shipping address, if any.
    pub fn new(service: S, events: E, config: CheckoutFormsConfig) -> Self {
        let address = service.consignments().into_iter().next().map(|c| c.address);
        let fields = service.fields_for(address.as_ref());
        let mut values = to_form_values(&fields, address.as_ref());
        reset_custom_fields(&mut values, &fields);

        Self {
            schema: ValidationSchemaSelector::new(&config),
            pending: Debouncer::new(config.update_address_delay()),
            service,
            events,
            config,
            fields,
            values,
            method_id: None,
            last_synced: address,
            is_loading: false,
            is_resetting_address: false,
            is_updating_shipping_data: false,
            has_requested_shipping_options: false,
        }
    }

    #[must_use]
    pub const fn values(&self) -> &AddressFormValues {
        &self.values
    }

    #[must_use]
    pub fn fields(&self) -> &[FormField] {
        &self.fields
    }

    #[must_use]
    pub const fn service(&self) -> &S {
        &self.service
    }

    /// Returns the address most recently accepted by the SDK.
    #[must_use]
    pub const fn last_synced_address(&self) -> Option<&Address> {
        self.last_synced.as_ref()
    }

    #[must_use]
    pub const fn state(&self) -> ShippingFormState {
        ShippingFormState {
            is_resetting_address: self.is_resetting_address,
            is_updating_shipping_data: self.is_updating_shipping_data,
            has_requested_shipping_options: self.has_requested_shipping_options,
        }
    }

    /// Marks the host page as loading checkout data.
    pub fn set_loading(&mut self, is_loading: bool) {
        self.is_loading = is_loading;
    }

    /// Sets the selected payment method, which picks the validation schema.
    pub fn set_payment_method(&mut self, method_id: Option<&str>) {
        self.method_id = method_id.map(ToString::to_string);
    }

    /// Initializes the SDK's shipping strategy.
    ///
    /// # Errors
    ///
    /// Returns [`ShippingError::Sdk`] if the SDK fails to initialize.
    pub async fn initialize(&self) -> Result<(), ShippingError> {
        let options = self.config.shipping_initialize_options();
        self.service
            .initialize_shipping(options)
            .await
            .map_err(|e| self.report(e.into()))
    }

    /// Tears down the SDK's shipping strategy.
    ///
    /// # Errors
    ///
    /// Returns [`ShippingError::Sdk`] if the SDK fails to deinitialize.
    pub async fn deinitialize(&self) -> Result<(), ShippingError> {
        let options = self.config.shipping_initialize_options();
        self.service
            .deinitialize_shipping(options)
            .await
            .map_err(|e| self.report(e.into()))
    }

    /// Applies an edit and schedules a debounced address update.
    ///
    /// Changing `countryCode` clears the state fields and reloads the field
    /// list for the new country before anything else. Returns `true` if an
    /// update was scheduled, `false` if the form is currently invalid.
    pub async fn change_field(&mut self, name: &str, value: impl Into<FieldValue>) -> bool {
        self.values.set(name, value.into());
        if name == COUNTRY_CODE_FIELD {
            self.apply_country_change();
        }

        // Let pending validation work run before reading the form state.
        tokio::task::yield_now().await;

        let schema = self.schema.select(self.method_id.as_deref(), &self.fields);
        if let Err(errors) = schema.validate(&self.values) {
            tracing::debug!(field = %name, invalid = ?errors.field_names(), "Form invalid, not scheduling address update");
            return false;
        }

        let address = from_form_values(&self.values);
        let include_shipping_options = self.config.is_shipping_address_field(name)
            || !self.has_requested_shipping_options
            || has_custom_field_changes(&address, self.last_synced.as_ref());

        tracing::debug!(field = %name, include_shipping_options, "Scheduling address update");
        self.pending.push_with(
            AddressUpdate {
                address,
                include_shipping_options,
            },
            |previous, next| AddressUpdate {
                include_shipping_options: previous.include_shipping_options
                    || next.include_shipping_options,
                ..next
            },
        );
        true
    }

    /// Returns `true` while a debounced update is waiting to fire.
    #[must_use]
    pub const fn has_pending_update(&self) -> bool {
        self.pending.is_pending()
    }

    /// Returns when the pending update will fire.
    #[must_use]
    pub fn next_update_at(&self) -> Option<Instant> {
        self.pending.deadline()
    }

    /// Sends the pending update if its quiet period has elapsed.
    ///
    /// Returns `true` if a request was sent.
    ///
    /// # Errors
    ///
    /// Returns [`ShippingError::Sdk`] if the SDK rejects the update.
    pub async fn fire_if_due(&mut self) -> Result<bool, ShippingError> {
        match self.pending.take_due() {
            Some(update) => self.update_address(update).await,
            None => Ok(false),
        }
    }

    /// Waits for the quiet period and sends the pending update, if any.
    ///
    /// Returns `true` if a request was sent.
    ///
    /// # Errors
    ///
    /// Returns [`ShippingError::Sdk`] if the SDK rejects the update.
    pub async fn settle(&mut self) -> Result<bool, ShippingError> {
        match self.pending.wait().await {
            Some(update) => self.update_address(update).await,
            None => Ok(false),
        }
    }

    async fn update_address(&mut self, update: AddressUpdate) -> Result<bool, ShippingError> {
        if self
            .last_synced
            .as_ref()
            .is_some_and(|last| is_equal_address(&update.address, last))
        {
            tracing::debug!("Address unchanged since last sync, skipping update");
            return Ok(false);
        }

        let options = UpdateAddressOptions {
            include_shipping_options: update.include_shipping_options,
        };
        let result = {
            let _busy = BusyFlag::raise(&mut self.is_updating_shipping_data);
            self.service
                .update_shipping_address(&update.address, options)
                .await
        };

        match result {
            Ok(_) => {
                if update.include_shipping_options {
                    self.has_requested_shipping_options = true;
                }
                self.last_synced = Some(update.address);
                Ok(true)
            }
            Err(e) => Err(self.report(e.into())),
        }
    }

    /// Replaces the form with a saved address and ships to it.
    ///
    /// Any pending edit is discarded and custom fields start empty.
    ///
    /// # Errors
    ///
    /// Returns [`ShippingError::Sdk`] if the SDK rejects the address. The form
    /// values are left unchanged in that case.
    pub async fn select_address(&mut self, address: Address) -> Result<(), ShippingError> {
        self.pending.cancel();

        let options = UpdateAddressOptions {
            include_shipping_options: true,
        };
        let result = {
            let _busy = BusyFlag::raise(&mut self.is_resetting_address);
            self.service.update_shipping_address(&address, options).await
        };
        let snapshot = result.map_err(|e| self.report(e.into()))?;

        let synced = snapshot.shipping_address.unwrap_or(address);
        self.load_address(Some(&synced));
        self.last_synced = Some(synced);
        self.has_requested_shipping_options = true;
        Ok(())
    }

    /// Clears the consignments so the shopper can enter a new address.
    ///
    /// # Errors
    ///
    /// Returns [`ShippingError::Sdk`] if the consignments cannot be deleted.
    pub async fn use_new_address(&mut self) -> Result<(), ShippingError> {
        self.pending.cancel();

        let result = {
            let _busy = BusyFlag::raise(&mut self.is_resetting_address);
            self.service.delete_consignments().await
        };
        let address = result.map_err(|e| self.report(e.into()))?;

        self.load_address(address.as_ref());
        self.last_synced = None;
        Ok(())
    }

    /// Returns `true` while the form must not be submitted.
    #[must_use]
    pub fn is_submit_disabled(&self) -> bool {
        self.is_loading
            || self.is_resetting_address
            || self.is_updating_shipping_data
            || self.pending.is_pending()
            || !has_selected_shipping_options(&self.service.consignments())
    }

    /// Submits the form to the host.
    ///
    /// Returns `false` without notifying the host while submission is
    /// disabled.
    ///
    /// # Errors
    ///
    /// Returns [`ShippingError::InvalidAddress`] if the values fail validation.
    pub fn submit(&mut self) -> Result<bool, ShippingError> {
        if self.is_submit_disabled() {
            return Ok(false);
        }

        let schema = self.schema.select(self.method_id.as_deref(), &self.fields);
        schema
            .validate(&self.values)
            .map_err(|errors| self.report(ShippingError::InvalidAddress { errors }))?;

        self.events
            .on_submit(ShippingSubmission::SingleAddress(&self.values));
        Ok(true)
    }

    fn load_address(&mut self, address: Option<&Address>) {
        self.fields = self.service.fields_for(address);
        self.values = to_form_values(&self.fields, address);
        reset_custom_fields(&mut self.values, &self.fields);
    }

    fn apply_country_change(&mut self) {
        self.values.set(STATE_OR_PROVINCE_FIELD, FieldValue::empty());
        self.values
            .set(STATE_OR_PROVINCE_CODE_FIELD, FieldValue::empty());

        let country_value = self.values.text(COUNTRY_CODE_FIELD).to_string();
        let country = CountryCode::new(country_value.as_str()).ok();
        self.fields = self.service.fields(country.as_ref());

        let mut refreshed = to_form_values(&self.fields, None).fields;
        for (name, value) in &mut refreshed {
            if let Some(existing) = self.values.fields.get(name) {
                value.clone_from(existing);
            }
        }
        refreshed.insert(COUNTRY_CODE_FIELD.to_string(), FieldValue::Text(country_value));
        self.values.fields = refreshed;
        reset_custom_fields(&mut self.values, &self.fields);
    }

    fn report(&self, error: ShippingError) -> ShippingError {
        tracing::debug!(error = %error, "Shipping form error");
        self.events.on_unhandled_error(&error);
        error
    }
}
