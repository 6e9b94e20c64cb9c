//! Resetting of merchant-defined custom fields.
//!
//! Custom field answers belong to one address. Whenever a form loads an
//! address, selects a saved one, switches to a new one or changes country,
//! the custom fields are overwritten with [`FormField::reset_value`], even if
//! an address carrying answers was merged into the values first.

use std::collections::BTreeMap;

use super::{AddressFormValues, FieldValue, FormField};

/// Returns the reset values for every custom field in `fields`.
#[must_use]
pub fn custom_field_defaults(fields: &[FormField]) -> BTreeMap<String, FieldValue> {
    fields
        .iter()
        .filter(|field| field.custom)
        .map(|field| (field.name.clone(), field.reset_value()))
        .collect()
}

/// Replaces the custom values of `values` with the reset values of `fields`.
///
/// Keys for custom fields that are not in `fields` are dropped.
pub fn reset_custom_fields(values: &mut AddressFormValues, fields: &[FormField]) {
    values.custom_fields = custom_field_defaults(fields);
}
