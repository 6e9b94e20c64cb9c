//! Conversion between [`Address`] records and editable form values.
//!
//! [`to_form_values`] derives the values a form starts from; custom fields
//! always start empty so that answers given for one address never carry over
//! to another. [`from_form_values`] reconstitutes an address for the SDK.
//!
//! # Example
//!
//! ```rust
//! use checkout_forms::address::{to_form_values, FieldType, FieldValue, FormField};
//! use checkout_forms::Address;
//!
//! let fields = vec![
//!     FormField::system("city", FieldType::Text),
//!     FormField::custom("field_12", FieldType::Text),
//! ];
//! let mut address = Address::default();
//! address.city = Some("Austin".to_string());
//! address.custom_fields.insert("field_12".to_string(), FieldValue::from("old answer"));
//!
//! let values = to_form_values(&fields, Some(&address));
//! assert_eq!(values.get("city"), Some(&FieldValue::from("Austin")));
//! assert_eq!(values.custom_fields["field_12"], FieldValue::empty());
//! assert!(values.should_save_address);
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{
    parse_date, Address, FieldType, FieldValue, FormField, STATE_OR_PROVINCE_CODE_FIELD,
    STATE_OR_PROVINCE_FIELD,
};

/// The flat record edited by an address form.
///
/// Derived from an [`Address`] and the active field list; never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressFormValues {
    /// System field values keyed by form name.
    #[serde(flatten)]
    pub fields: BTreeMap<String, FieldValue>,

    /// Custom field values keyed by field name.
    #[serde(default)]
    pub custom_fields: BTreeMap<String, FieldValue>,

    pub should_save_address: bool,
}

impl AddressFormValues {
    /// Returns a value by name, looking in custom fields first.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.custom_fields
            .get(name)
            .or_else(|| self.fields.get(name))
    }

    /// Sets a value by name.
    ///
    /// Names already present among the custom fields are written there; any
    /// other name is treated as a system field.
    pub fn set(&mut self, name: &str, value: FieldValue) {
        if let Some(slot) = self.custom_fields.get_mut(name) {
            *slot = value;
        } else {
            self.fields.insert(name.to_string(), value);
        }
    }

    /// Returns the text of a system field, or `""`.
    #[must_use]
    pub fn text(&self, name: &str) -> &str {
        self.fields
            .get(name)
            .and_then(FieldValue::as_text)
            .unwrap_or_default()
    }
}

/// Converts an address into form values for the given field list.
///
/// - System fields take the address value, else the field default, else `""`.
/// - Custom fields always take [`FormField::reset_value`].
/// - `should_save_address` defaults to `true`.
/// - `stateOrProvince` and `stateOrProvinceCode` are always present.
#[must_use]
pub fn to_form_values(fields: &[FormField], address: Option<&Address>) -> AddressFormValues {
    let mut values = AddressFormValues {
        should_save_address: address
            .and_then(|a| a.should_save_address)
            .unwrap_or(true),
        ..Default::default()
    };

    for field in fields {
        if field.custom {
            values
                .custom_fields
                .insert(field.name.clone(), field.reset_value());
            continue;
        }

        let value = match address.and_then(|a| a.get(&field.name)) {
            Some(raw) if field.field_type == FieldType::Date => {
                parse_date(raw).map_or_else(|| field.default_value(), FieldValue::Date)
            }
            Some(raw) => FieldValue::Text(raw.to_string()),
            None => field.default_value(),
        };
        values.fields.insert(field.name.clone(), value);
    }

    for name in [STATE_OR_PROVINCE_FIELD, STATE_OR_PROVINCE_CODE_FIELD] {
        values.fields.entry(name.to_string()).or_insert_with(|| {
            address
                .and_then(|a| a.get(name))
                .map_or_else(FieldValue::empty, FieldValue::from)
        });
    }

    values
}

/// Converts form values back into an address.
///
/// Empty values are left unset. Custom dates stay typed as
/// [`FieldValue::Date`] and serialize as `YYYY-MM-DD`.
#[must_use]
pub fn from_form_values(values: &AddressFormValues) -> Address {
    let mut address = Address {
        should_save_address: Some(values.should_save_address),
        ..Default::default()
    };

    for (name, value) in &values.fields {
        let text = value.to_text();
        let text = (!text.trim().is_empty()).then_some(text);
        if !address.set(name, text) {
            tracing::debug!(field = %name, "Ignoring unknown address form field");
        }
    }

    address.custom_fields = values
        .custom_fields
        .iter()
        .filter(|(_, value)| !value.is_empty())
        .map(|(name, value)| (name.clone(), value.clone()))
        .collect();

    address
}
