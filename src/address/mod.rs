//! Address records, form field metadata, and the mapping between them.
//!
//! # Overview
//!
//! - [`Address`]: a normalized address as produced by the checkout SDK
//! - [`FormField`] / [`FieldType`]: metadata describing one address form field
//! - [`FieldValue`]: a form-editable value
//! - [`AddressFormValues`]: the flat record edited by a shipping form
//!
//! Conversion lives in [`form_values`], custom field resetting in
//! [`custom_fields`], address comparison in [`compare`] and validation in
//! [`validation`].

pub mod compare;
pub mod custom_fields;
pub mod form_values;
pub mod validation;

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub use compare::{has_custom_field_changes, is_equal_address};
pub use custom_fields::reset_custom_fields;
pub use form_values::{from_form_values, to_form_values, AddressFormValues};
pub use validation::{
    is_valid_address, AddressValidationSchema, CustomFieldSchema, ValidationErrors,
    ValidationSchemaSelector,
};

/// Name of the country selector field.
pub const COUNTRY_CODE_FIELD: &str = "countryCode";
/// Name of the free-text state or province field.
pub const STATE_OR_PROVINCE_FIELD: &str = "stateOrProvince";
/// Name of the state or province code field.
pub const STATE_OR_PROVINCE_CODE_FIELD: &str = "stateOrProvinceCode";

/// Format used for date values exchanged with the checkout SDK.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A shipping or customer address.
///
/// All system fields are optional to support partial address data. Custom
/// field answers are keyed by field name.
///
/// # Example
///
/// ```rust
/// use checkout_forms::Address;
///
/// let address = Address {
///     first_name: Some("Jane".to_string()),
///     address1: Some("12 Main St".to_string()),
///     city: Some("Austin".to_string()),
///     country_code: Some("US".to_string()),
///     ..Default::default()
/// };
///
/// assert_eq!(address.get("city"), Some("Austin"));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    /// Saved-address identifier, when the address belongs to a customer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,

    /// First street line.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address1: Option<String>,

    /// Second street line (apartment, suite, etc.).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address2: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub state_or_province: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub state_or_province_code: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,

    /// Two-letter country code (ISO 3166-1 alpha-2).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country_code: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    /// Merchant-defined field answers.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub custom_fields: BTreeMap<String, FieldValue>,

    /// Whether the customer wants this address saved for reuse.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub should_save_address: Option<bool>,
}

impl Address {
    /// Names of the system fields addressable through [`Address::get`].
    pub const SYSTEM_FIELDS: &'static [&'static str] = &[
        "firstName",
        "lastName",
        "company",
        "address1",
        "address2",
        "city",
        STATE_OR_PROVINCE_FIELD,
        STATE_OR_PROVINCE_CODE_FIELD,
        "postalCode",
        COUNTRY_CODE_FIELD,
        "phone",
    ];

    /// Returns the value of a system field by its form name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.slot(name).and_then(Option::as_deref)
    }

    /// Sets a system field by its form name.
    ///
    /// Returns `false` if `name` is not a system field.
    pub fn set(&mut self, name: &str, value: Option<String>) -> bool {
        match self.slot_mut(name) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    fn slot(&self, name: &str) -> Option<&Option<String>> {
        let slot = match name {
            "firstName" => &self.first_name,
            "lastName" => &self.last_name,
            "company" => &self.company,
            "address1" => &self.address1,
            "address2" => &self.address2,
            "city" => &self.city,
            STATE_OR_PROVINCE_FIELD => &self.state_or_province,
            STATE_OR_PROVINCE_CODE_FIELD => &self.state_or_province_code,
            "postalCode" => &self.postal_code,
            COUNTRY_CODE_FIELD => &self.country_code,
            "phone" => &self.phone,
            _ => return None,
        };
        Some(slot)
    }

    fn slot_mut(&mut self, name: &str) -> Option<&mut Option<String>> {
        let slot = match name {
            "firstName" => &mut self.first_name,
            "lastName" => &mut self.last_name,
            "company" => &mut self.company,
            "address1" => &mut self.address1,
            "address2" => &mut self.address2,
            "city" => &mut self.city,
            STATE_OR_PROVINCE_FIELD => &mut self.state_or_province,
            STATE_OR_PROVINCE_CODE_FIELD => &mut self.state_or_province_code,
            "postalCode" => &mut self.postal_code,
            COUNTRY_CODE_FIELD => &mut self.country_code,
            "phone" => &mut self.phone,
            _ => return None,
        };
        Some(slot)
    }
}

/// A form-editable value.
///
/// Deserialization is untagged: arrays become [`FieldValue::List`], integers
/// [`FieldValue::Number`], `YYYY-MM-DD` strings [`FieldValue::Date`] and any
/// other string [`FieldValue::Text`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Selected options of a checkbox group.
    List(Vec<String>),
    /// An integer answer.
    Number(i64),
    /// A calendar date.
    Date(NaiveDate),
    /// Free text, or the selected option of a dropdown or radio group.
    Text(String),
}

impl FieldValue {
    /// The empty text value.
    #[must_use]
    pub const fn empty() -> Self {
        Self::Text(String::new())
    }

    /// Returns `true` for empty text and empty lists.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Text(s) => s.trim().is_empty(),
            Self::List(items) => items.is_empty(),
            Self::Number(_) | Self::Date(_) => false,
        }
    }

    /// Returns the text content, if this is a text value.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Renders the value the way the checkout SDK stores system fields.
    #[must_use]
    pub fn to_text(&self) -> String {
        match self {
            Self::Text(s) => s.clone(),
            Self::List(items) => items.join(","),
            Self::Number(n) => n.to_string(),
            Self::Date(d) => d.format(DATE_FORMAT).to_string(),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// The input type of a form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Text,
    Multiline,
    Password,
    Checkbox,
    Radio,
    Dropdown,
    Date,
    Integer,
}

/// One selectable option of a dropdown, radio or checkbox field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldOption {
    pub value: String,
    pub label: String,
}

/// Metadata describing one address form field.
///
/// Field lists are supplied per country by
/// [`CheckoutService::fields`](crate::sdk::CheckoutService::fields) and are
/// not modified by the forms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormField {
    /// Form name: a system field such as `"city"` or a custom field id.
    pub name: String,

    /// `true` for merchant-defined fields.
    #[serde(default)]
    pub custom: bool,

    pub field_type: FieldType,

    /// Configured default, as the SDK reports it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,

    #[serde(default)]
    pub required: bool,

    #[serde(default)]
    pub label: String,

    /// Lower bound: an integer for integer fields, a date for date fields.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<String>,

    /// Upper bound: an integer for integer fields, a date for date fields.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<FieldOption>,
}

impl FormField {
    /// Creates a system field of the given type.
    #[must_use]
    pub fn system(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            custom: false,
            field_type,
            default: None,
            required: false,
            label: String::new(),
            min: None,
            max: None,
            max_length: None,
            options: Vec::new(),
        }
    }

    /// Creates a custom field of the given type.
    #[must_use]
    pub fn custom(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            custom: true,
            ..Self::system(name, field_type)
        }
    }

    /// Marks the field as required.
    #[must_use]
    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Sets the configured default.
    #[must_use]
    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }

    /// Sets the bounds.
    #[must_use]
    pub fn with_bounds(mut self, min: Option<&str>, max: Option<&str>) -> Self {
        self.min = min.map(ToString::to_string);
        self.max = max.map(ToString::to_string);
        self
    }

    /// Sets the selectable options; values double as labels.
    #[must_use]
    pub fn with_options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = options
            .into_iter()
            .map(|value| {
                let value = value.into();
                FieldOption {
                    label: value.clone(),
                    value,
                }
            })
            .collect();
        self
    }

    /// The value a system field takes when the address has none.
    #[must_use]
    pub fn default_value(&self) -> FieldValue {
        let Some(default) = self.default.as_deref() else {
            return match self.field_type {
                FieldType::Checkbox => FieldValue::List(Vec::new()),
                _ => FieldValue::empty(),
            };
        };

        match self.field_type {
            FieldType::Checkbox => FieldValue::List(
                default
                    .split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(ToString::to_string)
                    .collect(),
            ),
            FieldType::Date => parse_date(default).map_or_else(FieldValue::empty, FieldValue::Date),
            FieldType::Integer => default
                .trim()
                .parse()
                .map_or_else(|_| FieldValue::empty(), FieldValue::Number),
            FieldType::Text
            | FieldType::Multiline
            | FieldType::Password
            | FieldType::Radio
            | FieldType::Dropdown => FieldValue::Text(default.to_string()),
        }
    }

    /// The value a custom field is reset to on every address change.
    ///
    /// Only dropdown, radio and date fields keep their configured default.
    #[must_use]
    pub fn reset_value(&self) -> FieldValue {
        match self.field_type {
            FieldType::Checkbox => FieldValue::List(Vec::new()),
            FieldType::Dropdown | FieldType::Radio => self
                .default
                .clone()
                .map_or_else(FieldValue::empty, FieldValue::Text),
            FieldType::Date => self
                .default
                .as_deref()
                .and_then(parse_date)
                .map_or_else(FieldValue::empty, FieldValue::Date),
            FieldType::Text | FieldType::Multiline | FieldType::Password | FieldType::Integer => {
                FieldValue::empty()
            }
        }
    }
}

/// Parses a `YYYY-MM-DD`-prefixed string such as `2024-05-01T00:00:00Z`.
#[must_use]
pub fn parse_date(source: &str) -> Option<NaiveDate> {
    let source = source.trim();
    let prefix = source.get(..10).unwrap_or(source);
    NaiveDate::parse_from_str(prefix, DATE_FORMAT).ok()
}
