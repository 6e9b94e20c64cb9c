//! Address form validation.
//!
//! An [`AddressValidationSchema`] validates form values against the active
//! field list. System fields are always checked in full; custom fields are
//! checked according to a [`CustomFieldSchema`], which
//! [`ValidationSchemaSelector`] picks from the selected payment method.
//!
//! # Example
//!
//! ```rust
//! use checkout_forms::address::{
//!     to_form_values, CustomFieldSchema, FieldType, FormField, ValidationSchemaSelector,
//! };
//! use checkout_forms::CheckoutFormsConfig;
//!
//! let fields = vec![FormField::custom("field_3", FieldType::Text).required()];
//! let values = to_form_values(&fields, None);
//! let mut selector = ValidationSchemaSelector::new(&CheckoutFormsConfig::default());
//!
//! assert!(selector.select(Some("authorizenet"), &fields).validate(&values).is_err());
//!
//! let schema = selector.select(Some("amazonpay"), &fields);
//! assert_eq!(schema.custom_field_schema(), CustomFieldSchema::Relaxed);
//! assert!(schema.validate(&values).is_ok());
//! ```

use std::collections::BTreeMap;

use thiserror::Error;

use super::{parse_date, Address, AddressFormValues, FieldType, FieldValue, FormField};
use crate::config::{CheckoutFormsConfig, PaymentMethodId};

/// Per-field validation failures, keyed by field name.
#[derive(Debug, Clone, Error, PartialEq, Eq, Default)]
#[error("{} address field(s) failed validation", .errors.len())]
pub struct ValidationErrors {
    pub errors: BTreeMap<String, String>,
}

impl ValidationErrors {
    /// Returns the names of the failing fields.
    #[must_use]
    pub fn field_names(&self) -> Vec<String> {
        self.errors.keys().cloned().collect()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }
}

/// How custom fields are validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CustomFieldSchema {
    /// Required, bounds, length and option checks per field metadata.
    Full,
    /// Custom fields always pass.
    Relaxed,
}

impl CustomFieldSchema {
    /// Picks the schema for a payment method.
    ///
    /// Methods in `relaxed_methods` get [`CustomFieldSchema::Relaxed`].
    #[must_use]
    pub fn for_method(method_id: Option<&str>, relaxed_methods: &[PaymentMethodId]) -> Self {
        match method_id {
            Some(id) if relaxed_methods.iter().any(|m| m.as_ref() == id) => Self::Relaxed,
            _ => Self::Full,
        }
    }
}

/// A validation ruleset for one field list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressValidationSchema {
    fields: Vec<FormField>,
    custom: CustomFieldSchema,
}

impl AddressValidationSchema {
    #[must_use]
    pub const fn new(fields: Vec<FormField>, custom: CustomFieldSchema) -> Self {
        Self { fields, custom }
    }

    /// A schema that validates every field in full.
    #[must_use]
    pub fn full(fields: &[FormField]) -> Self {
        Self::new(fields.to_vec(), CustomFieldSchema::Full)
    }

    #[must_use]
    pub const fn custom_field_schema(&self) -> CustomFieldSchema {
        self.custom
    }

    #[must_use]
    pub fn fields(&self) -> &[FormField] {
        &self.fields
    }

    /// Validates form values.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationErrors`] listing every failing field.
    pub fn validate(&self, values: &AddressFormValues) -> Result<(), ValidationErrors> {
        let mut errors = BTreeMap::new();

        for field in &self.fields {
            let value = if field.custom {
                if self.custom == CustomFieldSchema::Relaxed {
                    continue;
                }
                values.custom_fields.get(&field.name)
            } else {
                values.fields.get(&field.name)
            };

            if let Some(message) = check_field(field, value) {
                errors.insert(field.name.clone(), message);
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationErrors { errors })
        }
    }

    /// Validates an address as-is, including its custom answers.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationErrors`] listing every failing field.
    pub fn validate_address(&self, address: &Address) -> Result<(), ValidationErrors> {
        let values = AddressFormValues {
            fields: self
                .fields
                .iter()
                .filter(|field| !field.custom)
                .filter_map(|field| {
                    address
                        .get(&field.name)
                        .map(|v| (field.name.clone(), FieldValue::from(v)))
                })
                .collect(),
            custom_fields: address.custom_fields.clone(),
            should_save_address: address.should_save_address.unwrap_or(true),
        };
        self.validate(&values)
    }
}

/// Returns `true` if `address` passes full validation against `fields`.
#[must_use]
pub fn is_valid_address(address: &Address, fields: &[FormField]) -> bool {
    AddressValidationSchema::full(fields)
        .validate_address(address)
        .is_ok()
}

fn check_field(field: &FormField, value: Option<&FieldValue>) -> Option<String> {
    let value = match value {
        Some(v) if !v.is_empty() => v,
        _ if field.required => return Some(format!("{} is required", label(field))),
        _ => return None,
    };

    match field.field_type {
        FieldType::Integer => check_integer(field, value),
        FieldType::Date => check_date(field, value),
        FieldType::Text | FieldType::Multiline | FieldType::Password => {
            let length = value.to_text().chars().count();
            field
                .max_length
                .filter(|max| length > *max)
                .map(|max| format!("{} must be at most {max} characters", label(field)))
        }
        FieldType::Dropdown | FieldType::Radio | FieldType::Checkbox => {
            check_options(field, value)
        }
    }
}

fn check_integer(field: &FormField, value: &FieldValue) -> Option<String> {
    let number = match value {
        FieldValue::Number(n) => *n,
        other => match other.to_text().trim().parse::<i64>() {
            Ok(n) => n,
            Err(_) => return Some(format!("{} must be a whole number", label(field))),
        },
    };

    let bound = |b: &Option<String>| b.as_deref().and_then(|s| s.trim().parse::<i64>().ok());
    if let Some(min) = bound(&field.min).filter(|min| number < *min) {
        return Some(format!("{} must be at least {min}", label(field)));
    }
    if let Some(max) = bound(&field.max).filter(|max| number > *max) {
        return Some(format!("{} must be at most {max}", label(field)));
    }
    None
}

fn check_date(field: &FormField, value: &FieldValue) -> Option<String> {
    let date = match value {
        FieldValue::Date(d) => *d,
        other => match parse_date(&other.to_text()) {
            Some(d) => d,
            None => return Some(format!("{} must be a valid date", label(field))),
        },
    };

    if let Some(min) = field.min.as_deref().and_then(parse_date).filter(|m| date < *m) {
        return Some(format!("{} must be on or after {min}", label(field)));
    }
    if let Some(max) = field.max.as_deref().and_then(parse_date).filter(|m| date > *m) {
        return Some(format!("{} must be on or before {max}", label(field)));
    }
    None
}

fn check_options(field: &FormField, value: &FieldValue) -> Option<String> {
    if field.options.is_empty() {
        return None;
    }
    let known = |v: &str| field.options.iter().any(|o| o.value == v);
    let valid = match value {
        FieldValue::List(items) => items.iter().all(|item| known(item)),
        other => known(&other.to_text()),
    };
    (!valid).then(|| format!("{} has an invalid selection", label(field)))
}

fn label(field: &FormField) -> &str {
    if field.label.is_empty() {
        &field.name
    } else {
        &field.label
    }
}

/// Chooses and memoizes the validation schema for the active payment method.
///
/// The schema is rebuilt only when the method id or the field list changes.
#[derive(Debug, Clone)]
pub struct ValidationSchemaSelector {
    relaxed_methods: Vec<PaymentMethodId>,
    cached: Option<CachedSchema>,
}

#[derive(Debug, Clone)]
struct CachedSchema {
    method_id: Option<String>,
    schema: AddressValidationSchema,
}

impl ValidationSchemaSelector {
    #[must_use]
    pub fn new(config: &CheckoutFormsConfig) -> Self {
        Self {
            relaxed_methods: config.relaxed_validation_methods().to_vec(),
            cached: None,
        }
    }

    /// Returns the schema for `method_id` and `fields`.
    pub fn select(
        &mut self,
        method_id: Option<&str>,
        fields: &[FormField],
    ) -> &AddressValidationSchema {
        let stale = self.cached.as_ref().map_or(true, |cached| {
            cached.method_id.as_deref() != method_id || cached.schema.fields != fields
        });

        if stale {
            self.cached = None;
        }

        let cached = self.cached.get_or_insert_with(|| {
            let custom = CustomFieldSchema::for_method(method_id, &self.relaxed_methods);
            tracing::debug!(method_id = ?method_id, schema = ?custom, "Selected address validation schema");
            CachedSchema {
                method_id: method_id.map(ToString::to_string),
                schema: AddressValidationSchema::new(fields.to_vec(), custom),
            }
        });
        &cached.schema
    }
}
