//! Semantic address comparison.
//!
//! Two addresses are equal when every system field and every non-empty custom
//! answer matches. Missing and empty values compare equal; the saved-address
//! id and the save flag are not part of the comparison.

use std::collections::BTreeMap;

use super::{Address, FieldValue};

/// Returns `true` if both addresses describe the same destination.
#[must_use]
pub fn is_equal_address(a: &Address, b: &Address) -> bool {
    Address::SYSTEM_FIELDS
        .iter()
        .all(|name| normalized(a.get(name)) == normalized(b.get(name)))
        && answered(&a.custom_fields) == answered(&b.custom_fields)
}

/// Returns `true` if the custom answers of `address` differ from `previous`.
///
/// With no previous address, any non-empty answer counts as a change.
#[must_use]
pub fn has_custom_field_changes(address: &Address, previous: Option<&Address>) -> bool {
    let current = answered(&address.custom_fields);
    previous.map_or(!current.is_empty(), |prev| {
        current != answered(&prev.custom_fields)
    })
}

fn normalized(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn answered(fields: &BTreeMap<String, FieldValue>) -> BTreeMap<&str, &FieldValue> {
    fields
        .iter()
        .filter(|(_, value)| !value.is_empty())
        .map(|(name, value)| (name.as_str(), value))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn address(city: &str) -> Address {
        Address {
            address1: Some("10 Downing St".to_string()),
            city: Some(city.to_string()),
            country_code: Some("GB".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_equal_ignores_id_save_flag_and_empty_values() {
        let a = address("London");
        let mut b = address("London");
        b.id = Some(7);
        b.should_save_address = Some(false);
        b.company = Some(String::new());
        b.custom_fields
            .insert("field_1".to_string(), FieldValue::List(vec![]));

        assert!(is_equal_address(&a, &b));
    }

    #[test]
    fn test_different_city_is_not_equal() {
        assert!(!is_equal_address(&address("London"), &address("Leeds")));
    }

    #[test]
    fn test_custom_answers_participate_in_equality() {
        let a = address("London");
        let mut b = address("London");
        b.custom_fields
            .insert("field_1".to_string(), FieldValue::from("Leave at door"));

        assert!(!is_equal_address(&a, &b));
        assert!(has_custom_field_changes(&b, Some(&a)));
        assert!(!has_custom_field_changes(&a, Some(&a)));
    }

    #[test]
    fn test_custom_changes_without_previous_address() {
        let a = address("London");
        assert!(!has_custom_field_changes(&a, None));

        let mut b = a;
        b.custom_fields
            .insert("field_2".to_string(), FieldValue::Number(2));
        assert!(has_custom_field_changes(&b, None));
    }
}
