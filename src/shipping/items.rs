//! Derivation of shippable items from the cart and its consignments.
//!
//! Every unit of a shippable line item becomes one [`ShippableItem`] keyed
//! `"{item_id}-{unit}"`. The list is always rebuilt from scratch; previous
//! items only act as a hint so that a unit keeps its address when the
//! consignments still ship that many units there.

use crate::address::{is_equal_address, Address};
use crate::sdk::{Cart, Consignment, LineItem};

/// One unit of a cart line item that can be shipped to its own address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShippableItem {
    /// Stable per unit: `"{item_id}-{unit}"`.
    pub key: String,
    pub item_id: String,
    pub name: String,
    /// The address this unit ships to, once assigned.
    pub address: Option<Address>,
}

impl ShippableItem {
    #[must_use]
    pub const fn is_assigned(&self) -> bool {
        self.address.is_some()
    }
}

/// Builds the shippable item list for `cart` and `consignments`.
///
/// Units listed in `previous` keep their address where a consignment for that
/// address still has room for them; remaining consignment quantities fill the
/// other units in key order.
#[must_use]
pub fn shippable_items(
    cart: &Cart,
    consignments: &[Consignment],
    previous: &[ShippableItem],
) -> Vec<ShippableItem> {
    cart.shippable_line_items()
        .flat_map(|line_item| split_line_item(line_item, consignments, previous))
        .collect()
}

fn split_line_item(
    line_item: &LineItem,
    consignments: &[Consignment],
    previous: &[ShippableItem],
) -> Vec<ShippableItem> {
    let mut capacity: Vec<(&Address, u32)> = consignments
        .iter()
        .map(|c| (&c.address, c.quantity_of(&line_item.id)))
        .filter(|(_, quantity)| *quantity > 0)
        .collect();

    let mut units: Vec<ShippableItem> = (0..line_item.quantity)
        .map(|unit| ShippableItem {
            key: format!("{}-{unit}", line_item.id),
            item_id: line_item.id.clone(),
            name: line_item.name.clone(),
            address: None,
        })
        .collect();

    for unit in &mut units {
        let hint = previous
            .iter()
            .find(|p| p.key == unit.key)
            .and_then(|p| p.address.as_ref());
        let Some(hint) = hint else { continue };

        if let Some((address, remaining)) = capacity
            .iter_mut()
            .find(|(address, remaining)| *remaining > 0 && is_equal_address(address, hint))
        {
            *remaining -= 1;
            unit.address = Some((*address).clone());
        }
    }

    for unit in units.iter_mut().filter(|u| u.address.is_none()) {
        if let Some((address, remaining)) = capacity
            .iter_mut()
            .find(|(_, remaining)| *remaining > 0)
        {
            *remaining -= 1;
            unit.address = Some((*address).clone());
        }
    }

    units
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sdk::ConsignmentLineItem;

    fn address(city: &str) -> Address {
        Address {
            address1: Some("1 Main St".to_string()),
            city: Some(city.to_string()),
            country_code: Some("US".to_string()),
            ..Default::default()
        }
    }

    fn consignment(id: &str, city: &str, lines: &[(&str, u32)]) -> Consignment {
        Consignment {
            id: id.to_string(),
            address: address(city),
            line_items: lines
                .iter()
                .map(|(item_id, quantity)| ConsignmentLineItem {
                    item_id: (*item_id).to_string(),
                    quantity: *quantity,
                })
                .collect(),
            available_shipping_options: Vec::new(),
            selected_shipping_option: None,
        }
    }

    fn cart() -> Cart {
        Cart {
            id: "cart-1".to_string(),
            line_items: vec![LineItem::new("42", "Candle", 3), LineItem::new("7", "Soap", 1)],
        }
    }

    #[test]
    fn test_splits_line_items_into_keyed_units() {
        let items = shippable_items(&cart(), &[], &[]);

        let keys: Vec<&str> = items.iter().map(|i| i.key.as_str()).collect();
        assert_eq!(keys, vec!["42-0", "42-1", "42-2", "7-0"]);
        assert!(items.iter().all(|i| !i.is_assigned()));
    }

    #[test]
    fn test_fills_units_from_consignment_quantities() {
        let consignments = vec![consignment("c1", "Austin", &[("42", 2), ("7", 1)])];

        let items = shippable_items(&cart(), &consignments, &[]);

        assert!(items[0].is_assigned());
        assert!(items[1].is_assigned());
        assert!(!items[2].is_assigned());
        assert_eq!(items[3].address.as_ref().unwrap().city.as_deref(), Some("Austin"));
    }

    #[test]
    fn test_previous_assignment_keeps_its_unit() {
        let consignments = vec![consignment("c1", "Denver", &[("42", 1)])];
        let mut previous = shippable_items(&cart(), &[], &[]);
        previous[2].address = Some(address("Denver"));

        let items = shippable_items(&cart(), &consignments, &previous);

        assert!(!items[0].is_assigned());
        assert!(!items[1].is_assigned());
        assert_eq!(items[2].address.as_ref().unwrap().city.as_deref(), Some("Denver"));
    }

    #[test]
    fn test_stale_hint_is_dropped_when_consignment_moves() {
        let consignments = vec![consignment("c2", "Boise", &[("42", 1)])];
        let mut previous = shippable_items(&cart(), &[], &[]);
        previous[1].address = Some(address("Denver"));

        let items = shippable_items(&cart(), &consignments, &previous);

        assert_eq!(items[0].address.as_ref().unwrap().city.as_deref(), Some("Boise"));
        assert!(!items[1].is_assigned());
    }
}
