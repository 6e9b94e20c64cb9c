//! Shared test doubles for the shipping form integration tests.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use checkout_forms::address::is_equal_address;
use checkout_forms::{
    Address, Cart, CheckoutService, CheckoutSnapshot, Consignment, ConsignmentAssignment,
    CountryCode, FieldType, FormField, LineItem, SdkError, ShippingError, ShippingFormEvents,
    ShippingInitializeOptions, ShippingOption, ShippingSubmission, UpdateAddressOptions,
};

/// State behind [`MockCheckout`], including every call it received.
#[derive(Debug, Default)]
pub struct MockState {
    pub cart: Option<Cart>,
    pub consignments: Vec<Consignment>,
    pub fields_by_country: HashMap<String, Vec<FormField>>,
    pub deleted_address: Option<Address>,

    pub fail_update: bool,
    pub fail_assign: bool,
    pub fail_create: bool,
    pub select_option_on_assign: bool,
    /// Stores assigned addresses with `stateOrProvince` filled from the code.
    pub fill_state_names: bool,

    pub update_calls: Vec<(Address, UpdateAddressOptions)>,
    pub assign_calls: Vec<ConsignmentAssignment>,
    pub create_calls: Vec<Address>,
    pub delete_calls: u32,
    pub initialize_calls: Vec<ShippingInitializeOptions>,
    pub deinitialize_calls: Vec<ShippingInitializeOptions>,
}

/// A recording in-memory checkout SDK.
#[derive(Debug, Default)]
pub struct MockCheckout {
    state: Mutex<MockState>,
}

impl MockCheckout {
    pub fn new() -> Self {
        let mut state = MockState::default();
        state.fields_by_country.insert("US".to_string(), us_fields());
        state.fields_by_country.insert("CA".to_string(), ca_fields());
        Self {
            state: Mutex::new(state),
        }
    }

    pub fn with_cart(self, line_items: Vec<LineItem>) -> Self {
        self.state().cart = Some(Cart {
            id: "cart-1".to_string(),
            line_items,
        });
        self
    }

    pub fn with_consignment(self, address: Address, selected: bool) -> Self {
        {
            let mut state = self.state();
            let line_items = state
                .cart
                .iter()
                .flat_map(|cart| cart.line_items.iter())
                .map(|item| checkout_forms::ConsignmentLineItem {
                    item_id: item.id.clone(),
                    quantity: item.quantity,
                })
                .collect();
            let id = format!("c{}", state.consignments.len() + 1);
            state.consignments.push(Consignment {
                id,
                address,
                line_items,
                available_shipping_options: vec![ground()],
                selected_shipping_option: selected.then(ground),
            });
        }
        self
    }

    pub fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap()
    }

    fn snapshot(state: &MockState) -> CheckoutSnapshot {
        CheckoutSnapshot {
            cart: state.cart.clone(),
            consignments: state.consignments.clone(),
            shipping_address: state.consignments.first().map(|c| c.address.clone()),
        }
    }
}

impl CheckoutService for &MockCheckout {
    async fn update_shipping_address(
        &self,
        address: &Address,
        options: UpdateAddressOptions,
    ) -> Result<CheckoutSnapshot, SdkError> {
        let mut state = self.state();
        state.update_calls.push((address.clone(), options));
        if state.fail_update {
            return Err(SdkError::request("update rejected"));
        }

        let line_items = state
            .cart
            .iter()
            .flat_map(|cart| cart.line_items.iter())
            .map(|item| checkout_forms::ConsignmentLineItem {
                item_id: item.id.clone(),
                quantity: item.quantity,
            })
            .collect();
        let previous_option = state
            .consignments
            .first()
            .and_then(|c| c.selected_shipping_option.clone());
        state.consignments = vec![Consignment {
            id: "c1".to_string(),
            address: address.clone(),
            line_items,
            available_shipping_options: vec![ground()],
            selected_shipping_option: if options.include_shipping_options {
                Some(ground())
            } else {
                previous_option
            },
        }];
        Ok(MockCheckout::snapshot(&state))
    }

    async fn assign_item(
        &self,
        assignment: &ConsignmentAssignment,
    ) -> Result<CheckoutSnapshot, SdkError> {
        let mut state = self.state();
        state.assign_calls.push(assignment.clone());
        if state.fail_assign {
            return Err(SdkError::RequestFailed {
                status: Some(422),
                message: "assignment rejected".to_string(),
            });
        }

        let mut address = assignment.address.clone();
        if state.fill_state_names {
            address.state_or_province = address
                .state_or_province_code
                .as_deref()
                .map(state_name)
                .map(ToString::to_string);
        }

        for line in &assignment.line_items {
            let ordered = state
                .cart
                .as_ref()
                .and_then(|cart| cart.line_items.iter().find(|i| i.id == line.item_id))
                .map_or(0, |i| i.quantity);
            let assigned: u32 = state
                .consignments
                .iter()
                .map(|c| c.quantity_of(&line.item_id))
                .sum();

            // Move units away from other consignments once everything is assigned.
            let mut overflow = (assigned + line.quantity).saturating_sub(ordered);
            for consignment in &mut state.consignments {
                if overflow == 0 {
                    break;
                }
                if is_equal_address(&consignment.address, &address) {
                    continue;
                }
                if let Some(existing) = consignment
                    .line_items
                    .iter_mut()
                    .find(|l| l.item_id == line.item_id && l.quantity > 0)
                {
                    let moved = existing.quantity.min(overflow);
                    existing.quantity -= moved;
                    overflow -= moved;
                }
            }

            let select = state.select_option_on_assign;
            let next_id = format!("c{}", state.consignments.len() + 1);
            let target = state
                .consignments
                .iter()
                .position(|c| is_equal_address(&c.address, &address));
            match target {
                Some(index) => {
                    let lines = &mut state.consignments[index].line_items;
                    match lines.iter().position(|l| l.item_id == line.item_id) {
                        Some(existing) => lines[existing].quantity += line.quantity,
                        None => lines.push(line.clone()),
                    }
                }
                None => state.consignments.push(Consignment {
                    id: next_id,
                    address: address.clone(),
                    line_items: vec![line.clone()],
                    available_shipping_options: vec![ground()],
                    selected_shipping_option: select.then(ground),
                }),
            }
        }

        for consignment in &mut state.consignments {
            consignment.line_items.retain(|l| l.quantity > 0);
        }
        state.consignments.retain(|c| !c.line_items.is_empty());
        Ok(MockCheckout::snapshot(&state))
    }

    async fn delete_consignments(&self) -> Result<Option<Address>, SdkError> {
        let mut state = self.state();
        state.delete_calls += 1;
        state.consignments.clear();
        Ok(state.deleted_address.clone())
    }

    async fn create_customer_address(&self, address: &Address) -> Result<Address, SdkError> {
        let mut state = self.state();
        state.create_calls.push(address.clone());
        if state.fail_create {
            return Err(SdkError::request("address book unavailable"));
        }
        Ok(Address {
            id: Some(state.create_calls.len() as u64),
            ..address.clone()
        })
    }

    async fn initialize_shipping(
        &self,
        options: &ShippingInitializeOptions,
    ) -> Result<(), SdkError> {
        self.state().initialize_calls.push(options.clone());
        Ok(())
    }

    async fn deinitialize_shipping(
        &self,
        options: &ShippingInitializeOptions,
    ) -> Result<(), SdkError> {
        self.state().deinitialize_calls.push(options.clone());
        Ok(())
    }

    fn cart(&self) -> Option<Cart> {
        self.state().cart.clone()
    }

    fn consignments(&self) -> Vec<Consignment> {
        self.state().consignments.clone()
    }

    fn fields(&self, country: Option<&CountryCode>) -> Vec<FormField> {
        let code = country.map_or("US", AsRef::as_ref);
        self.state()
            .fields_by_country
            .get(code)
            .cloned()
            .unwrap_or_default()
    }
}

/// Records every host notification.
#[derive(Debug, Default)]
pub struct RecordingEvents {
    pub errors: RefCell<Vec<String>>,
    pub submissions: RefCell<u32>,
    pub new_address_requests: RefCell<Vec<(Option<Address>, String)>>,
}

impl ShippingFormEvents for &RecordingEvents {
    fn on_submit(&self, _submission: ShippingSubmission<'_>) {
        *self.submissions.borrow_mut() += 1;
    }

    fn on_unhandled_error(&self, error: &ShippingError) {
        self.errors.borrow_mut().push(error.to_string());
    }

    fn on_use_new_address(&self, address: Option<&Address>, item_id: &str) {
        self.new_address_requests
            .borrow_mut()
            .push((address.cloned(), item_id.to_string()));
    }
}

fn state_name(code: &str) -> &str {
    match code {
        "OR" => "Oregon",
        "TX" => "Texas",
        other => other,
    }
}

pub fn ground() -> ShippingOption {
    ShippingOption {
        id: "ground".to_string(),
        description: "Ground".to_string(),
        cost: 7.5,
    }
}

fn base_fields() -> Vec<FormField> {
    vec![
        FormField::system("firstName", FieldType::Text).required(),
        FormField::system("lastName", FieldType::Text).required(),
        FormField::system("address1", FieldType::Text).required(),
        FormField::system("address2", FieldType::Text),
        FormField::system("city", FieldType::Text).required(),
        FormField::system("countryCode", FieldType::Dropdown).required(),
        FormField::system("postalCode", FieldType::Text).required(),
    ]
}

pub fn us_fields() -> Vec<FormField> {
    let mut fields = base_fields();
    fields.push(FormField::system("stateOrProvinceCode", FieldType::Dropdown).required());
    fields.push(FormField::custom("field_30", FieldType::Text));
    fields.push(
        FormField::custom("field_31", FieldType::Checkbox).with_options(["gift", "fragile"]),
    );
    fields
}

pub fn ca_fields() -> Vec<FormField> {
    let mut fields = base_fields();
    fields.push(FormField::system("stateOrProvinceCode", FieldType::Dropdown));
    fields.push(
        FormField::custom("field_40", FieldType::Dropdown)
            .with_default("door")
            .with_options(["door", "mailroom"]),
    );
    fields
}

pub fn texas_address() -> Address {
    Address {
        first_name: Some("Ada".to_string()),
        last_name: Some("Lovelace".to_string()),
        address1: Some("100 Congress Ave".to_string()),
        city: Some("Austin".to_string()),
        state_or_province: Some("Texas".to_string()),
        state_or_province_code: Some("TX".to_string()),
        postal_code: Some("78701".to_string()),
        country_code: Some("US".to_string()),
        ..Default::default()
    }
}

pub fn oregon_address() -> Address {
    Address {
        first_name: Some("Grace".to_string()),
        last_name: Some("Hopper".to_string()),
        address1: Some("1 Pioneer Sq".to_string()),
        city: Some("Portland".to_string()),
        state_or_province_code: Some("OR".to_string()),
        postal_code: Some("97204".to_string()),
        country_code: Some("US".to_string()),
        ..Default::default()
    }
}
