//! Shipping form state machines.
//!
//! # Overview
//!
//! - [`SingleShippingForm`]: one shipping address, edited in place and pushed
//!   to the SDK after a quiet period
//! - [`MultiShippingForm`]: one address per shippable unit, assigned one unit
//!   at a time
//! - [`ShippingFormEvents`]: callbacks to the host page
//! - [`ShippingError`]: errors surfaced by both forms
//!
//! Both forms are driven from a single task through `&mut self`, so at most
//! one remote call per form is in flight at any time.

pub mod debounce;
mod errors;
mod events;
pub mod items;
mod multi;
mod single;

pub use debounce::Debouncer;
pub use errors::ShippingError;
pub use events::{ShippingFormEvents, ShippingSubmission};
pub use items::{shippable_items, ShippableItem};
pub use multi::MultiShippingForm;
pub use single::{AddressUpdate, ShippingFormState, SingleShippingForm};

/// Raises a busy flag for the lifetime of the guard.
///
/// The flag is lowered on drop, so it is cleared whether the guarded call
/// succeeds, fails, or its future is dropped.
struct BusyFlag<'a>(&'a mut bool);

impl<'a> BusyFlag<'a> {
    fn raise(flag: &'a mut bool) -> Self {
        *flag = true;
        Self(flag)
    }
}

impl Drop for BusyFlag<'_> {
    fn drop(&mut self) {
        *self.0 = false;
    }
}
