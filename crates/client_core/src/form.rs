//! Request form: coordinate inputs, submit gating and payload building.

use shared::{
    domain::{Coordinate, PaymentMethod, Slot},
    protocol::RideRequestSubmission,
};
use thiserror::Error;
use tracing::info;

use crate::selection::SelectionState;

pub const INCOMPLETE_SELECTION_MESSAGE: &str =
    "Please select pickup and dropoff points on the map (click twice).";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CoordinateField {
    PickupLat,
    PickupLng,
    DropoffLat,
    DropoffLng,
}

impl CoordinateField {
    pub const ALL: [CoordinateField; 4] = [
        CoordinateField::PickupLat,
        CoordinateField::PickupLng,
        CoordinateField::DropoffLat,
        CoordinateField::DropoffLng,
    ];

    /// Input name as it appears in the submitted form.
    pub fn name(self) -> &'static str {
        match self {
            CoordinateField::PickupLat => "pickup_lat",
            CoordinateField::PickupLng => "pickup_lng",
            CoordinateField::DropoffLat => "dropoff_lat",
            CoordinateField::DropoffLng => "dropoff_lng",
        }
    }

    pub fn pair_for(slot: Slot) -> (CoordinateField, CoordinateField) {
        match slot {
            Slot::Pickup => (CoordinateField::PickupLat, CoordinateField::PickupLng),
            Slot::Dropoff => (CoordinateField::DropoffLat, CoordinateField::DropoffLng),
        }
    }
}

/// Handle onto the four coordinate inputs of the request form.
pub trait FormFields {
    fn set_value(&mut self, field: CoordinateField, value: f64);
    fn value(&self, field: CoordinateField) -> Option<f64>;

    fn write_point(&mut self, slot: Slot, point: Coordinate) {
        let (lat, lng) = CoordinateField::pair_for(slot);
        self.set_value(lat, point.latitude());
        self.set_value(lng, point.longitude());
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct InMemoryFormFields {
    pickup_lat: Option<f64>,
    pickup_lng: Option<f64>,
    dropoff_lat: Option<f64>,
    dropoff_lng: Option<f64>,
}

impl FormFields for InMemoryFormFields {
    fn set_value(&mut self, field: CoordinateField, value: f64) {
        *self.slot_mut(field) = Some(value);
    }

    fn value(&self, field: CoordinateField) -> Option<f64> {
        match field {
            CoordinateField::PickupLat => self.pickup_lat,
            CoordinateField::PickupLng => self.pickup_lng,
            CoordinateField::DropoffLat => self.dropoff_lat,
            CoordinateField::DropoffLng => self.dropoff_lng,
        }
    }
}

impl InMemoryFormFields {
    fn slot_mut(&mut self, field: CoordinateField) -> &mut Option<f64> {
        match field {
            CoordinateField::PickupLat => &mut self.pickup_lat,
            CoordinateField::PickupLng => &mut self.pickup_lng,
            CoordinateField::DropoffLat => &mut self.dropoff_lat,
            CoordinateField::DropoffLng => &mut self.dropoff_lng,
        }
    }
}

/// Blocking message surface (an alert dialog in a browser).
pub trait UserNotifier {
    fn alert(&mut self, message: &str);
}

/// The pending submit action; cancelling it keeps the form from being sent.
#[derive(Debug, Default)]
pub struct SubmitEvent {
    default_prevented: bool,
}

impl SubmitEvent {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FormGateError {
    #[error("pickup point has not been selected")]
    MissingPickup,
    #[error("dropoff point has not been selected")]
    MissingDropoff,
}

pub struct FormGate<N> {
    notifier: N,
}

impl<N: UserNotifier> FormGate<N> {
    pub fn new(notifier: N) -> Self {
        Self { notifier }
    }

    /// Lets the submit proceed only with both points selected. Otherwise the
    /// submit is cancelled and the user is told to click the map twice.
    pub fn validate_and_maybe_submit(
        &mut self,
        selection: &SelectionState,
        event: &mut SubmitEvent,
    ) -> bool {
        match Self::complete_pair(selection) {
            Ok(_) => true,
            Err(err) => {
                info!(reason = %err, "form: blocked submission with incomplete selection");
                event.prevent_default();
                self.notifier.alert(INCOMPLETE_SELECTION_MESSAGE);
                false
            }
        }
    }

    pub fn complete_pair(
        selection: &SelectionState,
    ) -> Result<(Coordinate, Coordinate), FormGateError> {
        let pickup = selection.pickup.ok_or(FormGateError::MissingPickup)?;
        let dropoff = selection.dropoff.ok_or(FormGateError::MissingDropoff)?;
        Ok((pickup, dropoff))
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }
}

/// Non-coordinate inputs of the ride request form.
#[derive(Debug, Clone, PartialEq)]
pub struct RideRequestForm {
    pub pickup_address: String,
    pub dropoff_address: String,
    pub payment_method: PaymentMethod,
    pub city: String,
    pub vehicle_type: String,
}

impl Default for RideRequestForm {
    fn default() -> Self {
        Self {
            pickup_address: String::new(),
            dropoff_address: String::new(),
            payment_method: PaymentMethod::Cash,
            city: "Lagos".into(),
            vehicle_type: "Standard".into(),
        }
    }
}

impl RideRequestForm {
    pub fn into_submission(
        self,
        selection: &SelectionState,
    ) -> Result<RideRequestSubmission, FormGateError> {
        let (pickup, dropoff) = FormGate::<NoopNotifier>::complete_pair(selection)?;
        Ok(RideRequestSubmission {
            pickup_address: self.pickup_address,
            dropoff_address: self.dropoff_address,
            pickup_lat: pickup.latitude(),
            pickup_lng: pickup.longitude(),
            dropoff_lat: dropoff.latitude(),
            dropoff_lng: dropoff.longitude(),
            payment_method: self.payment_method,
            city: self.city,
            vehicle_type: self.vehicle_type,
            csrfmiddlewaretoken: None,
        })
    }
}

pub struct NoopNotifier;

impl UserNotifier for NoopNotifier {
    fn alert(&mut self, _message: &str) {}
}

#[cfg(test)]
#[path = "tests/form_tests.rs"]
mod tests;
