//! Pickup/drop-off selection held by the request map.

use shared::domain::{Coordinate, Slot};
use tokio::sync::watch;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectionState {
    pub pickup: Option<Coordinate>,
    pub dropoff: Option<Coordinate>,
    pub next_slot: Slot,
}

impl Default for SelectionState {
    fn default() -> Self {
        Self {
            pickup: None,
            dropoff: None,
            next_slot: Slot::Pickup,
        }
    }
}

impl SelectionState {
    pub fn get(&self, slot: Slot) -> Option<Coordinate> {
        match slot {
            Slot::Pickup => self.pickup,
            Slot::Dropoff => self.dropoff,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.pickup.is_some() && self.dropoff.is_some()
    }
}

/// Last selected coordinates. Every write is published to subscribers.
pub struct CoordinateStore {
    state: watch::Sender<SelectionState>,
}

impl Default for CoordinateStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CoordinateStore {
    pub fn new() -> Self {
        let (state, _) = watch::channel(SelectionState::default());
        Self { state }
    }

    pub fn get(&self, slot: Slot) -> Option<Coordinate> {
        self.state.borrow().get(slot)
    }

    pub fn set(&self, slot: Slot, point: Coordinate) {
        self.state.send_modify(|state| match slot {
            Slot::Pickup => state.pickup = Some(point),
            Slot::Dropoff => state.dropoff = Some(point),
        });
    }

    pub fn set_next_slot(&self, slot: Slot) {
        self.state.send_if_modified(|state| {
            if state.next_slot == slot {
                return false;
            }
            state.next_slot = slot;
            true
        });
    }

    pub fn selection(&self) -> SelectionState {
        *self.state.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<SelectionState> {
        self.state.subscribe()
    }
}
