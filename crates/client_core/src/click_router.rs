use shared::domain::{Coordinate, Slot};

/// Alternates map clicks between pickup and drop-off. Odd clicks place the
/// pickup, even clicks the drop-off.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClickRouter {
    clicks: u64,
}

impl ClickRouter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_map_click(&mut self, _point: Coordinate) -> Slot {
        self.clicks += 1;
        Self::slot_for(self.clicks)
    }

    /// Slot the next click will resolve to.
    pub fn next_slot(&self) -> Slot {
        Self::slot_for(self.clicks + 1)
    }

    pub fn clicks(&self) -> u64 {
        self.clicks
    }

    fn slot_for(click: u64) -> Slot {
        if click % 2 == 1 {
            Slot::Pickup
        } else {
            Slot::Dropoff
        }
    }
}
