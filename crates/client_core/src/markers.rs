//! Map widget seam and the pickup/drop-off marker lifecycle.

use std::collections::BTreeMap;

use shared::domain::{Coordinate, Slot};
use tracing::{debug, info};

use crate::{form::FormFields, selection::CoordinateStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MarkerId(pub u64);

/// Drop-off markers use a distinct icon so the two points can be told apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerStyle {
    Default,
    Dropoff,
}

impl MarkerStyle {
    pub fn for_slot(slot: Slot) -> Self {
        match slot {
            Slot::Pickup => MarkerStyle::Default,
            Slot::Dropoff => MarkerStyle::Dropoff,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MarkerSpec {
    pub position: Coordinate,
    pub draggable: bool,
    pub style: MarkerStyle,
    pub popup: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MapEvent {
    Click(Coordinate),
    MarkerDragEnd(MarkerId),
}

/// The external map rendering engine.
pub trait MapWidget {
    fn add_tile_layer(&mut self, url_template: &str, attribution: &str);
    fn set_view(&mut self, center: Coordinate, zoom: u8);
    fn add_marker(&mut self, spec: MarkerSpec) -> MarkerId;
    fn remove_marker(&mut self, id: MarkerId);
    fn marker_position(&self, id: MarkerId) -> Option<Coordinate>;
}

/// Ownership of one live marker on the map.
#[derive(Debug, PartialEq, Eq)]
pub struct MarkerHandle {
    id: MarkerId,
    slot: Slot,
}

impl MarkerHandle {
    pub fn id(&self) -> MarkerId {
        self.id
    }

    pub fn slot(&self) -> Slot {
        self.slot
    }

    fn release(self, map: &mut impl MapWidget) {
        map.remove_marker(self.id);
    }
}

/// Keeps at most one marker per slot and mirrors marker positions into the
/// coordinate store and the form inputs.
pub struct MarkerController {
    pickup: Option<MarkerHandle>,
    dropoff: Option<MarkerHandle>,
    store: CoordinateStore,
    fields: Box<dyn FormFields>,
}

impl MarkerController {
    pub fn new(store: CoordinateStore, fields: Box<dyn FormFields>) -> Self {
        Self {
            pickup: None,
            dropoff: None,
            store,
            fields,
        }
    }

    pub fn place_marker(&mut self, map: &mut impl MapWidget, slot: Slot, point: Coordinate) {
        if let Some(previous) = self.handle_mut(slot).take() {
            debug!(slot = %slot, marker_id = previous.id.0, "map: replacing marker");
            previous.release(map);
        }

        let id = map.add_marker(MarkerSpec {
            position: point,
            draggable: true,
            style: MarkerStyle::for_slot(slot),
            popup: slot.label(),
        });
        *self.handle_mut(slot) = Some(MarkerHandle { id, slot });
        self.record(slot, point);
    }

    /// Re-reads a dragged marker's position. Drag events from markers that
    /// were already replaced are ignored.
    pub fn on_drag_end(
        &mut self,
        map: &impl MapWidget,
        marker: MarkerId,
    ) -> Option<(Slot, Coordinate)> {
        let slot = [&self.pickup, &self.dropoff]
            .into_iter()
            .flatten()
            .find(|handle| handle.id == marker)
            .map(MarkerHandle::slot)?;
        let position = map.marker_position(marker)?;
        info!(slot = %slot, marker_id = marker.0, %position, "map: marker dragged");
        self.record(slot, position);
        Some((slot, position))
    }

    pub fn live_marker(&self, slot: Slot) -> Option<MarkerId> {
        match slot {
            Slot::Pickup => self.pickup.as_ref().map(MarkerHandle::id),
            Slot::Dropoff => self.dropoff.as_ref().map(MarkerHandle::id),
        }
    }

    pub fn store(&self) -> &CoordinateStore {
        &self.store
    }

    pub fn fields(&self) -> &dyn FormFields {
        self.fields.as_ref()
    }

    fn record(&mut self, slot: Slot, point: Coordinate) {
        self.store.set(slot, point);
        self.fields.write_point(slot, point);
    }

    fn handle_mut(&mut self, slot: Slot) -> &mut Option<MarkerHandle> {
        match slot {
            Slot::Pickup => &mut self.pickup,
            Slot::Dropoff => &mut self.dropoff,
        }
    }
}

/// In-memory map used by the command line host and tests.
#[derive(Debug, Default)]
pub struct HeadlessMap {
    markers: BTreeMap<MarkerId, MarkerSpec>,
    next_marker_id: u64,
    view: Option<(Coordinate, u8)>,
    tile_layers: Vec<String>,
}

impl HeadlessMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn markers(&self) -> impl Iterator<Item = (MarkerId, &MarkerSpec)> {
        self.markers.iter().map(|(id, spec)| (*id, spec))
    }

    pub fn marker(&self, id: MarkerId) -> Option<&MarkerSpec> {
        self.markers.get(&id)
    }

    pub fn view(&self) -> Option<(Coordinate, u8)> {
        self.view
    }

    pub fn tile_layers(&self) -> &[String] {
        &self.tile_layers
    }

    /// Moves a draggable marker and returns the drag-end event the widget
    /// would emit, or `None` when the marker is gone or pinned.
    pub fn drag_marker(&mut self, id: MarkerId, to: Coordinate) -> Option<MapEvent> {
        let spec = self.markers.get_mut(&id)?;
        if !spec.draggable {
            return None;
        }
        spec.position = to;
        Some(MapEvent::MarkerDragEnd(id))
    }
}

impl MapWidget for HeadlessMap {
    fn add_tile_layer(&mut self, url_template: &str, _attribution: &str) {
        self.tile_layers.push(url_template.to_string());
    }

    fn set_view(&mut self, center: Coordinate, zoom: u8) {
        self.view = Some((center, zoom));
    }

    fn add_marker(&mut self, spec: MarkerSpec) -> MarkerId {
        self.next_marker_id += 1;
        let id = MarkerId(self.next_marker_id);
        self.markers.insert(id, spec);
        id
    }

    fn remove_marker(&mut self, id: MarkerId) {
        self.markers.remove(&id);
    }

    fn marker_position(&self, id: MarkerId) -> Option<Coordinate> {
        self.markers.get(&id).map(|spec| spec.position)
    }
}

#[cfg(test)]
#[path = "tests/markers_tests.rs"]
mod tests;
