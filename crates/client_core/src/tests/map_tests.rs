use super::*;
use crate::{
    form::{CoordinateField, InMemoryFormFields},
    markers::HeadlessMap,
};

struct FixedPosition(Coordinate);

impl GeolocationProvider for FixedPosition {
    fn current_position(&self) -> Result<Coordinate, GeolocationError> {
        Ok(self.0)
    }
}

struct DeniedPosition;

impl GeolocationProvider for DeniedPosition {
    fn current_position(&self) -> Result<Coordinate, GeolocationError> {
        Err(GeolocationError::PermissionDenied)
    }
}

fn point(lat: f64, lng: f64) -> Coordinate {
    Coordinate::new(lat, lng).expect("coordinate")
}

fn mounted(geolocation: Option<&dyn GeolocationProvider>) -> RequestMap<HeadlessMap> {
    RequestMap::mount(
        Some(HeadlessMap::new()),
        &MapConfig::default(),
        Box::new(InMemoryFormFields::default()),
        geolocation,
    )
    .expect("mounted map")
}

#[test]
fn missing_anchor_leaves_the_map_inert() {
    let map = RequestMap::<HeadlessMap>::mount(
        None,
        &MapConfig::default(),
        Box::new(InMemoryFormFields::default()),
        None,
    );
    assert!(map.is_none());
}

#[test]
fn mounts_on_default_view_with_tiles() {
    let map = mounted(None);
    assert_eq!(map.map().view(), Some((Coordinate::LAGOS, 11)));
    assert_eq!(map.map().tile_layers().to_vec(), vec![OSM_TILE_URL.to_string()]);
    assert_eq!(map.selection(), SelectionState::default());
}

#[test]
fn geolocation_recentres_once_and_failures_are_ignored() {
    let here = point(-1.29, 36.82);
    let located = mounted(Some(&FixedPosition(here)));
    assert_eq!(located.map().view(), Some((here, 13)));

    let denied = mounted(Some(&DeniedPosition));
    assert_eq!(denied.map().view(), Some((Coordinate::LAGOS, 11)));
}

#[test]
fn alternating_clicks_fill_pickup_then_dropoff() {
    let mut map = mounted(None);

    assert_eq!(
        map.handle_event(MapEvent::Click(point(6.45, 3.39))),
        Some((Slot::Pickup, point(6.45, 3.39)))
    );
    assert_eq!(map.selection().next_slot, Slot::Dropoff);
    assert!(!map.selection().is_complete());

    map.handle_event(MapEvent::Click(point(6.60, 3.35)));
    let selection = map.selection();
    assert_eq!(selection.pickup, Some(point(6.45, 3.39)));
    assert_eq!(selection.dropoff, Some(point(6.60, 3.35)));
    assert_eq!(selection.next_slot, Slot::Pickup);

    // third click moves the pickup again
    map.handle_event(MapEvent::Click(point(6.47, 3.40)));
    assert_eq!(map.selection().pickup, Some(point(6.47, 3.40)));
    assert_eq!(map.selection().dropoff, Some(point(6.60, 3.35)));
    assert_eq!(map.map().markers().count(), 2);
}

#[test]
fn drag_event_is_routed_to_the_marker_owner() {
    let mut map = mounted(None);
    map.on_click(point(6.45, 3.39));
    map.on_click(point(6.60, 3.35));
    let dropoff = map.markers().live_marker(Slot::Dropoff).expect("dropoff");

    let event = map
        .map_mut()
        .drag_marker(dropoff, point(6.61, 3.36))
        .expect("drag");
    assert_eq!(
        map.handle_event(event),
        Some((Slot::Dropoff, point(6.61, 3.36)))
    );
    assert_eq!(map.store().get(Slot::Dropoff), Some(point(6.61, 3.36)));
    assert_eq!(
        map.markers().fields().value(CoordinateField::DropoffLat),
        Some(6.61)
    );
    // dragging does not count as a click
    assert_eq!(map.selection().next_slot, Slot::Pickup);
}
