use super::*;
use crate::form::{CoordinateField, InMemoryFormFields};

fn point(lat: f64, lng: f64) -> Coordinate {
    Coordinate::new(lat, lng).expect("coordinate")
}

fn controller() -> MarkerController {
    MarkerController::new(
        CoordinateStore::new(),
        Box::new(InMemoryFormFields::default()),
    )
}

#[test]
fn replacing_a_marker_leaves_exactly_one_per_slot() {
    let mut map = HeadlessMap::new();
    let mut markers = controller();

    markers.place_marker(&mut map, Slot::Pickup, point(6.50, 3.30));
    let first = markers.live_marker(Slot::Pickup).expect("first pickup");
    markers.place_marker(&mut map, Slot::Pickup, point(6.52, 3.31));
    let second = markers.live_marker(Slot::Pickup).expect("second pickup");

    assert_ne!(first, second);
    assert!(map.marker(first).is_none());
    assert_eq!(map.markers().count(), 1);
    assert_eq!(map.marker_position(second), Some(point(6.52, 3.31)));
    assert_eq!(markers.store().get(Slot::Pickup), Some(point(6.52, 3.31)));
}

#[test]
fn placing_writes_store_and_form_fields() {
    let mut map = HeadlessMap::new();
    let mut markers = controller();

    markers.place_marker(&mut map, Slot::Dropoff, point(6.60, 3.35));

    assert_eq!(markers.store().get(Slot::Dropoff), Some(point(6.60, 3.35)));
    assert_eq!(markers.store().get(Slot::Pickup), None);
    assert_eq!(
        markers.fields().value(CoordinateField::DropoffLat),
        Some(6.60)
    );
    assert_eq!(
        markers.fields().value(CoordinateField::DropoffLng),
        Some(3.35)
    );
}

#[test]
fn pickup_and_dropoff_markers_look_different() {
    let mut map = HeadlessMap::new();
    let mut markers = controller();

    markers.place_marker(&mut map, Slot::Pickup, point(1.0, 1.0));
    markers.place_marker(&mut map, Slot::Dropoff, point(2.0, 2.0));

    let pickup = map
        .marker(markers.live_marker(Slot::Pickup).expect("pickup"))
        .expect("pickup spec");
    let dropoff = map
        .marker(markers.live_marker(Slot::Dropoff).expect("dropoff"))
        .expect("dropoff spec");
    assert_ne!(pickup.style, dropoff.style);
    assert_eq!(pickup.popup, "Pickup");
    assert_eq!(dropoff.popup, "Dropoff");
    assert!(pickup.draggable && dropoff.draggable);
}

#[test]
fn dragging_a_marker_syncs_the_store_without_a_click() {
    let mut map = HeadlessMap::new();
    let mut markers = controller();
    markers.place_marker(&mut map, Slot::Pickup, point(6.50, 3.30));
    let id = markers.live_marker(Slot::Pickup).expect("pickup");

    let event = map.drag_marker(id, point(6.55, 3.36)).expect("drag event");
    let MapEvent::MarkerDragEnd(dragged) = event else {
        panic!("unexpected event: {event:?}");
    };

    assert_eq!(
        markers.on_drag_end(&map, dragged),
        Some((Slot::Pickup, point(6.55, 3.36)))
    );
    assert_eq!(markers.store().get(Slot::Pickup), Some(point(6.55, 3.36)));
    assert_eq!(markers.fields().value(CoordinateField::PickupLng), Some(3.36));
}

#[test]
fn drag_events_from_replaced_markers_are_ignored() {
    let mut map = HeadlessMap::new();
    let mut markers = controller();
    markers.place_marker(&mut map, Slot::Pickup, point(6.50, 3.30));
    let stale = markers.live_marker(Slot::Pickup).expect("pickup");
    markers.place_marker(&mut map, Slot::Pickup, point(6.70, 3.20));

    assert_eq!(markers.on_drag_end(&map, stale), None);
    assert_eq!(markers.store().get(Slot::Pickup), Some(point(6.70, 3.20)));
}
