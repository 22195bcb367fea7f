//! Request map bootstrap: mounts the widget, recentres on the user and routes
//! clicks and drags into the marker controller.

use shared::domain::{Coordinate, Slot};
use thiserror::Error;
use tracing::{debug, info};

use crate::{
    click_router::ClickRouter,
    form::FormFields,
    markers::{MapEvent, MapWidget, MarkerController},
    selection::{CoordinateStore, SelectionState},
};

pub const OSM_TILE_URL: &str = "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png";
pub const OSM_ATTRIBUTION: &str = "&copy; OpenStreetMap contributors";

#[derive(Debug, Clone)]
pub struct MapConfig {
    pub default_center: Coordinate,
    pub default_zoom: u8,
    pub located_zoom: u8,
    pub tile_url: String,
    pub attribution: String,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            default_center: Coordinate::LAGOS,
            default_zoom: 11,
            located_zoom: 13,
            tile_url: OSM_TILE_URL.into(),
            attribution: OSM_ATTRIBUTION.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum GeolocationError {
    #[error("geolocation is not supported")]
    Unsupported,
    #[error("geolocation permission denied")]
    PermissionDenied,
    #[error("position unavailable: {0}")]
    Unavailable(String),
}

pub trait GeolocationProvider {
    fn current_position(&self) -> Result<Coordinate, GeolocationError>;
}

pub struct RequestMap<M> {
    map: M,
    router: ClickRouter,
    markers: MarkerController,
}

impl<M: MapWidget> RequestMap<M> {
    /// Returns `None` when there is no widget to mount on; the map feature is
    /// then simply inert.
    pub fn mount(
        anchor: Option<M>,
        config: &MapConfig,
        fields: Box<dyn FormFields>,
        geolocation: Option<&dyn GeolocationProvider>,
    ) -> Option<Self> {
        let Some(mut map) = anchor else {
            debug!("map: no anchor, request map disabled");
            return None;
        };

        map.set_view(config.default_center, config.default_zoom);
        map.add_tile_layer(&config.tile_url, &config.attribution);

        if let Some(provider) = geolocation {
            match provider.current_position() {
                Ok(position) => {
                    info!(%position, "map: recentred on current position");
                    map.set_view(position, config.located_zoom);
                }
                Err(err) => debug!(error = %err, "map: geolocation unavailable"),
            }
        }

        Some(Self {
            map,
            router: ClickRouter::new(),
            markers: MarkerController::new(CoordinateStore::new(), fields),
        })
    }

    pub fn handle_event(&mut self, event: MapEvent) -> Option<(Slot, Coordinate)> {
        match event {
            MapEvent::Click(point) => Some(self.on_click(point)),
            MapEvent::MarkerDragEnd(marker) => self.markers.on_drag_end(&self.map, marker),
        }
    }

    pub fn on_click(&mut self, point: Coordinate) -> (Slot, Coordinate) {
        let slot = self.router.on_map_click(point);
        self.markers.place_marker(&mut self.map, slot, point);
        self.markers.store().set_next_slot(self.router.next_slot());
        (slot, point)
    }

    pub fn selection(&self) -> SelectionState {
        self.markers.store().selection()
    }

    pub fn store(&self) -> &CoordinateStore {
        self.markers.store()
    }

    pub fn markers(&self) -> &MarkerController {
        &self.markers
    }

    pub fn map(&self) -> &M {
        &self.map
    }

    pub fn map_mut(&mut self) -> &mut M {
        &mut self.map
    }
}

#[cfg(test)]
#[path = "tests/map_tests.rs"]
mod tests;
