//! Rendering of poll results into a status view.

use std::fmt;

use shared::{
    domain::{is_terminal_ride_status, RideId},
    protocol::{MatchRecord, PollResult, RideRecord},
};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchRow {
    pub driver_name: String,
    pub status: String,
    pub distance_km: String,
    pub eta_min: String,
}

impl From<&MatchRecord> for MatchRow {
    fn from(record: &MatchRecord) -> Self {
        Self {
            driver_name: record.driver_name.clone(),
            status: record.status.clone(),
            distance_km: record.distance_to_pickup_km.to_string(),
            eta_min: record.eta_to_pickup_min.to_string(),
        }
    }
}

impl fmt::Display for MatchRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - {} (Dist: {}km, ETA {}min)",
            self.driver_name, self.status, self.distance_km, self.eta_min
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignmentBanner {
    pub driver_name: String,
    pub ride_id: RideId,
    pub status: String,
    pub concluded: bool,
}

impl From<&RideRecord> for AssignmentBanner {
    fn from(ride: &RideRecord) -> Self {
        Self {
            driver_name: ride
                .driver_name
                .clone()
                .unwrap_or_else(|| "unassigned".to_string()),
            ride_id: ride.id,
            status: ride.status.clone(),
            concluded: is_terminal_ride_status(&ride.status),
        }
    }
}

impl fmt::Display for AssignmentBanner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Matched to {} - Ride #{} - Status: {}",
            self.driver_name, self.ride_id, self.status
        )
    }
}

/// The status page: a status line, a match list and an assignment banner.
pub trait StatusView: Send {
    /// False once the view has been torn down; nothing is written after that.
    fn is_attached(&self) -> bool {
        true
    }
    fn set_status_text(&mut self, text: &str);
    fn clear_matches(&mut self);
    fn append_match_row(&mut self, row: MatchRow);
    fn show_assignment(&mut self, banner: AssignmentBanner);
}

pub struct StatusRenderer<V> {
    view: V,
}

impl<V: StatusView> StatusRenderer<V> {
    pub fn new(view: V) -> Self {
        Self { view }
    }

    /// Replaces the rendered state with `result`. A result without a ride
    /// leaves any earlier assignment banner in place.
    pub fn render(&mut self, result: &PollResult) {
        if !self.view.is_attached() {
            debug!("render: view detached, skipping");
            return;
        }

        self.view.set_status_text(&result.status);
        self.view.clear_matches();
        for record in &result.matches {
            self.view.append_match_row(MatchRow::from(record));
        }
        if let Some(ride) = &result.ride {
            self.view.show_assignment(AssignmentBanner::from(ride));
        }
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }
}

/// View that keeps the rendered state in memory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryStatusView {
    pub status_text: String,
    pub match_rows: Vec<MatchRow>,
    pub assignment: Option<AssignmentBanner>,
    pub detached: bool,
}

impl StatusView for MemoryStatusView {
    fn is_attached(&self) -> bool {
        !self.detached
    }

    fn set_status_text(&mut self, text: &str) {
        self.status_text = text.to_string();
    }

    fn clear_matches(&mut self) {
        self.match_rows.clear();
    }

    fn append_match_row(&mut self, row: MatchRow) {
        self.match_rows.push(row);
    }

    fn show_assignment(&mut self, banner: AssignmentBanner) {
        self.assignment = Some(banner);
    }
}

#[cfg(test)]
#[path = "tests/renderer_tests.rs"]
mod tests;
