//! Terminal implementations of the view seams.

use client_core::{
    AssignmentBanner, GeolocationError, GeolocationProvider, MatchRow, StatusView, UserNotifier,
};
use shared::domain::Coordinate;

/// Prints each render as a block on stdout.
#[derive(Default)]
pub struct TerminalStatusView {
    rows: usize,
}

impl StatusView for TerminalStatusView {
    fn set_status_text(&mut self, text: &str) {
        println!("status: {text}");
    }

    fn clear_matches(&mut self) {
        self.rows = 0;
    }

    fn append_match_row(&mut self, row: MatchRow) {
        self.rows += 1;
        println!("  {}. {row}", self.rows);
    }

    fn show_assignment(&mut self, banner: AssignmentBanner) {
        println!("  >> {banner}");
    }
}

pub struct StderrNotifier;

impl UserNotifier for StderrNotifier {
    fn alert(&mut self, message: &str) {
        eprintln!("{message}");
    }
}

/// Position given on the command line, if any.
pub struct FlagGeolocation(pub Option<Coordinate>);

impl GeolocationProvider for FlagGeolocation {
    fn current_position(&self) -> Result<Coordinate, GeolocationError> {
        self.0.ok_or(GeolocationError::Unsupported)
    }
}
