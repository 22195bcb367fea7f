//! Client side of the ride request flow: picking pickup and drop-off points on
//! a map, gating the request form, submitting it and polling the matching
//! status until the session is torn down.

pub mod click_router;
pub mod form;
pub mod map;
pub mod markers;
pub mod poller;
pub mod renderer;
pub mod selection;
pub mod submit;

pub use click_router::ClickRouter;
pub use form::{
    CoordinateField, FormFields, FormGate, FormGateError, InMemoryFormFields, RideRequestForm,
    SubmitEvent, UserNotifier, INCOMPLETE_SELECTION_MESSAGE,
};
pub use map::{GeolocationError, GeolocationProvider, MapConfig, RequestMap};
pub use markers::{
    HeadlessMap, MapEvent, MapWidget, MarkerController, MarkerHandle, MarkerId, MarkerSpec,
    MarkerStyle,
};
pub use poller::{
    HttpStatusSource, PollError, PollEvent, PollerConfig, PollerState, StatusPoller,
    StatusSource, DEFAULT_POLL_INTERVAL, MIN_POLL_INTERVAL,
};
pub use renderer::{AssignmentBanner, MatchRow, MemoryStatusView, StatusRenderer, StatusView};
pub use selection::{CoordinateStore, SelectionState};
pub use submit::{
    CookieTokenProvider, RideRequestClient, StaticTokenProvider, SubmitError, TokenProvider,
    CSRF_COOKIE_NAME,
};
