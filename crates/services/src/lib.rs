#![forbid(unsafe_code)]

pub mod app_services;
pub mod error;
pub mod panel_state_service;
pub mod walkthrough;

pub use app_services::AppServices;
pub use error::AppServicesError;
pub use panel_state_service::{DEFAULT_PANEL_PREFIX, PanelStateService};
pub use walkthrough::{
    DEFAULT_SETTLE_DELAY, FinishCallback, ListenerId, SEEN_MARKER, StaticViewport, Viewport,
    ViewportEvent, WalkthroughController, reset_walkthrough,
};
