#![forbid(unsafe_code)]

pub mod error;
pub mod geometry;
pub mod model;
pub mod placement;
pub mod walkthrough;

pub use error::Error;
pub use geometry::{Rect, TooltipPlacement, ViewportSize};
pub use placement::{PlacementConfig, compute_tooltip_position, spotlight_rect};
pub use walkthrough::{
    BoundsUpdate, Navigation, OverlayFrame, SettleTicket, WalkthroughSession, WalkthroughState,
};
