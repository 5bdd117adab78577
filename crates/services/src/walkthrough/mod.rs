mod controller;
mod viewport;

pub use controller::{
    DEFAULT_SETTLE_DELAY, FinishCallback, SEEN_MARKER, WalkthroughController, reset_walkthrough,
};
pub use viewport::{ListenerId, StaticViewport, Viewport, ViewportEvent};
