pub mod app;
pub mod context;
pub mod routes;
pub mod tours;
pub mod views;
pub mod vm;
pub mod walkthrough;

pub use app::App;
pub use context::{AppContext, UiApp, build_app_context};
pub use walkthrough::{OverlayCard, WalkthroughOverlay};
