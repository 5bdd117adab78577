use std::sync::Arc;

use services::PanelStateService;
use storage::repository::PreferenceRepository;

pub trait UiApp: Send + Sync {
    fn preferences(&self) -> Arc<dyn PreferenceRepository>;
    fn panel_state(&self) -> Arc<PanelStateService>;
}

#[derive(Clone)]
pub struct AppContext {
    preferences: Arc<dyn PreferenceRepository>,
    panel_state: Arc<PanelStateService>,
}

impl AppContext {
    #[must_use]
    pub fn new(app: &Arc<dyn UiApp>) -> Self {
        Self {
            preferences: app.preferences(),
            panel_state: app.panel_state(),
        }
    }

    #[must_use]
    pub fn preferences(&self) -> Arc<dyn PreferenceRepository> {
        Arc::clone(&self.preferences)
    }

    #[must_use]
    pub fn panel_state(&self) -> Arc<PanelStateService> {
        Arc::clone(&self.panel_state)
    }
}

// This context is provided by the application composition root (e.g. `crates/app`).

/// Build an `AppContext` from a UI-facing app implementation.
#[must_use]
pub fn build_app_context(app: &Arc<dyn UiApp>) -> AppContext {
    AppContext::new(app)
}
