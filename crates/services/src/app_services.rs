use std::sync::Arc;

use storage::repository::{PreferenceRepository, Storage};
use tour_core::model::Tour;

use crate::error::AppServicesError;
use crate::panel_state_service::PanelStateService;
use crate::walkthrough::{Viewport, WalkthroughController};

/// Assembles app-facing services over one storage backend.
#[derive(Clone)]
pub struct AppServices {
    preferences: Arc<dyn PreferenceRepository>,
    panel_state: Arc<PanelStateService>,
}

impl AppServices {
    /// Build services backed by `SQLite` storage.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization fails.
    pub async fn new_sqlite(db_url: &str) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        Ok(Self::from_storage(&storage))
    }

    #[must_use]
    pub fn in_memory() -> Self {
        Self::from_storage(&Storage::in_memory())
    }

    #[must_use]
    pub fn from_storage(storage: &Storage) -> Self {
        let preferences = Arc::clone(&storage.preferences);
        let panel_state = Arc::new(PanelStateService::new(Arc::clone(&preferences)));
        Self {
            preferences,
            panel_state,
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

    /// Build a controller for `tour` whose flag lives in this app's preferences.
    #[must_use]
    pub fn walkthrough(&self, tour: Tour, viewport: Arc<dyn Viewport>) -> WalkthroughController {
        WalkthroughController::new(tour, self.preferences(), viewport)
    }
}
