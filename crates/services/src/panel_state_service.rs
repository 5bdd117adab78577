use std::collections::BTreeSet;
use std::sync::Arc;

use storage::repository::PreferenceRepository;
use tour_core::model::PanelId;
use tracing::warn;

/// Prefix shared by every panel-state key.
pub const DEFAULT_PANEL_PREFIX: &str = "panel_state_";

const EXPANDED_SUFFIX: &str = "_expanded";

/// Remembers collapsed panels and expanded rows across sessions.
///
/// Reads fall back to the caller's default when nothing is stored, the store fails, or
/// the stored JSON does not parse. Write failures are logged and swallowed.
#[derive(Clone)]
pub struct PanelStateService {
    repo: Arc<dyn PreferenceRepository>,
    prefix: String,
}

impl PanelStateService {
    #[must_use]
    pub fn new(repo: Arc<dyn PreferenceRepository>) -> Self {
        Self::with_prefix(repo, DEFAULT_PANEL_PREFIX)
    }

    #[must_use]
    pub fn with_prefix(repo: Arc<dyn PreferenceRepository>, prefix: impl Into<String>) -> Self {
        Self {
            repo,
            prefix: prefix.into(),
        }
    }

    #[must_use]
    pub fn collapsed_key(&self, panel: &PanelId) -> String {
        format!("{}{}", self.prefix, panel.as_str())
    }

    #[must_use]
    pub fn expanded_key(&self, panel: &PanelId) -> String {
        format!("{}{}{EXPANDED_SUFFIX}", self.prefix, panel.as_str())
    }

    pub async fn is_collapsed(&self, panel: &PanelId, default: bool) -> bool {
        self.read_json(&self.collapsed_key(panel))
            .await
            .unwrap_or(default)
    }

    pub async fn set_collapsed(&self, panel: &PanelId, collapsed: bool) {
        self.write_json(&self.collapsed_key(panel), &collapsed).await;
    }

    /// Flip the collapsed flag and return the new value.
    pub async fn toggle_collapsed(&self, panel: &PanelId, default: bool) -> bool {
        let collapsed = !self.is_collapsed(panel, default).await;
        self.set_collapsed(panel, collapsed).await;
        collapsed
    }

    pub async fn expanded_ids(&self, panel: &PanelId) -> BTreeSet<String> {
        self.read_json::<Vec<String>>(&self.expanded_key(panel))
            .await
            .map(|ids| ids.into_iter().collect())
            .unwrap_or_default()
    }

    pub async fn set_expanded_ids(&self, panel: &PanelId, ids: &BTreeSet<String>) {
        let ids: Vec<&String> = ids.iter().collect();
        self.write_json(&self.expanded_key(panel), &ids).await;
    }

    /// Add or remove `id` from the panel's expanded set and return the new set.
    pub async fn toggle_expanded(&self, panel: &PanelId, id: &str) -> BTreeSet<String> {
        let mut ids = self.expanded_ids(panel).await;
        if !ids.remove(id) {
            ids.insert(id.to_owned());
        }
        self.set_expanded_ids(panel, &ids).await;
        ids
    }

    async fn read_json<T: serde::de::DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = match self.repo.get_preference(key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(err) => {
                warn!(key, error = %err, "failed to read panel state");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(err) => {
                warn!(key, error = %err, "ignoring unparsable panel state");
                None
            }
        }
    }

    async fn write_json<T: serde::Serialize + ?Sized>(&self, key: &str, value: &T) {
        let raw = match serde_json::to_string(value) {
            Ok(raw) => raw,
            Err(err) => {
                warn!(key, error = %err, "failed to encode panel state");
                return;
            }
        };
        if let Err(err) = self.repo.set_preference(key, &raw).await {
            warn!(key, error = %err, "failed to save panel state");
        }
    }
}
