use tour_core::model::{IdError, StepDraft, StorageKey, TooltipPosition, Tour};
use tour_core::Error;

/// Bump the suffix when the dashboard tour changes enough to show it again.
pub const DASHBOARD_TOUR_KEY: &str = "tour_dashboard_v1";

/// # Errors
///
/// Returns `IdError` if the key constant is not a valid storage key.
pub fn dashboard_tour_key() -> Result<StorageKey, IdError> {
    StorageKey::new(DASHBOARD_TOUR_KEY)
}

/// First-run tour of the dashboard. Targets are element ids rendered by the layout and
/// `DashboardView`.
///
/// # Errors
///
/// Returns an error if any step fails validation.
pub fn dashboard_tour() -> Result<Tour, Error> {
    let drafts = vec![
        StepDraft::new(
            "nav-clients",
            "Your clients",
            "Every member, lead and trial lives here. Start here when someone walks in.",
            TooltipPosition::Right,
        ),
        StepDraft::new(
            "kpi-revenue",
            "Revenue at a glance",
            "Month-to-date billing compared with the same days last month.",
            TooltipPosition::Bottom,
        ),
        StepDraft::new(
            "campaign-list",
            "Campaigns",
            "Outreach that is running or scheduled, with the leads each one brought in.",
            TooltipPosition::Top,
        ),
        StepDraft::new(
            "retention-panel",
            "Members at risk",
            "People who stopped coming. Expand a row for a suggested next step.",
            TooltipPosition::Left,
        ),
    ];
    Ok(Tour::from_drafts(dashboard_tour_key()?, drafts)?)
}
