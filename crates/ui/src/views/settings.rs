use std::collections::BTreeSet;

use dioxus::prelude::*;
use services::reset_walkthrough;
use tour_core::model::PanelId;

use crate::context::AppContext;
use crate::tours::dashboard_tour_key;
use crate::views::ViewError;

use super::dashboard::RETENTION_PANEL;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ActionState {
    Idle,
    Working,
    Done,
    Error(ViewError),
}

impl ActionState {
    fn label(self, done: &'static str) -> Option<&'static str> {
        match self {
            Self::Idle => None,
            Self::Working => Some("Working..."),
            Self::Done => Some(done),
            Self::Error(err) => Some(err.message()),
        }
    }
}

#[component]
pub fn SettingsView() -> Element {
    let ctx = use_context::<AppContext>();
    let mut tour_state = use_signal(|| ActionState::Idle);
    let mut layout_state = use_signal(|| ActionState::Idle);

    let on_replay_tour = {
        let preferences = ctx.preferences();
        use_callback(move |()| {
            let preferences = preferences.clone();
            spawn(async move {
                tour_state.set(ActionState::Working);
                match dashboard_tour_key() {
                    Ok(key) => {
                        reset_walkthrough(preferences.as_ref(), &key).await;
                        tour_state.set(ActionState::Done);
                    }
                    Err(_) => tour_state.set(ActionState::Error(ViewError::Unknown)),
                }
            });
        })
    };

    let on_reset_layout = {
        let panel_state = ctx.panel_state();
        use_callback(move |()| {
            let panel_state = panel_state.clone();
            spawn(async move {
                layout_state.set(ActionState::Working);
                match PanelId::new(RETENTION_PANEL) {
                    Ok(panel) => {
                        panel_state.set_collapsed(&panel, false).await;
                        panel_state.set_expanded_ids(&panel, &BTreeSet::new()).await;
                        layout_state.set(ActionState::Done);
                    }
                    Err(_) => layout_state.set(ActionState::Error(ViewError::Unknown)),
                }
            });
        })
    };

    let tour_status = tour_state().label("The tour will start next time you open the dashboard.");
    let layout_status = layout_state().label("Dashboard panels restored.");
    let tour_busy = tour_state() == ActionState::Working;
    let layout_busy = layout_state() == ActionState::Working;

    rsx! {
        div { class: "page settings",
            header { class: "page-header",
                h2 { "Settings" }
            }

            section { class: "panel settings-section",
                h3 { class: "panel-title", "Onboarding" }
                p { "Show the dashboard walkthrough again, as on the first visit." }
                button {
                    id: "replay-dashboard-tour",
                    class: "btn btn-primary",
                    r#type: "button",
                    disabled: tour_busy,
                    onclick: move |_| on_replay_tour.call(()),
                    "Replay dashboard tour"
                }
                if let Some(status) = tour_status {
                    p { class: "settings-status", "{status}" }
                }
            }

            section { class: "panel settings-section",
                h3 { class: "panel-title", "Layout" }
                p { "Expand every dashboard panel and collapse every row." }
                button {
                    id: "reset-dashboard-layout",
                    class: "btn btn-secondary",
                    r#type: "button",
                    disabled: layout_busy,
                    onclick: move |_| on_reset_layout.call(()),
                    "Reset dashboard layout"
                }
                if let Some(status) = layout_status {
                    p { class: "settings-status", "{status}" }
                }
            }
        }
    }
}
