use std::collections::BTreeSet;
use std::sync::Arc;

use dioxus::prelude::*;
use services::PanelStateService;
use tour_core::model::PanelId;
use tracing::warn;

use crate::context::AppContext;
use crate::tours::dashboard_tour;
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::{CampaignRowVm, KpiVm, RetentionAlertVm, load_dashboard};
use crate::walkthrough::WalkthroughOverlay;

pub(super) const RETENTION_PANEL: &str = "dashboard_retention";

#[derive(Clone, Debug, PartialEq)]
struct RetentionPanelState {
    panel: PanelId,
    collapsed: bool,
    expanded: BTreeSet<String>,
}

#[component]
pub fn DashboardView() -> Element {
    let ctx = use_context::<AppContext>();
    let panel_state = ctx.panel_state();
    let dashboard = use_hook(load_dashboard);
    let tour = use_hook(|| match dashboard_tour() {
        Ok(tour) => Some(tour),
        Err(err) => {
            warn!(error = %err, "dashboard tour is invalid; skipping it");
            None
        }
    });

    let service = panel_state.clone();
    let resource = use_resource(move || {
        let service = service.clone();
        async move {
            let panel = PanelId::new(RETENTION_PANEL).map_err(|_| ViewError::Unknown)?;
            let collapsed = service.is_collapsed(&panel, false).await;
            let expanded = service.expanded_ids(&panel).await;
            Ok::<_, ViewError>(RetentionPanelState {
                panel,
                collapsed,
                expanded,
            })
        }
    });
    let state = view_state_from_resource(&resource);
    let is_ready = matches!(state, ViewState::Ready(_));

    rsx! {
        div { class: "page dashboard",
            header { class: "page-header",
                h2 { "Dashboard" }
                p { class: "page-subtitle", "How the gym is doing this month." }
            }

            section { class: "kpi-grid",
                KpiCard { kpi: dashboard.revenue.clone() }
                for kpi in dashboard.kpis.clone() {
                    KpiCard { key: "{kpi.id}", kpi }
                }
            }

            CampaignList { campaigns: dashboard.campaigns.clone() }

            match state {
                ViewState::Idle | ViewState::Loading => rsx! {
                    section { id: "retention-panel", class: "panel",
                        p { "Loading..." }
                    }
                },
                ViewState::Ready(initial) => rsx! {
                    RetentionPanel {
                        alerts: dashboard.retention.clone(),
                        initial,
                        service: panel_state.clone(),
                    }
                },
                ViewState::Error(err) => {
                    let message = err.message();
                    rsx! {
                        section { id: "retention-panel", class: "panel",
                            p { "{message}" }
                        }
                    }
                }
            }

            if let Some(tour) = tour {
                WalkthroughOverlay { tour, is_active: is_ready }
            }
        }
    }
}

#[component]
fn KpiCard(kpi: KpiVm) -> Element {
    let trend_class = kpi.trend.class();
    rsx! {
        article { id: "{kpi.id}", class: "kpi-card",
            span { class: "kpi-label", "{kpi.label}" }
            strong { class: "kpi-value", "{kpi.value_str}" }
            span { class: "kpi-delta {trend_class}", "{kpi.delta_str}" }
        }
    }
}

#[component]
fn CampaignList(campaigns: Vec<CampaignRowVm>) -> Element {
    rsx! {
        section { id: "campaign-list", class: "panel",
            h3 { class: "panel-title", "Campaigns" }
            table { class: "campaign-table",
                thead {
                    tr {
                        th { "Name" }
                        th { "Channel" }
                        th { "Status" }
                        th { "Leads" }
                        th { "Conversion" }
                    }
                }
                tbody {
                    for row in campaigns {
                        tr { key: "{row.name}",
                            td { "{row.name}" }
                            td { "{row.channel}" }
                            td { span { class: "status-pill", "{row.status}" } }
                            td { "{row.leads}" }
                            td { "{row.conversion_str}" }
                        }
                    }
                }
            }
        }
    }
}

#[derive(Props, Clone)]
struct RetentionPanelProps {
    alerts: Vec<RetentionAlertVm>,
    initial: RetentionPanelState,
    service: Arc<PanelStateService>,
}

impl PartialEq for RetentionPanelProps {
    fn eq(&self, other: &Self) -> bool {
        self.alerts == other.alerts
            && self.initial == other.initial
            && Arc::ptr_eq(&self.service, &other.service)
    }
}

/// Members at risk of churning. Collapsed state and expanded rows survive restarts.
#[component]
fn RetentionPanel(props: RetentionPanelProps) -> Element {
    let RetentionPanelProps {
        alerts,
        initial,
        service,
    } = props;
    let panel = initial.panel.clone();
    let mut collapsed = use_signal(|| initial.collapsed);
    let mut expanded = use_signal(|| initial.expanded.clone());

    let on_toggle_panel = {
        let service = Arc::clone(&service);
        let panel = panel.clone();
        move |_: MouseEvent| {
            let next = !collapsed();
            collapsed.set(next);
            let service = service.clone();
            let panel = panel.clone();
            spawn(async move {
                service.set_collapsed(&panel, next).await;
            });
        }
    };

    let on_toggle_row = use_callback(move |id: &'static str| {
        let mut next = expanded();
        if !next.remove(id) {
            next.insert(id.to_owned());
        }
        expanded.set(next.clone());
        let service = service.clone();
        let panel = panel.clone();
        spawn(async move {
            service.set_expanded_ids(&panel, &next).await;
        });
    });

    let is_collapsed = collapsed();
    let expanded_ids = expanded();
    let count = alerts.len();
    let aria_expanded = (!is_collapsed).to_string();

    rsx! {
        section {
            id: "retention-panel",
            class: if is_collapsed { "panel panel--collapsed" } else { "panel" },
            header { class: "panel-header",
                h3 { class: "panel-title", "Members at risk ({count})" }
                button {
                    class: "btn btn-ghost panel-toggle",
                    r#type: "button",
                    "aria-expanded": "{aria_expanded}",
                    onclick: on_toggle_panel,
                    if is_collapsed { "Show" } else { "Hide" }
                }
            }
            if !is_collapsed {
                ul { class: "retention-list",
                    for alert in alerts {
                        li { key: "{alert.id}", class: "retention-row",
                            button {
                                class: "retention-summary",
                                r#type: "button",
                                onclick: move |_| on_toggle_row.call(alert.id),
                                span { class: "retention-member", "{alert.member}" }
                                span { class: "retention-plan", "{alert.plan}" }
                                span { class: "retention-last-visit", "{alert.last_visit_str}" }
                                span { class: "risk risk-{alert.risk}", "{alert.risk}" }
                            }
                            if expanded_ids.contains(alert.id) {
                                p { class: "retention-suggestion", "{alert.suggestion}" }
                            }
                        }
                    }
                }
            }
        }
    }
}
