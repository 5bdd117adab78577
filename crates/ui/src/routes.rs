use dioxus::prelude::*;
use dioxus_router::{Link, Outlet, Routable};

use crate::views::{DashboardView, SettingsView};

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
pub enum Route {
    #[layout(Layout)]
        #[route("/", DashboardView)] Dashboard {},
        #[route("/settings", SettingsView)] Settings {},
}

#[component]
fn Layout() -> Element {
    rsx! {
        div { class: "app",
            Sidebar {}
            main { class: "content",
                Outlet::<Route> {}
            }
        }
    }
}

#[component]
fn Sidebar() -> Element {
    rsx! {
        nav { class: "sidebar",
            h1 { "GymDesk" }
            ul {
                li { Link { to: Route::Dashboard {}, "Dashboard" } }
                li { id: "nav-clients", span { class: "sidebar-muted", "Clients" } }
                li { id: "nav-campaigns", span { class: "sidebar-muted", "Campaigns" } }
                li { Link { to: Route::Settings {}, "Settings" } }
            }
        }
    }
}
