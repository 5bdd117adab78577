use std::sync::Arc;

use dioxus::core::NoOpMutations;
use dioxus::prelude::*;
use dioxus_router::{Routable, Router};
use services::{AppServices, PanelStateService};
use storage::repository::{PreferenceRepository, Storage};

use crate::context::{UiApp, build_app_context};
use crate::views::{DashboardView, SettingsView};

#[derive(Clone)]
struct TestApp {
    services: AppServices,
}

impl UiApp for TestApp {
    fn preferences(&self) -> Arc<dyn PreferenceRepository> {
        self.services.preferences()
    }

    fn panel_state(&self) -> Arc<PanelStateService> {
        self.services.panel_state()
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum ViewKind {
    Dashboard,
    Settings,
}

#[derive(Props, Clone)]
struct ViewHarnessProps {
    app: Arc<TestApp>,
    view: ViewKind,
}

impl PartialEq for ViewHarnessProps {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

#[component]
fn ViewRouterHarness(props: ViewHarnessProps) -> Element {
    let app: Arc<dyn UiApp> = props.app.clone();
    use_context_provider(|| build_app_context(&app));
    use_context_provider(|| props.view);
    rsx! { Router::<TestRoute> {} }
}

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum TestRoute {
    #[route("/")]
    Root {},
}

#[component]
fn Root() -> Element {
    match use_context::<ViewKind>() {
        ViewKind::Dashboard => rsx! { DashboardView {} },
        ViewKind::Settings => rsx! { SettingsView {} },
    }
}

pub struct ViewHarness {
    pub dom: VirtualDom,
    pub storage: Storage,
}

impl ViewHarness {
    pub fn rebuild(&mut self) {
        self.dom.rebuild_in_place();
        drive_dom(&mut self.dom);
    }

    pub async fn drive_async(&mut self) {
        let _ = tokio::time::timeout(
            std::time::Duration::from_millis(50),
            self.dom.wait_for_work(),
        )
        .await;
        self.dom.render_immediate(&mut NoOpMutations);
        self.dom.process_events();
    }

    pub fn render(&self) -> String {
        dioxus_ssr::render(&self.dom)
    }
}

pub fn drive_dom(dom: &mut VirtualDom) {
    dom.process_events();
    dom.render_immediate(&mut NoOpMutations);
    dom.process_events();
}

pub fn setup_view_harness(view: ViewKind) -> ViewHarness {
    setup_view_harness_with_storage(view, Storage::in_memory())
}

/// Mount `view` over `storage`. Seed preferences before calling this so the first
/// render sees them.
pub fn setup_view_harness_with_storage(view: ViewKind, storage: Storage) -> ViewHarness {
    let app = Arc::new(TestApp {
        services: AppServices::from_storage(&storage),
    });
    let dom = VirtualDom::new_with_props(ViewRouterHarness, ViewHarnessProps { app, view });
    ViewHarness { dom, storage }
}
