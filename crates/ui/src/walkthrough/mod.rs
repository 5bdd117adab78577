mod dom;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use dioxus::core::Task;
use dioxus::prelude::*;
use services::{ListenerId, StaticViewport, ViewportEvent, WalkthroughController};
use tokio::sync::Mutex;
use tour_core::model::{TargetId, Tour};
use tour_core::{SettleTicket, ViewportSize};

use crate::context::AppContext;
use crate::vm::OverlayVm;

/// Spotlight and tooltip overlay for a first-run tour.
///
/// The tour shows once `is_active` turns true and the tour has not been completed
/// before. Each step waits for layout to settle, measures its target and follows it
/// while the window resizes or anything scrolls.
#[component]
pub fn WalkthroughOverlay(
    tour: Tour,
    is_active: bool,
    on_finish: Option<EventHandler<()>>,
) -> Element {
    let ctx = use_context::<AppContext>();
    let frame = use_signal(|| None::<OverlayVm>);
    let settle_task = use_signal(|| None::<(SettleTicket, Task)>);
    let pump = use_signal(|| None::<(ListenerId, Task)>);

    let driver = use_hook(move || {
        let viewport = Arc::new(StaticViewport::new(ViewportSize::default()));
        let finished = Arc::new(AtomicBool::new(false));
        let finished_flag = Arc::clone(&finished);
        let targets: Arc<[TargetId]> = tour
            .steps()
            .iter()
            .map(|step| step.target_id().clone())
            .collect();
        let controller = WalkthroughController::new(tour, ctx.preferences(), viewport.clone())
            .with_on_finish(Arc::new(move || finished_flag.store(true, Ordering::SeqCst)));
        OverlayDriver {
            controller: Arc::new(Mutex::new(controller)),
            viewport,
            targets,
            finished,
            frame,
            settle_task,
            pump,
            on_finish,
        }
    });

    let activation = driver.clone();
    use_effect(use_reactive((&is_active,), move |(is_active,)| {
        spawn(activation.clone().run(Op::SetActive(is_active)));
    }));

    let teardown = driver.clone();
    use_drop(move || teardown.detach());

    let Some(vm) = frame() else {
        return rsx! {};
    };

    let previous = driver.clone();
    let next = driver.clone();
    let skip = driver;
    rsx! {
        OverlayCard {
            vm,
            on_previous: move |_| {
                spawn(previous.clone().run(Op::Previous));
            },
            on_next: move |_| {
                spawn(next.clone().run(Op::Next));
            },
            on_skip: move |_| {
                spawn(skip.clone().run(Op::Skip));
            },
        }
    }
}

/// Presentational half of the overlay: spotlight, dimmed backdrop and tooltip card.
#[component]
pub fn OverlayCard(
    vm: OverlayVm,
    on_previous: EventHandler<()>,
    on_next: EventHandler<()>,
    on_skip: EventHandler<()>,
) -> Element {
    rsx! {
        div { class: "tour-layer", role: "dialog", "aria-modal": "true",
            div { class: "tour-spotlight", style: "{vm.spotlight_style}" }
            div {
                class: "tour-tooltip tour-tooltip-{vm.position}",
                style: "{vm.tooltip_style}",
                header { class: "tour-tooltip-header",
                    h3 { class: "tour-title", "{vm.title}" }
                    button {
                        class: "tour-close",
                        r#type: "button",
                        "aria-label": "Close tour",
                        onclick: move |_| on_skip.call(()),
                        "×"
                    }
                }
                p { class: "tour-content", "{vm.content}" }
                footer { class: "tour-tooltip-footer",
                    span { class: "tour-progress", "{vm.step_label}" }
                    div { class: "tour-actions",
                        button {
                            class: "btn btn-ghost tour-skip",
                            r#type: "button",
                            onclick: move |_| on_skip.call(()),
                            "Skip"
                        }
                        if vm.has_previous {
                            button {
                                class: "btn btn-secondary tour-previous",
                                r#type: "button",
                                onclick: move |_| on_previous.call(()),
                                "Back"
                            }
                        }
                        button {
                            class: "btn btn-primary tour-next",
                            r#type: "button",
                            onclick: move |_| on_next.call(()),
                            "{vm.next_label}"
                        }
                    }
                }
            }
        }
    }
}

#[derive(Clone, Copy, Debug)]
enum Op {
    SetActive(bool),
    Next,
    Previous,
    Skip,
    Settle(SettleTicket),
    Viewport(ViewportEvent),
}

impl Op {
    fn measures(self) -> bool {
        matches!(self, Self::Settle(_) | Self::Viewport(_))
    }
}

/// Binds a controller to the document: one settle timer and one event pump at most,
/// always matching what the controller last asked for.
#[derive(Clone)]
struct OverlayDriver {
    controller: Arc<Mutex<WalkthroughController>>,
    viewport: Arc<StaticViewport>,
    targets: Arc<[TargetId]>,
    finished: Arc<AtomicBool>,
    frame: Signal<Option<OverlayVm>>,
    settle_task: Signal<Option<(SettleTicket, Task)>>,
    pump: Signal<Option<(ListenerId, Task)>>,
    on_finish: Option<EventHandler<()>>,
}

impl OverlayDriver {
    async fn run(self, op: Op) {
        if op.measures() {
            dom::measure_into(&self.viewport, &self.targets).await;
        }

        let (frame, pending, listener) = {
            let mut controller = self.controller.lock().await;
            match op {
                Op::SetActive(is_active) => controller.set_active(is_active).await,
                Op::Next => controller.next().await,
                Op::Previous => controller.previous(),
                Op::Skip => controller.skip().await,
                Op::Settle(ticket) => {
                    controller.settle(ticket);
                }
                Op::Viewport(event) => {
                    controller.handle_viewport_event(event);
                }
            }
            (
                controller.frame(),
                controller.pending_settle(),
                controller.listener(),
            )
        };

        let mut frame_signal = self.frame;
        frame_signal.set(frame.as_ref().map(OverlayVm::from_frame));
        self.sync_settle(pending);
        self.sync_listener(listener);

        if self.finished.swap(false, Ordering::SeqCst) {
            if let Some(on_finish) = self.on_finish {
                on_finish.call(());
            }
        }
    }

    fn sync_settle(&self, pending: Option<SettleTicket>) {
        let mut slot = self.settle_task;
        let current = slot.peek().as_ref().map(|(ticket, _)| *ticket);
        if current == pending {
            return;
        }
        if let Some((_, task)) = slot.take() {
            task.cancel();
        }
        if let Some(ticket) = pending {
            let driver = self.clone();
            let task = spawn(async move {
                tokio::time::sleep(ticket.delay()).await;
                let mut slot = driver.settle_task;
                slot.set(None);
                driver.run(Op::Settle(ticket)).await;
            });
            slot.set(Some((ticket, task)));
        }
    }

    fn sync_listener(&self, listener: Option<ListenerId>) {
        let mut slot = self.pump;
        let current = slot.peek().as_ref().map(|(id, _)| *id);
        if current == listener {
            return;
        }
        if let Some((id, task)) = slot.take() {
            task.cancel();
            dom::detach_listener(id);
        }
        if let Some(id) = listener {
            let driver = self.clone();
            let task = spawn(async move {
                let mut events = dom::attach_listener(id);
                while let Some(event) = events.next_event().await {
                    driver.clone().run(Op::Viewport(event)).await;
                }
            });
            slot.set(Some((id, task)));
        }
    }

    /// Release document listeners when the overlay unmounts.
    fn detach(&self) {
        let mut pump = self.pump;
        let Ok(mut slot) = pump.try_write() else {
            return;
        };
        if let Some((id, task)) = slot.take() {
            task.cancel();
            dom::detach_listener(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use dioxus::core::NoOpMutations;
    use tour_core::model::{StepDraft, StorageKey, TooltipPosition};
    use tour_core::{PlacementConfig, Rect, WalkthroughSession};

    use super::*;

    fn vm_at(index: usize) -> OverlayVm {
        let tour = Tour::from_drafts(
            StorageKey::new("tour_dashboard").unwrap(),
            vec![
                StepDraft::new(
                    "nav-clients",
                    "Clients",
                    "Every member lives here.",
                    TooltipPosition::Bottom,
                ),
                StepDraft::new("kpi-revenue", "Revenue", "Month to date.", TooltipPosition::Right),
            ],
        )
        .unwrap();
        let mut session = WalkthroughSession::new(tour);
        session.show();
        for _ in 0..index {
            session.next();
        }
        session.record_bounds(Some(Rect::new(100.0, 50.0, 100.0, 40.0)));
        let frame = session
            .overlay(ViewportSize::new(1024.0, 768.0), &PlacementConfig::default())
            .unwrap();
        OverlayVm::from_frame(&frame)
    }

    #[component]
    fn CardHarness(vm: OverlayVm) -> Element {
        rsx! {
            OverlayCard {
                vm,
                on_previous: |_| {},
                on_next: |_| {},
                on_skip: |_| {},
            }
        }
    }

    fn render(vm: OverlayVm) -> String {
        let mut dom = VirtualDom::new_with_props(CardHarness, CardHarnessProps { vm });
        dom.rebuild(&mut NoOpMutations);
        dioxus_ssr::render(&dom)
    }

    #[test]
    fn first_step_card_has_no_back_button() {
        let html = render(vm_at(0));
        assert!(html.contains("Clients"), "missing title in {html}");
        assert!(html.contains("1 / 2"), "missing progress in {html}");
        assert!(
            html.contains("top: 156px; left: 10px; width: 320px;"),
            "missing placement in {html}"
        );
        assert!(html.contains("tour-tooltip-bottom"), "missing position class in {html}");
        assert!(!html.contains("tour-previous"), "unexpected back button in {html}");
        assert!(html.contains(">Next<"), "missing next label in {html}");
    }

    #[test]
    fn last_step_card_offers_finish_and_back() {
        let html = render(vm_at(1));
        assert!(html.contains("2 / 2"), "missing progress in {html}");
        assert!(html.contains("tour-previous"), "missing back button in {html}");
        assert!(html.contains(">Finish<"), "missing finish label in {html}");
        assert!(html.contains("box-shadow: 0 0 0 9999px"), "missing dimming in {html}");
    }
}
