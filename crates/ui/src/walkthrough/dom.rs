use std::collections::HashMap;

use dioxus::document::{Eval, eval};
use serde::Deserialize;
use services::{ListenerId, StaticViewport, ViewportEvent};
use tour_core::model::TargetId;
use tour_core::{Rect, ViewportSize};
use tracing::{debug, warn};

#[derive(Debug, Deserialize)]
struct Measurement {
    width: f64,
    height: f64,
    rects: HashMap<String, Rect>,
}

/// Measure every tour target in the live document and store the results in `viewport`.
///
/// Targets absent from the document are dropped from `viewport`. When the script fails
/// the previous measurements are kept.
pub(super) async fn measure_into(viewport: &StaticViewport, targets: &[TargetId]) {
    let script = measure_script(targets);
    let measurement = match eval(&script).join::<Measurement>().await {
        Ok(measurement) => measurement,
        Err(err) => {
            warn!(error = ?err, "failed to measure walkthrough targets");
            return;
        }
    };

    let bounds = targets
        .iter()
        .filter_map(|target| {
            measurement
                .rects
                .get(target.as_str())
                .map(|rect| (target.clone(), *rect))
        })
        .collect();
    viewport.replace_all(
        ViewportSize::new(measurement.width, measurement.height),
        bounds,
    );
}

fn measure_script(targets: &[TargetId]) -> String {
    let ids: Vec<&str> = targets.iter().map(TargetId::as_str).collect();
    let ids = serde_json::to_string(&ids).unwrap_or_else(|_| "[]".to_string());
    format!(
        r#"
        const ids = {ids};
        const rects = {{}};
        for (const id of ids) {{
            const el = document.getElementById(id);
            if (!el) {{ continue; }}
            const r = el.getBoundingClientRect();
            rects[id] = {{ top: r.top, left: r.left, width: r.width, height: r.height }};
        }}
        return {{ width: window.innerWidth, height: window.innerHeight, rects: rects }};
        "#,
        ids = ids,
    )
}

/// Open a resize/scroll subscription in the document for `id`.
///
/// Scroll is captured on the document so scrolling inside nested containers also
/// repositions the overlay.
pub(super) fn attach_listener(id: ListenerId) -> ListenerEvents {
    ListenerEvents {
        id,
        eval: eval(&attach_script(id)),
    }
}

/// Remove the document listeners registered for `id`.
pub(super) fn detach_listener(id: ListenerId) {
    let _ = eval(&detach_script(id));
}

pub(super) struct ListenerEvents {
    id: ListenerId,
    eval: Eval,
}

impl ListenerEvents {
    /// Wait for the next event. `None` once the listener is gone.
    pub(super) async fn next_event(&mut self) -> Option<ViewportEvent> {
        loop {
            match self.eval.recv::<String>().await {
                Ok(kind) => match kind.as_str() {
                    "resize" => return Some(ViewportEvent::Resize),
                    "scroll" => return Some(ViewportEvent::Scroll),
                    other => {
                        debug!(listener = self.id.value(), kind = other, "unknown viewport event")
                    }
                },
                Err(err) => {
                    debug!(listener = self.id.value(), error = ?err, "viewport listener closed");
                    return None;
                }
            }
        }
    }
}

fn attach_script(id: ListenerId) -> String {
    format!(
        r#"
        const id = {id};
        const registry = window.__gymdeskTourListeners || (window.__gymdeskTourListeners = {{}});
        if (registry[id]) {{ registry[id](); }}
        let pending = null;
        const notify = (kind) => {{
            if (pending) {{ return; }}
            pending = kind;
            requestAnimationFrame(() => {{
                const sent = pending;
                pending = null;
                dioxus.send(sent);
            }});
        }};
        const onResize = () => notify("resize");
        const onScroll = () => notify("scroll");
        window.addEventListener("resize", onResize);
        document.addEventListener("scroll", onScroll, true);
        await new Promise((resolve) => {{
            registry[id] = () => {{
                window.removeEventListener("resize", onResize);
                document.removeEventListener("scroll", onScroll, true);
                delete registry[id];
                resolve();
            }};
        }});
        "#,
        id = id.value(),
    )
}

fn detach_script(id: ListenerId) -> String {
    format!(
        r#"
        const registry = window.__gymdeskTourListeners;
        if (registry && registry[{id}]) {{ registry[{id}](); }}
        "#,
        id = id.value(),
    )
}
