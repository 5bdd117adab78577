use tour_core::{OverlayFrame, Rect};

/// Dimming color painted outside the spotlight via its box-shadow.
const DIM_SHADOW: &str = "0 0 0 9999px rgba(15, 23, 42, 0.6)";

/// UI-ready render model for one walkthrough step.
#[derive(Clone, Debug, PartialEq)]
pub struct OverlayVm {
    pub title: String,
    pub content: String,
    pub step_label: String,
    pub position: &'static str,
    pub tooltip_style: String,
    pub spotlight_style: String,
    pub has_previous: bool,
    pub is_last: bool,
    pub next_label: &'static str,
}

impl OverlayVm {
    #[must_use]
    pub fn from_frame(frame: &OverlayFrame) -> Self {
        let is_last = frame.is_last();
        Self {
            title: frame.step.title().to_owned(),
            content: frame.step.content().to_owned(),
            step_label: format!("{} / {}", frame.step_index + 1, frame.step_count),
            position: frame.step.position().as_str(),
            tooltip_style: format!(
                "top: {}; left: {}; width: {};",
                px(frame.tooltip.top),
                px(frame.tooltip.left),
                px(frame.tooltip_width),
            ),
            spotlight_style: spotlight_style(&frame.spotlight),
            has_previous: !frame.is_first(),
            is_last,
            next_label: if is_last { "Finish" } else { "Next" },
        }
    }
}

fn spotlight_style(rect: &Rect) -> String {
    format!(
        "top: {}; left: {}; width: {}; height: {}; box-shadow: {DIM_SHADOW};",
        px(rect.top),
        px(rect.left),
        px(rect.width),
        px(rect.height),
    )
}

/// Format a CSS pixel length, dropping a trailing `.0`.
#[must_use]
pub fn px(value: f64) -> String {
    format!("{value}px")
}
