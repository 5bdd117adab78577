//! Tooltip placement relative to a target element.
//!
//! The clamp at the end of [`compute_tooltip_position`] keeps the tooltip roughly on
//! screen. The bottom check is a heuristic: when `top` lands in the last 100px it is
//! pulled up to `viewport.height - 300`, which can still overflow on very short
//! viewports.

use crate::geometry::{Rect, TooltipPlacement, ViewportSize};
use crate::model::TooltipPosition;

pub const DEFAULT_TOOLTIP_WIDTH: f64 = 320.0;
pub const DEFAULT_TOOLTIP_HEIGHT_ESTIMATE: f64 = 200.0;
pub const DEFAULT_OFFSET: f64 = 16.0;
pub const DEFAULT_EDGE_MARGIN: f64 = 10.0;
pub const DEFAULT_BOTTOM_GUARD: f64 = 100.0;
pub const DEFAULT_BOTTOM_FALLBACK: f64 = 300.0;
pub const DEFAULT_SPOTLIGHT_PADDING: f64 = 4.0;

/// Tunables for tooltip and spotlight geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacementConfig {
    pub tooltip_width: f64,
    /// Used for `top` placement and vertical centering; the real height is unknown.
    pub tooltip_height_estimate: f64,
    pub offset: f64,
    pub edge_margin: f64,
    pub bottom_guard: f64,
    pub bottom_fallback: f64,
    pub spotlight_padding: f64,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            tooltip_width: DEFAULT_TOOLTIP_WIDTH,
            tooltip_height_estimate: DEFAULT_TOOLTIP_HEIGHT_ESTIMATE,
            offset: DEFAULT_OFFSET,
            edge_margin: DEFAULT_EDGE_MARGIN,
            bottom_guard: DEFAULT_BOTTOM_GUARD,
            bottom_fallback: DEFAULT_BOTTOM_FALLBACK,
            spotlight_padding: DEFAULT_SPOTLIGHT_PADDING,
        }
    }
}

/// Compute where the tooltip's top-left corner goes for `position`.
#[must_use]
pub fn compute_tooltip_position(
    target: &Rect,
    viewport: ViewportSize,
    position: TooltipPosition,
    config: &PlacementConfig,
) -> TooltipPlacement {
    let half_width = config.tooltip_width / 2.0;
    let half_height = config.tooltip_height_estimate / 2.0;

    let (mut top, mut left) = match position {
        TooltipPosition::Right => (target.center_y() - half_height, target.right() + config.offset),
        TooltipPosition::Left => (
            target.center_y() - half_height,
            target.left - config.tooltip_width - config.offset,
        ),
        TooltipPosition::Top => (
            target.top - config.tooltip_height_estimate - config.offset,
            target.center_x() - half_width,
        ),
        TooltipPosition::Bottom => (
            target.bottom() + config.offset,
            target.center_x() - half_width,
        ),
        TooltipPosition::Center => (
            viewport.height / 2.0 - half_height,
            viewport.width / 2.0 - half_width,
        ),
    };

    if left < config.edge_margin {
        left = config.edge_margin;
    }
    if left + config.tooltip_width > viewport.width - config.edge_margin {
        left = viewport.width - config.tooltip_width - config.edge_margin;
    }
    if top < config.edge_margin {
        top = config.edge_margin;
    }
    if top > viewport.height - config.bottom_guard {
        top = viewport.height - config.bottom_fallback;
    }

    TooltipPlacement { top, left }
}

/// Highlight rectangle drawn around the target.
#[must_use]
pub fn spotlight_rect(target: &Rect, config: &PlacementConfig) -> Rect {
    target.inflate(config.spotlight_padding)
}
