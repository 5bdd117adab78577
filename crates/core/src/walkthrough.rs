//! Navigation state machine for a guided walkthrough.
//!
//! The session is pure: it never reads storage or measures the document. Callers feed
//! it measured bounds and decide what to persist based on the returned [`Navigation`].

use std::time::Duration;

use crate::geometry::{Rect, TooltipPlacement, ViewportSize};
use crate::model::{Step, Tour};
use crate::placement::{PlacementConfig, compute_tooltip_position, spotlight_rect};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WalkthroughState {
    #[default]
    Hidden,
    Visible {
        step_index: usize,
    },
}

impl WalkthroughState {
    #[must_use]
    pub fn step_index(self) -> Option<usize> {
        match self {
            Self::Hidden => None,
            Self::Visible { step_index } => Some(step_index),
        }
    }
}

/// Result of a navigation action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    Advanced { step_index: usize },
    Retreated { step_index: usize },
    /// The session closed by completing or skipping; the caller persists the flag.
    Finished { from_step: usize },
    Unchanged,
}

/// Outcome of feeding a measurement into the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundsUpdate {
    Updated,
    TargetMissing,
    Ignored,
}

/// One-shot token for the deferred first measurement of a step.
///
/// A ticket is only honoured while the session is still in the epoch it was issued
/// for. Any step change or visibility change makes older tickets stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SettleTicket {
    epoch: u64,
    delay: Duration,
}

impl SettleTicket {
    #[must_use]
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    #[must_use]
    pub fn delay(&self) -> Duration {
        self.delay
    }
}

/// Everything needed to draw the current step.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayFrame {
    pub step_index: usize,
    pub step_count: usize,
    pub step: Step,
    pub target: Rect,
    pub spotlight: Rect,
    pub tooltip: TooltipPlacement,
    pub tooltip_width: f64,
}

impl OverlayFrame {
    #[must_use]
    pub fn is_first(&self) -> bool {
        self.step_index == 0
    }

    #[must_use]
    pub fn is_last(&self) -> bool {
        self.step_index + 1 == self.step_count
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WalkthroughSession {
    tour: Tour,
    state: WalkthroughState,
    target_bounds: Option<Rect>,
    target_missing: bool,
    epoch: u64,
}

impl WalkthroughSession {
    #[must_use]
    pub fn new(tour: Tour) -> Self {
        Self {
            tour,
            state: WalkthroughState::Hidden,
            target_bounds: None,
            target_missing: false,
            epoch: 0,
        }
    }

    #[must_use]
    pub fn tour(&self) -> &Tour {
        &self.tour
    }

    #[must_use]
    pub fn state(&self) -> WalkthroughState {
        self.state
    }

    #[must_use]
    pub fn is_visible(&self) -> bool {
        matches!(self.state, WalkthroughState::Visible { .. })
    }

    #[must_use]
    pub fn step_index(&self) -> Option<usize> {
        self.state.step_index()
    }

    #[must_use]
    pub fn current_step(&self) -> Option<&Step> {
        self.step_index().and_then(|index| self.tour.step(index))
    }

    #[must_use]
    pub fn target_bounds(&self) -> Option<Rect> {
        self.target_bounds
    }

    #[must_use]
    pub fn target_missing(&self) -> bool {
        self.target_missing
    }

    #[must_use]
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Enter `Visible(0)`. Returns `false` if already visible.
    pub fn show(&mut self) -> bool {
        if self.is_visible() {
            return false;
        }
        self.enter(WalkthroughState::Visible { step_index: 0 });
        true
    }

    /// Leave the visible state without treating it as completion.
    pub fn hide(&mut self) -> bool {
        if !self.is_visible() {
            return false;
        }
        self.enter(WalkthroughState::Hidden);
        true
    }

    pub fn next(&mut self) -> Navigation {
        let Some(index) = self.step_index() else {
            return Navigation::Unchanged;
        };
        if index + 1 < self.tour.len() {
            let step_index = index + 1;
            self.enter(WalkthroughState::Visible { step_index });
            Navigation::Advanced { step_index }
        } else {
            self.enter(WalkthroughState::Hidden);
            Navigation::Finished { from_step: index }
        }
    }

    pub fn previous(&mut self) -> Navigation {
        match self.step_index() {
            Some(index) if index > 0 => {
                let step_index = index - 1;
                self.enter(WalkthroughState::Visible { step_index });
                Navigation::Retreated { step_index }
            }
            _ => Navigation::Unchanged,
        }
    }

    pub fn skip(&mut self) -> Navigation {
        let Some(index) = self.step_index() else {
            return Navigation::Unchanged;
        };
        self.enter(WalkthroughState::Hidden);
        Navigation::Finished { from_step: index }
    }

    /// Issue a settle ticket for the current epoch, if visible.
    #[must_use]
    pub fn settle_ticket(&self, delay: Duration) -> Option<SettleTicket> {
        self.is_visible().then_some(SettleTicket {
            epoch: self.epoch,
            delay,
        })
    }

    #[must_use]
    pub fn is_current(&self, ticket: SettleTicket) -> bool {
        self.is_visible() && ticket.epoch == self.epoch
    }

    /// Record a measurement for the current step's target.
    ///
    /// `None` keeps the previous bounds but suppresses the overlay until a later
    /// measurement finds the target again.
    pub fn record_bounds(&mut self, bounds: Option<Rect>) -> BoundsUpdate {
        if !self.is_visible() {
            return BoundsUpdate::Ignored;
        }
        match bounds {
            Some(rect) => {
                self.target_bounds = Some(rect);
                self.target_missing = false;
                BoundsUpdate::Updated
            }
            None => {
                self.target_missing = true;
                BoundsUpdate::TargetMissing
            }
        }
    }

    /// Build the render model, or `None` if nothing should be drawn.
    #[must_use]
    pub fn overlay(
        &self,
        viewport: ViewportSize,
        config: &PlacementConfig,
    ) -> Option<OverlayFrame> {
        if self.target_missing {
            return None;
        }
        let step_index = self.step_index()?;
        let step = self.tour.step(step_index)?;
        let target = self.target_bounds?;
        Some(OverlayFrame {
            step_index,
            step_count: self.tour.len(),
            step: step.clone(),
            target,
            spotlight: spotlight_rect(&target, config),
            tooltip: compute_tooltip_position(&target, viewport, step.position(), config),
            tooltip_width: config.tooltip_width,
        })
    }

    fn enter(&mut self, state: WalkthroughState) {
        self.state = state;
        self.target_bounds = None;
        self.target_missing = false;
        self.epoch = self.epoch.wrapping_add(1);
    }
}
