use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use storage::repository::PreferenceRepository;
use tour_core::model::{StorageKey, Tour};
use tour_core::{
    BoundsUpdate, Navigation, OverlayFrame, PlacementConfig, SettleTicket, WalkthroughSession,
    WalkthroughState,
};
use tracing::{debug, warn};

use super::viewport::{ListenerId, Viewport, ViewportEvent};

/// Value written under the tour's storage key once it has been completed or skipped.
pub const SEEN_MARKER: &str = "true";

/// Wait before the first measurement of a step so surrounding layout can finish.
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_millis(300);

pub type FinishCallback = Arc<dyn Fn() + Send + Sync>;

/// Clear the persisted flag for `key`. Failures are logged and swallowed.
pub async fn reset_walkthrough(flags: &dyn PreferenceRepository, key: &StorageKey) {
    if let Err(err) = flags.remove_preference(key.as_str()).await {
        warn!(key = %key, error = %err, "failed to clear walkthrough flag");
    }
}

/// Drives one walkthrough: first-run suppression, step navigation and target tracking.
///
/// The controller never fails. Storage errors are logged and degrade to "the tour does
/// not show"; a missing target is logged and suppresses the overlay until a later
/// measurement finds it.
///
/// Timers and event delivery belong to the host. After every call the host reads
/// [`pending_settle`](Self::pending_settle) and [`listener`](Self::listener) and makes
/// its own timers/listeners match them.
pub struct WalkthroughController {
    session: WalkthroughSession,
    flags: Arc<dyn PreferenceRepository>,
    viewport: Arc<dyn Viewport>,
    on_finish: Option<FinishCallback>,
    placement: PlacementConfig,
    settle_delay: Duration,
    pending_settle: Option<SettleTicket>,
    listener: Option<ListenerId>,
    active: bool,
}

impl WalkthroughController {
    #[must_use]
    pub fn new(
        tour: Tour,
        flags: Arc<dyn PreferenceRepository>,
        viewport: Arc<dyn Viewport>,
    ) -> Self {
        Self {
            session: WalkthroughSession::new(tour),
            flags,
            viewport,
            on_finish: None,
            placement: PlacementConfig::default(),
            settle_delay: DEFAULT_SETTLE_DELAY,
            pending_settle: None,
            listener: None,
            active: false,
        }
    }

    #[must_use]
    pub fn with_on_finish(mut self, on_finish: FinishCallback) -> Self {
        self.on_finish = Some(on_finish);
        self
    }

    #[must_use]
    pub fn with_settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay = delay;
        self
    }

    #[must_use]
    pub fn with_placement(mut self, placement: PlacementConfig) -> Self {
        self.placement = placement;
        self
    }

    #[must_use]
    pub fn tour(&self) -> &Tour {
        self.session.tour()
    }

    #[must_use]
    pub fn state(&self) -> WalkthroughState {
        self.session.state()
    }

    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.session.is_visible()
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// The settle ticket the host should fire after `ticket.delay()`.
    #[must_use]
    pub fn pending_settle(&self) -> Option<SettleTicket> {
        self.pending_settle
    }

    /// The listener the host should deliver resize/scroll events for.
    #[must_use]
    pub fn listener(&self) -> Option<ListenerId> {
        self.listener
    }

    /// Render model for the current step, if anything should be drawn.
    #[must_use]
    pub fn frame(&self) -> Option<OverlayFrame> {
        self.session
            .overlay(self.viewport.viewport_size(), &self.placement)
    }

    /// Apply the caller's `is_active` gate.
    ///
    /// On the inactive→active edge the persisted flag is read; the tour only shows if
    /// no flag is stored. Deactivating hides the tour without touching the flag.
    pub async fn set_active(&mut self, is_active: bool) {
        if is_active == self.active {
            return;
        }
        self.active = is_active;

        if !is_active {
            self.disarm();
            self.session.hide();
            return;
        }

        let key = self.session.tour().storage_key().clone();
        match self.flags.get_preference(key.as_str()).await {
            Ok(Some(_)) => {
                debug!(key = %key, "walkthrough already seen; staying hidden");
            }
            Ok(None) => {
                if self.session.show() {
                    self.arm();
                }
            }
            Err(err) => {
                warn!(key = %key, error = %err, "failed to read walkthrough flag; staying hidden");
            }
        }
    }

    pub async fn next(&mut self) {
        let navigation = self.session.next();
        self.after_navigation(navigation).await;
    }

    pub fn previous(&mut self) {
        if let Navigation::Retreated { .. } = self.session.previous() {
            self.arm();
        }
    }

    /// Close the tour from any step. Counts as completion for the persisted flag.
    pub async fn skip(&mut self) {
        let navigation = self.session.skip();
        self.after_navigation(navigation).await;
    }

    /// Fire a settle ticket. Stale tickets are ignored and return `false`.
    pub fn settle(&mut self, ticket: SettleTicket) -> bool {
        if self.pending_settle != Some(ticket) || !self.session.is_current(ticket) {
            debug!(epoch = ticket.epoch(), "ignoring stale settle ticket");
            return false;
        }
        self.pending_settle = None;
        self.recompute_bounds();
        true
    }

    /// Deliver a resize or scroll notification. Ignored while no listener is registered.
    pub fn handle_viewport_event(&mut self, event: ViewportEvent) -> BoundsUpdate {
        if self.listener.is_none() {
            debug!(?event, "viewport event without listener");
            return BoundsUpdate::Ignored;
        }
        self.recompute_bounds()
    }

    /// Measure the current step's target again.
    pub fn recompute_bounds(&mut self) -> BoundsUpdate {
        let Some(step) = self.session.current_step() else {
            return BoundsUpdate::Ignored;
        };
        let target = step.target_id().clone();
        let bounds = self.viewport.bounds_of(&target);
        let update = self.session.record_bounds(bounds);
        if update == BoundsUpdate::TargetMissing {
            warn!(
                key = %self.session.tour().storage_key(),
                target = %target,
                "walkthrough target not found; hiding overlay until it appears"
            );
        }
        update
    }

    /// Forget the persisted flag so the tour shows again on next activation.
    pub async fn reset(&self) {
        reset_walkthrough(self.flags.as_ref(), self.session.tour().storage_key()).await;
    }

    async fn after_navigation(&mut self, navigation: Navigation) {
        match navigation {
            Navigation::Advanced { .. } | Navigation::Retreated { .. } => self.arm(),
            Navigation::Finished { from_step } => self.finish(from_step).await,
            Navigation::Unchanged => {}
        }
    }

    async fn finish(&mut self, from_step: usize) {
        self.disarm();
        let key = self.session.tour().storage_key().clone();
        debug!(key = %key, from_step, "walkthrough finished");
        if let Err(err) = self.flags.set_preference(key.as_str(), SEEN_MARKER).await {
            warn!(key = %key, error = %err, "failed to persist walkthrough flag");
        }
        if let Some(on_finish) = &self.on_finish {
            on_finish();
        }
    }

    /// Replace the settle timer and listener for the current step.
    fn arm(&mut self) {
        self.disarm();
        self.pending_settle = self.session.settle_ticket(self.settle_delay);
        if self.session.is_visible() {
            self.listener = Some(self.viewport.subscribe());
        }
    }

    fn disarm(&mut self) {
        self.pending_settle = None;
        if let Some(id) = self.listener.take() {
            self.viewport.unsubscribe(id);
        }
    }
}

impl Drop for WalkthroughController {
    fn drop(&mut self) {
        self.disarm();
    }
}

impl fmt::Debug for WalkthroughController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WalkthroughController")
            .field("storage_key", self.session.tour().storage_key())
            .field("state", &self.session.state())
            .field("active", &self.active)
            .field("pending_settle", &self.pending_settle)
            .field("listener", &self.listener)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use storage::repository::{InMemoryRepository, StorageError};
    use tour_core::model::{StepDraft, TargetId, TooltipPosition};
    use tour_core::{Rect, TooltipPlacement, ViewportSize};

    use super::*;
    use crate::walkthrough::viewport::StaticViewport;

    fn tour(len: usize) -> Tour {
        let drafts = (0..len).map(|i| {
            StepDraft::new(format!("target-{i}"), format!("Step {i}"), "", TooltipPosition::Bottom)
        });
        Tour::from_drafts(StorageKey::new("tour_dashboard").unwrap(), drafts).unwrap()
    }

    fn viewport_with_all_targets(len: usize) -> Arc<StaticViewport> {
        let viewport = Arc::new(StaticViewport::new(ViewportSize::new(1024.0, 768.0)));
        for i in 0..len {
            viewport.set_bounds(
                TargetId::new(format!("target-{i}")).unwrap(),
                Rect::new(100.0, 50.0, 100.0, 40.0),
            );
        }
        viewport
    }

    struct FailingFlags;

    #[async_trait]
    impl PreferenceRepository for FailingFlags {
        async fn get_preference(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::Connection("unavailable".to_string()))
        }

        async fn set_preference(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Connection("unavailable".to_string()))
        }

        async fn remove_preference(&self, _key: &str) -> Result<(), StorageError> {
            Err(StorageError::Connection("unavailable".to_string()))
        }
    }

    #[tokio::test]
    async fn activation_without_flag_shows_first_step() {
        let repo = InMemoryRepository::new();
        let mut ctl =
            WalkthroughController::new(tour(3), Arc::new(repo), viewport_with_all_targets(3));
        ctl.set_active(true).await;
        assert_eq!(ctl.state(), WalkthroughState::Visible { step_index: 0 });
        assert!(ctl.pending_settle().is_some());
        assert!(ctl.listener().is_some());
    }

    #[tokio::test]
    async fn activation_with_flag_stays_hidden() {
        let repo = InMemoryRepository::new();
        repo.set_preference("tour_dashboard", SEEN_MARKER).await.unwrap();
        let viewport = viewport_with_all_targets(3);
        let mut ctl = WalkthroughController::new(tour(3), Arc::new(repo), viewport.clone());
        ctl.set_active(true).await;
        assert_eq!(ctl.state(), WalkthroughState::Hidden);
        assert!(ctl.pending_settle().is_none());
        assert_eq!(viewport.subscribe_calls(), 0);
    }

    #[tokio::test]
    async fn read_failure_degrades_to_hidden() {
        let mut ctl = WalkthroughController::new(
            tour(2),
            Arc::new(FailingFlags),
            viewport_with_all_targets(2),
        );
        ctl.set_active(true).await;
        assert!(!ctl.is_visible());
    }

    #[tokio::test]
    async fn write_failure_still_finishes() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let repo = InMemoryRepository::new();
        let mut ctl =
            WalkthroughController::new(tour(2), Arc::new(repo), viewport_with_all_targets(2))
                .with_on_finish(Arc::new(move || {
                    counter.fetch_add(1, Ordering::SeqCst);
                }));
        ctl.set_active(true).await;
        ctl.flags = Arc::new(FailingFlags);
        ctl.skip().await;
        assert!(!ctl.is_visible());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn settle_measures_once_and_rejects_stale_tickets() {
        let repo = InMemoryRepository::new();
        let mut ctl =
            WalkthroughController::new(tour(3), Arc::new(repo), viewport_with_all_targets(3));
        ctl.set_active(true).await;
        let first = ctl.pending_settle().unwrap();
        assert_eq!(first.delay(), DEFAULT_SETTLE_DELAY);

        ctl.next().await;
        assert!(!ctl.settle(first));
        assert!(ctl.frame().is_none());

        let second = ctl.pending_settle().unwrap();
        assert!(ctl.settle(second));
        assert!(!ctl.settle(second));
        let frame = ctl.frame().unwrap();
        assert_eq!(frame.step_index, 1);
        assert_eq!(frame.tooltip, TooltipPlacement { top: 156.0, left: 10.0 });
    }

    #[tokio::test]
    async fn listener_is_swapped_per_step_and_released_on_hide() {
        let repo = InMemoryRepository::new();
        let viewport = viewport_with_all_targets(3);
        let mut ctl = WalkthroughController::new(tour(3), Arc::new(repo), viewport.clone());
        ctl.set_active(true).await;
        let first = ctl.listener().unwrap();
        ctl.next().await;
        let second = ctl.listener().unwrap();
        assert_ne!(first, second);
        assert_eq!(viewport.active_listeners(), 1);

        ctl.previous();
        assert_eq!(viewport.active_listeners(), 1);

        ctl.set_active(false).await;
        assert_eq!(viewport.active_listeners(), 0);
        assert!(ctl.pending_settle().is_none());
    }

    #[tokio::test]
    async fn viewport_events_recompute_bounds() {
        let repo = InMemoryRepository::new();
        let viewport = viewport_with_all_targets(1);
        let mut ctl = WalkthroughController::new(tour(1), Arc::new(repo), viewport.clone());
        assert_eq!(ctl.handle_viewport_event(ViewportEvent::Resize), BoundsUpdate::Ignored);

        ctl.set_active(true).await;
        let target = TargetId::new("target-0").unwrap();
        viewport.set_bounds(target.clone(), Rect::new(300.0, 400.0, 100.0, 40.0));
        assert_eq!(ctl.handle_viewport_event(ViewportEvent::Scroll), BoundsUpdate::Updated);
        assert_eq!(ctl.frame().unwrap().target, Rect::new(300.0, 400.0, 100.0, 40.0));

        viewport.remove_target(&target);
        assert_eq!(
            ctl.handle_viewport_event(ViewportEvent::Resize),
            BoundsUpdate::TargetMissing
        );
        assert!(ctl.frame().is_none());
        assert!(ctl.is_visible());
    }

    #[tokio::test]
    async fn reset_walkthrough_clears_only_the_given_key() {
        let repo = InMemoryRepository::new();
        repo.set_preference("tour_dashboard", SEEN_MARKER).await.unwrap();
        repo.set_preference("tour_settings", SEEN_MARKER).await.unwrap();

        reset_walkthrough(&repo, &StorageKey::new("tour_dashboard").unwrap()).await;
        assert_eq!(repo.get_preference("tour_dashboard").await.unwrap(), None);
        assert!(repo.get_preference("tour_settings").await.unwrap().is_some());

        reset_walkthrough(&FailingFlags, &StorageKey::new("tour_dashboard").unwrap()).await;
    }

    #[tokio::test]
    async fn dropping_controller_releases_listener() {
        let repo = InMemoryRepository::new();
        let viewport = viewport_with_all_targets(2);
        {
            let mut ctl = WalkthroughController::new(tour(2), Arc::new(repo), viewport.clone());
            ctl.set_active(true).await;
            assert_eq!(viewport.active_listeners(), 1);
        }
        assert_eq!(viewport.active_listeners(), 0);
    }
}
