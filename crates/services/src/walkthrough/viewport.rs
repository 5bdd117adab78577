use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard, PoisonError};

use tour_core::model::TargetId;
use tour_core::{Rect, ViewportSize};

/// Handle for a resize/scroll subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

impl ListenerId {
    #[must_use]
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    #[must_use]
    pub fn value(&self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewportEvent {
    Resize,
    Scroll,
}

/// Read-only view of the host document.
///
/// Implementations answer bounding-box queries and track which listeners should
/// receive resize/scroll notifications. Delivery itself is the host's job: it calls
/// `WalkthroughController::handle_viewport_event` while a listener is registered.
pub trait Viewport: Send + Sync {
    fn bounds_of(&self, target: &TargetId) -> Option<Rect>;
    fn viewport_size(&self) -> ViewportSize;
    fn subscribe(&self) -> ListenerId;
    fn unsubscribe(&self, id: ListenerId);
}

#[derive(Debug, Default)]
struct StaticViewportInner {
    size: ViewportSize,
    bounds: HashMap<TargetId, Rect>,
    listeners: HashSet<ListenerId>,
    next_listener: u64,
    subscribe_calls: usize,
}

/// In-memory viewport with settable element bounds.
///
/// Used by tests and by hosts that measure the document themselves and push the
/// results in before asking the controller to recompute.
#[derive(Debug, Default)]
pub struct StaticViewport {
    inner: Mutex<StaticViewportInner>,
}

impl StaticViewport {
    #[must_use]
    pub fn new(size: ViewportSize) -> Self {
        Self {
            inner: Mutex::new(StaticViewportInner {
                size,
                ..StaticViewportInner::default()
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, StaticViewportInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn set_bounds(&self, target: TargetId, rect: Rect) {
        self.lock().bounds.insert(target, rect);
    }

    pub fn remove_target(&self, target: &TargetId) {
        self.lock().bounds.remove(target);
    }

    /// Replace every known target in one go.
    pub fn replace_all(&self, size: ViewportSize, bounds: HashMap<TargetId, Rect>) {
        let mut inner = self.lock();
        inner.size = size;
        inner.bounds = bounds;
    }

    pub fn resize(&self, size: ViewportSize) {
        self.lock().size = size;
    }

    #[must_use]
    pub fn active_listeners(&self) -> usize {
        self.lock().listeners.len()
    }

    /// Total number of `subscribe` calls over the viewport's lifetime.
    #[must_use]
    pub fn subscribe_calls(&self) -> usize {
        self.lock().subscribe_calls
    }
}

impl Viewport for StaticViewport {
    fn bounds_of(&self, target: &TargetId) -> Option<Rect> {
        self.lock().bounds.get(target).copied()
    }

    fn viewport_size(&self) -> ViewportSize {
        self.lock().size
    }

    fn subscribe(&self) -> ListenerId {
        let mut inner = self.lock();
        inner.next_listener += 1;
        inner.subscribe_calls += 1;
        let id = ListenerId(inner.next_listener);
        inner.listeners.insert(id);
        id
    }

    fn unsubscribe(&self, id: ListenerId) {
        self.lock().listeners.remove(&id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listeners_are_tracked_symmetrically() {
        let viewport = StaticViewport::new(ViewportSize::new(800.0, 600.0));
        let a = viewport.subscribe();
        let b = viewport.subscribe();
        assert_ne!(a, b);
        assert_eq!(viewport.active_listeners(), 2);
        viewport.unsubscribe(a);
        viewport.unsubscribe(a);
        assert_eq!(viewport.active_listeners(), 1);
        assert_eq!(viewport.subscribe_calls(), 2);
    }

    #[test]
    fn bounds_can_be_set_and_removed() {
        let viewport = StaticViewport::new(ViewportSize::new(800.0, 600.0));
        let target = TargetId::new("kpi-revenue").unwrap();
        assert!(viewport.bounds_of(&target).is_none());
        viewport.set_bounds(target.clone(), Rect::new(1.0, 2.0, 3.0, 4.0));
        assert_eq!(viewport.bounds_of(&target), Some(Rect::new(1.0, 2.0, 3.0, 4.0)));
        viewport.remove_target(&target);
        assert!(viewport.bounds_of(&target).is_none());
    }
}
