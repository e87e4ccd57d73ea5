//! # Watcher: an owning subscription wrapper.
//!
//! A [`Watcher`] couples one registry subscription with one reactor
//! [`HoldGuard`](crate::HoldGuard): while the watcher lives, the loop's
//! wake-up mechanism counts as a keep-alive reference, so a process whose
//! only remaining work is waiting for events does not exit under it.
//!
//! Teardown is idempotent because it can be reached twice: once by an
//! explicit [`Watcher::close`] and once by scope-end `Drop` (an owner's
//! explicit destroy and its finalizer, in the original consumer of this
//! design). The second path is a no-op.

use std::sync::Arc;

use crate::bridge::{HoldGuard, LoopToken};
use crate::error::AttachError;

use super::core::{Registry, SubscriptionId};
use super::source::EventSource;
use super::subscriber::Subscriber;

/// Owning handle for one attached subscriber plus its reactor hold.
///
/// `!Send` (it carries a [`HoldGuard`]): it lives and dies on the loop
/// thread, which is what lets `Drop` tear down without a token.
pub struct Watcher<S: EventSource> {
    registry: Registry<S>,
    id: Option<SubscriptionId>,
    hold: Option<HoldGuard>,
}

impl<S: EventSource> Watcher<S> {
    /// Attaches `subscriber` and takes a keep-alive hold on the bridge.
    ///
    /// Loop thread only. On attach failure no hold is taken and nothing
    /// needs undoing.
    pub fn attach(
        registry: &Registry<S>,
        token: &LoopToken,
        subscriber: Arc<dyn Subscriber>,
    ) -> Result<Self, AttachError> {
        let id = registry.attach(token, subscriber)?;
        let hold = registry.bridge().hold(token);
        Ok(Self {
            registry: registry.clone(),
            id: Some(id),
            hold: Some(hold),
        })
    }

    /// Detaches the subscriber and releases the hold. Idempotent.
    pub fn close(&mut self) {
        if let Some(id) = self.id.take() {
            self.registry.detach_inner(id);
        }
        self.hold = None;
    }

    /// Whether this watcher has already been closed.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.id.is_none()
    }
}

impl<S: EventSource> std::fmt::Debug for Watcher<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Watcher")
            .field("closed", &self.is_closed())
            .finish_non_exhaustive()
    }
}

impl<S: EventSource> Drop for Watcher<S> {
    fn drop(&mut self) {
        self.close();
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::FakeSource;
    use super::*;

    use std::sync::Arc;

    use crate::bridge::testwake::RecordingWake;
    use crate::bridge::{Bridge, Wake};
    use crate::registry::SubscriberFn;

    fn harness() -> (
        Registry<FakeSource>,
        LoopToken,
        FakeSource,
        Arc<RecordingWake>,
    ) {
        let wake = Arc::new(RecordingWake::default());
        let (bridge, token) = Bridge::new(Arc::clone(&wake) as Arc<dyn Wake>);
        let source = FakeSource::default();
        let registry = Registry::new(bridge, source.clone(), &token);
        (registry, token, source, wake)
    }

    fn noop() -> Arc<dyn Subscriber> {
        SubscriberFn::arc("noop", |_, _, _| {})
    }

    #[test]
    fn test_watcher_holds_reactor_while_alive() {
        let (registry, token, source, wake) = harness();
        assert!(!wake.is_armed());

        let mut watcher = Watcher::attach(&registry, &token, noop()).unwrap();
        assert!(wake.is_armed(), "live subscription must keep the loop alive");
        assert_eq!(registry.subscriber_count(&token), 1);

        watcher.close();
        assert!(!wake.is_armed());
        assert_eq!(registry.subscriber_count(&token), 0);
        assert!(!source.bound());
    }

    #[test]
    fn test_close_is_idempotent() {
        let (registry, token, source, wake) = harness();

        let mut watcher = Watcher::attach(&registry, &token, noop()).unwrap();
        watcher.close();
        assert!(watcher.is_closed());

        watcher.close();
        assert_eq!(source.unbinds(), 1);
        assert!(!wake.is_armed());
    }

    #[test]
    fn test_drop_tears_down_like_close() {
        let (registry, token, source, wake) = harness();

        {
            let _watcher = Watcher::attach(&registry, &token, noop()).unwrap();
            assert!(wake.is_armed());
        }
        assert!(!wake.is_armed());
        assert_eq!(registry.subscriber_count(&token), 0);
        assert_eq!(source.unbinds(), 1);
    }

    #[test]
    fn test_failed_attach_takes_no_hold() {
        let (registry, token, source, wake) = harness();
        source.fail_next_subscribe();

        let err = Watcher::attach(&registry, &token, noop()).unwrap_err();
        assert_eq!(err.as_label(), "attach_subscribe");
        assert!(!wake.is_armed());
        assert_eq!(registry.bridge().holds(&token), 0);
    }

    #[test]
    fn test_two_watchers_share_one_source_subscription() {
        let (registry, token, source, wake) = harness();

        let mut a = Watcher::attach(&registry, &token, noop()).unwrap();
        let mut b = Watcher::attach(&registry, &token, noop()).unwrap();
        assert_eq!(source.binds(), 1);
        assert_eq!(registry.bridge().holds(&token), 2);

        a.close();
        assert!(wake.is_armed(), "second watcher still holds the loop");
        assert!(source.bound());

        b.close();
        assert!(!wake.is_armed());
        assert!(!source.bound());
    }
}
