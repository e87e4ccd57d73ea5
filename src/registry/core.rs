//! # The fan-out registry proper.
//!
//! A [`Registry`] multiplexes many logical subscribers over at most one
//! underlying [`EventSource`] subscription:
//!
//! ```text
//! states: UNSUBSCRIBED (no subscribers, no handle)
//!         SUBSCRIBED   (≥1 subscribers, handle bound)
//!
//! UNSUBSCRIBED ──attach ok──► SUBSCRIBED ──detach to zero──► UNSUBSCRIBED
//!                SUBSCRIBED ──attach/detach (list stays non-empty)──┐
//!                     ▲──────────────────────────────────────────────┘
//! ```
//!
//! The handle exists iff the subscriber list is non-empty, and both
//! boundary transitions happen on the loop thread.
//!
//! ## Rules
//! - `attach`/`detach` are loop-thread-only (they take a `LoopToken`).
//! - Delivery runs on a source-pool thread and crosses to the loop thread
//!   through [`Bridge::invoke`] — subscriber callbacks are never invoked
//!   anywhere else.
//! - Fan-out iterates a snapshot of the subscriber list taken at the start
//!   of the pass, so a callback attaching or detaching reentrantly cannot
//!   corrupt or skip the iteration; the change applies from the next event.
//!
//! [`Bridge::invoke`]: crate::Bridge::invoke

use std::sync::{Arc, Mutex};

use crate::bridge::{Bridge, LoopToken};
use crate::error::AttachError;
use crate::events::{AttrBag, EventAttrs, RawEvent};

use super::source::{DeliveryFn, EventSource, CLASS_ALL, SUBCLASS_ALL};
use super::subscriber::Subscriber;

/// Opaque identifier for one attach/detach pairing.
///
/// Owned by whoever called [`Registry::attach`]; stale ids are harmless
/// (detach of an unknown id is a no-op).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

struct Entry {
    id: u64,
    subscriber: Arc<dyn Subscriber>,
}

/// Subscriber table plus the zero-or-one source handle.
///
/// Behind a `Mutex` solely to keep the registry `Sync`; every acquisition
/// happens on the loop thread, so the lock is never contended.
struct Table<S: EventSource> {
    entries: Vec<Entry>,
    next_id: u64,
    handle: Option<S::Handle>,
}

struct RegistryShared<S: EventSource> {
    bridge: Bridge,
    source: S,
    table: Mutex<Table<S>>,
}

/// Event fan-out registry over one [`EventSource`].
///
/// Cheap `Arc`-backed handle; clones share one subscriber table. Constructed
/// on the loop thread, where all mutation stays; only the delivery path
/// touches it from elsewhere, and that path goes through the bridge.
pub struct Registry<S: EventSource> {
    shared: Arc<RegistryShared<S>>,
}

impl<S: EventSource> Clone for Registry<S> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<S: EventSource> Registry<S> {
    /// Creates an empty registry in the UNSUBSCRIBED state.
    ///
    /// Loop thread only: the registry's lifecycle is tied to the loop the
    /// bridge serves.
    #[must_use]
    pub fn new(bridge: Bridge, source: S, _token: &LoopToken) -> Self {
        Self {
            shared: Arc::new(RegistryShared {
                bridge,
                source,
                table: Mutex::new(Table {
                    entries: Vec::new(),
                    next_id: 0,
                    handle: None,
                }),
            }),
        }
    }

    /// The bridge this registry marshals deliveries through.
    #[must_use]
    pub fn bridge(&self) -> &Bridge {
        &self.shared.bridge
    }

    /// Registers a subscriber; loop thread only.
    ///
    /// On the empty→non-empty transition this binds a delivery handle with
    /// the source and subscribes it to all classes and subclasses. Both
    /// steps must succeed before the subscriber is appended, so a failed
    /// registration leaves no half-added state: a failed subscribe unbinds
    /// the fresh handle before returning the error.
    ///
    /// Subscribers already attached see no handle churn from later attaches.
    pub fn attach(
        &self,
        _token: &LoopToken,
        subscriber: Arc<dyn Subscriber>,
    ) -> Result<SubscriptionId, AttachError> {
        let mut table = self.lock_table();

        if table.entries.is_empty() {
            debug_assert!(table.handle.is_none(), "handle present with no subscribers");

            let registry = self.clone();
            let handler: DeliveryFn = Arc::new(move |raw| registry.deliver(raw));
            let handle = self
                .shared
                .source
                .bind(handler)
                .map_err(|e| AttachError::Bind {
                    reason: e.to_string(),
                })?;
            if let Err(e) = self
                .shared
                .source
                .subscribe(&handle, CLASS_ALL, &[SUBCLASS_ALL])
            {
                self.shared.source.unbind(handle);
                return Err(AttachError::Subscribe {
                    reason: e.to_string(),
                });
            }
            table.handle = Some(handle);
        }

        let id = table.next_id;
        table.next_id += 1;
        table.entries.push(Entry { id, subscriber });
        Ok(SubscriptionId(id))
    }

    /// Removes a subscriber; loop thread only.
    ///
    /// Idempotent: unknown or already-detached ids are a no-op. On the
    /// non-empty→empty transition the source subscription is torn down
    /// (unsubscribe, unbind) and the handle cleared.
    pub fn detach(&self, _token: &LoopToken, id: SubscriptionId) {
        self.detach_inner(id);
    }

    /// Loop-thread-only by caller contract; [`Watcher`](super::Watcher)
    /// reaches this from `Drop`, where its `!Send` bound stands in for the
    /// token.
    pub(crate) fn detach_inner(&self, id: SubscriptionId) {
        let mut table = self.lock_table();

        let Some(pos) = table.entries.iter().position(|e| e.id == id.0) else {
            return;
        };
        table.entries.remove(pos);

        if table.entries.is_empty() {
            if let Some(handle) = table.handle.take() {
                self.shared.source.unsubscribe(&handle);
                self.shared.source.unbind(handle);
            }
        }
    }

    /// Number of attached subscribers. Loop thread only.
    #[must_use]
    pub fn subscriber_count(&self, _token: &LoopToken) -> usize {
        self.lock_table().entries.len()
    }

    /// Whether the underlying source subscription currently exists.
    /// Loop thread only.
    #[must_use]
    pub fn is_subscribed(&self, _token: &LoopToken) -> bool {
        self.lock_table().handle.is_some()
    }

    /// Delivery path. Runs on a source-pool thread, never the loop thread.
    ///
    /// Packages the raw event into the two attribute containers, then makes
    /// the one thread crossing in the registry: a synchronous bridge call
    /// that fans out on the loop thread. Blocks until fan-out completes.
    pub(crate) fn deliver(&self, raw: &dyn RawEvent) {
        let attrs = EventAttrs::from_raw(raw);
        let bag = raw.attrs().map(AttrBag::decode);

        let registry = self.clone();
        self.shared.bridge.invoke(move |token| {
            registry.fan_out(token, &attrs, bag.as_ref());
        });
    }

    /// Fan-out pass: every subscriber, in attach order, both containers.
    ///
    /// Iterates a snapshot so reentrant attach/detach from a callback is
    /// safe; see the module docs.
    pub(crate) fn fan_out(&self, token: &LoopToken, attrs: &EventAttrs, extra: Option<&AttrBag>) {
        let snapshot: Vec<Arc<dyn Subscriber>> = self
            .lock_table()
            .entries
            .iter()
            .map(|e| Arc::clone(&e.subscriber))
            .collect();

        for subscriber in snapshot {
            subscriber.on_event(token, attrs, extra);
        }
    }

    fn lock_table(&self) -> std::sync::MutexGuard<'_, Table<S>> {
        self.shared
            .table
            .lock()
            .expect("subscriber table mutex poisoned")
    }
}
