//! # Core subscriber trait.
//!
//! [`Subscriber`] is the extension point for receiving fanned-out events.
//! Callbacks always run on the loop thread (they receive the
//! [`LoopToken`](crate::LoopToken) as proof) and run synchronously inside
//! the fan-out pass: a slow subscriber stalls the delivery thread that
//! raised the event and every call queued behind it.
//!
//! ## Reentrancy
//! A callback may attach or detach subscriptions through the token it is
//! handed. The fan-out pass iterates a snapshot taken at its start, so the
//! structural change takes effect from the next delivered event.
//!
//! ## Example (skeleton)
//! ```rust
//! use eventfan::{AttrBag, EventAttrs, LoopToken, Subscriber};
//!
//! struct DiskAudit;
//!
//! impl Subscriber for DiskAudit {
//!     fn on_event(&self, _token: &LoopToken, attrs: &EventAttrs, _extra: Option<&AttrBag>) {
//!         if &*attrs.class == "EC_dev_add" {
//!             // record the arrival...
//!         }
//!     }
//!     fn name(&self) -> &'static str {
//!         "disk-audit"
//!     }
//! }
//! ```

use std::sync::Arc;

use crate::bridge::LoopToken;
use crate::events::{AttrBag, EventAttrs};

/// Contract for fan-out subscribers.
///
/// Invoked on the loop thread, once per delivered event, in attach order
/// relative to other subscribers.
pub trait Subscriber: Send + Sync + 'static {
    /// Handle one delivered event.
    ///
    /// # Parameters
    /// - `token`: loop-thread capability, valid for the duration of the call
    /// - `attrs`: primary attribute container
    /// - `extra`: secondary attribute bag, if the event carried one
    fn on_event(&self, token: &LoopToken, attrs: &EventAttrs, extra: Option<&AttrBag>);

    /// Human-readable name (for diagnostics).
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// Function-backed subscriber implementation.
///
/// Wraps a plain closure so short subscribers need no struct of their own.
pub struct SubscriberFn<F> {
    name: &'static str,
    f: F,
}

impl<F> SubscriberFn<F>
where
    F: Fn(&LoopToken, &EventAttrs, Option<&AttrBag>) + Send + Sync + 'static,
{
    /// Creates a new function-backed subscriber.
    ///
    /// Prefer [`SubscriberFn::arc`] when you immediately need an
    /// `Arc<dyn Subscriber>` for [`Registry::attach`](crate::Registry::attach).
    pub fn new(name: &'static str, f: F) -> Self {
        Self { name, f }
    }

    /// Creates the subscriber and returns it as a shared handle.
    pub fn arc(name: &'static str, f: F) -> Arc<dyn Subscriber> {
        Arc::new(Self::new(name, f))
    }
}

impl<F> Subscriber for SubscriberFn<F>
where
    F: Fn(&LoopToken, &EventAttrs, Option<&AttrBag>) + Send + Sync + 'static,
{
    fn on_event(&self, token: &LoopToken, attrs: &EventAttrs, extra: Option<&AttrBag>) {
        (self.f)(token, attrs, extra)
    }

    fn name(&self) -> &'static str {
        self.name
    }
}

/// Simple stdout logging subscriber.
///
/// Enabled via the `logging` feature. Prints one human-readable line per
/// event for debugging and demonstration purposes; implement a custom
/// [`Subscriber`] for anything structured.
#[cfg(feature = "logging")]
pub struct LogWriter;

#[cfg(feature = "logging")]
impl Subscriber for LogWriter {
    fn on_event(&self, _token: &LoopToken, attrs: &EventAttrs, extra: Option<&AttrBag>) {
        let extras = extra.map_or(0, AttrBag::len);
        println!(
            "[event] class={} subclass={} vendor={} publisher={} source={} pid={} extras={extras}",
            attrs.class, attrs.subclass, attrs.vendor, attrs.publisher, attrs.source(), attrs.pid
        );
    }

    fn name(&self) -> &'static str {
        "log-writer"
    }
}
