//! # eventfan
//!
//! **eventfan** bridges two concurrency domains: any number of threads that
//! need to run a function *on* a designated loop thread and block for its
//! result, and the one loop thread that alone is allowed to run it.
//!
//! The crate grew out of the classic problem of marshalling OS event
//! delivery (which arrives on an opaque thread pool) onto a single-threaded
//! reactor, with synchronous semantics for the delivering thread.
//!
//! ## Architecture
//! ```text
//!  delivery pool (event source)            loop thread (reactor)
//!  ┌──────────────┐
//!  │ handler(raw) │── package ──► EventAttrs + AttrBag
//!  └──────┬───────┘
//!         │ Bridge::invoke(fan_out)
//!         ▼
//!  ┌─────────────────────────────┐   wake.signal()   ┌──────────────────┐
//!  │ CallQueue (FIFO, one mutex) │ ────────────────► │ Bridge::drain()  │
//!  └─────────────────────────────┘                   │  run each call   │
//!         ▲ blocks on oneshot                        │  fulfil oneshot  │
//!         │◄─────────────────────────────────────────┴────────┬─────────┘
//!         │                                                   ▼
//!   delivery thread resumes                    Registry fan-out, in attach
//!                                              order, to every Subscriber
//! ```
//!
//! Two components, the second built on the first:
//!
//! - [`Bridge`] — a synchronous cross-thread call mechanism. `invoke`
//!   enqueues a closure, signals the loop's [`Wake`] mechanism, and blocks
//!   until the loop thread has drained the queue and run it.
//! - [`Registry`] — owns zero-or-one underlying [`EventSource`]
//!   subscriptions and a list of [`Subscriber`]s; every delivered event is
//!   moved onto the loop thread through the bridge before any subscriber
//!   callback runs.
//!
//! ## Loop-thread capability
//! Operations restricted to the loop thread take a [`LoopToken`], a `!Send`
//! capability created once by [`Bridge::new`]. The restriction is visible in
//! the interface instead of hiding behind a thread-id comparison, and code
//! holding a token can be exercised in tests without spawning threads.
//!
//! ## Features
//! | Area              | Description                                              | Key types / traits                     |
//! |-------------------|----------------------------------------------------------|----------------------------------------|
//! | **Bridge**        | Synchronous calls onto the loop thread, FIFO, hold refs. | [`Bridge`], [`LoopToken`], [`HoldGuard`] |
//! | **Registry**      | Shared OS subscription, fan-out in attach order.         | [`Registry`], [`Subscriber`], [`Watcher`] |
//! | **Event model**   | Primary attributes plus optional free-form bag.          | [`EventAttrs`], [`AttrBag`], [`AttrValue`] |
//! | **Source seam**   | Pluggable event source and raw-event accessors.          | [`EventSource`], [`RawEvent`]          |
//! | **Reference loop**| Thread-backed reactor for tests and standalone use.      | [`ThreadLoop`], [`ChannelWake`]        |
//!
//! ## Optional features
//! - `logging`: exports a simple built-in [`LogWriter`] _(demo/reference only)_.
//!
//! ## Example
//! ```rust
//! use eventfan::ThreadLoop;
//!
//! let rt = ThreadLoop::spawn();
//! let bridge = rt.bridge().clone();
//!
//! // Runs on the loop thread; this thread blocks until it completes.
//! let answer = bridge.invoke(|_token| 6 * 7);
//! assert_eq!(answer, 42);
//!
//! rt.shutdown();
//! ```

mod bridge;
mod error;
mod events;
mod reactor;
mod registry;

// ---- Public re-exports ----

pub use bridge::{Bridge, HoldGuard, LoopToken, Wake};
pub use error::{AttachError, SourceError};
pub use events::{
    AttrBag, AttrValue, EventAttrs, EventOrigin, RawAttr, RawEvent, RawValue, KERNEL_PID,
};
pub use reactor::{ChannelWake, ThreadLoop};
pub use registry::{
    DeliveryFn, EventSource, Registry, Subscriber, SubscriberFn, SubscriptionId, Watcher,
    CLASS_ALL, SUBCLASS_ALL,
};

// Optional: expose a simple built-in logger subscriber (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use registry::LogWriter;
