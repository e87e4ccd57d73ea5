//! Event fan-out registry: one OS subscription, many subscribers.
//!
//! This module multiplexes logical subscribers over a single underlying
//! [`EventSource`] subscription and marshals every delivered event onto the
//! loop thread through the [`Bridge`](crate::Bridge) before any subscriber
//! callback runs.
//!
//! ## Contents
//! - [`Registry`] subscriber table, attach/detach, delivery and fan-out
//! - [`Subscriber`] / [`SubscriberFn`] the callback contract and adapter
//! - [`EventSource`] / [`DeliveryFn`] the external source seam
//! - [`Watcher`] owning wrapper coupling a subscription to a reactor hold
//!
//! ## Quick reference
//! - **Loop thread**: `attach`, `detach`, fan-out, `Watcher` teardown.
//! - **Source pool threads**: the delivery handler, which blocks in
//!   [`Bridge::invoke`](crate::Bridge::invoke) until fan-out completes.

mod core;
mod source;
mod subscriber;
mod watcher;

pub use self::core::{Registry, SubscriptionId};
pub use source::{DeliveryFn, EventSource, CLASS_ALL, SUBCLASS_ALL};
pub use subscriber::{Subscriber, SubscriberFn};
pub use watcher::Watcher;

#[cfg(feature = "logging")]
pub use subscriber::LogWriter;
