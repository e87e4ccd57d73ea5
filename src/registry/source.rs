//! # External event source contract.
//!
//! The registry does not speak to the OS event facility directly; it drives
//! an [`EventSource`] implementation through the same four operations the
//! underlying facility exposes: bind a delivery handle, subscribe it to
//! event classes, unsubscribe, unbind.
//!
//! ## Delivery contract
//! The handler passed to [`EventSource::bind`] is invoked once per delivered
//! event, on an arbitrary thread from the source's own pool — never the loop
//! thread. The source imposes no ordering across distinct handler
//! invocations beyond what it serializes itself.

use std::sync::Arc;

use crate::error::SourceError;
use crate::events::RawEvent;

/// Wildcard event class: subscribe to every class.
pub const CLASS_ALL: &str = "EC_all";

/// Wildcard subclass: subscribe to every subclass of a class.
pub const SUBCLASS_ALL: &str = "ESC_all";

/// Per-event delivery callback handed to [`EventSource::bind`].
pub type DeliveryFn = Arc<dyn Fn(&dyn RawEvent) + Send + Sync>;

/// The OS-level event subscription facility, as the registry sees it.
pub trait EventSource: Send + Sync + 'static {
    /// Opaque subscription handle owned by the binder.
    type Handle: Send;

    /// Binds a delivery handler, returning the handle for later calls.
    fn bind(&self, handler: DeliveryFn) -> Result<Self::Handle, SourceError>;

    /// Subscribes the bound handle to `class` with the given subclasses.
    ///
    /// The registry always subscribes with [`CLASS_ALL`] /
    /// [`SUBCLASS_ALL`]; filtering happens in subscribers, not here.
    fn subscribe(
        &self,
        handle: &Self::Handle,
        class: &str,
        subclasses: &[&str],
    ) -> Result<(), SourceError>;

    /// Drops the handle's subscriptions. Infallible teardown.
    fn unsubscribe(&self, handle: &Self::Handle);

    /// Releases the handle. No deliveries occur after unbind returns.
    fn unbind(&self, handle: Self::Handle);
}
