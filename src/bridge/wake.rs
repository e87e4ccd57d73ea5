//! # Host-reactor wake-up contract.
//!
//! The bridge does not own an event loop; the surrounding reactor does. The
//! [`Wake`] trait is what the bridge needs from it: a cross-thread signal
//! that schedules [`Bridge::drain`](super::Bridge::drain) on the loop
//! thread, plus arm/disarm semantics controlling whether the wake mechanism
//! alone keeps the reactor's wait loop alive.
//!
//! A thread-backed reference implementation lives in
//! [`ChannelWake`](crate::ChannelWake).

/// Wake-up mechanism supplied by the host reactor.
///
/// ## Contract
/// - [`Wake::signal`] may be called from **any** thread. The host must run
///   the bridge's drain callback on the loop thread at the next opportunity.
///   Multiple signals before the loop wakes may be coalesced; `drain` empties
///   the whole queue per pass, so coalescing loses nothing.
/// - [`Wake::arm`] / [`Wake::disarm`] are called only from the loop thread.
///   While armed, the mechanism counts as a live reference keeping the
///   reactor from exiting; while disarmed it does not.
/// - All three operations are infallible. A wake mechanism that cannot
///   signal is an unrecoverable host failure, not something the bridge can
///   degrade around.
pub trait Wake: Send + Sync + 'static {
    /// Schedule the bridge's drain callback on the loop thread.
    fn signal(&self);

    /// Mark the mechanism as keeping the reactor alive.
    fn arm(&self);

    /// Mark the mechanism as no longer keeping the reactor alive.
    fn disarm(&self);
}
