//! Error types used by the bridge and registry.
//!
//! Two error classes exist and only one of them lives here:
//!
//! - **Recoverable resource/registration failures** — [`AttachError`] and
//!   [`SourceError`] — reported to the immediate caller, with no partial
//!   state left behind.
//! - **Programming/invariant violations** (wrong-thread calls, a call
//!   dropped without completion, poisoned queue mutex) are *not* error
//!   values: they panic at the point of violation. The bridge underlies
//!   correctness-critical signaling and must not run in a known-inconsistent
//!   state.

use thiserror::Error;

/// # Errors reported by an event source implementation.
///
/// An opaque reason string: the registry does not interpret source failures
/// beyond surfacing them through [`AttachError`].
#[derive(Error, Debug)]
#[error("event source error: {reason}")]
pub struct SourceError {
    /// Human-readable description from the source.
    pub reason: String,
}

impl SourceError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// # Errors produced by [`Registry::attach`](crate::Registry::attach).
///
/// Both variants leave the registry exactly as it was before the call:
/// a failed subscribe unbinds the freshly bound handle, and the subscriber
/// is never appended on any failure path.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum AttachError {
    /// Binding a delivery handle with the event source failed.
    #[error("failed to bind event source handle: {reason}")]
    Bind {
        /// Reason reported by the source.
        reason: String,
    },

    /// Subscribing the bound handle failed; the bind was rolled back.
    #[error("failed to subscribe to event classes: {reason}")]
    Subscribe {
        /// Reason reported by the source.
        reason: String,
    },
}

impl AttachError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use eventfan::AttachError;
    ///
    /// let err = AttachError::Bind { reason: "no channel".into() };
    /// assert_eq!(err.as_label(), "attach_bind");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            AttachError::Bind { .. } => "attach_bind",
            AttachError::Subscribe { .. } => "attach_subscribe",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            AttachError::Bind { reason } => format!("bind failed: {reason}"),
            AttachError::Subscribe { reason } => format!("subscribe failed: {reason}"),
        }
    }
}
