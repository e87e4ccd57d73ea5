//! # Primary event attributes.
//!
//! The fixed attribute set extracted from every delivered event: class,
//! subclass, vendor and publisher names, plus the originating pid and the
//! kernel/user origin derived from it.
//!
//! ## Example
//! ```rust
//! use eventfan::{EventAttrs, EventOrigin, KERNEL_PID};
//!
//! let attrs = EventAttrs {
//!     class: "EC_dev_add".into(),
//!     subclass: "ESC_disk".into(),
//!     vendor: "SUNW".into(),
//!     publisher: "syseventd".into(),
//!     origin: EventOrigin::from_pid(KERNEL_PID),
//!     pid: KERNEL_PID,
//! };
//! assert_eq!(attrs.source(), "kernel");
//! ```

use std::sync::Arc;

use super::raw::RawEvent;

/// Pid sentinel marking an event that originated in the kernel rather than
/// a user process.
pub const KERNEL_PID: i32 = 0;

/// Where an event originated, derived from its pid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EventOrigin {
    Kernel,
    User,
}

impl EventOrigin {
    /// Classifies a pid: [`KERNEL_PID`] is the kernel, anything else a user
    /// process.
    #[must_use]
    pub fn from_pid(pid: i32) -> Self {
        if pid == KERNEL_PID {
            EventOrigin::Kernel
        } else {
            EventOrigin::User
        }
    }

    /// Stable string form, `"kernel"` or `"user"`.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            EventOrigin::Kernel => "kernel",
            EventOrigin::User => "user",
        }
    }
}

/// Primary attribute container for one delivered event.
///
/// Built once on the delivery thread, then shared read-only with every
/// subscriber during fan-out. String fields are `Arc<str>`: the container
/// is cloned per fan-out snapshot and the names are immutable.
#[derive(Clone, Debug)]
pub struct EventAttrs {
    /// Event class name.
    pub class: Arc<str>,
    /// Event subclass name.
    pub subclass: Arc<str>,
    /// Vendor that defined the event.
    pub vendor: Arc<str>,
    /// Publisher that raised the event.
    pub publisher: Arc<str>,
    /// Kernel or user origin, derived from `pid`.
    pub origin: EventOrigin,
    /// Originating pid ([`KERNEL_PID`] for kernel events).
    pub pid: i32,
}

impl EventAttrs {
    /// Extracts the primary attribute set from a raw event.
    #[must_use]
    pub fn from_raw(ev: &dyn RawEvent) -> Self {
        let pid = ev.pid();
        Self {
            class: ev.class_name().into(),
            subclass: ev.subclass_name().into(),
            vendor: ev.vendor_name().into(),
            publisher: ev.publisher_name().into(),
            origin: EventOrigin::from_pid(pid),
            pid,
        }
    }

    /// Origin rendered as `"kernel"` or `"user"`.
    #[must_use]
    pub fn source(&self) -> &'static str {
        self.origin.as_str()
    }
}
