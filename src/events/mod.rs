//! Event data model: attribute containers and the raw-event seam.
//!
//! Every delivered event is packaged into two independent containers before
//! it crosses onto the loop thread:
//!
//! - [`EventAttrs`] the fixed primary attribute set (class, subclass,
//!   vendor, publisher, originating pid and kernel/user origin);
//! - [`AttrBag`] an optional secondary bag of free-form named values.
//!
//! [`RawEvent`] is the accessor contract an event source implements for its
//! native event representation; the containers are built from it on the
//! delivery thread and then travel by value.

mod attrs;
mod bag;
mod raw;

pub use attrs::{EventAttrs, EventOrigin, KERNEL_PID};
pub use bag::{AttrBag, AttrValue};
pub use raw::{RawAttr, RawEvent, RawValue};
