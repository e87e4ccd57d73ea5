//! # Raw-event accessor contract.
//!
//! An [`EventSource`](crate::EventSource) hands its delivery handler a
//! native event object. [`RawEvent`] is the narrow view the registry needs
//! of it: the fixed primary attributes plus an optional list of free-form
//! entries. Extraction happens once, on the delivery thread, before the
//! event is marshalled onto the loop thread.

/// Accessors over one delivered event, implemented by the event source's
/// native representation.
pub trait RawEvent {
    /// Event class name.
    fn class_name(&self) -> &str;

    /// Event subclass name.
    fn subclass_name(&self) -> &str;

    /// Vendor that defined the event.
    fn vendor_name(&self) -> &str;

    /// Publisher that raised the event.
    fn publisher_name(&self) -> &str;

    /// Originating process id; [`KERNEL_PID`](crate::KERNEL_PID) means the
    /// event originated in the kernel.
    fn pid(&self) -> i32;

    /// The optional secondary attribute list, or `None` if the event
    /// carries no extra attributes.
    fn attrs(&self) -> Option<Vec<RawAttr>>;
}

/// One entry of a raw event's secondary attribute list.
#[derive(Clone, Debug, PartialEq)]
pub struct RawAttr {
    pub name: String,
    pub value: RawValue,
}

impl RawAttr {
    pub fn new(name: impl Into<String>, value: RawValue) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// A raw attribute value as typed by the event source.
///
/// Only strings and 32-bit signed integers are decoded into an
/// [`AttrBag`](crate::AttrBag). Anything else arrives as `Unsupported`
/// carrying the source's name for the type, and decoding skips it with a
/// diagnostic rather than failing the event.
#[derive(Clone, Debug, PartialEq)]
pub enum RawValue {
    Str(String),
    I32(i32),
    Unsupported(&'static str),
}
