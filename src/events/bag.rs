//! # Secondary attribute bag.
//!
//! [`AttrBag`] carries the free-form named values some events attach beyond
//! the fixed primary set. Entries keep insertion order, and only two value
//! types exist: UTF-8 strings and 32-bit signed integers. Decoding a raw
//! list skips entries of any other type with a diagnostic; the event is
//! still delivered with the recognized remainder.
//!
//! ## Example
//! ```rust
//! use eventfan::{AttrBag, AttrValue};
//!
//! let mut bag = AttrBag::new();
//! bag.insert("device", AttrValue::Str("disk7".into()));
//! bag.insert("slot", AttrValue::I32(3));
//!
//! assert_eq!(bag.get("device").and_then(AttrValue::as_str), Some("disk7"));
//! assert_eq!(bag.get("slot").and_then(AttrValue::as_i32), Some(3));
//! ```

use std::sync::Arc;

use super::raw::{RawAttr, RawValue};

/// A decoded secondary attribute value.
#[derive(Clone, Debug, PartialEq)]
pub enum AttrValue {
    Str(Arc<str>),
    I32(i32),
}

impl AttrValue {
    /// The string payload, if this is a string value.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttrValue::Str(s) => Some(s),
            AttrValue::I32(_) => None,
        }
    }

    /// The integer payload, if this is an i32 value.
    #[must_use]
    pub fn as_i32(&self) -> Option<i32> {
        match self {
            AttrValue::I32(n) => Some(*n),
            AttrValue::Str(_) => None,
        }
    }
}

/// Insertion-ordered bag of named secondary attributes.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AttrBag {
    entries: Vec<(Arc<str>, AttrValue)>,
}

impl AttrBag {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Decodes a raw attribute list, keeping recognized entries in order.
    ///
    /// Entries with an unsupported value type are skipped with a diagnostic;
    /// skipping is non-fatal by design so one odd attribute cannot drop the
    /// whole event.
    #[must_use]
    pub fn decode(raw: Vec<RawAttr>) -> Self {
        let mut bag = Self::new();
        for entry in raw {
            match entry.value {
                RawValue::Str(s) => bag.insert(entry.name, AttrValue::Str(s.into())),
                RawValue::I32(n) => bag.insert(entry.name, AttrValue::I32(n)),
                RawValue::Unsupported(ty) => {
                    eprintln!(
                        "[eventfan] skipping attribute '{}': unsupported type '{}'",
                        entry.name, ty
                    );
                }
            }
        }
        bag
    }

    /// Appends an entry. Names are not deduplicated; lookups return the
    /// first match.
    pub fn insert(&mut self, name: impl Into<Arc<str>>, value: AttrValue) {
        self.entries.push((name.into(), value));
    }

    /// First value stored under `name`, if any.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&AttrValue> {
        self.entries
            .iter()
            .find(|(n, _)| n.as_ref() == name)
            .map(|(_, v)| v)
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &AttrValue)> {
        self.entries.iter().map(|(n, v)| (n.as_ref(), v))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
