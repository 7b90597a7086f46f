// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Explicit style values set on one element.
//!
//! Elements rarely carry more than a handful of inline values, so the
//! collection is an unsorted `SmallVec` searched linearly. The first
//! [`INLINE_CAPACITY`] values live inline without heap allocation.

use smallvec::SmallVec;

use crate::id::StylePropertyId;
use crate::value::{StyleKeyword, StyleValue};

/// Values stored without a heap allocation.
const INLINE_CAPACITY: usize = 8;

/// At most one [`StyleValue`] per property.
///
/// ```
/// use canopy_style::{Length, StyleKeyword, StylePropertyId, StyleValue, StyleValueCollection};
///
/// let mut values = StyleValueCollection::new();
/// values.set_style_value(StyleValue::length(StylePropertyId::Width, Length::px(40.0)));
/// assert_eq!(values.len(), 1);
///
/// // Setting the unset keyword removes the entry.
/// values.set_style_value(StyleValue::keyword(StylePropertyId::Width, StyleKeyword::Null));
/// assert!(values.try_get_style_value(StylePropertyId::Width).is_none());
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StyleValueCollection {
    values: SmallVec<[StyleValue; INLINE_CAPACITY]>,
}

impl StyleValueCollection {
    /// Creates an empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the value stored for `id`.
    #[must_use]
    pub fn try_get_style_value(&self, id: StylePropertyId) -> Option<&StyleValue> {
        self.values.iter().find(|v| v.id == id)
    }

    /// Stores `value`.
    ///
    /// An existing entry for the same property is overwritten in place, or
    /// removed if `value` carries [`StyleKeyword::Null`]. Without an existing
    /// entry, a `Null` value is ignored and anything else is appended.
    pub fn set_style_value(&mut self, value: StyleValue) {
        let unset = value.keyword == StyleKeyword::Null;
        match self.values.iter().position(|v| v.id == value.id) {
            Some(index) if unset => {
                self.values.remove(index);
            }
            Some(index) => self.values[index] = value,
            None if unset => {}
            None => self.values.push(value),
        }
    }

    /// Removes and returns the value stored for `id`.
    pub fn remove(&mut self, id: StylePropertyId) -> Option<StyleValue> {
        let index = self.values.iter().position(|v| v.id == id)?;
        Some(self.values.remove(index))
    }

    /// Number of stored values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Stored values in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &StyleValue> + '_ {
        self.values.iter()
    }

    /// Drops every stored value.
    pub fn clear(&mut self) {
        self.values.clear();
    }
}
