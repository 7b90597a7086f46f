// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Typed access to an element's inline style.
//!
//! Setters share one contract. Writing a value identical to the stored one,
//! or unsetting a property that has no inline value, changes nothing and
//! returns `false`. Any other write is committed and returns `true`: a set
//! applies the value to the computed style immediately and records
//! [`StyleChangeFlags::STYLES`] plus the property's own flags, while an
//! unset only records [`StyleChangeFlags::INLINE_REMOVED`] so the caller
//! reruns the cascade to find the value that now shows through.

use alloc::rc::Rc;
use alloc::vec::Vec;

use crate::collection::StyleValueCollection;
use crate::computed::ComputedStyle;
use crate::error::StyleSheetError;
use crate::id::{PropertyKind, StyleChangeFlags, StylePropertyId};
use crate::sheet::StyleSheet;
use crate::value::{
    StyleColor, StyleCursor, StyleFloat, StyleInt, StyleKeyword, StyleLength, StyleResource,
    StyleValue, StyleValuePayload, Styled,
};

/// A sheet rule used as the base of an element's inline style.
#[derive(Clone, Debug)]
pub struct InlineRule {
    sheet: Rc<StyleSheet>,
    rule_index: usize,
}

impl InlineRule {
    /// Points at rule `rule_index` of `sheet`.
    pub fn new(sheet: Rc<StyleSheet>, rule_index: usize) -> Result<Self, StyleSheetError> {
        sheet.rule(rule_index)?;
        Ok(Self { sheet, rule_index })
    }

    /// The sheet holding the rule.
    #[must_use]
    pub fn sheet(&self) -> &Rc<StyleSheet> {
        &self.sheet
    }

    /// Index of the rule.
    #[must_use]
    pub fn rule_index(&self) -> usize {
        self.rule_index
    }

    /// The rule's declarations as style values.
    pub fn style_values(&self) -> Result<Vec<StyleValue>, StyleSheetError> {
        self.sheet.style_values(self.rule_index)
    }
}

/// Inline values of one element, with typed getters and setters.
#[derive(Clone, Debug, Default)]
pub struct InlineStyleAccess {
    values: StyleValueCollection,
    cursor: Option<StyleCursor>,
    rule: Option<InlineRule>,
}

impl InlineStyleAccess {
    /// Creates an empty inline style.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stored values, excluding the cursor.
    #[must_use]
    pub fn values(&self) -> &StyleValueCollection {
        &self.values
    }

    /// Rule applied beneath the inline values.
    #[must_use]
    pub fn inline_rule(&self) -> Option<&InlineRule> {
        self.rule.as_ref()
    }

    /// Replaces the rule applied beneath the inline values.
    pub fn set_inline_rule(&mut self, rule: Option<InlineRule>) {
        self.rule = rule;
    }

    fn keyword_or<T: Default>(
        &self,
        id: StylePropertyId,
        read: impl FnOnce(&StyleValuePayload) -> Option<T>,
    ) -> Styled<T> {
        let Some(value) = self.values.try_get_style_value(id) else {
            return Styled::null();
        };
        if value.keyword != StyleKeyword::Undefined {
            return Styled::keyword(value.keyword);
        }
        read(&value.payload).map_or_else(Styled::null, Styled::new)
    }

    /// Inline length of `id`; `Null` when not set.
    #[must_use]
    pub fn length(&self, id: StylePropertyId) -> StyleLength {
        self.keyword_or(id, |p| match p {
            StyleValuePayload::Length(l) => Some(*l),
            _ => None,
        })
    }

    /// Inline number of `id`; `Null` when not set.
    #[must_use]
    pub fn float(&self, id: StylePropertyId) -> StyleFloat {
        self.keyword_or(id, |p| match p {
            StyleValuePayload::Float(v) => Some(*v),
            _ => None,
        })
    }

    /// Inline integer of `id`; `Null` when not set.
    #[must_use]
    pub fn int(&self, id: StylePropertyId) -> StyleInt {
        self.keyword_or(id, |p| match p {
            StyleValuePayload::Int(v) => Some(*v),
            _ => None,
        })
    }

    /// Inline color of `id`; `Null` when not set.
    #[must_use]
    pub fn color(&self, id: StylePropertyId) -> StyleColor {
        self.keyword_or(id, |p| match p {
            StyleValuePayload::Color(c) => Some(*c),
            _ => None,
        })
    }

    /// Inline resource of `id`; `Null` when not set.
    #[must_use]
    pub fn resource(&self, id: StylePropertyId) -> StyleResource {
        self.keyword_or(id, |p| match p {
            StyleValuePayload::Resource(r) => Some(Some(r.clone())),
            _ => None,
        })
    }

    /// Inline cursor; `Null` when not set.
    #[must_use]
    pub fn cursor(&self) -> StyleCursor {
        self.cursor.clone().unwrap_or_else(Styled::null)
    }

    fn commit(
        &mut self,
        value: StyleValue,
        computed: &mut ComputedStyle,
        parent: Option<&ComputedStyle>,
        changes: &mut StyleChangeFlags,
    ) -> bool {
        let unset = value.keyword == StyleKeyword::Null;
        match self.values.try_get_style_value(value.id) {
            Some(existing) if *existing == value => return false,
            None if unset => return false,
            _ => {}
        }
        if unset {
            *changes |= StyleChangeFlags::INLINE_REMOVED;
        } else {
            computed.apply_style_value(&value, parent);
            *changes |= StyleChangeFlags::STYLES | value.id.change_flags();
        }
        self.values.set_style_value(value);
        true
    }

    fn set_checked(
        &mut self,
        id: StylePropertyId,
        kind: PropertyKind,
        keyword: StyleKeyword,
        value: impl FnOnce() -> StyleValue,
        computed: &mut ComputedStyle,
        parent: Option<&ComputedStyle>,
        changes: &mut StyleChangeFlags,
    ) -> bool {
        if id.kind() != kind {
            tracing::warn!(?id, ?kind, "inline value has the wrong type for property");
            return false;
        }
        let value = match keyword {
            StyleKeyword::Undefined => value(),
            keyword => StyleValue::keyword(id, keyword),
        };
        self.commit(value, computed, parent, changes)
    }

    /// Sets or unsets an inline length.
    pub fn set_length(
        &mut self,
        id: StylePropertyId,
        value: StyleLength,
        computed: &mut ComputedStyle,
        parent: Option<&ComputedStyle>,
        changes: &mut StyleChangeFlags,
    ) -> bool {
        let length = value.value;
        self.set_checked(
            id,
            PropertyKind::Length,
            value.keyword,
            || StyleValue::length(id, length),
            computed,
            parent,
            changes,
        )
    }

    /// Sets or unsets an inline number.
    pub fn set_float(
        &mut self,
        id: StylePropertyId,
        value: StyleFloat,
        computed: &mut ComputedStyle,
        parent: Option<&ComputedStyle>,
        changes: &mut StyleChangeFlags,
    ) -> bool {
        let number = value.value;
        self.set_checked(
            id,
            PropertyKind::Float,
            value.keyword,
            || StyleValue::float(id, number),
            computed,
            parent,
            changes,
        )
    }

    /// Sets or unsets an inline integer.
    pub fn set_int(
        &mut self,
        id: StylePropertyId,
        value: StyleInt,
        computed: &mut ComputedStyle,
        parent: Option<&ComputedStyle>,
        changes: &mut StyleChangeFlags,
    ) -> bool {
        let number = value.value;
        self.set_checked(
            id,
            PropertyKind::Int,
            value.keyword,
            || StyleValue::int(id, number),
            computed,
            parent,
            changes,
        )
    }

    /// Sets or unsets an inline color.
    pub fn set_color(
        &mut self,
        id: StylePropertyId,
        value: StyleColor,
        computed: &mut ComputedStyle,
        parent: Option<&ComputedStyle>,
        changes: &mut StyleChangeFlags,
    ) -> bool {
        let color = value.value;
        self.set_checked(
            id,
            PropertyKind::Color,
            value.keyword,
            || StyleValue::color(id, color),
            computed,
            parent,
            changes,
        )
    }

    /// Sets or unsets an inline resource. A plain `None` reads as `none`.
    pub fn set_resource(
        &mut self,
        id: StylePropertyId,
        value: StyleResource,
        computed: &mut ComputedStyle,
        parent: Option<&ComputedStyle>,
        changes: &mut StyleChangeFlags,
    ) -> bool {
        let Styled { value, keyword } = value;
        self.set_checked(
            id,
            PropertyKind::Resource,
            keyword,
            || match value {
                Some(resource) => StyleValue::resource(id, resource),
                None => StyleValue::keyword(id, StyleKeyword::None),
            },
            computed,
            parent,
            changes,
        )
    }

    /// Sets or unsets the inline cursor.
    pub fn set_cursor(
        &mut self,
        value: StyleCursor,
        computed: &mut ComputedStyle,
        changes: &mut StyleChangeFlags,
    ) -> bool {
        if value.is_null() {
            if self.cursor.take().is_none() {
                return false;
            }
            *changes |= StyleChangeFlags::INLINE_REMOVED;
            return true;
        }
        if self.cursor.as_ref() == Some(&value) {
            return false;
        }
        computed.apply_cursor(&value);
        *changes |= StyleChangeFlags::STYLES | StylePropertyId::Cursor.change_flags();
        self.cursor = Some(value);
        true
    }

    /// Applies the inline rule, then the inline values, then the cursor.
    pub fn apply_inline_styles(
        &self,
        computed: &mut ComputedStyle,
        parent: Option<&ComputedStyle>,
    ) -> Result<(), StyleSheetError> {
        if let Some(rule) = &self.rule {
            for value in rule.style_values()? {
                computed.apply_style_value(&value, parent);
            }
        }
        for value in self.values.iter() {
            computed.apply_style_value(value, parent);
        }
        if let Some(cursor) = &self.cursor {
            computed.apply_cursor(cursor);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{Color, Cursor, Length, Resource};

    struct Target {
        inline: InlineStyleAccess,
        computed: ComputedStyle,
        changes: StyleChangeFlags,
    }

    impl Target {
        fn new() -> Self {
            Self {
                inline: InlineStyleAccess::new(),
                computed: ComputedStyle::default(),
                changes: StyleChangeFlags::empty(),
            }
        }

        fn width(&mut self, value: StyleLength) -> bool {
            self.inline.set_length(
                StylePropertyId::Width,
                value,
                &mut self.computed,
                None,
                &mut self.changes,
            )
        }
    }

    #[test]
    fn set_then_unset_round_trips() {
        let mut t = Target::new();
        assert!(t.width(Length::px(40.0).into()));
        assert_eq!(t.computed.width, Length::px(40.0));
        assert_eq!(
            t.changes,
            StyleChangeFlags::STYLES | StyleChangeFlags::LAYOUT
        );
        assert_eq!(
            t.inline.length(StylePropertyId::Width),
            Styled::new(Length::px(40.0))
        );

        t.changes = StyleChangeFlags::empty();
        assert!(!t.width(Length::px(40.0).into()), "identical value");
        assert!(t.changes.is_empty());

        assert!(t.width(Styled::null()));
        assert_eq!(t.changes, StyleChangeFlags::INLINE_REMOVED);
        assert!(t.inline.length(StylePropertyId::Width).is_null());
        assert!(!t.width(Styled::null()), "already unset");
    }

    #[test]
    fn keywords_are_stored_and_read_back() {
        let mut t = Target::new();
        t.computed.width = Length::px(10.0);
        assert!(t.width(Styled::keyword(StyleKeyword::Auto)));
        assert!(t.computed.width.is_auto());
        assert_eq!(
            t.inline.length(StylePropertyId::Width).keyword,
            StyleKeyword::Auto
        );
    }

    #[test]
    fn wrong_kind_is_rejected() {
        let mut t = Target::new();
        let changed = t.inline.set_color(
            StylePropertyId::Width,
            Color::WHITE.into(),
            &mut t.computed,
            None,
            &mut t.changes,
        );
        assert!(!changed, "width is not a color");
        assert!(t.inline.values().is_empty());
        assert!(t.changes.is_empty());
    }

    #[test]
    fn cursor_follows_the_same_contract() {
        let mut t = Target::new();
        let cursor = Cursor {
            texture: Some(Resource::image("hand")),
            ..Cursor::default()
        };
        assert!(t.inline.set_cursor(cursor.clone().into(), &mut t.computed, &mut t.changes));
        assert_eq!(t.computed.cursor, cursor);
        assert!(t.changes.contains(StyleChangeFlags::REPAINT));
        assert!(!t.inline.set_cursor(cursor.into(), &mut t.computed, &mut t.changes));
        assert!(t.inline.set_cursor(Styled::null(), &mut t.computed, &mut t.changes));
        assert!(t.inline.cursor().is_null());
        assert!(!t.inline.set_cursor(Styled::null(), &mut t.computed, &mut t.changes));
    }

    #[test]
    fn plain_none_resource_is_the_none_keyword() {
        let mut t = Target::new();
        t.computed.background_image = Some(Resource::image("old"));
        assert!(t.inline.set_resource(
            StylePropertyId::BackgroundImage,
            Styled::new(None),
            &mut t.computed,
            None,
            &mut t.changes,
        ));
        assert_eq!(t.computed.background_image, None);
        assert_eq!(
            t.inline.resource(StylePropertyId::BackgroundImage).keyword,
            StyleKeyword::None
        );
    }
}
