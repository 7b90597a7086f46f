// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-element style state and the cascade that computes it.

use alloc::vec::Vec;

use kurbo::Rect;

use crate::computed::{ComputedStyle, ResolvedStyle};
use crate::error::StyleSheetError;
use crate::id::{StyleChangeFlags, StylePropertyId};
use crate::inline::{InlineRule, InlineStyleAccess};
use crate::sheet::StyleSheet;
use crate::value::{StyleColor, StyleCursor, StyleFloat, StyleInt, StyleLength, StyleResource};

/// A sheet rule whose selector matched an element.
#[derive(Clone, Copy, Debug)]
pub struct MatchedRule<'a> {
    /// Sheet holding the rule.
    pub sheet: &'a StyleSheet,
    /// Index of the rule in `sheet`.
    pub rule_index: usize,
    /// Specificity of the matching selector.
    pub specificity: i32,
}

/// Runs the cascade for one element.
///
/// Starts from the initial style with inherited properties taken from
/// `parent`, applies `matched` from lowest to highest specificity (ties keep
/// slice order), then applies the inline style.
pub fn compute_style(
    parent: Option<&ComputedStyle>,
    matched: &[MatchedRule<'_>],
    inline: &InlineStyleAccess,
) -> Result<ComputedStyle, StyleSheetError> {
    let mut style = parent.map_or_else(ComputedStyle::default, ComputedStyle::inherited_from);
    let mut ordered: Vec<&MatchedRule<'_>> = matched.iter().collect();
    ordered.sort_by_key(|m| m.specificity);
    for rule in ordered {
        for value in rule.sheet.style_values(rule.rule_index)? {
            style.apply_style_value(&value, parent);
        }
    }
    inline.apply_inline_styles(&mut style, parent)?;
    Ok(style)
}

/// Inline style, computed style and pending change flags of one element.
#[derive(Clone, Debug, Default)]
pub struct StyleElement {
    inline: InlineStyleAccess,
    computed: ComputedStyle,
    version: u64,
    pending: StyleChangeFlags,
}

impl StyleElement {
    /// Creates an element with the initial style.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inline style.
    #[must_use]
    pub fn inline(&self) -> &InlineStyleAccess {
        &self.inline
    }

    /// Computed style.
    #[must_use]
    pub fn computed(&self) -> &ComputedStyle {
        &self.computed
    }

    /// Resolved view, using `layout` for the final size when known.
    #[must_use]
    pub fn resolved(&self, layout: Option<Rect>) -> ResolvedStyle<'_> {
        ResolvedStyle::new(&self.computed, layout)
    }

    /// Bumped on every committed style change.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Changes not yet taken.
    #[must_use]
    pub fn pending(&self) -> StyleChangeFlags {
        self.pending
    }

    /// Returns and clears the pending changes.
    pub fn take_changes(&mut self) -> StyleChangeFlags {
        core::mem::take(&mut self.pending)
    }

    fn committed(&mut self, changed: bool) -> bool {
        if changed {
            self.version += 1;
        }
        changed
    }

    /// Sets or unsets an inline length.
    pub fn set_length(
        &mut self,
        id: StylePropertyId,
        value: StyleLength,
        parent: Option<&ComputedStyle>,
    ) -> bool {
        let changed =
            self.inline
                .set_length(id, value, &mut self.computed, parent, &mut self.pending);
        self.committed(changed)
    }

    /// Sets or unsets an inline number.
    pub fn set_float(
        &mut self,
        id: StylePropertyId,
        value: StyleFloat,
        parent: Option<&ComputedStyle>,
    ) -> bool {
        let changed =
            self.inline
                .set_float(id, value, &mut self.computed, parent, &mut self.pending);
        self.committed(changed)
    }

    /// Sets or unsets an inline integer.
    pub fn set_int(
        &mut self,
        id: StylePropertyId,
        value: StyleInt,
        parent: Option<&ComputedStyle>,
    ) -> bool {
        let changed = self
            .inline
            .set_int(id, value, &mut self.computed, parent, &mut self.pending);
        self.committed(changed)
    }

    /// Sets or unsets an inline color.
    pub fn set_color(
        &mut self,
        id: StylePropertyId,
        value: StyleColor,
        parent: Option<&ComputedStyle>,
    ) -> bool {
        let changed =
            self.inline
                .set_color(id, value, &mut self.computed, parent, &mut self.pending);
        self.committed(changed)
    }

    /// Sets or unsets an inline resource.
    pub fn set_resource(
        &mut self,
        id: StylePropertyId,
        value: StyleResource,
        parent: Option<&ComputedStyle>,
    ) -> bool {
        let changed =
            self.inline
                .set_resource(id, value, &mut self.computed, parent, &mut self.pending);
        self.committed(changed)
    }

    /// Sets or unsets the inline cursor.
    pub fn set_cursor(&mut self, value: StyleCursor) -> bool {
        let changed = self
            .inline
            .set_cursor(value, &mut self.computed, &mut self.pending);
        self.committed(changed)
    }

    /// Replaces the inline rule. The cascade must run again.
    pub fn set_inline_rule(&mut self, rule: Option<InlineRule>) {
        self.inline.set_inline_rule(rule);
        self.pending |= StyleChangeFlags::all();
        self.version += 1;
    }

    /// Reruns the cascade and stores the result.
    pub fn recompute(
        &mut self,
        parent: Option<&ComputedStyle>,
        matched: &[MatchedRule<'_>],
    ) -> Result<(), StyleSheetError> {
        let computed = compute_style(parent, matched, &self.inline)?;
        if computed != self.computed {
            self.pending |= StyleChangeFlags::STYLES;
        }
        self.computed = computed;
        self.pending.remove(StyleChangeFlags::INLINE_REMOVED);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{Length, Resource, Styled};
    use alloc::rc::Rc;

    #[test]
    fn unset_resource_is_released_after_recompute() {
        let image = Resource::image("banner");
        let mut element = StyleElement::new();
        assert!(element.set_resource(
            StylePropertyId::BackgroundImage,
            Styled::new(Some(image.clone())),
            None,
        ));
        assert_eq!(Rc::strong_count(&image), 3);

        assert!(element.set_resource(StylePropertyId::BackgroundImage, Styled::null(), None));
        assert_eq!(Rc::strong_count(&image), 2, "computed style still holds it");
        assert!(element.pending().contains(StyleChangeFlags::INLINE_REMOVED));

        element.recompute(None, &[]).unwrap();
        assert_eq!(Rc::strong_count(&image), 1);
        assert!(!element.pending().contains(StyleChangeFlags::INLINE_REMOVED));
    }

    #[test]
    fn version_moves_only_on_change() {
        let mut element = StyleElement::new();
        assert!(element.set_length(StylePropertyId::Height, Length::px(5.0).into(), None));
        assert!(!element.set_length(StylePropertyId::Height, Length::px(5.0).into(), None));
        assert_eq!(element.version(), 1);
        assert_eq!(
            element.take_changes(),
            StyleChangeFlags::STYLES | StyleChangeFlags::LAYOUT
        );
        assert!(element.pending().is_empty());
        assert_eq!(element.resolved(None).height(), 5.0);
    }
}
