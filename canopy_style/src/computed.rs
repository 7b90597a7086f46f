// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Computed style records and their read-only resolved view.

use kurbo::Rect;

use crate::id::{PropertyKind, StylePropertyId};
use crate::value::{
    Color, Cursor, Display, Length, ResourceHandle, StyleCursor, StyleKeyword, StyleValue,
    StyleValuePayload, Visibility,
};

/// Per-element result of the cascade.
///
/// `Default` is the initial style: the value every property has before any
/// sheet, inheritance or inline value applies.
#[derive(Clone, Debug, PartialEq)]
pub struct ComputedStyle {
    /// `width`
    pub width: Length,
    /// `height`
    pub height: Length,
    /// `min-width`
    pub min_width: Length,
    /// `max-width`
    pub max_width: Length,
    /// `font-size`
    pub font_size: Length,
    /// `border-width`
    pub border_width: f32,
    /// `flex-grow`
    pub flex_grow: f32,
    /// `flex-shrink`
    pub flex_shrink: f32,
    /// `opacity`
    pub opacity: f32,
    /// `color`
    pub color: Color,
    /// `background-color`
    pub background_color: Color,
    /// `border-color`
    pub border_color: Color,
    /// `background-image`
    pub background_image: Option<ResourceHandle>,
    /// `-unity-font`
    pub font: Option<ResourceHandle>,
    /// `-unity-slice-left`
    pub slice_left: i32,
    /// `display`
    pub display: Display,
    /// `visibility`
    pub visibility: Visibility,
    /// `cursor`
    pub cursor: Cursor,
}

impl Default for ComputedStyle {
    fn default() -> Self {
        Self {
            width: Length::auto(),
            height: Length::auto(),
            min_width: Length::auto(),
            max_width: Length::none(),
            font_size: Length::px(12.0),
            border_width: 0.0,
            flex_grow: 0.0,
            flex_shrink: 1.0,
            opacity: 1.0,
            color: Color::BLACK,
            background_color: Color::CLEAR,
            border_color: Color::CLEAR,
            background_image: None,
            font: None,
            slice_left: 0,
            display: Display::Flex,
            visibility: Visibility::Visible,
            cursor: Cursor::default(),
        }
    }
}

impl ComputedStyle {
    /// Initial style with the inherited properties taken from `parent`.
    #[must_use]
    pub fn inherited_from(parent: &Self) -> Self {
        let mut style = Self::default();
        for id in StylePropertyId::ALL {
            if id.inherits() {
                style.copy_property(id, parent);
            }
        }
        style
    }

    /// Copies one property's value from `source`.
    pub fn copy_property(&mut self, id: StylePropertyId, source: &Self) {
        match id {
            StylePropertyId::Width => self.width = source.width,
            StylePropertyId::Height => self.height = source.height,
            StylePropertyId::MinWidth => self.min_width = source.min_width,
            StylePropertyId::MaxWidth => self.max_width = source.max_width,
            StylePropertyId::FontSize => self.font_size = source.font_size,
            StylePropertyId::BorderWidth => self.border_width = source.border_width,
            StylePropertyId::FlexGrow => self.flex_grow = source.flex_grow,
            StylePropertyId::FlexShrink => self.flex_shrink = source.flex_shrink,
            StylePropertyId::Opacity => self.opacity = source.opacity,
            StylePropertyId::Color => self.color = source.color,
            StylePropertyId::BackgroundColor => self.background_color = source.background_color,
            StylePropertyId::BorderColor => self.border_color = source.border_color,
            StylePropertyId::BackgroundImage => {
                self.background_image.clone_from(&source.background_image);
            }
            StylePropertyId::Font => self.font.clone_from(&source.font),
            StylePropertyId::SliceLeft => self.slice_left = source.slice_left,
            StylePropertyId::Display => self.display = source.display,
            StylePropertyId::Visibility => self.visibility = source.visibility,
            StylePropertyId::Cursor => self.cursor.clone_from(&source.cursor),
        }
    }

    /// Resets one property to its initial value.
    pub fn apply_initial(&mut self, id: StylePropertyId) {
        self.copy_property(id, &Self::default());
    }

    /// Takes one property from `parent`, or its initial value without a parent.
    pub fn inherit(&mut self, id: StylePropertyId, parent: Option<&Self>) {
        match parent {
            Some(parent) => self.copy_property(id, parent),
            None => self.apply_initial(id),
        }
    }

    /// Applies one assignment. `inherit` resolves against `parent`.
    pub fn apply_style_value(&mut self, value: &StyleValue, parent: Option<&Self>) {
        let id = value.id;
        match value.keyword {
            StyleKeyword::Null => {}
            StyleKeyword::Initial => self.apply_initial(id),
            StyleKeyword::Inherit => self.inherit(id, parent),
            StyleKeyword::Auto if id.kind() == PropertyKind::Length => {
                if let Some(slot) = self.length_mut(id) {
                    *slot = Length::auto();
                }
            }
            StyleKeyword::None if id.kind() == PropertyKind::Length => {
                if let Some(slot) = self.length_mut(id) {
                    *slot = Length::none();
                }
            }
            StyleKeyword::None if id.kind() == PropertyKind::Resource => {
                if let Some(slot) = self.resource_mut(id) {
                    *slot = None;
                }
            }
            StyleKeyword::Auto | StyleKeyword::None => self.apply_initial(id),
            StyleKeyword::Undefined => {
                if !self.apply_payload(id, &value.payload) {
                    tracing::debug!(?id, payload = ?value.payload, "payload does not fit property");
                }
            }
        }
    }

    /// Applies the inline cursor.
    pub fn apply_cursor(&mut self, cursor: &StyleCursor) {
        match cursor.keyword {
            StyleKeyword::Null => {}
            StyleKeyword::Undefined => self.cursor.clone_from(&cursor.value),
            _ => self.apply_initial(StylePropertyId::Cursor),
        }
    }

    fn apply_payload(&mut self, id: StylePropertyId, payload: &StyleValuePayload) -> bool {
        match payload {
            StyleValuePayload::None => false,
            StyleValuePayload::Length(length) => {
                self.length_mut(id).map(|s| *s = *length).is_some()
            }
            StyleValuePayload::Float(value) => self.float_mut(id).map(|s| *s = *value).is_some(),
            StyleValuePayload::Color(color) => self.color_mut(id).map(|s| *s = *color).is_some(),
            StyleValuePayload::Resource(handle) => self
                .resource_mut(id)
                .map(|s| *s = Some(handle.clone()))
                .is_some(),
            StyleValuePayload::Int(value) => self.set_int(id, *value),
        }
    }

    fn set_int(&mut self, id: StylePropertyId, value: i32) -> bool {
        match id {
            StylePropertyId::SliceLeft => self.slice_left = value,
            StylePropertyId::Display => {
                self.display = Display::from_index(value).unwrap_or_default();
            }
            StylePropertyId::Visibility => {
                self.visibility = Visibility::from_index(value).unwrap_or_default();
            }
            _ => return false,
        }
        true
    }

    fn length_mut(&mut self, id: StylePropertyId) -> Option<&mut Length> {
        Some(match id {
            StylePropertyId::Width => &mut self.width,
            StylePropertyId::Height => &mut self.height,
            StylePropertyId::MinWidth => &mut self.min_width,
            StylePropertyId::MaxWidth => &mut self.max_width,
            StylePropertyId::FontSize => &mut self.font_size,
            _ => return None,
        })
    }

    fn float_mut(&mut self, id: StylePropertyId) -> Option<&mut f32> {
        Some(match id {
            StylePropertyId::BorderWidth => &mut self.border_width,
            StylePropertyId::FlexGrow => &mut self.flex_grow,
            StylePropertyId::FlexShrink => &mut self.flex_shrink,
            StylePropertyId::Opacity => &mut self.opacity,
            _ => return None,
        })
    }

    fn color_mut(&mut self, id: StylePropertyId) -> Option<&mut Color> {
        Some(match id {
            StylePropertyId::Color => &mut self.color,
            StylePropertyId::BackgroundColor => &mut self.background_color,
            StylePropertyId::BorderColor => &mut self.border_color,
            _ => return None,
        })
    }

    fn resource_mut(&mut self, id: StylePropertyId) -> Option<&mut Option<ResourceHandle>> {
        Some(match id {
            StylePropertyId::BackgroundImage => &mut self.background_image,
            StylePropertyId::Font => &mut self.font,
            _ => return None,
        })
    }
}

/// Read-only view of a computed style, with final layout where known.
///
/// Layout, when present, is authoritative for `width` and `height`.
/// Without layout, pixel lengths are reported as-is and any other length
/// reads as `NaN`.
#[derive(Clone, Copy, Debug)]
pub struct ResolvedStyle<'a> {
    computed: &'a ComputedStyle,
    layout: Option<Rect>,
}

impl<'a> ResolvedStyle<'a> {
    /// Wraps a computed style and its element's layout rectangle.
    #[must_use]
    pub fn new(computed: &'a ComputedStyle, layout: Option<Rect>) -> Self {
        Self { computed, layout }
    }

    /// The underlying computed style.
    #[must_use]
    pub fn computed(&self) -> &'a ComputedStyle {
        self.computed
    }

    #[expect(
        clippy::cast_possible_truncation,
        reason = "layout values are well within f32 range"
    )]
    fn from_layout(value: f64) -> f32 {
        value as f32
    }

    fn pixels(length: Length) -> f32 {
        match length.unit {
            crate::value::LengthUnit::Pixel => length.value,
            _ => f32::NAN,
        }
    }

    /// Final width.
    #[must_use]
    pub fn width(&self) -> f32 {
        self.layout.map_or_else(
            || Self::pixels(self.computed.width),
            |rect| Self::from_layout(rect.width()),
        )
    }

    /// Final height.
    #[must_use]
    pub fn height(&self) -> f32 {
        self.layout.map_or_else(
            || Self::pixels(self.computed.height),
            |rect| Self::from_layout(rect.height()),
        )
    }

    /// Minimum width.
    #[must_use]
    pub fn min_width(&self) -> Length {
        self.computed.min_width
    }

    /// Maximum width.
    #[must_use]
    pub fn max_width(&self) -> Length {
        self.computed.max_width
    }

    /// Font size in pixels.
    #[must_use]
    pub fn font_size(&self) -> f32 {
        Self::pixels(self.computed.font_size)
    }

    /// Border width.
    #[must_use]
    pub fn border_width(&self) -> f32 {
        self.computed.border_width
    }

    /// Flex grow factor.
    #[must_use]
    pub fn flex_grow(&self) -> f32 {
        self.computed.flex_grow
    }

    /// Flex shrink factor.
    #[must_use]
    pub fn flex_shrink(&self) -> f32 {
        self.computed.flex_shrink
    }

    /// Opacity.
    #[must_use]
    pub fn opacity(&self) -> f32 {
        self.computed.opacity
    }

    /// Text color.
    #[must_use]
    pub fn color(&self) -> Color {
        self.computed.color
    }

    /// Background color.
    #[must_use]
    pub fn background_color(&self) -> Color {
        self.computed.background_color
    }

    /// Border color.
    #[must_use]
    pub fn border_color(&self) -> Color {
        self.computed.border_color
    }

    /// Background image.
    #[must_use]
    pub fn background_image(&self) -> Option<&'a ResourceHandle> {
        self.computed.background_image.as_ref()
    }

    /// Font.
    #[must_use]
    pub fn font(&self) -> Option<&'a ResourceHandle> {
        self.computed.font.as_ref()
    }

    /// Left slice of a nine-sliced background.
    #[must_use]
    pub fn slice_left(&self) -> i32 {
        self.computed.slice_left
    }

    /// Display mode.
    #[must_use]
    pub fn display(&self) -> Display {
        self.computed.display
    }

    /// Visibility.
    #[must_use]
    pub fn visibility(&self) -> Visibility {
        self.computed.visibility
    }
}
