// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Style property identifiers and change flags.

/// Value shape a property stores.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PropertyKind {
    /// A [`Length`](crate::Length).
    Length,
    /// A plain number.
    Float,
    /// An integer, also used for enumerations.
    Int,
    /// A [`Color`](crate::Color).
    Color,
    /// An image or font handle.
    Resource,
    /// A [`Cursor`](crate::Cursor).
    Cursor,
}

/// Style properties understood by the cascade.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StylePropertyId {
    /// `width`
    Width,
    /// `height`
    Height,
    /// `min-width`
    MinWidth,
    /// `max-width`
    MaxWidth,
    /// `font-size`
    FontSize,
    /// `border-width`
    BorderWidth,
    /// `flex-grow`
    FlexGrow,
    /// `flex-shrink`
    FlexShrink,
    /// `opacity`
    Opacity,
    /// `color`
    Color,
    /// `background-color`
    BackgroundColor,
    /// `border-color`
    BorderColor,
    /// `background-image`
    BackgroundImage,
    /// `-unity-font`
    Font,
    /// `-unity-slice-left`
    SliceLeft,
    /// `display`
    Display,
    /// `visibility`
    Visibility,
    /// `cursor`
    Cursor,
}

impl StylePropertyId {
    /// Every property, in declaration order.
    pub const ALL: [Self; 18] = [
        Self::Width,
        Self::Height,
        Self::MinWidth,
        Self::MaxWidth,
        Self::FontSize,
        Self::BorderWidth,
        Self::FlexGrow,
        Self::FlexShrink,
        Self::Opacity,
        Self::Color,
        Self::BackgroundColor,
        Self::BorderColor,
        Self::BackgroundImage,
        Self::Font,
        Self::SliceLeft,
        Self::Display,
        Self::Visibility,
        Self::Cursor,
    ];

    /// Style sheet name of the property.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Width => "width",
            Self::Height => "height",
            Self::MinWidth => "min-width",
            Self::MaxWidth => "max-width",
            Self::FontSize => "font-size",
            Self::BorderWidth => "border-width",
            Self::FlexGrow => "flex-grow",
            Self::FlexShrink => "flex-shrink",
            Self::Opacity => "opacity",
            Self::Color => "color",
            Self::BackgroundColor => "background-color",
            Self::BorderColor => "border-color",
            Self::BackgroundImage => "background-image",
            Self::Font => "-unity-font",
            Self::SliceLeft => "-unity-slice-left",
            Self::Display => "display",
            Self::Visibility => "visibility",
            Self::Cursor => "cursor",
        }
    }

    /// Looks a property up by its style sheet name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|id| id.name() == name)
    }

    /// Value shape of the property.
    #[must_use]
    pub const fn kind(self) -> PropertyKind {
        match self {
            Self::Width | Self::Height | Self::MinWidth | Self::MaxWidth | Self::FontSize => {
                PropertyKind::Length
            }
            Self::BorderWidth | Self::FlexGrow | Self::FlexShrink | Self::Opacity => {
                PropertyKind::Float
            }
            Self::Color | Self::BackgroundColor | Self::BorderColor => PropertyKind::Color,
            Self::BackgroundImage | Self::Font => PropertyKind::Resource,
            Self::SliceLeft | Self::Display | Self::Visibility => PropertyKind::Int,
            Self::Cursor => PropertyKind::Cursor,
        }
    }

    /// Whether children take the parent's value unless told otherwise.
    #[must_use]
    pub const fn inherits(self) -> bool {
        matches!(
            self,
            Self::Color | Self::FontSize | Self::Font | Self::Visibility
        )
    }

    /// Work a change to this property causes.
    #[must_use]
    pub const fn change_flags(self) -> StyleChangeFlags {
        match self {
            Self::Width
            | Self::Height
            | Self::MinWidth
            | Self::MaxWidth
            | Self::FontSize
            | Self::BorderWidth
            | Self::FlexGrow
            | Self::FlexShrink
            | Self::Font
            | Self::Display => StyleChangeFlags::LAYOUT,
            Self::Opacity
            | Self::Color
            | Self::BackgroundColor
            | Self::BorderColor
            | Self::BackgroundImage
            | Self::SliceLeft
            | Self::Visibility
            | Self::Cursor => StyleChangeFlags::REPAINT,
        }
    }

    /// Value grammar of the property, in style sheet syntax notation.
    #[must_use]
    pub const fn syntax(self) -> &'static str {
        match self {
            Self::Width | Self::Height | Self::MinWidth => "<length> | <percentage> | auto",
            Self::MaxWidth => "<length> | <percentage> | none",
            Self::FontSize => "<length> | <percentage>",
            Self::BorderWidth | Self::Opacity => "<number>",
            Self::FlexGrow | Self::FlexShrink => "<number>",
            Self::Color | Self::BackgroundColor | Self::BorderColor => "<color>",
            Self::BackgroundImage => "<resource> | <url> | none",
            Self::Font => "<resource> | <url>",
            Self::SliceLeft => "<integer>",
            Self::Display => "flex | none",
            Self::Visibility => "visible | hidden",
            Self::Cursor => "[ [ <resource> | <url> ] [ <integer> <integer> ]? , ]? <cursor-name>",
        }
    }
}

bitflags::bitflags! {
    /// What a style change requires of the element.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct StyleChangeFlags: u8 {
        /// The computed style changed.
        const STYLES = 1 << 0;
        /// Layout must be recomputed.
        const LAYOUT = 1 << 1;
        /// The element must be repainted.
        const REPAINT = 1 << 2;
        /// An inline value was removed; the full cascade must run again.
        const INLINE_REMOVED = 1 << 3;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip() {
        for id in StylePropertyId::ALL {
            assert_eq!(StylePropertyId::from_name(id.name()), Some(id));
        }
        assert_eq!(StylePropertyId::from_name("margin"), None);
    }

    #[test]
    fn layout_and_repaint_partition_properties() {
        for id in StylePropertyId::ALL {
            let flags = id.change_flags();
            assert!(
                flags == StyleChangeFlags::LAYOUT || flags == StyleChangeFlags::REPAINT,
                "{id:?} has {flags:?}"
            );
        }
    }
}
