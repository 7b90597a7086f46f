// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Style value types.
//!
//! A [`StyleValue`] is one property assignment: the property, a
//! [`StyleKeyword`], and a payload. Typed APIs use [`Styled<T>`], a value
//! paired with its keyword.

use alloc::rc::Rc;
use alloc::string::String;
use core::fmt;

use kurbo::Point;

use crate::id::StylePropertyId;

/// Keyword accompanying a style value.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum StyleKeyword {
    /// No keyword; the payload is the value.
    #[default]
    Undefined,
    /// Unset: the assignment is removed.
    Null,
    /// `auto`
    Auto,
    /// `none`
    None,
    /// `initial`
    Initial,
    /// `inherit`
    Inherit,
}

/// Unit of a [`Length`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum LengthUnit {
    /// Device-independent pixels.
    #[default]
    Pixel,
    /// Percentage of the containing length.
    Percent,
    /// `auto`
    Auto,
    /// `none`
    None,
}

/// A length with its unit.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Length {
    /// Magnitude; ignored for `Auto` and `None`.
    pub value: f32,
    /// Unit of `value`.
    pub unit: LengthUnit,
}

impl Length {
    /// A length in pixels.
    #[must_use]
    pub const fn px(value: f32) -> Self {
        Self {
            value,
            unit: LengthUnit::Pixel,
        }
    }

    /// A percentage.
    #[must_use]
    pub const fn percent(value: f32) -> Self {
        Self {
            value,
            unit: LengthUnit::Percent,
        }
    }

    /// `auto`
    #[must_use]
    pub const fn auto() -> Self {
        Self {
            value: 0.0,
            unit: LengthUnit::Auto,
        }
    }

    /// `none`
    #[must_use]
    pub const fn none() -> Self {
        Self {
            value: 0.0,
            unit: LengthUnit::None,
        }
    }

    /// Returns `true` for `auto`.
    #[must_use]
    pub const fn is_auto(&self) -> bool {
        matches!(self.unit, LengthUnit::Auto)
    }

    /// Returns `true` for `none`.
    #[must_use]
    pub const fn is_none(&self) -> bool {
        matches!(self.unit, LengthUnit::None)
    }
}

/// Linear RGBA color with components in `0.0..=1.0`.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Color {
    /// Red.
    pub r: f32,
    /// Green.
    pub g: f32,
    /// Blue.
    pub b: f32,
    /// Alpha.
    pub a: f32,
}

impl Color {
    /// Opaque black.
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0, 1.0);
    /// Opaque white.
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0, 1.0);
    /// Fully transparent.
    pub const CLEAR: Self = Self::new(0.0, 0.0, 0.0, 0.0);

    /// Creates a color from components.
    #[must_use]
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }
}

/// `display`
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Display {
    /// Laid out as a flex item.
    #[default]
    Flex,
    /// Not laid out or drawn.
    None,
}

/// `visibility`
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Visibility {
    /// Drawn.
    #[default]
    Visible,
    /// Laid out but not drawn.
    Hidden,
}

macro_rules! int_enum {
    ($ty:ident { $($variant:ident = $idx:literal => $name:literal),+ $(,)? }) => {
        impl $ty {
            /// Integer encoding used in style values.
            #[must_use]
            pub const fn to_index(self) -> i32 {
                match self { $(Self::$variant => $idx),+ }
            }

            /// Decodes the integer encoding.
            #[must_use]
            pub const fn from_index(index: i32) -> Option<Self> {
                match index { $($idx => Some(Self::$variant),)+ _ => None }
            }

            /// Parses the style sheet keyword.
            #[must_use]
            pub fn from_name(name: &str) -> Option<Self> {
                match name { $($name => Some(Self::$variant),)+ _ => None }
            }
        }
    };
}

int_enum!(Display { Flex = 0 => "flex", None = 1 => "none" });
int_enum!(Visibility { Visible = 0 => "visible", Hidden = 1 => "hidden" });

/// What a [`Resource`] holds.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    /// A texture.
    Image,
    /// A font.
    Font,
}

/// A loaded image or font, shared by reference count.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Resource {
    kind: ResourceKind,
    name: String,
}

/// Shared handle to a [`Resource`]; dropping the last handle frees it.
pub type ResourceHandle = Rc<Resource>;

impl Resource {
    /// Creates a handle to a resource.
    pub fn new(kind: ResourceKind, name: impl Into<String>) -> ResourceHandle {
        Rc::new(Self {
            kind,
            name: name.into(),
        })
    }

    /// Creates a handle to an image.
    pub fn image(name: impl Into<String>) -> ResourceHandle {
        Self::new(ResourceKind::Image, name)
    }

    /// Creates a handle to a font.
    pub fn font(name: impl Into<String>) -> ResourceHandle {
        Self::new(ResourceKind::Font, name)
    }

    /// What the resource holds.
    #[must_use]
    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    /// Name or path the resource was loaded from.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Mouse cursor: an optional texture with hotspot, or a built-in cursor id.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Cursor {
    /// Custom cursor texture.
    pub texture: Option<ResourceHandle>,
    /// Hotspot within the texture.
    pub hotspot: Point,
    /// Built-in cursor used when there is no texture.
    pub default_cursor_id: i32,
}

/// Payload of a [`StyleValue`].
#[derive(Clone, Debug, Default, PartialEq)]
pub enum StyleValuePayload {
    /// Nothing; the keyword carries the meaning.
    #[default]
    None,
    /// A length.
    Length(Length),
    /// A number.
    Float(f32),
    /// An integer or enumeration index.
    Int(i32),
    /// A color.
    Color(Color),
    /// An image or font.
    Resource(ResourceHandle),
}

/// One property assignment.
#[derive(Clone, Debug, PartialEq)]
pub struct StyleValue {
    /// Assigned property.
    pub id: StylePropertyId,
    /// Keyword; [`StyleKeyword::Undefined`] means the payload applies.
    pub keyword: StyleKeyword,
    /// Assigned value.
    pub payload: StyleValuePayload,
}

impl StyleValue {
    /// Assigns a keyword with no payload.
    #[must_use]
    pub fn keyword(id: StylePropertyId, keyword: StyleKeyword) -> Self {
        Self {
            id,
            keyword,
            payload: StyleValuePayload::None,
        }
    }

    /// Assigns a length.
    #[must_use]
    pub fn length(id: StylePropertyId, length: Length) -> Self {
        Self::with_payload(id, StyleValuePayload::Length(length))
    }

    /// Assigns a number.
    #[must_use]
    pub fn float(id: StylePropertyId, value: f32) -> Self {
        Self::with_payload(id, StyleValuePayload::Float(value))
    }

    /// Assigns an integer.
    #[must_use]
    pub fn int(id: StylePropertyId, value: i32) -> Self {
        Self::with_payload(id, StyleValuePayload::Int(value))
    }

    /// Assigns a color.
    #[must_use]
    pub fn color(id: StylePropertyId, color: Color) -> Self {
        Self::with_payload(id, StyleValuePayload::Color(color))
    }

    /// Assigns an image or font.
    #[must_use]
    pub fn resource(id: StylePropertyId, resource: ResourceHandle) -> Self {
        Self::with_payload(id, StyleValuePayload::Resource(resource))
    }

    fn with_payload(id: StylePropertyId, payload: StyleValuePayload) -> Self {
        Self {
            id,
            keyword: StyleKeyword::Undefined,
            payload,
        }
    }
}

/// A typed value paired with its keyword.
#[derive(Clone, Default, PartialEq)]
pub struct Styled<T> {
    /// The value; meaningful when `keyword` is [`StyleKeyword::Undefined`].
    pub value: T,
    /// The keyword.
    pub keyword: StyleKeyword,
}

impl<T> Styled<T> {
    /// A plain value.
    pub const fn new(value: T) -> Self {
        Self {
            value,
            keyword: StyleKeyword::Undefined,
        }
    }

    /// Returns `true` when the keyword is [`StyleKeyword::Null`].
    pub fn is_null(&self) -> bool {
        self.keyword == StyleKeyword::Null
    }
}

impl<T: Default> Styled<T> {
    /// A keyword with a default value.
    #[must_use]
    pub fn keyword(keyword: StyleKeyword) -> Self {
        Self {
            value: T::default(),
            keyword,
        }
    }

    /// The unset keyword.
    #[must_use]
    pub fn null() -> Self {
        Self::keyword(StyleKeyword::Null)
    }
}

impl<T> From<T> for Styled<T> {
    fn from(value: T) -> Self {
        Self::new(value)
    }
}

impl<T: fmt::Debug> fmt::Debug for Styled<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.keyword {
            StyleKeyword::Undefined => self.value.fmt(f),
            keyword => keyword.fmt(f),
        }
    }
}

/// Styled [`Length`].
pub type StyleLength = Styled<Length>;
/// Styled number.
pub type StyleFloat = Styled<f32>;
/// Styled integer.
pub type StyleInt = Styled<i32>;
/// Styled [`Color`].
pub type StyleColor = Styled<Color>;
/// Styled image or font; `None` for no resource.
pub type StyleResource = Styled<Option<ResourceHandle>>;
/// Styled [`Cursor`].
pub type StyleCursor = Styled<Cursor>;
