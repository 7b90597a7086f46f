// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pooled style sheets.
//!
//! A [`StyleSheet`] stores every literal value in a typed pool. Properties
//! refer to values through [`StyleValueHandle`]s, a type tag plus an index
//! into the pool for that type. Sheets are produced by
//! [`StyleSheetBuilder`](crate::StyleSheetBuilder) and read back with the
//! typed `read_*` methods, which check the tag before indexing.

use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;

use crate::error::StyleSheetError;
use crate::id::{PropertyKind, StylePropertyId};
use crate::value::{
    Color, Display, Length, Resource, ResourceHandle, ResourceKind, StyleKeyword, StyleValue,
    Visibility,
};

/// Type tag of a [`StyleValueHandle`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum StyleValueType {
    /// A [`StyleValueKeyword`]; the index is the keyword itself.
    Keyword,
    /// A number in the float pool.
    Float,
    /// A [`Dimension`] in the dimension pool.
    Dimension,
    /// A [`Color`] in the color pool.
    Color,
    /// A resource path in the string pool.
    ResourcePath,
    /// A loaded resource in the asset pool.
    AssetReference,
    /// An enumeration name in the string pool.
    Enum,
    /// A variable name in the string pool.
    Variable,
    /// A quoted string in the string pool.
    String,
    /// A [`StyleValueFunction`]; the index is the function itself.
    Function,
    /// Separator between comma separated values.
    CommaSeparator,
    /// A [`ScalableImage`] in its pool.
    ScalableImage,
}

/// Reference to one value of a [`StyleSheet`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct StyleValueHandle {
    /// Pool the value lives in.
    pub value_type: StyleValueType,
    /// Index into the pool.
    pub value_index: u32,
}

impl StyleValueHandle {
    /// Creates a handle.
    #[must_use]
    pub const fn new(value_type: StyleValueType, value_index: u32) -> Self {
        Self {
            value_type,
            value_index,
        }
    }
}

/// Keywords a sheet can store.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum StyleValueKeyword {
    /// `inherit`
    Inherit,
    /// `initial`
    Initial,
    /// `auto`
    Auto,
    /// `unset`
    Unset,
    /// `true`
    True,
    /// `false`
    False,
    /// `none`
    None,
}

impl StyleValueKeyword {
    const ALL: [Self; 7] = [
        Self::Inherit,
        Self::Initial,
        Self::Auto,
        Self::Unset,
        Self::True,
        Self::False,
        Self::None,
    ];

    /// Index stored in a keyword handle.
    #[must_use]
    pub const fn to_index(self) -> u32 {
        self as u32
    }

    /// Decodes a keyword handle index.
    #[must_use]
    pub fn from_index(index: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.to_index() == index)
    }
}

/// Functions a sheet can store.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum StyleValueFunction {
    /// An unrecognized function.
    Unknown,
    /// `var()`
    Var,
    /// `env()`
    Env,
    /// `linear-gradient()`
    LinearGradient,
}

impl StyleValueFunction {
    const ALL: [Self; 4] = [Self::Unknown, Self::Var, Self::Env, Self::LinearGradient];

    /// Index stored in a function handle.
    #[must_use]
    pub const fn to_index(self) -> u32 {
        self as u32
    }

    /// Decodes a function handle index.
    #[must_use]
    pub fn from_index(index: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.to_index() == index)
    }
}

/// Unit of a [`Dimension`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum DimensionUnit {
    /// A plain number.
    #[default]
    Unitless,
    /// `px`
    Pixel,
    /// `%`
    Percent,
    /// `s`
    Second,
    /// `ms`
    Millisecond,
    /// `deg`
    Degree,
    /// `grad`
    Gradian,
    /// `rad`
    Radian,
    /// `turn`
    Turn,
}

/// A number with a unit.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Dimension {
    /// Magnitude.
    pub value: f32,
    /// Unit.
    pub unit: DimensionUnit,
}

impl Dimension {
    /// Creates a dimension.
    #[must_use]
    pub const fn new(value: f32, unit: DimensionUnit) -> Self {
        Self { value, unit }
    }

    /// Converts to a [`Length`] when the unit is a length unit.
    #[must_use]
    pub fn to_length(self) -> Option<Length> {
        match self.unit {
            DimensionUnit::Unitless | DimensionUnit::Pixel => Some(Length::px(self.value)),
            DimensionUnit::Percent => Some(Length::percent(self.value)),
            _ => None,
        }
    }
}

/// Image with an optional high resolution variant.
#[derive(Clone, Debug, PartialEq)]
pub struct ScalableImage {
    /// Image used at normal density.
    pub normal: ResourceHandle,
    /// Image used on high density displays.
    pub high_resolution: Option<ResourceHandle>,
}

/// One declaration: a property name and its values.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StyleProperty {
    /// Property name as written.
    pub name: String,
    /// Source line.
    pub line: u32,
    /// Values in source order.
    pub values: Vec<StyleValueHandle>,
    /// Set when a value refers to a variable.
    pub requires_variable_resolve: bool,
}

/// A block of declarations.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StyleRule {
    /// Declarations in source order.
    pub properties: Vec<StyleProperty>,
    /// Source line.
    pub line: u32,
}

/// Kind of a [`StyleSelectorPart`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum StyleSelectorType {
    /// `*`
    Wildcard,
    /// Element type name.
    Type,
    /// `.class`
    Class,
    /// `:pseudo`
    PseudoClass,
    /// Pseudo class that also matches ancestors.
    RecursivePseudoClass,
    /// `#id`
    Id,
    /// Application predicate.
    Predicate,
}

/// One simple selector component.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct StyleSelectorPart {
    /// Component kind.
    pub selector_type: StyleSelectorType,
    /// Name matched against.
    pub value: String,
}

impl StyleSelectorPart {
    /// Creates a part.
    pub fn new(selector_type: StyleSelectorType, value: impl Into<String>) -> Self {
        Self {
            selector_type,
            value: value.into(),
        }
    }
}

/// How a simple selector relates to the one before it.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum StyleSelectorRelationship {
    /// First selector of the chain.
    #[default]
    None,
    /// `a > b`
    Child,
    /// `a b`
    Descendent,
}

/// A compound selector.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StyleSelector {
    /// Components that must all match.
    pub parts: Vec<StyleSelectorPart>,
    /// Relationship to the previous selector.
    pub previous_relationship: StyleSelectorRelationship,
}

/// A chain of selectors pointing at a rule.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StyleComplexSelector {
    /// Precedence of the selector.
    pub specificity: i32,
    /// Selectors from outermost to the subject.
    pub selectors: Vec<StyleSelector>,
    /// Rule the selector applies.
    pub rule_index: usize,
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "pools are addressed by u32 handles"
)]
pub(crate) fn pool_index(len: usize) -> u32 {
    len as u32
}

/// Rules, selectors and value pools of one style sheet.
#[derive(Clone, Debug, Default)]
pub struct StyleSheet {
    pub(crate) rules: Vec<StyleRule>,
    pub(crate) complex_selectors: Vec<StyleComplexSelector>,
    pub(crate) floats: Vec<f32>,
    pub(crate) dimensions: Vec<Dimension>,
    pub(crate) colors: Vec<Color>,
    pub(crate) strings: Vec<String>,
    pub(crate) assets: Vec<ResourceHandle>,
    pub(crate) scalable_images: Vec<ScalableImage>,
    pub(crate) imports: Vec<Rc<StyleSheet>>,
}

impl StyleSheet {
    /// Creates an empty sheet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rules in order.
    #[must_use]
    pub fn rules(&self) -> &[StyleRule] {
        &self.rules
    }

    /// Returns one rule.
    pub fn rule(&self, index: usize) -> Result<&StyleRule, StyleSheetError> {
        self.rules.get(index).ok_or(StyleSheetError::RuleOutOfRange {
            index,
            len: self.rules.len(),
        })
    }

    /// Complex selectors in order.
    #[must_use]
    pub fn complex_selectors(&self) -> &[StyleComplexSelector] {
        &self.complex_selectors
    }

    /// Float pool.
    #[must_use]
    pub fn floats(&self) -> &[f32] {
        &self.floats
    }

    /// Dimension pool.
    #[must_use]
    pub fn dimensions(&self) -> &[Dimension] {
        &self.dimensions
    }

    /// Color pool.
    #[must_use]
    pub fn colors(&self) -> &[Color] {
        &self.colors
    }

    /// String pool, shared by strings, enums, variables and resource paths.
    #[must_use]
    pub fn strings(&self) -> &[String] {
        &self.strings
    }

    /// Asset pool.
    #[must_use]
    pub fn assets(&self) -> &[ResourceHandle] {
        &self.assets
    }

    /// Scalable image pool.
    #[must_use]
    pub fn scalable_images(&self) -> &[ScalableImage] {
        &self.scalable_images
    }

    /// Sheets whose content was flattened into this one.
    #[must_use]
    pub fn imports(&self) -> &[Rc<Self>] {
        &self.imports
    }

    /// Highest specificity among the selectors of a rule.
    #[must_use]
    pub fn rule_specificity(&self, rule_index: usize) -> Option<i32> {
        self.complex_selectors
            .iter()
            .filter(|s| s.rule_index == rule_index)
            .map(|s| s.specificity)
            .max()
    }

    fn check(
        handle: StyleValueHandle,
        expected: StyleValueType,
    ) -> Result<usize, StyleSheetError> {
        if handle.value_type == expected {
            Ok(handle.value_index as usize)
        } else {
            Err(StyleSheetError::TypeMismatch {
                expected,
                actual: handle.value_type,
            })
        }
    }

    fn pooled<T>(
        pool: &[T],
        handle: StyleValueHandle,
        index: usize,
    ) -> Result<&T, StyleSheetError> {
        pool.get(index).ok_or(StyleSheetError::HandleOutOfRange {
            value_type: handle.value_type,
            index: handle.value_index,
        })
    }

    /// Reads a keyword.
    pub fn read_keyword(
        &self,
        handle: StyleValueHandle,
    ) -> Result<StyleValueKeyword, StyleSheetError> {
        Self::check(handle, StyleValueType::Keyword)?;
        StyleValueKeyword::from_index(handle.value_index).ok_or(
            StyleSheetError::HandleOutOfRange {
                value_type: handle.value_type,
                index: handle.value_index,
            },
        )
    }

    /// Reads a function.
    pub fn read_function(
        &self,
        handle: StyleValueHandle,
    ) -> Result<StyleValueFunction, StyleSheetError> {
        Self::check(handle, StyleValueType::Function)?;
        StyleValueFunction::from_index(handle.value_index).ok_or(
            StyleSheetError::HandleOutOfRange {
                value_type: handle.value_type,
                index: handle.value_index,
            },
        )
    }

    /// Reads a number.
    pub fn read_float(&self, handle: StyleValueHandle) -> Result<f32, StyleSheetError> {
        let index = Self::check(handle, StyleValueType::Float)?;
        Self::pooled(&self.floats, handle, index).copied()
    }

    /// Reads a dimension. Numbers read as unitless dimensions.
    pub fn read_dimension(&self, handle: StyleValueHandle) -> Result<Dimension, StyleSheetError> {
        if handle.value_type == StyleValueType::Float {
            let value = self.read_float(handle)?;
            return Ok(Dimension::new(value, DimensionUnit::Unitless));
        }
        let index = Self::check(handle, StyleValueType::Dimension)?;
        Self::pooled(&self.dimensions, handle, index).copied()
    }

    /// Reads a color.
    pub fn read_color(&self, handle: StyleValueHandle) -> Result<Color, StyleSheetError> {
        let index = Self::check(handle, StyleValueType::Color)?;
        Self::pooled(&self.colors, handle, index).copied()
    }

    fn read_str(
        &self,
        handle: StyleValueHandle,
        expected: StyleValueType,
    ) -> Result<&str, StyleSheetError> {
        let index = Self::check(handle, expected)?;
        Self::pooled(&self.strings, handle, index).map(String::as_str)
    }

    /// Reads a quoted string.
    pub fn read_string(&self, handle: StyleValueHandle) -> Result<&str, StyleSheetError> {
        self.read_str(handle, StyleValueType::String)
    }

    /// Reads an enumeration name.
    pub fn read_enum(&self, handle: StyleValueHandle) -> Result<&str, StyleSheetError> {
        self.read_str(handle, StyleValueType::Enum)
    }

    /// Reads a variable name.
    pub fn read_variable(&self, handle: StyleValueHandle) -> Result<&str, StyleSheetError> {
        self.read_str(handle, StyleValueType::Variable)
    }

    /// Reads a resource path.
    pub fn read_resource_path(&self, handle: StyleValueHandle) -> Result<&str, StyleSheetError> {
        self.read_str(handle, StyleValueType::ResourcePath)
    }

    /// Reads a loaded resource.
    pub fn read_asset(&self, handle: StyleValueHandle) -> Result<&ResourceHandle, StyleSheetError> {
        let index = Self::check(handle, StyleValueType::AssetReference)?;
        Self::pooled(&self.assets, handle, index)
    }

    /// Reads a scalable image.
    pub fn read_scalable_image(
        &self,
        handle: StyleValueHandle,
    ) -> Result<&ScalableImage, StyleSheetError> {
        let index = Self::check(handle, StyleValueType::ScalableImage)?;
        Self::pooled(&self.scalable_images, handle, index)
    }

    /// Converts the declarations of a rule to style values.
    ///
    /// Declarations for unknown properties, declarations that depend on
    /// variables, and `cursor` declarations are skipped. `unset` becomes
    /// `inherit` for inherited properties and `initial` otherwise.
    pub fn style_values(&self, rule_index: usize) -> Result<Vec<StyleValue>, StyleSheetError> {
        let rule = self.rule(rule_index)?;
        let mut out = Vec::with_capacity(rule.properties.len());
        for property in &rule.properties {
            let Some(id) = StylePropertyId::from_name(&property.name) else {
                tracing::debug!(
                    name = %property.name,
                    line = property.line,
                    "unknown style property"
                );
                continue;
            };
            if property.requires_variable_resolve {
                tracing::debug!(?id, line = property.line, "skipping variable-bound declaration");
                continue;
            }
            if id == StylePropertyId::Cursor {
                tracing::debug!(line = property.line, "cursor is only settable inline");
                continue;
            }
            let Some(&handle) = property.values.first() else {
                continue;
            };
            match self.convert(id, handle)? {
                Some(value) => out.push(value),
                None => tracing::debug!(
                    ?id,
                    value_type = ?handle.value_type,
                    line = property.line,
                    "value does not fit property"
                ),
            }
        }
        Ok(out)
    }

    fn convert(
        &self,
        id: StylePropertyId,
        handle: StyleValueHandle,
    ) -> Result<Option<StyleValue>, StyleSheetError> {
        if handle.value_type == StyleValueType::Keyword {
            let keyword = match self.read_keyword(handle)? {
                StyleValueKeyword::Inherit => StyleKeyword::Inherit,
                StyleValueKeyword::Initial => StyleKeyword::Initial,
                StyleValueKeyword::Auto => StyleKeyword::Auto,
                StyleValueKeyword::None => StyleKeyword::None,
                StyleValueKeyword::Unset if id.inherits() => StyleKeyword::Inherit,
                StyleValueKeyword::Unset => StyleKeyword::Initial,
                StyleValueKeyword::True | StyleValueKeyword::False => return Ok(None),
            };
            return Ok(Some(StyleValue::keyword(id, keyword)));
        }
        let value = match (id.kind(), handle.value_type) {
            (PropertyKind::Length, StyleValueType::Float | StyleValueType::Dimension) => self
                .read_dimension(handle)?
                .to_length()
                .map(|length| StyleValue::length(id, length)),
            (PropertyKind::Float, StyleValueType::Float | StyleValueType::Dimension) => {
                Some(StyleValue::float(id, self.read_dimension(handle)?.value))
            }
            (PropertyKind::Color, StyleValueType::Color) => {
                Some(StyleValue::color(id, self.read_color(handle)?))
            }
            (PropertyKind::Int, StyleValueType::Float) => {
                Some(StyleValue::int(id, truncate(self.read_float(handle)?)))
            }
            (PropertyKind::Int, StyleValueType::Enum) => {
                let name = self.read_enum(handle)?;
                let index = match id {
                    StylePropertyId::Display => Display::from_name(name).map(Display::to_index),
                    StylePropertyId::Visibility => {
                        Visibility::from_name(name).map(Visibility::to_index)
                    }
                    _ => None,
                };
                index.map(|index| StyleValue::int(id, index))
            }
            (PropertyKind::Resource, StyleValueType::AssetReference) => {
                Some(StyleValue::resource(id, self.read_asset(handle)?.clone()))
            }
            (PropertyKind::Resource, StyleValueType::ScalableImage) => Some(StyleValue::resource(
                id,
                self.read_scalable_image(handle)?.normal.clone(),
            )),
            (PropertyKind::Resource, StyleValueType::ResourcePath) => {
                let kind = match id {
                    StylePropertyId::Font => ResourceKind::Font,
                    _ => ResourceKind::Image,
                };
                Some(StyleValue::resource(
                    id,
                    Resource::new(kind, self.read_resource_path(handle)?),
                ))
            }
            _ => None,
        };
        Ok(value)
    }

    /// Appends `other`'s content, rebasing its handles and rule indices.
    pub(crate) fn append(&mut self, other: &Self) {
        let rule_offset = self.rules.len();
        let floats = pool_index(self.floats.len());
        let dimensions = pool_index(self.dimensions.len());
        let colors = pool_index(self.colors.len());
        let strings = pool_index(self.strings.len());
        let assets = pool_index(self.assets.len());
        let images = pool_index(self.scalable_images.len());

        let rebase = |handle: StyleValueHandle| {
            let offset = match handle.value_type {
                StyleValueType::Float => floats,
                StyleValueType::Dimension => dimensions,
                StyleValueType::Color => colors,
                StyleValueType::ResourcePath
                | StyleValueType::Enum
                | StyleValueType::Variable
                | StyleValueType::String => strings,
                StyleValueType::AssetReference => assets,
                StyleValueType::ScalableImage => images,
                StyleValueType::Keyword
                | StyleValueType::Function
                | StyleValueType::CommaSeparator => 0,
            };
            StyleValueHandle::new(handle.value_type, handle.value_index + offset)
        };

        self.rules.extend(other.rules.iter().map(|rule| StyleRule {
            line: rule.line,
            properties: rule
                .properties
                .iter()
                .map(|property| StyleProperty {
                    values: property.values.iter().copied().map(rebase).collect(),
                    ..property.clone()
                })
                .collect(),
        }));
        self.complex_selectors
            .extend(other.complex_selectors.iter().map(|selector| StyleComplexSelector {
                rule_index: selector.rule_index + rule_offset,
                ..selector.clone()
            }));
        self.floats.extend_from_slice(&other.floats);
        self.dimensions.extend_from_slice(&other.dimensions);
        self.colors.extend_from_slice(&other.colors);
        self.strings.extend_from_slice(&other.strings);
        self.assets.extend_from_slice(&other.assets);
        self.scalable_images
            .extend_from_slice(&other.scalable_images);
    }
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "integer properties are stored as numbers in sheets"
)]
fn truncate(value: f32) -> i32 {
    value as i32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::StyleValuePayload;
    use alloc::vec;

    fn sheet_with(properties: Vec<StyleProperty>) -> StyleSheet {
        StyleSheet {
            rules: vec![StyleRule {
                properties,
                line: 1,
            }],
            floats: vec![4.0, 1.0],
            dimensions: vec![Dimension::new(50.0, DimensionUnit::Percent)],
            strings: vec!["none".into()],
            ..StyleSheet::default()
        }
    }

    fn property(name: &str, handle: StyleValueHandle) -> StyleProperty {
        StyleProperty {
            name: name.into(),
            line: 1,
            values: vec![handle],
            requires_variable_resolve: false,
        }
    }

    #[test]
    fn readers_check_type_and_range() {
        let sheet = sheet_with(Vec::new());
        let float = StyleValueHandle::new(StyleValueType::Float, 0);
        assert_eq!(sheet.read_float(float), Ok(4.0));
        assert_eq!(
            sheet.read_dimension(float),
            Ok(Dimension::new(4.0, DimensionUnit::Unitless))
        );
        assert_eq!(
            sheet.read_color(float),
            Err(StyleSheetError::TypeMismatch {
                expected: StyleValueType::Color,
                actual: StyleValueType::Float,
            })
        );
        assert_eq!(
            sheet.read_float(StyleValueHandle::new(StyleValueType::Float, 9)),
            Err(StyleSheetError::HandleOutOfRange {
                value_type: StyleValueType::Float,
                index: 9,
            })
        );
        assert!(sheet.rule(3).is_err(), "only one rule exists");
    }

    #[test]
    fn declarations_convert_to_style_values() {
        let unset = StyleValueHandle::new(
            StyleValueType::Keyword,
            StyleValueKeyword::Unset.to_index(),
        );
        let mut variable = property("opacity", StyleValueHandle::new(StyleValueType::Float, 1));
        variable.requires_variable_resolve = true;
        let sheet = sheet_with(vec![
            property("width", StyleValueHandle::new(StyleValueType::Dimension, 0)),
            property("flex-grow", StyleValueHandle::new(StyleValueType::Float, 0)),
            property("display", StyleValueHandle::new(StyleValueType::Enum, 0)),
            property("color", unset),
            property("opacity", unset),
            property("margin", StyleValueHandle::new(StyleValueType::Float, 0)),
            variable,
        ]);

        let values = sheet.style_values(0).unwrap();
        assert_eq!(
            values,
            vec![
                StyleValue::length(StylePropertyId::Width, Length::percent(50.0)),
                StyleValue::float(StylePropertyId::FlexGrow, 4.0),
                StyleValue::int(StylePropertyId::Display, 1),
                StyleValue::keyword(StylePropertyId::Color, StyleKeyword::Inherit),
                StyleValue::keyword(StylePropertyId::Opacity, StyleKeyword::Initial),
            ]
        );
        assert_eq!(values[0].payload, StyleValuePayload::Length(Length::percent(50.0)));
    }
}
