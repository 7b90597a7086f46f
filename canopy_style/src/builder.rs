// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Checked, incremental construction of [`StyleSheet`]s.
//!
//! The builder is a small state machine. Rules open from `Init`, complex
//! selectors and properties open from `Rule`, and values may only be added
//! while a property is open:
//!
//! ```text
//! Init ──begin_rule──▶ Rule ──begin_property──▶ Property
//!  ▲                    │ ▲                         │
//!  └─────end_rule───────┘ └──────end_property───────┘
//!                       │ ▲
//!      begin_complex_selector / end (or drop)
//!                       ▼ │
//!                 ComplexSelector
//! ```
//!
//! A call made in the wrong state fails with
//! [`StyleSheetError::InvalidState`] and leaves the builder untouched.
//!
//! ```
//! use canopy_style::{Color, StyleSheet, StyleSheetBuilder};
//!
//! let mut builder = StyleSheetBuilder::new();
//! builder.begin_rule(1)?;
//! builder.begin_complex_selector(10)?.end()?;
//! builder.begin_property("color", 2)?;
//! builder.add_color(Color::new(1.0, 0.0, 0.0, 1.0))?;
//! builder.end_property()?;
//! builder.end_rule()?;
//!
//! let mut sheet = StyleSheet::new();
//! builder.build_to(&mut sheet)?;
//! assert_eq!(sheet.rules().len(), 1);
//! # Ok::<(), canopy_style::StyleSheetError>(())
//! ```

use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use hashbrown::HashMap;

use crate::error::StyleSheetError;
use crate::sheet::{
    Dimension, ScalableImage, StyleComplexSelector, StyleProperty, StyleRule, StyleSelector,
    StyleSelectorPart, StyleSelectorRelationship, StyleSheet, StyleValueFunction,
    StyleValueHandle, StyleValueKeyword, StyleValueType, pool_index,
};
use crate::value::{Color, ResourceHandle};

/// Position of a [`StyleSheetBuilder`] in its state machine.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum BuilderState {
    /// Between rules.
    #[default]
    Init,
    /// Inside a rule.
    Rule,
    /// Inside a complex selector of a rule.
    ComplexSelector,
    /// Inside a property of a rule.
    Property,
}

/// Builds a [`StyleSheet`] one rule at a time.
#[derive(Default)]
pub struct StyleSheetBuilder {
    state: BuilderState,
    content: StyleSheet,
    rule: StyleRule,
    rule_selectors: Vec<StyleComplexSelector>,
    selector: StyleComplexSelector,
    property: StyleProperty,
    interned: HashMap<String, u32>,
    imports: Vec<Rc<StyleSheet>>,
}

impl fmt::Debug for StyleSheetBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StyleSheetBuilder")
            .field("state", &self.state)
            .field("rules", &self.content.rules.len())
            .field("imports", &self.imports.len())
            .finish_non_exhaustive()
    }
}

impl StyleSheetBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> BuilderState {
        self.state
    }

    fn expect_state(
        &self,
        operation: &'static str,
        expected: BuilderState,
    ) -> Result<(), StyleSheetError> {
        if self.state == expected {
            Ok(())
        } else {
            Err(StyleSheetError::InvalidState {
                operation,
                expected,
                actual: self.state,
            })
        }
    }

    /// Opens a rule.
    pub fn begin_rule(&mut self, line: u32) -> Result<(), StyleSheetError> {
        self.expect_state("begin_rule", BuilderState::Init)?;
        self.rule = StyleRule {
            properties: Vec::new(),
            line,
        };
        self.state = BuilderState::Rule;
        Ok(())
    }

    /// Opens a complex selector for the current rule.
    ///
    /// The returned scope closes the selector when dropped.
    pub fn begin_complex_selector(
        &mut self,
        specificity: i32,
    ) -> Result<ComplexSelectorScope<'_>, StyleSheetError> {
        self.expect_state("begin_complex_selector", BuilderState::Rule)?;
        self.selector = StyleComplexSelector {
            specificity,
            ..StyleComplexSelector::default()
        };
        self.state = BuilderState::ComplexSelector;
        Ok(ComplexSelectorScope {
            builder: self,
            ended: false,
        })
    }

    fn add_simple_selector(
        &mut self,
        parts: Vec<StyleSelectorPart>,
        previous_relationship: StyleSelectorRelationship,
    ) -> Result<(), StyleSheetError> {
        self.expect_state("add_simple_selector", BuilderState::ComplexSelector)?;
        self.selector.selectors.push(StyleSelector {
            parts,
            previous_relationship,
        });
        Ok(())
    }

    fn end_complex_selector(&mut self) -> Result<(), StyleSheetError> {
        self.expect_state("end_complex_selector", BuilderState::ComplexSelector)?;
        self.rule_selectors.push(core::mem::take(&mut self.selector));
        self.state = BuilderState::Rule;
        Ok(())
    }

    /// Opens a property of the current rule.
    pub fn begin_property(&mut self, name: &str, line: u32) -> Result<(), StyleSheetError> {
        self.expect_state("begin_property", BuilderState::Rule)?;
        self.property = StyleProperty {
            name: name.into(),
            line,
            ..StyleProperty::default()
        };
        self.state = BuilderState::Property;
        Ok(())
    }

    /// Closes the current property.
    pub fn end_property(&mut self) -> Result<(), StyleSheetError> {
        self.expect_state("end_property", BuilderState::Property)?;
        self.rule.properties.push(core::mem::take(&mut self.property));
        self.state = BuilderState::Rule;
        Ok(())
    }

    /// Closes the current rule and attaches its selectors to it.
    pub fn end_rule(&mut self) -> Result<(), StyleSheetError> {
        self.expect_state("end_rule", BuilderState::Rule)?;
        let rule_index = self.content.rules.len();
        self.content.rules.push(core::mem::take(&mut self.rule));
        self.content
            .complex_selectors
            .extend(self.rule_selectors.drain(..).map(|selector| StyleComplexSelector {
                rule_index,
                ..selector
            }));
        self.state = BuilderState::Init;
        Ok(())
    }

    fn push_handle(
        &mut self,
        operation: &'static str,
        handle: StyleValueHandle,
    ) -> Result<StyleValueHandle, StyleSheetError> {
        self.expect_state(operation, BuilderState::Property)?;
        self.property.values.push(handle);
        Ok(handle)
    }

    fn push_pooled<T>(
        &mut self,
        operation: &'static str,
        value_type: StyleValueType,
        value: T,
        pool: fn(&mut StyleSheet) -> &mut Vec<T>,
    ) -> Result<StyleValueHandle, StyleSheetError> {
        self.expect_state(operation, BuilderState::Property)?;
        let pool = pool(&mut self.content);
        let handle = StyleValueHandle::new(value_type, pool_index(pool.len()));
        pool.push(value);
        self.push_handle(operation, handle)
    }

    fn push_string(
        &mut self,
        operation: &'static str,
        value_type: StyleValueType,
        value: &str,
    ) -> Result<StyleValueHandle, StyleSheetError> {
        self.expect_state(operation, BuilderState::Property)?;
        let index = match self.interned.get(value) {
            Some(&index) => index,
            None => {
                let index = pool_index(self.content.strings.len());
                self.content.strings.push(value.into());
                self.interned.insert(value.into(), index);
                index
            }
        };
        self.push_handle(operation, StyleValueHandle::new(value_type, index))
    }

    /// Adds a number to the current property.
    pub fn add_float(&mut self, value: f32) -> Result<StyleValueHandle, StyleSheetError> {
        self.push_pooled("add_float", StyleValueType::Float, value, |s| &mut s.floats)
    }

    /// Adds a dimension to the current property.
    pub fn add_dimension(
        &mut self,
        value: Dimension,
    ) -> Result<StyleValueHandle, StyleSheetError> {
        self.push_pooled("add_dimension", StyleValueType::Dimension, value, |s| {
            &mut s.dimensions
        })
    }

    /// Adds a color to the current property.
    pub fn add_color(&mut self, value: Color) -> Result<StyleValueHandle, StyleSheetError> {
        self.push_pooled("add_color", StyleValueType::Color, value, |s| &mut s.colors)
    }

    /// Adds a loaded resource to the current property.
    pub fn add_asset(
        &mut self,
        value: ResourceHandle,
    ) -> Result<StyleValueHandle, StyleSheetError> {
        self.push_pooled("add_asset", StyleValueType::AssetReference, value, |s| {
            &mut s.assets
        })
    }

    /// Adds a scalable image to the current property.
    pub fn add_scalable_image(
        &mut self,
        value: ScalableImage,
    ) -> Result<StyleValueHandle, StyleSheetError> {
        self.push_pooled(
            "add_scalable_image",
            StyleValueType::ScalableImage,
            value,
            |s| &mut s.scalable_images,
        )
    }

    /// Adds a keyword to the current property.
    pub fn add_keyword(
        &mut self,
        keyword: StyleValueKeyword,
    ) -> Result<StyleValueHandle, StyleSheetError> {
        let handle = StyleValueHandle::new(StyleValueType::Keyword, keyword.to_index());
        self.push_handle("add_keyword", handle)
    }

    /// Adds a function to the current property.
    ///
    /// `var()` marks the property as needing variable resolution.
    pub fn add_function(
        &mut self,
        function: StyleValueFunction,
    ) -> Result<StyleValueHandle, StyleSheetError> {
        let handle = StyleValueHandle::new(StyleValueType::Function, function.to_index());
        self.push_handle("add_function", handle)?;
        if function == StyleValueFunction::Var {
            self.property.requires_variable_resolve = true;
        }
        Ok(handle)
    }

    /// Adds a separator between comma separated values.
    pub fn add_comma_separator(&mut self) -> Result<StyleValueHandle, StyleSheetError> {
        let handle = StyleValueHandle::new(StyleValueType::CommaSeparator, 0);
        self.push_handle("add_comma_separator", handle)
    }

    /// Adds a quoted string to the current property.
    pub fn add_string(&mut self, value: &str) -> Result<StyleValueHandle, StyleSheetError> {
        self.push_string("add_string", StyleValueType::String, value)
    }

    /// Adds an enumeration name to the current property.
    pub fn add_enum(&mut self, value: &str) -> Result<StyleValueHandle, StyleSheetError> {
        self.push_string("add_enum", StyleValueType::Enum, value)
    }

    /// Adds a resource path to the current property.
    pub fn add_resource_path(&mut self, value: &str) -> Result<StyleValueHandle, StyleSheetError> {
        self.push_string("add_resource_path", StyleValueType::ResourcePath, value)
    }

    /// Adds a variable reference and marks the property as needing
    /// variable resolution.
    pub fn add_variable(&mut self, name: &str) -> Result<StyleValueHandle, StyleSheetError> {
        let handle = self.push_string("add_variable", StyleValueType::Variable, name)?;
        self.property.requires_variable_resolve = true;
        Ok(handle)
    }

    /// Imports another sheet. Its rules precede this builder's own.
    pub fn add_import(&mut self, sheet: Rc<StyleSheet>) {
        self.imports.push(sheet);
    }

    /// Writes the finished sheet into `sheet`, replacing its content.
    ///
    /// Imported sheets are flattened first, in import order, with their
    /// handles and rule indices rebased.
    pub fn build_to(&self, sheet: &mut StyleSheet) -> Result<(), StyleSheetError> {
        self.expect_state("build_to", BuilderState::Init)?;
        let mut built = StyleSheet::default();
        for import in &self.imports {
            built.append(import);
        }
        built.append(&self.content);
        built.imports.clone_from(&self.imports);
        tracing::debug!(
            rules = built.rules.len(),
            imports = built.imports.len(),
            "built style sheet"
        );
        *sheet = built;
        Ok(())
    }
}

/// Open complex selector of a [`StyleSheetBuilder`].
///
/// Dropping the scope closes the selector.
pub struct ComplexSelectorScope<'a> {
    builder: &'a mut StyleSheetBuilder,
    ended: bool,
}

impl fmt::Debug for ComplexSelectorScope<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComplexSelectorScope")
            .field("selectors", &self.builder.selector.selectors.len())
            .finish_non_exhaustive()
    }
}

impl ComplexSelectorScope<'_> {
    /// Appends a compound selector to the chain.
    pub fn add_simple_selector(
        &mut self,
        parts: Vec<StyleSelectorPart>,
        previous_relationship: StyleSelectorRelationship,
    ) -> Result<(), StyleSheetError> {
        self.builder.add_simple_selector(parts, previous_relationship)
    }

    /// Closes the selector.
    pub fn end(mut self) -> Result<(), StyleSheetError> {
        self.ended = true;
        self.builder.end_complex_selector()
    }
}

impl Drop for ComplexSelectorScope<'_> {
    fn drop(&mut self) {
        if !self.ended && self.builder.end_complex_selector().is_err() {
            tracing::warn!("complex selector scope dropped outside its selector");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sheet::{DimensionUnit, StyleSelectorType};
    use alloc::vec;

    fn one_color_rule(builder: &mut StyleSheetBuilder, color: Color) -> StyleValueHandle {
        builder.begin_rule(1).unwrap();
        builder.begin_complex_selector(10).unwrap().end().unwrap();
        builder.begin_property("color", 2).unwrap();
        let handle = builder.add_color(color).unwrap();
        builder.end_property().unwrap();
        builder.end_rule().unwrap();
        handle
    }

    #[test]
    fn single_rule_sheet() {
        let color = Color::new(1.0, 0.0, 0.0, 1.0);
        let mut builder = StyleSheetBuilder::new();
        let handle = one_color_rule(&mut builder, color);

        let mut sheet = StyleSheet::new();
        builder.build_to(&mut sheet).unwrap();
        assert_eq!(sheet.rules().len(), 1);
        assert_eq!(sheet.colors(), &[color]);
        assert_eq!(sheet.rules()[0].properties[0].values, vec![handle]);
        assert_eq!(sheet.read_color(handle), Ok(color));
        assert_eq!(sheet.complex_selectors().len(), 1);
        assert_eq!(sheet.complex_selectors()[0].specificity, 10);
        assert_eq!(sheet.rule_specificity(0), Some(10));
    }

    #[test]
    fn out_of_order_calls_are_rejected() {
        let mut builder = StyleSheetBuilder::new();
        assert_eq!(
            builder.begin_property("color", 1),
            Err(StyleSheetError::InvalidState {
                operation: "begin_property",
                expected: BuilderState::Rule,
                actual: BuilderState::Init,
            })
        );
        assert!(builder.add_float(1.0).is_err(), "no property is open");
        builder.begin_rule(1).unwrap();
        assert!(builder.begin_rule(2).is_err(), "rules do not nest");
        assert!(builder.build_to(&mut StyleSheet::new()).is_err(), "rule still open");
        assert_eq!(builder.state(), BuilderState::Rule);
    }

    #[test]
    fn dropping_the_scope_closes_the_selector() {
        let mut builder = StyleSheetBuilder::new();
        builder.begin_rule(1).unwrap();
        {
            let mut scope = builder.begin_complex_selector(1).unwrap();
            scope
                .add_simple_selector(
                    vec![StyleSelectorPart::new(StyleSelectorType::Class, "primary")],
                    StyleSelectorRelationship::None,
                )
                .unwrap();
        }
        assert_eq!(builder.state(), BuilderState::Rule);
        builder.end_rule().unwrap();

        let mut sheet = StyleSheet::new();
        builder.build_to(&mut sheet).unwrap();
        let selector = &sheet.complex_selectors()[0];
        assert_eq!(selector.rule_index, 0);
        assert_eq!(selector.selectors[0].parts[0].value, "primary");
    }

    #[test]
    fn variables_are_interned_and_flag_the_property() {
        let mut builder = StyleSheetBuilder::new();
        builder.begin_rule(1).unwrap();
        builder.begin_property("width", 1).unwrap();
        let first = builder.add_variable("--size").unwrap();
        builder.end_property().unwrap();
        builder.begin_property("height", 2).unwrap();
        builder.add_dimension(Dimension::new(4.0, DimensionUnit::Pixel)).unwrap();
        builder.end_property().unwrap();
        builder.begin_property("min-width", 3).unwrap();
        let second = builder.add_variable("--size").unwrap();
        builder.end_property().unwrap();
        builder.end_rule().unwrap();

        assert_eq!(first, second);
        let mut sheet = StyleSheet::new();
        builder.build_to(&mut sheet).unwrap();
        assert_eq!(sheet.strings().len(), 1);
        let flags: Vec<_> = sheet.rules()[0]
            .properties
            .iter()
            .map(|p| p.requires_variable_resolve)
            .collect();
        assert_eq!(flags, [true, false, true]);
        assert_eq!(sheet.read_variable(first), Ok("--size"));
    }

    #[test]
    fn imports_come_first_with_rebased_handles() {
        let red = Color::new(1.0, 0.0, 0.0, 1.0);
        let blue = Color::new(0.0, 0.0, 1.0, 1.0);

        let mut base = StyleSheetBuilder::new();
        one_color_rule(&mut base, red);
        let mut imported = StyleSheet::new();
        base.build_to(&mut imported).unwrap();

        let mut builder = StyleSheetBuilder::new();
        builder.add_import(Rc::new(imported));
        let own = one_color_rule(&mut builder, blue);
        assert_eq!(own.value_index, 0);

        let mut sheet = StyleSheet::new();
        builder.build_to(&mut sheet).unwrap();
        assert_eq!(sheet.rules().len(), 2);
        assert_eq!(sheet.colors(), &[red, blue]);
        let rebased = sheet.rules()[1].properties[0].values[0];
        assert_eq!(rebased.value_index, 1);
        assert_eq!(sheet.read_color(rebased), Ok(blue));
        assert_eq!(sheet.complex_selectors()[1].rule_index, 1);
        assert_eq!(sheet.imports().len(), 1);
    }
}
