// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Canopy Style: inline styles, the style cascade, and pooled style sheets.
//!
//! ## Core Concepts
//!
//! ### Style values
//!
//! A [`StyleValue`] assigns one [`StylePropertyId`] either a payload (a
//! [`Length`], number, [`Color`], resource handle, …) or a [`StyleKeyword`]
//! such as `auto` or `inherit`. [`StyleValueCollection`] holds at most one
//! value per property; storing the `Null` keyword removes the entry.
//!
//! ### Inline styles
//!
//! [`InlineStyleAccess`] is the typed front of an element's inline values.
//! Each setter reports whether anything changed and, if so, applies the value
//! to the element's [`ComputedStyle`] and records [`StyleChangeFlags`].
//! [`StyleElement`] bundles the inline style with its computed style and
//! change bookkeeping.
//!
//! ```rust
//! use canopy_style::{Length, StyleChangeFlags, StyleElement, StylePropertyId, Styled};
//!
//! let mut element = StyleElement::new();
//! assert!(element.set_length(StylePropertyId::Width, Length::px(40.0).into(), None));
//! assert!(!element.set_length(StylePropertyId::Width, Length::px(40.0).into(), None));
//! assert_eq!(element.resolved(None).width(), 40.0);
//!
//! // Unsetting leaves the computed style alone until the cascade reruns.
//! assert!(element.set_length(StylePropertyId::Width, Styled::null(), None));
//! assert!(element.pending().contains(StyleChangeFlags::INLINE_REMOVED));
//! element.recompute(None, &[])?;
//! assert!(element.computed().width.is_auto());
//! # Ok::<(), canopy_style::StyleSheetError>(())
//! ```
//!
//! ### Style sheets
//!
//! A [`StyleSheet`] stores rules and selectors with every literal value kept
//! in a typed pool and referenced through a [`StyleValueHandle`].
//! [`StyleSheetBuilder`] constructs sheets through a checked state machine;
//! [`compute_style`] runs the cascade over the rules that matched an element.
//!
//! ```rust
//! use canopy_style::{
//!     Color, MatchedRule, StyleElement, StyleSheet, StyleSheetBuilder,
//! };
//!
//! let mut builder = StyleSheetBuilder::new();
//! builder.begin_rule(1)?;
//! builder.begin_complex_selector(10)?.end()?;
//! builder.begin_property("background-color", 2)?;
//! builder.add_color(Color::WHITE)?;
//! builder.end_property()?;
//! builder.end_rule()?;
//! let mut sheet = StyleSheet::new();
//! builder.build_to(&mut sheet)?;
//!
//! let mut element = StyleElement::new();
//! let matched = [MatchedRule { sheet: &sheet, rule_index: 0, specificity: 10 }];
//! element.recompute(None, &matched)?;
//! assert_eq!(element.computed().background_color, Color::WHITE);
//! # Ok::<(), canopy_style::StyleSheetError>(())
//! ```
//!
//! ## `no_std` Support
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod builder;
mod cache;
mod collection;
mod computed;
mod element;
mod error;
mod id;
mod inline;
mod sheet;
mod value;

pub use builder::{BuilderState, ComplexSelectorScope, StyleSheetBuilder};
pub use cache::StylePropertyCache;
pub use collection::StyleValueCollection;
pub use computed::{ComputedStyle, ResolvedStyle};
pub use element::{MatchedRule, StyleElement, compute_style};
pub use error::StyleSheetError;
pub use id::{PropertyKind, StyleChangeFlags, StylePropertyId};
pub use inline::{InlineRule, InlineStyleAccess};
pub use sheet::{
    Dimension, DimensionUnit, ScalableImage, StyleComplexSelector, StyleProperty, StyleRule,
    StyleSelector, StyleSelectorPart, StyleSelectorRelationship, StyleSelectorType, StyleSheet,
    StyleValueFunction, StyleValueHandle, StyleValueKeyword, StyleValueType,
};
pub use value::{
    Color, Cursor, Display, Length, LengthUnit, Resource, ResourceHandle, ResourceKind,
    StyleColor, StyleCursor, StyleFloat, StyleInt, StyleKeyword, StyleLength, StyleResource,
    StyleValue, StyleValuePayload, Styled, Visibility,
};
