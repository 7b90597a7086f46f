// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Lookup of property value grammars.

use hashbrown::HashMap;

use crate::id::StylePropertyId;

/// Grammars of named value types referenced as `<name>` from property syntax.
const NON_TERMINALS: &[(&str, &str)] = &[
    ("length", "<number>px | <number> | 0"),
    ("percentage", "<number>%"),
    (
        "color",
        "<hex-color> | rgb( <number>#{3} ) | rgba( <number>#{4} ) | <named-color>",
    ),
    ("resource", "resource( <string> )"),
    ("url", "url( <string> )"),
    ("number", "<integer> | <integer>.<integer>"),
    ("integer", "-? [0-9]+"),
    (
        "cursor-name",
        "arrow | text | resize-vertical | resize-horizontal | link | slide-arrow \
         | resize-up-right | resize-up-left | move-arrow | rotate-arrow | scale-arrow \
         | arrow-plus | arrow-minus | pan | orbit | zoom | fps | split-resize-up-down \
         | split-resize-left-right",
    ),
];

/// Property and value-type grammars, keyed by name.
#[derive(Clone, Debug)]
pub struct StylePropertyCache {
    properties: HashMap<&'static str, StylePropertyId>,
    non_terminals: HashMap<&'static str, &'static str>,
}

impl Default for StylePropertyCache {
    fn default() -> Self {
        Self::new()
    }
}

impl StylePropertyCache {
    /// Builds the cache.
    #[must_use]
    pub fn new() -> Self {
        Self {
            properties: StylePropertyId::ALL
                .into_iter()
                .map(|id| (id.name(), id))
                .collect(),
            non_terminals: NON_TERMINALS.iter().copied().collect(),
        }
    }

    /// Property with the given style sheet name.
    #[must_use]
    pub fn find_property(&self, name: &str) -> Option<StylePropertyId> {
        self.properties.get(name).copied()
    }

    /// Value grammar of a property.
    #[must_use]
    pub fn try_get_syntax(&self, name: &str) -> Option<&'static str> {
        self.find_property(name).map(StylePropertyId::syntax)
    }

    /// Grammar of a value type such as `length`.
    #[must_use]
    pub fn try_get_non_terminal(&self, name: &str) -> Option<&'static str> {
        self.non_terminals.get(name).copied()
    }

    /// Names written as `<name>` in `syntax`, in order.
    pub fn references(syntax: &str) -> impl Iterator<Item = &str> + '_ {
        syntax
            .split('<')
            .skip(1)
            .filter_map(|tail| tail.split_once('>').map(|(name, _)| name))
    }
}
