// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors for style sheet construction and reading.

use crate::builder::BuilderState;
use crate::sheet::StyleValueType;

/// Failure while building or reading a [`StyleSheet`](crate::StyleSheet).
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum StyleSheetError {
    /// A builder call arrived in the wrong state.
    #[error("`{operation}` requires builder state {expected:?}, but the builder is in {actual:?}")]
    InvalidState {
        /// The rejected call.
        operation: &'static str,
        /// State the call requires.
        expected: BuilderState,
        /// State the builder was in.
        actual: BuilderState,
    },
    /// A handle was read as the wrong value type.
    #[error("expected a {expected:?} value, found {actual:?}")]
    TypeMismatch {
        /// Type the reader asked for.
        expected: StyleValueType,
        /// Type the handle carries.
        actual: StyleValueType,
    },
    /// A handle points past the end of its pool.
    #[error("{value_type:?} handle {index} is out of range")]
    HandleOutOfRange {
        /// Pool the handle refers to.
        value_type: StyleValueType,
        /// Offending index.
        index: u32,
    },
    /// A rule index is past the end of the sheet.
    #[error("rule {index} is out of range for a sheet with {len} rules")]
    RuleOutOfRange {
        /// Offending index.
        index: usize,
        /// Number of rules in the sheet.
        len: usize,
    },
}
