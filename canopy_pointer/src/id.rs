// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pointer ids, pointer kinds, input contexts and panel handles.

use kurbo::Rect;

/// Well-known pointer id ranges.
///
/// Pointer ids are small integers: the mouse always uses [`MOUSE`], touches use
/// a contiguous block starting at [`TOUCH_BASE`] and pens follow the touches.
pub mod pointer_id {
    /// The mouse pointer.
    pub const MOUSE: usize = 0;
    /// First id used for touch contacts.
    pub const TOUCH_BASE: usize = 1;
    /// Number of touch contacts tracked simultaneously.
    pub const TOUCH_COUNT: usize = 20;
    /// First id used for pens.
    pub const PEN_BASE: usize = TOUCH_BASE + TOUCH_COUNT;
    /// Number of pens tracked simultaneously.
    pub const PEN_COUNT: usize = 2;
    /// Size of the per-pointer tables.
    pub const MAX_POINTERS: usize = 32;
}

/// Kind of device behind a pointer id.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PointerType {
    /// A mouse.
    Mouse,
    /// A touch contact.
    Touch,
    /// A pen or stylus.
    Pen,
}

impl PointerType {
    /// Classifies a pointer id by the well-known [`pointer_id`] ranges.
    ///
    /// Ids past the pen block are treated as mice.
    #[must_use]
    pub const fn of(pointer_id: usize) -> Self {
        if pointer_id >= pointer_id::TOUCH_BASE && pointer_id < pointer_id::PEN_BASE {
            Self::Touch
        } else if pointer_id >= pointer_id::PEN_BASE
            && pointer_id < pointer_id::PEN_BASE + pointer_id::PEN_COUNT
        {
            Self::Pen
        } else {
            Self::Mouse
        }
    }
}

/// Logical input context a pointer location belongs to.
///
/// Editor tooling and the running application can both receive input at the
/// same time; each keeps its own location table.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum PointerContext {
    /// Editor tool surfaces.
    Editor,
    /// The running application.
    #[default]
    Player,
}

/// Identifier of a panel (an independent UI surface).
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PanelId(u32);

impl PanelId {
    /// Creates a panel id from a raw index.
    #[must_use]
    #[inline]
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    /// Returns the raw index.
    #[must_use]
    #[inline]
    pub const fn index(self) -> u32 {
        self.0
    }
}

/// What the pointer state needs to know about a panel.
pub trait PanelBounds {
    /// The panel's id.
    fn panel_id(&self) -> PanelId;

    /// Layout rectangle of the panel's root element, in the coordinate space
    /// pointer positions are reported in.
    fn root_layout(&self) -> Rect;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pointer_type_ranges() {
        assert_eq!(PointerType::of(pointer_id::MOUSE), PointerType::Mouse);
        assert_eq!(PointerType::of(pointer_id::TOUCH_BASE), PointerType::Touch);
        assert_eq!(
            PointerType::of(pointer_id::TOUCH_BASE + pointer_id::TOUCH_COUNT - 1),
            PointerType::Touch
        );
        assert_eq!(PointerType::of(pointer_id::PEN_BASE), PointerType::Pen);
        assert_eq!(PointerType::of(pointer_id::PEN_BASE + 1), PointerType::Pen);
        assert_eq!(
            PointerType::of(pointer_id::PEN_BASE + pointer_id::PEN_COUNT),
            PointerType::Mouse
        );
    }

    #[test]
    fn pen_block_fits_in_tables() {
        assert!(
            pointer_id::PEN_BASE + pointer_id::PEN_COUNT <= pointer_id::MAX_POINTERS,
            "pen ids must index into the pointer tables"
        );
    }
}
