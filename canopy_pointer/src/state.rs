// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pointer location and button tables.
//!
//! ## Usage
//!
//! 1) Construct one [`PointerInputState`] per process (or per test).
//! 2) On every pointer event, call [`PointerInputState::save_pointer_position`]
//!    and press/release the event's button.
//! 3) Read positions, panels, flags and button masks back during dispatch.
//!
//! Pointer ids index fixed-size tables. An id outside `0..max_pointers()` is a
//! caller bug and panics.

use alloc::vec;
use alloc::vec::Vec;

use kurbo::Point;

use crate::id::{PanelBounds, PanelId, PointerContext, pointer_id};

bitflags::bitflags! {
    /// Flags describing a stored pointer location.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct LocationFlags: u8 {
        /// The position was outside the panel's root layout when it was saved.
        ///
        /// This is not recomputed when the panel resizes.
        const OUTSIDE_PANEL = 0b0000_0001;
    }
}

/// Configuration for [`PointerInputState`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PointerConfig {
    /// Number of pointer id slots (default: [`pointer_id::MAX_POINTERS`]).
    pub max_pointers: usize,
}

impl Default for PointerConfig {
    fn default() -> Self {
        Self {
            max_pointers: pointer_id::MAX_POINTERS,
        }
    }
}

/// One pointer's last known location within one context.
#[derive(Copy, Clone, Debug, PartialEq)]
struct PointerLocation {
    position: Point,
    panel: Option<PanelId>,
    flags: LocationFlags,
}

impl Default for PointerLocation {
    fn default() -> Self {
        Self {
            position: Point::ZERO,
            panel: None,
            flags: LocationFlags::OUTSIDE_PANEL,
        }
    }
}

impl PointerLocation {
    fn set(&mut self, position: Point, panel: Option<&dyn PanelBounds>) {
        self.position = position;
        self.panel = panel.map(PanelBounds::panel_id);
        self.flags = match panel {
            Some(panel) if panel.root_layout().contains(position) => LocationFlags::empty(),
            _ => LocationFlags::OUTSIDE_PANEL,
        };
    }
}

/// Per-pointer location and button state.
///
/// Locations are kept per [`PointerContext`]; pressed buttons are physical
/// state and shared between contexts.
#[derive(Clone, Debug)]
pub struct PointerInputState {
    editor_locations: Vec<PointerLocation>,
    player_locations: Vec<PointerLocation>,
    pressed_buttons: Vec<u32>,
}

impl Default for PointerInputState {
    fn default() -> Self {
        Self::new()
    }
}

impl PointerInputState {
    /// Creates state with [`PointerConfig::default`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(PointerConfig::default())
    }

    /// Creates state with the given configuration.
    #[must_use]
    pub fn with_config(config: PointerConfig) -> Self {
        Self {
            editor_locations: vec![PointerLocation::default(); config.max_pointers],
            player_locations: vec![PointerLocation::default(); config.max_pointers],
            pressed_buttons: vec![0; config.max_pointers],
        }
    }

    /// Number of pointer id slots.
    #[must_use]
    pub fn max_pointers(&self) -> usize {
        self.pressed_buttons.len()
    }

    /// Forgets every location and button.
    pub fn reset(&mut self) {
        self.editor_locations.fill(PointerLocation::default());
        self.player_locations.fill(PointerLocation::default());
        self.pressed_buttons.fill(0);
    }

    /// Drops every reference to `panel`, in both contexts.
    ///
    /// Locations that pointed at the panel keep their position but become
    /// panel-less and therefore outside.
    pub fn remove_panel_data(&mut self, panel: PanelId) {
        for location in self
            .editor_locations
            .iter_mut()
            .chain(self.player_locations.iter_mut())
        {
            if location.panel == Some(panel) {
                location.panel = None;
                location.flags |= LocationFlags::OUTSIDE_PANEL;
            }
        }
    }

    fn locations(&self, context: PointerContext) -> &[PointerLocation] {
        match context {
            PointerContext::Editor => &self.editor_locations,
            PointerContext::Player => &self.player_locations,
        }
    }

    fn locations_mut(&mut self, context: PointerContext) -> &mut [PointerLocation] {
        match context {
            PointerContext::Editor => &mut self.editor_locations,
            PointerContext::Player => &mut self.player_locations,
        }
    }

    fn check_pointer_id(&self, pointer_id: usize) {
        assert!(
            pointer_id < self.max_pointers(),
            "pointer id {pointer_id} out of range (max {})",
            self.max_pointers()
        );
    }

    /// Records where `pointer_id` is and which panel it is over.
    ///
    /// [`LocationFlags::OUTSIDE_PANEL`] is set when there is no panel or the
    /// panel's root layout does not contain `position`.
    ///
    /// # Panics
    ///
    /// Panics if `pointer_id` is out of range.
    pub fn save_pointer_position(
        &mut self,
        pointer_id: usize,
        position: Point,
        panel: Option<&dyn PanelBounds>,
        context: PointerContext,
    ) {
        self.check_pointer_id(pointer_id);
        let location = &mut self.locations_mut(context)[pointer_id];
        location.set(position, panel);
        tracing::trace!(
            pointer_id,
            ?context,
            x = position.x,
            y = position.y,
            outside = location.flags.contains(LocationFlags::OUTSIDE_PANEL),
            "saved pointer position"
        );
    }

    /// Marks `button_id` as pressed for `pointer_id`.
    ///
    /// # Panics
    ///
    /// Panics if `pointer_id` is out of range or `button_id >= 32`.
    pub fn press_button(&mut self, pointer_id: usize, button_id: u32) {
        assert!(button_id < 32, "button id {button_id} out of range");
        self.check_pointer_id(pointer_id);
        self.pressed_buttons[pointer_id] |= 1 << button_id;
        tracing::trace!(pointer_id, button_id, "pressed button");
    }

    /// Marks `button_id` as released for `pointer_id`.
    ///
    /// # Panics
    ///
    /// Panics if `pointer_id` is out of range or `button_id >= 32`.
    pub fn release_button(&mut self, pointer_id: usize, button_id: u32) {
        assert!(button_id < 32, "button id {button_id} out of range");
        self.check_pointer_id(pointer_id);
        self.pressed_buttons[pointer_id] &= !(1 << button_id);
        tracing::trace!(pointer_id, button_id, "released button");
    }

    /// Releases every button of `pointer_id`.
    ///
    /// # Panics
    ///
    /// Panics if `pointer_id` is out of range.
    pub fn release_all_buttons(&mut self, pointer_id: usize) {
        self.check_pointer_id(pointer_id);
        self.pressed_buttons[pointer_id] = 0;
    }

    /// Last saved position of `pointer_id` in `context`.
    #[must_use]
    pub fn pointer_position(&self, pointer_id: usize, context: PointerContext) -> Point {
        self.check_pointer_id(pointer_id);
        self.locations(context)[pointer_id].position
    }

    /// Panel `pointer_id` was last saved against in `context`.
    #[must_use]
    pub fn panel(&self, pointer_id: usize, context: PointerContext) -> Option<PanelId> {
        self.check_pointer_id(pointer_id);
        self.locations(context)[pointer_id].panel
    }

    /// Flags of the last saved location.
    #[must_use]
    pub fn location_flags(&self, pointer_id: usize, context: PointerContext) -> LocationFlags {
        self.check_pointer_id(pointer_id);
        self.locations(context)[pointer_id].flags
    }

    /// Returns `true` if the last saved location has all of `flag` set.
    #[must_use]
    pub fn has_location_flag(
        &self,
        pointer_id: usize,
        context: PointerContext,
        flag: LocationFlags,
    ) -> bool {
        self.location_flags(pointer_id, context).contains(flag)
    }

    /// Bitmask of pressed buttons (bit `n` is button `n`).
    #[must_use]
    pub fn pressed_buttons(&self, pointer_id: usize) -> u32 {
        self.check_pointer_id(pointer_id);
        self.pressed_buttons[pointer_id]
    }

    /// Returns `true` if any button other than `except_button_id` is pressed.
    #[must_use]
    pub fn has_additional_pressed_buttons(&self, pointer_id: usize, except_button_id: u32) -> bool {
        let mask = 1_u32.checked_shl(except_button_id).unwrap_or(0);
        self.pressed_buttons(pointer_id) & !mask != 0
    }
}
