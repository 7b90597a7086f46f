// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Canopy Pointer: authoritative per-pointer input state.
//!
//! This crate records, for every pointer id, where the pointer last was, which
//! panel it was over, and which buttons are held. Locations are partitioned by
//! a [`PointerContext`] so that two input contexts running side by side (an
//! editor tool surface and an in-application player surface) never see each
//! other's pointer positions.
//!
//! The state lives in an explicit [`PointerInputState`] value that the host
//! constructs once and passes by reference to dispatch code. There are no
//! globals; call [`PointerInputState::reset`] between tests.
//!
//! ## Example
//!
//! ```rust
//! use kurbo::{Point, Rect};
//! use canopy_pointer::{
//!     LocationFlags, PanelBounds, PanelId, PointerContext, PointerInputState, pointer_id,
//! };
//!
//! struct Panel;
//! impl PanelBounds for Panel {
//!     fn panel_id(&self) -> PanelId { PanelId::new(1) }
//!     fn root_layout(&self) -> Rect { Rect::new(0.0, 0.0, 100.0, 100.0) }
//! }
//!
//! let mut state = PointerInputState::new();
//! state.save_pointer_position(
//!     pointer_id::MOUSE,
//!     Point::new(150.0, 20.0),
//!     Some(&Panel),
//!     PointerContext::Player,
//! );
//! assert!(state.has_location_flag(pointer_id::MOUSE, PointerContext::Player, LocationFlags::OUTSIDE_PANEL));
//!
//! state.press_button(pointer_id::MOUSE, 0);
//! state.press_button(pointer_id::MOUSE, 2);
//! assert_eq!(state.pressed_buttons(pointer_id::MOUSE), 0b101);
//! assert!(state.has_additional_pressed_buttons(pointer_id::MOUSE, 0));
//! ```
//!
//! ## Threading
//!
//! The state is meant to be owned by the UI thread. It performs no locking;
//! hosts that touch it from several threads must confine it themselves.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod id;
mod state;

pub use id::{PanelBounds, PanelId, PointerContext, PointerType, pointer_id};
pub use state::{LocationFlags, PointerConfig, PointerInputState};
