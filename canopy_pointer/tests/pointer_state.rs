// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Property tests for pointer location and button bookkeeping.

use canopy_pointer::{
    LocationFlags, PanelBounds, PanelId, PointerContext, PointerInputState, pointer_id,
};
use kurbo::{Point, Rect};
use proptest::prelude::*;

struct Panel(Rect);

impl PanelBounds for Panel {
    fn panel_id(&self) -> PanelId {
        PanelId::new(1)
    }

    fn root_layout(&self) -> Rect {
        self.0
    }
}

fn context_strategy() -> impl Strategy<Value = PointerContext> {
    prop_oneof![Just(PointerContext::Editor), Just(PointerContext::Player)]
}

#[derive(Debug, Clone)]
enum ButtonOp {
    Press(u32),
    Release(u32),
    ReleaseAll,
}

fn button_op_strategy() -> impl Strategy<Value = ButtonOp> {
    prop_oneof![
        (0_u32..32).prop_map(ButtonOp::Press),
        (0_u32..32).prop_map(ButtonOp::Release),
        Just(ButtonOp::ReleaseAll),
    ]
}

proptest! {
    #[test]
    fn saved_position_round_trips(
        id in 0..pointer_id::MAX_POINTERS,
        x in -500.0_f64..500.0,
        y in -500.0_f64..500.0,
        with_panel in any::<bool>(),
        context in context_strategy(),
    ) {
        let panel = Panel(Rect::new(0.0, 0.0, 100.0, 80.0));
        let mut state = PointerInputState::new();
        let position = Point::new(x, y);
        let bounds: Option<&dyn PanelBounds> = if with_panel { Some(&panel) } else { None };
        state.save_pointer_position(id, position, bounds, context);

        prop_assert_eq!(state.pointer_position(id, context), position);
        let outside = !with_panel || !panel.0.contains(position);
        prop_assert_eq!(
            state.has_location_flag(id, context, LocationFlags::OUTSIDE_PANEL),
            outside
        );
    }

    #[test]
    fn button_mask_tracks_history(
        id in 0..pointer_id::MAX_POINTERS,
        ops in proptest::collection::vec(button_op_strategy(), 0..64),
    ) {
        let mut state = PointerInputState::new();
        let mut expected = 0_u32;
        for op in &ops {
            match *op {
                ButtonOp::Press(b) => {
                    state.press_button(id, b);
                    expected |= 1 << b;
                }
                ButtonOp::Release(b) => {
                    state.release_button(id, b);
                    expected &= !(1 << b);
                }
                ButtonOp::ReleaseAll => {
                    state.release_all_buttons(id);
                    expected = 0;
                }
            }
            prop_assert_eq!(state.pressed_buttons(id), expected);
        }
        for except in 0_u32..32 {
            prop_assert_eq!(
                state.has_additional_pressed_buttons(id, except),
                expected & !(1 << except) != 0
            );
        }
    }
}
