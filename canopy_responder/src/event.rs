// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Event payload and event kinds.

use canopy_pointer::{PointerType, pointer_id};
use kurbo::Point;

use crate::types::{ElementId, Phase};

/// Kinds of event the dispatcher understands.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// A pointer button went down.
    PointerDown,
    /// A pointer moved.
    PointerMove,
    /// A pointer button went up.
    PointerUp,
    /// The host cancelled the pointer (for example a touch was interrupted).
    PointerCancel,
    /// A pointer entered an element.
    PointerEnter,
    /// A pointer left an element.
    PointerLeave,
    /// An element started capturing a pointer.
    GotPointerCapture,
    /// An element stopped capturing a pointer.
    LostPointerCapture,
    /// A mouse button went down.
    MouseDown,
    /// The mouse moved.
    MouseMove,
    /// A mouse button went up.
    MouseUp,
    /// The mouse entered an element.
    MouseEnter,
    /// The mouse left an element.
    MouseLeave,
    /// A wheel was scrolled.
    Wheel,
    /// A host drag moved over an element.
    DragUpdated,
    /// A host drag was dropped on an element.
    DragPerform,
    /// A host drag ended.
    DragExited,
    /// A host drag entered an element.
    DragEnter,
    /// A host drag left an element.
    DragLeave,
    /// A key went down.
    KeyDown,
    /// A key went up.
    KeyUp,
    /// The element was attached to a panel.
    AttachToPanel,
    /// The element was detached from its panel.
    DetachFromPanel,
}

impl EventKind {
    /// Pointer-family events, including capture notifications.
    #[must_use]
    pub const fn is_pointer_event(self) -> bool {
        matches!(
            self,
            Self::PointerDown
                | Self::PointerMove
                | Self::PointerUp
                | Self::PointerCancel
                | Self::PointerEnter
                | Self::PointerLeave
                | Self::GotPointerCapture
                | Self::LostPointerCapture
        )
    }

    /// Mouse-family events. Host drag events count as mouse events.
    #[must_use]
    pub const fn is_mouse_event(self) -> bool {
        matches!(
            self,
            Self::MouseDown
                | Self::MouseMove
                | Self::MouseUp
                | Self::MouseEnter
                | Self::MouseLeave
                | Self::Wheel
                | Self::DragUpdated
                | Self::DragPerform
                | Self::DragExited
                | Self::DragEnter
                | Self::DragLeave
        )
    }

    /// Capture begin/end notifications.
    #[must_use]
    pub const fn is_capture_event(self) -> bool {
        matches!(self, Self::GotPointerCapture | Self::LostPointerCapture)
    }

    /// Whether the event visits ancestors on the way down.
    #[must_use]
    pub const fn trickles_down(self) -> bool {
        !matches!(self, Self::AttachToPanel | Self::DetachFromPanel)
    }

    /// Whether the event visits ancestors on the way up.
    #[must_use]
    pub const fn bubbles(self) -> bool {
        !matches!(
            self,
            Self::PointerEnter
                | Self::PointerLeave
                | Self::MouseEnter
                | Self::MouseLeave
                | Self::DragEnter
                | Self::DragLeave
                | Self::AttachToPanel
                | Self::DetachFromPanel
        )
    }
}

/// Where an event came from.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum EventSource {
    /// A physical mouse.
    Mouse,
    /// A touch screen.
    Touch,
    /// A pen or stylus.
    Pen,
    /// Generated by code rather than by a device.
    Synthetic,
}

impl From<PointerType> for EventSource {
    fn from(value: PointerType) -> Self {
        match value {
            PointerType::Mouse => Self::Mouse,
            PointerType::Touch => Self::Touch,
            PointerType::Pen => Self::Pen,
        }
    }
}

bitflags::bitflags! {
    /// Dispatch bookkeeping carried by an [`Event`].
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct EventFlags: u8 {
        /// No further elements receive the event.
        const PROPAGATION_STOPPED = 1 << 0;
        /// No further listeners receive the event, not even on the current element.
        const IMMEDIATE_PROPAGATION_STOPPED = 1 << 1;
        /// The default action must not run.
        const DEFAULT_PREVENTED = 1 << 2;
        /// The remaining dispatch pipeline is skipped.
        const STOP_DISPATCH = 1 << 3;
        /// The event is being delivered to listeners right now.
        const DISPATCHING = 1 << 4;
        /// Legacy immediate-mode handlers may see the event.
        const PROPAGATE_TO_IMGUI = 1 << 5;
    }
}

/// An event travelling through the dispatcher.
///
/// Payload fields are public. Routing state (current target, phase, flags)
/// is owned by the dispatcher and read through accessors; listeners change it
/// only through [`Event::stop_propagation`] and friends.
#[derive(Clone, Debug, PartialEq)]
pub struct Event {
    /// What happened.
    pub kind: EventKind,
    /// Pointer id for pointer and mouse events.
    pub pointer_id: usize,
    /// Kind of device behind `pointer_id`.
    pub pointer_type: PointerType,
    /// Device or code that produced the event.
    pub source: EventSource,
    /// Position in panel coordinates.
    pub position: Point,
    /// Button that changed, if any.
    pub button: Option<u32>,
    /// Buttons held when the event was dispatched.
    pub pressed_buttons: u32,
    /// Explicit target chosen by whoever sent the event.
    pub target: Option<ElementId>,
    /// Element under the pointer, as picked by the host.
    pub hit_target: Option<ElementId>,
    current_target: Option<ElementId>,
    phase: Phase,
    flags: EventFlags,
}

impl Event {
    /// Creates an event of `kind` for the mouse pointer at the origin.
    #[must_use]
    pub fn new(kind: EventKind) -> Self {
        let flags = if kind.is_pointer_event() || kind.is_mouse_event() {
            EventFlags::PROPAGATE_TO_IMGUI
        } else {
            EventFlags::empty()
        };
        Self {
            kind,
            pointer_id: pointer_id::MOUSE,
            pointer_type: PointerType::Mouse,
            source: EventSource::Mouse,
            position: Point::ZERO,
            button: None,
            pressed_buttons: 0,
            target: None,
            hit_target: None,
            current_target: None,
            phase: Phase::None,
            flags,
        }
    }

    /// Creates a pointer event; the pointer type and source follow `pointer_id`.
    #[must_use]
    pub fn pointer(kind: EventKind, pointer_id: usize, position: Point) -> Self {
        let pointer_type = PointerType::of(pointer_id);
        Self {
            pointer_id,
            pointer_type,
            source: pointer_type.into(),
            position,
            ..Self::new(kind)
        }
    }

    /// Sets the button that changed.
    #[must_use]
    pub fn with_button(mut self, button: u32) -> Self {
        self.button = Some(button);
        self
    }

    /// Sets the explicit target.
    #[must_use]
    pub fn with_target(mut self, target: ElementId) -> Self {
        self.target = Some(target);
        self
    }

    /// Sets the host-picked element under the pointer.
    #[must_use]
    pub fn with_hit_target(mut self, hit_target: ElementId) -> Self {
        self.hit_target = Some(hit_target);
        self
    }

    /// Overrides the event source.
    #[must_use]
    pub fn with_source(mut self, source: EventSource) -> Self {
        self.source = source;
        self
    }

    /// Element whose listeners are running.
    #[must_use]
    pub fn current_target(&self) -> Option<ElementId> {
        self.current_target
    }

    /// Current propagation phase.
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// All dispatch flags.
    #[must_use]
    pub fn flags(&self) -> EventFlags {
        self.flags
    }

    /// Stops the event after the current element's listeners.
    pub fn stop_propagation(&mut self) {
        self.flags |= EventFlags::PROPAGATION_STOPPED;
    }

    /// Stops the event right after the running listener.
    pub fn stop_immediate_propagation(&mut self) {
        self.flags |=
            EventFlags::PROPAGATION_STOPPED | EventFlags::IMMEDIATE_PROPAGATION_STOPPED;
    }

    /// Suppresses the default action.
    pub fn prevent_default(&mut self) {
        self.flags |= EventFlags::DEFAULT_PREVENTED;
    }

    /// Returns `true` once propagation was stopped.
    #[must_use]
    pub fn is_propagation_stopped(&self) -> bool {
        self.flags.contains(EventFlags::PROPAGATION_STOPPED)
    }

    /// Returns `true` once immediate propagation was stopped.
    #[must_use]
    pub fn is_immediate_propagation_stopped(&self) -> bool {
        self.flags
            .contains(EventFlags::IMMEDIATE_PROPAGATION_STOPPED)
    }

    /// Returns `true` once the default action was prevented.
    #[must_use]
    pub fn is_default_prevented(&self) -> bool {
        self.flags.contains(EventFlags::DEFAULT_PREVENTED)
    }

    /// Returns `true` when the remaining dispatch pipeline must be skipped.
    #[must_use]
    pub fn stop_dispatch(&self) -> bool {
        self.flags.contains(EventFlags::STOP_DISPATCH)
    }

    /// Returns `true` while listeners are being invoked.
    #[must_use]
    pub fn is_dispatching(&self) -> bool {
        self.flags.contains(EventFlags::DISPATCHING)
    }

    /// Returns `true` if legacy immediate-mode handlers may see the event.
    #[must_use]
    pub fn propagate_to_imgui(&self) -> bool {
        self.flags.contains(EventFlags::PROPAGATE_TO_IMGUI)
    }

    pub(crate) fn set_current_target(&mut self, target: Option<ElementId>) {
        self.current_target = target;
    }

    pub(crate) fn set_phase(&mut self, phase: Phase) {
        self.phase = phase;
    }

    pub(crate) fn set_flag(&mut self, flag: EventFlags, value: bool) {
        self.flags.set(flag, value);
    }

    /// Stops propagation, prevents default and skips the rest of dispatch.
    pub(crate) fn consume(&mut self) {
        self.stop_propagation();
        self.prevent_default();
        self.flags |= EventFlags::STOP_DISPATCH;
    }
}
