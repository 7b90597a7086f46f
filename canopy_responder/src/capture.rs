// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pointer capture bookkeeping.
//!
//! Each pointer id has a *pending* capturer, changed immediately by capture
//! and release requests, and a *current* capturer, which only catches up when
//! the capture is processed. Processing yields the transition so the caller
//! can notify the old and new capturers.

use hashbrown::HashMap;

use crate::event::{Event, EventKind};
use crate::tree::ElementTree;
use crate::types::ElementId;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct CaptureSlot {
    current: Option<ElementId>,
    pending: Option<ElementId>,
}

/// A committed change of capturer for one pointer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CaptureTransition {
    /// Pointer whose capture changed.
    pub pointer_id: usize,
    /// Element that lost the capture.
    pub lost: Option<ElementId>,
    /// Element that got the capture.
    pub got: Option<ElementId>,
}

impl CaptureTransition {
    /// Sends `LostPointerCapture` then `GotPointerCapture` to the live elements
    /// involved.
    pub fn deliver(&self, tree: &ElementTree) {
        let notify = |element: Option<ElementId>, kind: EventKind| {
            let Some(element) = element.filter(|e| tree.is_alive(*e)) else {
                return;
            };
            let mut event = Event::new(kind);
            event.pointer_id = self.pointer_id;
            event.pointer_type = canopy_pointer::PointerType::of(self.pointer_id);
            event.source = event.pointer_type.into();
            tree.send_at_target(element, &mut event);
        };
        notify(self.lost, EventKind::LostPointerCapture);
        notify(self.got, EventKind::GotPointerCapture);
    }
}

/// Capturing element per pointer id.
#[derive(Clone, Debug, Default)]
pub struct PointerCaptureState {
    slots: HashMap<usize, CaptureSlot>,
}

impl PointerCaptureState {
    /// Creates an empty capture table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests that `element` capture `pointer_id`.
    pub fn capture(&mut self, pointer_id: usize, element: ElementId) {
        self.slots.entry(pointer_id).or_default().pending = Some(element);
    }

    /// Clears the pending capture of `pointer_id`.
    pub fn release(&mut self, pointer_id: usize) {
        if let Some(slot) = self.slots.get_mut(&pointer_id) {
            slot.pending = None;
        }
    }

    /// Clears the pending capture of `pointer_id` if `element` holds it.
    ///
    /// Returns `true` if a capture was released.
    pub fn release_element(&mut self, pointer_id: usize, element: ElementId) -> bool {
        match self.slots.get_mut(&pointer_id) {
            Some(slot) if slot.pending == Some(element) => {
                slot.pending = None;
                true
            }
            _ => false,
        }
    }

    /// Element that will capture `pointer_id`, including unprocessed requests.
    #[must_use]
    pub fn capturing_element(&self, pointer_id: usize) -> Option<ElementId> {
        self.slots.get(&pointer_id)?.pending
    }

    /// Element whose capture of `pointer_id` has been processed.
    #[must_use]
    pub fn processed_capture(&self, pointer_id: usize) -> Option<ElementId> {
        self.slots.get(&pointer_id)?.current
    }

    /// Commits the pending capture of `pointer_id`.
    ///
    /// Returns the transition if the capturer changed.
    pub fn process(&mut self, pointer_id: usize) -> Option<CaptureTransition> {
        let slot = self.slots.get_mut(&pointer_id)?;
        if slot.current == slot.pending {
            return None;
        }
        let transition = CaptureTransition {
            pointer_id,
            lost: slot.current,
            got: slot.pending,
        };
        slot.current = slot.pending;
        if slot.current.is_none() {
            self.slots.remove(&pointer_id);
        }
        tracing::trace!(?transition, "pointer capture processed");
        Some(transition)
    }

    /// Forgets every capture.
    pub fn reset(&mut self) {
        self.slots.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids() -> (ElementId, ElementId) {
        (ElementId::new(1, 1), ElementId::new(2, 1))
    }

    #[test]
    fn pending_changes_before_processing() {
        let (a, _) = ids();
        let mut state = PointerCaptureState::new();
        state.capture(0, a);
        assert_eq!(state.capturing_element(0), Some(a));
        assert_eq!(state.processed_capture(0), None);

        let t = state.process(0).unwrap();
        assert_eq!(t.lost, None);
        assert_eq!(t.got, Some(a));
        assert_eq!(state.processed_capture(0), Some(a));
        assert_eq!(state.process(0), None);
    }

    #[test]
    fn switching_capturer_reports_both_sides() {
        let (a, b) = ids();
        let mut state = PointerCaptureState::new();
        state.capture(3, a);
        state.process(3);
        state.capture(3, b);
        let t = state.process(3).unwrap();
        assert_eq!((t.lost, t.got), (Some(a), Some(b)));
    }

    #[test]
    fn release_element_only_releases_holder() {
        let (a, b) = ids();
        let mut state = PointerCaptureState::new();
        state.capture(0, a);
        assert!(!state.release_element(0, b));
        assert!(!state.release_element(1, a));
        assert!(state.release_element(0, a));
        assert_eq!(state.capturing_element(0), None);
    }

    #[test]
    fn processing_a_release_clears_the_slot() {
        let (a, _) = ids();
        let mut state = PointerCaptureState::new();
        state.capture(0, a);
        state.process(0);
        state.release(0);
        let t = state.process(0).unwrap();
        assert_eq!((t.lost, t.got), (Some(a), None));
        assert_eq!(state.processed_capture(0), None);
        assert_eq!(state.process(0), None);
    }
}
