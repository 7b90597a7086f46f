// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Event dispatcher: strategy chain, then trickle-down → target → bubble-up.
//!
//! A dispatch pass for one event runs in this order:
//!
//! 1. Pointer bookkeeping: pointer down/move/up/cancel save their position
//!    into [`PointerInputState`] and update the pressed-button mask, which is
//!    stamped onto the event.
//! 2. Each [`DispatchingStrategy`] that accepts the event gets a chance to
//!    handle it. The first one to set `stop_dispatch` ends this step.
//! 3. Unless dispatch was stopped, the event propagates along the path to its
//!    explicit `target` (or the host's `hit_target`).
//! 4. Post-dispatch hooks of all strategies run, and pointer capture changes
//!    requested during the pass are processed.
//!
//! Propagation itself is a plain walk over a [`Dispatch`] sequence via
//! [`run`], honoring [`Outcome`] at each step.
//!
//! ## Minimal example
//!
//! ```
//! use canopy_responder::dispatcher;
//! use canopy_responder::types::{Dispatch, Outcome, Phase};
//!
//! let seq = vec![
//!     Dispatch::trickle_down(1_u32),
//!     Dispatch::at_target(2),
//!     Dispatch::bubble_up(1),
//! ];
//! let mut seen = Vec::new();
//! let consumed = dispatcher::run(&seq, &mut seen, |d, seen| {
//!     seen.push((d.phase, d.node));
//!     if d.phase == Phase::AtTarget { Outcome::Stop } else { Outcome::Continue }
//! });
//! assert!(!consumed);
//! assert_eq!(seen, vec![(Phase::TrickleDown, 1), (Phase::AtTarget, 2)]);
//! ```

use alloc::boxed::Box;
use alloc::vec;
use alloc::vec::Vec;

use canopy_pointer::{PanelBounds, PanelId, PointerContext, PointerInputState, PointerType};

use crate::capture::PointerCaptureState;
use crate::error::DispatchError;
use crate::event::{Event, EventFlags, EventKind};
use crate::strategy::{
    DebuggerStrategy, DispatchingStrategy, EventInterceptor, PointerCaptureStrategy, StrategyCx,
};
use crate::tree::ElementTree;
use crate::types::{Dispatch, ElementId, Outcome, Phase};

/// Run a handler over a dispatch sequence and honor stop/consume outcomes.
///
/// - [`Outcome::Continue`]: keep going.
/// - [`Outcome::Stop`]: abort propagation immediately.
/// - [`Outcome::StopAndConsume`]: abort propagation and return `true`.
///
/// Returns `true` if consumed, otherwise `false`.
pub fn run<K, E>(
    seq: &[Dispatch<K>],
    event: &mut E,
    mut handler: impl FnMut(&Dispatch<K>, &mut E) -> Outcome,
) -> bool {
    for d in seq {
        match handler(d, event) {
            Outcome::Continue => {}
            Outcome::Stop => return false,
            Outcome::StopAndConsume => return true,
        }
    }
    false
}

/// Builds the propagation sequence for an event of `kind` aimed at `target`.
///
/// Ancestors are visited root-first on the way down and target-first on the
/// way up; the phases an event kind does not use are left out. Dead targets
/// produce an empty sequence.
#[must_use]
pub fn propagation_path(
    tree: &ElementTree,
    target: ElementId,
    kind: EventKind,
) -> Vec<Dispatch<ElementId>> {
    let path = tree.path_to(target);
    let Some((&target, ancestors)) = path.split_last() else {
        return Vec::new();
    };
    let mut seq = Vec::with_capacity(ancestors.len() * 2 + 1);
    if kind.trickles_down() {
        seq.extend(ancestors.iter().copied().map(Dispatch::trickle_down));
    }
    seq.push(Dispatch::at_target(target));
    if kind.bubbles() {
        seq.extend(ancestors.iter().rev().copied().map(Dispatch::bubble_up));
    }
    seq
}

/// Dispatcher settings.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DispatcherConfig {
    /// Which pointer-location table pointer events are recorded in.
    pub context: PointerContext,
    /// Whether the debugger strategy takes part in dispatch.
    pub debugger_enabled: bool,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            context: PointerContext::Player,
            debugger_enabled: cfg!(debug_assertions),
        }
    }
}

/// Dispatches events for every panel of one pointer context.
#[derive(Debug)]
pub struct EventDispatcher {
    config: DispatcherConfig,
    strategies: Vec<DispatchingStrategy>,
    capture: PointerCaptureState,
}

impl Default for EventDispatcher {
    fn default() -> Self {
        Self::new(DispatcherConfig::default())
    }
}

impl EventDispatcher {
    /// Creates a dispatcher with the debugger and pointer capture strategies,
    /// in that order.
    #[must_use]
    pub fn new(config: DispatcherConfig) -> Self {
        Self {
            config,
            strategies: vec![
                DispatchingStrategy::Debugger(DebuggerStrategy::new(config.debugger_enabled)),
                DispatchingStrategy::PointerCapture(PointerCaptureStrategy),
            ],
            capture: PointerCaptureState::new(),
        }
    }

    /// Current settings.
    #[must_use]
    pub fn config(&self) -> DispatcherConfig {
        self.config
    }

    /// The strategy chain in evaluation order.
    #[must_use]
    pub fn strategies(&self) -> &[DispatchingStrategy] {
        &self.strategies
    }

    fn debugger_mut(&mut self) -> Option<&mut DebuggerStrategy> {
        self.strategies.iter_mut().find_map(|s| match s {
            DispatchingStrategy::Debugger(d) => Some(d),
            DispatchingStrategy::PointerCapture(_) => None,
        })
    }

    /// Turns the debugger strategy on or off.
    pub fn set_debugger_enabled(&mut self, enabled: bool) {
        self.config.debugger_enabled = enabled;
        if let Some(debugger) = self.debugger_mut() {
            debugger.set_enabled(enabled);
        }
    }

    /// Installs or removes the global debug overlay.
    pub fn set_debug_overlay(&mut self, overlay: Option<Box<dyn EventInterceptor>>) {
        if let Some(debugger) = self.debugger_mut() {
            debugger.set_overlay(overlay);
        }
    }

    // =========================================================================
    // Pointer capture
    // =========================================================================

    /// Requests that `element` capture `pointer_id`.
    ///
    /// The request takes effect the next time capture is processed, which the
    /// dispatcher does after each pointer event.
    pub fn capture_pointer(
        &mut self,
        tree: &ElementTree,
        element: ElementId,
        pointer_id: usize,
    ) -> Result<(), DispatchError> {
        if !tree.is_alive(element) {
            return Err(DispatchError::UnknownElement(element));
        }
        if tree.panel_of(element).is_none() {
            return Err(DispatchError::NotAttached(element));
        }
        self.capture.capture(pointer_id, element);
        Ok(())
    }

    /// Releases whatever captures `pointer_id`.
    pub fn release_pointer(&mut self, pointer_id: usize) {
        self.capture.release(pointer_id);
    }

    /// Releases `pointer_id` if `element` captures it.
    pub fn release_element_capture(&mut self, element: ElementId, pointer_id: usize) -> bool {
        self.capture.release_element(pointer_id, element)
    }

    /// Element capturing `pointer_id`, including unprocessed requests.
    #[must_use]
    pub fn capturing_element(&self, pointer_id: usize) -> Option<ElementId> {
        self.capture.capturing_element(pointer_id)
    }

    /// Returns `true` if `element` captures `pointer_id`.
    #[must_use]
    pub fn has_pointer_capture(&self, element: ElementId, pointer_id: usize) -> bool {
        self.capture.capturing_element(pointer_id) == Some(element)
    }

    /// Commits pending capture changes for `pointer_id` and notifies the
    /// elements involved.
    pub fn process_pointer_capture(&mut self, tree: &ElementTree, pointer_id: usize) {
        if let Some(transition) = self.capture.process(pointer_id) {
            transition.deliver(tree);
        }
    }

    /// Capture table.
    #[must_use]
    pub fn capture_state(&self) -> &PointerCaptureState {
        &self.capture
    }

    // =========================================================================
    // Dispatch
    // =========================================================================

    /// Dispatches `event` within `panel`.
    pub fn dispatch(
        &mut self,
        event: &mut Event,
        panel: PanelId,
        tree: &mut ElementTree,
        pointers: &mut PointerInputState,
    ) -> Result<(), DispatchError> {
        let bounds = tree.panel(panel).ok_or(DispatchError::UnknownPanel(panel))?;
        self.record_pointer(event, bounds, pointers);

        let mut cx = StrategyCx {
            tree: &mut *tree,
            capture: &mut self.capture,
        };
        for strategy in &mut self.strategies {
            if strategy.can_dispatch_event(event) {
                strategy.dispatch_event(event, panel, &mut cx);
                if event.stop_dispatch() {
                    break;
                }
            }
        }

        let result = if event.stop_dispatch() {
            Ok(())
        } else {
            propagate(cx.tree, event)
        };

        for strategy in &mut self.strategies {
            strategy.post_dispatch(event, panel, &mut cx);
        }
        self.after_pointer_event(event, tree);
        result
    }

    fn record_pointer(
        &self,
        event: &mut Event,
        panel: &dyn PanelBounds,
        pointers: &mut PointerInputState,
    ) {
        let id = event.pointer_id;
        let context = self.config.context;
        match event.kind {
            EventKind::PointerDown => {
                pointers.save_pointer_position(id, event.position, Some(panel), context);
                if let Some(button) = event.button {
                    pointers.press_button(id, button);
                }
            }
            EventKind::PointerMove => {
                pointers.save_pointer_position(id, event.position, Some(panel), context);
            }
            EventKind::PointerUp => {
                pointers.save_pointer_position(id, event.position, Some(panel), context);
                if let Some(button) = event.button {
                    pointers.release_button(id, button);
                }
            }
            EventKind::PointerCancel => {
                pointers.save_pointer_position(id, event.position, Some(panel), context);
                pointers.release_all_buttons(id);
            }
            _ => return,
        }
        event.pressed_buttons = pointers.pressed_buttons(id);
    }

    fn after_pointer_event(&mut self, event: &Event, tree: &ElementTree) {
        if !event.kind.is_pointer_event() || event.kind.is_capture_event() {
            return;
        }
        // Touch and pen contacts do not outlive their release.
        if matches!(event.kind, EventKind::PointerUp | EventKind::PointerCancel)
            && event.pointer_type != PointerType::Mouse
        {
            self.capture.release(event.pointer_id);
        }
        self.process_pointer_capture(tree, event.pointer_id);
    }
}

fn propagate(tree: &ElementTree, event: &mut Event) -> Result<(), DispatchError> {
    let Some(target) = event.target.or(event.hit_target) else {
        return Ok(());
    };
    if !tree.is_alive(target) {
        return Err(DispatchError::UnknownElement(target));
    }
    let seq = propagation_path(tree, target, event.kind);
    event.target = Some(target);
    event.set_flag(EventFlags::DISPATCHING, true);
    let consumed = run(&seq, event, |d, event| {
        event.set_phase(d.phase);
        tree.handle_event(d.node, event);
        match (event.is_propagation_stopped(), event.is_default_prevented()) {
            (false, _) => Outcome::Continue,
            (true, false) => Outcome::Stop,
            (true, true) => Outcome::StopAndConsume,
        }
    });
    event.set_current_target(None);
    event.set_phase(Phase::None);
    event.set_flag(EventFlags::DISPATCHING, false);
    tracing::trace!(kind = ?event.kind, ?target, consumed, "propagated");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::rc::Rc;
    use core::cell::RefCell;
    use kurbo::{Point, Rect};

    use crate::types::{ListenerPhase, ListenerScope};

    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    struct Node(u32);

    fn mk_seq() -> Vec<Dispatch<Node>> {
        vec![
            Dispatch::trickle_down(Node(1)),
            Dispatch::trickle_down(Node(2)),
            Dispatch::at_target(Node(3)),
            Dispatch::bubble_up(Node(2)),
            Dispatch::bubble_up(Node(1)),
        ]
    }

    #[test]
    fn run_continues_through_all() {
        let seq = mk_seq();
        let mut seen: Vec<(Phase, u32)> = Vec::new();
        let consumed = run(&seq, &mut seen, |d, seen| {
            seen.push((d.phase, d.node.0));
            Outcome::Continue
        });
        assert!(!consumed);
        assert_eq!(seen.len(), seq.len());
    }

    #[test]
    fn run_stop_and_consume_skips_bubble() {
        let seq = mk_seq();
        let mut seen: Vec<(Phase, u32)> = Vec::new();
        let consumed = run(&seq, &mut seen, |d, seen| {
            seen.push((d.phase, d.node.0));
            if d.phase == Phase::AtTarget {
                Outcome::StopAndConsume
            } else {
                Outcome::Continue
            }
        });
        assert!(consumed);
        assert_eq!(
            seen,
            vec![
                (Phase::TrickleDown, 1),
                (Phase::TrickleDown, 2),
                (Phase::AtTarget, 3)
            ]
        );
    }

    type Log = Rc<RefCell<Vec<(Phase, ElementId)>>>;

    fn listen_both(tree: &mut ElementTree, element: ElementId, kind: EventKind, log: &Log) {
        for phase in [ListenerPhase::TrickleDown, ListenerPhase::BubbleUp] {
            let log = log.clone();
            tree.register(element, kind, phase, ListenerScope::Permanent, move |e| {
                log.borrow_mut()
                    .push((e.phase(), e.current_target().unwrap()));
            })
            .unwrap();
        }
    }

    #[test]
    fn propagation_visits_root_to_target_and_back() {
        let mut tree = ElementTree::new();
        let panel = tree.create_panel(Rect::new(0.0, 0.0, 100.0, 100.0));
        let root = tree.panel(panel).unwrap().root();
        let a = tree.insert(root).unwrap();
        let b = tree.insert(a).unwrap();
        let log = Log::default();
        for element in [root, a, b] {
            listen_both(&mut tree, element, EventKind::PointerMove, &log);
        }

        let mut dispatcher = EventDispatcher::default();
        let mut pointers = PointerInputState::new();
        let mut event =
            Event::pointer(EventKind::PointerMove, 0, Point::new(5.0, 5.0)).with_hit_target(b);
        dispatcher
            .dispatch(&mut event, panel, &mut tree, &mut pointers)
            .unwrap();

        assert_eq!(
            *log.borrow(),
            vec![
                (Phase::TrickleDown, root),
                (Phase::TrickleDown, a),
                (Phase::AtTarget, b),
                (Phase::AtTarget, b),
                (Phase::BubbleUp, a),
                (Phase::BubbleUp, root),
            ]
        );
        assert_eq!(event.target, Some(b));
        assert_eq!(event.phase(), Phase::None);
        assert!(!event.is_dispatching());
    }

    #[test]
    fn stop_propagation_finishes_current_element() {
        let mut tree = ElementTree::new();
        let panel = tree.create_panel(Rect::new(0.0, 0.0, 100.0, 100.0));
        let root = tree.panel(panel).unwrap().root();
        let a = tree.insert(root).unwrap();
        let log = Log::default();
        tree.register(
            a,
            EventKind::KeyDown,
            ListenerPhase::TrickleDown,
            ListenerScope::Permanent,
            |e| e.stop_propagation(),
        )
        .unwrap();
        listen_both(&mut tree, a, EventKind::KeyDown, &log);
        listen_both(&mut tree, root, EventKind::KeyDown, &log);

        let mut dispatcher = EventDispatcher::default();
        let mut event = Event::new(EventKind::KeyDown).with_target(a);
        dispatcher
            .dispatch(&mut event, panel, &mut tree, &mut PointerInputState::new())
            .unwrap();

        assert_eq!(
            *log.borrow(),
            vec![
                (Phase::TrickleDown, root),
                (Phase::AtTarget, a),
                (Phase::AtTarget, a),
            ]
        );
        assert!(event.is_propagation_stopped());
    }

    #[test]
    fn pointer_bookkeeping_stamps_buttons() {
        let mut tree = ElementTree::new();
        let panel = tree.create_panel(Rect::new(0.0, 0.0, 100.0, 100.0));
        let mut dispatcher = EventDispatcher::default();
        let mut pointers = PointerInputState::new();

        let mut down =
            Event::pointer(EventKind::PointerDown, 0, Point::new(150.0, 5.0)).with_button(1);
        dispatcher
            .dispatch(&mut down, panel, &mut tree, &mut pointers)
            .unwrap();
        assert_eq!(down.pressed_buttons, 0b10);
        assert_eq!(
            pointers.pointer_position(0, PointerContext::Player),
            Point::new(150.0, 5.0)
        );
        assert_eq!(pointers.panel(0, PointerContext::Player), Some(panel));
        assert!(pointers.has_location_flag(
            0,
            PointerContext::Player,
            canopy_pointer::LocationFlags::OUTSIDE_PANEL
        ));

        let mut up = Event::pointer(EventKind::PointerUp, 0, Point::new(5.0, 5.0)).with_button(1);
        dispatcher
            .dispatch(&mut up, panel, &mut tree, &mut pointers)
            .unwrap();
        assert_eq!(up.pressed_buttons, 0);
    }

    #[test]
    fn unknown_panel_and_dead_target_are_errors() {
        let mut tree = ElementTree::new();
        let panel = tree.create_panel(Rect::new(0.0, 0.0, 10.0, 10.0));
        let root = tree.panel(panel).unwrap().root();
        let a = tree.insert(root).unwrap();
        tree.remove(a).unwrap();

        let mut dispatcher = EventDispatcher::default();
        let mut pointers = PointerInputState::new();
        let mut event = Event::new(EventKind::KeyDown).with_target(a);
        assert_eq!(
            dispatcher.dispatch(&mut event, panel, &mut tree, &mut pointers),
            Err(DispatchError::UnknownElement(a))
        );
        let bogus = PanelId::new(7);
        assert_eq!(
            dispatcher.dispatch(&mut event, bogus, &mut tree, &mut pointers),
            Err(DispatchError::UnknownPanel(bogus))
        );
    }

    #[test]
    fn capture_requires_attached_element() {
        let mut tree = ElementTree::new();
        tree.create_panel(Rect::new(0.0, 0.0, 10.0, 10.0));
        let loose = tree.create_element();
        let mut dispatcher = EventDispatcher::default();
        assert_eq!(
            dispatcher.capture_pointer(&tree, loose, 0),
            Err(DispatchError::NotAttached(loose))
        );
        assert_eq!(dispatcher.capturing_element(0), None);
    }

    #[test]
    fn strategy_order_is_debugger_then_capture() {
        let dispatcher = EventDispatcher::new(DispatcherConfig {
            context: PointerContext::Editor,
            debugger_enabled: true,
        });
        assert!(matches!(
            dispatcher.strategies(),
            [
                DispatchingStrategy::Debugger(_),
                DispatchingStrategy::PointerCapture(_)
            ]
        ));
    }
}
