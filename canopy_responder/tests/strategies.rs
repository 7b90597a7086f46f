// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Strategy chain behavior through the public dispatcher API.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use canopy_pointer::{PanelId, PointerInputState, pointer_id};
use canopy_responder::dispatcher::{DispatcherConfig, EventDispatcher};
use canopy_responder::event::{Event, EventKind};
use canopy_responder::strategy::EventInterceptor;
use canopy_responder::tree::ElementTree;
use canopy_responder::types::{ElementId, ListenerPhase, ListenerScope, Phase};
use kurbo::{Point, Rect};

type Log = Rc<RefCell<Vec<(EventKind, ElementId, Phase)>>>;

struct Fixture {
    tree: ElementTree,
    dispatcher: EventDispatcher,
    pointers: PointerInputState,
    panel_a: PanelId,
    panel_b: PanelId,
    capturer: ElementId,
    other: ElementId,
    log: Log,
}

fn fixture(debugger_enabled: bool) -> Fixture {
    let mut tree = ElementTree::new();
    let panel_a = tree.create_panel(Rect::new(0.0, 0.0, 100.0, 100.0));
    let panel_b = tree.create_panel(Rect::new(0.0, 0.0, 100.0, 100.0));
    let root_a = tree.panel(panel_a).unwrap().root();
    let capturer = tree.insert(root_a).unwrap();
    let other = tree.insert(root_a).unwrap();
    let log = Log::default();
    for element in [root_a, capturer, other] {
        for kind in [
            EventKind::PointerMove,
            EventKind::PointerDown,
            EventKind::GotPointerCapture,
            EventKind::LostPointerCapture,
            EventKind::MouseDown,
        ] {
            let log = log.clone();
            tree.register(
                element,
                kind,
                ListenerPhase::BubbleUp,
                ListenerScope::Permanent,
                move |e| {
                    log.borrow_mut()
                        .push((e.kind, e.current_target().unwrap(), e.phase()));
                },
            )
            .unwrap();
        }
    }
    let dispatcher = EventDispatcher::new(DispatcherConfig {
        debugger_enabled,
        ..DispatcherConfig::default()
    });
    Fixture {
        tree,
        dispatcher,
        pointers: PointerInputState::new(),
        panel_a,
        panel_b,
        capturer,
        other,
        log,
    }
}

impl Fixture {
    fn dispatch(&mut self, event: &mut Event, panel: PanelId) {
        self.dispatcher
            .dispatch(event, panel, &mut self.tree, &mut self.pointers)
            .unwrap();
    }

    fn capture(&mut self, pointer: usize) {
        self.dispatcher
            .capture_pointer(&self.tree, self.capturer, pointer)
            .unwrap();
        self.dispatcher
            .process_pointer_capture(&self.tree, pointer);
        self.log.borrow_mut().clear();
    }
}

#[test]
fn captured_pointer_is_redirected_at_target() {
    let mut f = fixture(false);
    f.capture(0);
    let mut event =
        Event::pointer(EventKind::PointerMove, 0, Point::new(10.0, 10.0)).with_hit_target(f.other);
    f.dispatch(&mut event, f.panel_a);

    assert_eq!(
        *f.log.borrow(),
        vec![(EventKind::PointerMove, f.capturer, Phase::AtTarget)]
    );
    assert_eq!(event.target, Some(f.capturer));
    assert!(event.stop_dispatch());
    assert!(!event.propagate_to_imgui());
    assert!(!event.is_dispatching());
}

#[test]
fn other_pointers_are_not_redirected() {
    let mut f = fixture(false);
    f.capture(0);
    let touch = pointer_id::TOUCH_BASE;
    let mut event = Event::pointer(EventKind::PointerMove, touch, Point::new(10.0, 10.0))
        .with_hit_target(f.other);
    f.dispatch(&mut event, f.panel_a);

    assert!(!event.stop_dispatch());
    let log = f.log.borrow();
    assert_eq!(log[0], (EventKind::PointerMove, f.other, Phase::AtTarget));
    assert_eq!(log.len(), 2, "bubbled to the root");
}

#[test]
fn capture_does_not_intercept_in_another_panel() {
    // The capturer lives in panel A. Events for the same pointer dispatched
    // into panel B are left alone and the capture stays in place.
    let mut f = fixture(false);
    f.capture(0);
    let root_b = f.tree.panel(f.panel_b).unwrap().root();
    let mut event =
        Event::pointer(EventKind::PointerMove, 0, Point::new(10.0, 10.0)).with_hit_target(root_b);
    f.dispatch(&mut event, f.panel_b);

    assert!(!event.stop_dispatch());
    assert!(f.log.borrow().is_empty());
    assert_eq!(f.dispatcher.capturing_element(0), Some(f.capturer));
}

#[test]
fn capture_moved_to_another_panel_hangs_until_released() {
    let mut f = fixture(false);
    f.capture(0);
    let root_b = f.tree.panel(f.panel_b).unwrap().root();
    f.tree.append(root_b, f.capturer).unwrap();

    let mut event =
        Event::pointer(EventKind::PointerMove, 0, Point::new(10.0, 10.0)).with_hit_target(f.other);
    f.dispatch(&mut event, f.panel_a);
    assert!(!event.stop_dispatch());
    assert_eq!(f.dispatcher.capturing_element(0), Some(f.capturer));

    f.dispatcher.release_pointer(0);
    f.dispatcher.process_pointer_capture(&f.tree, 0);
    assert_eq!(f.dispatcher.capturing_element(0), None);
}

#[test]
fn stale_capture_is_released() {
    let mut f = fixture(false);
    f.capture(0);
    f.tree.detach(f.capturer).unwrap();
    f.log.borrow_mut().clear();

    let mut event =
        Event::pointer(EventKind::PointerMove, 0, Point::new(10.0, 10.0)).with_hit_target(f.other);
    f.dispatch(&mut event, f.panel_a);

    assert!(!event.stop_dispatch());
    assert_eq!(f.dispatcher.capturing_element(0), None);
    let log = f.log.borrow();
    assert!(log.contains(&(EventKind::PointerMove, f.other, Phase::AtTarget)));
    assert!(
        log.contains(&(EventKind::LostPointerCapture, f.capturer, Phase::AtTarget)),
        "old capturer is told after the release is processed"
    );
}

#[test]
fn explicit_other_target_is_not_redirected() {
    let mut f = fixture(false);
    f.capture(0);
    let mut event =
        Event::pointer(EventKind::PointerDown, 0, Point::new(10.0, 10.0)).with_target(f.other);
    f.dispatch(&mut event, f.panel_a);

    assert!(!event.stop_dispatch());
    assert_eq!(f.log.borrow()[0], (EventKind::PointerDown, f.other, Phase::AtTarget));
}

#[test]
fn capture_change_notifies_both_elements() {
    let mut f = fixture(false);
    f.capture(0);
    f.dispatcher
        .capture_pointer(&f.tree, f.other, 0)
        .unwrap();
    f.dispatcher.process_pointer_capture(&f.tree, 0);
    assert_eq!(
        *f.log.borrow(),
        vec![
            (EventKind::LostPointerCapture, f.capturer, Phase::AtTarget),
            (EventKind::GotPointerCapture, f.other, Phase::AtTarget),
        ]
    );
    assert!(f.dispatcher.has_pointer_capture(f.other, 0));
}

#[test]
fn touch_capture_ends_with_contact() {
    let mut f = fixture(false);
    let touch = pointer_id::TOUCH_BASE + 2;
    f.capture(touch);
    let mut up = Event::pointer(EventKind::PointerUp, touch, Point::new(10.0, 10.0)).with_button(0);
    f.dispatch(&mut up, f.panel_a);
    assert_eq!(f.dispatcher.capturing_element(touch), None);
    assert_eq!(f.dispatcher.capture_state().processed_capture(touch), None);
}

struct Picker {
    seen: Rc<Cell<usize>>,
    post: Rc<Cell<usize>>,
}

impl EventInterceptor for Picker {
    fn intercept_event(&mut self, _panel: PanelId, event: &Event) -> bool {
        self.seen.set(self.seen.get() + 1);
        event.kind == EventKind::MouseDown
    }

    fn post_process_event(&mut self, _panel: PanelId, _event: &Event) {
        self.post.set(self.post.get() + 1);
    }
}

#[test]
fn debug_overlay_consumes_mouse_events() {
    let mut f = fixture(true);
    let seen = Rc::new(Cell::new(0));
    let post = Rc::new(Cell::new(0));
    f.dispatcher.set_debug_overlay(Some(Box::new(Picker {
        seen: seen.clone(),
        post: post.clone(),
    })));

    let mut event = Event::new(EventKind::MouseDown).with_target(f.other);
    f.dispatch(&mut event, f.panel_a);
    assert!(event.stop_dispatch());
    assert!(event.is_propagation_stopped());
    assert!(event.is_default_prevented());
    assert!(f.log.borrow().is_empty());

    // Non-mouse events never reach the overlay.
    let mut key = Event::new(EventKind::KeyDown).with_target(f.other);
    f.dispatch(&mut key, f.panel_a);
    assert_eq!(seen.get(), 1);
    assert_eq!(post.get(), 0, "overlay has no post hook");
}

#[test]
fn panel_interceptor_sees_every_event_and_post_processes() {
    let mut f = fixture(true);
    let seen = Rc::new(Cell::new(0));
    let post = Rc::new(Cell::new(0));
    f.tree
        .set_panel_debug(
            f.panel_a,
            Some(Box::new(Picker {
                seen: seen.clone(),
                post: post.clone(),
            })),
        )
        .unwrap();

    let mut key = Event::new(EventKind::KeyDown).with_target(f.other);
    f.dispatch(&mut key, f.panel_a);
    assert!(!key.stop_dispatch());
    let mut down = Event::new(EventKind::MouseDown).with_target(f.other);
    f.dispatch(&mut down, f.panel_a);
    assert!(down.stop_dispatch());

    assert_eq!(seen.get(), 2);
    assert_eq!(post.get(), 2);
}

#[test]
fn disabled_debugger_declines_everything() {
    let mut f = fixture(false);
    let seen = Rc::new(Cell::new(0));
    let post = Rc::new(Cell::new(0));
    f.dispatcher.set_debug_overlay(Some(Box::new(Picker {
        seen: seen.clone(),
        post: post.clone(),
    })));

    let mut event = Event::new(EventKind::MouseDown).with_target(f.other);
    f.dispatch(&mut event, f.panel_a);
    assert!(!event.stop_dispatch());
    assert_eq!(seen.get(), 0);
    assert_eq!(
        f.log.borrow()[0],
        (EventKind::MouseDown, f.other, Phase::AtTarget)
    );

    f.dispatcher.set_debugger_enabled(true);
    let mut again = Event::new(EventKind::MouseDown).with_target(f.other);
    f.dispatch(&mut again, f.panel_a);
    assert!(again.stop_dispatch());
}
