// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drag-and-drop processor: turn pointer down/move/up into a host drag.
//!
//! A [`DragEventsProcessor`] owns the mechanics: activation thresholding,
//! listener wiring and forwarding host drag callbacks. What is dragged, how
//! the drop target looks and what a drop does are supplied by a
//! [`DragAndDropHandler`]. The host drag system is reached through a
//! [`DragAndDropService`].
//!
//! ## States
//!
//! - `Idle → Armed(start)` on a left-button pointer down the handler accepts.
//! - `Armed → Idle` on pointer up, or pointer leave (which also clears the
//!   handler's drag feedback), or when the element leaves its panel.
//! - `Armed → Idle` once a mouse-sourced move is further than the activation
//!   distance from `start` on either axis; the drag starts at that point.
//!
//! Host drag events are forwarded whatever the state:
//! `DragUpdated` → [`DragAndDropHandler::update_drag`] → visual mode,
//! `DragPerform` → [`DragAndDropHandler::on_drop`], clear feedback, accept,
//! `DragExited` / `DragLeave` → clear feedback.
//!
//! ## Minimal example
//!
//! ```
//! use std::{cell::RefCell, rc::Rc};
//! use kurbo::Point;
//! use canopy_event_state::drag::{
//!     DragAndDropHandler, DragAndDropService, DragConfig, DragEventsProcessor, DragSession,
//!     DragVisualMode, StartDragArgs,
//! };
//! use canopy_responder::event::{Event, EventKind};
//! use canopy_responder::tree::ElementTree;
//!
//! struct Card;
//! impl DragAndDropHandler for Card {
//!     fn can_start_drag(&mut self, _p: Point) -> bool { true }
//!     fn start_drag(&mut self, _p: Point) -> StartDragArgs { StartDragArgs::new("card") }
//!     fn update_drag(&mut self, _p: Point) -> DragVisualMode { DragVisualMode::Move }
//!     fn on_drop(&mut self, _p: Point) {}
//!     fn clear_drag_and_drop_ui(&mut self) {}
//! }
//!
//! #[derive(Default)]
//! struct Host { started: Vec<String> }
//! impl DragAndDropService for Host {
//!     fn start_drag(&mut self, args: StartDragArgs) { self.started.push(args.title); }
//!     fn set_visual_mode(&mut self, _mode: DragVisualMode) {}
//!     fn accept_drag(&mut self) {}
//! }
//!
//! let mut tree = ElementTree::new();
//! let element = tree.create_element();
//! let host = Rc::new(RefCell::new(Host::default()));
//! let drag = DragEventsProcessor::new(&mut tree, element, Card, host.clone(), DragConfig::default()).unwrap();
//!
//! drag.handle_event(&Event::pointer(EventKind::PointerDown, 0, Point::new(0.0, 0.0)).with_button(0));
//! assert_eq!(drag.session(), DragSession::Armed { start: Point::new(0.0, 0.0) });
//! drag.handle_event(&Event::pointer(EventKind::PointerMove, 0, Point::new(0.0, 8.0)));
//! assert_eq!(drag.session(), DragSession::Idle);
//! assert_eq!(host.borrow().started, vec!["card".to_string()]);
//! ```

use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;
use core::cell::{Ref, RefCell, RefMut};
use core::fmt;

use canopy_responder::DispatchError;
use canopy_responder::event::{Event, EventKind, EventSource};
use canopy_responder::tree::ElementTree;
use canopy_responder::types::{ElementId, ListenerId, ListenerPhase, ListenerScope};
use hashbrown::HashMap;
use kurbo::Point;

/// Payload handed to the host when a drag starts.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StartDragArgs {
    /// Label shown by the host while dragging.
    pub title: String,
    /// Asset paths carried by the drag.
    pub asset_paths: Vec<String>,
    /// Free-form key/value payload.
    pub generic_data: HashMap<String, String>,
}

impl StartDragArgs {
    /// Creates a payload with only a title.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Adds an asset path.
    #[must_use]
    pub fn with_asset_path(mut self, path: impl Into<String>) -> Self {
        self.asset_paths.push(path.into());
        self
    }

    /// Stores a generic value under `key`, replacing any previous one.
    pub fn set_generic_data(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.generic_data.insert(key.into(), value.into());
    }

    /// Looks up a generic value.
    #[must_use]
    pub fn generic_data(&self, key: &str) -> Option<&str> {
        self.generic_data.get(key).map(String::as_str)
    }
}

/// Feedback the host shows over a potential drop target.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum DragVisualMode {
    /// No indication.
    #[default]
    None,
    /// A copy would happen.
    Copy,
    /// A move would happen.
    Move,
    /// The drop is refused.
    Rejected,
    /// Some other action would happen.
    Generic,
}

/// Policy half of a drag: what starts a drag, what it carries, what a drop does.
pub trait DragAndDropHandler {
    /// Returns `true` if a drag may start from `position`.
    fn can_start_drag(&mut self, position: Point) -> bool;

    /// Builds the payload for a drag that started at `position`.
    fn start_drag(&mut self, position: Point) -> StartDragArgs;

    /// Called while a host drag moves over the element.
    fn update_drag(&mut self, position: Point) -> DragVisualMode;

    /// Called when a host drag is dropped on the element.
    fn on_drop(&mut self, position: Point);

    /// Removes any drop feedback the handler is showing.
    fn clear_drag_and_drop_ui(&mut self);
}

/// Host drag system.
pub trait DragAndDropService {
    /// Begins a host drag carrying `args`.
    fn start_drag(&mut self, args: StartDragArgs);

    /// Updates the feedback of the current host drag.
    fn set_visual_mode(&mut self, mode: DragVisualMode);

    /// Accepts the current host drag.
    fn accept_drag(&mut self);
}

/// Drag activation settings.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DragConfig {
    /// Displacement along either axis a move must exceed to start a drag.
    pub activation_distance: f64,
}

impl Default for DragConfig {
    fn default() -> Self {
        Self {
            activation_distance: 5.0,
        }
    }
}

/// Whether a drag may start.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub enum DragSession {
    /// Waiting for a pointer down.
    #[default]
    Idle,
    /// Pointer is down; a far enough move starts a drag.
    Armed {
        /// Where the pointer went down.
        start: Point,
    },
}

impl DragSession {
    /// Returns `true` while armed.
    #[must_use]
    pub fn is_armed(&self) -> bool {
        matches!(self, Self::Armed { .. })
    }
}

struct Inner<H> {
    handler: H,
    session: DragSession,
    config: DragConfig,
    service: Rc<RefCell<dyn DragAndDropService>>,
}

impl<H: DragAndDropHandler> Inner<H> {
    fn with_service(&self, f: impl FnOnce(&mut dyn DragAndDropService)) {
        match self.service.try_borrow_mut() {
            Ok(mut service) => f(&mut *service),
            Err(_) => tracing::warn!("drag service is busy; dropping call"),
        }
    }

    fn exceeds_threshold(&self, start: Point, position: Point) -> bool {
        let delta = position - start;
        let limit = self.config.activation_distance;
        delta.x.abs() > limit || delta.y.abs() > limit
    }

    fn handle(&mut self, event: &Event) {
        match event.kind {
            EventKind::PointerDown => {
                if event.button == Some(0) && self.handler.can_start_drag(event.position) {
                    tracing::trace!(position = ?event.position, "drag armed");
                    self.session = DragSession::Armed {
                        start: event.position,
                    };
                }
            }
            EventKind::PointerUp => self.session = DragSession::Idle,
            EventKind::PointerLeave => {
                self.session = DragSession::Idle;
                self.handler.clear_drag_and_drop_ui();
            }
            EventKind::PointerMove => {
                let DragSession::Armed { start } = self.session else {
                    return;
                };
                if event.source == EventSource::Mouse
                    && self.exceeds_threshold(start, event.position)
                {
                    self.session = DragSession::Idle;
                    let args = self.handler.start_drag(start);
                    tracing::debug!(title = %args.title, "drag started");
                    self.with_service(|service| service.start_drag(args));
                }
            }
            EventKind::DragUpdated => {
                let mode = self.handler.update_drag(event.position);
                self.with_service(|service| service.set_visual_mode(mode));
            }
            EventKind::DragPerform => {
                self.handler.on_drop(event.position);
                self.handler.clear_drag_and_drop_ui();
                self.with_service(|service| service.accept_drag());
            }
            EventKind::DragExited | EventKind::DragLeave => self.handler.clear_drag_and_drop_ui(),
            EventKind::DetachFromPanel => self.session = DragSession::Idle,
            _ => {}
        }
    }
}

/// Wires drag-and-drop onto one element.
pub struct DragEventsProcessor<H> {
    element: ElementId,
    inner: Rc<RefCell<Inner<H>>>,
    listeners: Vec<ListenerId>,
}

impl<H: DragAndDropHandler + 'static> DragEventsProcessor<H> {
    /// Registers the processor's listeners on `element`.
    ///
    /// Pointer down and up are heard while trickling down, pointer move and
    /// leave and the host drag events while bubbling up. These only run while
    /// the element is attached to a panel. A permanent detach listener
    /// disarms the processor.
    pub fn new(
        tree: &mut ElementTree,
        element: ElementId,
        handler: H,
        service: Rc<RefCell<dyn DragAndDropService>>,
        config: DragConfig,
    ) -> Result<Self, DispatchError> {
        if !tree.is_alive(element) {
            return Err(DispatchError::UnknownElement(element));
        }
        let inner = Rc::new(RefCell::new(Inner {
            handler,
            session: DragSession::Idle,
            config,
            service,
        }));
        let wiring = [
            (EventKind::PointerDown, ListenerPhase::TrickleDown, ListenerScope::Attached),
            (EventKind::PointerUp, ListenerPhase::TrickleDown, ListenerScope::Attached),
            (EventKind::PointerLeave, ListenerPhase::BubbleUp, ListenerScope::Attached),
            (EventKind::PointerMove, ListenerPhase::BubbleUp, ListenerScope::Attached),
            (EventKind::DragUpdated, ListenerPhase::BubbleUp, ListenerScope::Attached),
            (EventKind::DragPerform, ListenerPhase::BubbleUp, ListenerScope::Attached),
            (EventKind::DragExited, ListenerPhase::BubbleUp, ListenerScope::Attached),
            (EventKind::DragLeave, ListenerPhase::BubbleUp, ListenerScope::Attached),
            (EventKind::DetachFromPanel, ListenerPhase::BubbleUp, ListenerScope::Permanent),
        ];
        let mut listeners = Vec::with_capacity(wiring.len());
        for (kind, phase, scope) in wiring {
            let inner = Rc::clone(&inner);
            let id = tree.register(element, kind, phase, scope, move |event: &mut Event| {
                match inner.try_borrow_mut() {
                    Ok(mut inner) => inner.handle(event),
                    Err(_) => tracing::warn!(kind = ?event.kind, "drag processor re-entered"),
                }
            })?;
            listeners.push(id);
        }
        Ok(Self {
            element,
            inner,
            listeners,
        })
    }

    /// Removes every listener the processor registered.
    pub fn disconnect(self, tree: &mut ElementTree) {
        for id in self.listeners {
            tree.unregister(self.element, id);
        }
    }
}

impl<H: DragAndDropHandler> DragEventsProcessor<H> {
    /// Feeds an event directly, for hosts that route events themselves.
    pub fn handle_event(&self, event: &Event) {
        self.inner.borrow_mut().handle(event);
    }

    /// Current drag session.
    #[must_use]
    pub fn session(&self) -> DragSession {
        self.inner.borrow().session
    }

    /// The element the processor is wired to.
    #[must_use]
    pub fn element(&self) -> ElementId {
        self.element
    }

    /// Borrows the handler.
    #[must_use]
    pub fn handler(&self) -> Ref<'_, H> {
        Ref::map(self.inner.borrow(), |inner| &inner.handler)
    }

    /// Mutably borrows the handler.
    #[must_use]
    pub fn handler_mut(&self) -> RefMut<'_, H> {
        RefMut::map(self.inner.borrow_mut(), |inner| &mut inner.handler)
    }
}

impl<H> fmt::Debug for DragEventsProcessor<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DragEventsProcessor")
            .field("element", &self.element)
            .field("listeners", &self.listeners.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[derive(Default)]
    struct Recorder {
        accept: bool,
        starts: Vec<Point>,
        clears: usize,
    }

    impl DragAndDropHandler for Recorder {
        fn can_start_drag(&mut self, _position: Point) -> bool {
            self.accept
        }

        fn start_drag(&mut self, position: Point) -> StartDragArgs {
            self.starts.push(position);
            StartDragArgs::new("item")
        }

        fn update_drag(&mut self, _position: Point) -> DragVisualMode {
            DragVisualMode::Copy
        }

        fn on_drop(&mut self, _position: Point) {}

        fn clear_drag_and_drop_ui(&mut self) {
            self.clears += 1;
        }
    }

    #[derive(Default)]
    struct NullService;

    impl DragAndDropService for NullService {
        fn start_drag(&mut self, _args: StartDragArgs) {}
        fn set_visual_mode(&mut self, _mode: DragVisualMode) {}
        fn accept_drag(&mut self) {}
    }

    fn processor(accept: bool) -> DragEventsProcessor<Recorder> {
        let mut tree = ElementTree::new();
        let element = tree.create_element();
        DragEventsProcessor::new(
            &mut tree,
            element,
            Recorder {
                accept,
                ..Recorder::default()
            },
            Rc::new(RefCell::new(NullService)),
            DragConfig::default(),
        )
        .unwrap()
    }

    fn down(x: f64, y: f64) -> Event {
        Event::pointer(EventKind::PointerDown, 0, Point::new(x, y)).with_button(0)
    }

    fn mv(x: f64, y: f64) -> Event {
        Event::pointer(EventKind::PointerMove, 0, Point::new(x, y))
    }

    #[test]
    fn only_left_button_arms() {
        let p = processor(true);
        p.handle_event(&Event::pointer(EventKind::PointerDown, 0, Point::ZERO).with_button(1));
        assert_eq!(p.session(), DragSession::Idle);
        p.handle_event(&down(1.0, 2.0));
        assert_eq!(
            p.session(),
            DragSession::Armed {
                start: Point::new(1.0, 2.0)
            }
        );
    }

    #[test]
    fn refused_start_stays_idle() {
        let p = processor(false);
        p.handle_event(&down(0.0, 0.0));
        assert_eq!(p.session(), DragSession::Idle);
    }

    #[test]
    fn threshold_is_strict() {
        let p = processor(true);
        p.handle_event(&down(10.0, 10.0));
        p.handle_event(&mv(15.0, 5.0));
        assert!(p.session().is_armed(), "exactly 5 units does not start");
        p.handle_event(&mv(10.0, 15.5));
        assert_eq!(p.session(), DragSession::Idle);
        assert_eq!(p.handler().starts, vec![Point::new(10.0, 10.0)]);
    }

    #[test]
    fn synthetic_moves_never_start() {
        let p = processor(true);
        p.handle_event(&down(0.0, 0.0));
        p.handle_event(&mv(50.0, 0.0).with_source(EventSource::Synthetic));
        p.handle_event(
            &Event::pointer(EventKind::PointerMove, 1, Point::new(50.0, 0.0)),
        );
        assert!(p.session().is_armed());
        assert!(p.handler().starts.is_empty());
    }

    #[test]
    fn leave_disarms_and_clears() {
        let p = processor(true);
        p.handle_event(&down(0.0, 0.0));
        p.handle_event(&Event::pointer(EventKind::PointerLeave, 0, Point::ZERO));
        assert_eq!(p.session(), DragSession::Idle);
        assert_eq!(p.handler().clears, 1);
        p.handle_event(&mv(50.0, 0.0));
        assert!(p.handler().starts.is_empty());
    }

    #[test]
    fn up_disarms() {
        let p = processor(true);
        p.handle_event(&down(0.0, 0.0));
        p.handle_event(&Event::pointer(EventKind::PointerUp, 0, Point::ZERO).with_button(0));
        p.handle_event(&mv(50.0, 0.0));
        assert!(p.handler().starts.is_empty());
        assert_eq!(p.handler().clears, 0);
    }

    #[test]
    fn start_drag_args_builder() {
        let mut args = StartDragArgs::new("files").with_asset_path("a.png");
        args.set_generic_data("source", "tree");
        assert_eq!(args.asset_paths, vec![String::from("a.png")]);
        assert_eq!(args.generic_data("source"), Some("tree"));
        assert_eq!(args.generic_data("missing"), None);
    }
}
