// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Canopy Responder: deterministic, `no_std` event dispatch for UI panels.
//!
//! ## Overview
//!
//! An [`EventDispatcher`](dispatcher::EventDispatcher) delivers one
//! [`Event`](event::Event) at a time into an [`ElementTree`](tree::ElementTree).
//! Before ordinary propagation, a fixed chain of
//! [`DispatchingStrategy`](strategy::DispatchingStrategy) values gets first
//! refusal:
//!
//! - **Debugger**: a global debug overlay sees mouse-family events first, then
//!   the panel's own interceptor sees every event. Either may consume it.
//!   Gated by [`DispatcherConfig::debugger_enabled`](dispatcher::DispatcherConfig::debugger_enabled).
//! - **Pointer capture**: pointer events for a captured pointer id are sent
//!   straight to the capturing element, at target, with no ancestor
//!   propagation.
//!
//! Events no strategy consumed travel trickle-down → at-target → bubble-up
//! along the root → target path.
//!
//! ## Pointer capture
//!
//! Capture requests are recorded immediately and committed after each pointer
//! event, at which point the old capturer gets `LostPointerCapture` and the new
//! one `GotPointerCapture`. A capture whose element has left every panel is
//! released the next time it would intercept. A capture whose element moved
//! to a different panel is left alone and intercepts nothing in the panel that
//! is dispatching; hosts release it explicitly.
//!
//! ## Example
//!
//! ```
//! use canopy_pointer::PointerInputState;
//! use canopy_responder::dispatcher::EventDispatcher;
//! use canopy_responder::event::{Event, EventKind};
//! use canopy_responder::tree::ElementTree;
//! use canopy_responder::types::{ListenerPhase, ListenerScope, Phase};
//! use kurbo::{Point, Rect};
//! use std::{cell::RefCell, rc::Rc};
//!
//! let mut tree = ElementTree::new();
//! let panel = tree.create_panel(Rect::new(0.0, 0.0, 200.0, 200.0));
//! let root = tree.panel(panel).unwrap().root();
//! let slider = tree.insert(root).unwrap();
//! let other = tree.insert(root).unwrap();
//!
//! let phases = Rc::new(RefCell::new(Vec::new()));
//! let log = phases.clone();
//! tree.register(slider, EventKind::PointerMove, ListenerPhase::BubbleUp, ListenerScope::Attached,
//!     move |e: &mut Event| log.borrow_mut().push(e.phase())).unwrap();
//!
//! let mut dispatcher = EventDispatcher::default();
//! let mut pointers = PointerInputState::new();
//! dispatcher.capture_pointer(&tree, slider, 0).unwrap();
//!
//! // The pointer is over `other`, but `slider` holds the capture.
//! let mut event = Event::pointer(EventKind::PointerMove, 0, Point::new(50.0, 50.0))
//!     .with_hit_target(other);
//! dispatcher.dispatch(&mut event, panel, &mut tree, &mut pointers).unwrap();
//!
//! assert_eq!(*phases.borrow(), vec![Phase::AtTarget]);
//! assert_eq!(event.target, Some(slider));
//! assert!(event.stop_dispatch());
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod capture;
pub mod dispatcher;
pub mod error;
pub mod event;
pub mod strategy;
pub mod tree;
pub mod types;

pub use error::DispatchError;
