// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Element hierarchy, panels and listener registration.
//!
//! [`ElementTree`] is the host side of dispatch: it knows which element is a
//! child of which, which panel each element is attached to, and which listeners
//! each element has. Layout, picking and rendering live elsewhere; the only
//! geometry kept here is each panel's root layout rectangle.
//!
//! ## Lifecycle
//!
//! - [`ElementTree::create_panel`] creates a panel together with its root element.
//! - [`ElementTree::insert`] / [`ElementTree::append`] attach elements under a parent
//!   and adopt the parent's panel.
//! - [`ElementTree::detach`] / [`ElementTree::remove`] take a subtree off its panel.
//!
//! Whenever a subtree changes panel, each of its elements first receives
//! [`EventKind::DetachFromPanel`] (if it had a panel) and then
//! [`EventKind::AttachToPanel`] (if it got one). Listeners registered with
//! [`ListenerScope::Attached`] only run while their element is attached.
//!
//! ```
//! use canopy_responder::event::{Event, EventKind};
//! use canopy_responder::tree::ElementTree;
//! use canopy_responder::types::{ListenerPhase, ListenerScope};
//! use kurbo::Rect;
//! use std::{cell::Cell, rc::Rc};
//!
//! let mut tree = ElementTree::new();
//! let panel = tree.create_panel(Rect::new(0.0, 0.0, 100.0, 100.0));
//! let root = tree.panel(panel).unwrap().root();
//! let child = tree.insert(root).unwrap();
//!
//! let detached = Rc::new(Cell::new(false));
//! let seen = detached.clone();
//! tree.register(child, EventKind::DetachFromPanel, ListenerPhase::BubbleUp, ListenerScope::Permanent,
//!     move |_e: &mut Event| seen.set(true)).unwrap();
//!
//! tree.detach(child).unwrap();
//! assert!(detached.get());
//! assert_eq!(tree.panel_of(child), None);
//! ```

use alloc::boxed::Box;
use alloc::rc::Rc;
use alloc::vec;
use alloc::vec::Vec;
use core::cell::RefCell;
use core::fmt;

use canopy_pointer::{PanelBounds, PanelId};
use kurbo::Rect;
use smallvec::SmallVec;

use crate::error::DispatchError;
use crate::event::{Event, EventFlags, EventKind};
use crate::strategy::EventInterceptor;
use crate::types::{ElementId, ListenerId, ListenerPhase, ListenerScope, Phase};

type Callback = Rc<RefCell<dyn FnMut(&mut Event)>>;

struct Listener {
    id: ListenerId,
    kind: EventKind,
    phase: ListenerPhase,
    scope: ListenerScope,
    callback: Callback,
}

impl fmt::Debug for Listener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listener")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .field("phase", &self.phase)
            .field("scope", &self.scope)
            .finish_non_exhaustive()
    }
}

#[derive(Debug)]
struct ElementData {
    parent: Option<ElementId>,
    children: Vec<ElementId>,
    panel: Option<PanelId>,
    listeners: Vec<Listener>,
}

impl ElementData {
    fn new(panel: Option<PanelId>) -> Self {
        Self {
            parent: None,
            children: Vec::new(),
            panel,
            listeners: Vec::new(),
        }
    }
}

#[derive(Debug)]
struct Slot {
    generation: u32,
    data: Option<ElementData>,
}

/// An independent UI surface: a root element, its layout and an optional
/// debug interceptor.
pub struct Panel {
    id: PanelId,
    root: ElementId,
    layout: Rect,
    pub(crate) debug: Option<Box<dyn EventInterceptor>>,
}

impl Panel {
    /// The panel's id.
    #[must_use]
    pub fn id(&self) -> PanelId {
        self.id
    }

    /// The panel's root element.
    #[must_use]
    pub fn root(&self) -> ElementId {
        self.root
    }

    /// Layout rectangle of the root element.
    #[must_use]
    pub fn layout(&self) -> Rect {
        self.layout
    }

    /// Returns `true` if a debug interceptor is installed.
    #[must_use]
    pub fn has_debug(&self) -> bool {
        self.debug.is_some()
    }
}

impl PanelBounds for Panel {
    fn panel_id(&self) -> PanelId {
        self.id
    }

    fn root_layout(&self) -> Rect {
        self.layout
    }
}

impl fmt::Debug for Panel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Panel")
            .field("id", &self.id)
            .field("root", &self.root)
            .field("layout", &self.layout)
            .field("has_debug", &self.debug.is_some())
            .finish_non_exhaustive()
    }
}

/// Arena of elements and the panels they are attached to.
#[derive(Debug, Default)]
pub struct ElementTree {
    slots: Vec<Slot>,
    free: Vec<u32>,
    panels: Vec<Option<Panel>>,
    next_listener: u64,
}

impl ElementTree {
    /// Creates an empty tree.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[expect(
        clippy::cast_possible_truncation,
        reason = "element slots are bounded well below u32::MAX"
    )]
    fn alloc(&mut self, panel: Option<PanelId>) -> ElementId {
        let data = ElementData::new(panel);
        if let Some(idx) = self.free.pop() {
            let slot = &mut self.slots[idx as usize];
            slot.generation = slot.generation.wrapping_add(1);
            slot.data = Some(data);
            ElementId::new(idx, slot.generation)
        } else {
            let idx = self.slots.len() as u32;
            self.slots.push(Slot {
                generation: 1,
                data: Some(data),
            });
            ElementId::new(idx, 1)
        }
    }

    fn data(&self, id: ElementId) -> Option<&ElementData> {
        self.slots
            .get(id.idx())
            .filter(|slot| slot.generation == id.1)
            .and_then(|slot| slot.data.as_ref())
    }

    fn data_mut(&mut self, id: ElementId) -> Option<&mut ElementData> {
        self.slots
            .get_mut(id.idx())
            .filter(|slot| slot.generation == id.1)
            .and_then(|slot| slot.data.as_mut())
    }

    fn check_alive(&self, id: ElementId) -> Result<(), DispatchError> {
        if self.is_alive(id) {
            Ok(())
        } else {
            Err(DispatchError::UnknownElement(id))
        }
    }

    /// Returns `true` if `id` refers to a live element.
    #[must_use]
    pub fn is_alive(&self, id: ElementId) -> bool {
        self.data(id).is_some()
    }

    // =========================================================================
    // Panels
    // =========================================================================

    /// Creates a panel and its root element.
    #[expect(
        clippy::cast_possible_truncation,
        reason = "panel count is bounded well below u32::MAX"
    )]
    pub fn create_panel(&mut self, layout: Rect) -> PanelId {
        let id = PanelId::new(self.panels.len() as u32);
        let root = self.alloc(Some(id));
        self.panels.push(Some(Panel {
            id,
            root,
            layout,
            debug: None,
        }));
        id
    }

    /// Detaches the panel's root subtree and forgets the panel.
    ///
    /// The root element stays alive, detached.
    pub fn remove_panel(&mut self, panel: PanelId) -> Result<(), DispatchError> {
        let root = self
            .panel(panel)
            .ok_or(DispatchError::UnknownPanel(panel))?
            .root;
        self.set_subtree_panel(root, None);
        self.panels[panel.index() as usize] = None;
        Ok(())
    }

    /// Looks up a panel.
    #[must_use]
    pub fn panel(&self, panel: PanelId) -> Option<&Panel> {
        self.panels.get(panel.index() as usize)?.as_ref()
    }

    pub(crate) fn panel_mut(&mut self, panel: PanelId) -> Option<&mut Panel> {
        self.panels.get_mut(panel.index() as usize)?.as_mut()
    }

    /// Updates the root layout rectangle of a panel.
    pub fn set_panel_layout(&mut self, panel: PanelId, layout: Rect) -> Result<(), DispatchError> {
        self.panel_mut(panel)
            .ok_or(DispatchError::UnknownPanel(panel))?
            .layout = layout;
        Ok(())
    }

    /// Installs or removes the panel's debug interceptor.
    pub fn set_panel_debug(
        &mut self,
        panel: PanelId,
        debug: Option<Box<dyn EventInterceptor>>,
    ) -> Result<(), DispatchError> {
        self.panel_mut(panel)
            .ok_or(DispatchError::UnknownPanel(panel))?
            .debug = debug;
        Ok(())
    }

    fn is_panel_root(&self, id: ElementId) -> bool {
        self.panels.iter().flatten().any(|panel| panel.root == id)
    }

    // =========================================================================
    // Hierarchy
    // =========================================================================

    /// Creates a detached element with no parent.
    pub fn create_element(&mut self) -> ElementId {
        self.alloc(None)
    }

    /// Creates an element as the last child of `parent`.
    pub fn insert(&mut self, parent: ElementId) -> Result<ElementId, DispatchError> {
        self.check_alive(parent)?;
        let child = self.create_element();
        self.append(parent, child)?;
        Ok(child)
    }

    /// Moves `child` (and its subtree) to be the last child of `parent`.
    pub fn append(&mut self, parent: ElementId, child: ElementId) -> Result<(), DispatchError> {
        self.check_alive(parent)?;
        self.check_alive(child)?;
        if self.is_panel_root(child) {
            return Err(DispatchError::PanelRoot(child));
        }
        let mut cursor = Some(parent);
        while let Some(ancestor) = cursor {
            if ancestor == child {
                return Err(DispatchError::WouldCycle { parent, child });
            }
            cursor = self.parent(ancestor);
        }

        self.unlink(child);
        if let Some(data) = self.data_mut(child) {
            data.parent = Some(parent);
        }
        if let Some(data) = self.data_mut(parent) {
            data.children.push(child);
        }
        let panel = self.panel_of(parent);
        if self.panel_of(child) != panel {
            self.set_subtree_panel(child, panel);
        }
        Ok(())
    }

    /// Takes `element` out of its parent and off its panel.
    pub fn detach(&mut self, element: ElementId) -> Result<(), DispatchError> {
        self.check_alive(element)?;
        if self.is_panel_root(element) {
            return Err(DispatchError::PanelRoot(element));
        }
        self.unlink(element);
        if self.panel_of(element).is_some() {
            self.set_subtree_panel(element, None);
        }
        Ok(())
    }

    /// Detaches `element` and frees it together with its subtree.
    pub fn remove(&mut self, element: ElementId) -> Result<(), DispatchError> {
        self.detach(element)?;
        for id in self.subtree(element) {
            self.slots[id.idx()].data = None;
            self.free.push(id.0);
        }
        Ok(())
    }

    fn unlink(&mut self, child: ElementId) {
        let Some(parent) = self.parent(child) else {
            return;
        };
        if let Some(data) = self.data_mut(parent) {
            data.children.retain(|c| *c != child);
        }
        if let Some(data) = self.data_mut(child) {
            data.parent = None;
        }
    }

    /// Pre-order list of `root` and its descendants.
    fn subtree(&self, root: ElementId) -> Vec<ElementId> {
        let mut out = Vec::new();
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            let Some(data) = self.data(id) else {
                continue;
            };
            out.push(id);
            stack.extend(data.children.iter().rev().copied());
        }
        out
    }

    fn set_subtree_panel(&mut self, root: ElementId, panel: Option<PanelId>) {
        let subtree = self.subtree(root);
        for &id in &subtree {
            if self.panel_of(id).is_some() {
                self.send_at_target(id, &mut Event::new(EventKind::DetachFromPanel));
            }
        }
        for &id in &subtree {
            if let Some(data) = self.data_mut(id) {
                data.panel = panel;
            }
        }
        if panel.is_some() {
            for &id in &subtree {
                self.send_at_target(id, &mut Event::new(EventKind::AttachToPanel));
            }
        }
    }

    /// Parent of `id`, if any.
    #[must_use]
    pub fn parent(&self, id: ElementId) -> Option<ElementId> {
        self.data(id)?.parent
    }

    /// Children of `id`; empty for dead elements.
    #[must_use]
    pub fn children(&self, id: ElementId) -> &[ElementId] {
        self.data(id).map_or(&[], |data| data.children.as_slice())
    }

    /// Panel `id` is attached to, if any.
    #[must_use]
    pub fn panel_of(&self, id: ElementId) -> Option<PanelId> {
        self.data(id)?.panel
    }

    /// Root → `id` path; empty for dead elements.
    #[must_use]
    pub fn path_to(&self, id: ElementId) -> Vec<ElementId> {
        let mut path = Vec::new();
        let mut cursor = self.is_alive(id).then_some(id);
        while let Some(node) = cursor {
            path.push(node);
            cursor = self.parent(node);
        }
        path.reverse();
        path
    }

    // =========================================================================
    // Listeners
    // =========================================================================

    /// Registers `callback` for events of `kind` on `element`.
    pub fn register<F>(
        &mut self,
        element: ElementId,
        kind: EventKind,
        phase: ListenerPhase,
        scope: ListenerScope,
        callback: F,
    ) -> Result<ListenerId, DispatchError>
    where
        F: FnMut(&mut Event) + 'static,
    {
        let id = ListenerId(self.next_listener);
        let data = self
            .data_mut(element)
            .ok_or(DispatchError::UnknownElement(element))?;
        let callback: Callback = Rc::new(RefCell::new(callback));
        data.listeners.push(Listener {
            id,
            kind,
            phase,
            scope,
            callback,
        });
        self.next_listener += 1;
        Ok(id)
    }

    /// Removes a listener. Returns `false` if it was not registered on `element`.
    pub fn unregister(&mut self, element: ElementId, listener: ListenerId) -> bool {
        let Some(data) = self.data_mut(element) else {
            return false;
        };
        let before = data.listeners.len();
        data.listeners.retain(|l| l.id != listener);
        data.listeners.len() != before
    }

    /// Number of listeners registered on `element`, active or not.
    #[must_use]
    pub fn listener_count(&self, element: ElementId) -> usize {
        self.data(element).map_or(0, |data| data.listeners.len())
    }

    /// Delivers `event` to `element` alone, at target, bypassing propagation.
    pub fn send_at_target(&self, element: ElementId, event: &mut Event) {
        event.target = Some(element);
        event.set_flag(EventFlags::DISPATCHING, true);
        event.set_phase(Phase::AtTarget);
        self.handle_event(element, event);
        event.set_current_target(None);
        event.set_phase(Phase::None);
        event.set_flag(EventFlags::DISPATCHING, false);
    }

    /// Runs `element`'s listeners that match the event's kind and phase.
    pub(crate) fn handle_event(&self, element: ElementId, event: &mut Event) {
        let Some(data) = self.data(element) else {
            return;
        };
        let attached = data.panel.is_some();
        let kind = event.kind;
        let mut callbacks: SmallVec<[Callback; 4]> = SmallVec::new();
        let mut collect = |phase: ListenerPhase| {
            callbacks.extend(
                data.listeners
                    .iter()
                    .filter(|l| {
                        l.kind == kind
                            && l.phase == phase
                            && (attached || l.scope == ListenerScope::Permanent)
                    })
                    .map(|l| l.callback.clone()),
            );
        };
        match event.phase() {
            Phase::None => return,
            Phase::TrickleDown => collect(ListenerPhase::TrickleDown),
            Phase::BubbleUp => collect(ListenerPhase::BubbleUp),
            Phase::AtTarget => {
                collect(ListenerPhase::TrickleDown);
                collect(ListenerPhase::BubbleUp);
            }
        }

        event.set_current_target(Some(element));
        for callback in callbacks {
            if event.is_immediate_propagation_stopped() {
                break;
            }
            match callback.try_borrow_mut() {
                Ok(mut f) => (&mut *f)(event),
                Err(_) => tracing::warn!(?element, ?kind, "skipping re-entrant listener"),
            }
        }
    }
}
