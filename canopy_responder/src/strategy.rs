// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Interception strategies that see events before tree propagation.
//!
//! The dispatcher holds a fixed list of [`DispatchingStrategy`] values and
//! offers every event to each in order. A strategy that fully handles an event
//! sets its `stop_dispatch` flag, which skips the remaining strategies and
//! normal propagation. Every strategy's post-dispatch hook runs afterwards
//! regardless.

use alloc::boxed::Box;
use core::fmt;

use canopy_pointer::PanelId;

use crate::capture::PointerCaptureState;
use crate::event::{Event, EventFlags, EventKind};
use crate::tree::ElementTree;
use crate::types::Phase;

/// Debug hook that may swallow events, such as an element picker.
pub trait EventInterceptor {
    /// Returns `true` to consume `event`.
    fn intercept_event(&mut self, panel: PanelId, event: &Event) -> bool;

    /// Called after dispatch, whether or not the event was consumed.
    fn post_process_event(&mut self, panel: PanelId, event: &Event) {
        let _ = (panel, event);
    }
}

/// Mutable state a strategy may touch while dispatching.
pub(crate) struct StrategyCx<'a> {
    pub(crate) tree: &'a mut ElementTree,
    pub(crate) capture: &'a mut PointerCaptureState,
}

/// Gives debug interceptors first refusal on events.
///
/// A global overlay sees mouse-family events first; the panel's own
/// interceptor sees every event next. When disabled the strategy declines
/// everything.
pub struct DebuggerStrategy {
    enabled: bool,
    overlay: Option<Box<dyn EventInterceptor>>,
}

impl DebuggerStrategy {
    /// Creates the strategy with no overlay installed.
    #[must_use]
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            overlay: None,
        }
    }

    /// Returns `true` if the strategy takes part in dispatch.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Turns the strategy on or off.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Installs or removes the global overlay.
    pub fn set_overlay(&mut self, overlay: Option<Box<dyn EventInterceptor>>) {
        self.overlay = overlay;
    }

    fn can_dispatch_event(&self, _event: &Event) -> bool {
        self.enabled
    }

    fn dispatch_event(&mut self, event: &mut Event, panel: PanelId, cx: &mut StrategyCx<'_>) {
        if let Some(overlay) = self.overlay.as_mut()
            && event.kind.is_mouse_event()
            && overlay.intercept_event(panel, event)
        {
            tracing::debug!(kind = ?event.kind, ?panel, "debug overlay consumed event");
            event.consume();
            return;
        }
        if let Some(debug) = cx.tree.panel_mut(panel).and_then(|p| p.debug.as_mut())
            && debug.intercept_event(panel, event)
        {
            tracing::debug!(kind = ?event.kind, ?panel, "panel interceptor consumed event");
            event.consume();
        }
    }

    fn post_dispatch(&mut self, event: &Event, panel: PanelId, cx: &mut StrategyCx<'_>) {
        if !self.enabled {
            return;
        }
        if let Some(debug) = cx.tree.panel_mut(panel).and_then(|p| p.debug.as_mut()) {
            debug.post_process_event(panel, event);
        }
    }
}

impl fmt::Debug for DebuggerStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DebuggerStrategy")
            .field("enabled", &self.enabled)
            .field("has_overlay", &self.overlay.is_some())
            .finish_non_exhaustive()
    }
}

/// Redirects pointer events to the element capturing their pointer.
#[derive(Clone, Copy, Debug, Default)]
pub struct PointerCaptureStrategy;

impl PointerCaptureStrategy {
    fn can_dispatch_event(event: &Event) -> bool {
        event.kind.is_pointer_event()
    }

    fn dispatch_event(event: &mut Event, panel: PanelId, cx: &mut StrategyCx<'_>) {
        let pointer_id = event.pointer_id;
        let Some(capturer) = cx.capture.capturing_element(pointer_id) else {
            return;
        };
        let capturer_panel = cx.tree.panel_of(capturer);

        if capturer_panel.is_none() && event.kind != EventKind::LostPointerCapture {
            tracing::debug!(?capturer, pointer_id, "releasing capture held by detached element");
            cx.capture.release(pointer_id);
            return;
        }
        if event.target.is_some_and(|target| target != capturer) {
            return;
        }
        // A capture whose element moved to another panel without releasing
        // stays in place and intercepts nothing until released.
        if capturer_panel != Some(panel) {
            return;
        }

        if !event.kind.is_capture_event()
            && let Some(transition) = cx.capture.process(pointer_id)
        {
            transition.deliver(cx.tree);
        }

        tracing::debug!(?capturer, pointer_id, kind = ?event.kind, "redirecting to capturer");
        event.set_flag(EventFlags::DISPATCHING, true);
        event.target = Some(capturer);
        event.set_current_target(Some(capturer));
        event.set_phase(Phase::AtTarget);
        cx.tree.handle_event(capturer, event);
        event.set_current_target(None);
        event.set_phase(Phase::None);
        event.set_flag(EventFlags::DISPATCHING, false);

        event.set_flag(EventFlags::STOP_DISPATCH, true);
        event.set_flag(EventFlags::PROPAGATE_TO_IMGUI, false);
    }
}

/// One entry of the dispatcher's strategy chain.
#[derive(Debug)]
pub enum DispatchingStrategy {
    /// Debug overlay and panel interceptors.
    Debugger(DebuggerStrategy),
    /// Pointer capture redirection.
    PointerCapture(PointerCaptureStrategy),
}

impl DispatchingStrategy {
    /// Cheap check whether the strategy wants to see `event`.
    #[must_use]
    pub fn can_dispatch_event(&self, event: &Event) -> bool {
        match self {
            Self::Debugger(s) => s.can_dispatch_event(event),
            Self::PointerCapture(_) => PointerCaptureStrategy::can_dispatch_event(event),
        }
    }

    pub(crate) fn dispatch_event(
        &mut self,
        event: &mut Event,
        panel: PanelId,
        cx: &mut StrategyCx<'_>,
    ) {
        match self {
            Self::Debugger(s) => s.dispatch_event(event, panel, cx),
            Self::PointerCapture(_) => PointerCaptureStrategy::dispatch_event(event, panel, cx),
        }
    }

    pub(crate) fn post_dispatch(&mut self, event: &Event, panel: PanelId, cx: &mut StrategyCx<'_>) {
        match self {
            Self::Debugger(s) => s.post_dispatch(event, panel, cx),
            Self::PointerCapture(_) => {}
        }
    }
}
