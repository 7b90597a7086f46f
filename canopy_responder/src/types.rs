// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shared identifiers and propagation vocabulary.

/// Identifier for an element in an [`ElementTree`](crate::tree::ElementTree).
///
/// A slot index plus a generation counter. Removing an element frees its
/// slot; when the slot is reused its generation is bumped, so stale ids never
/// alias a live element.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct ElementId(pub(crate) u32, pub(crate) u32);

impl ElementId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }
}

/// Propagation phase an event is currently in.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Not being propagated.
    #[default]
    None,
    /// Travelling from the root towards the target's parent.
    TrickleDown,
    /// Being handled by the target itself.
    AtTarget,
    /// Travelling from the target's parent back to the root.
    BubbleUp,
}

/// Which propagation phase a listener wants to hear about.
///
/// Both kinds of listener run when their element is the target.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ListenerPhase {
    /// Runs while the event trickles down through ancestors.
    TrickleDown,
    /// Runs while the event bubbles up through ancestors.
    BubbleUp,
}

/// How long a listener stays active.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ListenerScope {
    /// Until explicitly unregistered.
    Permanent,
    /// Only while the element is attached to a panel; detaching the element
    /// silences it.
    Attached,
}

/// Handle returned when registering a listener.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(pub(crate) u64);

/// Result of visiting one step of a propagation sequence.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Keep propagating.
    Continue,
    /// Stop propagating.
    Stop,
    /// Stop propagating and report the event as consumed.
    StopAndConsume,
}

/// One step of a propagation sequence.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Dispatch<K> {
    /// Phase of this step.
    pub phase: Phase,
    /// Node visited by this step.
    pub node: K,
}

impl<K> Dispatch<K> {
    /// A trickle-down step.
    pub const fn trickle_down(node: K) -> Self {
        Self {
            phase: Phase::TrickleDown,
            node,
        }
    }

    /// An at-target step.
    pub const fn at_target(node: K) -> Self {
        Self {
            phase: Phase::AtTarget,
            node,
        }
    }

    /// A bubble-up step.
    pub const fn bubble_up(node: K) -> Self {
        Self {
            phase: Phase::BubbleUp,
            node,
        }
    }
}
