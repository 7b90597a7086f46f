// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use canopy_pointer::PanelId;

use crate::types::ElementId;

/// Errors from tree and dispatcher operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum DispatchError {
    /// The element id is stale or was never issued.
    #[error("element {0:?} is not alive")]
    UnknownElement(ElementId),
    /// The panel id is stale or was never issued.
    #[error("panel {0:?} does not exist")]
    UnknownPanel(PanelId),
    /// The operation needs an element that is attached to a panel.
    #[error("element {0:?} is not attached to a panel")]
    NotAttached(ElementId),
    /// Re-parenting would make an element its own ancestor.
    #[error("appending {child:?} under {parent:?} would create a cycle")]
    WouldCycle {
        /// The requested parent.
        parent: ElementId,
        /// The element being moved.
        child: ElementId,
    },
    /// Panel roots can only leave their panel through `remove_panel`.
    #[error("element {0:?} is a panel root")]
    PanelRoot(ElementId),
}
