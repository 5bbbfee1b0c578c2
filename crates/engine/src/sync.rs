// Ooga Workbench - Debug visualization for ooga-lang programs
// Copyright (C) 2024 Zhuo Zhang and Wuqi Zhang
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! Stack-to-heap selection relay.
//!
//! The stack view publishes the element the user last clicked. The relay hands
//! its address to [`crate::selection::activate`] on the heap graph, which is
//! the only writer of heap highlight state. An element is relayed once; feeding
//! the same element again does nothing until it changes or is forgotten.

use ooga_common::types::Address;
use serde::Serialize;
use tracing::{debug, trace};

use crate::{
    heap::HeapGraph,
    selection::{activate, SelectionOutcome},
    stack::StackNodeId,
};

/// The stack entry most recently clicked, as seen by the heap view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct SelectedElement {
    /// Stack node that was clicked
    pub node: StackNodeId,
    /// Address held by that entry
    pub address: Address,
}

/// What a relay did to the heap graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SyncOutcome {
    /// A heap node carries the address and was activated
    Forwarded(SelectionOutcome),
    /// No heap node carries the address; the heap graph is untouched
    NoMatch(Address),
    /// Same element as the previous relay; nothing fired
    Unchanged,
    /// The selection was withdrawn; the heap graph is untouched
    Cleared,
}

/// One-directional synchronizer from the stack view to the heap view
#[derive(Debug, Clone, Default)]
pub struct CrossViewSync {
    last: Option<SelectedElement>,
}

impl CrossViewSync {
    /// A relay that has not seen any element yet
    pub fn new() -> Self {
        Self::default()
    }

    /// Element relayed most recently
    pub fn last(&self) -> Option<SelectedElement> {
        self.last
    }

    /// Forward `selected` to the heap graph if it differs from the previous call
    pub fn relay(&mut self, selected: Option<SelectedElement>, heap: &mut HeapGraph) -> SyncOutcome {
        if selected == self.last {
            trace!(?selected, "Selected element unchanged, not relaying");
            return SyncOutcome::Unchanged;
        }
        self.last = selected;

        let Some(element) = selected else {
            return SyncOutcome::Cleared;
        };

        match activate(heap, element.address) {
            Some(outcome) => {
                debug!(node = %element.node, address = %element.address, "Relayed stack selection to heap");
                SyncOutcome::Forwarded(outcome)
            }
            None => {
                debug!(node = %element.node, address = %element.address, "No heap element at stack address");
                SyncOutcome::NoMatch(element.address)
            }
        }
    }

    /// Drop the remembered element so the next relay fires even if it repeats
    pub fn forget(&mut self) {
        self.last = None;
    }
}
