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

//! The engine surface driven by the shell.
//!
//! A [`Workbench`] owns the breakpoint cursor and both views. Any change of
//! breakpoint or thread rebuilds both graphs from the selected breakpoint and
//! discards every piece of selection state. Clicks are applied synchronously.

use ooga_common::types::{Address, BreakpointSequence, RunResponse, SnapshotIssue};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::{
    heap::HeapGraph,
    navigator::BreakpointNavigator,
    selection::{activate, SelectionOutcome},
    stack::{StackGraph, StackNodeId},
    sync::{CrossViewSync, SelectedElement, SyncOutcome},
};

/// What a click on the stack view did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StackClick {
    /// New toggle state of the clicked node, `None` for an unknown id
    pub toggled: Option<bool>,
    /// Effect on the heap view
    pub sync: SyncOutcome,
}

/// Both views of the selected breakpoint plus the cursor that picks it
#[derive(Debug, Default)]
pub struct Workbench {
    navigator: BreakpointNavigator,
    heap: HeapGraph,
    stack: StackGraph,
    sync: CrossViewSync,
    selected: Option<SelectedElement>,
}

impl Workbench {
    /// A workbench with no run loaded; both views are empty
    pub fn new() -> Self {
        Self::default()
    }

    /// A workbench showing the first breakpoint of `sequence`
    pub fn with_sequence(sequence: BreakpointSequence) -> Self {
        let mut workbench = Self::new();
        workbench.set_sequence(sequence);
        workbench
    }

    /// Replace the breakpoint sequence and show its first breakpoint
    pub fn set_sequence(&mut self, sequence: BreakpointSequence) {
        self.navigator.set_sequence(sequence);
        self.rebuild();
    }

    /// Install the breakpoints of a run.
    ///
    /// A failed run leaves both views empty. Returns the number of breakpoints.
    pub fn load(&mut self, response: &RunResponse) -> usize {
        if !response.success {
            warn!(error = ?response.error, "Run failed, showing empty views");
        }
        self.set_sequence(response.clone().into_breakpoints());
        info!(breakpoints = self.navigator.len(), "Loaded run");
        self.navigator.len()
    }

    /// Show breakpoint `index`, clamped to the sequence. Returns the index shown.
    pub fn select_breakpoint(&mut self, index: usize) -> usize {
        let index = self.navigator.select_breakpoint(index);
        self.rebuild();
        index
    }

    /// Show the following breakpoint, if any
    pub fn next_breakpoint(&mut self) -> usize {
        let index = self.navigator.next_breakpoint();
        self.rebuild();
        index
    }

    /// Show the preceding breakpoint, if any
    pub fn previous_breakpoint(&mut self) -> usize {
        let index = self.navigator.previous_breakpoint();
        self.rebuild();
        index
    }

    /// Select thread `index` of the current breakpoint, clamped. Returns the index selected.
    pub fn select_thread(&mut self, index: usize) -> usize {
        let index = self.navigator.select_thread(index);
        self.rebuild();
        index
    }

    /// Apply a click on the heap node at `address`.
    ///
    /// Returns `None` when no node carries the address. The stack view is never touched.
    pub fn click_heap(&mut self, address: Address) -> Option<SelectionOutcome> {
        self.sync.forget();
        activate(&mut self.heap, address)
    }

    /// Apply a click on a stack node.
    ///
    /// The node's toggle flips. Clicking an entry also makes it the selected
    /// element, which is relayed to the heap view.
    pub fn click_stack(&mut self, id: StackNodeId) -> StackClick {
        let Some(toggled) = self.stack.toggle(id) else {
            debug!(%id, "Click on unknown stack node");
            return StackClick { toggled: None, sync: SyncOutcome::Unchanged };
        };

        // Titles carry no address and never reach the heap view
        let Some(address) = self.stack.node(id).and_then(|node| node.address()) else {
            return StackClick { toggled: Some(toggled), sync: SyncOutcome::Unchanged };
        };
        self.selected = Some(SelectedElement { node: id, address });
        let sync = self.sync.relay(self.selected, &mut self.heap);
        StackClick { toggled: Some(toggled), sync }
    }

    /// The stack entry most recently clicked on the current breakpoint
    pub fn selected_element(&self) -> Option<SelectedElement> {
        self.selected
    }

    /// Heap view of the current breakpoint
    pub fn heap(&self) -> &HeapGraph {
        &self.heap
    }

    /// Stack view of the current breakpoint
    pub fn stack(&self) -> &StackGraph {
        &self.stack
    }

    /// Breakpoint and thread cursors
    pub fn navigator(&self) -> &BreakpointNavigator {
        &self.navigator
    }

    /// Data contract violations of the current heap snapshot
    pub fn diagnostics(&self) -> &[SnapshotIssue] {
        self.heap.issues()
    }

    fn rebuild(&mut self) {
        let (heap, stack) = match self.navigator.current() {
            Some(breakpoint) => (
                HeapGraph::build(&breakpoint.heap),
                StackGraph::build(&breakpoint.threads, breakpoint.current_thread),
            ),
            None => (HeapGraph::empty(), StackGraph::empty()),
        };
        self.heap = heap;
        self.stack = stack;
        self.selected = None;
        self.sync.forget();

        debug!(
            breakpoint = self.navigator.breakpoint_index(),
            thread = self.navigator.thread_index(),
            heap_nodes = self.heap.len(),
            stack_nodes = self.stack.nodes().len(),
            "Rebuilt views"
        );
    }
}
