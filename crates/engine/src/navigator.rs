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

//! Breakpoint and thread cursors.
//!
//! Both cursors clamp instead of failing. The thread cursor belongs to the
//! breakpoint being viewed and returns to 0 whenever the breakpoint changes.

use ooga_common::types::{Breakpoint, BreakpointSequence};
use tracing::debug;

/// Cursor over the breakpoints of one run
#[derive(Debug, Clone, Default)]
pub struct BreakpointNavigator {
    sequence: BreakpointSequence,
    breakpoint: usize,
    thread: usize,
}

impl BreakpointNavigator {
    /// Navigator over `sequence`, positioned on the first breakpoint
    pub fn new(sequence: BreakpointSequence) -> Self {
        Self { sequence, breakpoint: 0, thread: 0 }
    }

    /// Replace the sequence and rewind both cursors
    pub fn set_sequence(&mut self, sequence: BreakpointSequence) {
        debug!(breakpoints = sequence.len(), "Installed breakpoint sequence");
        *self = Self::new(sequence);
    }

    /// The whole sequence
    pub fn sequence(&self) -> &BreakpointSequence {
        &self.sequence
    }

    /// Number of breakpoints
    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    /// Whether there is no breakpoint to show
    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }

    /// Selected breakpoint index (0 when the sequence is empty)
    pub fn breakpoint_index(&self) -> usize {
        self.breakpoint
    }

    /// Selected thread index within the current breakpoint
    pub fn thread_index(&self) -> usize {
        self.thread
    }

    /// The breakpoint under the cursor
    pub fn current(&self) -> Option<&Breakpoint> {
        self.sequence.get(self.breakpoint)
    }

    /// Move to breakpoint `index`, clamped to the sequence.
    ///
    /// Returns the index actually selected. The thread cursor is reset.
    pub fn select_breakpoint(&mut self, index: usize) -> usize {
        let clamped = index.min(self.len().saturating_sub(1));
        if clamped != index {
            debug!(requested = index, selected = clamped, "Clamped breakpoint index");
        }
        self.breakpoint = clamped;
        self.thread = 0;
        clamped
    }

    /// Move one breakpoint forward, stopping at the last
    pub fn next_breakpoint(&mut self) -> usize {
        self.select_breakpoint(self.breakpoint.saturating_add(1))
    }

    /// Move one breakpoint back, stopping at the first
    pub fn previous_breakpoint(&mut self) -> usize {
        self.select_breakpoint(self.breakpoint.saturating_sub(1))
    }

    /// Move to thread `index` of the current breakpoint, clamped to its threads.
    ///
    /// Returns the index actually selected, 0 when the breakpoint has no threads.
    pub fn select_thread(&mut self, index: usize) -> usize {
        let threads = self.current().map_or(0, Breakpoint::thread_count);
        let clamped = index.min(threads.saturating_sub(1));
        if clamped != index {
            debug!(requested = index, selected = clamped, "Clamped thread index");
        }
        self.thread = clamped;
        clamped
    }
}
