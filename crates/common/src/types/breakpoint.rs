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

use serde::{Deserialize, Serialize};

use super::{HeapSnapshot, ThreadSnapshot};

/// One point-in-time capture of a debugged run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Breakpoint {
    /// Heap at the time of capture
    pub heap: HeapSnapshot,
    /// Stacks of every thread, by thread index
    pub threads: Vec<ThreadSnapshot>,
    /// The thread whose execution triggered the capture, if known
    pub current_thread: Option<usize>,
}

impl Breakpoint {
    /// Create a breakpoint capture
    pub fn new(
        heap: HeapSnapshot,
        threads: Vec<ThreadSnapshot>,
        current_thread: Option<usize>,
    ) -> Self {
        Self { heap, threads, current_thread }
    }

    /// Number of threads captured
    pub fn thread_count(&self) -> usize {
        self.threads.len()
    }
}

/// All breakpoints reached by one run, in the order they were hit.
///
/// Immutable once created; navigation state lives elsewhere.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, derive_more::Deref)]
#[serde(transparent)]
pub struct BreakpointSequence(Vec<Breakpoint>);

impl BreakpointSequence {
    /// Create a sequence from breakpoints in hit order
    pub fn new(breakpoints: Vec<Breakpoint>) -> Self {
        Self(breakpoints)
    }

    /// The sequence of a run that produced no breakpoint data
    pub fn empty() -> Self {
        Self::default()
    }
}

impl FromIterator<Breakpoint> for BreakpointSequence {
    fn from_iter<T: IntoIterator<Item = Breakpoint>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a BreakpointSequence {
    type Item = &'a Breakpoint;
    type IntoIter = std::slice::Iter<'a, Breakpoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
