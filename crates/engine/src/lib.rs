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

//! Ooga Engine - Debug visualization engine
//!
//! Turns the breakpoint snapshots of a debugged run into two cross-linked views:
//! a heap-object graph laid out on a fixed grid and a multi-thread stack view.
//! Clicking a heap node highlights its ancestors and descendants; clicking a
//! stack entry toggles it and relays the selection to the heap node sharing
//! its address.
//!
//! The engine is synchronous and single-writer: each view owns its node
//! collection, rebuilt wholesale whenever the active breakpoint or thread
//! changes, and mutated in place only by its own selection logic.

/// Highlight states, positions and other pieces shared by both views
pub mod graph;
/// Heap graph builder and grid layout
pub mod heap;
/// Breakpoint and thread cursors over a run's breakpoint sequence
pub mod navigator;
/// Ancestor/descendant highlight computation over the heap graph
pub mod selection;
/// Stack graph builder, one titled column group per thread
pub mod stack;
/// Stack-to-heap selection relay
pub mod sync;
/// The engine surface the shell talks to
pub mod workbench;

pub use graph::{Highlight, Position};
pub use heap::{HeapEdge, HeapGraph, HeapNode};
pub use navigator::BreakpointNavigator;
pub use selection::{activate, SelectionOutcome};
pub use stack::{StackEdge, StackGraph, StackNode, StackNodeId, StackNodeKind};
pub use sync::{CrossViewSync, SelectedElement, SyncOutcome};
pub use workbench::{StackClick, Workbench};
