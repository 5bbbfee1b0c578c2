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

//! Stack graph builder
//!
//! Each thread becomes a titled group of two vertical chains, one for the
//! operand stash and one for the runtime stack. Entry `i` of a region is linked
//! to entry `i + 1`; nothing links regions or threads. Threads sit side by side
//! at a fixed offset per thread index.

use std::{collections::HashMap, fmt};

use itertools::Itertools;
use ooga_common::types::{Address, StackEntry, StackRegion, ThreadSnapshot};
use serde::Serialize;
use tracing::debug;

use crate::graph::Position;

/// Horizontal distance between threads
pub const THREAD_SPACING: i32 = 600;
/// Horizontal distance between the two regions of a thread
pub const REGION_SPACING: i32 = 300;
/// Horizontal shift of the first region relative to the thread title
pub const REGION_SHIFT: i32 = -150;
/// Vertical position of the region titles
pub const REGION_TITLE_Y: i32 = 100;
/// Vertical distance between consecutive entries
pub const ENTRY_SPACING: i32 = 120;

/// Identity of a node in the stack view
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum StackNodeId {
    /// Title of a thread
    Thread(usize),
    /// Title of one region of a thread
    Region(usize, StackRegion),
    /// One entry of a region
    Entry {
        /// Thread index
        thread: usize,
        /// Region holding the entry
        region: StackRegion,
        /// Position in the region, bottom first
        index: usize,
    },
}

impl StackNodeId {
    /// Thread the node belongs to
    pub fn thread(&self) -> usize {
        match *self {
            Self::Thread(thread) | Self::Region(thread, _) | Self::Entry { thread, .. } => thread,
        }
    }
}

impl fmt::Display for StackNodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Thread(thread) => write!(f, "title-{thread}"),
            Self::Region(thread, region) => write!(f, "{thread}-{}-title", region.label()),
            Self::Entry { thread, region, index } => {
                write!(f, "{thread}-{}-{index}", region.label())
            }
        }
    }
}

/// What a stack node shows
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum StackNodeKind {
    /// Thread heading
    ThreadTitle,
    /// Region heading
    RegionTitle(StackRegion),
    /// A stack slot
    Entry(StackEntry),
}

/// A node of the stack view
#[derive(Debug, Clone, Serialize)]
pub struct StackNode {
    id: StackNodeId,
    kind: StackNodeKind,
    label: String,
    position: Position,
    is_current: bool,
    selected: bool,
    is_first: bool,
    is_last: bool,
}

impl StackNode {
    /// Node identity
    pub fn id(&self) -> StackNodeId {
        self.id
    }

    /// What the node shows
    pub fn kind(&self) -> &StackNodeKind {
        &self.kind
    }

    /// Display label
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Layout position
    pub fn position(&self) -> Position {
        self.position
    }

    /// Whether the node belongs to the thread that triggered the breakpoint
    pub fn is_current(&self) -> bool {
        self.is_current
    }

    /// Whether the user has toggled this node on
    pub fn is_selected(&self) -> bool {
        self.selected
    }

    /// Whether no edge enters this node
    pub fn is_first(&self) -> bool {
        self.is_first
    }

    /// Whether no edge leaves this node
    pub fn is_last(&self) -> bool {
        self.is_last
    }

    /// The stack slot, for entry nodes
    pub fn entry(&self) -> Option<&StackEntry> {
        match &self.kind {
            StackNodeKind::Entry(entry) => Some(entry),
            _ => None,
        }
    }

    /// Address carried by the slot, for entry nodes
    pub fn address(&self) -> Option<Address> {
        self.entry().map(|entry| entry.address)
    }

    fn title(id: StackNodeId, kind: StackNodeKind, label: String, position: Position, is_current: bool) -> Self {
        Self {
            id,
            kind,
            label,
            position,
            is_current,
            selected: false,
            is_first: true,
            is_last: true,
        }
    }
}

/// Edge from one stack entry to the next entry of the same region
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct StackEdge {
    /// Lower entry
    pub source: StackNodeId,
    /// Following entry
    pub target: StackNodeId,
}

impl StackEdge {
    /// Stable edge id, `"e<thread>-<region>-<from>-<to>"`
    pub fn id(&self) -> String {
        match (self.source, self.target) {
            (
                StackNodeId::Entry { thread, region, index: from },
                StackNodeId::Entry { index: to, .. },
            ) => format!("e{thread}-{}-{from}-{to}", region.label()),
            (source, target) => format!("e{source}-{target}"),
        }
    }
}

/// Positioned graph of every thread's stacks at one breakpoint.
///
/// Owned exclusively by the stack view; selection here is a per-node toggle.
#[derive(Debug, Clone, Default, Serialize)]
pub struct StackGraph {
    nodes: Vec<StackNode>,
    edges: Vec<StackEdge>,
    thread_count: usize,
    current_thread: Option<usize>,
    #[serde(skip)]
    index: HashMap<StackNodeId, usize>,
}

impl StackGraph {
    /// The empty view
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build the stack view of one breakpoint.
    ///
    /// Nodes of `current_thread` are marked current at construction time; an
    /// index outside the thread list marks nothing.
    pub fn build(threads: &[ThreadSnapshot], current_thread: Option<usize>) -> Self {
        let mut nodes = Vec::new();
        let mut edges = Vec::new();

        for (thread, snapshot) in threads.iter().enumerate() {
            let is_current = current_thread == Some(thread);
            let suffix = if is_current { " (Current)" } else { "" };
            let start_x = thread as i32 * THREAD_SPACING;

            nodes.push(StackNode::title(
                StackNodeId::Thread(thread),
                StackNodeKind::ThreadTitle,
                format!("Thread {thread}{suffix}"),
                Position::new(start_x, 0),
                is_current,
            ));

            for region in StackRegion::ALL {
                let x = start_x + region.ordinal() as i32 * REGION_SPACING + REGION_SHIFT;
                nodes.push(StackNode::title(
                    StackNodeId::Region(thread, region),
                    StackNodeKind::RegionTitle(region),
                    format!("{}{suffix}", region.label()),
                    Position::new(x, REGION_TITLE_Y),
                    is_current,
                ));

                let entries = snapshot.region(region);
                let entry_id = |index| StackNodeId::Entry { thread, region, index };
                for (index, entry) in entries.iter().enumerate() {
                    nodes.push(StackNode {
                        id: entry_id(index),
                        kind: StackNodeKind::Entry(entry.clone()),
                        label: entry.label(),
                        position: Position::new(x, REGION_TITLE_Y + ENTRY_SPACING * (index as i32 + 1)),
                        is_current,
                        selected: false,
                        is_first: index == 0,
                        is_last: index + 1 == entries.len(),
                    });
                }
                edges.extend(
                    (0..entries.len())
                        .tuple_windows()
                        .map(|(from, to)| StackEdge { source: entry_id(from), target: entry_id(to) }),
                );
            }
        }

        let index = nodes.iter().enumerate().map(|(i, node)| (node.id, i)).collect();

        debug!(
            threads = threads.len(),
            nodes = nodes.len(),
            edges = edges.len(),
            ?current_thread,
            "Built stack graph"
        );

        Self { nodes, edges, thread_count: threads.len(), current_thread, index }
    }

    /// Nodes, thread by thread, each thread as title, then each region title followed by its entries
    pub fn nodes(&self) -> &[StackNode] {
        &self.nodes
    }

    /// Edges between consecutive entries
    pub fn edges(&self) -> &[StackEdge] {
        &self.edges
    }

    /// Number of threads shown
    pub fn thread_count(&self) -> usize {
        self.thread_count
    }

    /// Thread marked current, if it exists
    pub fn current_thread(&self) -> Option<usize> {
        self.current_thread.filter(|&thread| thread < self.thread_count)
    }

    /// Whether the view has no nodes
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Node with the given id
    pub fn node(&self, id: StackNodeId) -> Option<&StackNode> {
        self.index.get(&id).map(|&i| &self.nodes[i])
    }

    /// Nodes of one thread, in display order
    pub fn thread_nodes(&self, thread: usize) -> impl Iterator<Item = &StackNode> + '_ {
        self.nodes.iter().filter(move |node| node.id.thread() == thread)
    }

    /// Ids of every toggled-on node
    pub fn selected(&self) -> Vec<StackNodeId> {
        self.nodes.iter().filter(|node| node.selected).map(StackNode::id).collect()
    }

    /// Flip the selection of one node and nothing else.
    ///
    /// Returns the new state, or `None` for an unknown id.
    pub fn toggle(&mut self, id: StackNodeId) -> Option<bool> {
        let node = &mut self.nodes[*self.index.get(&id)?];
        node.selected = !node.selected;
        debug!(%id, selected = node.selected, "Toggled stack node");
        Some(node.selected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn thread(os: &[u64], rts: &[u64]) -> ThreadSnapshot {
        let entries = |addresses: &[u64]| {
            addresses.iter().map(|&a| StackEntry::new(a, json!(a), format!("{a:#x}"))).collect()
        };
        ThreadSnapshot { operand_stash: entries(os), runtime_stack: entries(rts) }
    }

    fn entry(thread: usize, region: StackRegion, index: usize) -> StackNodeId {
        StackNodeId::Entry { thread, region, index }
    }

    #[test]
    fn test_empty_thread_list() {
        let graph = StackGraph::build(&[], Some(0));
        assert!(graph.is_empty());
        assert!(graph.edges().is_empty());
        assert_eq!(graph.current_thread(), None);
    }

    #[test]
    fn test_nodes_and_chain_edges() {
        let graph = StackGraph::build(&[thread(&[1, 2, 3], &[4]), thread(&[], &[5, 6])], Some(1));

        // Thread 0: title + 2 region titles + 4 entries; thread 1: title + 2 region titles + 2 entries
        assert_eq!(graph.nodes().len(), 12);
        assert_eq!(graph.thread_count(), 2);

        let edge_ids: Vec<String> = graph.edges().iter().map(StackEdge::id).collect();
        assert_eq!(edge_ids, vec!["e0-OS-0-1", "e0-OS-1-2", "e1-RTS-0-1"]);

        let ids: Vec<String> = graph.thread_nodes(0).map(|n| n.id().to_string()).collect();
        assert_eq!(
            ids,
            vec!["title-0", "0-OS-title", "0-OS-0", "0-OS-1", "0-OS-2", "0-RTS-title", "0-RTS-0"]
        );
    }

    #[test]
    fn test_chain_ends() {
        let graph = StackGraph::build(&[thread(&[1, 2, 3], &[4])], None);

        let first = graph.node(entry(0, StackRegion::OperandStash, 0)).unwrap();
        let middle = graph.node(entry(0, StackRegion::OperandStash, 1)).unwrap();
        let last = graph.node(entry(0, StackRegion::OperandStash, 2)).unwrap();
        let single = graph.node(entry(0, StackRegion::RuntimeStack, 0)).unwrap();

        assert!(first.is_first() && !first.is_last());
        assert!(!middle.is_first() && !middle.is_last());
        assert!(!last.is_first() && last.is_last());
        assert!(single.is_first() && single.is_last());
    }

    #[test]
    fn test_current_thread_marking() {
        let graph = StackGraph::build(&[thread(&[1], &[2]), thread(&[3], &[4])], Some(1));

        assert!(graph.thread_nodes(0).all(|n| !n.is_current()));
        assert!(graph.thread_nodes(1).all(|n| n.is_current()));
        assert_eq!(graph.node(StackNodeId::Thread(1)).unwrap().label(), "Thread 1 (Current)");
        assert_eq!(graph.node(StackNodeId::Thread(0)).unwrap().label(), "Thread 0");
        assert_eq!(
            graph.node(StackNodeId::Region(1, StackRegion::RuntimeStack)).unwrap().label(),
            "RTS (Current)"
        );
        // Marking is independent of selection
        assert!(graph.selected().is_empty());
    }

    #[test]
    fn test_out_of_range_current_thread_marks_nothing() {
        let graph = StackGraph::build(&[thread(&[1], &[])], Some(4));
        assert!(graph.nodes().iter().all(|n| !n.is_current()));
        assert_eq!(graph.current_thread(), None);
    }

    #[test]
    fn test_layout() {
        let graph = StackGraph::build(&[thread(&[1, 2], &[3]), thread(&[4], &[])], None);
        let position = |id| graph.node(id).unwrap().position();

        assert_eq!(position(StackNodeId::Thread(0)), Position::new(0, 0));
        assert_eq!(position(StackNodeId::Thread(1)), Position::new(600, 0));
        assert_eq!(
            position(StackNodeId::Region(0, StackRegion::OperandStash)),
            Position::new(-150, 100)
        );
        assert_eq!(
            position(StackNodeId::Region(1, StackRegion::RuntimeStack)),
            Position::new(750, 100)
        );
        assert_eq!(position(entry(0, StackRegion::OperandStash, 0)), Position::new(-150, 220));
        assert_eq!(position(entry(0, StackRegion::OperandStash, 1)), Position::new(-150, 340));
        assert_eq!(position(entry(0, StackRegion::RuntimeStack, 0)), Position::new(150, 220));
        assert_eq!(position(entry(1, StackRegion::OperandStash, 0)), Position::new(450, 220));
    }

    #[test]
    fn test_toggle_flips_only_one_node() {
        let mut graph = StackGraph::build(&[thread(&[1, 2, 3], &[])], Some(0));
        let target = entry(0, StackRegion::OperandStash, 1);

        assert_eq!(graph.toggle(target), Some(true));
        assert_eq!(graph.selected(), vec![target]);

        assert_eq!(graph.toggle(target), Some(false));
        assert!(graph.selected().is_empty());

        assert_eq!(graph.toggle(entry(3, StackRegion::OperandStash, 0)), None);
    }

    #[test]
    fn test_entry_address() {
        let graph = StackGraph::build(&[thread(&[42], &[])], None);
        let node = graph.node(entry(0, StackRegion::OperandStash, 0)).unwrap();
        assert_eq!(node.address(), Some(Address(42)));
        assert_eq!(node.label(), "Addr: 42\nValue: 42\nRaw: 0x2a");
        assert_eq!(graph.node(StackNodeId::Thread(0)).unwrap().address(), None);
    }
}
