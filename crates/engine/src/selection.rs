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

//! Selection over the heap graph
//!
//! A click recomputes the highlight of every node: everything is reset, then
//! unless the clicked node was already the focus, a descendant pass follows
//! child references and an ancestor pass follows parent references, and the
//! clicked node becomes the focus. The ancestor pass runs second, so a node
//! that is both ancestor and descendant of the focus ends up as an ancestor.
//!
//! Each pass carries its own visited set keyed by address, which is what
//! makes traversal terminate on cyclic heaps.

use std::collections::HashSet;

use ooga_common::types::{Address, Relation};
use serde::Serialize;
use tracing::debug;

use crate::{graph::Highlight, heap::HeapGraph};

/// What a click did to the heap graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SelectionOutcome {
    /// The new focus, `None` when the click cleared the selection
    pub focus: Option<Address>,
    /// Nodes marked by the descendant pass, the clicked node included
    pub descendants_visited: usize,
    /// Nodes marked by the ancestor pass, the clicked node included
    pub ancestors_visited: usize,
}

impl SelectionOutcome {
    fn cleared() -> Self {
        Self { focus: None, descendants_visited: 0, ancestors_visited: 0 }
    }
}

/// Handle a click on the heap node carrying `address`.
///
/// Returns `None` if no node carries the address; the graph is then untouched.
/// Clicking the current focus clears every highlight; clicking any other node
/// makes it the new focus.
pub fn activate(graph: &mut HeapGraph, address: Address) -> Option<SelectionOutcome> {
    let clicked = graph.index_of(address)?;
    let refocus = graph.nodes()[clicked].highlight() != Highlight::Current;

    graph.reset_highlights();

    if !refocus {
        debug!(%address, "Heap selection cleared");
        return Some(SelectionOutcome::cleared());
    }

    let descendants_visited = mark_reachable(graph, clicked, Relation::Child, Highlight::Descendant);
    let ancestors_visited = mark_reachable(graph, clicked, Relation::Parent, Highlight::Ancestor);

    // The focus marker overrides whatever either pass left on the clicked node
    graph.node_mut(clicked).set_highlight(Highlight::Current);

    debug!(%address, descendants_visited, ancestors_visited, "Heap selection focused");

    Some(SelectionOutcome { focus: Some(address), descendants_visited, ancestors_visited })
}

/// Mark every node reachable from `start` along `relation`, `start` included.
/// Returns how many nodes were marked.
fn mark_reachable(graph: &mut HeapGraph, start: usize, relation: Relation, mark: Highlight) -> usize {
    let mut visited: HashSet<Address> = HashSet::new();
    let mut pending = vec![start];

    while let Some(node) = pending.pop() {
        if !visited.insert(graph.nodes()[node].address()) {
            continue;
        }
        graph.node_mut(node).set_highlight(mark);
        pending.extend(graph.adjacent(node, relation).iter().rev());
    }

    visited.len()
}
