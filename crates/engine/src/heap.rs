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

//! Heap graph builder
//!
//! One node per heap element, one directed edge per `(element, child)` pair.
//! Nodes are placed on a fixed five-column grid in snapshot order, so the same
//! snapshot always yields the same layout.

use std::{collections::HashMap, fmt};

use ooga_common::types::{Address, HeapElement, HeapSnapshot, Relation, SnapshotIssue};
use serde::Serialize;
use tracing::{debug, warn};

use crate::graph::{Highlight, Position};

/// Number of grid columns
pub const GRID_COLUMNS: usize = 5;
/// Horizontal distance between grid columns
pub const COLUMN_SPACING: i32 = 300;
/// Vertical distance between grid rows
pub const ROW_SPACING: i32 = 150;

/// Grid cell of the element at `order` in its snapshot, row-major
pub fn grid_position(order: usize) -> Position {
    let column = (order % GRID_COLUMNS) as i32;
    let row = (order / GRID_COLUMNS) as i32;
    Position::new(column * COLUMN_SPACING, row * ROW_SPACING)
}

/// A heap element placed in the view
#[derive(Debug, Clone, Serialize)]
pub struct HeapNode {
    element: HeapElement,
    position: Position,
    highlight: Highlight,
}

impl HeapNode {
    fn new(element: HeapElement, position: Position) -> Self {
        Self { element, position, highlight: Highlight::Neutral }
    }

    /// Address of the underlying element
    pub fn address(&self) -> Address {
        self.element.address
    }

    /// The underlying element
    pub fn element(&self) -> &HeapElement {
        &self.element
    }

    /// Layout position
    pub fn position(&self) -> Position {
        self.position
    }

    /// Current highlight state
    pub fn highlight(&self) -> Highlight {
        self.highlight
    }

    /// Display label
    pub fn label(&self) -> String {
        self.element.label()
    }

    pub(crate) fn set_highlight(&mut self, highlight: Highlight) {
        self.highlight = highlight;
    }
}

/// Directed edge from a parent element to one of its children
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct HeapEdge {
    /// Referencing element
    pub source: Address,
    /// Referenced element
    pub target: Address,
}

impl HeapEdge {
    /// Stable edge id, `"<source>-<target>"`
    pub fn id(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for HeapEdge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.source, self.target)
    }
}

/// Positioned node/edge graph of one heap snapshot.
///
/// Owned exclusively by the heap view. Highlight state is mutated in place by
/// [`crate::selection`] and discarded when the graph is rebuilt.
#[derive(Debug, Clone, Default, Serialize)]
pub struct HeapGraph {
    nodes: Vec<HeapNode>,
    edges: Vec<HeapEdge>,
    issues: Vec<SnapshotIssue>,
    /// First node carrying each address
    #[serde(skip)]
    index: HashMap<Address, usize>,
    /// Resolved child references by node position
    #[serde(skip)]
    children: Vec<Vec<usize>>,
    /// Resolved parent references by node position
    #[serde(skip)]
    parents: Vec<Vec<usize>>,
}

impl HeapGraph {
    /// The empty view
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build the graph of a heap snapshot.
    ///
    /// Never fails: references to unknown addresses are dropped (no edge), and
    /// duplicated addresses still get their own node while lookups resolve to
    /// the first one. Both are recorded in [`Self::issues`].
    pub fn build(snapshot: &HeapSnapshot) -> Self {
        let issues = snapshot.validate();
        for issue in &issues {
            warn!(%issue, "Heap snapshot violates its data contract");
        }

        let mut index = HashMap::with_capacity(snapshot.len());
        let nodes: Vec<HeapNode> = snapshot
            .iter()
            .enumerate()
            .map(|(order, element)| {
                index.entry(element.address).or_insert(order);
                HeapNode::new(element.clone(), grid_position(order))
            })
            .collect();

        let resolve = |refs: &[Address]| -> Vec<usize> {
            refs.iter().filter_map(|address| index.get(address).copied()).collect()
        };
        let children: Vec<Vec<usize>> = snapshot.iter().map(|e| resolve(&e.children)).collect();
        let parents: Vec<Vec<usize>> = snapshot.iter().map(|e| resolve(&e.parents)).collect();

        let known = &index;
        let edges: Vec<HeapEdge> = snapshot
            .iter()
            .flat_map(|element| {
                element
                    .children
                    .iter()
                    .copied()
                    .filter(move |child| known.contains_key(child))
                    .map(move |target| HeapEdge { source: element.address, target })
            })
            .collect();

        debug!(nodes = nodes.len(), edges = edges.len(), "Built heap graph");

        Self { nodes, edges, issues, index, children, parents }
    }

    /// Nodes in snapshot order
    pub fn nodes(&self) -> &[HeapNode] {
        &self.nodes
    }

    /// Edges in snapshot order
    pub fn edges(&self) -> &[HeapEdge] {
        &self.edges
    }

    /// Data contract violations found while building
    pub fn issues(&self) -> &[SnapshotIssue] {
        &self.issues
    }

    /// Number of nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the view has no nodes
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Whether some node carries this address
    pub fn contains(&self, address: Address) -> bool {
        self.index.contains_key(&address)
    }

    /// Position of the node carrying this address
    pub fn index_of(&self, address: Address) -> Option<usize> {
        self.index.get(&address).copied()
    }

    /// Node carrying this address
    pub fn node(&self, address: Address) -> Option<&HeapNode> {
        self.index_of(address).map(|i| &self.nodes[i])
    }

    /// Highlight of the node carrying this address
    pub fn highlight(&self, address: Address) -> Option<Highlight> {
        self.node(address).map(HeapNode::highlight)
    }

    /// The focused node, if any
    pub fn focus(&self) -> Option<Address> {
        self.nodes.iter().find(|n| n.highlight == Highlight::Current).map(HeapNode::address)
    }

    /// Addresses of every node in the given highlight state, in snapshot order
    pub fn with_highlight(&self, highlight: Highlight) -> Vec<Address> {
        self.nodes.iter().filter(|n| n.highlight == highlight).map(HeapNode::address).collect()
    }

    /// Resolved neighbours of a node in one direction
    pub fn neighbours(&self, address: Address, relation: Relation) -> Vec<Address> {
        self.index_of(address)
            .map(|i| self.adjacent(i, relation).iter().map(|&j| self.nodes[j].address()).collect())
            .unwrap_or_default()
    }

    pub(crate) fn adjacent(&self, node: usize, relation: Relation) -> &[usize] {
        match relation {
            Relation::Child => &self.children[node],
            Relation::Parent => &self.parents[node],
        }
    }

    pub(crate) fn node_mut(&mut self, node: usize) -> &mut HeapNode {
        &mut self.nodes[node]
    }

    pub(crate) fn reset_highlights(&mut self) {
        for node in &mut self.nodes {
            node.highlight = Highlight::Neutral;
        }
    }
}
