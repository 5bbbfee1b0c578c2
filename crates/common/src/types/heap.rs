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

use std::collections::{hash_map::Entry, HashMap};

use serde::{Deserialize, Serialize};

use super::{display_value, Address, Relation, SnapshotIssue};

/// One heap object captured at a breakpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeapElement {
    /// Identity of the object, unique within its snapshot
    pub address: Address,
    /// Type tag, display only
    #[serde(default)]
    pub tag: String,
    /// Size in words, display only
    #[serde(default)]
    pub size: u64,
    /// Payload, display only
    #[serde(default)]
    pub value: serde_json::Value,
    /// Objects this one references, in order
    #[serde(default)]
    pub children: Vec<Address>,
    /// Objects referencing this one, in order
    #[serde(default)]
    pub parents: Vec<Address>,
}

impl HeapElement {
    /// Create an element with no references
    pub fn new(address: impl Into<Address>, tag: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            tag: tag.into(),
            size: 0,
            value: serde_json::Value::Null,
            children: Vec::new(),
            parents: Vec::new(),
        }
    }

    /// The adjacency list for one direction
    pub fn references(&self, relation: Relation) -> &[Address] {
        match relation {
            Relation::Child => &self.children,
            Relation::Parent => &self.parents,
        }
    }

    /// Multi-line display label
    pub fn label(&self) -> String {
        format!(
            "Address: {}\nTag: {}\nSize: {}\nValue: {}",
            self.address,
            self.tag,
            self.size,
            display_value(&self.value)
        )
    }
}

/// All heap elements of one breakpoint.
///
/// Order carries no meaning beyond the default layout position.
#[derive(
    Debug,
    Clone,
    Default,
    PartialEq,
    Serialize,
    Deserialize,
    derive_more::Deref,
    derive_more::From,
    derive_more::IntoIterator,
)]
#[serde(transparent)]
#[into_iterator(owned, ref)]
pub struct HeapSnapshot(Vec<HeapElement>);

impl HeapSnapshot {
    /// Create a snapshot from elements in capture order
    pub fn new(elements: Vec<HeapElement>) -> Self {
        Self(elements)
    }

    /// Build a snapshot from `(address, children)` pairs, deriving `parents` as the
    /// transpose. Handy for scripted snapshots and tests.
    pub fn from_children<I, A, C>(edges: I) -> Self
    where
        I: IntoIterator<Item = (A, C)>,
        A: Into<Address>,
        C: IntoIterator<Item = A>,
    {
        let mut elements: Vec<HeapElement> = edges
            .into_iter()
            .map(|(address, children)| {
                let mut element = HeapElement::new(address, "obj");
                element.children = children.into_iter().map(Into::into).collect();
                element
            })
            .collect();

        let positions: HashMap<Address, usize> =
            elements.iter().enumerate().map(|(pos, e)| (e.address, pos)).collect();
        let links: Vec<(Address, Address)> = elements
            .iter()
            .flat_map(|e| e.children.iter().map(move |&c| (e.address, c)))
            .collect();
        for (parent, child) in links {
            if let Some(&pos) = positions.get(&child) {
                elements[pos].parents.push(parent);
            }
        }

        Self(elements)
    }

    /// Check the snapshot against its data contract: unique addresses, every
    /// reference resolvable, and `children`/`parents` transposes of each other.
    pub fn validate(&self) -> Vec<SnapshotIssue> {
        let mut issues = Vec::new();

        let mut by_address: HashMap<Address, usize> = HashMap::with_capacity(self.0.len());
        for (pos, element) in self.0.iter().enumerate() {
            match by_address.entry(element.address) {
                Entry::Occupied(first) => issues.push(SnapshotIssue::AddressCollision {
                    address: element.address,
                    first: *first.get(),
                    duplicate: pos,
                }),
                Entry::Vacant(slot) => {
                    slot.insert(pos);
                }
            }
        }

        for element in &self.0 {
            for relation in [Relation::Child, Relation::Parent] {
                for &to in element.references(relation) {
                    let Some(&pos) = by_address.get(&to) else {
                        issues.push(SnapshotIssue::DanglingReference {
                            from: element.address,
                            to,
                            relation,
                        });
                        continue;
                    };
                    if !self.0[pos].references(relation.inverse()).contains(&element.address) {
                        issues.push(SnapshotIssue::TransposeViolation {
                            from: element.address,
                            to,
                            relation,
                        });
                    }
                }
            }
        }

        issues
    }
}
