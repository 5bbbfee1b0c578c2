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
use thiserror::Error;

use super::Address;

/// Which adjacency list of a heap element a reference came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display)]
pub enum Relation {
    /// The reference is listed in `children`
    #[display("child")]
    Child,
    /// The reference is listed in `parents`
    #[display("parent")]
    Parent,
}

impl Relation {
    /// The relation seen from the other end of the reference
    pub fn inverse(self) -> Self {
        match self {
            Self::Child => Self::Parent,
            Self::Parent => Self::Child,
        }
    }
}

/// A violation of the heap snapshot data contract.
///
/// None of these stop a view from being built. They are collected and surfaced
/// as diagnostics because selection traversal is only meaningful when the
/// contract holds.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Error, Serialize, Deserialize)]
pub enum SnapshotIssue {
    /// Two elements share one address
    #[error("address {address} is used by elements #{first} and #{duplicate}")]
    AddressCollision {
        /// The shared address
        address: Address,
        /// Position of the first element carrying it
        first: usize,
        /// Position of the later element carrying it
        duplicate: usize,
    },
    /// A reference points at an address no element carries
    #[error("element {from} lists {relation} {to}, which is not in the snapshot")]
    DanglingReference {
        /// Element holding the reference
        from: Address,
        /// Unresolved address
        to: Address,
        /// Which list the reference sits in
        relation: Relation,
    },
    /// A reference is not mirrored by the referenced element
    #[error("element {from} lists {relation} {to}, but {to} does not list {from} as its {}", .relation.inverse())]
    TransposeViolation {
        /// Element holding the reference
        from: Address,
        /// Referenced element
        to: Address,
        /// Which list the reference sits in
        relation: Relation,
    },
}
