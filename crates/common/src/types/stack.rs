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

use super::{display_value, Address};

/// One slot of a thread's operand stash or runtime stack
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StackEntry {
    /// Address of the value held in this slot
    pub address: Address,
    /// Decoded value, display only
    #[serde(default)]
    pub value: serde_json::Value,
    /// Raw word as rendered by the virtual machine
    #[serde(default)]
    pub raw: String,
}

impl StackEntry {
    /// Create an entry
    pub fn new(address: impl Into<Address>, value: serde_json::Value, raw: impl Into<String>) -> Self {
        Self { address: address.into(), value, raw: raw.into() }
    }

    /// Multi-line display label
    pub fn label(&self) -> String {
        format!("Addr: {}\nValue: {}\nRaw: {}", self.address, display_value(&self.value), self.raw)
    }
}

/// The two per-thread regions shown in the stack view
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum StackRegion {
    /// Operand stash
    OperandStash,
    /// Runtime stack
    RuntimeStack,
}

impl StackRegion {
    /// Regions in display order
    pub const ALL: [Self; 2] = [Self::OperandStash, Self::RuntimeStack];

    /// Short label used in titles and node ids
    pub fn label(self) -> &'static str {
        match self {
            Self::OperandStash => "OS",
            Self::RuntimeStack => "RTS",
        }
    }

    /// Human readable name
    pub fn name(self) -> &'static str {
        match self {
            Self::OperandStash => "operand stash",
            Self::RuntimeStack => "runtime stack",
        }
    }

    /// Position of the region within a thread, left to right
    pub fn ordinal(self) -> usize {
        match self {
            Self::OperandStash => 0,
            Self::RuntimeStack => 1,
        }
    }
}

/// Stack state of one thread at a breakpoint
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ThreadSnapshot {
    /// Operand stash, bottom first
    #[serde(rename = "os", default)]
    pub operand_stash: Vec<StackEntry>,
    /// Runtime stack, bottom first
    #[serde(rename = "rts", default)]
    pub runtime_stack: Vec<StackEntry>,
}

impl ThreadSnapshot {
    /// Entries of one region
    pub fn region(&self, region: StackRegion) -> &[StackEntry] {
        match region {
            StackRegion::OperandStash => &self.operand_stash,
            StackRegion::RuntimeStack => &self.runtime_stack,
        }
    }

    /// Whether both regions are empty
    pub fn is_empty(&self) -> bool {
        self.operand_stash.is_empty() && self.runtime_stack.is_empty()
    }
}
