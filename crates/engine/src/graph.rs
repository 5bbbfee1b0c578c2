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

use serde::Serialize;

/// Highlight state of a heap node.
///
/// The four states are mutually exclusive, which rules out meaningless
/// combinations such as an "ancestor" that is not selected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, derive_more::Display)]
pub enum Highlight {
    /// Not related to the focused node
    #[default]
    #[display("neutral")]
    Neutral,
    /// Reaches the focused node through parent references
    #[display("ancestor")]
    Ancestor,
    /// Reachable from the focused node through child references
    #[display("descendant")]
    Descendant,
    /// The focused node itself
    #[display("current")]
    Current,
}

impl Highlight {
    /// Anything but neutral
    pub fn is_highlighted(self) -> bool {
        self != Self::Neutral
    }
}

/// Screen position of a node in layout units
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct Position {
    /// Horizontal offset
    pub x: i32,
    /// Vertical offset
    pub y: i32,
}

impl Position {
    /// Create a position
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}
