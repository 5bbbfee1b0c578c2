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

//! Snapshot model of a debugged ooga-lang run
//!
//! These are passive, immutable data structures delivered whole by the execution
//! service. Everything that interprets them lives in the engine crate.

mod address;
mod breakpoint;
mod heap;
mod issue;
mod run;
mod stack;

pub use address::Address;
pub use breakpoint::{Breakpoint, BreakpointSequence};
pub use heap::{HeapElement, HeapSnapshot};
pub use issue::{Relation, SnapshotIssue};
pub use run::{RunRequest, RunResponse, ThreadBundle};
pub use stack::{StackEntry, StackRegion, ThreadSnapshot};

/// Render an opaque JSON value for display: strings as-is, everything else as JSON text
pub fn display_value(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
