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

//! Wire format of the execution service
//!
//! A run is a single `POST /run` carrying the program source. The response holds
//! one heap snapshot per breakpoint reached and a parallel list of thread bundles.

use itertools::{EitherOrBoth, Itertools};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{Breakpoint, BreakpointSequence, HeapElement, HeapSnapshot, ThreadSnapshot};

/// Body of a run request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunRequest {
    /// Program source
    pub code: String,
}

impl RunRequest {
    /// Create a request for the given source
    pub fn new(code: impl Into<String>) -> Self {
        Self { code: code.into() }
    }
}

/// Threads captured at one breakpoint
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreadBundle {
    /// Per-thread stacks, by thread index
    #[serde(default)]
    pub threads: Vec<ThreadSnapshot>,
    /// Thread that triggered the capture
    #[serde(default)]
    pub current_thread: Option<usize>,
}

/// Result of a run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunResponse {
    /// Whether the program compiled and ran
    pub success: bool,
    /// Program output on success
    #[serde(default)]
    pub output: Option<String>,
    /// Error message on failure
    #[serde(default)]
    pub error: Option<String>,
    /// One heap snapshot per breakpoint reached
    #[serde(default)]
    pub heaps: Vec<Vec<HeapElement>>,
    /// One thread bundle per breakpoint reached, parallel to `heaps`
    #[serde(default)]
    pub stacks: Vec<ThreadBundle>,
}

impl RunResponse {
    /// A failed run carrying only an error message
    pub fn failure(error: impl Into<String>) -> Self {
        Self { success: false, error: Some(error.into()), ..Default::default() }
    }

    /// Text to show in the output pane
    pub fn display_output(&self) -> String {
        if self.success {
            self.output.clone().unwrap_or_default()
        } else {
            format!("Error: {}", self.error.as_deref().unwrap_or("unknown error"))
        }
    }

    /// Pair heaps and thread bundles into breakpoints.
    ///
    /// A failed run has no breakpoint data. If the two lists disagree in length
    /// the missing half of each pair is left empty.
    pub fn into_breakpoints(self) -> BreakpointSequence {
        if !self.success {
            debug!("Run failed, no breakpoint data");
            return BreakpointSequence::empty();
        }

        if self.heaps.len() != self.stacks.len() {
            warn!(
                heaps = self.heaps.len(),
                stacks = self.stacks.len(),
                "Heap and stack snapshot counts differ"
            );
        }

        self.heaps
            .into_iter()
            .zip_longest(self.stacks)
            .map(|pair| match pair {
                EitherOrBoth::Both(heap, bundle) => {
                    Breakpoint::new(HeapSnapshot::new(heap), bundle.threads, bundle.current_thread)
                }
                EitherOrBoth::Left(heap) => Breakpoint::new(HeapSnapshot::new(heap), vec![], None),
                EitherOrBoth::Right(bundle) => {
                    Breakpoint::new(HeapSnapshot::default(), bundle.threads, bundle.current_thread)
                }
            })
            .collect()
    }
}
