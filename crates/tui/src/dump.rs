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

//! Headless rendering of the workbench views
//!
//! Loads a run, selects one breakpoint and prints both graphs as JSON. Used by
//! `ooga-tui --dump` and handy for diffing layouts between versions.

use eyre::{Context, Result};
use ooga_common::types::RunResponse;
use ooga_engine::{HeapGraph, StackGraph, Workbench};
use serde::Serialize;
use std::{fs, path::Path};
use tracing::info;

/// Serialized view of one breakpoint
#[derive(Debug, Serialize)]
pub struct Dump<'a> {
    /// Breakpoint shown, after clamping
    pub breakpoint: usize,
    /// Number of breakpoints in the run
    pub breakpoints: usize,
    /// Text of the output pane
    pub output: String,
    /// Heap view
    pub heap: &'a HeapGraph,
    /// Stack view
    pub stack: &'a StackGraph,
    /// Data contract violations, human readable
    pub diagnostics: Vec<String>,
}

/// Read a saved execution service response
pub fn read_response(path: impl AsRef<Path>) -> Result<RunResponse> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read response file: {path:?}"))?;
    serde_json::from_str(&content).with_context(|| format!("Failed to parse response file: {path:?}"))
}

/// Render breakpoint `breakpoint` of `response` as pretty JSON
pub fn dump_response(response: &RunResponse, breakpoint: usize) -> Result<String> {
    let mut workbench = Workbench::new();
    workbench.load(response);
    let breakpoint = workbench.select_breakpoint(breakpoint);
    info!(breakpoint, "Dumping views");

    let dump = Dump {
        breakpoint,
        breakpoints: workbench.navigator().len(),
        output: response.display_output(),
        heap: workbench.heap(),
        stack: workbench.stack(),
        diagnostics: workbench.diagnostics().iter().map(ToString::to_string).collect(),
    };
    serde_json::to_string_pretty(&dump).wrap_err("Failed to serialize views")
}
