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

//! Ooga Common - Shared functionality for the workbench components
//!
//! This crate holds the snapshot model delivered by the execution service and the
//! logging setup used by the engine, the terminal front-end and their tests.

/// Snapshot model and wire types: heap elements, thread stacks, breakpoints and run results
pub mod types;

/// Logging setup and utilities for consistent logging across components
pub mod logging;

pub use logging::*;
pub use types::*;
