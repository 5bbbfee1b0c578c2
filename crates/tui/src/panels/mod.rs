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

//! Panel framework and implementations
//!
//! This module contains the panel trait and all panel implementations.

use crossterm::event::{KeyEvent, MouseEvent};
use eyre::Result;
use ooga_engine::Workbench;
use ratatui::{layout::Rect, Frame};
use std::fmt::Debug;

use crate::config::ColorScheme;

/// Panel types for identification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PanelType {
    /// Heap object graph
    Heap,
    /// Per-thread stacks
    Stack,
    /// Program output, breakpoint position and diagnostics
    Output,
}

impl PanelType {
    /// Panels in focus order
    pub const ALL: [Self; 3] = [Self::Heap, Self::Stack, Self::Output];

    /// The panel after this one in focus order
    pub fn next(self) -> Self {
        match self {
            Self::Heap => Self::Stack,
            Self::Stack => Self::Output,
            Self::Output => Self::Heap,
        }
    }

    /// The panel before this one in focus order
    pub fn previous(self) -> Self {
        match self {
            Self::Heap => Self::Output,
            Self::Stack => Self::Heap,
            Self::Output => Self::Stack,
        }
    }
}

/// Response from panel event handling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventResponse {
    /// Event was handled, no further action needed
    Handled,
    /// Event was not handled, pass to next handler
    NotHandled,
    /// Request focus change to another panel
    ChangeFocus(PanelType),
    /// Request a new run of the source file
    Rerun,
    /// Request application exit
    Exit,
}

/// State of the most recent run, as shown to the user
#[derive(Debug, Clone, Default)]
pub struct RunStatus {
    /// A run is in flight
    pub running: bool,
    /// Output or error text of the last run
    pub output: String,
    /// Where the program came from, for the title bar
    pub source: Option<String>,
}

/// Everything a panel may read while rendering
#[derive(Debug, Clone, Copy)]
pub struct PanelContext<'a> {
    /// Engine state
    pub workbench: &'a Workbench,
    /// Active colours
    pub colors: &'a ColorScheme,
    /// Last run
    pub run: &'a RunStatus,
}

/// Trait for UI panels
pub trait Panel: Debug + Send {
    /// Render the panel content
    fn render(&mut self, frame: &mut Frame<'_>, area: Rect, ctx: &PanelContext<'_>);

    /// Handle keyboard events
    fn handle_key_event(&mut self, event: KeyEvent, workbench: &mut Workbench) -> Result<EventResponse> {
        let _ = (event, workbench);
        Ok(EventResponse::NotHandled)
    }

    /// Handle mouse events landing inside the panel
    fn handle_mouse_event(
        &mut self,
        event: MouseEvent,
        workbench: &mut Workbench,
    ) -> Result<EventResponse> {
        let _ = (event, workbench);
        Ok(EventResponse::NotHandled)
    }

    /// Called after the views were rebuilt for another breakpoint or thread
    fn on_rebuild(&mut self, workbench: &Workbench) {
        let _ = workbench;
    }

    /// Called when this panel gains focus
    fn on_focus(&mut self) {}

    /// Called when this panel loses focus
    fn on_blur(&mut self) {}

    /// Get the panel type
    fn panel_type(&self) -> PanelType;

    /// Get panel title for display
    fn title(&self, workbench: &Workbench) -> String {
        let _ = workbench;
        format!("{:?}", self.panel_type())
    }
}

pub mod heap;
pub mod output;
pub mod stack;

pub use heap::HeapPanel;
pub use output::OutputPanel;
pub use stack::StackPanel;
