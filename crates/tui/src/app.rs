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

//! Main application state and logic
//!
//! This module contains the core application state management and event handling.

use crate::config::ColorScheme;
use crate::panels::{
    EventResponse, HeapPanel, OutputPanel, Panel, PanelContext, PanelType, RunStatus, StackPanel,
};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use eyre::Result;
use ooga_common::types::RunResponse;
use ooga_engine::Workbench;
use ratatui::{
    layout::{self, Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use std::collections::HashMap;
use tracing::{debug, info};

/// Main application state
#[derive(Debug)]
pub struct App {
    /// Engine state for the loaded run
    workbench: Workbench,
    /// All panels
    panels: HashMap<PanelType, Box<dyn Panel>>,
    /// Where each panel was drawn in the last frame
    areas: HashMap<PanelType, Rect>,
    /// Current focused panel
    current_panel: PanelType,
    /// Active colours
    colors: ColorScheme,
    /// Last run
    run: RunStatus,
    /// Execution service shown in the status bar
    server_url: String,
    /// Whether the application should exit
    should_exit: bool,
}

impl App {
    /// Create a new application instance with empty views
    pub fn new(colors: ColorScheme, server_url: impl Into<String>) -> Self {
        let mut panels: HashMap<PanelType, Box<dyn Panel>> = HashMap::new();
        panels.insert(PanelType::Heap, Box::new(HeapPanel::new()));
        panels.insert(PanelType::Stack, Box::new(StackPanel::new()));
        panels.insert(PanelType::Output, Box::new(OutputPanel::new()));

        Self {
            workbench: Workbench::new(),
            panels,
            areas: HashMap::new(),
            current_panel: PanelType::Heap,
            colors,
            run: RunStatus::default(),
            server_url: server_url.into(),
            should_exit: false,
        }
    }

    /// Engine state
    pub fn workbench(&self) -> &Workbench {
        &self.workbench
    }

    /// Last run
    pub fn run_status(&self) -> &RunStatus {
        &self.run
    }

    /// Current focused panel
    pub fn current_panel(&self) -> PanelType {
        self.current_panel
    }

    /// Whether the application should exit
    pub fn should_exit(&self) -> bool {
        self.should_exit
    }

    /// Note that a run was submitted for `source`
    pub fn start_run(&mut self, source: impl Into<String>) {
        self.run.running = true;
        self.run.source = Some(source.into());
    }

    /// Install the result of a run; the views start over at breakpoint 0
    pub fn install(&mut self, response: RunResponse) {
        self.run.running = false;
        self.run.output = response.display_output();
        let breakpoints = self.workbench.load(&response);
        info!(success = response.success, breakpoints, "Installed run");
        self.after_rebuild();
    }

    /// Switch focus to another panel
    pub fn change_focus(&mut self, panel_type: PanelType) {
        debug!("Focus change to {:?}", panel_type);
        self.current_panel = panel_type;
    }

    fn after_rebuild(&mut self) {
        for panel in self.panels.values_mut() {
            panel.on_rebuild(&self.workbench);
        }
    }

    /// Render the application
    pub fn render(&mut self, frame: &mut Frame<'_>) {
        let area = frame.area();

        let layout_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // Status bar
                Constraint::Fill(1),   // Main content
            ])
            .split(area);

        self.render_status_bar(frame, layout_chunks[0]);

        let main_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(layout_chunks[1]);

        let side_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
            .split(main_chunks[1]);

        self.areas.insert(PanelType::Heap, main_chunks[0]);
        self.areas.insert(PanelType::Stack, side_chunks[0]);
        self.areas.insert(PanelType::Output, side_chunks[1]);

        self.update_panel_focus();

        let ctx = PanelContext { workbench: &self.workbench, colors: &self.colors, run: &self.run };
        for panel_type in PanelType::ALL {
            if let (Some(panel), Some(&rect)) =
                (self.panels.get_mut(&panel_type), self.areas.get(&panel_type))
            {
                panel.render(frame, rect, &ctx);
            }
        }
    }

    /// Render the status bar at the top of the screen
    fn render_status_bar(&self, frame: &mut Frame<'_>, area: Rect) {
        let navigator = self.workbench.navigator();
        let position = if navigator.is_empty() {
            "no breakpoints".to_string()
        } else {
            format!("breakpoint {}/{}", navigator.breakpoint_index() + 1, navigator.len())
        };

        let mut status_spans = vec![
            Span::styled("Ooga Workbench", Style::default().fg(Color::White)),
            Span::raw(" | "),
            Span::styled(format!("Service: {}", self.server_url), Style::default().fg(Color::Cyan)),
            Span::raw(" | "),
            Span::styled(position, Style::default().fg(Color::Green)),
            Span::raw(" | "),
            Span::styled(format!("Panel: {:?}", self.current_panel), Style::default().fg(Color::Gray)),
        ];
        if let Some(source) = &self.run.source {
            status_spans.push(Span::raw(" | "));
            status_spans.push(Span::styled(source.clone(), Style::default().fg(Color::Gray)));
        }
        if self.run.running {
            status_spans.push(Span::raw(" | "));
            status_spans.push(Span::styled("running", Style::default().fg(Color::Yellow)));
        }

        let status_paragraph =
            Paragraph::new(Line::from(status_spans)).style(Style::default().bg(Color::DarkGray));
        frame.render_widget(status_paragraph, area);
    }

    /// Update panel focus states
    fn update_panel_focus(&mut self) {
        for (panel_type, panel) in &mut self.panels {
            if *panel_type == self.current_panel {
                panel.on_focus();
            } else {
                panel.on_blur();
            }
        }
    }

    /// Handle keyboard events
    pub fn handle_key_event(&mut self, key: KeyEvent) -> Result<EventResponse> {
        // Only handle key press events
        if key.kind != KeyEventKind::Press {
            return Ok(EventResponse::NotHandled);
        }

        debug!("Key pressed: {:?}", key);

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.should_exit = true;
                return Ok(EventResponse::Exit);
            }
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_exit = true;
                return Ok(EventResponse::Exit);
            }
            KeyCode::Tab => return Ok(EventResponse::ChangeFocus(self.current_panel.next())),
            KeyCode::BackTab => {
                return Ok(EventResponse::ChangeFocus(self.current_panel.previous()))
            }
            KeyCode::Char('n') => {
                self.workbench.next_breakpoint();
            }
            KeyCode::Char('p') => {
                self.workbench.previous_breakpoint();
            }
            KeyCode::Char('t') => {
                let thread = self.workbench.navigator().thread_index();
                self.workbench.select_thread(thread + 1);
            }
            KeyCode::Char('T') => {
                let thread = self.workbench.navigator().thread_index();
                self.workbench.select_thread(thread.saturating_sub(1));
            }
            KeyCode::Char('r') => return Ok(EventResponse::Rerun),
            _ => {
                return match self.panels.get_mut(&self.current_panel) {
                    Some(panel) => panel.handle_key_event(key, &mut self.workbench),
                    None => Ok(EventResponse::NotHandled),
                };
            }
        }

        self.after_rebuild();
        Ok(EventResponse::Handled)
    }

    /// Handle mouse events; a left click focuses the panel under the pointer and clicks there
    pub fn handle_mouse_event(&mut self, event: MouseEvent) -> Result<EventResponse> {
        if event.kind != MouseEventKind::Down(MouseButton::Left) {
            return Ok(EventResponse::NotHandled);
        }

        let point = layout::Position::new(event.column, event.row);
        let Some(panel_type) = PanelType::ALL
            .into_iter()
            .find(|panel_type| self.areas.get(panel_type).is_some_and(|rect| rect.contains(point)))
        else {
            return Ok(EventResponse::NotHandled);
        };

        self.change_focus(panel_type);
        match self.panels.get_mut(&panel_type) {
            Some(panel) => panel.handle_mouse_event(event, &mut self.workbench),
            None => Ok(EventResponse::NotHandled),
        }
    }

    /// Handle a batch of mouse events in arrival order
    pub fn handle_mouse_batch(&mut self, events: Vec<MouseEvent>) -> Result<()> {
        for event in events {
            self.handle_mouse_event(event)?;
        }
        Ok(())
    }
}
