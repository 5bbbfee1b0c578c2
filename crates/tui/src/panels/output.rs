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

//! Output panel
//!
//! Program output, the breakpoint cursor, the selected stack element and any
//! data contract violations found in the current heap snapshot.

use crossterm::event::{KeyCode, KeyEvent};
use eyre::Result;
use ooga_engine::Workbench;
use ratatui::{
    layout::Rect,
    style::Style,
    text::Line,
    widgets::{Paragraph, Wrap},
    Frame,
};

use super::{EventResponse, Panel, PanelContext, PanelType};
use crate::ui::BorderPresets;

/// Key help shown at the bottom of the output
pub const KEY_HELP: &str =
    "Tab focus | arrows move | Enter click | n/p breakpoint | t/T thread | r re-run | q quit";

/// Output and status panel
#[derive(Debug, Default)]
pub struct OutputPanel {
    focused: bool,
    scroll: u16,
}

impl OutputPanel {
    /// Create an output panel
    pub fn new() -> Self {
        Self::default()
    }
}

impl Panel for OutputPanel {
    fn render(&mut self, frame: &mut Frame<'_>, area: Rect, ctx: &PanelContext<'_>) {
        let colors = ctx.colors;
        let workbench = ctx.workbench;
        let navigator = workbench.navigator();
        let mut lines: Vec<Line<'_>> = Vec::new();

        if ctx.run.running {
            lines.push(Line::styled("Running...", Style::default().fg(colors.info())));
        }

        for line in ctx.run.output.lines() {
            let style = if ctx.run.output.starts_with("Error:") {
                Style::default().fg(colors.error())
            } else {
                Style::default()
            };
            lines.push(Line::styled(line.to_string(), style));
        }
        lines.push(Line::default());

        let position = if navigator.is_empty() {
            "No breakpoints".to_string()
        } else {
            format!(
                "Breakpoint {}/{} | thread {}",
                navigator.breakpoint_index() + 1,
                navigator.len(),
                navigator.thread_index()
            )
        };
        lines.push(Line::styled(position, Style::default().fg(colors.info())));

        if let Some(selected) = workbench.selected_element() {
            lines.push(Line::styled(
                format!("Selected {} (address {})", selected.node, selected.address),
                Style::default().fg(colors.selected()),
            ));
        }

        for issue in workbench.diagnostics() {
            lines.push(Line::styled(format!("⚠ {issue}"), Style::default().fg(colors.warning())));
        }

        lines.push(Line::styled(KEY_HELP, Style::default().fg(colors.help_text())));

        let block = BorderPresets::output(
            self.focused,
            self.title(workbench),
            colors.focused_border(),
            colors.unfocused_border(),
        );
        let paragraph =
            Paragraph::new(lines).block(block).wrap(Wrap { trim: false }).scroll((self.scroll, 0));
        frame.render_widget(paragraph, area);
    }

    fn handle_key_event(&mut self, event: KeyEvent, _workbench: &mut Workbench) -> Result<EventResponse> {
        match event.code {
            KeyCode::Up => self.scroll = self.scroll.saturating_sub(1),
            KeyCode::Down => self.scroll = self.scroll.saturating_add(1),
            KeyCode::PageUp => self.scroll = self.scroll.saturating_sub(10),
            KeyCode::PageDown => self.scroll = self.scroll.saturating_add(10),
            KeyCode::Home => self.scroll = 0,
            _ => return Ok(EventResponse::NotHandled),
        }
        Ok(EventResponse::Handled)
    }

    fn on_focus(&mut self) {
        self.focused = true;
    }

    fn on_blur(&mut self) {
        self.focused = false;
    }

    fn panel_type(&self) -> PanelType {
        PanelType::Output
    }

    fn title(&self, workbench: &Workbench) -> String {
        match workbench.diagnostics().len() {
            0 => "Output".to_string(),
            n => format!("Output ({n} diagnostics)"),
        }
    }
}
