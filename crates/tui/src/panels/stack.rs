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

//! Stack panel
//!
//! One column pair per thread: operand stash on the left, runtime stack on the
//! right, each a vertical chain of entry boxes. Threads that do not fit are
//! scrolled horizontally so the cursor's thread stays visible.

use crossterm::event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use eyre::Result;
use ooga_common::types::StackRegion;
use ooga_engine::{StackGraph, StackNode, StackNodeId, Workbench};
use ratatui::{
    layout::{self, Alignment, Rect},
    style::{Modifier, Style},
    widgets::Paragraph,
    Frame,
};
use tracing::debug;

use super::{EventResponse, Panel, PanelContext, PanelType};
use crate::{config::ColorScheme, ui::BorderPresets};

/// Width of one region column
const COLUMN_WIDTH: u16 = 24;
/// Rows taken by one entry: three label lines plus borders
const ENTRY_HEIGHT: u16 = 5;
/// Row between consecutive entries of a chain
const CONNECTOR_HEIGHT: u16 = 1;
/// Thread title row plus region title row
const HEADER_HEIGHT: u16 = 2;

/// Per-thread stack panel
#[derive(Debug, Default)]
pub struct StackPanel {
    focused: bool,
    /// Cursor column, two per thread
    column: usize,
    /// Cursor row; 0 is the region title, `i + 1` is entry `i`
    row: usize,
    /// First entry on screen
    scroll: usize,
    /// First thread on screen
    first_thread: usize,
    /// Screen area of every node drawn in the last frame
    hits: Vec<(Rect, StackNodeId)>,
}

impl StackPanel {
    /// Create a stack panel with the cursor on thread 0
    pub fn new() -> Self {
        Self::default()
    }

    /// Node ids per column: the region title followed by its entries
    fn columns(graph: &StackGraph) -> Vec<Vec<StackNodeId>> {
        (0..graph.thread_count())
            .flat_map(|thread| StackRegion::ALL.map(|region| (thread, region)))
            .map(|(thread, region)| {
                graph
                    .thread_nodes(thread)
                    .map(StackNode::id)
                    .filter(|id| match *id {
                        StackNodeId::Region(_, r) | StackNodeId::Entry { region: r, .. } => r == region,
                        StackNodeId::Thread(_) => false,
                    })
                    .collect()
            })
            .collect()
    }

    /// Node under the cursor
    pub fn cursor_node(&self, graph: &StackGraph) -> Option<StackNodeId> {
        Self::columns(graph).get(self.column)?.get(self.row).copied()
    }

    fn clamp_cursor(&mut self, columns: &[Vec<StackNodeId>]) {
        self.column = self.column.min(columns.len().saturating_sub(1));
        let rows = columns.get(self.column).map_or(0, Vec::len);
        self.row = self.row.min(rows.saturating_sub(1));
    }

    fn click(&mut self, id: StackNodeId, workbench: &mut Workbench) {
        let click = workbench.click_stack(id);
        debug!(%id, ?click, "Stack node clicked");
    }

    fn node_style(node: &StackNode, colors: &ColorScheme) -> Style {
        let color = if node.is_selected() {
            colors.selected()
        } else if node.is_current() {
            colors.current_thread()
        } else {
            colors.unfocused_border()
        };
        Style::default().fg(color)
    }

    fn render_title(&mut self, frame: &mut Frame<'_>, rect: Rect, node: &StackNode, style: Style) {
        let style = if node.is_selected() { style.add_modifier(Modifier::REVERSED) } else { style };
        let paragraph = Paragraph::new(node.label().to_string())
            .style(style.add_modifier(Modifier::BOLD))
            .alignment(Alignment::Center);
        frame.render_widget(paragraph, rect);
        self.hits.push((rect, node.id()));
    }
}

impl Panel for StackPanel {
    fn render(&mut self, frame: &mut Frame<'_>, area: Rect, ctx: &PanelContext<'_>) {
        let graph = ctx.workbench.stack();
        let colors = ctx.colors;
        self.hits.clear();

        let block = BorderPresets::stack(
            self.focused,
            self.title(ctx.workbench),
            colors.focused_border(),
            colors.unfocused_border(),
        );

        if graph.is_empty() {
            let paragraph = Paragraph::new("No threads for this breakpoint")
                .style(Style::default().fg(colors.help_text()))
                .block(block);
            frame.render_widget(paragraph, area);
            return;
        }

        let inner = block.inner(area);
        frame.render_widget(block, area);

        let columns = Self::columns(graph);
        self.clamp_cursor(&columns);

        // Horizontal scroll by whole threads
        let pair_width = COLUMN_WIDTH * 2;
        let visible_threads = (inner.width / pair_width).max(1) as usize;
        let cursor_thread = self.column / 2;
        if cursor_thread < self.first_thread {
            self.first_thread = cursor_thread;
        } else if cursor_thread >= self.first_thread + visible_threads {
            self.first_thread = cursor_thread + 1 - visible_threads;
        }

        // Vertical scroll by whole entries
        let slot_height = ENTRY_HEIGHT + CONNECTOR_HEIGHT;
        let visible_entries =
            (inner.height.saturating_sub(HEADER_HEIGHT) / slot_height).max(1) as usize;
        let cursor_entry = self.row.saturating_sub(1);
        if cursor_entry < self.scroll {
            self.scroll = cursor_entry;
        } else if cursor_entry >= self.scroll + visible_entries {
            self.scroll = cursor_entry + 1 - visible_entries;
        }

        let last_thread = graph.thread_count().min(self.first_thread + visible_threads);
        for thread in self.first_thread..last_thread {
            let x = inner.x + (thread - self.first_thread) as u16 * pair_width;

            if let Some(title) = graph.node(StackNodeId::Thread(thread)) {
                let rect = Rect::new(x, inner.y, pair_width, 1).intersection(inner);
                let style = Self::node_style(title, colors);
                self.render_title(frame, rect, title, style);
            }

            for region in StackRegion::ALL {
                let column = thread * 2 + region.ordinal();
                let cx = x + region.ordinal() as u16 * COLUMN_WIDTH;
                let ids = &columns[column];

                if let Some(title) = ids.first().and_then(|&id| graph.node(id)) {
                    let rect = Rect::new(cx, inner.y + 1, COLUMN_WIDTH, 1).intersection(inner);
                    let mut style = Self::node_style(title, colors);
                    if self.focused && (self.column, self.row) == (column, 0) {
                        style = style.add_modifier(Modifier::UNDERLINED);
                    }
                    self.render_title(frame, rect, title, style);
                }

                for (slot, (entry, &id)) in
                    ids.iter().skip(1).enumerate().skip(self.scroll).take(visible_entries).enumerate()
                {
                    let Some(node) = graph.node(id) else { continue };
                    let y = inner.y + HEADER_HEIGHT + slot as u16 * slot_height;
                    let rect = Rect::new(cx, y, COLUMN_WIDTH, ENTRY_HEIGHT).intersection(inner);
                    let style = Self::node_style(node, colors);
                    let under_cursor = (self.column, self.row) == (column, entry + 1);
                    let color = style.fg.unwrap_or_else(|| colors.unfocused_border());

                    let paragraph = Paragraph::new(node.label().to_string())
                        .style(style)
                        .block(BorderPresets::node(color, under_cursor));
                    frame.render_widget(paragraph, rect);
                    self.hits.push((rect, id));

                    if !node.is_last() {
                        let connector =
                            Rect::new(cx, y + ENTRY_HEIGHT, COLUMN_WIDTH, CONNECTOR_HEIGHT)
                                .intersection(inner);
                        frame.render_widget(
                            Paragraph::new("│").style(Style::default().fg(color)).alignment(Alignment::Center),
                            connector,
                        );
                    }
                }
            }
        }
    }

    fn handle_key_event(&mut self, event: KeyEvent, workbench: &mut Workbench) -> Result<EventResponse> {
        let columns = Self::columns(workbench.stack());
        match event.code {
            KeyCode::Up => self.row = self.row.saturating_sub(1),
            KeyCode::Down => self.row += 1,
            KeyCode::Left => self.column = self.column.saturating_sub(1),
            KeyCode::Right => self.column += 1,
            KeyCode::Enter | KeyCode::Char(' ') => {
                self.clamp_cursor(&columns);
                if let Some(id) = columns.get(self.column).and_then(|ids| ids.get(self.row)) {
                    self.click(*id, workbench);
                }
                return Ok(EventResponse::Handled);
            }
            _ => return Ok(EventResponse::NotHandled),
        }
        self.clamp_cursor(&columns);
        Ok(EventResponse::Handled)
    }

    fn handle_mouse_event(
        &mut self,
        event: MouseEvent,
        workbench: &mut Workbench,
    ) -> Result<EventResponse> {
        if event.kind != MouseEventKind::Down(MouseButton::Left) {
            return Ok(EventResponse::NotHandled);
        }

        let point = layout::Position::new(event.column, event.row);
        let Some(id) = self.hits.iter().find(|(rect, _)| rect.contains(point)).map(|&(_, id)| id)
        else {
            return Ok(EventResponse::NotHandled);
        };

        let columns = Self::columns(workbench.stack());
        if let Some((column, row)) = columns
            .iter()
            .enumerate()
            .find_map(|(c, ids)| ids.iter().position(|&i| i == id).map(|r| (c, r)))
        {
            self.column = column;
            self.row = row;
        }
        self.click(id, workbench);
        Ok(EventResponse::Handled)
    }

    fn on_rebuild(&mut self, workbench: &Workbench) {
        self.column = workbench.navigator().thread_index() * 2;
        self.row = 0;
        self.scroll = 0;
        self.hits.clear();
    }

    fn on_focus(&mut self) {
        self.focused = true;
    }

    fn on_blur(&mut self) {
        self.focused = false;
    }

    fn panel_type(&self) -> PanelType {
        PanelType::Stack
    }

    fn title(&self, workbench: &Workbench) -> String {
        let stack = workbench.stack();
        match stack.current_thread() {
            Some(thread) => format!("Stacks ({} threads, current {thread})", stack.thread_count()),
            None => format!("Stacks ({} threads)", stack.thread_count()),
        }
    }
}
