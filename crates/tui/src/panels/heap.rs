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

//! Heap panel
//!
//! Draws the heap graph on its five-column grid. Each node is a small box
//! coloured by its highlight class; the footer lists the edges of the node
//! under the cursor.

use crossterm::event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use eyre::Result;
use ooga_common::types::Relation;
use ooga_engine::{
    heap::{COLUMN_SPACING, GRID_COLUMNS, ROW_SPACING},
    HeapGraph, Position, Workbench,
};
use ratatui::{
    layout::{self, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use tracing::debug;

use super::{EventResponse, Panel, PanelContext, PanelType};
use crate::ui::BorderPresets;

/// Rows taken by one node: four label lines plus borders
const NODE_HEIGHT: u16 = 6;

/// Heap graph panel
#[derive(Debug, Default)]
pub struct HeapPanel {
    focused: bool,
    /// Node under the cursor, by snapshot order
    cursor: usize,
    /// First grid row on screen
    scroll_row: usize,
    /// Screen area of every node drawn in the last frame
    hits: Vec<(Rect, usize)>,
}

impl HeapPanel {
    /// Create a heap panel with the cursor on the first node
    pub fn new() -> Self {
        Self::default()
    }

    /// Node under the cursor, by snapshot order
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Grid cell (column, row) of a laid out node
    fn cell(position: Position) -> (usize, usize) {
        ((position.x / COLUMN_SPACING).max(0) as usize, (position.y / ROW_SPACING).max(0) as usize)
    }

    fn move_cursor(&mut self, delta: isize, len: usize) {
        if len == 0 {
            return;
        }
        self.cursor = self.cursor.saturating_add_signed(delta).min(len - 1);
    }

    fn click(&mut self, index: usize, workbench: &mut Workbench) {
        let Some(address) = workbench.heap().nodes().get(index).map(|node| node.address()) else {
            return;
        };
        self.cursor = index;
        match workbench.click_heap(address) {
            Some(outcome) => debug!(%address, ?outcome, "Heap node clicked"),
            None => debug!(%address, "Heap click on unknown address"),
        }
    }

    fn edge_summary(graph: &HeapGraph, index: usize) -> Option<String> {
        let node = graph.nodes().get(index)?;
        let address = node.address();
        let join = |relation| {
            graph
                .neighbours(address, relation)
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ")
        };
        Some(format!(
            "{} {}  children [{}]  parents [{}]",
            address,
            node.element().tag,
            join(Relation::Child),
            join(Relation::Parent)
        ))
    }
}

impl Panel for HeapPanel {
    fn render(&mut self, frame: &mut Frame<'_>, area: Rect, ctx: &PanelContext<'_>) {
        let graph = ctx.workbench.heap();
        let colors = ctx.colors;
        self.hits.clear();

        let block = BorderPresets::heap(
            self.focused,
            self.title(ctx.workbench),
            colors.focused_border(),
            colors.unfocused_border(),
        );

        if graph.is_empty() {
            let paragraph = Paragraph::new("No heap data for this breakpoint")
                .style(Style::default().fg(colors.help_text()))
                .block(block);
            frame.render_widget(paragraph, area);
            return;
        }

        let inner = block.inner(area);
        frame.render_widget(block, area);
        let [grid_area, footer_area] =
            Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]).areas(inner);

        self.cursor = self.cursor.min(graph.len() - 1);
        let cell_width = (grid_area.width / GRID_COLUMNS as u16).max(1);
        let visible_rows = (grid_area.height / NODE_HEIGHT).max(1) as usize;

        let (_, cursor_row) = Self::cell(graph.nodes()[self.cursor].position());
        if cursor_row < self.scroll_row {
            self.scroll_row = cursor_row;
        } else if cursor_row >= self.scroll_row + visible_rows {
            self.scroll_row = cursor_row + 1 - visible_rows;
        }

        for (index, node) in graph.nodes().iter().enumerate() {
            let (column, row) = Self::cell(node.position());
            if row < self.scroll_row || row >= self.scroll_row + visible_rows {
                continue;
            }

            let rect = Rect::new(
                grid_area.x + column as u16 * cell_width,
                grid_area.y + (row - self.scroll_row) as u16 * NODE_HEIGHT,
                cell_width,
                NODE_HEIGHT,
            )
            .intersection(grid_area);

            let color = colors.highlight(node.highlight());
            let under_cursor = index == self.cursor;
            let mut style = Style::default().fg(color);
            if under_cursor && self.focused {
                style = style.add_modifier(Modifier::BOLD);
            }

            let paragraph = Paragraph::new(node.label())
                .style(style)
                .block(BorderPresets::node(color, under_cursor).title(format!("#{index}")));
            frame.render_widget(paragraph, rect);
            self.hits.push((rect, index));
        }

        if let Some(summary) = Self::edge_summary(graph, self.cursor) {
            let footer = Line::from(vec![
                Span::styled("▸ ", Style::default().fg(colors.info())),
                Span::styled(summary, Style::default().fg(colors.help_text())),
            ]);
            frame.render_widget(Paragraph::new(footer), footer_area);
        }
    }

    fn handle_key_event(&mut self, event: KeyEvent, workbench: &mut Workbench) -> Result<EventResponse> {
        let len = workbench.heap().len();
        match event.code {
            KeyCode::Left => self.move_cursor(-1, len),
            KeyCode::Right => self.move_cursor(1, len),
            KeyCode::Up => self.move_cursor(-(GRID_COLUMNS as isize), len),
            KeyCode::Down => self.move_cursor(GRID_COLUMNS as isize, len),
            KeyCode::Home => self.cursor = 0,
            KeyCode::End => self.cursor = len.saturating_sub(1),
            KeyCode::Enter | KeyCode::Char(' ') => self.click(self.cursor, workbench),
            _ => return Ok(EventResponse::NotHandled),
        }
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
        let hit = self.hits.iter().find(|(rect, _)| rect.contains(point)).map(|&(_, index)| index);
        match hit {
            Some(index) => {
                self.click(index, workbench);
                Ok(EventResponse::Handled)
            }
            None => Ok(EventResponse::NotHandled),
        }
    }

    fn on_rebuild(&mut self, _workbench: &Workbench) {
        self.cursor = 0;
        self.scroll_row = 0;
        self.hits.clear();
    }

    fn on_focus(&mut self) {
        self.focused = true;
    }

    fn on_blur(&mut self) {
        self.focused = false;
    }

    fn panel_type(&self) -> PanelType {
        PanelType::Heap
    }

    fn title(&self, workbench: &Workbench) -> String {
        let heap = workbench.heap();
        let mut title = format!("Heap ({} nodes, {} edges)", heap.len(), heap.edges().len());
        if !heap.issues().is_empty() {
            title.push_str(&format!(" ⚠ {}", heap.issues().len()));
        }
        title
    }
}
