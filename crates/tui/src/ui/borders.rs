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

//! Panel borders
//!
//! Rounded, double and thick borders whose colour follows panel focus.

use ratatui::style::{Color, Style};
use ratatui::widgets::{Block, BorderType, Borders};

/// Border styles for panels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnhancedBorderStyle {
    /// Rounded corners
    Rounded,
    /// Double-line borders for emphasis
    Double,
    /// Thick borders
    Thick,
}

/// Border builder for panels
#[derive(Debug, Clone)]
pub struct EnhancedBorder {
    style: EnhancedBorderStyle,
    focused: bool,
    title: Option<String>,
    focused_color: Color,
    unfocused_color: Color,
}

impl EnhancedBorder {
    /// Create a new border
    pub fn new(style: EnhancedBorderStyle) -> Self {
        Self {
            style,
            focused: false,
            title: None,
            focused_color: Color::Cyan,
            unfocused_color: Color::Gray,
        }
    }

    /// Create a rounded border
    pub fn rounded() -> Self {
        Self::new(EnhancedBorderStyle::Rounded)
    }

    /// Create a double-line border
    pub fn double() -> Self {
        Self::new(EnhancedBorderStyle::Double)
    }

    /// Create a thick border
    pub fn thick() -> Self {
        Self::new(EnhancedBorderStyle::Thick)
    }

    /// Set focus state
    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    /// Set border title
    pub fn title<S: Into<String>>(mut self, title: S) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set focused border color
    pub fn focused_color(mut self, color: Color) -> Self {
        self.focused_color = color;
        self
    }

    /// Set unfocused border color
    pub fn unfocused_color(mut self, color: Color) -> Self {
        self.unfocused_color = color;
        self
    }

    /// Build the Block widget
    pub fn build(self) -> Block<'static> {
        let border_color = if self.focused { self.focused_color } else { self.unfocused_color };

        let border_type = match self.style {
            EnhancedBorderStyle::Rounded => BorderType::Rounded,
            EnhancedBorderStyle::Double => BorderType::Double,
            EnhancedBorderStyle::Thick => BorderType::Thick,
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(border_type)
            .border_style(Style::default().fg(border_color));

        match self.title {
            Some(title) if self.focused => block.title(format!("▶ {title}")),
            Some(title) => block.title(title),
            None => block,
        }
    }
}

/// Border presets for the workbench panels
#[derive(Debug)]
pub struct BorderPresets;

impl BorderPresets {
    /// Heap panel border
    pub fn heap(focused: bool, title: String, focused_color: Color, unfocused_color: Color) -> Block<'static> {
        EnhancedBorder::double()
            .focused(focused)
            .title(title)
            .focused_color(focused_color)
            .unfocused_color(unfocused_color)
            .build()
    }

    /// Stack panel border
    pub fn stack(focused: bool, title: String, focused_color: Color, unfocused_color: Color) -> Block<'static> {
        EnhancedBorder::thick()
            .focused(focused)
            .title(title)
            .focused_color(focused_color)
            .unfocused_color(unfocused_color)
            .build()
    }

    /// Output panel border
    pub fn output(focused: bool, title: String, focused_color: Color, unfocused_color: Color) -> Block<'static> {
        EnhancedBorder::rounded()
            .focused(focused)
            .title(title)
            .focused_color(focused_color)
            .unfocused_color(unfocused_color)
            .build()
    }

    /// Border of a single graph node
    pub fn node(color: Color, under_cursor: bool) -> Block<'static> {
        let border_type = if under_cursor { BorderType::Thick } else { BorderType::Plain };
        Block::default().borders(Borders::ALL).border_type(border_type).border_style(Style::default().fg(color))
    }
}
