// MDB - Machine-State Debugger
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

//! Pane layout management
//!
//! Fixed three-column arrangement: disassembly takes half the terminal,
//! registers and stack a quarter each, all spanning the full height.

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Layout manager tracking terminal dimensions between resize events
#[derive(Debug)]
pub struct LayoutManager {
    terminal_width: u16,
    terminal_height: u16,
}

impl LayoutManager {
    /// Create a layout manager for the given terminal size
    pub fn new(width: u16, height: u16) -> Self {
        Self { terminal_width: width, terminal_height: height }
    }

    /// Update terminal dimensions
    pub fn update_size(&mut self, width: u16, height: u16) {
        self.terminal_width = width;
        self.terminal_height = height;
    }

    /// Get current terminal width
    pub fn width(&self) -> u16 {
        self.terminal_width
    }

    /// Get current terminal height
    pub fn height(&self) -> u16 {
        self.terminal_height
    }

    /// Rows available to the disassembly pane; sizes the disassembly
    /// request issued by the poll.
    pub fn disasm_rows(&self) -> u16 {
        self.terminal_height
    }

    /// Split an area into the disassembly/registers/stack columns.
    pub fn split(&self, area: Rect) -> [Rect; 3] {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(50), // Disassembly panel
                Constraint::Percentage(25), // Registers panel
                Constraint::Percentage(25), // Stack panel
            ])
            .split(area);
        [chunks[0], chunks[1], chunks[2]]
    }
}

impl Default for LayoutManager {
    fn default() -> Self {
        Self::new(80, 24)
    }
}
