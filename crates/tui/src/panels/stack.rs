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

//! Stack pane
//!
//! One line per 8-byte word of the stack window, most significant byte
//! first; words that changed since the previous poll are emphasized.

use super::{Panel, PanelType, ViewData};
use crate::snapshot::{SnapshotStore, StackWord, WORD_SIZE};
use crate::ui::Theme;
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// Stack panel implementation
#[derive(Debug, Default)]
pub struct StackPanel;

impl Panel for StackPanel {
    fn render(&self, frame: &mut Frame<'_>, area: Rect, data: &ViewData<'_>) {
        frame.render_widget(Paragraph::new(build_lines(data.store, data.theme)), area);
    }

    fn panel_type(&self) -> PanelType {
        PanelType::Stack
    }
}

/// Format the stack window into pane lines, heading included.
pub fn build_lines(store: &SnapshotStore, theme: &Theme) -> Vec<Line<'static>> {
    let mut lines = vec![Line::from(Span::styled("Stack", theme.heading))];
    for word in store.stack_words() {
        let span = if word.changed {
            Span::styled(word_line(&word), theme.emphasis)
        } else {
            Span::raw(word_line(&word))
        };
        lines.push(Line::from(span));
    }
    lines
}

fn word_line(word: &StackWord) -> String {
    format!("{:X}    {}", word.address, format_word(&word.bytes))
}

/// Render a word's bytes as space-separated two-digit uppercase hex, most
/// significant byte first (reversed relative to read order).
pub fn format_word(bytes: &[u8; WORD_SIZE]) -> String {
    let mut out = String::with_capacity(WORD_SIZE * 3 - 1);
    for (i, byte) in bytes.iter().rev().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        out.push_str(&format!("{byte:02X}"));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::Snapshot;

    #[test]
    fn word_bytes_are_reversed_for_display() {
        let bytes = [0xAA, 0xBB, 0xCC, 0xDD, 0xEE, 0xFF, 0x00, 0x11];
        assert_eq!(format_word(&bytes), "11 00 FF EE DD CC BB AA");
    }

    #[test]
    fn lines_carry_absolute_word_addresses() {
        let mut store = SnapshotStore::new();
        store.push(Snapshot {
            pc: 0,
            registers: Vec::new(),
            stack_base: 0x7F00,
            stack: vec![0u8; 16],
        });

        let lines = build_lines(&store, &Theme::default());
        assert_eq!(lines.len(), 3); // heading + two words
        assert!(lines[1].spans[0].content.starts_with("7F00    "));
        assert!(lines[2].spans[0].content.starts_with("7F08    "));
    }

    #[test]
    fn changed_word_is_emphasized() {
        let theme = Theme::default();
        let mut store = SnapshotStore::new();
        store.push(Snapshot {
            pc: 0,
            registers: Vec::new(),
            stack_base: 0x7F00,
            stack: vec![0u8; 16],
        });
        let mut stack = vec![0u8; 16];
        stack[12] = 0x2A;
        store.push(Snapshot { pc: 0, registers: Vec::new(), stack_base: 0x7F00, stack });

        let lines = build_lines(&store, &theme);
        assert_ne!(lines[1].spans[0].style, theme.emphasis);
        assert_eq!(lines[2].spans[0].style, theme.emphasis);
    }
}
