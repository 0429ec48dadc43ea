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

//! Register pane
//!
//! One line per register in the server's order; registers whose value
//! changed since the previous poll are emphasized.

use super::{Panel, PanelType, ViewData};
use crate::snapshot::SnapshotStore;
use crate::ui::Theme;
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// Register panel implementation
#[derive(Debug, Default)]
pub struct RegistersPanel;

impl Panel for RegistersPanel {
    fn render(&self, frame: &mut Frame<'_>, area: Rect, data: &ViewData<'_>) {
        frame.render_widget(Paragraph::new(build_lines(data.store, data.theme)), area);
    }

    fn panel_type(&self) -> PanelType {
        PanelType::Registers
    }
}

/// Format the register file into pane lines, heading included.
pub fn build_lines(store: &SnapshotStore, theme: &Theme) -> Vec<Line<'static>> {
    let mut lines = vec![Line::from(Span::styled("Registers", theme.heading))];
    let Some(snapshot) = store.current() else {
        return lines;
    };

    for (register, changed) in snapshot.registers.iter().zip(store.register_diff()) {
        let text = format!("{:>3} {}", register.name, format_value(&register.value));
        let span = if changed { Span::styled(text, theme.emphasis) } else { Span::raw(text) };
        lines.push(Line::from(span));
    }
    lines
}

/// Strip the `0x` prefix and upper-case the digits, keeping whatever
/// zero-padding the server produced.
pub fn format_value(value: &str) -> String {
    let upper = value.to_uppercase();
    match upper.strip_prefix("0X") {
        Some(digits) => digits.to_string(),
        None => upper,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::Snapshot;
    use mdb_common::types::Register;

    fn store_with(registers: Vec<Register>) -> SnapshotStore {
        let mut store = SnapshotStore::new();
        store.push(Snapshot { pc: 0, registers, stack_base: 0, stack: Vec::new() });
        store
    }

    #[test]
    fn value_formatting_strips_prefix_and_uppercases() {
        assert_eq!(format_value("0x4d2"), "4D2");
        // leading zeros beyond the prefix are retained as the server sent them
        assert_eq!(format_value("0x00000000000004d2"), "00000000000004D2");
        assert_eq!(format_value("4d2"), "4D2");
    }

    #[test]
    fn heading_comes_first_and_names_are_right_aligned() {
        let theme = Theme::default();
        let store = store_with(vec![Register::new("PC", "0x10"), Register::new("X10", "0x0")]);
        let lines = build_lines(&store, &theme);

        assert_eq!(lines[0].spans[0].content, "Registers");
        assert_eq!(lines[0].spans[0].style, theme.heading);
        assert_eq!(lines[1].spans[0].content, " PC 10");
        assert_eq!(lines[2].spans[0].content, "X10 0");
    }

    #[test]
    fn changed_register_is_emphasized() {
        let theme = Theme::default();
        let mut store = store_with(vec![Register::new("X0", "0x0"), Register::new("X1", "0x1")]);
        store.push(Snapshot {
            pc: 0,
            registers: vec![Register::new("X0", "0x2a"), Register::new("X1", "0x1")],
            stack_base: 0,
            stack: Vec::new(),
        });

        let lines = build_lines(&store, &theme);
        assert_eq!(lines[1].spans[0].style, theme.emphasis);
        assert_ne!(lines[2].spans[0].style, theme.emphasis);
    }

    #[test]
    fn empty_store_renders_heading_only() {
        let lines = build_lines(&SnapshotStore::new(), &Theme::default());
        assert_eq!(lines.len(), 1);
    }
}
