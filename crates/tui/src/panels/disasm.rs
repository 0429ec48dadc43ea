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

//! Disassembly pane
//!
//! Renders the instruction window centered on the program counter. Function
//! boundaries get a blank line and a heading; the at-PC line is emphasized.

use super::{Panel, PanelType, ViewData};
use crate::ui::Theme;
use mdb_common::types::Instruction;
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// Addressable-unit stride used to size the disassembly request window.
pub const ADDRESS_STRIDE: u64 = 4;

/// Request bounds for a window of up to `rows` instructions centered on
/// `pc`: one stride per row, half on each side.
pub fn window_bounds(pc: u64, rows: u16) -> (u64, u64) {
    let reach = ADDRESS_STRIDE * (u64::from(rows) / 2);
    (pc.saturating_sub(reach), pc.saturating_add(reach))
}

/// Disassembly panel implementation
#[derive(Debug, Default)]
pub struct DisasmPanel;

impl Panel for DisasmPanel {
    fn render(&self, frame: &mut Frame<'_>, area: Rect, data: &ViewData<'_>) {
        let lines = build_lines(data.disasm, area.height as usize, data.theme);
        frame.render_widget(Paragraph::new(lines), area);
    }

    fn panel_type(&self) -> PanelType {
        PanelType::Disassembly
    }
}

/// Format the instruction window into at most `rows` lines.
///
/// Function headings are inserted first and the cap applied after, so a
/// heading counts against the same `rows` limit as the instructions. A
/// window that starts on a function boundary opens with a stray blank
/// line, which is dropped.
pub fn build_lines<'a>(instructions: &'a [Instruction], rows: usize, theme: &Theme) -> Vec<Line<'a>> {
    let mut lines: Vec<Line<'a>> = Vec::new();
    let mut prev_function: Option<&str> = None;

    for instruction in instructions {
        if let Some(function) = instruction.function.as_deref() {
            if prev_function != Some(function) {
                lines.push(Line::default());
                lines.push(Line::from(Span::styled(function, theme.heading)));
                prev_function = Some(function);
            }
        }
        lines.push(instruction_line(instruction, theme));
    }

    if lines.first().is_some_and(|line| line.spans.is_empty()) {
        lines.remove(0);
    }
    lines.truncate(rows);
    lines
}

fn instruction_line<'a>(instruction: &'a Instruction, theme: &Theme) -> Line<'a> {
    let text = if instruction.text == "?" { "" } else { instruction.text.as_str() };
    let text = format!("{:<30}", reformat_asm(text));
    let text_span = if instruction.at_pc { Span::styled(text, theme.emphasis) } else { Span::raw(text) };

    Line::from(vec![
        Span::raw(format!("{:016X} ", instruction.address)),
        Span::raw(format!("{:<18} ", format_opcodes(&instruction.bytes))),
        text_span,
    ])
}

/// Hex-encode an instruction's raw bytes, most significant byte first.
pub fn format_opcodes(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 3);
    for byte in bytes.iter().rev() {
        out.push_str(&format!("{byte:02X} "));
    }
    out
}

/// Pad the mnemonic token so operands line up across rows.
pub fn reformat_asm(text: &str) -> String {
    match text.split_once(' ') {
        Some((mnemonic, operands)) => format!("{mnemonic:<6} {operands}"),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn instruction(address: u64, text: &str, function: Option<&str>, at_pc: bool) -> Instruction {
        Instruction {
            address,
            bytes: vec![0xAA, 0xBB],
            text: text.to_string(),
            function: function.map(str::to_string),
            at_pc,
        }
    }

    #[test]
    fn window_bounds_are_centered_on_pc() {
        assert_eq!(window_bounds(0x1000, 20), (0x1000 - 40, 0x1000 + 40));
        // near-zero program counters clamp instead of wrapping
        assert_eq!(window_bounds(8, 20), (0, 48));
    }

    #[test]
    fn output_is_capped_to_rows() {
        let instructions: Vec<Instruction> =
            (0..30).map(|i| instruction(0x1000 + i * 4, "NOP", Some("main.main"), false)).collect();
        let lines = build_lines(&instructions, 20, &Theme::default());
        assert_eq!(lines.len(), 20);
    }

    #[test]
    fn heading_inserted_when_function_changes() {
        let instructions = vec![
            instruction(0x1000, "NOP", Some("main.main"), false),
            instruction(0x1004, "NOP", Some("main.main"), false),
            instruction(0x1008, "NOP", Some("main.callee"), false),
        ];
        let lines = build_lines(&instructions, 40, &Theme::default());

        // leading blank dropped, so: heading, instr, instr, blank, heading, instr
        assert_eq!(lines.len(), 6);
        assert_eq!(lines[0].spans[0].content, "main.main");
        assert!(lines[3].spans.is_empty());
        assert_eq!(lines[4].spans[0].content, "main.callee");
    }

    #[test]
    fn unnamed_instructions_get_no_heading() {
        let instructions = vec![
            instruction(0x1000, "NOP", None, false),
            instruction(0x1004, "NOP", None, false),
        ];
        let lines = build_lines(&instructions, 40, &Theme::default());
        assert_eq!(lines.len(), 2);
    }

    #[test]
    fn unknown_text_renders_empty() {
        let instructions = vec![instruction(0x1000, "?", None, false)];
        let lines = build_lines(&instructions, 40, &Theme::default());
        let rendered: String = lines[0].spans.iter().map(|span| span.content.as_ref()).collect();
        assert!(rendered.trim_end().ends_with("AA")); // opcodes only, no "?"
        assert!(!rendered.contains('?'));
    }

    #[test]
    fn addresses_are_zero_padded_and_opcodes_reversed() {
        assert_eq!(format_opcodes(&[0xAA, 0xBB]), "BB AA ");

        let instructions = vec![instruction(0x1000, "NOP", None, false)];
        let lines = build_lines(&instructions, 40, &Theme::default());
        assert_eq!(lines[0].spans[0].content, "0000000000001000 ");
        assert_eq!(lines[0].spans[1].content, format!("{:<18} ", "BB AA "));
    }

    #[test]
    fn at_pc_line_is_emphasized() {
        let theme = Theme::default();
        let instructions = vec![
            instruction(0x1000, "NOP", None, false),
            instruction(0x1004, "CALL main.f", None, true),
        ];
        let lines = build_lines(&instructions, 40, &theme);
        assert_eq!(lines[1].spans[2].style, theme.emphasis);
        assert_ne!(lines[0].spans[2].style, theme.emphasis);
    }

    #[test]
    fn mnemonic_token_is_padded() {
        assert_eq!(reformat_asm("MOVD 16(R28), R16"), "MOVD   16(R28), R16");
        assert_eq!(reformat_asm("RET"), "RET");
        assert_eq!(reformat_asm(""), "");
    }
}
