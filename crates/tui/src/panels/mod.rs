//! Panel framework and implementations
//!
//! This module contains the panel trait and the three panes: disassembly,
//! registers, and stack.

use crate::snapshot::SnapshotStore;
use crate::ui::Theme;
use mdb_common::types::Instruction;
use ratatui::{layout::Rect, Frame};
use std::fmt::Debug;

/// Panel types for identification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PanelType {
    /// Disassembly window centered on the program counter
    Disassembly,
    /// Register file with change emphasis
    Registers,
    /// Stack window grouped into words
    Stack,
}

/// Data shared by the panes for one render pass.
///
/// Everything here comes from the latest poll; panes hold no state of
/// their own.
pub struct ViewData<'a> {
    /// The two most recent snapshots plus diff marks.
    pub store: &'a SnapshotStore,
    /// Disassembly window from the latest poll.
    pub disasm: &'a [Instruction],
    /// Resolved pane styles.
    pub theme: &'a Theme,
}

/// Trait for UI panels
pub trait Panel: Debug + Send {
    /// Render the panel content
    fn render(&self, frame: &mut Frame<'_>, area: Rect, data: &ViewData<'_>);

    /// Get the panel type
    fn panel_type(&self) -> PanelType;

    /// Get panel title for display
    fn title(&self) -> String {
        format!("{:?}", self.panel_type())
    }
}

// Re-export all panel implementations
pub mod disasm;
pub mod registers;
pub mod stack;

pub use disasm::DisasmPanel;
pub use registers::RegistersPanel;
pub use stack::StackPanel;
