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

//! Main application state and logic
//!
//! One input event triggers at most one step command and exactly one full
//! poll of the debug server; the poll replaces the current snapshot and the
//! next render draws the diff against the previous one.

use crate::arch;
use crate::layout::LayoutManager;
use crate::panels::{disasm, DisasmPanel, Panel, RegistersPanel, StackPanel, ViewData};
use crate::rpc::{ChannelError, DebugChannel};
use crate::snapshot::{Snapshot, SnapshotStore, STACK_WINDOW};
use crate::stepper::StepCommand;
use crate::ui::Theme;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use mdb_common::types::Instruction;
use ratatui::Frame;
use std::sync::Arc;
use tracing::{debug, info};

/// Response from key event handling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventResponse {
    /// Nothing to run; re-poll and re-render.
    Handled,
    /// Run a step command, then re-poll once it lands.
    Command(StepCommand),
    /// Abandon the in-flight step command, if any.
    StopWaiting,
    /// Request application exit
    Exit,
}

/// Main application state
pub struct App<C> {
    /// Channel to the debug server
    channel: Arc<C>,
    /// Terminal dimensions and pane arrangement
    layout: LayoutManager,
    /// The two most recent snapshots plus diff marks
    store: SnapshotStore,
    /// Disassembly window from the latest poll
    disasm: Vec<Instruction>,
    /// Resolved pane styles
    theme: Theme,
    /// The three panes, left to right
    panels: [Box<dyn Panel>; 3],
}

impl<C: DebugChannel> App<C> {
    /// Create a new application instance
    pub fn new(channel: Arc<C>, layout: LayoutManager, theme: Theme) -> Self {
        Self {
            channel,
            layout,
            store: SnapshotStore::new(),
            disasm: Vec::new(),
            theme,
            panels: [
                Box::new(DisasmPanel),
                Box::new(RegistersPanel),
                Box::new(StackPanel),
            ],
        }
    }

    /// Shared handle to the channel, for spawning step commands.
    pub fn channel(&self) -> Arc<C> {
        Arc::clone(&self.channel)
    }

    /// The snapshot store backing the panes.
    pub fn store(&self) -> &SnapshotStore {
        &self.store
    }

    /// Map a key event to what the loop should do with it.
    pub fn handle_key_event(&self, event: KeyEvent) -> EventResponse {
        if event.kind != KeyEventKind::Press {
            return EventResponse::Handled;
        }
        info!(key = ?event.code, "key event");

        match event.code {
            KeyCode::Char('q') => EventResponse::Exit,
            KeyCode::Char('c') if event.modifiers.contains(KeyModifiers::CONTROL) => {
                EventResponse::Exit
            }
            KeyCode::Esc => EventResponse::StopWaiting,
            KeyCode::Char('s') => EventResponse::Command(StepCommand::OverCall),
            KeyCode::Char('i') => EventResponse::Command(StepCommand::Into),
            KeyCode::Char('o') => EventResponse::Command(StepCommand::Out),
            _ => EventResponse::Handled,
        }
    }

    /// Record the new terminal size; the caller re-polls afterwards.
    pub fn handle_resize(&mut self, width: u16, height: u16) {
        self.layout.update_size(width, height);
    }

    /// One full poll: execution state, registers, stack window, disassembly
    /// window. The freshly fetched snapshot replaces the current one.
    pub async fn poll(&mut self) -> Result<(), ChannelError> {
        let state = self.channel.get_state().await?;
        if state.exited {
            return Err(ChannelError::State("debuggee has exited".to_string()));
        }
        let thread_id = state.current_thread.id;
        let pc = state.current_thread.pc;

        let registers = self.channel.list_registers(thread_id).await?;
        let stack_base = arch::stack_pointer(&registers).ok_or_else(|| {
            ChannelError::Malformed("no parsable stack pointer register".to_string())
        })?;
        let stack = self.channel.read_memory(stack_base, STACK_WINDOW).await?;

        let (low, high) = disasm::window_bounds(pc, self.layout.disasm_rows());
        self.disasm = self.channel.disassemble(thread_id, low, high).await?;

        self.store.push(Snapshot { pc, registers, stack_base, stack });
        debug!(pc, stack_base, "poll complete");
        Ok(())
    }

    /// Render the three panes into the frame.
    pub fn render(&self, frame: &mut Frame<'_>) {
        let areas = self.layout.split(frame.area());
        let data = ViewData { store: &self.store, disasm: &self.disasm, theme: &self.theme };
        for (panel, area) in self.panels.iter().zip(areas) {
            panel.render(frame, area, &data);
        }
    }
}
