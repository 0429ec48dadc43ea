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

//! Snapshot bookkeeping and diffing
//!
//! Every poll produces a wholesale observation of the register file and a
//! fixed window of stack memory. The store keeps the two most recent
//! observations; the diff marks computed between them drive pane emphasis.

use mdb_common::types::Register;
use std::collections::HashMap;

/// Bytes of stack memory captured per poll, anchored at the stack pointer.
///
/// The window follows the stack pointer; it does not stay fixed in address
/// space. Consecutive windows are therefore diffed by offset, not address.
pub const STACK_WINDOW: usize = 256;

/// Bytes per rendered stack word.
pub const WORD_SIZE: usize = 8;

/// One poll cycle's observation of the debuggee.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    /// Program counter of the scheduled thread at poll time.
    pub pc: u64,
    /// Register file in the server's stable order.
    pub registers: Vec<Register>,
    /// Stack pointer value the stack window was read at.
    pub stack_base: u64,
    /// The stack window itself, in read (address) order.
    pub stack: Vec<u8>,
}

/// One rendered row of the stack pane.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackWord {
    /// Absolute address of the word (stack base + offset).
    pub address: u64,
    /// Bytes in read (address) order; panes display them reversed.
    pub bytes: [u8; WORD_SIZE],
    /// Whether any byte position covered by the previous window differs.
    pub changed: bool,
}

/// The two most recent observations of the debuggee.
///
/// Snapshots are replaced wholesale: a poll installs a fresh `current` and
/// the old one becomes `previous`. Nothing older survives.
#[derive(Debug, Default)]
pub struct SnapshotStore {
    current: Option<Snapshot>,
    previous: Option<Snapshot>,
}

impl SnapshotStore {
    /// Create an empty store; the first poll fills it.
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a freshly fetched snapshot.
    pub fn push(&mut self, snapshot: Snapshot) {
        self.previous = self.current.take();
        self.current = Some(snapshot);
    }

    /// The latest observation, if any poll has completed.
    pub fn current(&self) -> Option<&Snapshot> {
        self.current.as_ref()
    }

    /// The observation before the latest one.
    pub fn previous(&self) -> Option<&Snapshot> {
        self.previous.as_ref()
    }

    /// Changed markers for the current register file, index-aligned with
    /// `current().registers`.
    ///
    /// Registers are matched by name rather than position, so a server that
    /// reorders or filters the set conditionally cannot produce phantom
    /// diffs. With a stable ordering this is exactly positional comparison.
    /// On the first poll nothing is marked.
    pub fn register_diff(&self) -> Vec<bool> {
        let Some(current) = self.current.as_ref() else {
            return Vec::new();
        };

        let previous: HashMap<&str, &str> = self
            .previous
            .iter()
            .flat_map(|snapshot| snapshot.registers.iter())
            .map(|register| (register.name.as_str(), register.value.as_str()))
            .collect();

        current
            .registers
            .iter()
            .map(|register| {
                previous.get(register.name.as_str()).is_some_and(|value| *value != register.value)
            })
            .collect()
    }

    /// The current stack window grouped into words with changed markers.
    pub fn stack_words(&self) -> Vec<StackWord> {
        let Some(current) = self.current.as_ref() else {
            return Vec::new();
        };
        let previous = self.previous.as_ref().map(|s| s.stack.as_slice()).unwrap_or(&[]);
        diff_words(current.stack_base, &current.stack, previous)
    }
}

/// Group a stack window into 8-byte words and mark the ones that differ
/// from the previous window at the same offsets.
///
/// Byte positions the previous window does not cover compare as unchanged,
/// so the first poll and a truncated previous read produce no false
/// positives. Trailing bytes that do not fill a word are dropped.
pub fn diff_words(base: u64, stack: &[u8], previous: &[u8]) -> Vec<StackWord> {
    stack
        .chunks_exact(WORD_SIZE)
        .enumerate()
        .map(|(index, chunk)| {
            let offset = index * WORD_SIZE;
            let mut bytes = [0u8; WORD_SIZE];
            bytes.copy_from_slice(chunk);
            let changed = chunk
                .iter()
                .enumerate()
                .any(|(i, byte)| previous.get(offset + i).is_some_and(|prev| prev != byte));
            StackWord { address: base + offset as u64, bytes, changed }
        })
        .collect()
}
