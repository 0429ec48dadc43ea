//! Execution state reported by the debug server

use serde::{Deserialize, Serialize};

/// State of the debuggee as of its latest stop.
///
/// Produced fresh on every poll; never cached across cycles.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DebuggerState {
    /// The thread the scheduler will run next.
    pub current_thread: ThreadState,
    /// Whether the debuggee has exited; nothing can be inspected anymore.
    #[serde(default)]
    pub exited: bool,
}

/// One logical thread of execution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreadState {
    /// Server-assigned thread id.
    pub id: i64,
    /// Address of the next instruction to execute.
    pub pc: u64,
}
