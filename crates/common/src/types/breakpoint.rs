//! Breakpoints installed on the server

use serde::{Deserialize, Serialize};

/// A breakpoint at a function's entry, as reported by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Breakpoint {
    /// Server-assigned breakpoint id.
    #[serde(default)]
    pub id: i64,
    /// Function whose entry the breakpoint covers.
    pub function_name: String,
    /// Resolved address, once the server has installed it.
    #[serde(default)]
    pub addr: u64,
}
