//! Register file entries

use serde::{Deserialize, Serialize};

/// A named machine register with the server's literal value string.
///
/// The value keeps exactly the formatting the server produced (a
/// `0x`-prefixed hex string, zero-padded to the register width). Clients
/// parse or reformat it; they never normalize it in place. Ordering within
/// a register list is stable across polls for a given server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Register {
    /// Architecture-defined register name (e.g. `PC`, `SP`, `X0`).
    pub name: String,
    /// Literal value string as formatted by the server.
    pub value: String,
}

impl Register {
    /// Convenience constructor, mostly for tests and fixtures.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self { name: name.into(), value: value.into() }
    }
}
