//! Architecture-specific tables
//!
//! The debug server reports register names and disassembly text but no
//! structured instruction classification, so call detection and
//! stack-pointer location rely on small per-architecture name tables.

use mdb_common::types::Register;

/// Mnemonic tokens that transfer control into a callee.
///
/// `CALL` covers x86 and Go-assembly flavoured output; `BL`/`BLR` cover
/// native AArch64 output.
pub const CALL_MNEMONICS: &[&str] = &["CALL", "BL", "BLR"];

/// Names the stack pointer goes by across supported targets.
pub const STACK_POINTER_NAMES: &[&str] = &["SP", "RSP", "ESP"];

/// Whether the disassembly text begins with a call mnemonic.
pub fn is_call(text: &str) -> bool {
    let token = text.split_whitespace().next().unwrap_or("");
    CALL_MNEMONICS.iter().any(|mnemonic| token.eq_ignore_ascii_case(mnemonic))
}

/// Locate the stack pointer in a register file and parse its value.
pub fn stack_pointer(registers: &[Register]) -> Option<u64> {
    registers
        .iter()
        .find(|register| {
            STACK_POINTER_NAMES.iter().any(|name| register.name.eq_ignore_ascii_case(name))
        })
        .and_then(|register| parse_value(&register.value))
}

/// Parse a server register value (a `0x`-prefixed hex string) into an
/// address.
pub fn parse_value(value: &str) -> Option<u64> {
    let digits = value.trim_start_matches("0x").trim_start_matches("0X");
    u64::from_str_radix(digits, 16).ok()
}
