//! Disassembled instructions

use serde::{Deserialize, Serialize};

/// One decoded instruction within a disassembly window.
///
/// Windows are recomputed from scratch on every poll; nothing here is
/// cached or incrementally updated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Instruction {
    /// Address of the first byte of the encoding.
    pub address: u64,
    /// Raw encoding in memory (read) order; a hex string on the wire.
    #[serde(with = "hex::serde")]
    pub bytes: Vec<u8>,
    /// Disassembly text; the server reports `"?"` when it could not decode.
    pub text: String,
    /// Name of the enclosing function, when the server knows it.
    #[serde(default)]
    pub function: Option<String>,
    /// Whether this instruction sits at the thread's program counter.
    #[serde(default)]
    pub at_pc: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_instruction_with_hex_bytes() {
        let instruction: Instruction = serde_json::from_str(
            r#"{"address":4198432,"bytes":"e8c3ffffff","text":"CALL main.callee","function":"main.main","atPc":true}"#,
        )
        .unwrap();
        assert_eq!(instruction.address, 0x0040_1020);
        assert_eq!(instruction.bytes, vec![0xe8, 0xc3, 0xff, 0xff, 0xff]);
        assert_eq!(instruction.function.as_deref(), Some("main.main"));
        assert!(instruction.at_pc);
    }

    #[test]
    fn missing_optional_fields_default() {
        let instruction: Instruction =
            serde_json::from_str(r#"{"address":16,"bytes":"90","text":"?"}"#).unwrap();
        assert_eq!(instruction.function, None);
        assert!(!instruction.at_pc);
    }
}
