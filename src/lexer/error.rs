//! Error taxonomy for the lexing stage.
//!
//! Kept as a plain enum with a manual `Display`, the same shape the source
//! layer's `SourceError` uses, rather than reaching for a derive-macro crate.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LexError {
    UnclosedBlockComment { file_name: String, opened_at_line: u32 },
    UnexpectedByte { file_name: String, line: u32, column: u32, byte: u8 },
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LexError::UnclosedBlockComment { file_name, opened_at_line } => write!(
                f,
                "unclosed block comment in {file_name}, opened at line {opened_at_line}"
            ),
            LexError::UnexpectedByte { file_name, line, column, byte } => write!(
                f,
                "unexpected byte 0x{byte:02x} in {file_name} at {line}:{column}"
            ),
        }
    }
}

impl std::error::Error for LexError {}
