//! Error taxonomy for the parsing stage, in the same manual-enum shape as
//! [`crate::lexer::LexError`].

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    UnexpectedToken { found: String, expected: &'static str },
    MissingSeparator { expected: &'static str },
    UnterminatedSuite,
    InvalidDeclaration { after: &'static str },
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::UnexpectedToken { found, expected } => {
                write!(f, "unexpected token {found:?}, expected {expected}")
            }
            ParseError::MissingSeparator { expected } => write!(f, "missing {expected}"),
            ParseError::UnterminatedSuite => write!(f, "unterminated block, expected matching dedent"),
            ParseError::InvalidDeclaration { after } => {
                write!(f, "expected a declaration after {after}")
            }
        }
    }
}

impl std::error::Error for ParseError {}
