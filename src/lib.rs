//! Frontend core of the Helix compiler.
//!
//! Turns a collection of source files into a typed, validated AST ready for
//! later code-generation stages. The pipeline is:
//!
//! ```text
//! filename -> SourceReader -> LinePreprocessor -> Lexer -> Parser -> AST
//! ```
//!
//! Name resolution, type inference, macro expansion, and optimization are
//! out of scope: this crate produces only a syntactic tree with attached
//! source spans and a diagnostics buffer.

pub mod ast;
pub mod diagnostics;
pub mod lexer;
pub mod parser;
pub mod source;
pub mod token;

mod api;

pub use api::{parse_file, parse_files};
pub use diagnostics::{Diagnostic, DiagnosticSink, Level};
pub use source::{FileCache, SourceReader};
