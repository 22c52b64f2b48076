//! Turns a file's bytes into a fully classified, layout-reconciled
//! [`TokenList`].

mod error;
mod preprocessor;
mod scan;

pub use error::LexError;

use log::debug;

use crate::diagnostics::{Diagnostic, DiagnosticSink, Level};
use crate::source::SourceReader;
use crate::token::{Token, TokenList};

/// Converts `reader`'s contents into a [`TokenList`], reporting lexical
/// errors (unclosed block comments, unrecognized bytes) to `sink` as it
/// goes rather than returning a `Result` -- a malformed file still yields a
/// token list (possibly just `EOF_TOKEN`), per spec step 2's recovery
/// policy, so the parser always has something to walk.
pub fn tokenize(reader: &SourceReader, sink: &DiagnosticSink) -> TokenList {
    let file_name = reader.file_name().to_string();
    let mut raw = Vec::new();
    let mut in_block_comment = false;
    let mut comment_opened_at = 0u32;
    let mut offset = 0u32;

    for line_no in 1..=reader.total_lines() {
        let line = reader.read_line(line_no);
        let trimmed = line.trim_start();

        if in_block_comment {
            if trimmed.starts_with("*/") {
                in_block_comment = false;
            }
            offset += line.len() as u32 + 1;
            continue;
        }

        if trimmed.starts_with("/*") {
            in_block_comment = true;
            comment_opened_at = line_no;
            offset += line.len() as u32 + 1;
            continue;
        }

        let mut line_tokens = scan::scan_line(&file_name, line_no, line, offset, sink);
        let newline_offset = offset + line.len() as u32;
        line_tokens.push(Token::new(line_no, (line.len() + 1) as u32, newline_offset, "\n"));
        raw.extend(line_tokens);
        offset += line.len() as u32 + 1;
    }

    if in_block_comment {
        sink.report(Diagnostic::new(
            Level::Err,
            &file_name,
            comment_opened_at,
            1,
            1,
            LexError::UnclosedBlockComment {
                file_name: file_name.clone(),
                opened_at_line: comment_opened_at,
            }
            .to_string(),
        ));
        let eof_line = reader.total_lines().max(comment_opened_at) + 1;
        return TokenList::new(file_name, vec![Token::eof(eof_line, 1, offset)]);
    }

    debug!("{}: {} raw tokens before layout reconciliation", file_name, raw.len());
    raw.push(Token::eof(reader.total_lines() + 1, 1, offset));
    let reconciled = preprocessor::reconcile(raw);
    TokenList::new(file_name, reconciled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn lex(contents: &str) -> (TokenList, DiagnosticSink) {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        f.flush().unwrap();
        let reader = SourceReader::open(f.path()).unwrap();
        let sink = DiagnosticSink::default();
        let list = tokenize(&reader, &sink);
        (list, sink)
    }

    #[test]
    fn empty_file_yields_only_eof() {
        let (list, sink) = lex("");
        assert_eq!(list.len(), 1);
        assert!(list.tokens()[0].is_eof());
        assert!(sink.is_empty());
    }

    #[test]
    fn single_let_statement_ends_in_eof() {
        let (list, sink) = lex("let a = 1;\n");
        assert!(sink.is_empty());
        assert!(list.tokens().last().unwrap().is_eof());
        let values: Vec<&str> = list.tokens().iter().map(|t| t.value.as_str()).collect();
        assert_eq!(values, vec!["let", "a", "=", "1", "\n", ""]);
    }

    #[test]
    fn unclosed_block_comment_yields_only_eof_and_one_error() {
        let (list, sink) = lex("/* never closes\nlet a = 1;\n");
        assert_eq!(list.len(), 1);
        assert!(list.tokens()[0].is_eof());
        assert_eq!(sink.len(), 1);
        assert!(sink.diagnostics()[0].message.contains("unclosed block comment"));
    }

    #[test]
    fn block_comment_is_dropped_but_surrounding_code_survives() {
        let (list, sink) = lex("let a = 1;\n/* skip\nthis\n*/\nlet b = 2;\n");
        assert!(sink.is_empty());
        let values: Vec<&str> = list.tokens().iter().map(|t| t.value.as_str()).collect();
        assert_eq!(values, vec!["let", "a", "=", "1", "\n", "let", "b", "=", "2", "\n", ""]);
    }

    #[test]
    fn if_else_braces_become_layout_markers() {
        let (list, _sink) = lex("if (x) { return 1; } else { return 0; }\n");
        let values: Vec<&str> = list.tokens().iter().map(|t| t.value.as_str()).collect();
        assert!(values.contains(&":"));
        assert!(!values.contains(&"{"));
        assert!(!values.contains(&"}"));
    }
}
