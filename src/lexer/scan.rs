//! Per-line lexeme scanning: splits one line of source text into tokens by
//! greedy longest-prefix matching, per spec step 3.

use crate::diagnostics::{Diagnostic, DiagnosticSink, Level};
use crate::token::Token;

use super::error::LexError;

/// Longest lexeme across the operator/punctuation tables (`**=`, `===`, `..=`).
const MAX_SYMBOL_LEN: usize = 3;

/// Tokenizes one line (excluding its trailing newline, which the caller
/// appends separately as the line-terminating NEWLINE token).
pub(super) fn scan_line(
    file_name: &str,
    line_no: u32,
    line: &str,
    line_start_offset: u32,
    sink: &DiagnosticSink,
) -> Vec<Token> {
    let chars: Vec<(usize, char)> = line.char_indices().collect();
    let line_len = line.len();
    let mut tokens = Vec::new();
    let mut i = 0usize;

    while i < chars.len() {
        let (byte_pos, c) = chars[i];

        if c == ' ' || c == '\t' {
            i += 1;
            continue;
        }

        if c == '/' && chars.get(i + 1).map(|&(_, n)| n) == Some('/') {
            break;
        }

        if c == '"' || c == '\'' {
            let (end_byte, next_i) = scan_quoted(&chars, i, c, line_len);
            let lexeme = &line[byte_pos..end_byte];
            push(&mut tokens, line_no, byte_pos, line_start_offset, lexeme);
            i = next_i;
            continue;
        }

        if c.is_ascii_alphabetic() || c == '_' {
            let (end_byte, next_i) = scan_run(&chars, i, line_len, |ch| ch == '_' || ch.is_ascii_alphanumeric());
            let lexeme = &line[byte_pos..end_byte];
            push(&mut tokens, line_no, byte_pos, line_start_offset, lexeme);
            i = next_i;
            continue;
        }

        if c.is_ascii_digit() {
            let (end_byte, next_i) = scan_number(&chars, i, line_len);
            let lexeme = &line[byte_pos..end_byte];
            push(&mut tokens, line_no, byte_pos, line_start_offset, lexeme);
            i = next_i;
            continue;
        }

        if let Some(len) = longest_symbol_len(&chars, i, line, line_len) {
            let lexeme = &line[byte_pos..byte_pos + len];
            push(&mut tokens, line_no, byte_pos, line_start_offset, lexeme);
            i += symbol_char_width(&chars, i, len);
            continue;
        }

        let column = (byte_pos + 1) as u32;
        sink.report(Diagnostic::new(
            Level::Err,
            file_name,
            line_no,
            column,
            1,
            LexError::UnexpectedByte {
                file_name: file_name.to_string(),
                line: line_no,
                column,
                byte: line.as_bytes()[byte_pos],
            }
            .to_string(),
        ));
        i += 1;
    }

    tokens
}

fn push(tokens: &mut Vec<Token>, line_no: u32, byte_pos: usize, line_start_offset: u32, lexeme: &str) {
    tokens.push(Token::new(
        line_no,
        (byte_pos + 1) as u32,
        line_start_offset + byte_pos as u32,
        lexeme,
    ));
}

/// Scans a quoted literal starting at `chars[i]` (the opening quote),
/// honoring backslash escapes. Returns the exclusive end byte offset and the
/// `chars` index to resume scanning from. An unterminated literal runs to
/// end of line.
fn scan_quoted(chars: &[(usize, char)], i: usize, quote: char, line_len: usize) -> (usize, usize) {
    let mut j = i + 1;
    while j < chars.len() {
        let (_, cj) = chars[j];
        if cj == '\\' && j + 1 < chars.len() {
            j += 2;
            continue;
        }
        if cj == quote {
            j += 1;
            break;
        }
        j += 1;
    }
    let end_byte = if j < chars.len() { chars[j].0 } else { line_len };
    (end_byte, j)
}

fn scan_run(chars: &[(usize, char)], i: usize, line_len: usize, pred: impl Fn(char) -> bool) -> (usize, usize) {
    let mut j = i;
    while j < chars.len() && pred(chars[j].1) {
        j += 1;
    }
    let end_byte = if j < chars.len() { chars[j].0 } else { line_len };
    (end_byte, j)
}

/// Digits with at most one embedded `.`, the dot only consumed when followed
/// by another digit (so a trailing `.` stays a separate `Dot`/member-access
/// token, e.g. `1.method()`).
fn scan_number(chars: &[(usize, char)], i: usize, line_len: usize) -> (usize, usize) {
    let mut j = i;
    let mut saw_dot = false;
    while j < chars.len() {
        let c = chars[j].1;
        if c.is_ascii_digit() {
            j += 1;
        } else if c == '.' && !saw_dot && chars.get(j + 1).map_or(false, |&(_, n)| n.is_ascii_digit()) {
            saw_dot = true;
            j += 1;
        } else {
            break;
        }
    }
    let end_byte = if j < chars.len() { chars[j].0 } else { line_len };
    (end_byte, j)
}

/// Tries candidate symbol lexemes from `MAX_SYMBOL_LEN` bytes down to 1,
/// returning the byte length of the longest one the operator/punctuation
/// tables recognize.
fn longest_symbol_len(chars: &[(usize, char)], i: usize, line: &str, line_len: usize) -> Option<usize> {
    let max_width = MAX_SYMBOL_LEN.min(chars.len() - i);
    for width in (1..=max_width).rev() {
        let start_byte = chars[i].0;
        let end_byte = if i + width < chars.len() { chars[i + width].0 } else { line_len };
        let candidate = &line[start_byte..end_byte];
        if crate::token::classify_symbol(candidate).is_some() {
            return Some(end_byte - start_byte);
        }
    }
    None
}

/// How many `chars` slots a symbol of `byte_len` bytes spans (symbols are
/// always ASCII so this is just `byte_len`, but kept distinct from the byte
/// length so a future non-ASCII symbol lexeme wouldn't silently desync the
/// two indices).
fn symbol_char_width(_chars: &[(usize, char)], _i: usize, byte_len: usize) -> usize {
    byte_len
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::{LiteralKind, Operator, Punctuation, TokenKind};

    fn scan(line: &str) -> Vec<Token> {
        let sink = DiagnosticSink::default();
        scan_line("t.hlx", 1, line, 0, &sink)
    }

    #[test]
    fn scans_keyword_identifier_and_punctuation() {
        let tokens = scan("let a = 1;");
        let values: Vec<&str> = tokens.iter().map(|t| t.value.as_str()).collect();
        assert_eq!(values, vec!["let", "a", "=", "1", ";"]);
    }

    #[test]
    fn greedy_match_prefers_longest_operator() {
        let tokens = scan("a **= b");
        assert_eq!(tokens[1].kind, TokenKind::Operator(Operator::PowerAssign));
    }

    #[test]
    fn string_literal_spans_to_closing_quote() {
        let tokens = scan(r#"let s = "hi there";"#);
        let lit = &tokens[3];
        assert_eq!(lit.value, "\"hi there\"");
        assert_eq!(lit.kind, TokenKind::Literal(LiteralKind::String));
    }

    #[test]
    fn escaped_quote_does_not_end_the_literal() {
        let tokens = scan(r#""a\"b""#);
        assert_eq!(tokens[0].value, r#""a\"b""#);
    }

    #[test]
    fn line_comment_drops_the_rest_of_the_line() {
        let tokens = scan("let a = 1; // trailing note");
        assert_eq!(tokens.len(), 5);
    }

    #[test]
    fn float_literal_requires_a_trailing_digit() {
        let tokens = scan("1.5 1.method");
        assert_eq!(tokens[0].value, "1.5");
        assert_eq!(tokens[1].value, "1");
        assert_eq!(tokens[2].kind, TokenKind::Operator(Operator::Dot));
        assert_eq!(tokens[3].value, "method");
    }

    #[test]
    fn unknown_byte_is_reported_and_skipped() {
        let sink = DiagnosticSink::default();
        let tokens = scan_line("t.hlx", 1, "a ` b", 0, &sink);
        assert_eq!(sink.len(), 1);
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[1].value, "b");
    }

    #[test]
    fn angle_brackets_classify_as_relational_operators() {
        let tokens = scan("a < b");
        assert_eq!(tokens[1].kind, TokenKind::Operator(Operator::Lt));
        let _ = Punctuation::OpenAngle;
    }
}
