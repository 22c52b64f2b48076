//! Layout reconciliation: rewrites a raw token stream so the parser can
//! treat every block uniformly, regardless of whether the source used
//! brace syntax or a semicolon-terminated statement.
//!
//! A pure rewrite over the token vector -- it never consults the source
//! blob, only token kinds and adjacency.

use crate::token::{Delimiter, Keyword, Operator, Punctuation, Token, TokenKind};

/// Keywords after which the next brace-depth-0 `{` is the block opener.
/// `throw` is kept in this list for fidelity even though no lexeme table
/// maps to a `Keyword::Throw` variant -- it can never actually arrive here
/// as a `Keyword` token, so the entry is inert.
const BODY_INTRODUCING_KEYWORDS: &[&str] = &[
    "if", "else", "while", "for", "case", "default", "fn", "class", "struct",
    "interface", "enum", "union", "try", "catch", "finally", "throw", "thread",
];

fn is_body_introducing(value: &str) -> bool {
    BODY_INTRODUCING_KEYWORDS.contains(&value)
}

/// Runs every layout rewrite rule in sequence and returns the reconciled
/// stream the parser consumes.
pub fn reconcile(tokens: Vec<Token>) -> Vec<Token> {
    let tokens = rewrite_blocks_and_separators(tokens);
    let tokens = restore_for_header_semicolons(tokens);
    let tokens = insert_continuation_newlines(tokens);
    collapse_blank_lines(tokens)
}

/// Rewrites the first `{` after a body-introducing keyword's header to
/// `:` + NEWLINE, its matching `}` to NEWLINE + a synthetic DEDENT marker,
/// and every statement-separator `;` to NEWLINE. Braces unrelated to a
/// pending block header (object/array literals, nested expressions) pass
/// through unchanged.
fn rewrite_blocks_and_separators(tokens: Vec<Token>) -> Vec<Token> {
    let mut out = Vec::with_capacity(tokens.len());
    let mut block_stack: Vec<bool> = Vec::new();
    let mut pending_block = false;
    let mut header_paren_depth: i32 = 0;

    for tok in tokens {
        let kind = tok.kind;
        match kind {
            TokenKind::Keyword(_) if is_body_introducing(&tok.value) => {
                pending_block = true;
                header_paren_depth = 0;
                out.push(tok);
            }
            TokenKind::Punctuation(Punctuation::OpenParen) => {
                if pending_block {
                    header_paren_depth += 1;
                }
                out.push(tok);
            }
            TokenKind::Punctuation(Punctuation::CloseParen) => {
                if pending_block && header_paren_depth > 0 {
                    header_paren_depth -= 1;
                }
                out.push(tok);
            }
            TokenKind::Punctuation(Punctuation::OpenBrace) if pending_block && header_paren_depth == 0 => {
                out.push(Token::new(tok.line, tok.column, tok.offset, ":"));
                out.push(Token::new(tok.line, tok.column, tok.offset, "\n"));
                block_stack.push(true);
                pending_block = false;
            }
            TokenKind::Punctuation(Punctuation::OpenBrace) => {
                block_stack.push(false);
                out.push(tok);
            }
            TokenKind::Punctuation(Punctuation::CloseBrace) => {
                let was_block = block_stack.pop().unwrap_or(false);
                if was_block {
                    out.push(Token::new(tok.line, tok.column, tok.offset, "\n"));
                    out.push(dedent_marker(&tok));
                } else {
                    out.push(tok);
                }
            }
            TokenKind::Punctuation(Punctuation::Semicolon) => {
                out.push(Token::new(tok.line, tok.column, tok.offset, "\n"));
            }
            _ => out.push(tok),
        }
    }
    out
}

fn dedent_marker(brace: &Token) -> Token {
    Token {
        line: brace.line,
        column: brace.column,
        length: 0,
        offset: brace.offset,
        value: "<DEDENT>".to_string(),
        kind: TokenKind::Delimiter(Delimiter::Dedent),
    }
}

/// Inside a `for` header, the NEWLINE tokens the previous pass produced
/// from real `;` separators are reverted back to `;` -- the header keeps
/// its three semicolon-joined clauses, only the body that follows the
/// header's `:` is newline-delimited.
fn restore_for_header_semicolons(mut tokens: Vec<Token>) -> Vec<Token> {
    let mut i = 0;
    while i < tokens.len() {
        if tokens[i].kind == TokenKind::Keyword(Keyword::For) {
            let mut depth = 0i32;
            let mut j = i + 1;
            while j < tokens.len() {
                match tokens[j].kind {
                    TokenKind::Punctuation(Punctuation::OpenParen) => depth += 1,
                    TokenKind::Punctuation(Punctuation::CloseParen) => depth -= 1,
                    TokenKind::Punctuation(Punctuation::Colon) if depth <= 0 => break,
                    _ => {}
                }
                j += 1;
            }
            let end = j.min(tokens.len());
            for tok in &mut tokens[(i + 1)..end] {
                if tok.kind == TokenKind::Delimiter(Delimiter::Newline) {
                    *tok = Token::new(tok.line, tok.column, tok.offset, ";");
                }
            }
            i = end + 1;
        } else {
            i += 1;
        }
    }
    tokens
}

/// A trailing `...` lexes as an adjacent `Range` (`..`) token immediately
/// followed by a `Dot` (`.`) token (no three-dot lexeme exists in the
/// operator table). Per spec §9's continuation sentinel, if that pair is
/// not already followed by a NEWLINE, one is inserted.
fn insert_continuation_newlines(tokens: Vec<Token>) -> Vec<Token> {
    let mut out = Vec::with_capacity(tokens.len());
    let mut i = 0;
    while i < tokens.len() {
        out.push(tokens[i].clone());
        if tokens[i].kind == TokenKind::Operator(Operator::Range) {
            if let Some(dot) = tokens.get(i + 1) {
                let contiguous = dot.offset == tokens[i].offset + tokens[i].length;
                if contiguous && dot.kind == TokenKind::Operator(Operator::Dot) {
                    out.push(dot.clone());
                    let already_newline = tokens
                        .get(i + 2)
                        .map_or(false, |t| t.kind == TokenKind::Delimiter(Delimiter::Newline));
                    if !already_newline {
                        out.push(Token::new(dot.line, dot.column + 1, dot.offset + 1, "\n"));
                    }
                    i += 2;
                    continue;
                }
            }
        }
        i += 1;
    }
    out
}

/// Collapses runs of consecutive NEWLINE tokens (blank lines) to one.
fn collapse_blank_lines(tokens: Vec<Token>) -> Vec<Token> {
    let mut out: Vec<Token> = Vec::with_capacity(tokens.len());
    for tok in tokens {
        let is_newline = tok.kind == TokenKind::Delimiter(Delimiter::Newline);
        if is_newline && out.last().map_or(false, |last| last.kind == TokenKind::Delimiter(Delimiter::Newline)) {
            continue;
        }
        out.push(tok);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(tokens: &[Token]) -> Vec<TokenKind> {
        tokens.iter().map(|t| t.kind).collect()
    }

    fn tok(line: u32, col: u32, offset: u32, value: &str) -> Token {
        Token::new(line, col, offset, value)
    }

    #[test]
    fn if_brace_becomes_colon_newline_and_dedent() {
        // if ( x ) { return x ; }
        let raw = vec![
            tok(1, 1, 0, "if"),
            tok(1, 4, 3, "("),
            tok(1, 5, 4, "x"),
            tok(1, 6, 5, ")"),
            tok(1, 8, 7, "{"),
            tok(1, 10, 9, "return"),
            tok(1, 17, 16, "x"),
            tok(1, 18, 17, ";"),
            tok(1, 20, 19, "}"),
        ];
        let out = rewrite_blocks_and_separators(raw);
        let values: Vec<&str> = out.iter().map(|t| t.value.as_str()).collect();
        assert_eq!(
            values,
            vec!["if", "(", "x", ")", ":", "\n", "return", "x", "\n", "\n", "<DEDENT>"]
        );
        assert_eq!(out.last().unwrap().kind, TokenKind::Delimiter(Delimiter::Dedent));
    }

    #[test]
    fn non_block_brace_is_left_alone() {
        let raw = vec![tok(1, 1, 0, "{"), tok(1, 2, 1, "1"), tok(1, 3, 2, "}")];
        let out = rewrite_blocks_and_separators(raw);
        assert_eq!(kinds(&out), vec![
            TokenKind::Punctuation(Punctuation::OpenBrace),
            TokenKind::Literal(crate::token::LiteralKind::Integer),
            TokenKind::Punctuation(Punctuation::CloseBrace),
        ]);
    }

    #[test]
    fn for_header_semicolons_survive_the_global_rewrite() {
        // for ( i = 0 ; i < 10 ; i ++ ) { }
        let raw = vec![
            tok(1, 1, 0, "for"),
            tok(1, 5, 4, "("),
            tok(1, 6, 5, "i"),
            tok(1, 8, 7, "="),
            tok(1, 10, 9, "0"),
            tok(1, 11, 10, ";"),
            tok(1, 13, 12, "i"),
            tok(1, 15, 14, "<"),
            tok(1, 17, 16, "10"),
            tok(1, 19, 18, ";"),
            tok(1, 21, 20, "i"),
            tok(1, 23, 22, "++"),
            tok(1, 25, 24, ")"),
            tok(1, 27, 26, "{"),
            tok(1, 28, 27, "}"),
        ];
        let out = reconcile(raw);
        let values: Vec<&str> = out.iter().map(|t| t.value.as_str()).collect();
        assert_eq!(
            values,
            vec!["for", "(", "i", "=", "0", ";", "i", "<", "10", ";", "i", "++", ")", ":", "\n", "<DEDENT>"]
        );
    }

    #[test]
    fn blank_lines_collapse_to_one_newline() {
        let raw = vec![
            tok(1, 1, 0, "a"),
            tok(1, 2, 1, "\n"),
            tok(2, 1, 2, "\n"),
            tok(3, 1, 3, "\n"),
            tok(4, 1, 4, "b"),
        ];
        let out = collapse_blank_lines(raw);
        let values: Vec<&str> = out.iter().map(|t| t.value.as_str()).collect();
        assert_eq!(values, vec!["a", "\n", "b"]);
    }

    #[test]
    fn trailing_ellipsis_gets_a_continuation_newline() {
        let raw = vec![tok(1, 1, 0, "a"), tok(1, 2, 1, ".."), tok(1, 4, 3, ".")];
        let out = insert_continuation_newlines(raw);
        let values: Vec<&str> = out.iter().map(|t| t.value.as_str()).collect();
        assert_eq!(values, vec!["a", "..", ".", "\n"]);
    }

    #[test]
    fn ellipsis_already_followed_by_newline_is_untouched() {
        let raw = vec![tok(1, 2, 1, ".."), tok(1, 4, 3, "."), tok(1, 5, 4, "\n")];
        let out = insert_continuation_newlines(raw);
        assert_eq!(out.len(), 3);
    }
}
