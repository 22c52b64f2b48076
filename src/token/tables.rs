//! Lexeme tables and the classification rule.
//!
//! On construction from `(line, column, length, offset, value)` the tables
//! are consulted in declaration order -- keywords, primitives, operators,
//! punctuation, delimiters, literals -- the first one containing `value`
//! fixes both `kind` and `sub_kind`. If none matches, the token is an
//! identifier. This mirrors the "field tree" / sorted-constant lookup
//! idiom used for lexeme tables in recursive-descent parser toolkits, built
//! once behind a [`OnceCell`] rather than re-allocated per call.

use once_cell::sync::OnceCell;
use std::collections::HashMap;

use super::kinds::{Delimiter, Keyword, LiteralKind, Operator, Primitive, Punctuation, TokenKind};

const KEYWORDS: &[(&str, Keyword)] = &[
    ("if", Keyword::If),
    ("else", Keyword::Else),
    ("unless", Keyword::Unless),
    ("macro", Keyword::Macro),
    ("define", Keyword::Define),
    ("fn", Keyword::Function),
    ("op", Keyword::Operator),
    ("inline", Keyword::Inline),
    ("return", Keyword::Return),
    ("enclosing", Keyword::Enclosing),
    ("async", Keyword::Async),
    ("spawn", Keyword::Spawn),
    ("await", Keyword::Await),
    ("thread", Keyword::Thread),
    ("for", Keyword::For),
    ("while", Keyword::While),
    ("break", Keyword::Break),
    ("continue", Keyword::Continue),
    ("case", Keyword::Case),
    ("match", Keyword::Match),
    ("switch", Keyword::Switch),
    ("default", Keyword::Default),
    ("enum", Keyword::Enum),
    ("type", Keyword::Type),
    ("class", Keyword::Class),
    ("union", Keyword::Union),
    ("struct", Keyword::Struct),
    ("abstract", Keyword::Abstract),
    ("interface", Keyword::Interface),
    ("is", Keyword::Is),
    ("try", Keyword::Try),
    ("panic", Keyword::Panic),
    ("catch", Keyword::Catch),
    ("finally", Keyword::Finally),
    ("let", Keyword::Let),
    ("priv", Keyword::Private),
    ("auto", Keyword::Auto),
    ("const", Keyword::Const),
    ("global", Keyword::Global),
    ("from", Keyword::From),
    ("using", Keyword::Using),
    ("import", Keyword::Import),
    ("extern", Keyword::Extern),
    ("yield", Keyword::Yield),
    ("ffi", Keyword::Ffi),
    ("static", Keyword::Static),
    ("eval", Keyword::Eval),
    ("pub", Keyword::Public),
    ("prot", Keyword::Protected),
    ("intl", Keyword::Internal),
];

const PRIMITIVES: &[(&str, Primitive)] = &[
    ("void", Primitive::Void),
    ("bool", Primitive::Bool),
    ("byte", Primitive::Byte),
    ("char", Primitive::Char),
    ("pointer", Primitive::Pointer),
    ("float", Primitive::Float),
    ("int", Primitive::Int),
    ("decimal", Primitive::Decimal),
    ("string", Primitive::String),
    ("list", Primitive::List),
    ("tuple", Primitive::Tuple),
    ("set", Primitive::Set),
    ("map", Primitive::Map),
    ("any", Primitive::Any),
];

// Longer lexemes are listed before their prefixes (`**=` before `**` before
// `*`) so a HashMap lookup on the exact lexeme the tokenizer already
// extracted is unambiguous; the tokenizer itself does the longest-prefix
// scan over raw source bytes (see `lexer::scan_lexeme`).
const OPERATORS: &[(&str, Operator)] = &[
    ("**=", Operator::PowerAssign),
    ("**", Operator::Power),
    ("+-", Operator::Abs),
    ("+=", Operator::AddAssign),
    ("+", Operator::Add),
    ("-=", Operator::SubAssign),
    ("->", Operator::Arrow),
    ("-", Operator::Sub),
    ("*=", Operator::MulAssign),
    ("*", Operator::Mul),
    ("/=", Operator::DivAssign),
    ("/", Operator::Div),
    ("%=", Operator::ModAssign),
    ("%", Operator::Mod),
    ("@=", Operator::MatAssign),
    ("@", Operator::MatMul),
    ("~&", Operator::BitNand),
    ("~|", Operator::BitNor),
    ("~=", Operator::NotAssign),
    ("~", Operator::BitNot),
    ("&&", Operator::And),
    ("&", Operator::BitAnd),
    ("||", Operator::Or),
    ("|", Operator::BitOr),
    ("^^", Operator::Xor),
    ("^", Operator::BitXor),
    ("<<", Operator::Shl),
    (">>", Operator::Shr),
    ("===", Operator::RefEq),
    ("==", Operator::Eq),
    ("!=", Operator::Ne),
    ("!&", Operator::Nand),
    ("!|", Operator::Nor),
    ("!!", Operator::Not),
    (">=", Operator::Ge),
    (">", Operator::Gt),
    ("<=", Operator::Le),
    ("<", Operator::Lt),
    ("=", Operator::Assign),
    ("++", Operator::Inc),
    ("--", Operator::Dec),
    ("..=", Operator::RangeInclusive),
    ("..", Operator::Range),
    (".", Operator::Dot),
    ("::", Operator::Scope),
];

const PUNCTUATION: &[(&str, Punctuation)] = &[
    ("(", Punctuation::OpenParen),
    (")", Punctuation::CloseParen),
    ("{", Punctuation::OpenBrace),
    ("}", Punctuation::CloseBrace),
    ("[", Punctuation::OpenBracket),
    ("]", Punctuation::CloseBracket),
    (",", Punctuation::Comma),
    (";", Punctuation::Semicolon),
    (":", Punctuation::Colon),
    ("?", Punctuation::Question),
    ("\"", Punctuation::StringQuote),
    ("'", Punctuation::CharQuote),
    ("//", Punctuation::LineComment),
    ("/*", Punctuation::BlockComment),
];

const DELIMITERS: &[(&str, Delimiter)] = &[
    (" ", Delimiter::Space),
    ("\t", Delimiter::Tab),
    ("\n", Delimiter::Newline),
];

fn keyword_table() -> &'static HashMap<&'static str, Keyword> {
    static TABLE: OnceCell<HashMap<&'static str, Keyword>> = OnceCell::new();
    TABLE.get_or_init(|| KEYWORDS.iter().copied().collect())
}

fn primitive_table() -> &'static HashMap<&'static str, Primitive> {
    static TABLE: OnceCell<HashMap<&'static str, Primitive>> = OnceCell::new();
    TABLE.get_or_init(|| PRIMITIVES.iter().copied().collect())
}

fn operator_table() -> &'static HashMap<&'static str, Operator> {
    static TABLE: OnceCell<HashMap<&'static str, Operator>> = OnceCell::new();
    TABLE.get_or_init(|| OPERATORS.iter().copied().collect())
}

fn punctuation_table() -> &'static HashMap<&'static str, Punctuation> {
    static TABLE: OnceCell<HashMap<&'static str, Punctuation>> = OnceCell::new();
    TABLE.get_or_init(|| PUNCTUATION.iter().copied().collect())
}

fn delimiter_table() -> &'static HashMap<&'static str, Delimiter> {
    static TABLE: OnceCell<HashMap<&'static str, Delimiter>> = OnceCell::new();
    TABLE.get_or_init(|| DELIMITERS.iter().copied().collect())
}

/// Classifies a single already-extracted lexeme. Tables are tried in the
/// order the spec fixes: keywords, primitives, operators, punctuation,
/// delimiters, then literal shape; an unmatched lexeme is an identifier.
pub fn classify(value: &str) -> TokenKind {
    if let Some(kw) = keyword_table().get(value) {
        return TokenKind::Keyword(*kw);
    }
    if let Some(prim) = primitive_table().get(value) {
        return TokenKind::Primitive(*prim);
    }
    if let Some(op) = operator_table().get(value) {
        return TokenKind::Operator(*op);
    }
    if let Some(punct) = punctuation_table().get(value) {
        return TokenKind::Punctuation(*punct);
    }
    if let Some(delim) = delimiter_table().get(value) {
        return TokenKind::Delimiter(*delim);
    }
    if let Some(lit) = classify_literal_shape(value) {
        return TokenKind::Literal(lit);
    }
    TokenKind::Identifier
}

/// Checks only the operator and punctuation tables, skipping the
/// keyword/primitive/delimiter/identifier fallback chain `classify` runs.
/// Used by the lexer's greedy longest-prefix symbol scan, which must know
/// whether a candidate substring is a recognized symbol lexeme and nothing
/// else -- `classify`'s identifier fallback would make every substring
/// "match" something.
pub fn classify_symbol(value: &str) -> Option<TokenKind> {
    if let Some(op) = operator_table().get(value) {
        return Some(TokenKind::Operator(*op));
    }
    if let Some(punct) = punctuation_table().get(value) {
        return Some(TokenKind::Punctuation(*punct));
    }
    None
}

/// Classifies a lexeme by shape: integer / float / string / char /
/// bool-true / bool-false / null.
pub fn classify_literal_shape(value: &str) -> Option<LiteralKind> {
    match value {
        "true" => return Some(LiteralKind::True),
        "false" => return Some(LiteralKind::False),
        "null" => return Some(LiteralKind::Null),
        _ => {}
    }

    if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') {
        return Some(LiteralKind::String);
    }
    if value.len() >= 2 && value.starts_with('\'') && value.ends_with('\'') {
        return Some(LiteralKind::Char);
    }

    let mut chars = value.chars().peekable();
    let mut saw_digit = false;
    let mut saw_dot = false;
    while let Some(c) = chars.next() {
        if c.is_ascii_digit() {
            saw_digit = true;
        } else if c == '.' && !saw_dot {
            saw_dot = true;
        } else {
            return None;
        }
    }
    if !saw_digit {
        return None;
    }
    Some(if saw_dot { LiteralKind::Float } else { LiteralKind::Integer })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifier_partitions_every_lexeme() {
        for (lexeme, _) in KEYWORDS {
            assert!(matches!(classify(lexeme), TokenKind::Keyword(_)), "{lexeme}");
        }
        for (lexeme, _) in PRIMITIVES {
            assert!(matches!(classify(lexeme), TokenKind::Primitive(_)), "{lexeme}");
        }
        for (lexeme, _) in OPERATORS {
            let kind = classify(lexeme);
            assert!(
                matches!(kind, TokenKind::Operator(_)),
                "{lexeme} classified as {kind:?}"
            );
        }
    }

    #[test]
    fn identifier_is_the_fallback() {
        assert_eq!(classify("frobnicate"), TokenKind::Identifier);
    }

    #[test]
    fn literal_shapes() {
        assert_eq!(classify("42"), TokenKind::Literal(LiteralKind::Integer));
        assert_eq!(classify("4.2"), TokenKind::Literal(LiteralKind::Float));
        assert_eq!(classify("\"hi\""), TokenKind::Literal(LiteralKind::String));
        assert_eq!(classify("'a'"), TokenKind::Literal(LiteralKind::Char));
        assert_eq!(classify("true"), TokenKind::Literal(LiteralKind::True));
        assert_eq!(classify("false"), TokenKind::Literal(LiteralKind::False));
        assert_eq!(classify("null"), TokenKind::Literal(LiteralKind::Null));
    }

    #[test]
    fn angle_brackets_classify_as_operators_not_punctuation() {
        assert_eq!(classify("<"), TokenKind::Operator(Operator::Lt));
        assert_eq!(classify(">"), TokenKind::Operator(Operator::Gt));
    }

    #[test]
    fn classify_symbol_ignores_identifier_fallback() {
        assert_eq!(classify_symbol("+="), Some(TokenKind::Operator(Operator::AddAssign)));
        assert_eq!(classify_symbol("frobnicate"), None);
        assert_eq!(classify_symbol("..."), None);
    }
}
