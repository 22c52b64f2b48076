//! Recursive-descent parser over a reconciled [`TokenList`], producing a
//! [`Program`]. Declarations are parsed top-down; [`expr`] hosts the
//! Pratt-style expression sub-parser.

mod error;
mod expr;

pub use error::ParseError;

use std::sync::atomic::{AtomicBool, Ordering};

use crate::ast::*;
use crate::diagnostics::{Diagnostic, DiagnosticSink, Level};
use crate::token::{Cursor, Delimiter, Keyword, Operator, Punctuation, Token, TokenKind, TokenList};

/// Parses a fully lexed, layout-reconciled file into a [`Program`], reporting
/// parse errors to `sink` and recovering rather than aborting where §4.4
/// describes recovery. `cancelled`, when set, is checked at the start of
/// every top-level declaration; on cancellation the parser discards its
/// partial output and returns an empty `Program`.
pub fn parse(tokens: &TokenList, sink: &DiagnosticSink, cancelled: Option<&AtomicBool>) -> Program {
    let mut parser = Parser {
        cursor: tokens.cursor(),
        file_name: tokens.file_name().to_string(),
        sink,
        last_end: 0,
        cancelled,
    };
    parser.parse_program()
}

struct Parser<'a> {
    cursor: Cursor<'a>,
    file_name: String,
    sink: &'a DiagnosticSink,
    last_end: u32,
    cancelled: Option<&'a AtomicBool>,
}

impl<'a> Parser<'a> {
    fn current(&self) -> &Token {
        self.cursor.current()
    }

    fn kind(&self) -> TokenKind {
        self.current().kind
    }

    fn at_eof(&self) -> bool {
        self.cursor.at_eof()
    }

    fn bump(&mut self) -> Token {
        let tok = self.cursor.advance().clone();
        self.last_end = tok.offset + tok.length;
        tok
    }

    fn span_from(&self, start_offset: u32) -> Span {
        Span::new(start_offset, self.last_end.max(start_offset))
    }

    fn check_kw(&self, kw: Keyword) -> bool {
        self.kind() == TokenKind::Keyword(kw)
    }

    fn check_punct(&self, p: Punctuation) -> bool {
        self.kind() == TokenKind::Punctuation(p)
    }

    fn check_op(&self, op: Operator) -> bool {
        self.kind() == TokenKind::Operator(op)
    }

    fn check_newline(&self) -> bool {
        self.kind() == TokenKind::Delimiter(Delimiter::Newline)
    }

    fn check_dedent(&self) -> bool {
        self.kind() == TokenKind::Delimiter(Delimiter::Dedent)
    }

    fn skip_newlines(&mut self) {
        while self.check_newline() {
            self.bump();
        }
    }

    fn eat_kw(&mut self, kw: Keyword) -> bool {
        if self.check_kw(kw) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn eat_punct(&mut self, p: Punctuation) -> bool {
        if self.check_punct(p) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn error(&self, err: ParseError) {
        let t = self.current();
        self.sink.report(Diagnostic::new(
            Level::Err,
            &self.file_name,
            t.line,
            t.column,
            t.length.max(1),
            err.to_string(),
        ));
    }

    fn expect_punct(&mut self, p: Punctuation, expected: &'static str) -> bool {
        if self.eat_punct(p) {
            true
        } else {
            self.error(ParseError::UnexpectedToken { found: self.current().value.clone(), expected });
            false
        }
    }

    /// Consumes an identifier token and returns its text, or reports an error
    /// and returns `None` without consuming anything.
    fn expect_ident(&mut self) -> Option<(String, Token)> {
        if self.kind() == TokenKind::Identifier && !self.current().is_eof() {
            let t = self.bump();
            Some((t.value.clone(), t))
        } else {
            self.error(ParseError::UnexpectedToken { found: self.current().value.clone(), expected: "identifier" });
            None
        }
    }

    /// Statement-level error recovery (spec §4.4): discard tokens up to the
    /// next NEWLINE or DEDENT and continue.
    fn recover_to_statement_boundary(&mut self) {
        while !self.at_eof() && !self.check_newline() && !self.check_dedent() {
            self.bump();
        }
        if self.check_newline() {
            self.bump();
        }
    }

    /// Resyncs to the next top-level keyword, used when a `RequiresDecl`
    /// fails and aborts its enclosing declaration (spec §4.4).
    fn recover_to_top_level(&mut self) {
        while !self.at_eof() {
            if matches!(
                self.kind(),
                TokenKind::Keyword(
                    Keyword::Ffi
                        | Keyword::Function
                        | Keyword::Struct
                        | Keyword::Class
                        | Keyword::Interface
                        | Keyword::Enum
                        | Keyword::Union
                        | Keyword::Type
                        | Keyword::Const
                        | Keyword::Let
                        | Keyword::Operator
                )
            ) {
                return;
            }
            self.bump();
        }
    }

    fn is_cancelled(&self) -> bool {
        self.cancelled.map_or(false, |flag| flag.load(Ordering::Relaxed))
    }

    fn parse_program(&mut self) -> Program {
        let start = self.current().offset;
        self.skip_newlines();
        let mut body = Vec::new();

        while !self.at_eof() {
            if self.is_cancelled() || self.sink.is_fatal() {
                return Program { span: Span::point(start), file_name: self.file_name.clone(), comment: None, body: Vec::new() };
            }
            if let Some(node) = self.parse_top_level_decl() {
                body.push(node);
            }
            self.skip_newlines();
        }

        Program { span: self.span_from(start), file_name: self.file_name.clone(), comment: None, body }
    }

    fn parse_top_level_decl(&mut self) -> Option<Node> {
        if self.check_kw(Keyword::Ffi) {
            return self.parse_ffi_decl();
        }

        let mut is_const = false;
        let mut vis = AccessSpecifier::Public;
        let mut specifiers = Vec::new();
        let mut consumed_modifier = false;

        loop {
            match self.kind() {
                TokenKind::Keyword(Keyword::Const) => {
                    is_const = true;
                    consumed_modifier = true;
                    self.bump();
                }
                TokenKind::Keyword(Keyword::Public) => {
                    vis = AccessSpecifier::Public;
                    consumed_modifier = true;
                    self.bump();
                }
                TokenKind::Keyword(Keyword::Protected) => {
                    vis = AccessSpecifier::Protected;
                    consumed_modifier = true;
                    self.bump();
                }
                TokenKind::Keyword(Keyword::Internal) => {
                    vis = AccessSpecifier::Internal;
                    consumed_modifier = true;
                    self.bump();
                }
                TokenKind::Keyword(Keyword::Private) => {
                    vis = AccessSpecifier::Private;
                    consumed_modifier = true;
                    self.bump();
                }
                TokenKind::Keyword(Keyword::Inline) => {
                    specifiers.push(FunctionSpecifier::Inline);
                    consumed_modifier = true;
                    self.bump();
                }
                TokenKind::Keyword(Keyword::Async) => {
                    specifiers.push(FunctionSpecifier::Async);
                    consumed_modifier = true;
                    self.bump();
                }
                TokenKind::Keyword(Keyword::Static) => {
                    specifiers.push(FunctionSpecifier::Static);
                    consumed_modifier = true;
                    self.bump();
                }
                TokenKind::Keyword(Keyword::Eval) => {
                    specifiers.push(FunctionSpecifier::Eval);
                    consumed_modifier = true;
                    self.bump();
                }
                _ => break,
            }
        }

        match self.kind() {
            TokenKind::Keyword(Keyword::Struct) => return self.parse_udt_decl(UdtKeyword::Struct, is_const, vis),
            TokenKind::Keyword(Keyword::Class) => return self.parse_udt_decl(UdtKeyword::Class, is_const, vis),
            TokenKind::Keyword(Keyword::Interface) => return self.parse_udt_decl(UdtKeyword::Interface, is_const, vis),
            TokenKind::Keyword(Keyword::Enum) => return self.parse_enum_decl(vis),
            TokenKind::Keyword(Keyword::Union) => return self.parse_union_decl(vis),
            TokenKind::Keyword(Keyword::Type) => return self.parse_type_decl(vis),
            TokenKind::Keyword(Keyword::Function) => return self.parse_func_decl(specifiers),
            TokenKind::Keyword(Keyword::Operator) => return self.parse_op_decl(),
            TokenKind::Keyword(Keyword::Let) => return self.parse_let_decl(),
            TokenKind::Identifier if is_const => return self.parse_const_decl(vis),
            _ => {}
        }

        if consumed_modifier {
            self.error(ParseError::InvalidDeclaration { after: "modifier" });
            self.recover_to_statement_boundary();
            return None;
        }

        self.parse_statement()
    }

    fn parse_ffi_decl(&mut self) -> Option<Node> {
        let start = self.current().offset;
        self.bump(); // 'ffi'
        let specifier = match self.kind() {
            TokenKind::Keyword(Keyword::Class) => {
                self.bump();
                FFISpecifier::Class
            }
            TokenKind::Keyword(Keyword::Interface) => {
                self.bump();
                FFISpecifier::Interface
            }
            TokenKind::Keyword(Keyword::Struct) => {
                self.bump();
                FFISpecifier::Struct
            }
            TokenKind::Keyword(Keyword::Enum) => {
                self.bump();
                FFISpecifier::Enum
            }
            TokenKind::Keyword(Keyword::Union) => {
                self.bump();
                FFISpecifier::Union
            }
            TokenKind::Keyword(Keyword::Type) => {
                self.bump();
                FFISpecifier::Type
            }
            _ => {
                self.error(ParseError::UnexpectedToken {
                    found: self.current().value.clone(),
                    expected: "class, interface, struct, enum, union, or type",
                });
                self.recover_to_statement_boundary();
                return None;
            }
        };
        let (name, _) = self.expect_ident()?;
        let body = if self.check_punct(Punctuation::Colon) || self.check_punct(Punctuation::OpenBrace) {
            Some(self.parse_suite())
        } else {
            None
        };
        Some(FFIDecl { span: self.span_from(start), specifier, name, body }.into())
    }

    fn parse_udt_decl(&mut self, keyword: UdtKeyword, is_const: bool, vis: AccessSpecifier) -> Option<Node> {
        let start = self.current().offset;
        self.bump();
        let (name, _) = self.expect_ident()?;
        let derives = if self.ident_is("derives") {
            self.bump();
            Some(self.parse_derive_list())
        } else {
            None
        };
        let requires = self.parse_optional_requires_decl();
        let body = self.parse_udt_body();
        let span = self.span_from(start);
        Some(match keyword {
            UdtKeyword::Struct => StructDecl { span, is_const, vis, name, derives, requires, body }.into(),
            UdtKeyword::Class => ClassDecl { span, is_const, vis, name, derives, requires, body }.into(),
            UdtKeyword::Interface => InterDecl { span, vis, name, derives, requires, body }.into(),
        })
    }

    /// `derives` is a soft keyword (lexed as a plain identifier); recognized
    /// contextually rather than added to the keyword table.
    fn ident_is(&self, text: &str) -> bool {
        self.kind() == TokenKind::Identifier && self.current().value == text
    }

    fn parse_derive_list(&mut self) -> Vec<DeriveEntry> {
        let mut entries = Vec::new();
        loop {
            let vis = match self.kind() {
                TokenKind::Keyword(Keyword::Public) => {
                    self.bump();
                    Some(AccessSpecifier::Public)
                }
                TokenKind::Keyword(Keyword::Protected) => {
                    self.bump();
                    Some(AccessSpecifier::Protected)
                }
                TokenKind::Keyword(Keyword::Private) => {
                    self.bump();
                    Some(AccessSpecifier::Private)
                }
                TokenKind::Keyword(Keyword::Internal) => {
                    self.bump();
                    Some(AccessSpecifier::Internal)
                }
                _ => None,
            };
            let Some(ty) = self.parse_type() else { break };
            entries.push(DeriveEntry { vis, ty });
            if !self.eat_punct(Punctuation::Comma) {
                break;
            }
        }
        entries
    }

    fn parse_optional_requires_decl(&mut self) -> Option<Node> {
        if !self.ident_is("requires") {
            return None;
        }
        let start = self.current().offset;
        self.bump();
        if !self.eat_op(Operator::Lt) {
            self.error(ParseError::UnexpectedToken { found: self.current().value.clone(), expected: "<" });
            self.recover_to_top_level();
            return None;
        }
        let mut params = Vec::new();
        loop {
            if self.check_op(Operator::Gt) {
                break;
            }
            let is_const = self.eat_kw(Keyword::Const);
            let Some((name, _)) = self.expect_ident() else {
                self.recover_to_top_level();
                return None;
            };
            let ty = if self.eat_punct(Punctuation::Colon) { self.parse_type() } else { None };
            let default = if self.check_op(Operator::Assign) {
                self.bump();
                self.parse_type()
            } else {
                None
            };
            params.push(RequiresParamDecl { is_const, name, ty, default });
            if !self.eat_punct(Punctuation::Comma) {
                break;
            }
        }
        if !self.eat_op(Operator::Gt) {
            self.error(ParseError::UnexpectedToken { found: self.current().value.clone(), expected: ">" });
            self.recover_to_top_level();
            return None;
        }

        let mut bounds = Vec::new();
        while self.check_kw(Keyword::Is) {
            self.bump();
            if let Some(ty) = self.parse_type() {
                bounds.push(TypeBoundDecl { instance_of: ty });
            }
            if !self.eat_punct(Punctuation::Comma) {
                break;
            }
        }

        Some(RequiresDecl { span: self.span_from(start), params, bounds }.into())
    }

    fn eat_op(&mut self, op: Operator) -> bool {
        if self.check_op(op) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn parse_enum_decl(&mut self, vis: AccessSpecifier) -> Option<Node> {
        let start = self.current().offset;
        self.bump();
        let (name, _) = self.expect_ident()?;
        let derives = if self.ident_is("derives") {
            self.bump();
            self.parse_type()
        } else {
            None
        };
        let body = self.parse_udt_body();
        Some(EnumDecl { span: self.span_from(start), vis, derives, name, body }.into())
    }

    fn parse_union_decl(&mut self, vis: AccessSpecifier) -> Option<Node> {
        let start = self.current().offset;
        self.bump();
        let (name, _) = self.expect_ident()?;
        let body = self.parse_udt_body();
        Some(UnionDecl { span: self.span_from(start), vis, name, body }.into())
    }

    fn parse_type_decl(&mut self, vis: AccessSpecifier) -> Option<Node> {
        let start = self.current().offset;
        self.bump();
        let (name, _) = self.expect_ident()?;
        let requires = self.parse_optional_requires_decl();
        if !self.eat_op(Operator::Assign) {
            self.error(ParseError::MissingSeparator { expected: "'='" });
            self.recover_to_statement_boundary();
            return None;
        }
        let value = self.parse_type()?;
        self.consume_statement_terminator();
        Some(TypeDecl { span: self.span_from(start), vis, name, requires, value }.into())
    }

    fn parse_const_decl(&mut self, vis: AccessSpecifier) -> Option<Node> {
        let start = self.current().offset;
        let (name, _) = self.expect_ident()?;
        let ty = if self.eat_punct(Punctuation::Colon) { self.parse_type() } else { None };
        let value = if self.eat_op(Operator::Assign) { Some(self.parse_expr()) } else { None };
        self.consume_statement_terminator();
        Some(ConstDecl { span: self.span_from(start), vis, name, ty, value }.into())
    }

    fn parse_let_decl(&mut self) -> Option<Node> {
        let start = self.current().offset;
        self.bump(); // 'let'
        let (name, _) = self.expect_ident()?;
        let ty = if self.eat_punct(Punctuation::Colon) { self.parse_type() } else { None };
        let value = if self.eat_op(Operator::Assign) { Some(self.parse_expr()) } else { None };
        self.consume_statement_terminator();
        Some(LetDecl { span: self.span_from(start), name, ty, value }.into())
    }

    fn parse_op_decl(&mut self) -> Option<Node> {
        let start = self.current().offset;
        self.bump(); // 'op'
        let operator = match self.kind() {
            TokenKind::Operator(op) => {
                self.bump();
                op
            }
            _ => {
                self.error(ParseError::UnexpectedToken { found: self.current().value.clone(), expected: "an operator" });
                self.recover_to_statement_boundary();
                return None;
            }
        };
        if !self.expect_punct(Punctuation::OpenParen, "(") {
            self.recover_to_statement_boundary();
            return None;
        }
        let params = self.parse_var_decl_list(Punctuation::CloseParen);
        self.expect_punct(Punctuation::CloseParen, ")");
        let return_type = if self.eat_op(Operator::Arrow) { self.parse_type() } else { None };
        let body = self.parse_suite();
        Some(OpDecl { span: self.span_from(start), operator, params, return_type, body }.into())
    }

    fn parse_func_decl(&mut self, specifiers: Vec<FunctionSpecifier>) -> Option<Node> {
        let start = self.current().offset;
        self.bump(); // 'fn'
        let (name, _) = self.parse_path_name()?;
        if !self.expect_punct(Punctuation::OpenParen, "(") {
            self.recover_to_statement_boundary();
            return None;
        }
        let params = self.parse_var_decl_list(Punctuation::CloseParen);
        self.expect_punct(Punctuation::CloseParen, ")");
        let return_type = if self.eat_op(Operator::Arrow) { self.parse_type() } else { None };
        let requires = self.parse_optional_requires_decl();
        let body = self.parse_suite();
        Some(FuncDecl { span: self.span_from(start), specifiers, name, params, return_type, requires, body }.into())
    }

    /// `PathExpr` for a function name: `foo` or `foo::bar`, flattened to a
    /// single dotted string (scope-qualified free functions are rare in
    /// practice; the AST keeps the full path as `PathAccess` only when used
    /// as an expression, not as a declaration name).
    fn parse_path_name(&mut self) -> Option<(String, Span)> {
        let start = self.current().offset;
        let (mut name, _) = self.expect_ident()?;
        while self.check_op(Operator::Scope) {
            self.bump();
            let (seg, _) = self.expect_ident()?;
            name.push_str("::");
            name.push_str(&seg);
        }
        Some((name, self.span_from(start)))
    }

    fn parse_var_decl_list(&mut self, terminator: Punctuation) -> Vec<VarDecl> {
        let mut params = Vec::new();
        if self.check_punct(terminator) {
            return params;
        }
        loop {
            if self.check_punct(terminator) {
                break;
            }
            let start = self.current().offset;
            let Some((name, _)) = self.expect_ident() else { break };
            let ty = if self.eat_punct(Punctuation::Colon) { self.parse_type() } else { None };
            let value = if self.eat_op(Operator::Assign) { Some(self.parse_expr()) } else { None };
            params.push(VarDecl { span: self.span_from(start), name, ty, value });
            if !self.eat_punct(Punctuation::Comma) {
                break;
            }
        }
        params
    }

    fn parse_type(&mut self) -> Option<TypeExpr> {
        if self.check_op(Operator::Mul) {
            self.bump();
            let inner = self.parse_type()?;
            return Some(TypeExpr::Pointer(Box::new(inner)));
        }
        if let TokenKind::Primitive(p) = self.kind() {
            self.bump();
            return Some(TypeExpr::Primitive(p));
        }
        let (name, _) = self.expect_ident()?;
        if self.check_op(Operator::Lt) {
            let checkpoint = self.cursor.position();
            self.bump();
            let mut args = Vec::new();
            let mut ok = true;
            loop {
                match self.parse_type() {
                    Some(t) => args.push(t),
                    None => {
                        ok = false;
                        break;
                    }
                }
                if !self.eat_punct(Punctuation::Comma) {
                    break;
                }
            }
            if ok && self.check_op(Operator::Gt) {
                self.bump();
                return Some(TypeExpr::Generic { base: name, args });
            }
            self.cursor.rewind_to(checkpoint);
        }
        Some(TypeExpr::Named(name))
    }

    fn parse_suite(&mut self) -> Node {
        let start = self.current().offset;
        if self.eat_punct(Punctuation::Colon) {
            self.skip_newlines();
            let mut statements = Vec::new();
            while !self.check_dedent() && !self.at_eof() {
                if let Some(stmt) = self.parse_statement() {
                    statements.push(stmt);
                }
                self.skip_newlines();
            }
            if !self.eat_punct_delim(Delimiter::Dedent) {
                self.error(ParseError::UnterminatedSuite);
            }
            Suite { span: self.span_from(start), statements }.into()
        } else {
            match self.parse_statement() {
                Some(stmt) => Suite { span: self.span_from(start), statements: vec![stmt] }.into(),
                None => Suite { span: self.span_from(start), statements: Vec::new() }.into(),
            }
        }
    }

    /// A struct/class/interface/enum/union body: same brace/colon layout as
    /// [`Self::parse_suite`], but its members are a comma-separated field
    /// list (`name: type` pairs, `let`/control-flow statements still fall
    /// through to the ordinary statement parser for bodies that mix the
    /// two, e.g. an interface default method).
    fn parse_udt_body(&mut self) -> Node {
        let start = self.current().offset;
        if self.eat_punct(Punctuation::Colon) {
            self.skip_newlines();
            let mut statements = Vec::new();
            while !self.check_dedent() && !self.at_eof() {
                if self.kind() == TokenKind::Identifier {
                    if let Some(field) = self.parse_field() {
                        statements.push(field);
                    }
                    if !self.eat_punct(Punctuation::Comma) {
                        self.consume_statement_terminator();
                    }
                } else if let Some(stmt) = self.parse_statement() {
                    statements.push(stmt);
                }
                self.skip_newlines();
            }
            if !self.eat_punct_delim(Delimiter::Dedent) {
                self.error(ParseError::UnterminatedSuite);
            }
            Suite { span: self.span_from(start), statements }.into()
        } else if self.kind() == TokenKind::Identifier {
            let mut statements = Vec::new();
            while let Some(field) = self.parse_field() {
                statements.push(field);
                if !self.eat_punct(Punctuation::Comma) {
                    break;
                }
            }
            self.consume_statement_terminator();
            Suite { span: self.span_from(start), statements }.into()
        } else {
            match self.parse_statement() {
                Some(stmt) => Suite { span: self.span_from(start), statements: vec![stmt] }.into(),
                None => Suite { span: self.span_from(start), statements: Vec::new() }.into(),
            }
        }
    }

    /// One `name (':' Type)? ('=' Expr)?` field entry, reused by parameter
    /// lists and UDT bodies alike.
    fn parse_field(&mut self) -> Option<Node> {
        let start = self.current().offset;
        let (name, _) = self.expect_ident()?;
        let ty = if self.eat_punct(Punctuation::Colon) { self.parse_type() } else { None };
        let value = if self.eat_op(Operator::Assign) { Some(self.parse_expr()) } else { None };
        Some(VarDecl { span: self.span_from(start), name, ty, value }.into())
    }

    fn eat_punct_delim(&mut self, d: Delimiter) -> bool {
        if self.kind() == TokenKind::Delimiter(d) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn consume_statement_terminator(&mut self) {
        if self.check_newline() {
            self.bump();
        }
    }

    fn parse_statement(&mut self) -> Option<Node> {
        let result = match self.kind() {
            TokenKind::Keyword(Keyword::If) => self.parse_if_statement(),
            TokenKind::Keyword(Keyword::While) => self.parse_while_loop(),
            TokenKind::Keyword(Keyword::For) => self.parse_for_or_range_loop(),
            TokenKind::Keyword(Keyword::Return) => self.parse_return_statement(),
            TokenKind::Keyword(Keyword::Break) => self.parse_break_statement(),
            TokenKind::Keyword(Keyword::Continue) => self.parse_continue_statement(),
            TokenKind::Keyword(Keyword::Yield) => self.parse_yield_statement(),
            TokenKind::Keyword(Keyword::Let) => self.parse_let_decl(),
            TokenKind::Delimiter(Delimiter::Newline) | TokenKind::Delimiter(Delimiter::Dedent) => return None,
            _ => self.parse_expr_statement(),
        };
        if result.is_none() && !self.check_newline() && !self.check_dedent() && !self.at_eof() {
            self.recover_to_statement_boundary();
        }
        result
    }

    fn parse_if_statement(&mut self) -> Option<Node> {
        let start = self.current().offset;
        self.bump(); // 'if'
        let cond = self.parse_parenthesized_or_bare_expr();
        let then_branch = self.parse_suite();
        let else_branch = if self.eat_kw(Keyword::Else) {
            if self.check_kw(Keyword::If) {
                self.parse_else_if_statement()
            } else {
                let else_start = self.current().offset;
                let body = self.parse_suite();
                Some(ElseStatement { span: self.span_from(else_start), body }.into())
            }
        } else {
            None
        };
        Some(IfStatement { span: self.span_from(start), cond, then_branch, else_branch }.into())
    }

    fn parse_else_if_statement(&mut self) -> Option<Node> {
        let start = self.current().offset;
        self.bump(); // 'if'
        let cond = self.parse_parenthesized_or_bare_expr();
        let then_branch = self.parse_suite();
        let else_branch = if self.eat_kw(Keyword::Else) {
            if self.check_kw(Keyword::If) {
                self.parse_else_if_statement()
            } else {
                let else_start = self.current().offset;
                let body = self.parse_suite();
                Some(ElseStatement { span: self.span_from(else_start), body }.into())
            }
        } else {
            None
        };
        Some(ElseIfStatement { span: self.span_from(start), cond, then_branch, else_branch }.into())
    }

    fn parse_parenthesized_or_bare_expr(&mut self) -> Node {
        self.parse_expr()
    }

    fn parse_while_loop(&mut self) -> Option<Node> {
        let start = self.current().offset;
        self.bump(); // 'while'
        let cond = self.parse_expr();
        let body = self.parse_suite();
        Some(WhileLoop { span: self.span_from(start), cond, body }.into())
    }

    /// Disambiguates `for (init; cond; update) body` from `for x in iter body`
    /// by checking whether the clause immediately after `for`/`for (` looks
    /// like a range binding (`IDENT in ...`).
    fn parse_for_or_range_loop(&mut self) -> Option<Node> {
        let start = self.current().offset;
        self.bump(); // 'for'
        let had_paren = self.eat_punct(Punctuation::OpenParen);

        if self.kind() == TokenKind::Identifier {
            let checkpoint = self.cursor.position();
            let (var, _) = self.expect_ident()?;
            if self.ident_is("in") {
                self.bump();
                let iterable = self.parse_expr();
                if had_paren {
                    self.expect_punct(Punctuation::CloseParen, ")");
                }
                let body = self.parse_suite();
                return Some(RangeLoop { span: self.span_from(start), var, iterable, body }.into());
            }
            self.cursor.rewind_to(checkpoint);
        }

        let init = if self.check_punct(Punctuation::Semicolon) {
            None
        } else {
            Some(self.parse_for_clause_expr())
        };
        self.eat_punct(Punctuation::Semicolon);
        let cond = if self.check_punct(Punctuation::Semicolon) {
            None
        } else {
            Some(self.parse_expr())
        };
        self.eat_punct(Punctuation::Semicolon);
        let update = if self.check_punct(Punctuation::CloseParen) || self.check_punct(Punctuation::Colon) {
            None
        } else {
            Some(self.parse_for_clause_expr())
        };
        if had_paren {
            self.expect_punct(Punctuation::CloseParen, ")");
        }
        let body = self.parse_suite();
        Some(ForLoop { span: self.span_from(start), init, cond, update, body }.into())
    }

    /// A for-header clause: a bare expression or an `ident = expr`
    /// assignment, consumed without a trailing statement terminator (the
    /// caller eats the `;`/`)` that follows).
    fn parse_for_clause_expr(&mut self) -> Node {
        let start = self.current().offset;
        let expr = self.parse_expr();
        if self.check_op(Operator::Assign) {
            self.bump();
            let value = self.parse_expr();
            return Assignment { span: self.span_from(start), target: expr, value }.into();
        }
        if let Some(value) = self.parse_compound_assign_rhs(start, &expr) {
            return Assignment { span: self.span_from(start), target: expr, value }.into();
        }
        expr
    }

    /// Desugars `target op= rhs` into `target = target op rhs` when the
    /// current token is one of the compound-assignment operators. `~=`
    /// has no binary counterpart (`~` is unary bitwise-not) and is left
    /// unhandled.
    fn parse_compound_assign_rhs(&mut self, start: u32, target: &Node) -> Option<Node> {
        let op = match self.kind() {
            TokenKind::Operator(Operator::AddAssign) => Operator::Add,
            TokenKind::Operator(Operator::SubAssign) => Operator::Sub,
            TokenKind::Operator(Operator::MulAssign) => Operator::Mul,
            TokenKind::Operator(Operator::DivAssign) => Operator::Div,
            TokenKind::Operator(Operator::ModAssign) => Operator::Mod,
            TokenKind::Operator(Operator::MatAssign) => Operator::MatMul,
            TokenKind::Operator(Operator::PowerAssign) => Operator::Power,
            _ => return None,
        };
        self.bump();
        let rhs = self.parse_expr();
        Some(BinaryOp { span: self.span_from(start), op, lhs: target.clone(), rhs }.into())
    }

    fn parse_return_statement(&mut self) -> Option<Node> {
        let start = self.current().offset;
        self.bump(); // 'return'
        let value = if self.check_newline() || self.check_dedent() || self.at_eof() {
            None
        } else {
            Some(self.parse_expr())
        };
        self.consume_statement_terminator();
        Some(ReturnStatement { span: self.span_from(start), value }.into())
    }

    fn parse_break_statement(&mut self) -> Option<Node> {
        let start = self.current().offset;
        self.bump();
        self.consume_statement_terminator();
        Some(BreakStatement { span: self.span_from(start) }.into())
    }

    fn parse_continue_statement(&mut self) -> Option<Node> {
        let start = self.current().offset;
        self.bump();
        self.consume_statement_terminator();
        Some(ContinueStatement { span: self.span_from(start) }.into())
    }

    fn parse_yield_statement(&mut self) -> Option<Node> {
        let start = self.current().offset;
        self.bump();
        let value = if self.check_newline() || self.check_dedent() || self.at_eof() {
            None
        } else {
            Some(self.parse_expr())
        };
        self.consume_statement_terminator();
        Some(YieldStatement { span: self.span_from(start), value }.into())
    }

    fn parse_expr_statement(&mut self) -> Option<Node> {
        if self.at_eof() {
            return None;
        }
        let start = self.current().offset;
        let expr = self.parse_expr();
        if self.check_op(Operator::Assign) {
            self.bump();
            let value = self.parse_expr();
            self.consume_statement_terminator();
            return Some(Assignment { span: self.span_from(start), target: expr, value }.into());
        }
        if let Some(value) = self.parse_compound_assign_rhs(start, &expr) {
            self.consume_statement_terminator();
            return Some(Assignment { span: self.span_from(start), target: expr, value }.into());
        }
        self.consume_statement_terminator();
        // A bare ternary used directly as a statement (not as an assignment's
        // right-hand side, not nested in a larger expression) is the
        // statement-level `Conditional` the grammar lists separately from the
        // expression-level one: re-tag it `ConditionalStatement` so the two
        // stay visitor-distinguishable the way spec.md's Statements/
        // Expressions grouping requires.
        if let Node::Conditional(boxed) = expr {
            let Conditional { span, cond, then_expr, else_expr } = *boxed;
            return Some(ConditionalStatement { span, cond, then_expr, else_expr }.into());
        }
        Some(expr)
    }
}

enum UdtKeyword {
    Struct,
    Class,
    Interface,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::DiagnosticSink;
    use std::io::Write;

    fn parse_source(src: &str) -> (Program, DiagnosticSink) {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(src.as_bytes()).unwrap();
        f.flush().unwrap();
        let reader = crate::source::SourceReader::open(f.path()).unwrap();
        let sink = DiagnosticSink::default();
        let tokens = crate::lexer::tokenize(&reader, &sink);
        let program = parse(&tokens, &sink, None);
        (program, sink)
    }

    #[test]
    fn empty_file_yields_empty_program() {
        let (program, sink) = parse_source("");
        assert!(sink.is_empty());
        assert!(program.body.is_empty());
        assert!(program.comment.is_none());
    }

    #[test]
    fn single_let_with_type_and_value() {
        let (program, sink) = parse_source("let a: int = 5;\n");
        assert!(sink.is_empty(), "{:?}", sink.diagnostics());
        assert_eq!(program.body.len(), 1);
        let Node::LetDecl(decl) = &program.body[0] else { panic!("expected LetDecl") };
        assert_eq!(decl.name, "a");
        assert_eq!(decl.ty, Some(TypeExpr::Primitive(crate::token::Primitive::Int)));
        assert!(matches!(decl.value.as_ref().unwrap(), Node::Literal(_)));
    }

    #[test]
    fn if_else_with_braces_builds_nested_suites() {
        let (program, sink) = parse_source("if x > 1 { return x; } else { return 0; }\n");
        assert!(sink.is_empty(), "{:?}", sink.diagnostics());
        assert_eq!(program.body.len(), 1);
        let Node::IfStatement(stmt) = &program.body[0] else { panic!("expected IfStatement") };
        assert!(matches!(stmt.cond, Node::BinaryOp(_)));
        let Node::Suite(then_suite) = &stmt.then_branch else { panic!() };
        assert_eq!(then_suite.statements.len(), 1);
        assert!(stmt.else_branch.is_some());
    }

    #[test]
    fn empty_if_body_parses_as_empty_suite() {
        let (program, sink) = parse_source("if x { }\n");
        assert!(sink.is_empty(), "{:?}", sink.diagnostics());
        assert_eq!(program.body.len(), 1);
        let Node::IfStatement(stmt) = &program.body[0] else { panic!("expected IfStatement") };
        let Node::Suite(suite) = &stmt.then_branch else { panic!("expected Suite") };
        assert!(suite.statements.is_empty());
        assert!(stmt.else_branch.is_none());
    }

    #[test]
    fn bare_ternary_statement_is_tagged_conditional_statement() {
        let (program, sink) = parse_source("a > b ? c : d;\n");
        assert!(sink.is_empty(), "{:?}", sink.diagnostics());
        assert_eq!(program.body.len(), 1);
        let Node::ConditionalStatement(stmt) = &program.body[0] else {
            panic!("expected ConditionalStatement, got {:?}", program.body[0].node_kind())
        };
        assert!(matches!(stmt.cond, Node::BinaryOp(_)));
    }

    #[test]
    fn ternary_on_assignment_rhs_stays_conditional() {
        let (program, sink) = parse_source("let x: int = a > b ? c : d;\n");
        assert!(sink.is_empty(), "{:?}", sink.diagnostics());
        let Node::LetDecl(decl) = &program.body[0] else { panic!("expected LetDecl") };
        let value = decl.value.as_ref().expect("let decl has an initializer");
        assert!(matches!(value, Node::Conditional(_)));
    }

    #[test]
    fn generic_disambiguation_falls_back_to_relational() {
        let (program, sink) = parse_source("a < b > c;\n");
        assert!(sink.is_empty(), "{:?}", sink.diagnostics());
        assert_eq!(program.body.len(), 1);
        let Node::BinaryOp(outer) = &program.body[0] else { panic!("expected BinaryOp") };
        assert_eq!(outer.op, Operator::Gt);
        assert!(matches!(outer.lhs, Node::BinaryOp(_)));
    }

    #[test]
    fn fraction_like_struct_has_two_fields() {
        let (program, sink) = parse_source("struct F { n: int, d: int }\n");
        assert!(sink.is_empty(), "{:?}", sink.diagnostics());
        assert_eq!(program.body.len(), 1);
        let Node::StructDecl(decl) = &program.body[0] else { panic!("expected StructDecl") };
        assert_eq!(decl.name, "F");
        assert!(!decl.is_const);
        assert_eq!(decl.vis, AccessSpecifier::Public);
        let Node::Suite(body) = &decl.body else { panic!() };
        assert_eq!(body.statements.len(), 2);
    }

    #[test]
    fn unclosed_block_comment_produces_no_parser_errors() {
        let (program, sink) = parse_source("/*\nhello\n");
        assert_eq!(sink.len(), 1);
        assert!(program.body.is_empty());
    }
}
