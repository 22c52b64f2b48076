//! Pratt-style expression parsing.
//!
//! Precedence climbs low to high: ternary, logical-or, logical-and,
//! bitwise-or, bitwise-xor, bitwise-and, equality, relational, shift,
//! additive, multiplicative, power/cast, unary, postfix, primary.
//! Assignment sits below all of these but is parsed by the caller (see
//! `parse_expr_statement`, `parse_let_decl`, `parse_for_clause_expr` in
//! [`super`]) rather than here, since `Assignment` carries a plain target/
//! value pair with no operator field to hang a compound-assignment variant
//! on.

use super::{ParseError, Parser};
use crate::ast::*;
use crate::token::{Operator, Punctuation, TokenKind};

impl<'a> Parser<'a> {
    pub(super) fn parse_expr(&mut self) -> Node {
        self.parse_ternary()
    }

    fn parse_ternary(&mut self) -> Node {
        let start = self.current().offset;
        let cond = self.parse_logical_or();
        if !self.eat_punct(Punctuation::Question) {
            return cond;
        }
        let then_expr = self.parse_ternary();
        self.expect_punct(Punctuation::Colon, ":");
        let else_expr = self.parse_ternary();
        Conditional { span: self.span_from(start), cond, then_expr, else_expr }.into()
    }

    fn parse_logical_or(&mut self) -> Node {
        self.parse_left_assoc(&[Operator::Or, Operator::Nor, Operator::Xor], Self::parse_logical_and)
    }

    fn parse_logical_and(&mut self) -> Node {
        self.parse_left_assoc(&[Operator::And, Operator::Nand], Self::parse_bitwise_or)
    }

    fn parse_bitwise_or(&mut self) -> Node {
        self.parse_left_assoc(&[Operator::BitOr, Operator::BitNor], Self::parse_bitwise_xor)
    }

    fn parse_bitwise_xor(&mut self) -> Node {
        self.parse_left_assoc(&[Operator::BitXor], Self::parse_bitwise_and)
    }

    fn parse_bitwise_and(&mut self) -> Node {
        self.parse_left_assoc(&[Operator::BitAnd, Operator::BitNand], Self::parse_equality)
    }

    fn parse_equality(&mut self) -> Node {
        self.parse_left_assoc(&[Operator::Eq, Operator::Ne, Operator::RefEq], Self::parse_relational)
    }

    fn parse_relational(&mut self) -> Node {
        self.parse_left_assoc(&[Operator::Lt, Operator::Gt, Operator::Le, Operator::Ge], Self::parse_shift)
    }

    fn parse_shift(&mut self) -> Node {
        self.parse_left_assoc(&[Operator::Shl, Operator::Shr], Self::parse_additive)
    }

    fn parse_additive(&mut self) -> Node {
        self.parse_left_assoc(&[Operator::Add, Operator::Sub], Self::parse_multiplicative)
    }

    fn parse_multiplicative(&mut self) -> Node {
        self.parse_left_assoc(&[Operator::Mul, Operator::Div, Operator::Mod, Operator::MatMul], Self::parse_power_cast)
    }

    /// Right-associative; also hosts the `is` type-check/cast form at the
    /// same tier, binding tighter than the arithmetic operators below it and
    /// looser than unary prefix operators above it.
    fn parse_power_cast(&mut self) -> Node {
        let start = self.current().offset;
        let mut lhs = self.parse_unary();
        loop {
            if self.check_kw(crate::token::Keyword::Is) {
                self.bump();
                match self.parse_type() {
                    Some(target) => {
                        lhs = Cast { span: self.span_from(start), expr: lhs, target }.into();
                        continue;
                    }
                    None => break,
                }
            }
            if self.check_op(Operator::Power) {
                self.bump();
                let rhs = self.parse_power_cast();
                lhs = BinaryOp { span: self.span_from(start), op: Operator::Power, lhs, rhs }.into();
                continue;
            }
            break;
        }
        lhs
    }

    fn parse_left_assoc(&mut self, ops: &[Operator], next: fn(&mut Self) -> Node) -> Node {
        let start = self.current().offset;
        let mut lhs = next(self);
        loop {
            let op = match self.kind() {
                TokenKind::Operator(op) if ops.contains(&op) => op,
                _ => break,
            };
            self.bump();
            let rhs = next(self);
            lhs = BinaryOp { span: self.span_from(start), op, lhs, rhs }.into();
        }
        lhs
    }

    fn parse_unary(&mut self) -> Node {
        let start = self.current().offset;
        let prefix_op = match self.kind() {
            TokenKind::Operator(
                op @ (Operator::Not
                | Operator::Sub
                | Operator::Add
                | Operator::BitNot
                | Operator::Mul
                | Operator::Inc
                | Operator::Dec
                | Operator::Abs),
            ) => Some(op),
            _ => None,
        };
        if let Some(op) = prefix_op {
            self.bump();
            let operand = self.parse_unary();
            return UnaryOp { span: self.span_from(start), op, operand, prefix: true }.into();
        }
        self.parse_postfix()
    }

    fn parse_postfix(&mut self) -> Node {
        let start = self.current().offset;
        let mut expr = self.parse_primary();
        loop {
            match self.kind() {
                TokenKind::Operator(Operator::Dot) => {
                    self.bump();
                    let Some((member, _)) = self.expect_ident() else { break };
                    expr = DotAccess { span: self.span_from(start), base: expr, member }.into();
                }
                TokenKind::Operator(Operator::Scope) => {
                    self.bump();
                    let Some((member, _)) = self.expect_ident() else { break };
                    expr = ScopeAccess { span: self.span_from(start), base: expr, member }.into();
                }
                TokenKind::Punctuation(Punctuation::OpenParen) => {
                    self.bump();
                    let args = self.parse_expr_list(Punctuation::CloseParen);
                    self.expect_punct(Punctuation::CloseParen, ")");
                    expr = FunctionCall { span: self.span_from(start), callee: expr, args }.into();
                }
                TokenKind::Punctuation(Punctuation::OpenBracket) => {
                    self.bump();
                    let index = self.parse_expr();
                    self.expect_punct(Punctuation::CloseBracket, "]");
                    expr = ArrayAccess { span: self.span_from(start), base: expr, index }.into();
                }
                TokenKind::Operator(op @ (Operator::Inc | Operator::Dec)) => {
                    self.bump();
                    expr = UnaryOp { span: self.span_from(start), op, operand: expr, prefix: false }.into();
                }
                TokenKind::Operator(Operator::Lt) => match self.try_parse_generic_invocation(expr.clone(), start) {
                    Some(node) => expr = node,
                    None => break,
                },
                _ => break,
            }
        }
        expr
    }

    /// Commits to `base<T, ...>(args)` only if a matching `>` is found
    /// (without the type-argument scan crossing a token the type grammar
    /// can't consume, which a real newline inside the angle brackets would
    /// force) and is immediately followed by a call's `(`; otherwise rewinds
    /// and lets the relational parser reinterpret `<` as less-than.
    fn try_parse_generic_invocation(&mut self, base: Node, start: u32) -> Option<Node> {
        let checkpoint = self.cursor.position();
        self.bump(); // '<'
        let mut type_args = Vec::new();
        loop {
            match self.parse_type() {
                Some(t) => type_args.push(t),
                None => {
                    self.cursor.rewind_to(checkpoint);
                    return None;
                }
            }
            if !self.eat_punct(Punctuation::Comma) {
                break;
            }
        }
        if !self.check_op(Operator::Gt) {
            self.cursor.rewind_to(checkpoint);
            return None;
        }
        self.bump(); // '>'
        if !self.check_punct(Punctuation::OpenParen) {
            self.cursor.rewind_to(checkpoint);
            return None;
        }
        self.bump(); // '('
        let args = self.parse_expr_list(Punctuation::CloseParen);
        self.expect_punct(Punctuation::CloseParen, ")");
        Some(GenericInvocation { span: self.span_from(start), base, type_args, args }.into())
    }

    fn parse_primary(&mut self) -> Node {
        let start = self.current().offset;
        match self.kind() {
            TokenKind::Literal(kind) => {
                let tok = self.bump();
                Literal { span: self.span_from(start), kind, raw: tok.value }.into()
            }
            TokenKind::Primitive(p) => {
                self.bump();
                if self.check_punct(Punctuation::OpenParen) {
                    self.bump();
                    let args = self.parse_expr_list(Punctuation::CloseParen);
                    self.expect_punct(Punctuation::CloseParen, ")");
                    StructureInvocation { span: self.span_from(start), ty: TypeExpr::Primitive(p), args }.into()
                } else {
                    Identifier { span: self.span_from(start), name: format!("{p:?}").to_lowercase() }.into()
                }
            }
            TokenKind::Identifier => {
                let (name, _) = self.expect_ident().expect("checked by match arm");
                if self.check_punct(Punctuation::OpenBrace) {
                    self.parse_object_invocation(start, Some(TypeExpr::Named(name)))
                } else {
                    Identifier { span: self.span_from(start), name }.into()
                }
            }
            TokenKind::Punctuation(Punctuation::OpenBrace) => self.parse_object_invocation(start, None),
            TokenKind::Punctuation(Punctuation::OpenParen) => {
                self.bump();
                let inner = self.parse_expr();
                self.expect_punct(Punctuation::CloseParen, ")");
                Parenthesized { span: self.span_from(start), inner }.into()
            }
            _ => {
                self.error(ParseError::UnexpectedToken { found: self.current().value.clone(), expected: "an expression" });
                let tok = self.bump();
                Identifier { span: self.span_from(start), name: tok.value }.into()
            }
        }
    }

    fn parse_object_invocation(&mut self, start: u32, ty: Option<TypeExpr>) -> Node {
        self.bump(); // '{'
        let mut fields = Vec::new();
        while !self.check_punct(Punctuation::CloseBrace) && !self.at_eof() {
            let Some((name, _)) = self.expect_ident() else { break };
            if !self.expect_punct(Punctuation::Colon, ":") {
                break;
            }
            let value = self.parse_expr();
            fields.push((name, value));
            if !self.eat_punct(Punctuation::Comma) {
                break;
            }
        }
        self.expect_punct(Punctuation::CloseBrace, "}");
        ObjectInvocation { span: self.span_from(start), ty, fields }.into()
    }

    /// A comma-separated expression list, trailing comma allowed, as used
    /// by call arguments and generic-invocation arguments alike.
    pub(super) fn parse_expr_list(&mut self, terminator: Punctuation) -> Vec<Node> {
        let mut args = Vec::new();
        if self.check_punct(terminator) {
            return args;
        }
        loop {
            args.push(self.parse_expr());
            if !self.eat_punct(Punctuation::Comma) {
                break;
            }
            if self.check_punct(terminator) {
                break;
            }
        }
        args
    }
}
