//! Quantified invariants from spec §8: every child span is contained in its
//! parent's span, and parsing the same source twice is deterministic.
//! Random identifiers/literals are generated with `proptest` and spliced
//! into fixed-shape templates, the same style as the teacher's own
//! `proptest!` blocks (see `tests/lexer/core/blankline.rs` in the teacher).

use helix_front::ast::{Node, Span, Visitor};
use helix_front::parse_file;
use proptest::prelude::*;
use std::io::Write;

fn write_temp(contents: &str) -> tempfile::NamedTempFile {
    let mut f = tempfile::NamedTempFile::new().unwrap();
    f.write_all(contents.as_bytes()).unwrap();
    f.flush().unwrap();
    f
}

/// Walks every node, asserting `parent.span().contains(child.span())` for
/// each `Node`-typed child before recursing into it. Panics (via `assert!`)
/// on the first violation; `proptest` reports the shrunk failing input.
struct SpanContainment;

impl SpanContainment {
    fn check_child(&mut self, parent: Span, child: &Node) {
        assert!(
            parent.contains(child.span()),
            "parent span {:?} does not contain child span {:?} ({:?})",
            parent,
            child.span(),
            child.node_kind()
        );
        child.accept(self);
    }

    fn check_opt(&mut self, parent: Span, child: &Option<Node>) {
        if let Some(child) = child {
            self.check_child(parent, child);
        }
    }

    fn check_many(&mut self, parent: Span, children: &[Node]) {
        for child in children {
            self.check_child(parent, child);
        }
    }
}

impl Visitor for SpanContainment {
    type Output = ();

    fn visit_program(&mut self, node: &helix_front::ast::Program) -> Self::Output {
        self.check_opt(node.span, &node.comment);
        self.check_many(node.span, &node.body);
    }
    fn visit_comment(&mut self, _node: &helix_front::ast::Comment) -> Self::Output {}
    fn visit_compiler_directive(&mut self, _node: &helix_front::ast::CompilerDirective) -> Self::Output {}
    fn visit_suite(&mut self, node: &helix_front::ast::Suite) -> Self::Output {
        self.check_many(node.span, &node.statements);
    }
    fn visit_var_decl(&mut self, node: &helix_front::ast::VarDecl) -> Self::Output {
        self.check_opt(node.span, &node.value);
    }
    fn visit_let_decl(&mut self, node: &helix_front::ast::LetDecl) -> Self::Output {
        self.check_opt(node.span, &node.value);
    }
    fn visit_const_decl(&mut self, node: &helix_front::ast::ConstDecl) -> Self::Output {
        self.check_opt(node.span, &node.value);
    }
    fn visit_func_decl(&mut self, node: &helix_front::ast::FuncDecl) -> Self::Output {
        self.check_opt(node.span, &node.requires);
        self.check_child(node.span, &node.body);
    }
    fn visit_op_decl(&mut self, node: &helix_front::ast::OpDecl) -> Self::Output {
        self.check_child(node.span, &node.body);
    }
    fn visit_struct_decl(&mut self, node: &helix_front::ast::StructDecl) -> Self::Output {
        self.check_opt(node.span, &node.requires);
        self.check_child(node.span, &node.body);
    }
    fn visit_class_decl(&mut self, node: &helix_front::ast::ClassDecl) -> Self::Output {
        self.check_opt(node.span, &node.requires);
        self.check_child(node.span, &node.body);
    }
    fn visit_inter_decl(&mut self, node: &helix_front::ast::InterDecl) -> Self::Output {
        self.check_opt(node.span, &node.requires);
        self.check_child(node.span, &node.body);
    }
    fn visit_enum_decl(&mut self, node: &helix_front::ast::EnumDecl) -> Self::Output {
        self.check_child(node.span, &node.body);
    }
    fn visit_union_decl(&mut self, node: &helix_front::ast::UnionDecl) -> Self::Output {
        self.check_child(node.span, &node.body);
    }
    fn visit_type_decl(&mut self, node: &helix_front::ast::TypeDecl) -> Self::Output {
        self.check_opt(node.span, &node.requires);
    }
    fn visit_ffi_decl(&mut self, node: &helix_front::ast::FFIDecl) -> Self::Output {
        self.check_opt(node.span, &node.body);
    }
    fn visit_requires_decl(&mut self, _node: &helix_front::ast::RequiresDecl) -> Self::Output {}
    fn visit_assignment(&mut self, node: &helix_front::ast::Assignment) -> Self::Output {
        self.check_child(node.span, &node.target);
        self.check_child(node.span, &node.value);
    }
    fn visit_for_loop(&mut self, node: &helix_front::ast::ForLoop) -> Self::Output {
        self.check_opt(node.span, &node.init);
        self.check_opt(node.span, &node.cond);
        self.check_opt(node.span, &node.update);
        self.check_child(node.span, &node.body);
    }
    fn visit_range_loop(&mut self, node: &helix_front::ast::RangeLoop) -> Self::Output {
        self.check_child(node.span, &node.iterable);
        self.check_child(node.span, &node.body);
    }
    fn visit_while_loop(&mut self, node: &helix_front::ast::WhileLoop) -> Self::Output {
        self.check_child(node.span, &node.cond);
        self.check_child(node.span, &node.body);
    }
    fn visit_if_statement(&mut self, node: &helix_front::ast::IfStatement) -> Self::Output {
        self.check_child(node.span, &node.cond);
        self.check_child(node.span, &node.then_branch);
        self.check_opt(node.span, &node.else_branch);
    }
    fn visit_else_if_statement(&mut self, node: &helix_front::ast::ElseIfStatement) -> Self::Output {
        self.check_child(node.span, &node.cond);
        self.check_child(node.span, &node.then_branch);
        self.check_opt(node.span, &node.else_branch);
    }
    fn visit_else_statement(&mut self, node: &helix_front::ast::ElseStatement) -> Self::Output {
        self.check_child(node.span, &node.body);
    }
    fn visit_conditional_statement(&mut self, node: &helix_front::ast::ConditionalStatement) -> Self::Output {
        self.check_child(node.span, &node.cond);
        self.check_child(node.span, &node.then_expr);
        self.check_child(node.span, &node.else_expr);
    }
    fn visit_return_statement(&mut self, node: &helix_front::ast::ReturnStatement) -> Self::Output {
        self.check_opt(node.span, &node.value);
    }
    fn visit_continue_statement(&mut self, _node: &helix_front::ast::ContinueStatement) -> Self::Output {}
    fn visit_break_statement(&mut self, _node: &helix_front::ast::BreakStatement) -> Self::Output {}
    fn visit_yield_statement(&mut self, node: &helix_front::ast::YieldStatement) -> Self::Output {
        self.check_opt(node.span, &node.value);
    }
    fn visit_binary_op(&mut self, node: &helix_front::ast::BinaryOp) -> Self::Output {
        self.check_child(node.span, &node.lhs);
        self.check_child(node.span, &node.rhs);
    }
    fn visit_unary_op(&mut self, node: &helix_front::ast::UnaryOp) -> Self::Output {
        self.check_child(node.span, &node.operand);
    }
    fn visit_literal(&mut self, _node: &helix_front::ast::Literal) -> Self::Output {}
    fn visit_identifier(&mut self, _node: &helix_front::ast::Identifier) -> Self::Output {}
    fn visit_dot_access(&mut self, node: &helix_front::ast::DotAccess) -> Self::Output {
        self.check_child(node.span, &node.base);
    }
    fn visit_scope_access(&mut self, node: &helix_front::ast::ScopeAccess) -> Self::Output {
        self.check_child(node.span, &node.base);
    }
    fn visit_path_access(&mut self, _node: &helix_front::ast::PathAccess) -> Self::Output {}
    fn visit_function_call(&mut self, node: &helix_front::ast::FunctionCall) -> Self::Output {
        self.check_child(node.span, &node.callee);
        self.check_many(node.span, &node.args);
    }
    fn visit_array_access(&mut self, node: &helix_front::ast::ArrayAccess) -> Self::Output {
        self.check_child(node.span, &node.base);
        self.check_child(node.span, &node.index);
    }
    fn visit_parenthesized(&mut self, node: &helix_front::ast::Parenthesized) -> Self::Output {
        self.check_child(node.span, &node.inner);
    }
    fn visit_conditional(&mut self, node: &helix_front::ast::Conditional) -> Self::Output {
        self.check_child(node.span, &node.cond);
        self.check_child(node.span, &node.then_expr);
        self.check_child(node.span, &node.else_expr);
    }
    fn visit_cast(&mut self, node: &helix_front::ast::Cast) -> Self::Output {
        self.check_child(node.span, &node.expr);
    }
    fn visit_generic_invocation(&mut self, node: &helix_front::ast::GenericInvocation) -> Self::Output {
        self.check_child(node.span, &node.base);
        self.check_many(node.span, &node.args);
    }
    fn visit_object_invocation(&mut self, node: &helix_front::ast::ObjectInvocation) -> Self::Output {
        for (_, value) in &node.fields {
            self.check_child(node.span, value);
        }
    }
    fn visit_structure_invocation(&mut self, node: &helix_front::ast::StructureInvocation) -> Self::Output {
        self.check_many(node.span, &node.args);
    }
}

fn assert_span_containment(program: &helix_front::ast::Program) {
    let mut visitor = SpanContainment;
    visitor.check_opt(program.span, &program.comment);
    visitor.check_many(program.span, &program.body);
}

proptest! {
    #[test]
    fn span_containment_holds_for_random_let_decls(name in "[a-z][a-z0-9]{0,8}", value in 0i64..100000) {
        let src = format!("let {name}: int = {value};\n");
        let f = write_temp(&src);
        let (program, sink) = parse_file(f.path());
        prop_assert!(sink.is_empty());
        assert_span_containment(&program);
    }

    #[test]
    fn span_containment_holds_for_random_arithmetic(a in 0i64..1000, b in 0i64..1000, c in 0i64..1000) {
        let src = format!("let x: int = {a} + {b} * {c};\n");
        let f = write_temp(&src);
        let (program, sink) = parse_file(f.path());
        prop_assert!(sink.is_empty());
        assert_span_containment(&program);
    }

    #[test]
    fn span_containment_holds_for_random_struct_fields(n_name in "[a-z][a-z0-9]{0,6}", d_name in "[a-z][a-z0-9]{0,6}") {
        prop_assume!(n_name != d_name);
        let src = format!("struct F {{ {n_name}: int, {d_name}: int }}\n");
        let f = write_temp(&src);
        let (program, sink) = parse_file(f.path());
        prop_assert!(sink.is_empty());
        assert_span_containment(&program);
    }

    #[test]
    fn parsing_is_deterministic(name in "[a-z][a-z0-9]{0,8}", value in 0i64..100000) {
        let src = format!("let {name}: int = {value};\n");
        let f1 = write_temp(&src);
        let f2 = write_temp(&src);
        let (p1, sink1) = parse_file(f1.path());
        let (p2, sink2) = parse_file(f2.path());
        prop_assert_eq!(sink1.is_empty(), sink2.is_empty());
        prop_assert_eq!(p1.body.len(), p2.body.len());
        let Node::LetDecl(d1) = &p1.body[0] else { unreachable!() };
        let Node::LetDecl(d2) = &p2.body[0] else { unreachable!() };
        prop_assert_eq!(&d1.name, &d2.name);
        prop_assert_eq!(d1.span, d2.span);
    }
}
