//! The visitor contract: one method per concrete node variant, dispatched
//! by `Node::accept` on the node's runtime variant.
//!
//! Grounded on `original_source/source/parser/ast/include/AST_visitor.hh`'s
//! one-`visit`-per-type shape; `Output` is an associated type rather than
//! `void` so read-only dumps (`PrettyDumpVisitor`, `JsonDumpVisitor`) can
//! build their result by composing children's return values instead of
//! writing through a shared mutable buffer.

use super::node::*;

pub trait Visitor {
    type Output;

    fn visit_program(&mut self, node: &Program) -> Self::Output;
    fn visit_comment(&mut self, node: &Comment) -> Self::Output;
    fn visit_compiler_directive(&mut self, node: &CompilerDirective) -> Self::Output;
    fn visit_suite(&mut self, node: &Suite) -> Self::Output;
    fn visit_var_decl(&mut self, node: &VarDecl) -> Self::Output;
    fn visit_let_decl(&mut self, node: &LetDecl) -> Self::Output;
    fn visit_const_decl(&mut self, node: &ConstDecl) -> Self::Output;
    fn visit_func_decl(&mut self, node: &FuncDecl) -> Self::Output;
    fn visit_op_decl(&mut self, node: &OpDecl) -> Self::Output;
    fn visit_struct_decl(&mut self, node: &StructDecl) -> Self::Output;
    fn visit_class_decl(&mut self, node: &ClassDecl) -> Self::Output;
    fn visit_inter_decl(&mut self, node: &InterDecl) -> Self::Output;
    fn visit_enum_decl(&mut self, node: &EnumDecl) -> Self::Output;
    fn visit_union_decl(&mut self, node: &UnionDecl) -> Self::Output;
    fn visit_type_decl(&mut self, node: &TypeDecl) -> Self::Output;
    fn visit_ffi_decl(&mut self, node: &FFIDecl) -> Self::Output;
    fn visit_requires_decl(&mut self, node: &RequiresDecl) -> Self::Output;
    fn visit_assignment(&mut self, node: &Assignment) -> Self::Output;
    fn visit_for_loop(&mut self, node: &ForLoop) -> Self::Output;
    fn visit_range_loop(&mut self, node: &RangeLoop) -> Self::Output;
    fn visit_while_loop(&mut self, node: &WhileLoop) -> Self::Output;
    fn visit_if_statement(&mut self, node: &IfStatement) -> Self::Output;
    fn visit_else_if_statement(&mut self, node: &ElseIfStatement) -> Self::Output;
    fn visit_else_statement(&mut self, node: &ElseStatement) -> Self::Output;
    fn visit_conditional_statement(&mut self, node: &ConditionalStatement) -> Self::Output;
    fn visit_return_statement(&mut self, node: &ReturnStatement) -> Self::Output;
    fn visit_continue_statement(&mut self, node: &ContinueStatement) -> Self::Output;
    fn visit_break_statement(&mut self, node: &BreakStatement) -> Self::Output;
    fn visit_yield_statement(&mut self, node: &YieldStatement) -> Self::Output;
    fn visit_binary_op(&mut self, node: &BinaryOp) -> Self::Output;
    fn visit_unary_op(&mut self, node: &UnaryOp) -> Self::Output;
    fn visit_literal(&mut self, node: &Literal) -> Self::Output;
    fn visit_identifier(&mut self, node: &Identifier) -> Self::Output;
    fn visit_dot_access(&mut self, node: &DotAccess) -> Self::Output;
    fn visit_scope_access(&mut self, node: &ScopeAccess) -> Self::Output;
    fn visit_path_access(&mut self, node: &PathAccess) -> Self::Output;
    fn visit_function_call(&mut self, node: &FunctionCall) -> Self::Output;
    fn visit_array_access(&mut self, node: &ArrayAccess) -> Self::Output;
    fn visit_parenthesized(&mut self, node: &Parenthesized) -> Self::Output;
    fn visit_conditional(&mut self, node: &Conditional) -> Self::Output;
    fn visit_cast(&mut self, node: &Cast) -> Self::Output;
    fn visit_generic_invocation(&mut self, node: &GenericInvocation) -> Self::Output;
    fn visit_object_invocation(&mut self, node: &ObjectInvocation) -> Self::Output;
    fn visit_structure_invocation(&mut self, node: &StructureInvocation) -> Self::Output;
}
