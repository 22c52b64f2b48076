//! `serde_json::Value` tree dump, structurally parallel to [`super::pretty`]
//! but machine-readable: `{"kind": ..., <fields>, "span": {...}}`.

use serde_json::{json, Value};

use super::node::*;
use super::span::Span;
use super::visitor::Visitor;
use super::TypeExpr;

pub fn dump(node: &Node) -> Value {
    let mut visitor = JsonDumpVisitor;
    node.accept(&mut visitor)
}

pub struct JsonDumpVisitor;

fn span_json(span: Span) -> Value {
    json!({ "start": span.start, "end": span.end })
}

fn opt(node: &Option<Node>, v: &mut JsonDumpVisitor) -> Value {
    match node {
        Some(n) => n.accept(v),
        None => Value::Null,
    }
}

fn arr(nodes: &[Node], v: &mut JsonDumpVisitor) -> Value {
    Value::Array(nodes.iter().map(|n| n.accept(v)).collect())
}

fn ty(t: &TypeExpr) -> Value {
    Value::String(t.to_string_display())
}

fn opt_ty(t: &Option<TypeExpr>) -> Value {
    match t {
        Some(t) => ty(t),
        None => Value::Null,
    }
}

impl Visitor for JsonDumpVisitor {
    type Output = Value;

    fn visit_program(&mut self, node: &Program) -> Value {
        json!({
            "kind": "Program",
            "file_name": node.file_name,
            "comment": opt(&node.comment, self),
            "body": arr(&node.body, self),
            "span": span_json(node.span),
        })
    }

    fn visit_comment(&mut self, node: &Comment) -> Value {
        json!({
            "kind": "Comment",
            "text": node.text,
            "owner": node.owner,
            "span": span_json(node.span),
        })
    }

    fn visit_compiler_directive(&mut self, node: &CompilerDirective) -> Value {
        json!({
            "kind": "CompilerDirective",
            "text": node.text,
            "span": span_json(node.span),
        })
    }

    fn visit_suite(&mut self, node: &Suite) -> Value {
        json!({
            "kind": "Suite",
            "statements": arr(&node.statements, self),
            "span": span_json(node.span),
        })
    }

    fn visit_var_decl(&mut self, node: &VarDecl) -> Value {
        json!({
            "kind": "VarDecl",
            "name": node.name,
            "type": opt_ty(&node.ty),
            "value": opt(&node.value, self),
            "span": span_json(node.span),
        })
    }

    fn visit_let_decl(&mut self, node: &LetDecl) -> Value {
        json!({
            "kind": "LetDecl",
            "name": node.name,
            "type": opt_ty(&node.ty),
            "value": opt(&node.value, self),
            "span": span_json(node.span),
        })
    }

    fn visit_const_decl(&mut self, node: &ConstDecl) -> Value {
        json!({
            "kind": "ConstDecl",
            "vis": format!("{:?}", node.vis),
            "name": node.name,
            "type": opt_ty(&node.ty),
            "value": opt(&node.value, self),
            "span": span_json(node.span),
        })
    }

    fn visit_func_decl(&mut self, node: &FuncDecl) -> Value {
        json!({
            "kind": "FuncDecl",
            "specifiers": node.specifiers.iter().map(|s| format!("{s:?}")).collect::<Vec<_>>(),
            "name": node.name,
            "params": node.params.iter().map(|p| {
                json!({ "name": p.name, "type": opt_ty(&p.ty) })
            }).collect::<Vec<_>>(),
            "return_type": opt_ty(&node.return_type),
            "requires": opt(&node.requires, self),
            "body": node.body.accept(self),
            "span": span_json(node.span),
        })
    }

    fn visit_op_decl(&mut self, node: &OpDecl) -> Value {
        json!({
            "kind": "OpDecl",
            "operator": format!("{:?}", node.operator),
            "params": node.params.iter().map(|p| {
                json!({ "name": p.name, "type": opt_ty(&p.ty) })
            }).collect::<Vec<_>>(),
            "return_type": opt_ty(&node.return_type),
            "body": node.body.accept(self),
            "span": span_json(node.span),
        })
    }

    fn visit_struct_decl(&mut self, node: &StructDecl) -> Value {
        json!({
            "kind": "StructDecl",
            "is_const": node.is_const,
            "vis": format!("{:?}", node.vis),
            "name": node.name,
            "requires": opt(&node.requires, self),
            "body": node.body.accept(self),
            "span": span_json(node.span),
        })
    }

    fn visit_class_decl(&mut self, node: &ClassDecl) -> Value {
        json!({
            "kind": "ClassDecl",
            "is_const": node.is_const,
            "vis": format!("{:?}", node.vis),
            "name": node.name,
            "requires": opt(&node.requires, self),
            "body": node.body.accept(self),
            "span": span_json(node.span),
        })
    }

    fn visit_inter_decl(&mut self, node: &InterDecl) -> Value {
        json!({
            "kind": "InterDecl",
            "vis": format!("{:?}", node.vis),
            "name": node.name,
            "requires": opt(&node.requires, self),
            "body": node.body.accept(self),
            "span": span_json(node.span),
        })
    }

    fn visit_enum_decl(&mut self, node: &EnumDecl) -> Value {
        json!({
            "kind": "EnumDecl",
            "vis": format!("{:?}", node.vis),
            "name": node.name,
            "body": node.body.accept(self),
            "span": span_json(node.span),
        })
    }

    fn visit_union_decl(&mut self, node: &UnionDecl) -> Value {
        json!({
            "kind": "UnionDecl",
            "vis": format!("{:?}", node.vis),
            "name": node.name,
            "body": node.body.accept(self),
            "span": span_json(node.span),
        })
    }

    fn visit_type_decl(&mut self, node: &TypeDecl) -> Value {
        json!({
            "kind": "TypeDecl",
            "vis": format!("{:?}", node.vis),
            "name": node.name,
            "requires": opt(&node.requires, self),
            "value": ty(&node.value),
            "span": span_json(node.span),
        })
    }

    fn visit_ffi_decl(&mut self, node: &FFIDecl) -> Value {
        json!({
            "kind": "FFIDecl",
            "specifier": format!("{:?}", node.specifier),
            "name": node.name,
            "body": opt(&node.body, self),
            "span": span_json(node.span),
        })
    }

    fn visit_requires_decl(&mut self, node: &RequiresDecl) -> Value {
        json!({
            "kind": "RequiresDecl",
            "params": node.params.iter().map(|p| {
                json!({
                    "is_const": p.is_const,
                    "name": p.name,
                    "type": opt_ty(&p.ty),
                    "default": opt_ty(&p.default),
                })
            }).collect::<Vec<_>>(),
            "bounds": node.bounds.iter().map(|b| ty(&b.instance_of)).collect::<Vec<_>>(),
            "span": span_json(node.span),
        })
    }

    fn visit_assignment(&mut self, node: &Assignment) -> Value {
        json!({
            "kind": "Assignment",
            "target": node.target.accept(self),
            "value": node.value.accept(self),
            "span": span_json(node.span),
        })
    }

    fn visit_for_loop(&mut self, node: &ForLoop) -> Value {
        json!({
            "kind": "ForLoop",
            "init": opt(&node.init, self),
            "cond": opt(&node.cond, self),
            "update": opt(&node.update, self),
            "body": node.body.accept(self),
            "span": span_json(node.span),
        })
    }

    fn visit_range_loop(&mut self, node: &RangeLoop) -> Value {
        json!({
            "kind": "RangeLoop",
            "var": node.var,
            "iterable": node.iterable.accept(self),
            "body": node.body.accept(self),
            "span": span_json(node.span),
        })
    }

    fn visit_while_loop(&mut self, node: &WhileLoop) -> Value {
        json!({
            "kind": "WhileLoop",
            "cond": node.cond.accept(self),
            "body": node.body.accept(self),
            "span": span_json(node.span),
        })
    }

    fn visit_if_statement(&mut self, node: &IfStatement) -> Value {
        json!({
            "kind": "IfStatement",
            "cond": node.cond.accept(self),
            "then_branch": node.then_branch.accept(self),
            "else_branch": opt(&node.else_branch, self),
            "span": span_json(node.span),
        })
    }

    fn visit_else_if_statement(&mut self, node: &ElseIfStatement) -> Value {
        json!({
            "kind": "ElseIfStatement",
            "cond": node.cond.accept(self),
            "then_branch": node.then_branch.accept(self),
            "else_branch": opt(&node.else_branch, self),
            "span": span_json(node.span),
        })
    }

    fn visit_else_statement(&mut self, node: &ElseStatement) -> Value {
        json!({
            "kind": "ElseStatement",
            "body": node.body.accept(self),
            "span": span_json(node.span),
        })
    }

    fn visit_conditional_statement(&mut self, node: &ConditionalStatement) -> Value {
        json!({
            "kind": "ConditionalStatement",
            "cond": node.cond.accept(self),
            "then_expr": node.then_expr.accept(self),
            "else_expr": node.else_expr.accept(self),
            "span": span_json(node.span),
        })
    }

    fn visit_return_statement(&mut self, node: &ReturnStatement) -> Value {
        json!({
            "kind": "ReturnStatement",
            "value": opt(&node.value, self),
            "span": span_json(node.span),
        })
    }

    fn visit_continue_statement(&mut self, node: &ContinueStatement) -> Value {
        json!({ "kind": "ContinueStatement", "span": span_json(node.span) })
    }

    fn visit_break_statement(&mut self, node: &BreakStatement) -> Value {
        json!({ "kind": "BreakStatement", "span": span_json(node.span) })
    }

    fn visit_yield_statement(&mut self, node: &YieldStatement) -> Value {
        json!({
            "kind": "YieldStatement",
            "value": opt(&node.value, self),
            "span": span_json(node.span),
        })
    }

    fn visit_binary_op(&mut self, node: &BinaryOp) -> Value {
        json!({
            "kind": "BinaryOp",
            "op": format!("{:?}", node.op),
            "lhs": node.lhs.accept(self),
            "rhs": node.rhs.accept(self),
            "span": span_json(node.span),
        })
    }

    fn visit_unary_op(&mut self, node: &UnaryOp) -> Value {
        json!({
            "kind": "UnaryOp",
            "op": format!("{:?}", node.op),
            "prefix": node.prefix,
            "operand": node.operand.accept(self),
            "span": span_json(node.span),
        })
    }

    fn visit_literal(&mut self, node: &Literal) -> Value {
        json!({
            "kind": "Literal",
            "literal_kind": format!("{:?}", node.kind),
            "raw": node.raw,
            "span": span_json(node.span),
        })
    }

    fn visit_identifier(&mut self, node: &Identifier) -> Value {
        json!({
            "kind": "Identifier",
            "name": node.name,
            "span": span_json(node.span),
        })
    }

    fn visit_dot_access(&mut self, node: &DotAccess) -> Value {
        json!({
            "kind": "DotAccess",
            "base": node.base.accept(self),
            "member": node.member,
            "span": span_json(node.span),
        })
    }

    fn visit_scope_access(&mut self, node: &ScopeAccess) -> Value {
        json!({
            "kind": "ScopeAccess",
            "base": node.base.accept(self),
            "member": node.member,
            "span": span_json(node.span),
        })
    }

    fn visit_path_access(&mut self, node: &PathAccess) -> Value {
        json!({
            "kind": "PathAccess",
            "segments": node.segments,
            "span": span_json(node.span),
        })
    }

    fn visit_function_call(&mut self, node: &FunctionCall) -> Value {
        json!({
            "kind": "FunctionCall",
            "callee": node.callee.accept(self),
            "args": arr(&node.args, self),
            "span": span_json(node.span),
        })
    }

    fn visit_array_access(&mut self, node: &ArrayAccess) -> Value {
        json!({
            "kind": "ArrayAccess",
            "base": node.base.accept(self),
            "index": node.index.accept(self),
            "span": span_json(node.span),
        })
    }

    fn visit_parenthesized(&mut self, node: &Parenthesized) -> Value {
        json!({
            "kind": "Parenthesized",
            "inner": node.inner.accept(self),
            "span": span_json(node.span),
        })
    }

    fn visit_conditional(&mut self, node: &Conditional) -> Value {
        json!({
            "kind": "Conditional",
            "cond": node.cond.accept(self),
            "then_expr": node.then_expr.accept(self),
            "else_expr": node.else_expr.accept(self),
            "span": span_json(node.span),
        })
    }

    fn visit_cast(&mut self, node: &Cast) -> Value {
        json!({
            "kind": "Cast",
            "expr": node.expr.accept(self),
            "target": ty(&node.target),
            "span": span_json(node.span),
        })
    }

    fn visit_generic_invocation(&mut self, node: &GenericInvocation) -> Value {
        json!({
            "kind": "GenericInvocation",
            "base": node.base.accept(self),
            "type_args": node.type_args.iter().map(ty).collect::<Vec<_>>(),
            "args": arr(&node.args, self),
            "span": span_json(node.span),
        })
    }

    fn visit_object_invocation(&mut self, node: &ObjectInvocation) -> Value {
        let fields: serde_json::Map<String, Value> =
            node.fields.iter().map(|(name, value)| (name.clone(), value.accept(self))).collect();
        json!({
            "kind": "ObjectInvocation",
            "type": opt_ty(&node.ty),
            "fields": Value::Object(fields),
            "span": span_json(node.span),
        })
    }

    fn visit_structure_invocation(&mut self, node: &StructureInvocation) -> Value {
        json!({
            "kind": "StructureInvocation",
            "type": ty(&node.ty),
            "args": arr(&node.args, self),
            "span": span_json(node.span),
        })
    }
}
