//! Reproduces the `to_string(depth)` contract every node implements:
//! an indented, human-readable tree dump.

use super::node::*;
use super::visitor::Visitor;

pub fn dump(node: &Node, depth: usize) -> String {
    let mut visitor = PrettyDumpVisitor { depth };
    node.accept(&mut visitor)
}

/// Read-only: never mutates the tree it walks, per spec §4.5's
/// "Read-only" visitor category.
pub struct PrettyDumpVisitor {
    depth: usize,
}

impl PrettyDumpVisitor {
    fn indent(&self) -> String {
        "  ".repeat(self.depth)
    }

    fn header(&self, label: &str) -> String {
        format!("{}{}\n", self.indent(), label)
    }

    fn child(&mut self, node: &Node) -> String {
        self.depth += 1;
        let s = node.accept(self);
        self.depth -= 1;
        s
    }

    fn opt_child(&mut self, node: &Option<Node>) -> String {
        match node {
            Some(n) => self.child(n),
            None => String::new(),
        }
    }
}

impl Visitor for PrettyDumpVisitor {
    type Output = String;

    fn visit_program(&mut self, node: &Program) -> String {
        let mut out = self.header(&format!("Program({})", node.file_name));
        out.push_str(&self.opt_child(&node.comment));
        for stmt in &node.body {
            out.push_str(&self.child(stmt));
        }
        out
    }

    fn visit_comment(&mut self, node: &Comment) -> String {
        self.header(&format!("Comment({:?})", node.text))
    }

    fn visit_compiler_directive(&mut self, node: &CompilerDirective) -> String {
        self.header(&format!("CompilerDirective({:?})", node.text))
    }

    fn visit_suite(&mut self, node: &Suite) -> String {
        let mut out = self.header("Suite");
        for stmt in &node.statements {
            out.push_str(&self.child(stmt));
        }
        out
    }

    fn visit_var_decl(&mut self, node: &VarDecl) -> String {
        let mut out = self.header(&format!(
            "VarDecl({}{})",
            node.name,
            node.ty.as_ref().map(|t| format!(": {}", t.to_string_display())).unwrap_or_default()
        ));
        out.push_str(&self.opt_child(&node.value));
        out
    }

    fn visit_let_decl(&mut self, node: &LetDecl) -> String {
        let mut out = self.header(&format!(
            "LetDecl({}{})",
            node.name,
            node.ty.as_ref().map(|t| format!(": {}", t.to_string_display())).unwrap_or_default()
        ));
        out.push_str(&self.opt_child(&node.value));
        out
    }

    fn visit_const_decl(&mut self, node: &ConstDecl) -> String {
        let mut out = self.header(&format!("ConstDecl({:?}, {})", node.vis, node.name));
        out.push_str(&self.opt_child(&node.value));
        out
    }

    fn visit_func_decl(&mut self, node: &FuncDecl) -> String {
        let mut out = self.header(&format!("FuncDecl({})", node.name));
        out.push_str(&self.opt_child(&node.requires));
        out.push_str(&self.child(&node.body));
        out
    }

    fn visit_op_decl(&mut self, node: &OpDecl) -> String {
        let mut out = self.header(&format!("OpDecl({:?})", node.operator));
        out.push_str(&self.child(&node.body));
        out
    }

    fn visit_struct_decl(&mut self, node: &StructDecl) -> String {
        let mut out = self.header(&format!("StructDecl({:?}, {})", node.vis, node.name));
        out.push_str(&self.opt_child(&node.requires));
        out.push_str(&self.child(&node.body));
        out
    }

    fn visit_class_decl(&mut self, node: &ClassDecl) -> String {
        let mut out = self.header(&format!("ClassDecl({:?}, {})", node.vis, node.name));
        out.push_str(&self.opt_child(&node.requires));
        out.push_str(&self.child(&node.body));
        out
    }

    fn visit_inter_decl(&mut self, node: &InterDecl) -> String {
        let mut out = self.header(&format!("InterDecl({:?}, {})", node.vis, node.name));
        out.push_str(&self.opt_child(&node.requires));
        out.push_str(&self.child(&node.body));
        out
    }

    fn visit_enum_decl(&mut self, node: &EnumDecl) -> String {
        let mut out = self.header(&format!("EnumDecl({:?}, {})", node.vis, node.name));
        out.push_str(&self.child(&node.body));
        out
    }

    fn visit_union_decl(&mut self, node: &UnionDecl) -> String {
        let mut out = self.header(&format!("UnionDecl({:?}, {})", node.vis, node.name));
        out.push_str(&self.child(&node.body));
        out
    }

    fn visit_type_decl(&mut self, node: &TypeDecl) -> String {
        self.header(&format!("TypeDecl({}, = {})", node.name, node.value.to_string_display()))
    }

    fn visit_ffi_decl(&mut self, node: &FFIDecl) -> String {
        let mut out = self.header(&format!("FFIDecl({:?}, {})", node.specifier, node.name));
        out.push_str(&self.opt_child(&node.body));
        out
    }

    fn visit_requires_decl(&mut self, node: &RequiresDecl) -> String {
        self.header(&format!("RequiresDecl({} params, {} bounds)", node.params.len(), node.bounds.len()))
    }

    fn visit_assignment(&mut self, node: &Assignment) -> String {
        let mut out = self.header("Assignment");
        out.push_str(&self.child(&node.target));
        out.push_str(&self.child(&node.value));
        out
    }

    fn visit_for_loop(&mut self, node: &ForLoop) -> String {
        let mut out = self.header("ForLoop");
        out.push_str(&self.opt_child(&node.init));
        out.push_str(&self.opt_child(&node.cond));
        out.push_str(&self.opt_child(&node.update));
        out.push_str(&self.child(&node.body));
        out
    }

    fn visit_range_loop(&mut self, node: &RangeLoop) -> String {
        let mut out = self.header(&format!("RangeLoop({})", node.var));
        out.push_str(&self.child(&node.iterable));
        out.push_str(&self.child(&node.body));
        out
    }

    fn visit_while_loop(&mut self, node: &WhileLoop) -> String {
        let mut out = self.header("WhileLoop");
        out.push_str(&self.child(&node.cond));
        out.push_str(&self.child(&node.body));
        out
    }

    fn visit_if_statement(&mut self, node: &IfStatement) -> String {
        let mut out = self.header("IfStatement");
        out.push_str(&self.child(&node.cond));
        out.push_str(&self.child(&node.then_branch));
        out.push_str(&self.opt_child(&node.else_branch));
        out
    }

    fn visit_else_if_statement(&mut self, node: &ElseIfStatement) -> String {
        let mut out = self.header("ElseIfStatement");
        out.push_str(&self.child(&node.cond));
        out.push_str(&self.child(&node.then_branch));
        out.push_str(&self.opt_child(&node.else_branch));
        out
    }

    fn visit_else_statement(&mut self, node: &ElseStatement) -> String {
        let mut out = self.header("ElseStatement");
        out.push_str(&self.child(&node.body));
        out
    }

    fn visit_conditional_statement(&mut self, node: &ConditionalStatement) -> String {
        let mut out = self.header("ConditionalStatement");
        out.push_str(&self.child(&node.cond));
        out.push_str(&self.child(&node.then_expr));
        out.push_str(&self.child(&node.else_expr));
        out
    }

    fn visit_return_statement(&mut self, node: &ReturnStatement) -> String {
        let mut out = self.header("ReturnStatement");
        out.push_str(&self.opt_child(&node.value));
        out
    }

    fn visit_continue_statement(&mut self, _node: &ContinueStatement) -> String {
        self.header("ContinueStatement")
    }

    fn visit_break_statement(&mut self, _node: &BreakStatement) -> String {
        self.header("BreakStatement")
    }

    fn visit_yield_statement(&mut self, node: &YieldStatement) -> String {
        let mut out = self.header("YieldStatement");
        out.push_str(&self.opt_child(&node.value));
        out
    }

    fn visit_binary_op(&mut self, node: &BinaryOp) -> String {
        let mut out = self.header(&format!("BinaryOp({:?})", node.op));
        out.push_str(&self.child(&node.lhs));
        out.push_str(&self.child(&node.rhs));
        out
    }

    fn visit_unary_op(&mut self, node: &UnaryOp) -> String {
        let mut out = self.header(&format!("UnaryOp({:?}, prefix={})", node.op, node.prefix));
        out.push_str(&self.child(&node.operand));
        out
    }

    fn visit_literal(&mut self, node: &Literal) -> String {
        self.header(&format!("Literal({:?}, {})", node.kind, node.raw))
    }

    fn visit_identifier(&mut self, node: &Identifier) -> String {
        self.header(&format!("Identifier({})", node.name))
    }

    fn visit_dot_access(&mut self, node: &DotAccess) -> String {
        let mut out = self.header(&format!("DotAccess(.{})", node.member));
        out.push_str(&self.child(&node.base));
        out
    }

    fn visit_scope_access(&mut self, node: &ScopeAccess) -> String {
        let mut out = self.header(&format!("ScopeAccess(::{})", node.member));
        out.push_str(&self.child(&node.base));
        out
    }

    fn visit_path_access(&mut self, node: &PathAccess) -> String {
        self.header(&format!("PathAccess({})", node.segments.join("::")))
    }

    fn visit_function_call(&mut self, node: &FunctionCall) -> String {
        let mut out = self.header("FunctionCall");
        out.push_str(&self.child(&node.callee));
        for arg in &node.args {
            out.push_str(&self.child(arg));
        }
        out
    }

    fn visit_array_access(&mut self, node: &ArrayAccess) -> String {
        let mut out = self.header("ArrayAccess");
        out.push_str(&self.child(&node.base));
        out.push_str(&self.child(&node.index));
        out
    }

    fn visit_parenthesized(&mut self, node: &Parenthesized) -> String {
        let mut out = self.header("Parenthesized");
        out.push_str(&self.child(&node.inner));
        out
    }

    fn visit_conditional(&mut self, node: &Conditional) -> String {
        let mut out = self.header("Conditional");
        out.push_str(&self.child(&node.cond));
        out.push_str(&self.child(&node.then_expr));
        out.push_str(&self.child(&node.else_expr));
        out
    }

    fn visit_cast(&mut self, node: &Cast) -> String {
        let mut out = self.header(&format!("Cast(-> {})", node.target.to_string_display()));
        out.push_str(&self.child(&node.expr));
        out
    }

    fn visit_generic_invocation(&mut self, node: &GenericInvocation) -> String {
        let args = node.type_args.iter().map(|t| t.to_string_display()).collect::<Vec<_>>().join(", ");
        let mut out = self.header(&format!("GenericInvocation(<{args}>)"));
        out.push_str(&self.child(&node.base));
        for arg in &node.args {
            out.push_str(&self.child(arg));
        }
        out
    }

    fn visit_object_invocation(&mut self, node: &ObjectInvocation) -> String {
        let mut out = self.header(&format!(
            "ObjectInvocation({})",
            node.ty.as_ref().map(TypeExpr::to_string_display).unwrap_or_default()
        ));
        for (name, value) in &node.fields {
            out.push_str(&self.header(&format!("  {name}:")));
            out.push_str(&self.child(value));
        }
        out
    }

    fn visit_structure_invocation(&mut self, node: &StructureInvocation) -> String {
        let mut out = self.header(&format!("StructureInvocation({})", node.ty.to_string_display()));
        for arg in &node.args {
            out.push_str(&self.child(arg));
        }
        out
    }
}
