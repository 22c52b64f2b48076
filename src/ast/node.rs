//! Node variants and the tagged-sum-type [`Node`] enum.
//!
//! Every struct here carries a `span` field. `Node` itself stays
//! pointer-sized: each variant boxes its payload, so adding fields to one
//! node type never grows every other variant.

use crate::token::{LiteralKind, Operator};

use super::modifiers::{AccessSpecifier, FFISpecifier, FunctionSpecifier};
use super::span::Span;
use super::ty::TypeExpr;
use super::visitor::Visitor;

macro_rules! node_enum {
    ($($variant:ident => $visit:ident),+ $(,)?) => {
        #[derive(Debug, Clone)]
        pub enum Node {
            $($variant(Box<$variant>)),+
        }

        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum NodeKind {
            $($variant),+
        }

        impl Node {
            pub fn node_kind(&self) -> NodeKind {
                match self {
                    $(Node::$variant(_) => NodeKind::$variant),+
                }
            }

            pub fn span(&self) -> Span {
                match self {
                    $(Node::$variant(n) => n.span),+
                }
            }

            pub fn accept<V: Visitor>(&self, visitor: &mut V) -> V::Output {
                match self {
                    $(Node::$variant(n) => visitor.$visit(n)),+
                }
            }

            pub fn to_string(&self, depth: usize) -> String {
                super::pretty::dump(self, depth)
            }
        }

        $(
            impl From<$variant> for Node {
                fn from(n: $variant) -> Node {
                    Node::$variant(Box::new(n))
                }
            }
        )+
    };
}

node_enum! {
    Program => visit_program,
    Comment => visit_comment,
    CompilerDirective => visit_compiler_directive,
    Suite => visit_suite,
    VarDecl => visit_var_decl,
    LetDecl => visit_let_decl,
    ConstDecl => visit_const_decl,
    FuncDecl => visit_func_decl,
    OpDecl => visit_op_decl,
    StructDecl => visit_struct_decl,
    ClassDecl => visit_class_decl,
    InterDecl => visit_inter_decl,
    EnumDecl => visit_enum_decl,
    UnionDecl => visit_union_decl,
    TypeDecl => visit_type_decl,
    FFIDecl => visit_ffi_decl,
    RequiresDecl => visit_requires_decl,
    Assignment => visit_assignment,
    ForLoop => visit_for_loop,
    RangeLoop => visit_range_loop,
    WhileLoop => visit_while_loop,
    IfStatement => visit_if_statement,
    ElseIfStatement => visit_else_if_statement,
    ElseStatement => visit_else_statement,
    ConditionalStatement => visit_conditional_statement,
    ReturnStatement => visit_return_statement,
    ContinueStatement => visit_continue_statement,
    BreakStatement => visit_break_statement,
    YieldStatement => visit_yield_statement,
    BinaryOp => visit_binary_op,
    UnaryOp => visit_unary_op,
    Literal => visit_literal,
    Identifier => visit_identifier,
    DotAccess => visit_dot_access,
    ScopeAccess => visit_scope_access,
    PathAccess => visit_path_access,
    FunctionCall => visit_function_call,
    ArrayAccess => visit_array_access,
    Parenthesized => visit_parenthesized,
    Conditional => visit_conditional,
    Cast => visit_cast,
    GenericInvocation => visit_generic_invocation,
    ObjectInvocation => visit_object_invocation,
    StructureInvocation => visit_structure_invocation,
}

#[derive(Debug, Clone)]
pub struct Program {
    pub span: Span,
    pub file_name: String,
    pub comment: Option<Node>,
    pub body: Vec<Node>,
}

/// `owner` is a non-owning index into the enclosing `Program.body` (or a
/// per-file interning table for comments nested deeper than top level),
/// never a pointer back into the tree -- see spec §9's cycle-avoidance note.
#[derive(Debug, Clone)]
pub struct Comment {
    pub span: Span,
    pub text: String,
    pub owner: Option<usize>,
}

#[derive(Debug, Clone)]
pub struct CompilerDirective {
    pub span: Span,
    pub text: String,
}

#[derive(Debug, Clone)]
pub struct Suite {
    pub span: Span,
    pub statements: Vec<Node>,
}

#[derive(Debug, Clone)]
pub struct VarDecl {
    pub span: Span,
    pub name: String,
    pub ty: Option<TypeExpr>,
    pub value: Option<Node>,
}

#[derive(Debug, Clone)]
pub struct LetDecl {
    pub span: Span,
    pub name: String,
    pub ty: Option<TypeExpr>,
    pub value: Option<Node>,
}

#[derive(Debug, Clone)]
pub struct ConstDecl {
    pub span: Span,
    pub vis: AccessSpecifier,
    pub name: String,
    pub ty: Option<TypeExpr>,
    pub value: Option<Node>,
}

#[derive(Debug, Clone)]
pub struct FuncDecl {
    pub span: Span,
    pub specifiers: Vec<FunctionSpecifier>,
    pub name: String,
    pub params: Vec<VarDecl>,
    pub return_type: Option<TypeExpr>,
    pub requires: Option<Node>,
    pub body: Node,
}

#[derive(Debug, Clone)]
pub struct OpDecl {
    pub span: Span,
    pub operator: Operator,
    pub params: Vec<VarDecl>,
    pub return_type: Option<TypeExpr>,
    pub body: Node,
}

/// One base type in a derive list, with the visibility it's inherited at.
#[derive(Debug, Clone)]
pub struct DeriveEntry {
    pub vis: Option<AccessSpecifier>,
    pub ty: TypeExpr,
}

#[derive(Debug, Clone)]
pub struct StructDecl {
    pub span: Span,
    pub is_const: bool,
    pub vis: AccessSpecifier,
    pub name: String,
    pub derives: Option<Vec<DeriveEntry>>,
    pub requires: Option<Node>,
    pub body: Node,
}

#[derive(Debug, Clone)]
pub struct ClassDecl {
    pub span: Span,
    pub is_const: bool,
    pub vis: AccessSpecifier,
    pub name: String,
    pub derives: Option<Vec<DeriveEntry>>,
    pub requires: Option<Node>,
    pub body: Node,
}

#[derive(Debug, Clone)]
pub struct InterDecl {
    pub span: Span,
    pub vis: AccessSpecifier,
    pub name: String,
    pub derives: Option<Vec<DeriveEntry>>,
    pub requires: Option<Node>,
    pub body: Node,
}

#[derive(Debug, Clone)]
pub struct EnumDecl {
    pub span: Span,
    pub vis: AccessSpecifier,
    pub derives: Option<TypeExpr>,
    pub name: String,
    pub body: Node,
}

#[derive(Debug, Clone)]
pub struct UnionDecl {
    pub span: Span,
    pub vis: AccessSpecifier,
    pub name: String,
    pub body: Node,
}

#[derive(Debug, Clone)]
pub struct TypeDecl {
    pub span: Span,
    pub vis: AccessSpecifier,
    pub name: String,
    pub requires: Option<Node>,
    pub value: TypeExpr,
}

#[derive(Debug, Clone)]
pub struct FFIDecl {
    pub span: Span,
    pub specifier: FFISpecifier,
    pub name: String,
    pub body: Option<Node>,
}

#[derive(Debug, Clone)]
pub struct RequiresParamDecl {
    pub is_const: bool,
    pub name: String,
    pub ty: Option<TypeExpr>,
    pub default: Option<TypeExpr>,
}

#[derive(Debug, Clone)]
pub struct TypeBoundDecl {
    pub instance_of: TypeExpr,
}

#[derive(Debug, Clone)]
pub struct RequiresDecl {
    pub span: Span,
    pub params: Vec<RequiresParamDecl>,
    pub bounds: Vec<TypeBoundDecl>,
}

#[derive(Debug, Clone)]
pub struct Assignment {
    pub span: Span,
    pub target: Node,
    pub value: Node,
}

#[derive(Debug, Clone)]
pub struct ForLoop {
    pub span: Span,
    pub init: Option<Node>,
    pub cond: Option<Node>,
    pub update: Option<Node>,
    pub body: Node,
}

#[derive(Debug, Clone)]
pub struct RangeLoop {
    pub span: Span,
    pub var: String,
    pub iterable: Node,
    pub body: Node,
}

#[derive(Debug, Clone)]
pub struct WhileLoop {
    pub span: Span,
    pub cond: Node,
    pub body: Node,
}

#[derive(Debug, Clone)]
pub struct IfStatement {
    pub span: Span,
    pub cond: Node,
    pub then_branch: Node,
    /// Either an `ElseIfStatement` or an `ElseStatement`.
    pub else_branch: Option<Node>,
}

#[derive(Debug, Clone)]
pub struct ElseIfStatement {
    pub span: Span,
    pub cond: Node,
    pub then_branch: Node,
    pub else_branch: Option<Node>,
}

#[derive(Debug, Clone)]
pub struct ElseStatement {
    pub span: Span,
    pub body: Node,
}

#[derive(Debug, Clone)]
pub struct ConditionalStatement {
    pub span: Span,
    pub cond: Node,
    pub then_expr: Node,
    pub else_expr: Node,
}

#[derive(Debug, Clone)]
pub struct ReturnStatement {
    pub span: Span,
    pub value: Option<Node>,
}

#[derive(Debug, Clone)]
pub struct ContinueStatement {
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct BreakStatement {
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct YieldStatement {
    pub span: Span,
    pub value: Option<Node>,
}

#[derive(Debug, Clone)]
pub struct BinaryOp {
    pub span: Span,
    pub op: Operator,
    pub lhs: Node,
    pub rhs: Node,
}

#[derive(Debug, Clone)]
pub struct UnaryOp {
    pub span: Span,
    pub op: Operator,
    pub operand: Node,
    pub prefix: bool,
}

#[derive(Debug, Clone)]
pub struct Literal {
    pub span: Span,
    pub kind: LiteralKind,
    pub raw: String,
}

#[derive(Debug, Clone)]
pub struct Identifier {
    pub span: Span,
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct DotAccess {
    pub span: Span,
    pub base: Node,
    pub member: String,
}

#[derive(Debug, Clone)]
pub struct ScopeAccess {
    pub span: Span,
    pub base: Node,
    pub member: String,
}

#[derive(Debug, Clone)]
pub struct PathAccess {
    pub span: Span,
    pub segments: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct FunctionCall {
    pub span: Span,
    pub callee: Node,
    pub args: Vec<Node>,
}

#[derive(Debug, Clone)]
pub struct ArrayAccess {
    pub span: Span,
    pub base: Node,
    pub index: Node,
}

#[derive(Debug, Clone)]
pub struct Parenthesized {
    pub span: Span,
    pub inner: Node,
}

#[derive(Debug, Clone)]
pub struct Conditional {
    pub span: Span,
    pub cond: Node,
    pub then_expr: Node,
    pub else_expr: Node,
}

#[derive(Debug, Clone)]
pub struct Cast {
    pub span: Span,
    pub expr: Node,
    pub target: TypeExpr,
}

#[derive(Debug, Clone)]
pub struct GenericInvocation {
    pub span: Span,
    pub base: Node,
    pub type_args: Vec<TypeExpr>,
    pub args: Vec<Node>,
}

#[derive(Debug, Clone)]
pub struct ObjectInvocation {
    pub span: Span,
    pub ty: Option<TypeExpr>,
    pub fields: Vec<(String, Node)>,
}

#[derive(Debug, Clone)]
pub struct StructureInvocation {
    pub span: Span,
    pub ty: TypeExpr,
    pub args: Vec<Node>,
}
