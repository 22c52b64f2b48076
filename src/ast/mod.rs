//! The polymorphic AST and its visitor contract.
//!
//! Modeled as a tagged sum type (spec §9's "preferred in languages with sum
//! types" shape): [`Node`] is an enum whose variants each box a small data
//! struct, `node_kind()` is the enum discriminant, and `accept` dispatches
//! to the matching [`Visitor`] method.

mod json;
mod modifiers;
mod node;
mod pretty;
mod span;
mod ty;
mod visitor;

pub use json::{dump as to_json, JsonDumpVisitor};
pub use modifiers::{AccessSpecifier, FFISpecifier, FunctionQualifier, FunctionSpecifier, StorageSpecifier, TypeQualifier};
pub use node::*;
pub use pretty::PrettyDumpVisitor;
pub use span::Span;
pub use ty::TypeExpr;
pub use visitor::Visitor;
