use crate::token::Primitive;

/// A type expression as it appears in a signature, variable annotation, or
/// `requires` bound. Kept intentionally small: the core parses and carries
/// type syntax but performs no resolution or checking (spec §1 non-goals).
#[derive(Debug, Clone, PartialEq)]
pub enum TypeExpr {
    Primitive(Primitive),
    Named(String),
    Pointer(Box<TypeExpr>),
    Generic { base: String, args: Vec<TypeExpr> },
}

impl TypeExpr {
    pub fn to_string_display(&self) -> String {
        match self {
            TypeExpr::Primitive(p) => format!("{p:?}").to_lowercase(),
            TypeExpr::Named(name) => name.clone(),
            TypeExpr::Pointer(inner) => format!("*{}", inner.to_string_display()),
            TypeExpr::Generic { base, args } => {
                let args = args.iter().map(TypeExpr::to_string_display).collect::<Vec<_>>().join(", ");
                format!("{base}<{args}>")
            }
        }
    }
}
