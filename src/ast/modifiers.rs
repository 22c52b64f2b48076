//! Modifier enums attached to declarations. Declaration order and members
//! follow spec §3's "Modifier enums" bullet verbatim.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AccessSpecifier {
    #[default]
    Public,
    Private,
    Protected,
    Internal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageSpecifier {
    Ffi,
    Static,
    Async,
    Eval,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeQualifier {
    Const,
    Module,
    Yield,
    Async,
    Ffi,
    Static,
    Macro,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FunctionSpecifier {
    Inline,
    Async,
    Static,
    Const,
    Eval,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FunctionQualifier {
    Default,
    Panic,
    Delete,
    Const,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FFISpecifier {
    Class,
    Interface,
    Struct,
    Enum,
    Union,
    Type,
}
