//! Syntax tree of a schema file.
//!
//! Only model declarations are kept; other top-level blocks are skipped by
//! the parser. Attribute arguments are recorded as spans and sliced from the
//! source during elaboration.

use crate::span::{Span, Spanned};

#[derive(Debug, Clone, PartialEq)]
pub struct SchemaFile {
    pub models: Vec<ModelDecl>,
}

/// `abstract? model Name extends A, B { ... }`
#[derive(Debug, Clone, PartialEq)]
pub struct ModelDecl {
    pub is_abstract: bool,
    pub name: Spanned<String>,
    pub super_types: Vec<Spanned<String>>,
    pub fields: Vec<FieldDecl>,
    pub attributes: Vec<AttributeDecl>,
    pub span: Span,
}

/// `name Type[]? @attr(args)`
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDecl {
    pub name: Spanned<String>,
    pub type_name: Spanned<String>,
    pub is_array: bool,
    pub is_optional: bool,
    pub attributes: Vec<AttributeDecl>,
}

/// `@name(args)` or `@@name(args)`. The name keeps its sigil.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeDecl {
    pub name: Spanned<String>,
    /// Span of the text between the parentheses.
    pub args: Option<Span>,
}
