//! Skeleton syntax tree for TypeScript declaration files.
//!
//! The tree records only what the rewrite pass needs to address: named
//! declarations, their members, and the object-type literals nested inside
//! type expressions. Everything else is kept as source spans so edits can be
//! applied to the original text without re-printing it.

use crate::span::{Span, Spanned};

/// A parsed declaration file.
#[derive(Debug, Clone, PartialEq)]
pub struct DeclarationTree {
    statements: Vec<Statement>,
    span: Span,
}

impl DeclarationTree {
    pub fn new(statements: Vec<Statement>, span: Span) -> Self {
        Self { statements, span }
    }

    /// Top-level statements in source order.
    pub fn statements(&self) -> &[Statement] {
        &self.statements
    }

    pub fn span(&self) -> Span {
        self.span
    }
}

/// A statement at file or namespace level.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    TypeAlias(TypeAlias),
    Interface(Interface),
    Class(Class),
    Namespace(Namespace),
    /// Any other statement (imports, exports, enums, variables, functions).
    Other(OtherStatement),
}

impl Statement {
    pub fn span(&self) -> Span {
        match self {
            Statement::TypeAlias(alias) => alias.span,
            Statement::Interface(interface) => interface.span,
            Statement::Class(class) => class.span,
            Statement::Namespace(namespace) => namespace.span,
            Statement::Other(other) => other.span,
        }
    }

    /// The declared name, if the statement declares a named type or scope.
    pub fn name(&self) -> Option<&str> {
        match self {
            Statement::TypeAlias(alias) => Some(alias.name()),
            Statement::Interface(interface) => Some(interface.name()),
            Statement::Class(class) => Some(class.name()),
            Statement::Namespace(namespace) => Some(namespace.name()),
            Statement::Other(_) => None,
        }
    }
}

/// A generic type parameter: `ExtArgs extends InternalArgs = DefaultArgs`.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeParam {
    name: Spanned<String>,
    span: Span,
}

impl TypeParam {
    pub fn new(name: Spanned<String>, span: Span) -> Self {
        Self { name, span }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn name_span(&self) -> Span {
        self.name.span()
    }

    /// Span of the whole parameter, constraint and default included.
    pub fn span(&self) -> Span {
        self.span
    }
}

/// A type expression, kept as a span plus its nested object-type literals.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeExpr {
    objects: Vec<ObjectType>,
    span: Span,
}

impl TypeExpr {
    pub fn new(objects: Vec<ObjectType>, span: Span) -> Self {
        Self { objects, span }
    }

    /// Outermost object-type literals, in source order.
    pub fn objects(&self) -> &[ObjectType] {
        &self.objects
    }

    pub fn span(&self) -> Span {
        self.span
    }
}

/// `type Name<Params> = Type`
#[derive(Debug, Clone, PartialEq)]
pub struct TypeAlias {
    name: Spanned<String>,
    type_params: Vec<TypeParam>,
    ty: TypeExpr,
    span: Span,
}

impl TypeAlias {
    pub fn new(name: Spanned<String>, type_params: Vec<TypeParam>, ty: TypeExpr, span: Span) -> Self {
        Self {
            name,
            type_params,
            ty,
            span,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn name_span(&self) -> Span {
        self.name.span()
    }

    pub fn type_params(&self) -> &[TypeParam] {
        &self.type_params
    }

    /// The aliased type. Its span is what a type replacement rewrites.
    pub fn ty(&self) -> &TypeExpr {
        &self.ty
    }

    pub fn span(&self) -> Span {
        self.span
    }
}

/// Shared shape of interfaces and classes: a named body of members.
#[derive(Debug, Clone, PartialEq)]
pub struct MemberBlock {
    name: Spanned<String>,
    type_params: Vec<TypeParam>,
    members: Vec<Member>,
    span: Span,
}

impl MemberBlock {
    pub fn new(
        name: Spanned<String>,
        type_params: Vec<TypeParam>,
        members: Vec<Member>,
        span: Span,
    ) -> Self {
        Self {
            name,
            type_params,
            members,
            span,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn name_span(&self) -> Span {
        self.name.span()
    }

    pub fn type_params(&self) -> &[TypeParam] {
        &self.type_params
    }

    pub fn members(&self) -> &[Member] {
        &self.members
    }

    pub fn span(&self) -> Span {
        self.span
    }
}

/// `interface Name<Params> extends Base { ... }`
pub type Interface = MemberBlock;

/// `class Name<Params> extends Base implements Other { ... }`
pub type Class = MemberBlock;

/// `namespace Name { ... }`, `module 'name' { ... }` or `global { ... }`.
#[derive(Debug, Clone, PartialEq)]
pub struct Namespace {
    name: Spanned<String>,
    statements: Vec<Statement>,
    span: Span,
}

impl Namespace {
    pub fn new(name: Spanned<String>, statements: Vec<Statement>, span: Span) -> Self {
        Self {
            name,
            statements,
            span,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn statements(&self) -> &[Statement] {
        &self.statements
    }

    pub fn span(&self) -> Span {
        self.span
    }
}

/// A statement the rewrite pass never edits directly.
///
/// Object-type literals found in variable and function declarations are
/// still recorded so their members stay reachable.
#[derive(Debug, Clone, PartialEq)]
pub struct OtherStatement {
    objects: Vec<ObjectType>,
    span: Span,
}

impl OtherStatement {
    pub fn new(objects: Vec<ObjectType>, span: Span) -> Self {
        Self { objects, span }
    }

    pub fn objects(&self) -> &[ObjectType] {
        &self.objects
    }

    pub fn span(&self) -> Span {
        self.span
    }
}

/// An object-type literal: `{ a: A; b(): B }`.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectType {
    members: Vec<Member>,
    span: Span,
}

impl ObjectType {
    pub fn new(members: Vec<Member>, span: Span) -> Self {
        Self { members, span }
    }

    pub fn members(&self) -> &[Member] {
        &self.members
    }

    pub fn span(&self) -> Span {
        self.span
    }
}

/// The syntactic form of a member.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberKind {
    /// `name?: Type`
    Property,
    /// `name<T>(args): Ret`, including accessors and constructors.
    Method,
    /// `[key: string]: Type` and mapped-type members.
    Index,
    /// `(args): Ret`
    CallSignature,
    /// `new (args): Ret`
    ConstructSignature,
}

/// A member of an interface, class or object-type literal.
#[derive(Debug, Clone, PartialEq)]
pub struct Member {
    kind: MemberKind,
    name: Option<Spanned<String>>,
    optional: bool,
    objects: Vec<ObjectType>,
    span: Span,
}

impl Member {
    pub fn new(kind: MemberKind, name: Option<Spanned<String>>, span: Span) -> Self {
        Self {
            kind,
            name,
            optional: false,
            objects: Vec::new(),
            span,
        }
    }

    pub fn with_optional(mut self, optional: bool) -> Self {
        self.optional = optional;
        self
    }

    pub fn with_objects(mut self, objects: Vec<ObjectType>) -> Self {
        self.objects = objects;
        self
    }

    pub fn kind(&self) -> MemberKind {
        self.kind
    }

    /// The member name. String-literal names are unquoted; computed and
    /// signature members have no name.
    pub fn name(&self) -> Option<&str> {
        self.name.as_ref().map(|name| name.as_str())
    }

    pub fn is_optional(&self) -> bool {
        self.optional
    }

    /// Object-type literals in the member's type annotation or signature.
    pub fn objects(&self) -> &[ObjectType] {
        &self.objects
    }

    /// Removal span: leading comments on their own lines, the member, and
    /// its trailing `;` or `,` separator.
    pub fn span(&self) -> Span {
        self.span
    }

    /// Returns `true` for property and method members, the signature forms
    /// that carry a plain name.
    pub fn is_named_signature(&self) -> bool {
        matches!(self.kind, MemberKind::Property | MemberKind::Method)
    }
}
