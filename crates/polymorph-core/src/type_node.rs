//! Structured model of synthesized TypeScript types.
//!
//! Replacement types are assembled from [`TypeNode`] values and rendered
//! through [`fmt::Display`], so the printer is the only place that decides
//! punctuation and spacing.

use std::fmt;

/// A TypeScript type expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeNode {
    /// A named type with optional type arguments: `Name<A, B>`.
    Reference { name: String, args: Vec<TypeNode> },
    /// A single-quoted string literal type: `'Post'`.
    StringLiteral(String),
    /// An object type literal: `{ key: Type }`.
    Object(Vec<PropertyNode>),
    /// `A & B`
    Intersection(Vec<TypeNode>),
    /// `A | B`
    Union(Vec<TypeNode>),
    /// `(A)`
    Parenthesized(Box<TypeNode>),
}

/// A property of an object type literal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyNode {
    name: String,
    ty: TypeNode,
}

impl PropertyNode {
    pub fn new(name: impl Into<String>, ty: TypeNode) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ty(&self) -> &TypeNode {
        &self.ty
    }
}

impl TypeNode {
    /// Creates a type reference without type arguments.
    pub fn reference(name: impl Into<String>) -> Self {
        Self::Reference {
            name: name.into(),
            args: Vec::new(),
        }
    }

    /// Appends type arguments to a reference. Other nodes are returned unchanged.
    pub fn with_args(self, new_args: impl IntoIterator<Item = TypeNode>) -> Self {
        match self {
            Self::Reference { name, mut args } => {
                args.extend(new_args);
                Self::Reference { name, args }
            }
            other => other,
        }
    }

    pub fn string_literal(value: impl Into<String>) -> Self {
        Self::StringLiteral(value.into())
    }

    pub fn object(properties: impl IntoIterator<Item = PropertyNode>) -> Self {
        Self::Object(properties.into_iter().collect())
    }

    pub fn intersection(members: impl IntoIterator<Item = TypeNode>) -> Self {
        Self::Intersection(members.into_iter().collect())
    }

    pub fn union(members: impl IntoIterator<Item = TypeNode>) -> Self {
        Self::Union(members.into_iter().collect())
    }

    pub fn parenthesized(inner: TypeNode) -> Self {
        Self::Parenthesized(Box::new(inner))
    }
}

fn write_joined(f: &mut fmt::Formatter<'_>, nodes: &[TypeNode], separator: &str) -> fmt::Result {
    for (idx, node) in nodes.iter().enumerate() {
        if idx > 0 {
            f.write_str(separator)?;
        }
        write!(f, "{node}")?;
    }
    Ok(())
}

impl fmt::Display for TypeNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Reference { name, args } => {
                f.write_str(name)?;
                if !args.is_empty() {
                    f.write_str("<")?;
                    write_joined(f, args, ", ")?;
                    f.write_str(">")?;
                }
                Ok(())
            }
            Self::StringLiteral(value) => {
                f.write_str("'")?;
                for ch in value.chars() {
                    match ch {
                        '\'' => f.write_str("\\'")?,
                        '\\' => f.write_str("\\\\")?,
                        _ => write!(f, "{ch}")?,
                    }
                }
                f.write_str("'")
            }
            Self::Object(properties) => {
                if properties.is_empty() {
                    return f.write_str("{}");
                }
                f.write_str("{ ")?;
                for (idx, property) in properties.iter().enumerate() {
                    if idx > 0 {
                        f.write_str("; ")?;
                    }
                    write!(f, "{}: {}", property.name, property.ty)?;
                }
                f.write_str(" }")
            }
            Self::Intersection(members) => write_joined(f, members, " & "),
            Self::Union(members) => write_joined(f, members, " | "),
            Self::Parenthesized(inner) => write!(f, "({inner})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_rendering() {
        assert_eq!(TypeNode::reference("Date").to_string(), "Date");
        assert_eq!(
            TypeNode::reference("$PostPayload")
                .with_args([TypeNode::reference("ExtArgs")])
                .to_string(),
            "$PostPayload<ExtArgs>"
        );
        assert_eq!(
            TypeNode::reference("Map")
                .with_args([TypeNode::reference("K"), TypeNode::reference("V")])
                .to_string(),
            "Map<K, V>"
        );
    }

    #[test]
    fn test_string_literal_escaping() {
        assert_eq!(TypeNode::string_literal("Post").to_string(), "'Post'");
        assert_eq!(TypeNode::string_literal("it's").to_string(), "'it\\'s'");
    }

    #[test]
    fn test_object_rendering() {
        assert_eq!(TypeNode::object([]).to_string(), "{}");

        let nested = TypeNode::object([PropertyNode::new(
            "scalars",
            TypeNode::object([PropertyNode::new(
                "delegatedType",
                TypeNode::string_literal("Post"),
            )]),
        )]);
        assert_eq!(
            nested.to_string(),
            "{ scalars: { delegatedType: 'Post' } }"
        );

        let pair = TypeNode::object([
            PropertyNode::new("a", TypeNode::reference("A")),
            PropertyNode::new("b", TypeNode::reference("B")),
        ]);
        assert_eq!(pair.to_string(), "{ a: A; b: B }");
    }

    #[test]
    fn test_union_of_parenthesized_intersections() {
        let member = |name: &str| {
            TypeNode::parenthesized(TypeNode::intersection([
                TypeNode::reference(name),
                TypeNode::object([]),
            ]))
        };
        let union = TypeNode::union([member("A"), member("B")]);

        assert_eq!(union.to_string(), "(A & {}) | (B & {})");
    }

    #[test]
    fn test_with_args_ignores_non_references() {
        let literal = TypeNode::string_literal("x").with_args([TypeNode::reference("T")]);
        assert_eq!(literal, TypeNode::string_literal("x"));
    }
}
