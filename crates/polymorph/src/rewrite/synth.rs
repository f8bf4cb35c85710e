//! Synthesis of the discriminated payload union of a delegate.

use polymorph_core::{
    identifier::Ident,
    type_node::{PropertyNode, TypeNode},
};

use crate::rewrite::naming::{DISCRIMINATOR_FIELD, DISCRIMINATOR_SCOPE, payload_alias};

/// Builds the replacement type of a delegate's payload alias.
///
/// Each subtype contributes `($SPayload<Params> & { scalars: { delegatedType: 'S' } })`,
/// in subtype order. `type_params` are the alias's own parameter names and
/// are passed through to every subtype payload.
pub fn payload_union(subtypes: &[Ident], type_params: &[&str]) -> TypeNode {
    TypeNode::union(subtypes.iter().map(|subtype| {
        let payload = TypeNode::reference(payload_alias(subtype.as_str()))
            .with_args(type_params.iter().map(|param| TypeNode::reference(*param)));
        TypeNode::parenthesized(TypeNode::intersection([payload, discriminator(subtype)]))
    }))
}

/// `{ scalars: { delegatedType: 'S' } }`
fn discriminator(subtype: &Ident) -> TypeNode {
    TypeNode::object([PropertyNode::new(
        DISCRIMINATOR_SCOPE,
        TypeNode::object([PropertyNode::new(
            DISCRIMINATOR_FIELD,
            TypeNode::string_literal(subtype.as_str()),
        )]),
    )])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn idents(names: &[&str]) -> Vec<Ident> {
        names.iter().map(|name| Ident::new(name).unwrap()).collect()
    }

    #[test]
    fn test_two_subtypes_in_order() {
        let union = payload_union(&idents(&["Post", "Comment"]), &["ExtArgs"]);
        assert_eq!(
            union.to_string(),
            "($PostPayload<ExtArgs> & { scalars: { delegatedType: 'Post' } }) | \
             ($CommentPayload<ExtArgs> & { scalars: { delegatedType: 'Comment' } })"
        );
    }

    #[test]
    fn test_parameters_are_forwarded() {
        let union = payload_union(&idents(&["Video"]), &["ExtArgs", "ClientOptions"]);
        assert_eq!(
            union.to_string(),
            "($VideoPayload<ExtArgs, ClientOptions> & { scalars: { delegatedType: 'Video' } })"
        );

        let bare = payload_union(&idents(&["Video"]), &[]);
        assert_eq!(
            bare.to_string(),
            "($VideoPayload & { scalars: { delegatedType: 'Video' } })"
        );
    }
}
