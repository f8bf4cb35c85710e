//! Naming conventions of the generated client declarations.

use polymorph_core::delegate::DelegateGraph;

/// Prefix of internal bookkeeping members.
pub const AUX_MEMBER_PREFIX: &str = "poly_aux_";

/// Nested write operations removed from delegate create/update inputs.
pub const UNSAFE_NESTED_WRITES: &[&str] =
    &["create", "update", "updateMany", "upsert", "connectOrCreate"];

/// Accessor methods removed from `<Delegate>Delegate` interfaces.
pub const UNSAFE_ACCESSOR_METHODS: &[&str] = &["create", "upsert"];

/// Property path holding the discriminator inside a payload.
pub const DISCRIMINATOR_SCOPE: &str = "scalars";
pub const DISCRIMINATOR_FIELD: &str = "delegatedType";

pub fn is_aux_member(name: &str) -> bool {
    name.starts_with(AUX_MEMBER_PREFIX)
}

pub fn is_unsafe_nested_write(name: &str) -> bool {
    UNSAFE_NESTED_WRITES.contains(&name)
}

pub fn is_unsafe_accessor_method(name: &str) -> bool {
    UNSAFE_ACCESSOR_METHODS.contains(&name)
}

/// `$<Entity>Payload`
pub fn payload_alias(entity: &str) -> String {
    format!("${entity}Payload")
}

/// Returns the entity named by a `$<Entity>Payload` alias.
pub fn payload_entity(alias: &str) -> Option<&str> {
    alias
        .strip_prefix('$')?
        .strip_suffix("Payload")
        .filter(|entity| !entity.is_empty())
}

/// Returns the entity named by a `<Entity>Delegate` interface.
pub fn accessor_entity(interface: &str) -> Option<&str> {
    interface
        .strip_suffix("Delegate")
        .filter(|entity| !entity.is_empty())
}

/// Returns the delegate whose create/update input alias `alias` is.
///
/// The delegate name must be a prefix of the alias, followed by an
/// optional `Unchecked`, then `Create` or `Update`, and the alias must end
/// in `Input`.
pub fn input_alias_delegate<'g>(alias: &str, graph: &'g DelegateGraph) -> Option<&'g str> {
    graph
        .relations()
        .map(|relation| relation.delegate().as_str())
        .find(|delegate| is_input_alias_of(alias, delegate))
}

fn is_input_alias_of(alias: &str, delegate: &str) -> bool {
    let Some(rest) = alias.strip_prefix(delegate) else {
        return false;
    };
    let rest = rest.strip_prefix("Unchecked").unwrap_or(rest);
    ["Create", "Update"]
        .iter()
        .filter_map(|op| rest.strip_prefix(op))
        .any(|tail| tail.ends_with("Input"))
}

#[cfg(test)]
mod tests {
    use polymorph_core::{
        identifier::Ident,
        schema::{Attribute, DELEGATE_ATTRIBUTE, Entity, Model},
    };

    use super::*;

    fn graph(delegates: &[&str]) -> DelegateGraph {
        let entities = delegates
            .iter()
            .map(|name| {
                Entity::new(Ident::new(name).unwrap())
                    .with_attribute(Attribute::new(DELEGATE_ATTRIBUTE))
            })
            .collect();
        DelegateGraph::build(&Model::new(entities))
    }

    #[test]
    fn test_payload_names() {
        assert_eq!(payload_alias("Activity"), "$ActivityPayload");
        assert_eq!(payload_entity("$ActivityPayload"), Some("Activity"));
        assert_eq!(payload_entity("ActivityPayload"), None);
        assert_eq!(payload_entity("$Payload"), None);
    }

    #[test]
    fn test_accessor_names() {
        assert_eq!(accessor_entity("ActivityDelegate"), Some("Activity"));
        assert_eq!(accessor_entity("Delegate"), None);
        assert_eq!(accessor_entity("ActivityClient"), None);
    }

    #[test]
    fn test_input_alias_matching() {
        let graph = graph(&["Activity", "Asset"]);

        for alias in [
            "ActivityCreateInput",
            "ActivityUncheckedCreateInput",
            "ActivityUpdateInput",
            "ActivityUncheckedUpdateManyInput",
            "ActivityCreateOrConnectWithoutOwnerInput",
            "AssetUpdateWithoutOwnerInput",
        ] {
            assert!(input_alias_delegate(alias, &graph).is_some(), "{alias}");
        }
        assert_eq!(
            input_alias_delegate("AssetCreateInput", &graph),
            Some("Asset")
        );

        for alias in [
            "ImageAssetCreateInput",
            "ActivityWhereInput",
            "ActivityCreateArgs",
            "ActivityUncheckedInput",
            "PostCreateInput",
        ] {
            assert!(input_alias_delegate(alias, &graph).is_none(), "{alias}");
        }
    }

    #[test]
    fn test_unsafe_sets() {
        for name in UNSAFE_NESTED_WRITES {
            assert!(is_unsafe_nested_write(name));
        }
        assert!(!is_unsafe_nested_write("connect"));
        assert!(is_unsafe_accessor_method("upsert"));
        assert!(!is_unsafe_accessor_method("update"));
        assert!(is_aux_member("poly_aux_post"));
        assert!(!is_aux_member("poly_post"));
    }
}
