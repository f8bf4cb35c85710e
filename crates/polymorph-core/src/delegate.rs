//! Delegate entities and their concrete subtypes.
//!
//! The [`DelegateGraph`] maps every delegate (an entity carrying
//! `@@delegate`) to the ordered list of entities that directly extend it.
//! Subtype order is the declaration order of the source model and is
//! preserved so that everything synthesized from the graph is reproducible.

use indexmap::IndexMap;
use log::debug;
use serde::Deserialize;

use crate::{identifier::Ident, schema::Model};

/// Policy for delegates that no entity extends.
///
/// Synthesizing a payload union over zero subtypes would produce an empty,
/// invalid type, so such delegates are either skipped or rejected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmptyDelegatePolicy {
    /// Leave the delegate's payload alias untouched and emit a warning.
    #[default]
    Skip,
    /// Fail schema validation.
    Reject,
}

/// A delegate entity together with its direct concrete subtypes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelegateRelation<'a> {
    delegate: &'a Ident,
    subtypes: &'a [Ident],
}

impl<'a> DelegateRelation<'a> {
    pub fn delegate(&self) -> &'a Ident {
        self.delegate
    }

    /// Concrete subtypes in declaration order.
    pub fn subtypes(&self) -> &'a [Ident] {
        self.subtypes
    }

    /// Returns `true` if no entity extends this delegate.
    pub fn is_degenerate(&self) -> bool {
        self.subtypes.is_empty()
    }
}

/// Mapping from each delegate entity to its ordered subtype list.
///
/// # Examples
///
/// ```
/// use polymorph_core::{
///     delegate::DelegateGraph,
///     identifier::Ident,
///     schema::{Attribute, DELEGATE_ATTRIBUTE, Entity, Model},
/// };
///
/// let activity = Ident::new("Activity").unwrap();
/// let model = Model::new(vec![
///     Entity::new(activity.clone()).with_attribute(Attribute::new(DELEGATE_ATTRIBUTE)),
///     Entity::new(Ident::new("Post").unwrap()).with_super_type(activity.clone()),
///     Entity::new(Ident::new("Comment").unwrap()).with_super_type(activity.clone()),
/// ]);
///
/// let graph = DelegateGraph::build(&model);
/// let subtypes: Vec<_> = graph.subtypes("Activity").unwrap().iter().map(|s| s.as_str()).collect();
/// assert_eq!(subtypes, vec!["Post", "Comment"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DelegateGraph {
    relations: IndexMap<Ident, Vec<Ident>>,
}

impl DelegateGraph {
    /// Builds the delegate graph from a model.
    ///
    /// Every delegate is registered, including delegates without subtypes.
    /// A subtype belongs to a delegate iff its super references include it.
    pub fn build(model: &Model) -> Self {
        let mut relations = IndexMap::new();

        for delegate in model.delegates() {
            let subtypes: Vec<Ident> = model
                .entities()
                .iter()
                .filter(|entity| entity.extends(delegate.name()))
                .map(|entity| entity.name().clone())
                .collect();

            debug!(
                delegate = delegate.name().as_str(),
                discriminator:? = delegate.discriminator_field(),
                subtypes = subtypes.len();
                "Registered delegate"
            );

            relations
                .entry(delegate.name().clone())
                .or_insert(subtypes);
        }

        Self { relations }
    }

    /// Number of registered delegates.
    pub fn len(&self) -> usize {
        self.relations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.relations.is_empty()
    }

    /// Returns `true` if `name` is a registered delegate.
    pub fn contains(&self, name: &str) -> bool {
        self.relations.contains_key(name)
    }

    /// Subtypes of the delegate `name`, or `None` if it is not a delegate.
    pub fn subtypes(&self, name: &str) -> Option<&[Ident]> {
        self.relations.get(name).map(Vec::as_slice)
    }

    /// Iterates relations in delegate declaration order.
    pub fn relations(&self) -> impl Iterator<Item = DelegateRelation<'_>> {
        self.relations
            .iter()
            .map(|(delegate, subtypes)| DelegateRelation {
                delegate,
                subtypes: subtypes.as_slice(),
            })
    }

    /// Iterates delegates that no entity extends.
    pub fn degenerate(&self) -> impl Iterator<Item = &Ident> {
        self.relations()
            .filter(DelegateRelation::is_degenerate)
            .map(|relation| relation.delegate())
    }
}
