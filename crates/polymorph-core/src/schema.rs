//! Resolved schema model.
//!
//! A [`Model`] is the output of the schema loader: the ordered list of entity
//! declarations with their fields, attributes and inheritance edges. Order is
//! significant; every later stage preserves declaration order.

use crate::identifier::Ident;

/// Model attribute that marks an entity as a delegate (polymorphic base).
pub const DELEGATE_ATTRIBUTE: &str = "@@delegate";

/// An attribute attached to a field (`@id`) or to an entity (`@@delegate`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// Attribute name including its sigil, e.g. `@@delegate`.
    name: String,
    /// Raw argument text between the parentheses, if any.
    args: Option<String>,
}

impl Attribute {
    /// Creates an attribute without arguments.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            args: None,
        }
    }

    /// Sets the raw argument text.
    pub fn with_args(mut self, args: impl Into<String>) -> Self {
        self.args = Some(args.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn args(&self) -> Option<&str> {
        self.args.as_deref()
    }
}

/// A field of an entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    name: Ident,
    type_name: String,
    is_array: bool,
    is_optional: bool,
    attributes: Vec<Attribute>,
}

impl Field {
    /// Creates a required scalar field.
    pub fn new(name: Ident, type_name: impl Into<String>) -> Self {
        Self {
            name,
            type_name: type_name.into(),
            is_array: false,
            is_optional: false,
            attributes: Vec::new(),
        }
    }

    /// Marks the field as a list (`Type[]`).
    pub fn with_array(mut self, is_array: bool) -> Self {
        self.is_array = is_array;
        self
    }

    /// Marks the field as optional (`Type?`).
    pub fn with_optional(mut self, is_optional: bool) -> Self {
        self.is_optional = is_optional;
        self
    }

    pub fn with_attribute(mut self, attribute: Attribute) -> Self {
        self.attributes.push(attribute);
        self
    }

    pub fn name(&self) -> &Ident {
        &self.name
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn is_array(&self) -> bool {
        self.is_array
    }

    pub fn is_optional(&self) -> bool {
        self.is_optional
    }

    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }
}

/// An entity (data model) declaration.
///
/// # Examples
///
/// ```
/// use polymorph_core::{
///     identifier::Ident,
///     schema::{Attribute, DELEGATE_ATTRIBUTE, Entity},
/// };
///
/// let activity = Ident::new("Activity").unwrap();
/// let base = Entity::new(activity.clone()).with_attribute(Attribute::new(DELEGATE_ATTRIBUTE));
/// let post = Entity::new(Ident::new("Post").unwrap()).with_super_type(activity.clone());
///
/// assert!(base.is_delegate());
/// assert!(post.extends(&activity));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entity {
    name: Ident,
    is_abstract: bool,
    fields: Vec<Field>,
    attributes: Vec<Attribute>,
    super_types: Vec<Ident>,
}

impl Entity {
    pub fn new(name: Ident) -> Self {
        Self {
            name,
            is_abstract: false,
            fields: Vec::new(),
            attributes: Vec::new(),
            super_types: Vec::new(),
        }
    }

    pub fn with_abstract(mut self, is_abstract: bool) -> Self {
        self.is_abstract = is_abstract;
        self
    }

    pub fn with_field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    pub fn with_attribute(mut self, attribute: Attribute) -> Self {
        self.attributes.push(attribute);
        self
    }

    /// Appends a super-entity reference (an `extends` edge).
    pub fn with_super_type(mut self, super_type: Ident) -> Self {
        self.super_types.push(super_type);
        self
    }

    pub fn name(&self) -> &Ident {
        &self.name
    }

    pub fn is_abstract(&self) -> bool {
        self.is_abstract
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    /// Super-entity references in declaration order.
    pub fn super_types(&self) -> &[Ident] {
        &self.super_types
    }

    /// Returns the first attribute with the given name.
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|attr| attr.name() == name)
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.attribute(name).is_some()
    }

    /// Returns `true` if this entity carries the delegate marker attribute.
    pub fn is_delegate(&self) -> bool {
        self.has_attribute(DELEGATE_ATTRIBUTE)
    }

    /// Returns the discriminator field named by `@@delegate(field)`, if any.
    pub fn discriminator_field(&self) -> Option<&str> {
        self.attribute(DELEGATE_ATTRIBUTE)
            .and_then(Attribute::args)
            .map(str::trim)
            .filter(|args| !args.is_empty())
    }

    /// Returns `true` if `super_type` is one of this entity's direct super entities.
    pub fn extends(&self, super_type: &Ident) -> bool {
        self.super_types.iter().any(|s| s == super_type)
    }
}

/// The resolved schema model: all entity declarations in source order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Model {
    entities: Vec<Entity>,
}

impl Model {
    pub fn new(entities: Vec<Entity>) -> Self {
        Self { entities }
    }

    /// All entity declarations in source order.
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    /// Looks up an entity by name.
    pub fn entity(&self, name: &str) -> Option<&Entity> {
        self.entities.iter().find(|entity| entity.name() == name)
    }

    /// Entities carrying the delegate marker, in source order.
    pub fn delegates(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter().filter(|entity| entity.is_delegate())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ident(name: &str) -> Ident {
        Ident::new(name).unwrap()
    }

    #[test]
    fn test_entity_delegate_marker() {
        let plain = Entity::new(ident("User"));
        let base = Entity::new(ident("Activity")).with_attribute(Attribute::new("@@delegate"));

        assert!(!plain.is_delegate());
        assert!(base.is_delegate());
    }

    #[test]
    fn test_discriminator_field() {
        let base = Entity::new(ident("Asset"))
            .with_attribute(Attribute::new(DELEGATE_ATTRIBUTE).with_args(" assetType "));
        assert_eq!(base.discriminator_field(), Some("assetType"));

        let bare = Entity::new(ident("Activity")).with_attribute(Attribute::new(DELEGATE_ATTRIBUTE));
        assert_eq!(bare.discriminator_field(), None);
    }

    #[test]
    fn test_extends() {
        let post = Entity::new(ident("Post"))
            .with_super_type(ident("Activity"))
            .with_super_type(ident("Audited"));

        assert!(post.extends(&ident("Activity")));
        assert!(post.extends(&ident("Audited")));
        assert!(!post.extends(&ident("Comment")));
        assert_eq!(post.super_types().len(), 2);
    }

    #[test]
    fn test_model_lookup_and_delegates() {
        let model = Model::new(vec![
            Entity::new(ident("User")),
            Entity::new(ident("Activity")).with_attribute(Attribute::new(DELEGATE_ATTRIBUTE)),
            Entity::new(ident("Asset")).with_attribute(Attribute::new(DELEGATE_ATTRIBUTE)),
        ]);

        assert!(model.entity("User").is_some());
        assert!(model.entity("Missing").is_none());

        let delegates: Vec<_> = model.delegates().map(|e| e.name().as_str()).collect();
        assert_eq!(delegates, vec!["Activity", "Asset"]);
    }

    #[test]
    fn test_field_builder() {
        let field = Field::new(ident("tags"), "String")
            .with_array(true)
            .with_attribute(Attribute::new("@default").with_args("[]"));

        assert_eq!(field.type_name(), "String");
        assert!(field.is_array());
        assert!(!field.is_optional());
        assert_eq!(field.attributes()[0].args(), Some("[]"));
    }
}
