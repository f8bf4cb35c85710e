//! Elaboration of the schema syntax tree into the core [`Model`].

use log::{debug, trace};

use polymorph_core::{
    identifier::Ident,
    schema::{Attribute, Entity, Field, Model},
};

use crate::{
    error::{Diagnostic, ErrorCode},
    schema::types::{AttributeDecl, SchemaFile},
    span::Spanned,
};

/// Builds a [`Model`] from a validated schema file.
///
/// Attribute arguments are sliced out of `source`, which must be the text
/// the file was parsed from.
pub(crate) struct Builder<'a> {
    source: &'a str,
}

impl<'a> Builder<'a> {
    pub fn new(source: &'a str) -> Self {
        Self { source }
    }

    pub fn build(&self, file: &SchemaFile) -> Result<Model, Diagnostic> {
        let mut entities = Vec::with_capacity(file.models.len());

        for decl in &file.models {
            let mut entity = Entity::new(ident(&decl.name)?).with_abstract(decl.is_abstract);

            for super_type in &decl.super_types {
                entity = entity.with_super_type(ident(super_type)?);
            }
            for attribute in &decl.attributes {
                entity = entity.with_attribute(self.attribute(attribute));
            }
            for field_decl in &decl.fields {
                let mut field = Field::new(ident(&field_decl.name)?, field_decl.type_name.inner())
                    .with_array(field_decl.is_array)
                    .with_optional(field_decl.is_optional);
                for attribute in &field_decl.attributes {
                    field = field.with_attribute(self.attribute(attribute));
                }
                entity = entity.with_field(field);
            }

            trace!(entity:? = entity; "Elaborated entity");
            entities.push(entity);
        }

        debug!(entities = entities.len(); "Schema elaborated");
        Ok(Model::new(entities))
    }

    fn attribute(&self, decl: &AttributeDecl) -> Attribute {
        let attribute = Attribute::new(decl.name.inner());
        match decl.args {
            Some(span) => attribute.with_args(span.text(self.source)),
            None => attribute,
        }
    }
}

fn ident(name: &Spanned<String>) -> Result<Ident, Diagnostic> {
    Ident::new(name.inner()).map_err(|err| {
        Diagnostic::error(format!("invalid identifier `{}`", name.inner()))
            .with_code(ErrorCode::E204)
            .with_label(name.span(), err.to_string())
    })
}
