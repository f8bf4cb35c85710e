//! Schema (ZModel) front end: syntax tree, parser, validation and
//! elaboration into the core [`Model`](polymorph_core::schema::Model).

mod elaborate;
mod parser;
mod types;
mod validate;

use polymorph_core::delegate::EmptyDelegatePolicy;

pub(crate) use elaborate::Builder;
pub(crate) use parser::build_schema;
pub(crate) use validate::{validate_inheritance, validate_schema};

/// Configuration for schema loading.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SchemaConfig {
    /// What to do with delegates that no model extends.
    pub empty_delegate: EmptyDelegatePolicy,
}

impl SchemaConfig {
    pub fn new(empty_delegate: EmptyDelegatePolicy) -> Self {
        Self { empty_delegate }
    }
}
