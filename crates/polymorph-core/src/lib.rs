//! Polymorph Core Types and Definitions
//!
//! This crate provides the foundational types shared by the Polymorph
//! parser and rewriter. It includes:
//!
//! - **Identifiers**: Validated entity identifiers ([`identifier::Ident`])
//! - **Schema**: The resolved entity-declaration model ([`schema`] module)
//! - **Inheritance**: The entity inheritance graph ([`inheritance`] module)
//! - **Delegates**: Delegate entities and their concrete subtypes ([`delegate`] module)
//! - **Type nodes**: A structured model of synthesized TypeScript types ([`type_node`] module)

pub mod delegate;
pub mod identifier;
pub mod inheritance;
pub mod schema;
pub mod type_node;
