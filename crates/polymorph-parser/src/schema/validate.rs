//! Semantic checks on a parsed schema.
//!
//! [`validate_schema`] runs on the syntax tree before elaboration and
//! reports every naming problem at once. [`validate_inheritance`] runs on
//! the elaborated model, where the inheritance and delegate graphs exist.

use std::collections::HashMap;

use log::debug;

use polymorph_core::{
    delegate::{DelegateGraph, EmptyDelegatePolicy},
    identifier::Ident,
    inheritance::InheritanceGraph,
    schema::Model,
};

use crate::{
    error::{Diagnostic, DiagnosticCollector, ErrorCode, ParseError},
    schema::{
        SchemaConfig,
        types::{ModelDecl, SchemaFile},
    },
    span::Spanned,
};

fn check_identifier(collector: &mut DiagnosticCollector, name: &Spanned<String>, what: &str) {
    if let Err(err) = Ident::new(name.inner()) {
        collector.emit(
            Diagnostic::error(format!("invalid {what} name `{}`", name.inner()))
                .with_code(ErrorCode::E204)
                .with_label(name.span(), err.to_string())
                .with_help("names may only contain ASCII letters, digits and `_`"),
        );
    }
}

/// Check identifiers, duplicate models and `extends` references.
pub(crate) fn validate_schema(file: &SchemaFile) -> Result<(), ParseError> {
    let mut collector = DiagnosticCollector::new();
    let mut declared: HashMap<&str, &ModelDecl> = HashMap::new();

    for model in &file.models {
        check_identifier(&mut collector, &model.name, "model");
        for field in &model.fields {
            check_identifier(&mut collector, &field.name, "field");
        }

        if let Some(first) = declared.get(model.name.inner().as_str()) {
            collector.emit(
                Diagnostic::error(format!(
                    "model `{}` is defined multiple times",
                    model.name.inner()
                ))
                .with_code(ErrorCode::E201)
                .with_label(model.name.span(), "duplicate definition")
                .with_secondary_label(first.name.span(), "first defined here")
                .with_help("rename or remove one of the models"),
            );
        } else {
            declared.insert(model.name.inner().as_str(), model);
        }
    }

    for model in &file.models {
        for super_type in &model.super_types {
            if declared.contains_key(super_type.inner().as_str()) {
                continue;
            }
            collector.emit(
                Diagnostic::error(format!(
                    "model `{}` extends undefined model `{}`",
                    model.name.inner(),
                    super_type.inner()
                ))
                .with_code(ErrorCode::E200)
                .with_label(super_type.span(), "not defined")
                .with_help(format!(
                    "declare `model {}` or remove it from the `extends` list",
                    super_type.inner()
                )),
            );
        }
    }

    collector.finish()?;
    Ok(())
}

/// Check the elaborated model for inheritance cycles and degenerate
/// delegates.
///
/// Under [`EmptyDelegatePolicy::Skip`] a delegate without subtypes is only
/// reported as a warning, returned on success.
pub(crate) fn validate_inheritance(
    file: &SchemaFile,
    model: &Model,
    config: &SchemaConfig,
) -> Result<Vec<Diagnostic>, ParseError> {
    let mut collector = DiagnosticCollector::new();
    let declarations: HashMap<&str, &ModelDecl> = file
        .models
        .iter()
        .map(|decl| (decl.name.inner().as_str(), decl))
        .collect();

    let graph = InheritanceGraph::from_model(model);
    if let Some(cycle) = graph.find_cycle() {
        let names: Vec<&str> = cycle.iter().map(Ident::as_str).collect();
        let mut diagnostic = Diagnostic::error(format!(
            "inheritance cycle between {}",
            names
                .iter()
                .map(|name| format!("`{name}`"))
                .collect::<Vec<_>>()
                .join(", ")
        ))
        .with_code(ErrorCode::E202)
        .with_help("a model cannot extend itself, directly or through other models");

        for (idx, name) in names.iter().enumerate() {
            let Some(decl) = declarations.get(name) else {
                continue;
            };
            diagnostic = if idx == 0 {
                diagnostic.with_label(decl.name.span(), "part of the cycle")
            } else {
                diagnostic.with_secondary_label(decl.name.span(), "also part of the cycle")
            };
        }
        collector.emit(diagnostic);
    }

    let delegates = DelegateGraph::build(model);
    debug!(delegates = delegates.len(); "Delegate graph built");
    for delegate in delegates.degenerate() {
        let Some(decl) = declarations.get(delegate.as_str()) else {
            continue;
        };
        let message = format!("delegate model `{delegate}` is not extended by any model");
        let diagnostic = match config.empty_delegate {
            EmptyDelegatePolicy::Reject => Diagnostic::error(message)
                .with_code(ErrorCode::E203)
                .with_label(decl.name.span(), "no model extends this delegate")
                .with_help("add a model that extends it or remove `@@delegate`"),
            EmptyDelegatePolicy::Skip => Diagnostic::warning(message)
                .with_code(ErrorCode::E203)
                .with_label(decl.name.span(), "its payload type is left unchanged"),
        };
        collector.emit(diagnostic);
    }

    collector.finish()
}
