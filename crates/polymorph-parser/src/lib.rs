//! # Polymorph Parser
//!
//! Front ends for the Polymorph declaration rewriter. This crate parses two
//! inputs:
//!
//! - the ZModel schema, elaborated into a [`polymorph_core::schema::Model`]
//!   by [`parse_schema`]
//! - the generated TypeScript declaration file, parsed into a skeleton
//!   [`DeclarationTree`] by [`parse_declarations`]
//!
//! ## Usage
//!
//! ```
//! # use polymorph_parser::{parse_schema, SchemaConfig, error::ParseError};
//!
//! fn main() -> Result<(), ParseError> {
//!     let source = r#"
//!         model Activity {
//!             id Int @id
//!             delegatedType String
//!             @@delegate(delegatedType)
//!         }
//!         model Post extends Activity {
//!             title String
//!         }
//!     "#;
//!
//!     let model = parse_schema(source, SchemaConfig::default())?;
//!     assert_eq!(model.delegates().count(), 1);
//!     Ok(())
//! }
//! ```

mod cursor;
pub mod declaration;
pub mod error;
mod lexer;
mod schema;
mod span;
mod tokens;

pub use declaration::DeclarationTree;
pub use schema::SchemaConfig;
pub use span::{Span, Spanned};

use log::{debug, info, warn};

use polymorph_core::schema::Model;

use error::{Diagnostic, ParseError};

/// Parse schema source text into a validated model.
///
/// Warnings, such as a delegate nobody extends under
/// [`EmptyDelegatePolicy::Skip`](polymorph_core::delegate::EmptyDelegatePolicy::Skip),
/// are logged. Use [`parse_schema_with_warnings`] to receive them instead.
///
/// # Errors
///
/// Returns a [`ParseError`] carrying every diagnostic of the first failing
/// step.
pub fn parse_schema(source: &str, config: SchemaConfig) -> Result<Model, ParseError> {
    let (model, warnings) = parse_schema_with_warnings(source, config)?;
    for diagnostic in &warnings {
        warn!(diagnostic:%; "Schema warning");
    }
    Ok(model)
}

/// Parse schema source text into a validated model and its warnings.
///
/// The pipeline runs in five steps:
///
/// 1. **Tokenize** - Convert source text to tokens
/// 2. **Parse** - Build the schema syntax tree
/// 3. **Validate** - Check names, duplicates and `extends` references
/// 4. **Elaborate** - Build the core model
/// 5. **Check inheritance** - Reject cycles and handle empty delegates
///
/// # Errors
///
/// Returns a [`ParseError`] carrying every diagnostic of the first failing
/// step.
pub fn parse_schema_with_warnings(
    source: &str,
    config: SchemaConfig,
) -> Result<(Model, Vec<Diagnostic>), ParseError> {
    // Step 1: Tokenize
    let tokens = lexer::tokenize(source)?;

    // Step 2: Parse
    let file = schema::build_schema(&tokens)?;
    debug!(models = file.models.len(); "Schema parsed");

    // Step 3: Validate
    schema::validate_schema(&file)?;

    // Step 4: Elaborate
    let model = schema::Builder::new(source).build(&file)?;

    // Step 5: Check inheritance
    let warnings = schema::validate_inheritance(&file, &model, &config)?;

    info!(entities = model.entities().len(), warnings = warnings.len(); "Schema loaded");
    Ok((model, warnings))
}

/// Parse a TypeScript declaration file into a [`DeclarationTree`].
///
/// # Errors
///
/// Returns a [`ParseError`] for lexical errors and for the first syntax
/// error.
///
/// # Example
///
/// ```
/// # use polymorph_parser::parse_declarations;
///
/// let tree = parse_declarations("export type A = { b: string }").unwrap();
/// assert_eq!(tree.statements()[0].name(), Some("A"));
/// ```
pub fn parse_declarations(source: &str) -> Result<DeclarationTree, ParseError> {
    let tokens = lexer::tokenize(source)?;
    let tree = declaration::build_tree(&tokens)?;
    debug!(statements = tree.statements().len(); "Declarations parsed");
    Ok(tree)
}
