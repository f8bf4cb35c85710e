//! Polymorph - delegate-aware rewriting of generated client declarations.
//!
//! A schema may mark an entity as a delegate (`@@delegate`): its rows are
//! only ever created through one of the entities that extend it. The
//! generated client typings know nothing of this. The rewrite pass in this
//! crate fixes them up:
//!
//! - `poly_aux_*` bookkeeping members are removed
//! - nested `create`/`update`/`upsert`/... writes are removed from the
//!   delegate's create and update inputs
//! - `create` and `upsert` are removed from the delegate's accessor
//! - the delegate's payload becomes a union over its subtypes,
//!   discriminated by `scalars.delegatedType`

pub mod config;

mod artifact;
mod error;
mod rewrite;

pub use polymorph_core::{delegate, identifier, schema};

pub use artifact::Artifact;
pub use error::PolymorphError;
pub use rewrite::{
    AUX_MEMBER_PREFIX, PendingEdit, Rewrite, RewriteSummary, UNSAFE_ACCESSOR_METHODS,
    UNSAFE_NESTED_WRITES,
};

use std::path::Path;

use log::{debug, info, trace};

use polymorph_core::{delegate::DelegateGraph, schema::Model};
use polymorph_parser::{SchemaConfig, error::Diagnostic};

use config::AppConfig;

/// Entry point for loading schemas and rewriting artifacts.
///
/// # Examples
///
/// ```rust,no_run
/// use std::path::Path;
///
/// use polymorph::{Rewriter, config::AppConfig};
///
/// let rewriter = Rewriter::new(AppConfig::default());
/// let model = rewriter
///     .load_model(&std::fs::read_to_string("schema.zmodel").unwrap())
///     .expect("Failed to load schema");
///
/// let summary = rewriter
///     .run(&model, Path::new("node_modules"))
///     .expect("Failed to rewrite");
/// println!("{summary}");
/// ```
#[derive(Debug, Default)]
pub struct Rewriter {
    config: AppConfig,
}

impl Rewriter {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Parse and validate schema source into a model.
    ///
    /// Schema warnings are logged.
    ///
    /// # Errors
    ///
    /// Returns `PolymorphError::Parse` for syntax and validation errors.
    pub fn load_model(&self, source: &str) -> Result<Model, PolymorphError> {
        info!("Loading schema");

        let model = polymorph_parser::parse_schema(source, self.schema_config())
            .map_err(|err| PolymorphError::new_parse_error(err, source))?;

        trace!(model:?; "Loaded model");
        Ok(model)
    }

    /// Parse and validate schema source, returning the warnings alongside
    /// the model so the caller can render them against the source.
    ///
    /// # Errors
    ///
    /// Returns `PolymorphError::Parse` for syntax and validation errors.
    pub fn load_model_with_warnings(
        &self,
        source: &str,
    ) -> Result<(Model, Vec<Diagnostic>), PolymorphError> {
        info!("Loading schema");

        let (model, warnings) =
            polymorph_parser::parse_schema_with_warnings(source, self.schema_config())
                .map_err(|err| PolymorphError::new_parse_error(err, source))?;

        trace!(model:?; "Loaded model");
        Ok((model, warnings))
    }

    fn schema_config(&self) -> SchemaConfig {
        SchemaConfig::new(self.config.rewrite().empty_delegate())
    }

    /// Rewrite declaration source text for the delegates of `model`.
    ///
    /// # Errors
    ///
    /// Returns `PolymorphError::Parse` when the declarations do not parse
    /// and `PolymorphError::Edit` when the collected edits conflict.
    ///
    /// # Examples
    ///
    /// ```
    /// use polymorph::Rewriter;
    ///
    /// let rewriter = Rewriter::default();
    /// let model = rewriter
    ///     .load_model("model A {\n  id Int\n  @@delegate(kind)\n}\nmodel B extends A {\n}\n")
    ///     .unwrap();
    ///
    /// let rewrite = rewriter
    ///     .rewrite_source(&model, "export type $APayload<E> = { x: 1 }\n")
    ///     .unwrap();
    /// assert_eq!(
    ///     rewrite.text,
    ///     "export type $APayload<E> = ($BPayload<E> & { scalars: { delegatedType: 'B' } })\n"
    /// );
    /// ```
    pub fn rewrite_source(&self, model: &Model, source: &str) -> Result<Rewrite, PolymorphError> {
        let graph = DelegateGraph::build(model);
        info!(delegates = graph.len(); "Delegate graph built");

        let tree = polymorph_parser::parse_declarations(source)
            .map_err(|err| PolymorphError::new_parse_error(err, source))?;
        debug!(statements = tree.statements().len(); "Declarations parsed");

        rewrite::rewrite(source, &tree, &graph)
    }

    /// Compute the rewrite of the artifact under `output_dir` without
    /// writing it.
    pub fn preview(&self, model: &Model, output_dir: &Path) -> Result<Rewrite, PolymorphError> {
        let artifact = Artifact::load(output_dir, self.config.artifact().path())?;
        self.rewrite_source(model, artifact.source())
    }

    /// Rewrite the artifact under `output_dir` in place.
    ///
    /// Nothing is written unless the whole rewrite succeeds, and the file
    /// is replaced atomically.
    ///
    /// # Errors
    ///
    /// Returns `PolymorphError::MissingOutputDir` or
    /// `PolymorphError::Artifact` when the artifact cannot be located, read
    /// or written, and the errors of [`Rewriter::rewrite_source`].
    pub fn run(&self, model: &Model, output_dir: &Path) -> Result<RewriteSummary, PolymorphError> {
        let artifact = Artifact::load(output_dir, self.config.artifact().path())?;
        info!(path:? = artifact.path(); "Rewriting artifact");

        let rewrite = self.rewrite_source(model, artifact.source())?;
        artifact.persist(&rewrite.text)?;

        info!(summary:% = rewrite.summary; "Artifact rewritten");
        Ok(rewrite.summary)
    }
}
