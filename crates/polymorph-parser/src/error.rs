//! Diagnostics for the schema and declaration parsers.
//!
//! Every phase (lexing, parsing, validation, elaboration) reports problems
//! as [`Diagnostic`]s: a severity, an optional [`ErrorCode`], labeled source
//! spans and optional help text. Failures are returned as a [`ParseError`]
//! wrapping one or more diagnostics.
//!
//! # Example
//!
//! ```
//! # use polymorph_parser::error::{Diagnostic, ErrorCode};
//! # use polymorph_parser::Span;
//!
//! let diag = Diagnostic::error("model `Post` is defined multiple times")
//!     .with_code(ErrorCode::E201)
//!     .with_label(Span::new(120..124), "duplicate definition")
//!     .with_secondary_label(Span::new(40..44), "first defined here")
//!     .with_help("rename one of the models");
//! ```

mod collector;
mod diagnostic;
mod error_code;
mod label;
mod parse_error;
mod severity;

pub(crate) use collector::DiagnosticCollector;

pub use diagnostic::Diagnostic;
pub use error_code::ErrorCode;
pub use label::Label;
pub use parse_error::ParseError;
pub use severity::Severity;
