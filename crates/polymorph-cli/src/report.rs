//! Rendering of CLI errors and schema warnings with miette.
//!
//! Parser diagnostics point into one of two inputs, the schema or the
//! generated declaration file. Each one is rendered as its own report
//! against a source named after that file. Any other error renders as
//! itself, including its cause chain.

use std::{fmt, path::Path};

use miette::{
    Diagnostic as MietteDiagnostic, GraphicalReportHandler, LabeledSpan, NamedSource,
    Severity as MietteSeverity, SourceSpan,
};

use polymorph::PolymorphError;
use polymorph_parser::{
    Span,
    error::{Diagnostic, Severity},
};

use crate::error::CliError;

/// A parser diagnostic paired with the file it points into.
#[derive(Debug)]
pub struct SourceDiagnostic<'a> {
    diagnostic: &'a Diagnostic,
    source: NamedSource<String>,
}

impl<'a> SourceDiagnostic<'a> {
    pub fn new(diagnostic: &'a Diagnostic, path: &Path, source: &str) -> Self {
        Self {
            diagnostic,
            source: NamedSource::new(path.display().to_string(), source.to_string()),
        }
    }
}

impl fmt::Display for SourceDiagnostic<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.diagnostic.message())
    }
}

impl std::error::Error for SourceDiagnostic<'_> {}

impl MietteDiagnostic for SourceDiagnostic<'_> {
    fn code<'b>(&'b self) -> Option<Box<dyn fmt::Display + 'b>> {
        self.diagnostic
            .code()
            .map(|code| Box::new(code) as Box<dyn fmt::Display>)
    }

    fn severity(&self) -> Option<MietteSeverity> {
        Some(match self.diagnostic.severity() {
            Severity::Error => MietteSeverity::Error,
            Severity::Warning => MietteSeverity::Warning,
        })
    }

    fn help<'b>(&'b self) -> Option<Box<dyn fmt::Display + 'b>> {
        self.diagnostic
            .help()
            .map(|help| Box::new(help) as Box<dyn fmt::Display>)
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        Some(&self.source)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let labels = self.diagnostic.labels();
        if labels.is_empty() {
            return None;
        }

        Some(Box::new(labels.iter().map(|label| {
            let span = source_span(label.span());
            let message = Some(label.message().to_string());
            if label.is_primary() {
                LabeledSpan::new_primary_with_span(message, span)
            } else {
                LabeledSpan::new_with_span(message, span)
            }
        })))
    }
}

fn source_span(span: Span) -> SourceSpan {
    SourceSpan::new(span.start().into(), span.len())
}

/// One renderable report.
#[derive(Debug)]
pub enum Report<'a> {
    Source(SourceDiagnostic<'a>),
    Error(&'a CliError),
}

impl Report<'_> {
    pub fn as_diagnostic(&self) -> &dyn MietteDiagnostic {
        match self {
            Report::Source(diagnostic) => diagnostic,
            Report::Error(err) => *err,
        }
    }
}

/// Split a CLI error into the reports to render.
///
/// A parse failure of the schema or of the artifact yields one report per
/// diagnostic, named after the failing file.
pub fn reports(err: &CliError) -> Vec<Report<'_>> {
    let (path, parse_err, src) = match err {
        CliError::Schema {
            path,
            source: PolymorphError::Parse { err, src },
        } => (path, err, src),
        CliError::Rewrite {
            artifact,
            source: PolymorphError::Parse { err, src },
            ..
        } => (artifact, err, src),
        _ => return vec![Report::Error(err)],
    };

    parse_err
        .diagnostics()
        .iter()
        .map(|diagnostic| Report::Source(SourceDiagnostic::new(diagnostic, path, src)))
        .collect()
}

/// Render a report to a string for the log.
pub fn render(diagnostic: &dyn MietteDiagnostic) -> String {
    let mut output = String::new();
    if GraphicalReportHandler::new()
        .render_report(&mut output, diagnostic)
        .is_err()
    {
        return diagnostic.to_string();
    }
    output
}
