//! Collector for accumulating diagnostics during a processing phase.

use crate::error::{Diagnostic, ParseError};

/// Accumulates diagnostics so a phase can report every problem it finds
/// instead of stopping at the first one.
#[derive(Debug, Default)]
pub struct DiagnosticCollector {
    diagnostics: Vec<Diagnostic>,
    has_errors: bool,
}

impl DiagnosticCollector {
    /// Create a new empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a diagnostic.
    pub fn emit(&mut self, diagnostic: Diagnostic) {
        if diagnostic.severity().is_error() {
            self.has_errors = true;
        }
        self.diagnostics.push(diagnostic);
    }

    /// Finish collection.
    ///
    /// Returns every diagnostic as a [`ParseError`] if any of them is an
    /// error. Otherwise the warnings are handed back to the caller.
    pub fn finish(self) -> Result<Vec<Diagnostic>, ParseError> {
        if self.has_errors {
            return Err(ParseError::new(self.diagnostics));
        }
        Ok(self.diagnostics)
    }
}
