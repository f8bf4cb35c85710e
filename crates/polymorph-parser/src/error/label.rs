//! Labeled source spans for diagnostic messages.

use crate::span::Span;

/// A message attached to a span of the source.
///
/// A diagnostic normally carries one primary label marking where the
/// problem is, plus secondary labels pointing at related locations such as
/// an earlier definition.
///
/// ```text
/// error[E201]: model `Post` is defined multiple times
///    |
/// 12 | model Post extends Activity {
///    |       ^^^^ duplicate definition
///    |
///  4 | model Post {
///    |       ---- first defined here
/// ```
#[derive(Debug, Clone)]
pub struct Label {
    span: Span,
    message: String,
    is_primary: bool,
}

impl Label {
    /// Create a new primary label.
    pub fn primary(span: Span, message: impl Into<String>) -> Self {
        Self {
            span,
            message: message.into(),
            is_primary: true,
        }
    }

    /// Create a new secondary label.
    pub fn secondary(span: Span, message: impl Into<String>) -> Self {
        Self {
            span,
            message: message.into(),
            is_primary: false,
        }
    }

    /// Get the span this label applies to.
    pub fn span(&self) -> Span {
        self.span
    }

    /// Get the label message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Check if this is a primary label.
    pub fn is_primary(&self) -> bool {
        self.is_primary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_kinds() {
        let primary = Label::primary(Span::new(3..7), "undefined model");
        let secondary = Label::secondary(Span::new(0..2), "referenced from here");

        assert!(primary.is_primary());
        assert!(!secondary.is_primary());
        assert_eq!(primary.span(), Span::new(3..7));
        assert_eq!(secondary.message(), "referenced from here");
    }
}
