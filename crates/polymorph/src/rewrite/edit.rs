//! Pending edits and their application to the source text.
//!
//! Edits are collected while the tree is walked and applied in one pass
//! afterwards. Before application the edit set is normalized:
//!
//! - identical edits are merged
//! - edits nested inside a removal or a replacement are dropped
//! - partially overlapping edits are rejected
//!
//! Removals that cover whole lines take the lines with them so the output
//! carries no blank remnants.

use std::cmp::Reverse;

use log::trace;

use polymorph_parser::Span;

use crate::error::PolymorphError;

/// A change to the artifact text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingEdit {
    Removal(Span),
    Replacement(Span, String),
}

impl PendingEdit {
    pub fn span(&self) -> Span {
        match self {
            PendingEdit::Removal(span) | PendingEdit::Replacement(span, _) => *span,
        }
    }

    fn text(&self) -> &str {
        match self {
            PendingEdit::Removal(_) => "",
            PendingEdit::Replacement(_, text) => text,
        }
    }
}

/// Applies `edits` to `source`.
///
/// # Errors
///
/// Returns [`PolymorphError::Edit`] when two edits partially overlap, or
/// when two different edits target the same span.
pub fn apply(source: &str, edits: Vec<PendingEdit>) -> Result<String, PolymorphError> {
    let edits = normalize(edits)?;

    let mut output = String::with_capacity(source.len());
    let mut cursor = 0;
    for edit in &edits {
        let span = match edit {
            PendingEdit::Removal(span) => expand_removal(source, *span, cursor),
            PendingEdit::Replacement(span, _) => *span,
        };
        trace!(start = span.start(), end = span.end(); "Applying edit");
        output.push_str(&source[cursor..span.start()]);
        output.push_str(edit.text());
        cursor = span.end();
    }
    output.push_str(&source[cursor..]);

    Ok(output)
}

/// Sorts edits, drops duplicates and nested edits, and checks for overlap.
fn normalize(mut edits: Vec<PendingEdit>) -> Result<Vec<PendingEdit>, PolymorphError> {
    edits.sort_by_key(|edit| (edit.span().start(), Reverse(edit.span().end())));

    let mut kept: Vec<PendingEdit> = Vec::with_capacity(edits.len());
    for edit in edits {
        let Some(last) = kept.last() else {
            kept.push(edit);
            continue;
        };
        let (outer, inner) = (last.span(), edit.span());

        if outer == inner {
            if *last != edit {
                return Err(PolymorphError::Edit(format!(
                    "conflicting edits at {}..{}",
                    inner.start(),
                    inner.end()
                )));
            }
        } else if outer.contains(inner) {
            trace!(start = inner.start(), end = inner.end(); "Edit subsumed");
        } else if outer.overlaps(inner) {
            return Err(PolymorphError::Edit(format!(
                "edits at {}..{} and {}..{} partially overlap",
                outer.start(),
                outer.end(),
                inner.start(),
                inner.end()
            )));
        } else {
            kept.push(edit);
        }
    }

    Ok(kept)
}

/// Widens a removal over surrounding horizontal whitespace.
///
/// A removal alone on its lines is widened to the full lines, including the
/// final line break. Otherwise only the whitespace in front of it is taken,
/// never reaching back before `floor`.
fn expand_removal(source: &str, span: Span, floor: usize) -> Span {
    let bytes = source.as_bytes();
    let is_blank = |b: u8| b == b' ' || b == b'\t';

    let mut start = span.start();
    while start > floor && is_blank(bytes[start - 1]) {
        start -= 1;
    }
    let at_line_start = start == 0 || bytes[start - 1] == b'\n';

    let mut end = span.end();
    while end < bytes.len() && (is_blank(bytes[end]) || bytes[end] == b'\r') {
        end += 1;
    }
    let at_line_end = end == bytes.len() || bytes[end] == b'\n';

    if at_line_start && at_line_end {
        let end = if end < bytes.len() { end + 1 } else { end };
        Span::new(start..end)
    } else {
        Span::new(start..span.end())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span_of(source: &str, needle: &str) -> Span {
        let start = source.find(needle).unwrap();
        Span::new(start..start + needle.len())
    }

    #[test]
    fn test_whole_line_removal() {
        let source = "type A = {\n  a: string\n  poly_aux_b: number\n  c: boolean\n}\n";
        let edits = vec![PendingEdit::Removal(span_of(source, "poly_aux_b: number"))];
        assert_eq!(
            apply(source, edits).unwrap(),
            "type A = {\n  a: string\n  c: boolean\n}\n"
        );
    }

    #[test]
    fn test_inline_removal_takes_leading_whitespace() {
        let source = "type A = { a: string; poly_aux_b: number; c: boolean }";
        let edits = vec![PendingEdit::Removal(span_of(source, "poly_aux_b: number;"))];
        assert_eq!(
            apply(source, edits).unwrap(),
            "type A = { a: string; c: boolean }"
        );
    }

    #[test]
    fn test_last_line_without_newline() {
        let source = "a\n  b";
        let edits = vec![PendingEdit::Removal(span_of(source, "b"))];
        assert_eq!(apply(source, edits).unwrap(), "a\n");
    }

    #[test]
    fn test_replacement() {
        let source = "type A = string;";
        let edits = vec![PendingEdit::Replacement(
            span_of(source, "string"),
            "number".to_string(),
        )];
        assert_eq!(apply(source, edits).unwrap(), "type A = number;");
    }

    #[test]
    fn test_duplicates_and_nested_edits() {
        let source = "type A = {\n  create?: {\n    update?: X\n  }\n  b: Y\n}\n";
        let outer = span_of(source, "create?: {\n    update?: X\n  }");
        let nested = span_of(source, "update?: X");
        let edits = vec![
            PendingEdit::Removal(nested),
            PendingEdit::Removal(outer),
            PendingEdit::Removal(outer),
        ];
        assert_eq!(apply(source, edits).unwrap(), "type A = {\n  b: Y\n}\n");
    }

    #[test]
    fn test_removal_inside_replacement_is_subsumed() {
        let source = "type P = { poly_aux_a: string }";
        let ty = span_of(source, "{ poly_aux_a: string }");
        let edits = vec![
            PendingEdit::Removal(span_of(source, "poly_aux_a: string")),
            PendingEdit::Replacement(ty, "B".to_string()),
        ];
        assert_eq!(apply(source, edits).unwrap(), "type P = B");
    }

    #[test]
    fn test_partial_overlap_is_rejected() {
        let edits = vec![
            PendingEdit::Removal(Span::new(0..5)),
            PendingEdit::Removal(Span::new(3..8)),
        ];
        let err = apply("0123456789", edits).unwrap_err();
        assert!(matches!(err, PolymorphError::Edit(_)));
    }

    #[test]
    fn test_conflicting_replacements_are_rejected() {
        let edits = vec![
            PendingEdit::Replacement(Span::new(0..2), "a".to_string()),
            PendingEdit::Replacement(Span::new(0..2), "b".to_string()),
        ];
        assert!(apply("0123", edits).is_err());
    }

    #[test]
    fn test_no_edits() {
        assert_eq!(apply("unchanged\n", Vec::new()).unwrap(), "unchanged\n");
    }
}
