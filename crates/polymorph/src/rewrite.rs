//! The delegate rewrite pass over a generated declaration file.
//!
//! The pass runs in three stages:
//!
//! 1. **Match** - a single read-only walk of the [`DeclarationTree`]
//!    collects [`PendingEdit`]s
//! 2. **Normalize** - duplicate and nested edits are folded, overlapping
//!    edits are rejected
//! 3. **Apply** - the edits are spliced into the source text
//!
//! The edit set depends only on the delegate graph and the tree, so running
//! the pass on its own output yields the same text.

mod edit;
mod matcher;
mod naming;
mod synth;

pub use edit::PendingEdit;
pub use naming::{AUX_MEMBER_PREFIX, UNSAFE_ACCESSOR_METHODS, UNSAFE_NESTED_WRITES};

use std::fmt;

use log::{debug, info};

use polymorph_core::delegate::DelegateGraph;
use polymorph_parser::declaration::{DeclarationTree, walk_tree};

use crate::error::PolymorphError;

use matcher::Matcher;

/// Counts of what a rewrite changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RewriteSummary {
    /// Payload aliases replaced by a discriminated union.
    pub payloads_replaced: usize,
    /// Create/update input aliases of delegates that were visited.
    pub input_aliases: usize,
    /// `poly_aux_` members removed.
    pub aux_members_removed: usize,
    /// Unsafe nested-write properties removed from input aliases.
    pub nested_writes_removed: usize,
    /// `create`/`upsert` methods removed from accessor interfaces.
    pub accessor_methods_removed: usize,
}

impl RewriteSummary {
    /// Total number of removed members.
    pub fn removals(&self) -> usize {
        self.aux_members_removed + self.nested_writes_removed + self.accessor_methods_removed
    }

    /// Returns `true` if the rewrite changes nothing.
    pub fn is_empty(&self) -> bool {
        self.payloads_replaced == 0 && self.removals() == 0
    }
}

impl fmt::Display for RewriteSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} payload(s) replaced, {} auxiliary member(s), {} nested write(s) and {} accessor method(s) removed",
            self.payloads_replaced,
            self.aux_members_removed,
            self.nested_writes_removed,
            self.accessor_methods_removed
        )
    }
}

/// Rewritten artifact text together with its summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewrite {
    pub text: String,
    pub summary: RewriteSummary,
}

/// Rewrites `source`, parsed as `tree`, for the delegates in `graph`.
///
/// # Errors
///
/// Returns [`PolymorphError::Edit`] when the collected edits conflict.
pub fn rewrite(
    source: &str,
    tree: &DeclarationTree,
    graph: &DelegateGraph,
) -> Result<Rewrite, PolymorphError> {
    let mut matcher = Matcher::new(graph);
    walk_tree(&mut matcher, tree);
    let (edits, summary) = matcher.finish();
    debug!(edits = edits.len(); "Edits collected");

    let text = edit::apply(source, edits)?;
    info!(
        payloads = summary.payloads_replaced,
        removals = summary.removals();
        "Rewrite complete"
    );

    Ok(Rewrite { text, summary })
}
