//! Tree walker that matches rewrite targets and collects edits.

use log::{debug, info, warn};

use polymorph_core::delegate::DelegateGraph;
use polymorph_parser::declaration::{
    Interface, Member, MemberKind, MemberOwner, TypeAlias, Visitor, walk_interface, walk_member,
    walk_type_alias,
};

use crate::rewrite::{
    RewriteSummary,
    edit::PendingEdit,
    naming::{
        accessor_entity, input_alias_delegate, is_aux_member, is_unsafe_accessor_method,
        is_unsafe_nested_write, payload_entity,
    },
    synth::payload_union,
};

/// Collects the edits for one declaration tree.
///
/// The walk is read-only: matches are recorded as [`PendingEdit`]s and the
/// tree is never changed while it is visited.
pub struct Matcher<'g> {
    graph: &'g DelegateGraph,
    /// Delegate whose create/update input alias is being walked.
    input_alias: Option<&'g str>,
    edits: Vec<PendingEdit>,
    summary: RewriteSummary,
}

impl<'g> Matcher<'g> {
    pub fn new(graph: &'g DelegateGraph) -> Self {
        Self {
            graph,
            input_alias: None,
            edits: Vec::new(),
            summary: RewriteSummary::default(),
        }
    }

    /// Returns the collected edits and match counts.
    pub fn finish(self) -> (Vec<PendingEdit>, RewriteSummary) {
        (self.edits, self.summary)
    }

    fn remove(&mut self, member: &Member) {
        self.edits.push(PendingEdit::Removal(member.span()));
    }

    fn replace_payload(&mut self, alias: &TypeAlias, delegate: &str) {
        let Some(subtypes) = self.graph.subtypes(delegate) else {
            return;
        };
        if subtypes.is_empty() {
            warn!(delegate = delegate; "Delegate has no subtypes, payload left unchanged");
            return;
        }

        let params: Vec<&str> = alias.type_params().iter().map(|p| p.name()).collect();
        let union = payload_union(subtypes, &params);
        info!(
            alias = alias.name(),
            subtypes = subtypes.len();
            "Replacing delegate payload"
        );
        self.edits
            .push(PendingEdit::Replacement(alias.ty().span(), union.to_string()));
        self.summary.payloads_replaced += 1;
    }
}

impl<'t, 'g> Visitor<'t> for Matcher<'g> {
    fn visit_type_alias(&mut self, alias: &'t TypeAlias) {
        if let Some(delegate) = payload_entity(alias.name()) {
            self.replace_payload(alias, delegate);
        }

        let input_alias = input_alias_delegate(alias.name(), self.graph);
        if let Some(delegate) = input_alias {
            debug!(alias = alias.name(), delegate = delegate; "Processing delegate input alias");
            self.summary.input_aliases += 1;
        }

        let outer = std::mem::replace(&mut self.input_alias, input_alias);
        walk_type_alias(self, alias);
        self.input_alias = outer;
    }

    fn visit_interface(&mut self, interface: &'t Interface) {
        if accessor_entity(interface.name()).is_some_and(|entity| self.graph.contains(entity)) {
            debug!(interface = interface.name(); "Processing delegate accessor");
        }
        walk_interface(self, interface);
    }

    fn visit_member(&mut self, owner: MemberOwner<'t>, member: &'t Member) {
        let Some(name) = member.name() else {
            walk_member(self, member);
            return;
        };

        if owner.is_signature_owner() && member.is_named_signature() && is_aux_member(name) {
            debug!(member = name; "Removing auxiliary member");
            self.remove(member);
            self.summary.aux_members_removed += 1;
            return;
        }

        if let MemberOwner::Interface(interface) = owner {
            let is_accessor = accessor_entity(interface.name())
                .is_some_and(|entity| self.graph.contains(entity));
            if is_accessor
                && member.kind() == MemberKind::Method
                && is_unsafe_accessor_method(name)
            {
                info!(interface = interface.name(), method = name; "Removing unsafe accessor method");
                self.remove(member);
                self.summary.accessor_methods_removed += 1;
                return;
            }
        }

        if matches!(owner, MemberOwner::TypeLiteral(_))
            && self.input_alias.is_some()
            && member.kind() == MemberKind::Property
            && is_unsafe_nested_write(name)
        {
            debug!(member = name; "Removing unsafe nested write");
            self.remove(member);
            self.summary.nested_writes_removed += 1;
            return;
        }

        walk_member(self, member);
    }
}
