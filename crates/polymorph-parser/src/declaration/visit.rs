//! Read-only traversal of a [`DeclarationTree`].
//!
//! Implementors override the `visit_*` hooks they care about and call the
//! matching `walk_*` function to continue into children. Every node is
//! visited exactly once, in source order.

use crate::declaration::tree::{
    Class, DeclarationTree, Interface, Member, Namespace, ObjectType, OtherStatement, Statement,
    TypeAlias,
};

/// The declaration that directly contains a member.
#[derive(Debug, Clone, Copy)]
pub enum MemberOwner<'t> {
    TypeLiteral(&'t ObjectType),
    Interface(&'t Interface),
    Class(&'t Class),
}

impl MemberOwner<'_> {
    /// Returns `true` for owners whose members are type signatures
    /// (object-type literals and interfaces).
    pub fn is_signature_owner(&self) -> bool {
        !matches!(self, MemberOwner::Class(_))
    }
}

pub trait Visitor<'t> {
    fn visit_statement(&mut self, statement: &'t Statement) {
        walk_statement(self, statement);
    }

    fn visit_type_alias(&mut self, alias: &'t TypeAlias) {
        walk_type_alias(self, alias);
    }

    fn visit_interface(&mut self, interface: &'t Interface) {
        walk_interface(self, interface);
    }

    fn visit_class(&mut self, class: &'t Class) {
        walk_class(self, class);
    }

    fn visit_namespace(&mut self, namespace: &'t Namespace) {
        walk_namespace(self, namespace);
    }

    fn visit_other(&mut self, other: &'t OtherStatement) {
        walk_other(self, other);
    }

    fn visit_object_type(&mut self, object: &'t ObjectType) {
        walk_object_type(self, object);
    }

    fn visit_member(&mut self, _owner: MemberOwner<'t>, member: &'t Member) {
        walk_member(self, member);
    }
}

pub fn walk_tree<'t, V: Visitor<'t> + ?Sized>(visitor: &mut V, tree: &'t DeclarationTree) {
    for statement in tree.statements() {
        visitor.visit_statement(statement);
    }
}

pub fn walk_statement<'t, V: Visitor<'t> + ?Sized>(visitor: &mut V, statement: &'t Statement) {
    match statement {
        Statement::TypeAlias(alias) => visitor.visit_type_alias(alias),
        Statement::Interface(interface) => visitor.visit_interface(interface),
        Statement::Class(class) => visitor.visit_class(class),
        Statement::Namespace(namespace) => visitor.visit_namespace(namespace),
        Statement::Other(other) => visitor.visit_other(other),
    }
}

pub fn walk_type_alias<'t, V: Visitor<'t> + ?Sized>(visitor: &mut V, alias: &'t TypeAlias) {
    for object in alias.ty().objects() {
        visitor.visit_object_type(object);
    }
}

pub fn walk_interface<'t, V: Visitor<'t> + ?Sized>(visitor: &mut V, interface: &'t Interface) {
    for member in interface.members() {
        visitor.visit_member(MemberOwner::Interface(interface), member);
    }
}

pub fn walk_class<'t, V: Visitor<'t> + ?Sized>(visitor: &mut V, class: &'t Class) {
    for member in class.members() {
        visitor.visit_member(MemberOwner::Class(class), member);
    }
}

pub fn walk_namespace<'t, V: Visitor<'t> + ?Sized>(visitor: &mut V, namespace: &'t Namespace) {
    for statement in namespace.statements() {
        visitor.visit_statement(statement);
    }
}

pub fn walk_other<'t, V: Visitor<'t> + ?Sized>(visitor: &mut V, other: &'t OtherStatement) {
    for object in other.objects() {
        visitor.visit_object_type(object);
    }
}

pub fn walk_object_type<'t, V: Visitor<'t> + ?Sized>(visitor: &mut V, object: &'t ObjectType) {
    for member in object.members() {
        visitor.visit_member(MemberOwner::TypeLiteral(object), member);
    }
}

pub fn walk_member<'t, V: Visitor<'t> + ?Sized>(visitor: &mut V, member: &'t Member) {
    for object in member.objects() {
        visitor.visit_object_type(object);
    }
}
