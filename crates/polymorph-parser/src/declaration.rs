//! TypeScript declaration files.
//!
//! [`parse_declarations`](crate::parse_declarations) produces a
//! [`DeclarationTree`]; the [`Visitor`] trait walks it.

mod parser;
mod tree;
mod visit;

pub(crate) use parser::build_tree;
pub use tree::{
    Class, DeclarationTree, Interface, Member, MemberBlock, MemberKind, Namespace, ObjectType,
    OtherStatement, Statement, TypeAlias, TypeExpr, TypeParam,
};
pub use visit::{
    MemberOwner, Visitor, walk_class, walk_interface, walk_member, walk_namespace,
    walk_object_type, walk_other, walk_statement, walk_tree, walk_type_alias,
};
