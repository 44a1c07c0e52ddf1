//! rfx IR - syntax tree model for the rewrite engine
//!
//! This crate contains the data structures every other rfx crate shares:
//! - Spans for byte ranges in the original source
//! - Names for interned identifiers and qualified type names
//! - The node arena (`Tree`) with parent links and structural slots
//! - Binding side tables resolved by the front end
//! - Project options consumed read-only by rules
//!
//! # Design Philosophy
//!
//! - **Intern Everything**: identifiers and type names are `Name(u32)`
//! - **Flatten Everything**: children are `NodeId(u32)` indices, never boxes
//! - **Read-only during a pass**: edits are staged elsewhere and committed
//!   into a fresh tree

/// Compile-time assertion that a type has a specific size.
#[macro_export]
macro_rules! static_assert_size {
    ($ty:ty, $size:expr) => {
        const _: [(); $size] = [(); ::std::mem::size_of::<$ty>()];
    };
}

pub mod binding;
mod interner;
pub mod node;
mod node_id;
pub mod ops;
mod options;
mod span;
mod stack;
mod tree;

pub use binding::{Bindings, MethodRef, TypeRef, VarId, VarInfo, VarKind};
pub use interner::{Name, SharedInterner, StringInterner};
pub use node::{
    ChildMut, ChildRef, KindSet, Node, NodeData, NodeKind, PlaceholderMode, Property, Slot,
};
pub use node_id::NodeId;
pub use ops::{AssignOp, BinaryOp, LitKind, PostfixOp, PrefixOp};
pub use options::{LanguageLevel, ProjectOptions, UnknownLevel};
pub use span::{Span, SpanError};
pub use stack::ensure_sufficient_stack;
pub use tree::{Ancestors, Tree};

static_assert_size!(NodeId, 4);
static_assert_size!(Name, 4);
static_assert_size!(Span, 8);
