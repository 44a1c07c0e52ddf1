//! Edit script for the rfx rewrite engine.
//!
//! Rules never touch the tree they inspect. They stage new nodes with a
//! [`NodeBuilder`] and propose [`EditOp`]s against an [`EditScript`], which
//! records who proposed what and rejects overlapping proposals as they
//! arrive. At the end of a pass the script is committed exactly once:
//!
//! - [`EditScript::commit_tree`] produces a new [`rfx_ir::Tree`]
//! - [`EditScript::commit_text`] produces edited source text in which every
//!   byte outside the edited regions is preserved
//!
//! Both paths validate the whole script first and either apply everything
//! or nothing.

mod builder;
mod commit;
mod error;
mod layout;
mod op;
mod plan;
mod render;
mod script;
mod tracker;

pub use builder::NodeBuilder;
pub use error::{ApplyError, CommitError, ConflictError};
pub use op::{Destination, EditOp, StagedId};
pub use render::render_fragment;
pub use script::{EditScript, OwnerCounts, Proposed};
pub use tracker::{ChangeTracker, EditConflict, TextEdit};

#[cfg(test)]
mod test_util;
