//! Lifecycle analysis for the rfx rewrite engine.
//!
//! Given a tracked variable and the block it lives in, [`analyze`] walks the
//! block's statements in source order and splits the variable's lifetime
//! into [`Epoch`]s: one per assignment. Each epoch records the name
//! occurrences that read the value, the exit points reached while the value
//! is live, and the *last statement* (the direct member of the block that
//! holds the epoch's final read).
//!
//! Rules that acquire resources use the record to decide where a release
//! belongs; see [`release_placements`].
//!
//! The analysis never guesses: a binding it cannot place in a block is an
//! [`AnalysisError`], and callers must decline to edit.

mod error;
mod lifecycle;
mod policy;
mod scope;

pub use error::AnalysisError;
pub use lifecycle::{analyze, Epoch, ExitPoint, LifecycleRecord};
pub use policy::{release_placements, Placement};
pub use scope::{Binding, Scope};
