//! Applying a validated plan.
//!
//! Every fragment is read before any slot changes: copies clone from the
//! untouched original and moves refer to original nodes, so the order the
//! operations arrived in never affects what a copy or move sees.

pub(crate) mod text;
pub(crate) mod tree;
