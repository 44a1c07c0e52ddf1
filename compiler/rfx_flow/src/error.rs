//! Analysis errors.

use rfx_ir::{NodeId, VarKind};
use thiserror::Error;

/// The analyzer cannot establish where a binding lives. Callers treat the
/// binding's state as unknown and leave the code alone.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum AnalysisError {
    #[error("{0:?} does not resolve to a variable")]
    Unresolved(NodeId),

    #[error("{kind:?} variable declared by {decl:?} has no block scope")]
    NotLocal { decl: NodeId, kind: VarKind },

    #[error("no enclosing block for the declaration {0:?}")]
    NoScope(NodeId),

    #[error("{0:?} is not a block")]
    NotABlock(NodeId),

    #[error("statement range {start}..{end} is out of bounds for {block:?} ({len} statements)")]
    BadRange {
        block: NodeId,
        start: usize,
        end: usize,
        len: usize,
    },
}
