//! Edit script errors.

use rfx_ir::{NodeId, NodeKind, Property};
use thiserror::Error;

use crate::op::StagedId;

/// Two proposals claim the same original node.
///
/// Raised by [`EditScript::add`](crate::EditScript::add) as soon as the
/// second proposal arrives; the script remembers it and refuses to commit.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("`{first}` and `{second}` both edit {kind:?} {node:?}")]
pub struct ConflictError {
    pub node: NodeId,
    pub kind: NodeKind,
    /// Rule holding the earlier claim.
    pub first: &'static str,
    /// Rule whose proposal was rejected.
    pub second: &'static str,
}

/// A proposal that cannot be applied to the tree it was made against.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ApplyError {
    #[error("{0:?} is not an attached node of the edited tree")]
    UnknownNode(NodeId),

    #[error("staged fragment {0:?} does not exist or is nested in another fragment")]
    UnknownFragment(StagedId),

    #[error("staged fragment {0:?} is placed by more than one operation")]
    FragmentReused(StagedId),

    #[error("{0:?} is not a list member; insert before/after needs a list anchor")]
    NotInList(NodeId),

    #[error("{property:?} of {parent:?} is not a list property")]
    NotAList { parent: NodeId, property: Property },

    #[error("index {index} is out of bounds for {property:?} of {parent:?} (len {len})")]
    IndexOutOfBounds {
        parent: NodeId,
        property: Property,
        index: usize,
        len: usize,
    },

    /// Removing the node would leave a mandatory slot empty.
    #[error("{0:?} occupies a required slot and cannot be removed or moved away")]
    NotRemovable(NodeId),

    #[error("{node:?} lies inside {ancestor:?}, which is edited by another operation")]
    UnderEditedAncestor { node: NodeId, ancestor: NodeId },

    #[error("cannot insert into {parent:?}, which is itself edited")]
    EditedParent { parent: NodeId },

    #[error("{0:?} would be moved into its own subtree")]
    MoveIntoItself(NodeId),

    /// The text layout has no place to put an item in an empty list.
    #[error("no insertion point for {property:?} of {parent:?} in the source text")]
    NoInsertionPoint { parent: NodeId, property: Property },

    #[error("text edits overlap at bytes {start}..{end}")]
    Overlap { start: u32, end: u32 },
}

/// Why a commit was refused. Nothing was applied.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum CommitError {
    #[error("{} conflicting proposal(s); first: {}", .0.len(), .0.first().map(ToString::to_string).unwrap_or_default())]
    Conflicts(Vec<ConflictError>),

    #[error("edit by `{rule}` cannot be applied: {error}")]
    Apply {
        rule: &'static str,
        #[source]
        error: ApplyError,
    },
}

impl CommitError {
    /// Names of the rules the refusal is attributed to, deduplicated.
    pub fn responsible_rules(&self) -> Vec<&'static str> {
        let mut rules = match self {
            CommitError::Conflicts(conflicts) => conflicts
                .iter()
                .flat_map(|c| [c.first, c.second])
                .collect(),
            CommitError::Apply { rule, .. } => vec![*rule],
        };
        rules.sort_unstable();
        rules.dedup();
        rules
    }
}
