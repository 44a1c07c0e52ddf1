//! Edit operations.

use rfx_ir::{NodeId, Property};

/// Root of a staged fragment built with a [`NodeBuilder`](crate::NodeBuilder).
///
/// Staged ids live in the script's staging arena, never in the tree being
/// edited, so they cannot be confused with original node ids.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub struct StagedId(pub(crate) NodeId);

impl StagedId {
    #[inline]
    pub fn node(self) -> NodeId {
        self.0
    }
}

/// Where a moved node lands.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Destination {
    Before(NodeId),
    After(NodeId),
    At {
        parent: NodeId,
        property: Property,
        index: usize,
    },
}

/// One staged structural change against the original tree.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum EditOp {
    /// Substitute `target` with a staged fragment.
    Replace { target: NodeId, with: StagedId },
    /// Insert into the list holding `anchor`, just before it.
    InsertBefore { anchor: NodeId, node: StagedId },
    /// Insert into the list holding `anchor`, just after it.
    InsertAfter { anchor: NodeId, node: StagedId },
    /// Insert at a position of a list property.
    InsertAt {
        parent: NodeId,
        property: Property,
        index: usize,
        node: StagedId,
    },
    /// Delete a list member or optional child.
    Remove { target: NodeId },
    /// Relocate an original subtree.
    Move { target: NodeId, to: Destination },
}

impl EditOp {
    /// Staged fragment this operation places, if any.
    pub fn fragment(&self) -> Option<StagedId> {
        match *self {
            EditOp::Replace { with, .. } => Some(with),
            EditOp::InsertBefore { node, .. }
            | EditOp::InsertAfter { node, .. }
            | EditOp::InsertAt { node, .. } => Some(node),
            EditOp::Remove { .. } | EditOp::Move { .. } => None,
        }
    }

    /// The node whose slot this operation overwrites or vacates, if any.
    pub fn target(&self) -> Option<NodeId> {
        match *self {
            EditOp::Replace { target, .. }
            | EditOp::Remove { target }
            | EditOp::Move { target, .. } => Some(target),
            EditOp::InsertBefore { .. } | EditOp::InsertAfter { .. } | EditOp::InsertAt { .. } => {
                None
            }
        }
    }

    /// Original node the operation is positioned against.
    pub fn location(&self) -> NodeId {
        match *self {
            EditOp::Replace { target, .. } | EditOp::Remove { target } => target,
            EditOp::InsertBefore { anchor, .. } | EditOp::InsertAfter { anchor, .. } => anchor,
            EditOp::InsertAt { parent, .. } => parent,
            EditOp::Move { to, .. } => to.location(),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            EditOp::Replace { .. } => "replace",
            EditOp::InsertBefore { .. } => "insert-before",
            EditOp::InsertAfter { .. } => "insert-after",
            EditOp::InsertAt { .. } => "insert-at",
            EditOp::Remove { .. } => "remove",
            EditOp::Move { .. } => "move",
        }
    }
}

impl Destination {
    pub fn location(self) -> NodeId {
        match self {
            Destination::Before(anchor) | Destination::After(anchor) => anchor,
            Destination::At { parent, .. } => parent,
        }
    }
}
