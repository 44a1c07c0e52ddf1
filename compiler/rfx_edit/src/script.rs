//! The per-pass edit script.

use rustc_hash::FxHashMap;
use tracing::{debug, trace};

use rfx_ir::{Node, NodeData, NodeId, NodeKind, PlaceholderMode, Property, Tree};

use crate::builder::NodeBuilder;
use crate::error::{CommitError, ConflictError};
use crate::op::{Destination, EditOp, StagedId};
use crate::plan::Plan;
use crate::{commit, plan};

/// Owner recorded before any rule has been selected.
const NO_OWNER: &str = "<unowned>";

/// An accepted operation with its provenance.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Proposed {
    pub op: EditOp,
    /// Rule that proposed it.
    pub owner: &'static str,
    /// Arrival order; breaks ties between insertions at one position.
    pub seq: u32,
}

/// Per-rule proposal counts.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct OwnerCounts {
    /// Calls to [`EditScript::add`], accepted or not.
    pub proposed: usize,
    /// Operations currently held by the script.
    pub held: usize,
    /// Proposals rejected, or whose claim another proposal collided with.
    pub conflicted: usize,
}

/// Ordered collection of pending operations against one tree.
///
/// Holds a shared borrow of the tree, so the tree cannot change (or be
/// dropped) while edits against it are pending.
pub struct EditScript<'t> {
    tree: &'t Tree,
    staging: Tree,
    ops: Vec<Proposed>,
    /// Original node to the seq of the operation claiming it.
    claims: FxHashMap<NodeId, u32>,
    conflicts: Vec<ConflictError>,
    owner: &'static str,
    counts: FxHashMap<&'static str, OwnerCounts>,
    next_seq: u32,
}

impl<'t> EditScript<'t> {
    pub fn new(tree: &'t Tree) -> Self {
        EditScript {
            tree,
            staging: Tree::new("", tree.interner().clone()),
            ops: Vec::new(),
            claims: FxHashMap::default(),
            conflicts: Vec::new(),
            owner: NO_OWNER,
            counts: FxHashMap::default(),
            next_seq: 0,
        }
    }

    #[inline]
    pub fn tree(&self) -> &'t Tree {
        self.tree
    }

    /// Arena holding staged fragments.
    #[inline]
    pub fn staging(&self) -> &Tree {
        &self.staging
    }

    /// Attribute subsequent proposals to `owner`.
    pub fn set_owner(&mut self, owner: &'static str) {
        self.owner = owner;
    }

    #[inline]
    pub fn owner(&self) -> &'static str {
        self.owner
    }

    pub fn builder(&mut self) -> NodeBuilder<'_> {
        NodeBuilder::new(&mut self.staging)
    }

    pub fn ops(&self) -> &[Proposed] {
        &self.ops
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn conflicts(&self) -> &[ConflictError] {
        &self.conflicts
    }

    pub fn counts(&self, owner: &str) -> OwnerCounts {
        self.counts.get(owner).copied().unwrap_or_default()
    }

    /// Kind of an original node; unknown ids read as `Empty`.
    pub(crate) fn kind_of(&self, node: NodeId) -> NodeKind {
        self.tree.try_node(node).map_or(NodeKind::Empty, Node::kind)
    }

    /// Whether `node` is already claimed by a pending operation.
    pub fn is_claimed(&self, node: NodeId) -> bool {
        self.claims.contains_key(&node)
    }

    /// Schedule `op`. A proposal that claims a node another pending
    /// operation already claims is rejected, and the script will refuse to
    /// commit.
    pub fn add(&mut self, op: EditOp) -> Result<(), ConflictError> {
        let owner = self.owner;
        self.counts.entry(owner).or_default().proposed += 1;

        let claimed = self.claimed_by(&op);
        for &node in &claimed {
            let Some(&holder) = self.claims.get(&node) else {
                continue;
            };
            let first = self
                .ops
                .iter()
                .find(|p| p.seq == holder)
                .map_or(NO_OWNER, |p| p.owner);
            let conflict = ConflictError {
                node,
                kind: self.kind_of(node),
                first,
                second: owner,
            };
            debug!(%conflict, "rejected proposal");
            self.counts.entry(owner).or_default().conflicted += 1;
            if first != owner {
                self.counts.entry(first).or_default().conflicted += 1;
            }
            self.conflicts.push(conflict.clone());
            return Err(conflict);
        }

        let seq = self.next_seq;
        self.next_seq += 1;
        for node in claimed {
            self.claims.insert(node, seq);
        }
        trace!(op = op.name(), location = ?op.location(), owner, seq, "proposed");
        self.ops.push(Proposed { op, owner, seq });
        self.counts.entry(owner).or_default().held += 1;
        Ok(())
    }

    pub fn replace(&mut self, target: NodeId, with: StagedId) -> Result<(), ConflictError> {
        self.add(EditOp::Replace { target, with })
    }

    pub fn insert_before(&mut self, anchor: NodeId, node: StagedId) -> Result<(), ConflictError> {
        self.add(EditOp::InsertBefore { anchor, node })
    }

    pub fn insert_after(&mut self, anchor: NodeId, node: StagedId) -> Result<(), ConflictError> {
        self.add(EditOp::InsertAfter { anchor, node })
    }

    pub fn insert_at(
        &mut self,
        parent: NodeId,
        property: Property,
        index: usize,
        node: StagedId,
    ) -> Result<(), ConflictError> {
        self.add(EditOp::InsertAt {
            parent,
            property,
            index,
            node,
        })
    }

    pub fn remove(&mut self, target: NodeId) -> Result<(), ConflictError> {
        self.add(EditOp::Remove { target })
    }

    pub fn move_to(&mut self, target: NodeId, to: Destination) -> Result<(), ConflictError> {
        self.add(EditOp::Move { target, to })
    }

    /// Drop every operation and recorded conflict attributed to `owner`.
    /// Returns how many operations were dropped.
    pub fn discard_owner(&mut self, owner: &str) -> usize {
        let before = self.ops.len();
        self.ops.retain(|p| p.owner != owner);
        self.conflicts.retain(|c| c.first != owner && c.second != owner);
        let dropped = before - self.ops.len();
        if let Some(counts) = self.counts.get_mut(owner) {
            counts.held = 0;
        }
        self.rebuild_claims();
        if dropped > 0 {
            debug!(owner, dropped, "discarded proposals");
        }
        dropped
    }

    fn rebuild_claims(&mut self) {
        self.claims.clear();
        for i in 0..self.ops.len() {
            let proposed = self.ops[i];
            for node in self.claimed_by(&proposed.op) {
                self.claims.insert(node, proposed.seq);
            }
        }
    }

    /// Original nodes an operation takes exclusive hold of: the node whose
    /// slot it overwrites or vacates, plus every node its fragment moves.
    pub(crate) fn claimed_by(&self, op: &EditOp) -> Vec<NodeId> {
        let mut claimed: Vec<NodeId> = op.target().into_iter().collect();
        if let Some(fragment) = op.fragment() {
            for source in self.moved_sources(fragment) {
                if !claimed.contains(&source) {
                    claimed.push(source);
                }
            }
        }
        claimed
    }

    /// Originals referenced by `Move` placeholders inside a fragment.
    pub(crate) fn moved_sources(&self, fragment: StagedId) -> Vec<NodeId> {
        self.placeholders(fragment)
            .into_iter()
            .filter_map(|(original, mode)| (mode == PlaceholderMode::Move).then_some(original))
            .collect()
    }

    pub(crate) fn placeholders(&self, fragment: StagedId) -> Vec<(NodeId, PlaceholderMode)> {
        if !self.staging.contains(fragment.0) {
            return Vec::new();
        }
        self.staging
            .descendants(fragment.0)
            .into_iter()
            .filter_map(|id| match self.staging.data(id) {
                NodeData::Placeholder { original, mode } => Some((*original, *mode)),
                _ => None,
            })
            .collect()
    }

    /// Validate the whole script without applying it.
    pub fn validate(&self) -> Result<(), CommitError> {
        plan::build(self).map(|_| ())
    }

    /// Apply every operation to a copy of the tree. All or nothing: on
    /// error the original tree is untouched and no partial result exists.
    #[tracing::instrument(level = "debug", skip_all, fields(ops = self.ops.len()))]
    pub fn commit_tree(self) -> Result<Tree, CommitError> {
        let plan: Plan = plan::build(&self)?;
        let tree = commit::tree::apply(&self, &plan);
        debug!(nodes = tree.len(), "committed tree");
        Ok(tree)
    }

    /// Apply every operation to the source text of the tree. Bytes outside
    /// edited regions are preserved exactly.
    #[tracing::instrument(level = "debug", skip_all, fields(ops = self.ops.len()))]
    pub fn commit_text(self) -> Result<String, CommitError> {
        let plan: Plan = plan::build(&self)?;
        let text = commit::text::apply(&self, &plan)?;
        debug!(len = text.len(), "committed text");
        Ok(text)
    }
}
