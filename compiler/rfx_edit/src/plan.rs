//! Whole-script validation.
//!
//! Both commit paths start from a [`Plan`]: the fate of every original node
//! an operation touches, plus the insertions grouped by position. Building
//! the plan is where every reason to refuse a commit is found, so nothing
//! is applied unless the plan exists.

use rustc_hash::{FxHashMap, FxHashSet};

use rfx_ir::{ChildRef, NodeId, Property, Tree};

use crate::error::{ApplyError, CommitError, ConflictError};
use crate::op::{Destination, EditOp, StagedId};
use crate::script::{EditScript, Proposed};

/// What happens to an original node at its old location.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Disposition {
    Replaced(StagedId),
    Removed,
    /// Relocated by a move; the old slot is vacated.
    MovedAway,
}

/// Content placed by an insertion.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Payload {
    Fragment(StagedId),
    /// An original subtree relocated by a move.
    Original(NodeId),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) struct Insertion {
    pub seq: u32,
    pub owner: &'static str,
    pub payload: Payload,
}

#[derive(Debug, Default)]
pub(crate) struct Plan {
    pub disposition: FxHashMap<NodeId, Disposition>,
    /// Rule responsible for each disposition.
    pub owners: FxHashMap<NodeId, &'static str>,
    pub before: FxHashMap<NodeId, Vec<Insertion>>,
    pub after: FxHashMap<NodeId, Vec<Insertion>>,
    /// Positional insertions, ordered by index then arrival.
    pub at: FxHashMap<(NodeId, Property), Vec<(usize, Insertion)>>,
}

impl Plan {
    /// Whether a strict ancestor of `node` is replaced or removed, so that
    /// whatever happens to `node` in place is moot.
    pub fn covered(&self, tree: &Tree, node: NodeId) -> bool {
        tree.ancestors(node).any(|a| {
            matches!(
                self.disposition.get(&a),
                Some(Disposition::Replaced(_) | Disposition::Removed)
            )
        })
    }

    /// Lists whose membership or order changes.
    pub fn touched_lists(&self, tree: &Tree) -> Vec<(NodeId, Property)> {
        let mut lists: Vec<(NodeId, Property)> = self.at.keys().copied().collect();
        let members = self
            .before
            .keys()
            .chain(self.after.keys())
            .chain(self.disposition.keys());
        for &node in members {
            if let Some(slot) = tree.slot(node).filter(|s| s.is_list_member()) {
                lists.push((slot.parent, slot.property));
            }
        }
        lists.sort_unstable();
        lists.dedup();
        lists
    }
}

/// Where an operation writes, for the ancestor checks.
#[derive(Copy, Clone)]
enum Location {
    /// Target, anchor or move destination anchor.
    Node(NodeId),
    /// Parent receiving a positional insertion.
    Parent(NodeId),
}

struct Builder<'a, 't> {
    script: &'a EditScript<'t>,
    tree: &'t Tree,
    plan: Plan,
    used: FxHashSet<StagedId>,
    writes: Vec<(Location, &'static str)>,
    sources: Vec<(NodeId, &'static str)>,
    /// Replace targets their own fragment moves, i.e. wrapped in place.
    wrapped: FxHashSet<NodeId>,
    removals: Vec<(NodeId, &'static str)>,
}

pub(crate) fn build(script: &EditScript<'_>) -> Result<Plan, CommitError> {
    if !script.conflicts().is_empty() {
        return Err(CommitError::Conflicts(script.conflicts().to_vec()));
    }
    verify_disjoint(script)?;

    let mut builder = Builder {
        script,
        tree: script.tree(),
        plan: Plan::default(),
        used: FxHashSet::default(),
        writes: Vec::new(),
        sources: Vec::new(),
        wrapped: FxHashSet::default(),
        removals: Vec::new(),
    };
    for proposed in script.ops() {
        builder
            .op(proposed)
            .map_err(|error| CommitError::Apply {
                rule: proposed.owner,
                error,
            })?;
    }
    builder.structure()?;
    for list in builder.plan.at.values_mut() {
        list.sort_by_key(|(index, insertion)| (*index, insertion.seq));
    }
    Ok(builder.plan)
}

/// Rescan the accepted operations: no original node may be claimed twice.
fn verify_disjoint(script: &EditScript<'_>) -> Result<(), CommitError> {
    let mut seen: FxHashMap<NodeId, &'static str> = FxHashMap::default();
    let mut conflicts = Vec::new();
    for proposed in script.ops() {
        for node in script.claimed_by(&proposed.op) {
            if let Some(&first) = seen.get(&node) {
                conflicts.push(ConflictError {
                    node,
                    kind: script.kind_of(node),
                    first,
                    second: proposed.owner,
                });
            } else {
                seen.insert(node, proposed.owner);
            }
        }
    }
    if conflicts.is_empty() {
        Ok(())
    } else {
        Err(CommitError::Conflicts(conflicts))
    }
}

impl Builder<'_, '_> {
    fn attached(&self, id: NodeId) -> Result<(), ApplyError> {
        if self.tree.is_attached(id) {
            Ok(())
        } else {
            Err(ApplyError::UnknownNode(id))
        }
    }

    fn list_member(&self, anchor: NodeId) -> Result<(), ApplyError> {
        self.attached(anchor)?;
        match self.tree.slot(anchor) {
            Some(slot) if slot.is_list_member() => Ok(()),
            _ => Err(ApplyError::NotInList(anchor)),
        }
    }

    fn list_len(&self, parent: NodeId, property: Property) -> Result<usize, ApplyError> {
        self.attached(parent)?;
        match self.tree.data(parent).child(property) {
            Some(ChildRef::List(ids)) => Ok(ids.len()),
            _ => Err(ApplyError::NotAList { parent, property }),
        }
    }

    fn fragment(&mut self, fragment: StagedId, location: NodeId) -> Result<(), ApplyError> {
        let staging = self.script.staging();
        if !staging.contains(fragment.node()) || staging.parent(fragment.node()).is_some() {
            return Err(ApplyError::UnknownFragment(fragment));
        }
        if !self.used.insert(fragment) {
            return Err(ApplyError::FragmentReused(fragment));
        }
        for (original, _) in self.script.placeholders(fragment) {
            self.attached(original)?;
        }
        for source in self.script.moved_sources(fragment) {
            if source != location && self.tree.is_ancestor_of(source, location) {
                return Err(ApplyError::MoveIntoItself(source));
            }
        }
        Ok(())
    }

    fn insertion(
        &mut self,
        to: Destination,
        proposed: &Proposed,
        payload: Payload,
    ) -> Result<(), ApplyError> {
        let insertion = Insertion {
            seq: proposed.seq,
            owner: proposed.owner,
            payload,
        };
        match to {
            Destination::Before(anchor) => {
                self.list_member(anchor)?;
                self.plan.before.entry(anchor).or_default().push(insertion);
            }
            Destination::After(anchor) => {
                self.list_member(anchor)?;
                self.plan.after.entry(anchor).or_default().push(insertion);
            }
            Destination::At {
                parent,
                property,
                index,
            } => {
                let len = self.list_len(parent, property)?;
                if index > len {
                    return Err(ApplyError::IndexOutOfBounds {
                        parent,
                        property,
                        index,
                        len,
                    });
                }
                self.plan
                    .at
                    .entry((parent, property))
                    .or_default()
                    .push((index, insertion));
            }
        }
        Ok(())
    }

    fn dispose(&mut self, node: NodeId, disposition: Disposition, owner: &'static str) {
        self.plan.disposition.insert(node, disposition);
        self.plan.owners.insert(node, owner);
    }

    fn op(&mut self, proposed: &Proposed) -> Result<(), ApplyError> {
        let owner = proposed.owner;
        let location = proposed.op.location();
        if let Some(fragment) = proposed.op.fragment() {
            self.fragment(fragment, location)?;
            for source in self.script.moved_sources(fragment) {
                if proposed.op.target() == Some(source) {
                    self.wrapped.insert(source);
                } else {
                    self.dispose(source, Disposition::MovedAway, owner);
                    self.sources.push((source, owner));
                }
            }
        }

        match proposed.op {
            EditOp::Replace { target, with } => {
                self.attached(target)?;
                self.dispose(target, Disposition::Replaced(with), owner);
                self.writes.push((Location::Node(target), owner));
            }
            EditOp::Remove { target } => {
                self.attached(target)?;
                self.dispose(target, Disposition::Removed, owner);
                self.writes.push((Location::Node(target), owner));
                self.removals.push((target, owner));
            }
            EditOp::InsertBefore { anchor, node } => {
                self.insertion(Destination::Before(anchor), proposed, Payload::Fragment(node))?;
                self.writes.push((Location::Node(anchor), owner));
            }
            EditOp::InsertAfter { anchor, node } => {
                self.insertion(Destination::After(anchor), proposed, Payload::Fragment(node))?;
                self.writes.push((Location::Node(anchor), owner));
            }
            EditOp::InsertAt {
                parent,
                property,
                index,
                node,
            } => {
                let to = Destination::At {
                    parent,
                    property,
                    index,
                };
                self.insertion(to, proposed, Payload::Fragment(node))?;
                self.writes.push((Location::Parent(parent), owner));
            }
            EditOp::Move { target, to } => {
                self.attached(target)?;
                let dest = to.location();
                if dest == target || self.tree.is_ancestor_of(target, dest) {
                    return Err(ApplyError::MoveIntoItself(target));
                }
                self.insertion(to, proposed, Payload::Original(target))?;
                self.dispose(target, Disposition::MovedAway, owner);
                self.sources.push((target, owner));
                let write = match to {
                    Destination::Before(anchor) | Destination::After(anchor) => {
                        Location::Node(anchor)
                    }
                    Destination::At { parent, .. } => Location::Parent(parent),
                };
                self.writes.push((write, owner));
            }
        }
        Ok(())
    }

    /// Cross-operation checks, once every disposition is known.
    fn structure(&self) -> Result<(), CommitError> {
        let fail = |rule, error| CommitError::Apply { rule, error };

        for &(location, owner) in &self.writes {
            let node = match location {
                Location::Node(node) => node,
                Location::Parent(parent) => {
                    if self.plan.disposition.contains_key(&parent) {
                        return Err(fail(owner, ApplyError::EditedParent { parent }));
                    }
                    parent
                }
            };
            if let Some(ancestor) = self
                .tree
                .ancestors(node)
                .find(|a| self.plan.disposition.contains_key(a))
            {
                return Err(fail(owner, ApplyError::UnderEditedAncestor { node, ancestor }));
            }
        }

        for &(source, owner) in &self.sources {
            if let Some(ancestor) = self.tree.ancestors(source).find(|a| {
                self.wrapped.contains(a)
                    || self.plan.disposition.get(a) == Some(&Disposition::MovedAway)
            })
            {
                return Err(fail(
                    owner,
                    ApplyError::UnderEditedAncestor {
                        node: source,
                        ancestor,
                    },
                ));
            }
            if !self.plan.covered(self.tree, source) && !self.removable(source) {
                return Err(fail(owner, ApplyError::NotRemovable(source)));
            }
        }

        for &(target, owner) in &self.removals {
            if !self.removable(target) {
                return Err(fail(owner, ApplyError::NotRemovable(target)));
            }
        }
        Ok(())
    }

    /// List members and optional children can vacate their slot.
    fn removable(&self, node: NodeId) -> bool {
        let Some(slot) = self.tree.slot(node) else {
            return false;
        };
        slot.is_list_member()
            || matches!(
                self.tree.data(slot.parent).child(slot.property),
                Some(ChildRef::Optional(_))
            )
    }
}

#[cfg(test)]
mod tests;
