//! What a rule sees while it is offered a node.

use rustc_hash::FxHashMap;
use tracing::debug;

use rfx_edit::{Destination, EditOp, EditScript, NodeBuilder, StagedId};
use rfx_flow::{analyze, AnalysisError, Binding, LifecycleRecord, Scope};
use rfx_ir::{NodeId, ProjectOptions, Property, Tree};

/// Side effects already performed in this pass, keyed by a rule-chosen
/// string, remembering which rule performed each.
#[derive(Default)]
pub(crate) struct SideEffects {
    performed: FxHashMap<String, &'static str>,
}

impl SideEffects {
    fn claim(&mut self, key: &str, owner: &'static str) -> bool {
        if self.performed.contains_key(key) {
            return false;
        }
        self.performed.insert(key.to_owned(), owner);
        true
    }

    /// Forget the keys of a rule whose edits were dropped.
    pub(crate) fn forget(&mut self, owner: &str) {
        self.performed.retain(|_, o| *o != owner);
    }
}

/// Read-only view of the pass plus the edit script, for one rule.
///
/// Proposals are attributed to the rule the context was opened for. A
/// rejected proposal is logged and reported back as `false`; the pass will
/// refuse to commit, so a rule never needs to react to a conflict beyond
/// not building on the rejected edit.
pub struct RuleContext<'p, 't> {
    tree: &'t Tree,
    options: &'p ProjectOptions,
    script: &'p mut EditScript<'t>,
    effects: &'p mut SideEffects,
    rule: &'static str,
}

impl<'p, 't> RuleContext<'p, 't> {
    pub(crate) fn new(
        options: &'p ProjectOptions,
        script: &'p mut EditScript<'t>,
        effects: &'p mut SideEffects,
        rule: &'static str,
    ) -> Self {
        script.set_owner(rule);
        RuleContext {
            tree: script.tree(),
            options,
            script,
            effects,
            rule,
        }
    }

    #[inline]
    pub fn tree(&self) -> &'t Tree {
        self.tree
    }

    #[inline]
    pub fn options(&self) -> &ProjectOptions {
        self.options
    }

    /// Name of the rule this context belongs to.
    #[inline]
    pub fn rule(&self) -> &'static str {
        self.rule
    }

    /// Stage new nodes for a proposal.
    pub fn builder(&mut self) -> NodeBuilder<'_> {
        self.script.builder()
    }

    /// Whether some proposal of this pass already claims `node`.
    pub fn is_claimed(&self, node: NodeId) -> bool {
        self.script.is_claimed(node)
    }

    /// Queue `op`. Returns whether it was accepted.
    pub fn propose(&mut self, op: EditOp) -> bool {
        match self.script.add(op) {
            Ok(()) => true,
            Err(conflict) => {
                debug!(rule = self.rule, %conflict, "proposal rejected");
                false
            }
        }
    }

    pub fn replace(&mut self, target: NodeId, with: StagedId) -> bool {
        self.propose(EditOp::Replace { target, with })
    }

    pub fn insert_before(&mut self, anchor: NodeId, node: StagedId) -> bool {
        self.propose(EditOp::InsertBefore { anchor, node })
    }

    pub fn insert_after(&mut self, anchor: NodeId, node: StagedId) -> bool {
        self.propose(EditOp::InsertAfter { anchor, node })
    }

    pub fn insert_at(
        &mut self,
        parent: NodeId,
        property: Property,
        index: usize,
        node: StagedId,
    ) -> bool {
        self.propose(EditOp::InsertAt {
            parent,
            property,
            index,
            node,
        })
    }

    pub fn remove(&mut self, target: NodeId) -> bool {
        self.propose(EditOp::Remove { target })
    }

    pub fn move_to(&mut self, target: NodeId, to: Destination) -> bool {
        self.propose(EditOp::Move { target, to })
    }

    /// Record a once-per-pass side effect, such as adding an import.
    /// Returns `true` only for the first caller of the pass for `key`.
    pub fn first_time(&mut self, key: &str) -> bool {
        self.effects.claim(key, self.rule)
    }

    /// Lifecycle of the variable declared or named by `node`, over its
    /// whole scope.
    pub fn lifecycle(&self, node: NodeId) -> Result<LifecycleRecord, AnalysisError> {
        let binding = Binding::resolve(self.tree, node)?;
        let scope = Scope::of(self.tree, &binding)?;
        analyze(self.tree, &binding, &scope)
    }

    /// Lifecycle of the variable named by `node`, restricted to statements
    /// `start..end` of `block`.
    pub fn lifecycle_in(
        &self,
        node: NodeId,
        block: NodeId,
        start: usize,
        end: usize,
    ) -> Result<LifecycleRecord, AnalysisError> {
        let binding = Binding::resolve(self.tree, node)?;
        let scope = Scope::range(self.tree, block, start, end)?;
        analyze(self.tree, &binding, &scope)
    }
}

#[cfg(test)]
mod tests;
