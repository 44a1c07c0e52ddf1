//! Single pre-order walk offering nodes to interested rules.

use std::panic::{catch_unwind, AssertUnwindSafe};

use smallvec::SmallVec;
use tracing::{trace, warn};

use rfx_edit::EditScript;
use rfx_ir::{NodeId, NodeKind, ProjectOptions};

use crate::cancel::CancellationToken;
use crate::context::{RuleContext, SideEffects};
use crate::error::RuleError;
use crate::report::RuleFailure;
use crate::rule::{Rule, Visit};

/// Rules of one pass, indexed by the node kinds they are interested in.
///
/// Registration happens before a pass; a pass borrows the dispatcher
/// immutably, so the rule set cannot change while it runs.
pub struct Dispatcher<'r> {
    rules: Vec<&'r dyn Rule>,
    /// Indices into `rules`, per `NodeKind`, in registration order.
    table: Vec<SmallVec<[u16; 4]>>,
}

/// What one walk did, beyond the proposals left in the script.
pub(crate) struct Walk {
    pub cancelled: bool,
    pub failures: Vec<RuleFailure>,
    /// Edits dropped per rule index.
    pub dropped: Vec<usize>,
    pub visited: usize,
}

impl Default for Dispatcher<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'r> Dispatcher<'r> {
    pub fn new() -> Self {
        Dispatcher {
            rules: Vec::new(),
            table: vec![SmallVec::new(); NodeKind::COUNT],
        }
    }

    /// Add `rule` after every rule registered so far. A second rule with an
    /// already registered name is ignored.
    pub fn register(&mut self, rule: &'r dyn Rule) {
        if self.rules.iter().any(|r| r.name() == rule.name()) {
            warn!(rule = rule.name(), "rule registered twice; ignoring");
            return;
        }
        let Ok(index) = u16::try_from(self.rules.len()) else {
            warn!(rule = rule.name(), "too many rules; ignoring");
            return;
        };
        self.rules.push(rule);
        for kind in rule.interest().kinds() {
            self.table[kind as usize].push(index);
        }
    }

    pub fn rules(&self) -> &[&'r dyn Rule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Rules offered nodes of `kind`, in order.
    pub fn interested(&self, kind: NodeKind) -> impl Iterator<Item = &'r dyn Rule> + '_ {
        self.table[kind as usize]
            .iter()
            .map(|&i| self.rules[usize::from(i)])
    }

    /// Walk the script's tree, letting rules propose into `script`.
    ///
    /// At each node the interested rules run in registration order until
    /// one returns [`Visit::SkipSubtree`]; then the node's children are
    /// not visited. A failing rule has its proposals and side-effect keys
    /// dropped and is offered nothing more. Rules that do not apply to
    /// `options` are never offered a node. Cancellation is checked before
    /// every statement and declaration.
    pub(crate) fn walk<'t>(
        &self,
        script: &mut EditScript<'t>,
        options: &ProjectOptions,
        cancel: &CancellationToken,
    ) -> Walk {
        let tree = script.tree();
        let mut effects = SideEffects::default();
        let mut disabled: Vec<bool> = self.rules.iter().map(|r| !r.applies_to(options)).collect();
        let mut walk = Walk {
            cancelled: false,
            failures: Vec::new(),
            dropped: vec![0; self.rules.len()],
            visited: 0,
        };
        if !tree.contains(tree.root()) {
            return walk;
        }

        let mut stack: Vec<NodeId> = vec![tree.root()];
        while let Some(node) = stack.pop() {
            let kind = tree.kind(node);
            if (kind.is_statement() || kind.is_declaration()) && cancel.is_cancelled() {
                walk.cancelled = true;
                break;
            }
            walk.visited += 1;

            let mut skip = false;
            for &index in &self.table[kind as usize] {
                let index = usize::from(index);
                if disabled[index] {
                    continue;
                }
                let rule = self.rules[index];
                let mut cx = RuleContext::new(options, script, &mut effects, rule.name());
                match invoke(rule, node, &mut cx) {
                    Ok(Visit::Descend) => {}
                    Ok(Visit::SkipSubtree) => {
                        trace!(rule = rule.name(), ?node, ?kind, "skip subtree");
                        skip = true;
                        break;
                    }
                    Err(error) => {
                        disabled[index] = true;
                        let dropped = script.discard_owner(rule.name());
                        effects.forget(rule.name());
                        warn!(rule = rule.name(), ?node, %error, dropped, "rule failed; dropping its edits");
                        walk.dropped[index] += dropped;
                        walk.failures.push(RuleFailure {
                            rule: rule.name(),
                            node,
                            error,
                        });
                    }
                }
            }

            if !skip {
                stack.extend(tree.children(node).into_iter().rev());
            }
        }
        walk
    }
}

/// Run one handler, turning a panic into a [`RuleError::Panicked`].
fn invoke(rule: &dyn Rule, node: NodeId, cx: &mut RuleContext<'_, '_>) -> Result<Visit, RuleError> {
    catch_unwind(AssertUnwindSafe(|| rule.visit(node, cx))).unwrap_or_else(|payload| {
        let message = if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else {
            "rule panicked".to_string()
        };
        Err(RuleError::Panicked(message))
    })
}

#[cfg(test)]
mod tests;
