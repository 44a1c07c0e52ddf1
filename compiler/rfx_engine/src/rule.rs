//! The rule contract.

use rfx_ir::{KindSet, NodeId, ProjectOptions};

use crate::context::RuleContext;
use crate::error::RuleError;

/// What the dispatcher does after offering a node to a rule.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub enum Visit {
    /// Offer the node to the next rule, then visit its children.
    #[default]
    Descend,
    /// Offer the node to no further rule and visit none of its children,
    /// for every rule in the pass.
    SkipSubtree,
}

/// An independently authored rewrite rule.
///
/// A rule looks at one node at a time and may queue edits through its
/// context. It must be a pure function of the node and the context: all
/// state it needs across nodes lives in the pass (side-effect keys) or is
/// recomputed from the tree.
pub trait Rule: Send + Sync {
    /// Stable identifier used for selection and reporting.
    fn name(&self) -> &'static str;

    /// One-line human description.
    fn description(&self) -> &'static str;

    /// Node kinds this rule is offered.
    fn interest(&self) -> KindSet;

    /// Whether the rule runs at all for a project. Rules that only make
    /// sense on some platforms or language levels turn themselves off here.
    fn applies_to(&self, _options: &ProjectOptions) -> bool {
        true
    }

    fn visit(&self, node: NodeId, cx: &mut RuleContext<'_, '_>) -> Result<Visit, RuleError>;
}
