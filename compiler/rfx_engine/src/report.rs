//! Per-rule diagnostics for passes and pipelines.

use std::fmt;

use rfx_edit::CommitError;
use rfx_ir::NodeId;

use crate::error::RuleError;

/// Edit counts of one rule in one pass.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct RuleStats {
    pub rule: &'static str,
    /// Proposals made, accepted or not.
    pub proposed: usize,
    /// Edits that made it into a committed result.
    pub applied: usize,
    /// Proposals rejected, or whose claim another proposal collided with.
    pub conflicted: usize,
    /// Edits dropped because the rule failed.
    pub errored: usize,
}

impl RuleStats {
    fn add(&mut self, other: &RuleStats) {
        self.proposed += other.proposed;
        self.applied += other.applied;
        self.conflicted += other.conflicted;
        self.errored += other.errored;
    }

    pub fn is_quiet(&self) -> bool {
        self.proposed == 0 && self.errored == 0
    }
}

impl fmt::Display for RuleStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} proposed, {} applied, {} conflicted, {} errored",
            self.rule, self.proposed, self.applied, self.conflicted, self.errored
        )
    }
}

/// How a pass ended.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PassOutcome {
    /// Every held edit was applied.
    Committed,
    /// No rule held an edit at the end of the walk.
    NothingToDo,
    /// The commit was refused and nothing was applied.
    Refused(CommitError),
    /// Cancelled during the walk; the script was discarded.
    Cancelled,
}

/// A rule handler that failed during a pass.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RuleFailure {
    pub rule: &'static str,
    /// Node the rule was offered when it failed.
    pub node: NodeId,
    pub error: RuleError,
}

impl fmt::Display for RuleFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rule `{}` failed at {:?}: {}", self.rule, self.node, self.error)
    }
}

/// Diagnostics of one pass, whether committed or discarded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PassReport {
    pub outcome: PassOutcome,
    /// One entry per registered rule, in registration order.
    pub rules: Vec<RuleStats>,
    pub failures: Vec<RuleFailure>,
    /// Nodes offered to the dispatch table.
    pub visited: usize,
}

impl PassReport {
    pub fn stats(&self, rule: &str) -> Option<&RuleStats> {
        self.rules.iter().find(|s| s.rule == rule)
    }

    pub fn is_committed(&self) -> bool {
        self.outcome == PassOutcome::Committed
    }

    /// Rules the refusal of this pass is attributed to.
    pub fn responsible_rules(&self) -> Vec<&'static str> {
        match &self.outcome {
            PassOutcome::Refused(error) => error.responsible_rules(),
            _ => Vec::new(),
        }
    }

    pub fn applied(&self) -> usize {
        self.rules.iter().map(|s| s.applied).sum()
    }

    pub fn proposed(&self) -> usize {
        self.rules.iter().map(|s| s.proposed).sum()
    }
}

impl fmt::Display for PassReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.outcome {
            PassOutcome::Committed => write!(f, "committed {} edit(s)", self.applied())?,
            PassOutcome::NothingToDo => f.write_str("nothing to do")?,
            PassOutcome::Refused(error) => write!(
                f,
                "refused ({}): {error}",
                self.responsible_rules().join(", ")
            )?,
            PassOutcome::Cancelled => f.write_str("cancelled")?,
        }
        for stats in self.rules.iter().filter(|s| !s.is_quiet()) {
            write!(f, "\n  {stats}")?;
        }
        for failure in &self.failures {
            write!(f, "\n  {failure}")?;
        }
        Ok(())
    }
}

/// Diagnostics of a run to quiescence.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PipelineReport {
    pub passes: Vec<PassReport>,
    /// The last pass had nothing to do.
    pub fixed_point: bool,
}

impl PipelineReport {
    pub fn iterations(&self) -> usize {
        self.passes.len()
    }

    /// Some pass committed an edit.
    pub fn changed(&self) -> bool {
        self.passes.iter().any(PassReport::is_committed)
    }

    /// The pass whose commit was refused, which ends a run.
    pub fn refused(&self) -> Option<&PassReport> {
        self.passes
            .iter()
            .find(|p| matches!(p.outcome, PassOutcome::Refused(_)))
    }

    /// Per-rule stats summed over every pass, in first-seen order.
    pub fn totals(&self) -> Vec<RuleStats> {
        let mut totals: Vec<RuleStats> = Vec::new();
        for stats in self.passes.iter().flat_map(|p| &p.rules) {
            match totals.iter_mut().find(|t| t.rule == stats.rule) {
                Some(total) => total.add(stats),
                None => totals.push(*stats),
            }
        }
        totals
    }
}
