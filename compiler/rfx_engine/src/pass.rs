//! One traversal-and-commit cycle over a tree.

use tracing::{debug, debug_span};

use rfx_edit::EditScript;
use rfx_ir::{ProjectOptions, Tree};

use crate::cancel::CancellationToken;
use crate::dispatch::Dispatcher;
use crate::report::{PassOutcome, PassReport, RuleStats};

/// Form of a committed result.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub enum OutputMode {
    /// Source text with untouched bytes preserved.
    #[default]
    Text,
    /// A new tree.
    Tree,
}

/// A committed result.
#[derive(Debug)]
pub enum PassOutput {
    Text(String),
    Tree(Tree),
}

#[derive(Debug)]
pub struct PassResult {
    pub report: PassReport,
    /// Present only when the pass committed.
    pub output: Option<PassOutput>,
}

/// A pass over trees with a fixed rule set and options.
pub struct Pass<'a, 'r> {
    dispatcher: &'a Dispatcher<'r>,
    options: &'a ProjectOptions,
    cancel: CancellationToken,
}

impl<'a, 'r> Pass<'a, 'r> {
    pub fn new(dispatcher: &'a Dispatcher<'r>, options: &'a ProjectOptions) -> Self {
        Pass {
            dispatcher,
            options,
            cancel: CancellationToken::new(),
        }
    }

    #[must_use]
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Walk `tree` once and commit what the rules proposed.
    ///
    /// The edit script lives only inside this call. A cancelled walk or a
    /// refused commit leaves no output; the tree is never modified.
    pub fn run(&self, tree: &Tree, mode: OutputMode) -> PassResult {
        let span = debug_span!("pass", rules = self.dispatcher.len(), nodes = tree.len());
        let _guard = span.enter();

        let mut script = EditScript::new(tree);
        let walk = self.dispatcher.walk(&mut script, self.options, &self.cancel);

        let mut rules: Vec<RuleStats> = self
            .dispatcher
            .rules()
            .iter()
            .zip(&walk.dropped)
            .map(|(rule, &errored)| {
                let counts = script.counts(rule.name());
                RuleStats {
                    rule: rule.name(),
                    proposed: counts.proposed,
                    applied: 0,
                    conflicted: counts.conflicted,
                    errored,
                }
            })
            .collect();
        let held: Vec<usize> = rules.iter().map(|s| script.counts(s.rule).held).collect();

        let (outcome, output) = if walk.cancelled {
            debug!("pass cancelled; discarding script");
            (PassOutcome::Cancelled, None)
        } else if script.is_empty() && script.conflicts().is_empty() {
            (PassOutcome::NothingToDo, None)
        } else {
            let committed = match mode {
                OutputMode::Text => script.commit_text().map(PassOutput::Text),
                OutputMode::Tree => script.commit_tree().map(PassOutput::Tree),
            };
            match committed {
                Ok(output) => {
                    for (stats, held) in rules.iter_mut().zip(held) {
                        stats.applied = held;
                    }
                    (PassOutcome::Committed, Some(output))
                }
                Err(error) => {
                    debug!(%error, responsible = ?error.responsible_rules(), "commit refused");
                    (PassOutcome::Refused(error), None)
                }
            }
        };

        let report = PassReport {
            outcome,
            rules,
            failures: walk.failures,
            visited: walk.visited,
        };
        debug!(outcome = ?report.outcome, applied = report.applied(), "pass done");
        PassResult { report, output }
    }
}

#[cfg(test)]
mod tests;
