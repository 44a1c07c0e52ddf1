//! Repeated passes until no rule proposes anything.

use tracing::{debug, info};

use rfx_ir::{ProjectOptions, SharedInterner, StringInterner, Tree};

use crate::cancel::CancellationToken;
use crate::dispatch::Dispatcher;
use crate::error::{ConfigError, PassError};
use crate::pass::{OutputMode, Pass, PassOutput};
use crate::report::{PassOutcome, PipelineReport};
use crate::rule::Rule;

/// Default bound on passes per source unit.
pub const DEFAULT_MAX_ITERATIONS: usize = 4;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Rule names to run, in catalog order. Empty means every rule.
    pub rules: Vec<String>,
    /// Upper bound on passes per source unit.
    pub max_iterations: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            rules: Vec::new(),
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}

impl PipelineConfig {
    /// Register the selected rules of `catalog`, keeping catalog order.
    pub fn select<'r>(&self, catalog: &[&'r dyn Rule]) -> Result<Dispatcher<'r>, ConfigError> {
        if let Some(unknown) = self
            .rules
            .iter()
            .find(|name| !catalog.iter().any(|r| r.name() == name.as_str()))
        {
            return Err(ConfigError::UnknownRule(unknown.clone()));
        }
        let mut dispatcher = Dispatcher::new();
        for &rule in catalog {
            if self.rules.is_empty() || self.rules.iter().any(|n| n == rule.name()) {
                dispatcher.register(rule);
            }
        }
        Ok(dispatcher)
    }
}

/// Final output of a run plus its diagnostics.
#[derive(Debug)]
pub struct PipelineOutcome<T> {
    pub output: T,
    pub report: PipelineReport,
}

impl<T> PipelineOutcome<T> {
    pub fn changed(&self) -> bool {
        self.report.changed()
    }
}

/// Parse, traverse and commit, over and over, until a pass has nothing to
/// do, a commit is refused, or the iteration bound is hit.
///
/// Every pass starts from a fresh parse of the previous output with a
/// fresh edit script. The pipeline holds no per-unit state, so one
/// pipeline serves any number of units, concurrently.
pub struct Pipeline<'r> {
    dispatcher: Dispatcher<'r>,
    options: ProjectOptions,
    max_iterations: usize,
    interner: SharedInterner,
    cancel: CancellationToken,
}

impl<'r> Pipeline<'r> {
    pub fn new(
        dispatcher: Dispatcher<'r>,
        options: ProjectOptions,
        max_iterations: usize,
    ) -> Result<Self, ConfigError> {
        if max_iterations == 0 {
            return Err(ConfigError::NoIterations);
        }
        Ok(Pipeline {
            dispatcher,
            options,
            max_iterations,
            interner: StringInterner::shared(),
            cancel: CancellationToken::new(),
        })
    }

    /// Pipeline over the rules of `catalog` selected by `config`.
    pub fn from_catalog(
        catalog: &[&'r dyn Rule],
        options: ProjectOptions,
        config: &PipelineConfig,
    ) -> Result<Self, ConfigError> {
        Pipeline::new(config.select(catalog)?, options, config.max_iterations)
    }

    #[must_use]
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn dispatcher(&self) -> &Dispatcher<'r> {
        &self.dispatcher
    }

    pub fn options(&self) -> &ProjectOptions {
        &self.options
    }

    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancel
    }

    fn pass(&self) -> Pass<'_, 'r> {
        Pass::new(&self.dispatcher, &self.options).with_cancellation(self.cancel.clone())
    }

    /// Rewrite source text to quiescence.
    ///
    /// On a refused commit the run stops and the output is the text of the
    /// last committed pass, or `source` itself.
    #[tracing::instrument(level = "debug", skip_all, fields(len = source.len()))]
    pub fn run(&self, source: &str) -> Result<PipelineOutcome<String>, PassError> {
        let mut text = source.to_owned();
        let mut report = PipelineReport::default();

        for iteration in 0..self.max_iterations {
            if self.cancel.is_cancelled() {
                return Err(PassError::Cancelled);
            }
            let tree = rfx_parse::parse(&text, self.interner.clone()).map_err(|error| {
                if iteration == 0 {
                    PassError::Parse(error)
                } else {
                    PassError::Reparse {
                        pass: iteration,
                        error,
                    }
                }
            })?;
            let result = self.pass().run(&tree, OutputMode::Text);
            let outcome = result.report.outcome.clone();
            report.passes.push(result.report);

            match outcome {
                PassOutcome::Committed => {
                    if let Some(PassOutput::Text(next)) = result.output {
                        text = next;
                    }
                }
                PassOutcome::NothingToDo => {
                    report.fixed_point = true;
                    break;
                }
                PassOutcome::Refused(_) => break,
                PassOutcome::Cancelled => return Err(PassError::Cancelled),
            }
        }

        log_end(&report);
        Ok(PipelineOutcome {
            output: text,
            report,
        })
    }

    /// Rewrite a tree to quiescence, committing to trees.
    ///
    /// Nodes created by a pass carry no bindings, so later passes see them
    /// as unresolved.
    #[tracing::instrument(level = "debug", skip_all, fields(nodes = tree.len()))]
    pub fn run_tree(&self, tree: Tree) -> Result<PipelineOutcome<Tree>, PassError> {
        let mut tree = tree;
        let mut report = PipelineReport::default();

        for _ in 0..self.max_iterations {
            if self.cancel.is_cancelled() {
                return Err(PassError::Cancelled);
            }
            let result = self.pass().run(&tree, OutputMode::Tree);
            let outcome = result.report.outcome.clone();
            report.passes.push(result.report);

            match outcome {
                PassOutcome::Committed => {
                    if let Some(PassOutput::Tree(next)) = result.output {
                        tree = next;
                    }
                }
                PassOutcome::NothingToDo => {
                    report.fixed_point = true;
                    break;
                }
                PassOutcome::Refused(_) => break,
                PassOutcome::Cancelled => return Err(PassError::Cancelled),
            }
        }

        log_end(&report);
        Ok(PipelineOutcome {
            output: tree,
            report,
        })
    }
}

fn log_end(report: &PipelineReport) {
    if report.fixed_point {
        debug!(passes = report.iterations(), "reached fixed point");
    } else if let Some(refused) = report.refused() {
        info!(rules = ?refused.responsible_rules(), "commit refused; keeping last good output");
    } else {
        info!(passes = report.iterations(), "iteration bound reached before a fixed point");
    }
}

#[cfg(test)]
mod tests;
