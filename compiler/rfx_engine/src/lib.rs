//! Rule-application engine for rfx.
//!
//! A [`Dispatcher`] walks a tree once in pre-order and offers every node to
//! the [`Rule`]s registered for its kind. Rules inspect the tree through a
//! [`RuleContext`] and queue edits into the pass's edit script; they never
//! mutate the tree. A [`Pass`] owns one script and commits it all or
//! nothing. A [`Pipeline`] repeats passes, re-parsing the output each time,
//! until no rule has anything left to propose, and [`run_batch`] fans
//! independent source units out over a worker pool.
//!
//! A rule that fails or panics is disabled for the rest of the pass and its
//! pending edits are dropped; the pass carries on with the other rules.

mod batch;
mod cancel;
mod context;
mod dispatch;
mod error;
mod pass;
mod pipeline;
mod report;
mod rule;

pub use batch::{run_batch, SourceUnit, UnitResult};
pub use cancel::CancellationToken;
pub use context::RuleContext;
pub use dispatch::Dispatcher;
pub use error::{ConfigError, PassError, RuleError};
pub use pass::{OutputMode, Pass, PassOutput, PassResult};
pub use pipeline::{Pipeline, PipelineConfig, PipelineOutcome};
pub use report::{PassOutcome, PassReport, PipelineReport, RuleFailure, RuleStats};
pub use rule::{Rule, Visit};

#[cfg(test)]
mod test_util;
