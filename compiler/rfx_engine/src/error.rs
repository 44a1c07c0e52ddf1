//! Engine errors.

use rfx_flow::AnalysisError;
use rfx_parse::ParseError;
use thiserror::Error;

/// A rule handler failed while proposing edits.
///
/// Absorbed by the dispatcher: the rule is disabled for the rest of the
/// pass and its pending edits are dropped.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum RuleError {
    #[error("{0}")]
    Failed(String),

    #[error("panicked: {0}")]
    Panicked(String),

    /// Analysis failure the rule chose to escalate instead of declining.
    #[error("analysis failed: {0}")]
    Analysis(#[from] AnalysisError),
}

impl RuleError {
    pub fn failed(message: impl Into<String>) -> Self {
        RuleError::Failed(message.into())
    }
}

/// A pipeline run over one source unit that produced no result.
///
/// Refused commits are not errors: they end the run with the last good
/// text and are reported in the [`PipelineReport`](crate::PipelineReport).
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum PassError {
    #[error("cannot parse source: {0}")]
    Parse(#[from] ParseError),

    /// The output of a committed pass did not parse again.
    #[error("output of pass {pass} does not parse: {error}")]
    Reparse {
        pass: usize,
        #[source]
        error: ParseError,
    },

    #[error("cancelled")]
    Cancelled,
}

/// Invalid pipeline configuration.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("unknown rule '{0}'")]
    UnknownRule(String),

    #[error("at least one iteration is required")]
    NoIterations,
}
