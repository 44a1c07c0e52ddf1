//! Command-line host for the rfx rewrite engine.
//!
//! The `rfx` binary finds Java sources, runs the rule catalog over them to
//! quiescence in a parallel batch and writes changed files back. The
//! command handlers live here so integration tests can drive them with
//! their own output sink.

pub mod commands;
pub mod tracing_setup;

pub use commands::{
    collect_java_files, fix_paths, list_rules, parse_fix_options, FixError, FixOptions,
    FixSummary, Mode, OptionError,
};
pub use tracing_setup::init_tracing;
