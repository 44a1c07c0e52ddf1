//! The `fix` and `check` commands: rewrite sources to quiescence.

use std::io::{self, Write};
use std::path::PathBuf;

use rfx_engine::{run_batch, ConfigError, Pipeline, SourceUnit};
use thiserror::Error;
use tracing::{debug, info};

use super::{collect_java_files, FixOptions};

/// Whether changed sources are written back.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Mode {
    /// Write changes unless `--dry-run`.
    Fix,
    /// Never write; changes make the run fail.
    Check,
}

#[derive(Debug, Error)]
pub enum FixError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("cannot read sources: {0}")]
    Discover(#[source] io::Error),

    #[error("cannot {action} '{}': {source}", path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// What a run did, file by file.
#[derive(Debug, Default)]
pub struct FixSummary {
    pub files: usize,
    /// Files some rule changed, written back or not.
    pub changed: Vec<PathBuf>,
    /// Files whose run stopped at a refused commit.
    pub refused: Vec<PathBuf>,
    /// Files that could not be processed, with the reason.
    pub failed: Vec<(PathBuf, String)>,
}

impl FixSummary {
    /// Process exit status for the run.
    pub fn exit_code(&self, mode: Mode) -> i32 {
        let failed = !self.failed.is_empty();
        match mode {
            Mode::Fix => i32::from(failed),
            Mode::Check => i32::from(failed || !self.changed.is_empty()),
        }
    }
}

/// Run the selected rules over every Java source under `options.paths`,
/// reporting to `out`.
pub fn fix_paths(
    options: &FixOptions,
    mode: Mode,
    out: &mut impl Write,
) -> Result<FixSummary, FixError> {
    let catalog = rfx_rules::all_rules();
    let pipeline = Pipeline::from_catalog(
        catalog,
        options.project_options(),
        &options.pipeline_config(),
    )?;

    let files = collect_java_files(&options.paths).map_err(FixError::Discover)?;
    let mut units = Vec::with_capacity(files.len());
    for path in files {
        let text = std::fs::read_to_string(&path).map_err(|source| FixError::Io {
            action: "read",
            path: path.clone(),
            source,
        })?;
        units.push(SourceUnit { path, text });
    }
    info!(files = units.len(), rules = pipeline.dispatcher().len(), "rewriting");

    let write_back = mode == Mode::Fix && !options.dry_run;
    let mut summary = FixSummary {
        files: units.len(),
        ..FixSummary::default()
    };
    let report_io = |source| FixError::Io {
        action: "report on",
        path: PathBuf::from("<output>"),
        source,
    };

    for result in run_batch(&pipeline, &units, options.jobs) {
        let path = result.path;
        let outcome = match result.result {
            Ok(outcome) => outcome,
            Err(error) => {
                writeln!(out, "{}: error: {error}", path.display()).map_err(report_io)?;
                summary.failed.push((path, error.to_string()));
                continue;
            }
        };

        if options.verbose {
            for (i, pass) in outcome.report.passes.iter().enumerate() {
                writeln!(out, "{} pass {}: {pass}", path.display(), i + 1).map_err(report_io)?;
            }
        }
        if let Some(refused) = outcome.report.refused() {
            writeln!(out, "{}: {refused}", path.display()).map_err(report_io)?;
            summary.refused.push(path.clone());
        }
        if !outcome.changed() {
            continue;
        }

        if write_back {
            std::fs::write(&path, &outcome.output).map_err(|source| FixError::Io {
                action: "write",
                path: path.clone(),
                source,
            })?;
            writeln!(out, "fixed {}", path.display()).map_err(report_io)?;
        } else {
            writeln!(out, "would fix {}", path.display()).map_err(report_io)?;
        }
        debug!(path = %path.display(), passes = outcome.report.iterations(), "changed");
        summary.changed.push(path);
    }

    writeln!(
        out,
        "{} file(s), {} changed, {} failed",
        summary.files,
        summary.changed.len(),
        summary.failed.len()
    )
    .map_err(report_io)?;
    Ok(summary)
}
