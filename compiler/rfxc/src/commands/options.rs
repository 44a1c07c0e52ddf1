//! Flags shared by `fix` and `check`.

use std::path::PathBuf;

use rfx_engine::PipelineConfig;
use rfx_ir::{LanguageLevel, ProjectOptions, UnknownLevel};
use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum OptionError {
    #[error("unknown option '{0}'")]
    UnknownFlag(String),

    #[error("invalid value '{value}' for {flag}")]
    InvalidValue { flag: &'static str, value: String },

    #[error(transparent)]
    Level(#[from] UnknownLevel),
}

/// Configuration for one `fix` or `check` run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FixOptions {
    /// Files and directories to rewrite.
    pub paths: Vec<PathBuf>,
    /// Rules to run. Empty runs the whole catalog.
    pub rules: Vec<String>,
    pub level: LanguageLevel,
    /// Android rules apply. On unless `--no-android` is given.
    pub android: bool,
    pub max_iterations: usize,
    /// Report what would change without writing anything.
    pub dry_run: bool,
    /// Worker threads. `None` lets the pool decide.
    pub jobs: Option<usize>,
    /// Print every pass report, not only refusals and failures.
    pub verbose: bool,
}

impl Default for FixOptions {
    fn default() -> Self {
        FixOptions {
            paths: Vec::new(),
            rules: Vec::new(),
            level: LanguageLevel::LATEST,
            android: true,
            max_iterations: PipelineConfig::default().max_iterations,
            dry_run: false,
            jobs: None,
            verbose: false,
        }
    }
}

impl FixOptions {
    pub fn project_options(&self) -> ProjectOptions {
        ProjectOptions::new(self.level).with_android(self.android)
    }

    pub fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            rules: self.rules.clone(),
            max_iterations: self.max_iterations,
        }
    }
}

fn count(flag: &'static str, value: &str) -> Result<usize, OptionError> {
    match value.parse() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(OptionError::InvalidValue {
            flag,
            value: value.to_owned(),
        }),
    }
}

/// Parse `fix`/`check` arguments. Paths default to the current directory.
pub fn parse_fix_options(args: &[String]) -> Result<FixOptions, OptionError> {
    let mut options = FixOptions::default();

    for arg in args {
        if let Some(rules) = arg.strip_prefix("--rules=") {
            options.rules = rules
                .split(',')
                .map(str::trim)
                .filter(|r| !r.is_empty())
                .map(str::to_owned)
                .collect();
        } else if let Some(level) = arg.strip_prefix("--level=") {
            options.level = level.parse()?;
        } else if let Some(n) = arg.strip_prefix("--max-iterations=") {
            options.max_iterations = count("--max-iterations", n)?;
        } else if let Some(jobs) = arg.strip_prefix("--jobs=") {
            options.jobs = if jobs == "auto" {
                None
            } else {
                Some(count("--jobs", jobs)?)
            };
        } else if arg == "--dry-run" {
            options.dry_run = true;
        } else if arg == "--no-android" {
            options.android = false;
        } else if arg == "--verbose" || arg == "-v" {
            options.verbose = true;
        } else if arg.starts_with('-') {
            return Err(OptionError::UnknownFlag(arg.clone()));
        } else {
            options.paths.push(PathBuf::from(arg));
        }
    }

    if options.paths.is_empty() {
        options.paths.push(PathBuf::from("."));
    }
    Ok(options)
}

#[cfg(test)]
mod tests;
