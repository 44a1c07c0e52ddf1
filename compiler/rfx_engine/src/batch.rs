//! Independent source units over a worker pool.

use std::path::PathBuf;

use rayon::prelude::*;
use tracing::{debug, warn};

use crate::error::PassError;
use crate::pipeline::{Pipeline, PipelineOutcome};

/// Worker stack size; parsing and analysis recurse with the tree depth.
const WORKER_STACK: usize = 16 * 1024 * 1024;

/// One source unit of a batch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceUnit {
    pub path: PathBuf,
    pub text: String,
}

#[derive(Debug)]
pub struct UnitResult {
    pub path: PathBuf,
    pub result: Result<PipelineOutcome<String>, PassError>,
}

/// Run `pipeline` over every unit, in parallel when `jobs` allows.
///
/// Each unit is parsed, traversed and committed on one worker; units share
/// nothing mutable. Results come back in input order. `jobs` of `None`
/// lets rayon pick; `Some(1)` runs on the calling thread.
pub fn run_batch(pipeline: &Pipeline<'_>, units: &[SourceUnit], jobs: Option<usize>) -> Vec<UnitResult> {
    debug!(units = units.len(), ?jobs, "running batch");
    let run = |unit: &SourceUnit| UnitResult {
        path: unit.path.clone(),
        result: pipeline.run(&unit.text),
    };

    if jobs == Some(1) || units.len() < 2 {
        return units.iter().map(run).collect();
    }

    // A scoped pool is torn down before returning, so no worker outlives
    // the borrowed pipeline.
    let mut builder = rayon::ThreadPoolBuilder::new().stack_size(WORKER_STACK);
    if let Some(jobs) = jobs {
        builder = builder.num_threads(jobs);
    }
    builder
        .build_scoped(rayon::ThreadBuilder::run, |pool| {
            pool.install(|| units.par_iter().map(run).collect::<Vec<_>>())
        })
        .unwrap_or_else(|e| {
            warn!("failed to create thread pool ({e}), running sequentially");
            units.iter().map(run).collect()
        })
}
