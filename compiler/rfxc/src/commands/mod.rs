//! Command handlers for the `rfx` CLI.
//!
//! Each submodule implements one command. Source discovery, shared by
//! `fix` and `check`, lives here in the module root.

use std::io;
use std::path::{Path, PathBuf};

mod fix;
mod options;
mod rules;

pub use fix::{fix_paths, FixError, FixSummary, Mode};
pub use options::{parse_fix_options, FixOptions, OptionError};
pub use rules::list_rules;

/// Directory names never searched for sources.
const SKIPPED_DIRS: &[&str] = &["target", "build", "bin", "out", "node_modules"];

/// Every `.java` file under `paths`, sorted. A path naming a file is taken
/// as is, whatever its extension.
pub fn collect_java_files(paths: &[PathBuf]) -> io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_dir() {
            visit_java_files(path, &mut files)?;
        } else if path.exists() {
            files.push(path.clone());
        } else {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("'{}' does not exist", path.display()),
            ));
        }
    }
    files.sort();
    files.dedup();
    Ok(files)
}

fn visit_java_files(dir: &Path, files: &mut Vec<PathBuf>) -> io::Result<()> {
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        let hidden_or_skipped = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|name| name.starts_with('.') || SKIPPED_DIRS.contains(&name));
        if path.is_dir() {
            if !hidden_or_skipped {
                visit_java_files(&path, files)?;
            }
        } else if path.extension().is_some_and(|ext| ext == "java") {
            files.push(path);
        }
    }
    Ok(())
}
