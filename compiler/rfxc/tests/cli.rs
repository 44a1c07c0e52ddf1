//! `fix` and `check` over real directories.
//!
//! 1. `fix` rewrites changed files in place and leaves the rest alone
//! 2. `check` and `--dry-run` never write, and `check` fails on changes
//! 3. Unparsable files are reported without stopping the batch
//! 4. Rule selection and platform flags reach the pipeline

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]

use std::fs;
use std::path::{Path, PathBuf};

use pretty_assertions::assert_eq;
use rfxc::{collect_java_files, fix_paths, list_rules, FixError, FixOptions, Mode};
use tempfile::TempDir;

const BOXING: &str = "class Boxing {
    Object f(int i) {
        return new Integer(i);
    }
}
";

const BOXING_FIXED: &str = "class Boxing {
    Object f(int i) {
        return Integer.valueOf(i);
    }
}
";

const CLEAN: &str = "class Clean {
    int f(int i) {
        return i + 1;
    }
}
";

const FLOATS: &str = "import android.util.FloatMath;

class Floats {
    float f(float x) {
        return FloatMath.sqrt(x);
    }
}
";

fn project() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("src/demo");
    fs::create_dir_all(&src).unwrap();
    fs::create_dir_all(dir.path().join("build")).unwrap();
    fs::write(src.join("Boxing.java"), BOXING).unwrap();
    fs::write(src.join("Clean.java"), CLEAN).unwrap();
    fs::write(src.join("Floats.java"), FLOATS).unwrap();
    fs::write(src.join("notes.txt"), "new Integer(1)").unwrap();
    fs::write(dir.path().join("build/Generated.java"), BOXING).unwrap();
    dir
}

fn options(root: &Path) -> FixOptions {
    FixOptions {
        paths: vec![root.to_path_buf()],
        jobs: Some(2),
        ..FixOptions::default()
    }
}

fn read(root: &Path, file: &str) -> String {
    fs::read_to_string(root.join("src/demo").join(file)).unwrap()
}

fn run(options: &FixOptions, mode: Mode) -> (rfxc::FixSummary, String) {
    let mut out = Vec::new();
    let summary = fix_paths(options, mode, &mut out).unwrap();
    (summary, String::from_utf8(out).unwrap())
}

#[test]
fn test_collects_java_sources_only() {
    let dir = project();
    let files = collect_java_files(&[dir.path().to_path_buf()]).unwrap();
    let names: Vec<_> = files
        .iter()
        .map(|f| f.file_name().unwrap().to_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Boxing.java", "Clean.java", "Floats.java"]);

    let missing = collect_java_files(&[PathBuf::from("/definitely/not/here")]);
    assert!(missing.is_err());
}

#[test]
fn test_fix_writes_changed_files() {
    let dir = project();
    let (summary, out) = run(&options(dir.path()), Mode::Fix);

    assert_eq!(summary.files, 3);
    assert_eq!(summary.changed.len(), 2);
    assert!(summary.failed.is_empty());
    assert_eq!(summary.exit_code(Mode::Fix), 0);
    assert_eq!(read(dir.path(), "Boxing.java"), BOXING_FIXED);
    assert_eq!(read(dir.path(), "Clean.java"), CLEAN);
    assert!(read(dir.path(), "Floats.java").contains("(float) Math.sqrt(x)"));
    assert!(out.contains("fixed "));
    assert!(out.ends_with("3 file(s), 2 changed, 0 failed\n"));

    // Everything is at its fixed point now.
    let (again, _) = run(&options(dir.path()), Mode::Check);
    assert!(again.changed.is_empty());
    assert_eq!(again.exit_code(Mode::Check), 0);
}

#[test]
fn test_check_and_dry_run_never_write() {
    let dir = project();
    let (summary, out) = run(&options(dir.path()), Mode::Check);
    assert_eq!(summary.changed.len(), 2);
    assert_eq!(summary.exit_code(Mode::Check), 1);
    assert!(out.contains("would fix "));
    assert_eq!(read(dir.path(), "Boxing.java"), BOXING);

    let dry = FixOptions {
        dry_run: true,
        ..options(dir.path())
    };
    let (summary, _) = run(&dry, Mode::Fix);
    assert_eq!(summary.changed.len(), 2);
    assert_eq!(summary.exit_code(Mode::Fix), 0);
    assert_eq!(read(dir.path(), "Boxing.java"), BOXING);
}

#[test]
fn test_unparsable_file_is_reported_and_others_still_fixed() {
    let dir = project();
    let broken = dir.path().join("src/demo/Broken.java");
    fs::write(&broken, "class Broken { void f( }").unwrap();

    let (summary, out) = run(&options(dir.path()), Mode::Fix);
    assert_eq!(summary.failed.len(), 1);
    assert_eq!(summary.failed[0].0, broken);
    assert_eq!(summary.exit_code(Mode::Fix), 1);
    assert!(out.contains("Broken.java: error: cannot parse source"));
    assert_eq!(read(dir.path(), "Boxing.java"), BOXING_FIXED);
}

#[test]
fn test_rule_selection_and_platform() {
    let dir = project();
    let only_floats = FixOptions {
        rules: vec!["float-math".to_owned()],
        ..options(dir.path())
    };
    let (summary, _) = run(&only_floats, Mode::Check);
    assert_eq!(summary.changed, vec![dir.path().join("src/demo/Floats.java")]);

    let portable = FixOptions {
        android: false,
        ..options(dir.path())
    };
    let (summary, _) = run(&portable, Mode::Check);
    assert_eq!(summary.changed, vec![dir.path().join("src/demo/Boxing.java")]);

    let unknown = FixOptions {
        rules: vec!["no-such-rule".to_owned()],
        ..options(dir.path())
    };
    let mut out = Vec::new();
    let error = fix_paths(&unknown, Mode::Fix, &mut out).unwrap_err();
    assert!(matches!(error, FixError::Config(_)));
    assert_eq!(error.to_string(), "unknown rule 'no-such-rule'");
}

#[test]
fn test_rules_listing() {
    let mut out = Vec::new();
    list_rules(&mut out).unwrap();
    let out = String::from_utf8(out).unwrap();
    let names: Vec<_> = out
        .lines()
        .filter_map(|l| l.split_whitespace().next())
        .collect();
    assert_eq!(
        names,
        vec![
            "use-value-of",
            "float-math",
            "sparse-array",
            "draw-allocation",
            "wake-lock",
            "recycle",
            "view-holder",
            "handler-leak"
        ]
    );
}
