use pretty_assertions::assert_eq;

use super::*;

fn args(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| (*s).to_owned()).collect()
}

#[test]
fn test_defaults() {
    let options = parse_fix_options(&[]).unwrap();
    assert_eq!(options.paths, vec![PathBuf::from(".")]);
    assert!(options.rules.is_empty());
    assert!(options.android);
    assert_eq!(options.level, LanguageLevel::Java8);
    assert_eq!(options.max_iterations, 4);
    assert_eq!(options.jobs, None);
}

#[test]
fn test_every_flag() {
    let options = parse_fix_options(&args(&[
        "src",
        "--rules=recycle, use-value-of,",
        "--level=1.4",
        "--max-iterations=2",
        "--jobs=3",
        "--dry-run",
        "--no-android",
        "-v",
        "Main.java",
    ]))
    .unwrap();
    assert_eq!(
        options,
        FixOptions {
            paths: vec![PathBuf::from("src"), PathBuf::from("Main.java")],
            rules: vec!["recycle".to_owned(), "use-value-of".to_owned()],
            level: LanguageLevel::Java4,
            android: false,
            max_iterations: 2,
            dry_run: true,
            jobs: Some(3),
            verbose: true,
        }
    );
    assert_eq!(
        options.project_options(),
        ProjectOptions::new(LanguageLevel::Java4)
    );
    assert_eq!(options.pipeline_config().max_iterations, 2);
}

#[test]
fn test_bad_values_are_reported() {
    assert_eq!(
        parse_fix_options(&args(&["--jobs=0"])),
        Err(OptionError::InvalidValue {
            flag: "--jobs",
            value: "0".to_owned()
        })
    );
    assert_eq!(
        parse_fix_options(&args(&["--level=21"])),
        Err(OptionError::Level(UnknownLevel("21".to_owned())))
    );
    assert_eq!(
        parse_fix_options(&args(&["--force"])),
        Err(OptionError::UnknownFlag("--force".to_owned()))
    );
}
