use pretty_assertions::assert_eq;
use rfx_ir::ProjectOptions;

use super::*;
use crate::test_util::{parse, Rename};

const SRC: &str = "class A {\n    void f() {\n        a(); /* note */\n    }\n}\n";

static A_TO_B: Rename = Rename {
    name: "a-to-b",
    from: "a",
    to: "b",
};
static B_TO_C: Rename = Rename {
    name: "b-to-c",
    from: "b",
    to: "c",
};
static A_TO_X: Rename = Rename {
    name: "a-to-x",
    from: "a",
    to: "x",
};

static CATALOG: &[&dyn Rule] = &[&A_TO_B, &B_TO_C, &A_TO_X];

fn pipeline(rules: &[&str], max_iterations: usize) -> Pipeline<'static> {
    let config = PipelineConfig {
        rules: rules.iter().map(|r| (*r).to_owned()).collect(),
        max_iterations,
    };
    Pipeline::from_catalog(CATALOG, ProjectOptions::default(), &config).unwrap()
}

#[test]
fn test_runs_to_quiescence() {
    let outcome = pipeline(&["a-to-b", "b-to-c"], 4).run(SRC).unwrap();
    assert_eq!(
        outcome.output,
        "class A {\n    void f() {\n        c(); /* note */\n    }\n}\n"
    );
    assert!(outcome.changed());
    assert!(outcome.report.fixed_point);
    assert_eq!(outcome.report.iterations(), 3);
    let totals = outcome.report.totals();
    assert_eq!(
        totals.iter().map(|t| (t.rule, t.applied)).collect::<Vec<_>>(),
        vec![("a-to-b", 1), ("b-to-c", 1)]
    );
}

#[test]
fn test_second_run_on_output_is_a_no_op() {
    let pipeline = pipeline(&["a-to-b", "b-to-c"], 4);
    let first = pipeline.run(SRC).unwrap();
    let second = pipeline.run(&first.output).unwrap();
    assert!(!second.changed());
    assert_eq!(second.report.iterations(), 1);
    assert_eq!(second.report.passes[0].proposed(), 0);
    assert_eq!(second.output, first.output);
}

#[test]
fn test_iteration_bound() {
    let outcome = pipeline(&["a-to-b", "b-to-c"], 1).run(SRC).unwrap();
    assert!(!outcome.report.fixed_point);
    assert_eq!(outcome.report.iterations(), 1);
    assert!(outcome.output.contains("b();"));
}

#[test]
fn test_refusal_keeps_source() {
    let outcome = pipeline(&["a-to-b", "a-to-x"], 4).run(SRC).unwrap();
    assert_eq!(outcome.output, SRC);
    assert!(!outcome.changed());
    assert!(!outcome.report.fixed_point);
    let refused = outcome.report.refused().unwrap();
    assert_eq!(refused.responsible_rules(), vec!["a-to-b", "a-to-x"]);
}

#[test]
fn test_unparsable_source() {
    let result = pipeline(&[], 4).run("class {");
    assert!(matches!(result, Err(PassError::Parse(_))));
}

#[test]
fn test_cancelled_before_start() {
    let pipeline = pipeline(&[], 4);
    pipeline.cancellation().cancel();
    assert!(matches!(pipeline.run(SRC), Err(PassError::Cancelled)));
}

#[test]
fn test_selection() {
    let config = PipelineConfig {
        rules: vec!["a-to-x".to_owned(), "a-to-b".to_owned()],
        ..PipelineConfig::default()
    };
    let dispatcher = config.select(CATALOG).unwrap();
    assert_eq!(
        dispatcher.rules().iter().map(|r| r.name()).collect::<Vec<_>>(),
        vec!["a-to-b", "a-to-x"]
    );

    let config = PipelineConfig {
        rules: vec!["nope".to_owned()],
        ..PipelineConfig::default()
    };
    assert_eq!(
        config.select(CATALOG).err(),
        Some(ConfigError::UnknownRule("nope".to_owned()))
    );
    assert!(matches!(
        Pipeline::new(Dispatcher::new(), ProjectOptions::default(), 0),
        Err(ConfigError::NoIterations)
    ));
}

#[test]
fn test_tree_mode() {
    let tree = parse(SRC);
    let outcome = pipeline(&["a-to-b"], 4).run_tree(tree).unwrap();
    assert!(outcome.report.fixed_point);
    assert_eq!(outcome.report.iterations(), 2);
    let out = &outcome.output;
    assert!(out
        .descendants(out.root())
        .into_iter()
        .any(|id| out.is_ident(id, "b")));
}
