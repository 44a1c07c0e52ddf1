//! Helpers shared by rule tests.

use pretty_assertions::assert_eq;
use rfx_engine::{Dispatcher, Pipeline, PipelineOutcome, Rule};
use rfx_ir::{NodeId, ProjectOptions, StringInterner, Tree};

pub(crate) fn parse(source: &str) -> Tree {
    rfx_parse::parse(source, StringInterner::shared()).unwrap()
}

/// First node, in pre-order, whose source text is exactly `text`.
pub(crate) fn find(tree: &Tree, text: &str) -> NodeId {
    tree.descendants(tree.root())
        .into_iter()
        .find(|&id| tree.text(tree.span(id)) == text)
        .unwrap_or_else(|| panic!("no node spells {text:?}"))
}

pub(crate) fn android() -> ProjectOptions {
    ProjectOptions::default().with_android(true)
}

/// Run `rule` alone to quiescence.
pub(crate) fn rewrite(rule: &dyn Rule, options: ProjectOptions, source: &str) -> PipelineOutcome<String> {
    let mut dispatcher = Dispatcher::new();
    dispatcher.register(rule);
    let pipeline = Pipeline::new(dispatcher, options, 4).unwrap();
    pipeline.run(source).unwrap()
}

/// Rewrite `source` and check the result, then check that the result is
/// left alone by a second run.
pub(crate) fn assert_rewrites(rule: &dyn Rule, options: ProjectOptions, source: &str, expected: &str) {
    let outcome = rewrite(rule, options.clone(), source);
    if let Some(refused) = outcome.report.refused() {
        panic!("refused: {refused}");
    }
    for pass in &outcome.report.passes {
        assert!(pass.failures.is_empty(), "rule failed: {pass}");
    }
    assert_eq!(outcome.output, expected);
    let again = rewrite(rule, options, &outcome.output);
    assert!(!again.changed(), "not idempotent:\n{}", again.output);
}

/// Check that `rule` leaves `source` untouched.
pub(crate) fn assert_unchanged(rule: &dyn Rule, options: ProjectOptions, source: &str) {
    let outcome = rewrite(rule, options, source);
    assert!(outcome.report.refused().is_none());
    assert_eq!(outcome.output, source);
}
