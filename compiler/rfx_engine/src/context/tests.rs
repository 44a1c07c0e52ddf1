use std::sync::Mutex;

use pretty_assertions::assert_eq;
use rfx_flow::AnalysisError;
use rfx_ir::{KindSet, NodeData, NodeId, NodeKind, ProjectOptions, Property};

use crate::test_util::parse;
use crate::{Dispatcher, OutputMode, Pass, Rule, RuleContext, RuleError, Visit};

/// Counts the statements reading the first local of each method body,
/// over the whole body and over its first `window` statements.
struct Reads {
    window: usize,
    counts: Mutex<Vec<(usize, Result<usize, AnalysisError>)>>,
}

impl Rule for Reads {
    fn name(&self) -> &'static str {
        "reads"
    }

    fn description(&self) -> &'static str {
        "count reads of a local"
    }

    fn interest(&self) -> KindSet {
        KindSet::of(NodeKind::MethodDecl)
    }

    fn visit(&self, node: NodeId, cx: &mut RuleContext<'_, '_>) -> Result<Visit, RuleError> {
        let tree = cx.tree();
        let NodeData::MethodDecl { body: Some(body), .. } = tree.data(node) else {
            return Ok(Visit::Descend);
        };
        let Some(&first) = tree.list(*body, Property::Statements).first() else {
            return Ok(Visit::Descend);
        };
        let NodeData::LocalVar { fragments, .. } = tree.data(first) else {
            return Ok(Visit::Descend);
        };
        let fragment = fragments[0];
        let whole = cx
            .lifecycle(fragment)
            .map_err(|e| RuleError::failed(e.to_string()))?
            .reading_statements
            .len();
        let window = cx
            .lifecycle_in(fragment, *body, 0, self.window)
            .map(|r| r.reading_statements.len());
        self.counts.lock().unwrap().push((whole, window));
        Ok(Visit::SkipSubtree)
    }
}

fn counts(window: usize) -> Vec<(usize, Result<usize, AnalysisError>)> {
    let tree = parse(
        "class A {
    void f() {
        int x = 1;
        g(x);
        g(x + 1);
        g(2);
    }
}
",
    );
    let rule = Reads {
        window,
        counts: Mutex::new(Vec::new()),
    };
    let mut dispatcher = Dispatcher::new();
    dispatcher.register(&rule);
    let options = ProjectOptions::default();
    let result = Pass::new(&dispatcher, &options).run(&tree, OutputMode::Text);
    assert!(result.report.failures.is_empty());
    let counts = rule.counts.lock().unwrap().clone();
    counts
}

#[test]
fn test_lifecycle_over_a_statement_window() {
    assert_eq!(counts(2), vec![(2, Ok(1))]);
    assert_eq!(counts(4), vec![(2, Ok(2))]);
}

#[test]
fn test_window_past_the_block_is_an_error() {
    let counts = counts(9);
    assert_eq!(counts.len(), 1);
    assert_eq!(counts[0].0, 2);
    assert!(matches!(counts[0].1, Err(AnalysisError::BadRange { .. })));
}
