use pretty_assertions::assert_eq;
use rfx_edit::CommitError;
use rfx_ir::{KindSet, NodeId, NodeKind, ProjectOptions};

use super::*;
use crate::test_util::{parse, Faulty, Rename};
use crate::{Rule, RuleContext, RuleError, Visit};

const SRC: &str = "class A {
    void f() {
        // keep me
        a();
        b(a());
    }
}
";

fn rename(name: &'static str, from: &'static str, to: &'static str) -> Rename {
    Rename { name, from, to }
}

fn text_of(result: PassResult) -> String {
    match result.output {
        Some(PassOutput::Text(text)) => text,
        other => panic!("expected text output, got {other:?}"),
    }
}

#[test]
fn test_commit_text_and_stats() {
    let tree = parse(SRC);
    let rule = rename("rename", "a", "z");
    let mut dispatcher = Dispatcher::new();
    dispatcher.register(&rule);
    let options = ProjectOptions::default();

    let result = Pass::new(&dispatcher, &options).run(&tree, OutputMode::Text);
    let report = result.report.clone();
    assert_eq!(report.outcome, PassOutcome::Committed);
    assert_eq!(
        report.stats("rename"),
        Some(&RuleStats {
            rule: "rename",
            proposed: 2,
            applied: 2,
            conflicted: 0,
            errored: 0,
        })
    );
    assert_eq!(
        text_of(result),
        "class A {
    void f() {
        // keep me
        z();
        b(z());
    }
}
"
    );
}

#[test]
fn test_conflict_refuses_the_whole_pass() {
    let tree = parse(SRC);
    let first = rename("first", "a", "x");
    let second = rename("second", "a", "y");
    let other = rename("other", "b", "c");
    let mut dispatcher = Dispatcher::new();
    dispatcher.register(&first);
    dispatcher.register(&second);
    dispatcher.register(&other);
    let options = ProjectOptions::default();

    let result = Pass::new(&dispatcher, &options).run(&tree, OutputMode::Text);

    assert!(result.output.is_none());
    let report = result.report;
    let PassOutcome::Refused(CommitError::Conflicts(conflicts)) = &report.outcome else {
        panic!("expected a conflict refusal, got {:?}", report.outcome);
    };
    assert_eq!(conflicts.len(), 2);
    assert_eq!(report.responsible_rules(), vec!["first", "second"]);
    assert_eq!(report.applied(), 0);
    assert_eq!(report.stats("second").map(|s| s.conflicted), Some(2));
    assert_eq!(report.stats("other").map(|s| s.proposed), Some(1));
    assert_eq!(tree.source(), SRC);
}

#[test]
fn test_nothing_to_do() {
    let tree = parse(SRC);
    let rule = rename("rename", "nope", "z");
    let mut dispatcher = Dispatcher::new();
    dispatcher.register(&rule);
    let options = ProjectOptions::default();

    let result = Pass::new(&dispatcher, &options).run(&tree, OutputMode::Text);
    assert_eq!(result.report.outcome, PassOutcome::NothingToDo);
    assert!(result.output.is_none());
}

#[test]
fn test_rule_failure_is_reported_and_pass_commits() {
    let tree = parse(SRC);
    let faulty = Faulty { panic: false };
    let rule = rename("rename", "b", "c");
    let mut dispatcher = Dispatcher::new();
    dispatcher.register(&faulty);
    dispatcher.register(&rule);
    let options = ProjectOptions::default();

    let result = Pass::new(&dispatcher, &options).run(&tree, OutputMode::Text);
    let report = result.report.clone();
    assert_eq!(report.outcome, PassOutcome::Committed);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.stats("failing").map(|s| (s.errored, s.applied)), Some((1, 0)));
    assert!(text_of(result).contains("        c(a());\n"));
}

/// Proposes a rename on the first call, then raises cancellation.
struct CancelMidway {
    token: CancellationToken,
}

impl Rule for CancelMidway {
    fn name(&self) -> &'static str {
        "cancel-midway"
    }

    fn description(&self) -> &'static str {
        "cancel after one proposal"
    }

    fn interest(&self) -> KindSet {
        KindSet::of(NodeKind::MethodCall)
    }

    fn visit(&self, node: NodeId, cx: &mut RuleContext<'_, '_>) -> Result<Visit, RuleError> {
        if !self.token.is_cancelled() {
            let with = cx.builder().name("gone");
            if let rfx_ir::NodeData::MethodCall { name, .. } = cx.tree().data(node) {
                cx.replace(*name, with);
            }
            self.token.cancel();
        }
        Ok(Visit::Descend)
    }
}

#[test]
fn test_cancellation_discards_the_script() {
    let tree = parse(SRC);
    let token = CancellationToken::new();
    let rule = CancelMidway {
        token: token.clone(),
    };
    let mut dispatcher = Dispatcher::new();
    dispatcher.register(&rule);
    let options = ProjectOptions::default();

    let result = Pass::new(&dispatcher, &options)
        .with_cancellation(token)
        .run(&tree, OutputMode::Text);
    assert_eq!(result.report.outcome, PassOutcome::Cancelled);
    assert!(result.output.is_none());
    assert_eq!(result.report.stats("cancel-midway").map(|s| (s.proposed, s.applied)), Some((1, 0)));
}

#[test]
fn test_commit_tree() {
    let tree = parse(SRC);
    let rule = rename("rename", "b", "c");
    let mut dispatcher = Dispatcher::new();
    dispatcher.register(&rule);
    let options = ProjectOptions::default();

    let result = Pass::new(&dispatcher, &options).run(&tree, OutputMode::Tree);
    let Some(PassOutput::Tree(new)) = result.output else {
        panic!("expected a tree");
    };
    let names = |t: &Tree, ident: &str| {
        t.descendants(t.root())
            .into_iter()
            .filter(|&id| t.is_ident(id, ident))
            .count()
    };
    assert_eq!(names(&new, "c"), 1);
    assert_eq!(names(&new, "b"), 0);
    assert_eq!(names(&tree, "b"), 1);
}
