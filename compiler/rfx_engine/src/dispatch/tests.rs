use pretty_assertions::assert_eq;
use rfx_edit::EditScript;
use rfx_ir::{KindSet, NodeKind, ProjectOptions};

use super::*;
use crate::test_util::{parse, Faulty, Recorder, Rename};

const SRC: &str = "class A {
    void f() {
        a();
        while (ready()) {
            b();
        }
        c();
    }
}
";

fn walk_with(dispatcher: &Dispatcher<'_>, script: &mut EditScript<'_>) -> Walk {
    dispatcher.walk(script, &ProjectOptions::default(), &CancellationToken::new())
}

#[test]
fn test_pre_order_visit() {
    let tree = parse(SRC);
    let recorder = Recorder::new("rec", KindSet::of(NodeKind::MethodCall).with(NodeKind::While));
    let mut dispatcher = Dispatcher::new();
    dispatcher.register(&recorder);

    let mut script = EditScript::new(&tree);
    let walk = walk_with(&dispatcher, &mut script);

    assert!(!walk.cancelled);
    assert_eq!(walk.visited, tree.descendants(tree.root()).len());
    assert_eq!(
        recorder.seen(),
        vec![
            "a()",
            "while (ready()) {\n            b();\n        }",
            "ready()",
            "b()",
            "c()",
        ]
    );
}

#[test]
fn test_skip_subtree_hides_loop_from_every_rule() {
    let tree = parse(SRC);
    let skipper = Recorder::new("skipper", KindSet::of(NodeKind::While)).skipping(NodeKind::While);
    let late = Recorder::new("late", KindSet::of(NodeKind::While));
    let calls = Recorder::new("calls", KindSet::of(NodeKind::MethodCall));
    let mut dispatcher = Dispatcher::new();
    dispatcher.register(&skipper);
    dispatcher.register(&late);
    dispatcher.register(&calls);

    let mut script = EditScript::new(&tree);
    walk_with(&dispatcher, &mut script);

    assert_eq!(skipper.seen().len(), 1);
    // First match wins: later rules are not offered the skipped node.
    assert_eq!(late.seen(), Vec::<String>::new());
    assert_eq!(calls.seen(), vec!["a()", "c()"]);
}

#[test]
fn test_registration_order_decides_who_sees_the_node() {
    let tree = parse(SRC);
    let first = Recorder::new("first", KindSet::of(NodeKind::While));
    let skipper = Recorder::new("skipper", KindSet::of(NodeKind::While)).skipping(NodeKind::While);
    let mut dispatcher = Dispatcher::new();
    dispatcher.register(&first);
    dispatcher.register(&skipper);

    let mut script = EditScript::new(&tree);
    walk_with(&dispatcher, &mut script);

    assert_eq!(first.seen().len(), 1);
    assert_eq!(skipper.seen().len(), 1);
    assert_eq!(
        dispatcher
            .interested(NodeKind::While)
            .map(|r| r.name())
            .collect::<Vec<_>>(),
        vec!["first", "skipper"]
    );
}

#[test]
fn test_failing_rule_is_isolated() {
    let tree = parse(SRC);
    let faulty = Faulty { panic: false };
    let rename = Rename {
        name: "rename",
        from: "c",
        to: "d",
    };
    let mut dispatcher = Dispatcher::new();
    dispatcher.register(&faulty);
    dispatcher.register(&rename);

    let mut script = EditScript::new(&tree);
    let walk = walk_with(&dispatcher, &mut script);

    assert_eq!(walk.failures.len(), 1);
    assert_eq!(walk.failures[0].rule, "failing");
    assert_eq!(walk.failures[0].error, RuleError::failed("gave up"));
    assert_eq!(walk.dropped, vec![1, 0]);
    assert_eq!(script.len(), 1);
    assert_eq!(script.ops()[0].owner, "rename");
}

#[test]
fn test_panicking_rule_is_caught() {
    let tree = parse(SRC);
    let faulty = Faulty { panic: true };
    let mut dispatcher = Dispatcher::new();
    dispatcher.register(&faulty);

    let mut script = EditScript::new(&tree);
    let walk = walk_with(&dispatcher, &mut script);

    assert_eq!(walk.failures.len(), 1);
    assert_eq!(walk.failures[0].error, RuleError::Panicked("boom".to_owned()));
    assert!(script.is_empty());
}

#[test]
fn test_cancelled_before_first_declaration() {
    let tree = parse(SRC);
    let recorder = Recorder::new("rec", KindSet::of(NodeKind::MethodCall));
    let mut dispatcher = Dispatcher::new();
    dispatcher.register(&recorder);
    let cancel = CancellationToken::new();
    cancel.cancel();

    let mut script = EditScript::new(&tree);
    let walk = dispatcher.walk(&mut script, &ProjectOptions::default(), &cancel);

    assert!(walk.cancelled);
    assert_eq!(walk.visited, 1);
    assert_eq!(recorder.seen(), Vec::<String>::new());
}

#[test]
fn test_duplicate_names_register_once() {
    let a = Recorder::new("same", KindSet::of(NodeKind::Block));
    let b = Recorder::new("same", KindSet::of(NodeKind::If));
    let mut dispatcher = Dispatcher::new();
    dispatcher.register(&a);
    dispatcher.register(&b);
    assert_eq!(dispatcher.len(), 1);
    assert_eq!(dispatcher.interested(NodeKind::If).count(), 0);
}

#[test]
fn test_rules_that_do_not_apply_are_never_offered_nodes() {
    let tree = parse(SRC);
    let android = Recorder::new("android", KindSet::of(NodeKind::MethodCall)).android_only();
    let portable = Recorder::new("portable", KindSet::of(NodeKind::MethodCall));
    let mut dispatcher = Dispatcher::new();
    dispatcher.register(&android);
    dispatcher.register(&portable);

    let mut script = EditScript::new(&tree);
    walk_with(&dispatcher, &mut script);
    assert_eq!(android.seen(), Vec::<String>::new());
    assert_eq!(portable.seen().len(), 4);

    let options = ProjectOptions::default().with_android(true);
    let mut script = EditScript::new(&tree);
    let walk = dispatcher.walk(&mut script, &options, &CancellationToken::new());
    assert!(!walk.cancelled);
    assert_eq!(android.seen().len(), 4);
}
