use pretty_assertions::assert_eq;
use rfx_ir::{NodeKind, Property};

use super::*;
use crate::test_util::{find, first, parse};

const SRC: &str = "class A {\n    void f() {\n        int n = size(a, b);\n        use(n);\n    }\n}\n";

fn apply_error(script: &EditScript<'_>) -> (&'static str, ApplyError) {
    match script.validate() {
        Err(CommitError::Apply { rule, error }) => (rule, error),
        other => panic!("expected an apply error, got {other:?}"),
    }
}

#[test]
fn test_unknown_node() {
    let tree = parse(SRC);
    let mut script = EditScript::new(&tree);
    script.set_owner("r");
    let ghost = NodeId::from_index(tree.len() + 10);
    script.remove(ghost).unwrap();
    assert_eq!(apply_error(&script), ("r", ApplyError::UnknownNode(ghost)));
}

#[test]
fn test_fragment_placed_twice() {
    let tree = parse(SRC);
    let stmt = find(&tree, NodeKind::ExprStmt, "use(n);");
    let mut script = EditScript::new(&tree);
    let call = script.builder().call(None, "g", Vec::new());
    let fragment = script.builder().expr_stmt(call);
    script.insert_before(stmt, fragment).unwrap();
    script.insert_after(stmt, fragment).unwrap();
    assert_eq!(apply_error(&script).1, ApplyError::FragmentReused(fragment));
}

#[test]
fn test_nested_fragment_is_unknown() {
    let tree = parse(SRC);
    let stmt = find(&tree, NodeKind::ExprStmt, "use(n);");
    let mut script = EditScript::new(&tree);
    let call = script.builder().call(None, "g", Vec::new());
    let _wrapper = script.builder().expr_stmt(call);
    script.insert_before(stmt, call).unwrap();
    assert_eq!(apply_error(&script).1, ApplyError::UnknownFragment(call));
}

#[test]
fn test_anchor_must_be_list_member() {
    let tree = parse(SRC);
    let call = find(&tree, NodeKind::MethodCall, "use(n)");
    let mut script = EditScript::new(&tree);
    let zero = script.builder().int(0);
    script.insert_after(call, zero).unwrap();
    assert_eq!(apply_error(&script).1, ApplyError::NotInList(call));
}

#[test]
fn test_positional_insert_bounds() {
    let tree = parse(SRC);
    let block = first(&tree, NodeKind::Block);
    let mut script = EditScript::new(&tree);
    let stmt = script.builder().return_stmt(None);
    script.insert_at(block, Property::Statements, 3, stmt).unwrap();
    assert_eq!(
        apply_error(&script).1,
        ApplyError::IndexOutOfBounds {
            parent: block,
            property: Property::Statements,
            index: 3,
            len: 2,
        }
    );

    let mut script = EditScript::new(&tree);
    let stmt = script.builder().return_stmt(None);
    script.insert_at(block, Property::Condition, 0, stmt).unwrap();
    assert_eq!(
        apply_error(&script).1,
        ApplyError::NotAList {
            parent: block,
            property: Property::Condition,
        }
    );
}

#[test]
fn test_required_slot_is_not_removable() {
    let tree = parse(SRC);
    let call = find(&tree, NodeKind::MethodCall, "use(n)");
    let mut script = EditScript::new(&tree);
    script.remove(call).unwrap();
    assert_eq!(apply_error(&script).1, ApplyError::NotRemovable(call));

    let mut script = EditScript::new(&tree);
    let stmt = find(&tree, NodeKind::ExprStmt, "use(n);");
    script.move_to(call, Destination::After(stmt)).unwrap();
    assert!(matches!(apply_error(&script).1, ApplyError::NotRemovable(n) if n == call));
}

#[test]
fn test_edit_under_edited_ancestor() {
    let tree = parse(SRC);
    let stmt = find(&tree, NodeKind::ExprStmt, "use(n);");
    let arg = tree
        .descendants(stmt)
        .into_iter()
        .find(|&id| tree.kind(id) == NodeKind::SimpleName && tree.text(tree.span(id)) == "n")
        .unwrap();
    let mut script = EditScript::new(&tree);
    script.set_owner("outer");
    script.remove(stmt).unwrap();
    script.set_owner("inner");
    let zero = script.builder().int(0);
    script.replace(arg, zero).unwrap();
    assert_eq!(
        apply_error(&script),
        (
            "inner",
            ApplyError::UnderEditedAncestor {
                node: arg,
                ancestor: stmt,
            }
        )
    );
}

#[test]
fn test_insert_into_edited_parent() {
    let tree = parse(SRC);
    let block = first(&tree, NodeKind::Block);
    let mut script = EditScript::new(&tree);
    let empty = script.builder().block(Vec::new());
    script.replace(block, empty).unwrap();
    let stmt = script.builder().return_stmt(None);
    script.insert_at(block, Property::Statements, 0, stmt).unwrap();
    assert_eq!(
        apply_error(&script).1,
        ApplyError::EditedParent { parent: block }
    );
}

#[test]
fn test_move_into_own_subtree() {
    let tree = parse(SRC);
    let method = first(&tree, NodeKind::MethodDecl);
    let block = first(&tree, NodeKind::Block);
    let mut script = EditScript::new(&tree);
    let to = Destination::At {
        parent: block,
        property: Property::Statements,
        index: 0,
    };
    script.move_to(method, to).unwrap();
    assert_eq!(apply_error(&script).1, ApplyError::MoveIntoItself(method));
}

#[test]
fn test_plan_groups_insertions() {
    let tree = parse(SRC);
    let stmt = find(&tree, NodeKind::ExprStmt, "use(n);");
    let block = first(&tree, NodeKind::Block);
    let mut script = EditScript::new(&tree);
    script.set_owner("r");
    let first_stmt = script.builder().return_stmt(None);
    let second_stmt = script.builder().return_stmt(None);
    script.insert_at(block, Property::Statements, 2, first_stmt).unwrap();
    script.insert_at(block, Property::Statements, 0, second_stmt).unwrap();
    script.remove(stmt).unwrap();

    let plan = build(&script).unwrap();
    let at = &plan.at[&(block, Property::Statements)];
    assert_eq!(
        at.iter().map(|(i, ins)| (*i, ins.seq)).collect::<Vec<_>>(),
        vec![(0, 1), (2, 0)]
    );
    assert_eq!(plan.disposition.get(&stmt), Some(&Disposition::Removed));
    assert_eq!(plan.owners.get(&stmt), Some(&"r"));
    assert_eq!(
        plan.touched_lists(&tree),
        vec![(block, Property::Statements)]
    );
    assert!(plan.covered(&tree, tree.children(stmt)[0]));
    assert!(!plan.covered(&tree, stmt));
}
