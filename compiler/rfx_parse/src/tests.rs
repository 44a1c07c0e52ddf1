use pretty_assertions::assert_eq;
use rfx_ir::{NodeData, NodeKind, Property, StringInterner};

use super::*;

fn parse_ok(source: &str) -> Tree {
    parse(source, StringInterner::shared()).unwrap()
}

fn kinds_in(tree: &Tree) -> Vec<NodeKind> {
    tree.descendants(tree.root())
        .into_iter()
        .map(|id| tree.kind(id))
        .collect()
}

#[test]
fn test_class_with_method() {
    let tree = parse_ok(
        "package a.b;\nimport android.database.Cursor;\npublic class Foo extends Bar {\n  int n;\n  void f() { return; }\n}\n",
    );
    let root = tree.root();
    assert_eq!(tree.kind(root), NodeKind::CompilationUnit);
    let types = tree.list(root, Property::Types);
    assert_eq!(types.len(), 1);
    let members = tree.list(types[0], Property::Members);
    assert_eq!(
        members.iter().map(|&m| tree.kind(m)).collect::<Vec<_>>(),
        vec![NodeKind::FieldDecl, NodeKind::MethodDecl]
    );
    assert_eq!(tree.text(tree.span(members[1])), "void f() { return; }");
}

#[test]
fn test_statement_spans_include_semicolon() {
    let tree = parse_ok("class A { void f() { int x = 1; x++; } }");
    let stmts: Vec<_> = tree
        .descendants(tree.root())
        .into_iter()
        .filter(|&id| matches!(tree.kind(id), NodeKind::LocalVar | NodeKind::ExprStmt))
        .map(|id| tree.text(tree.span(id)).to_owned())
        .collect();
    assert_eq!(stmts, vec!["int x = 1;".to_owned(), "x++;".to_owned()]);
}

#[test]
fn test_precedence_and_shift() {
    let tree = parse_ok("class A { int f(int a, int b) { return a + b * 2 >> 1; } }");
    let ret = tree
        .descendants(tree.root())
        .into_iter()
        .find(|&id| tree.kind(id) == NodeKind::Return)
        .unwrap();
    let NodeData::Return { value: Some(value) } = tree.data(ret) else {
        panic!("return without value");
    };
    let NodeData::Binary { op, lhs, .. } = tree.data(*value) else {
        panic!("expected binary");
    };
    assert_eq!(*op, rfx_ir::BinaryOp::Shr);
    assert_eq!(tree.text(tree.span(*lhs)), "a + b * 2");
}

#[test]
fn test_generic_types_close() {
    let tree = parse_ok(
        "import java.util.*;\nclass A { Map<Integer, List<String>> m = new HashMap<Integer, List<String>>(); }",
    );
    assert!(kinds_in(&tree).contains(&NodeKind::ParameterizedType));
}

#[test]
fn test_names_calls_and_field_access() {
    let tree = parse_ok("class A { void f() { Boolean b = Boolean.TRUE; c.close(); this.x.y(); } }");
    let kinds = kinds_in(&tree);
    assert!(kinds.contains(&NodeKind::QualifiedName));
    assert!(kinds.contains(&NodeKind::MethodCall));
    assert!(kinds.contains(&NodeKind::FieldAccess));
}

#[test]
fn test_cast_versus_parenthesized() {
    let tree = parse_ok("class A { void f() { float x = (float) Math.sqrt(2); int y = (a) + 1; } }");
    let kinds = kinds_in(&tree);
    assert!(kinds.contains(&NodeKind::Cast));
    assert!(kinds.contains(&NodeKind::Paren));
}

#[test]
fn test_control_flow_statements() {
    let tree = parse_ok(
        "class A { void f(int[] xs) {\n  for (int i = 0; i < 3; i++) { continue; }\n  for (int x : xs) { break; }\n  do { } while (false);\n  try { g(); } catch (Exception e) { throw e; } finally { }\n  if (true) ; else { }\n} }",
    );
    let kinds = kinds_in(&tree);
    for kind in [
        NodeKind::For,
        NodeKind::ForEach,
        NodeKind::DoWhile,
        NodeKind::Try,
        NodeKind::Catch,
        NodeKind::Throw,
        NodeKind::If,
        NodeKind::Empty,
    ] {
        assert!(kinds.contains(&kind), "missing {kind:?}");
    }
}

#[test]
fn test_anonymous_class_and_array_creation() {
    let tree = parse_ok(
        "class A { void f() { Runnable r = new Runnable() { public void run() { } }; int[] a = new int[] { 1, 2, }; } }",
    );
    let kinds = kinds_in(&tree);
    assert!(kinds.contains(&NodeKind::AnonymousClass));
    assert!(kinds.contains(&NodeKind::ArrayCreation));
    assert!(kinds.contains(&NodeKind::ArrayInit));
}

#[test]
fn test_comments_survive_in_source() {
    let source = "class A {\n  // keep me\n  void f() { /* and me */ }\n}\n";
    let tree = parse_ok(source);
    assert_eq!(tree.source(), source);
}

#[test]
fn test_unsupported_constructs() {
    let interner = StringInterner::shared();
    for source in [
        "enum E { A }",
        "class A { void f() { switch (x) { } } }",
        "class A { void f() { try (R r = g()) { } } }",
        "class A { Object o = A.class; }",
    ] {
        let err = parse(source, interner.clone()).unwrap_err();
        assert!(
            matches!(err, ParseError::Unsupported { .. }),
            "{source}: {err}"
        );
    }
}

#[test]
fn test_syntax_error_reports_position() {
    let err = parse("class A { void f() { int x = ; } }", StringInterner::shared()).unwrap_err();
    assert!(matches!(err, ParseError::Unexpected { .. }));
    assert_eq!(err.span().start, 29);
}
