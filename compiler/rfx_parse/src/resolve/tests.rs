use pretty_assertions::assert_eq;
use rfx_ir::{NodeData, NodeId, NodeKind, StringInterner, Tree, VarKind};

use crate::parse;

fn parse_ok(source: &str) -> Tree {
    parse(source, StringInterner::shared()).unwrap()
}

fn find_call(tree: &Tree, method: &str) -> NodeId {
    tree.descendants(tree.root())
        .into_iter()
        .find(|&id| matches!(tree.data(id), NodeData::MethodCall { name, .. } if tree.is_ident(*name, method)))
        .unwrap()
}

fn type_name(tree: &Tree, ty: Option<rfx_ir::TypeRef>) -> &'static str {
    ty.map_or("", |t| tree.resolve(t.name()))
}

#[test]
fn test_local_reads_bind_to_declaration() {
    let tree = parse_ok(
        "import android.database.Cursor;\nclass A { int f(Cursor c) { Cursor d = c; d.close(); return 0; } }",
    );
    let bindings = tree.bindings();
    let (vars, kinds): (Vec<_>, Vec<_>) = bindings
        .vars()
        .map(|(id, info)| (id, info.kind))
        .unzip();
    assert_eq!(kinds, vec![VarKind::Param, VarKind::Local]);
    assert_eq!(bindings.occurrences(vars[0]).len(), 1);
    assert_eq!(bindings.occurrences(vars[1]).len(), 1);
    assert_eq!(
        type_name(&tree, bindings.var(vars[1]).and_then(|v| v.ty)),
        "android.database.Cursor"
    );
}

#[test]
fn test_inner_scope_shadows_and_ends() {
    let tree = parse_ok("class A { void f() { int x = 1; { int y = x; } int y = 2; } }");
    let names: Vec<_> = tree
        .bindings()
        .vars()
        .map(|(_, info)| tree.resolve(info.name))
        .collect();
    assert_eq!(names, vec!["x", "y", "y"]);
}

#[test]
fn test_static_call_binding() {
    let tree = parse_ok(
        "import android.util.FloatMath;\nclass A { float f(float x) { return FloatMath.sqrt(x); } }",
    );
    let call = find_call(&tree, "sqrt");
    let method = tree.bindings().method(call).unwrap();
    assert!(method.is_static);
    assert_eq!(type_name(&tree, method.declaring_type), "android.util.FloatMath");
    assert_eq!(
        method
            .param_types
            .iter()
            .map(|t| tree.resolve(t.name()))
            .collect::<Vec<_>>(),
        vec!["float"]
    );
    assert_eq!(type_name(&tree, tree.bindings().expr_type(call)), "float");
}

#[test]
fn test_instance_call_uses_receiver_type() {
    let tree = parse_ok(
        "import android.database.sqlite.SQLiteDatabase;\nclass A { void f(SQLiteDatabase db) { db.query(\"t\"); } }",
    );
    let call = find_call(&tree, "query");
    let method = tree.bindings().method(call).unwrap();
    assert!(!method.is_static);
    assert_eq!(
        type_name(&tree, method.declaring_type),
        "android.database.sqlite.SQLiteDatabase"
    );
    assert_eq!(
        type_name(&tree, tree.bindings().expr_type(call)),
        "android.database.Cursor"
    );
}

#[test]
fn test_fields_and_this_access() {
    let tree = parse_ok(
        "class A { PowerManager.WakeLock lock; void f() { lock.acquire(); this.lock.release(); } }",
    );
    let field = tree
        .bindings()
        .vars()
        .find(|(_, v)| v.kind == VarKind::Field)
        .map(|(id, _)| id)
        .unwrap();
    assert_eq!(tree.bindings().occurrences(field).len(), 2);
}

#[test]
fn test_superclass_and_java_lang() {
    let tree = parse_ok(
        "import android.app.Activity;\nclass A extends Activity { void f() { Integer i = Integer.valueOf(1); } }",
    );
    let ty = tree
        .descendants(tree.root())
        .into_iter()
        .find(|&id| tree.kind(id) == NodeKind::TypeDecl)
        .unwrap();
    assert_eq!(
        type_name(&tree, tree.bindings().superclass(ty)),
        "android.app.Activity"
    );
    let call = find_call(&tree, "valueOf");
    assert_eq!(
        type_name(&tree, tree.bindings().method(call).unwrap().declaring_type),
        "java.lang.Integer"
    );
}

#[test]
fn test_binary_types() {
    let tree = parse_ok("class A { void f(int a, double b, String s) { g(a + b); g(s + a); g(a < b); } }");
    let types: Vec<_> = tree
        .descendants(tree.root())
        .into_iter()
        .filter(|&id| tree.kind(id) == NodeKind::Binary)
        .map(|id| type_name(&tree, tree.bindings().expr_type(id)))
        .collect();
    assert_eq!(types, vec!["double", "java.lang.String", "boolean"]);
}
