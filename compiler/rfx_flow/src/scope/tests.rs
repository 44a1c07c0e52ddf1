use pretty_assertions::assert_eq;
use rfx_ir::{NodeKind, StringInterner};

use super::*;

fn parse(source: &str) -> Tree {
    rfx_parse::parse(source, StringInterner::shared()).unwrap()
}

fn fragment(tree: &Tree, name: &str) -> NodeId {
    tree.descendants(tree.root())
        .into_iter()
        .find(|&id| {
            matches!(tree.data(id), NodeData::VarFragment { name: n, .. } if tree.is_ident(*n, name))
        })
        .unwrap()
}

const SRC: &str = "class A {
    int count;
    int f(int p) {
        int a = 1;
        {
            int b = a;
            use(b);
        }
        return a + p;
    }
}
";

#[test]
fn test_local_scope_starts_at_declaration() {
    let tree = parse(SRC);
    let binding = Binding::resolve(&tree, fragment(&tree, "b")).unwrap();
    assert_eq!(binding.kind, VarKind::Local);
    let scope = Scope::of(&tree, &binding).unwrap();
    assert_eq!((scope.start, scope.end), (0, 2));
    assert_eq!(scope.statements(&tree).len(), 2);

    let binding = Binding::resolve(&tree, fragment(&tree, "a")).unwrap();
    let scope = Scope::of(&tree, &binding).unwrap();
    assert_eq!((scope.start, scope.end), (0, 3));
}

#[test]
fn test_param_scope_is_method_body() {
    let tree = parse(SRC);
    let param = tree
        .descendants(tree.root())
        .into_iter()
        .find(|&id| tree.kind(id) == NodeKind::Param)
        .unwrap();
    let binding = Binding::resolve(&tree, param).unwrap();
    assert_eq!(binding.kind, VarKind::Param);
    let scope = Scope::of(&tree, &binding).unwrap();
    assert_eq!(scope.statements(&tree).len(), 3);
}

#[test]
fn test_fields_and_unknown_names_have_no_scope() {
    let tree = parse(SRC);
    let field = fragment(&tree, "count");
    let binding = Binding::resolve(&tree, field).unwrap();
    assert_eq!(
        Scope::of(&tree, &binding),
        Err(AnalysisError::NotLocal {
            decl: field,
            kind: VarKind::Field,
        })
    );

    let call_name = tree
        .descendants(tree.root())
        .into_iter()
        .find(|&id| tree.is_ident(id, "use"))
        .unwrap();
    assert_eq!(
        Binding::resolve(&tree, call_name),
        Err(AnalysisError::Unresolved(call_name))
    );
}

#[test]
fn test_bounded_range() {
    let tree = parse(SRC);
    let body = tree
        .descendants(tree.root())
        .into_iter()
        .find(|&id| tree.kind(id) == NodeKind::Block)
        .unwrap();
    let scope = Scope::range(&tree, body, 1, 2).unwrap();
    assert_eq!(scope.statements(&tree).len(), 1);
    assert_eq!(
        Scope::range(&tree, body, 2, 5),
        Err(AnalysisError::BadRange {
            block: body,
            start: 2,
            end: 5,
            len: 3,
        })
    );
    let inner = scope.statements(&tree)[0];
    let ret = tree
        .descendants(body)
        .into_iter()
        .find(|&id| tree.kind(id) == NodeKind::Return)
        .unwrap();
    assert_eq!(scope.statement_of(&tree, ret), Some(tree.list(body, Property::Statements)[2]));
    assert_eq!(scope.index_of(&tree, inner), Some(1));
    assert_eq!(Scope::whole(&tree, ret), Err(AnalysisError::NotABlock(ret)));
}
