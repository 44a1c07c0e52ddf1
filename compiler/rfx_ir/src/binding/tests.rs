use super::*;
use crate::StringInterner;

#[test]
fn test_declare_and_lookup() {
    let interner = StringInterner::new();
    let mut bindings = Bindings::new();
    let decl = NodeId::new(3);
    let var = bindings.declare(VarInfo {
        name: interner.intern("c"),
        decl,
        ty: Some(TypeRef(interner.intern("android.database.Cursor"))),
        kind: VarKind::Local,
    });
    assert_eq!(bindings.declared_by(decl), Some(var));
    assert_eq!(bindings.var(var).map(|v| v.kind), Some(VarKind::Local));
}

#[test]
fn test_occurrences_sorted() {
    let interner = StringInterner::new();
    let mut bindings = Bindings::new();
    let var = bindings.declare(VarInfo {
        name: interner.intern("c"),
        decl: NodeId::new(0),
        ty: None,
        kind: VarKind::Param,
    });
    bindings.bind_name(NodeId::new(9), var);
    bindings.bind_name(NodeId::new(4), var);
    assert_eq!(bindings.occurrences(var), vec![NodeId::new(4), NodeId::new(9)]);
    assert_eq!(bindings.var_of(NodeId::new(5)), None);
}
