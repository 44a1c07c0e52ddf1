//! Tree queries shared by several rules.

use rfx_engine::RuleContext;
use rfx_ir::{AssignOp, NodeData, NodeId, Property, Tree};

/// Whether `call` resolves to method `name` declared on `declaring`.
pub(crate) fn is_method(tree: &Tree, call: NodeId, declaring: &str, name: &str) -> bool {
    tree.bindings().method(call).is_some_and(|m| {
        tree.resolve(m.name) == name && tree.type_is(m.declaring_type, declaring)
    })
}

/// Argument types inferred for `call`, as written by the resolver.
pub(crate) fn arg_types(tree: &Tree, call: NodeId) -> Vec<&'static str> {
    tree.bindings()
        .method(call)
        .map(|m| m.param_types.iter().map(|t| tree.resolve(t.name())).collect())
        .unwrap_or_default()
}

/// Resolved static type of an expression.
pub(crate) fn type_of(tree: &Tree, expr: NodeId) -> Option<&'static str> {
    tree.bindings()
        .expr_type(expr)
        .map(|t| tree.resolve(t.name()))
}

/// Strip any parentheses around an expression.
pub(crate) fn unparen(tree: &Tree, mut expr: NodeId) -> NodeId {
    while let NodeData::Paren { expr: inner } = tree.data(expr) {
        expr = *inner;
    }
    expr
}

/// The first ancestor that is not a parenthesis, with the child of it that
/// leads to `expr`.
pub(crate) fn outer(tree: &Tree, mut expr: NodeId) -> Option<(NodeId, NodeId)> {
    loop {
        let parent = tree.parent(expr)?;
        if !matches!(tree.data(parent), NodeData::Paren { .. }) {
            return Some((parent, expr));
        }
        expr = parent;
    }
}

/// Declared type of the variable `expr` is stored into, when `expr` is a
/// declarator initializer or the right side of a plain assignment.
pub(crate) fn stored_type(tree: &Tree, expr: NodeId) -> Option<&'static str> {
    let (parent, child) = outer(tree, expr)?;
    match tree.data(parent) {
        NodeData::VarFragment {
            init: Some(init), ..
        } if *init == child => {
            let bindings = tree.bindings();
            let var = bindings.declared_by(parent)?;
            bindings.var(var)?.ty.map(|t| tree.resolve(t.name()))
        }
        NodeData::Assign {
            op: AssignOp::Assign,
            lhs,
            rhs,
        } if *rhs == child => type_of(tree, *lhs),
        _ => None,
    }
}

/// Whether replacing `expr` with a cast or an operator expression needs
/// parentheses to keep its meaning.
pub(crate) fn binds_tighter_than_cast(tree: &Tree, expr: NodeId) -> bool {
    tree.slot(expr).is_some_and(|slot| {
        matches!(
            slot.property,
            Property::Target | Property::Array | Property::Qualifier
        ) || matches!(tree.data(slot.parent), NodeData::Postfix { .. })
    })
}

/// Name of a method declaration.
pub(crate) fn method_name(tree: &Tree, method: NodeId) -> Option<&'static str> {
    match tree.data(method) {
        NodeData::MethodDecl { name, .. } => tree.ident(*name).map(|n| tree.resolve(n)),
        _ => None,
    }
}

/// Method with a body named `name` among the members of `type_decl`.
pub(crate) fn find_method(tree: &Tree, type_decl: NodeId, name: &str) -> Option<NodeId> {
    tree.list(type_decl, Property::Members)
        .iter()
        .copied()
        .find(|&m| {
            method_name(tree, m) == Some(name)
                && matches!(tree.data(m), NodeData::MethodDecl { body: Some(_), .. })
        })
}

/// Body block of a method declaration.
pub(crate) fn method_body(tree: &Tree, method: NodeId) -> Option<NodeId> {
    match tree.data(method) {
        NodeData::MethodDecl { body, .. } => *body,
        _ => None,
    }
}

/// Whether `type_decl` directly extends `qualified`.
pub(crate) fn extends(tree: &Tree, type_decl: NodeId, qualified: &str) -> bool {
    tree.type_is(tree.bindings().superclass(type_decl), qualified)
}

/// Whether the unit can refer to `qualified` by its simple name, through
/// a single-type or an on-demand import.
pub(crate) fn imports(tree: &Tree, qualified: &str) -> bool {
    let package = qualified.rsplit_once('.').map(|(p, _)| p);
    tree.list(tree.root(), Property::Imports)
        .iter()
        .any(|&import| match tree.data(import) {
            NodeData::ImportDecl {
                name,
                is_static: false,
                on_demand,
            } => {
                let written = tree.dotted_name(*name);
                if *on_demand {
                    package == Some(written.as_str())
                } else {
                    written == qualified
                }
            }
            _ => false,
        })
}

/// Whether another single-type import already claims the simple name of
/// `qualified`.
pub(crate) fn import_clashes(tree: &Tree, qualified: &str) -> bool {
    let simple = qualified.rsplit('.').next().unwrap_or(qualified);
    tree.list(tree.root(), Property::Imports)
        .iter()
        .any(|&import| match tree.data(import) {
            NodeData::ImportDecl {
                name,
                is_static: false,
                on_demand: false,
            } => {
                let written = tree.dotted_name(*name);
                written != qualified && written.rsplit('.').next() == Some(simple)
            }
            _ => false,
        })
}

/// Import `qualified` unless the unit already does, once per pass no
/// matter how many rules ask.
pub(crate) fn add_import(cx: &mut RuleContext<'_, '_>, qualified: &str) {
    let tree = cx.tree();
    if imports(tree, qualified) || !cx.first_time(&format!("import {qualified}")) {
        return;
    }
    let root = tree.root();
    let import = cx.builder().import(qualified);
    match tree.list(root, Property::Imports).last() {
        Some(&last) => cx.insert_after(last, import),
        None => cx.insert_at(root, Property::Imports, 0, import),
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::{find, parse};

    const SRC: &str = "import java.util.*;
import android.util.SparseArray;

class A extends Base {
    int n;
    void f() {
        n = (Integer.valueOf(1));
        x.y.z();
    }
    abstract void g();
}
";

    #[test]
    fn test_imports() {
        let tree = parse(SRC);
        assert!(imports(&tree, "java.util.HashMap"));
        assert!(imports(&tree, "android.util.SparseArray"));
        assert!(!imports(&tree, "android.util.SparseIntArray"));
        assert!(import_clashes(&tree, "com.other.SparseArray"));
        assert!(!import_clashes(&tree, "android.util.SparseArray"));
    }

    #[test]
    fn test_stored_type_looks_through_parentheses() {
        let tree = parse(SRC);
        let call = find(&tree, "Integer.valueOf(1)");
        assert_eq!(stored_type(&tree, call), Some("int"));
        assert!(is_method(&tree, call, "java.lang.Integer", "valueOf"));
        assert_eq!(arg_types(&tree, call), vec!["int"]);
    }

    #[test]
    fn test_members() {
        let tree = parse(SRC);
        let class = tree.list(tree.root(), Property::Types)[0];
        assert!(find_method(&tree, class, "f").is_some());
        assert!(find_method(&tree, class, "g").is_none());
        assert!(extends(&tree, class, "Base"));
    }
}
