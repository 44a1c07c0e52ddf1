//! Hoist allocations out of `onDraw(Canvas)`.
//!
//! `onDraw` runs every frame. A local initialized by a constructor call
//! that depends on nothing in the method becomes a private field declared
//! just before the method. Empty collections become fields too, and the
//! statement is replaced by a `clear()` so each frame still starts empty.

use tracing::debug;

use rfx_engine::{Rule, RuleContext, RuleError, Visit};
use rfx_ir::{KindSet, NodeData, NodeId, NodeKind, ProjectOptions, Property, Tree, VarKind};

use crate::util;

const CANVAS: &str = "android.graphics.Canvas";

const COLLECTIONS: &[&str] = &[
    "java.util.ArrayList",
    "java.util.LinkedList",
    "java.util.ArrayDeque",
    "java.util.HashMap",
    "java.util.HashSet",
    "java.util.LinkedHashMap",
    "java.util.LinkedHashSet",
    "java.util.TreeMap",
    "java.util.TreeSet",
    "java.util.Vector",
];

/// Whether `method` is `onDraw(Canvas)` with a body, in a subclass.
fn is_on_draw(tree: &Tree, method: NodeId) -> bool {
    let NodeData::MethodDecl {
        params,
        body: Some(_),
        ..
    } = tree.data(method)
    else {
        return false;
    };
    let [param] = params.as_slice() else {
        return false;
    };
    let bindings = tree.bindings();
    let param_ty = bindings
        .declared_by(*param)
        .and_then(|v| bindings.var(v))
        .and_then(|v| v.ty);
    util::method_name(tree, method) == Some("onDraw")
        && tree.type_is(param_ty, CANVAS)
        && tree
            .enclosing(method, NodeKind::TypeDecl)
            .is_some_and(|ty| bindings.superclass(ty).is_some())
}

/// The creation initializing a local, looking through one cast, when it
/// depends on nothing but literals and type names.
fn constant_creation(tree: &Tree, init: NodeId) -> Option<NodeId> {
    let creation = match tree.data(util::unparen(tree, init)) {
        NodeData::Cast { expr, .. } => util::unparen(tree, *expr),
        _ => util::unparen(tree, init),
    };
    let NodeData::New {
        anonymous: None, ..
    } = tree.data(creation)
    else {
        return None;
    };
    let independent = tree.descendants(creation).into_iter().all(|id| match tree.kind(id) {
        NodeKind::MethodCall | NodeKind::SuperMethodCall | NodeKind::This => false,
        NodeKind::SimpleName => tree.ancestors(id).take_while(|&a| a != creation).any(|a| {
            tree.kind(a).is_type()
        }),
        _ => true,
    });
    independent.then_some(creation)
}

/// Whether some field of `type_decl` is already called `name`.
fn field_exists(tree: &Tree, type_decl: NodeId, name: &str) -> bool {
    tree.bindings().vars().any(|(_, var)| {
        var.kind == VarKind::Field
            && tree.resolve(var.name) == name
            && tree.enclosing(var.decl, NodeKind::TypeDecl) == Some(type_decl)
    })
}

#[derive(Clone, Copy)]
pub struct DrawAllocation;

impl DrawAllocation {
    /// Hoist one statement of the `onDraw` body.
    fn hoist(method: NodeId, type_decl: NodeId, stmt: NodeId, cx: &mut RuleContext<'_, '_>) {
        let tree = cx.tree();
        let NodeData::LocalVar { ty, fragments, .. } = tree.data(stmt) else {
            return;
        };
        let [fragment] = fragments.as_slice() else {
            return;
        };
        let NodeData::VarFragment {
            name,
            init: Some(init),
        } = tree.data(*fragment)
        else {
            return;
        };
        let Some(creation) = constant_creation(tree, *init) else {
            return;
        };
        let Some(ident) = tree.ident(*name).map(|n| tree.resolve(n)) else {
            return;
        };
        if field_exists(tree, type_decl, ident) {
            debug!(name = ident, "field name taken; not hoisting");
            return;
        }
        match cx.lifecycle(*fragment) {
            Ok(record) if record.assigning_statements.len() == 1 => {}
            Ok(_) => return,
            Err(error) => {
                debug!(?stmt, %error, "not hoisting");
                return;
            }
        }
        let collection = tree
            .bindings()
            .declared_by(*fragment)
            .and_then(|v| tree.bindings().var(v))
            .and_then(|v| v.ty)
            .map(|t| tree.resolve(t.name()))
            .filter(|t| COLLECTIONS.contains(t));
        let empty = matches!(tree.data(creation), NodeData::New { args, .. } if args.is_empty());
        if collection.is_some() && !empty {
            return;
        }
        if [stmt, *ty, *fragment].into_iter().any(|n| cx.is_claimed(n)) {
            return;
        }

        let mut b = cx.builder();
        let private = b.modifier("private");
        let field_ty = b.moved(*ty);
        let field_fragment = b.moved(*fragment);
        let field = b.node(NodeData::FieldDecl {
            modifiers: vec![private.node()],
            ty: field_ty.node(),
            fragments: vec![field_fragment.node()],
        });
        let clear = collection.map(|_| {
            let receiver = b.name(ident);
            let call = b.call(Some(receiver), "clear", Vec::new());
            b.expr_stmt(call)
        });
        if !cx.insert_before(method, field) {
            return;
        }
        match clear {
            Some(clear) => cx.replace(stmt, clear),
            None => cx.remove(stmt),
        };
    }
}

impl Rule for DrawAllocation {
    fn name(&self) -> &'static str {
        "draw-allocation"
    }

    fn description(&self) -> &'static str {
        "Move allocations out of onDraw into fields"
    }

    fn interest(&self) -> KindSet {
        KindSet::of(NodeKind::MethodDecl)
    }

    fn applies_to(&self, options: &ProjectOptions) -> bool {
        options.android
    }

    fn visit(&self, node: NodeId, cx: &mut RuleContext<'_, '_>) -> Result<Visit, RuleError> {
        let tree = cx.tree();
        if !is_on_draw(tree, node) {
            return Ok(Visit::Descend);
        }
        let (Some(type_decl), Some(body)) = (
            tree.enclosing(node, NodeKind::TypeDecl),
            util::method_body(tree, node),
        ) else {
            return Ok(Visit::Descend);
        };
        for &stmt in tree.list(body, Property::Statements) {
            Self::hoist(node, type_decl, stmt, cx);
        }
        Ok(Visit::Descend)
    }
}

#[cfg(test)]
mod tests;
