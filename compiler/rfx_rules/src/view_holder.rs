//! Recycle list item views in Android adapters.
//!
//! An adapter's `getView` that inflates a fresh layout on every call and
//! never looks at the recycled `convertView` inflates only when there is
//! nothing to recycle. Child views looked up with `findViewById` right
//! after the inflation are kept in a `ViewHolderItem` stored as the view's
//! tag, so a recycled view is not searched again.

use tracing::debug;

use rfx_edit::StagedId;
use rfx_engine::{Rule, RuleContext, RuleError, Visit};
use rfx_ir::{
    AssignOp, BinaryOp, KindSet, NodeData, NodeId, NodeKind, ProjectOptions, Property, Tree, VarId,
    VarKind,
};

use crate::util;

const INFLATER: &str = "android.view.LayoutInflater";
const VIEW: &str = "android.view.View";
const VIEW_GROUP: &str = "android.view.ViewGroup";
const HOLDER_CLASS: &str = "ViewHolderItem";
const HOLDER: &str = "viewHolderItem";

fn param_is(tree: &Tree, param: NodeId, qualified: &str) -> bool {
    let bindings = tree.bindings();
    let ty = bindings
        .declared_by(param)
        .and_then(|v| bindings.var(v))
        .and_then(|v| v.ty);
    tree.type_is(ty, qualified)
}

/// The recycled view parameter of `getView(int, View, ViewGroup)` declared
/// with a body in a class that extends something.
fn convert_view(tree: &Tree, method: NodeId) -> Option<VarId> {
    let NodeData::MethodDecl {
        params,
        body: Some(_),
        ..
    } = tree.data(method)
    else {
        return None;
    };
    let [position, view, parent] = params.as_slice() else {
        return None;
    };
    let in_subclass = tree
        .enclosing(method, NodeKind::TypeDecl)
        .is_some_and(|ty| tree.bindings().superclass(ty).is_some());
    if util::method_name(tree, method) != Some("getView")
        || !in_subclass
        || !param_is(tree, *position, "int")
        || !param_is(tree, *view, VIEW)
        || !param_is(tree, *parent, VIEW_GROUP)
    {
        return None;
    }
    tree.bindings().declared_by(*view)
}

/// Whether `var` is read or written in `body` outside `return` statements.
fn is_used(tree: &Tree, body: NodeId, var: VarId) -> bool {
    tree.descendants(body).into_iter().any(|id| {
        tree.bindings().var_of(id) == Some(var) && tree.enclosing(id, NodeKind::Return).is_none()
    })
}

/// `View v = inflater.inflate(..);` or `v = inflater.inflate(..);`: the
/// view variable and the inflating expression.
fn inflation(tree: &Tree, stmt: NodeId) -> Option<(VarId, NodeId)> {
    let (var, init) = match tree.data(stmt) {
        NodeData::LocalVar { fragments, .. } => {
            let [fragment] = fragments.as_slice() else {
                return None;
            };
            let NodeData::VarFragment {
                init: Some(init), ..
            } = tree.data(*fragment)
            else {
                return None;
            };
            (tree.bindings().declared_by(*fragment)?, *init)
        }
        NodeData::ExprStmt { expr } => match tree.data(*expr) {
            NodeData::Assign {
                op: AssignOp::Assign,
                lhs,
                rhs,
            } => (tree.var_of(*lhs)?, *rhs),
            _ => return None,
        },
        _ => return None,
    };
    util::is_method(tree, util::unparen(tree, init), INFLATER, "inflate").then_some((var, init))
}

/// Whether `stmt` assigns `var` anywhere inside it.
fn assigns(tree: &Tree, stmt: NodeId, var: VarId) -> bool {
    tree.descendants(stmt).into_iter().any(|id| match tree.data(id) {
        NodeData::Assign { lhs, .. } => tree.var_of(*lhs) == Some(var),
        _ => false,
    })
}

/// `T name = (T) view.findViewById(args);` with arguments that name no
/// local or parameter.
struct Lookup {
    ty: NodeId,
    name: &'static str,
    init: NodeId,
    cast: Option<NodeId>,
    args: Vec<NodeId>,
}

fn lookup(tree: &Tree, stmt: NodeId, view: VarId) -> Option<Lookup> {
    let NodeData::LocalVar { ty, fragments, .. } = tree.data(stmt) else {
        return None;
    };
    let [fragment] = fragments.as_slice() else {
        return None;
    };
    let NodeData::VarFragment {
        name,
        init: Some(init),
    } = tree.data(*fragment)
    else {
        return None;
    };
    let (cast, call) = match tree.data(util::unparen(tree, *init)) {
        NodeData::Cast { ty, expr } => (Some(*ty), util::unparen(tree, *expr)),
        _ => (None, util::unparen(tree, *init)),
    };
    if !util::is_method(tree, call, VIEW, "findViewById") {
        return None;
    }
    let NodeData::MethodCall {
        target: Some(target),
        args,
        ..
    } = tree.data(call)
    else {
        return None;
    };
    if tree.var_of(*target) != Some(view) {
        return None;
    }
    let bindings = tree.bindings();
    let local = args
        .iter()
        .flat_map(|&arg| tree.descendants(arg))
        .filter_map(|id| bindings.var_of(id).and_then(|v| bindings.var(v)))
        .any(|v| v.kind != VarKind::Field);
    if local {
        return None;
    }
    Some(Lookup {
        ty: *ty,
        name: tree.ident(*name).map(|n| tree.resolve(n))?,
        init: *init,
        cast,
        args: args.clone(),
    })
}

/// Whether the holder names are free: no member type of the class and no
/// variable of the method is called like them.
fn names_free(tree: &Tree, type_decl: NodeId, method: NodeId) -> bool {
    let member = tree
        .list(type_decl, Property::Members)
        .iter()
        .any(|&m| matches!(tree.data(m), NodeData::TypeDecl { name, .. } if tree.is_ident(*name, HOLDER_CLASS)));
    let local = tree
        .bindings()
        .vars()
        .any(|(_, var)| tree.resolve(var.name) == HOLDER && tree.is_ancestor_of(method, var.decl));
    !member && !local
}

#[derive(Clone, Copy)]
pub struct ViewHolder;

impl ViewHolder {
    /// `static class ViewHolderItem { T name; .. }`
    fn holder_class(cx: &mut RuleContext<'_, '_>, lookups: &[Lookup]) -> StagedId {
        let mut b = cx.builder();
        let fields = lookups
            .iter()
            .map(|l| {
                let ty = b.copy(l.ty);
                b.field(&[], ty, l.name, None).node()
            })
            .collect();
        let modifier = b.modifier("static");
        let name = b.name(HOLDER_CLASS);
        b.node(NodeData::TypeDecl {
            modifiers: vec![modifier.node()],
            is_interface: false,
            name: name.node(),
            superclass: None,
            interfaces: Vec::new(),
            members: fields,
        })
    }

    /// `if (convertView == null) { inflate and look up } else { reuse }`
    fn reuse(cx: &mut RuleContext<'_, '_>, convert: &str, init: NodeId, lookups: &[Lookup]) -> StagedId {
        let mut b = cx.builder();
        let target = b.name(convert);
        let inflated = b.copy(init);
        let assign = b.assign(target, inflated);
        let mut then = vec![b.expr_stmt(assign)];
        if lookups.is_empty() {
            let block = b.block(then);
            let subject = b.name(convert);
            let null = b.null();
            let cond = b.binary(BinaryOp::Eq, subject, null);
            return b.if_stmt(cond, block, None);
        }

        let holder = b.name(HOLDER);
        let ty = b.ty(HOLDER_CLASS);
        let created = b.new_object(ty, Vec::new());
        let assign = b.assign(holder, created);
        then.push(b.expr_stmt(assign));
        for l in lookups {
            let receiver = b.name(convert);
            let args = l.args.iter().map(|&a| b.copy(a)).collect();
            let mut found = b.call(Some(receiver), "findViewById", args);
            if let Some(cast) = l.cast {
                let ty = b.copy(cast);
                found = b.cast(ty, found);
            }
            let holder = b.name(HOLDER);
            let field = b.field_access(holder, l.name);
            let assign = b.assign(field, found);
            then.push(b.expr_stmt(assign));
        }
        let receiver = b.name(convert);
        let tag = b.name(HOLDER);
        let store = b.call(Some(receiver), "setTag", vec![tag]);
        then.push(b.expr_stmt(store));

        let receiver = b.name(convert);
        let stored = b.call(Some(receiver), "getTag", Vec::new());
        let ty = b.ty(HOLDER_CLASS);
        let cast = b.cast(ty, stored);
        let holder = b.name(HOLDER);
        let assign = b.assign(holder, cast);
        let fetch = b.expr_stmt(assign);
        let otherwise = b.block(vec![fetch]);

        let block = b.block(then);
        let subject = b.name(convert);
        let null = b.null();
        let cond = b.binary(BinaryOp::Eq, subject, null);
        b.if_stmt(cond, block, Some(otherwise))
    }
}

impl Rule for ViewHolder {
    fn name(&self) -> &'static str {
        "view-holder"
    }

    fn description(&self) -> &'static str {
        "Reuse recycled views and their child lookups in adapter getView"
    }

    fn interest(&self) -> KindSet {
        KindSet::of(NodeKind::MethodDecl)
    }

    fn applies_to(&self, options: &ProjectOptions) -> bool {
        options.android
    }

    fn visit(&self, node: NodeId, cx: &mut RuleContext<'_, '_>) -> Result<Visit, RuleError> {
        let tree = cx.tree();
        let Some(convert_var) = convert_view(tree, node) else {
            return Ok(Visit::Descend);
        };
        let (Some(body), Some(type_decl)) = (
            util::method_body(tree, node),
            tree.enclosing(node, NodeKind::TypeDecl),
        ) else {
            return Ok(Visit::Descend);
        };
        if is_used(tree, body, convert_var) {
            return Ok(Visit::Descend);
        }
        let Some(convert) = tree
            .bindings()
            .var(convert_var)
            .map(|v| tree.resolve(v.name))
        else {
            return Ok(Visit::Descend);
        };

        let statements = tree.list(body, Property::Statements);
        let Some((index, (view, init))) = statements
            .iter()
            .enumerate()
            .find_map(|(i, &s)| inflation(tree, s).map(|found| (i, found)))
        else {
            debug!(?node, "no inflation at the top of getView");
            return Ok(Visit::Descend);
        };
        let stmt = statements[index];
        let lookups: Vec<Lookup> = statements[index + 1..]
            .iter()
            .take_while(|&&s| !assigns(tree, s, view))
            .filter_map(|&s| lookup(tree, s, view))
            .collect();
        if !lookups.is_empty() && !names_free(tree, type_decl, node) {
            debug!(?node, "view holder names taken; not rewriting");
            return Ok(Visit::Descend);
        }
        let claimed = [stmt, init]
            .into_iter()
            .chain(lookups.iter().map(|l| l.init))
            .any(|n| cx.is_claimed(n));
        if claimed {
            return Ok(Visit::Descend);
        }

        if !lookups.is_empty() {
            let class = Self::holder_class(cx, &lookups);
            if !cx.insert_before(node, class) {
                return Ok(Visit::Descend);
            }
            let mut b = cx.builder();
            let ty = b.ty(HOLDER_CLASS);
            let declared = b.local_var(ty, HOLDER, None);
            cx.insert_before(stmt, declared);
        }
        let reuse = Self::reuse(cx, convert, init, &lookups);
        cx.insert_before(stmt, reuse);
        let recycled = cx.builder().name(convert);
        cx.replace(init, recycled);
        for l in &lookups {
            let mut b = cx.builder();
            let holder = b.name(HOLDER);
            let field = b.field_access(holder, l.name);
            cx.replace(l.init, field);
        }
        Ok(Visit::SkipSubtree)
    }
}

#[cfg(test)]
mod tests;
