//! Stop anonymous Android handlers from leaking their activity.
//!
//! A field initialized with `new Handler() { handleMessage(..) }` holds the
//! enclosing instance for as long as a message is queued. The handler
//! becomes a static nested class that keeps the instance through a
//! `WeakReference`, and the message handling body moves to a private
//! method of the enclosing class where its references keep their meaning.

use tracing::debug;

use rfx_edit::StagedId;
use rfx_engine::{Rule, RuleContext, RuleError, Visit};
use rfx_ir::{BinaryOp, KindSet, NodeData, NodeId, NodeKind, ProjectOptions, Property, Tree};

use crate::util;

const HANDLER: &str = "android.os.Handler";
const WEAK_REFERENCE: &str = "java.lang.ref.WeakReference";
const REFERENT: &str = "activity";

/// `new Handler() { void handleMessage(Message m) { .. } }` initializing
/// the single fragment of a handler field: the creation and the
/// `handleMessage` declaration.
fn anonymous_handler(tree: &Tree, field: NodeId) -> Option<(NodeId, NodeId)> {
    let NodeData::FieldDecl { fragments, .. } = tree.data(field) else {
        return None;
    };
    let [fragment] = fragments.as_slice() else {
        return None;
    };
    let NodeData::VarFragment {
        init: Some(init), ..
    } = tree.data(*fragment)
    else {
        return None;
    };
    let bindings = tree.bindings();
    let ty = bindings
        .declared_by(*fragment)
        .and_then(|v| bindings.var(v))
        .and_then(|v| v.ty);
    if !tree.type_is(ty, HANDLER) {
        return None;
    }
    let creation = util::unparen(tree, *init);
    let NodeData::New {
        args,
        anonymous: Some(body),
        ..
    } = tree.data(creation)
    else {
        return None;
    };
    let [method] = tree.list(*body, Property::Members) else {
        return None;
    };
    let handles = matches!(
        tree.data(*method),
        NodeData::MethodDecl { params, body: Some(_), .. } if params.len() == 1
    );
    (args.is_empty() && handles && util::method_name(tree, *method) == Some("handleMessage"))
        .then_some((creation, *method))
}

fn is_static(tree: &Tree, modifiers: &[NodeId]) -> bool {
    modifiers
        .iter()
        .any(|&m| matches!(tree.data(m), NodeData::Modifier { keyword } if tree.resolve(*keyword) == "static"))
}

/// A class that may declare a static nested class: top level or static.
fn can_nest_static(tree: &Tree, type_decl: NodeId) -> bool {
    let NodeData::TypeDecl {
        modifiers,
        is_interface: false,
        ..
    } = tree.data(type_decl)
    else {
        return false;
    };
    tree.parent(type_decl) == Some(tree.root()) || is_static(tree, modifiers)
}

/// Whether `body` means the same once it is a method of `type_decl`: it
/// uses neither `this` nor `super` and calls no inherited handler method.
fn portable(tree: &Tree, body: NodeId, type_decl: NodeId) -> bool {
    tree.descendants(body).into_iter().all(|id| match tree.data(id) {
        NodeData::This | NodeData::SuperMethodCall { .. } => false,
        NodeData::MethodCall {
            target: None, name, ..
        } => tree
            .ident(*name)
            .is_some_and(|n| declares_method(tree, type_decl, tree.resolve(n))),
        _ => true,
    })
}

fn declares_method(tree: &Tree, type_decl: NodeId, name: &str) -> bool {
    tree.list(type_decl, Property::Members)
        .iter()
        .any(|&m| util::method_name(tree, m) == Some(name))
}

fn declares_type(tree: &Tree, type_decl: NodeId, name: &str) -> bool {
    tree.list(type_decl, Property::Members)
        .iter()
        .any(|&m| matches!(tree.data(m), NodeData::TypeDecl { name: n, .. } if tree.is_ident(*n, name)))
}

/// `mHandler` and `handler` both give `Handler`.
fn capitalized(field: &str) -> String {
    let field = match field.strip_prefix('m') {
        Some(rest) if rest.starts_with(|c: char| c.is_ascii_uppercase()) => rest,
        _ => field,
    };
    let mut chars = field.chars();
    chars
        .next()
        .map(|first| first.to_ascii_uppercase().to_string() + chars.as_str())
        .unwrap_or_default()
}

/// Names chosen for one handler field.
struct Names {
    outer: &'static str,
    class: String,
    method: String,
    param: &'static str,
}

#[derive(Clone, Copy)]
pub struct HandlerLeak;

impl HandlerLeak {
    /// `private void handleXMessage(Message msg) <moved body>`
    fn forward_target(cx: &mut RuleContext<'_, '_>, names: &Names, handle: NodeId) -> Option<StagedId> {
        let tree = cx.tree();
        let NodeData::MethodDecl {
            params,
            body: Some(body),
            ..
        } = tree.data(handle)
        else {
            return None;
        };
        let mut b = cx.builder();
        let params = params.iter().map(|&p| b.copy(p)).collect();
        let void = b.ty("void");
        let body = b.moved(*body);
        Some(b.method(&["private"], Some(void), &names.method, params, body))
    }

    /// The static handler class holding the instance weakly.
    fn nested_handler(cx: &mut RuleContext<'_, '_>, names: &Names, handle: NodeId) -> Option<StagedId> {
        let tree = cx.tree();
        let NodeData::MethodDecl { params, .. } = tree.data(handle) else {
            return None;
        };
        let param = *params.first()?;
        let outer = names.outer;
        let mut b = cx.builder();

        let outer_ty = b.ty(outer);
        let reference_ty = b.generic_ty("WeakReference", vec![outer_ty]);
        let field = b.field(&["private", "final"], reference_ty, REFERENT, None);

        let this = b.this();
        let target = b.field_access(this, REFERENT);
        let outer_ty = b.ty(outer);
        let reference_ty = b.generic_ty("WeakReference", vec![outer_ty]);
        let referent = b.name(REFERENT);
        let reference = b.new_object(reference_ty, vec![referent]);
        let assign = b.assign(target, reference);
        let stored = b.expr_stmt(assign);
        let body = b.block(vec![stored]);
        let outer_ty = b.ty(outer);
        let ctor_param = b.param(outer_ty, REFERENT);
        let constructor = b.method(&[], None, &names.class, vec![ctor_param], body);

        let this = b.this();
        let reference = b.field_access(this, REFERENT);
        let get = b.call(Some(reference), "get", Vec::new());
        let outer_ty = b.ty(outer);
        let local = b.local_var(outer_ty, REFERENT, Some(get));
        let receiver = b.name(REFERENT);
        let message = b.name(names.param);
        let call = b.call(Some(receiver), &names.method, vec![message]);
        let forward = b.expr_stmt(call);
        let then = b.block(vec![forward]);
        let subject = b.name(REFERENT);
        let null = b.null();
        let cond = b.binary(BinaryOp::NotEq, subject, null);
        let guard = b.if_stmt(cond, then, None);
        let body = b.block(vec![local, guard]);
        let handle_param = b.copy(param);
        let void = b.ty("void");
        let handle = b.method(
            &["@Override", "public"],
            Some(void),
            "handleMessage",
            vec![handle_param],
            body,
        );

        let modifiers = vec![b.modifier("private").node(), b.modifier("static").node()];
        let name = b.name(&names.class);
        let superclass = b.ty("Handler");
        Some(b.node(NodeData::TypeDecl {
            modifiers,
            is_interface: false,
            name: name.node(),
            superclass: Some(superclass.node()),
            interfaces: Vec::new(),
            members: vec![field.node(), constructor.node(), handle.node()],
        }))
    }
}

impl Rule for HandlerLeak {
    fn name(&self) -> &'static str {
        "handler-leak"
    }

    fn description(&self) -> &'static str {
        "Turn anonymous Handler fields into static classes holding a weak reference"
    }

    fn interest(&self) -> KindSet {
        KindSet::of(NodeKind::FieldDecl)
    }

    fn applies_to(&self, options: &ProjectOptions) -> bool {
        options.android
    }

    fn visit(&self, node: NodeId, cx: &mut RuleContext<'_, '_>) -> Result<Visit, RuleError> {
        let tree = cx.tree();
        let Some((creation, handle)) = anonymous_handler(tree, node) else {
            return Ok(Visit::Descend);
        };
        let Some(type_decl) = tree.parent(node).filter(|&p| tree.kind(p) == NodeKind::TypeDecl) else {
            return Ok(Visit::Descend);
        };
        let (NodeData::TypeDecl { name: outer, .. }, NodeData::FieldDecl { fragments, .. }) =
            (tree.data(type_decl), tree.data(node))
        else {
            return Ok(Visit::Descend);
        };
        let Some(body) = util::method_body(tree, handle) else {
            return Ok(Visit::Descend);
        };
        if !can_nest_static(tree, type_decl) || !portable(tree, body, type_decl) {
            debug!(?node, "handler body depends on where it is declared; not rewriting");
            return Ok(Visit::Descend);
        }

        let field = fragments
            .first()
            .and_then(|&f| match tree.data(f) {
                NodeData::VarFragment { name, .. } => tree.ident(*name),
                _ => None,
            })
            .map(|n| tree.resolve(n));
        let param = match tree.data(handle) {
            NodeData::MethodDecl { params, .. } => params.first().and_then(|&p| match tree.data(p) {
                NodeData::Param { name, .. } => tree.ident(*name).map(|n| tree.resolve(n)),
                _ => None,
            }),
            _ => None,
        };
        let (Some(field), Some(param), Some(outer)) =
            (field, param, tree.ident(*outer).map(|n| tree.resolve(n)))
        else {
            return Ok(Visit::Descend);
        };
        let mut class = format!("{outer}{}", capitalized(field));
        if !class.ends_with("Handler") {
            class.push_str("Handler");
        }
        let names = Names {
            outer,
            method: format!("handle{}Message", capitalized(field)),
            class,
            param,
        };
        if param == REFERENT
            || declares_type(tree, type_decl, &names.class)
            || declares_method(tree, type_decl, &names.method)
            || util::import_clashes(tree, WEAK_REFERENCE)
        {
            debug!(?node, class = %names.class, "handler names taken; not rewriting");
            return Ok(Visit::Descend);
        }
        if [node, creation, handle].into_iter().any(|n| cx.is_claimed(n)) {
            return Ok(Visit::Descend);
        }

        let (Some(method), Some(nested)) = (
            Self::forward_target(cx, &names, handle),
            Self::nested_handler(cx, &names, handle),
        ) else {
            return Ok(Visit::Descend);
        };
        let mut b = cx.builder();
        let ty = b.ty(&names.class);
        let this = b.this();
        let created = b.new_object(ty, vec![this]);
        if !cx.replace(creation, created) {
            return Ok(Visit::Descend);
        }
        cx.insert_after(node, method);
        cx.insert_after(node, nested);
        util::add_import(cx, WEAK_REFERENCE);
        Ok(Visit::SkipSubtree)
    }
}

#[cfg(test)]
mod tests;
