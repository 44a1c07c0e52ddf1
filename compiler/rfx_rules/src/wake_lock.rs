//! Release Android wake locks when an activity pauses.
//!
//! A lock released in `onDestroy` stays held while the activity sits in the
//! background, so the release moves to `onPause`. A lock that is acquired
//! and never released anywhere in its class gets a guarded release in
//! `onPause`. Either way `onPause` is created when the class lacks it.

use tracing::debug;

use rfx_edit::{Destination, StagedId};
use rfx_engine::{Rule, RuleContext, RuleError, Visit};
use rfx_ir::{KindSet, NodeData, NodeId, NodeKind, ProjectOptions, Property, Tree, VarId, VarKind};

use crate::util;

const WAKE_LOCK: &str = "android.os.PowerManager.WakeLock";
const ACTIVITY: &str = "android.app.Activity";

/// The field a lock receiver names, as `wl` or `this.wl`.
fn field_of(tree: &Tree, receiver: NodeId) -> Option<VarId> {
    let receiver = util::unparen(tree, receiver);
    let name = match tree.data(receiver) {
        NodeData::FieldAccess { target, name }
            if matches!(tree.data(*target), NodeData::This) =>
        {
            *name
        }
        _ => receiver,
    };
    let var = tree.var_of(name)?;
    let info = tree.bindings().var(var)?;
    (info.kind == VarKind::Field).then_some(var)
}

fn receiver(tree: &Tree, call: NodeId) -> Option<NodeId> {
    match tree.data(call) {
        NodeData::MethodCall { target, .. } => *target,
        _ => None,
    }
}

/// Fields of `type_decl` that some `acquire()` in it takes a lock through,
/// in order of first acquisition.
fn acquired_fields(tree: &Tree, type_decl: NodeId) -> Vec<VarId> {
    let mut fields = Vec::new();
    for id in tree.descendants(type_decl) {
        if !util::is_method(tree, id, WAKE_LOCK, "acquire") {
            continue;
        }
        if let Some(var) = receiver(tree, id).and_then(|r| field_of(tree, r)) {
            if !fields.contains(&var) {
                fields.push(var);
            }
        }
    }
    fields
}

/// `@Override protected void onPause() { .. }`
fn on_pause(cx: &mut RuleContext<'_, '_>, mut statements: Vec<StagedId>, super_first: bool) -> StagedId {
    let mut b = cx.builder();
    let call = b.super_call("onPause", Vec::new());
    let super_call = b.expr_stmt(call);
    if super_first {
        statements.insert(0, super_call);
    } else {
        statements.push(super_call);
    }
    let body = b.block(statements);
    let void = b.ty("void");
    b.method(&["@Override", "protected"], Some(void), "onPause", Vec::new(), body)
}

#[derive(Clone, Copy)]
pub struct WakeLock;

impl WakeLock {
    /// `wl.release()` directly in `onDestroy` moves to `onPause`.
    fn release(node: NodeId, cx: &mut RuleContext<'_, '_>) -> Visit {
        let tree = cx.tree();
        if receiver(tree, node).and_then(|r| field_of(tree, r)).is_none() {
            return Visit::Descend;
        }
        let Some(stmt) = tree.parent(node).filter(|&p| tree.kind(p) == NodeKind::ExprStmt) else {
            return Visit::Descend;
        };
        let Some(destroy) = tree.enclosing(stmt, NodeKind::MethodDecl) else {
            return Visit::Descend;
        };
        let direct = tree.parent(stmt) == util::method_body(tree, destroy);
        let Some(type_decl) = tree.enclosing(destroy, NodeKind::TypeDecl) else {
            return Visit::Descend;
        };
        if !direct
            || util::method_name(tree, destroy) != Some("onDestroy")
            || !util::extends(tree, type_decl, ACTIVITY)
        {
            return Visit::Descend;
        }

        let pause_body = util::find_method(tree, type_decl, "onPause")
            .and_then(|pause| util::method_body(tree, pause));
        match pause_body {
            Some(body) => {
                let index = tree.list(body, Property::Statements).len();
                let to = Destination::At {
                    parent: body,
                    property: Property::Statements,
                    index,
                };
                cx.move_to(stmt, to);
            }
            None => {
                let moved = cx.builder().moved(stmt);
                let method = on_pause(cx, vec![moved], false);
                cx.insert_before(destroy, method);
            }
        }
        Visit::SkipSubtree
    }

    /// A class that acquires locks and never releases them releases each
    /// one, if held, in `onPause`.
    fn acquire(node: NodeId, cx: &mut RuleContext<'_, '_>) -> Visit {
        let tree = cx.tree();
        let Some(type_decl) = tree.enclosing(node, NodeKind::TypeDecl) else {
            return Visit::Descend;
        };
        let released = tree
            .descendants(type_decl)
            .into_iter()
            .any(|id| util::is_method(tree, id, WAKE_LOCK, "release"));
        if released || !cx.first_time(&format!("wake-lock guards {type_decl:?}")) {
            return Visit::Descend;
        }
        let fields = acquired_fields(tree, type_decl);
        if fields.is_empty() {
            debug!(?node, "lock not held in a field");
            return Visit::Descend;
        }

        let mut guards = Vec::new();
        for var in fields {
            let Some(info) = tree.bindings().var(var) else {
                continue;
            };
            let name = tree.resolve(info.name);
            let mut b = cx.builder();
            let held_on = b.name(name);
            let held = b.call(Some(held_on), "isHeld", Vec::new());
            let release_on = b.name(name);
            let release = b.call(Some(release_on), "release", Vec::new());
            let release = b.expr_stmt(release);
            let then = b.block(vec![release]);
            guards.push(b.if_stmt(held, then, None));
        }

        let pause_body = util::find_method(tree, type_decl, "onPause")
            .and_then(|pause| util::method_body(tree, pause));
        match pause_body {
            Some(body) => {
                let index = tree.list(body, Property::Statements).len();
                for guard in guards {
                    cx.insert_at(body, Property::Statements, index, guard);
                }
            }
            None => {
                let method = on_pause(cx, guards, true);
                let index = tree.list(type_decl, Property::Members).len();
                cx.insert_at(type_decl, Property::Members, index, method);
            }
        }
        Visit::Descend
    }
}

impl Rule for WakeLock {
    fn name(&self) -> &'static str {
        "wake-lock"
    }

    fn description(&self) -> &'static str {
        "Release wake locks in onPause rather than onDestroy, or not at all"
    }

    fn interest(&self) -> KindSet {
        KindSet::of(NodeKind::MethodCall)
    }

    fn applies_to(&self, options: &ProjectOptions) -> bool {
        options.android
    }

    fn visit(&self, node: NodeId, cx: &mut RuleContext<'_, '_>) -> Result<Visit, RuleError> {
        let tree = cx.tree();
        let visit = if util::is_method(tree, node, WAKE_LOCK, "release") {
            Self::release(node, cx)
        } else if util::is_method(tree, node, WAKE_LOCK, "acquire") {
            Self::acquire(node, cx)
        } else {
            Visit::Descend
        };
        Ok(visit)
    }
}
