//! Release recyclable resources once they are no longer used.
//!
//! A resource is tracked when the value of an acquiring call is stored in
//! a local variable. The lifecycle of that variable decides where the
//! release goes: after the statement holding the last read of each
//! assignment, and before every exit reached while the value is still
//! live. Values that escape through a `return` or `throw` are handed off
//! and left alone.

use tracing::{debug, trace};

use rfx_engine::{Rule, RuleContext, RuleError, Visit};
use rfx_flow::{release_placements, Epoch, LifecycleRecord, Placement};
use rfx_ir::{AssignOp, KindSet, NodeData, NodeId, NodeKind, ProjectOptions, Property, Tree};

use crate::util;

/// Methods returning a resource that must be released with `release`.
struct Acquisition {
    declaring: &'static str,
    methods: &'static [&'static str],
    release: &'static str,
}

const ACQUISITIONS: &[Acquisition] = &[
    Acquisition {
        declaring: "android.database.sqlite.SQLiteDatabase",
        methods: &["query", "rawQuery"],
        release: "close",
    },
    Acquisition {
        declaring: "android.content.ContentProvider",
        methods: &["query"],
        release: "close",
    },
    Acquisition {
        declaring: "android.content.ContentResolver",
        methods: &["query"],
        release: "close",
    },
    Acquisition {
        declaring: "android.content.ContentProviderClient",
        methods: &["query"],
        release: "close",
    },
    Acquisition {
        declaring: "android.content.Context",
        methods: &["obtainStyledAttributes"],
        release: "recycle",
    },
    Acquisition {
        declaring: "android.content.res.Resources",
        methods: &["obtainAttributes"],
        release: "recycle",
    },
    Acquisition {
        declaring: "android.content.res.Resources.Theme",
        methods: &["obtainStyledAttributes"],
        release: "recycle",
    },
    Acquisition {
        declaring: "android.view.VelocityTracker",
        methods: &["obtain"],
        release: "recycle",
    },
];

/// Release method for the resource `call` acquires, if it acquires one.
fn release_of(tree: &Tree, call: NodeId) -> Option<&'static str> {
    ACQUISITIONS
        .iter()
        .find(|a| {
            a.methods
                .iter()
                .any(|m| util::is_method(tree, call, a.declaring, m))
        })
        .map(|a| a.release)
}

/// The variable occurrence or declarator receiving the value of `call`,
/// and the assignment that starts its epoch.
fn stored_in(tree: &Tree, call: NodeId) -> Option<(NodeId, NodeId)> {
    let (parent, child) = util::outer(tree, call)?;
    match tree.data(parent) {
        NodeData::VarFragment {
            init: Some(init), ..
        } if *init == child => Some((parent, parent)),
        NodeData::Assign {
            op: AssignOp::Assign,
            lhs,
            rhs,
        } if *rhs == child && tree.var_of(*lhs).is_some() => Some((*lhs, parent)),
        _ => None,
    }
}

/// Whether `read` is the receiver of a `release()` call.
fn releases(tree: &Tree, read: NodeId, release: &str) -> bool {
    let Some(slot) = tree.slot(read) else {
        return false;
    };
    slot.property == Property::Target
        && matches!(
            tree.data(slot.parent),
            NodeData::MethodCall { name, args, .. } if args.is_empty() && tree.is_ident(*name, release)
        )
}

/// Whether `epoch` is ended by an assignment inside a branch or loop of
/// its statement, so on other paths the value stays in use.
fn reassigned_conditionally(tree: &Tree, record: &LifecycleRecord, epoch: &Epoch) -> bool {
    let Some(end) = epoch.ended_by else {
        return false;
    };
    let next = record
        .epochs
        .iter()
        .skip_while(|e| e.assignment != epoch.assignment)
        .nth(1);
    next.is_some_and(|next| tree.parent(next.assignment) != Some(end))
}

#[derive(Clone, Copy)]
pub struct Recycle;

impl Rule for Recycle {
    fn name(&self) -> &'static str {
        "recycle"
    }

    fn description(&self) -> &'static str {
        "Release cursors, typed arrays and velocity trackers after their last use"
    }

    fn interest(&self) -> KindSet {
        KindSet::of(NodeKind::MethodCall)
    }

    fn applies_to(&self, options: &ProjectOptions) -> bool {
        options.android
    }

    fn visit(&self, node: NodeId, cx: &mut RuleContext<'_, '_>) -> Result<Visit, RuleError> {
        let tree = cx.tree();
        let Some(release) = release_of(tree, node) else {
            return Ok(Visit::Descend);
        };
        let Some((holder, assignment)) = stored_in(tree, node) else {
            trace!(?node, "resource not stored in a variable");
            return Ok(Visit::Descend);
        };
        let record = match cx.lifecycle(holder) {
            Ok(record) => record,
            Err(error) => {
                debug!(?node, %error, "not tracking resource");
                return Ok(Visit::Descend);
            }
        };
        let Some(epoch) = record.epoch_of(assignment) else {
            return Ok(Visit::Descend);
        };
        if reassigned_conditionally(tree, &record, epoch) {
            debug!(?node, "value may outlive a nested reassignment; not releasing");
            return Ok(Visit::Descend);
        }
        let Some(var) = tree.bindings().var(record.binding.var) else {
            return Ok(Visit::Descend);
        };
        let name = tree.resolve(var.name);
        let released = epoch.find_read(|&read| releases(tree, read, release));

        for placement in release_placements(tree, epoch, released) {
            let mut b = cx.builder();
            let receiver = b.name(name);
            let call = b.call(Some(receiver), release, Vec::new());
            let stmt = b.expr_stmt(call);
            match placement {
                Placement::After(anchor) => {
                    cx.insert_after(anchor, stmt);
                }
                Placement::Before(exit) if tree.slot(exit).is_some_and(|s| s.is_list_member()) => {
                    cx.insert_before(exit, stmt);
                }
                // `if (x) return;` becomes `if (x) { c.close(); return; }`.
                Placement::Before(exit) => {
                    if cx.is_claimed(exit) {
                        debug!(?exit, "exit already rewritten this pass");
                        continue;
                    }
                    let mut b = cx.builder();
                    let moved = b.moved(exit);
                    let block = b.block(vec![stmt, moved]);
                    cx.replace(exit, block);
                }
            }
        }
        Ok(Visit::Descend)
    }
}

#[cfg(test)]
mod tests;
