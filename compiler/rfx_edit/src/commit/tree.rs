//! Structural commit: a new tree with the plan applied.

use rustc_hash::FxHashMap;

use rfx_ir::{ensure_sufficient_stack, ChildMut, NodeData, NodeId, PlaceholderMode, Span, Tree};

use crate::op::StagedId;
use crate::plan::{Disposition, Insertion, Payload, Plan};
use crate::script::EditScript;

pub(crate) fn apply(script: &EditScript<'_>, plan: &Plan) -> Tree {
    let original = script.tree();
    let mut out = original.clone();

    let mut placed: FxHashMap<StagedId, NodeId> = FxHashMap::default();
    for proposed in script.ops() {
        if let Some(fragment) = proposed.op.fragment() {
            let id = materialize(script.staging(), fragment.node(), original, &mut out);
            placed.insert(fragment, id);
        }
    }
    let resolve = |payload: Payload| match payload {
        Payload::Fragment(fragment) => placed.get(&fragment).copied(),
        Payload::Original(node) => Some(node),
    };
    let extend = |list: &mut Vec<NodeId>, insertions: Option<&Vec<Insertion>>| {
        for insertion in insertions.into_iter().flatten() {
            list.extend(resolve(insertion.payload));
        }
    };

    for (parent, property) in plan.touched_lists(original) {
        let old = original.list(parent, property);
        let positional = plan.at.get(&(parent, property)).map_or(&[][..], Vec::as_slice);
        let push_at = |list: &mut Vec<NodeId>, index: usize| {
            for (i, insertion) in positional {
                if *i == index {
                    list.extend(resolve(insertion.payload));
                }
            }
        };

        let mut list = Vec::with_capacity(old.len());
        for (i, &member) in old.iter().enumerate() {
            push_at(&mut list, i);
            extend(&mut list, plan.before.get(&member));
            match plan.disposition.get(&member) {
                Some(Disposition::Replaced(with)) => list.extend(placed.get(with).copied()),
                Some(Disposition::Removed | Disposition::MovedAway) => {}
                None => list.push(member),
            }
            extend(&mut list, plan.after.get(&member));
        }
        push_at(&mut list, old.len());

        if let Some(ChildMut::List(ids)) = out.node_mut(parent).data.child_mut(property) {
            *ids = list;
        }
    }

    for (&node, disposition) in &plan.disposition {
        let Some(slot) = original.slot(node) else {
            if let Disposition::Replaced(with) = disposition {
                if let Some(&root) = placed.get(with) {
                    out.set_root(root);
                }
            }
            continue;
        };
        if slot.is_list_member() {
            continue;
        }
        let replacement = match disposition {
            Disposition::Replaced(with) => placed.get(with).copied(),
            Disposition::Removed | Disposition::MovedAway => None,
        };
        match out.node_mut(slot.parent).data.child_mut(slot.property) {
            Some(ChildMut::Single(id)) => {
                // Vacating a required slot is only valid under an edited
                // ancestor, where the slot no longer matters.
                if let Some(replacement) = replacement {
                    *id = replacement;
                }
            }
            Some(ChildMut::Optional(child)) => *child = replacement,
            Some(ChildMut::List(_)) | None => {}
        }
    }

    out.relink();
    out
}

/// Copy a staged subtree into `out`, resolving placeholders against the
/// original tree.
fn materialize(staging: &Tree, id: NodeId, original: &Tree, out: &mut Tree) -> NodeId {
    ensure_sufficient_stack(|| match staging.data(id) {
        NodeData::Placeholder {
            original: source,
            mode: PlaceholderMode::Copy,
        } => out.copy_subtree(original, *source),
        NodeData::Placeholder {
            original: source,
            mode: PlaceholderMode::Move,
        } => *source,
        data => {
            let mut data = data.clone();
            data.map_children(|child| materialize(staging, child, original, out));
            out.alloc(data, Span::DUMMY)
        }
    })
}
