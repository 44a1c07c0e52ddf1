//! Where a resource acquired in an epoch must be released.

use rfx_ir::{NodeId, Tree};

use crate::Epoch;

/// Position for a release call.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Placement {
    /// After a direct statement of the scope.
    After(NodeId),
    /// Before an exit statement, which may be nested.
    Before(NodeId),
}

/// Release placements for one epoch.
///
/// `release` is the read through which the epoch's value is already
/// released, if the caller found one. A released epoch needs no trailing
/// release, but non-escaping exits reached before the release still leak
/// and get one each. An unreleased epoch gets one after its anchor
/// statement, plus one before every non-escaping exit up to that point. No
/// trailing release is placed when the anchor is itself an exit, or when it
/// is the statement that reassigns the binding: in both cases the value is
/// handed off.
pub fn release_placements(tree: &Tree, epoch: &Epoch, release: Option<NodeId>) -> Vec<Placement> {
    let mut out = Vec::new();
    let exits = epoch.exits.iter().filter(|e| !e.escapes);

    if let Some(release) = release {
        let released_at = tree.span(release).start;
        out.extend(
            exits
                .filter(|e| tree.span(e.statement).start < released_at)
                .map(|e| Placement::Before(e.statement)),
        );
        return out;
    }

    let Some(anchor) = epoch.anchor() else {
        return out;
    };
    let anchor_end = tree.span(anchor).end;
    // Exits after the anchor are preceded by the trailing release.
    out.extend(
        exits
            .filter(|e| e.statement != anchor && tree.span(e.statement).start < anchor_end)
            .map(|e| Placement::Before(e.statement)),
    );

    let handed_off = tree.kind(anchor).is_exit() || epoch.ended_by == Some(anchor);
    if !handed_off {
        out.push(Placement::After(anchor));
    }
    out
}
