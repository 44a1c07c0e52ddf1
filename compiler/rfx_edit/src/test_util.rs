//! Shared helpers for unit tests.

use rfx_ir::{NodeId, NodeKind, StringInterner, Tree};

pub(crate) fn parse(source: &str) -> Tree {
    rfx_parse::parse(source, StringInterner::shared()).unwrap()
}

/// First node of `kind` whose source text is exactly `text`.
pub(crate) fn find(tree: &Tree, kind: NodeKind, text: &str) -> NodeId {
    tree.descendants(tree.root())
        .into_iter()
        .find(|&id| tree.kind(id) == kind && tree.text(tree.span(id)) == text)
        .unwrap_or_else(|| panic!("no {kind:?} `{text}`"))
}

/// First node of `kind` in pre-order.
pub(crate) fn first(tree: &Tree, kind: NodeKind) -> NodeId {
    tree.descendants(tree.root())
        .into_iter()
        .find(|&id| tree.kind(id) == kind)
        .unwrap_or_else(|| panic!("no {kind:?}"))
}
