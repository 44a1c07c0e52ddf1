//! Arena syntax tree.
//!
//! Nodes are allocated bottom-up: children first, then the parent, whose
//! allocation records the parent link and [`Slot`] of every child. Parent
//! links are indices, so the arena owns every node and walking upward needs
//! no back-references.

use std::fmt;

use crate::binding::{Bindings, TypeRef, VarId};
use crate::interner::SharedInterner;
use crate::node::{ChildRef, Node, NodeData, NodeKind, Property, Slot};
use crate::{ensure_sufficient_stack, Name, NodeId, Span};

/// A parsed, binding-resolved source unit.
#[derive(Clone)]
pub struct Tree {
    nodes: Vec<Node>,
    root: NodeId,
    source: String,
    interner: SharedInterner,
    bindings: Bindings,
}

impl Tree {
    pub fn new(source: impl Into<String>, interner: SharedInterner) -> Self {
        Tree {
            nodes: Vec::new(),
            root: NodeId::INVALID,
            source: source.into(),
            interner,
            bindings: Bindings::new(),
        }
    }

    /// Allocate a node whose children are already allocated.
    pub fn alloc(&mut self, data: NodeData, span: Span) -> NodeId {
        let id = NodeId::from_index(self.nodes.len());
        let links = child_slots(id, &data);
        self.nodes.push(Node {
            data,
            span,
            parent: None,
            slot: None,
        });
        for (child, slot) in links {
            if let Some(node) = self.nodes.get_mut(child.index()) {
                node.parent = Some(id);
                node.slot = Some(slot);
            }
        }
        id
    }

    pub fn set_root(&mut self, root: NodeId) {
        self.root = root;
        if let Some(node) = self.nodes.get_mut(root.index()) {
            node.parent = None;
            node.slot = None;
        }
    }

    #[inline]
    pub fn root(&self) -> NodeId {
        self.root
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[inline]
    pub fn contains(&self, id: NodeId) -> bool {
        id.is_valid() && id.index() < self.nodes.len()
    }

    pub fn try_node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    /// Node at `id`.
    ///
    /// # Panics
    /// Panics if `id` was not allocated in this tree.
    #[inline]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    /// Mutable access for commit. Callers must [`relink`](Self::relink)
    /// after changing child lists.
    #[inline]
    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.index()]
    }

    #[inline]
    pub fn data(&self, id: NodeId) -> &NodeData {
        &self.node(id).data
    }

    #[inline]
    pub fn kind(&self, id: NodeId) -> NodeKind {
        self.node(id).kind()
    }

    #[inline]
    pub fn span(&self, id: NodeId) -> Span {
        self.node(id).span
    }

    #[inline]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.try_node(id).and_then(|n| n.parent)
    }

    #[inline]
    pub fn slot(&self, id: NodeId) -> Option<Slot> {
        self.try_node(id).and_then(|n| n.slot)
    }

    /// Direct children in source order.
    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        self.data(id).child_ids()
    }

    /// Strict ancestors, nearest first.
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors {
            tree: self,
            next: self.parent(id),
        }
    }

    /// Nearest strict ancestor of the given kind.
    pub fn enclosing(&self, id: NodeId, kind: NodeKind) -> Option<NodeId> {
        self.ancestors(id).find(|&a| self.kind(a) == kind)
    }

    /// Nearest ancestor-or-self that is a statement.
    pub fn enclosing_statement(&self, id: NodeId) -> Option<NodeId> {
        std::iter::once(id)
            .chain(self.ancestors(id))
            .find(|&a| self.kind(a).is_statement())
    }

    /// Whether `id` is reachable from the root through parent links.
    pub fn is_attached(&self, id: NodeId) -> bool {
        if !self.contains(id) {
            return false;
        }
        id == self.root || self.ancestors(id).last() == Some(self.root)
    }

    /// Whether `ancestor` is a strict ancestor of `id`.
    pub fn is_ancestor_of(&self, ancestor: NodeId, id: NodeId) -> bool {
        self.ancestors(id).any(|a| a == ancestor)
    }

    /// Pre-order listing of the subtree rooted at `id`, `id` first.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            out.push(next);
            let children = self.children(next);
            stack.extend(children.into_iter().rev());
        }
        out
    }

    /// Deep-copy the subtree rooted at `id` in `from` into this arena.
    /// Copies keep their original spans; the copy's root is detached.
    pub fn copy_subtree(&mut self, from: &Tree, id: NodeId) -> NodeId {
        ensure_sufficient_stack(|| {
            let source = from.node(id);
            let mut data = source.data.clone();
            data.map_children(|child| self.copy_subtree(from, child));
            self.alloc(data, source.span)
        })
    }

    /// Members of the list property `property` of `parent`.
    pub fn list(&self, parent: NodeId, property: Property) -> &[NodeId] {
        match self.data(parent).child(property) {
            Some(ChildRef::List(ids)) => ids,
            _ => &[],
        }
    }

    /// Recompute every parent link and slot from the root down. Nodes no
    /// longer reachable from the root become detached.
    pub fn relink(&mut self) {
        for node in &mut self.nodes {
            node.parent = None;
            node.slot = None;
        }
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            let Some(node) = self.nodes.get(id.index()) else {
                continue;
            };
            let links = child_slots(id, &node.data);
            for (child, slot) in links {
                if let Some(child_node) = self.nodes.get_mut(child.index()) {
                    child_node.parent = Some(id);
                    child_node.slot = Some(slot);
                    stack.push(child);
                }
            }
        }
    }

    #[inline]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Source text covered by `span`, empty when out of range.
    pub fn text(&self, span: Span) -> &str {
        self.source.get(span.to_range()).unwrap_or("")
    }

    /// 1-based line number of a byte offset.
    pub fn line_of(&self, offset: u32) -> u32 {
        let end = (offset as usize).min(self.source.len());
        let newlines = self.source.as_bytes()[..end]
            .iter()
            .filter(|&&b| b == b'\n')
            .count();
        u32::try_from(newlines).unwrap_or(u32::MAX).saturating_add(1)
    }

    #[inline]
    pub fn interner(&self) -> &SharedInterner {
        &self.interner
    }

    #[inline]
    pub fn intern(&self, s: &str) -> Name {
        self.interner.intern(s)
    }

    #[inline]
    pub fn resolve(&self, name: Name) -> &'static str {
        self.interner.lookup(name)
    }

    #[inline]
    pub fn bindings(&self) -> &Bindings {
        &self.bindings
    }

    #[inline]
    pub fn bindings_mut(&mut self) -> &mut Bindings {
        &mut self.bindings
    }

    /// Identifier of a `SimpleName` node.
    pub fn ident(&self, id: NodeId) -> Option<Name> {
        match self.try_node(id).map(|n| &n.data) {
            Some(NodeData::SimpleName { ident }) => Some(*ident),
            _ => None,
        }
    }

    /// Whether `id` is a `SimpleName` spelling `text`.
    pub fn is_ident(&self, id: NodeId, text: &str) -> bool {
        self.ident(id)
            .is_some_and(|name| self.interner.lookup(name) == text)
    }

    /// Dotted spelling of a simple or qualified name, or of a type node.
    pub fn dotted_name(&self, id: NodeId) -> String {
        match self.try_node(id).map(|n| &n.data) {
            Some(NodeData::SimpleName { ident }) => self.resolve(*ident).to_owned(),
            Some(NodeData::QualifiedName { qualifier, name }) => {
                format!("{}.{}", self.dotted_name(*qualifier), self.dotted_name(*name))
            }
            Some(
                NodeData::SimpleType { name } | NodeData::ParameterizedType { base: name, .. },
            ) => self.dotted_name(*name),
            Some(NodeData::PrimitiveType { keyword }) => self.resolve(*keyword).to_owned(),
            Some(NodeData::ArrayType { elem }) => format!("{}[]", self.dotted_name(*elem)),
            _ => String::new(),
        }
    }

    /// Variable referenced by a name expression, looking through parentheses.
    pub fn var_of(&self, expr: NodeId) -> Option<VarId> {
        match self.try_node(expr).map(|n| &n.data) {
            Some(NodeData::Paren { expr }) => self.var_of(*expr),
            Some(_) => self.bindings.var_of(expr),
            None => None,
        }
    }

    /// Whether a resolved type spells `qualified`.
    pub fn type_is(&self, ty: Option<TypeRef>, qualified: &str) -> bool {
        ty.is_some_and(|t| self.resolve(t.name()) == qualified)
    }
}

impl fmt::Debug for Tree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tree")
            .field("nodes", &self.nodes.len())
            .field("root", &self.root)
            .finish_non_exhaustive()
    }
}

/// Iterator over strict ancestors.
pub struct Ancestors<'a> {
    tree: &'a Tree,
    next: Option<NodeId>,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.tree.parent(current);
        Some(current)
    }
}

fn child_slots(parent: NodeId, data: &NodeData) -> Vec<(NodeId, Slot)> {
    let mut links = Vec::new();
    for (property, child) in data.properties() {
        match child {
            ChildRef::Single(id) | ChildRef::Optional(Some(id)) => links.push((
                id,
                Slot {
                    parent,
                    property,
                    index: None,
                },
            )),
            ChildRef::Optional(None) => {}
            ChildRef::List(ids) => {
                for (i, &id) in ids.iter().enumerate() {
                    links.push((
                        id,
                        Slot {
                            parent,
                            property,
                            index: Some(u32::try_from(i).unwrap_or(u32::MAX)),
                        },
                    ));
                }
            }
        }
    }
    links
}
