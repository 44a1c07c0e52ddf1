//! Tracked bindings and the statement ranges they are analyzed over.

use rfx_ir::{NodeData, NodeId, Property, Tree, VarId, VarKind};

use crate::AnalysisError;

/// A declared variable, identified independently of any occurrence.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct Binding {
    pub var: VarId,
    /// Declaring `VarFragment` or `Param`.
    pub decl: NodeId,
    pub kind: VarKind,
}

impl Binding {
    /// Resolve a name occurrence, a `VarFragment` or a `Param`.
    pub fn resolve(tree: &Tree, node: NodeId) -> Result<Binding, AnalysisError> {
        let bindings = tree.bindings();
        let var = tree
            .var_of(node)
            .or_else(|| bindings.declared_by(node))
            .ok_or(AnalysisError::Unresolved(node))?;
        let info = bindings.var(var).ok_or(AnalysisError::Unresolved(node))?;
        Ok(Binding {
            var,
            decl: info.decl,
            kind: info.kind,
        })
    }

    /// Whether `expr` names this binding, looking through parentheses.
    pub fn is_named_by(&self, tree: &Tree, expr: NodeId) -> bool {
        tree.var_of(expr) == Some(self.var)
    }
}

/// A contiguous range of statements of one block.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct Scope {
    pub block: NodeId,
    /// First statement index analyzed.
    pub start: usize,
    /// One past the last statement index analyzed.
    pub end: usize,
}

impl Scope {
    /// The innermost block holding the binding, from its declaring statement
    /// to the end of the block. Parameters are scoped to the whole body.
    pub fn of(tree: &Tree, binding: &Binding) -> Result<Scope, AnalysisError> {
        let decl = binding.decl;
        match binding.kind {
            VarKind::Field => Err(AnalysisError::NotLocal {
                decl,
                kind: binding.kind,
            }),
            VarKind::Param => {
                let owner = tree.parent(decl).ok_or(AnalysisError::NoScope(decl))?;
                let body = match tree.data(owner) {
                    NodeData::MethodDecl { body, .. } => *body,
                    NodeData::Catch { body, .. } | NodeData::ForEach { body, .. } => Some(*body),
                    _ => None,
                };
                let block = body
                    .filter(|&b| matches!(tree.data(b), NodeData::Block { .. }))
                    .ok_or(AnalysisError::NoScope(decl))?;
                Scope::whole(tree, block)
            }
            VarKind::Local => {
                let stmt = tree.parent(decl).ok_or(AnalysisError::NoScope(decl))?;
                let slot = tree
                    .slot(stmt)
                    .filter(|s| s.property == Property::Statements)
                    .ok_or(AnalysisError::NoScope(decl))?;
                let start = slot.index.map_or(0, |i| i as usize);
                let len = tree.list(slot.parent, Property::Statements).len();
                Scope::range(tree, slot.parent, start, len)
            }
        }
    }

    /// Every statement of `block`.
    pub fn whole(tree: &Tree, block: NodeId) -> Result<Scope, AnalysisError> {
        let len = statements_of(tree, block)?.len();
        Scope::range(tree, block, 0, len)
    }

    /// Statements `start..end` of `block`.
    pub fn range(
        tree: &Tree,
        block: NodeId,
        start: usize,
        end: usize,
    ) -> Result<Scope, AnalysisError> {
        let len = statements_of(tree, block)?.len();
        if start > end || end > len {
            return Err(AnalysisError::BadRange {
                block,
                start,
                end,
                len,
            });
        }
        Ok(Scope { block, start, end })
    }

    /// The statements in range.
    pub fn statements<'t>(&self, tree: &'t Tree) -> &'t [NodeId] {
        let all = tree.list(self.block, Property::Statements);
        all.get(self.start..self.end).unwrap_or_default()
    }

    /// Position of a direct statement within the block.
    pub fn index_of(&self, tree: &Tree, stmt: NodeId) -> Option<usize> {
        tree.slot(stmt)
            .filter(|s| s.parent == self.block && s.property == Property::Statements)
            .and_then(|s| s.index)
            .map(|i| i as usize)
    }

    /// The direct statement of the block that is `node` or contains it.
    pub fn statement_of(&self, tree: &Tree, node: NodeId) -> Option<NodeId> {
        std::iter::once(node)
            .chain(tree.ancestors(node))
            .find(|&n| tree.parent(n) == Some(self.block))
            .filter(|&s| self.index_of(tree, s).is_some())
    }
}

fn statements_of(tree: &Tree, block: NodeId) -> Result<&[NodeId], AnalysisError> {
    if !tree.contains(block) {
        return Err(AnalysisError::NotABlock(block));
    }
    match tree.data(block) {
        NodeData::Block { statements } => Ok(statements),
        _ => Err(AnalysisError::NotABlock(block)),
    }
}

#[cfg(test)]
mod tests;
