//! Resolved bindings: variables, method targets and expression types.
//!
//! The front end fills these side tables after building the tree. Rules
//! consult them to compare identities (is this name the same variable as
//! that one, is this call `Cursor.close()`), never to mutate anything.

use rustc_hash::FxHashMap;

use crate::{Name, NodeId};

/// Identity of a declared variable, distinct from any name occurrence.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub struct VarId(u32);

impl VarId {
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum VarKind {
    Local,
    Param,
    Field,
}

/// Qualified type name, e.g. `android.database.Cursor` or `int`.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct TypeRef(pub Name);

impl TypeRef {
    #[inline]
    pub const fn name(self) -> Name {
        self.0
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VarInfo {
    pub name: Name,
    /// Declaring `VarFragment` or `Param` node.
    pub decl: NodeId,
    pub ty: Option<TypeRef>,
    pub kind: VarKind,
}

/// Resolved target of a method call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MethodRef {
    pub declaring_type: Option<TypeRef>,
    pub name: Name,
    pub param_types: Vec<TypeRef>,
    pub is_static: bool,
}

/// Binding side tables for one tree.
#[derive(Clone, Debug, Default)]
pub struct Bindings {
    vars: Vec<VarInfo>,
    by_decl: FxHashMap<NodeId, VarId>,
    name_refs: FxHashMap<NodeId, VarId>,
    methods: FxHashMap<NodeId, MethodRef>,
    expr_types: FxHashMap<NodeId, TypeRef>,
    superclasses: FxHashMap<NodeId, TypeRef>,
}

impl Bindings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a variable. The declaring node is bound to it as well.
    pub fn declare(&mut self, info: VarInfo) -> VarId {
        let id = VarId(u32::try_from(self.vars.len()).unwrap_or(u32::MAX));
        self.by_decl.insert(info.decl, id);
        self.vars.push(info);
        id
    }

    pub fn var(&self, id: VarId) -> Option<&VarInfo> {
        self.vars.get(id.index())
    }

    pub fn vars(&self) -> impl Iterator<Item = (VarId, &VarInfo)> {
        self.vars
            .iter()
            .enumerate()
            .map(|(i, info)| (VarId(u32::try_from(i).unwrap_or(u32::MAX)), info))
    }

    /// Variable declared by a `VarFragment` or `Param` node.
    pub fn declared_by(&self, decl: NodeId) -> Option<VarId> {
        self.by_decl.get(&decl).copied()
    }

    /// Record that the name occurrence `name` refers to `var`.
    pub fn bind_name(&mut self, name: NodeId, var: VarId) {
        self.name_refs.insert(name, var);
    }

    /// Variable a name occurrence refers to.
    pub fn var_of(&self, name: NodeId) -> Option<VarId> {
        self.name_refs.get(&name).copied()
    }

    /// All name occurrences bound to `var`, in arena order.
    pub fn occurrences(&self, var: VarId) -> Vec<NodeId> {
        let mut refs: Vec<NodeId> = self
            .name_refs
            .iter()
            .filter_map(|(&node, &v)| (v == var).then_some(node))
            .collect();
        refs.sort_unstable();
        refs
    }

    pub fn set_method(&mut self, call: NodeId, method: MethodRef) {
        self.methods.insert(call, method);
    }

    pub fn method(&self, call: NodeId) -> Option<&MethodRef> {
        self.methods.get(&call)
    }

    pub fn set_expr_type(&mut self, expr: NodeId, ty: TypeRef) {
        self.expr_types.insert(expr, ty);
    }

    pub fn expr_type(&self, expr: NodeId) -> Option<TypeRef> {
        self.expr_types.get(&expr).copied()
    }

    pub fn set_superclass(&mut self, type_decl: NodeId, ty: TypeRef) {
        self.superclasses.insert(type_decl, ty);
    }

    pub fn superclass(&self, type_decl: NodeId) -> Option<TypeRef> {
        self.superclasses.get(&type_decl).copied()
    }
}

#[cfg(test)]
mod tests;
