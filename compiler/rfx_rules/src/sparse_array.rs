//! Replace integer-keyed hash maps with Android sparse arrays.
//!
//! A `HashMap<Integer, V>` or `Map<Integer, V>` local variable or private
//! field is rewritten together with the `new HashMap<..>()` values stored
//! into it, so the declared type and every value stay in agreement.
//! Variables that receive any other value, or are used other than through
//! `get`, `put`, `remove`, `size` and `clear`, are left alone.

use tracing::trace;

use rfx_engine::{Rule, RuleContext, RuleError, Visit};
use rfx_ir::{AssignOp, KindSet, NodeData, NodeId, NodeKind, ProjectOptions, Property, Tree};

use crate::util;

const HASH_MAP: &str = "java.util.HashMap";
const MAP: &str = "java.util.Map";

/// Map methods with a sparse array counterpart of the same name.
const SHARED_METHODS: &[&str] = &["get", "put", "remove", "size", "clear"];

/// Replacement class in `android.util`.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
struct Target {
    class: &'static str,
    /// Keeps the value type argument.
    generic: bool,
}

impl Target {
    const fn new(class: &'static str, generic: bool) -> Self {
        Target { class, generic }
    }

    fn qualified(self) -> String {
        format!("android.util.{}", self.class)
    }
}

/// Whether type node `ty` names `qualified`, directly or through an
/// import.
fn names_type(tree: &Tree, ty: NodeId, qualified: &str) -> bool {
    let written = tree.dotted_name(ty);
    if written == qualified {
        return true;
    }
    let Some((package, simple)) = qualified.rsplit_once('.') else {
        return false;
    };
    written == simple && (package == "java.lang" || util::imports(tree, qualified))
}

/// Type arguments of a `HashMap<..>` (or `Map<..>`, when allowed) type.
fn map_args(tree: &Tree, ty: NodeId, interface: bool) -> Option<&[NodeId]> {
    let NodeData::ParameterizedType { base, args } = tree.data(ty) else {
        return None;
    };
    let is_map = names_type(tree, *base, HASH_MAP) || (interface && names_type(tree, *base, MAP));
    is_map.then_some(args.as_slice())
}

fn target_of(tree: &Tree, args: &[NodeId]) -> Option<Target> {
    let [key, value] = args else {
        return None;
    };
    let boxed = |ty: NodeId, simple: &str| names_type(tree, ty, &format!("java.lang.{simple}"));
    if boxed(*key, "Integer") {
        Some(if boxed(*value, "Integer") {
            Target::new("SparseIntArray", false)
        } else if boxed(*value, "Boolean") {
            Target::new("SparseBooleanArray", false)
        } else if boxed(*value, "Long") {
            Target::new("SparseLongArray", false)
        } else {
            Target::new("SparseArray", true)
        })
    } else if boxed(*key, "Long") {
        Some(Target::new("LongSparseArray", true))
    } else {
        None
    }
}

/// `new HashMap<..>()` without an anonymous body, looking through
/// parentheses.
fn is_map_creation(tree: &Tree, expr: NodeId) -> bool {
    match tree.data(util::unparen(tree, expr)) {
        NodeData::New {
            ty,
            anonymous: None,
            ..
        } => map_args(tree, *ty, false).is_some(),
        _ => false,
    }
}

/// The declared type a created value flows into: a declaration's type or
/// the type of an assigned variable.
fn sink_of(tree: &Tree, creation: NodeId) -> Option<NodeId> {
    let (parent, child) = util::outer(tree, creation)?;
    let declaration_type = |fragment: NodeId| match tree.data(tree.parent(fragment)?) {
        NodeData::LocalVar { ty, .. } | NodeData::FieldDecl { ty, .. } => Some(*ty),
        _ => None,
    };
    match tree.data(parent) {
        NodeData::VarFragment {
            init: Some(init), ..
        } if *init == child => declaration_type(parent),
        NodeData::Assign {
            op: AssignOp::Assign,
            lhs,
            rhs,
        } if *rhs == child => {
            let var = tree.var_of(*lhs)?;
            declaration_type(tree.bindings().var(var)?.decl)
        }
        _ => None,
    }
}

/// Replacement for the declared type of a local variable or private field,
/// when every use of the variables it declares works on the replacement.
fn declared_target(tree: &Tree, ty: NodeId) -> Option<Target> {
    let target = target_of(tree, map_args(tree, ty, true)?)?;
    let slot = tree.slot(ty)?;
    if slot.property != Property::Type {
        return None;
    }
    let fragments = match tree.data(slot.parent) {
        NodeData::LocalVar { fragments, .. } => fragments,
        NodeData::FieldDecl {
            modifiers,
            fragments,
            ..
        } if modifiers.iter().any(|&m| is_private(tree, m)) => fragments,
        _ => return None,
    };
    fragments
        .iter()
        .all(|&fragment| uses_are_compatible(tree, fragment))
        .then_some(target)
}

fn is_private(tree: &Tree, modifier: NodeId) -> bool {
    matches!(tree.data(modifier), NodeData::Modifier { keyword } if tree.resolve(*keyword) == "private")
}

/// Every value stored in the variable is a map creation, and every other
/// use calls a method the sparse arrays have too.
fn uses_are_compatible(tree: &Tree, fragment: NodeId) -> bool {
    let NodeData::VarFragment { init, .. } = tree.data(fragment) else {
        return false;
    };
    if init.is_some_and(|i| !is_map_creation(tree, i)) {
        return false;
    }
    let bindings = tree.bindings();
    let Some(var) = bindings.declared_by(fragment) else {
        return false;
    };
    bindings.occurrences(var).into_iter().all(|name| {
        // `this.m` is used like `m`.
        let name = match tree.slot(name) {
            Some(slot) if slot.property == Property::Name => slot.parent,
            _ => name,
        };
        let Some(slot) = tree.slot(name) else {
            return false;
        };
        match (tree.data(slot.parent), slot.property) {
            (
                NodeData::Assign {
                    op: AssignOp::Assign,
                    rhs,
                    ..
                },
                Property::Lhs,
            ) => is_map_creation(tree, *rhs),
            (NodeData::MethodCall { name, .. }, Property::Target) => tree
                .ident(*name)
                .is_some_and(|n| SHARED_METHODS.contains(&tree.resolve(n))),
            _ => false,
        }
    })
}

#[derive(Clone, Copy)]
pub struct SparseArray;

impl SparseArray {
    /// Replacement for the type node `ty`, if it is convertible where it
    /// stands.
    fn target(tree: &Tree, ty: NodeId) -> Option<Target> {
        let slot = tree.slot(ty)?;
        match (tree.data(slot.parent), slot.property) {
            (NodeData::New { anonymous: None, .. }, Property::Type) => {
                let args = map_args(tree, ty, false)?;
                let declared = declared_target(tree, sink_of(tree, slot.parent)?)?;
                // A diamond takes its arguments from the declaration.
                if args.is_empty() || target_of(tree, args) == Some(declared) {
                    Some(declared)
                } else {
                    None
                }
            }
            (NodeData::LocalVar { .. } | NodeData::FieldDecl { .. }, Property::Type) => {
                declared_target(tree, ty)
            }
            _ => None,
        }
    }
}

impl Rule for SparseArray {
    fn name(&self) -> &'static str {
        "sparse-array"
    }

    fn description(&self) -> &'static str {
        "Replace HashMap with integer keys by SparseArray and its variants"
    }

    fn interest(&self) -> KindSet {
        KindSet::of(NodeKind::ParameterizedType)
    }

    fn applies_to(&self, options: &ProjectOptions) -> bool {
        options.android
    }

    fn visit(&self, node: NodeId, cx: &mut RuleContext<'_, '_>) -> Result<Visit, RuleError> {
        let tree = cx.tree();
        let Some(target) = Self::target(tree, node) else {
            return Ok(Visit::Descend);
        };
        let qualified = target.qualified();
        if util::import_clashes(tree, &qualified) {
            trace!(?node, %qualified, "simple name taken by another import");
            return Ok(Visit::Descend);
        }
        let NodeData::ParameterizedType { args, .. } = tree.data(node) else {
            return Ok(Visit::Descend);
        };

        let mut b = cx.builder();
        let with = match (target.generic, args.as_slice()) {
            (true, [_, value]) => {
                let value = b.copy(*value);
                b.generic_ty(target.class, vec![value])
            }
            (true, _) => b.generic_ty(target.class, Vec::new()),
            (false, _) => b.ty(target.class),
        };
        if cx.replace(node, with) {
            util::add_import(cx, &qualified);
        }
        Ok(Visit::SkipSubtree)
    }
}

#[cfg(test)]
mod tests;
