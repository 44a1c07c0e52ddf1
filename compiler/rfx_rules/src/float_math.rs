//! Replace deprecated `android.util.FloatMath` calls with `java.lang.Math`.
//!
//! `FloatMath.sqrt(x)` becomes `(float) Math.sqrt(x)`. Once every use of
//! `FloatMath` in the unit is rewritten, its import goes too.

use rfx_engine::{Rule, RuleContext, RuleError, Visit};
use rfx_ir::{KindSet, NodeData, NodeId, NodeKind, ProjectOptions, Property, Tree};

use crate::util;

const FLOAT_MATH: &str = "android.util.FloatMath";

/// `FloatMath` methods that `Math` has too.
const METHODS: &[&str] = &["ceil", "cos", "exp", "floor", "hypot", "pow", "sin", "sqrt"];

fn convertible(tree: &Tree, call: NodeId) -> Option<&'static str> {
    METHODS
        .iter()
        .copied()
        .find(|m| util::is_method(tree, call, FLOAT_MATH, m))
}

/// Whether every mention of `FloatMath` outside imports is a call this
/// pass rewrites. Calls nested in another such call are only reached by
/// the next pass, which still needs the import.
fn only_convertible_uses(tree: &Tree) -> bool {
    tree.descendants(tree.root()).into_iter().all(|id| {
        if !tree.is_ident(id, "FloatMath") || tree.enclosing(id, NodeKind::ImportDecl).is_some() {
            return true;
        }
        tree.slot(id).is_some_and(|slot| {
            slot.property == Property::Target
                && convertible(tree, slot.parent).is_some()
                && tree
                    .ancestors(slot.parent)
                    .all(|a| convertible(tree, a).is_none())
        })
    })
}

#[derive(Clone, Copy)]
pub struct FloatMath;

impl FloatMath {
    fn call(node: NodeId, cx: &mut RuleContext<'_, '_>) -> Visit {
        let tree = cx.tree();
        let Some(method) = convertible(tree, node) else {
            return Visit::Descend;
        };
        let NodeData::MethodCall { args, .. } = tree.data(node) else {
            return Visit::Descend;
        };
        let mut b = cx.builder();
        let args: Vec<_> = args.iter().map(|&a| b.copy(a)).collect();
        let math = b.name("Math");
        let call = b.call(Some(math), method, args);
        let float = b.ty("float");
        let mut with = b.cast(float, call);
        if util::binds_tighter_than_cast(tree, node) {
            with = b.paren(with);
        }
        cx.replace(node, with);
        Visit::SkipSubtree
    }

    fn import(node: NodeId, cx: &mut RuleContext<'_, '_>) -> Visit {
        let tree = cx.tree();
        if let NodeData::ImportDecl {
            name,
            is_static: false,
            on_demand: false,
        } = tree.data(node)
        {
            if tree.dotted_name(*name) == FLOAT_MATH && only_convertible_uses(tree) {
                cx.remove(node);
            }
        }
        Visit::Descend
    }
}

impl Rule for FloatMath {
    fn name(&self) -> &'static str {
        "float-math"
    }

    fn description(&self) -> &'static str {
        "Replace deprecated FloatMath calls with Math calls cast to float"
    }

    fn interest(&self) -> KindSet {
        KindSet::of(NodeKind::MethodCall).with(NodeKind::ImportDecl)
    }

    fn applies_to(&self, options: &ProjectOptions) -> bool {
        options.android
    }

    fn visit(&self, node: NodeId, cx: &mut RuleContext<'_, '_>) -> Result<Visit, RuleError> {
        let visit = match cx.tree().kind(node) {
            NodeKind::MethodCall => Self::call(node, cx),
            NodeKind::ImportDecl => Self::import(node, cx),
            _ => Visit::Descend,
        };
        Ok(visit)
    }
}
