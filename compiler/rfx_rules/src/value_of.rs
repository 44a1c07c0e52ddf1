//! Prefer boxing factories and parse methods over box constructors.
//!
//! - `new Integer(x)` becomes `Integer.valueOf(x)`, which may reuse cached
//!   instances. `new Float(d)` with a `double` argument narrows explicitly.
//! - `Integer.valueOf(s)` stored into a primitive becomes
//!   `Integer.parseInt(s)`, and `Integer.valueOf(i)` becomes `i`.
//! - `new Integer(s).intValue()` becomes `Integer.parseInt(s)`.
//! - `Boolean.TRUE` stored into a `boolean` becomes `true`.

use tracing::trace;

use rfx_engine::{Rule, RuleContext, RuleError, Visit};
use rfx_ir::{KindSet, LitKind, NodeData, NodeId, NodeKind, Tree};
use rfx_parse::{is_primitive, unboxed};

use crate::util;

/// Box type and the method parsing its primitive from a string.
const PARSERS: &[(&str, &str)] = &[
    ("java.lang.Integer", "parseInt"),
    ("java.lang.Long", "parseLong"),
    ("java.lang.Short", "parseShort"),
    ("java.lang.Byte", "parseByte"),
    ("java.lang.Float", "parseFloat"),
    ("java.lang.Double", "parseDouble"),
    ("java.lang.Boolean", "parseBoolean"),
];

const STRING: &str = "java.lang.String";

fn parser_of(boxed: &str) -> Option<&'static str> {
    PARSERS
        .iter()
        .find(|(b, _)| *b == boxed)
        .map(|(_, parser)| *parser)
}

/// Whether `expr` must be parenthesized to be the operand of a cast.
fn loose(tree: &Tree, expr: NodeId) -> bool {
    matches!(
        tree.data(expr),
        NodeData::Binary { .. }
            | NodeData::Conditional { .. }
            | NodeData::Assign { .. }
            | NodeData::InstanceOf { .. }
    )
}

#[derive(Clone, Copy)]
pub struct UseValueOf;

impl UseValueOf {
    /// `new Integer(x)`.
    fn constructor(node: NodeId, cx: &mut RuleContext<'_, '_>) -> Visit {
        let tree = cx.tree();
        let NodeData::New {
            ty,
            args,
            anonymous: None,
        } = tree.data(node)
        else {
            return Visit::Descend;
        };
        let [arg] = args.as_slice() else {
            return Visit::Descend;
        };
        let Some(created) = util::type_of(tree, node).filter(|t| unboxed(t).is_some()) else {
            return Visit::Descend;
        };
        let narrow = created == "java.lang.Float" && util::type_of(tree, *arg) == Some("double");
        let written = tree.dotted_name(*ty);

        let mut b = cx.builder();
        let mut value = b.copy(*arg);
        if narrow {
            if loose(tree, *arg) {
                value = b.paren(value);
            }
            let float = b.ty("float");
            value = b.cast(float, value);
        }
        let target = b.qualified(&written);
        let call = b.call(Some(target), "valueOf", vec![value]);
        cx.replace(node, call);
        Visit::SkipSubtree
    }

    /// `Integer.valueOf(..)` stored into a primitive, and `xValue()` on a
    /// freshly boxed string.
    fn call(node: NodeId, cx: &mut RuleContext<'_, '_>) -> Visit {
        let tree = cx.tree();
        let NodeData::MethodCall {
            target: Some(target),
            name,
            args,
        } = tree.data(node)
        else {
            return Visit::Descend;
        };
        let Some(method) = tree.ident(*name).map(|n| tree.resolve(n)) else {
            return Visit::Descend;
        };

        if method == "valueOf" {
            let Some(declaring) = tree
                .bindings()
                .method(node)
                .and_then(|m| m.declaring_type)
                .map(|t| tree.resolve(t.name()))
            else {
                return Visit::Descend;
            };
            let Some(primitive) = unboxed(declaring) else {
                return Visit::Descend;
            };
            if !util::stored_type(tree, node).is_some_and(is_primitive) {
                return Visit::Descend;
            }
            let arg_types = util::arg_types(tree, node);
            match arg_types.as_slice() {
                [ty] if *ty == primitive => {
                    let with = cx.builder().copy(args[0]);
                    cx.replace(node, with);
                    return Visit::SkipSubtree;
                }
                [STRING] | [STRING, "int"] => {
                    if let Some(parser) = parser_of(declaring) {
                        let with = cx.builder().name(parser);
                        cx.replace(*name, with);
                    }
                }
                _ => trace!(?node, ?arg_types, "valueOf overload left alone"),
            }
            return Visit::Descend;
        }

        // `new Integer(s).intValue()` or `Integer.valueOf(s).intValue()`
        if !args.is_empty() || !method.ends_with("Value") {
            return Visit::Descend;
        }
        let boxed = util::unparen(tree, *target);
        let Some(declaring) = util::type_of(tree, boxed) else {
            return Visit::Descend;
        };
        let (Some(primitive), Some(parser)) = (unboxed(declaring), parser_of(declaring)) else {
            return Visit::Descend;
        };
        if method.strip_suffix("Value") != Some(primitive) {
            return Visit::Descend;
        }
        let source = match tree.data(boxed) {
            NodeData::New {
                args,
                anonymous: None,
                ..
            } => args.as_slice(),
            NodeData::MethodCall { args, .. } if util::is_method(tree, boxed, declaring, "valueOf") => {
                args.as_slice()
            }
            _ => return Visit::Descend,
        };
        let [string] = source else {
            return Visit::Descend;
        };
        if util::type_of(tree, *string) != Some(STRING) {
            return Visit::Descend;
        }
        let simple = declaring.rsplit('.').next().unwrap_or(declaring);
        let mut b = cx.builder();
        let string = b.copy(*string);
        let owner = b.name(simple);
        let call = b.call(Some(owner), parser, vec![string]);
        cx.replace(node, call);
        Visit::SkipSubtree
    }

    /// `Boolean.TRUE` and `Boolean.FALSE` stored into a `boolean`.
    fn constant(node: NodeId, cx: &mut RuleContext<'_, '_>) -> Visit {
        let tree = cx.tree();
        let NodeData::QualifiedName { name, .. } = tree.data(node) else {
            return Visit::Descend;
        };
        if util::type_of(tree, node) != Some("java.lang.Boolean")
            || util::stored_type(tree, node) != Some("boolean")
        {
            return Visit::Descend;
        }
        let value = if tree.is_ident(*name, "TRUE") {
            "true"
        } else if tree.is_ident(*name, "FALSE") {
            "false"
        } else {
            return Visit::Descend;
        };
        let with = cx.builder().literal(LitKind::Bool, value);
        cx.replace(node, with);
        Visit::SkipSubtree
    }
}

impl Rule for UseValueOf {
    fn name(&self) -> &'static str {
        "use-value-of"
    }

    fn description(&self) -> &'static str {
        "Use valueOf() and parseX() instead of box constructors and redundant boxing"
    }

    fn interest(&self) -> KindSet {
        KindSet::of(NodeKind::New)
            .with(NodeKind::MethodCall)
            .with(NodeKind::QualifiedName)
    }

    fn visit(&self, node: NodeId, cx: &mut RuleContext<'_, '_>) -> Result<Visit, RuleError> {
        if !cx.options().level.has_boxing_factories() {
            return Ok(Visit::Descend);
        }
        let visit = match cx.tree().kind(node) {
            NodeKind::New => Self::constructor(node, cx),
            NodeKind::MethodCall => Self::call(node, cx),
            NodeKind::QualifiedName => Self::constant(node, cx),
            _ => Visit::Descend,
        };
        Ok(visit)
    }
}
