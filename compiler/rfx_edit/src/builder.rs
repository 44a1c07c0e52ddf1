//! Staging of new nodes.
//!
//! New nodes are allocated bottom-up in the script's staging arena. A
//! fragment may point back at original nodes only through placeholders made
//! by [`NodeBuilder::copy`] and [`NodeBuilder::moved`].

use rfx_ir::{
    AssignOp, BinaryOp, LitKind, NodeData, NodeId, PlaceholderMode, PrefixOp, Span, Tree,
};

use crate::op::StagedId;

const PRIMITIVES: &[&str] = &[
    "boolean", "byte", "char", "short", "int", "long", "float", "double", "void",
];

/// Allocates staged nodes. Obtained from [`EditScript::builder`](crate::EditScript::builder).
pub struct NodeBuilder<'s> {
    staging: &'s mut Tree,
}

impl<'s> NodeBuilder<'s> {
    pub(crate) fn new(staging: &'s mut Tree) -> Self {
        NodeBuilder { staging }
    }

    /// Allocate any node whose children are staged ids.
    pub fn node(&mut self, data: NodeData) -> StagedId {
        StagedId(self.staging.alloc(data, Span::DUMMY))
    }

    /// Detached clone of an original subtree; the original stays put.
    pub fn copy(&mut self, original: NodeId) -> StagedId {
        self.node(NodeData::Placeholder {
            original,
            mode: PlaceholderMode::Copy,
        })
    }

    /// The original subtree itself, vacated from its old location on commit.
    pub fn moved(&mut self, original: NodeId) -> StagedId {
        self.node(NodeData::Placeholder {
            original,
            mode: PlaceholderMode::Move,
        })
    }

    pub fn name(&mut self, ident: &str) -> StagedId {
        let ident = self.staging.intern(ident);
        self.node(NodeData::SimpleName { ident })
    }

    /// `a.b.c` as nested qualified names; a single segment stays simple.
    pub fn qualified(&mut self, dotted: &str) -> StagedId {
        let mut segments = dotted.split('.');
        let mut name = self.name(segments.next().unwrap_or_default());
        for segment in segments {
            let last = self.name(segment);
            name = self.node(NodeData::QualifiedName {
                qualifier: name.0,
                name: last.0,
            });
        }
        name
    }

    /// Type reference from its written form: `int`, `Paint`, `float[]`.
    pub fn ty(&mut self, written: &str) -> StagedId {
        if let Some(elem) = written.strip_suffix("[]") {
            let elem = self.ty(elem);
            return self.node(NodeData::ArrayType { elem: elem.0 });
        }
        if PRIMITIVES.contains(&written) {
            let keyword = self.staging.intern(written);
            return self.node(NodeData::PrimitiveType { keyword });
        }
        let name = self.qualified(written);
        self.node(NodeData::SimpleType { name: name.0 })
    }

    /// `Base<Args>`.
    pub fn generic_ty(&mut self, base: &str, args: Vec<StagedId>) -> StagedId {
        let base = self.ty(base);
        self.node(NodeData::ParameterizedType {
            base: base.0,
            args: ids(args),
        })
    }

    pub fn literal(&mut self, kind: LitKind, text: &str) -> StagedId {
        let text = self.staging.intern(text);
        self.node(NodeData::Literal { kind, text })
    }

    pub fn null(&mut self) -> StagedId {
        self.literal(LitKind::Null, "null")
    }

    pub fn int(&mut self, value: i64) -> StagedId {
        self.literal(LitKind::Int, &value.to_string())
    }

    pub fn this(&mut self) -> StagedId {
        self.node(NodeData::This)
    }

    pub fn call(&mut self, target: Option<StagedId>, name: &str, args: Vec<StagedId>) -> StagedId {
        let name = self.name(name);
        self.node(NodeData::MethodCall {
            target: target.map(|t| t.0),
            name: name.0,
            args: ids(args),
        })
    }

    /// `target.name`.
    pub fn field_access(&mut self, target: StagedId, name: &str) -> StagedId {
        let name = self.name(name);
        self.node(NodeData::FieldAccess {
            target: target.0,
            name: name.0,
        })
    }

    pub fn super_call(&mut self, name: &str, args: Vec<StagedId>) -> StagedId {
        let name = self.name(name);
        self.node(NodeData::SuperMethodCall {
            name: name.0,
            args: ids(args),
        })
    }

    pub fn new_object(&mut self, ty: StagedId, args: Vec<StagedId>) -> StagedId {
        self.node(NodeData::New {
            ty: ty.0,
            args: ids(args),
            anonymous: None,
        })
    }

    pub fn assign(&mut self, lhs: StagedId, rhs: StagedId) -> StagedId {
        self.node(NodeData::Assign {
            op: AssignOp::Assign,
            lhs: lhs.0,
            rhs: rhs.0,
        })
    }

    pub fn binary(&mut self, op: BinaryOp, lhs: StagedId, rhs: StagedId) -> StagedId {
        self.node(NodeData::Binary {
            op,
            lhs: lhs.0,
            rhs: rhs.0,
        })
    }

    pub fn not(&mut self, operand: StagedId) -> StagedId {
        self.node(NodeData::Prefix {
            op: PrefixOp::Not,
            operand: operand.0,
        })
    }

    pub fn cast(&mut self, ty: StagedId, expr: StagedId) -> StagedId {
        self.node(NodeData::Cast {
            ty: ty.0,
            expr: expr.0,
        })
    }

    pub fn paren(&mut self, expr: StagedId) -> StagedId {
        self.node(NodeData::Paren { expr: expr.0 })
    }

    pub fn expr_stmt(&mut self, expr: StagedId) -> StagedId {
        self.node(NodeData::ExprStmt { expr: expr.0 })
    }

    pub fn block(&mut self, statements: Vec<StagedId>) -> StagedId {
        self.node(NodeData::Block {
            statements: ids(statements),
        })
    }

    pub fn if_stmt(
        &mut self,
        cond: StagedId,
        then_branch: StagedId,
        else_branch: Option<StagedId>,
    ) -> StagedId {
        self.node(NodeData::If {
            cond: cond.0,
            then_branch: then_branch.0,
            else_branch: else_branch.map(|e| e.0),
        })
    }

    pub fn return_stmt(&mut self, value: Option<StagedId>) -> StagedId {
        self.node(NodeData::Return {
            value: value.map(|v| v.0),
        })
    }

    pub fn modifier(&mut self, keyword: &str) -> StagedId {
        let keyword = self.staging.intern(keyword);
        self.node(NodeData::Modifier { keyword })
    }

    pub fn annotation(&mut self, name: &str) -> StagedId {
        let name = self.qualified(name);
        self.node(NodeData::Annotation { name: name.0 })
    }

    fn fragment(&mut self, name: &str, init: Option<StagedId>) -> NodeId {
        let name = self.name(name);
        self.node(NodeData::VarFragment {
            name: name.0,
            init: init.map(|i| i.0),
        })
        .0
    }

    /// `Type name = init;` as a statement.
    pub fn local_var(&mut self, ty: StagedId, name: &str, init: Option<StagedId>) -> StagedId {
        let fragment = self.fragment(name, init);
        self.node(NodeData::LocalVar {
            modifiers: Vec::new(),
            ty: ty.0,
            fragments: vec![fragment],
        })
    }

    /// `modifiers Type name = init;` as a type member.
    pub fn field(
        &mut self,
        modifiers: &[&str],
        ty: StagedId,
        name: &str,
        init: Option<StagedId>,
    ) -> StagedId {
        let modifiers = modifiers.iter().map(|m| self.modifier(m).0).collect();
        let fragment = self.fragment(name, init);
        self.node(NodeData::FieldDecl {
            modifiers,
            ty: ty.0,
            fragments: vec![fragment],
        })
    }

    pub fn param(&mut self, ty: StagedId, name: &str) -> StagedId {
        let name = self.name(name);
        self.node(NodeData::Param {
            modifiers: Vec::new(),
            ty: ty.0,
            name: name.0,
        })
    }

    /// Method declaration. `modifiers` may include annotations written as
    /// `@Name`.
    pub fn method(
        &mut self,
        modifiers: &[&str],
        return_type: Option<StagedId>,
        name: &str,
        params: Vec<StagedId>,
        body: StagedId,
    ) -> StagedId {
        let modifiers = modifiers
            .iter()
            .map(|m| match m.strip_prefix('@') {
                Some(annotation) => self.annotation(annotation).0,
                None => self.modifier(m).0,
            })
            .collect();
        let name = self.name(name);
        self.node(NodeData::MethodDecl {
            modifiers,
            return_type: return_type.map(|t| t.0),
            name: name.0,
            params: ids(params),
            throws: Vec::new(),
            body: Some(body.0),
        })
    }

    pub fn import(&mut self, qualified: &str) -> StagedId {
        let name = self.qualified(qualified);
        self.node(NodeData::ImportDecl {
            name: name.0,
            is_static: false,
            on_demand: false,
        })
    }
}

fn ids(staged: Vec<StagedId>) -> Vec<NodeId> {
    staged.into_iter().map(|s| s.0).collect()
}
