//! Syntax node variants, child properties and structural slots.
//!
//! A node's children are addressed by [`Property`]. Each property is either a
//! single child, an optional child or an ordered list, and every variant
//! lists its properties in source order through [`NodeData::properties`].
//! That single table is what the tree walk, the edit script and the
//! renderer use to reach children generically.

use bitflags::bitflags;

use crate::ops::{AssignOp, BinaryOp, LitKind, PostfixOp, PrefixOp};
use crate::{Name, NodeId, Span};

/// Named child position of a node.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub enum Property {
    Package,
    Imports,
    Types,
    Modifiers,
    Name,
    Superclass,
    Interfaces,
    Members,
    ReturnType,
    Params,
    Throws,
    Body,
    Type,
    Fragments,
    Initializer,
    Statements,
    Expression,
    Condition,
    Then,
    Else,
    Init,
    Update,
    Param,
    Iterable,
    Value,
    Label,
    Catches,
    Finally,
    Qualifier,
    Target,
    Arguments,
    Anonymous,
    Dimensions,
    Elements,
    Lhs,
    Rhs,
    Operand,
    Array,
    Index,
    TypeArguments,
    ElementType,
}

/// Read-only view of one child property.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ChildRef<'a> {
    Single(NodeId),
    Optional(Option<NodeId>),
    List(&'a [NodeId]),
}

impl<'a> ChildRef<'a> {
    /// Children held by this property, in order.
    pub fn ids(self) -> &'a [NodeId] {
        match self {
            ChildRef::List(ids) => ids,
            ChildRef::Single(_) | ChildRef::Optional(_) => &[],
        }
    }
}

/// Mutable view of one child property, used when committing edits.
#[derive(Debug)]
pub enum ChildMut<'a> {
    Single(&'a mut NodeId),
    Optional(&'a mut Option<NodeId>),
    List(&'a mut Vec<NodeId>),
}

/// How a staged placeholder refers back to an original node.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum PlaceholderMode {
    /// Detached clone of the original subtree; the original stays in place.
    Copy,
    /// The original subtree itself, removed from its old location.
    Move,
}

/// Kind-specific payload of a node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NodeData {
    // Declarations
    CompilationUnit {
        package: Option<NodeId>,
        imports: Vec<NodeId>,
        types: Vec<NodeId>,
    },
    PackageDecl {
        name: NodeId,
    },
    ImportDecl {
        name: NodeId,
        is_static: bool,
        on_demand: bool,
    },
    TypeDecl {
        modifiers: Vec<NodeId>,
        is_interface: bool,
        name: NodeId,
        superclass: Option<NodeId>,
        interfaces: Vec<NodeId>,
        members: Vec<NodeId>,
    },
    MethodDecl {
        modifiers: Vec<NodeId>,
        /// `None` for constructors.
        return_type: Option<NodeId>,
        name: NodeId,
        params: Vec<NodeId>,
        throws: Vec<NodeId>,
        body: Option<NodeId>,
    },
    FieldDecl {
        modifiers: Vec<NodeId>,
        ty: NodeId,
        fragments: Vec<NodeId>,
    },
    Param {
        modifiers: Vec<NodeId>,
        ty: NodeId,
        name: NodeId,
    },
    VarFragment {
        name: NodeId,
        init: Option<NodeId>,
    },
    Modifier {
        keyword: Name,
    },
    Annotation {
        name: NodeId,
    },
    AnonymousClass {
        members: Vec<NodeId>,
    },

    // Statements
    Block {
        statements: Vec<NodeId>,
    },
    LocalVar {
        modifiers: Vec<NodeId>,
        ty: NodeId,
        fragments: Vec<NodeId>,
    },
    ExprStmt {
        expr: NodeId,
    },
    If {
        cond: NodeId,
        then_branch: NodeId,
        else_branch: Option<NodeId>,
    },
    While {
        cond: NodeId,
        body: NodeId,
    },
    DoWhile {
        body: NodeId,
        cond: NodeId,
    },
    For {
        init: Vec<NodeId>,
        cond: Option<NodeId>,
        update: Vec<NodeId>,
        body: NodeId,
    },
    ForEach {
        param: NodeId,
        iterable: NodeId,
        body: NodeId,
    },
    Return {
        value: Option<NodeId>,
    },
    Throw {
        value: NodeId,
    },
    Break {
        label: Option<NodeId>,
    },
    Continue {
        label: Option<NodeId>,
    },
    Try {
        body: NodeId,
        catches: Vec<NodeId>,
        finally: Option<NodeId>,
    },
    Catch {
        param: NodeId,
        body: NodeId,
    },
    Empty,

    // Expressions
    SimpleName {
        ident: Name,
    },
    QualifiedName {
        qualifier: NodeId,
        name: NodeId,
    },
    FieldAccess {
        target: NodeId,
        name: NodeId,
    },
    MethodCall {
        target: Option<NodeId>,
        name: NodeId,
        args: Vec<NodeId>,
    },
    SuperMethodCall {
        name: NodeId,
        args: Vec<NodeId>,
    },
    New {
        ty: NodeId,
        args: Vec<NodeId>,
        anonymous: Option<NodeId>,
    },
    ArrayCreation {
        ty: NodeId,
        dims: Vec<NodeId>,
        init: Option<NodeId>,
    },
    ArrayInit {
        elements: Vec<NodeId>,
    },
    Literal {
        kind: LitKind,
        text: Name,
    },
    Assign {
        op: AssignOp,
        lhs: NodeId,
        rhs: NodeId,
    },
    Binary {
        op: BinaryOp,
        lhs: NodeId,
        rhs: NodeId,
    },
    Prefix {
        op: PrefixOp,
        operand: NodeId,
    },
    Postfix {
        op: PostfixOp,
        operand: NodeId,
    },
    Cast {
        ty: NodeId,
        expr: NodeId,
    },
    Paren {
        expr: NodeId,
    },
    Conditional {
        cond: NodeId,
        then_expr: NodeId,
        else_expr: NodeId,
    },
    This,
    InstanceOf {
        expr: NodeId,
        ty: NodeId,
    },
    ArrayAccess {
        array: NodeId,
        index: NodeId,
    },

    // Type references
    PrimitiveType {
        keyword: Name,
    },
    SimpleType {
        name: NodeId,
    },
    ParameterizedType {
        base: NodeId,
        args: Vec<NodeId>,
    },
    ArrayType {
        elem: NodeId,
    },

    /// Stand-in for an original node inside a staged fragment. Never
    /// produced by the front end.
    Placeholder {
        original: NodeId,
        mode: PlaceholderMode,
    },
}

/// Field-less tag of [`NodeData`], used to index dispatch tables.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
#[repr(u8)]
pub enum NodeKind {
    CompilationUnit,
    PackageDecl,
    ImportDecl,
    TypeDecl,
    MethodDecl,
    FieldDecl,
    Param,
    VarFragment,
    Modifier,
    Annotation,
    AnonymousClass,
    Block,
    LocalVar,
    ExprStmt,
    If,
    While,
    DoWhile,
    For,
    ForEach,
    Return,
    Throw,
    Break,
    Continue,
    Try,
    Catch,
    Empty,
    SimpleName,
    QualifiedName,
    FieldAccess,
    MethodCall,
    SuperMethodCall,
    New,
    ArrayCreation,
    ArrayInit,
    Literal,
    Assign,
    Binary,
    Prefix,
    Postfix,
    Cast,
    Paren,
    Conditional,
    This,
    InstanceOf,
    ArrayAccess,
    PrimitiveType,
    SimpleType,
    ParameterizedType,
    ArrayType,
    Placeholder,
}

impl NodeKind {
    /// Number of kinds; sizes per-kind tables.
    pub const COUNT: usize = NodeKind::Placeholder as usize + 1;

    pub const ALL: [NodeKind; NodeKind::COUNT] = [
        NodeKind::CompilationUnit,
        NodeKind::PackageDecl,
        NodeKind::ImportDecl,
        NodeKind::TypeDecl,
        NodeKind::MethodDecl,
        NodeKind::FieldDecl,
        NodeKind::Param,
        NodeKind::VarFragment,
        NodeKind::Modifier,
        NodeKind::Annotation,
        NodeKind::AnonymousClass,
        NodeKind::Block,
        NodeKind::LocalVar,
        NodeKind::ExprStmt,
        NodeKind::If,
        NodeKind::While,
        NodeKind::DoWhile,
        NodeKind::For,
        NodeKind::ForEach,
        NodeKind::Return,
        NodeKind::Throw,
        NodeKind::Break,
        NodeKind::Continue,
        NodeKind::Try,
        NodeKind::Catch,
        NodeKind::Empty,
        NodeKind::SimpleName,
        NodeKind::QualifiedName,
        NodeKind::FieldAccess,
        NodeKind::MethodCall,
        NodeKind::SuperMethodCall,
        NodeKind::New,
        NodeKind::ArrayCreation,
        NodeKind::ArrayInit,
        NodeKind::Literal,
        NodeKind::Assign,
        NodeKind::Binary,
        NodeKind::Prefix,
        NodeKind::Postfix,
        NodeKind::Cast,
        NodeKind::Paren,
        NodeKind::Conditional,
        NodeKind::This,
        NodeKind::InstanceOf,
        NodeKind::ArrayAccess,
        NodeKind::PrimitiveType,
        NodeKind::SimpleType,
        NodeKind::ParameterizedType,
        NodeKind::ArrayType,
        NodeKind::Placeholder,
    ];

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn is_statement(self) -> bool {
        matches!(
            self,
            NodeKind::Block
                | NodeKind::LocalVar
                | NodeKind::ExprStmt
                | NodeKind::If
                | NodeKind::While
                | NodeKind::DoWhile
                | NodeKind::For
                | NodeKind::ForEach
                | NodeKind::Return
                | NodeKind::Throw
                | NodeKind::Break
                | NodeKind::Continue
                | NodeKind::Try
                | NodeKind::Empty
        )
    }

    /// Members of a type body or the compilation unit.
    pub const fn is_declaration(self) -> bool {
        matches!(
            self,
            NodeKind::TypeDecl | NodeKind::MethodDecl | NodeKind::FieldDecl
        )
    }

    pub const fn is_type(self) -> bool {
        matches!(
            self,
            NodeKind::PrimitiveType
                | NodeKind::SimpleType
                | NodeKind::ParameterizedType
                | NodeKind::ArrayType
        )
    }

    /// Statements that leave the enclosing method.
    pub const fn is_exit(self) -> bool {
        matches!(self, NodeKind::Return | NodeKind::Throw)
    }
}

bitflags! {
    /// Set of node kinds, e.g. the kinds a rule declares interest in.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
    pub struct KindSet: u64 {
        const _ = !0;
    }
}

impl KindSet {
    #[inline]
    pub const fn of(kind: NodeKind) -> Self {
        Self::from_bits_retain(1 << kind as u64)
    }

    #[inline]
    #[must_use]
    pub const fn with(self, kind: NodeKind) -> Self {
        Self::from_bits_retain(self.bits() | (1 << kind as u64))
    }

    #[inline]
    pub const fn has(self, kind: NodeKind) -> bool {
        self.bits() & (1 << kind as u64) != 0
    }

    pub fn kinds(self) -> impl Iterator<Item = NodeKind> {
        NodeKind::ALL.into_iter().filter(move |&kind| self.has(kind))
    }
}

impl FromIterator<NodeKind> for KindSet {
    fn from_iter<I: IntoIterator<Item = NodeKind>>(iter: I) -> Self {
        iter.into_iter().fold(KindSet::empty(), KindSet::with)
    }
}

impl NodeData {
    pub fn kind(&self) -> NodeKind {
        match self {
            NodeData::CompilationUnit { .. } => NodeKind::CompilationUnit,
            NodeData::PackageDecl { .. } => NodeKind::PackageDecl,
            NodeData::ImportDecl { .. } => NodeKind::ImportDecl,
            NodeData::TypeDecl { .. } => NodeKind::TypeDecl,
            NodeData::MethodDecl { .. } => NodeKind::MethodDecl,
            NodeData::FieldDecl { .. } => NodeKind::FieldDecl,
            NodeData::Param { .. } => NodeKind::Param,
            NodeData::VarFragment { .. } => NodeKind::VarFragment,
            NodeData::Modifier { .. } => NodeKind::Modifier,
            NodeData::Annotation { .. } => NodeKind::Annotation,
            NodeData::AnonymousClass { .. } => NodeKind::AnonymousClass,
            NodeData::Block { .. } => NodeKind::Block,
            NodeData::LocalVar { .. } => NodeKind::LocalVar,
            NodeData::ExprStmt { .. } => NodeKind::ExprStmt,
            NodeData::If { .. } => NodeKind::If,
            NodeData::While { .. } => NodeKind::While,
            NodeData::DoWhile { .. } => NodeKind::DoWhile,
            NodeData::For { .. } => NodeKind::For,
            NodeData::ForEach { .. } => NodeKind::ForEach,
            NodeData::Return { .. } => NodeKind::Return,
            NodeData::Throw { .. } => NodeKind::Throw,
            NodeData::Break { .. } => NodeKind::Break,
            NodeData::Continue { .. } => NodeKind::Continue,
            NodeData::Try { .. } => NodeKind::Try,
            NodeData::Catch { .. } => NodeKind::Catch,
            NodeData::Empty => NodeKind::Empty,
            NodeData::SimpleName { .. } => NodeKind::SimpleName,
            NodeData::QualifiedName { .. } => NodeKind::QualifiedName,
            NodeData::FieldAccess { .. } => NodeKind::FieldAccess,
            NodeData::MethodCall { .. } => NodeKind::MethodCall,
            NodeData::SuperMethodCall { .. } => NodeKind::SuperMethodCall,
            NodeData::New { .. } => NodeKind::New,
            NodeData::ArrayCreation { .. } => NodeKind::ArrayCreation,
            NodeData::ArrayInit { .. } => NodeKind::ArrayInit,
            NodeData::Literal { .. } => NodeKind::Literal,
            NodeData::Assign { .. } => NodeKind::Assign,
            NodeData::Binary { .. } => NodeKind::Binary,
            NodeData::Prefix { .. } => NodeKind::Prefix,
            NodeData::Postfix { .. } => NodeKind::Postfix,
            NodeData::Cast { .. } => NodeKind::Cast,
            NodeData::Paren { .. } => NodeKind::Paren,
            NodeData::Conditional { .. } => NodeKind::Conditional,
            NodeData::This => NodeKind::This,
            NodeData::InstanceOf { .. } => NodeKind::InstanceOf,
            NodeData::ArrayAccess { .. } => NodeKind::ArrayAccess,
            NodeData::PrimitiveType { .. } => NodeKind::PrimitiveType,
            NodeData::SimpleType { .. } => NodeKind::SimpleType,
            NodeData::ParameterizedType { .. } => NodeKind::ParameterizedType,
            NodeData::ArrayType { .. } => NodeKind::ArrayType,
            NodeData::Placeholder { .. } => NodeKind::Placeholder,
        }
    }

    /// Child properties in source order.
    #[allow(clippy::match_same_arms, reason = "one arm per variant keeps the table readable")]
    pub fn properties(&self) -> Vec<(Property, ChildRef<'_>)> {
        use ChildRef::{List, Optional, Single};
        match self {
            NodeData::CompilationUnit {
                package,
                imports,
                types,
            } => vec![
                (Property::Package, Optional(*package)),
                (Property::Imports, List(imports)),
                (Property::Types, List(types)),
            ],
            NodeData::PackageDecl { name } | NodeData::ImportDecl { name, .. } => {
                vec![(Property::Name, Single(*name))]
            }
            NodeData::TypeDecl {
                modifiers,
                name,
                superclass,
                interfaces,
                members,
                ..
            } => vec![
                (Property::Modifiers, List(modifiers)),
                (Property::Name, Single(*name)),
                (Property::Superclass, Optional(*superclass)),
                (Property::Interfaces, List(interfaces)),
                (Property::Members, List(members)),
            ],
            NodeData::MethodDecl {
                modifiers,
                return_type,
                name,
                params,
                throws,
                body,
            } => vec![
                (Property::Modifiers, List(modifiers)),
                (Property::ReturnType, Optional(*return_type)),
                (Property::Name, Single(*name)),
                (Property::Params, List(params)),
                (Property::Throws, List(throws)),
                (Property::Body, Optional(*body)),
            ],
            NodeData::FieldDecl {
                modifiers,
                ty,
                fragments,
            }
            | NodeData::LocalVar {
                modifiers,
                ty,
                fragments,
            } => vec![
                (Property::Modifiers, List(modifiers)),
                (Property::Type, Single(*ty)),
                (Property::Fragments, List(fragments)),
            ],
            NodeData::Param {
                modifiers,
                ty,
                name,
            } => vec![
                (Property::Modifiers, List(modifiers)),
                (Property::Type, Single(*ty)),
                (Property::Name, Single(*name)),
            ],
            NodeData::VarFragment { name, init } => vec![
                (Property::Name, Single(*name)),
                (Property::Initializer, Optional(*init)),
            ],
            NodeData::Annotation { name } => vec![(Property::Name, Single(*name))],
            NodeData::AnonymousClass { members } => vec![(Property::Members, List(members))],
            NodeData::Block { statements } => vec![(Property::Statements, List(statements))],
            NodeData::ExprStmt { expr } => vec![(Property::Expression, Single(*expr))],
            NodeData::If {
                cond,
                then_branch,
                else_branch,
            } => vec![
                (Property::Condition, Single(*cond)),
                (Property::Then, Single(*then_branch)),
                (Property::Else, Optional(*else_branch)),
            ],
            NodeData::While { cond, body } => vec![
                (Property::Condition, Single(*cond)),
                (Property::Body, Single(*body)),
            ],
            NodeData::DoWhile { body, cond } => vec![
                (Property::Body, Single(*body)),
                (Property::Condition, Single(*cond)),
            ],
            NodeData::For {
                init,
                cond,
                update,
                body,
            } => vec![
                (Property::Init, List(init)),
                (Property::Condition, Optional(*cond)),
                (Property::Update, List(update)),
                (Property::Body, Single(*body)),
            ],
            NodeData::ForEach {
                param,
                iterable,
                body,
            } => vec![
                (Property::Param, Single(*param)),
                (Property::Iterable, Single(*iterable)),
                (Property::Body, Single(*body)),
            ],
            NodeData::Return { value } => vec![(Property::Value, Optional(*value))],
            NodeData::Throw { value } => vec![(Property::Value, Single(*value))],
            NodeData::Break { label } | NodeData::Continue { label } => {
                vec![(Property::Label, Optional(*label))]
            }
            NodeData::Try {
                body,
                catches,
                finally,
            } => vec![
                (Property::Body, Single(*body)),
                (Property::Catches, List(catches)),
                (Property::Finally, Optional(*finally)),
            ],
            NodeData::Catch { param, body } => vec![
                (Property::Param, Single(*param)),
                (Property::Body, Single(*body)),
            ],
            NodeData::QualifiedName { qualifier, name } => vec![
                (Property::Qualifier, Single(*qualifier)),
                (Property::Name, Single(*name)),
            ],
            NodeData::FieldAccess { target, name } => vec![
                (Property::Target, Single(*target)),
                (Property::Name, Single(*name)),
            ],
            NodeData::MethodCall { target, name, args } => vec![
                (Property::Target, Optional(*target)),
                (Property::Name, Single(*name)),
                (Property::Arguments, List(args)),
            ],
            NodeData::SuperMethodCall { name, args } => vec![
                (Property::Name, Single(*name)),
                (Property::Arguments, List(args)),
            ],
            NodeData::New {
                ty,
                args,
                anonymous,
            } => vec![
                (Property::Type, Single(*ty)),
                (Property::Arguments, List(args)),
                (Property::Anonymous, Optional(*anonymous)),
            ],
            NodeData::ArrayCreation { ty, dims, init } => vec![
                (Property::Type, Single(*ty)),
                (Property::Dimensions, List(dims)),
                (Property::Initializer, Optional(*init)),
            ],
            NodeData::ArrayInit { elements } => vec![(Property::Elements, List(elements))],
            NodeData::Assign { lhs, rhs, .. } | NodeData::Binary { lhs, rhs, .. } => vec![
                (Property::Lhs, Single(*lhs)),
                (Property::Rhs, Single(*rhs)),
            ],
            NodeData::Prefix { operand, .. } | NodeData::Postfix { operand, .. } => {
                vec![(Property::Operand, Single(*operand))]
            }
            NodeData::Cast { ty, expr } => vec![
                (Property::Type, Single(*ty)),
                (Property::Expression, Single(*expr)),
            ],
            NodeData::Paren { expr } => vec![(Property::Expression, Single(*expr))],
            NodeData::Conditional {
                cond,
                then_expr,
                else_expr,
            } => vec![
                (Property::Condition, Single(*cond)),
                (Property::Then, Single(*then_expr)),
                (Property::Else, Single(*else_expr)),
            ],
            NodeData::InstanceOf { expr, ty } => vec![
                (Property::Expression, Single(*expr)),
                (Property::Type, Single(*ty)),
            ],
            NodeData::ArrayAccess { array, index } => vec![
                (Property::Array, Single(*array)),
                (Property::Index, Single(*index)),
            ],
            NodeData::SimpleType { name } => vec![(Property::Name, Single(*name))],
            NodeData::ParameterizedType { base, args } => vec![
                (Property::Type, Single(*base)),
                (Property::TypeArguments, List(args)),
            ],
            NodeData::ArrayType { elem } => vec![(Property::ElementType, Single(*elem))],
            NodeData::Modifier { .. }
            | NodeData::Empty
            | NodeData::SimpleName { .. }
            | NodeData::Literal { .. }
            | NodeData::This
            | NodeData::PrimitiveType { .. }
            | NodeData::Placeholder { .. } => Vec::new(),
        }
    }

    /// Mutable access to the child property `prop`, if this variant has it.
    pub fn child_mut(&mut self, prop: Property) -> Option<ChildMut<'_>> {
        use ChildMut::{List, Optional, Single};
        let child = match (self, prop) {
            (NodeData::CompilationUnit { package, .. }, Property::Package) => Optional(package),
            (NodeData::CompilationUnit { imports, .. }, Property::Imports) => List(imports),
            (NodeData::CompilationUnit { types, .. }, Property::Types) => List(types),
            (
                NodeData::PackageDecl { name }
                | NodeData::ImportDecl { name, .. }
                | NodeData::TypeDecl { name, .. }
                | NodeData::MethodDecl { name, .. }
                | NodeData::Param { name, .. }
                | NodeData::VarFragment { name, .. }
                | NodeData::Annotation { name }
                | NodeData::QualifiedName { name, .. }
                | NodeData::FieldAccess { name, .. }
                | NodeData::MethodCall { name, .. }
                | NodeData::SuperMethodCall { name, .. }
                | NodeData::SimpleType { name },
                Property::Name,
            ) => Single(name),
            (
                NodeData::TypeDecl { modifiers, .. }
                | NodeData::MethodDecl { modifiers, .. }
                | NodeData::FieldDecl { modifiers, .. }
                | NodeData::LocalVar { modifiers, .. }
                | NodeData::Param { modifiers, .. },
                Property::Modifiers,
            ) => List(modifiers),
            (NodeData::TypeDecl { superclass, .. }, Property::Superclass) => Optional(superclass),
            (NodeData::TypeDecl { interfaces, .. }, Property::Interfaces) => List(interfaces),
            (
                NodeData::TypeDecl { members, .. } | NodeData::AnonymousClass { members },
                Property::Members,
            ) => List(members),
            (NodeData::MethodDecl { return_type, .. }, Property::ReturnType) => {
                Optional(return_type)
            }
            (NodeData::MethodDecl { params, .. }, Property::Params) => List(params),
            (NodeData::MethodDecl { throws, .. }, Property::Throws) => List(throws),
            (NodeData::MethodDecl { body, .. }, Property::Body) => Optional(body),
            (
                NodeData::While { body, .. }
                | NodeData::DoWhile { body, .. }
                | NodeData::For { body, .. }
                | NodeData::ForEach { body, .. }
                | NodeData::Try { body, .. }
                | NodeData::Catch { body, .. },
                Property::Body,
            ) => Single(body),
            (
                NodeData::FieldDecl { ty, .. }
                | NodeData::LocalVar { ty, .. }
                | NodeData::Param { ty, .. }
                | NodeData::New { ty, .. }
                | NodeData::ArrayCreation { ty, .. }
                | NodeData::Cast { ty, .. }
                | NodeData::InstanceOf { ty, .. }
                | NodeData::ParameterizedType { base: ty, .. },
                Property::Type,
            ) => Single(ty),
            (
                NodeData::FieldDecl { fragments, .. } | NodeData::LocalVar { fragments, .. },
                Property::Fragments,
            ) => List(fragments),
            (
                NodeData::VarFragment { init, .. } | NodeData::ArrayCreation { init, .. },
                Property::Initializer,
            ) => Optional(init),
            (NodeData::Block { statements }, Property::Statements) => List(statements),
            (
                NodeData::ExprStmt { expr }
                | NodeData::Cast { expr, .. }
                | NodeData::Paren { expr }
                | NodeData::InstanceOf { expr, .. },
                Property::Expression,
            ) => Single(expr),
            (
                NodeData::If { cond, .. }
                | NodeData::While { cond, .. }
                | NodeData::DoWhile { cond, .. }
                | NodeData::Conditional { cond, .. },
                Property::Condition,
            ) => Single(cond),
            (NodeData::For { cond, .. }, Property::Condition) => Optional(cond),
            (
                NodeData::If { then_branch, .. }
                | NodeData::Conditional {
                    then_expr: then_branch,
                    ..
                },
                Property::Then,
            ) => Single(then_branch),
            (NodeData::If { else_branch, .. }, Property::Else) => Optional(else_branch),
            (NodeData::Conditional { else_expr, .. }, Property::Else) => Single(else_expr),
            (NodeData::For { init, .. }, Property::Init) => List(init),
            (NodeData::For { update, .. }, Property::Update) => List(update),
            (
                NodeData::ForEach { param, .. } | NodeData::Catch { param, .. },
                Property::Param,
            ) => Single(param),
            (NodeData::ForEach { iterable, .. }, Property::Iterable) => Single(iterable),
            (NodeData::Return { value }, Property::Value) => Optional(value),
            (NodeData::Throw { value }, Property::Value) => Single(value),
            (
                NodeData::Break { label } | NodeData::Continue { label },
                Property::Label,
            ) => Optional(label),
            (NodeData::Try { catches, .. }, Property::Catches) => List(catches),
            (NodeData::Try { finally, .. }, Property::Finally) => Optional(finally),
            (NodeData::QualifiedName { qualifier, .. }, Property::Qualifier) => Single(qualifier),
            (NodeData::FieldAccess { target, .. }, Property::Target) => Single(target),
            (NodeData::MethodCall { target, .. }, Property::Target) => Optional(target),
            (
                NodeData::MethodCall { args, .. }
                | NodeData::SuperMethodCall { args, .. }
                | NodeData::New { args, .. },
                Property::Arguments,
            ) => List(args),
            (NodeData::New { anonymous, .. }, Property::Anonymous) => Optional(anonymous),
            (NodeData::ArrayCreation { dims, .. }, Property::Dimensions) => List(dims),
            (NodeData::ArrayInit { elements }, Property::Elements) => List(elements),
            (
                NodeData::Assign { lhs, .. } | NodeData::Binary { lhs, .. },
                Property::Lhs,
            ) => Single(lhs),
            (
                NodeData::Assign { rhs, .. } | NodeData::Binary { rhs, .. },
                Property::Rhs,
            ) => Single(rhs),
            (
                NodeData::Prefix { operand, .. } | NodeData::Postfix { operand, .. },
                Property::Operand,
            ) => Single(operand),
            (NodeData::ArrayAccess { array, .. }, Property::Array) => Single(array),
            (NodeData::ArrayAccess { index, .. }, Property::Index) => Single(index),
            (NodeData::ParameterizedType { args, .. }, Property::TypeArguments) => List(args),
            (NodeData::ArrayType { elem }, Property::ElementType) => Single(elem),
            _ => return None,
        };
        Some(child)
    }

    /// Rewrite every child id in place, in source order.
    pub fn map_children(&mut self, mut f: impl FnMut(NodeId) -> NodeId) {
        let props: Vec<Property> = self.properties().into_iter().map(|(p, _)| p).collect();
        for prop in props {
            match self.child_mut(prop) {
                Some(ChildMut::Single(id)) => *id = f(*id),
                Some(ChildMut::Optional(slot)) => {
                    if let Some(id) = slot.as_mut() {
                        *id = f(*id);
                    }
                }
                Some(ChildMut::List(ids)) => {
                    for id in ids.iter_mut() {
                        *id = f(*id);
                    }
                }
                None => {}
            }
        }
    }

    /// All child ids in source order.
    pub fn child_ids(&self) -> Vec<NodeId> {
        let mut ids = Vec::new();
        for (_, child) in self.properties() {
            match child {
                ChildRef::Single(id) => ids.push(id),
                ChildRef::Optional(Some(id)) => ids.push(id),
                ChildRef::Optional(None) => {}
                ChildRef::List(list) => ids.extend_from_slice(list),
            }
        }
        ids
    }

    /// Look up one property.
    pub fn child(&self, prop: Property) -> Option<ChildRef<'_>> {
        self.properties()
            .into_iter()
            .find_map(|(p, child)| (p == prop).then_some(child))
    }
}

/// Precise parent-relative location of a node.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct Slot {
    pub parent: NodeId,
    pub property: Property,
    /// Position within a list property; `None` for single children.
    pub index: Option<u32>,
}

impl Slot {
    pub fn is_list_member(&self) -> bool {
        self.index.is_some()
    }
}

/// One arena entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Node {
    pub data: NodeData,
    pub span: Span,
    pub parent: Option<NodeId>,
    pub slot: Option<Slot>,
}

impl Node {
    #[inline]
    pub fn kind(&self) -> NodeKind {
        self.data.kind()
    }
}

#[cfg(test)]
mod tests;
