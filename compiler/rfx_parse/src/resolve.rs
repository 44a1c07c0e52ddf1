//! Binding resolution over a finished tree.
//!
//! One walk in source order with a stack of block scopes. Fields of a class
//! are declared before any member body is visited, locals when their
//! declarator is reached (after its initializer). Types are resolved
//! through explicit imports, types declared in the unit and the implicit
//! `java.lang` package; anything else keeps the spelling it was written
//! with.

pub mod known;

use rustc_hash::FxHashMap;

use rfx_ir::{
    ensure_sufficient_stack, BinaryOp, Bindings, MethodRef, Name, NodeData, NodeId, PrefixOp,
    Tree, TypeRef, VarId, VarInfo, VarKind,
};

/// Signature of a method declared in the unit.
#[derive(Clone)]
struct MethodSig {
    ret: Option<TypeRef>,
    is_static: bool,
}

struct ClassCtx {
    ty: TypeRef,
    superclass: Option<TypeRef>,
    methods: FxHashMap<Name, MethodSig>,
}

pub(crate) struct Resolver<'t> {
    tree: &'t Tree,
    bindings: Bindings,
    imports: FxHashMap<&'t str, String>,
    local_types: FxHashMap<&'t str, String>,
    scopes: Vec<FxHashMap<Name, VarId>>,
    classes: Vec<ClassCtx>,
}

impl<'t> Resolver<'t> {
    pub(crate) fn new(tree: &'t Tree) -> Self {
        Resolver {
            tree,
            bindings: Bindings::new(),
            imports: FxHashMap::default(),
            local_types: FxHashMap::default(),
            scopes: Vec::new(),
            classes: Vec::new(),
        }
    }

    pub(crate) fn run(mut self) -> Bindings {
        let tree = self.tree;
        let root = tree.root();
        if let NodeData::CompilationUnit {
            package,
            imports,
            types,
        } = tree.data(root)
        {
            let package = package
                .map(|p| match tree.data(p) {
                    NodeData::PackageDecl { name } => tree.dotted_name(*name),
                    _ => String::new(),
                })
                .unwrap_or_default();
            for &import in imports {
                self.import(import);
            }
            for &ty in types {
                self.collect_types(ty, &package);
            }
            for &ty in types {
                self.type_decl(ty);
            }
        }
        self.bindings
    }

    fn import(&mut self, import: NodeId) {
        let tree = self.tree;
        if let NodeData::ImportDecl {
            name,
            is_static: false,
            on_demand: false,
        } = tree.data(import)
        {
            let qualified = tree.dotted_name(*name);
            let simple = match tree.data(*name) {
                NodeData::QualifiedName { name, .. } => tree.ident(*name),
                _ => tree.ident(*name),
            };
            if let Some(simple) = simple {
                self.imports.insert(tree.resolve(simple), qualified);
            }
        }
    }

    /// Register every type declared in the unit, nested ones included.
    fn collect_types(&mut self, ty: NodeId, prefix: &str) {
        let tree = self.tree;
        let NodeData::TypeDecl { name, members, .. } = tree.data(ty) else {
            return;
        };
        let Some(simple) = tree.ident(*name) else {
            return;
        };
        let simple = tree.resolve(simple);
        let qualified = if prefix.is_empty() {
            simple.to_owned()
        } else {
            format!("{prefix}.{simple}")
        };
        for &member in members {
            self.collect_types(member, &qualified);
        }
        self.local_types.insert(simple, qualified);
    }

    fn type_ref_str(&self, text: &str) -> TypeRef {
        let tree = self.tree;
        TypeRef(tree.intern(text))
    }

    /// Qualified spelling of a type name as written in the source.
    fn qualify(&self, written: &str) -> String {
        let (head, rest) = match written.split_once('.') {
            Some((head, rest)) => (head, Some(rest)),
            None => (written, None),
        };
        let base = if let Some(q) = self.imports.get(head) {
            q.clone()
        } else if let Some(q) = self.local_types.get(head) {
            q.clone()
        } else if known::JAVA_LANG.contains(&head) {
            format!("java.lang.{head}")
        } else {
            return written.to_owned();
        };
        match rest {
            Some(rest) => format!("{base}.{rest}"),
            None => base,
        }
    }

    /// Erased, qualified type of a type node.
    fn type_of_node(&self, ty: NodeId) -> Option<TypeRef> {
        let text = self.type_text(ty)?;
        Some(self.type_ref_str(&text))
    }

    fn type_text(&self, ty: NodeId) -> Option<String> {
        let tree = self.tree;
        match tree.data(ty) {
            NodeData::PrimitiveType { keyword } => Some(tree.resolve(*keyword).to_owned()),
            NodeData::SimpleType { name } => Some(self.qualify(&tree.dotted_name(*name))),
            NodeData::ParameterizedType { base, .. } => self.type_text(*base),
            NodeData::ArrayType { elem } => self.type_text(*elem).map(|t| format!("{t}[]")),
            _ => None,
        }
    }

    fn push_scope(&mut self) {
        self.scopes.push(FxHashMap::default());
    }

    fn pop_scope(&mut self) {
        self.scopes.pop();
    }

    fn lookup(&self, name: Name) -> Option<VarId> {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.get(&name).copied())
    }

    fn declare(&mut self, decl: NodeId, name_node: NodeId, ty: Option<TypeRef>, kind: VarKind) {
        let tree = self.tree;
        let Some(name) = tree.ident(name_node) else {
            return;
        };
        let var = self.bindings.declare(VarInfo {
            name,
            decl,
            ty,
            kind,
        });
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name, var);
        }
    }

    fn current_class(&self) -> Option<&ClassCtx> {
        self.classes.last()
    }

    fn type_decl(&mut self, ty: NodeId) {
        let tree = self.tree;
        let NodeData::TypeDecl {
            name,
            superclass,
            members,
            ..
        } = tree.data(ty)
        else {
            return;
        };
        let own = self
            .tree
            .ident(*name)
            .map(|n| self.qualify(tree.resolve(n)))
            .unwrap_or_default();
        let superclass = superclass.and_then(|s| self.type_of_node(s));
        if let Some(sc) = superclass {
            self.bindings.set_superclass(ty, sc);
        }
        let class_ty = self.type_ref_str(&own);
        self.class_body(class_ty, superclass, members);
    }

    fn class_body(&mut self, ty: TypeRef, superclass: Option<TypeRef>, members: &[NodeId]) {
        let tree = self.tree;
        let mut methods = FxHashMap::default();
        self.push_scope();
        for &member in members {
            match tree.data(member) {
                NodeData::FieldDecl { ty, fragments, .. } => {
                    let field_ty = self.type_of_node(*ty);
                    for &fragment in fragments {
                        if let NodeData::VarFragment { name, .. } = tree.data(fragment) {
                            self.declare(fragment, *name, field_ty, VarKind::Field);
                        }
                    }
                }
                NodeData::MethodDecl {
                    modifiers,
                    return_type,
                    name,
                    ..
                } => {
                    if let Some(name) = tree.ident(*name) {
                        let is_static = modifiers.iter().any(|&m| self.is_modifier(m, "static"));
                        let ret = return_type.and_then(|r| self.type_of_node(r));
                        methods.insert(name, MethodSig { ret, is_static });
                    }
                }
                _ => {}
            }
        }
        self.classes.push(ClassCtx {
            ty,
            superclass,
            methods,
        });
        for &member in members {
            match tree.data(member) {
                NodeData::FieldDecl { fragments, .. } => {
                    for &fragment in fragments {
                        if let NodeData::VarFragment {
                            init: Some(init), ..
                        } = tree.data(fragment)
                        {
                            self.expr(*init);
                        }
                    }
                }
                NodeData::MethodDecl { params, body, .. } => {
                    self.push_scope();
                    for &param in params {
                        self.param(param, VarKind::Param);
                    }
                    if let Some(body) = body {
                        self.stmt(*body);
                    }
                    self.pop_scope();
                }
                NodeData::TypeDecl { .. } => self.type_decl(member),
                _ => {}
            }
        }
        self.classes.pop();
        self.pop_scope();
    }

    fn is_modifier(&self, modifier: NodeId, keyword: &str) -> bool {
        let tree = self.tree;
        matches!(tree.data(modifier), NodeData::Modifier { keyword: k } if tree.resolve(*k) == keyword)
    }

    fn param(&mut self, param: NodeId, kind: VarKind) {
        let tree = self.tree;
        if let NodeData::Param { ty, name, .. } = tree.data(param) {
            let ty = self.type_of_node(*ty);
            self.declare(param, *name, ty, kind);
        }
    }

    fn stmt(&mut self, stmt: NodeId) {
        ensure_sufficient_stack(|| self.stmt_inner(stmt));
    }

    fn stmt_inner(&mut self, stmt: NodeId) {
        let tree = self.tree;
        match tree.data(stmt) {
            NodeData::Block { statements } => {
                self.push_scope();
                for &s in statements {
                    self.stmt(s);
                }
                self.pop_scope();
            }
            NodeData::LocalVar { ty, fragments, .. } => {
                let ty = self.type_of_node(*ty);
                for &fragment in fragments {
                    if let NodeData::VarFragment { name, init } = tree.data(fragment) {
                        if let Some(init) = init {
                            self.expr(*init);
                        }
                        self.declare(fragment, *name, ty, VarKind::Local);
                    }
                }
            }
            NodeData::ExprStmt { expr } => {
                self.expr(*expr);
            }
            NodeData::If {
                cond,
                then_branch,
                else_branch,
            } => {
                self.expr(*cond);
                self.stmt(*then_branch);
                if let Some(e) = else_branch {
                    self.stmt(*e);
                }
            }
            NodeData::While { cond, body } => {
                self.expr(*cond);
                self.stmt(*body);
            }
            NodeData::DoWhile { body, cond } => {
                self.stmt(*body);
                self.expr(*cond);
            }
            NodeData::For {
                init,
                cond,
                update,
                body,
            } => {
                self.push_scope();
                for &i in init {
                    self.stmt(i);
                }
                if let Some(c) = cond {
                    self.expr(*c);
                }
                for &u in update {
                    self.stmt(u);
                }
                self.stmt(*body);
                self.pop_scope();
            }
            NodeData::ForEach {
                param,
                iterable,
                body,
            } => {
                self.expr(*iterable);
                self.push_scope();
                self.param(*param, VarKind::Local);
                self.stmt(*body);
                self.pop_scope();
            }
            NodeData::Return { value } => {
                if let Some(v) = value {
                    self.expr(*v);
                }
            }
            NodeData::Throw { value } => {
                self.expr(*value);
            }
            NodeData::Try {
                body,
                catches,
                finally,
            } => {
                self.stmt(*body);
                for &catch in catches {
                    if let NodeData::Catch { param, body } = tree.data(catch) {
                        self.push_scope();
                        self.param(*param, VarKind::Local);
                        self.stmt(*body);
                        self.pop_scope();
                    }
                }
                if let Some(f) = finally {
                    self.stmt(*f);
                }
            }
            _ => {}
        }
    }

    /// Whether a name expression starts with a variable rather than a type
    /// or package.
    fn names_variable(&self, expr: NodeId) -> bool {
        let tree = self.tree;
        match tree.data(expr) {
            NodeData::SimpleName { ident } => self.lookup(*ident).is_some(),
            NodeData::QualifiedName { qualifier, .. } => self.names_variable(*qualifier),
            _ => true,
        }
    }

    fn expr(&mut self, expr: NodeId) -> Option<TypeRef> {
        let ty = ensure_sufficient_stack(|| self.expr_inner(expr));
        if let Some(ty) = ty {
            self.bindings.set_expr_type(expr, ty);
        }
        ty
    }

    fn expr_inner(&mut self, expr: NodeId) -> Option<TypeRef> {
        let tree = self.tree;
        match tree.data(expr) {
            NodeData::SimpleName { ident } => {
                let var = self.lookup(*ident)?;
                self.bindings.bind_name(expr, var);
                self.bindings.var(var).and_then(|v| v.ty)
            }
            NodeData::QualifiedName { qualifier, name } => {
                if self.names_variable(*qualifier) {
                    let target = self.expr(*qualifier);
                    let is_array = target.is_some_and(|t| tree.resolve(t.name()).ends_with("[]"));
                    return (is_array && tree.is_ident(*name, "length"))
                        .then(|| self.type_ref_str("int"));
                }
                let owner = self.qualify(&tree.dotted_name(*qualifier));
                let field = tree.ident(*name).map(|n| tree.resolve(n))?;
                known::static_field(&owner, field).map(|t| self.type_ref_str(t))
            }
            NodeData::FieldAccess { target, name } => {
                let is_this = matches!(tree.data(*target), NodeData::This);
                self.expr(*target);
                if !is_this {
                    return None;
                }
                // `this.x` names a field of the current class.
                let ident = tree.ident(*name)?;
                let var = self
                    .scopes
                    .iter()
                    .rev()
                    .find_map(|scope| scope.get(&ident).copied())
                    .filter(|&v| self.bindings.var(v).is_some_and(|i| i.kind == VarKind::Field))?;
                self.bindings.bind_name(*name, var);
                self.bindings.var(var).and_then(|v| v.ty)
            }
            NodeData::MethodCall { target, name, args } => {
                let param_types: Vec<TypeRef> = args
                    .iter()
                    .map(|&a| {
                        self.expr(a)
                            .unwrap_or_else(|| self.type_ref_str("java.lang.Object"))
                    })
                    .collect();
                let method = tree.ident(*name)?;
                let (declaring, is_static, ret) = match target {
                    None => self.own_method(method),
                    Some(t) if !self.names_variable(*t) => {
                        let owner = self.qualify(&tree.dotted_name(*t));
                        (Some(self.type_ref_str(&owner)), true, None)
                    }
                    Some(t) => (self.expr(*t), false, None),
                };
                let ret = ret.or_else(|| {
                    let owner = tree.resolve(declaring?.name());
                    known::method_return(owner, tree.resolve(method)).map(|r| self.type_ref_str(r))
                });
                self.bindings.set_method(
                    expr,
                    MethodRef {
                        declaring_type: declaring,
                        name: method,
                        param_types,
                        is_static,
                    },
                );
                ret
            }
            NodeData::SuperMethodCall { name, args } => {
                let param_types: Vec<TypeRef> = args
                    .iter()
                    .map(|&a| {
                        self.expr(a)
                            .unwrap_or_else(|| self.type_ref_str("java.lang.Object"))
                    })
                    .collect();
                let method = tree.ident(*name)?;
                let declaring = self.current_class().and_then(|c| c.superclass);
                self.bindings.set_method(
                    expr,
                    MethodRef {
                        declaring_type: declaring,
                        name: method,
                        param_types,
                        is_static: false,
                    },
                );
                None
            }
            NodeData::New {
                ty,
                args,
                anonymous,
            } => {
                for &a in args {
                    self.expr(a);
                }
                let created = self.type_of_node(*ty);
                if let (Some(body), Some(created)) = (anonymous, created) {
                    if let NodeData::AnonymousClass { members } = tree.data(*body) {
                        self.class_body(created, Some(created), members);
                    }
                }
                created
            }
            NodeData::ArrayCreation { ty, dims, init } => {
                for &d in dims {
                    self.expr(d);
                }
                if let Some(i) = init {
                    self.expr(*i);
                }
                self.type_of_node(*ty)
            }
            NodeData::ArrayInit { elements } => {
                for &e in elements {
                    self.expr(e);
                }
                None
            }
            NodeData::Literal { kind, .. } => Some(self.type_ref_str(kind.type_name())),
            NodeData::Assign { lhs, rhs, .. } => {
                let ty = self.expr(*lhs);
                self.expr(*rhs);
                ty
            }
            NodeData::Binary { op, lhs, rhs } => {
                let l = self.expr(*lhs);
                let r = self.expr(*rhs);
                self.binary_type(*op, l, r)
            }
            NodeData::Prefix { op, operand } => {
                let ty = self.expr(*operand);
                if *op == PrefixOp::Not {
                    Some(self.type_ref_str("boolean"))
                } else {
                    ty
                }
            }
            NodeData::Postfix { operand, .. } => self.expr(*operand),
            NodeData::Cast { ty, expr } => {
                self.expr(*expr);
                self.type_of_node(*ty)
            }
            NodeData::Paren { expr } => self.expr(*expr),
            NodeData::Conditional {
                cond,
                then_expr,
                else_expr,
            } => {
                self.expr(*cond);
                let t = self.expr(*then_expr);
                let e = self.expr(*else_expr);
                t.or(e)
            }
            NodeData::This => self.current_class().map(|c| c.ty),
            NodeData::InstanceOf { expr, .. } => {
                self.expr(*expr);
                Some(self.type_ref_str("boolean"))
            }
            NodeData::ArrayAccess { array, index } => {
                let array_ty = self.expr(*array);
                self.expr(*index);
                let text = tree.resolve(array_ty?.name());
                text.strip_suffix("[]").map(|elem| self.type_ref_str(elem))
            }
            _ => None,
        }
    }

    /// Method declared in an enclosing class, innermost first.
    fn own_method(&self, name: Name) -> (Option<TypeRef>, bool, Option<TypeRef>) {
        for class in self.classes.iter().rev() {
            if let Some(sig) = class.methods.get(&name) {
                return (Some(class.ty), sig.is_static, sig.ret);
            }
        }
        (self.current_class().map(|c| c.ty), false, None)
    }

    fn binary_type(&self, op: BinaryOp, l: Option<TypeRef>, r: Option<TypeRef>) -> Option<TypeRef> {
        let tree = self.tree;
        let text = |t: Option<TypeRef>| t.map(|t| tree.resolve(t.name()));
        let (lt, rt) = (text(l), text(r));
        let result = match op {
            BinaryOp::Or
            | BinaryOp::And
            | BinaryOp::Eq
            | BinaryOp::NotEq
            | BinaryOp::Lt
            | BinaryOp::Gt
            | BinaryOp::LtEq
            | BinaryOp::GtEq => "boolean",
            BinaryOp::Add if lt == Some("java.lang.String") || rt == Some("java.lang.String") => {
                "java.lang.String"
            }
            BinaryOp::Shl | BinaryOp::Shr | BinaryOp::UShr => known::promote(lt?, "int")?,
            BinaryOp::BitAnd | BinaryOp::BitOr | BinaryOp::BitXor
                if lt == Some("boolean") && rt == Some("boolean") =>
            {
                "boolean"
            }
            _ => known::promote(lt?, rt?)?,
        };
        Some(self.type_ref_str(result))
    }
}

#[cfg(test)]
mod tests;
