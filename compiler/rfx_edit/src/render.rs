//! Source rendering of staged fragments.
//!
//! Staged nodes have no source text of their own, so they are printed from
//! their structure. Placeholders print the original node's text verbatim,
//! re-indented to where the fragment lands. The printer never adds
//! parentheses: a fragment that needs them stages a `Paren` node.

use rfx_ir::{NodeData, NodeId, Property, Tree};

use crate::layout::{reindent, Layout};
use crate::op::StagedId;
use crate::script::EditScript;

/// Render a staged fragment as it would be written at column zero.
pub fn render_fragment(script: &EditScript<'_>, fragment: StagedId) -> String {
    let original = script.tree();
    let layout = Layout::new(original.source());
    let mut printer = Printer::new(script.staging(), original, &layout, "");
    printer.node(fragment.node());
    printer.finish()
}

pub(crate) struct Printer<'a> {
    staging: &'a Tree,
    original: &'a Tree,
    layout: &'a Layout<'a>,
    base: &'a str,
    level: usize,
    out: String,
}

impl<'a> Printer<'a> {
    /// `base` is the indentation of the line the output starts on.
    pub fn new(
        staging: &'a Tree,
        original: &'a Tree,
        layout: &'a Layout<'a>,
        base: &'a str,
    ) -> Self {
        Printer {
            staging,
            original,
            layout,
            base,
            level: 0,
            out: String::new(),
        }
    }

    pub fn finish(self) -> String {
        self.out
    }

    fn push(&mut self, text: &str) {
        self.out.push_str(text);
    }

    fn indent(&self) -> String {
        let mut indent = self.base.to_owned();
        for _ in 0..self.level {
            indent.push_str(self.layout.unit());
        }
        indent
    }

    fn newline(&mut self) {
        let indent = self.indent();
        self.out.push('\n');
        self.out.push_str(&indent);
    }

    fn ident(&mut self, name: rfx_ir::Name) {
        let text = self.staging.resolve(name);
        self.push(text);
    }

    fn list(&mut self, ids: &[NodeId], sep: &str) {
        for (i, &id) in ids.iter().enumerate() {
            if i > 0 {
                self.push(sep);
            }
            self.node(id);
        }
    }

    fn modifiers(&mut self, ids: &[NodeId]) {
        for &id in ids {
            self.node(id);
            self.push(" ");
        }
    }

    fn args(&mut self, ids: &[NodeId]) {
        self.push("(");
        self.list(ids, ", ");
        self.push(")");
    }

    /// `{ members }` of a type or anonymous class.
    fn members(&mut self, ids: &[NodeId]) {
        if ids.is_empty() {
            self.push("{}");
            return;
        }
        self.push("{");
        self.level += 1;
        for &id in ids {
            self.newline();
            self.node(id);
        }
        self.level -= 1;
        self.newline();
        self.push("}");
    }

    fn var_decl(&mut self, modifiers: &[NodeId], ty: NodeId, fragments: &[NodeId]) {
        self.modifiers(modifiers);
        self.node(ty);
        self.push(" ");
        self.list(fragments, ", ");
    }

    /// Statement slot of a `for` header: no terminating `;`.
    fn header_stmt(&mut self, id: NodeId) {
        match self.staging.data(id) {
            NodeData::ExprStmt { expr } => self.node(*expr),
            NodeData::LocalVar {
                modifiers,
                ty,
                fragments,
            } => self.var_decl(modifiers, *ty, fragments),
            _ => self.node(id),
        }
    }

    fn placeholder(&mut self, original: NodeId) {
        let span = self.original.span(original);
        let text = self.original.text(span);
        let from = self.layout.indent_at(span.start);
        let to = self.indent();
        self.push(&reindent(text, from, &to));
    }

    /// Print one staged node.
    pub fn node(&mut self, id: NodeId) {
        let staging = self.staging;
        match staging.data(id) {
            NodeData::Placeholder { original, .. } => self.placeholder(*original),

            NodeData::CompilationUnit {
                package,
                imports,
                types,
            } => {
                if let Some(package) = package {
                    self.node(*package);
                    self.newline();
                    self.newline();
                }
                for &import in imports {
                    self.node(import);
                    self.newline();
                }
                if !imports.is_empty() {
                    self.newline();
                }
                self.list_blank_separated(types);
            }
            NodeData::PackageDecl { name } => {
                self.push("package ");
                self.node(*name);
                self.push(";");
            }
            NodeData::ImportDecl {
                name,
                is_static,
                on_demand,
            } => {
                self.push(if *is_static { "import static " } else { "import " });
                self.node(*name);
                if *on_demand {
                    self.push(".*");
                }
                self.push(";");
            }
            NodeData::TypeDecl {
                modifiers,
                is_interface,
                name,
                superclass,
                interfaces,
                members,
            } => {
                self.modifiers(modifiers);
                self.push(if *is_interface { "interface " } else { "class " });
                self.node(*name);
                if let Some(superclass) = superclass {
                    self.push(" extends ");
                    self.node(*superclass);
                }
                if !interfaces.is_empty() {
                    self.push(if *is_interface { " extends " } else { " implements " });
                    self.list(interfaces, ", ");
                }
                self.push(" ");
                self.members(members);
            }
            NodeData::MethodDecl {
                modifiers,
                return_type,
                name,
                params,
                throws,
                body,
            } => {
                self.modifiers(modifiers);
                if let Some(ret) = return_type {
                    self.node(*ret);
                    self.push(" ");
                }
                self.node(*name);
                self.args(params);
                if !throws.is_empty() {
                    self.push(" throws ");
                    self.list(throws, ", ");
                }
                match body {
                    Some(body) => {
                        self.push(" ");
                        self.node(*body);
                    }
                    None => self.push(";"),
                }
            }
            NodeData::FieldDecl {
                modifiers,
                ty,
                fragments,
            }
            | NodeData::LocalVar {
                modifiers,
                ty,
                fragments,
            } => {
                self.var_decl(modifiers, *ty, fragments);
                self.push(";");
            }
            NodeData::Param {
                modifiers,
                ty,
                name,
            } => {
                self.modifiers(modifiers);
                self.node(*ty);
                self.push(" ");
                self.node(*name);
            }
            NodeData::VarFragment { name, init } => {
                self.node(*name);
                if let Some(init) = init {
                    self.push(" = ");
                    self.node(*init);
                }
            }
            NodeData::Modifier { keyword } => self.ident(*keyword),
            NodeData::Annotation { name } => {
                self.push("@");
                self.node(*name);
            }
            NodeData::AnonymousClass { members } => self.members(members),

            NodeData::Block { statements } => {
                if statements.is_empty() {
                    self.push("{}");
                    return;
                }
                self.push("{");
                self.level += 1;
                for &stmt in statements {
                    self.newline();
                    self.node(stmt);
                }
                self.level -= 1;
                self.newline();
                self.push("}");
            }
            NodeData::ExprStmt { expr } => {
                self.node(*expr);
                self.push(";");
            }
            NodeData::If {
                cond,
                then_branch,
                else_branch,
            } => {
                self.push("if (");
                self.node(*cond);
                self.push(") ");
                self.node(*then_branch);
                if let Some(else_branch) = else_branch {
                    self.push(" else ");
                    self.node(*else_branch);
                }
            }
            NodeData::While { cond, body } => {
                self.push("while (");
                self.node(*cond);
                self.push(") ");
                self.node(*body);
            }
            NodeData::DoWhile { body, cond } => {
                self.push("do ");
                self.node(*body);
                self.push(" while (");
                self.node(*cond);
                self.push(");");
            }
            NodeData::For {
                init,
                cond,
                update,
                body,
            } => {
                self.push("for (");
                for (i, &stmt) in init.iter().enumerate() {
                    if i > 0 {
                        self.push(", ");
                    }
                    self.header_stmt(stmt);
                }
                self.push(";");
                if let Some(cond) = cond {
                    self.push(" ");
                    self.node(*cond);
                }
                self.push(";");
                for (i, &stmt) in update.iter().enumerate() {
                    self.push(if i == 0 { " " } else { ", " });
                    self.header_stmt(stmt);
                }
                self.push(") ");
                self.node(*body);
            }
            NodeData::ForEach {
                param,
                iterable,
                body,
            } => {
                self.push("for (");
                self.node(*param);
                self.push(" : ");
                self.node(*iterable);
                self.push(") ");
                self.node(*body);
            }
            NodeData::Return { value } => {
                self.push("return");
                if let Some(value) = value {
                    self.push(" ");
                    self.node(*value);
                }
                self.push(";");
            }
            NodeData::Throw { value } => {
                self.push("throw ");
                self.node(*value);
                self.push(";");
            }
            NodeData::Break { label } | NodeData::Continue { label } => {
                let keyword = if matches!(staging.data(id), NodeData::Break { .. }) {
                    "break"
                } else {
                    "continue"
                };
                self.push(keyword);
                if let Some(label) = label {
                    self.push(" ");
                    self.node(*label);
                }
                self.push(";");
            }
            NodeData::Try {
                body,
                catches,
                finally,
            } => {
                self.push("try ");
                self.node(*body);
                for &catch in catches {
                    self.push(" ");
                    self.node(catch);
                }
                if let Some(finally) = finally {
                    self.push(" finally ");
                    self.node(*finally);
                }
            }
            NodeData::Catch { param, body } => {
                self.push("catch (");
                self.node(*param);
                self.push(") ");
                self.node(*body);
            }
            NodeData::Empty => self.push(";"),

            NodeData::SimpleName { ident } => self.ident(*ident),
            NodeData::QualifiedName { qualifier: lhs, name }
            | NodeData::FieldAccess { target: lhs, name } => {
                self.node(*lhs);
                self.push(".");
                self.node(*name);
            }
            NodeData::MethodCall { target, name, args } => {
                if let Some(target) = target {
                    self.node(*target);
                    self.push(".");
                }
                self.node(*name);
                self.args(args);
            }
            NodeData::SuperMethodCall { name, args } => {
                self.push("super.");
                self.node(*name);
                self.args(args);
            }
            NodeData::New {
                ty,
                args,
                anonymous,
            } => {
                self.push("new ");
                self.node(*ty);
                self.args(args);
                if let Some(body) = anonymous {
                    self.push(" ");
                    self.node(*body);
                }
            }
            NodeData::ArrayCreation { ty, dims, init } => {
                let mut elem = *ty;
                let mut depth = 0;
                while let NodeData::ArrayType { elem: inner } = staging.data(elem) {
                    elem = *inner;
                    depth += 1;
                }
                self.push("new ");
                self.node(elem);
                for i in 0..depth {
                    self.push("[");
                    if let Some(&dim) = dims.get(i) {
                        self.node(dim);
                    }
                    self.push("]");
                }
                if let Some(init) = init {
                    self.push(" ");
                    self.node(*init);
                }
            }
            NodeData::ArrayInit { elements } => {
                self.push("{");
                self.list(elements, ", ");
                self.push("}");
            }
            NodeData::Literal { text, .. } => self.ident(*text),
            NodeData::Assign { op, lhs, rhs } => {
                self.node(*lhs);
                self.push(" ");
                self.push(op.as_str());
                self.push(" ");
                self.node(*rhs);
            }
            NodeData::Binary { op, lhs, rhs } => {
                self.node(*lhs);
                self.push(" ");
                self.push(op.as_str());
                self.push(" ");
                self.node(*rhs);
            }
            NodeData::Prefix { op, operand } => {
                self.push(op.as_str());
                self.node(*operand);
            }
            NodeData::Postfix { op, operand } => {
                self.node(*operand);
                self.push(op.as_str());
            }
            NodeData::Cast { ty, expr } => {
                self.push("(");
                self.node(*ty);
                self.push(") ");
                self.node(*expr);
            }
            NodeData::Paren { expr } => {
                self.push("(");
                self.node(*expr);
                self.push(")");
            }
            NodeData::Conditional {
                cond,
                then_expr,
                else_expr,
            } => {
                self.node(*cond);
                self.push(" ? ");
                self.node(*then_expr);
                self.push(" : ");
                self.node(*else_expr);
            }
            NodeData::This => self.push("this"),
            NodeData::InstanceOf { expr, ty } => {
                self.node(*expr);
                self.push(" instanceof ");
                self.node(*ty);
            }
            NodeData::ArrayAccess { array, index } => {
                self.node(*array);
                self.push("[");
                self.node(*index);
                self.push("]");
            }

            NodeData::PrimitiveType { keyword } => self.ident(*keyword),
            NodeData::SimpleType { name } => self.node(*name),
            NodeData::ParameterizedType { base, args } => {
                self.node(*base);
                self.push("<");
                self.list(args, ", ");
                self.push(">");
            }
            NodeData::ArrayType { elem } => {
                self.node(*elem);
                self.push("[]");
            }
        }
    }

    fn list_blank_separated(&mut self, ids: &[NodeId]) {
        for (i, &id) in ids.iter().enumerate() {
            if i > 0 {
                self.newline();
                self.newline();
            }
            self.node(id);
        }
    }
}

/// How members of a list property are separated in source text.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum ListStyle {
    /// One member per line: statements, members, imports, types.
    Lines,
    /// `a, b, c`.
    Comma,
    /// `a b c`: modifiers and catch clauses.
    Space,
    /// No textual separator to manage, e.g. array dimensions.
    Opaque,
}

impl ListStyle {
    pub fn of(property: Property) -> Self {
        match property {
            Property::Statements | Property::Members | Property::Imports | Property::Types => {
                ListStyle::Lines
            }
            Property::Arguments
            | Property::Params
            | Property::Fragments
            | Property::Elements
            | Property::Interfaces
            | Property::TypeArguments
            | Property::Throws
            | Property::Init
            | Property::Update => ListStyle::Comma,
            Property::Modifiers | Property::Catches => ListStyle::Space,
            _ => ListStyle::Opaque,
        }
    }
}
