//! Epoch analysis of one binding over one scope.

use smallvec::SmallVec;
use tracing::{debug, trace};

use rfx_ir::{ensure_sufficient_stack, AssignOp, NodeData, NodeId, Tree, VarKind};

use crate::{AnalysisError, Binding, Scope};

/// A `return` or `throw` reached while the value is live.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct ExitPoint {
    /// The exit statement itself, possibly nested.
    pub statement: NodeId,
    /// Direct statement of the scope holding the exit.
    pub anchor: NodeId,
    /// The exit's own expression reads the value, handing it off.
    pub escapes: bool,
}

/// The span of a binding's lifetime between one assignment and the next.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Epoch {
    /// The declaring fragment or the assignment expression. For parameters,
    /// the parameter itself.
    pub assignment: NodeId,
    /// Direct statement of the scope holding `assignment`; `None` for
    /// parameters, which are live on entry.
    pub start: Option<NodeId>,
    /// Name occurrences reading the value, in source order.
    pub reads: Vec<NodeId>,
    /// Direct statement holding the final read.
    pub last_statement: Option<NodeId>,
    pub exits: SmallVec<[ExitPoint; 2]>,
    /// Direct statement holding the reassignment that ended the epoch.
    pub ended_by: Option<NodeId>,
}

impl Epoch {
    fn new(assignment: NodeId, start: Option<NodeId>) -> Self {
        Epoch {
            assignment,
            start,
            reads: Vec::new(),
            last_statement: None,
            exits: SmallVec::new(),
            ended_by: None,
        }
    }

    /// Statement after which the value is no longer used: the last
    /// statement, or the starting statement when the value is never read.
    pub fn anchor(&self) -> Option<NodeId> {
        self.last_statement.or(self.start)
    }

    /// First read satisfying `pred`, e.g. the receiver of a release call.
    pub fn find_read(&self, pred: impl FnMut(&NodeId) -> bool) -> Option<NodeId> {
        self.reads.iter().copied().find(pred)
    }
}

/// Everything known about one binding within one scope.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LifecycleRecord {
    pub binding: Binding,
    pub scope: Scope,
    pub epochs: Vec<Epoch>,
    /// Direct statements reading the binding, in order, deduplicated.
    pub reading_statements: Vec<NodeId>,
    /// Direct statements assigning the binding, in order, deduplicated.
    pub assigning_statements: Vec<NodeId>,
}

impl LifecycleRecord {
    /// The epoch live at the end of the scope, if any.
    pub fn current(&self) -> Option<&Epoch> {
        self.epochs.last().filter(|e| e.ended_by.is_none())
    }

    /// The epoch started by `assignment`.
    pub fn epoch_of(&self, assignment: NodeId) -> Option<&Epoch> {
        self.epochs.iter().find(|e| e.assignment == assignment)
    }
}

/// Analyze `binding` over `scope`.
///
/// Statements are walked in source order. Any assignment to the binding,
/// at any nesting depth, ends the current epoch; reads in the assigned
/// expression still count for the epoch being ended. A `return` or `throw`
/// reached while an epoch is live is recorded as an exit point of that
/// epoch without ending it, since code after a conditional exit may still
/// run. Methods of nested classes are walked for reads only: their exits
/// leave the nested method, not the scope.
#[tracing::instrument(level = "trace", skip(tree))]
pub fn analyze(
    tree: &Tree,
    binding: &Binding,
    scope: &Scope,
) -> Result<LifecycleRecord, AnalysisError> {
    if !tree.contains(binding.decl) {
        return Err(AnalysisError::Unresolved(binding.decl));
    }
    let mut walker = Walker {
        tree,
        binding: *binding,
        epochs: Vec::new(),
        live: false,
        nested: 0,
        reading: Vec::new(),
        assigning: Vec::new(),
    };
    if binding.kind == VarKind::Param {
        walker.epochs.push(Epoch::new(binding.decl, None));
        walker.live = true;
    }
    for &stmt in scope.statements(tree) {
        walker.node(stmt, stmt);
    }

    let Walker {
        epochs,
        reading,
        assigning,
        ..
    } = walker;
    debug!(
        var = binding.var.index(),
        epochs = epochs.len(),
        reads = epochs.iter().map(|e| e.reads.len()).sum::<usize>(),
        "lifecycle analyzed"
    );
    Ok(LifecycleRecord {
        binding: *binding,
        scope: *scope,
        epochs,
        reading_statements: reading,
        assigning_statements: assigning,
    })
}

struct Walker<'t> {
    tree: &'t Tree,
    binding: Binding,
    epochs: Vec<Epoch>,
    /// An epoch is open and its value may be read.
    live: bool,
    /// Depth of method declarations entered below the scope.
    nested: u32,
    reading: Vec<NodeId>,
    assigning: Vec<NodeId>,
}

impl Walker<'_> {
    fn names_binding(&self, expr: NodeId) -> bool {
        self.binding.is_named_by(self.tree, expr)
    }

    fn node(&mut self, id: NodeId, stmt: NodeId) {
        ensure_sufficient_stack(|| self.node_inner(id, stmt));
    }

    fn node_inner(&mut self, id: NodeId, stmt: NodeId) {
        let tree = self.tree;
        match tree.data(id) {
            NodeData::VarFragment { init, .. } if id == self.binding.decl => {
                if let Some(init) = *init {
                    self.node(init, stmt);
                    self.assign(id, stmt);
                }
            }
            NodeData::Assign { op, lhs, rhs } if self.names_binding(*lhs) => {
                if *op != AssignOp::Assign {
                    self.read(*lhs, stmt);
                }
                self.node(*rhs, stmt);
                self.assign(id, stmt);
            }
            NodeData::SimpleName { .. } => {
                if self.tree.bindings().var_of(id) == Some(self.binding.var) {
                    self.read(id, stmt);
                }
            }
            NodeData::Return { value } => {
                let escapes = value.is_some_and(|v| self.reads_binding(v));
                if let Some(value) = *value {
                    self.node(value, stmt);
                }
                self.exit(id, stmt, escapes);
            }
            NodeData::Throw { value } => {
                let escapes = self.reads_binding(*value);
                self.node(*value, stmt);
                self.exit(id, stmt, escapes);
            }
            NodeData::MethodDecl { .. } => {
                self.nested += 1;
                for child in tree.data(id).child_ids() {
                    self.node(child, stmt);
                }
                self.nested -= 1;
            }
            data => {
                for child in data.child_ids() {
                    self.node(child, stmt);
                }
            }
        }
    }

    fn reads_binding(&self, expr: NodeId) -> bool {
        self.tree
            .descendants(expr)
            .into_iter()
            .any(|n| self.tree.bindings().var_of(n) == Some(self.binding.var))
    }

    fn read(&mut self, name: NodeId, stmt: NodeId) {
        if !self.live {
            return;
        }
        let Some(epoch) = self.epochs.last_mut() else {
            return;
        };
        trace!(?name, ?stmt, "read");
        epoch.reads.push(name);
        epoch.last_statement = Some(stmt);
        if self.reading.last() != Some(&stmt) {
            self.reading.push(stmt);
        }
    }

    fn assign(&mut self, assignment: NodeId, stmt: NodeId) {
        trace!(?assignment, ?stmt, "epoch starts");
        if self.live {
            if let Some(epoch) = self.epochs.last_mut() {
                epoch.ended_by = Some(stmt);
            }
        }
        self.epochs.push(Epoch::new(assignment, Some(stmt)));
        self.live = true;
        if self.assigning.last() != Some(&stmt) {
            self.assigning.push(stmt);
        }
    }

    fn exit(&mut self, statement: NodeId, anchor: NodeId, escapes: bool) {
        if !self.live || self.nested > 0 {
            return;
        }
        if let Some(epoch) = self.epochs.last_mut() {
            trace!(?statement, escapes, "exit");
            epoch.exits.push(ExitPoint {
                statement,
                anchor,
                escapes,
            });
        }
    }
}
