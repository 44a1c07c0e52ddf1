//! Small rules and helpers shared by unit tests.

use std::sync::Mutex;

use rfx_ir::{KindSet, NodeData, NodeId, NodeKind, ProjectOptions, StringInterner, Tree};

use crate::{Rule, RuleContext, RuleError, Visit};

pub(crate) fn parse(source: &str) -> Tree {
    rfx_parse::parse(source, StringInterner::shared()).unwrap()
}

/// Renames calls of one method to another.
pub(crate) struct Rename {
    pub name: &'static str,
    pub from: &'static str,
    pub to: &'static str,
}

impl Rule for Rename {
    fn name(&self) -> &'static str {
        self.name
    }

    fn description(&self) -> &'static str {
        "rename a method call"
    }

    fn interest(&self) -> KindSet {
        KindSet::of(NodeKind::MethodCall)
    }

    fn visit(&self, node: NodeId, cx: &mut RuleContext<'_, '_>) -> Result<Visit, RuleError> {
        let tree = cx.tree();
        let NodeData::MethodCall { name, .. } = tree.data(node) else {
            return Ok(Visit::Descend);
        };
        if tree.is_ident(*name, self.from) {
            let with = cx.builder().name(self.to);
            cx.replace(*name, with);
        }
        Ok(Visit::Descend)
    }
}

/// Records the source text of every node it is offered.
pub(crate) struct Recorder {
    pub name: &'static str,
    pub kinds: KindSet,
    /// Return `SkipSubtree` for nodes of this kind.
    pub skip: Option<NodeKind>,
    /// Only runs on Android projects.
    pub android_only: bool,
    pub seen: Mutex<Vec<String>>,
}

impl Recorder {
    pub(crate) fn new(name: &'static str, kinds: KindSet) -> Self {
        Recorder {
            name,
            kinds,
            skip: None,
            android_only: false,
            seen: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn android_only(mut self) -> Self {
        self.android_only = true;
        self
    }

    pub(crate) fn skipping(mut self, kind: NodeKind) -> Self {
        self.skip = Some(kind);
        self
    }

    pub(crate) fn seen(&self) -> Vec<String> {
        self.seen.lock().unwrap().clone()
    }
}

impl Rule for Recorder {
    fn name(&self) -> &'static str {
        self.name
    }

    fn description(&self) -> &'static str {
        "record visited nodes"
    }

    fn interest(&self) -> KindSet {
        self.kinds
    }

    fn applies_to(&self, options: &ProjectOptions) -> bool {
        options.android || !self.android_only
    }

    fn visit(&self, node: NodeId, cx: &mut RuleContext<'_, '_>) -> Result<Visit, RuleError> {
        let tree = cx.tree();
        self.seen
            .lock()
            .unwrap()
            .push(tree.text(tree.span(node)).to_owned());
        if self.skip == Some(tree.kind(node)) {
            return Ok(Visit::SkipSubtree);
        }
        Ok(Visit::Descend)
    }
}

/// Removes the first statement it sees, then fails or panics.
pub(crate) struct Faulty {
    pub panic: bool,
}

impl Rule for Faulty {
    fn name(&self) -> &'static str {
        if self.panic {
            "panicky"
        } else {
            "failing"
        }
    }

    fn description(&self) -> &'static str {
        "propose, then fail"
    }

    fn interest(&self) -> KindSet {
        KindSet::of(NodeKind::ExprStmt)
    }

    fn visit(&self, node: NodeId, cx: &mut RuleContext<'_, '_>) -> Result<Visit, RuleError> {
        if cx.first_time("faulty") {
            cx.remove(node);
            return Ok(Visit::Descend);
        }
        if self.panic {
            panic!("boom");
        }
        Err(RuleError::failed("gave up"))
    }
}
