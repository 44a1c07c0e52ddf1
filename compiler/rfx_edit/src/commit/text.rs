//! Textual commit: the plan as byte edits on the original source.
//!
//! Only the regions an operation names are rewritten. List membership
//! changes touch the member and the separator next to it, never the
//! neighbours, so comments and layout elsewhere survive byte for byte.

use rfx_ir::{ChildRef, NodeData, NodeId, Property, Span, Tree};

use crate::error::{ApplyError, CommitError};
use crate::layout::{reindent, Layout};
use crate::plan::{Disposition, Insertion, Payload, Plan};
use crate::render::{ListStyle, Printer};
use crate::script::EditScript;
use crate::tracker::{ChangeTracker, TextEdit};

const UNOWNED: &str = "<unowned>";

pub(crate) fn apply(script: &EditScript<'_>, plan: &Plan) -> Result<String, CommitError> {
    let tree = script.tree();
    let layout = Layout::new(tree.source());
    let mut commit = TextCommit {
        script,
        tree,
        plan,
        layout: &layout,
        tracker: ChangeTracker::new(),
        owners: Vec::new(),
    };

    commit.replacements();
    commit.slot_removals();
    for (parent, property) in plan.touched_lists(tree) {
        if commit.moot(parent) {
            continue;
        }
        match ListStyle::of(property) {
            ListStyle::Comma => commit.comma_list(parent, property)?,
            ListStyle::Lines | ListStyle::Space => commit.stacked_list(parent, property)?,
            ListStyle::Opaque => commit.opaque_list(parent, property)?,
        }
    }

    let TextCommit {
        tracker, owners, ..
    } = commit;
    tracker
        .apply_checked(tree.source())
        .map_err(|conflict| CommitError::Apply {
            rule: owners
                .get(conflict.edit2.seq as usize)
                .copied()
                .unwrap_or(UNOWNED),
            error: ApplyError::Overlap {
                start: conflict.edit2.span.start,
                end: conflict.edit1.span.end,
            },
        })
}

/// A new list member, already rendered.
struct Rendered {
    text: String,
    owner: &'static str,
}

struct TextCommit<'a, 't> {
    script: &'a EditScript<'t>,
    tree: &'t Tree,
    plan: &'a Plan,
    layout: &'a Layout<'t>,
    tracker: ChangeTracker,
    /// Owner of each tracker edit, indexed by its seq.
    owners: Vec<&'static str>,
}

impl TextCommit<'_, '_> {
    fn push(&mut self, edit: TextEdit, owner: &'static str) {
        self.tracker.push(edit);
        self.owners.push(owner);
    }

    fn owner_of(&self, node: NodeId) -> &'static str {
        self.plan.owners.get(&node).copied().unwrap_or(UNOWNED)
    }

    /// Edits under an edited node are subsumed by that node's edit.
    fn moot(&self, node: NodeId) -> bool {
        self.plan.disposition.contains_key(&node) || self.plan.covered(self.tree, node)
    }

    fn vacated(&self, node: NodeId) -> bool {
        matches!(
            self.plan.disposition.get(&node),
            Some(Disposition::Removed | Disposition::MovedAway)
        )
    }

    fn render(&self, payload: Payload, indent: &str) -> String {
        match payload {
            Payload::Fragment(fragment) => {
                let mut printer =
                    Printer::new(self.script.staging(), self.tree, self.layout, indent);
                printer.node(fragment.node());
                printer.finish()
            }
            Payload::Original(node) => {
                let span = self.tree.span(node);
                reindent(
                    self.tree.text(span),
                    self.layout.indent_at(span.start),
                    indent,
                )
            }
        }
    }

    fn render_all<'i>(
        &self,
        insertions: impl IntoIterator<Item = &'i Insertion>,
        indent: &str,
    ) -> Vec<Rendered> {
        insertions
            .into_iter()
            .map(|insertion| Rendered {
                text: self.render(insertion.payload, indent),
                owner: insertion.owner,
            })
            .collect()
    }

    fn positional(&self, parent: NodeId, property: Property, index: usize) -> Vec<&Insertion> {
        self.plan
            .at
            .get(&(parent, property))
            .into_iter()
            .flatten()
            .filter(|(i, _)| *i == index)
            .map(|(_, insertion)| insertion)
            .collect()
    }

    fn anchored(&self, anchor: NodeId, after: bool) -> Vec<&Insertion> {
        let map = if after {
            &self.plan.after
        } else {
            &self.plan.before
        };
        map.get(&anchor).into_iter().flatten().collect()
    }

    fn in_comma_list(&self, node: NodeId) -> bool {
        self.tree
            .slot(node)
            .is_some_and(|s| s.is_list_member() && ListStyle::of(s.property) == ListStyle::Comma)
    }

    /// Replacements outside comma lists; those are rewritten per list.
    fn replacements(&mut self) {
        let mut replaced: Vec<_> = self
            .plan
            .disposition
            .iter()
            .filter_map(|(&node, d)| match d {
                Disposition::Replaced(with) => Some((node, *with)),
                _ => None,
            })
            .collect();
        replaced.sort_unstable();
        for (node, with) in replaced {
            if self.plan.covered(self.tree, node) || self.in_comma_list(node) {
                continue;
            }
            let span = self.tree.span(node);
            let text = self.render(Payload::Fragment(with), self.layout.indent_at(span.start));
            self.push(TextEdit::replace(span, text), self.owner_of(node));
        }
    }

    /// Removed or moved-away children of optional slots.
    fn slot_removals(&mut self) {
        let mut vacated: Vec<NodeId> = self
            .plan
            .disposition
            .keys()
            .copied()
            .filter(|&node| self.vacated(node))
            .filter(|&node| self.tree.slot(node).is_some_and(|s| !s.is_list_member()))
            .filter(|&node| !self.plan.covered(self.tree, node))
            .collect();
        vacated.sort_unstable();
        for node in vacated {
            let Some(slot) = self.tree.slot(node) else {
                continue;
            };
            let siblings = self.tree.children(slot.parent);
            let pos = siblings.iter().position(|&s| s == node).unwrap_or(0);
            let span = self.tree.span(node);
            let range = if let Some(&prev) = pos.checked_sub(1).and_then(|p| siblings.get(p)) {
                // ` else {...}`, ` = init`, ` extends B`
                Span::new(self.tree.span(prev).end, span.end)
            } else if let Some(&next) = siblings.get(pos + 1) {
                // `target.` of `target.call()`
                Span::new(span.start, self.tree.span(next).start)
            } else {
                Span::new(self.layout.skip_blanks_back(span.start), span.end)
            };
            self.push(TextEdit::delete(range), self.owner_of(node));
        }
    }

    /// Statement, member and modifier lists: one member per line, or
    /// space separated.
    fn stacked_list(&mut self, parent: NodeId, property: Property) -> Result<(), CommitError> {
        let members = self.tree.list(parent, property).to_vec();
        if members.is_empty() {
            return self.empty_stacked(parent, property);
        }
        let src = self.tree.source();
        let last = members.len() - 1;
        for (i, &member) in members.iter().enumerate() {
            let span = self.tree.span(member);
            let indent = self.layout.indent_at(span.start);
            let mut before = self.positional(parent, property, i);
            before.extend(self.anchored(member, false));
            let mut after = self.anchored(member, true);
            if i == last {
                after.extend(self.positional(parent, property, members.len()));
            }
            let before = self.render_all(before, indent);
            let after = self.render_all(after, indent);
            let removed = self.vacated(member);

            if let Some(whole) = self.layout.whole_lines(span) {
                for item in before {
                    let text = format!("{indent}{}\n", item.text);
                    self.push(TextEdit::insert(whole.start, text), item.owner);
                }
                if removed {
                    self.push(TextEdit::delete(whole), self.owner_of(member));
                }
                let at_eof = whole.end as usize >= src.len() && !src.ends_with('\n');
                for item in after {
                    let text = if at_eof {
                        format!("\n{indent}{}", item.text)
                    } else {
                        format!("{indent}{}\n", item.text)
                    };
                    self.push(TextEdit::insert(whole.end, text), item.owner);
                }
            } else {
                for item in before {
                    let text = format!("{} ", item.text);
                    self.push(TextEdit::insert(span.start, text), item.owner);
                }
                let trail = self.layout.skip_blanks(span.end);
                if removed {
                    self.push(
                        TextEdit::delete(Span::new(span.start, trail)),
                        self.owner_of(member),
                    );
                }
                for item in after {
                    let (at, text) = if removed {
                        (trail, format!("{} ", item.text))
                    } else {
                        (span.end, format!(" {}", item.text))
                    };
                    self.push(TextEdit::insert(at, text), item.owner);
                }
            }
        }
        Ok(())
    }

    /// Insertions into a list with no members yet.
    fn empty_stacked(&mut self, parent: NodeId, property: Property) -> Result<(), CommitError> {
        let insertions = self.positional(parent, property, 0);
        let Some(first) = insertions.first() else {
            return Ok(());
        };
        let owner = first.owner;
        let no_point = || CommitError::Apply {
            rule: owner,
            error: ApplyError::NoInsertionPoint { parent, property },
        };
        let span = self.tree.span(parent);
        let src = self.tree.source();

        match property {
            Property::Statements | Property::Members => {
                let open = self.open_brace(parent).ok_or_else(no_point)?;
                let close = span.end.saturating_sub(1);
                let outer = self.layout.indent_at(open);
                let inner = format!("{outer}{}", self.layout.unit());
                let items = self.render_all(insertions, &inner);
                let mut text: String = items
                    .iter()
                    .map(|item| format!("\n{inner}{}", item.text))
                    .collect();
                if self.layout.has_newline(open, close) {
                    self.push(TextEdit::insert(open + 1, text), owner);
                } else {
                    text.push('\n');
                    text.push_str(outer);
                    self.push(TextEdit::replace(Span::new(open + 1, close), text), owner);
                }
            }
            Property::Imports => {
                let items = self.render_all(insertions, "");
                let package = match self.tree.data(parent) {
                    NodeData::CompilationUnit { package, .. } => *package,
                    _ => None,
                };
                if let Some(package) = package {
                    let text: String = items.iter().map(|i| format!("\n{}", i.text)).collect();
                    let text = format!("\n{text}");
                    self.push(TextEdit::insert(self.tree.span(package).end, text), owner);
                } else {
                    let text: String = items.iter().map(|i| format!("{}\n", i.text)).collect();
                    self.push(TextEdit::insert(0, format!("{text}\n")), owner);
                }
            }
            Property::Types => {
                let items = self.render_all(insertions, "");
                let end = u32::try_from(src.len()).unwrap_or(u32::MAX);
                let lead = if src.is_empty() || src.ends_with('\n') {
                    ""
                } else {
                    "\n"
                };
                let text: String = items.iter().map(|i| format!("{}\n", i.text)).collect();
                self.push(TextEdit::insert(end, format!("{lead}{text}")), owner);
            }
            Property::Modifiers => {
                let items = self.render_all(insertions, self.layout.indent_at(span.start));
                let text: String = items.iter().map(|i| format!("{} ", i.text)).collect();
                self.push(TextEdit::insert(span.start, text), owner);
            }
            _ => return Err(no_point()),
        }
        Ok(())
    }

    /// Offset of the `{` opening a block or type body.
    fn open_brace(&self, parent: NodeId) -> Option<u32> {
        let span = self.tree.span(parent);
        match self.tree.data(parent) {
            NodeData::Block { .. } | NodeData::AnonymousClass { .. } => Some(span.start),
            NodeData::TypeDecl { .. } => {
                // Body is empty here, so every child is part of the header.
                let header_end = self
                    .tree
                    .children(parent)
                    .into_iter()
                    .map(|c| self.tree.span(c).end)
                    .max()
                    .unwrap_or(span.start);
                self.layout.find(header_end, '{')
            }
            _ => None,
        }
    }

    /// Comma lists: rewrite only the gaps around surviving members, so
    /// members that stay keep their text and any edits inside them.
    fn comma_list(&mut self, parent: NodeId, property: Property) -> Result<(), CommitError> {
        let members = self.tree.list(parent, property).to_vec();
        let indent = self.layout.indent_at(self.tree.span(parent).start);

        // `Some(i)` keeps member `i`; `None` is a new item.
        let mut pieces: Vec<Option<usize>> = Vec::new();
        let mut fresh: Vec<Rendered> = Vec::new();
        let mut gap_owner: Option<&'static str> = None;
        for (i, &member) in members.iter().enumerate() {
            let mut before = self.positional(parent, property, i);
            before.extend(self.anchored(member, false));
            for item in self.render_all(before, indent) {
                pieces.push(None);
                fresh.push(item);
            }
            match self.plan.disposition.get(&member) {
                Some(Disposition::Removed | Disposition::MovedAway) => {
                    gap_owner.get_or_insert(self.owner_of(member));
                }
                Some(Disposition::Replaced(with)) => {
                    let span = self.tree.span(member);
                    let text = self.render(Payload::Fragment(*with), indent);
                    self.push(TextEdit::replace(span, text), self.owner_of(member));
                    pieces.push(Some(i));
                }
                None => pieces.push(Some(i)),
            }
            for item in self.render_all(self.anchored(member, true), indent) {
                pieces.push(None);
                fresh.push(item);
            }
        }
        for item in self.render_all(self.positional(parent, property, members.len()), indent) {
            pieces.push(None);
            fresh.push(item);
        }
        let owner = fresh
            .first()
            .map(|r| r.owner)
            .or(gap_owner)
            .unwrap_or(UNOWNED);

        if members.is_empty() {
            let at = self
                .empty_comma_position(parent, property)
                .ok_or(CommitError::Apply {
                    rule: owner,
                    error: ApplyError::NoInsertionPoint { parent, property },
                })?;
            let text = join(fresh.iter().map(|r| r.text.as_str()));
            self.push(TextEdit::insert(at, text), owner);
            return Ok(());
        }

        let span_of = |i: usize| self.tree.span(members[i]);
        let first = span_of(0).start;
        let last = span_of(members.len() - 1).end;
        let kept: Vec<(usize, usize)> = pieces
            .iter()
            .enumerate()
            .filter_map(|(p, piece)| piece.map(|i| (p, i)))
            .collect();
        let new_between = |from: usize, to: usize| -> Vec<&str> {
            let mut skip = pieces[..from].iter().filter(|p| p.is_none()).count();
            let mut out = Vec::new();
            for piece in &pieces[from..to] {
                if piece.is_none() {
                    out.push(fresh[skip].text.as_str());
                    skip += 1;
                }
            }
            out
        };

        let mut edits = Vec::new();
        match (kept.first(), kept.last()) {
            (Some(&(p_first, k_first)), Some(&(p_last, k_last))) => {
                let lead = new_between(0, p_first);
                let region = Span::new(first, span_of(k_first).start);
                if !lead.is_empty() || !region.is_empty() {
                    let text = if lead.is_empty() {
                        String::new()
                    } else {
                        format!("{}, ", join(lead))
                    };
                    edits.push(TextEdit::replace(region, text));
                }
                for pair in kept.windows(2) {
                    let ((pa, ka), (pb, kb)) = (pair[0], pair[1]);
                    let news = new_between(pa + 1, pb);
                    if kb == ka + 1 && news.is_empty() {
                        continue;
                    }
                    let sep = self
                        .tree
                        .text(Span::new(span_of(ka).end, span_of(ka + 1).start))
                        .to_owned();
                    let mut text = sep;
                    if !news.is_empty() {
                        text.push_str(&join(news));
                        text.push_str(", ");
                    }
                    edits.push(TextEdit::replace(
                        Span::new(span_of(ka).end, span_of(kb).start),
                        text,
                    ));
                }
                let tail = new_between(p_last + 1, pieces.len());
                let region = Span::new(span_of(k_last).end, last);
                if !tail.is_empty() || !region.is_empty() {
                    let text = if tail.is_empty() {
                        String::new()
                    } else {
                        format!(", {}", join(tail))
                    };
                    edits.push(TextEdit::replace(region, text));
                }
            }
            _ => {
                let text = join(fresh.iter().map(|r| r.text.as_str()));
                edits.push(TextEdit::replace(Span::new(first, last), text));
            }
        }
        for edit in edits {
            self.push(edit, owner);
        }
        Ok(())
    }

    /// Offset just inside the delimiter that opens an empty comma list.
    fn empty_comma_position(&self, parent: NodeId, property: Property) -> Option<u32> {
        let after = |prop: Property, open: char| {
            let child = match self.tree.data(parent).child(prop)? {
                ChildRef::Single(id) | ChildRef::Optional(Some(id)) => id,
                _ => return None,
            };
            self.layout
                .find(self.tree.span(child).end, open)
                .map(|at| at + 1)
        };
        match (self.tree.data(parent), property) {
            (
                NodeData::MethodCall { .. }
                | NodeData::SuperMethodCall { .. }
                | NodeData::MethodDecl { .. },
                Property::Arguments | Property::Params,
            ) => after(Property::Name, '('),
            (NodeData::New { .. }, Property::Arguments) => after(Property::Type, '('),
            (NodeData::ParameterizedType { .. }, Property::TypeArguments) => {
                after(Property::Type, '<')
            }
            (NodeData::ArrayInit { .. }, Property::Elements) => {
                Some(self.tree.span(parent).start + 1)
            }
            _ => None,
        }
    }

    /// Lists without separators to manage: members can be replaced or
    /// removed in place, but nothing can be inserted.
    fn opaque_list(&mut self, parent: NodeId, property: Property) -> Result<(), CommitError> {
        if let Some((_, first)) = self.plan.at.get(&(parent, property)).and_then(|v| v.first()) {
            return Err(CommitError::Apply {
                rule: first.owner,
                error: ApplyError::NoInsertionPoint { parent, property },
            });
        }
        for member in self.tree.list(parent, property).to_vec() {
            if let Some(insertion) = self
                .anchored(member, false)
                .into_iter()
                .chain(self.anchored(member, true))
                .next()
            {
                return Err(CommitError::Apply {
                    rule: insertion.owner,
                    error: ApplyError::NoInsertionPoint { parent, property },
                });
            }
            if self.vacated(member) {
                let span = self.tree.span(member);
                self.push(TextEdit::delete(span), self.owner_of(member));
            }
        }
        Ok(())
    }
}

fn join<'s>(items: impl IntoIterator<Item = &'s str>) -> String {
    items.into_iter().collect::<Vec<_>>().join(", ")
}
