//! Text edit tracking.
//!
//! Edits are accumulated and then applied in reverse order (from end to
//! start) so earlier spans stay valid while later text grows or shrinks.
//! Insertions at the same offset land in the order they were pushed.
//!
//! # Example
//!
//! ```
//! use rfx_edit::ChangeTracker;
//! use rfx_ir::Span;
//!
//! let mut tracker = ChangeTracker::new();
//! tracker.insert(4, "mut ");
//! tracker.replace(Span::new(8, 10), "100");
//! assert_eq!(tracker.apply_checked("let x = 42;").ok(), Some("let mut x = 100;".to_owned()));
//! ```

use std::fmt;

use rfx_ir::Span;

/// A text edit against the original source.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct TextEdit {
    /// The span to replace (empty span for insert).
    pub span: Span,
    /// The new text.
    pub new_text: String,
    /// Push order; orders insertions at one offset.
    pub seq: u32,
}

impl TextEdit {
    pub fn replace(span: Span, new_text: impl Into<String>) -> Self {
        TextEdit {
            span,
            new_text: new_text.into(),
            seq: 0,
        }
    }

    pub fn insert(at: u32, text: impl Into<String>) -> Self {
        TextEdit::replace(Span::point(at), text)
    }

    pub fn delete(span: Span) -> Self {
        TextEdit::replace(span, String::new())
    }

    pub fn is_insert(&self) -> bool {
        self.span.is_empty() && !self.new_text.is_empty()
    }

    pub fn is_delete(&self) -> bool {
        self.new_text.is_empty() && !self.span.is_empty()
    }

    /// Length change this edit causes; negative when text shrinks.
    pub fn length_delta(&self) -> i64 {
        let removed = i64::from(self.span.len());
        let added = i64::try_from(self.new_text.len()).unwrap_or(i64::MAX);
        added - removed
    }
}

/// Two edits touch overlapping text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EditConflict {
    pub edit1: TextEdit,
    pub edit2: TextEdit,
}

impl fmt::Display for EditConflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "edits overlap: {:?} and {:?}",
            self.edit1.span, self.edit2.span
        )
    }
}

impl std::error::Error for EditConflict {}

/// Collects text edits and applies them in a single pass.
#[derive(Clone, Debug, Default)]
pub struct ChangeTracker {
    edits: Vec<TextEdit>,
    next_seq: u32,
}

impl ChangeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn replace(&mut self, span: Span, text: impl Into<String>) {
        self.push(TextEdit::replace(span, text));
    }

    pub fn insert(&mut self, at: u32, text: impl Into<String>) {
        self.push(TextEdit::insert(at, text));
    }

    pub fn delete(&mut self, span: Span) {
        self.push(TextEdit::delete(span));
    }

    /// Add an edit, stamping it with the next sequence number.
    pub fn push(&mut self, mut edit: TextEdit) {
        edit.seq = self.next_seq;
        self.next_seq += 1;
        self.edits.push(edit);
    }

    pub fn len(&self) -> usize {
        self.edits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    pub fn edits(&self) -> &[TextEdit] {
        &self.edits
    }

    /// First pair of edits whose ranges overlap. Edits that merely touch,
    /// and insertions sharing an offset, do not conflict.
    pub fn check_conflicts(&self) -> Option<EditConflict> {
        let mut sorted: Vec<&TextEdit> = self.edits.iter().collect();
        sorted.sort_by_key(|e| (e.span.start, e.span.end, e.seq));

        let mut widest: Option<&TextEdit> = None;
        for edit in sorted {
            if let Some(prev) = widest {
                if edit.span.start < prev.span.end {
                    return Some(EditConflict {
                        edit1: prev.clone(),
                        edit2: edit.clone(),
                    });
                }
            }
            if widest.map_or(true, |w| edit.span.end >= w.span.end) {
                widest = Some(edit);
            }
        }
        None
    }

    /// Apply every edit to `source`, end to start.
    pub fn apply(&self, source: &str) -> String {
        if self.edits.is_empty() {
            return source.to_owned();
        }

        let mut sorted: Vec<&TextEdit> = self.edits.iter().collect();
        sorted.sort_by(|a, b| {
            b.span
                .start
                .cmp(&a.span.start)
                .then(b.span.end.cmp(&a.span.end))
                .then(b.seq.cmp(&a.seq))
        });

        let mut result = source.to_owned();
        for edit in sorted {
            let start = (edit.span.start as usize).min(result.len());
            let end = (edit.span.end as usize).min(result.len()).max(start);
            result.replace_range(start..end, &edit.new_text);
        }
        result
    }

    pub fn apply_checked(&self, source: &str) -> Result<String, EditConflict> {
        if let Some(conflict) = self.check_conflicts() {
            return Err(conflict);
        }
        Ok(self.apply(source))
    }

    pub fn total_delta(&self) -> i64 {
        self.edits.iter().map(TextEdit::length_delta).sum()
    }
}

#[cfg(test)]
mod tests;
