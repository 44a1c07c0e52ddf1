//! Line and indentation queries over the original source text.

use rfx_ir::Span;

const DEFAULT_UNIT: &str = "    ";

pub(crate) struct Layout<'a> {
    src: &'a str,
    unit: String,
}

impl<'a> Layout<'a> {
    pub fn new(src: &'a str) -> Self {
        Layout {
            src,
            unit: detect_unit(src),
        }
    }

    /// One level of indentation as the file writes it.
    pub fn unit(&self) -> &str {
        &self.unit
    }

    fn len(&self) -> u32 {
        u32::try_from(self.src.len()).unwrap_or(u32::MAX)
    }

    fn byte(&self, pos: u32) -> Option<u8> {
        self.src.as_bytes().get(pos as usize).copied()
    }

    pub fn line_start(&self, pos: u32) -> u32 {
        let end = (pos as usize).min(self.src.len());
        self.src[..end]
            .rfind('\n')
            .map_or(0, |i| u32::try_from(i + 1).unwrap_or(u32::MAX))
    }

    /// Offset of the newline ending the line holding `pos`, or end of text.
    pub fn line_end(&self, pos: u32) -> u32 {
        let start = (pos as usize).min(self.src.len());
        self.src[start..]
            .find('\n')
            .map_or(self.len(), |i| u32::try_from(start + i).unwrap_or(u32::MAX))
    }

    /// Leading whitespace of the line holding `pos`.
    pub fn indent_at(&self, pos: u32) -> &'a str {
        let start = self.line_start(pos) as usize;
        let line = &self.src[start..];
        let width = line.len() - line.trim_start_matches([' ', '\t']).len();
        &line[..width]
    }

    /// Only blanks precede `pos` on its line.
    pub fn starts_line(&self, pos: u32) -> bool {
        let start = self.line_start(pos) as usize;
        self.src[start..(pos as usize).min(self.src.len())]
            .bytes()
            .all(is_blank)
    }

    /// Only blanks follow `pos` on its line.
    pub fn ends_line(&self, pos: u32) -> bool {
        let end = self.line_end(pos) as usize;
        self.src[(pos as usize).min(end)..end]
            .bytes()
            .all(|b| is_blank(b) || b == b'\r')
    }

    /// The full lines `span` occupies, newline included, when nothing else
    /// shares them.
    pub fn whole_lines(&self, span: Span) -> Option<Span> {
        if !self.starts_line(span.start) || !self.ends_line(span.end) {
            return None;
        }
        let end = (self.line_end(span.end) + 1).min(self.len());
        Some(Span::new(self.line_start(span.start), end))
    }

    pub fn skip_blanks(&self, mut pos: u32) -> u32 {
        while self.byte(pos).is_some_and(is_blank) {
            pos += 1;
        }
        pos
    }

    pub fn skip_blanks_back(&self, mut pos: u32) -> u32 {
        while pos > 0 && self.byte(pos - 1).is_some_and(is_blank) {
            pos -= 1;
        }
        pos
    }

    /// Skip blanks and newlines backwards.
    pub fn skip_space_back(&self, mut pos: u32) -> u32 {
        while pos > 0 && self.byte(pos - 1).is_some_and(|b| b.is_ascii_whitespace()) {
            pos -= 1;
        }
        pos
    }

    /// First `ch` at or after `pos`.
    pub fn find(&self, pos: u32, ch: char) -> Option<u32> {
        let start = (pos as usize).min(self.src.len());
        self.src[start..]
            .find(ch)
            .and_then(|i| u32::try_from(start + i).ok())
    }

    /// Whether the text between two offsets has a line break.
    pub fn has_newline(&self, from: u32, to: u32) -> bool {
        let (from, to) = (from as usize, (to as usize).min(self.src.len()));
        from < to && self.src[from..to].contains('\n')
    }
}

fn is_blank(b: u8) -> bool {
    b == b' ' || b == b'\t'
}

/// Smallest non-zero indentation in the file, or four spaces.
fn detect_unit(src: &str) -> String {
    let mut smallest: Option<&str> = None;
    for line in src.lines() {
        let width = line.len() - line.trim_start_matches([' ', '\t']).len();
        if width == 0 || width == line.len() {
            continue;
        }
        let indent = &line[..width];
        if indent.starts_with('\t') {
            return "\t".to_owned();
        }
        if smallest.map_or(true, |s| indent.len() < s.len()) {
            smallest = Some(indent);
        }
    }
    smallest.unwrap_or(DEFAULT_UNIT).to_owned()
}

/// Shift every line after the first from indentation `from` to `to`.
pub(crate) fn reindent(text: &str, from: &str, to: &str) -> String {
    if from == to || !text.contains('\n') {
        return text.to_owned();
    }
    let mut out = String::with_capacity(text.len());
    for (i, line) in text.split('\n').enumerate() {
        if i > 0 {
            out.push('\n');
            if let Some(rest) = line.strip_prefix(from) {
                out.push_str(to);
                out.push_str(rest);
                continue;
            }
        }
        out.push_str(line);
    }
    out
}

#[cfg(test)]
mod tests;
