//! Line index for offset → line/column conversion.

use crate::{ByteOffset, Span};
use text_size::TextSize;

/// A line and column position (0-indexed).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LineCol {
    /// 0-indexed line number.
    pub line: u32,
    /// 0-indexed column (byte offset within the line).
    pub col: u32,
}

impl LineCol {
    /// Creates a new line/column position.
    #[inline]
    pub fn new(line: u32, col: u32) -> Self {
        Self { line, col }
    }
}

/// One line of source text, without its line terminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Line<'a> {
    /// 0-indexed line number.
    pub number: u32,
    /// Where the line sits in the source.
    pub span: Span,
    /// The line's text.
    pub text: &'a str,
}

/// Start offsets of every line in a text, for O(log n) position lookups.
#[derive(Debug, Clone)]
pub struct LineIndex {
    line_starts: Vec<ByteOffset>,
    len: ByteOffset,
}

impl LineIndex {
    /// Creates a new line index from source text.
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![TextSize::from(0)];
        line_starts.extend(
            text.match_indices('\n')
                .map(|(offset, _)| TextSize::from((offset + 1) as u32)),
        );

        Self {
            line_starts,
            len: TextSize::from(text.len() as u32),
        }
    }

    /// Returns the number of lines in the source.
    #[inline]
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Converts a byte offset to a line/column position.
    ///
    /// Returns `None` if the offset lies past the end of the text.
    pub fn line_col(&self, offset: ByteOffset) -> Option<LineCol> {
        if offset > self.len {
            return None;
        }

        let line = match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(line) => line.saturating_sub(1),
        };
        let col = u32::from(offset) - u32::from(self.line_starts[line]);

        Some(LineCol::new(line as u32, col))
    }

    /// Returns the byte offset where a line starts.
    pub fn line_start(&self, line: u32) -> Option<ByteOffset> {
        self.line_starts.get(line as usize).copied()
    }

    /// Returns the span of a line, excluding its `\n` (and a preceding `\r`).
    pub fn line_span(&self, line: u32, text: &str) -> Option<Span> {
        let start = self.line_start(line)?;
        let mut end = self
            .line_starts
            .get(line as usize + 1)
            .map(|&next| next - TextSize::from(1))
            .unwrap_or(self.len);

        if end > start && text.as_bytes().get(usize::from(end) - 1) == Some(&b'\r') {
            end = end - TextSize::from(1);
        }

        Some(Span::new(start, end))
    }

    /// Iterates over every line of `text`, which must be the text this index
    /// was built from.
    pub fn lines<'a>(&'a self, text: &'a str) -> impl Iterator<Item = Line<'a>> + 'a {
        (0..self.line_count() as u32).filter_map(move |number| {
            let span = self.line_span(number, text)?;
            Some(Line {
                number,
                span,
                text: span.slice(text)?,
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_single_line() {
        let index = LineIndex::new("hello world");
        assert_eq!(index.line_count(), 1);
        assert_eq!(index.line_col(TextSize::from(0)), Some(LineCol::new(0, 0)));
        assert_eq!(index.line_col(TextSize::from(5)), Some(LineCol::new(0, 5)));
        assert_eq!(index.line_col(TextSize::from(12)), None);
    }

    #[test]
    fn test_multiple_lines() {
        let index = LineIndex::new("hello\nworld\nfoo");
        assert_eq!(index.line_count(), 3);
        assert_eq!(index.line_col(TextSize::from(5)), Some(LineCol::new(0, 5)));
        assert_eq!(index.line_col(TextSize::from(6)), Some(LineCol::new(1, 0)));
        assert_eq!(index.line_col(TextSize::from(10)), Some(LineCol::new(1, 4)));
        assert_eq!(index.line_col(TextSize::from(12)), Some(LineCol::new(2, 0)));
    }

    #[test]
    fn test_lines_strip_terminators() {
        let text = "<style>\r\n.a { color: red; }\n</style>";
        let index = LineIndex::new(text);
        let lines: Vec<&str> = index.lines(text).map(|line| line.text).collect();
        assert_eq!(lines, vec!["<style>", ".a { color: red; }", "</style>"]);
    }

    #[test]
    fn test_trailing_newline_yields_empty_last_line() {
        let text = "a\n";
        let index = LineIndex::new(text);
        let lines: Vec<Line> = index.lines(text).collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1].text, "");
        assert_eq!(lines[1].span, Span::from_usize(2, 2));
    }
}
