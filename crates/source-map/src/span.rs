//! Byte spans.

use text_size::TextSize;

/// A byte offset into a source string.
pub type ByteOffset = TextSize;

/// A half-open byte range `[start, end)` into a source string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Span {
    /// First byte (inclusive).
    pub start: ByteOffset,
    /// Last byte (exclusive).
    pub end: ByteOffset,
}

impl Span {
    #[inline]
    pub fn new(start: impl Into<ByteOffset>, end: impl Into<ByteOffset>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
        }
    }

    /// Creates a span from `usize` offsets, as produced by `str` searching.
    #[inline]
    pub fn from_usize(start: usize, end: usize) -> Self {
        Self::new(TextSize::from(start as u32), TextSize::from(end as u32))
    }

    /// A zero-width span, used for positions such as end of input.
    #[inline]
    pub fn empty(offset: impl Into<ByteOffset>) -> Self {
        let offset = offset.into();
        Self::new(offset, offset)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// Returns the text covered by this span, or `None` if it is out of bounds
    /// or does not fall on character boundaries.
    pub fn slice(self, text: &str) -> Option<&str> {
        text.get(usize::from(self.start)..usize::from(self.end))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty() {
        assert!(Span::empty(3u32).is_empty());
        assert!(!Span::from_usize(3, 4).is_empty());
        assert_eq!(Span::default(), Span::empty(0u32));
    }

    #[test]
    fn test_slice() {
        let text = ".a { color: red; }";
        assert_eq!(Span::from_usize(5, 10).slice(text), Some("color"));
        assert_eq!(Span::from_usize(5, 100).slice(text), None);
        assert_eq!(Span::from_usize(2, 2).slice(text), Some(""));
    }

    #[test]
    fn test_slice_respects_char_boundaries() {
        let text = "é";
        assert_eq!(Span::from_usize(0, 1).slice(text), None);
        assert_eq!(Span::from_usize(0, 2).slice(text), Some("é"));
    }
}
