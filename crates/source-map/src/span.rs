//! Byte spans into a borrowed source buffer.

use std::ops::Range;
use text_size::TextSize;

/// A byte offset into a source string.
pub type ByteOffset = TextSize;

/// A half-open byte range `[start, end)`.
///
/// Spans never own text. Tree nodes, tokens and errors all store spans and
/// resolve them against the source with [`Span::slice`] when needed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    /// First byte (inclusive).
    pub start: ByteOffset,
    /// One past the last byte.
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

    /// Builds a span from `usize` offsets.
    ///
    /// The parser rejects sources longer than `u32::MAX` up front, so the
    /// narrowing never truncates.
    #[inline]
    pub fn from_usize(start: usize, end: usize) -> Self {
        Self::new(start as u32, end as u32)
    }

    /// A zero-width span at `offset`.
    #[inline]
    pub fn empty(offset: impl Into<ByteOffset>) -> Self {
        let offset = offset.into();
        Self::new(offset, offset)
    }

    #[inline]
    pub fn len(&self) -> TextSize {
        self.end - self.start
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Whether `offset` lies in `[start, end)`.
    #[inline]
    pub fn contains(&self, offset: ByteOffset) -> bool {
        (self.start..self.end).contains(&offset)
    }

    /// Whether `offset` lies in `[start, end]`, so a cursor sitting right
    /// after the span still counts.
    #[inline]
    pub fn contains_inclusive(&self, offset: ByteOffset) -> bool {
        (self.start..=self.end).contains(&offset)
    }

    /// The smallest span enclosing both.
    #[inline]
    pub fn cover(self, other: Span) -> Span {
        Span::new(self.start.min(other.start), self.end.max(other.end))
    }

    #[inline]
    pub fn range(self) -> Range<usize> {
        u32::from(self.start) as usize..u32::from(self.end) as usize
    }

    /// The text under the span, or `""` if it falls outside `src` or off a
    /// char boundary.
    #[inline]
    pub fn slice(self, src: &str) -> &str {
        src.get(self.range()).unwrap_or("")
    }
}

impl From<Range<usize>> for Span {
    fn from(range: Range<usize>) -> Self {
        Span::from_usize(range.start, range.end)
    }
}
