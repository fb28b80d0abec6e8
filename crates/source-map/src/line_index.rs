//! Row/column lookup for byte offsets.

use crate::ByteOffset;
use text_size::TextSize;

/// A zero-based row and byte column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct LineCol {
    pub line: u32,
    /// Bytes from the start of the line, not chars.
    pub col: u32,
}

impl LineCol {
    #[inline]
    pub fn new(line: u32, col: u32) -> Self {
        Self { line, col }
    }
}

/// Offsets at which each line of a source begins.
///
/// Built once per source. Lookups binary-search the starts, so the reporter
/// and the JSON output can resolve every error without rescanning.
#[derive(Debug, Clone)]
pub struct LineIndex {
    starts: Vec<ByteOffset>,
    end: ByteOffset,
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        let starts = std::iter::once(TextSize::from(0))
            .chain(
                text.match_indices('\n')
                    .map(|(at, _)| TextSize::from(at as u32 + 1)),
            )
            .collect();

        Self {
            starts,
            end: TextSize::from(text.len() as u32),
        }
    }

    /// Resolves `offset`, or `None` if it lies past the end of the text.
    pub fn line_col(&self, offset: ByteOffset) -> Option<LineCol> {
        if offset > self.end {
            return None;
        }

        // Number of starts at or before `offset`, minus one.
        let line = self.starts.partition_point(|&start| start <= offset) - 1;
        Some(LineCol::new(
            line as u32,
            u32::from(offset - self.starts[line]),
        ))
    }

    /// [`LineIndex::line_col`] with offsets past the end pinned to the end.
    pub fn line_col_clamped(&self, offset: ByteOffset) -> LineCol {
        self.line_col(offset.min(self.end)).unwrap_or_default()
    }

    pub fn line_start(&self, line: u32) -> Option<ByteOffset> {
        self.starts.get(line as usize).copied()
    }

    /// The text of `line` without its line terminator.
    pub fn line_text<'a>(&self, line: u32, text: &'a str) -> Option<&'a str> {
        let start = u32::from(self.line_start(line)?) as usize;
        let end = match self.line_start(line + 1) {
            Some(next) => u32::from(next) as usize - 1,
            None => u32::from(self.end) as usize,
        };
        let row = text.get(start..end)?;
        Some(row.strip_suffix('\r').unwrap_or(row))
    }
}
