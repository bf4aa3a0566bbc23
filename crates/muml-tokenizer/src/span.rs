//! Source locations and spans.

use std::fmt;

/// A single position in the source text.
///
/// Only the byte index, the byte index of the start of the line and the
/// line number are tracked; columns are derived on demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "facet", derive(facet::Facet))]
pub struct SourceLocation {
    /// Byte offset into the source.
    pub index: u32,
    /// Byte offset of the first character of the line containing `index`.
    pub line_start: u32,
    /// 1-based line number.
    pub line: u32,
}

impl SourceLocation {
    /// Location of the first byte of a source text.
    pub const START: SourceLocation = SourceLocation {
        index: 0,
        line_start: 0,
        line: 1,
    };

    /// Create a new location.
    #[inline]
    pub fn new(index: u32, line_start: u32, line: u32) -> Self {
        debug_assert!(line_start <= index);
        Self {
            index,
            line_start,
            line,
        }
    }

    /// 1-based column, counted in bytes from the start of the line.
    #[inline]
    pub fn column(&self) -> u32 {
        1 + self.index - self.line_start
    }

    /// Span from this location to `end`.
    #[inline]
    pub fn span_to(self, end: SourceLocation) -> SourceSpan {
        SourceSpan::new(self, end)
    }

    /// Empty span sitting at this location.
    #[inline]
    pub fn to_span(self) -> SourceSpan {
        SourceSpan::new(self, self)
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "L{}:{}", self.line, self.column())
    }
}

/// A start/end pair of source locations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "facet", derive(facet::Facet))]
pub struct SourceSpan {
    /// Inclusive start.
    pub start: SourceLocation,
    /// Exclusive end.
    pub end: SourceLocation,
}

impl SourceSpan {
    /// Create a new span.
    #[inline]
    pub fn new(start: SourceLocation, end: SourceLocation) -> Self {
        debug_assert!(start.index <= end.index);
        Self { start, end }
    }

    /// Length of this span in bytes.
    #[inline]
    pub fn len(&self) -> u32 {
        self.end.index - self.start.index
    }

    /// Whether this span is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start.index == self.end.index
    }

    /// Whether the byte offset lies inside this span.
    #[inline]
    pub fn contains(&self, index: u32) -> bool {
        self.start.index <= index && index < self.end.index
    }

    #[inline]
    pub fn start_column(&self) -> u32 {
        self.start.column()
    }

    #[inline]
    pub fn end_column(&self) -> u32 {
        self.end.column()
    }

    /// Get the source text for this span.
    #[inline]
    pub fn slice<'a>(&self, source: &'a str) -> &'a str {
        &source[self.start.index as usize..self.end.index as usize]
    }
}

impl From<SourceLocation> for SourceSpan {
    fn from(location: SourceLocation) -> Self {
        location.to_span()
    }
}

impl From<SourceSpan> for std::ops::Range<usize> {
    fn from(span: SourceSpan) -> Self {
        span.start.index as usize..span.end.index as usize
    }
}

/// `L3:5` for a single position, `L3:5..9` within one line,
/// `L3:5..L4:1` across lines.
impl fmt::Display for SourceSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.end.line != self.start.line {
            write!(f, "{}..{}", self.start, self.end)
        } else if self.start_column() != self.end_column() {
            write!(
                f,
                "L{}:{}..{}",
                self.start.line,
                self.start_column(),
                self.end_column()
            )
        } else {
            write!(f, "{}", self.start)
        }
    }
}
