//! Byte offsets into a document.
//! 文档中的字节偏移。

use std::fmt;
use std::ops::Range;

/// Byte offset of a token boundary.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct BytePos(pub u32);

impl fmt::Debug for BytePos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.0)
    }
}

impl From<usize> for BytePos {
    fn from(pos: usize) -> Self {
        BytePos(pos as u32)
    }
}

impl From<BytePos> for usize {
    fn from(pos: BytePos) -> Self {
        pos.0 as usize
    }
}

/// Text covered by a token or an embedded region, `[start, end)`.
/// 词法单元或嵌入区域覆盖的文本。
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    pub start: BytePos,
    pub end: BytePos,
}

impl Span {
    pub fn from_usize(start: usize, end: usize) -> Self {
        Span {
            start: start.into(),
            end: end.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.range().len()
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    pub fn contains(&self, offset: usize) -> bool {
        self.range().contains(&offset)
    }

    /// The span as a slice range into the document text.
    pub fn range(&self) -> Range<usize> {
        usize::from(self.start)..usize::from(self.end)
    }
}

impl fmt::Debug for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start.0, self.end.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_is_half_open() {
        let span = Span::from_usize(4, 8);
        assert!(span.contains(4));
        assert!(span.contains(7));
        assert!(!span.contains(8));
    }

    #[test]
    fn test_debug_output() {
        assert_eq!(format!("{:?}", Span::from_usize(2, 5)), "2..5");
        assert_eq!(format!("{:?}", BytePos(7)), "@7");
    }
}
