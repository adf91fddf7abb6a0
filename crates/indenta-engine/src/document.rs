//! Document abstraction.
//! 文档抽象。
//!
//! The engine reads text and line geometry through [`IndentDocument`] and
//! writes leading whitespace back in a single [`IndentDocument::apply_edits`]
//! call. [`TextDocument`] is the in-memory implementation.

use indenta_common::LanguageId;

use crate::error::{IndentError, IndentResult};

/// A host document as seen by the indenter. Lines are 0-based.
/// 缩进器所见的宿主文档，行号从 0 开始。
pub trait IndentDocument {
    /// Length of the document in bytes.
    fn len(&self) -> usize;

    /// Text of `[start, end)`.
    fn text(&self, start: usize, end: usize) -> IndentResult<&str>;

    /// Number of lines. A trailing newline starts a final empty line.
    fn line_count(&self) -> usize;

    /// Line containing `offset`; `offset == len()` is the last line.
    fn line_of_offset(&self, offset: usize) -> IndentResult<usize>;

    /// Start offset of a line, `None` if the line does not exist.
    fn line_start(&self, line: usize) -> Option<usize>;

    /// Replace leading whitespace of several lines as one atomic change.
    fn apply_edits(&mut self, edits: &[IndentEdit]) -> IndentResult<()>;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn bad_location(&self, offset: usize) -> IndentError {
        IndentError::BadLocation {
            offset,
            len: self.len(),
        }
    }

    /// Start of the row containing `offset`.
    fn row_start(&self, offset: usize) -> IndentResult<usize> {
        let line = self.line_of_offset(offset)?;
        self.line_start(line).ok_or_else(|| self.bad_location(offset))
    }

    /// Offset of the line break ending the row containing `offset`, or the
    /// document length on the last line.
    fn row_end(&self, offset: usize) -> IndentResult<usize> {
        let line = self.line_of_offset(offset)?;
        Ok(match self.line_start(line + 1) {
            Some(next) => next - 1,
            None => self.len(),
        })
    }

    /// First non-whitespace offset on the row containing `offset`.
    fn first_non_white(&self, offset: usize) -> IndentResult<Option<usize>> {
        let start = self.row_start(offset)?;
        let end = self.row_end(offset)?;
        let row = self.text(start, end)?;
        Ok(row
            .char_indices()
            .find(|(_, c)| !c.is_whitespace())
            .map(|(i, _)| start + i))
    }

    /// Width in columns of the leading whitespace of the row containing
    /// `offset`, expanding tabs to `tab_size` stops.
    fn existing_indent(&self, offset: usize, tab_size: usize) -> IndentResult<usize> {
        let start = self.row_start(offset)?;
        let end = self.row_end(offset)?;
        Ok(indent_width(self.text(start, end)?, tab_size))
    }

    /// Byte length of the leading whitespace of the row containing `offset`.
    fn leading_whitespace_len(&self, offset: usize) -> IndentResult<usize> {
        let start = self.row_start(offset)?;
        let end = self.row_end(offset)?;
        let row = self.text(start, end)?;
        Ok(row.len() - row.trim_start_matches([' ', '\t']).len())
    }
}

/// Measure leading whitespace of `row` in columns.
pub fn indent_width(row: &str, tab_size: usize) -> usize {
    let tab_size = tab_size.max(1);
    let mut columns = 0;
    for c in row.chars() {
        match c {
            ' ' => columns += 1,
            '\t' => columns = (columns / tab_size + 1) * tab_size,
            _ => break,
        }
    }
    columns
}

/// Tells which language owns a document offset.
///
/// Used to decide whether a blank line belongs to a formatter.
pub trait LanguageLayout {
    fn language_at(&self, offset: usize) -> Option<LanguageId>;
}

/// A single-language document.
impl LanguageLayout for LanguageId {
    fn language_at(&self, _offset: usize) -> Option<LanguageId> {
        Some(*self)
    }
}

/// Replacement of one line's leading whitespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndentEdit {
    /// Start offset of the line.
    pub offset: usize,
    /// Bytes of existing leading whitespace to replace.
    pub remove: usize,
    /// New leading whitespace.
    pub insert: String,
}

impl IndentEdit {
    /// Offset delta this edit causes for text after it.
    pub fn delta(&self) -> i64 {
        self.insert.len() as i64 - self.remove as i64
    }

    pub fn change(&self) -> DocumentChange {
        DocumentChange {
            offset: self.offset,
            delta: self.delta(),
        }
    }
}

/// An offset shift caused by a document modification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocumentChange {
    pub offset: usize,
    pub delta: i64,
}

/// In-memory document with a line index.
/// 带行索引的内存文档。
#[derive(Debug, Clone)]
pub struct TextDocument {
    text: String,
    line_starts: Vec<usize>,
    version: u64,
}

impl TextDocument {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let line_starts = compute_line_starts(&text);
        Self {
            text,
            line_starts,
            version: 0,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn into_string(self) -> String {
        self.text
    }

    /// Incremented on every modification.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Replace `[start, end)` with `replacement`.
    pub fn replace(&mut self, start: usize, end: usize, replacement: &str) -> IndentResult<DocumentChange> {
        if start > end || end > self.text.len() || !self.text.is_char_boundary(start) || !self.text.is_char_boundary(end) {
            return Err(self.bad_location(end));
        }
        self.text.replace_range(start..end, replacement);
        self.line_starts = compute_line_starts(&self.text);
        self.version += 1;
        Ok(DocumentChange {
            offset: start,
            delta: replacement.len() as i64 - (end - start) as i64,
        })
    }

    /// Text of a line without its line break.
    pub fn line_text(&self, line: usize) -> Option<&str> {
        let start = self.line_start(line)?;
        let end = self.line_start(line + 1).map(|n| n - 1).unwrap_or(self.text.len());
        self.text.get(start..end)
    }
}

fn compute_line_starts(text: &str) -> Vec<usize> {
    let mut starts = vec![0];
    starts.extend(text.match_indices('\n').map(|(i, _)| i + 1));
    starts
}

impl IndentDocument for TextDocument {
    fn len(&self) -> usize {
        self.text.len()
    }

    fn text(&self, start: usize, end: usize) -> IndentResult<&str> {
        if start > end {
            return Err(self.bad_location(start));
        }
        self.text.get(start..end).ok_or_else(|| self.bad_location(end))
    }

    fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    fn line_of_offset(&self, offset: usize) -> IndentResult<usize> {
        if offset > self.text.len() {
            return Err(self.bad_location(offset));
        }
        Ok(self.line_starts.partition_point(|&s| s <= offset) - 1)
    }

    fn line_start(&self, line: usize) -> Option<usize> {
        self.line_starts.get(line).copied()
    }

    fn apply_edits(&mut self, edits: &[IndentEdit]) -> IndentResult<()> {
        let mut sorted: Vec<&IndentEdit> = edits.iter().collect();
        sorted.sort_by(|a, b| b.offset.cmp(&a.offset));
        for edit in &sorted {
            let end = edit.offset + edit.remove;
            if end > self.text.len()
                || !self.text.is_char_boundary(edit.offset)
                || !self.text.is_char_boundary(end)
            {
                return Err(self.bad_location(end));
            }
        }
        // sorted by descending offset, so each edit must end before the previous one starts
        if let Some(pair) = sorted
            .windows(2)
            .find(|pair| pair[1].offset + pair[1].remove > pair[0].offset)
        {
            return Err(self.bad_location(pair[0].offset));
        }
        for edit in sorted {
            self.text
                .replace_range(edit.offset..edit.offset + edit.remove, &edit.insert);
        }
        self.line_starts = compute_line_starts(&self.text);
        self.version += 1;
        Ok(())
    }
}
