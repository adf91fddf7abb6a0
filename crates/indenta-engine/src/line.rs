//! Per-line bookkeeping of a pass.

use std::fmt;

use crate::command::IndentCommand;
use crate::document::IndentDocument;
use crate::error::IndentResult;

/// Whether a recorded line still matches the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineState {
    Valid,
    /// The recorded start offset is no longer the start of a row.
    Stale,
}

/// One line as seen by one language pass.
/// 某个语言 pass 所见的一行。
#[derive(Clone)]
pub struct Line {
    /// 0-based line number.
    pub index: usize,
    /// Start offset of the row.
    pub offset: usize,
    /// First offset of this pass's language on the line.
    pub start_offset: usize,
    /// Last offset of this pass's language on the line.
    pub end_offset: usize,
    pub indentable: bool,
    pub preserve: bool,
    pub empty: bool,
    pub foreign_block_start: bool,
    pub foreign_block_end: bool,
    /// Leading whitespace width before the pass, in columns.
    pub existing_indent: usize,
    /// Leading whitespace contains tabs or the line is blank.
    pub tab_indentation: bool,
    pub indentation: i32,
    pub adjustment: i32,
    pub state: LineState,
    pub commands: Vec<IndentCommand>,
    pub next_line_commands: Vec<IndentCommand>,
}

impl Line {
    /// A line with `NoChange` commands and geometry read from the document.
    pub fn basic(doc: &dyn IndentDocument, index: usize, tab_size: usize) -> IndentResult<Line> {
        let offset = doc
            .line_start(index)
            .ok_or_else(|| doc.bad_location(doc.len()))?;
        let existing_indent = doc.existing_indent(offset, tab_size)?;
        let non_white = doc.first_non_white(offset)?;
        let tab_indentation = match non_white {
            None => true,
            Some(nw) => existing_indent != nw - offset,
        };
        Ok(Line {
            index,
            offset,
            start_offset: offset,
            end_offset: doc.row_end(offset)?,
            indentable: true,
            preserve: false,
            empty: non_white.is_none(),
            foreign_block_start: false,
            foreign_block_end: false,
            existing_indent,
            tab_indentation,
            indentation: 0,
            adjustment: 0,
            state: LineState::Valid,
            commands: vec![IndentCommand::no_change(offset)],
            next_line_commands: vec![IndentCommand::no_change(offset)],
        })
    }

    /// Move every recorded offset by `delta`.
    pub fn shift(&mut self, delta: i64) {
        let move_by = |v: usize| (v as i64 + delta).max(0) as usize;
        self.offset = move_by(self.offset);
        self.start_offset = move_by(self.start_offset);
        self.end_offset = move_by(self.end_offset);
        for cmd in self.commands.iter_mut().chain(self.next_line_commands.iter_mut()) {
            cmd.shift(delta);
        }
    }

    /// Recompute the line index from the recorded offset. A line whose
    /// offset no longer starts a row becomes stale and is not indented.
    pub fn revalidate(&mut self, doc: &dyn IndentDocument) -> IndentResult<LineState> {
        self.index = doc.line_of_offset(self.offset)?;
        let row_start = doc.row_start(self.offset)?;
        if row_start != self.offset {
            log::debug!(
                target: "indenta::merge",
                "line start moved by another formatter, not indenting it: {self:?}"
            );
            self.indentable = false;
            self.state = LineState::Stale;
        }
        Ok(self.state)
    }

    /// One-line summary used in trace dumps.
    pub fn dump(&self) -> String {
        let mut s = format!(
            "[{:4}] offset={} ({}-{}) indent={}",
            self.index + 1,
            self.offset,
            self.start_offset,
            self.end_offset,
            self.indentation
        );
        if self.adjustment != 0 {
            s.push_str(&format!("({})", self.adjustment));
        }
        s.push_str(&format!(" existingIndent={}", self.existing_indent));
        for (flag, name) in [
            (self.foreign_block_start, " foreignBlockStart"),
            (self.foreign_block_end, " foreignBlockEnd"),
            (self.preserve, " preserve"),
            (self.empty, " empty"),
            (!self.indentable, " noIndent"),
        ] {
            if flag {
                s.push_str(name);
            }
        }
        s
    }
}

impl fmt::Debug for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {:?}", self.dump(), self.commands)
    }
}

/// Find a line by index in a list sorted by index.
pub(crate) fn find_line(lines: &[Line], index: usize) -> Option<usize> {
    lines.binary_search_by_key(&index, |l| l.index).ok()
}
