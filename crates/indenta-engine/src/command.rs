//! Indent commands.
//! 缩进命令。
//!
//! A strategy describes every line as a list of commands relative to the
//! running indentation; the resolver turns them into columns.

use std::fmt;

/// Kind of an indent command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    /// Indentation stays as it is.
    NoChange,
    /// Indent by one unit, or to a fixed column.
    Indent,
    /// Unwind to the level before the matching `Indent`.
    Return,
    /// Continuation line; collapsed into one `Indent`/`Return` pair on merge.
    Continue,
    /// The line must not be touched.
    DoNotIndentThisLine,
    /// Keep the line's indentation relative to the previous computed line.
    PreserveIndentation,
    /// A foreign-language block starts after this line.
    BlockStart,
    /// A foreign-language block ends on this line.
    BlockEnd,
}

/// One instruction of a line's indentation.
/// 描述一行缩进的单条指令。
#[derive(Clone, PartialEq, Eq)]
pub struct IndentCommand {
    kind: CommandKind,
    anchor: usize,
    fixed_indent: Option<usize>,
    indent_unit: Option<usize>,
    computed: i32,
    was_continuation: bool,
}

impl IndentCommand {
    /// Create a command anchored at the given document offset.
    pub fn new(kind: CommandKind, anchor: usize) -> Self {
        Self {
            kind,
            anchor,
            fixed_indent: None,
            indent_unit: None,
            computed: 0,
            was_continuation: false,
        }
    }

    pub fn no_change(anchor: usize) -> Self {
        Self::new(CommandKind::NoChange, anchor)
    }

    pub fn indent(anchor: usize) -> Self {
        Self::new(CommandKind::Indent, anchor)
    }

    pub fn ret(anchor: usize) -> Self {
        Self::new(CommandKind::Return, anchor)
    }

    pub fn continuation(anchor: usize) -> Self {
        Self::new(CommandKind::Continue, anchor)
    }

    /// Use a fixed column instead of the running indentation.
    pub fn with_fixed_indent(mut self, columns: usize) -> Self {
        self.fixed_indent = Some(columns);
        self
    }

    /// Override the configured indent unit for this command.
    pub fn with_indent_unit(mut self, columns: usize) -> Self {
        self.indent_unit = Some(columns);
        self
    }

    pub(crate) fn marked_continuation(mut self) -> Self {
        self.was_continuation = true;
        self
    }

    pub fn kind(&self) -> CommandKind {
        self.kind
    }

    pub fn is(&self, kind: CommandKind) -> bool {
        self.kind == kind
    }

    pub fn anchor(&self) -> usize {
        self.anchor
    }

    pub fn fixed_indent(&self) -> Option<usize> {
        self.fixed_indent
    }

    pub fn indent_unit(&self) -> Option<usize> {
        self.indent_unit
    }

    /// Absolute indentation, valid once the command was resolved.
    pub fn computed(&self) -> i32 {
        self.computed
    }

    pub(crate) fn set_computed(&mut self, indentation: i32) {
        self.computed = indentation;
    }

    pub fn was_continuation(&self) -> bool {
        self.was_continuation
    }

    pub(crate) fn shift(&mut self, delta: i64) {
        self.anchor = (self.anchor as i64 + delta).max(0) as usize;
    }
}

impl fmt::Debug for IndentCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}@{}", self.kind, self.anchor)?;
        if let Some(fixed) = self.fixed_indent {
            write!(f, "[fixed={fixed}]")?;
        }
        if self.was_continuation {
            write!(f, "[cont]")?;
        }
        write!(f, "={}", self.computed)
    }
}

/// `NoChange` is only kept when nothing else is on the line.
pub(crate) fn push_command(commands: &mut Vec<IndentCommand>, command: IndentCommand) {
    if !command.is(CommandKind::NoChange) || commands.is_empty() {
        commands.push(command);
    }
}
