//! Indentation configuration.

use serde::{Deserialize, Serialize};

use crate::MAX_INDENT;

/// Indentation configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndentConfig {
    /// Columns per indentation level.
    pub indent_width: usize,
    /// Tab stop width used when measuring existing indentation.
    pub tab_size: usize,
    /// Write leading whitespace with tabs.
    pub use_tabs: bool,
    /// Written indentation is clamped to this many columns.
    pub max_indent: usize,
    /// Surface offset failures instead of swallowing them.
    pub strict: bool,
}

impl Default for IndentConfig {
    fn default() -> Self {
        Self {
            indent_width: 4,
            tab_size: 8,
            use_tabs: false,
            max_indent: MAX_INDENT,
            strict: false,
        }
    }
}

impl IndentConfig {
    /// Create a new configuration with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the indentation width.
    pub fn indent_width(mut self, width: usize) -> Self {
        self.indent_width = width;
        self
    }

    /// Set the tab stop width.
    pub fn tab_size(mut self, size: usize) -> Self {
        self.tab_size = size.max(1);
        self
    }

    /// Use tabs instead of spaces.
    pub fn use_tabs(mut self, use_tabs: bool) -> Self {
        self.use_tabs = use_tabs;
        self
    }

    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Leading whitespace for an indentation of `columns`.
    pub fn indent_string(&self, columns: usize) -> String {
        let columns = columns.min(self.max_indent);
        if self.use_tabs {
            let tab = self.tab_size.max(1);
            let mut s = "\t".repeat(columns / tab);
            s.push_str(&" ".repeat(columns % tab));
            s
        } else {
            " ".repeat(columns)
        }
    }
}

/// What triggered the pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndentMode {
    /// Re-indent after typing: blank lines get indentation and the first
    /// line keeps a fixed `PreserveIndentation` column.
    #[default]
    Indent,
    /// Full reformat of a region: blank lines are emptied.
    Reformat,
}

/// A region to reindent: `[start, end]` document offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndentRequest {
    pub start: usize,
    pub end: usize,
    pub mode: IndentMode,
}

impl IndentRequest {
    pub fn new(start: usize, end: usize, mode: IndentMode) -> Self {
        Self {
            start: start.min(end),
            end: start.max(end),
            mode,
        }
    }

    /// Reindent the whole document.
    pub fn whole(len: usize, mode: IndentMode) -> Self {
        Self::new(0, len, mode)
    }

    pub fn is_indent(&self) -> bool {
        self.mode == IndentMode::Indent
    }
}
