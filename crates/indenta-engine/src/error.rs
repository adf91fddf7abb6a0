//! Indentation errors.

use thiserror::Error;

/// Errors raised by an indentation pass.
/// 缩进过程中产生的错误。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IndentError {
    /// An offset or range does not exist in the document (any more).
    #[error("bad location {offset} in document of length {len}")]
    BadLocation { offset: usize, len: usize },

    /// A strategy returned no commands for a line.
    #[error("strategy returned no indent commands for line {line}; at least NoChange is required")]
    MissingCommands { line: usize },

    /// A strategy returned no preliminary commands for the following line.
    #[error("strategy returned no next-line commands for line {line}; at least NoChange is required")]
    MissingNextLineCommands { line: usize },
}

impl IndentError {
    /// Offset failures are caused by documents changing mid-pass and are
    /// recoverable; everything else is a strategy defect.
    pub fn is_bad_location(&self) -> bool {
        matches!(self, IndentError::BadLocation { .. })
    }
}

/// Result type for indentation passes.
pub type IndentResult<T> = Result<T, IndentError>;
