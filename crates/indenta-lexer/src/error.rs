//! Lexing problems. Lexing never fails; these are reported next to the tokens.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexError {
    #[error("unterminated comment starting at {offset}")]
    UnterminatedComment { offset: usize },

    #[error("unterminated attribute value starting at {offset}")]
    UnterminatedValue { offset: usize },

    #[error("<{tag}> content starting at {offset} is never closed")]
    UnterminatedRawText { tag: String, offset: usize },
}

impl LexError {
    pub fn offset(&self) -> usize {
        match self {
            LexError::UnterminatedComment { offset }
            | LexError::UnterminatedValue { offset }
            | LexError::UnterminatedRawText { offset, .. } => *offset,
        }
    }
}
