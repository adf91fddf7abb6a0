//! CLI errors.

use std::io;
use std::path::PathBuf;

use indenta_engine::IndentError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("cannot read '{}': {source}", path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("cannot write '{}': {source}", path.display())]
    Write { path: PathBuf, source: io::Error },

    #[error("invalid config file '{}': {source}", path.display())]
    Config {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("cannot tell the language of '{}'; pass --lang", path.display())]
    UnknownLanguage { path: PathBuf },

    #[error("line range {start}:{end} is outside the file ({lines} lines)")]
    LineRange {
        start: usize,
        end: usize,
        lines: usize,
    },

    #[error(transparent)]
    Indent(#[from] IndentError),

    #[error("would reindent: {}", path.display())]
    WouldReindent { path: PathBuf },
}
