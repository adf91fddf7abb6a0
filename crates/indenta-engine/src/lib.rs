//! Language-agnostic indentation engine.
//! 与语言无关的缩进引擎。
//!
//! Each language active in a document contributes a [`LanguagePass`]: a
//! [`LanguageIndenter`] driving an [`IndentStrategy`] over the code blocks of
//! its language. The [`Reindenter`] runs every pass, merges their line data
//! and writes the resolved indentation back in one edit batch.
//! 文档中每种语言提供一个 pass；`Reindenter` 运行所有 pass，合并行数据，
//! 并一次性写回计算出的缩进。

mod apply;
mod command;
mod config;
mod document;
mod engine;
mod error;
mod line;
mod merge;
mod observer;
mod pipeline;
mod resolve;
mod strategy;
mod tokens;

pub use command::{CommandKind, IndentCommand};
pub use config::{IndentConfig, IndentMode, IndentRequest};
pub use document::{
    indent_width, DocumentChange, IndentDocument, IndentEdit, LanguageLayout, TextDocument,
};
pub use engine::{LanguageIndenter, LanguagePass};
pub use error::{IndentError, IndentResult};
pub use line::{Line, LineState};
pub use merge::merge_passes;
pub use observer::{LogObserver, NoopObserver, PassObserver, Phase};
pub use pipeline::{IndentOutcome, PendingPasses, Reindenter, ResolvedLine};
pub use resolve::Resolver;
pub use strategy::{IndentStrategy, LineContext};
pub use tokens::{CodeBlock, JoinedTokens, TokenSequence};

/// Hard upper bound for written indentation, in columns.
pub const MAX_INDENT: usize = 200;
