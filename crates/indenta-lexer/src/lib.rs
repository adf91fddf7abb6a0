//! Lexers for markup documents and embedded scripts.
//! 标记文档与内嵌脚本的词法分析。
//!
//! The markup lexer splits a document into tag tokens and hands the content
//! of raw-text elements (`<script>`, `<style>`) back as [`RawTextRegion`]s,
//! which the script lexer tokenizes separately.

mod error;
mod markup;
mod script;
mod token;

pub use error::LexError;
pub use markup::{MarkupLexer, MarkupOutput, RawTextRegion};
pub use script::lex_script;
pub use token::{MarkupKind, ScriptKind};
