//! Common utilities and data structures for Indenta.
//! Indenta 的通用工具和数据结构。
//!
//! This crate provides foundational types shared by the indentation engine
//! and the language crates:
//! - `Span` / `BytePos`: document offset tracking
//! - `Token`: a language-tagged token produced by a host lexer
//! - `OffsetRanges`: the coalescing ignore-list used by stable-start searches
//! - `Interner`: case-folding interning of tag names

mod interner;
mod language;
mod ranges;
mod span;
mod token;

pub use interner::{Interner, Symbol};
pub use language::LanguageId;
pub use ranges::{OffsetRange, OffsetRanges, Uncovered};
pub use span::{BytePos, Span};
pub use token::Token;
