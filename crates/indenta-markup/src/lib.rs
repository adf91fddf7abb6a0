//! Tag-aware indentation for markup languages.
//! 标记语言的标签感知缩进。
//!
//! [`MarkupIndenter`] implements [`indenta_engine::IndentStrategy`] for any
//! language described by [`MarkupLanguage`]: it keeps a stack of open tags,
//! closes tags with optional end tags implicitly, aligns wrapped attributes,
//! leaves unformattable content (e.g. preformatted text) alone and marks
//! embedded foreign-language blocks.

mod indenter;
mod item;
mod language;
mod stable_start;

pub use indenter::MarkupIndenter;
pub use item::{ItemArena, ItemId, ItemState, MarkupItem};
pub use language::MarkupLanguage;
