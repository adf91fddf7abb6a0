//! Concrete languages for the indentation engine.
//! 缩进引擎的具体语言支持。
//!
//! - [`HtmlLanguage`]: HTML tag rules for the markup strategy
//! - [`ScriptIndenter`]: bracket-based indentation for scripts and styles
//! - [`Source`]: lexes a document and builds the passes that indent it

mod html;
mod script;
mod source;

pub use html::HtmlLanguage;
pub use script::ScriptIndenter;
pub use source::{Source, SourceKind, CSS, HTML, SCRIPT};
