//! Language strategy capability.
//! 语言策略能力接口。

use indenta_common::{LanguageId, OffsetRanges, Token};

use crate::command::IndentCommand;
use crate::document::IndentDocument;
use crate::error::IndentResult;
use crate::tokens::JoinedTokens;

/// What a strategy knows about the line being indented.
pub struct LineContext<'a, 't, K> {
    pub doc: &'a dyn IndentDocument,
    pub tokens: &'a mut JoinedTokens<'t, K>,
    /// First offset of the strategy's language on the line.
    pub line_start: usize,
    /// Last offset of the strategy's language on the line.
    pub line_end: usize,
    pub first_non_white: usize,
    pub next_line_start: usize,
    pub empty: bool,
    /// The line starts with the strategy's language.
    pub indentable: bool,
    /// First line of a run of this language.
    pub block_start: bool,
    /// Last line of a run of this language.
    pub block_end: bool,
}

impl<K> LineContext<'_, '_, K> {
    /// Document text of a token.
    pub fn token_text(&self, token: &Token<K>) -> IndentResult<&str> {
        self.doc.text(token.start(), token.end())
    }
}

/// Per-language indentation rules driven by a [`LanguageIndenter`].
///
/// [`LanguageIndenter`]: crate::LanguageIndenter
pub trait IndentStrategy {
    type Kind;

    fn language(&self) -> LanguageId;

    /// Clear state left over from a previous pass.
    fn reset(&mut self);

    /// Offset from which indentation of `[start, end]` can be recomputed
    /// without looking further back. Resolved areas which can be skipped go
    /// into `ignore`.
    fn format_stable_start(
        &mut self,
        doc: &dyn IndentDocument,
        tokens: &mut JoinedTokens<'_, Self::Kind>,
        start: usize,
        end: usize,
        ignore: &mut OffsetRanges,
    ) -> IndentResult<usize>;

    /// Commands for one line. `next_line` receives a best guess of the
    /// following line's commands. Both must be non-empty.
    fn line_indent(
        &mut self,
        ctx: &mut LineContext<'_, '_, Self::Kind>,
        next_line: &mut Vec<IndentCommand>,
    ) -> IndentResult<Vec<IndentCommand>>;

    fn is_whitespace(&self, token: &Token<Self::Kind>, text: &str) -> bool {
        let _ = token;
        text.trim().is_empty()
    }

    /// Two-character openers that start a line of this language although the
    /// lexer gives them to the surrounding language (`${`, `#{`).
    fn inline_openers(&self) -> &[&str] {
        &[]
    }
}
