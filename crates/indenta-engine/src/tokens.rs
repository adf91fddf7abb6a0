//! Joined token view over the code blocks of one language.
//! 单一语言代码块上的连接 token 视图。
//!
//! A document mixing several languages yields, per language, a list of
//! [`CodeBlock`]s. Each block holds one or more [`TokenSequence`]s; virtual
//! sequences are synthesized by the host and never formatted. [`JoinedTokens`]
//! walks all tokens of all blocks as if they were a single stream.

use indenta_common::{LanguageId, Span, Token};

/// A run of tokens of one language.
#[derive(Debug, Clone)]
pub struct TokenSequence<K> {
    pub language: LanguageId,
    pub tokens: Vec<Token<K>>,
    pub is_virtual: bool,
}

impl<K> TokenSequence<K> {
    pub fn new(language: LanguageId, tokens: Vec<Token<K>>) -> Self {
        Self {
            language,
            tokens,
            is_virtual: false,
        }
    }

    pub fn virtual_sequence(language: LanguageId, tokens: Vec<Token<K>>) -> Self {
        Self {
            language,
            tokens,
            is_virtual: true,
        }
    }

    pub fn start(&self) -> Option<usize> {
        self.tokens.first().map(|t| t.start())
    }

    /// Exclusive end offset.
    pub fn end(&self) -> Option<usize> {
        self.tokens.last().map(|t| t.end())
    }

    pub fn span(&self) -> Option<Span> {
        Some(Span::from_usize(self.start()?, self.end()?))
    }
}

/// A contiguous block of code of one language.
#[derive(Debug, Clone)]
pub struct CodeBlock<K> {
    pub sequences: Vec<TokenSequence<K>>,
}

impl<K> CodeBlock<K> {
    pub fn new(sequences: Vec<TokenSequence<K>>) -> Self {
        Self { sequences }
    }

    pub fn single(sequence: TokenSequence<K>) -> Self {
        Self {
            sequences: vec![sequence],
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Entry {
    sequence: usize,
    token: usize,
}

/// Cursor over the tokens of several code blocks.
/// 多个代码块 token 上的游标。
pub struct JoinedTokens<'a, K> {
    sequences: Vec<&'a TokenSequence<K>>,
    entries: Vec<Entry>,
    pos: Option<usize>,
}

impl<'a, K> JoinedTokens<'a, K> {
    pub fn new(blocks: &'a [CodeBlock<K>]) -> Self {
        let sequences: Vec<&TokenSequence<K>> =
            blocks.iter().flat_map(|b| b.sequences.iter()).collect();
        let mut entries = Vec::new();
        for (s, seq) in sequences.iter().enumerate() {
            for t in 0..seq.tokens.len() {
                entries.push(Entry {
                    sequence: s,
                    token: t,
                });
            }
        }
        Self {
            sequences,
            entries,
            pos: None,
        }
    }

    fn entry_token(&self, entry: Entry) -> &'a Token<K> {
        &self.sequences[entry.sequence].tokens[entry.token]
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Non-virtual sequences, in document order.
    pub fn real_sequences(&self) -> impl Iterator<Item = &'a TokenSequence<K>> + '_ {
        self.sequences.iter().copied().filter(|s| !s.is_virtual)
    }

    /// Is `offset` inside (or at the end of) a non-virtual sequence?
    pub fn covers(&self, offset: usize) -> bool {
        self.real_sequences().any(|s| match (s.start(), s.end()) {
            (Some(start), Some(end)) => start <= offset && offset <= end,
            _ => false,
        })
    }

    /// Position on the first token.
    pub fn move_start(&mut self) -> bool {
        self.pos = if self.entries.is_empty() { None } else { Some(0) };
        self.pos.is_some()
    }

    /// Position on the token containing `offset`. Between tokens the next
    /// token is chosen when `forward`, else the previous one.
    pub fn seek(&mut self, offset: usize, forward: bool) -> bool {
        let after = self
            .entries
            .partition_point(|e| self.entry_token(*e).start() <= offset);
        // `after - 1` is the last token starting at or before offset
        if after > 0 {
            let candidate = after - 1;
            let token = self.entry_token(self.entries[candidate]);
            if offset < token.end() {
                self.pos = Some(candidate);
                return true;
            }
        }
        self.pos = if forward {
            (after < self.entries.len()).then_some(after)
        } else {
            after.checked_sub(1)
        };
        self.pos.is_some()
    }

    pub fn advance(&mut self) -> bool {
        match self.pos {
            Some(p) if p + 1 < self.entries.len() => {
                self.pos = Some(p + 1);
                true
            }
            _ => false,
        }
    }

    pub fn retreat(&mut self) -> bool {
        match self.pos {
            Some(p) if p > 0 => {
                self.pos = Some(p - 1);
                true
            }
            _ => false,
        }
    }

    pub fn token(&self) -> Option<&'a Token<K>> {
        self.pos.map(|p| self.entry_token(self.entries[p]))
    }

    /// Start offset of the current token.
    pub fn offset(&self) -> Option<usize> {
        self.token().map(|t| t.start())
    }

    pub fn language(&self) -> Option<LanguageId> {
        self.pos
            .map(|p| self.sequences[self.entries[p].sequence].language)
    }

    /// Span of the sub-sequence embedded in the current token.
    pub fn embedded(&self) -> Option<Span> {
        self.token().and_then(|t| t.embedded)
    }

    pub fn is_virtual(&self) -> bool {
        self.pos
            .map(|p| self.sequences[self.entries[p].sequence].is_virtual)
            .unwrap_or(false)
    }

    /// Cursor position, for restoring after a lookahead.
    pub fn mark(&self) -> Option<usize> {
        self.pos
    }

    pub fn reset_to(&mut self, mark: Option<usize>) {
        self.pos = mark;
    }
}
