//! Language-agnostic token type.
//! 与语言无关的 token 类型。

use crate::Span;

/// A token with its kind, its span and an optional embedded sub-sequence.
/// 带有类型、范围以及可选嵌入子序列的 token。
///
/// `embedded` is the span of another language nested inside this token,
/// e.g. the expression inside a `${...}` delimiter token.
#[derive(Debug, Clone, PartialEq)]
pub struct Token<K> {
    pub kind: K,
    pub span: Span,
    pub embedded: Option<Span>,
}

impl<K> Token<K> {
    pub fn new(kind: K, span: Span) -> Self {
        Self {
            kind,
            span,
            embedded: None,
        }
    }

    pub fn with_embedded(mut self, embedded: Span) -> Self {
        self.embedded = Some(embedded);
        self
    }

    pub fn start(&self) -> usize {
        usize::from(self.span.start)
    }

    pub fn end(&self) -> usize {
        usize::from(self.span.end)
    }

    pub fn len(&self) -> usize {
        self.span.len()
    }

    pub fn is_empty(&self) -> bool {
        self.span.is_empty()
    }
}
