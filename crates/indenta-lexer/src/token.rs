//! Token kinds.

use logos::Logos;

/// Kind of a markup token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MarkupKind {
    /// `<` starting an opening tag
    TagOpen,
    /// `</`
    TagCloseOpen,
    /// `>`
    TagEnd,
    /// `/>`
    TagSelfClose,
    OpenTagName,
    CloseTagName,
    AttributeName,
    /// `=` between an attribute and its value
    Operator,
    AttributeValue,
    Text,
    Whitespace,
    /// `<!-- ... -->`
    Comment,
    /// `<!DOCTYPE ...>`, `<?xml ...?>`
    Declaration,
}

/// Kind of a script token. Only what bracket-based indentation needs is
/// told apart.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScriptKind {
    #[regex(r"[ \t\r\n\f]+")]
    Whitespace,

    #[token("//", line_comment)]
    LineComment,

    #[token("/*", block_comment)]
    BlockComment,

    #[regex(r#""([^"\\\n]|\\.)*""#)]
    #[regex(r"'([^'\\\n]|\\.)*'")]
    #[regex(r"`([^`\\]|\\.|\\\n)*`")]
    String,

    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,

    #[regex(r"[A-Za-z_$][A-Za-z0-9_$]*")]
    Ident,

    #[regex(r"[0-9][0-9A-Za-z_.]*")]
    Number,

    #[regex(r"[;,.:?!~+\-*/%&|^=<>@#\\]")]
    Punct,

    /// Anything the lexer could not match.
    Error,
}

impl ScriptKind {
    pub fn is_opening(self) -> bool {
        matches!(self, ScriptKind::LBrace | ScriptKind::LParen | ScriptKind::LBracket)
    }

    pub fn is_closing(self) -> bool {
        matches!(self, ScriptKind::RBrace | ScriptKind::RParen | ScriptKind::RBracket)
    }
}

fn line_comment(lex: &mut logos::Lexer<ScriptKind>) {
    let end = lex.remainder().find('\n').unwrap_or(lex.remainder().len());
    lex.bump(end);
}

fn block_comment(lex: &mut logos::Lexer<ScriptKind>) {
    // an unterminated comment runs to the end of the input
    let end = lex
        .remainder()
        .find("*/")
        .map_or(lex.remainder().len(), |end| end + 2);
    lex.bump(end);
}
