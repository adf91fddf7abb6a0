//! Script tokenization on top of `logos`.

use indenta_common::{Span, Token};
use logos::Logos;

use crate::token::ScriptKind;

/// Tokenize `source`, which starts at `base` in the document.
///
/// The tokens cover the source without gaps; unmatched input becomes
/// [`ScriptKind::Error`].
pub fn lex_script(source: &str, base: usize) -> Vec<Token<ScriptKind>> {
    let mut lexer = ScriptKind::lexer(source);
    let mut tokens = Vec::new();

    while let Some(result) = lexer.next() {
        let kind = result.unwrap_or(ScriptKind::Error);
        let span = lexer.span();
        tokens.push(Token::new(
            kind,
            Span::from_usize(base + span.start, base + span.end),
        ));
    }

    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<ScriptKind> {
        lex_script(source, 0).into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_brackets_and_words() {
        use ScriptKind::*;
        assert_eq!(
            kinds("if (a) {\n  b[0];\n}"),
            vec![
                Ident, Whitespace, LParen, Ident, RParen, Whitespace, LBrace, Whitespace, Ident,
                LBracket, Number, RBracket, Punct, Whitespace, RBrace
            ]
        );
    }

    #[test]
    fn test_brackets_inside_strings_and_comments() {
        use ScriptKind::*;
        assert_eq!(kinds("\"{\" '}' // {\n"), vec![String, Whitespace, String, Whitespace, LineComment, Whitespace]);
        assert_eq!(kinds("/* {\n } */x"), vec![BlockComment, Ident]);
        assert_eq!(kinds("`a\n{b}`"), vec![String]);
    }

    #[test]
    fn test_unterminated_block_comment() {
        let tokens = lex_script("a /* open", 0);
        assert_eq!(tokens.last().map(|t| t.kind), Some(ScriptKind::BlockComment));
        assert_eq!(tokens.last().map(|t| t.end()), Some(9));
    }

    #[test]
    fn test_offsets_are_shifted_without_gaps() {
        let tokens = lex_script("x = \"open;", 10);
        assert_eq!(tokens.first().map(|t| t.start()), Some(10));
        for pair in tokens.windows(2) {
            assert_eq!(pair[0].end(), pair[1].start());
        }
        assert!(tokens.iter().any(|t| t.kind == ScriptKind::Error));
        assert_eq!(tokens.last().map(|t| t.end()), Some(20));
    }
}
