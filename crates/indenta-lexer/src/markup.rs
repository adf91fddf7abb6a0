//! The markup lexer.
//! 标记语言词法分析器。

use indenta_common::{Span, Token};

use crate::error::LexError;
use crate::token::MarkupKind;

/// Mode for the lexer state machine.
/// 词法分析器状态机的模式。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LexerMode {
    /// Text between tags - 标签之间的文本
    Content,
    /// Inside `<name ...` or `</name ...`
    /// 在开始或结束标签内部
    InTag { closing: bool, expect_name: bool, after_eq: bool },
}

/// Content of a raw-text element, left to another lexer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawTextRegion {
    /// Lower-case element name.
    pub tag: String,
    pub span: Span,
}

/// Everything the markup lexer produced.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MarkupOutput {
    /// Tokens in document order. Raw-text regions are not covered.
    pub tokens: Vec<Token<MarkupKind>>,
    pub regions: Vec<RawTextRegion>,
    pub errors: Vec<LexError>,
}

/// The markup lexer.
/// 标记语言词法分析器。
///
/// Tags, attributes, text, whitespace and comments become tokens covering
/// the document without gaps, except for the content of raw-text elements.
pub struct MarkupLexer<'src> {
    source: &'src str,
    /// Character iterator with position info
    /// 带位置信息的字符迭代器
    chars: std::iter::Peekable<std::str::CharIndices<'src>>,
    /// Current position in source
    /// 当前在源码中的位置
    pos: usize,
    mode_stack: Vec<LexerMode>,
    raw_text_tags: Vec<String>,
    /// Name of the opening tag being lexed.
    current_tag: Option<String>,
    output: MarkupOutput,
}

impl<'src> MarkupLexer<'src> {
    /// Create a lexer treating `script` and `style` as raw text.
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            chars: source.char_indices().peekable(),
            pos: 0,
            mode_stack: vec![LexerMode::Content],
            raw_text_tags: vec!["script".to_string(), "style".to_string()],
            current_tag: None,
            output: MarkupOutput::default(),
        }
    }

    /// Replace the elements whose content is raw text.
    pub fn with_raw_text_tags(mut self, tags: &[&str]) -> Self {
        self.raw_text_tags = tags.iter().map(|t| t.to_ascii_lowercase()).collect();
        self
    }

    fn current_mode(&self) -> LexerMode {
        *self.mode_stack.last().unwrap_or(&LexerMode::Content)
    }

    fn set_mode(&mut self, mode: LexerMode) {
        if let Some(top) = self.mode_stack.last_mut() {
            *top = mode;
        }
    }

    fn push_mode(&mut self, mode: LexerMode) {
        self.mode_stack.push(mode);
    }

    fn pop_mode(&mut self) {
        if self.mode_stack.len() > 1 {
            self.mode_stack.pop();
        }
    }

    /// Tokenize the whole source.
    /// 对整个源代码进行词法分析。
    pub fn tokenize(mut self) -> MarkupOutput {
        while self.peek_char().is_some() {
            match self.current_mode() {
                LexerMode::Content => self.content_token(),
                LexerMode::InTag {
                    closing,
                    expect_name,
                    after_eq,
                } => self.tag_token(closing, expect_name, after_eq),
            }
        }
        self.output
    }

    fn push(&mut self, kind: MarkupKind, start: usize) {
        self.output
            .tokens
            .push(Token::new(kind, Span::from_usize(start, self.pos)));
    }

    fn content_token(&mut self) {
        let start = self.pos;
        let rest = &self.source[start..];

        if rest.starts_with("<!--") {
            self.advance_by(4);
            match self.source[self.pos..].find("-->") {
                Some(end) => self.advance_to(self.pos + end + 3),
                None => {
                    self.output
                        .errors
                        .push(LexError::UnterminatedComment { offset: start });
                    self.advance_to(self.source.len());
                }
            }
            self.push(MarkupKind::Comment, start);
        } else if rest.starts_with("<!") || rest.starts_with("<?") {
            let end = rest.find('>').map_or(self.source.len(), |e| start + e + 1);
            self.advance_to(end);
            self.push(MarkupKind::Declaration, start);
        } else if rest.starts_with("</") && Self::is_name_start(self.peek_nth(2)) {
            self.advance_by(2);
            self.push(MarkupKind::TagCloseOpen, start);
            self.push_mode(LexerMode::InTag {
                closing: true,
                expect_name: true,
                after_eq: false,
            });
        } else if rest.starts_with('<') && Self::is_name_start(self.peek_nth(1)) {
            self.advance_by(1);
            self.push(MarkupKind::TagOpen, start);
            self.push_mode(LexerMode::InTag {
                closing: false,
                expect_name: true,
                after_eq: false,
            });
        } else if self.peek_char().is_some_and(char::is_whitespace) {
            self.skip_whitespace();
            self.push(MarkupKind::Whitespace, start);
        } else {
            // a stray `<` is text
            self.advance();
            while let Some(ch) = self.peek_char() {
                if ch == '<' || ch.is_whitespace() {
                    break;
                }
                self.advance();
            }
            self.push(MarkupKind::Text, start);
        }
    }

    fn tag_token(&mut self, closing: bool, expect_name: bool, after_eq: bool) {
        let start = self.pos;
        let Some(ch) = self.peek_char() else {
            return;
        };

        if ch.is_whitespace() {
            self.skip_whitespace();
            self.push(MarkupKind::Whitespace, start);
            return;
        }

        match ch {
            '>' => {
                self.advance();
                self.push(MarkupKind::TagEnd, start);
                self.pop_mode();
                if let Some(tag) = self.current_tag.take() {
                    if self.raw_text_tags.contains(&tag) {
                        self.raw_text(tag);
                    }
                }
            }
            '/' if self.peek_nth(1) == Some('>') => {
                self.advance_by(2);
                self.push(MarkupKind::TagSelfClose, start);
                self.pop_mode();
                self.current_tag = None;
            }
            // a new tag starts before this one ended
            '<' => {
                self.pop_mode();
                self.current_tag = None;
            }
            '=' => {
                self.advance();
                self.push(MarkupKind::Operator, start);
                self.set_mode(LexerMode::InTag {
                    closing,
                    expect_name: false,
                    after_eq: true,
                });
            }
            '"' | '\'' if after_eq => {
                self.quoted_value(ch, start);
                self.set_mode(LexerMode::InTag {
                    closing,
                    expect_name: false,
                    after_eq: false,
                });
            }
            _ => {
                self.advance();
                while let Some(ch) = self.peek_char() {
                    if ch.is_whitespace() || matches!(ch, '>' | '<' | '=') {
                        break;
                    }
                    if ch == '/' && self.peek_nth(1) == Some('>') {
                        break;
                    }
                    self.advance();
                }
                let kind = if expect_name && closing {
                    MarkupKind::CloseTagName
                } else if expect_name {
                    self.current_tag = Some(self.source[start..self.pos].to_ascii_lowercase());
                    MarkupKind::OpenTagName
                } else if after_eq {
                    MarkupKind::AttributeValue
                } else {
                    MarkupKind::AttributeName
                };
                self.push(kind, start);
                self.set_mode(LexerMode::InTag {
                    closing,
                    expect_name: false,
                    after_eq: false,
                });
            }
        }
    }

    fn quoted_value(&mut self, quote: char, start: usize) {
        self.advance();
        match self.source[self.pos..].find(quote) {
            Some(end) => self.advance_to(self.pos + end + 1),
            None => {
                self.output
                    .errors
                    .push(LexError::UnterminatedValue { offset: start });
                self.advance_to(self.source.len());
            }
        }
        self.push(MarkupKind::AttributeValue, start);
    }

    /// Skip the content of a raw-text element up to its closing tag.
    fn raw_text(&mut self, tag: String) {
        let start = self.pos;
        let end = find_closing_tag(&self.source[start..], &tag).map_or_else(
            || {
                self.output.errors.push(LexError::UnterminatedRawText {
                    tag: tag.clone(),
                    offset: start,
                });
                self.source.len()
            },
            |end| start + end,
        );
        if end > start {
            self.output.regions.push(RawTextRegion {
                tag,
                span: Span::from_usize(start, end),
            });
        }
        self.advance_to(end);
    }

    fn advance(&mut self) -> Option<(usize, char)> {
        let result = self.chars.next();
        if let Some((pos, ch)) = result {
            self.pos = pos + ch.len_utf8();
        }
        result
    }

    fn advance_by(&mut self, n: usize) {
        for _ in 0..n {
            self.advance();
        }
    }

    /// Advance to byte offset `end`, which must be a char boundary.
    fn advance_to(&mut self, end: usize) {
        while self.pos < end && self.advance().is_some() {}
    }

    fn peek_char(&mut self) -> Option<char> {
        self.chars.peek().map(|(_, ch)| *ch)
    }

    fn peek_nth(&self, n: usize) -> Option<char> {
        self.chars.clone().nth(n).map(|(_, ch)| ch)
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.peek_char() {
            if ch.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn is_name_start(ch: Option<char>) -> bool {
        ch.is_some_and(|c| c.is_ascii_alphabetic())
    }
}

/// Offset of `</tag` (any case) in `text`.
fn find_closing_tag(text: &str, tag: &str) -> Option<usize> {
    let bytes = text.as_bytes();
    let mut from = 0;
    while let Some(i) = text[from..].find("</") {
        let at = from + i;
        let name = at + 2;
        let matches = bytes
            .get(name..name + tag.len())
            .is_some_and(|b| b.eq_ignore_ascii_case(tag.as_bytes()));
        let ends = bytes
            .get(name + tag.len())
            .is_none_or(|&b| b == b'>' || b == b'/' || b.is_ascii_whitespace());
        if matches && ends {
            return Some(at);
        }
        from = at + 2;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use MarkupKind::*;

    fn lex(source: &str) -> Vec<(MarkupKind, &str)> {
        MarkupLexer::new(source)
            .tokenize()
            .tokens
            .into_iter()
            .map(|t| (t.kind, &source[t.start()..t.end()]))
            .collect()
    }

    #[test]
    fn test_tags_and_attributes() {
        assert_eq!(
            lex("<a href=\"x\" b=c>hi</a>"),
            vec![
                (TagOpen, "<"),
                (OpenTagName, "a"),
                (Whitespace, " "),
                (AttributeName, "href"),
                (Operator, "="),
                (AttributeValue, "\"x\""),
                (Whitespace, " "),
                (AttributeName, "b"),
                (Operator, "="),
                (AttributeValue, "c"),
                (TagEnd, ">"),
                (Text, "hi"),
                (TagCloseOpen, "</"),
                (CloseTagName, "a"),
                (TagEnd, ">"),
            ]
        );
    }

    #[test]
    fn test_self_closing_and_declarations() {
        assert_eq!(
            lex("<!DOCTYPE html><br/>"),
            vec![
                (Declaration, "<!DOCTYPE html>"),
                (TagOpen, "<"),
                (OpenTagName, "br"),
                (TagSelfClose, "/>"),
            ]
        );
    }

    #[test]
    fn test_comment_spans_lines() {
        let tokens = lex("<!-- a\n b -->\nx");
        assert_eq!(tokens[0], (Comment, "<!-- a\n b -->"));
        assert_eq!(tokens[1], (Whitespace, "\n"));
        assert_eq!(tokens[2], (Text, "x"));
    }

    #[test]
    fn test_stray_less_than_is_text() {
        assert_eq!(lex("a < b"), vec![(Text, "a"), (Whitespace, " "), (Text, "<"), (Whitespace, " "), (Text, "b")]);
    }

    #[test]
    fn test_script_content_is_raw_text() {
        let source = "<script>\nif (a < b) { x(\"</p>\"); }\n</SCRIPT>\n";
        let output = MarkupLexer::new(source).tokenize();
        assert_eq!(output.regions.len(), 1);
        let region = &output.regions[0];
        assert_eq!(region.tag, "script");
        assert_eq!(
            &source[region.span.range()],
            "\nif (a < b) { x(\"</p>\"); }\n"
        );
        let close = output
            .tokens
            .iter()
            .find(|t| t.kind == CloseTagName)
            .map(|t| &source[t.start()..t.end()]);
        assert_eq!(close, Some("SCRIPT"));
        assert!(output.errors.is_empty());
    }

    #[test]
    fn test_unterminated_constructs_are_reported() {
        let output = MarkupLexer::new("<style>a {").tokenize();
        assert_eq!(
            output.errors,
            vec![LexError::UnterminatedRawText {
                tag: "style".to_string(),
                offset: 7
            }]
        );
        let output = MarkupLexer::new("x <!-- open").tokenize();
        assert_eq!(output.errors, vec![LexError::UnterminatedComment { offset: 2 }]);
    }

    #[test]
    fn test_tokens_cover_source() {
        let source = "<div class='a\nb'>\n  <p>text <b>bold</b>\n</div>";
        let tokens = MarkupLexer::new(source).tokenize().tokens;
        assert_eq!(tokens.first().map(|t| t.start()), Some(0));
        assert_eq!(tokens.last().map(|t| t.end()), Some(source.len()));
        for pair in tokens.windows(2) {
            assert_eq!(pair[0].end(), pair[1].start());
        }
    }
}
