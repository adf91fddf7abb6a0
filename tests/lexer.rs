//! Integration tests for indenta-lexer crate.

use indenta_lexer::{lex_script, LexError, MarkupKind, MarkupLexer, ScriptKind};

fn markup(source: &str) -> Vec<(MarkupKind, &str)> {
    MarkupLexer::new(source)
        .tokenize()
        .tokens
        .iter()
        .map(|t| (t.kind, &source[t.start()..t.end()]))
        .collect()
}

#[test]
fn test_closing_tag() {
    use MarkupKind::*;
    assert_eq!(
        markup("</div >"),
        vec![(TagCloseOpen, "</"), (CloseTagName, "div"), (Whitespace, " "), (TagEnd, ">")]
    );
}

#[test]
fn test_attribute_value_spanning_lines() {
    use MarkupKind::*;
    let tokens = markup("<a title=\"x\ny\">");
    assert!(tokens.contains(&(AttributeValue, "\"x\ny\"")));
    assert_eq!(tokens.last(), Some(&(TagEnd, ">")));
}

#[test]
fn test_tag_names_keep_case() {
    let tokens = markup("<DIV></Div>");
    let names: Vec<&str> = tokens
        .iter()
        .filter(|(kind, _)| matches!(kind, MarkupKind::OpenTagName | MarkupKind::CloseTagName))
        .map(|(_, text)| *text)
        .collect();
    assert_eq!(names, vec!["DIV", "Div"]);
}

#[test]
fn test_custom_raw_text_tags() {
    let source = "<code><b></code>";
    let output = MarkupLexer::new(source).with_raw_text_tags(&["code"]).tokenize();
    assert_eq!(output.regions.len(), 1);
    assert_eq!(&source[output.regions[0].span.range()], "<b>");
    assert!(!output
        .tokens
        .iter()
        .any(|t| t.kind == MarkupKind::OpenTagName && &source[t.start()..t.end()] == "b"));
}

#[test]
fn test_unterminated_attribute_value() {
    let output = MarkupLexer::new("<a href=\"x>").tokenize();
    assert!(matches!(output.errors.as_slice(), [LexError::UnterminatedValue { .. }]));
    assert_eq!(output.errors[0].offset(), 8);
}

#[test]
fn test_script_tokens_are_based() {
    let tokens = lex_script("{ x }", 100);
    let kinds: Vec<ScriptKind> = tokens.iter().map(|t| t.kind).collect();
    assert_eq!(
        kinds,
        vec![
            ScriptKind::LBrace,
            ScriptKind::Whitespace,
            ScriptKind::Ident,
            ScriptKind::Whitespace,
            ScriptKind::RBrace
        ]
    );
    assert_eq!(tokens[0].start(), 100);
    assert_eq!(tokens[4].end(), 105);
}

#[test]
fn test_script_bracket_pairs() {
    assert!(ScriptKind::LBracket.is_opening());
    assert!(ScriptKind::RParen.is_closing());
    assert!(!ScriptKind::Ident.is_opening());
    assert!(!ScriptKind::BlockComment.is_closing());
}
