//! Integration tests for indenta-lang crate.

use indenta_engine::{IndentConfig, IndentMode, IndentRequest, LanguageLayout, TextDocument};
use indenta_lang::{HtmlLanguage, Source, SourceKind, CSS, HTML, SCRIPT};
use indenta_markup::MarkupLanguage;

fn reformat(text: &str, kind: SourceKind, width: usize) -> String {
    let source = Source::lex(text, kind);
    let mut doc = TextDocument::new(text);
    source
        .reindenter(IndentConfig::new().indent_width(width))
        .reindent(&mut doc, &source, IndentRequest::whole(text.len(), IndentMode::Reformat))
        .unwrap();
    doc.into_string()
}

// HTML rules

#[test]
fn test_html_tag_tables() {
    let html = HtmlLanguage::new();
    assert!(html.is_empty_tag("br"));
    assert!(html.is_empty_tag("img"));
    assert!(!html.is_empty_tag("div"));
    assert!(html.is_closing_tag_optional("li"));
    assert!(html.is_closing_tag_optional("td"));
    assert!(!html.is_closing_tag_optional("ul"));
    assert!(html.is_opening_tag_optional("tbody"));
    assert!(html.is_tag_content_unformattable("pre"));
    assert!(html.is_tag_content_unformattable("textarea"));
    assert!(html.is_foreign_language_tag("script"));
    assert!(html.is_known_tag("section"));
    assert!(!html.is_known_tag("my-widget"));
}

#[test]
fn test_table_cells() {
    assert_eq!(
        reformat(
            "<table>\n<tr>\n<td>a\n<td>b\n<tr>\n<td>c\n</table>\n",
            SourceKind::Html,
            2
        ),
        "<table>\n  <tr>\n    <td>a\n    <td>b\n  <tr>\n    <td>c\n</table>\n"
    );
}

#[test]
fn test_doctype_and_document() {
    assert_eq!(
        reformat(
            "<!DOCTYPE html>\n<html>\n<body>\n<div>\nx\n</div>\n</body>\n</html>\n",
            SourceKind::Html,
            2
        ),
        "<!DOCTYPE html>\n<html>\n  <body>\n    <div>\n      x\n    </div>\n  </body>\n</html>\n"
    );
}

// Scripts and style sheets

#[test]
fn test_script_file() {
    assert_eq!(
        reformat(
            "function f() {\nconst a = [\n1,\n2,\n];\nreturn a;\n}\n",
            SourceKind::Script,
            2
        ),
        "function f() {\n  const a = [\n    1,\n    2,\n  ];\n  return a;\n}\n"
    );
}

#[test]
fn test_css_file() {
    assert_eq!(
        reformat(
            "@media print {\nbody {\nmargin: 0;\n}\n}\n",
            SourceKind::Css,
            4
        ),
        "@media print {\n    body {\n        margin: 0;\n    }\n}\n"
    );
}

#[test]
fn test_brackets_in_strings_and_comments_do_not_count() {
    assert_eq!(
        reformat("{\nx = \"{\";\n// }\ny();\n}\n", SourceKind::Script, 2),
        "{\n  x = \"{\";\n  // }\n  y();\n}\n"
    );
}

// Layout

#[test]
fn test_layout_of_embedded_regions() {
    let text = "<p>\n<script>x()</script>\n<style>a{}</style>\n";
    let source = Source::lex(text, SourceKind::Html);
    assert_eq!(source.kind(), SourceKind::Html);
    assert_eq!(source.language_at(0), Some(HTML));
    assert_eq!(source.language_at(text.find("x()").unwrap()), Some(SCRIPT));
    assert_eq!(source.language_at(text.find("a{").unwrap()), Some(CSS));
    assert!(source.errors().is_empty());
}

#[test]
fn test_lex_errors_do_not_stop_indentation() {
    let text = "<div>\n<p>x\n<!-- open\n";
    let source = Source::lex(text, SourceKind::Html);
    assert_eq!(source.errors().len(), 1);
    assert_eq!(reformat(text, SourceKind::Html, 2).lines().next(), Some("<div>"));
}
