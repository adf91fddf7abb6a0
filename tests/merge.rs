//! Integration tests for documents mixing several languages.

use indenta_engine::{
    IndentConfig, IndentMode, IndentRequest, LanguageIndenter, Reindenter, TextDocument,
};
use indenta_lang::{HtmlLanguage, Source};
use indenta_markup::MarkupIndenter;

fn reformat(text: &str) -> String {
    let source = Source::html(text);
    let mut doc = TextDocument::new(text);
    source
        .reindenter(IndentConfig::new().indent_width(2))
        .reindent(&mut doc, &source, IndentRequest::whole(text.len(), IndentMode::Reformat))
        .unwrap();
    doc.into_string()
}

#[test]
fn test_script_nested_in_markup() {
    assert_eq!(
        reformat("<div>\n<script>\nif (a) {\nb();\n}\n</script>\n</div>\n"),
        "<div>\n  <script>\n    if (a) {\n      b();\n    }\n  </script>\n</div>\n"
    );
}

#[test]
fn test_style_nested_in_markup() {
    assert_eq!(
        reformat("<head>\n<style>\na {\ncolor: red;\n}\n</style>\n</head>\n"),
        "<head>\n  <style>\n    a {\n      color: red;\n    }\n  </style>\n</head>\n"
    );
}

#[test]
fn test_markup_after_script_resumes() {
    assert_eq!(
        reformat("<div>\n<script>\nx();\n</script>\n<p>after</p>\n</div>\n"),
        "<div>\n  <script>\n    x();\n  </script>\n  <p>after</p>\n</div>\n"
    );
}

#[test]
fn test_unowned_block_moves_with_its_start_line() {
    // no pass for the style sheet: its lines keep their shape relative to
    // the <style> line
    let text = "<div>\n<style>\n  a {\n    b: c;\n  }\n</style>\n</div>\n";
    let source = Source::html(text);
    let mut doc = TextDocument::new(text);
    let outcome = Reindenter::new(IndentConfig::new().indent_width(2))
        .with_pass(LanguageIndenter::new(
            MarkupIndenter::new(HtmlLanguage::new()),
            source.html_blocks().to_vec(),
        ))
        .reindent(&mut doc, &source, IndentRequest::whole(text.len(), IndentMode::Reformat))
        .unwrap();
    assert_eq!(
        doc.as_str(),
        "<div>\n  <style>\n    a {\n      b: c;\n    }\n  </style>\n</div>\n"
    );
    assert!(outcome.suggested.keys().all(|line| !(2..=4).contains(line)));
}

#[test]
fn test_whole_document_is_idempotent() {
    let once = reformat("<div>\n<script>\nif (a) {\nb();\n}\n</script>\n<ul>\n<li>x\n</ul>\n</div>\n");
    assert_eq!(reformat(&once), once);
}
