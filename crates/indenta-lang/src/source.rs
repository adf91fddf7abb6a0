//! Lexed documents and the passes that indent them.

use indenta_common::{LanguageId, Span, Token};
use indenta_engine::{
    CodeBlock, IndentConfig, LanguageIndenter, LanguageLayout, Reindenter, TokenSequence,
};
use indenta_lexer::{lex_script, LexError, MarkupKind, MarkupLexer, ScriptKind};
use indenta_markup::MarkupIndenter;

use crate::html::HtmlLanguage;
use crate::script::ScriptIndenter;

pub const HTML: LanguageId = LanguageId::new("html");
pub const SCRIPT: LanguageId = LanguageId::new("script");
pub const CSS: LanguageId = LanguageId::new("css");

/// What a document is written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// HTML, possibly with embedded scripts and styles.
    Html,
    Script,
    Css,
}

impl SourceKind {
    /// Guess the kind from a file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "html" | "htm" | "xhtml" | "tpl" => Some(SourceKind::Html),
            "js" | "mjs" | "cjs" | "ts" | "json" => Some(SourceKind::Script),
            "css" => Some(SourceKind::Css),
            _ => None,
        }
    }
}

/// A document split into per-language code blocks.
/// 按语言拆分为代码块的文档。
#[derive(Debug, Clone)]
pub struct Source {
    kind: SourceKind,
    len: usize,
    html: Vec<CodeBlock<MarkupKind>>,
    scripts: Vec<CodeBlock<ScriptKind>>,
    styles: Vec<CodeBlock<ScriptKind>>,
    /// Embedded regions, by ascending offset.
    regions: Vec<(Span, LanguageId)>,
    errors: Vec<LexError>,
}

impl Source {
    pub fn lex(text: &str, kind: SourceKind) -> Self {
        match kind {
            SourceKind::Html => Self::html(text),
            SourceKind::Script => Self::single(text, kind, SCRIPT),
            SourceKind::Css => Self::single(text, kind, CSS),
        }
    }

    /// Lex an HTML document.
    pub fn html(text: &str) -> Self {
        let output = MarkupLexer::new(text).tokenize();
        let mut source = Self::empty(SourceKind::Html, text.len());
        source.errors = output.errors;

        // the markup tokens, cut into sequences around embedded content
        let mut sequences = Vec::new();
        let mut tokens = output.tokens.into_iter().peekable();
        for region in &output.regions {
            let before: Vec<Token<MarkupKind>> = std::iter::from_fn(|| {
                tokens.next_if(|t| t.end() <= usize::from(region.span.start))
            })
            .collect();
            if !before.is_empty() {
                sequences.push(TokenSequence::new(HTML, before));
            }

            let language = if region.tag == "style" { CSS } else { SCRIPT };
            let start = usize::from(region.span.start);
            let block = CodeBlock::single(TokenSequence::new(
                language,
                lex_script(&text[region.span.range()], start),
            ));
            if language == CSS {
                source.styles.push(block);
            } else {
                source.scripts.push(block);
            }
            source.regions.push((region.span, language));
        }
        let rest: Vec<Token<MarkupKind>> = tokens.collect();
        if !rest.is_empty() {
            sequences.push(TokenSequence::new(HTML, rest));
        }
        if !sequences.is_empty() {
            source.html.push(CodeBlock::new(sequences));
        }

        for error in &source.errors {
            log::debug!(target: "indenta::lexer", "{error}");
        }
        source
    }

    fn single(text: &str, kind: SourceKind, language: LanguageId) -> Self {
        let mut source = Self::empty(kind, text.len());
        let block = CodeBlock::single(TokenSequence::new(language, lex_script(text, 0)));
        if language == CSS {
            source.styles.push(block);
        } else {
            source.scripts.push(block);
        }
        source
    }

    fn empty(kind: SourceKind, len: usize) -> Self {
        Self {
            kind,
            len,
            html: Vec::new(),
            scripts: Vec::new(),
            styles: Vec::new(),
            regions: Vec::new(),
            errors: Vec::new(),
        }
    }

    pub fn kind(&self) -> SourceKind {
        self.kind
    }

    /// Problems found while lexing. The document is indented regardless.
    pub fn errors(&self) -> &[LexError] {
        &self.errors
    }

    pub fn html_blocks(&self) -> &[CodeBlock<MarkupKind>] {
        &self.html
    }

    pub fn script_blocks(&self) -> &[CodeBlock<ScriptKind>] {
        &self.scripts
    }

    pub fn style_blocks(&self) -> &[CodeBlock<ScriptKind>] {
        &self.styles
    }

    /// A reindenter with a pass for every language present. Markup runs
    /// first, embedded languages after it.
    pub fn reindenter<'p>(&self, config: IndentConfig) -> Reindenter<'p> {
        let mut reindenter = Reindenter::new(config);
        if !self.html.is_empty() {
            reindenter.push_pass(Box::new(LanguageIndenter::new(
                MarkupIndenter::new(HtmlLanguage::new()),
                self.html.clone(),
            )));
        }
        if !self.scripts.is_empty() {
            reindenter.push_pass(Box::new(LanguageIndenter::new(
                ScriptIndenter::new(SCRIPT),
                self.scripts.clone(),
            )));
        }
        if !self.styles.is_empty() {
            reindenter.push_pass(Box::new(LanguageIndenter::new(
                ScriptIndenter::new(CSS),
                self.styles.clone(),
            )));
        }
        reindenter
    }
}

impl LanguageLayout for Source {
    fn language_at(&self, offset: usize) -> Option<LanguageId> {
        match self.kind {
            SourceKind::Script => return Some(SCRIPT),
            SourceKind::Css => return Some(CSS),
            SourceKind::Html => {}
        }
        if offset > self.len {
            return None;
        }
        let pos = self.regions.partition_point(|(span, _)| usize::from(span.end) <= offset);
        match self.regions.get(pos) {
            Some((span, language)) if span.contains(offset) => Some(*language),
            _ => Some(HTML),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_html_is_cut_around_scripts() {
        let text = "<div>\n<script>\nx();\n</script>\n<style>a{}</style>\n</div>\n";
        let source = Source::html(text);
        assert_eq!(source.html_blocks().len(), 1);
        assert_eq!(source.html_blocks()[0].sequences.len(), 3);
        assert_eq!(source.script_blocks().len(), 1);
        assert_eq!(source.style_blocks().len(), 1);

        let x = text.find("x()").unwrap();
        assert_eq!(source.language_at(x), Some(SCRIPT));
        assert_eq!(source.language_at(text.find("a{").unwrap()), Some(CSS));
        assert_eq!(source.language_at(0), Some(HTML));
        assert_eq!(source.language_at(text.find("</script").unwrap()), Some(HTML));
        assert_eq!(source.language_at(text.len() + 1), None);
    }

    #[test]
    fn test_extension_kinds() {
        assert_eq!(SourceKind::from_extension("HTML"), Some(SourceKind::Html));
        assert_eq!(SourceKind::from_extension("js"), Some(SourceKind::Script));
        assert_eq!(SourceKind::from_extension("css"), Some(SourceKind::Css));
        assert_eq!(SourceKind::from_extension("rs"), None);
    }

    #[test]
    fn test_plain_script_source() {
        let source = Source::lex("a {\n}\n", SourceKind::Css);
        assert!(source.html_blocks().is_empty());
        assert_eq!(source.style_blocks().len(), 1);
        assert_eq!(source.language_at(2), Some(CSS));
    }
}
