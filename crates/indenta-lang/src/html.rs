//! HTML tag rules.

use indenta_common::LanguageId;
use indenta_lexer::MarkupKind;
use indenta_markup::MarkupLanguage;

use crate::source::HTML;

/// Elements without content or closing tag.
const VOID: &[&str] = &[
    "area", "base", "basefont", "br", "col", "command", "embed", "frame", "hr", "img", "input",
    "isindex", "keygen", "link", "meta", "param", "source", "track", "wbr",
];

const OPTIONAL_CLOSE: &[&str] = &[
    "body", "caption", "colgroup", "dd", "dt", "head", "html", "li", "optgroup", "option", "p",
    "rp", "rt", "tbody", "td", "tfoot", "th", "thead", "tr",
];

const OPTIONAL_OPEN: &[&str] = &["body", "colgroup", "head", "html", "tbody"];

const PHRASING: &[&str] = &[
    "a", "abbr", "area", "audio", "b", "bdi", "bdo", "big", "br", "button", "canvas", "cite",
    "code", "data", "datalist", "del", "dfn", "em", "embed", "font", "i", "iframe", "img",
    "input", "ins", "kbd", "label", "link", "map", "mark", "math", "meta", "meter", "noscript",
    "object", "output", "picture", "progress", "q", "ruby", "s", "samp", "script", "select",
    "slot", "small", "span", "strike", "strong", "sub", "sup", "svg", "template", "textarea",
    "time", "tt", "u", "var", "video", "wbr",
];

const FLOW: &[&str] = &[
    "a", "abbr", "address", "area", "article", "aside", "audio", "b", "bdi", "bdo", "big",
    "blockquote", "br", "button", "canvas", "center", "cite", "code", "data", "datalist", "del",
    "details", "dfn", "dialog", "dir", "div", "dl", "em", "embed", "fieldset", "figure", "font",
    "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6", "header", "hgroup", "hr", "i",
    "iframe", "img", "input", "ins", "kbd", "label", "link", "main", "map", "mark", "math",
    "menu", "meta", "meter", "nav", "noscript", "object", "ol", "output", "p", "picture", "pre",
    "progress", "q", "ruby", "s", "samp", "script", "search", "section", "select", "slot",
    "small", "span", "strike", "strong", "style", "sub", "sup", "svg", "table", "template",
    "textarea", "time", "tt", "u", "ul", "var", "video", "wbr",
];

/// Known elements that only appear inside specific parents.
const STRUCTURAL: &[&str] = &[
    "base", "body", "caption", "col", "colgroup", "dd", "dt", "figcaption", "frame", "frameset",
    "head", "html", "legend", "li", "noframes", "optgroup", "option", "param", "rp", "rt",
    "source", "summary", "tbody", "td", "tfoot", "th", "thead", "title", "tr", "track",
];

const HTML_CHILDREN: &[&str] = &["head", "body"];
const HEAD_CHILDREN: &[&str] = &[
    "base", "link", "meta", "noscript", "script", "style", "template", "title",
];
const ROW_CHILDREN: &[&str] = &["script", "td", "template", "th"];
const ROW_GROUP_CHILDREN: &[&str] = &["script", "template", "tr"];
const COLGROUP_CHILDREN: &[&str] = &["col", "template"];
const OPTGROUP_CHILDREN: &[&str] = &["option", "script", "template"];

/// HTML rules for the markup strategy.
/// HTML 标签规则。
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlLanguage;

impl HtmlLanguage {
    pub fn new() -> Self {
        Self
    }
}

impl MarkupLanguage for HtmlLanguage {
    type Kind = MarkupKind;

    fn language(&self) -> LanguageId {
        HTML
    }

    fn is_open_tag_name(&self, kind: &MarkupKind) -> bool {
        *kind == MarkupKind::OpenTagName
    }

    fn is_close_tag_name(&self, kind: &MarkupKind) -> bool {
        *kind == MarkupKind::CloseTagName
    }

    fn is_start_tag_symbol(&self, kind: &MarkupKind) -> bool {
        *kind == MarkupKind::TagOpen
    }

    fn is_start_tag_closing_symbol(&self, kind: &MarkupKind) -> bool {
        *kind == MarkupKind::TagCloseOpen
    }

    fn is_end_tag_symbol(&self, kind: &MarkupKind) -> bool {
        *kind == MarkupKind::TagEnd
    }

    fn is_end_tag_closing_symbol(&self, kind: &MarkupKind) -> bool {
        *kind == MarkupKind::TagSelfClose
    }

    fn is_tag_argument(&self, kind: &MarkupKind) -> bool {
        *kind == MarkupKind::AttributeName
    }

    fn is_block_comment(&self, kind: &MarkupKind) -> bool {
        *kind == MarkupKind::Comment
    }

    fn is_tag_content(&self, kind: &MarkupKind) -> bool {
        *kind == MarkupKind::Text
    }

    fn is_whitespace(&self, kind: &MarkupKind, _text: &str) -> bool {
        *kind == MarkupKind::Whitespace
    }

    fn is_stable_formatting_start(&self, kind: &MarkupKind, _text: &str) -> bool {
        *kind == MarkupKind::Declaration
    }

    fn is_known_tag(&self, name: &str) -> bool {
        FLOW.contains(&name) || STRUCTURAL.contains(&name)
    }

    fn is_closing_tag_optional(&self, name: &str) -> bool {
        OPTIONAL_CLOSE.contains(&name)
    }

    fn is_opening_tag_optional(&self, name: &str) -> bool {
        OPTIONAL_OPEN.contains(&name)
    }

    fn is_empty_tag(&self, name: &str) -> bool {
        VOID.contains(&name)
    }

    fn is_tag_content_unformattable(&self, name: &str) -> bool {
        matches!(name, "pre" | "textarea")
    }

    fn tag_children(&self, name: &str) -> Option<&[&'static str]> {
        let children = match name {
            "html" => HTML_CHILDREN,
            "head" => HEAD_CHILDREN,
            "body" | "li" | "dd" | "dt" | "td" | "th" | "caption" => FLOW,
            "p" | "rt" | "rp" => PHRASING,
            "tr" => ROW_CHILDREN,
            "thead" | "tbody" | "tfoot" => ROW_GROUP_CHILDREN,
            "colgroup" => COLGROUP_CHILDREN,
            "optgroup" => OPTGROUP_CHILDREN,
            "option" => &[],
            _ => return None,
        };
        Some(children)
    }

    fn is_foreign_language_tag(&self, name: &str) -> bool {
        matches!(name, "script" | "style")
    }
}
