//! Capabilities a markup language provides to the indenter.

use indenta_common::LanguageId;

/// Token classification and tag rules of a markup language.
/// 标记语言的 token 分类与标签规则。
///
/// Token predicates look at kinds only; tag predicates get folded tag names.
pub trait MarkupLanguage {
    type Kind;

    fn language(&self) -> LanguageId;

    /// Name of an opening tag, e.g. `div` in `<div>`.
    fn is_open_tag_name(&self, kind: &Self::Kind) -> bool;
    /// Name of a closing tag, e.g. `div` in `</div>`.
    fn is_close_tag_name(&self, kind: &Self::Kind) -> bool;
    /// `<`
    fn is_start_tag_symbol(&self, kind: &Self::Kind) -> bool;
    /// `</`
    fn is_start_tag_closing_symbol(&self, kind: &Self::Kind) -> bool;
    /// `>`
    fn is_end_tag_symbol(&self, kind: &Self::Kind) -> bool;
    /// `/>`
    fn is_end_tag_closing_symbol(&self, kind: &Self::Kind) -> bool;
    /// Attribute name of an opening tag.
    fn is_tag_argument(&self, kind: &Self::Kind) -> bool;
    fn is_block_comment(&self, kind: &Self::Kind) -> bool;
    /// Text between tags.
    fn is_tag_content(&self, kind: &Self::Kind) -> bool;

    fn is_whitespace(&self, kind: &Self::Kind, text: &str) -> bool {
        let _ = kind;
        text.trim().is_empty()
    }

    /// Tokens at which a backward search may stop, such as a document root.
    fn is_stable_formatting_start(&self, kind: &Self::Kind, text: &str) -> bool {
        let _ = (kind, text);
        false
    }

    /// Tag name carried by a tag-name token.
    fn tag_name<'t>(&self, text: &'t str) -> &'t str {
        text
    }

    /// Only known tags close elements implicitly.
    fn is_known_tag(&self, name: &str) -> bool {
        let _ = name;
        true
    }

    fn is_closing_tag_optional(&self, name: &str) -> bool;
    fn is_opening_tag_optional(&self, name: &str) -> bool;
    /// Void element without content or closing tag.
    fn is_empty_tag(&self, name: &str) -> bool;
    /// Content kept byte-for-byte, like preformatted text.
    fn is_tag_content_unformattable(&self, name: &str) -> bool;
    /// Tags allowed inside an element whose closing tag is optional. `None`
    /// means unknown, and the element is never closed implicitly.
    fn tag_children(&self, name: &str) -> Option<&[&'static str]>;

    /// Element whose content is another language (script, style).
    fn is_foreign_language_tag(&self, name: &str) -> bool {
        let _ = name;
        false
    }

    fn inline_openers(&self) -> &[&str] {
        &[]
    }
}
