//! Backward search for the point from which tags can be re-read safely.

use indenta_common::{Interner, OffsetRanges, Symbol};
use indenta_engine::{IndentDocument, IndentResult, JoinedTokens};

use crate::language::MarkupLanguage;

/// Result of [`search`].
#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct StableStart {
    pub offset: usize,
    /// Closing-tag names whose opening tag is not after `offset`.
    pub eliminated: Vec<usize>,
}

#[derive(Debug)]
struct PendingClose {
    name: Symbol,
    offset: usize,
    /// Last offset of the closing `>`.
    last: usize,
}

/// Walk back from `start` to the nearest unclosed opening tag whose closing
/// tag is not optional. Tag pairs completed before `start` go into `ignore`.
pub(crate) fn search<M: MarkupLanguage>(
    lang: &M,
    interner: &mut Interner,
    doc: &dyn IndentDocument,
    tokens: &mut JoinedTokens<'_, M::Kind>,
    start: usize,
    ignore: &mut OffsetRanges,
) -> IndentResult<StableStart> {
    if !tokens.seek(start, false) {
        return Ok(StableStart {
            offset: start,
            eliminated: Vec::new(),
        });
    }
    if tokens.offset().is_some_and(|offset| offset >= start) && !tokens.retreat() {
        return Ok(StableStart {
            offset: start,
            eliminated: Vec::new(),
        });
    }

    let mut closes: Vec<PendingClose> = Vec::new();
    let mut eliminated = Vec::new();
    let mut last_end_symbol = None;

    let offset = loop {
        let Some(token) = tokens.token() else {
            break start;
        };
        let text = doc.text(token.start(), token.end())?;
        let kind = &token.kind;

        if lang.is_stable_formatting_start(kind, text) {
            break token.start();
        }

        if lang.is_end_tag_symbol(kind) || lang.is_end_tag_closing_symbol(kind) {
            last_end_symbol = Some(token.end().saturating_sub(1));
        } else if lang.is_close_tag_name(kind) {
            closes.push(PendingClose {
                name: interner.intern(lang.tag_name(text)),
                offset: token.start(),
                last: last_end_symbol.unwrap_or(token.end().saturating_sub(1)),
            });
        } else if lang.is_open_tag_name(kind) {
            let name = lang.tag_name(text);
            let tag_start = tag_start(lang, tokens, token.start());
            if !lang.is_empty_tag(name) {
                let sym = interner.intern(name);
                if let Some(pos) = closes.iter().rposition(|c| c.name == sym) {
                    // closes nested inside this pair never found their tag
                    eliminated.extend(closes.drain(pos + 1..).map(|c| c.offset));
                    if let Some(close) = closes.pop() {
                        ignore.add(tag_start, close.last);
                    }
                } else if !lang.is_closing_tag_optional(name) {
                    break tag_start;
                }
            }
        }

        if !tokens.retreat() {
            break token.start();
        }
    };

    eliminated.extend(closes.into_iter().map(|c| c.offset));
    eliminated.sort_unstable();
    Ok(StableStart { offset, eliminated })
}

/// Offset of the `<` in front of an opening tag name.
fn tag_start<M: MarkupLanguage>(
    lang: &M,
    tokens: &mut JoinedTokens<'_, M::Kind>,
    name_offset: usize,
) -> usize {
    let mark = tokens.mark();
    let mut offset = name_offset;
    if tokens.retreat() {
        if let Some(prev) = tokens.token() {
            if lang.is_start_tag_symbol(&prev.kind) {
                offset = prev.start();
            }
        }
    }
    tokens.reset_to(mark);
    offset
}
