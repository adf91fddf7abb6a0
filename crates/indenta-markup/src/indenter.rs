//! Tag-stack indentation strategy.
//! 基于标签栈的缩进策略。
//!
//! Every opening tag becomes an `Indent` at the start of the line after its
//! `>`, every closing tag a `Return`. A closing tag at the start of a line
//! returns on that line. Tags opened and closed on one line cancel out.

use indenta_common::{Interner, LanguageId, OffsetRanges, Symbol, Token};
use indenta_engine::{
    CommandKind, IndentCommand, IndentDocument, IndentResult, IndentStrategy, JoinedTokens,
    LineContext,
};

use crate::item::{ItemArena, ItemId, ItemState, MarkupItem};
use crate::language::MarkupLanguage;
use crate::stable_start;

/// Opening tag whose `>` was not reached yet.
#[derive(Debug, Clone, Copy)]
struct OpenTag {
    item: ItemId,
    line: u64,
    line_first_non_white: usize,
    /// Column of the first attribute relative to the tag's line.
    attribute_indent: Option<usize>,
    seen_argument: bool,
}

/// [`IndentStrategy`] for a [`MarkupLanguage`].
pub struct MarkupIndenter<M> {
    lang: M,
    interner: Interner,
    items: ItemArena,
    stack: Vec<ItemId>,
    /// Items whose `Indent`/`Return` goes to the start of the next line.
    pending: Vec<ItemId>,
    open_tag: Option<OpenTag>,
    /// Inside content which must not be reindented.
    unformattable: Option<Symbol>,
    /// Closing tags found without an opening tag by the stable start search.
    eliminated_closes: Vec<usize>,
    line: u64,
}

impl<M: MarkupLanguage> MarkupIndenter<M> {
    pub fn new(lang: M) -> Self {
        Self {
            lang,
            interner: Interner::new(),
            items: ItemArena::default(),
            stack: Vec::new(),
            pending: Vec::new(),
            open_tag: None,
            unformattable: None,
            eliminated_closes: Vec::new(),
            line: 0,
        }
    }

    /// Number of tags currently open.
    pub fn open_depth(&self) -> usize {
        self.stack.len()
    }

    /// Names of the open tags, outermost first.
    pub fn open_tags(&self) -> Vec<&str> {
        self.stack
            .iter()
            .map(|&id| self.interner.get(self.items.get(id).name))
            .collect()
    }

    pub fn items(&self) -> &ItemArena {
        &self.items
    }

    fn intern_tag(&mut self, text: &str) -> Symbol {
        let name = self.lang.tag_name(text);
        self.interner.intern(name)
    }

    fn new_open_item(&mut self, name: Symbol, offset: usize) -> MarkupItem {
        let text = self.interner.get(name).to_owned();
        let mut item = MarkupItem::opening(name, offset);
        item.optional_close = self.lang.is_closing_tag_optional(&text);
        item.empty = self.lang.is_empty_tag(&text);
        item.foreign = self.lang.is_foreign_language_tag(&text);
        if item.optional_close {
            let children = self.lang.tag_children(&text).map(<[_]>::to_vec);
            item.children =
                children.map(|names| names.into_iter().map(|c| self.interner.intern(c)).collect());
        }
        item
    }

    /// Open tags closed implicitly when `name` opens, innermost first.
    fn implied_by_open(&self, name: Symbol) -> Vec<ItemId> {
        let mut closes = Vec::new();
        for &id in self.stack.iter().rev() {
            let item = self.items.get(id);
            if !item.optional_close {
                break;
            }
            let Some(children) = &item.children else {
                break;
            };
            if children.contains(&name)
                || children
                    .iter()
                    .any(|&c| self.lang.is_opening_tag_optional(self.interner.get(c)))
            {
                break;
            }
            closes.push(id);
        }
        closes
    }

    /// The open item a closing tag `name` closes, and the items between it
    /// and the top of the stack. One tag with a mandatory closing tag may be
    /// stepped over.
    fn find_open(&self, name: Symbol) -> Option<(ItemId, Vec<ItemId>)> {
        let mut skipped = false;
        let mut between = Vec::new();
        for &id in self.stack.iter().rev() {
            let item = self.items.get(id);
            if item.name == name {
                return Some((id, between));
            }
            if !item.optional_close {
                if skipped {
                    return None;
                }
                skipped = true;
            }
            between.push(id);
        }
        None
    }

    fn on_open_tag_name(
        &mut self,
        name: Symbol,
        at: usize,
        first_non_white: usize,
        leading: bool,
        commands: &mut Vec<IndentCommand>,
    ) {
        if self.open_tag.is_some() {
            // `<a <b`: the first tag never got its `>`
            self.finish_open_tag(false, at, commands);
        }
        if self.lang.is_known_tag(self.interner.get(name)) {
            for id in self.implied_by_open(name) {
                self.close_item(id, true, leading, at, commands);
            }
        }
        let item = self.new_open_item(name, at);
        let id = self.items.push(item);
        self.stack.push(id);
        self.open_tag = Some(OpenTag {
            item: id,
            line: self.line,
            line_first_non_white: first_non_white,
            attribute_indent: None,
            seen_argument: false,
        });
    }

    fn on_close_tag_name(
        &mut self,
        name: Symbol,
        at: usize,
        leading: bool,
        commands: &mut Vec<IndentCommand>,
    ) {
        if let Some(pos) = self.eliminated_closes.iter().position(|&o| o == at) {
            self.eliminated_closes.swap_remove(pos);
            self.eliminate(name, at);
            return;
        }
        match self.find_open(name) {
            Some((open, between)) => {
                for id in between {
                    self.close_item(id, true, leading, at, commands);
                }
                self.close_item(open, false, leading, at, commands);
            }
            None => {
                log::debug!(
                    target: "indenta::markup",
                    "no opening tag for </{}> at {at}, ignoring it",
                    self.interner.get(name)
                );
                self.eliminate(name, at);
            }
        }
    }

    fn eliminate(&mut self, name: Symbol, at: usize) {
        let id = self.items.push(MarkupItem::closing(name, at, None, true));
        self.items.transition(id, ItemState::Eliminated);
    }

    fn on_tag_argument(&mut self, at: usize) {
        let line = self.line;
        if let Some(tag) = self.open_tag.as_mut() {
            if !tag.seen_argument {
                tag.seen_argument = true;
                if tag.line == line {
                    tag.attribute_indent = at.checked_sub(tag.line_first_non_white);
                }
            }
        }
    }

    /// `>` or `/>` of the current opening tag.
    fn finish_open_tag(&mut self, self_closing: bool, at: usize, commands: &mut Vec<IndentCommand>) {
        let Some(tag) = self.open_tag.take() else {
            return;
        };
        let item = self.items.get(tag.item);
        let (name, empty, foreign) = (item.name, item.empty, item.foreign);
        if self_closing || empty {
            self.close_item(tag.item, true, false, at, commands);
            return;
        }

        self.items.transition(tag.item, ItemState::Pending);
        self.pending.push(tag.item);
        if self.lang.is_tag_content_unformattable(self.interner.get(name)) {
            self.unformattable = Some(name);
        }
        if foreign {
            commands.push(IndentCommand::new(CommandKind::BlockStart, at));
        }
    }

    /// Close `open`, emitting a `Return` now (`leading`), on the next line,
    /// or not at all when the tag never took effect.
    fn close_item(
        &mut self,
        open: ItemId,
        is_virtual: bool,
        leading: bool,
        at: usize,
        commands: &mut Vec<IndentCommand>,
    ) {
        if let Some(pos) = self.stack.iter().rposition(|&id| id == open) {
            self.stack.remove(pos);
        }
        let name = self.items.get(open).name;
        let close = self
            .items
            .push(MarkupItem::closing(name, at, Some(open), is_virtual));

        match self.items.state(open) {
            ItemState::Open | ItemState::Pending => {
                self.pending.retain(|&id| id != open);
                self.items.transition(open, ItemState::Cancelled);
                self.items.transition(close, ItemState::Cancelled);
                if self.open_tag.is_some_and(|t| t.item == open) {
                    self.open_tag = None;
                }
            }
            ItemState::Emitted if leading => {
                commands.push(IndentCommand::ret(at));
                self.items.transition(close, ItemState::Emitted);
            }
            ItemState::Emitted => {
                self.items.transition(close, ItemState::Pending);
                self.pending.push(close);
            }
            ItemState::Cancelled | ItemState::Eliminated => {}
        }

        if self.unformattable == Some(name) {
            self.unformattable = None;
        }
        if self.items.get(open).foreign && !is_virtual {
            commands.push(IndentCommand::new(CommandKind::BlockEnd, at));
        }
    }

    fn visit(
        &mut self,
        token: &Token<M::Kind>,
        text: &str,
        first_non_white: usize,
        leading: &mut bool,
        commands: &mut Vec<IndentCommand>,
    ) {
        let kind = &token.kind;
        let at = token.start();
        if self.lang.is_whitespace(kind, text)
            || self.lang.is_start_tag_symbol(kind)
            || self.lang.is_start_tag_closing_symbol(kind)
        {
            return;
        }

        if self.lang.is_open_tag_name(kind) {
            let name = self.intern_tag(text);
            self.on_open_tag_name(name, at, first_non_white, *leading, commands);
            *leading = false;
        } else if self.lang.is_close_tag_name(kind) {
            let name = self.intern_tag(text);
            self.on_close_tag_name(name, at, *leading, commands);
        } else if self.lang.is_end_tag_closing_symbol(kind) {
            self.finish_open_tag(true, at, commands);
            *leading = false;
        } else if self.lang.is_end_tag_symbol(kind) {
            // the `>` of a closing tag keeps the line leading
            if self.open_tag.is_some() {
                self.finish_open_tag(false, at, commands);
                *leading = false;
            }
        } else if self.lang.is_tag_argument(kind) {
            self.on_tag_argument(at);
            *leading = false;
        } else {
            *leading = false;
        }
    }

    /// Does the line start with the closing tag of `name`?
    fn starts_with_close(
        &self,
        doc: &dyn IndentDocument,
        tokens: &mut JoinedTokens<'_, M::Kind>,
        at: usize,
        name: Symbol,
    ) -> IndentResult<bool> {
        let mark = tokens.mark();
        let mut found = false;
        if tokens.seek(at, true) {
            let opens_close = tokens
                .token()
                .is_some_and(|t| t.start() == at && self.lang.is_start_tag_closing_symbol(&t.kind));
            if opens_close && tokens.advance() {
                if let Some(t) = tokens.token() {
                    if self.lang.is_close_tag_name(&t.kind) {
                        let text = doc.text(t.start(), t.end())?;
                        found = self.interner.lookup(self.lang.tag_name(text)) == Some(name);
                    }
                }
            }
        }
        tokens.reset_to(mark);
        Ok(found)
    }

    /// Forget items that neither the stack nor the next line refer to.
    fn discard_processed(&mut self) {
        let mut live: Vec<ItemId> = self.stack.iter().chain(&self.pending).copied().collect();
        live.extend(self.open_tag.map(|t| t.item));
        let remap = self.items.compact(&live);
        let renumber = |id: &mut ItemId| {
            if let Some(new) = remap[id.index()] {
                *id = new;
            }
        };
        self.stack.iter_mut().for_each(renumber);
        self.pending.iter_mut().for_each(renumber);
        if let Some(tag) = self.open_tag.as_mut() {
            renumber(&mut tag.item);
        }
    }

    fn effect_of(&self, id: ItemId, anchor: usize) -> IndentCommand {
        if self.items.get(id).opening {
            IndentCommand::indent(anchor)
        } else {
            IndentCommand::ret(anchor)
        }
    }
}

impl<M: MarkupLanguage> IndentStrategy for MarkupIndenter<M> {
    type Kind = M::Kind;

    fn language(&self) -> LanguageId {
        self.lang.language()
    }

    fn reset(&mut self) {
        self.interner.clear();
        self.items.clear();
        self.stack.clear();
        self.pending.clear();
        self.open_tag = None;
        self.unformattable = None;
        self.eliminated_closes.clear();
        self.line = 0;
    }

    fn format_stable_start(
        &mut self,
        doc: &dyn IndentDocument,
        tokens: &mut JoinedTokens<'_, Self::Kind>,
        start: usize,
        _end: usize,
        ignore: &mut OffsetRanges,
    ) -> IndentResult<usize> {
        let found = stable_start::search(&self.lang, &mut self.interner, doc, tokens, start, ignore)?;
        if !found.eliminated.is_empty() {
            log::debug!(target: "indenta::markup", "closing tags without opening tag at {:?}", found.eliminated);
        }
        self.eliminated_closes = found.eliminated;
        Ok(found.offset.min(start))
    }

    fn line_indent(
        &mut self,
        ctx: &mut LineContext<'_, '_, Self::Kind>,
        next_line: &mut Vec<IndentCommand>,
    ) -> IndentResult<Vec<IndentCommand>> {
        self.line += 1;
        let doc = ctx.doc;
        let anchor = ctx.line_start;
        let mut commands = Vec::new();

        for id in std::mem::take(&mut self.pending) {
            commands.push(self.effect_of(id, anchor));
            self.items.transition(id, ItemState::Emitted);
        }
        if let Some(tag) = self.open_tag {
            let mut cont = IndentCommand::continuation(anchor);
            if let Some(columns) = tag.attribute_indent {
                cont = cont.with_fixed_indent(columns);
            }
            commands.push(cont);
        }
        let do_not_indent = match self.unformattable {
            Some(name) => !self.starts_with_close(doc, ctx.tokens, ctx.line_start, name)?,
            None => false,
        };

        let mut preserve = false;
        let mut leading = true;
        let mut first = true;
        if ctx.tokens.seek(ctx.line_start, true) {
            while let Some(token) = ctx.tokens.token() {
                if token.start() > ctx.line_end {
                    break;
                }
                let text = doc.text(token.start(), token.end())?;
                if token.start() < ctx.line_start {
                    // continues from the previous line
                    if first && self.lang.is_block_comment(&token.kind) {
                        preserve = true;
                    }
                    if !self.lang.is_whitespace(&token.kind, text) {
                        leading = false;
                    }
                } else {
                    self.visit(token, text, ctx.first_non_white, &mut leading, &mut commands);
                }
                first = false;
                if !ctx.tokens.advance() {
                    break;
                }
            }
        }

        if preserve {
            commands.push(IndentCommand::new(CommandKind::PreserveIndentation, anchor));
        }
        if do_not_indent {
            commands.push(IndentCommand::new(CommandKind::DoNotIndentThisLine, anchor));
        }
        if commands.is_empty() {
            commands.push(IndentCommand::no_change(anchor));
        }

        for &id in &self.pending {
            next_line.push(self.effect_of(id, ctx.next_line_start));
        }
        if let Some(tag) = self.open_tag {
            let mut cont = IndentCommand::continuation(ctx.next_line_start);
            if let Some(columns) = tag.attribute_indent {
                cont = cont.with_fixed_indent(columns);
            }
            next_line.push(cont);
        }
        if next_line.is_empty() {
            next_line.push(IndentCommand::no_change(ctx.next_line_start));
        }

        self.discard_processed();
        Ok(commands)
    }

    fn is_whitespace(&self, token: &Token<Self::Kind>, text: &str) -> bool {
        self.lang.is_whitespace(&token.kind, text)
    }

    fn inline_openers(&self) -> &[&str] {
        self.lang.inline_openers()
    }
}
