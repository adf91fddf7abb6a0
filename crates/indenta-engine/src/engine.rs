//! Per-language indentation pass.
//! 单语言缩进 pass。
//!
//! A [`LanguageIndenter`] owns the code blocks of one language and a strategy
//! for it. Computing a pass finds a stable start, splits the request into
//! runs of lines where the language appears and asks the strategy for the
//! commands of every line it can see.

use indenta_common::{LanguageId, OffsetRanges, Uncovered};

use crate::config::{IndentConfig, IndentRequest};
use crate::document::{IndentDocument, LanguageLayout};
use crate::error::{IndentError, IndentResult};
use crate::line::Line;
use crate::observer::{timed, PassObserver, Phase};
use crate::strategy::{IndentStrategy, LineContext};
use crate::tokens::{CodeBlock, JoinedTokens};

/// One language's contribution to a reindent.
pub trait LanguagePass {
    fn language(&self) -> LanguageId;

    /// Compute line data for `request`. The document is not modified.
    fn compute(
        &mut self,
        doc: &dyn IndentDocument,
        layout: &dyn LanguageLayout,
        request: &IndentRequest,
        config: &IndentConfig,
        observer: &mut dyn PassObserver,
    ) -> IndentResult<Vec<Line>>;
}

/// Drives an [`IndentStrategy`] over the code blocks of its language.
pub struct LanguageIndenter<S: IndentStrategy> {
    strategy: S,
    blocks: Vec<CodeBlock<S::Kind>>,
}

impl<S: IndentStrategy> LanguageIndenter<S> {
    pub fn new(strategy: S, blocks: Vec<CodeBlock<S::Kind>>) -> Self {
        Self { strategy, blocks }
    }

    pub fn strategy(&self) -> &S {
        &self.strategy
    }
}

impl<S: IndentStrategy> LanguagePass for LanguageIndenter<S> {
    fn language(&self) -> LanguageId {
        self.strategy.language()
    }

    fn compute(
        &mut self,
        doc: &dyn IndentDocument,
        layout: &dyn LanguageLayout,
        request: &IndentRequest,
        config: &IndentConfig,
        observer: &mut dyn PassObserver,
    ) -> IndentResult<Vec<Line>> {
        self.strategy.reset();
        let mut tokens = JoinedTokens::new(&self.blocks);
        if tokens.is_empty() {
            return Ok(Vec::new());
        }
        let mut pass = Pass {
            strategy: &mut self.strategy,
            doc,
            layout,
            config,
        };

        log::debug!(target: "indenta::engine", "indenting {} in {}-{}", pass.strategy.language(), request.start, request.end);

        let mut start = doc.row_start(request.start)?;
        let end = (doc.row_end(request.end)? + 1).min(doc.len());

        let mut initial = 0;
        let mut ignore = OffsetRanges::new();
        if start > 0 {
            if !tokens.covers(start) {
                match pass.previous_occurrence(&mut tokens, start)? {
                    Some(found) => start = found,
                    None => return Ok(Vec::new()),
                }
            }
            initial = timed(observer, Phase::StableStart, || {
                pass.strategy
                    .format_stable_start(doc, &mut tokens, start, end, &mut ignore)
            })?;
            log::debug!(
                target: "indenta::engine",
                "stable start of line {} is on line {}",
                doc.line_of_offset(start)?,
                doc.line_of_offset(initial)?
            );
            if !ignore.is_empty() {
                log::debug!(target: "indenta::engine", "ignored ranges: {ignore:?}");
            }
        }

        let pairs = timed(observer, Phase::LinePairs, || {
            line_pairs(doc, &tokens, initial, end)
        })?;
        log::trace!(target: "indenta::engine", "line pairs to process: {pairs:?}");

        timed(observer, Phase::ProcessLanguage, || {
            pass.process_language(&mut tokens, &pairs, initial, end, &ignore)
        })
    }
}

/// Inclusive range of lines where the language appears.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct LinePair {
    pub first: usize,
    pub last: usize,
}

/// Runs of lines covered by non-virtual sequences within `[start, end]`.
/// Runs sharing a boundary line are merged.
pub(crate) fn line_pairs<K>(
    doc: &dyn IndentDocument,
    tokens: &JoinedTokens<'_, K>,
    start: usize,
    end: usize,
) -> IndentResult<Vec<LinePair>> {
    let start_line = doc.line_of_offset(start)?;
    let end_line = doc.line_of_offset(end)?;
    let mut pairs: Vec<LinePair> = Vec::new();
    for sequence in tokens.real_sequences() {
        let (Some(seq_start), Some(seq_end)) = (sequence.start(), sequence.end()) else {
            continue;
        };
        let mut pair = LinePair {
            first: doc.line_of_offset(seq_start)?,
            last: doc.line_of_offset(seq_end)?,
        };
        if pair.first > end_line {
            break;
        }
        if pair.first < start_line {
            if start_line <= pair.last {
                pair.first = start_line;
            } else {
                continue;
            }
        }
        pair.last = pair.last.min(end_line);
        match pairs.last_mut() {
            Some(last) if last.last == pair.first => last.last = pair.last,
            _ => pairs.push(pair),
        }
    }
    Ok(pairs)
}

struct Pass<'p, S> {
    strategy: &'p mut S,
    doc: &'p dyn IndentDocument,
    layout: &'p dyn LanguageLayout,
    config: &'p IndentConfig,
}

impl<S: IndentStrategy> Pass<'_, S> {
    /// The language is absent at `start`: begin at the first token of the
    /// language on the previous non-blank line instead.
    fn previous_occurrence(
        &self,
        tokens: &mut JoinedTokens<'_, S::Kind>,
        start: usize,
    ) -> IndentResult<Option<usize>> {
        let mut line = self.doc.line_of_offset(start)?;
        let row = loop {
            let row = self
                .doc
                .line_start(line)
                .ok_or_else(|| self.doc.bad_location(start))?;
            if line == 0 || self.doc.first_non_white(row)?.is_some() {
                break row;
            }
            line -= 1;
        };
        if !tokens.seek(row, true) && !tokens.seek(row, false) {
            return Ok(None);
        }
        Ok(tokens.offset().filter(|&offset| offset <= start))
    }

    fn process_language(
        &mut self,
        tokens: &mut JoinedTokens<'_, S::Kind>,
        pairs: &[LinePair],
        overall_start: usize,
        overall_end: usize,
        ignore: &OffsetRanges,
    ) -> IndentResult<Vec<Line>> {
        let doc = self.doc;
        let mut lines = Vec::new();
        tokens.move_start();

        for pair in pairs {
            // a run whose first or last line does not start with the
            // language is shorter for the strategy's purposes
            let mut real_first = pair.first;
            let mut real_last = pair.last;
            if real_last > real_first && !self.starts_with_language(tokens, real_first)? {
                real_first += 1;
            }
            if real_last > real_first && !self.starts_with_language(tokens, real_last)? {
                real_last -= 1;
            }

            for line in pair.first..=pair.last {
                let Some(mut row_start) = doc.line_start(line) else {
                    break;
                };
                row_start = row_start.max(overall_start);
                let first_non_white = doc.first_non_white(row_start)?;
                let mut row_end = doc.row_end(row_start)?;
                let next_line_start = row_end + 1;

                if ignore.contains(row_start, row_end) {
                    continue;
                }

                let mut indentable = true;
                let mut empty = false;
                let non_white = match first_non_white {
                    Some(non_white) => {
                        let Some(lang_start) =
                            self.find_language_offset(tokens, row_start, row_end, true)?
                        else {
                            continue;
                        };
                        if lang_start > overall_end {
                            continue;
                        }
                        let Some(lang_end) =
                            self.find_language_offset(tokens, row_end, row_start, false)?
                        else {
                            continue;
                        };
                        if lang_start > lang_end {
                            // trailing token of this language glued to the
                            // next line's indentation
                            continue;
                        }
                        row_start = lang_start;
                        row_end = lang_end.min(overall_end);
                        indentable = non_white == row_start;
                        if !indentable && row_start.checked_sub(non_white) == Some(2) {
                            if let Ok(opener) = doc.text(non_white, non_white + 2) {
                                indentable = self.strategy.inline_openers().contains(&opener);
                            }
                        }
                        non_white
                    }
                    None => {
                        empty = true;
                        if self.layout.language_at(row_start) != Some(self.strategy.language()) {
                            continue;
                        }
                        row_start
                    }
                };

                match ignore.uncovered(row_start, row_end) {
                    Uncovered::Covered => continue,
                    Uncovered::Trimmed { start, end } => {
                        row_start = start;
                        row_end = end;
                    }
                    Uncovered::Unchanged => {}
                }

                let mut ctx = LineContext {
                    doc,
                    tokens: &mut *tokens,
                    line_start: row_start,
                    line_end: row_end,
                    first_non_white: non_white.max(row_start),
                    next_line_start,
                    empty,
                    indentable,
                    block_start: line == real_first,
                    block_end: line == real_last,
                };
                let mut next_line = Vec::new();
                let commands = self.strategy.line_indent(&mut ctx, &mut next_line)?;
                if commands.is_empty() {
                    return Err(IndentError::MissingCommands { line });
                }
                if next_line.is_empty() {
                    return Err(IndentError::MissingNextLineCommands { line });
                }

                let mut record = Line::basic(doc, line, self.config.tab_size)?;
                record.commands = commands;
                record.next_line_commands = next_line;
                record.start_offset = row_start;
                record.end_offset = row_end;
                record.indentable = indentable;
                record.empty = empty;
                if log::log_enabled!(target: "indenta::engine", log::Level::Trace) {
                    trace_line(doc, &record);
                }
                lines.push(record);
            }
        }

        if let Some(last) = lines.last() {
            log::trace!(target: "indenta::engine", "preliminary commands for next line: {:?}", last.next_line_commands);
        }
        Ok(lines)
    }

    fn starts_with_language(
        &self,
        tokens: &mut JoinedTokens<'_, S::Kind>,
        line: usize,
    ) -> IndentResult<bool> {
        let Some(row_start) = self.doc.line_start(line) else {
            return Ok(true);
        };
        if self.doc.first_non_white(row_start)?.is_none() {
            return Ok(true);
        }
        let row_end = self.doc.row_end(row_start)?;
        Ok(self
            .find_language_offset(tokens, row_start, row_end, true)?
            .is_some())
    }

    /// First (or, going backwards, last) non-blank offset of this language
    /// between `from` and `to`.
    fn find_language_offset(
        &self,
        tokens: &mut JoinedTokens<'_, S::Kind>,
        from: usize,
        to: usize,
        forward: bool,
    ) -> IndentResult<Option<usize>> {
        if !tokens.seek(from, forward) {
            return Ok(None);
        }
        let language = self.strategy.language();
        while let Some(token) = tokens.token() {
            let in_range = if forward {
                token.start() <= to
            } else {
                token.end() >= to
            };
            if !in_range {
                break;
            }
            let mut token_start = token.start();
            let mut token_end = token.end();
            let mut ok = true;
            if let Some(embedded) = tokens.embedded() {
                // only the delimiters around an embedding belong to us
                ok = false;
                let (e_start, e_end) = (usize::from(embedded.start), usize::from(embedded.end));
                if !embedded.is_empty() {
                    if forward {
                        if e_start > token_start && token_start >= from {
                            ok = true;
                            token_end = e_start;
                        } else if e_end < token_end && e_end >= from {
                            ok = true;
                            token_start = e_end;
                        }
                    } else if e_end < token_end && token_end <= from {
                        ok = true;
                        token_start = e_end;
                    } else if e_start > token_start && e_start <= from {
                        ok = true;
                        token_end = e_start;
                    }
                }
            }
            if ok
                && tokens.language() == Some(language)
                && !tokens.is_virtual()
                && !self.is_whitespace_within(tokens, from, to, forward)?
            {
                let offset = if from >= token_start && from <= token_end {
                    from
                } else if from < token_start {
                    token_start
                } else {
                    token_end
                };
                return Ok(Some(self.skip_blanks(tokens, offset, forward)?));
            }
            let moved = if forward { tokens.advance() } else { tokens.retreat() };
            if !moved {
                break;
            }
        }
        Ok(None)
    }

    /// Is the part of the current token between the bounds blank?
    fn is_whitespace_within(
        &self,
        tokens: &JoinedTokens<'_, S::Kind>,
        from: usize,
        to: usize,
        forward: bool,
    ) -> IndentResult<bool> {
        let Some(token) = tokens.token() else {
            return Ok(true);
        };
        let mut start = token.start();
        let mut end = token.end();
        let (low, high) = if forward { (from, to) } else { (to, from) };
        if low > start {
            start = low.min(end);
        }
        if high < end {
            end = high.max(start);
        }
        let text = self.doc.text(start, end)?;
        Ok(self.strategy.is_whitespace(token, text))
    }

    fn skip_blanks(
        &self,
        tokens: &JoinedTokens<'_, S::Kind>,
        offset: usize,
        forward: bool,
    ) -> IndentResult<usize> {
        let Some(token) = tokens.token() else {
            return Ok(offset);
        };
        let text = self.doc.text(token.start(), token.end())?.as_bytes();
        let mut index = offset.saturating_sub(token.start()).min(text.len());
        if !forward && index == text.len() && index > 0 {
            index -= 1;
        }
        while (if forward { index < text.len() } else { index > 0 })
            && matches!(text.get(index), Some(b' ' | b'\t'))
        {
            if forward {
                index += 1;
            } else {
                index -= 1;
            }
        }
        Ok(token.start() + index)
    }
}

fn trace_line(doc: &dyn IndentDocument, line: &Line) {
    let end = (line.end_offset + 1).min(doc.len()).max(line.start_offset);
    let text = doc.text(line.start_offset, end).unwrap_or("").trim();
    let mark = if line.indentable { '*' } else { ' ' };
    log::trace!(target: "indenta::engine", "{mark}[{:4}] {text}", line.index + 1);
    for command in &line.commands {
        log::trace!(target: "indenta::engine", "      {command:?}");
    }
}
