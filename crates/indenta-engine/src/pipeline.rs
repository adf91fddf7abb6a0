//! The reindent pipeline: compute every pass, merge, resolve, write once.
//! 重新缩进流水线：计算所有 pass，合并，解析，一次写回。

use std::collections::BTreeMap;

use crate::apply::{apply_indents, modify_document};
use crate::config::{IndentConfig, IndentRequest};
use crate::document::{DocumentChange, IndentDocument, IndentEdit, LanguageLayout};
use crate::engine::LanguagePass;
use crate::error::IndentResult;
use crate::line::Line;
use crate::merge::merge_passes;
use crate::observer::{timed, NoopObserver, PassObserver, Phase};

/// Final state of one line after a reindent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedLine {
    pub index: usize,
    pub indentation: i32,
    pub indentable: bool,
    pub preserved: bool,
}

/// Result of a reindent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndentOutcome {
    /// Edits applied to the document, by ascending offset.
    pub edits: Vec<IndentEdit>,
    /// Indents computed for lines no pass owned (gaps, foreign lines and
    /// lines after the last processed one), for a cooperating formatter.
    pub suggested: BTreeMap<usize, i32>,
    pub lines: Vec<ResolvedLine>,
}

impl IndentOutcome {
    pub fn is_unchanged(&self) -> bool {
        self.edits.is_empty()
    }

    /// Indentation computed for an indentable line.
    pub fn indentation_of(&self, line: usize) -> Option<i32> {
        self.lines
            .iter()
            .rev()
            .find(|l| l.index == line && l.indentable)
            .map(|l| l.indentation)
    }
}

/// Line data of all passes, computed but not yet applied.
#[derive(Debug, Clone)]
pub struct PendingPasses {
    lines: Vec<Vec<Line>>,
    request: IndentRequest,
}

impl PendingPasses {
    pub fn request(&self) -> IndentRequest {
        self.request
    }

    /// Line lists in pass order.
    pub fn lines(&self) -> &[Vec<Line>] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.iter().all(|l| l.is_empty())
    }

    /// Translate recorded offsets after the document was modified by
    /// someone else between computing and applying.
    pub fn rebase(&mut self, changes: &[DocumentChange]) {
        if changes.is_empty() {
            return;
        }
        log::debug!(target: "indenta::merge", "rebasing pending lines by {changes:?}");
        for line in self.lines.iter_mut().flatten() {
            for change in changes {
                if change.offset <= line.offset {
                    line.shift(change.delta);
                }
            }
        }
        for change in changes {
            if change.offset < self.request.start {
                self.request.start = shift(self.request.start, change.delta);
            }
            if change.offset < self.request.end {
                self.request.end = shift(self.request.end, change.delta);
            }
        }
    }

    /// Recompute line indexes from offsets. Lines which collapsed onto the
    /// same index are folded into the first one.
    fn revalidate(&mut self, doc: &dyn IndentDocument) -> IndentResult<()> {
        for lines in &mut self.lines {
            let mut kept: Vec<Line> = Vec::with_capacity(lines.len());
            for mut line in lines.drain(..) {
                line.revalidate(doc)?;
                match kept.last_mut() {
                    Some(previous) if previous.index == line.index => {
                        log::warn!(
                            target: "indenta::merge",
                            "lines were deleted by another formatter; merging {previous:?} with {line:?}"
                        );
                        previous.commands.extend(line.commands);
                    }
                    _ => kept.push(line),
                }
            }
            *lines = kept;
        }
        Ok(())
    }
}

fn shift(offset: usize, delta: i64) -> usize {
    (offset as i64 + delta).max(0) as usize
}

/// Runs the language passes of a document.
/// 运行文档中各语言的 pass。
pub struct Reindenter<'p> {
    config: IndentConfig,
    passes: Vec<Box<dyn LanguagePass + 'p>>,
    observer: Box<dyn PassObserver + 'p>,
}

impl<'p> Reindenter<'p> {
    pub fn new(config: IndentConfig) -> Self {
        Self {
            config,
            passes: Vec::new(),
            observer: Box::new(NoopObserver),
        }
    }

    /// Add a pass. Passes run in the order they were added.
    pub fn with_pass(mut self, pass: impl LanguagePass + 'p) -> Self {
        self.passes.push(Box::new(pass));
        self
    }

    pub fn push_pass(&mut self, pass: Box<dyn LanguagePass + 'p>) {
        self.passes.push(pass);
    }

    pub fn with_observer(mut self, observer: impl PassObserver + 'p) -> Self {
        self.observer = Box::new(observer);
        self
    }

    pub fn config(&self) -> &IndentConfig {
        &self.config
    }

    /// Reindent `request` and write the result into `doc`.
    ///
    /// An offset failure (the document changed underneath) leaves the
    /// document untouched and returns an empty outcome, unless the config is
    /// strict. Strategy contract violations are always returned.
    pub fn reindent(
        &mut self,
        doc: &mut dyn IndentDocument,
        layout: &dyn LanguageLayout,
        request: IndentRequest,
    ) -> IndentResult<IndentOutcome> {
        let result = self
            .compute(&*doc, layout, request)
            .and_then(|pending| self.finish(doc, pending));
        match result {
            Err(err) if err.is_bad_location() && !self.config.strict => {
                log::warn!(target: "indenta::engine", "reindent skipped: {err}");
                Ok(IndentOutcome::default())
            }
            other => other,
        }
    }

    /// Run every pass over the unmodified document.
    pub fn compute(
        &mut self,
        doc: &dyn IndentDocument,
        layout: &dyn LanguageLayout,
        request: IndentRequest,
    ) -> IndentResult<PendingPasses> {
        let mut lines = Vec::with_capacity(self.passes.len());
        for pass in &mut self.passes {
            lines.push(pass.compute(doc, layout, &request, &self.config, self.observer.as_mut())?);
        }
        Ok(PendingPasses { lines, request })
    }

    /// Merge computed passes, resolve indentation and apply it as a single
    /// batch of edits.
    pub fn finish(
        &mut self,
        doc: &mut dyn IndentDocument,
        mut pending: PendingPasses,
    ) -> IndentResult<IndentOutcome> {
        pending.revalidate(&*doc)?;
        let request = pending.request;
        let line_start = doc.line_of_offset(request.start.min(doc.len()))?;
        let line_end = doc.line_of_offset(request.end.min(doc.len()))?;

        let config = &self.config;
        let observer = self.observer.as_mut();
        let merged = timed(observer, Phase::Merge, || {
            merge_passes(pending.lines, &*doc, config)
        })?;
        if merged.is_empty() {
            return Ok(IndentOutcome::default());
        }

        let applied = apply_indents(merged, line_start, line_end, &*doc, config, request.mode, observer)?;
        let edits = timed(observer, Phase::Modify, || -> IndentResult<Vec<IndentEdit>> {
            let edits = modify_document(&applied.lines, line_start, line_end, &*doc, config)?;
            if !edits.is_empty() {
                doc.apply_edits(&edits)?;
            }
            Ok(edits)
        })?;

        let lines = applied
            .lines
            .iter()
            .map(|l| ResolvedLine {
                index: l.index,
                indentation: l.indentation,
                indentable: l.indentable,
                preserved: l.preserve,
            })
            .collect();
        Ok(IndentOutcome {
            edits,
            suggested: applied.suggested,
            lines,
        })
    }
}
