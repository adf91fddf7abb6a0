//! Bracket-based indentation for scripts and style sheets.
//! 基于括号的脚本与样式缩进。
//!
//! Brackets opened on one line form a single level: the line after them is
//! indented once however many brackets were opened. A line starting with
//! closing brackets returns on that line, other closes return on the next.

use indenta_common::{LanguageId, OffsetRanges, Token};
use indenta_engine::{
    CommandKind, IndentCommand, IndentDocument, IndentResult, IndentStrategy, JoinedTokens,
    LineContext,
};
use indenta_lexer::ScriptKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LevelState {
    /// Opened on the current line.
    Pending,
    Emitted,
}

#[derive(Debug, Clone, Copy)]
struct Level {
    open: usize,
    line: u64,
    state: LevelState,
}

/// [`IndentStrategy`] over [`ScriptKind`] tokens.
#[derive(Debug)]
pub struct ScriptIndenter {
    language: LanguageId,
    levels: Vec<Level>,
    /// Effects waiting for the start of the next line, in source order.
    pending: Vec<CommandKind>,
    line: u64,
}

impl ScriptIndenter {
    pub fn new(language: LanguageId) -> Self {
        Self {
            language,
            levels: Vec::new(),
            pending: Vec::new(),
            line: 0,
        }
    }

    /// Bracket levels currently open.
    pub fn depth(&self) -> usize {
        self.levels.len()
    }

    fn open(&mut self) {
        let line = self.line;
        match self.levels.last_mut() {
            Some(level) if level.line == line && level.state == LevelState::Pending => {
                level.open += 1;
            }
            _ => {
                self.levels.push(Level {
                    open: 1,
                    line,
                    state: LevelState::Pending,
                });
                self.pending.push(CommandKind::Indent);
            }
        }
    }

    fn close(&mut self, leading: bool, at: usize, commands: &mut Vec<IndentCommand>) {
        let Some(level) = self.levels.last_mut() else {
            log::debug!(target: "indenta::script", "unbalanced closing bracket at {at}");
            return;
        };
        level.open -= 1;
        if level.open > 0 {
            return;
        }
        let state = level.state;
        self.levels.pop();
        match state {
            LevelState::Pending => {
                if let Some(pos) = self.pending.iter().rposition(|k| *k == CommandKind::Indent) {
                    self.pending.remove(pos);
                }
            }
            LevelState::Emitted if leading => commands.push(IndentCommand::ret(at)),
            LevelState::Emitted => self.pending.push(CommandKind::Return),
        }
    }
}

impl IndentStrategy for ScriptIndenter {
    type Kind = ScriptKind;

    fn language(&self) -> LanguageId {
        self.language
    }

    fn reset(&mut self) {
        self.levels.clear();
        self.pending.clear();
        self.line = 0;
    }

    /// The nearest `{` before `start` that is not closed before it.
    fn format_stable_start(
        &mut self,
        _doc: &dyn IndentDocument,
        tokens: &mut JoinedTokens<'_, ScriptKind>,
        start: usize,
        _end: usize,
        _ignore: &mut OffsetRanges,
    ) -> IndentResult<usize> {
        if !tokens.seek(start, false) {
            return Ok(start);
        }
        if tokens.offset().is_some_and(|offset| offset >= start) && !tokens.retreat() {
            return Ok(start);
        }
        let mut depth = 0usize;
        loop {
            let Some(token) = tokens.token() else {
                return Ok(start);
            };
            if token.kind.is_closing() {
                depth += 1;
            } else if token.kind.is_opening() {
                if depth == 0 {
                    if token.kind == ScriptKind::LBrace {
                        return Ok(token.start());
                    }
                } else {
                    depth -= 1;
                }
            }
            if !tokens.retreat() {
                return Ok(token.start());
            }
        }
    }

    fn line_indent(
        &mut self,
        ctx: &mut LineContext<'_, '_, ScriptKind>,
        next_line: &mut Vec<IndentCommand>,
    ) -> IndentResult<Vec<IndentCommand>> {
        self.line += 1;
        let anchor = ctx.line_start;
        let mut commands: Vec<IndentCommand> = std::mem::take(&mut self.pending)
            .into_iter()
            .map(|kind| IndentCommand::new(kind, anchor))
            .collect();
        for level in &mut self.levels {
            level.state = LevelState::Emitted;
        }

        let mut leading = true;
        let mut first = true;
        let mut keep = None;
        if ctx.tokens.seek(ctx.line_start, true) {
            while let Some(token) = ctx.tokens.token() {
                if token.start() > ctx.line_end {
                    break;
                }
                if token.start() < ctx.line_start {
                    // a comment or template string running over the line break
                    if first {
                        keep = match token.kind {
                            ScriptKind::BlockComment => Some(CommandKind::PreserveIndentation),
                            ScriptKind::String => Some(CommandKind::DoNotIndentThisLine),
                            _ => None,
                        };
                    }
                    if token.kind != ScriptKind::Whitespace {
                        leading = false;
                    }
                } else {
                    visit(self, token, &mut leading, &mut commands);
                }
                first = false;
                if !ctx.tokens.advance() {
                    break;
                }
            }
        }

        if let Some(kind) = keep {
            commands.push(IndentCommand::new(kind, anchor));
        }
        if commands.is_empty() {
            commands.push(IndentCommand::no_change(anchor));
        }
        next_line.extend(
            self.pending
                .iter()
                .map(|&kind| IndentCommand::new(kind, ctx.next_line_start)),
        );
        if next_line.is_empty() {
            next_line.push(IndentCommand::no_change(ctx.next_line_start));
        }
        Ok(commands)
    }

    fn is_whitespace(&self, token: &Token<ScriptKind>, _text: &str) -> bool {
        token.kind == ScriptKind::Whitespace
    }
}

fn visit(
    indenter: &mut ScriptIndenter,
    token: &Token<ScriptKind>,
    leading: &mut bool,
    commands: &mut Vec<IndentCommand>,
) {
    match token.kind {
        ScriptKind::Whitespace => {}
        kind if kind.is_opening() => {
            indenter.open();
            *leading = false;
        }
        kind if kind.is_closing() => indenter.close(*leading, token.start(), commands),
        _ => *leading = false,
    }
}
