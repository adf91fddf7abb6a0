//! Merging of line data produced by several language passes.
//! 合并多个语言 pass 产生的行数据。
//!
//! Each pass sees only its own language. Before the lists can be combined,
//! continuation runs are flattened, foreign blocks extracted, and commands
//! found on lines a pass does not own are moved to the line where they take
//! effect.

use crate::command::{push_command, CommandKind, IndentCommand};
use crate::config::IndentConfig;
use crate::document::IndentDocument;
use crate::error::IndentResult;
use crate::line::{find_line, Line};

/// Commands waiting to be attached to a line.
#[derive(Debug, Clone)]
struct LineCommands {
    line: usize,
    commands: Vec<IndentCommand>,
}

/// Inclusive line range of a foreign-language block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ForeignBlock {
    pub start: usize,
    pub end: usize,
}

/// Combine the line lists of all passes into one list sorted by line index.
/// When two passes record the same line, the indentable one wins.
/// 将所有 pass 的行列表合并为一个按行号排序的列表。
pub fn merge_passes(
    passes: Vec<Vec<Line>>,
    doc: &dyn IndentDocument,
    config: &IndentConfig,
) -> IndentResult<Vec<Line>> {
    let mut passes = passes;
    for lines in &mut passes {
        add_language_end_line(lines, doc, config)?;
    }

    let mut blocks = Vec::new();
    let mut pending = Vec::new();
    for lines in &mut passes {
        simplify_continuations(&mut pending, lines);
        extract_foreign_blocks(&mut blocks, lines);
        handle_language_gaps(&mut pending, lines);
        extract_from_non_indentable(&mut pending, lines);
    }

    let mut all = Vec::new();
    for lines in passes {
        all = merge_two(all, lines);
    }
    if all.is_empty() {
        return Ok(all);
    }

    let blocks = eliminate_unneeded_blocks(blocks, &all);
    apply_blocks(&mut all, &blocks);
    apply_pending_commands(&mut all, pending, doc, config)?;
    Ok(all)
}

/// The last line's preliminary commands become a non-indentable line after
/// it, so other passes learn what the language expects there.
fn add_language_end_line(
    lines: &mut Vec<Line>,
    doc: &dyn IndentDocument,
    config: &IndentConfig,
) -> IndentResult<()> {
    let Some(last) = lines.last() else {
        return Ok(());
    };
    if last.next_line_commands.is_empty() {
        return Ok(());
    }
    let index = last.index + 1;
    if doc.line_start(index).is_none() {
        return Ok(());
    }
    let commands = last.next_line_commands.clone();
    let mut line = Line::basic(doc, index, config.tab_size)?;
    line.indentable = false;
    line.commands = commands;
    lines.push(line);
    Ok(())
}

/// Replace a run of `Continue` commands with an `Indent` on its first line
/// and a `Return` before the first command which is not a continuation.
/// `PreserveIndentation` (e.g. a comment inside the run) does not end it.
fn simplify_continuations(pending: &mut Vec<LineCommands>, lines: &mut [Line]) {
    let mut first = true;
    let mut in_continue = false;
    let mut last_continue_line = 0;
    for line in lines.iter_mut() {
        let mut commands = Vec::new();
        for command in line.commands.drain(..) {
            if command.is(CommandKind::Continue) {
                if first {
                    let mut indent = IndentCommand::indent(command.anchor()).marked_continuation();
                    if let Some(fixed) = command.fixed_indent() {
                        indent = indent.with_fixed_indent(fixed);
                    }
                    if let Some(unit) = command.indent_unit() {
                        indent = indent.with_indent_unit(unit);
                    }
                    commands.push(indent);
                    first = false;
                    in_continue = true;
                }
                last_continue_line = line.index;
                continue;
            }
            if in_continue && !command.is(CommandKind::PreserveIndentation) {
                let ret = IndentCommand::ret(command.anchor());
                if line.index - last_continue_line > 1 {
                    pending.push(LineCommands {
                        line: last_continue_line + 1,
                        commands: vec![ret],
                    });
                } else {
                    commands.push(ret);
                }
                in_continue = false;
                first = true;
            }
            push_command(&mut commands, command);
        }
        if commands.is_empty() {
            let mut no_change = IndentCommand::no_change(line.start_offset);
            if in_continue {
                no_change = no_change.marked_continuation();
            }
            commands.push(no_change);
        }
        line.commands = commands;
    }
}

/// Collect `BlockStart`/`BlockEnd` pairs spanning at least one inner line and
/// drop the markers from the lines.
fn extract_foreign_blocks(blocks: &mut Vec<ForeignBlock>, lines: &mut [Line]) {
    let mut start: Option<usize> = None;
    for line in lines.iter_mut() {
        let before = line.commands.len();
        let index = line.index;
        line.commands.retain(|command| match command.kind() {
            CommandKind::BlockStart => {
                start = Some(index);
                false
            }
            CommandKind::BlockEnd => {
                // an end without a start is a block being typed
                if let Some(block_start) = start.take() {
                    if index - block_start > 1 {
                        blocks.push(ForeignBlock {
                            start: block_start,
                            end: index,
                        });
                    }
                }
                false
            }
            _ => true,
        });
        if line.commands.len() != before && line.commands.is_empty() {
            line.commands.push(IndentCommand::no_change(line.offset));
        }
    }
}

/// Leading `Indent`s on the first line after a gap belong to the first line
/// of the gap.
fn handle_language_gaps(pending: &mut Vec<LineCommands>, lines: &mut [Line]) {
    let mut previous: Option<usize> = None;
    for line in lines.iter_mut() {
        if let Some(prev) = previous {
            if prev + 1 != line.index {
                let leading = line
                    .commands
                    .iter()
                    .take_while(|c| c.is(CommandKind::Indent))
                    .count();
                let removed: Vec<IndentCommand> = line.commands.drain(..leading).collect();
                if line.commands.is_empty() {
                    line.commands.push(IndentCommand::no_change(line.offset));
                }
                if !removed.is_empty() {
                    pending.push(LineCommands {
                        line: prev + 1,
                        commands: removed,
                    });
                }
            }
        }
        previous = Some(line.index);
    }
}

/// Lift `Indent`/`Return` off lines this pass does not own; the owner of the
/// line will apply them. A `Return` on the first line of a run (for example
/// `} </style>` ending embedded CSS) applies to the following line.
fn extract_from_non_indentable(pending: &mut Vec<LineCommands>, lines: &mut [Line]) {
    let mut previous: Option<usize> = None;
    for line in lines.iter_mut() {
        if !line.indentable {
            let first_of_run = previous.is_none_or(|p| p + 1 != line.index);
            let mut accepted = Vec::new();
            let mut next_line = Vec::new();
            for command in &line.commands {
                match command.kind() {
                    CommandKind::Indent => accepted.push(command.clone()),
                    CommandKind::Return if first_of_run && !line.empty => {
                        next_line.push(command.clone())
                    }
                    CommandKind::Return => accepted.push(command.clone()),
                    _ => {}
                }
            }
            if !accepted.is_empty() {
                pending.push(LineCommands {
                    line: line.index,
                    commands: accepted,
                });
            }
            if !next_line.is_empty() {
                pending.push(LineCommands {
                    line: line.index + 1,
                    commands: next_line,
                });
            }
            line.commands = vec![IndentCommand::no_change(line.offset)];
        }
        previous = Some(line.index);
    }
}

fn merge_two(original: Vec<Line>, new: Vec<Line>) -> Vec<Line> {
    let mut merged = Vec::with_capacity(original.len() + new.len());
    let mut a = original.into_iter().peekable();
    let mut b = new.into_iter().peekable();
    loop {
        let order = match (a.peek(), b.peek()) {
            (Some(x), Some(y)) => x.index.cmp(&y.index),
            (Some(_), None) => {
                merged.extend(a);
                break;
            }
            (None, Some(_)) => {
                merged.extend(b);
                break;
            }
            (None, None) => break,
        };
        match order {
            std::cmp::Ordering::Less => merged.extend(a.next()),
            std::cmp::Ordering::Greater => merged.extend(b.next()),
            std::cmp::Ordering::Equal => {
                let (Some(x), Some(y)) = (a.next(), b.next()) else {
                    break;
                };
                if x.indentable {
                    if y.indentable {
                        log::debug!(target: "indenta::merge", "two lines claim to be indentable: {x:?} and {y:?}");
                    }
                    merged.push(x);
                } else {
                    merged.push(y);
                }
            }
        }
    }
    merged
}

/// Drop blocks whose inner lines are handled by some pass; merge overlapping
/// blocks.
fn eliminate_unneeded_blocks(blocks: Vec<ForeignBlock>, all: &[Line]) -> Vec<ForeignBlock> {
    let mut kept: Vec<ForeignBlock> = blocks
        .into_iter()
        .filter(|b| find_line(all, b.start + 1).is_none())
        .collect();
    kept.sort_by_key(|b| (b.start, b.end));

    let mut result: Vec<ForeignBlock> = Vec::new();
    for block in kept {
        match result.last_mut() {
            Some(last) if block.start >= last.start && block.end <= last.end => {}
            Some(last) if block.start >= last.start && block.start <= last.end => {
                last.end = block.end;
            }
            _ => result.push(block),
        }
    }
    result
}

fn apply_blocks(all: &mut [Line], blocks: &[ForeignBlock]) {
    for block in blocks {
        if let Some(i) = find_line(all, block.start) {
            all[i].foreign_block_start = true;
        }
        if let Some(i) = find_line(all, block.end) {
            all[i].foreign_block_end = true;
        }
    }
}

/// Attach collected commands in front of the commands of their line, or of
/// the next recorded line. Several entries for one line keep their order:
///
/// ```text
/// 01: <table    id=smth
/// 02:           class=smth>
/// 03:    <p>
/// ```
///
/// Line 3 gets `Return` then `Indent`; swapped, `<p>` would align with
/// `class`.
fn apply_pending_commands(
    all: &mut Vec<Line>,
    mut pending: Vec<LineCommands>,
    doc: &dyn IndentDocument,
    config: &IndentConfig,
) -> IndentResult<()> {
    pending.sort_by_key(|p| p.line);
    let mut grouped: Vec<LineCommands> = Vec::new();
    for entry in pending {
        match grouped.last_mut() {
            Some(last) if last.line == entry.line => last.commands.extend(entry.commands),
            _ => grouped.push(entry),
        }
    }

    let mut cursor = 0;
    let mut current: Option<usize> = None;
    let mut trailing: Option<Line> = None;
    for entry in grouped {
        while cursor < all.len() && current.is_none_or(|c| all[c].index < entry.line) {
            current = Some(cursor);
            cursor += 1;
        }
        let Some(target) = current else {
            break;
        };
        if all[target].index >= entry.line {
            let mut commands = entry.commands;
            for command in all[target].commands.drain(..) {
                push_command(&mut commands, command);
            }
            all[target].commands = commands;
            continue;
        }
        // past the last recorded line
        match trailing.as_mut() {
            Some(line) => line.commands.extend(entry.commands),
            None => {
                if doc.line_start(entry.line).is_none() {
                    break;
                }
                let mut line = Line::basic(doc, entry.line, config.tab_size)?;
                line.commands = entry.commands;
                trailing = Some(line);
            }
        }
    }
    if let Some(line) = trailing {
        all.push(line);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::TextDocument;

    fn line(doc: &TextDocument, index: usize, commands: Vec<IndentCommand>) -> Line {
        let mut line = Line::basic(doc, index, 8).unwrap();
        line.commands = commands;
        line
    }

    fn kinds(line: &Line) -> Vec<CommandKind> {
        line.commands.iter().map(|c| c.kind()).collect()
    }

    #[test]
    fn test_continuation_becomes_indent_return() {
        let doc = TextDocument::new("a\nb\nc\nd");
        let mut lines = vec![
            line(&doc, 0, vec![IndentCommand::no_change(0)]),
            line(&doc, 1, vec![IndentCommand::continuation(2).with_fixed_indent(3)]),
            line(&doc, 2, vec![IndentCommand::continuation(4)]),
            line(&doc, 3, vec![IndentCommand::no_change(6)]),
        ];
        let mut pending = Vec::new();
        simplify_continuations(&mut pending, &mut lines);
        assert_eq!(kinds(&lines[1]), vec![CommandKind::Indent]);
        assert_eq!(lines[1].commands[0].fixed_indent(), Some(3));
        assert!(lines[1].commands[0].was_continuation());
        assert_eq!(kinds(&lines[2]), vec![CommandKind::NoChange]);
        assert!(lines[2].commands[0].was_continuation());
        assert_eq!(kinds(&lines[3]), vec![CommandKind::Return]);
        assert!(pending.is_empty());
    }

    #[test]
    fn test_continuation_survives_preserve() {
        let doc = TextDocument::new("a\nb\nc");
        let mut lines = vec![
            line(&doc, 0, vec![IndentCommand::continuation(0)]),
            line(&doc, 1, vec![IndentCommand::new(CommandKind::PreserveIndentation, 2)]),
            line(&doc, 2, vec![IndentCommand::no_change(4)]),
        ];
        simplify_continuations(&mut Vec::new(), &mut lines);
        assert_eq!(kinds(&lines[1]), vec![CommandKind::PreserveIndentation]);
        assert_eq!(kinds(&lines[2]), vec![CommandKind::Return]);
    }

    #[test]
    fn test_gap_moves_leading_indents() {
        let doc = TextDocument::new("a\nb\nc\nd\ne");
        let mut lines = vec![
            line(&doc, 0, vec![IndentCommand::no_change(0)]),
            line(&doc, 3, vec![IndentCommand::indent(6), IndentCommand::ret(6)]),
        ];
        let mut pending = Vec::new();
        handle_language_gaps(&mut pending, &mut lines);
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].line, 1);
        assert_eq!(kinds(&lines[1]), vec![CommandKind::Return]);
    }

    #[test]
    fn test_merge_prefers_indentable() {
        let doc = TextDocument::new("a\nb\nc");
        let mut owned = line(&doc, 1, vec![IndentCommand::indent(2)]);
        owned.indentable = true;
        let mut foreign = line(&doc, 1, vec![IndentCommand::no_change(2)]);
        foreign.indentable = false;
        let merged = merge_two(
            vec![line(&doc, 0, vec![]), foreign],
            vec![owned, line(&doc, 2, vec![])],
        );
        let indexes: Vec<usize> = merged.iter().map(|l| l.index).collect();
        assert_eq!(indexes, vec![0, 1, 2]);
        assert!(merged[1].indentable);
        assert_eq!(kinds(&merged[1]), vec![CommandKind::Indent]);
    }

    #[test]
    fn test_blocks_with_owner_are_dropped() {
        let doc = TextDocument::new("a\nb\nc\nd\ne\nf");
        let all: Vec<Line> = [0, 1, 2, 5].iter().map(|&i| line(&doc, i, vec![])).collect();
        let blocks = vec![
            ForeignBlock { start: 0, end: 2 },
            ForeignBlock { start: 2, end: 5 },
            ForeignBlock { start: 3, end: 4 },
        ];
        let kept = eliminate_unneeded_blocks(blocks, &all);
        assert_eq!(kept, vec![ForeignBlock { start: 2, end: 5 }]);
    }

    #[test]
    fn test_pending_commands_keep_order_and_drop_no_change() {
        let doc = TextDocument::new("a\nb\nc\nd");
        let mut all = vec![
            line(&doc, 0, vec![IndentCommand::no_change(0)]),
            line(&doc, 2, vec![IndentCommand::no_change(4)]),
        ];
        let pending = vec![
            LineCommands { line: 2, commands: vec![IndentCommand::ret(2)] },
            LineCommands { line: 2, commands: vec![IndentCommand::indent(4)] },
            LineCommands { line: 3, commands: vec![IndentCommand::ret(6)] },
        ];
        apply_pending_commands(&mut all, pending, &doc, &IndentConfig::default()).unwrap();
        assert_eq!(kinds(&all[1]), vec![CommandKind::Return, CommandKind::Indent]);
        assert_eq!(all.len(), 3);
        assert_eq!(all[2].index, 3);
        assert_eq!(kinds(&all[2]), vec![CommandKind::Return]);
    }
}
