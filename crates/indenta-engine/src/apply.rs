//! Turning merged line data into indentation and edits.

use std::collections::BTreeMap;

use crate::config::{IndentConfig, IndentMode};
use crate::document::{IndentDocument, IndentEdit};
use crate::error::IndentResult;
use crate::line::{find_line, Line};
use crate::observer::{timed, PassObserver, Phase};
use crate::resolve::Resolver;

/// Resolved lines plus the indents suggested for lines nobody owns.
pub(crate) struct Applied {
    pub lines: Vec<Line>,
    pub suggested: BTreeMap<usize, i32>,
}

pub(crate) fn apply_indents(
    mut lines: Vec<Line>,
    line_start: usize,
    line_end: usize,
    doc: &dyn IndentDocument,
    config: &IndentConfig,
    mode: IndentMode,
    observer: &mut dyn PassObserver,
) -> IndentResult<Applied> {
    let mut suggested = BTreeMap::new();

    timed(observer, Phase::Resolve, || {
        resolve_all(&mut lines, &mut suggested, line_start, line_end, config, mode)
    });

    let line_to_keep = (mode == IndentMode::Indent).then_some(line_start);
    timed(observer, Phase::PreservedLines, || {
        update_preserved_lines(&mut lines, line_to_keep, doc, config)
    })?;

    let lines = timed(observer, Phase::ForeignBlocks, || {
        generate_block_indents(lines, &mut suggested, doc, config)
    })?;

    if log::log_enabled!(target: "indenta::merge", log::Level::Trace) {
        for line in &lines {
            log::trace!(target: "indenta::merge", "{}", line.dump());
        }
    }
    if !suggested.is_empty() {
        log::debug!(target: "indenta::engine", "suggested indents: {suggested:?}");
    }
    Ok(Applied { lines, suggested })
}

fn resolve_all(
    lines: &mut [Line],
    suggested: &mut BTreeMap<usize, i32>,
    line_start: usize,
    line_end: usize,
    config: &IndentConfig,
    mode: IndentMode,
) {
    // blank lines get indentation when indenting, not when reformatting
    let indent_empty_lines = mode == IndentMode::Indent;
    let mut resolver = Resolver::new(config, line_start, mode);
    let mut indentation = 0;
    let mut next_line_indent = 0;
    let mut previous: Option<usize> = None;

    for line in lines.iter_mut() {
        if let Some(prev) = previous {
            // a gap: other formatters may follow these
            for gap in prev + 1..line.index {
                suggested.insert(gap, next_line_indent);
            }
        }
        indentation = resolver.resolve_line(indentation, line);
        if line.empty && !indent_empty_lines {
            line.indentation = 0;
        }
        if !line.indentable {
            suggested.insert(line.index, indentation);
        }
        next_line_indent = resolver.preview(indentation, &line.next_line_commands);
        previous = Some(line.index);
    }

    if let Some(prev) = previous {
        for rest in prev + 1..=line_end {
            suggested.insert(rest, next_line_indent);
        }
    }
}

/// Preserved lines keep their offset from the last computed line before them.
fn update_preserved_lines(
    lines: &mut [Line],
    line_to_keep: Option<usize>,
    doc: &dyn IndentDocument,
    config: &IndentConfig,
) -> IndentResult<()> {
    let mut anchor: Option<usize> = None;
    for i in 0..lines.len() {
        if !lines[i].indentable {
            continue;
        }
        if !lines[i].preserve {
            anchor = Some(i);
            continue;
        }
        match anchor {
            Some(a) => {
                if line_to_keep != Some(lines[i].index) {
                    let (base_offset, base_indent) = (lines[a].offset, lines[a].indentation);
                    lines[i].indentation =
                        preserved_indentation(doc, config, base_offset, base_indent, lines[i].offset)?;
                }
            }
            // a preserved first line is the reference for what follows
            None => anchor = Some(i),
        }
    }
    Ok(())
}

fn preserved_indentation(
    doc: &dyn IndentDocument,
    config: &IndentConfig,
    base_offset: usize,
    base_indent: i32,
    offset: usize,
) -> IndentResult<i32> {
    let base_existing = doc.existing_indent(base_offset, config.tab_size)? as i32;
    let existing = doc.existing_indent(offset, config.tab_size)? as i32;
    Ok(base_indent + existing - base_existing)
}

/// Lines inside a foreign block nobody formats move together with the line
/// opening the block.
fn generate_block_indents(
    lines: Vec<Line>,
    suggested: &mut BTreeMap<usize, i32>,
    doc: &dyn IndentDocument,
    config: &IndentConfig,
) -> IndentResult<Vec<Line>> {
    let mut result = Vec::with_capacity(lines.len());
    let mut in_block: Vec<Line> = Vec::new();
    // (index, offset, indentation) of the line opening the block
    let mut opened: Option<(usize, usize, i32)> = None;

    for line in lines {
        if line.foreign_block_start {
            opened = Some((line.index, line.offset, line.indentation));
        }
        if line.foreign_block_end {
            match opened {
                None => {
                    log::debug!(target: "indenta::merge", "foreign block end without start on line {}", line.index + 1);
                }
                Some((start, base_offset, base_indent)) if start != line.index => {
                    let mut end = line.index;
                    if !line.indentable {
                        // the closing line's content belongs to the block
                        end += 1;
                    }
                    for index in start + 1..end {
                        let mut inner = match find_line(&in_block, index) {
                            Some(i) => {
                                let mut inner = in_block[i].clone();
                                if !inner.indentable {
                                    inner.indentable = true;
                                    inner.preserve = true;
                                    inner.indentation = preserved_indentation(
                                        doc, config, base_offset, base_indent, inner.offset,
                                    )?;
                                }
                                inner
                            }
                            None => {
                                let mut inner = Line::basic(doc, index, config.tab_size)?;
                                inner.preserve = true;
                                inner.indentation = preserved_indentation(
                                    doc, config, base_offset, base_indent, inner.offset,
                                )?;
                                inner
                            }
                        };
                        if !inner.empty {
                            inner.indentable = true;
                            result.push(inner);
                        }
                        suggested.remove(&index);
                    }
                    in_block.clear();
                }
                Some(_) => {}
            }
            opened = None;
        }
        match opened {
            Some((start, _, _)) if line.index > start => in_block.push(line),
            _ => result.push(line),
        }
    }
    Ok(result)
}

/// Edits for indentable lines of `[line_start, line_end]` whose indentation
/// differs or which contain tabs. One edit per line.
pub(crate) fn modify_document(
    lines: &[Line],
    line_start: usize,
    line_end: usize,
    doc: &dyn IndentDocument,
    config: &IndentConfig,
) -> IndentResult<Vec<IndentEdit>> {
    let mut edits: BTreeMap<usize, IndentEdit> = BTreeMap::new();
    for line in lines.iter().rev() {
        if !line.indentable || line.index < line_start || line.index > line_end {
            continue;
        }
        let indent = line.indentation.max(0) as usize;
        if line.existing_indent == indent && !line.tab_indentation {
            continue;
        }
        let remove = doc.leading_whitespace_len(line.offset)?;
        let insert = config.indent_string(indent.min(config.max_indent));
        if doc.text(line.offset, line.offset + remove)? == insert {
            edits.remove(&line.offset);
            continue;
        }
        edits.insert(
            line.offset,
            IndentEdit {
                offset: line.offset,
                remove,
                insert,
            },
        );
    }
    Ok(edits.into_values().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::IndentCommand;
    use crate::document::TextDocument;
    use crate::observer::NoopObserver;

    fn line(doc: &TextDocument, index: usize, commands: Vec<IndentCommand>) -> Line {
        let mut line = Line::basic(doc, index, 8).unwrap();
        line.commands = commands;
        line
    }

    #[test]
    fn test_gap_lines_get_next_line_suggestion() {
        let doc = TextDocument::new("a\nb\nc\nd\ne\nf\ng\nh\ni\nj");
        let config = IndentConfig::new().indent_width(2);
        let mut lines = vec![
            line(&doc, 1, vec![IndentCommand::no_change(2)]),
            line(&doc, 2, vec![IndentCommand::no_change(4)]),
            line(&doc, 3, vec![IndentCommand::no_change(6)]),
            line(&doc, 7, vec![IndentCommand::no_change(14)]),
        ];
        lines[2].next_line_commands = vec![IndentCommand::indent(6)];
        let applied = apply_indents(lines, 0, 9, &doc, &config, IndentMode::Indent, &mut NoopObserver).unwrap();
        for gap in 4..=6 {
            assert_eq!(applied.suggested.get(&gap), Some(&2));
        }
        assert_eq!(applied.suggested.get(&8), Some(&0));
    }

    #[test]
    fn test_preserved_line_follows_anchor() {
        let doc = TextDocument::new("a\n   b\n      c");
        let config = IndentConfig::new();
        let mut lines = vec![
            line(&doc, 0, vec![IndentCommand::no_change(0)]),
            line(&doc, 1, vec![IndentCommand::indent(2)]),
            line(&doc, 2, vec![IndentCommand::new(crate::CommandKind::PreserveIndentation, 9)]),
        ];
        lines[1].indentation = 4;
        let applied = apply_indents(lines, 0, 2, &doc, &config, IndentMode::Reformat, &mut NoopObserver).unwrap();
        // line 1 computes 4 (existing 3), line 2 keeps its +3 offset
        assert_eq!(applied.lines[1].indentation, 4);
        assert_eq!(applied.lines[2].indentation, 7);
    }

    #[test]
    fn test_unowned_block_lines_shift_with_start() {
        let doc = TextDocument::new("<a>\n  x\n    y\n</a>");
        let config = IndentConfig::new();
        let mut start = line(&doc, 0, vec![IndentCommand::indent(0).with_fixed_indent(2)]);
        start.foreign_block_start = true;
        let mut end = line(&doc, 3, vec![IndentCommand::no_change(14)]);
        end.foreign_block_end = true;
        let mut suggested = BTreeMap::new();
        suggested.insert(1, 9);
        let mut lines = vec![start, end];
        lines[0].indentation = 2;
        let lines = generate_block_indents(lines, &mut suggested, &doc, &config).unwrap();
        let indexes: Vec<usize> = lines.iter().map(|l| l.index).collect();
        assert_eq!(indexes, vec![0, 1, 2, 3]);
        assert_eq!(lines[1].indentation, 4);
        assert_eq!(lines[2].indentation, 6);
        assert!(lines[1].preserve);
        assert!(suggested.is_empty());
    }

    #[test]
    fn test_modify_document_skips_equal_lines() {
        let doc = TextDocument::new("a\n  b\n\tc\n");
        let config = IndentConfig::new();
        let mut lines: Vec<Line> = (0..3).map(|i| line(&doc, i, vec![])).collect();
        lines[1].indentation = 2;
        lines[2].indentation = 8;
        let edits = modify_document(&lines, 0, 3, &doc, &config).unwrap();
        assert_eq!(edits.len(), 1);
        assert_eq!(edits[0].offset, 6);
        assert_eq!(edits[0].insert, " ".repeat(8));
        assert_eq!(edits[0].remove, 1);
    }
}
