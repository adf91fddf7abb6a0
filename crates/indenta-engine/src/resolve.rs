//! Resolution of command streams into columns.
//! 将命令流解析为列数。

use crate::command::{CommandKind, IndentCommand};
use crate::config::{IndentConfig, IndentMode};
use crate::line::Line;

/// Walks the merged command stream in document order, keeping every resolved
/// command as a possible `Return` target.
pub struct Resolver {
    indent_width: usize,
    /// First line being (re)indented; lines before it only provide context.
    line_start: usize,
    mode: IndentMode,
    history: Vec<IndentCommand>,
}

#[derive(Default)]
struct Walk {
    last: i32,
    do_not_indent: bool,
    preserve: bool,
    preserve_fixed: Option<usize>,
}

impl Resolver {
    pub fn new(config: &IndentConfig, line_start: usize, mode: IndentMode) -> Self {
        Self {
            indent_width: config.indent_width,
            line_start,
            mode,
            history: Vec::new(),
        }
    }

    /// Resolve a line starting from `indentation`, store the result on the
    /// line and append its commands to the history.
    ///
    /// Lines before the formatted range are not moved; the difference between
    /// their existing and computed indentation is added to the last command so
    /// following lines keep their position relative to them.
    /// 格式化范围之前的行不会被移动；其现有缩进与计算缩进之差会加到最后一条命令上。
    ///
    /// Returns the indentation the next line starts from.
    pub fn resolve_line(&mut self, indentation: i32, line: &mut Line) -> i32 {
        if line.commands.is_empty() {
            line.commands.push(IndentCommand::no_change(line.offset));
        }
        let being_formatted = line.index >= self.line_start;
        let walk = self.walk(indentation, &mut line.commands);
        if walk.do_not_indent {
            line.indentable = false;
        }
        if walk.preserve {
            line.preserve = true;
        }

        let mut line_indentation = walk.last;
        let mut adjustment = 0;
        if !line.preserve && !being_formatted && !line.empty {
            adjustment = line.existing_indent as i32 - line_indentation;
        }
        let Some(last) = line.commands.last_mut() else {
            return indentation;
        };
        if adjustment != 0 {
            last.set_computed(last.computed() + adjustment);
        }
        if being_formatted {
            line_indentation = last.computed();
        }
        let next = last.computed();

        line.indentation = line_indentation;
        line.adjustment = adjustment;
        if walk.preserve && line.index == self.line_start && self.mode == IndentMode::Indent {
            if let Some(fixed) = walk.preserve_fixed {
                line.indentation = fixed as i32;
            }
        }

        self.history.extend(line.commands.iter().cloned());
        next
    }

    /// Indentation `commands` would produce from `indentation`, without
    /// recording anything.
    pub fn preview(&mut self, indentation: i32, commands: &[IndentCommand]) -> i32 {
        let mut commands = commands.to_vec();
        if commands.is_empty() {
            return indentation;
        }
        self.walk(indentation, &mut commands).last
    }

    fn walk(&mut self, mut indentation: i32, commands: &mut [IndentCommand]) -> Walk {
        let mark = self.history.len();
        let mut this_line = 0i32;
        let mut walk = Walk::default();
        for command in commands.iter_mut() {
            match command.kind() {
                CommandKind::Indent => match command.fixed_indent() {
                    Some(fixed) => this_line = fixed as i32,
                    None => {
                        this_line += command.indent_unit().unwrap_or(self.indent_width) as i32;
                    }
                },
                CommandKind::Return => {
                    // unwind to the command just before the matching Indent
                    if let Some(index) = matching_indent_base(&self.history) {
                        indentation = self.history[index].computed();
                        this_line = 0;
                    }
                }
                CommandKind::DoNotIndentThisLine => walk.do_not_indent = true,
                CommandKind::PreserveIndentation => {
                    walk.preserve = true;
                    if command.fixed_indent().is_some() {
                        walk.preserve_fixed = command.fixed_indent();
                    }
                }
                _ => {}
            }
            command.set_computed(indentation + this_line);
            self.history.push(command.clone());
        }
        self.history.truncate(mark);
        walk.last = commands.last().map_or(indentation, |c| c.computed());
        walk
    }
}

/// Index of the command preceding the `Indent` matched by a `Return` about
/// to be appended to `history`.
///
/// An unmatched `Return` falls back to the first command; an `Indent` which is
/// the very first command has no base and leaves indentation alone.
fn matching_indent_base(history: &[IndentCommand]) -> Option<usize> {
    if history.is_empty() {
        return None;
    }
    let mut balance = 1;
    let mut i = history.len();
    loop {
        i -= 1;
        match history[i].kind() {
            CommandKind::Return => balance += 1,
            CommandKind::Indent => balance -= 1,
            _ => {}
        }
        if balance == 0 || i == 0 {
            break;
        }
    }
    if balance != 0 {
        log::debug!(
            target: "indenta::engine",
            "no Indent matches the Return after command {}; Indent and Return must be paired",
            history.len() - 1
        );
        return Some(0);
    }
    i.checked_sub(1)
}
