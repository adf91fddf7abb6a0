//! The `indenta indent` command.
//! `indenta indent` 命令。

use std::path::Path;

use indenta_engine::IndentConfig;

use super::{read, reindent_text, write, Job};
use crate::error::CliError;
use crate::output;

/// Reindent a file, printing the result or writing it back.
/// 重新缩进文件，打印结果或写回文件。
pub fn run(
    file: &Path,
    job: &Job,
    config: &IndentConfig,
    write_back: bool,
    quiet: bool,
) -> Result<(), CliError> {
    let source = read(file)?;
    let reindented = reindent_text(file, &source, job, config)?;

    if !write_back {
        print!("{reindented}");
        return Ok(());
    }
    if reindented != source {
        write(file, &reindented)?;
        if !quiet {
            output::success(&format!("Reindented: {}", file.display()));
        }
    } else if !quiet {
        output::info(&format!("Already indented: {}", file.display()));
    }
    Ok(())
}
