//! The `indenta check` command.
//! `indenta check` 命令。

use std::path::Path;

use indenta_engine::IndentConfig;

use super::{read, reindent_text, Job};
use crate::error::CliError;
use crate::output;

/// Fail if reindenting would change the file.
/// 如果重新缩进会改变文件则失败。
pub fn run(file: &Path, job: &Job, config: &IndentConfig, quiet: bool) -> Result<(), CliError> {
    let source = read(file)?;
    let reindented = reindent_text(file, &source, job, config)?;

    if reindented == source {
        if !quiet {
            output::success(&format!("OK: {}", file.display()));
        }
        Ok(())
    } else {
        Err(CliError::WouldReindent {
            path: file.to_path_buf(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_check() {
        let dir = tempfile::tempdir().unwrap();
        let config = IndentConfig::new().indent_width(2);

        let good = dir.path().join("good.js");
        fs::write(&good, "if (a) {\n  b();\n}\n").unwrap();
        run(&good, &Job::default(), &config, true).unwrap();

        let bad = dir.path().join("bad.js");
        fs::write(&bad, "if (a) {\nb();\n}\n").unwrap();
        let err = run(&bad, &Job::default(), &config, true).unwrap_err();
        assert!(matches!(err, CliError::WouldReindent { .. }));
        // check never writes
        assert_eq!(fs::read_to_string(&bad).unwrap(), "if (a) {\nb();\n}\n");
    }
}
