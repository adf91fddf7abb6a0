//! CLI command implementations.

pub mod check;
pub mod indent;

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use clap::ValueEnum;
use indenta_engine::{
    IndentConfig, IndentDocument, IndentMode, IndentRequest, LogObserver, TextDocument,
};
use indenta_lang::{Source, SourceKind};

use crate::error::CliError;

/// Language switch for files whose extension says nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Lang {
    Html,
    Script,
    Css,
}

impl From<Lang> for SourceKind {
    fn from(lang: Lang) -> Self {
        match lang {
            Lang::Html => SourceKind::Html,
            Lang::Script => SourceKind::Script,
            Lang::Css => SourceKind::Css,
        }
    }
}

/// An inclusive, 1-based range of lines, written `A:B` (or `A` for one line).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineRange {
    pub start: usize,
    pub end: usize,
}

impl FromStr for LineRange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (start, end) = s.split_once(':').unwrap_or((s, s));
        let parse = |n: &str| {
            n.trim()
                .parse::<usize>()
                .map_err(|_| format!("invalid line number '{n}'"))
        };
        let (start, end) = (parse(start)?, parse(end)?);
        if start == 0 || end < start {
            return Err(format!("invalid line range '{s}'"));
        }
        Ok(LineRange { start, end })
    }
}

/// What to reindent and how.
#[derive(Debug, Clone, Default)]
pub struct Job {
    pub lang: Option<Lang>,
    pub lines: Option<LineRange>,
    pub reformat: bool,
    /// Log phase timings to `indenta::perf`.
    pub timings: bool,
}

impl Job {
    fn kind(&self, path: &Path) -> Result<SourceKind, CliError> {
        if let Some(lang) = self.lang {
            return Ok(lang.into());
        }
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(SourceKind::from_extension)
            .ok_or_else(|| CliError::UnknownLanguage {
                path: path.to_path_buf(),
            })
    }

    /// A whole file is reformatted; a line range is indented unless
    /// `--reformat` is given.
    fn mode(&self) -> IndentMode {
        if self.reformat || self.lines.is_none() {
            IndentMode::Reformat
        } else {
            IndentMode::Indent
        }
    }
}

pub(crate) fn read(path: &Path) -> Result<String, CliError> {
    fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })
}

pub(crate) fn write(path: &Path, text: &str) -> Result<(), CliError> {
    fs::write(path, text).map_err(|source| CliError::Write {
        path: PathBuf::from(path),
        source,
    })
}

/// Reindent `text` as the file at `path` would be.
pub fn reindent_text(
    path: &Path,
    text: &str,
    job: &Job,
    config: &IndentConfig,
) -> Result<String, CliError> {
    let source = Source::lex(text, job.kind(path)?);
    for error in source.errors() {
        log::warn!(target: "indenta::cli", "{}: {error}", path.display());
    }

    let mut doc = TextDocument::new(text);
    let request = request_for(&doc, job)?;
    let mut reindenter = source.reindenter(config.clone());
    if job.timings {
        reindenter = reindenter.with_observer(LogObserver);
    }
    let outcome = reindenter.reindent(&mut doc, &source, request)?;
    log::debug!(
        target: "indenta::cli",
        "{}: {} line(s) changed, {} suggestion(s)",
        path.display(),
        outcome.edits.len(),
        outcome.suggested.len()
    );
    Ok(doc.into_string())
}

fn request_for(doc: &TextDocument, job: &Job) -> Result<IndentRequest, CliError> {
    let Some(range) = job.lines else {
        return Ok(IndentRequest::whole(doc.len(), job.mode()));
    };
    let out_of_range = || CliError::LineRange {
        start: range.start,
        end: range.end,
        lines: doc.line_count(),
    };
    let start = doc.line_start(range.start - 1).ok_or_else(out_of_range)?;
    if doc.line_start(range.end - 1).is_none() {
        return Err(out_of_range());
    }
    let end = doc.line_start(range.end).map_or(doc.len(), |next| next - 1);
    Ok(IndentRequest::new(start, end, job.mode()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_line_range() {
        assert_eq!("3:7".parse(), Ok(LineRange { start: 3, end: 7 }));
        assert_eq!("4".parse(), Ok(LineRange { start: 4, end: 4 }));
        assert!("0:2".parse::<LineRange>().is_err());
        assert!("5:2".parse::<LineRange>().is_err());
        assert!("a:b".parse::<LineRange>().is_err());
    }

    #[test]
    fn test_kind_from_extension_or_flag() {
        let job = Job::default();
        assert_eq!(job.kind(Path::new("a.html")).unwrap(), SourceKind::Html);
        assert!(matches!(
            job.kind(Path::new("README")),
            Err(CliError::UnknownLanguage { .. })
        ));

        let job = Job {
            lang: Some(Lang::Css),
            ..Job::default()
        };
        assert_eq!(job.kind(Path::new("README")).unwrap(), SourceKind::Css);
    }

    #[test]
    fn test_reindent_whole_file() {
        let config = IndentConfig::new().indent_width(2);
        let out = reindent_text(
            Path::new("page.html"),
            "<div>\n<p>x</p>\n</div>\n",
            &Job::default(),
            &config,
        )
        .unwrap();
        assert_eq!(out, "<div>\n  <p>x</p>\n</div>\n");
    }

    #[test]
    fn test_reindent_line_range_only() {
        let config = IndentConfig::new().indent_width(2);
        let job = Job {
            lines: Some(LineRange { start: 2, end: 2 }),
            ..Job::default()
        };
        let out = reindent_text(Path::new("a.js"), "{\nx();\ny();\n}\n", &job, &config).unwrap();
        assert_eq!(out, "{\n  x();\ny();\n}\n");
    }

    #[test]
    fn test_timings_leave_result_alone() {
        let config = IndentConfig::new().indent_width(2);
        let text = "<div>\n<script>\nif (a) {\nb();\n}\n</script>\n</div>\n";
        let plain = reindent_text(Path::new("a.html"), text, &Job::default(), &config).unwrap();
        let job = Job {
            timings: true,
            ..Job::default()
        };
        let timed = reindent_text(Path::new("a.html"), text, &job, &config).unwrap();
        assert_eq!(plain, timed);
        assert_eq!(
            timed,
            "<div>\n  <script>\n    if (a) {\n      b();\n    }\n  </script>\n</div>\n"
        );
    }

    #[test]
    fn test_line_range_outside_file() {
        let job = Job {
            lines: Some(LineRange { start: 2, end: 9 }),
            ..Job::default()
        };
        let err = reindent_text(Path::new("a.js"), "{\n}\n", &job, &IndentConfig::new())
            .unwrap_err();
        assert!(matches!(err, CliError::LineRange { lines: 3, .. }));
    }
}
