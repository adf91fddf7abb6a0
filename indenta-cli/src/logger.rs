//! A stderr logger for the engine's `log` records.
//! 将引擎的 `log` 记录输出到 stderr。

use log::{Level, LevelFilter, Log, Metadata, Record};

use crate::output;

struct StderrLogger;

static LOGGER: StderrLogger = StderrLogger;

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= log::max_level() && metadata.target().starts_with("indenta")
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let msg = record.args().to_string();
        match record.level() {
            Level::Error => output::error(&msg),
            Level::Warn => output::warning(&msg),
            Level::Info => output::info(&msg),
            Level::Debug | Level::Trace => output::detail(record.target(), &msg),
        }
    }

    fn flush(&self) {}
}

/// Level for the command-line switches. `quiet` wins over the others.
pub fn level_for(quiet: bool, verbose: bool, trace: bool) -> LevelFilter {
    if quiet {
        LevelFilter::Off
    } else if trace {
        LevelFilter::Trace
    } else if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    }
}

/// Install the logger. A second call only changes the level.
pub fn init(level: LevelFilter) {
    // set_logger fails only if a logger is already installed
    let _ = log::set_logger(&LOGGER);
    log::set_max_level(level);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levels() {
        assert_eq!(level_for(true, true, true), LevelFilter::Off);
        assert_eq!(level_for(false, true, true), LevelFilter::Trace);
        assert_eq!(level_for(false, true, false), LevelFilter::Debug);
        assert_eq!(level_for(false, false, false), LevelFilter::Warn);
    }
}
