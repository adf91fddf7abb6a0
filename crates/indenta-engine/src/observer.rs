//! Pass instrumentation.

use std::time::{Duration, Instant};

/// Timed phases of a reindent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    StableStart,
    LinePairs,
    ProcessLanguage,
    Merge,
    Resolve,
    PreservedLines,
    ForeignBlocks,
    Modify,
}

/// Receives phase timings of a reindent.
pub trait PassObserver {
    fn phase(&mut self, phase: Phase, elapsed: Duration);
}

/// Discards all timings.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl PassObserver for NoopObserver {
    fn phase(&mut self, _phase: Phase, _elapsed: Duration) {}
}

/// Writes timings to the `indenta::perf` log target.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogObserver;

impl PassObserver for LogObserver {
    fn phase(&mut self, phase: Phase, elapsed: Duration) {
        log::debug!(target: "indenta::perf", "{phase:?} took {elapsed:?}");
    }
}

/// Run `f` and report its duration.
pub(crate) fn timed<T>(observer: &mut dyn PassObserver, phase: Phase, f: impl FnOnce() -> T) -> T {
    let start = Instant::now();
    let result = f();
    observer.phase(phase, start.elapsed());
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder(Vec<Phase>);

    impl PassObserver for Recorder {
        fn phase(&mut self, phase: Phase, _elapsed: Duration) {
            self.0.push(phase);
        }
    }

    #[test]
    fn test_timed_reports_phase() {
        let mut recorder = Recorder::default();
        let value = timed(&mut recorder, Phase::Merge, || 41 + 1);
        assert_eq!(value, 42);
        assert_eq!(recorder.0, vec![Phase::Merge]);
    }
}
