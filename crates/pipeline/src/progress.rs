//! Progress reporting for one pipeline call.

use std::sync::Mutex;

use clipsmith_edit_model::{ProcessingProgress, ProcessingStage};

/// Caller-supplied progress sink.
pub type ProgressCallback = Box<dyn Fn(ProcessingProgress) + Send + Sync>;

/// Emits [`ProcessingProgress`] events for one call.
///
/// Percent never decreases: an emission below the last reported value is
/// raised to it. The reporter also tracks whether a terminal event was sent.
pub struct ProgressReporter<'a> {
    callback: Option<&'a (dyn Fn(ProcessingProgress) + Send + Sync)>,
    state: Mutex<ReporterState>,
}

#[derive(Debug, Default)]
struct ReporterState {
    last_percent: f64,
    finished: bool,
}

impl<'a> ProgressReporter<'a> {
    pub fn new(callback: Option<&'a (dyn Fn(ProcessingProgress) + Send + Sync)>) -> Self {
        Self {
            callback,
            state: Mutex::new(ReporterState::default()),
        }
    }

    /// A reporter that drops every event.
    pub fn silent() -> Self {
        Self::new(None)
    }

    pub fn emit(&self, stage: ProcessingStage, percent: f64, message: impl Into<String>) {
        let event = {
            let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
            if state.finished {
                return;
            }
            let percent = if percent.is_finite() {
                percent.clamp(0.0, 100.0).max(state.last_percent)
            } else {
                state.last_percent
            };
            state.last_percent = percent;
            state.finished = stage.is_terminal();
            ProcessingProgress::new(stage, percent, message)
        };
        if let Some(callback) = self.callback {
            callback(event);
        }
    }

    pub fn loading(&self, percent: f64, message: impl Into<String>) {
        self.emit(ProcessingStage::Loading, percent, message);
    }

    pub fn processing(&self, percent: f64, message: impl Into<String>) {
        self.emit(ProcessingStage::Processing, percent, message);
    }

    pub fn encoding(&self, percent: f64, message: impl Into<String>) {
        self.emit(ProcessingStage::Encoding, percent, message);
    }

    pub fn complete(&self, message: impl Into<String>) {
        self.emit(ProcessingStage::Complete, 100.0, message);
    }

    /// Terminal error event, reported at the last percent reached.
    pub fn fail(&self, message: impl Into<String>) {
        let percent = self.last_percent();
        self.emit(ProcessingStage::Error, percent, message);
    }

    pub fn last_percent(&self) -> f64 {
        self.state
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .last_percent
    }

    pub fn is_finished(&self) -> bool {
        self.state.lock().unwrap_or_else(|e| e.into_inner()).finished
    }

    /// Engine progress sink mapping fractions onto `[lo, hi]` percent as
    /// `encoding` events.
    pub fn span(
        &self,
        lo: f64,
        hi: f64,
        message: &'static str,
    ) -> Box<dyn Fn(f64) + Send + Sync + '_> {
        Box::new(move |fraction: f64| {
            let fraction = if fraction.is_finite() {
                fraction.clamp(0.0, 1.0)
            } else {
                0.0
            };
            self.encoding(lo + (hi - lo) * fraction, message);
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn recording() -> (Arc<Mutex<Vec<ProcessingProgress>>>, ProgressCallback) {
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&events);
        let callback: ProgressCallback = Box::new(move |p| sink.lock().unwrap().push(p));
        (events, callback)
    }

    #[test]
    fn test_percent_never_decreases() {
        let (events, callback) = recording();
        let reporter = ProgressReporter::new(Some(callback.as_ref()));
        reporter.processing(30.0, "a");
        reporter.encoding(20.0, "b");
        reporter.encoding(f64::NAN, "c");
        reporter.complete("done");

        let percents: Vec<f64> = events.lock().unwrap().iter().map(|e| e.percent).collect();
        assert_eq!(percents, vec![30.0, 30.0, 30.0, 100.0]);
    }

    #[test]
    fn test_nothing_after_terminal_event() {
        let (events, callback) = recording();
        let reporter = ProgressReporter::new(Some(callback.as_ref()));
        reporter.encoding(40.0, "x");
        reporter.fail("boom");
        reporter.complete("late");

        let events = events.lock().unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[1].stage, ProcessingStage::Error);
        assert_eq!(events[1].percent, 40.0);
        assert!(reporter.is_finished());
    }

    #[test]
    fn test_span_maps_fractions() {
        let (events, callback) = recording();
        let reporter = ProgressReporter::new(Some(callback.as_ref()));
        let sink = reporter.span(30.0, 90.0, "Encoding");
        sink(0.5);
        sink(2.0);

        let percents: Vec<f64> = events.lock().unwrap().iter().map(|e| e.percent).collect();
        assert_eq!(percents, vec![60.0, 90.0]);
    }
}
