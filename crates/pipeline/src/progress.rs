//! Structured progress reporting for pipeline runs.
//!
//! Long inputs are processed chunk by chunk and window by window; the
//! reporter turns each step into an event the caller can display.

use std::sync::Arc;
use std::time::Instant;

/// Progress event emitted during a pipeline run.
#[derive(Debug, Clone)]
pub struct ProgressEvent {
    /// Phase of the run: "chunk", "score", "synthesize", "quotes", "highlights"
    pub phase: String,

    /// Steps completed so far
    pub current: u64,

    /// Total expected steps (if known)
    pub total: Option<u64>,

    /// Percentage complete (0.0 - 100.0)
    pub percentage: Option<f64>,

    /// Human-readable message
    pub message: String,

    /// Seconds since the reporter was created
    pub elapsed_secs: Option<f64>,
}

impl ProgressEvent {
    pub fn new(
        phase: impl Into<String>,
        current: u64,
        total: Option<u64>,
        message: impl Into<String>,
    ) -> Self {
        let percentage = total.map(|t| {
            if t > 0 {
                (current as f64 / t as f64) * 100.0
            } else {
                0.0
            }
        });

        Self {
            phase: phase.into(),
            current,
            total,
            percentage,
            message: message.into(),
            elapsed_secs: None,
        }
    }

    pub fn with_elapsed(mut self, elapsed_secs: f64) -> Self {
        self.elapsed_secs = Some(elapsed_secs);
        self
    }

    /// Format as a simple user-facing line.
    pub fn format_simple(&self) -> String {
        let progress = match self.total {
            Some(total) => format!("{}/{}", self.current, total),
            None => self.current.to_string(),
        };

        let pct = self
            .percentage
            .map(|p| format!(" ({:.0}%)", p))
            .unwrap_or_default();

        format!("[{}] {}{} - {}", self.phase, progress, pct, self.message)
    }
}

/// Callback for progress events.
pub type ProgressCallback = Arc<dyn Fn(ProgressEvent) + Send + Sync>;

/// Progress reporter that emits events through a callback.
#[derive(Clone)]
pub struct ProgressReporter {
    callback: Option<ProgressCallback>,
    start_time: Arc<Instant>,
}

impl ProgressReporter {
    pub fn new(callback: ProgressCallback) -> Self {
        Self {
            callback: Some(callback),
            start_time: Arc::new(Instant::now()),
        }
    }

    /// A reporter that drops every event.
    pub fn noop() -> Self {
        Self {
            callback: None,
            start_time: Arc::new(Instant::now()),
        }
    }

    pub fn emit(&self, event: ProgressEvent) {
        let Some(callback) = &self.callback else {
            return;
        };

        let elapsed = self.start_time.elapsed().as_secs_f64();
        let event = event.with_elapsed(elapsed);

        tracing::debug!(
            phase = %event.phase,
            current = event.current,
            total = ?event.total,
            message = %event.message,
            elapsed_secs = elapsed,
            "Progress event"
        );

        callback(event);
    }

    /// Text split into chunks.
    pub fn chunk(&self, chunks: u64, words: usize) {
        self.emit(ProgressEvent::new(
            "chunk",
            chunks,
            Some(chunks),
            format!("{} chunks from {} words", chunks, words),
        ));
    }

    /// One chunk scored and reduced to its skeleton.
    pub fn score(&self, current: u64, total: u64, kept_chars: usize) {
        self.emit(ProgressEvent::new(
            "score",
            current,
            Some(total),
            format!("{} skeleton chars", kept_chars),
        ));
    }

    /// Synthesis request sent.
    pub fn synthesize(&self, model: &str) {
        self.emit(ProgressEvent::new(
            "synthesize",
            0,
            None,
            format!("model={}", model),
        ));
    }

    /// One transcript window sent for quote extraction.
    pub fn quotes(&self, current: u64, total: u64, quotes_so_far: usize) {
        self.emit(ProgressEvent::new(
            "quotes",
            current,
            Some(total),
            format!("{} quotes so far", quotes_so_far),
        ));
    }

    /// One model attempted for highlight selection.
    pub fn highlights(&self, attempt: u64, total: u64, model: &str) {
        self.emit(ProgressEvent::new(
            "highlights",
            attempt,
            Some(total),
            format!("model={}", model),
        ));
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::noop()
    }
}

impl std::fmt::Debug for ProgressReporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProgressReporter")
            .field("enabled", &self.callback.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn test_progress_event_format() {
        let event = ProgressEvent::new("quotes", 2, Some(4), "7 quotes so far");
        let formatted = event.format_simple();
        assert_eq!(formatted, "[quotes] 2/4 (50%) - 7 quotes so far");
    }

    #[test]
    fn test_format_without_total() {
        let event = ProgressEvent::new("synthesize", 0, None, "model=gemma3:12b");
        assert_eq!(event.format_simple(), "[synthesize] 0 - model=gemma3:12b");
    }

    #[test]
    fn test_progress_reporter_emit() {
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = events.clone();

        let reporter = ProgressReporter::new(Arc::new(move |event| {
            sink.lock().unwrap().push(event);
        }));

        reporter.score(3, 10, 120);

        let captured = events.lock().unwrap();
        assert_eq!(captured.len(), 1);
        assert_eq!(captured[0].phase, "score");
        assert_eq!(captured[0].current, 3);
        assert!(captured[0].elapsed_secs.is_some());
    }

    #[test]
    fn test_noop_reporter() {
        let reporter = ProgressReporter::noop();
        reporter.highlights(1, 4, "gemma-3-27b-it");
    }
}
