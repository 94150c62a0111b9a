//! Interval merging for highlight clips.

use super::types::{round2, HighlightClip, MappedHighlight};
use serde::{Deserialize, Serialize};

/// Titles kept on a merged clip before the rest collapse into " ...".
const MAX_MERGED_TITLES: usize = 2;
const TITLE_SEPARATOR: &str = " / ";
const TITLE_ELLIPSIS: &str = " ...";

/// A time span that can be merged with its neighbours.
pub trait Span {
    fn start(&self) -> f64;
    fn end(&self) -> f64;
    fn set_start(&mut self, start: f64);
    fn set_end(&mut self, end: f64);

    /// Fold the payload of a span merged into this one. Bounds are already
    /// updated by the caller.
    fn absorb(&mut self, other: Self);

    fn length(&self) -> f64 {
        self.end() - self.start()
    }
}

impl Span for HighlightClip {
    fn start(&self) -> f64 {
        self.start as f64
    }

    fn end(&self) -> f64 {
        self.end as f64
    }

    fn set_start(&mut self, start: f64) {
        self.start = start.round() as i64;
    }

    fn set_end(&mut self, end: f64) {
        self.end = end.round() as i64;
    }

    fn absorb(&mut self, other: Self) {
        if self.title.ends_with(TITLE_ELLIPSIS) {
            return;
        }

        let titles: Vec<&str> = self.title.split(TITLE_SEPARATOR).collect();
        if titles.contains(&other.title.as_str()) {
            return;
        }

        if titles.len() < MAX_MERGED_TITLES {
            self.title.push_str(TITLE_SEPARATOR);
            self.title.push_str(&other.title);
        } else {
            self.title.push_str(TITLE_ELLIPSIS);
        }
    }
}

impl Span for MappedHighlight {
    fn start(&self) -> f64 {
        self.start
    }

    fn end(&self) -> f64 {
        self.end
    }

    fn set_start(&mut self, start: f64) {
        self.start = round2(start);
        self.duration = round2(self.end - self.start);
    }

    fn set_end(&mut self, end: f64) {
        self.end = round2(end);
        self.duration = round2(self.end - self.start);
    }

    fn absorb(&mut self, other: Self) {
        self.text.push(' ');
        self.text.push_str(&other.text);
    }
}

/// When two adjacent spans are merged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergePolicy {
    /// Largest silence (seconds) bridged between two spans
    pub max_gap: f64,

    /// Longest span a merge may produce; `None` means unbounded
    #[serde(default)]
    pub max_duration: Option<f64>,
}

impl MergePolicy {
    /// Policy for model-selected clips: 2 s gap, 3 minute cap.
    pub fn llm() -> Self {
        Self {
            max_gap: 2.0,
            max_duration: Some(180.0),
        }
    }

    /// Policy for quote-mapped highlights: 3 s gap, no cap.
    pub fn quotes() -> Self {
        Self {
            max_gap: 3.0,
            max_duration: None,
        }
    }

    fn within_cap(&self, length: f64) -> bool {
        self.max_duration.map_or(true, |cap| length <= cap)
    }

    fn truncate<T: Span>(&self, span: &mut T) {
        if let Some(cap) = self.max_duration {
            if span.length() > cap {
                span.set_end(span.start() + cap);
            }
        }
    }
}

/// Both merge presets, as loaded from configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MergeConfig {
    pub llm: MergePolicy,
    pub quotes: MergePolicy,
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            llm: MergePolicy::llm(),
            quotes: MergePolicy::quotes(),
        }
    }
}

/// Merge spans that overlap or sit within `max_gap` of each other.
///
/// The output is sorted by start, non-overlapping, and no span exceeds the
/// policy cap. Empty or inverted spans are dropped.
pub fn merge_highlights<T: Span>(mut items: Vec<T>, policy: &MergePolicy) -> Vec<T> {
    let before = items.len();
    items.retain(|span| span.end() > span.start());
    items.sort_by(|a, b| {
        a.start()
            .total_cmp(&b.start())
            .then(a.end().total_cmp(&b.end()))
    });

    let mut iter = items.into_iter();
    let Some(mut current) = iter.next() else {
        return Vec::new();
    };
    policy.truncate(&mut current);

    let mut merged = Vec::new();

    for mut next in iter {
        let reaches = current.end() >= next.start() - policy.max_gap;
        let combined_end = current.end().max(next.end());

        if reaches && policy.within_cap(combined_end - current.start()) {
            current.set_end(combined_end);
            current.absorb(next);
            continue;
        }

        if next.start() < current.end() {
            if next.end() <= current.end() {
                continue;
            }
            next.set_start(current.end());
        }

        merged.push(current);
        current = next;
        policy.truncate(&mut current);
    }
    merged.push(current);

    tracing::debug!(before, after = merged.len(), "Merged highlight spans");
    merged
}
