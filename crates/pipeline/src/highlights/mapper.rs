//! Quote-to-timestamp alignment.
//!
//! Every segment's normalized text is concatenated into one buffer, and each
//! segment remembers the character range it occupies. A quote is located in
//! that buffer and the range is translated back into seconds.

use super::merge::{merge_highlights, MergePolicy};
use super::types::{MappedHighlight, Quote};
use crate::types::TranscriptSegment;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static NON_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\W+").unwrap());

/// Alignment tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapperConfig {
    /// Seconds added on both sides of a matched quote
    pub buffer_secs: f64,

    /// Normalized prefix length tried when the full quote is not found
    pub relaxed_prefix_chars: usize,
}

impl Default for MapperConfig {
    fn default() -> Self {
        Self {
            buffer_secs: 1.0,
            relaxed_prefix_chars: 50,
        }
    }
}

/// Lowercase and strip everything that is not a word character.
fn normalize_for_match(text: &str) -> String {
    NON_WORD.replace_all(&text.to_lowercase(), "").into_owned()
}

struct SegmentRange {
    /// `[start_idx, end_idx)` in buffer characters
    start_idx: usize,
    end_idx: usize,
    timestamp_start: f64,
    timestamp_end: f64,
}

struct AlignmentBuffer {
    chars: Vec<char>,
    ranges: Vec<SegmentRange>,
}

impl AlignmentBuffer {
    fn build(segments: &[TranscriptSegment]) -> Self {
        let mut chars = Vec::new();
        let mut ranges = Vec::with_capacity(segments.len());

        for (i, segment) in segments.iter().enumerate() {
            let normalized: Vec<char> = normalize_for_match(&segment.text).chars().collect();

            let mut timestamp_end = segment.start + segment.duration;
            if let Some(next) = segments.get(i + 1) {
                timestamp_end = timestamp_end.min(next.start);
            }

            let start_idx = chars.len();
            chars.extend(normalized);
            ranges.push(SegmentRange {
                start_idx,
                end_idx: chars.len(),
                timestamp_start: segment.start,
                timestamp_end,
            });
        }

        Self { chars, ranges }
    }

    fn find(&self, needle: &[char]) -> Option<usize> {
        if needle.is_empty() || needle.len() > self.chars.len() {
            return None;
        }
        self.chars.windows(needle.len()).position(|w| w == needle)
    }

    /// Translate `[match_start, match_end)` into seconds.
    fn times(&self, match_start: usize, match_end: usize) -> Option<(f64, f64)> {
        let mut t_start = None;
        let mut t_end = None;

        for range in &self.ranges {
            if t_start.is_none() && match_start >= range.start_idx && match_start < range.end_idx {
                t_start = Some(range.timestamp_start);
            }

            if t_start.is_some() {
                if range.end_idx >= match_end {
                    let len = range.end_idx - range.start_idx;
                    t_end = Some(if len > 0 {
                        let ratio = (match_end - range.start_idx) as f64 / len as f64;
                        range.timestamp_start + (range.timestamp_end - range.timestamp_start) * ratio
                    } else {
                        range.timestamp_end
                    });
                    break;
                }
                t_end = Some(range.timestamp_end);
            }
        }

        Some((t_start?, t_end?))
    }
}

/// Locate a quote in the transcript and return its buffered time span.
///
/// Tries the whole normalized quote first, then its first
/// `relaxed_prefix_chars` characters. Returns `None` when the quote
/// normalizes to nothing or cannot be found.
pub fn map_quote_to_timestamp(
    quote: &str,
    segments: &[TranscriptSegment],
    config: &MapperConfig,
) -> Option<MappedHighlight> {
    let target: Vec<char> = normalize_for_match(quote).chars().collect();
    if target.is_empty() {
        return None;
    }

    let buffer = AlignmentBuffer::build(segments);

    let match_start = buffer.find(&target).or_else(|| {
        let prefix = &target[..target.len().min(config.relaxed_prefix_chars)];
        buffer.find(prefix)
    })?;
    let match_end = (match_start + target.len()).min(buffer.chars.len());

    let (t_start, t_end) = buffer.times(match_start, match_end)?;

    let start = (t_start - config.buffer_secs).max(0.0);
    let end = t_end + config.buffer_secs;

    let highlight = MappedHighlight::new(quote, start, end);
    if highlight.end <= highlight.start {
        tracing::debug!(start, end, "Quote maps to an empty span");
        return None;
    }

    Some(highlight)
}

/// Map every quote, drop the ones that cannot be aligned, and merge the rest.
pub fn map_and_merge(
    quotes: &[Quote],
    segments: &[TranscriptSegment],
    config: &MapperConfig,
    policy: &MergePolicy,
) -> Vec<MappedHighlight> {
    let mapped: Vec<MappedHighlight> = quotes
        .iter()
        .filter_map(|q| {
            let highlight = map_quote_to_timestamp(&q.quote, segments, config);
            if highlight.is_none() {
                tracing::warn!(quote = %q.quote, "Quote not found in transcript, dropping");
            }
            highlight
        })
        .collect();

    tracing::info!(
        quotes = quotes.len(),
        mapped = mapped.len(),
        "Mapped quotes to transcript timestamps"
    );

    merge_highlights(mapped, policy)
}
