//! Fact skeleton extraction.

use crate::score::ScoredSentence;
use serde::{Deserialize, Serialize};

/// Thresholds for keeping sentences, relative to the chunk's mean score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkeletonConfig {
    pub strict_ratio: f64,
    pub relaxed_ratio: f64,

    /// Sentences kept when both thresholds select nothing
    pub fallback_top_n: usize,
}

impl Default for SkeletonConfig {
    fn default() -> Self {
        Self {
            strict_ratio: 1.1,
            relaxed_ratio: 0.8,
            fallback_top_n: 3,
        }
    }
}

/// Keep the above-average sentences of a scored chunk, in original order,
/// joined by single spaces.
///
/// Only empty input produces an empty skeleton.
pub fn extract_skeleton(scored: &[ScoredSentence], config: &SkeletonConfig) -> String {
    if scored.is_empty() {
        return String::new();
    }

    let mean = scored.iter().map(|s| s.score).sum::<f64>() / scored.len() as f64;

    let above = |ratio: f64| -> Vec<usize> {
        scored
            .iter()
            .enumerate()
            .filter(|(_, s)| s.score > mean * ratio)
            .map(|(i, _)| i)
            .collect()
    };

    let mut keep = above(config.strict_ratio);

    if keep.is_empty() {
        keep = above(config.relaxed_ratio);
    }

    if keep.is_empty() {
        let mut ranked: Vec<usize> = (0..scored.len()).collect();
        ranked.sort_by(|&a, &b| scored[b].score.total_cmp(&scored[a].score));
        ranked.truncate(config.fallback_top_n.max(1));
        ranked.sort_unstable();
        keep = ranked;
    }

    keep.iter()
        .map(|&i| scored[i].sentence.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}
