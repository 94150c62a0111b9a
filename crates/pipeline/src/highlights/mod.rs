//! Time-aligned highlights for video transcripts.
//!
//! Two paths produce highlights:
//! - quotes: a local model extracts verbatim quotes, which are aligned to
//!   transcript time and merged (`quotes`, `mapper`, `merge`)
//! - llm: a cloud model picks clips directly from a timestamped transcript,
//!   falling back across an ordered model list (`generate`)

pub mod generate;
pub mod json;
pub mod mapper;
pub mod merge;
pub mod quotes;
pub mod types;

pub use generate::{HighlightConfig, HighlightGenerator, RetryPolicy};
pub use json::parse_json_array;
pub use mapper::{map_and_merge, map_quote_to_timestamp, MapperConfig};
pub use merge::{merge_highlights, MergeConfig, MergePolicy, Span};
pub use quotes::{QuoteConfig, QuoteExtractor};
pub use types::{HighlightCandidate, HighlightClip, MappedHighlight, Quote};
