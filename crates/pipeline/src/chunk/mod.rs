//! Text chunking.
//!
//! Two splitters with different purposes:
//! - [`words`]: sentence-aware, word-budgeted chunks feeding the scorer
//! - [`windows`]: character windows feeding the quote extractor

pub mod windows;
pub mod words;

pub use windows::{split_windows, TextWindow};
pub use words::{chunk_words, chunk_words_with_mode, ChunkConfig, Segmentation};
