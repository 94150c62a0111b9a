//! Text utilities shared by the chunker, scorer and statistics.

pub mod preprocess;
pub mod stopwords;
pub mod tagger;
pub mod tokenize;

pub use preprocess::normalize;
pub use stopwords::is_stop_word;
pub use tagger::{HeuristicTagger, PosTag, Tagger};
pub use tokenize::{pseudo_sentences, Tokenizer, UnicodeTokenizer};
