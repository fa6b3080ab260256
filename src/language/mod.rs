pub mod bank;
pub mod weighted;

pub use bank::{EmbeddedLanguages, LanguageProvider, StaticLanguages, WordBank};
pub use weighted::{CumulativeWeights, WeightedWordSource, RANKED_LANGUAGE};
