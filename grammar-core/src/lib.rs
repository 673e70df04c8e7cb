mod config;
mod engine;
mod stats;

pub use config::{CompressorConfig, EngineKind};
pub use engine::Engine;
pub use stats::CompressionStats;

pub use grammar_longest::ScoreMode;
pub use grammar_types::{GrammarCompressor, GrammarError, Result, Rule, Sequence, Symbol};
