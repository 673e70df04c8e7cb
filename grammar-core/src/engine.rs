//! `Engine`: selects and runs one `GrammarCompressor` implementation
//! (mirrors the teacher's `astarpa::AstarPa` top-level entry point that
//! wraps a heuristic choice behind one `align` call).

use crate::config::{CompressorConfig, EngineKind};
use crate::stats::CompressionStats;
use grammar_longest::LongestEngine;
use grammar_pair::PairEngine;
use grammar_types::{GrammarCompressor, Result, Rule, Sequence};
use tracing::info;

pub struct Engine {
    config: CompressorConfig,
}

impl Engine {
    pub fn new(config: CompressorConfig) -> Self {
        Engine { config }
    }

    #[tracing::instrument(skip_all, fields(engine = ?self.config.engine))]
    pub fn compress(&self, alphabet_size: u32, mut sequence: Sequence) -> Result<(Vec<Rule>, Sequence, CompressionStats)> {
        let input_symbols = sequence.len();

        let rules = match self.config.engine {
            EngineKind::Pair => {
                let mut engine = PairEngine::new(alphabet_size, self.config.pair_config());
                engine.compress(&mut sequence)?
            }
            EngineKind::Longest => {
                let mut engine = LongestEngine::new(alphabet_size, self.config.longest_config());
                engine.compress(&mut sequence)?
            }
        };

        let stats = CompressionStats::new(input_symbols, sequence.len(), rules.len(), alphabet_size);
        info!(
            input_symbols,
            residual_symbols = stats.residual_symbols,
            rules_emitted = stats.rules_emitted,
            ratio = stats.compression_ratio(),
            "compression complete"
        );
        Ok((rules, sequence, stats))
    }
}
