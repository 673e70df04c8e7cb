//! Single place for algorithm tunables (mirrors the teacher's
//! `astarpa/src/config.rs` role), made runtime-configurable rather than
//! compile-time constants since spec §6 requires CLI flags to override them.

use grammar_longest::ScoreMode;

/// Which family of grammar-construction algorithm to run.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum EngineKind {
    /// Re-Pair-family iterative pair replacement (spec §4.1).
    Pair,
    /// GLZA-family longest-string replacement (spec §4.2-4.4, 4.6).
    #[default]
    Longest,
}

#[derive(Clone, Debug)]
pub struct CompressorConfig {
    pub engine: EngineKind,

    /// Re-Pair compaction trigger, spec §4.1 (`u/c < factor`).
    pub factor: f32,

    /// GLZA `maxStringLength`, spec §4.2.
    pub max_string_length: usize,
    /// GLZA `maxScores` starting value, spec §4.3.
    pub initial_max_scores: usize,
    /// GLZA `maxScores` ceiling.
    pub max_scores_cap: usize,
    /// GLZA `minScore` floor, spec §4.6.
    pub min_score_floor: f64,
    /// Starting `minScore` for the first cycle.
    pub initial_min_score: f64,
    /// Profit-ratio power `α`, spec §4.3.
    pub alpha: f64,
    /// Override for `productionCost` (spec §4.3); `None` uses the formula.
    pub production_cost_override: Option<f64>,
    /// `MAX_SYMBOLS_DEFINED`, spec §4.6.
    pub max_symbols_defined: u32,

    /// Suffix-tree builder shard count and overlap-arbiter scan chunk count
    /// (generalizing the original's fixed 12-worker/8-chunk split).
    pub num_shards: usize,
    pub num_scan_chunks: usize,

    /// `-w0`: whether first-cycle word mode (spec §4.6) is enabled. Reaches
    /// the longest-string engine's outer loop, which restricts cycle 0 to
    /// space-led, word-boundary candidates when this is set and `score_mode`
    /// is `CapEncoded`. Has no effect on the pair engine, which has no
    /// notion of cycles to gate.
    pub word_mode: bool,

    /// Input-mode dispatch for the longest-string scorer's §4.3 penalty
    /// heuristics, derived from the §6 format-flag byte.
    pub score_mode: ScoreMode,
}

impl Default for CompressorConfig {
    fn default() -> Self {
        CompressorConfig {
            engine: EngineKind::default(),
            factor: 0.75,
            max_string_length: 8000,
            initial_max_scores: 5_000,
            max_scores_cap: 30_000,
            min_score_floor: 1e-9,
            initial_min_score: 1.0,
            alpha: 1.0,
            production_cost_override: None,
            max_symbols_defined: 0x0090_0000,
            num_shards: 4,
            num_scan_chunks: 8,
            word_mode: false,
            score_mode: ScoreMode::Generic,
        }
    }
}

impl CompressorConfig {
    pub fn pair_config(&self) -> grammar_pair::PairEngineConfig {
        grammar_pair::PairEngineConfig { factor: self.factor }
    }

    pub fn longest_config(&self) -> grammar_longest::LongestEngineConfig {
        grammar_longest::LongestEngineConfig {
            max_string_length: self.max_string_length,
            initial_max_scores: self.initial_max_scores,
            max_scores_cap: self.max_scores_cap,
            alpha: self.alpha,
            production_cost_override: self.production_cost_override,
            min_score_floor: self.min_score_floor,
            initial_min_score: self.initial_min_score,
            num_shards: self.num_shards,
            num_scan_chunks: self.num_scan_chunks,
            max_symbols_defined: self.max_symbols_defined,
            score_mode: self.score_mode,
            word_mode: self.word_mode,
            ..grammar_longest::LongestEngineConfig::default()
        }
    }
}
