//! Outer loop of the longest-string engine (spec §4.6): repeatedly build a
//! suffix forest over the current sequence, score it, arbitrate overlaps,
//! substitute, and relax the acceptance threshold until nothing profitable
//! remains or the symbol-definition budget is exhausted. Cycle 0 additionally
//! gates the scorer to space-led, word-boundary strings when cap-encoded
//! word mode is active ("First-cycle word-mode", spec §4.6).

use crate::arbiter;
use crate::score::{self, ScoreMode, ScoreParams};
use crate::substitute;
use crate::tree;
use grammar_types::{GrammarCompressor, ProductionTable, Result, Rule, Sequence, Symbol};
use tracing::{debug, info, instrument};

/// `MAX_SYMBOLS_DEFINED` of spec §4.6.
const MAX_SYMBOLS_DEFINED_DEFAULT: u32 = 0x0090_0000;

#[derive(Clone, Debug)]
pub struct LongestEngineConfig {
    /// `maxStringLength`, spec §4.2, default 8000.
    pub max_string_length: usize,
    /// `maxScores` starting value, spec §4.3, default 5,000.
    pub initial_max_scores: usize,
    /// `maxScores` ceiling, default 30,000.
    pub max_scores_cap: usize,
    /// Profit-ratio power `α`, spec §4.3.
    pub alpha: f64,
    pub production_cost_override: Option<f64>,
    /// Floor for `minScore`, spec §4.6.
    pub min_score_floor: f64,
    /// Starting `minScore` for the very first cycle.
    pub initial_min_score: f64,
    /// Suffix-tree builder shard count (spec §4.2's 12 workers, generalized
    /// to a configurable shard count — see DESIGN.md).
    pub num_shards: usize,
    /// Overlap-arbiter parallel scan chunk count (spec §4.4's 8 chunks).
    pub num_scan_chunks: usize,
    pub max_symbols_defined: u32,
    /// Safety bound on outer-loop iterations; the threshold/budget schedule
    /// is expected to terminate well before this in practice.
    pub max_cycles: usize,
    /// Input-mode dispatch for the scorer's §4.3 penalty heuristics.
    pub score_mode: ScoreMode,
    /// `-w0`: whether first-cycle word mode (spec §4.6) is enabled. Only
    /// takes effect when `score_mode` is `CapEncoded`, matching the spec's
    /// "cap-encoded and word mode is enabled" precondition.
    pub word_mode: bool,
}

impl Default for LongestEngineConfig {
    fn default() -> Self {
        LongestEngineConfig {
            max_string_length: 8000,
            initial_max_scores: 5_000,
            max_scores_cap: 30_000,
            alpha: 1.0,
            production_cost_override: None,
            min_score_floor: 1e-9,
            initial_min_score: 1.0,
            num_shards: 4,
            num_scan_chunks: 8,
            max_symbols_defined: MAX_SYMBOLS_DEFINED_DEFAULT,
            max_cycles: 10_000,
            score_mode: ScoreMode::Generic,
            word_mode: false,
        }
    }
}

pub struct LongestEngine {
    alphabet_size: u32,
    config: LongestEngineConfig,
}

impl LongestEngine {
    pub fn new(alphabet_size: u32, config: LongestEngineConfig) -> Self {
        LongestEngine { alphabet_size, config }
    }
}

fn histogram(seq: &[Symbol], capacity: usize) -> Vec<u64> {
    let mut counts = vec![0u64; capacity + 1];
    for &s in seq {
        let v = s.value() as usize;
        if v < counts.len() {
            counts[v] += 1;
        }
    }
    counts
}

impl GrammarCompressor for LongestEngine {
    #[instrument(skip_all, fields(alphabet_size = self.alphabet_size))]
    fn compress(&mut self, sequence: &mut Sequence) -> Result<Vec<Rule>> {
        let mut seq = std::mem::take(sequence).into_vec();
        let mut table = ProductionTable::new(self.alphabet_size);

        let mut min_score = self.config.initial_min_score;
        let mut prior_min_score = self.config.initial_min_score;
        let mut max_scores = self.config.initial_max_scores;

        let mut cycle = 0usize;
        while cycle < self.config.max_cycles {
            if table.len() as u32 >= self.config.max_symbols_defined {
                debug!(cycle, "symbol definition budget exhausted");
                break;
            }
            if seq.len() < 2 {
                break;
            }

            let forest = tree::build_parallel(&seq, seq.len(), self.config.num_shards, self.config.max_string_length);

            let next_id_value = table.next_id().value() as usize;
            let counts = histogram(&seq, next_id_value);
            let active_symbols = counts.iter().filter(|&&c| c > 0).count();

            let word_boundary_gate =
                cycle == 0 && self.config.word_mode && self.config.score_mode == ScoreMode::CapEncoded;
            let params = ScoreParams {
                sequence_len: seq.len(),
                active_symbols,
                alpha: self.config.alpha,
                min_score,
                max_scores,
                production_cost_override: self.config.production_cost_override,
                mode: self.config.score_mode,
                word_boundary_gate,
            };
            let candidates = score::score_forest(&forest, &seq, &counts, params);
            if candidates.is_empty() {
                debug!(cycle, "no profitable candidates, terminating");
                break;
            }

            let (survivors, trie) = arbiter::arbitrate(candidates, &seq, self.config.num_scan_chunks, self.config.max_string_length);
            if survivors.is_empty() {
                debug!(cycle, "all candidates invalidated by arbitration, terminating");
                break;
            }

            let ids: Vec<Symbol> = survivors.iter().map(|c| table.push_rhs(c.symbols.clone())).collect();
            let new_seq = substitute::substitute(&trie, &seq, &survivors, &ids);

            let round_min = survivors.iter().map(|c| c.score).fold(f64::INFINITY, f64::min);
            let candidate_set_was_full = survivors.len() >= max_scores;
            let new_min = if candidate_set_was_full && round_min < min_score {
                0.98 * min_score * (min_score / prior_min_score.max(1e-12)) - 0.001
            } else {
                0.47 * (prior_min_score + min_score) - 0.001
            }
            .max(self.config.min_score_floor);

            prior_min_score = min_score;
            min_score = new_min;
            max_scores = ((max_scores + 2 * (29 * survivors.len() / 32 + 5_000)) / 3).min(self.config.max_scores_cap);

            info!(
                cycle,
                rules_this_cycle = survivors.len(),
                residual = new_seq.len(),
                min_score,
                "longest-string cycle complete"
            );

            if new_seq.len() >= seq.len() {
                // P6: either |S| strictly decreases or the round emits zero
                // candidates. We already know candidates were non-empty, so
                // a non-decreasing length here means every candidate lost
                // to self-overlap pruning; stop rather than loop forever.
                seq = new_seq;
                break;
            }
            seq = new_seq;
            cycle += 1;
        }

        *sequence = Sequence::new(seq);
        info!(cycles = cycle, rules = table.len(), residual = sequence.len(), "longest engine terminated");
        Ok(table.into_rules())
    }
}
