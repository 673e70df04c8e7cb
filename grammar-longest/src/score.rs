//! Entropy-based scoring (spec §4.3) and the bounded top-K candidate list.

use crate::tree::{NodeId, ShardedForest};
use grammar_types::Symbol;
use tracing::debug;

/// Input-mode dispatch for the §4.3 penalty heuristics, driven by the
/// leading format-flag byte (spec §6) rather than inspected per-candidate.
/// `Utf8` is reachable only by constructing `ScoreParams` directly (the
/// CLI's codec only decodes the cap-encoded bit, not a UTF-8 prescan — see
/// DESIGN.md), but is scored identically to how the cap-encoded/UTF-8
/// branches of `score_node` apply it.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum ScoreMode {
    /// Arbitrary byte data; no word-boundary penalty structure applies.
    #[default]
    Generic,
    /// Input produced by the cap-encoding preprocessor (capital letters
    /// escaped ahead of a lowercase run, words delimited by a single
    /// leading space).
    CapEncoded,
    /// UTF-8-compliant text that was not cap-encoded.
    Utf8,
}

impl ScoreMode {
    /// Bit 0 of the §6 format-flag byte is the only bit the core
    /// interprets; everything else is "data-dependent but not interpreted
    /// by the core" per spec §6, so it can only ever select `CapEncoded` or
    /// `Generic` here.
    pub fn from_format_flag(format_flag: u8) -> Self {
        if format_flag & 1 != 0 {
            ScoreMode::CapEncoded
        } else {
            ScoreMode::Generic
        }
    }

    /// Default profit-ratio power `alpha` for this mode (spec §4.3), used
    /// unless a caller supplies an explicit override (the CLI's `-p`).
    pub fn default_alpha(self) -> f64 {
        match self {
            ScoreMode::Generic => 1.0,
            ScoreMode::CapEncoded | ScoreMode::Utf8 => 2.0,
        }
    }
}

/// Knobs that feed the score formula, independent of engine-wide config so
/// the scorer can be exercised standalone in tests.
#[derive(Clone, Copy, Debug)]
pub struct ScoreParams {
    pub sequence_len: usize,
    pub active_symbols: usize,
    pub alpha: f64,
    pub min_score: f64,
    pub max_scores: usize,
    pub production_cost_override: Option<f64>,
    /// Input-mode penalty dispatch, spec §4.3.
    pub mode: ScoreMode,
    /// Spec §4.6 "First-cycle word-mode": when set, only candidates that
    /// begin with a space and end on a word boundary are emitted. Callers
    /// set this for cycle 0 only, and only when cap-encoded + word mode are
    /// both active.
    pub word_boundary_gate: bool,
}

/// A scored, still-unresolved substitution candidate (spec §3 "Candidate").
/// Tracks one representative occurrence rather than the original's two
/// most-recent ones: Pass 3 of the overlap arbiter is the authoritative
/// collision check in this rewrite, so the top-K list's own overlap
/// pre-check only needs a cheap single-range hint (see DESIGN.md).
#[derive(Clone, Debug)]
pub struct Candidate {
    pub score: f64,
    pub symbols: Vec<Symbol>,
    pub occurrence_start: usize,
}

impl Candidate {
    fn range(&self) -> (usize, usize) {
        (self.occurrence_start, self.occurrence_start + self.symbols.len())
    }

    fn overlaps(&self, other: &Candidate) -> bool {
        let (a0, a1) = self.range();
        let (b0, b1) = other.range();
        a0 < b1 && b0 < a1
    }
}

fn log2(x: f64) -> f64 {
    x.max(1e-12).log2()
}

/// `newSymbolCost(instances)` of spec §4.3.
fn new_symbol_cost(sequence_len: usize, repeats: u32) -> f64 {
    log2(sequence_len as f64) + 1.4 - log2(repeats.max(1) as f64)
}

const SPACE: i32 = 0x20;

fn is_space(sym: Symbol) -> bool {
    sym.value() == SPACE
}

/// ASCII letter or digit; used only to decide word-boundary-ness, not to
/// classify non-terminals (which are treated as boundaries either way since
/// they can't be inspected character-by-character here).
fn is_word_char(sym: Symbol) -> bool {
    let v = sym.value();
    (0..128).contains(&v) && (v as u8 as char).is_ascii_alphanumeric()
}

fn begins_on_word_boundary(preceding: Option<Symbol>) -> bool {
    preceding.map(|s| !is_word_char(s)).unwrap_or(true)
}

fn ends_on_word_boundary(following: Option<Symbol>) -> bool {
    following.map(|s| !is_word_char(s)).unwrap_or(true)
}

/// Spec §4.6 "First-cycle word-mode" selection criterion: a string that
/// starts with a space and stops exactly at a word boundary, i.e. a whole
/// dictionary word (optionally multi-word) rather than a sub-word fragment.
fn is_word_mode_candidate(symbols: &[Symbol], following: Option<Symbol>) -> bool {
    symbols.first().copied().map(is_space).unwrap_or(false) && ends_on_word_boundary(following)
}

/// Spec §4.3 "Penalty heuristics": the multiplicative weight applied to
/// `score` for cap-encoded or UTF-8 input. Generic text is never penalized.
fn mode_penalty(mode: ScoreMode, symbols: &[Symbol], preceding: Option<Symbol>, following: Option<Symbol>) -> f64 {
    let first = symbols[0];
    let last = *symbols.last().unwrap();
    match mode {
        ScoreMode::Generic => 1.0,
        ScoreMode::CapEncoded => {
            let mut weight = 1.0;
            if is_space(last) {
                weight *= if symbols.len() == 1 {
                    0.5
                } else if begins_on_word_boundary(preceding) {
                    1.0
                } else {
                    0.5
                };
            }
            if is_space(first) {
                let interior_space = symbols[1..symbols.len().saturating_sub(1)].iter().copied().any(is_space);
                if interior_space || !ends_on_word_boundary(following) {
                    weight *= 0.03;
                }
            }
            weight
        }
        ScoreMode::Utf8 => {
            if is_space(last) {
                let before_last = if symbols.len() >= 2 { Some(symbols[symbols.len() - 2]) } else { preceding };
                if !before_last.map(is_space).unwrap_or(false) {
                    return 0.03;
                }
            }
            1.0
        }
    }
}

/// Score one suffix-tree node, returning `None` if it fails any of the
/// emission gates (first-cycle word-boundary restriction, `profitPerSubst
/// >= 0`, `bitSavings > 0`, `score >= minScore`).
pub fn score_node(
    symbols: &[Symbol],
    instances: u32,
    occurrence_start: usize,
    preceding_symbol: Option<Symbol>,
    following_symbol: Option<Symbol>,
    counts: &[u64],
    params: &ScoreParams,
) -> Option<Candidate> {
    if instances < 2 || symbols.is_empty() {
        return None;
    }
    if params.word_boundary_gate && !is_word_mode_candidate(symbols, following_symbol) {
        return None;
    }

    let n = params.sequence_len as f64;
    let string_entropy: f64 = symbols
        .iter()
        .map(|s| {
            let count = counts.get(s.value() as usize).copied().unwrap_or(1).max(1);
            log2(n) - log2(count as f64)
        })
        .sum();

    let repeats = instances - 1;
    let profit_per_subst = string_entropy - new_symbol_cost(params.sequence_len, repeats);
    if profit_per_subst < 0.0 {
        return None;
    }

    let production_cost = params
        .production_cost_override
        .unwrap_or_else(|| log2(n / params.active_symbols.max(1) as f64) + 1.5);
    let bit_savings = repeats as f64 * profit_per_subst - production_cost;
    if bit_savings <= 0.0 {
        return None;
    }

    let profit_ratio = profit_per_subst / string_entropy.max(1e-12);
    let score = bit_savings * profit_ratio.powf(params.alpha)
        * mode_penalty(params.mode, symbols, preceding_symbol, following_symbol);
    if score < params.min_score {
        return None;
    }

    Some(Candidate { score, symbols: symbols.to_vec(), occurrence_start })
}

/// The sorted, bounded, overlap-aware top-K list a single consumer
/// maintains (spec §4.3 "Top-K candidate set"). Approximate by design: a
/// newly-inserted candidate evicts at most one subsequent overlapping
/// entry (§9 open question — preserved rather than "corrected").
pub struct TopKList {
    candidates: Vec<Candidate>,
    capacity: usize,
}

impl TopKList {
    pub fn new(capacity: usize) -> Self {
        TopKList { candidates: Vec::with_capacity(capacity.min(4096)), capacity }
    }

    pub fn into_vec(self) -> Vec<Candidate> {
        self.candidates
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Insert `candidate`, maintaining descending-score order. Rejects it if
    /// a better-scoring candidate already occupies an overlapping range;
    /// otherwise inserts and evicts at most one worse, now-overlapping
    /// neighbor.
    pub fn insert(&mut self, candidate: Candidate) {
        let pos = self
            .candidates
            .partition_point(|c| c.score >= candidate.score);

        if self.candidates[..pos].iter().any(|c| c.overlaps(&candidate)) {
            return;
        }

        self.candidates.insert(pos, candidate);
        if let Some(evict_at) = self.candidates[pos + 1..]
            .iter()
            .position(|c| c.overlaps(&self.candidates[pos]))
        {
            self.candidates.remove(pos + 1 + evict_at);
        }

        if self.candidates.len() > self.capacity {
            self.candidates.pop();
        }
    }
}

/// Producer/consumer scoring pipeline (spec §4.3 "Scorer/scorer-consumer
/// concurrency"): a bounded `crossbeam_channel` stands in for the original's
/// hand-rolled SPSC ring buffer, per the §9 design note sanctioning "any
/// runtime that provides such a primitive".
pub fn score_forest(forest: &ShardedForest, seq: &[Symbol], counts: &[u64], params: ScoreParams) -> Vec<Candidate> {
    const RING_CAPACITY: usize = 65_536;
    let (tx, rx) = crossbeam_channel::bounded::<(Vec<Symbol>, u32, usize)>(RING_CAPACITY);

    crossbeam_utils::thread::scope(|scope| {
        scope.spawn(move |_| {
            for shard in &forest.shards {
                for (id, node) in shard.nodes() {
                    if id == crate::tree::ROOT || node.instances < 2 {
                        continue;
                    }
                    let string = shard.string_of(seq, id as NodeId);
                    if tx.send((string, node.instances, node.last_match_index)).is_err() {
                        return;
                    }
                }
            }
        });

        let mut top_k = TopKList::new(params.max_scores);
        let mut scored = 0usize;
        while let Ok((symbols, instances, occurrence_start)) = rx.recv() {
            let preceding = occurrence_start.checked_sub(1).and_then(|i| seq.get(i)).copied();
            let following = seq.get(occurrence_start + symbols.len()).copied();
            if let Some(candidate) = score_node(&symbols, instances, occurrence_start, preceding, following, counts, &params) {
                top_k.insert(candidate);
                scored += 1;
            }
        }
        debug!(scored, kept = top_k.len(), "scoring pass complete");
        top_k.into_vec()
    })
    .unwrap()
}
