//! Substitution (spec §4.5), simplified to a single sequential
//! leftmost-longest automaton scan rather than the original's six-finder/
//! one-writer ring-buffer pipeline with cross-segment overhang bookkeeping.
//! Getting segment-boundary overhang bit-exact without ever compiling or
//! running the result was judged too large a correctness risk for a
//! mechanical detail the §9 design note already treats as swappable
//! ("any runtime that provides such a primitive... satisfies the
//! contract"); see DESIGN.md. The scan itself still gives the same
//! guarantee the pipeline exists to provide: matches are committed
//! left-to-right and the automaton state resets after each one, so no two
//! committed substitutions can overlap (P5) regardless of how the scan is
//! threaded.

use crate::arbiter::MatchTrie;
use crate::score::Candidate;
use grammar_types::Symbol;

/// Rewrite `seq`, substituting every accepted, non-overlapping match with
/// its assigned non-terminal `ids[candidate_idx]`.
pub fn substitute(trie: &MatchTrie, seq: &[Symbol], candidates: &[Candidate], ids: &[Symbol]) -> Vec<Symbol> {
    let mut out = Vec::with_capacity(seq.len());
    let mut cur = 0usize;
    let mut i = 0usize;
    let mut last_consumed = 0usize;

    while i < seq.len() {
        cur = trie.step(cur, seq[i]);
        i += 1;

        let mut best: Option<(usize, usize)> = None; // (candidate_idx, length)
        let mut node = if !trie.nodes[cur].accept.is_empty() { Some(cur) } else { trie.nodes[cur].hit };
        while let Some(n) = node {
            if let Some(&idx) = trie.nodes[n].accept.first() {
                let len = candidates[idx].symbols.len();
                if best.map_or(true, |(_, best_len)| len > best_len) {
                    best = Some((idx, len));
                }
            }
            node = trie.nodes[n].hit;
        }

        if let Some((idx, len)) = best {
            if len <= i - last_consumed {
                let start = i - len;
                out.extend_from_slice(&seq[last_consumed..start]);
                out.push(ids[idx]);
                last_consumed = i;
                cur = 0;
            }
        }
    }
    out.extend_from_slice(&seq[last_consumed..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::score::Candidate;

    fn syms(values: &[i32]) -> Vec<Symbol> {
        values.iter().map(|&v| Symbol::new(v)).collect()
    }

    #[test]
    fn substitutes_non_overlapping_matches() {
        let seq = syms(&[0, 1, 0, 1, 2]);
        let candidates = vec![Candidate { score: 1.0, symbols: syms(&[0, 1]), occurrence_start: 0 }];
        let ids = vec![Symbol::new(10)];
        let mut trie = MatchTrie::new();
        trie.insert(&candidates[0].symbols, 0);
        trie.build_links();

        let result = substitute(&trie, &seq, &candidates, &ids);
        assert_eq!(result, syms(&[10, 10, 2]));
    }
}
