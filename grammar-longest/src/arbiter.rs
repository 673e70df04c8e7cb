//! Overlap arbiter and Aho-Corasick-style match automaton (spec §4.4).
//!
//! The trie fans out through an ordinary hash map per node rather than the
//! radix-16 nibble chain of the original — the same §9 sanctioned
//! simplification used by the suffix tree.

use crate::score::Candidate;
use grammar_types::Symbol;
use rustc_hash::FxHashMap as HashMap;
use std::collections::VecDeque;

pub struct TrieNode {
    pub children: HashMap<Symbol, usize>,
    /// Candidate indices accepting exactly at this node (normally at most
    /// one; more than one means two candidates share identical strings).
    pub accept: Vec<usize>,
    pub miss: Option<usize>,
    pub hit: Option<usize>,
}

pub struct MatchTrie {
    pub nodes: Vec<TrieNode>,
}

impl MatchTrie {
    pub fn new() -> Self {
        MatchTrie { nodes: vec![TrieNode { children: HashMap::default(), accept: Vec::new(), miss: None, hit: None }] }
    }

    pub(crate) fn insert(&mut self, symbols: &[Symbol], candidate_idx: usize) {
        let mut cur = 0;
        for &s in symbols {
            cur = match self.nodes[cur].children.get(&s) {
                Some(&n) => n,
                None => {
                    self.nodes.push(TrieNode { children: HashMap::default(), accept: Vec::new(), miss: None, hit: None });
                    let n = self.nodes.len() - 1;
                    self.nodes[cur].children.insert(s, n);
                    n
                }
            };
        }
        self.nodes[cur].accept.push(candidate_idx);
    }

    /// Nodes visited walking `symbols` from the root as far as exact edges
    /// exist (used by pass 1's substring check, not automaton matching).
    fn walk_exact(&self, symbols: &[Symbol]) -> Vec<usize> {
        let mut cur = 0;
        let mut visited = Vec::with_capacity(symbols.len());
        for &s in symbols {
            match self.nodes[cur].children.get(&s) {
                Some(&n) => {
                    cur = n;
                    visited.push(cur);
                }
                None => break,
            }
        }
        visited
    }

    /// Standard Aho-Corasick failure-link construction (spec §4.4 pass 2).
    pub(crate) fn build_links(&mut self) {
        let mut queue = VecDeque::new();
        let root_children: Vec<usize> = self.nodes[0].children.values().copied().collect();
        for &n in &root_children {
            self.nodes[n].miss = Some(0);
            self.nodes[n].hit = None;
            queue.push_back(n);
        }
        while let Some(u) = queue.pop_front() {
            let children: Vec<(Symbol, usize)> = self.nodes[u].children.iter().map(|(&s, &n)| (s, n)).collect();
            for (sym, v) in children {
                let mut m = self.nodes[u].miss.unwrap_or(0);
                let miss_target = loop {
                    if let Some(&mc) = self.nodes[m].children.get(&sym) {
                        if mc != v {
                            break mc;
                        }
                    }
                    if m == 0 {
                        break 0;
                    }
                    m = self.nodes[m].miss.unwrap_or(0);
                };
                self.nodes[v].miss = Some(miss_target);
                self.nodes[v].hit = if !self.nodes[miss_target].accept.is_empty() {
                    Some(miss_target)
                } else {
                    self.nodes[miss_target].hit
                };
                queue.push_back(v);
            }
        }
    }

    pub(crate) fn step(&self, mut cur: usize, sym: Symbol) -> usize {
        loop {
            if let Some(&n) = self.nodes[cur].children.get(&sym) {
                return n;
            }
            if cur == 0 {
                return 0;
            }
            cur = self.nodes[cur].miss.unwrap_or(0);
        }
    }
}

/// Pass 1: mark candidates that are a substring (anywhere, not just a
/// suffix) of a higher-ranked candidate. Rank is the candidate's index in
/// `candidates` (already score-sorted descending, so index 0 is best);
/// "higher score-number" in the spec is the larger index here.
fn invalidate_substrings(trie: &MatchTrie, candidates: &[Candidate]) -> Vec<bool> {
    let mut invalid = vec![false; candidates.len()];
    for (i, candidate) in candidates.iter().enumerate() {
        for k in 0..candidate.symbols.len() {
            for node_id in trie.walk_exact(&candidate.symbols[k..]) {
                for &j in &trie.nodes[node_id].accept {
                    if j == i {
                        continue;
                    }
                    if i < j {
                        invalid[j] = true;
                    } else {
                        invalid[i] = true;
                    }
                }
            }
        }
    }
    invalid
}

/// One accepting match found while scanning the sequence.
#[derive(Clone, Copy, Debug)]
pub struct Match {
    pub start: usize,
    pub len: usize,
    pub candidate_idx: usize,
}

/// Pass 3: scan one chunk of the sequence through the automaton, returning
/// every accepting match (including those reached via the `hit` chain, so a
/// shorter candidate nested at the same end position is also reported).
fn scan_chunk(trie: &MatchTrie, seq: &[Symbol], candidates: &[Candidate]) -> Vec<Match> {
    let mut matches = Vec::new();
    let mut cur = 0usize;
    for (i, &sym) in seq.iter().enumerate() {
        cur = trie.step(cur, sym);
        let mut accept_node = if !trie.nodes[cur].accept.is_empty() { Some(cur) } else { trie.nodes[cur].hit };
        while let Some(node) = accept_node {
            for &idx in &trie.nodes[node].accept {
                let len = candidates[idx].symbols.len();
                if i + 1 >= len {
                    matches.push(Match { start: i + 1 - len, len, candidate_idx: idx });
                }
            }
            accept_node = trie.nodes[node].hit;
        }
    }
    matches
}

/// Parallel chunked scan (spec §4.4 pass 3), splitting the sequence into
/// `num_chunks` overlapping pieces so no match is missed across a boundary.
fn scan_parallel(trie: &MatchTrie, seq: &[Symbol], candidates: &[Candidate], num_chunks: usize, overlap: usize) -> Vec<Match> {
    if seq.is_empty() {
        return Vec::new();
    }
    let num_chunks = num_chunks.max(1).min(seq.len());
    let chunk_size = (seq.len() + num_chunks - 1) / num_chunks;

    let results: Vec<Vec<Match>> = crossbeam_utils::thread::scope(|scope| {
        let mut handles = Vec::new();
        for c in 0..num_chunks {
            let start = c * chunk_size;
            if start >= seq.len() {
                break;
            }
            let end = (start + chunk_size + overlap).min(seq.len());
            let slice = &seq[start..end];
            handles.push(scope.spawn(move |_| {
                let mut local = scan_chunk(trie, slice, candidates);
                for m in &mut local {
                    m.start += start;
                }
                local
            }));
        }
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    })
    .unwrap();

    results.into_iter().flatten().collect()
}

/// Sweep all accepting matches left to right, invalidating any candidate
/// that loses a positional collision to a better-ranked one (spec §4.4
/// pass 3's invalidation rule, applied globally rather than per-worker
/// sliding window — see DESIGN.md).
fn resolve_overlaps(mut matches: Vec<Match>, num_candidates: usize) -> Vec<bool> {
    matches.sort_by_key(|m| m.start);
    let mut invalid = vec![false; num_candidates];
    let mut accepted: Vec<Match> = Vec::new();

    for m in matches {
        if invalid[m.candidate_idx] {
            continue;
        }
        let end = m.start + m.len;
        let mut beaten_by_better = false;
        let mut self_overlap = false;
        let mut losers = Vec::new();
        for (ai, a) in accepted.iter().enumerate() {
            let a_end = a.start + a.len;
            if a.start < end && m.start < a_end {
                if a.candidate_idx == m.candidate_idx {
                    // Two occurrences of the same candidate overlapping each
                    // other (possible when the full-sequence scan finds more
                    // occurrences than the build-window suffix tree did):
                    // skip this occurrence, the candidate itself is fine.
                    self_overlap = true;
                } else if a.candidate_idx < m.candidate_idx {
                    beaten_by_better = true;
                } else {
                    invalid[a.candidate_idx] = true;
                    losers.push(ai);
                }
            }
        }
        if self_overlap {
            continue;
        }
        if beaten_by_better {
            invalid[m.candidate_idx] = true;
            continue;
        }
        for ai in losers.into_iter().rev() {
            accepted.remove(ai);
        }
        accepted.push(m);
    }
    invalid
}

/// Run all four passes of spec §4.4, returning the still-valid candidates
/// (in their original score-rank order) together with a freshly rebuilt
/// trie keyed by their *new* positions in that returned vector.
pub fn arbitrate(candidates: Vec<Candidate>, seq: &[Symbol], num_chunks: usize, max_string_length: usize) -> (Vec<Candidate>, MatchTrie) {
    let mut trie = MatchTrie::new();
    for (i, c) in candidates.iter().enumerate() {
        trie.insert(&c.symbols, i);
    }

    let mut invalid = invalidate_substrings(&trie, &candidates);

    let mut scan_trie = MatchTrie::new();
    for (i, c) in candidates.iter().enumerate() {
        if !invalid[i] {
            scan_trie.insert(&c.symbols, i);
        }
    }
    scan_trie.build_links();

    let matches = scan_parallel(&scan_trie, seq, &candidates, num_chunks, max_string_length);
    let pass3_invalid = resolve_overlaps(matches, candidates.len());
    for (i, bad) in pass3_invalid.into_iter().enumerate() {
        if bad {
            invalid[i] = true;
        }
    }

    let survivors: Vec<Candidate> = candidates
        .into_iter()
        .enumerate()
        .filter(|(i, _)| !invalid[*i])
        .map(|(_, c)| c)
        .collect();

    let mut rebuilt = MatchTrie::new();
    for (i, c) in survivors.iter().enumerate() {
        rebuilt.insert(&c.symbols, i);
    }
    rebuilt.build_links();

    (survivors, rebuilt)
}
