use crate::cell::{Cell, PackedSequence};
use crate::digram_index::DigramIndex;
use crate::link::{Link, Prev};
use grammar_types::{GrammarCompressor, Pair, ProductionTable, Result, Rule, Sequence};
use tracing::{debug, info, instrument};

/// Tunables for the pair-replacement engine (spec §4.1).
#[derive(Clone, Copy, Debug)]
pub struct PairEngineConfig {
    /// Compaction trigger: rewrite `C`/`L` once `c < factor * u`. Default
    /// 0.75, matching `repair.c`'s `factor`.
    pub factor: f32,
}

impl Default for PairEngineConfig {
    fn default() -> Self {
        PairEngineConfig { factor: 0.75 }
    }
}

/// The Re-Pair family engine: maximum-frequency digram replacement over a
/// packed sequence with threaded occurrence lists (spec §4.1).
pub struct PairEngine {
    alphabet_size: u32,
    config: PairEngineConfig,
}

impl PairEngine {
    pub fn new(alphabet_size: u32, config: PairEngineConfig) -> Self {
        PairEngine { alphabet_size, config }
    }
}

impl GrammarCompressor for PairEngine {
    #[instrument(skip_all, fields(alphabet_size = self.alphabet_size))]
    fn compress(&mut self, sequence: &mut Sequence) -> Result<Vec<Rule>> {
        let symbols = std::mem::take(sequence).into_vec();
        let mut cells = PackedSequence::from_symbols(symbols);
        let mut index = DigramIndex::new(cells.u());
        let mut table = ProductionTable::new(self.alphabet_size);

        for i in 0..cells.c().saturating_sub(1) {
            let pair = Pair::new(cells.get_live(i), cells.get_live(i + 1));
            index.insert_occurrence(pair, i);
        }
        index.purge();

        let mut rounds = 0usize;
        while let Some(oid) = index.extract_max() {
            rounds += 1;
            let chosen_pair = index.record(oid).pair;
            let e = table.next_id();

            while let Some(cpos) = index.record(oid).head {
                let sgte = cells.live_at_or_after(cpos + 1);
                let ssgte =
                    if sgte + 1 < cells.u() { Some(cells.live_at_or_after(sgte + 1)) } else { None };

                let b = cells.get_live(cpos);
                index.unlink_position(oid, cpos);

                if let Some(ss) = ssgte {
                    let c_sym = cells.get_live(sgte);
                    let d_sym = cells.get_live(ss);
                    if let Some(id_cd) = index.lookup(Pair::new(c_sym, d_sym)) {
                        if index.is_linked(sgte) {
                            if id_cd != oid {
                                index.remove_occurrence(id_cd, sgte);
                            } else {
                                index.unlink_position(id_cd, sgte);
                            }
                        }
                    }
                    index.insert_occurrence(Pair::new(e, d_sym), cpos);
                }

                if cpos != 0 {
                    let ant = cells.live_prev_adjacent(cpos);
                    let a_sym = cells.get_live(ant);
                    if let Some(id_ab) = index.lookup(Pair::new(a_sym, b)) {
                        if index.is_linked(ant) {
                            if id_ab != oid {
                                index.remove_occurrence(id_ab, ant);
                            } else {
                                index.unlink_position(id_ab, ant);
                            }
                        }
                    }
                    index.insert_occurrence(Pair::new(a_sym, e), ant);
                }

                cells.set_live(cpos, e);
                if let Some(ss) = ssgte {
                    cells.set_gap(ss - 1, cpos);
                }
                cells.set_gap(cpos + 1, ssgte.unwrap_or_else(|| cells.u()));
                cells.decrement_live();
            }

            index.remove_record(oid);
            table.push_rhs(vec![chosen_pair.left, chosen_pair.right]);
            index.purge();

            if (cells.c() as f32) < self.config.factor * cells.u() as f32 {
                compact(&mut cells, &mut index);
            }
            debug!(rule = %e, pair.left = %chosen_pair.left, pair.right = %chosen_pair.right, live = cells.c(), "replaced digram");
        }

        *sequence = Sequence::new(cells.iter_live().collect());
        info!(rounds, rules = table.len(), residual = sequence.len(), "pair engine terminated");
        Ok(table.into_rules())
    }
}

/// Rewrite `cells`/`links` contiguously, dropping gaps (spec §4.1
/// Compaction). Builds a fresh array rather than Re-Pair's in-place
/// self-referential trick, trading a temporary `O(u)` remap buffer for a
/// single linear, easily-checked pass (see §9 design note).
fn compact(cells: &mut PackedSequence, index: &mut DigramIndex) {
    let live = cells.c();
    let mut order = Vec::with_capacity(live);
    let mut i = 0;
    while order.len() < live {
        order.push(i);
        i += 1;
        if i < cells.u() {
            if let Cell::Gap(target) = cells.cell(i) {
                i = target;
            }
        }
    }

    let mut remap = vec![usize::MAX; cells.u()];
    for (new_pos, &old_pos) in order.iter().enumerate() {
        remap[old_pos] = new_pos;
    }

    let mut new_cells = Vec::with_capacity(live);
    let mut new_links = Vec::with_capacity(live);
    for &old_pos in &order {
        new_cells.push(cells.cell(old_pos));
        let old_link = index.link(old_pos);
        let new_prev = match old_link.prev {
            Prev::Head(id) => Prev::Head(id),
            Prev::Interior(p) => Prev::Interior(remap[p]),
            Prev::Unlinked => Prev::Unlinked,
        };
        let new_next = old_link.next.map(|p| remap[p]);
        new_links.push(Link { prev: new_prev, next: new_next });
    }

    index.remap_heads(&remap);
    index.rebuild_links(new_links);
    cells.replace(new_cells);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::initializer::map_bytes;
    use grammar_types::verify;

    fn run(bytes: &[u8]) -> (Vec<u8>, Vec<Rule>, Vec<u8>) {
        let (symbols, alphabet) = map_bytes(bytes);
        let alphabet_size = alphabet.alphabet.len() as u32;
        let mut sequence = Sequence::new(symbols);
        let mut engine = PairEngine::new(alphabet_size, PairEngineConfig::default());
        let rules = engine.compress(&mut sequence).unwrap();
        let expanded = verify::expand(sequence.as_slice(), &rules, alphabet_size);
        let decoded: Vec<u8> =
            expanded.into_iter().map(|s| alphabet.decode(s).unwrap()).collect();
        (alphabet.alphabet.clone(), rules, decoded)
    }

    #[test]
    fn empty_input_has_no_rules() {
        let (_, rules, decoded) = run(b"");
        assert!(rules.is_empty());
        assert!(decoded.is_empty());
    }

    #[test]
    fn repeated_byte_creates_a_rule_and_round_trips() {
        let (_, rules, decoded) = run(b"aaaaaaaa");
        assert!(!rules.is_empty());
        assert_eq!(decoded, b"aaaaaaaa");
    }

    #[test]
    fn abc_pattern_round_trips() {
        let (_, _rules, decoded) = run(b"abcabcabcabc");
        assert_eq!(decoded, b"abcabcabcabc");
    }

    #[test]
    fn mississippi_round_trips() {
        let (_, _rules, decoded) = run(b"mississippi");
        assert_eq!(decoded, b"mississippi");
    }

    #[test]
    fn single_symbol_has_no_pairs() {
        let (_, rules, decoded) = run(b"a");
        assert!(rules.is_empty());
        assert_eq!(decoded, b"a");
    }

    #[test]
    fn odd_run_leaves_one_terminal_behind() {
        // "aaaaa" -> one non-terminal covers 4 of the 5 a's non-overlapping.
        let (_, rules, decoded) = run(b"aaaaa");
        assert_eq!(decoded, b"aaaaa");
        assert!(rules.len() >= 1);
    }
}
