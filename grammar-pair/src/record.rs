use grammar_types::Pair;
use slotmap::{new_key_type, SlotMap};

new_key_type! {
    /// Stable identifier for a pair record, surviving removal of unrelated
    /// records (backed by `slotmap`, grounded on the same crate the
    /// `sequitur-rs` Re-Pair reimplementation uses for this exact
    /// bookkeeping problem).
    pub struct RecordId;
}

/// `{ pair, freq, cpos }` of spec §3: `head` is `cpos`, `None` meaning the
/// empty list (`-1`).
#[derive(Clone, Debug)]
pub struct PairRecord {
    pub pair: Pair,
    pub freq: usize,
    pub head: Option<usize>,
}

pub type RecordStore = SlotMap<RecordId, PairRecord>;
