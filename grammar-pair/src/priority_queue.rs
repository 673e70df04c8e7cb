use crate::record::RecordId;
use std::collections::VecDeque;

/// The frequency-bucketed priority structure `H` of spec §3: `extractMax`,
/// `incFreq`/`decFreq` (folded into `reindex`), and `purge`. Ties within a
/// bucket are broken by first-insertion order (FIFO within each bucket),
/// matching the spec's explicit tie-break rule.
///
/// Records with frequency below 2 are never inserted (the spec's "purged"
/// records): `reindex` only touches a bucket when the old or new frequency
/// is `>= 2`, so `purge` itself only needs to exist as an explicit,
/// nameable operation -- buckets 0 and 1 are an invariant-checked no-op by
/// construction.
#[derive(Debug, Default)]
pub struct PriorityQueue {
    buckets: Vec<VecDeque<RecordId>>,
    max_bucket: usize,
}

const MIN_INDEXED_FREQ: usize = 2;

impl PriorityQueue {
    pub fn new() -> Self {
        PriorityQueue { buckets: Vec::new(), max_bucket: 0 }
    }

    fn ensure_bucket(&mut self, freq: usize) {
        if self.buckets.len() <= freq {
            self.buckets.resize_with(freq + 1, VecDeque::new);
        }
    }

    fn push(&mut self, id: RecordId, freq: usize) {
        self.ensure_bucket(freq);
        self.buckets[freq].push_back(id);
        self.max_bucket = self.max_bucket.max(freq);
    }

    fn remove(&mut self, id: RecordId, freq: usize) {
        if let Some(bucket) = self.buckets.get_mut(freq) {
            if let Some(pos) = bucket.iter().position(|&x| x == id) {
                bucket.remove(pos);
            }
        }
    }

    /// Move `id` from `old_freq` to `new_freq`, inserting/removing at the
    /// boundary of `MIN_INDEXED_FREQ` as needed. Either side may already be
    /// unindexed (freq < 2); this is the common case for a freshly created
    /// record (`old_freq == 0`) or a neighbor pair that just lost its last
    /// occurrence (`new_freq == 0`).
    pub fn reindex(&mut self, id: RecordId, old_freq: usize, new_freq: usize) {
        if old_freq >= MIN_INDEXED_FREQ {
            self.remove(id, old_freq);
        }
        if new_freq >= MIN_INDEXED_FREQ {
            self.push(id, new_freq);
        }
    }

    pub fn extract_max(&mut self) -> Option<RecordId> {
        while self.max_bucket >= MIN_INDEXED_FREQ {
            if let Some(id) = self.buckets[self.max_bucket].pop_front() {
                return Some(id);
            }
            self.max_bucket -= 1;
        }
        None
    }

    pub fn is_empty(&self) -> bool {
        (MIN_INDEXED_FREQ..self.buckets.len()).all(|f| self.buckets[f].is_empty())
    }

    /// Drop everything below frequency 2. A no-op under our indexing
    /// discipline; kept as a named, assertable operation so the structure's
    /// public surface matches the spec's `H` contract.
    pub fn purge(&mut self) {
        for freq in 0..MIN_INDEXED_FREQ.min(self.buckets.len()) {
            debug_assert!(self.buckets[freq].is_empty());
            self.buckets[freq].clear();
        }
    }
}
