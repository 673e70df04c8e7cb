use crate::link::{Link, LinkTable, Prev};
use crate::priority_queue::PriorityQueue;
use crate::record::{PairRecord, RecordId, RecordStore};
use grammar_types::Pair;
use rustc_hash::FxHashMap as HashMap;

/// The hash of pairs + priority structure + threaded occurrence lists of
/// spec §3/§4.1, combined into one type because every mutation
/// (insert/remove an occurrence) must keep all three in lock-step.
pub struct DigramIndex {
    hash: HashMap<Pair, RecordId>,
    records: RecordStore,
    links: LinkTable,
    queue: PriorityQueue,
}

impl DigramIndex {
    pub fn new(physical_len: usize) -> Self {
        DigramIndex {
            hash: HashMap::default(),
            records: RecordStore::default(),
            links: LinkTable::new(physical_len),
            queue: PriorityQueue::new(),
        }
    }

    pub fn record(&self, id: RecordId) -> &PairRecord {
        &self.records[id]
    }

    pub fn link(&self, pos: usize) -> Link {
        self.links.get(pos)
    }

    pub fn lookup(&self, pair: Pair) -> Option<RecordId> {
        self.hash.get(&pair).copied()
    }

    pub fn extract_max(&mut self) -> Option<RecordId> {
        self.queue.extract_max()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn purge(&mut self) {
        self.queue.purge();
    }

    /// Prepend a fresh occurrence of `pair` at position `pos`, creating the
    /// record if this is the first time `pair` has been seen. Returns the
    /// record id.
    pub fn insert_occurrence(&mut self, pair: Pair, pos: usize) -> RecordId {
        let id = *self
            .hash
            .entry(pair)
            .or_insert_with(|| self.records.insert(PairRecord { pair, freq: 0, head: None }));

        let record = &mut self.records[id];
        let old_freq = record.freq;
        let old_head = record.head;

        self.links.set(pos, Link { prev: Prev::Head(id), next: old_head });
        if let Some(h) = old_head {
            self.links.set_prev(h, Prev::Interior(pos));
        }

        let record = &mut self.records[id];
        record.head = Some(pos);
        record.freq = old_freq + 1;
        let new_freq = record.freq;

        self.queue.reindex(id, old_freq, new_freq);
        id
    }

    /// Structural removal of `pos` from `id`'s occurrence list, with no
    /// change to `freq`. Used for the adjacent-occurrence collapse case
    /// (§4.1 edge case), where `id` is the record currently being replaced
    /// and its own frequency bookkeeping is handled by the replace loop,
    /// not by this unlink.
    pub fn unlink_position(&mut self, id: RecordId, pos: usize) {
        let link = self.links.get(pos);
        match link.prev {
            Prev::Head(owner) => {
                debug_assert_eq!(owner, id);
                self.records[id].head = link.next;
            }
            Prev::Interior(prev_pos) => {
                self.links.set_next(prev_pos, link.next);
            }
            Prev::Unlinked => {
                debug_assert!(false, "unlink_position on an already-unlinked cell");
            }
        }
        if let Some(next_pos) = link.next {
            self.links.set_prev(next_pos, link.prev);
        }
        self.links.set(pos, Link { prev: Prev::Unlinked, next: None });
    }

    /// Remove occurrence `pos` of pair `id` and decrement its frequency.
    pub fn remove_occurrence(&mut self, id: RecordId, pos: usize) {
        let old_freq = self.records[id].freq;
        self.unlink_position(id, pos);
        self.records[id].freq = old_freq - 1;
        self.queue.reindex(id, old_freq, old_freq - 1);
    }

    /// True if `pos` is still a live member of some occurrence list (not
    /// already unlinked by an earlier step of the same replacement round).
    pub fn is_linked(&self, pos: usize) -> bool {
        self.links.get(pos).prev != Prev::Unlinked
    }

    /// Permanently retire `id`: this exact pair identity is gone from the
    /// sequence (every occurrence has been replaced).
    pub fn remove_record(&mut self, id: RecordId) {
        let record = self.records.remove(id);
        if let Some(record) = record {
            self.hash.remove(&record.pair);
        }
    }

    pub fn rebuild_links(&mut self, links: Vec<Link>) {
        self.links.replace(links);
    }

    pub fn remap_heads(&mut self, remap: &[usize]) {
        for (_, record) in self.records.iter_mut() {
            if let Some(h) = record.head {
                record.head = Some(remap[h]);
            }
        }
    }
}
