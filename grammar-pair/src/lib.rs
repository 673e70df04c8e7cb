//! The pair-replacement (Re-Pair family) grammar compression engine (spec
//! §4.1): a packed sequence with threaded occurrence lists, a hash of
//! digrams, and a frequency-bucketed priority queue driving iterative
//! maximum-frequency digram replacement to a straight-line grammar.

mod cell;
mod digram_index;
mod engine;
mod initializer;
mod link;
mod priority_queue;
mod record;

pub use engine::{PairEngine, PairEngineConfig};
pub use initializer::{map_bytes, AlphabetMap};
