mod arbiter;
mod engine;
mod score;
mod substitute;
mod tree;

pub use arbiter::{arbitrate, Match, MatchTrie};
pub use engine::{LongestEngine, LongestEngineConfig};
pub use score::{score_forest, Candidate, ScoreMode, ScoreParams, TopKList};
pub use substitute::substitute;
pub use tree::{build_parallel, Node, NodeId, ShardedForest, SuffixTree, ROOT};
