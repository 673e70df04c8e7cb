//! The error taxonomy shared by both compression engines.
//!
//! `CapacityExceeded` is deliberately *not* treated as fatal by callers: the
//! suffix-tree builder and match trie construct it but the scorer is allowed
//! to proceed with a partially built structure (accepted quality
//! degradation, not a failure).

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum GrammarError {
    #[error("configuration error: {reason}")]
    ConfigurationError { reason: String },

    #[error("resource error: failed to allocate {requested_bytes} bytes")]
    ResourceError { requested_bytes: usize },

    #[error("io error on {path}: {source}")]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("capacity exceeded in {component}: {detail}")]
    CapacityExceeded { component: &'static str, detail: String },

    #[error("invariant violation in {component}: {detail}")]
    InvariantViolation { component: &'static str, detail: String },
}

pub type Result<T> = std::result::Result<T, GrammarError>;
