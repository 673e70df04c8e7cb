use crate::error::Result;
use crate::rule::Rule;
use crate::sequence::Sequence;

/// The contract both engines satisfy: "sequence -> residual + rules".
///
/// Implementors of `compress` rewrite `sequence` in place to the residual
/// and return the production rules needed to expand it back to the
/// original. The two families (pair-replacement, longest-string) share no
/// implementation code; they are two independent instances of this trait.
pub trait GrammarCompressor {
    fn compress(&mut self, sequence: &mut Sequence) -> Result<Vec<Rule>>;
}
