//! Shared types for the grammar-based text compressor: the symbol
//! alphabet, the production table, the live sequence contract, the
//! `GrammarCompressor` trait, and the shared error taxonomy.

mod compressor;
mod error;
mod rule;
mod sequence;
mod symbol;
pub mod verify;

pub use compressor::GrammarCompressor;
pub use error::{GrammarError, Result};
pub use rule::{ProductionTable, Rule};
pub use sequence::Sequence;
pub use symbol::{Pair, Symbol};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symbol_terminal_classification() {
        let alphabet_size = 4;
        assert!(Symbol::new(0).is_terminal(alphabet_size));
        assert!(Symbol::new(3).is_terminal(alphabet_size));
        assert!(!Symbol::new(4).is_terminal(alphabet_size));
        assert!(Symbol::new(4).is_non_terminal(alphabet_size));
    }

    #[test]
    fn production_table_assigns_ids_after_alphabet() {
        let mut table = ProductionTable::new(5);
        assert_eq!(table.next_id(), Symbol::new(5));
        let id0 = table.push_rhs(vec![Symbol::new(0), Symbol::new(1)]);
        assert_eq!(id0, Symbol::new(5));
        let id1 = table.push_rhs(vec![Symbol::new(2), Symbol::new(3)]);
        assert_eq!(id1, Symbol::new(6));
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn expand_round_trips_nested_rules() {
        // N0 -> (a,b), N1 -> (N0, c); residual = [N1, N1]
        let alphabet_size = 3; // a=0, b=1, c=2
        let rules = vec![
            Rule::pair(Symbol::new(3), Symbol::new(0), Symbol::new(1)),
            Rule::pair(Symbol::new(4), Symbol::new(3), Symbol::new(2)),
        ];
        let residual = vec![Symbol::new(4), Symbol::new(4)];
        let expanded = verify::expand(&residual, &rules, alphabet_size);
        let expanded: Vec<i32> = expanded.into_iter().map(Symbol::value).collect();
        assert_eq!(expanded, vec![0, 1, 2, 0, 1, 2]);
    }
}
