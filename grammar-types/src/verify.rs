//! Grammar expansion used by tests to check the round-trip property (P1).
//!
//! This is not a decoder: the spec treats decompression as a separate
//! concern outside the core. It exists only so the engine crates can assert
//! `expand(residual, rules) == original` in their test suites.

use crate::rule::Rule;
use crate::symbol::Symbol;
use rustc_hash::FxHashMap as HashMap;

pub fn expand(residual: &[Symbol], rules: &[Rule], alphabet_size: u32) -> Vec<Symbol> {
    let by_lhs: HashMap<i32, &Rule> = rules.iter().map(|r| (r.lhs.value(), r)).collect();

    let mut out = Vec::new();
    let mut stack = Vec::new();
    for &s in residual.iter().rev() {
        stack.push(s);
    }
    while let Some(sym) = stack.pop() {
        if (sym.value() as u32) < alphabet_size {
            out.push(sym);
        } else if let Some(rule) = by_lhs.get(&sym.value()) {
            for &rhs_sym in rule.rhs.iter().rev() {
                stack.push(rhs_sym);
            }
        } else {
            debug_assert!(false, "dangling non-terminal reference: {sym:?}");
        }
    }
    out
}
