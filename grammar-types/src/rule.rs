use crate::symbol::Symbol;

/// One entry of the append-only production table: `lhs -> rhs`.
///
/// `lhs` is always a non-terminal whose id is `alphabet_size +
/// definitions_so_far` at the time the rule was appended. `rhs` has length 2
/// for every rule produced by the pair-replacement engine, and length `k`
/// (the matched string's symbol count) for the longest-string engine.
#[derive(Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rule {
    pub lhs: Symbol,
    pub rhs: Vec<Symbol>,
}

impl Rule {
    pub fn new(lhs: Symbol, rhs: Vec<Symbol>) -> Self {
        Rule { lhs, rhs }
    }

    pub fn pair(lhs: Symbol, a: Symbol, b: Symbol) -> Self {
        Rule { lhs, rhs: vec![a, b] }
    }
}

/// Append-only production table. Each new non-terminal's identifier is
/// `alphabet_size + definitions.len()` at the moment it is appended.
#[derive(Clone, Debug, Default)]
pub struct ProductionTable {
    alphabet_size: u32,
    rules: Vec<Rule>,
}

impl ProductionTable {
    pub fn new(alphabet_size: u32) -> Self {
        ProductionTable { alphabet_size, rules: Vec::new() }
    }

    /// The id the next rule appended via `push_rhs` will receive.
    pub fn next_id(&self) -> Symbol {
        Symbol::new(self.alphabet_size as i32 + self.rules.len() as i32)
    }

    pub fn push_rhs(&mut self, rhs: Vec<Symbol>) -> Symbol {
        let lhs = self.next_id();
        self.rules.push(Rule::new(lhs, rhs));
        lhs
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn into_rules(self) -> Vec<Rule> {
        self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
