use std::fmt;

/// A symbol in the grammar: a non-negative value drawn either from the
/// mapped terminal alphabet `[0, alphabet_size)` or from the non-terminal
/// range `[alphabet_size, Nmax)` assigned to production rules.
///
/// Negative values are *not* representable here: they only ever occur as gap
/// links inside an engine's packed working array, never in a `Rule` or in
/// the residual sequence handed across the `GrammarCompressor` boundary.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Symbol(pub i32);

impl Symbol {
    #[inline]
    pub fn new(value: i32) -> Self {
        debug_assert!(value >= 0, "Symbol values must be non-negative: {value}");
        Symbol(value)
    }

    #[inline]
    pub fn value(self) -> i32 {
        self.0
    }

    #[inline]
    pub fn is_terminal(self, alphabet_size: u32) -> bool {
        (self.0 as u32) < alphabet_size
    }

    #[inline]
    pub fn is_non_terminal(self, alphabet_size: u32) -> bool {
        !self.is_terminal(alphabet_size)
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Symbol({})", self.0)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i32> for Symbol {
    fn from(value: i32) -> Self {
        Symbol::new(value)
    }
}

impl From<u32> for Symbol {
    fn from(value: u32) -> Self {
        Symbol::new(value as i32)
    }
}

/// An unordered-by-identity, ordered-by-adjacency pair of symbols: the unit
/// the pair-replacement engine indexes and replaces.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Pair {
    pub left: Symbol,
    pub right: Symbol,
}

impl Pair {
    pub fn new(left: Symbol, right: Symbol) -> Self {
        Pair { left, right }
    }
}
