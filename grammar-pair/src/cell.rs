use grammar_types::Symbol;

/// One slot of the packed sequence `C`. A gap stores the index of the next
/// live position (or `u`, the physical span, as a sentinel meaning "past the
/// end"), matching the `-value-1` encoding of spec §3 without the sign
/// trick: `Cell` is an explicit sum type instead of overloading the sign bit
/// of a raw integer (see the design note on threaded linked lists).
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Cell {
    Live(Symbol),
    Gap(usize),
}

/// The packed sequence `C`, together with its live/physical size split
/// (`c`/`u` in spec §3). Positions `>= c` after a `compact()` do not exist;
/// positions between 0 and the physical length may be gaps.
#[derive(Clone, Debug)]
pub struct PackedSequence {
    cells: Vec<Cell>,
    c: usize,
}

impl PackedSequence {
    pub fn from_symbols(symbols: Vec<Symbol>) -> Self {
        let c = symbols.len();
        PackedSequence { cells: symbols.into_iter().map(Cell::Live).collect(), c }
    }

    /// Physical span: `u` in spec §3.
    #[inline]
    pub fn u(&self) -> usize {
        self.cells.len()
    }

    /// Live count: `c` in spec §3.
    #[inline]
    pub fn c(&self) -> usize {
        self.c
    }

    #[inline]
    pub fn decrement_live(&mut self) {
        self.c -= 1;
    }

    #[inline]
    pub fn cell(&self, pos: usize) -> Cell {
        self.cells[pos]
    }

    /// Panics (in debug builds) if `pos` does not hold a live symbol: callers
    /// only ever invoke this on positions they've resolved through
    /// `live_at_or_after`.
    #[inline]
    pub fn get_live(&self, pos: usize) -> Symbol {
        match self.cells[pos] {
            Cell::Live(s) => s,
            Cell::Gap(_) => {
                debug_assert!(false, "get_live on a gap cell at {pos}");
                Symbol::new(0)
            }
        }
    }

    #[inline]
    pub fn set_live(&mut self, pos: usize, symbol: Symbol) {
        self.cells[pos] = Cell::Live(symbol);
    }

    #[inline]
    pub fn set_gap(&mut self, pos: usize, target: usize) {
        self.cells[pos] = Cell::Gap(target);
    }

    /// Position `pos` if live, otherwise the position its gap link targets.
    /// Gap links never chain (P3): a single hop always lands on a live cell
    /// or the `u` sentinel.
    #[inline]
    pub fn live_at_or_after(&self, pos: usize) -> usize {
        match self.cells[pos] {
            Cell::Live(_) => pos,
            Cell::Gap(target) => target,
        }
    }

    /// The live position immediately before `pos`, handling the
    /// adjacent-occurrence collapse edge case (§4.1): if the gap at
    /// `pos - 1` points back at `pos` itself, the real predecessor is two
    /// cells further back.
    #[inline]
    pub fn live_prev_adjacent(&self, pos: usize) -> usize {
        debug_assert!(pos > 0);
        match self.cells[pos - 1] {
            Cell::Live(_) => pos - 1,
            Cell::Gap(target) => {
                if target == pos {
                    pos - 2
                } else {
                    target
                }
            }
        }
    }

    /// Iterate live symbols left to right, following gap links.
    pub fn iter_live(&self) -> impl Iterator<Item = Symbol> + '_ {
        let mut i = 0;
        std::iter::from_fn(move || {
            if i >= self.cells.len() {
                return None;
            }
            let sym = self.get_live(i);
            i += 1;
            if i < self.cells.len() {
                if let Cell::Gap(target) = self.cells[i] {
                    i = target;
                }
            }
            Some(sym)
        })
    }

    pub fn replace(&mut self, cells: Vec<Cell>) {
        self.c = cells.len();
        self.cells = cells;
    }
}
