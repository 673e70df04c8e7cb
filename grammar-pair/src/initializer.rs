use grammar_types::Symbol;

/// The result of mapping a byte alphabet to a dense terminal range (spec
/// §2.1 "Initializer"). `alphabet` maps a dense terminal id back to its
/// original byte, supplementing spec.md per SPEC_FULL.md so the mapping can
/// be emitted alongside the rules and residual for a byte-exact round trip.
pub struct AlphabetMap {
    /// `alphabet[terminal_id as usize] == original_byte`.
    pub alphabet: Vec<u8>,
}

impl AlphabetMap {
    pub fn decode(&self, symbol: Symbol) -> Option<u8> {
        self.alphabet.get(symbol.value() as usize).copied()
    }
}

/// Maps each distinct byte in `bytes` to a dense id in first-occurrence
/// order, mirroring `repair.c`'s `prepare()`.
pub fn map_bytes(bytes: &[u8]) -> (Vec<Symbol>, AlphabetMap) {
    let mut chars = [None; 256];
    let mut alphabet = Vec::new();
    let mut symbols = Vec::with_capacity(bytes.len());
    for &byte in bytes {
        let id = *chars[byte as usize].get_or_insert_with(|| {
            alphabet.push(byte);
            (alphabet.len() - 1) as i32
        });
        symbols.push(Symbol::new(id));
    }
    (symbols, AlphabetMap { alphabet })
}
