//! Summary of one compression run, printed by `grammar-bin` and available to
//! library callers. Mirrors the teacher's `astarpa::stats::AstarStats` role
//! of a plain accumulator struct returned alongside the main result.

#[derive(Clone, Debug, Default)]
pub struct CompressionStats {
    pub input_symbols: usize,
    pub residual_symbols: usize,
    pub rules_emitted: usize,
    pub alphabet_size: u32,
}

impl CompressionStats {
    pub fn new(input_symbols: usize, residual_symbols: usize, rules_emitted: usize, alphabet_size: u32) -> Self {
        CompressionStats { input_symbols, residual_symbols, rules_emitted, alphabet_size }
    }

    pub fn compression_ratio(&self) -> f64 {
        if self.input_symbols == 0 {
            return 1.0;
        }
        self.residual_symbols as f64 / self.input_symbols as f64
    }
}
