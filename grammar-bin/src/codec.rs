//! §6 wire format: byte/UTF-8 input mapping and the `INSERT_SYMBOL`/
//! `DEFINE_SYMBOL` marker codec for the output file.

use grammar_types::{Rule, Symbol};

pub const INSERT_SYMBOL: u8 = 0xFE;
pub const DEFINE_SYMBOL: u8 = 0xFF;

/// Bit 0 of the input file's leading byte: pre-processed cap-encoding.
pub fn is_cap_encoded(format_flag: u8) -> bool {
    format_flag & 1 != 0
}

/// Decode a raw input file into `(format flag, symbol sequence)`. Bytes
/// `0xFE`/`0xFF` are escapes consuming the following 3 bytes as a
/// big-endian 24-bit non-terminal reference (non-UTF-8 mode, spec §6); an
/// empty file has no leading flag byte and decodes to an empty sequence.
pub fn decode_input(data: &[u8]) -> (u8, Vec<Symbol>) {
    if data.is_empty() {
        return (0, Vec::new());
    }
    let format_flag = data[0];
    let mut symbols = Vec::with_capacity(data.len() - 1);
    let mut i = 1;
    while i < data.len() {
        match data[i] {
            INSERT_SYMBOL | DEFINE_SYMBOL if i + 3 < data.len() => {
                let v = ((data[i + 1] as u32) << 16) | ((data[i + 2] as u32) << 8) | data[i + 3] as u32;
                symbols.push(Symbol::new(v as i32));
                i += 4;
            }
            b => {
                symbols.push(Symbol::new(b as i32));
                i += 1;
            }
        }
    }
    (format_flag, symbols)
}

fn push_symbol(out: &mut Vec<u8>, sym: Symbol, alphabet_size: u32) {
    let v = sym.value();
    if v >= 0 && (v as u32) < alphabet_size && v != INSERT_SYMBOL as i32 && v != DEFINE_SYMBOL as i32 {
        out.push(v as u8);
    } else {
        out.push(INSERT_SYMBOL);
        let be = (v as u32).to_be_bytes();
        out.extend_from_slice(&be[1..]);
    }
}

/// Encode the residual sequence followed by every rule definition, each
/// prefixed by a `DEFINE_SYMBOL` marker carrying its non-terminal id (spec
/// §6 "output sequence format").
pub fn encode_output(residual: &[Symbol], rules: &[Rule], alphabet_size: u32) -> Vec<u8> {
    let mut out = Vec::with_capacity(residual.len() + rules.len() * 6);
    for &s in residual {
        push_symbol(&mut out, s, alphabet_size);
    }
    for rule in rules {
        out.push(DEFINE_SYMBOL);
        let be = (rule.lhs.value() as u32).to_be_bytes();
        out.extend_from_slice(&be[1..]);
        for &s in &rule.rhs {
            push_symbol(&mut out, s, alphabet_size);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use grammar_types::verify;

    #[test]
    fn empty_input_decodes_to_empty_sequence() {
        let (flag, symbols) = decode_input(&[]);
        assert_eq!(flag, 0);
        assert!(symbols.is_empty());
    }

    #[test]
    fn plain_bytes_round_trip_through_decode() {
        let mut data = vec![0u8]; // format flag
        data.extend_from_slice(b"hello");
        let (flag, symbols) = decode_input(&data);
        assert_eq!(flag, 0);
        let decoded: Vec<u8> = symbols.into_iter().map(|s| s.value() as u8).collect();
        assert_eq!(decoded, b"hello");
    }

    #[test]
    fn encoded_output_reassembles_via_verify_expand() {
        let alphabet_size = 256;
        let rules = vec![Rule::pair(Symbol::new(256), Symbol::new(b'a' as i32), Symbol::new(b'b' as i32))];
        let residual = vec![Symbol::new(256), Symbol::new(256)];
        let bytes = encode_output(&residual, &rules, alphabet_size);
        // First two bytes of the residual region are INSERT_SYMBOL escapes
        // referencing non-terminal 256.
        assert_eq!(bytes[0], INSERT_SYMBOL);

        let expanded = verify::expand(&residual, &rules, alphabet_size);
        let decoded: Vec<u8> = expanded.into_iter().map(|s| s.value() as u8).collect();
        assert_eq!(decoded, b"abab");
    }
}
