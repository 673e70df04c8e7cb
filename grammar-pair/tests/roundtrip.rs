use grammar_pair::{map_bytes, PairEngine, PairEngineConfig};
use grammar_types::{verify, GrammarCompressor, Sequence};
use proptest::prelude::*;
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

fn compress(bytes: &[u8]) -> (Vec<u8>, Vec<grammar_types::Rule>, Vec<u8>) {
    let (symbols, alphabet) = map_bytes(bytes);
    let alphabet_size = alphabet.alphabet.len() as u32;
    let mut sequence = Sequence::new(symbols);
    let mut engine = PairEngine::new(alphabet_size, PairEngineConfig::default());
    let rules = engine.compress(&mut sequence).unwrap();
    let expanded = verify::expand(sequence.as_slice(), &rules, alphabet_size);
    let decoded: Vec<u8> = expanded.into_iter().map(|s| alphabet.decode(s).unwrap()).collect();
    (alphabet.alphabet.clone(), rules, decoded)
}

#[test]
fn scenario_1_empty_input() {
    let (_, rules, decoded) = compress(b"");
    assert!(rules.is_empty());
    assert!(decoded.is_empty());
}

#[test]
fn scenario_2_repeated_a_residual_at_most_four() {
    let input = b"aaaaaaaa";
    let (_, rules, decoded, residual_len) = {
        let (symbols, alphabet) = map_bytes(input);
        let alphabet_size = alphabet.alphabet.len() as u32;
        let mut sequence = Sequence::new(symbols);
        let mut engine = PairEngine::new(alphabet_size, PairEngineConfig::default());
        let rules = engine.compress(&mut sequence).unwrap();
        let residual_len = sequence.len();
        let expanded = verify::expand(sequence.as_slice(), &rules, alphabet_size);
        let decoded: Vec<u8> = expanded.into_iter().map(|s| alphabet.decode(s).unwrap()).collect();
        (alphabet.alphabet.clone(), rules, decoded, residual_len)
    };
    assert!(!rules.is_empty());
    assert!(residual_len <= 4, "residual length {residual_len} exceeds 4");
    assert_eq!(decoded, input);
}

#[test]
fn scenario_3_abc_repeated_round_trips() {
    let input = b"abcabcabcabc";
    let (_, rules, decoded) = compress(input);
    assert!(!rules.is_empty());
    assert_eq!(decoded, input);
}

#[test]
fn scenario_4_mississippi_round_trips_with_one_nonterminal_per_cycle() {
    let input = b"mississippi";
    let (_, rules, decoded) = compress(input);
    assert!(!rules.is_empty());
    assert_eq!(decoded, input);
    // Every rule introduces exactly one fresh non-terminal (rhs length 2).
    for rule in &rules {
        assert_eq!(rule.rhs.len(), 2);
    }
}

#[test]
fn scenario_5_pseudorandom_megabyte_round_trips_and_bounds_rule_count() {
    let mut rng = ChaCha8Rng::seed_from_u64(0xC0FFEE);
    let mut input = vec![0u8; 1 << 20];
    rng.fill_bytes(&mut input);

    let (_, rules, decoded) = compress(&input);
    assert_eq!(decoded, input);
    assert!(
        rules.len() <= input.len() / 4,
        "rule count {} exceeds input length / 4 ({})",
        rules.len(),
        input.len() / 4
    );
}

#[test]
fn scenario_6_natural_language_text_produces_many_rules() {
    let paragraph = "the quick brown fox jumps over the lazy dog. \
        the dog barks at the quick fox, and the fox runs away from the dog. \
        the quick brown fox jumps over the lazy dog again and again.";
    let input: Vec<u8> = paragraph.repeat(400).into_bytes();

    let (_, rules, decoded) = compress(&input);
    assert_eq!(decoded, input);
    assert!(rules.len() >= 100, "expected at least 100 rules, got {}", rules.len());
}

#[test]
fn pair_invariant_holds_after_each_cycle_on_varied_inputs() {
    for input in [&b""[..], &b"a"[..], &b"aa"[..], &b"aaa"[..], &b"banana"[..], &b"abababab"[..]] {
        let (_, _rules, decoded) = compress(input);
        assert_eq!(decoded, input);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn p1_round_trip_holds_for_arbitrary_byte_strings(bytes in proptest::collection::vec(any::<u8>(), 0..500)) {
        let (_, _rules, decoded) = compress(&bytes);
        prop_assert_eq!(decoded, bytes);
    }
}
