//! Integration tests for the full huffpuff pipeline.
//!
//! These tests verify end-to-end behavior: input -> compress -> (container ->
//! parse) -> decompress, with verification that output matches input, plus
//! the structural properties every code table must have.

use huffpuff_core::{
    compress, decompress,
    format::{compress_to_container, decompress_container, parse_encoded, serialize_encoded},
    FrequencyTable, HuffmanTree,
};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Random inputs of assorted lengths and alphabet sizes.
fn random_inputs(seed: u64, count: usize) -> Vec<Vec<u8>> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..count)
        .map(|_| {
            let len = rng.gen_range(0..2000);
            let alphabet: u16 = rng.gen_range(1..=256);
            (0..len)
                .map(|_| rng.gen_range(0..alphabet) as u8)
                .collect()
        })
        .collect()
}

/// Scenario: the reference string.
#[test]
fn test_reference_string() {
    let input = b"aaabbcdeffff";

    let freqs = FrequencyTable::from_bytes(input);
    let expected: [(u8, u64); 6] = [(b'a', 3), (b'b', 2), (b'c', 1), (b'd', 1), (b'e', 1), (b'f', 4)];
    assert_eq!(freqs.iter().collect::<Vec<_>>(), expected);

    let result = compress(input);
    assert_eq!(decompress(&result).expect("decompression failed"), input);
}

/// Scenario: empty input.
#[test]
fn test_empty_input() {
    let result = compress(b"");
    assert_eq!(result.bit_len(), 0);
    assert!(result.tree().is_none());
    assert_eq!(decompress(&result).unwrap(), b"");
}

/// Scenario: one symbol repeated.
#[test]
fn test_single_repeated_symbol() {
    let result = compress(b"zzzz");
    let tree = result.tree().expect("tree for non-empty input");

    assert_eq!(tree.internal_count(), 1);
    assert_eq!(tree.leaf_count(), 2);
    assert_eq!(tree.code_table().get(b'z').unwrap().len(), 1);
    assert_eq!(result.bit_len(), 4);
    assert_eq!(decompress(&result).unwrap(), b"zzzz");
}

/// Scenario: every byte value exactly once.
#[test]
fn test_all_symbols_once() {
    let input: Vec<u8> = (0..=255).collect();
    let result = compress(&input);
    let tree = result.tree().unwrap();

    assert_eq!(tree.leaf_count(), 256);
    assert_eq!(tree.internal_count(), 255);
    assert_eq!(decompress(&result).unwrap(), input);
}

#[test]
fn test_random_round_trips() {
    for input in random_inputs(42, 64) {
        let result = compress(&input);
        assert_eq!(decompress(&result).unwrap(), input);
    }
}

#[test]
fn test_random_container_round_trips() {
    for input in random_inputs(7, 32) {
        let container = compress_to_container(&input).unwrap();
        assert_eq!(decompress_container(&container).unwrap(), input);
    }
}

#[test]
fn test_code_tables_are_prefix_free() {
    for input in random_inputs(1234, 32) {
        let Some(tree) = compress(&input).tree().cloned() else {
            assert!(input.is_empty());
            continue;
        };
        let table = tree.code_table();

        let codes: Vec<_> = table.iter().collect();
        for (a_symbol, a) in &codes {
            assert!(!a.is_empty());
            for (b_symbol, b) in &codes {
                if a_symbol != b_symbol {
                    assert!(!a.is_prefix_of(b), "{a} prefixes {b}");
                }
            }
        }
    }
}

#[test]
fn test_compression_is_deterministic() {
    for input in random_inputs(99, 16) {
        assert_eq!(compress(&input), compress(&input));
    }
}

#[test]
fn test_tree_ignores_arrival_order() {
    let mut rng = ChaCha8Rng::seed_from_u64(5);
    for mut input in random_inputs(5, 16) {
        let tree = HuffmanTree::build(&FrequencyTable::from_bytes(&input));
        input.shuffle(&mut rng);
        let shuffled = HuffmanTree::build(&FrequencyTable::from_bytes(&input));
        assert_eq!(tree, shuffled);
    }
}

#[test]
fn test_encoded_size_bounds() {
    for input in random_inputs(2024, 32) {
        let distinct = FrequencyTable::from_bytes(&input).distinct() as u64;
        if distinct < 2 {
            continue;
        }
        let n = input.len() as u64;
        let bits = compress(&input).bit_len() as u64;
        assert!(bits >= n, "{bits} bits for {n} symbols");
        assert!(bits <= n * (distinct - 1), "{bits} bits for {n} symbols, k={distinct}");
    }
}

#[test]
fn test_skewed_input_compresses() {
    let mut input = b"The quick brown fox jumps over the lazy dog. ".repeat(100);
    input.extend(std::iter::repeat(b'e').take(5000));

    let result = compress(&input);
    assert!(result.bits().byte_len() < input.len() / 2);
    assert_eq!(decompress(&result).unwrap(), input);
}

#[test]
fn test_parsed_container_re_serializes_identically() {
    let container = compress_to_container(b"mississippi").unwrap();
    let parsed = parse_encoded(&container).unwrap();
    assert_eq!(serialize_encoded(&parsed).unwrap(), container);
}

#[test]
fn test_corrupted_containers_never_decode_silently() {
    let input = b"test data for crc validation";
    let container = compress_to_container(input).unwrap();

    for index in 0..container.len() {
        let mut damaged = container.clone();
        damaged[index] ^= 0x10;
        assert!(
            decompress_container(&damaged).is_err(),
            "flip at byte {index} went unnoticed"
        );
    }
}
