// Copyright 2024 Karpeles Lab Inc.
// Property-based tests using proptest

use minsnappy::{compress, decompress, decompressed_len, Compressor, Decompressor, Error};

/// Random headers can declare up to 2 GiB; keep allocations small
const ARBITRARY_MAX_LEN: usize = 1 << 24;
use proptest::prelude::*;

/// Offsets of every chunk tag byte in a well-formed block
fn tag_positions(block: &[u8]) -> Vec<usize> {
    let (_, mut s) = decompressed_len(block).expect("valid header");
    let mut tags = Vec::new();

    while s < block.len() {
        tags.push(s);
        let tag = block[s];
        s += match tag & 0x03 {
            0x00 => {
                let m = (tag >> 2) as usize;
                if m < 60 {
                    1 + m + 1
                } else {
                    let extra = m - 59;
                    let mut n = 0usize;
                    for (i, &b) in block[s + 1..s + 1 + extra].iter().enumerate() {
                        n |= (b as usize) << (8 * i);
                    }
                    1 + extra + n + 1
                }
            }
            0x01 => 2,
            0x02 => 3,
            _ => unreachable!("compressor never emits copy-4"),
        };
    }

    tags
}

proptest! {
    #[test]
    fn prop_roundtrip(data: Vec<u8>) {
        prop_assume!(data.len() <= 100_000);

        let compressed = compress(&data).expect("compress failed");
        let decompressed = decompress(&compressed).expect("decode failed");
        prop_assert_eq!(data, decompressed);
    }

    #[test]
    fn prop_roundtrip_structured(
        words in prop::collection::vec(prop::sample::select(vec!["snappy", "block", "copy", " ", "literal", "\n"]), 0..5000)
    ) {
        let data = words.concat().into_bytes();
        let compressed = compress(&data).expect("compress failed");
        prop_assert!(compressed.len() <= minsnappy::max_compressed_len(data.len()).unwrap());
        prop_assert_eq!(decompress(&compressed).expect("decode failed"), data);
    }

    #[test]
    fn prop_short_input_is_one_literal(data in prop::collection::vec(any::<u8>(), 1..=4)) {
        let compressed = compress(&data).expect("compress failed");

        let mut want = vec![data.len() as u8, ((data.len() - 1) as u8) << 2];
        want.extend_from_slice(&data);
        prop_assert_eq!(compressed, want);
    }

    #[test]
    fn prop_decode_never_panics(data: Vec<u8>) {
        prop_assume!(data.len() <= 10_000);

        // Decoding arbitrary data should never panic - just return error or success
        let _ = Decompressor::with_max_len(ARBITRARY_MAX_LEN).decompress(&data);
    }

    #[test]
    fn prop_output_len_matches_header(data: Vec<u8>) {
        prop_assume!(data.len() <= 10_000);

        if let Ok(out) = Decompressor::with_max_len(ARBITRARY_MAX_LEN).decompress(&data) {
            let (declared, _) = decompressed_len(&data).expect("header decoded once already");
            prop_assert_eq!(out.len(), declared);
        }
    }

    #[test]
    fn prop_truncated_block_fails(data in prop::collection::vec(any::<u8>(), 0..5000)) {
        let compressed = compress(&data).expect("compress failed");
        let truncated = &compressed[..compressed.len() - 1];
        prop_assert!(decompress(truncated).is_err());
    }

    #[test]
    fn prop_tag3_is_rejected(data in prop::collection::vec(0u8..8, 1..3000), pick: prop::sample::Index) {
        let compressed = compress(&data).expect("compress failed");
        let tags = tag_positions(&compressed);
        prop_assume!(!tags.is_empty());

        let mut corrupted = compressed.clone();
        corrupted[tags[pick.index(tags.len())]] |= 0x03;
        prop_assert_eq!(decompress(&corrupted), Err(Error::Unsupported));
    }

    #[test]
    fn prop_compression_improves_on_repeats(data in prop::collection::vec(any::<u8>(), 100..1000)) {
        let repeated = data.repeat(10);
        let compressed = compress(&repeated).expect("compress failed");

        prop_assert!(compressed.len() < repeated.len() / 2);
    }

    #[test]
    fn prop_all_same_byte(byte: u8, size in 1usize..10000) {
        let data = vec![byte; size];
        let compressed = compress(&data).expect("compress failed");
        let decompressed = decompress(&compressed).expect("decode failed");
        prop_assert_eq!(&data, &decompressed);

        if size > 100 {
            prop_assert!(compressed.len() < size / 5);
        }
    }

    #[test]
    fn prop_reused_compressor_is_deterministic(a: Vec<u8>, b: Vec<u8>) {
        prop_assume!(a.len() <= 20_000 && b.len() <= 20_000);

        let mut compressor = Compressor::new();
        let first_a = compressor.compress(&a).expect("compress failed");
        let first_b = compressor.compress(&b).expect("compress failed");

        prop_assert_eq!(first_a, compress(&a).expect("compress failed"));
        prop_assert_eq!(first_b, compress(&b).expect("compress failed"));
    }
}
