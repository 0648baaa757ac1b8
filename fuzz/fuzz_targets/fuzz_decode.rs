#![no_main]

use libfuzzer_sys::fuzz_target;
use minsnappy::{decompressed_len, Decompressor};

fuzz_target!(|data: &[u8]| {
    // Arbitrary input must either decode to exactly the declared length or
    // return an error. Cap the allocation a tiny header can request.
    if let Ok(out) = Decompressor::with_max_len(1 << 24).decompress(data) {
        let (declared, _) = decompressed_len(data).expect("header already decoded");
        assert_eq!(out.len(), declared);
    }
});
