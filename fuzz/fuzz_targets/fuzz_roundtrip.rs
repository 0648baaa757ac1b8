#![no_main]

use libfuzzer_sys::fuzz_target;
use minsnappy::{compress, decompress};

fuzz_target!(|data: &[u8]| {
    // Skip very large inputs to avoid OOM
    if data.len() > 1_000_000 {
        return;
    }

    let compressed = compress(data).expect("compress failed");
    let decompressed = decompress(&compressed).expect("decompress failed");
    assert_eq!(data, &decompressed[..], "roundtrip failed");

    if !compressed.is_empty() {
        assert!(decompress(&compressed[..compressed.len() - 1]).is_err());
    }
});
