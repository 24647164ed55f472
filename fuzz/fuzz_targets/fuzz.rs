#![no_main]

use libfuzzer_sys::fuzz_target;
use lz77::{PositionIndex, compress, compress_bound, decompress};

/// Largest output capacity handed to the decoder.
const MAX_CAPACITY: usize = 1 << 16;

/// Decodes arbitrary bytes as a token stream under several capacities.
///
/// # Invariant
/// The decoder returns `Ok(n)` with `n <= capacity` or an `Err`; it never
/// panics, whatever the input.
fn verify_decompression_robustness(data: &[u8]) {
    for capacity in [0, 1, data.len(), MAX_CAPACITY] {
        let mut output = vec![0u8; capacity];
        if let Ok(n) = decompress(data, &mut output) {
            assert!(n <= capacity, "decoder reported {n} bytes for capacity {capacity}");
        }
    }
}

/// Verifies `decompress(compress(data)) == data` with an exact-fit output,
/// and that one byte less capacity is rejected.
///
/// # Panics
/// On mismatch, on a rejected valid stream, or on a silently truncated decode.
fn verify_round_trip(data: &[u8], index: &mut PositionIndex) {
    let mut compressed = vec![0u8; compress_bound(data.len())];
    let compressed_len = match compress(data, &mut compressed, index) {
        Ok(n) => n,
        Err(e) => panic!("compress_bound too small for {} bytes: {e:?}", data.len()),
    };
    let compressed = &compressed[..compressed_len];

    let mut decompressed = vec![0u8; data.len()];
    match decompress(compressed, &mut decompressed) {
        Ok(n) => {
            if n != data.len() || decompressed != data {
                panic!(
                    "Round-trip mismatch!\nInput len: {}\nCompressed len: {}\nDecompressed len: {}",
                    data.len(),
                    compressed_len,
                    n
                );
            }
        }
        Err(e) => panic!(
            "Round-trip failed! Decompressor rejected valid compressed data.\nError: {:?}\nInput len: {}",
            e,
            data.len()
        ),
    }

    if let Some(smaller) = data.len().checked_sub(1) {
        let mut short = vec![0u8; smaller];
        assert!(decompress(compressed, &mut short).is_err());
    }
}

/// Flips one byte of a valid stream and decodes it again.
fn verify_corruption_is_bounded(data: &[u8], index: &mut PositionIndex) {
    let mut compressed = vec![0u8; compress_bound(data.len())];
    let Ok(compressed_len) = compress(data, &mut compressed, index) else {
        return;
    };
    compressed.truncate(compressed_len);
    if compressed.is_empty() {
        return;
    }

    let seed = data.iter().fold(0usize, |acc, &b| acc.wrapping_mul(31).wrapping_add(b.into()));
    compressed[seed % compressed_len] ^= (seed >> 8) as u8 | 1;

    let mut output = vec![0u8; data.len()];
    if let Ok(n) = decompress(&compressed, &mut output) {
        assert!(n <= data.len());
    }
}

fuzz_target!(|data: &[u8]| {
    let mut index = PositionIndex::new();

    verify_decompression_robustness(data);
    verify_round_trip(data, &mut index);
    verify_corruption_is_bounded(data, &mut index);
});
