//! # LZ77 Block Compression
//!
//! `lz77` is a safe, pure-Rust LZ77 codec without an entropy stage, aimed at
//! constrained environments where predictable memory use matters more than
//! ratio. Compression runs in a caller-owned 32 KiB [`PositionIndex`] and
//! writes into a caller-owned buffer; decompression needs no workspace and
//! never writes past the capacity of its output buffer.
//!
//! ## Format
//!
//! The stream is a sequence of tokens:
//!
//! * `000LLLLL` followed by `L + 1` raw bytes: a literal run of 1 to 32 bytes.
//! * `CCCDDDDD dddddddd` with `C` in 1..=6: a match of `C + 2` bytes.
//! * `111DDDDD eeeeeeee dddddddd`: a match of `e + 9` bytes.
//!
//! Match distances are `(DDDDD << 8 | dddddddd) + 1`, up to 8192 bytes back.
//! The first control byte of a stream is always read as a literal run.
//!
//! ## Example
//!
//! ```rust
//! use lz77::{PositionIndex, compress, compress_bound, decompress};
//!
//! let input = b"Hello world, hello world, hello world!";
//! let mut index = PositionIndex::new();
//! let mut compressed = vec![0u8; compress_bound(input.len())];
//! let n = compress(input, &mut compressed, &mut index).expect("Compression failed");
//!
//! let mut buffer = [0u8; 64];
//! let m = decompress(&compressed[..n], &mut buffer).expect("Decompression failed");
//! assert_eq!(&buffer[..m], input);
//! ```

#![no_std]
#![forbid(unsafe_code)]

extern crate alloc;

pub mod compress;
pub mod decompress;
pub mod dictionary;
mod encoder;
pub mod error;

pub use compress::{compress, compress_to_vec};
pub use decompress::{decompress, decompress_to_vec};
pub use dictionary::{HASH_LOG, HASH_SIZE, PositionIndex, WORKSPACE_SIZE};
pub use error::{CompressionError, DecompressionError};

/// Maximum number of bytes in a single literal run.
pub const MAX_LITERAL_RUN: usize = 32;

/// Minimum match length; shorter repeats are stored as literals.
pub const MIN_MATCH: usize = 3;

/// Maximum match length of a single token (256 + 8).
pub const MAX_MATCH: usize = 264;

/// Maximum backward distance of a match (the window size).
pub const MAX_DISTANCE: usize = 8192;

/// Inputs shorter than this are stored as literal runs only. It is also the
/// distance from the end of input past which no match search starts.
pub const MIN_INPUT_SIZE: usize = 13;

/// Fixed slack added by [`compress_bound`].
pub const COMPRESS_OVERHEAD: usize = 128;

/// Returns an output capacity that is always large enough to compress
/// `input_len` bytes, including incompressible input.
#[inline]
#[must_use]
pub const fn compress_bound(input_len: usize) -> usize {
    input_len + input_len / MAX_LITERAL_RUN + COMPRESS_OVERHEAD
}
