use crate::error::CompressionError;
use crate::{MAX_DISTANCE, MAX_LITERAL_RUN, MAX_MATCH, MIN_MATCH};

type Result<T> = core::result::Result<T, CompressionError>;

/// Longest match that fits a two-byte token (length class 1..=6).
pub(crate) const MAX_SHORT_MATCH: usize = 8;

/// Length class announcing an extension byte.
const EXTENDED_CLASS: u8 = 7;

/// Serializes literal runs and matches into a caller-owned buffer.
///
/// Every write is checked against the buffer capacity before anything is
/// stored, so a failed call leaves the bytes past the cursor untouched.
pub(crate) struct TokenWriter<'a> {
    output: &'a mut [u8],
    pos: usize,
}

impl<'a> TokenWriter<'a> {
    pub(crate) const fn new(output: &'a mut [u8]) -> Self {
        Self { output, pos: 0 }
    }

    /// Number of bytes written so far.
    pub(crate) const fn position(&self) -> usize {
        self.pos
    }

    /// Emits `run` as literal tokens of at most 32 bytes each.
    pub(crate) fn literals(&mut self, run: &[u8]) -> Result<()> {
        for chunk in run.chunks(MAX_LITERAL_RUN) {
            let dst = self.reserve(1 + chunk.len())?;
            dst[0] = (chunk.len() - 1) as u8;
            dst[1..].copy_from_slice(chunk);
        }
        Ok(())
    }

    /// Emits a backward reference, splitting lengths above [`MAX_MATCH`] into
    /// several tokens at the same distance.
    ///
    /// The split never leaves a tail shorter than [`MIN_MATCH`].
    pub(crate) fn matched(&mut self, length: usize, distance: usize) -> Result<()> {
        let mut remaining = length;
        while remaining > MAX_MATCH {
            let chunk = MAX_MATCH.min(remaining - MIN_MATCH);
            self.match_token(chunk, distance)?;
            remaining -= chunk;
        }
        self.match_token(remaining, distance)
    }

    fn match_token(&mut self, length: usize, distance: usize) -> Result<()> {
        debug_assert!((MIN_MATCH..=MAX_MATCH).contains(&length));
        debug_assert!((1..=MAX_DISTANCE).contains(&distance));

        let code = distance - 1;
        let high = (code >> 8) as u8;
        let low = (code & 0xff) as u8;

        if length <= MAX_SHORT_MATCH {
            let dst = self.reserve(2)?;
            dst[0] = ((length - 2) as u8) << 5 | high;
            dst[1] = low;
        } else {
            let dst = self.reserve(3)?;
            dst[0] = EXTENDED_CLASS << 5 | high;
            dst[1] = (length - MAX_SHORT_MATCH - 1) as u8;
            dst[2] = low;
        }
        Ok(())
    }

    /// Claims the next `len` bytes of the output.
    fn reserve(&mut self, len: usize) -> Result<&mut [u8]> {
        let end = self
            .pos
            .checked_add(len)
            .filter(|&end| end <= self.output.len())
            .ok_or(CompressionError::OutputTooSmall)?;
        let start = core::mem::replace(&mut self.pos, end);
        Ok(&mut self.output[start..end])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    fn encode(f: impl FnOnce(&mut TokenWriter<'_>) -> Result<()>) -> Vec<u8> {
        let mut buf = [0u8; 64];
        let mut writer = TokenWriter::new(&mut buf);
        f(&mut writer).unwrap();
        let len = writer.position();
        buf[..len].to_vec()
    }

    #[test]
    fn test_short_match_layout() {
        // length 3 -> class 1, distance 1 -> code 0
        assert_eq!(encode(|w| w.matched(3, 1)), [0x20, 0x00]);
        // length 8 -> class 6, distance 0x1234 -> code 0x1233
        assert_eq!(encode(|w| w.matched(8, 0x1234)), [0xD2, 0x33]);
    }

    #[test]
    fn test_long_match_layout() {
        assert_eq!(encode(|w| w.matched(9, 1)), [0xE0, 0x00, 0x00]);
        assert_eq!(encode(|w| w.matched(264, 8192)), [0xFF, 0xFF, 0xFF]);
    }

    #[test]
    fn test_long_match_split_keeps_tail_encodable() {
        // 265 cannot be 264 + 1, so it becomes 262 + 3.
        assert_eq!(
            encode(|w| w.matched(265, 2)),
            [0xE0, 253, 0x01, 0x20, 0x01]
        );
        // 600 = 264 + 264 + 72
        assert_eq!(
            encode(|w| w.matched(600, 2)),
            [0xE0, 255, 0x01, 0xE0, 255, 0x01, 0xE0, 63, 0x01]
        );
    }

    #[test]
    fn test_literal_chunks() {
        let run: Vec<u8> = (0..40).collect();
        let out = encode(|w| w.literals(&run));
        assert_eq!(out.len(), 42);
        assert_eq!(out[0], 31);
        assert_eq!(&out[1..33], &run[..32]);
        assert_eq!(out[33], 7);
        assert_eq!(&out[34..], &run[32..]);

        assert!(encode(|w| w.literals(&[])).is_empty());
    }

    #[test]
    fn test_reserve_checks_capacity() {
        let mut buf = [0u8; 4];
        let mut writer = TokenWriter::new(&mut buf);
        assert_eq!(
            writer.literals(b"abcd"),
            Err(CompressionError::OutputTooSmall)
        );
        assert_eq!(writer.position(), 0);
        writer.matched(9, 1).unwrap();
        assert_eq!(writer.matched(3, 1), Err(CompressionError::OutputTooSmall));
        assert_eq!(writer.position(), 3);
    }
}
