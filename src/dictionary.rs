//! The position index used by the compressor to find match candidates.

use crate::MIN_MATCH;

/// Log2 of the number of slots in the position index.
pub const HASH_LOG: u32 = 13;

/// Number of slots in the position index (8192).
pub const HASH_SIZE: usize = 1 << HASH_LOG;

/// Size in bytes of the compression workspace (32 KiB).
pub const WORKSPACE_SIZE: usize = HASH_SIZE * core::mem::size_of::<u32>();

/// Multiplicative constant for the 24-bit sequence hash.
const HASH_MULTIPLIER: u32 = 0x27d4_eb2d;

/// Maps the hash of a 3-byte sequence to the most recent input position where
/// that sequence was seen.
///
/// Each bucket holds a single position, so inserting overwrites the previous
/// occurrence. A slot that was never written holds `0`, the start of the
/// input; callers treat every lookup result as a candidate that still has to
/// be confirmed by comparing the actual bytes.
///
/// The index is the only state the compressor needs. It is reset at the start
/// of every [`compress`](crate::compress::compress) call, so one instance can
/// be reused for any number of sequential calls.
#[derive(Clone)]
pub struct PositionIndex {
    slots: [u32; HASH_SIZE],
}

impl Default for PositionIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Debug for PositionIndex {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PositionIndex")
            .field("slots", &HASH_SIZE)
            .finish()
    }
}

impl PositionIndex {
    /// Returns an empty 32 KiB workspace.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            slots: [0; HASH_SIZE],
        }
    }

    /// Forgets every recorded position.
    pub(crate) fn reset(&mut self) {
        self.slots.fill(0);
    }

    /// Returns the last position stored under `hash`.
    #[inline]
    pub(crate) fn lookup(&self, hash: usize) -> usize {
        self.slots[hash & (HASH_SIZE - 1)] as usize
    }

    /// Stores `position` under `hash`, replacing whatever was there.
    #[inline]
    pub(crate) fn store(&mut self, hash: usize, position: usize) {
        // Wraps past u32::MAX; see `compress` for the effect on ratio.
        self.slots[hash & (HASH_SIZE - 1)] = position as u32;
    }

    /// Records the 3-byte sequence starting at `position`.
    ///
    /// Positions too close to the end of `input` to hold a full sequence are
    /// ignored.
    #[inline]
    pub(crate) fn insert(&mut self, input: &[u8], position: usize) {
        if let Some(seq) = read_sequence(input, position) {
            self.store(hash_sequence(seq), position);
        }
    }
}

/// Reads the 3 bytes at `position` as a little-endian 24-bit value.
#[inline]
pub(crate) fn read_sequence(input: &[u8], position: usize) -> Option<u32> {
    let bytes = input.get(position..position.checked_add(MIN_MATCH)?)?;
    Some(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], 0]))
}

/// Hashes a 24-bit sequence into a slot index (0..8192).
#[inline]
pub(crate) const fn hash_sequence(seq: u32) -> usize {
    let mixed = (seq ^ (seq >> 15)).wrapping_mul(HASH_MULTIPLIER);
    (mixed >> (32 - HASH_LOG)) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_stays_in_range() {
        for seq in [0, 1, 0x00ff_ffff, 0x0041_4141, 0x0012_3456] {
            assert!(hash_sequence(seq) < HASH_SIZE);
        }
    }

    #[test]
    fn test_insert_overwrites_slot() {
        let input = b"abcXabc";
        let mut index = PositionIndex::new();
        let hash = hash_sequence(read_sequence(input, 0).unwrap());

        assert_eq!(index.lookup(hash), 0);
        index.insert(input, 0);
        assert_eq!(index.lookup(hash), 0);
        index.insert(input, 4);
        assert_eq!(index.lookup(hash), 4);

        index.reset();
        assert_eq!(index.lookup(hash), 0);
    }

    #[test]
    fn test_insert_near_end_is_ignored() {
        let input = b"abcd";
        let mut index = PositionIndex::new();
        index.insert(input, 2);
        assert!(read_sequence(input, 2).is_none());
        assert!(index.slots.iter().all(|&slot| slot == 0));
    }

    #[test]
    fn test_workspace_size() {
        assert_eq!(WORKSPACE_SIZE, 32 * 1024);
        assert_eq!(core::mem::size_of::<PositionIndex>(), WORKSPACE_SIZE);
    }
}
