use alloc::vec;
use alloc::vec::Vec;

use crate::dictionary::{PositionIndex, hash_sequence, read_sequence};
use crate::encoder::{MAX_SHORT_MATCH, TokenWriter};
use crate::error::CompressionError;
use crate::{MAX_DISTANCE, MIN_INPUT_SIZE, MIN_MATCH, compress_bound};

type Result<T> = core::result::Result<T, CompressionError>;

/// Literal bytes emitted before the first match search, so the stream always
/// starts with a literal token.
const LEAD_IN: usize = 2;

/// How many positions past a found match the lazy parser inspects.
const LAZY_STEPS: usize = 2;

/// Matches longer than this seed one extra dictionary entry near their end.
const BACKFILL_MIN_LEN: usize = 12;

/// Distance from the match end of the backfilled dictionary entry.
const BACKFILL_OFFSET: usize = 5;

/// A verified backward reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Match {
    /// Input position where the match starts.
    position: usize,
    /// Number of matching bytes.
    length: usize,
    /// Distance back to the referenced bytes.
    distance: usize,
}

impl Match {
    const fn end(&self) -> usize {
        self.position + self.length
    }
}

/// Hash-driven match search over one input buffer.
struct MatchFinder<'a> {
    input: &'a [u8],
    index: &'a mut PositionIndex,
    /// No match search starts at or past this position.
    limit: usize,
}

impl<'a> MatchFinder<'a> {
    fn new(input: &'a [u8], index: &'a mut PositionIndex) -> Self {
        index.reset();
        Self {
            input,
            index,
            limit: input.len().saturating_sub(MIN_INPUT_SIZE),
        }
    }

    /// Scans forward from `cursor` for the first verified candidate.
    ///
    /// Every scanned position is recorded in the index, including the ones
    /// that fail verification.
    fn search(&mut self, mut cursor: usize) -> Option<Match> {
        while cursor < self.limit {
            if let Some(found) = self.probe(cursor, true) {
                return Some(found);
            }
            cursor += 1;
        }
        None
    }

    /// Looks for a lazier start that pays for delaying the match by one or
    /// two literals.
    fn refine(&self, found: Match) -> Match {
        let mut best = found;
        for step in 1..=LAZY_STEPS {
            let position = found.position + step;
            if position >= self.limit {
                break;
            }
            if let Some(next) = self.peek(position) {
                let penalty = usize::from(best.length <= MAX_SHORT_MATCH);
                if next.length > best.length + penalty {
                    best = next;
                }
            }
        }
        best
    }

    /// Seeds the dictionary after a committed match.
    fn reseed(&mut self, committed: Match) {
        let end = committed.end();
        self.index.insert(self.input, end - 2);
        self.index.insert(self.input, end - 1);

        if committed.length > BACKFILL_MIN_LEN {
            self.index.insert(self.input, end - BACKFILL_OFFSET);
        }
    }

    /// Checks the candidate stored for the sequence at `position`, recording
    /// `position` in the index when `record` is set.
    fn probe(&mut self, position: usize, record: bool) -> Option<Match> {
        let seq = read_sequence(self.input, position)?;
        let hash = hash_sequence(seq);
        let reference = self.index.lookup(hash);
        if record {
            self.index.store(hash, position);
        }
        self.verify(position, reference, seq)
    }

    fn peek(&self, position: usize) -> Option<Match> {
        let seq = read_sequence(self.input, position)?;
        let reference = self.index.lookup(hash_sequence(seq));
        self.verify(position, reference, seq)
    }

    /// Confirms the candidate byte-for-byte and extends it to its full length.
    fn verify(&self, position: usize, reference: usize, seq: u32) -> Option<Match> {
        let distance = position
            .checked_sub(reference)
            .filter(|d| (1..=MAX_DISTANCE).contains(d))?;

        if read_sequence(self.input, reference)? != seq {
            return None;
        }

        let length = MIN_MATCH
            + common_prefix_len(
                &self.input[reference + MIN_MATCH..],
                &self.input[position + MIN_MATCH..],
            );

        Some(Match {
            position,
            length,
            distance,
        })
    }
}

/// Compresses `input` into `output`, returning the number of bytes written.
///
/// `index` is the 32 KiB workspace; it is fully reset before use, so a single
/// instance can be shared by sequential calls. Sizing `output` to
/// [`compress_bound`] guarantees success.
///
/// The index stores positions as `u32`. On inputs past 4 GiB the stored
/// positions wrap, and the wrapped candidates fail content verification, so
/// beyond that point matches are practically never found. The output stays
/// correct, only the ratio drops towards literal-only.
///
/// # Parameters
/// * `input`: The source data to compress.
/// * `output`: The destination buffer; its length is the capacity.
/// * `index`: The dictionary workspace.
///
/// # Errors
/// Returns [`CompressionError::OutputTooSmall`] if `output` cannot hold the
/// compressed stream.
pub fn compress(input: &[u8], output: &mut [u8], index: &mut PositionIndex) -> Result<usize> {
    let mut writer = TokenWriter::new(output);

    if input.len() < MIN_INPUT_SIZE {
        writer.literals(input)?;
        return Ok(writer.position());
    }

    let mut finder = MatchFinder::new(input, index);
    let mut anchor = 0;
    let mut cursor = LEAD_IN;

    while let Some(found) = finder.search(cursor) {
        let chosen = finder.refine(found);

        // Lazy lead-in bytes join the pending literal run.
        writer.literals(&input[anchor..chosen.position])?;
        writer.matched(chosen.length, chosen.distance)?;

        finder.reseed(chosen);
        cursor = chosen.end();
        anchor = cursor;
    }

    writer.literals(&input[anchor..])?;
    Ok(writer.position())
}

/// Compresses `input` into a freshly allocated vector sized by
/// [`compress_bound`].
///
/// # Errors
/// Propagates [`CompressionError`] from [`compress`].
pub fn compress_to_vec(input: &[u8]) -> Result<Vec<u8>> {
    let mut index = PositionIndex::new();
    let mut output = vec![0u8; compress_bound(input.len())];
    let written = compress(input, &mut output, &mut index)?;
    output.truncate(written);
    Ok(output)
}

/// Finds the length of the common prefix between two slices.
#[inline]
fn common_prefix_len(a: &[u8], b: &[u8]) -> usize {
    a.iter().zip(b).take_while(|(x, y)| x == y).count()
}
