use crate::error::DecompressionError;
use alloc::vec;
use alloc::vec::Vec;

type Result<T> = core::result::Result<T, DecompressionError>;

// --- Constants ---

/// Control bytes below this value announce a literal run.
const LITERAL_LIMIT: u8 = 32;

/// Mask applied to the first control byte of a stream; it is always read as a
/// literal run regardless of its high bits.
const FIRST_CONTROL_MASK: u8 = 0x1f;

/// Length class whose length is carried in an extra byte.
const EXTENDED_CLASS: u8 = 7;

/// Smallest encoded token (a one-byte literal run or a short match).
const MIN_TOKEN_SIZE: usize = 2;

/// Decompresses a token stream into `output`, returning the number of bytes
/// produced.
///
/// The length of `output` is the hard capacity: no token is allowed to write
/// past it, whatever the input contains. Decoding stops once fewer than two
/// input bytes remain, so a lone trailing byte is ignored.
///
/// # Errors
/// * [`DecompressionError::OutputTooSmall`] if a token would exceed `output`.
/// * [`DecompressionError::InputTooShort`] if a literal run is truncated.
/// * [`DecompressionError::UnexpectedEof`] if a match token is truncated.
/// * [`DecompressionError::InvalidOffset`] if a match references data before
///   the start of `output`.
pub fn decompress(input: &[u8], output: &mut [u8]) -> Result<usize> {
    let Some(&first) = input.first() else {
        return Ok(0);
    };

    let mut in_idx = 1;
    let mut out_idx = 0;
    let mut ctrl = first & FIRST_CONTROL_MASK;

    loop {
        out_idx = if ctrl < LITERAL_LIMIT {
            copy_literals(input, &mut in_idx, output, out_idx, ctrl)?
        } else {
            apply_match(input, &mut in_idx, output, out_idx, ctrl)?
        };

        if input.len() - in_idx < MIN_TOKEN_SIZE {
            break;
        }

        ctrl = input[in_idx];
        in_idx += 1;
    }

    Ok(out_idx)
}

/// Decompresses into a new vector of at most `capacity` bytes.
///
/// # Errors
/// Same as [`decompress`].
pub fn decompress_to_vec(input: &[u8], capacity: usize) -> Result<Vec<u8>> {
    let mut output = vec![0u8; capacity];
    let written = decompress(input, &mut output)?;
    output.truncate(written);
    Ok(output)
}

/// Copies a literal run of `ctrl + 1` bytes and returns the new output length.
#[inline]
fn copy_literals(
    input: &[u8],
    in_idx: &mut usize,
    output: &mut [u8],
    out_idx: usize,
    ctrl: u8,
) -> Result<usize> {
    let run = usize::from(ctrl) + 1;

    let dst = output
        .get_mut(out_idx..out_idx + run)
        .ok_or(DecompressionError::OutputTooSmall)?;
    let src = input
        .get(*in_idx..*in_idx + run)
        .ok_or(DecompressionError::InputTooShort)?;

    dst.copy_from_slice(src);
    *in_idx += run;
    Ok(out_idx + run)
}

/// Decodes the rest of a match token and replays it into the output.
///
/// Returns the new output length.
#[inline]
fn apply_match(
    input: &[u8],
    in_idx: &mut usize,
    output: &mut [u8],
    out_idx: usize,
    ctrl: u8,
) -> Result<usize> {
    let class = ctrl >> 5;
    let mut length = usize::from(class) + 2;

    if class == EXTENDED_CLASS {
        length += usize::from(next_byte(input, in_idx)?);
    }

    let low = next_byte(input, in_idx)?;
    let distance = (usize::from(ctrl & 0x1f) << 8 | usize::from(low)) + 1;

    let reference = out_idx
        .checked_sub(distance)
        .ok_or(DecompressionError::InvalidOffset)?;
    let end = out_idx
        .checked_add(length)
        .filter(|&end| end <= output.len())
        .ok_or(DecompressionError::OutputTooSmall)?;

    copy_back_reference(output, reference, out_idx, length);
    Ok(end)
}

/// Replays `length` bytes starting `dst - src` bytes back.
///
/// Each step copies at most `distance` bytes, so the source and destination of
/// a single step never overlap; later steps read bytes written by earlier
/// ones, which is how short distances repeat a pattern.
#[inline]
fn copy_back_reference(output: &mut [u8], mut src: usize, mut dst: usize, length: usize) {
    let distance = dst - src;
    let mut remaining = length;

    while remaining > 0 {
        let chunk = remaining.min(distance);
        output.copy_within(src..src + chunk, dst);
        src += chunk;
        dst += chunk;
        remaining -= chunk;
    }
}

#[inline]
fn next_byte(input: &[u8], in_idx: &mut usize) -> Result<u8> {
    let byte = *input
        .get(*in_idx)
        .ok_or(DecompressionError::UnexpectedEof)?;
    *in_idx += 1;
    Ok(byte)
}
