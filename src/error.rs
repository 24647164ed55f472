use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompressionError {
    #[error("Output buffer too small for compressed data")]
    OutputTooSmall,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecompressionError {
    #[error("Unexpected end of stream inside a match token")]
    UnexpectedEof,

    #[error("Lookback offset out of bounds")]
    InvalidOffset,

    #[error("Input buffer too short for expected data")]
    InputTooShort,

    #[error("Output buffer too small for decompressed data")]
    OutputTooSmall,
}
