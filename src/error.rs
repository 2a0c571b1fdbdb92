use std::io;

use thiserror::Error;

/// Alias for the result type of snappy operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned by the block compressor and decompressor.
///
/// Every variant is final for the call that produced it: no partial output
/// is handed back, and retrying the same bytes gives the same answer.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The uncompressed-length preamble is truncated or wider than 32 bits.
    #[error("snappy: malformed length preamble")]
    MalformedLength,

    /// The token stream is inconsistent with the declared length.
    #[error("snappy: corrupt input")]
    CorruptStream,

    /// The output buffer could not be allocated.
    #[error("snappy: could not allocate output buffer")]
    AllocationFailure,

    /// A caller-supplied output buffer is too short.
    #[error("snappy: destination buffer is too short ({actual} < {needed})")]
    BufferTooSmall { needed: usize, actual: usize },

    /// The input cannot be described by a 32-bit length preamble.
    #[error("snappy: source buffer is too long ({0} bytes)")]
    InputTooLarge(usize),
}

impl From<std::collections::TryReserveError> for Error {
    fn from(_: std::collections::TryReserveError) -> Error {
        Error::AllocationFailure
    }
}

impl From<Error> for io::Error {
    fn from(err: Error) -> io::Error {
        let kind = match err {
            Error::MalformedLength | Error::CorruptStream => io::ErrorKind::InvalidData,
            Error::AllocationFailure => io::ErrorKind::OutOfMemory,
            Error::BufferTooSmall { .. } | Error::InputTooLarge(_) => io::ErrorKind::InvalidInput,
        };
        io::Error::new(kind, err)
    }
}
