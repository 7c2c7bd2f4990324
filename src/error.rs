use thiserror::Error;

use crate::format::FourCC;

/// Errors produced while decoding a model container.
#[derive(Debug, Error)]
pub enum FormatError {
    /// A fixed field in the container header or a chunk header had the wrong
    /// value.
    #[error("invalid header field {field}: expected {expected:#x}, found {found:#x}")]
    InvalidHeader {
        field: &'static str,
        expected: u64,
        found: u64,
    },

    #[error("unexpected end of stream reading {what} at offset {offset:#x}")]
    Truncated { what: &'static str, offset: usize },

    #[error("{remaining} bytes left after the final chunk")]
    TrailingData { remaining: usize },

    #[error("unsupported model variant {0}")]
    UnknownVariant(u32),

    /// A chunk payload cannot hold a whole number of records.
    #[error("chunk length {len} is not a multiple of the record stride {stride}")]
    SizeMismatch { stride: usize, len: usize },

    #[error("missing required chunk {0}")]
    MissingChunk(FourCC),

    /// Submesh face counts overrun the flat face array.
    #[error("submesh face ranges end at {end} but only {total} faces are present")]
    FaceRangeOutOfBounds { end: usize, total: usize },

    #[error("error reading data: {0}")]
    Binrw(#[from] binrw::Error),

    #[error("error reading file: {0}")]
    Io(#[from] std::io::Error),
}
