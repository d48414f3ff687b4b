//! Error types for BIFF record stream operations.

use thiserror::Error;

/// Result type alias for BIFF record stream operations
pub type BiffResult<T> = std::result::Result<T, BiffError>;

/// Errors that can occur while reading or writing a BIFF record stream
#[derive(Error, Debug)]
pub enum BiffError {
    /// A chunk header declares more payload bytes than the source holds
    #[error(
        "chunk 0x{sid:04X} declares {declared} payload bytes but only {available} remain in the source"
    )]
    TruncatedChunk {
        /// Record type id from the offending header
        sid: u16,
        /// Declared payload length
        declared: usize,
        /// Bytes actually left in the source
        available: usize,
    },

    /// Fewer than four bytes left where a chunk header was expected
    #[error("truncated chunk header: need 4 bytes, found {available}")]
    TruncatedHeader {
        /// Bytes left in the source
        available: usize,
    },

    /// A CONTINUE chunk appeared with no preceding record to continue
    #[error("continuation chunk with no preceding record at offset {offset}")]
    OrphanContinuation {
        /// Byte offset of the offending header
        offset: usize,
    },

    /// A read requested more bytes than the current logical record holds
    #[error(
        "read of {requested} bytes past the end of record 0x{sid:04X} ({remaining} bytes remaining)"
    )]
    ReadPastRecordEnd {
        /// Record type id of the open record
        sid: u16,
        /// Bytes the caller asked for
        requested: usize,
        /// Bytes actually left in the logical record
        remaining: usize,
    },

    /// A record parser consumed fewer bytes than the chunk declared (strict mode)
    #[error(
        "record 0x{sid:04X} declared {declared} payload bytes but the parser consumed {consumed}"
    )]
    PayloadSizeMismatch {
        /// Record type id
        sid: u16,
        /// Declared payload length
        declared: usize,
        /// Bytes the parser actually consumed
        consumed: usize,
    },

    /// A record's write path emitted a different byte count than its size report
    #[error("record 0x{sid:04X} reported a serialized size of {declared} bytes but wrote {written}")]
    SerializedSizeMismatch {
        /// Record type id
        sid: u16,
        /// Size the record reported
        declared: usize,
        /// Bytes it actually wrote
        written: usize,
    },

    /// A record payload failed structural validation
    #[error("invalid record 0x{sid:04X}: {message}")]
    InvalidRecord {
        /// Record type id
        sid: u16,
        /// Error description
        message: String,
    },

    /// Text decoding error
    #[error("encoding error: {0}")]
    Encoding(String),

    /// IO error from the underlying byte source or sink
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
