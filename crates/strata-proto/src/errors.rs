//! Error types for the chunk codec.
//!
//! Two kinds of failure exist:
//!
//! - **Protocol violations** are caller bugs: unbalanced begin/end pairs,
//!   raw writes into a container chunk, nested micro-chunks, blown limits.
//!   They are always-checked errors, never debug-only assertions, because a
//!   codec that silently disables its safety checks produces corrupt files.
//! - **I/O failures** are environmental and recoverable at the caller's
//!   discretion; they carry the underlying [`std::io::Error`].
//!
//! Reader bounds refusals (a `read`/`seek` that would cross a chunk or
//! micro-chunk boundary) are deliberately NOT errors; those return `Ok(0)`
//! from the operation so callers can probe for optional trailing fields.

use thiserror::Error;

use crate::limits::{MAX_CHUNK_DEPTH, MICRO_CHUNK_MAX};

/// Result alias used throughout the codec.
pub type Result<T> = std::result::Result<T, ChunkError>;

/// Errors produced by the chunk writer and reader.
#[derive(Debug, Error)]
pub enum ChunkError {
    /// Opening another chunk would exceed [`MAX_CHUNK_DEPTH`].
    #[error("chunk nesting deeper than the {MAX_CHUNK_DEPTH} level limit")]
    DepthExceeded,

    /// The operation requires an open chunk and none is.
    #[error("no chunk is currently open")]
    NoOpenChunk,

    /// Raw data was written into a chunk that already contains sub-chunks.
    ///
    /// A chunk's payload is either raw bytes or child chunks, never both.
    #[error("chunk {type_id:#010x} contains sub-chunks and cannot hold raw data")]
    DataInContainerChunk {
        /// Type id of the offending container chunk.
        type_id: u32,
    },

    /// A micro-chunk is open where none may be.
    ///
    /// Micro-chunks never nest, and an unfinished micro-chunk must not span
    /// a chunk boundary.
    #[error("a micro-chunk is still open")]
    MicroChunkOpen,

    /// The operation requires an open micro-chunk and none is.
    #[error("no micro-chunk is currently open")]
    NoOpenMicroChunk,

    /// A write would push the open micro-chunk past [`MICRO_CHUNK_MAX`].
    ///
    /// Checked before any bytes reach the stream, so the file is still
    /// consistent when this fires.
    #[error("micro-chunk payload would reach {attempted} bytes ({MICRO_CHUNK_MAX} max)")]
    MicroChunkOverflow {
        /// Payload size the write would have produced.
        attempted: usize,
    },

    /// The underlying byte stream failed.
    #[error("stream I/O failed")]
    Io(#[from] std::io::Error),
}

impl ChunkError {
    /// True for errors that indicate a bug in the calling code rather than
    /// an environmental failure.
    pub fn is_protocol_violation(&self) -> bool {
        !matches!(self, Self::Io(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_errors_are_not_protocol_violations() {
        let io = ChunkError::from(std::io::Error::other("boom"));
        assert!(!io.is_protocol_violation());
        assert!(ChunkError::NoOpenChunk.is_protocol_violation());
        assert!(ChunkError::MicroChunkOverflow { attempted: 300 }.is_protocol_violation());
    }

    #[test]
    fn display_names_the_offending_chunk() {
        let err = ChunkError::DataInContainerChunk { type_id: 0x100 };
        assert_eq!(
            err.to_string(),
            "chunk 0x00000100 contains sub-chunks and cannot hold raw data"
        );
    }
}
