//! Format limits.
//!
//! The codec has no runtime configuration; everything tunable is a
//! compile-time constant here.

/// Maximum number of simultaneously open chunks in one session.
///
/// Chunk graphs are trees of bounded depth, not arbitrary recursive
/// structures. Attempting to open a 257th nested chunk is a protocol
/// violation on both the write and the read side.
pub const MAX_CHUNK_DEPTH: usize = 256;

/// Maximum payload of a single micro-chunk, in bytes.
///
/// The micro-chunk size field is a single byte, so the payload can never
/// exceed 255 bytes. Writing the 256th byte into an open micro-chunk is a
/// protocol violation.
pub const MICRO_CHUNK_MAX: usize = 255;
