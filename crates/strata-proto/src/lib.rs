//! Wire format for the strata chunk container.
//!
//! Strata files are hierarchical, IFF-style containers. Every region of the
//! stream is wrapped in an 8-byte chunk header carrying a caller-defined
//! 32-bit type id and a 31-bit payload size; the most significant bit of the
//! size word marks whether the payload is raw data or a sequence of child
//! chunks. A chunk holds one or the other, never both.
//!
//! Inside a data chunk, individual scalar fields can be wrapped in
//! "micro-chunks": a 2-byte header (8-bit type id, 8-bit size) that lets a
//! schema grow new fields without paying for a full chunk header. Micro-chunks
//! never nest and are counted as ordinary payload bytes of their enclosing
//! chunk.
//!
//! This crate defines the header value types, the fixed-size vector payload
//! conveniences, the error taxonomy, and the format limits. The stateful
//! writer and reader live in `strata-core`.
#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod errors;
pub mod header;
pub mod limits;
pub mod vector;

pub use errors::{ChunkError, Result};
pub use header::{ChunkHeader, MicroChunkHeader};
pub use vector::{Quaternion, Vector2, Vector3, Vector4};
