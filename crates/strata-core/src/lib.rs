//! Push-down chunk codec over seekable byte streams.
//!
//! A [`ChunkWriter`] produces, and a [`ChunkReader`] parses, the nested
//! tagged-length container format defined in `strata-proto`. The two are
//! symmetric halves of the same wire format, not a live pipe: each instance
//! owns one direction over one stream for the length of a session.
//!
//! # Architecture
//!
//! Both directions run the same push-down machine over an explicit,
//! depth-bounded stack ([`stack`]):
//!
//! ```text
//! begin_chunk / open_chunk      push, depth + 1
//! end_chunk   / close_chunk     pop,  depth - 1
//! *_micro_chunk                 toggle the orthogonal micro slot
//! ```
//!
//! The writer's distinguishing trick is backpatching: headers are written as
//! placeholders when a chunk begins and rewritten with the final size when it
//! ends, so sizes accumulate bottom-up in a single pass. The reader enforces
//! the declared sizes instead, refusing any `read`/`seek` that would cross a
//! chunk or micro-chunk boundary.
//!
//! A session is balanced when it returns to depth 0 with no open
//! micro-chunk; anything else at end of session is a bug in the calling
//! code, and the per-operation preconditions surface it as a
//! [`ChunkError`] rather than producing a silently corrupt stream.
//!
//! # Concurrency
//!
//! Single-threaded, synchronous, blocking. A writer or reader exclusively
//! owns its stream for the session; independent sessions over distinct
//! streams are fully independent.
#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod reader;
mod stack;
pub mod writer;

pub use reader::ChunkReader;
pub use strata_proto::{ChunkError, ChunkHeader, MicroChunkHeader, Result};
pub use writer::ChunkWriter;
