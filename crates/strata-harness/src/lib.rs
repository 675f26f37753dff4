//! Round-trip test harness for the strata chunk codec.
//!
//! Provides an in-memory reference model of a chunk tree plus drivers that
//! feed it through a writer and verify it back through a reader, so
//! property tests can exercise both directions of the codec from a single
//! description of the expected structure.
#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod model;

pub use model::{ChunkNode, MicroField, check_forest, expected_size, write_forest};
