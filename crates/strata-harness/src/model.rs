//! In-memory reference model of a chunk tree.
//!
//! The node shape mirrors the wire invariant structurally: a chunk is
//! either data (raw bytes, optionally organized as micro-chunk fields) or
//! a container of child chunks, never both. Writing a model through a
//! [`ChunkWriter`] and checking it back through a [`ChunkReader`] verifies
//! type ids, declared sizes, the sub-chunk flag, payload bytes, and the
//! nesting structure in one pass.

use std::io::{Read, Seek, Write};

use strata_core::{ChunkReader, ChunkWriter, Result};
use strata_proto::{ChunkHeader, MicroChunkHeader};

/// One micro-chunk field inside a data chunk. Payload must fit the
/// 255-byte micro-chunk ceiling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MicroField {
    /// 8-bit field tag.
    pub type_id: u8,
    /// Field payload, at most 255 bytes.
    pub bytes: Vec<u8>,
}

/// One chunk in the reference tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChunkNode {
    /// Data chunk: raw leading bytes followed by micro-chunk fields.
    Data {
        /// 32-bit chunk tag.
        type_id: u32,
        /// Raw payload written before any micro-chunk fields.
        bytes: Vec<u8>,
        /// Micro-chunk fields appended after the raw payload.
        micros: Vec<MicroField>,
    },
    /// Container chunk holding child chunks. Must have at least one child
    /// to be distinguishable from an empty data chunk on the wire.
    Container {
        /// 32-bit chunk tag.
        type_id: u32,
        /// Child chunks in order.
        children: Vec<ChunkNode>,
    },
}

/// Payload size this node will declare on the wire, excluding its own
/// header.
pub fn expected_size(node: &ChunkNode) -> u32 {
    match node {
        ChunkNode::Data { bytes, micros, .. } => {
            let micro_total: usize = micros
                .iter()
                .map(|m| MicroChunkHeader::SIZE + m.bytes.len())
                .sum();
            (bytes.len() + micro_total) as u32
        },
        ChunkNode::Container { children, .. } => children
            .iter()
            .map(|child| ChunkHeader::SIZE as u32 + expected_size(child))
            .sum(),
    }
}

/// Write a sequence of sibling chunks through the writer.
pub fn write_forest<W: Write + Seek>(
    writer: &mut ChunkWriter<W>,
    nodes: &[ChunkNode],
) -> Result<()> {
    for node in nodes {
        match node {
            ChunkNode::Data { type_id, bytes, micros } => {
                writer.begin_chunk(*type_id)?;
                if !bytes.is_empty() {
                    writer.write(bytes)?;
                }
                for micro in micros {
                    writer.write_micro_chunk(micro.type_id, &micro.bytes)?;
                }
                writer.end_chunk()?;
            },
            ChunkNode::Container { type_id, children } => {
                writer.begin_chunk(*type_id)?;
                write_forest(writer, children)?;
                writer.end_chunk()?;
            },
        }
    }
    Ok(())
}

/// Read a sequence of sibling chunks back and assert they match the model.
///
/// Panics on any mismatch (test harness); returns `Err` only for codec
/// errors.
pub fn check_forest<R: Read + Seek>(
    reader: &mut ChunkReader<R>,
    nodes: &[ChunkNode],
) -> Result<()> {
    for node in nodes {
        assert!(reader.open_chunk()?, "expected another sibling chunk");
        match node {
            ChunkNode::Data { type_id, bytes, micros } => {
                assert_eq!(reader.current_chunk_id(), Some(*type_id));
                assert_eq!(reader.contains_chunks(), Some(false));
                assert_eq!(reader.current_chunk_length(), Some(expected_size(node)));

                let mut read_back = vec![0u8; bytes.len()];
                if !bytes.is_empty() {
                    assert_eq!(reader.read(&mut read_back)?, bytes.len());
                }
                assert_eq!(&read_back, bytes);

                for micro in micros {
                    assert!(reader.open_micro_chunk()?, "expected another micro-chunk");
                    assert_eq!(reader.current_micro_chunk_id(), Some(micro.type_id));
                    assert_eq!(
                        reader.current_micro_chunk_length(),
                        Some(micro.bytes.len() as u8)
                    );

                    let mut field = vec![0u8; micro.bytes.len()];
                    if !micro.bytes.is_empty() {
                        assert_eq!(reader.read(&mut field)?, micro.bytes.len());
                    }
                    assert_eq!(&field, &micro.bytes);
                    reader.close_micro_chunk()?;
                }
                assert!(!reader.open_micro_chunk()?, "unexpected trailing micro-chunk");
            },
            ChunkNode::Container { type_id, children } => {
                assert_eq!(reader.current_chunk_id(), Some(*type_id));
                assert_eq!(reader.contains_chunks(), Some(true));
                assert_eq!(reader.current_chunk_length(), Some(expected_size(node)));

                check_forest(reader, children)?;
                assert!(!reader.open_chunk()?, "unexpected extra child chunk");
            },
        }
        reader.close_chunk()?;
    }
    Ok(())
}
