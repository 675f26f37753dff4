//! Depth-bounded session stack shared by the writer and the reader.
//!
//! Writer and reader run the same abstract machine; only the meaning of the
//! per-entry position differs by direction. Keeping the stack in one type
//! keeps the depth bound, the begin/end balance, and the micro-chunk
//! exclusivity checks in one place so the two directions cannot drift apart.

use strata_proto::limits::MAX_CHUNK_DEPTH;
use strata_proto::{ChunkError, ChunkHeader, MicroChunkHeader, Result};

/// One open chunk.
#[derive(Debug, Clone, Copy)]
pub(crate) struct StackEntry {
    /// Write side: stream offset of the placeholder header.
    /// Read side: payload bytes consumed so far.
    pub pos: u64,
    /// Running header; the writer accumulates size and flag here until the
    /// backpatch, the reader carries the declared header.
    pub header: ChunkHeader,
}

/// The single open micro-chunk, if any.
#[derive(Debug, Clone, Copy)]
pub(crate) struct MicroState {
    /// Write side: stream offset of the placeholder micro-header.
    /// Read side: payload bytes consumed so far.
    pub pos: u64,
    /// Running micro-chunk header.
    pub header: MicroChunkHeader,
}

/// Session state: open chunks innermost-last, plus the micro slot.
///
/// The micro slot is mutually exclusive with pushing or popping ordinary
/// chunks: while a micro-chunk is open, only micro-chunk operations are
/// legal.
#[derive(Debug, Default)]
pub(crate) struct ChunkStack {
    entries: Vec<StackEntry>,
    micro: Option<MicroState>,
}

impl ChunkStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn depth(&self) -> usize {
        self.entries.len()
    }

    /// Error if opening one more chunk would exceed the depth bound.
    pub fn ensure_capacity(&self) -> Result<()> {
        if self.entries.len() >= MAX_CHUNK_DEPTH {
            return Err(ChunkError::DepthExceeded);
        }
        Ok(())
    }

    /// Error if a micro-chunk is open.
    pub fn ensure_no_micro(&self) -> Result<()> {
        if self.micro.is_some() {
            return Err(ChunkError::MicroChunkOpen);
        }
        Ok(())
    }

    pub fn push(&mut self, pos: u64, header: ChunkHeader) -> Result<()> {
        self.ensure_no_micro()?;
        self.ensure_capacity()?;
        self.entries.push(StackEntry { pos, header });
        Ok(())
    }

    pub fn pop(&mut self) -> Result<StackEntry> {
        self.ensure_no_micro()?;
        self.entries.pop().ok_or(ChunkError::NoOpenChunk)
    }

    pub fn top(&self) -> Option<&StackEntry> {
        self.entries.last()
    }

    pub fn top_mut(&mut self) -> Option<&mut StackEntry> {
        self.entries.last_mut()
    }

    pub fn in_micro(&self) -> bool {
        self.micro.is_some()
    }

    pub fn micro(&self) -> Option<&MicroState> {
        self.micro.as_ref()
    }

    pub fn micro_mut(&mut self) -> Option<&mut MicroState> {
        self.micro.as_mut()
    }

    pub fn enter_micro(&mut self, pos: u64, header: MicroChunkHeader) -> Result<()> {
        if self.entries.is_empty() {
            return Err(ChunkError::NoOpenChunk);
        }
        self.ensure_no_micro()?;
        self.micro = Some(MicroState { pos, header });
        Ok(())
    }

    pub fn exit_micro(&mut self) -> Result<MicroState> {
        self.micro.take().ok_or(ChunkError::NoOpenMicroChunk)
    }
}
