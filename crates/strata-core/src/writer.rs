//! Chunk writer: nested begin/end protocol with header backpatching.
//!
//! A chunk's size is not known until its contents have been written, so
//! [`ChunkWriter::begin_chunk`] emits a placeholder header and records its
//! offset; [`ChunkWriter::end_chunk`] seeks back, rewrites the header with
//! the accumulated size, and returns to the end of the stream. Closing a
//! chunk folds its total (payload plus header) into the parent's running
//! size, so the whole tree is sized in one pass.
//!
//! Opening a child chunk marks the parent as a container; from then on raw
//! [`ChunkWriter::write`] calls into the parent are protocol violations.
//! Micro-chunks use the same backpatch trick at one-byte granularity and
//! are counted as ordinary payload bytes of their enclosing chunk.

use std::io::{Seek, SeekFrom, Write};

use strata_proto::limits::MICRO_CHUNK_MAX;
use strata_proto::{
    ChunkError, ChunkHeader, MicroChunkHeader, Quaternion, Result, Vector2, Vector3, Vector4,
};
use tracing::trace;

use crate::stack::ChunkStack;

/// Stateful writer producing a well-formed nested-chunk byte stream.
///
/// The stream is exclusively owned for the session; pass `&mut` streams to
/// retain ownership at the call site. A session is balanced when every
/// `begin_chunk` has been matched by an `end_chunk` and no micro-chunk is
/// left open.
#[derive(Debug)]
pub struct ChunkWriter<W> {
    stream: W,
    stack: ChunkStack,
}

impl<W: Write + Seek> ChunkWriter<W> {
    /// Wrap a seekable stream for chunk writing.
    pub fn new(stream: W) -> Self {
        Self { stream, stack: ChunkStack::new() }
    }

    /// Give back the underlying stream.
    pub fn into_inner(self) -> W {
        self.stream
    }

    /// Begin a chunk with the given type id.
    ///
    /// If a parent chunk is open it becomes a container: its sub-chunk flag
    /// is set and raw writes into it are rejected from here on.
    pub fn begin_chunk(&mut self, type_id: u32) -> Result<()> {
        self.stack.ensure_no_micro()?;
        self.stack.ensure_capacity()?;

        if let Some(parent) = self.stack.top_mut() {
            parent.header.set_has_subchunks(true);
        }

        let pos = self.stream.stream_position()?;
        let header = ChunkHeader::new(type_id, 0);
        self.stack.push(pos, header)?;

        // Placeholder; end_chunk rewrites it with the final size and flag.
        self.stream.write_all(&header.encode())?;
        trace!(type_id, depth = self.stack.depth(), pos, "begin chunk");
        Ok(())
    }

    /// End the innermost open chunk, backpatching its header.
    ///
    /// The declared size is whatever was written; the writer trusts the
    /// caller to end chunks at the right time. An unfinished micro-chunk at
    /// this point is a protocol violation.
    pub fn end_chunk(&mut self) -> Result<()> {
        let entry = self.stack.pop()?;

        let end = self.stream.stream_position()?;
        self.stream.seek(SeekFrom::Start(entry.pos))?;
        self.stream.write_all(&entry.header.encode())?;
        self.stream.seek(SeekFrom::Start(end))?;

        // Fold payload plus header into the parent, so sizes accumulate
        // bottom-up without a second pass.
        if let Some(parent) = self.stack.top_mut() {
            parent.header.add_size(entry.header.size() + ChunkHeader::SIZE as u32);
        }

        trace!(
            type_id = entry.header.type_id(),
            size = entry.header.size(),
            depth = self.stack.depth(),
            "end chunk"
        );
        Ok(())
    }

    /// Begin a micro-chunk inside the currently open chunk.
    ///
    /// The 2-byte placeholder header goes through [`Self::write`] so it is
    /// counted toward the enclosing chunk's size like any other payload.
    pub fn begin_micro_chunk(&mut self, type_id: u8) -> Result<()> {
        if self.stack.depth() == 0 {
            return Err(ChunkError::NoOpenChunk);
        }
        self.stack.ensure_no_micro()?;

        let header = MicroChunkHeader::new(type_id, 0);
        let pos = self.stream.stream_position()?;
        self.write(&header.encode())?;
        self.stack.enter_micro(pos, header)?;
        Ok(())
    }

    /// End the open micro-chunk, backpatching its header.
    pub fn end_micro_chunk(&mut self) -> Result<()> {
        let micro = self.stack.exit_micro()?;

        let end = self.stream.stream_position()?;
        self.stream.seek(SeekFrom::Start(micro.pos))?;
        self.stream.write_all(&micro.header.encode())?;
        self.stream.seek(SeekFrom::Start(end))?;
        Ok(())
    }

    /// Write raw payload bytes into the open chunk.
    ///
    /// Rejected when no chunk is open or the open chunk is a container. If a
    /// micro-chunk is open the bytes count toward it too, and the 255-byte
    /// ceiling is enforced before anything reaches the stream so a refused
    /// write leaves the file consistent.
    ///
    /// Returns the number of bytes written, which is always `buf.len()` on
    /// success.
    pub fn write(&mut self, buf: &[u8]) -> Result<usize> {
        let top = self.stack.top().ok_or(ChunkError::NoOpenChunk)?;
        if top.header.has_subchunks() {
            return Err(ChunkError::DataInContainerChunk { type_id: top.header.type_id() });
        }
        if let Some(micro) = self.stack.micro() {
            let attempted = micro.header.size() as usize + buf.len();
            if attempted > MICRO_CHUNK_MAX {
                return Err(ChunkError::MicroChunkOverflow { attempted });
            }
        }

        self.stream.write_all(buf)?;

        if let Some(top) = self.stack.top_mut() {
            top.header.add_size(buf.len() as u32);
        }
        if let Some(micro) = self.stack.micro_mut() {
            micro.header.add_size(buf.len() as u8);
        }
        Ok(buf.len())
    }

    /// Write a [`Vector2`] as payload bytes.
    pub fn write_vector2(&mut self, v: &Vector2) -> Result<usize> {
        self.write(&v.encode())
    }

    /// Write a [`Vector3`] as payload bytes.
    pub fn write_vector3(&mut self, v: &Vector3) -> Result<usize> {
        self.write(&v.encode())
    }

    /// Write a [`Vector4`] as payload bytes.
    pub fn write_vector4(&mut self, v: &Vector4) -> Result<usize> {
        self.write(&v.encode())
    }

    /// Write a [`Quaternion`] as payload bytes.
    pub fn write_quaternion(&mut self, q: &Quaternion) -> Result<usize> {
        self.write(&q.encode())
    }

    /// Write one complete micro-chunk: begin, payload, end.
    pub fn write_micro_chunk(&mut self, type_id: u8, data: &[u8]) -> Result<()> {
        self.begin_micro_chunk(type_id)?;
        self.write(data)?;
        self.end_micro_chunk()
    }

    /// Current nesting depth of open chunks.
    pub fn current_chunk_depth(&self) -> usize {
        self.stack.depth()
    }
}
