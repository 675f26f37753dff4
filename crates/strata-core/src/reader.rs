//! Chunk reader: sequential, depth-bounded traversal of a chunk stream.
//!
//! The reader exposes one open chunk (or micro-chunk) at a time. Callers
//! enumerate a container's children by looping [`ChunkReader::open_chunk`]
//! until it returns `false`, check [`ChunkReader::contains_chunks`] to
//! decide whether to recurse or [`ChunkReader::read`] raw payload, and pair
//! every open with a close even when they only consumed a prefix:
//! [`ChunkReader::close_chunk`] seeks over the unread remainder, which is
//! how unknown or obsolete chunk types are skipped.
//!
//! All reads are bounds-checked against the declared sizes; a request that
//! would cross a chunk or micro-chunk boundary is refused with `Ok(0)` and
//! no I/O, letting callers probe for optional trailing fields of an
//! evolving schema.

use std::io::{self, Read, Seek, SeekFrom};

use strata_proto::{
    ChunkError, ChunkHeader, MicroChunkHeader, Quaternion, Result, Vector2, Vector3, Vector4,
};
use tracing::trace;

use crate::stack::ChunkStack;

/// Stateful reader parsing a nested-chunk byte stream.
///
/// Dual of [`crate::ChunkWriter`]; the stream is exclusively owned for the
/// session and traversal is strictly forward apart from header lookahead.
#[derive(Debug)]
pub struct ChunkReader<R> {
    stream: R,
    stack: ChunkStack,
}

impl<R: Read + Seek> ChunkReader<R> {
    /// Wrap a seekable stream positioned at a chunk boundary.
    pub fn new(stream: R) -> Self {
        Self { stream, stack: ChunkStack::new() }
    }

    /// Give back the underlying stream.
    pub fn into_inner(self) -> R {
        self.stream
    }

    /// Open the next chunk at the current level.
    ///
    /// Returns `Ok(false)` when the enclosing chunk's payload is fully
    /// consumed (no more children at this level) or when the stream has no
    /// complete header left; both are the normal loop-termination
    /// condition, not errors.
    pub fn open_chunk(&mut self) -> Result<bool> {
        self.stack.ensure_no_micro()?;

        // Exhaustion is checked before the depth bound so that iterating
        // children of a maximally nested chunk still terminates with false
        // instead of erroring.
        if self.parent_exhausted() {
            return Ok(false);
        }
        self.stack.ensure_capacity()?;

        let Some(header) = self.read_header_or_eof()? else {
            return Ok(false);
        };
        self.stack.push(0, header)?;
        trace!(
            type_id = header.type_id(),
            size = header.size(),
            depth = self.stack.depth(),
            "open chunk"
        );
        Ok(true)
    }

    /// Non-destructive lookahead at the next chunk's `(type_id, size)`.
    ///
    /// The stream is rewound afterwards, so peeking any number of times
    /// does not change the outcome of a subsequent [`Self::open_chunk`].
    /// `Ok(None)` mirrors `open_chunk` returning `false`.
    pub fn peek_next_chunk(&mut self) -> Result<Option<(u32, u32)>> {
        self.stack.ensure_no_micro()?;

        if self.parent_exhausted() {
            return Ok(None);
        }
        self.stack.ensure_capacity()?;

        let Some(header) = self.read_header_or_eof()? else {
            return Ok(None);
        };
        self.stream.seek(SeekFrom::Current(-(ChunkHeader::SIZE as i64)))?;
        Ok(Some((header.type_id(), header.size())))
    }

    /// Close the innermost open chunk.
    ///
    /// Any unread remainder of the declared payload is seeked over, and the
    /// chunk's total (payload plus header) is added to the parent's
    /// consumed-bytes counter.
    pub fn close_chunk(&mut self) -> Result<()> {
        let entry = self.stack.pop()?;

        let size = u64::from(entry.header.size());
        if entry.pos < size {
            self.stream.seek(SeekFrom::Current((size - entry.pos) as i64))?;
        }

        if let Some(parent) = self.stack.top_mut() {
            parent.pos += size + ChunkHeader::SIZE as u64;
        }

        trace!(
            type_id = entry.header.type_id(),
            size = entry.header.size(),
            depth = self.stack.depth(),
            "close chunk"
        );
        Ok(())
    }

    /// Type id of the current chunk, or `None` at depth 0.
    pub fn current_chunk_id(&self) -> Option<u32> {
        self.stack.top().map(|entry| entry.header.type_id())
    }

    /// Declared payload length of the current chunk, or `None` at depth 0.
    pub fn current_chunk_length(&self) -> Option<u32> {
        self.stack.top().map(|entry| entry.header.size())
    }

    /// Whether the current chunk's payload is child chunks (`true`) or raw
    /// data (`false`); `None` at depth 0. Decides whether to recurse with
    /// more open/close pairs or to [`Self::read`].
    pub fn contains_chunks(&self) -> Option<bool> {
        self.stack.top().map(|entry| entry.header.has_subchunks())
    }

    /// Current nesting depth of open chunks.
    pub fn current_chunk_depth(&self) -> usize {
        self.stack.depth()
    }

    /// Open the next micro-chunk in the current chunk's payload.
    ///
    /// The 2-byte header is read through [`Self::read`], so exhaustion of
    /// the enclosing chunk surfaces as `Ok(false)`, the loop-termination
    /// condition when iterating micro-chunk fields.
    pub fn open_micro_chunk(&mut self) -> Result<bool> {
        self.stack.ensure_no_micro()?;

        let mut buf = [0u8; MicroChunkHeader::SIZE];
        if self.read(&mut buf)? != MicroChunkHeader::SIZE {
            return Ok(false);
        }
        self.stack.enter_micro(0, MicroChunkHeader::decode(buf))?;
        Ok(true)
    }

    /// Close the open micro-chunk, seeking over any unread remainder.
    pub fn close_micro_chunk(&mut self) -> Result<()> {
        let micro = self.stack.exit_micro()?;

        let size = u64::from(micro.header.size());
        if micro.pos < size {
            let remainder = size - micro.pos;
            self.stream.seek(SeekFrom::Current(remainder as i64))?;
            if let Some(top) = self.stack.top_mut() {
                top.pos += remainder;
            }
        }
        Ok(())
    }

    /// Type id of the open micro-chunk, or `None` when none is open.
    pub fn current_micro_chunk_id(&self) -> Option<u8> {
        self.stack.micro().map(|micro| micro.header.type_id())
    }

    /// Declared payload length of the open micro-chunk, or `None` when none
    /// is open.
    pub fn current_micro_chunk_length(&self) -> Option<u8> {
        self.stack.micro().map(|micro| micro.header.size())
    }

    /// Read exactly `buf.len()` payload bytes.
    ///
    /// Refuses with `Ok(0)` and no I/O if the request would cross the
    /// current chunk's boundary or, when a micro-chunk is open, the
    /// micro-chunk's boundary. On success both position counters advance.
    pub fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        if !self.fits_in_bounds(buf.len() as u64)? {
            return Ok(0);
        }
        self.stream.read_exact(buf)?;
        self.advance(buf.len() as u64);
        Ok(buf.len())
    }

    /// Skip `nbytes` payload bytes without copying them.
    ///
    /// Identical bounds checks as [`Self::read`]; used to step over a field
    /// without decoding it.
    pub fn seek(&mut self, nbytes: u64) -> Result<u64> {
        if !self.fits_in_bounds(nbytes)? {
            return Ok(0);
        }
        self.stream.seek(SeekFrom::Current(nbytes as i64))?;
        self.advance(nbytes);
        Ok(nbytes)
    }

    /// Read a [`Vector2`]; `None` when the bounds check refuses.
    pub fn read_vector2(&mut self) -> Result<Option<Vector2>> {
        let mut buf = [0u8; Vector2::SIZE];
        if self.read(&mut buf)? != Vector2::SIZE {
            return Ok(None);
        }
        Ok(Some(Vector2::decode(buf)))
    }

    /// Read a [`Vector3`]; `None` when the bounds check refuses.
    pub fn read_vector3(&mut self) -> Result<Option<Vector3>> {
        let mut buf = [0u8; Vector3::SIZE];
        if self.read(&mut buf)? != Vector3::SIZE {
            return Ok(None);
        }
        Ok(Some(Vector3::decode(buf)))
    }

    /// Read a [`Vector4`]; `None` when the bounds check refuses.
    pub fn read_vector4(&mut self) -> Result<Option<Vector4>> {
        let mut buf = [0u8; Vector4::SIZE];
        if self.read(&mut buf)? != Vector4::SIZE {
            return Ok(None);
        }
        Ok(Some(Vector4::decode(buf)))
    }

    /// Read a [`Quaternion`]; `None` when the bounds check refuses.
    pub fn read_quaternion(&mut self) -> Result<Option<Quaternion>> {
        let mut buf = [0u8; Quaternion::SIZE];
        if self.read(&mut buf)? != Quaternion::SIZE {
            return Ok(None);
        }
        Ok(Some(Quaternion::decode(buf)))
    }

    /// True when the enclosing chunk's declared payload is fully consumed.
    fn parent_exhausted(&self) -> bool {
        self.stack
            .top()
            .is_some_and(|parent| parent.pos >= u64::from(parent.header.size()))
    }

    /// Read one chunk header, mapping clean EOF / truncation to `None`.
    fn read_header_or_eof(&mut self) -> Result<Option<ChunkHeader>> {
        let mut buf = [0u8; ChunkHeader::SIZE];
        match self.stream.read_exact(&mut buf) {
            Ok(()) => Ok(Some(ChunkHeader::decode(buf))),
            Err(err) if err.kind() == io::ErrorKind::UnexpectedEof => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    /// Bounds check a read/seek of `n` bytes against the current chunk and,
    /// if open, the current micro-chunk. Requires an open chunk.
    fn fits_in_bounds(&self, n: u64) -> Result<bool> {
        let top = self.stack.top().ok_or(ChunkError::NoOpenChunk)?;
        // Compared against the remaining bytes rather than pos + n, which
        // could wrap for huge requests; pos never exceeds the declared size.
        if n > u64::from(top.header.size()) - top.pos {
            return Ok(false);
        }
        if let Some(micro) = self.stack.micro() {
            if n > u64::from(micro.header.size()) - micro.pos {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Advance the chunk and micro-chunk position counters.
    fn advance(&mut self, n: u64) {
        if let Some(top) = self.stack.top_mut() {
            top.pos += n;
        }
        if let Some(micro) = self.stack.micro_mut() {
            micro.pos += n;
        }
    }
}
