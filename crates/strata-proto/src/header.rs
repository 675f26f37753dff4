//! Chunk and micro-chunk header value types.
//!
//! The 8-byte chunk header is two little-endian 32-bit words: the type id,
//! then a packed word whose low 31 bits hold the payload size (header
//! excluded) and whose most significant bit marks a container chunk. All
//! bit manipulation lives behind the accessors here so the stream code in
//! `strata-core` never touches the flag bit directly.
//!
//! Layouts are compile-time verified via `zerocopy`; encode/decode never
//! allocate and cannot fail.

use zerocopy::little_endian::U32;
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout, Unaligned};

/// Bit 31 of the size word: set when the payload is a sequence of child
/// chunks rather than raw data.
const SUB_CHUNK_FLAG: u32 = 0x8000_0000;

/// Low 31 bits of the size word: payload byte count, header excluded.
const SIZE_MASK: u32 = 0x7FFF_FFFF;

/// On-wire layout of a chunk header.
#[derive(FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned)]
#[repr(C)]
struct RawChunkHeader {
    type_id: U32,
    size_and_flag: U32,
}

/// Descriptor of one chunk: caller-defined type id plus packed size/flag.
///
/// The size never includes the header's own bytes. Whether the payload is
/// raw data or child chunks is carried by the sub-chunk flag, queried via
/// [`ChunkHeader::has_subchunks`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ChunkHeader {
    type_id: u32,
    size_and_flag: u32,
}

impl ChunkHeader {
    /// Encoded size of a chunk header in bytes.
    pub const SIZE: usize = size_of::<RawChunkHeader>();

    /// New header with the given type id and payload size, data flavored.
    pub fn new(type_id: u32, size: u32) -> Self {
        Self { type_id, size_and_flag: size & SIZE_MASK }
    }

    /// Caller-defined chunk tag. Opaque to the codec.
    pub fn type_id(&self) -> u32 {
        self.type_id
    }

    /// Payload byte count, excluding this header.
    pub fn size(&self) -> u32 {
        self.size_and_flag & SIZE_MASK
    }

    /// Replace the payload size, preserving the sub-chunk flag.
    pub fn set_size(&mut self, size: u32) {
        self.size_and_flag = (self.size_and_flag & SUB_CHUNK_FLAG) | (size & SIZE_MASK);
    }

    /// Grow the payload size, preserving the sub-chunk flag.
    pub fn add_size(&mut self, add: u32) {
        self.set_size(self.size().wrapping_add(add));
    }

    /// True when the payload is a back-to-back sequence of child chunks.
    pub fn has_subchunks(&self) -> bool {
        self.size_and_flag & SUB_CHUNK_FLAG != 0
    }

    /// Set or clear the sub-chunk flag.
    pub fn set_has_subchunks(&mut self, on: bool) {
        if on {
            self.size_and_flag |= SUB_CHUNK_FLAG;
        } else {
            self.size_and_flag &= SIZE_MASK;
        }
    }

    /// Wire encoding: type id then size/flag word, both little endian.
    pub fn encode(&self) -> [u8; Self::SIZE] {
        let raw = RawChunkHeader {
            type_id: U32::new(self.type_id),
            size_and_flag: U32::new(self.size_and_flag),
        };
        zerocopy::transmute!(raw)
    }

    /// Parse a header from its wire encoding. Total, every bit pattern is a
    /// valid header.
    pub fn decode(bytes: [u8; Self::SIZE]) -> Self {
        let raw: RawChunkHeader = zerocopy::transmute!(bytes);
        Self { type_id: raw.type_id.get(), size_and_flag: raw.size_and_flag.get() }
    }
}

/// Descriptor of one micro-chunk: 8-bit type id, 8-bit payload size.
///
/// Micro-chunks are always data and always live inside the raw payload of
/// exactly one enclosing chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MicroChunkHeader {
    type_id: u8,
    size: u8,
}

impl MicroChunkHeader {
    /// Encoded size of a micro-chunk header in bytes.
    pub const SIZE: usize = 2;

    /// New micro-chunk header.
    pub fn new(type_id: u8, size: u8) -> Self {
        Self { type_id, size }
    }

    /// Caller-defined field tag.
    pub fn type_id(&self) -> u8 {
        self.type_id
    }

    /// Payload byte count, excluding this 2-byte header.
    pub fn size(&self) -> u8 {
        self.size
    }

    /// Grow the payload size.
    pub fn add_size(&mut self, add: u8) {
        self.size = self.size.wrapping_add(add);
    }

    /// Wire encoding: type id byte then size byte.
    pub fn encode(&self) -> [u8; Self::SIZE] {
        [self.type_id, self.size]
    }

    /// Parse a micro-chunk header from its wire encoding.
    pub fn decode(bytes: [u8; Self::SIZE]) -> Self {
        Self { type_id: bytes[0], size: bytes[1] }
    }
}

#[cfg(test)]
mod tests {
    use hex_literal::hex;
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn size_is_masked_to_31_bits() {
        let header = ChunkHeader::new(1, 0xFFFF_FFFF);
        assert_eq!(header.size(), 0x7FFF_FFFF);
        assert!(!header.has_subchunks());
    }

    #[test]
    fn flag_survives_set_size() {
        let mut header = ChunkHeader::new(7, 10);
        header.set_has_subchunks(true);
        header.set_size(42);
        assert!(header.has_subchunks());
        assert_eq!(header.size(), 42);

        header.set_has_subchunks(false);
        assert!(!header.has_subchunks());
        assert_eq!(header.size(), 42);
    }

    #[test]
    fn add_size_accumulates() {
        let mut header = ChunkHeader::new(1, 0);
        header.set_has_subchunks(true);
        header.add_size(8);
        header.add_size(4);
        assert_eq!(header.size(), 12);
        assert!(header.has_subchunks());
    }

    #[test]
    fn wire_encoding_is_little_endian_with_msb_flag() {
        let mut header = ChunkHeader::new(0x100, 12);
        header.set_has_subchunks(true);
        assert_eq!(header.encode(), hex!("00010000 0c000080"));

        let data = ChunkHeader::new(0x100, 10);
        assert_eq!(data.encode(), hex!("00010000 0a000000"));
    }

    #[test]
    fn decode_unpacks_size_and_flag() {
        let header = ChunkHeader::decode(hex!("00010000 0c000080"));
        assert_eq!(header.type_id(), 0x100);
        assert_eq!(header.size(), 12);
        assert!(header.has_subchunks());
    }

    #[test]
    fn micro_header_wire_encoding() {
        let header = MicroChunkHeader::new(5, 4);
        assert_eq!(header.encode(), hex!("0504"));
        assert_eq!(MicroChunkHeader::decode(hex!("0504")), header);
    }

    proptest! {
        #[test]
        fn prop_chunk_header_encode_decode_identity(bytes in any::<[u8; 8]>()) {
            let header = ChunkHeader::decode(bytes);
            prop_assert_eq!(header.encode(), bytes);
        }

        #[test]
        fn prop_decoded_size_never_exceeds_31_bits(bytes in any::<[u8; 8]>()) {
            let header = ChunkHeader::decode(bytes);
            prop_assert!(header.size() <= 0x7FFF_FFFF);
        }
    }
}
