//! Fuzz the header value types: decode must be total and encode must be
//! its exact inverse.
#![no_main]

use libfuzzer_sys::fuzz_target;
use strata_proto::{ChunkHeader, MicroChunkHeader};

fuzz_target!(|data: ([u8; 8], [u8; 2])| {
    let (chunk_bytes, micro_bytes) = data;

    let header = ChunkHeader::decode(chunk_bytes);
    assert_eq!(header.encode(), chunk_bytes);
    assert!(header.size() <= 0x7FFF_FFFF);

    let micro = MicroChunkHeader::decode(micro_bytes);
    assert_eq!(micro.encode(), micro_bytes);
});
