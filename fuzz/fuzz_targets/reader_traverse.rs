//! Fuzz the reader's full traversal path over arbitrary bytes.
//!
//! Any input must either parse or be rejected with an error; panics,
//! unbounded recursion, and out-of-bounds reads are the bugs this target
//! hunts.
#![no_main]

use std::io::Cursor;

use libfuzzer_sys::fuzz_target;
use strata_core::{ChunkReader, Result};

fuzz_target!(|data: &[u8]| {
    let mut reader = ChunkReader::new(Cursor::new(data));
    let _ = walk(&mut reader);
});

fn walk(reader: &mut ChunkReader<Cursor<&[u8]>>) -> Result<()> {
    while reader.open_chunk()? {
        if reader.contains_chunks() == Some(true) {
            walk(reader)?;
        } else {
            let mut scratch = [0u8; 16];
            while reader.open_micro_chunk()? {
                let _ = reader.read(&mut scratch)?;
                reader.close_micro_chunk()?;
            }
        }
        reader.close_chunk()?;
    }
    Ok(())
}
