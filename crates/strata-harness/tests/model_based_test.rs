//! Model-based property tests.
//!
//! These tests generate random chunk trees, write them through the real
//! writer, and verify the produced bytes through the real reader against
//! the reference model.
//!
//! ```text
//! proptest generates: Vec<ChunkNode>
//!                          │
//!            write_forest  ▼  check_forest
//!      ChunkWriter ──► wire bytes ──► ChunkReader
//! ```

use std::io::Cursor;

use proptest::prelude::*;
use strata_core::{ChunkReader, ChunkWriter};
use strata_harness::{ChunkNode, MicroField, check_forest, expected_size, write_forest};

fn roundtrip(forest: &[ChunkNode]) -> Vec<u8> {
    let mut writer = ChunkWriter::new(Cursor::new(Vec::new()));
    write_forest(&mut writer, forest).expect("writing a valid model never fails");
    assert_eq!(writer.current_chunk_depth(), 0);
    writer.into_inner().into_inner()
}

fn micro_field_strategy() -> impl Strategy<Value = MicroField> {
    (any::<u8>(), prop::collection::vec(any::<u8>(), 0..=32))
        .prop_map(|(type_id, bytes)| MicroField { type_id, bytes })
}

fn node_strategy() -> impl Strategy<Value = ChunkNode> {
    let leaf = (
        any::<u32>(),
        prop::collection::vec(any::<u8>(), 0..48),
        prop::collection::vec(micro_field_strategy(), 0..4),
    )
        .prop_map(|(type_id, bytes, micros)| ChunkNode::Data { type_id, bytes, micros });

    // Containers must hold at least one child; an empty container is
    // indistinguishable from an empty data chunk on the wire.
    leaf.prop_recursive(4, 24, 4, |inner| {
        (any::<u32>(), prop::collection::vec(inner, 1..4))
            .prop_map(|(type_id, children)| ChunkNode::Container { type_id, children })
    })
}

fn forest_strategy() -> impl Strategy<Value = Vec<ChunkNode>> {
    prop::collection::vec(node_strategy(), 0..4)
}

proptest! {
    /// Any tree of nested chunks reads back with identical type ids,
    /// sizes, flags, payload bytes, and structure.
    #[test]
    fn prop_round_trip(forest in forest_strategy()) {
        let bytes = roundtrip(&forest);

        let mut reader = ChunkReader::new(Cursor::new(&bytes[..]));
        check_forest(&mut reader, &forest).expect("checking a freshly written stream");

        // Well-formed stream: nothing after the last top-level chunk.
        prop_assert!(!reader.open_chunk().expect("eof probe"));
        prop_assert_eq!(reader.current_chunk_depth(), 0);
    }

    /// The bytes a tree occupies on the wire are exactly predictable from
    /// the model: every declared size matches the recursive sum of child
    /// headers and payloads.
    #[test]
    fn prop_size_accounting(forest in forest_strategy()) {
        let bytes = roundtrip(&forest);

        let total: u64 = forest
            .iter()
            .map(|node| 8 + u64::from(expected_size(node)))
            .sum();
        prop_assert_eq!(bytes.len() as u64, total);
    }

    /// Peeking is non-destructive: any number of peeks report the same
    /// header and do not disturb the subsequent open.
    #[test]
    fn prop_peek_matches_open(forest in forest_strategy(), peeks in 1..4usize) {
        prop_assume!(!forest.is_empty());
        let bytes = roundtrip(&forest);

        let mut reader = ChunkReader::new(Cursor::new(&bytes[..]));
        let first = reader.peek_next_chunk().expect("peek");
        for _ in 1..peeks {
            prop_assert_eq!(reader.peek_next_chunk().expect("repeat peek"), first);
        }

        prop_assert!(reader.open_chunk().expect("open after peek"));
        let (peeked_id, peeked_size) = first.expect("non-empty forest has a first chunk");
        prop_assert_eq!(reader.current_chunk_id(), Some(peeked_id));
        prop_assert_eq!(reader.current_chunk_length(), Some(peeked_size));
    }

    /// Closing a chunk after reading only a prefix of its payload still
    /// lands on the next sibling.
    #[test]
    fn prop_prefix_read_tolerated(
        first_payload in prop::collection::vec(any::<u8>(), 1..64),
        read_len in any::<prop::sample::Index>(),
        second_id in any::<u32>(),
    ) {
        let forest = vec![
            ChunkNode::Data { type_id: 1, bytes: first_payload.clone(), micros: vec![] },
            ChunkNode::Data { type_id: second_id, bytes: vec![0xEE; 4], micros: vec![] },
        ];
        let bytes = roundtrip(&forest);

        let mut reader = ChunkReader::new(Cursor::new(&bytes[..]));
        prop_assert!(reader.open_chunk().expect("open first"));

        let take = read_len.index(first_payload.len() + 1);
        let mut prefix = vec![0u8; take];
        if take > 0 {
            prop_assert_eq!(reader.read(&mut prefix).expect("prefix read"), take);
            prop_assert_eq!(&prefix[..], &first_payload[..take]);
        }
        reader.close_chunk().expect("close after prefix");

        prop_assert!(reader.open_chunk().expect("open second"));
        prop_assert_eq!(reader.current_chunk_id(), Some(second_id));
    }
}

mod smoke_tests {
    use super::*;

    /// Hand-built tree covering data, container, and micro nodes at once.
    #[test]
    fn mixed_tree_round_trips() {
        let forest = vec![
            ChunkNode::Container {
                type_id: 0x700,
                children: vec![
                    ChunkNode::Data {
                        type_id: 0x701,
                        bytes: vec![1, 2, 3],
                        micros: vec![
                            MicroField { type_id: 1, bytes: vec![0xAA] },
                            MicroField { type_id: 2, bytes: vec![] },
                        ],
                    },
                    ChunkNode::Container {
                        type_id: 0x702,
                        children: vec![ChunkNode::Data {
                            type_id: 0x703,
                            bytes: vec![],
                            micros: vec![],
                        }],
                    },
                ],
            },
            ChunkNode::Data { type_id: 0x704, bytes: vec![9; 40], micros: vec![] },
        ];

        let bytes = roundtrip(&forest);
        let mut reader = ChunkReader::new(Cursor::new(&bytes[..]));
        check_forest(&mut reader, &forest).expect("mixed tree checks out");
        assert!(!reader.open_chunk().expect("eof"));
    }

    /// A 255-byte micro-chunk payload is the documented ceiling and must
    /// survive the trip exactly.
    #[test]
    fn micro_ceiling_round_trips() {
        let payload: Vec<u8> = (0..=254u8).collect();
        let forest = vec![ChunkNode::Data {
            type_id: 0x10,
            bytes: vec![],
            micros: vec![MicroField { type_id: 0xFE, bytes: payload }],
        }];

        let bytes = roundtrip(&forest);
        let mut reader = ChunkReader::new(Cursor::new(&bytes[..]));
        check_forest(&mut reader, &forest).expect("ceiling payload checks out");
    }

    /// An empty stream is a valid, empty session.
    #[test]
    fn empty_stream_is_valid() {
        let bytes = roundtrip(&[]);
        assert!(bytes.is_empty());

        let mut reader = ChunkReader::new(Cursor::new(&bytes[..]));
        assert!(!reader.open_chunk().expect("eof on empty stream"));
    }
}
