use bytes::Bytes;
use rand::Rng;

use crate::uploader::functions::{split_blocks, split_chunks, validate_sizes};
use crate::uploader::{DEFAULT_BLOCK_SIZE, DEFAULT_CHUNK_SIZE, UploadError};

#[test]
fn test_split_five_megabytes_with_default_sizes() {
    let data = Bytes::from(vec![0u8; 5_000_000]);
    let blocks = split_blocks(&data, DEFAULT_BLOCK_SIZE).unwrap();

    assert_eq!(blocks.len(), 2);
    assert_eq!(blocks[0].offset, 0);
    assert_eq!(blocks[0].len(), 4_194_304);
    assert_eq!(blocks[1].offset, 4_194_304);
    assert_eq!(blocks[1].len(), 805_696);

    let first = split_chunks(&blocks[0], DEFAULT_CHUNK_SIZE).unwrap();
    assert_eq!(first.len(), 16);
    assert!(first.iter().all(|c| c.len() == 262_144));

    let second = split_chunks(&blocks[1], DEFAULT_CHUNK_SIZE).unwrap();
    assert_eq!(second.len(), 4);
    assert_eq!(second[3].len(), 805_696 - 3 * 262_144);
    assert_eq!(second[3].offset, 3 * 262_144);
}

#[test]
fn test_split_covers_source_without_overlap() {
    for len in [1usize, 7, 8, 9, 63, 64, 65, 1000] {
        for size in [1u64, 3, 8, 64] {
            let data = Bytes::from(vec![7u8; len]);
            let blocks = split_blocks(&data, size).unwrap();

            assert_eq!(blocks.len(), len.div_ceil(size as usize), "len={len} size={size}");
            assert_eq!(blocks.iter().map(|b| b.len()).sum::<u64>(), len as u64);

            let mut expected_offset = 0;
            for (i, block) in blocks.iter().enumerate() {
                assert_eq!(block.index, i);
                assert_eq!(block.offset, expected_offset);
                assert!(block.len() <= size && !block.is_empty());
                expected_offset += block.len();
            }
        }
    }
}

#[test]
fn test_chunks_reassemble_block_content() {
    let mut rng = rand::thread_rng();
    let raw: Vec<u8> = (0..10_000).map(|_| rng.r#gen()).collect();
    let data = Bytes::from(raw.clone());

    let mut rebuilt = Vec::with_capacity(raw.len());
    for block in split_blocks(&data, 4096).unwrap() {
        let chunks = split_chunks(&block, 1000).unwrap();
        let mut in_block = 0;
        for chunk in chunks {
            assert_eq!(chunk.offset, in_block);
            in_block += chunk.len();
            rebuilt.extend_from_slice(&chunk.data);
        }
        assert_eq!(in_block, block.len());
    }

    assert_eq!(rebuilt, raw);
}

#[test]
fn test_empty_source_has_no_blocks() {
    let blocks = split_blocks(&Bytes::new(), DEFAULT_BLOCK_SIZE).unwrap();
    assert!(blocks.is_empty());
}

#[test]
fn test_zero_sizes_are_rejected() {
    let data = Bytes::from_static(b"abc");
    assert!(matches!(
        split_blocks(&data, 0),
        Err(UploadError::Configuration(_))
    ));

    let block = split_blocks(&data, 2).unwrap().remove(0);
    assert!(matches!(
        split_chunks(&block, 0),
        Err(UploadError::Configuration(_))
    ));

    assert!(matches!(
        validate_sizes(0, 1),
        Err(UploadError::Configuration(_))
    ));
    assert!(matches!(
        validate_sizes(4, 0),
        Err(UploadError::Configuration(_))
    ));
}

#[test]
fn test_chunk_larger_than_block_is_rejected() {
    assert!(matches!(
        validate_sizes(4, 8),
        Err(UploadError::Configuration(_))
    ));
    assert!(validate_sizes(8, 8).is_ok());
    assert!(validate_sizes(DEFAULT_BLOCK_SIZE, DEFAULT_CHUNK_SIZE).is_ok());
}
