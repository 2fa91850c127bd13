//! 切分源文件：文件 → 块，块 → 片。纯函数，无副作用。

use std::ops::Range;

use bytes::Bytes;

use crate::internal::uploader::structs::{Block, Chunk, UploadError};

/// 按 `block_size` 把源文件切成有序的块，完整覆盖且不重叠；最后一块可能较短。
///
/// 空文件得到空列表。
pub fn split_blocks(data: &Bytes, block_size: u64) -> Result<Vec<Block>, UploadError> {
    let step = piece_size(block_size, "block_size")?;
    let blocks = ranges(data.len(), step)
        .enumerate()
        .map(|(index, range)| Block {
            index,
            offset: range.start as u64,
            data: data.slice(range),
        })
        .collect();
    Ok(blocks)
}

/// 按 `chunk_size` 把一个块切成有序的片；片的偏移相对于块起点。
pub fn split_chunks(block: &Block, chunk_size: u64) -> Result<Vec<Chunk>, UploadError> {
    let step = piece_size(chunk_size, "chunk_size")?;
    let chunks = ranges(block.data.len(), step)
        .enumerate()
        .map(|(index, range)| Chunk {
            index,
            offset: range.start as u64,
            data: block.data.slice(range),
        })
        .collect();
    Ok(chunks)
}

/// 校验块/片大小：必须为正整数，且片不能大于块。
pub fn validate_sizes(block_size: u64, chunk_size: u64) -> Result<(), UploadError> {
    piece_size(block_size, "block_size")?;
    piece_size(chunk_size, "chunk_size")?;
    if chunk_size > block_size {
        return Err(UploadError::Configuration(format!(
            "chunk_size ({chunk_size}) 不能大于 block_size ({block_size})"
        )));
    }
    Ok(())
}

fn piece_size(size: u64, field: &str) -> Result<usize, UploadError> {
    if size == 0 {
        return Err(UploadError::Configuration(format!("{field} 必须为正整数")));
    }
    usize::try_from(size)
        .map_err(|_| UploadError::Configuration(format!("{field} 超出平台可寻址范围")))
}

/// `[0, len)` 按 `step` 切出的连续区间，`end` 为不含上界。
fn ranges(len: usize, step: usize) -> impl Iterator<Item = Range<usize>> {
    (0..len)
        .step_by(step)
        .map(move |start| start..(start.saturating_add(step)).min(len))
}
