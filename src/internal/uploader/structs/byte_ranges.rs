//! 源文件切分后的字节区间：块（block）与块内的片（chunk）。
//!
//! 数据均为 [`Bytes`] 切片，与源文件共享同一份内存，clone 不会复制数据。

use bytes::Bytes;

/// 块：源文件中一段连续字节，长度不超过配置的块大小。
#[derive(Debug, Clone)]
pub struct Block {
    /// 块序号，从 0 开始；合成文件时 ctx 列表按此排序
    pub index: usize,
    /// 该块在源文件中的起始偏移（字节）
    pub offset: u64,
    /// 该块的数据
    pub data: Bytes,
}

impl Block {
    /// 块长度（字节）。
    pub fn len(&self) -> u64 {
        self.data.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// 片：块内一段连续字节，一次请求上传一片。
#[derive(Debug, Clone)]
pub struct Chunk {
    /// 片在块内的序号
    pub index: usize,
    /// 该片在块内的起始偏移（字节）
    pub offset: u64,
    /// 该片的数据
    pub data: Bytes,
}

impl Chunk {
    pub fn len(&self) -> u64 {
        self.data.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
