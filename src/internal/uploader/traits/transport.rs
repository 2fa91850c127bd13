//! 传输层 trait：分片上传协议的三个接口（mkblk / bput / mkfile）。
//!
//! 默认实现见 [`HttpTransport`](crate::internal::uploader::impl_traits::impl_transport::HttpTransport)；
//! 上传器只依赖本 trait，便于替换成其他 HTTP 客户端或测试桩。

use async_trait::async_trait;
use bytes::Bytes;

use crate::internal::auth::structs::upload_token::ResolvedToken;
use crate::internal::uploader::structs::{ChunkResult, FileCreated, UploadError};

#[async_trait]
pub trait UploadTransport: Send + Sync {
    /// 创建块并上传第一片：`POST {host}/mkblk/{block_size}`，请求体为第一片数据。
    async fn make_block(
        &self,
        host: &str,
        block_size: u64,
        first_chunk: Bytes,
        token: &ResolvedToken,
    ) -> Result<ChunkResult, UploadError>;

    /// 上传块内后续的片：`POST {host}/bput/{ctx}/{offset}`，`ctx` 与 `offset` 来自上一片的响应。
    async fn put_chunk(
        &self,
        host: &str,
        ctx: &str,
        offset: u64,
        chunk: Bytes,
        token: &ResolvedToken,
    ) -> Result<ChunkResult, UploadError>;

    /// 合成文件：`POST {host}/mkfile/{file_size}/key/{encoded_key}`，请求体为逗号分隔的 ctx 列表。
    async fn make_file(
        &self,
        host: &str,
        file_size: u64,
        encoded_key: &str,
        ctx_list: String,
        token: &ResolvedToken,
    ) -> Result<FileCreated, UploadError>;
}
