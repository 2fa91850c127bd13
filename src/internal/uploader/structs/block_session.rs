//! 单块上传：块内各片严格串行，每一片都依赖上一片响应里的 ctx。

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{debug, warn};

use crate::internal::auth::structs::upload_token::ResolvedToken;
use crate::internal::uploader::functions::split_blocks::split_chunks;
use crate::internal::uploader::traits::transport::UploadTransport;

use super::{Block, Chunk, ChunkResult, UploadError};

/// 一次文件上传中所有块共享的请求上下文。
#[derive(Clone)]
pub(crate) struct RequestContext {
    pub(crate) transport: Arc<dyn UploadTransport>,
    pub(crate) token: ResolvedToken,
    /// 配置的上传地址（已去掉结尾的 `/`）
    pub(crate) host: Arc<str>,
    /// 协作式取消标志：某一块失败后置位，其余块在发出下一个请求前检查
    pub(crate) cancel_requested: Arc<AtomicBool>,
}

impl RequestContext {
    pub(crate) fn request_cancel(&self) {
        self.cancel_requested.store(true, Ordering::Relaxed);
    }

    pub(crate) fn cancel_requested(&self) -> bool {
        self.cancel_requested.load(Ordering::Relaxed)
    }
}

/// 单块的上传状态：剩余待传的片 + 上一片的响应。
///
/// 只暴露「用上一片的结果提交下一片」这一个动作（[`BlockSession::upload_next`]），
/// 借助 `&mut self` 保证同一块内不可能乱序或并发提交。
/// 一片只有在收到成功响应后才会出队；任何失败都会让会话进入中止状态，之后不能再提交。
#[derive(Debug)]
pub(crate) struct BlockSession {
    block_index: usize,
    block_len: u64,
    pending: std::vec::IntoIter<Chunk>,
    last: Option<ChunkResult>,
    aborted: bool,
}

impl BlockSession {
    pub(crate) fn new(block: &Block, chunk_size: u64) -> Result<Self, UploadError> {
        let chunks = split_chunks(block, chunk_size)?;
        Ok(Self {
            block_index: block.index,
            block_len: block.len(),
            pending: chunks.into_iter(),
            last: None,
            aborted: false,
        })
    }

    pub(crate) fn block_index(&self) -> usize {
        self.block_index
    }

    /// 剩余未上传成功的片数。
    pub(crate) fn remaining(&self) -> usize {
        self.pending.len()
    }

    /// 上传下一片：第一片走 mkblk，之后走 bput。
    ///
    /// 成功返回本片字节数；没有剩余的片时返回 `Ok(None)`。任何失败立即返回，不重试，
    /// 之后再调用会得到 [`UploadError::BlockAborted`]。
    pub(crate) async fn upload_next(
        &mut self,
        cx: &RequestContext,
    ) -> Result<Option<u64>, UploadError> {
        if self.aborted {
            return Err(UploadError::BlockAborted {
                block_index: self.block_index,
            });
        }
        let Some(chunk) = self.pending.as_slice().first().cloned() else {
            return Ok(None);
        };

        if cx.cancel_requested() {
            self.aborted = true;
            return Err(UploadError::Cancelled);
        }

        let len = chunk.len();
        let sent = match &self.last {
            None => {
                cx.transport
                    .make_block(&cx.host, self.block_len, chunk.data, &cx.token)
                    .await
            }
            Some(prev) => {
                if prev.offset != chunk.offset {
                    warn!(
                        block = self.block_index,
                        chunk = chunk.index,
                        expected = chunk.offset,
                        server = prev.offset,
                        "服务端返回的偏移与本地切片不一致，按服务端偏移继续"
                    );
                }
                let host = prev.next_host().unwrap_or(&cx.host);
                cx.transport
                    .put_chunk(host, &prev.ctx, prev.offset, chunk.data, &cx.token)
                    .await
            }
        };

        let result = match sent {
            Ok(result) => result,
            Err(e) => {
                self.aborted = true;
                return Err(e);
            }
        };

        debug!(
            block = self.block_index,
            chunk = chunk.index,
            bytes = len,
            next_offset = result.offset,
            "片上传完成"
        );

        self.pending.next();
        self.last = Some(result);
        Ok(Some(len))
    }

    /// 所有片都上传成功后，最后一片的响应即为块结果；否则返回 `None`。
    pub(crate) fn into_result(self) -> Option<ChunkResult> {
        if self.aborted || !self.pending.as_slice().is_empty() {
            return None;
        }
        self.last
    }
}
