//! 块间并发：每块一个任务，全部成功时按块序号返回结果，任一块失败立即结束。

use tokio::task::JoinSet;
use tracing::{debug, warn};

use crate::internal::uploader::structs::block_session::{BlockSession, RequestContext};
use crate::internal::uploader::structs::{Block, ChunkResult, UploadError};

use super::progress_tracker::ProgressSender;

/// 并发上传所有块时的参数（形参超过 3 个，用 struct 承载）。
pub(crate) struct RunBlocksParams {
    pub blocks: Vec<Block>,
    pub chunk_size: u64,
    pub cx: RequestContext,
    pub progress: ProgressSender,
}

/// 串行上传一个块的全部片，返回最后一片的响应作为块结果。
pub(crate) async fn upload_block(
    block: Block,
    chunk_size: u64,
    cx: &RequestContext,
    progress: &ProgressSender,
) -> Result<ChunkResult, UploadError> {
    let mut session = BlockSession::new(&block, chunk_size)?;
    debug!(block = block.index, chunks = session.remaining(), "开始上传块");
    while let Some(bytes) = session.upload_next(cx).await? {
        progress.record(bytes);
    }

    let block_index = session.block_index();
    session.into_result().ok_or_else(|| {
        UploadError::InvalidResponse(format!("第 {block_index} 块没有任何片被上传"))
    })
}

/// 每块 spawn 一个任务（不限并发数），等待全部完成。
///
/// 第一个失败的块决定最终错误：随即置位取消标志并 abort 其余任务。取消是尽力而为的，
/// 已经发出的请求仍可能在服务端完成，它们的结果会被丢弃。
pub(crate) async fn run_blocks(
    params: RunBlocksParams,
) -> Result<Vec<ChunkResult>, UploadError> {
    let RunBlocksParams {
        blocks,
        chunk_size,
        cx,
        progress,
    } = params;

    let block_count = blocks.len();
    let mut tasks = JoinSet::new();

    for block in blocks {
        let cx = cx.clone();
        let progress = progress.clone();
        let block_index = block.index;
        tasks.spawn(async move {
            let result = upload_block(block, chunk_size, &cx, &progress).await;
            (block_index, result)
        });
    }
    drop(progress);

    let mut results: Vec<Option<ChunkResult>> = vec![None; block_count];

    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((block_index, Ok(result))) => {
                debug!(block = block_index, "块上传完成");
                if let Some(slot) = results.get_mut(block_index) {
                    *slot = Some(result);
                }
            }
            Ok((block_index, Err(e))) => {
                warn!(block = block_index, error = %e, "块上传失败，取消其余块");
                cx.request_cancel();
                tasks.abort_all();
                return Err(UploadError::BlockFailed {
                    block_index,
                    source: Box::new(e),
                });
            }
            Err(join_err) => {
                cx.request_cancel();
                tasks.abort_all();
                return Err(UploadError::TaskJoin(join_err));
            }
        }
    }

    // 按块序号排列，与完成顺序无关
    results
        .into_iter()
        .enumerate()
        .map(|(index, result)| {
            result.ok_or_else(|| {
                UploadError::InvalidResponse(format!("第 {index} 块缺少上传结果"))
            })
        })
        .collect()
}
