//! 合成文件：把按块序号排列的 ctx 列表提交给 mkfile，并组装最终的文件信息。

use tracing::info;

use crate::internal::uploader::functions::download_url::join_download_url;
use crate::internal::uploader::structs::block_session::RequestContext;
use crate::internal::uploader::structs::{
    ChunkResult, FileCreated, FileDescriptor, SourceFile, UploadError,
};

/// 合成文件时的参数（形参超过 3 个，用 struct 承载）。
pub(crate) struct FinalizeParams<'a> {
    /// 按块序号排列的块结果
    pub block_results: &'a [ChunkResult],
    pub file_size: u64,
    /// 已做 URL 安全 base64 编码的 key，可能为空
    pub encoded_key: &'a str,
}

/// 发起 mkfile 请求。地址取最后一块结果中的 host，缺省时回落到配置的上传地址。
pub(crate) async fn finalize(
    cx: &RequestContext,
    params: FinalizeParams<'_>,
) -> Result<FileCreated, UploadError> {
    let host = params
        .block_results
        .last()
        .and_then(ChunkResult::next_host)
        .unwrap_or(&cx.host);

    let ctx_list = params
        .block_results
        .iter()
        .map(|r| r.ctx.as_str())
        .collect::<Vec<_>>()
        .join(",");

    let created = cx
        .transport
        .make_file(host, params.file_size, params.encoded_key, ctx_list, &cx.token)
        .await?;

    info!(
        key = %created.key,
        hash = %created.hash,
        blocks = params.block_results.len(),
        "文件合成完成"
    );

    Ok(created)
}

/// 由 mkfile 的响应与源文件信息组装最终返回的文件信息。
pub(crate) fn describe_file(
    created: FileCreated,
    source: &SourceFile,
    size: u64,
    domain: &str,
) -> FileDescriptor {
    let url = join_download_url(domain, &created.key);
    FileDescriptor {
        hash: created.hash,
        key: created.key,
        name: source.name().to_string(),
        size,
        mime_type: source.mime_type().to_string(),
        url,
    }
}
