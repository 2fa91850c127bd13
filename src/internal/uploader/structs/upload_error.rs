//! 上传相关错误类型。

use thiserror::Error;

use crate::internal::uploader::traits::upload::HookAbort;

#[derive(Debug, Error)]
pub enum UploadError {
    /// 凭证解析失败、块/片大小非法、上传地址非法等。
    #[error("配置错误: {0}")]
    Configuration(String),

    /// 文件超出大小上限，在任何网络请求之前抛出。
    #[error("文件 {name} 大小 {size} 字节，超出上限 {max_size} 字节")]
    SizeLimitExceeded {
        name: String,
        size: u64,
        max_size: u64,
    },

    #[error("HTTP 请求失败: {0}")]
    Network(#[from] reqwest::Error),

    /// 服务端返回非成功状态码，`message` 取自响应体的 `error` 字段。
    #[error("服务端返回错误 {status}: {message}")]
    Protocol { status: u16, message: String },

    /// 某一块上传失败；其余块可能已经发出过请求，不做补偿清理。
    #[error("第 {block_index} 块上传失败: {source}")]
    BlockFailed {
        block_index: usize,
        #[source]
        source: Box<UploadError>,
    },

    #[error("响应解析失败: {0}")]
    InvalidResponse(String),

    #[error("读取源文件失败: {0}")]
    ReadSource(std::io::Error),

    #[error("分块任务失败: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),

    /// 该块此前已经失败或被取消，不能继续提交后续的片。
    #[error("第 {block_index} 块已中止，不能继续上传")]
    BlockAborted { block_index: usize },

    #[error("上传被取消")]
    Cancelled,

    /// 钩子在 before_start 中返回错误，中止上传。
    #[error("{0}")]
    HookAbort(#[from] HookAbort),
}

impl UploadError {
    /// 剥掉 [`UploadError::BlockFailed`] 包装，返回最初的错误。
    pub fn root_cause(&self) -> &UploadError {
        match self {
            Self::BlockFailed { source, .. } => source.root_cause(),
            other => other,
        }
    }
}
