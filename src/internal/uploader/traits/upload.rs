//! 上传相关 trait：钩子接口，供上传器在各状态节点调用。
//!
//! 对外使用入口为 [`crate::uploader`]。

use async_trait::async_trait;

use crate::internal::uploader::structs::{
    FileDescriptor, SourceFile, UploadError, UploadStatus,
};

/// 钩子执行时请求中止上传时使用的错误。
#[derive(Debug, Clone)]
pub struct HookAbort(pub String);

impl std::fmt::Display for HookAbort {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "上传被钩子中止: {}", self.0)
    }
}

impl std::error::Error for HookAbort {}

/// 上传流程钩子：在「开始前 / 状态切换 / 进度 / 完成后 / 失败」插入自定义逻辑。
///
/// 钩子只是旁路观察者，上传协议本身从不等待钩子的结果（`before_start` 除外）。
/// 使用方式二选一（可混用）：
/// - **单阶段**：用 `with_before_start_hook` / `with_on_progress_hook` 等传入闭包；
/// - **完整钩子**：实现本 trait，通过上传器的 `with_hook` 注册。
#[async_trait]
pub trait UploadHook: Send + Sync {
    /// 上传开始前调用（如：校验文件名）。返回 `Err` 则中止本次上传，不会发出任何请求。
    async fn before_start(&mut self, _source: &SourceFile) -> Result<(), HookAbort> {
        Ok(())
    }

    /// 状态机切换时调用。
    fn on_status(&mut self, _status: UploadStatus) {}

    /// 进度更新（累计已确认上传的字节、文件总大小）。
    fn on_progress(&mut self, _uploaded: u64, _total: u64) {}

    /// 上传成功结束后调用。
    async fn after_complete(&mut self, _file: &FileDescriptor) {}

    /// 上传失败后调用，只会收到第一个错误。
    fn on_error(&mut self, _error: &UploadError) {}
}
