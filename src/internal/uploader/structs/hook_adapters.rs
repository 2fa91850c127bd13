//! 单阶段钩子适配器：将闭包包装成 [`UploadHook`]，供 `with_xx_hook` 使用。

use std::future::Future;

use async_trait::async_trait;

use crate::internal::uploader::traits::upload::{HookAbort, UploadHook};

use super::{FileDescriptor, SourceFile, UploadError, UploadStatus};

/// 仅实现「开始前」的钩子适配器。
pub(crate) struct BeforeStartHookAdapter<F>(pub(crate) F);

#[async_trait]
impl<F, Fut> UploadHook for BeforeStartHookAdapter<F>
where
    F: FnMut() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), HookAbort>> + Send + 'static,
{
    async fn before_start(&mut self, _source: &SourceFile) -> Result<(), HookAbort> {
        (self.0)().await
    }
}

/// 仅实现「状态切换」的钩子适配器。
pub(crate) struct OnStatusHookAdapter<F>(pub(crate) F);

#[async_trait]
impl<F> UploadHook for OnStatusHookAdapter<F>
where
    F: FnMut(UploadStatus) + Send + Sync + 'static,
{
    fn on_status(&mut self, status: UploadStatus) {
        (self.0)(status);
    }
}

/// 仅实现「进度」的钩子适配器。
pub(crate) struct OnProgressHookAdapter<F>(pub(crate) F);

#[async_trait]
impl<F> UploadHook for OnProgressHookAdapter<F>
where
    F: FnMut(u64, u64) + Send + Sync + 'static,
{
    fn on_progress(&mut self, uploaded: u64, total: u64) {
        (self.0)(uploaded, total);
    }
}

/// 仅实现「完成后」的钩子适配器；闭包拿到文件信息的拷贝。
pub(crate) struct AfterCompleteHookAdapter<F>(pub(crate) F);

#[async_trait]
impl<F, Fut> UploadHook for AfterCompleteHookAdapter<F>
where
    F: FnMut(FileDescriptor) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    async fn after_complete(&mut self, file: &FileDescriptor) {
        (self.0)(file.clone()).await
    }
}

/// 仅实现「失败」的钩子适配器。
pub(crate) struct OnErrorHookAdapter<F>(pub(crate) F);

#[async_trait]
impl<F> UploadHook for OnErrorHookAdapter<F>
where
    F: FnMut(&UploadError) + Send + Sync + 'static,
{
    fn on_error(&mut self, error: &UploadError) {
        (self.0)(error);
    }
}
