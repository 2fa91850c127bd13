use crate::internal::uploader::traits::upload::{HookAbort, UploadHook};

use super::{FileDescriptor, SourceFile, UploadError, UploadStatus};

/// 钩子容器：按注册顺序依次执行多个钩子。
#[derive(Default)]
pub struct UploadHooksContainer {
    hooks: Vec<Box<dyn UploadHook>>,
}

impl UploadHooksContainer {
    /// 添加一个上传钩子；支持多次调用以注册多个钩子，按添加顺序依次执行。
    pub fn add(&mut self, hook: impl UploadHook + 'static) {
        self.hooks.push(Box::new(hook));
    }

    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }

    pub async fn run_before_start(
        &mut self,
        source: &SourceFile,
    ) -> Result<(), HookAbort> {
        for h in self.hooks.iter_mut() {
            h.before_start(source).await?;
        }
        Ok(())
    }

    pub fn run_on_status(&mut self, status: UploadStatus) {
        for h in self.hooks.iter_mut() {
            h.on_status(status);
        }
    }

    pub fn run_on_progress(&mut self, uploaded: u64, total: u64) {
        for h in self.hooks.iter_mut() {
            h.on_progress(uploaded, total);
        }
    }

    pub async fn run_after_complete(&mut self, file: &FileDescriptor) {
        for h in self.hooks.iter_mut() {
            h.after_complete(file).await;
        }
    }

    pub fn run_on_error(&mut self, error: &UploadError) {
        for h in self.hooks.iter_mut() {
            h.on_error(error);
        }
    }
}
