use crate::internal::batch::traits::batch_hook::BatchHook;
use crate::internal::uploader::structs::{FileDescriptor, SourceFile, UploadError};

/// 批量钩子容器：按注册顺序依次执行。
#[derive(Default)]
pub struct BatchHooksContainer {
    hooks: Vec<Box<dyn BatchHook>>,
}

impl BatchHooksContainer {
    pub fn add(&mut self, hook: impl BatchHook + 'static) {
        self.hooks.push(Box::new(hook));
    }

    pub fn run_on_start(&mut self, files: &[SourceFile]) {
        for h in self.hooks.iter_mut() {
            h.on_start(files);
        }
    }

    pub fn run_on_progress(&mut self, files_done: usize, files_total: usize) {
        for h in self.hooks.iter_mut() {
            h.on_progress(files_done, files_total);
        }
    }

    pub fn run_on_success(&mut self, files: &[FileDescriptor]) {
        for h in self.hooks.iter_mut() {
            h.on_success(files);
        }
    }

    pub fn run_on_error(&mut self, error: &UploadError) {
        for h in self.hooks.iter_mut() {
            h.on_error(error);
        }
    }
}

/// 闭包适配器：每个闭包只覆盖一个阶段。
pub(crate) struct OnStartHookAdapter<F>(pub(crate) F);

impl<F> BatchHook for OnStartHookAdapter<F>
where
    F: FnMut(&[SourceFile]) + Send + Sync + 'static,
{
    fn on_start(&mut self, files: &[SourceFile]) {
        (self.0)(files);
    }
}

pub(crate) struct OnFilesProgressHookAdapter<F>(pub(crate) F);

impl<F> BatchHook for OnFilesProgressHookAdapter<F>
where
    F: FnMut(usize, usize) + Send + Sync + 'static,
{
    fn on_progress(&mut self, files_done: usize, files_total: usize) {
        (self.0)(files_done, files_total);
    }
}

pub(crate) struct OnSuccessHookAdapter<F>(pub(crate) F);

impl<F> BatchHook for OnSuccessHookAdapter<F>
where
    F: FnMut(&[FileDescriptor]) + Send + Sync + 'static,
{
    fn on_success(&mut self, files: &[FileDescriptor]) {
        (self.0)(files);
    }
}

pub(crate) struct OnBatchErrorHookAdapter<F>(pub(crate) F);

impl<F> BatchHook for OnBatchErrorHookAdapter<F>
where
    F: FnMut(&UploadError) + Send + Sync + 'static,
{
    fn on_error(&mut self, error: &UploadError) {
        (self.0)(error);
    }
}
