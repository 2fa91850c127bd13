use crate::internal::uploader::structs::{FileDescriptor, SourceFile, UploadError};

/// 批量上传的生命周期钩子，全部为可选的旁路回调。
pub trait BatchHook: Send + Sync {
    /// 校验通过、即将开始上传时调用。
    fn on_start(&mut self, _files: &[SourceFile]) {}

    /// 每完成一个文件调用一次（已完成文件数、文件总数）。
    fn on_progress(&mut self, _files_done: usize, _files_total: usize) {}

    /// 全部文件上传成功后调用，顺序与输入一致。
    fn on_success(&mut self, _files: &[FileDescriptor]) {}

    /// 任一文件失败（或校验失败）时调用，只会收到第一个错误。
    fn on_error(&mut self, _error: &UploadError) {}
}
