//! 批量上传器
//!
//! 一次选择多个文件时使用：先按 `limit` 截断，再逐个校验类型与大小，
//! 任何一个文件不合格都会在发出请求前整体中止。校验通过后每个文件各自创建一个
//! [`FileUploader`] 并发上传，任一失败即整体失败。

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use futures_util::future::try_join_all;
use tokio::sync::Mutex;
use tracing::info;

use crate::internal::batch::traits::batch_hook::BatchHook;
use crate::internal::uploader::structs::{
    FileDescriptor, FileUploader, SourceFile, UploadConfig, UploadError,
};
use crate::internal::uploader::traits::transport::UploadTransport;

use super::AcceptFilter;
use super::batch_hooks_container::{
    BatchHooksContainer, OnBatchErrorHookAdapter, OnFilesProgressHookAdapter,
    OnStartHookAdapter, OnSuccessHookAdapter,
};

/// 默认文件个数上限，超出部分自动截断
pub const DEFAULT_LIMIT: usize = 1;

/// 默认单文件大小上限：20MB
pub const DEFAULT_MAX_SIZE: u64 = 20 * 1024 * 1024;

pub struct BatchUploader {
    config: UploadConfig,
    transport: Option<Arc<dyn UploadTransport>>,
    accept: AcceptFilter,
    limit: usize,
    max_size: u64,
    hooks: BatchHooksContainer,
}

impl BatchUploader {
    pub fn new(config: UploadConfig) -> Self {
        Self {
            config,
            transport: None,
            accept: AcceptFilter::default(),
            limit: DEFAULT_LIMIT,
            max_size: DEFAULT_MAX_SIZE,
            hooks: BatchHooksContainer::default(),
        }
    }

    /// 类型限制，语法同 `<input accept>`。
    pub fn accept(mut self, accept: &str) -> Self {
        self.accept = AcceptFilter::parse(accept);
        self
    }

    /// 文件个数上限，超出部分静默截断。
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// 单文件大小上限（字节）。
    pub fn max_size(mut self, max_size: u64) -> Self {
        self.max_size = max_size;
        self
    }

    /// 所有文件共用的传输层；不调用时每个文件各自创建默认传输层。
    pub fn with_transport(mut self, transport: Arc<dyn UploadTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn with_on_start_hook<F>(mut self, f: F) -> Self
    where
        F: FnMut(&[SourceFile]) + Send + Sync + 'static,
    {
        self.hooks.add(OnStartHookAdapter(f));
        self
    }

    /// 文件个数进度：已完成文件数、文件总数。
    pub fn with_on_progress_hook<F>(mut self, f: F) -> Self
    where
        F: FnMut(usize, usize) + Send + Sync + 'static,
    {
        self.hooks.add(OnFilesProgressHookAdapter(f));
        self
    }

    pub fn with_on_success_hook<F>(mut self, f: F) -> Self
    where
        F: FnMut(&[FileDescriptor]) + Send + Sync + 'static,
    {
        self.hooks.add(OnSuccessHookAdapter(f));
        self
    }

    pub fn with_on_error_hook<F>(mut self, f: F) -> Self
    where
        F: FnMut(&UploadError) + Send + Sync + 'static,
    {
        self.hooks.add(OnBatchErrorHookAdapter(f));
        self
    }

    pub fn with_hook(mut self, hook: impl BatchHook + 'static) -> Self {
        self.hooks.add(hook);
        self
    }

    /// 执行批量上传；成功时返回的文件信息与输入（截断后）顺序一致。
    pub async fn send(
        self,
        mut files: Vec<SourceFile>,
    ) -> Result<Vec<FileDescriptor>, UploadError> {
        let Self {
            config,
            transport,
            accept,
            limit,
            max_size,
            hooks,
        } = self;
        let hooks = Arc::new(Mutex::new(hooks));

        files.truncate(limit);

        // 校验在任何网络请求之前完成
        if let Err(e) = validate_files(&files, &accept, max_size) {
            hooks.lock().await.run_on_error(&e);
            return Err(e);
        }

        hooks.lock().await.run_on_start(&files);

        let files_total = files.len();
        let files_done = AtomicUsize::new(0);

        let uploads = files.iter().map(|file| {
            let mut uploader = FileUploader::new(config.clone());
            if let Some(t) = &transport {
                uploader = uploader.with_transport(Arc::clone(t));
            }
            let hooks = Arc::clone(&hooks);
            let files_done = &files_done;
            async move {
                let descriptor = uploader.send(file).await?;
                let done = files_done.fetch_add(1, Ordering::Relaxed) + 1;
                hooks.lock().await.run_on_progress(done, files_total);
                Ok::<_, UploadError>(descriptor)
            }
        });

        match try_join_all(uploads).await {
            Ok(descriptors) => {
                info!(files = descriptors.len(), "批量上传完成");
                hooks.lock().await.run_on_success(&descriptors);
                Ok(descriptors)
            }
            Err(e) => {
                hooks.lock().await.run_on_error(&e);
                Err(e)
            }
        }
    }
}

/// 类型与大小校验：任一文件不合格即整体失败。
fn validate_files(
    files: &[SourceFile],
    accept: &AcceptFilter,
    max_size: u64,
) -> Result<(), UploadError> {
    for file in files {
        if !accept.matches(file) {
            return Err(UploadError::Configuration(format!(
                "文件 {} 的类型 {} 不在允许范围内",
                file.name(),
                file.mime_type()
            )));
        }
        if file.size() > max_size {
            return Err(UploadError::SizeLimitExceeded {
                name: file.name().to_string(),
                size: file.size(),
                max_size,
            });
        }
    }
    Ok(())
}
